/// Lock-free seed repository using ArcSwap
///
/// Provides atomic snapshot reads and copy-on-write updates over an ordered
/// record list. Each update swaps the whole snapshot pointer, so readers never
/// block and always observe a consistent list in seed order.

use crate::catalog::{Record, Repository};
use arc_swap::ArcSwap;
use std::sync::Arc;

/// In-memory repository initialised from embedded seed data
///
/// Record order is preserved: listings, searches and filters return records in
/// the order they were seeded (then inserted).
#[derive(Debug)]
pub struct SeedRepository<T> {
    /// Collection name used in log lines (e.g., "prompts")
    name: &'static str,
    /// Thread-safe atomic pointer to the record list
    records: ArcSwap<Vec<T>>,
}

impl<T: Record> SeedRepository<T> {
    pub fn new(name: &'static str, records: Vec<T>) -> Self {
        tracing::debug!("📥 Seeded {} with {} records", name, records.len());
        Self {
            name,
            records: ArcSwap::new(Arc::new(records)),
        }
    }

    /// Wrap into the trait object the catalogs hold
    pub fn shared(name: &'static str, records: Vec<T>) -> Arc<dyn Repository<T>> {
        Arc::new(Self::new(name, records))
    }

    pub fn len(&self) -> usize {
        self.records.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.load().is_empty()
    }
}

impl<T: Record> Repository<T> for SeedRepository<T> {
    fn get_by_id(&self, id: &str) -> Option<T> {
        self.records.load().iter().find(|record| record.id() == id).cloned()
    }

    fn list(&self) -> Vec<T> {
        (**self.records.load()).clone()
    }

    fn filter(&self, predicate: &dyn Fn(&T) -> bool) -> Vec<T> {
        self.records
            .load()
            .iter()
            .filter(|record| predicate(*record))
            .cloned()
            .collect()
    }

    fn insert(&self, record: T) -> bool {
        let id = record.id().to_string();
        let mut inserted = false;
        // Clone current snapshot, append unless taken, swap
        self.records.rcu(|current| {
            let mut next = (**current).clone();
            inserted = !next.iter().any(|existing| existing.id() == id);
            if inserted {
                next.push(record.clone());
            }
            next
        });
        if inserted {
            tracing::info!("🔥 Stored {} record: {}", self.name, id);
        } else {
            tracing::warn!("⚠️ Refused duplicate {} record: {}", self.name, id);
        }
        inserted
    }

    fn update(&self, id: &str, apply: &dyn Fn(&mut T)) -> Option<T> {
        let mut updated = None;
        self.records.rcu(|current| {
            let mut next = (**current).clone();
            updated = next.iter_mut().find(|record| record.id() == id).map(|record| {
                apply(record);
                record.clone()
            });
            next
        });
        if updated.is_some() {
            tracing::debug!("Updated {} record: {}", self.name, id);
        }
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: String,
        label: String,
        tags: Vec<String>,
    }

    impl Record for Item {
        fn id(&self) -> &str {
            &self.id
        }

        fn search_fields(&self) -> Vec<&str> {
            let mut fields = vec![self.label.as_str()];
            fields.extend(self.tags.iter().map(String::as_str));
            fields
        }
    }

    fn item(id: &str, label: &str, tags: &[&str]) -> Item {
        Item {
            id: id.to_string(),
            label: label.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn repo() -> SeedRepository<Item> {
        SeedRepository::new(
            "items",
            vec![
                item("a", "React Components", &["ui"]),
                item("b", "Data Pipeline", &["ETL", "csv"]),
            ],
        )
    }

    #[test]
    fn search_is_case_insensitive_and_covers_tags() {
        let repo = repo();
        let hits: Vec<_> = repo.search("etl").into_iter().map(|i| i.id).collect();
        assert_eq!(hits, vec!["b"]);
        let hits: Vec<_> = repo.search("REACT").into_iter().map(|i| i.id).collect();
        assert_eq!(hits, vec!["a"]);
        assert_eq!(repo.search("").len(), 2);
    }

    #[test]
    fn insert_appends_and_refuses_taken_ids() {
        let repo = repo();
        assert!(repo.insert(item("c", "Chat", &[])));
        assert!(!repo.insert(item("a", "Renamed", &[])));

        let ids: Vec<_> = repo.list().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(repo.get_by_id("a").unwrap().label, "React Components");
    }

    #[test]
    fn update_returns_none_for_unknown_id() {
        let repo = repo();
        assert!(repo.update("zzz", &|i| i.label.clear()).is_none());

        let updated = repo.update("b", &|i| i.label = "Pipeline".into()).unwrap();
        assert_eq!(updated.label, "Pipeline");
        assert_eq!(repo.get_by_id("b").unwrap().label, "Pipeline");
    }
}
