/// Integration hub catalog
///
/// Available integrations, user connections and their webhook/sync history.

use crate::catalog::{unique_in_order, Record, Repository};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Integration {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub provider: String,
    pub logo: String,
    pub status: String,
    pub is_popular: bool,
    pub features: Vec<String>,
    /// Action descriptors with parameter schemas and examples
    #[serde(default)]
    pub supported_actions: Vec<Value>,
    pub auth_type: String,
    pub setup_complexity: String,
    pub documentation: String,
    pub sync_status: String,
    pub connection_count: u64,
    pub usage_count: u64,
}

impl Record for Integration {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.description.as_str()];
        fields.extend(self.features.iter().map(String::as_str));
        fields
    }
}

/// A user's configured connection to an integration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationConnection {
    pub id: String,
    pub integration_id: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub credentials: Map<String, Value>,
    #[serde(default)]
    pub settings: Value,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<DateTime<Utc>>,
    pub usage_count: u64,
}

impl Record for IntegrationConnection {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    pub id: String,
    pub integration_id: String,
    pub connection_id: String,
    pub event: String,
    pub payload: Value,
    pub timestamp: DateTime<Utc>,
    pub status: String,
    pub retry_count: u32,
}

impl Record for WebhookEvent {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.event.as_str()]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncLog {
    pub id: String,
    pub connection_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    pub records_processed: u64,
    pub records_failed: u64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_details: Option<Vec<String>>,
}

impl Record for SyncLog {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.kind.as_str(), self.status.as_str()]
    }
}

pub struct IntegrationCatalog {
    integrations: Arc<dyn Repository<Integration>>,
    connections: Arc<dyn Repository<IntegrationConnection>>,
    webhook_events: Arc<dyn Repository<WebhookEvent>>,
    sync_logs: Arc<dyn Repository<SyncLog>>,
}

impl IntegrationCatalog {
    pub fn new(
        integrations: Arc<dyn Repository<Integration>>,
        connections: Arc<dyn Repository<IntegrationConnection>>,
        webhook_events: Arc<dyn Repository<WebhookEvent>>,
        sync_logs: Arc<dyn Repository<SyncLog>>,
    ) -> Self {
        Self {
            integrations,
            connections,
            webhook_events,
            sync_logs,
        }
    }

    pub fn list(&self) -> Vec<Integration> {
        self.integrations.list()
    }

    pub fn get_by_id(&self, id: &str) -> Option<Integration> {
        self.integrations.get_by_id(id)
    }

    pub fn popular(&self) -> Vec<Integration> {
        self.integrations.filter(&|integration| integration.is_popular)
    }

    pub fn by_category(&self, category: &str) -> Vec<Integration> {
        self.integrations
            .filter(&|integration| integration.category == category)
    }

    pub fn categories(&self) -> Vec<String> {
        unique_in_order(self.integrations.list().into_iter().map(|i| i.category))
    }

    /// Connections, optionally narrowed to a user and/or team
    pub fn connections(&self, user_id: Option<&str>, team_id: Option<&str>) -> Vec<IntegrationConnection> {
        self.connections.filter(&|connection| {
            user_id.map_or(true, |user| connection.user_id == user)
                && team_id.map_or(true, |team| connection.team_id.as_deref() == Some(team))
        })
    }

    pub fn connection_by_id(&self, id: &str) -> Option<IntegrationConnection> {
        self.connections.get_by_id(id)
    }

    pub fn webhook_events(&self, connection_id: Option<&str>) -> Vec<WebhookEvent> {
        self.webhook_events.filter(&|event| {
            connection_id.map_or(true, |connection| event.connection_id == connection)
        })
    }

    pub fn sync_logs(&self, connection_id: Option<&str>) -> Vec<SyncLog> {
        self.sync_logs.filter(&|log| {
            connection_id.map_or(true, |connection| log.connection_id == connection)
        })
    }
}
