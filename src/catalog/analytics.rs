/// Usage analytics snapshot

use crate::catalog::{Record, Repository};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

pub const DEFAULT_TOP_USERS: usize = 10;

/// Platform-wide metrics; nested breakdowns are passed through as published
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsMetrics {
    pub total_users: u64,
    pub active_users: u64,
    pub total_prompts: u64,
    pub total_workflows: u64,
    pub total_agents: u64,
    #[serde(rename = "totalAPIRequests")]
    pub total_api_requests: u64,
    pub total_teams: u64,
    /// Minutes
    pub average_session_duration: f64,
    pub top_categories: Vec<CategoryTrend>,
    pub usage_by_day: Vec<Value>,
    pub cost_metrics: Value,
    pub performance_metrics: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTrend {
    pub category: String,
    pub count: u64,
    pub percentage: f64,
    /// "up", "down" or "stable"
    pub trend: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAnalytics {
    pub user_id: String,
    pub user_name: String,
    pub total_sessions: u32,
    /// Minutes
    pub total_time: u32,
    pub prompts_created: u32,
    pub workflows_created: u32,
    pub agents_created: u32,
    pub api_requests_made: u32,
    pub last_active: DateTime<Utc>,
    pub favorite_categories: Vec<String>,
    pub activity_score: u32,
}

impl Record for UserAnalytics {
    fn id(&self) -> &str {
        &self.user_id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.user_name.as_str()]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamAnalytics {
    pub team_id: String,
    pub team_name: String,
    pub member_count: u32,
    pub total_resources: u32,
    pub collaboration_score: u32,
    pub activity_level: String,
    pub top_contributors: Vec<UserAnalytics>,
    pub resource_distribution: Vec<Value>,
    pub growth_metrics: Value,
}

impl Record for TeamAnalytics {
    fn id(&self) -> &str {
        &self.team_id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.team_name.as_str()]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSuggestion {
    pub title: String,
    pub description: String,
    pub potential_savings: f64,
    pub priority: String,
}

pub struct AnalyticsCatalog {
    metrics: Arc<AnalyticsMetrics>,
    users: Arc<dyn Repository<UserAnalytics>>,
    teams: Arc<dyn Repository<TeamAnalytics>>,
    cost_suggestions: Vec<CostSuggestion>,
}

impl AnalyticsCatalog {
    pub fn new(
        metrics: AnalyticsMetrics,
        users: Arc<dyn Repository<UserAnalytics>>,
        teams: Arc<dyn Repository<TeamAnalytics>>,
        cost_suggestions: Vec<CostSuggestion>,
    ) -> Self {
        Self {
            metrics: Arc::new(metrics),
            users,
            teams,
            cost_suggestions,
        }
    }

    pub fn metrics(&self) -> AnalyticsMetrics {
        self.metrics.as_ref().clone()
    }

    pub fn users(&self) -> Vec<UserAnalytics> {
        self.users.list()
    }

    pub fn teams(&self) -> Vec<TeamAnalytics> {
        self.teams.list()
    }

    /// Users with the highest activity score first
    pub fn top_users(&self, limit: usize) -> Vec<UserAnalytics> {
        let mut users = self.users.list();
        users.sort_by(|a, b| b.activity_score.cmp(&a.activity_score));
        users.truncate(limit);
        users
    }

    pub fn cost_suggestions(&self) -> Vec<CostSuggestion> {
        self.cost_suggestions.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed;

    #[test]
    fn metrics_keep_the_api_requests_key() {
        let catalog = seed::load().unwrap().analytics;
        let metrics = catalog.metrics();
        assert_eq!(metrics.total_api_requests, 45678);

        let json = serde_json::to_value(&metrics).unwrap();
        assert_eq!(json["totalAPIRequests"], 45678);
    }

    #[test]
    fn top_users_respects_limit() {
        let catalog = seed::load().unwrap().analytics;
        let top = catalog.top_users(1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].user_id, "user-1");
        assert_eq!(catalog.top_users(DEFAULT_TOP_USERS).len(), 2);
        assert_eq!(catalog.cost_suggestions().len(), 3);
    }
}
