/// Team collaboration catalog

use crate::catalog::{Record, Repository};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub member_count: u32,
    pub plan: String,
    #[serde(default)]
    pub settings: Value,
}

impl Record for Team {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str()]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: String,
    pub team_id: String,
    pub user_id: String,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// "Owner", "Admin", "Editor" or "Viewer"
    pub role: String,
    pub joined_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    #[serde(default)]
    pub permissions: Value,
}

impl Record for TeamMember {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str()]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedResource {
    pub id: String,
    pub resource_id: String,
    pub resource_type: String,
    pub title: String,
    pub description: String,
    pub shared_by: String,
    /// Team ids the resource is shared with
    pub shared_with: Vec<String>,
    pub visibility: String,
    #[serde(default)]
    pub permissions: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub access_count: u32,
    pub tags: Vec<String>,
}

impl Record for SharedResource {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.description.as_str()];
        fields.extend(self.tags.iter().map(String::as_str));
        fields
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub team_id: String,
    pub user_id: String,
    pub user_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_avatar: Option<String>,
    pub action: String,
    pub resource_type: String,
    pub resource_id: String,
    pub resource_title: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub metadata: Value,
}

impl Record for Activity {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.resource_title.as_str(), self.description.as_str()]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: String,
    pub name: String,
    pub description: String,
    pub team_id: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_archived: bool,
    /// Pinned resources with canvas positions and notes
    #[serde(default)]
    pub resources: Vec<Value>,
    pub collaborators: Vec<String>,
    #[serde(default)]
    pub settings: Value,
}

impl Record for Workspace {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str()]
    }
}

pub struct TeamCatalog {
    teams: Arc<dyn Repository<Team>>,
    members: Arc<dyn Repository<TeamMember>>,
    shared_resources: Arc<dyn Repository<SharedResource>>,
    activities: Arc<dyn Repository<Activity>>,
    workspaces: Arc<dyn Repository<Workspace>>,
}

impl TeamCatalog {
    pub fn new(
        teams: Arc<dyn Repository<Team>>,
        members: Arc<dyn Repository<TeamMember>>,
        shared_resources: Arc<dyn Repository<SharedResource>>,
        activities: Arc<dyn Repository<Activity>>,
        workspaces: Arc<dyn Repository<Workspace>>,
    ) -> Self {
        Self {
            teams,
            members,
            shared_resources,
            activities,
            workspaces,
        }
    }

    pub fn list(&self) -> Vec<Team> {
        self.teams.list()
    }

    pub fn get_by_id(&self, id: &str) -> Option<Team> {
        self.teams.get_by_id(id)
    }

    pub fn members(&self, team_id: &str) -> Vec<TeamMember> {
        self.members.filter(&|member| member.team_id == team_id)
    }

    /// All shared resources, or only those shared with `team_id`
    pub fn shared_resources(&self, team_id: Option<&str>) -> Vec<SharedResource> {
        match team_id {
            Some(team) => self
                .shared_resources
                .filter(&|resource| resource.shared_with.iter().any(|t| t == team)),
            None => self.shared_resources.list(),
        }
    }

    pub fn activities(&self, team_id: &str) -> Vec<Activity> {
        self.activities.filter(&|activity| activity.team_id == team_id)
    }

    pub fn workspaces(&self, team_id: Option<&str>) -> Vec<Workspace> {
        match team_id {
            Some(team) => self.workspaces.filter(&|workspace| workspace.team_id == team),
            None => self.workspaces.list(),
        }
    }

    /// Teams the user is a member of
    pub fn teams_of_user(&self, user_id: &str) -> Vec<Team> {
        let team_ids: HashSet<String> = self
            .members
            .filter(&|member| member.user_id == user_id)
            .into_iter()
            .map(|member| member.team_id)
            .collect();
        self.teams.filter(&|team| team_ids.contains(&team.id))
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::seed;

    #[test]
    fn shared_resources_filter_on_shared_with() {
        let catalog = seed::load().unwrap().teams;
        assert_eq!(catalog.shared_resources(Some("team-2")).len(), 1);
        assert!(catalog.shared_resources(Some("team-9")).is_empty());
        assert_eq!(catalog.shared_resources(None).len(), 1);
    }

    #[test]
    fn user_teams_follow_membership() {
        let catalog = seed::load().unwrap().teams;
        let teams: Vec<_> = catalog.teams_of_user("user-2").into_iter().map(|t| t.id).collect();
        assert_eq!(teams, vec!["team-1"]);
        assert!(catalog.teams_of_user("nobody").is_empty());
        assert_eq!(catalog.members("team-1").len(), 2);
        assert_eq!(catalog.activities("team-1").len(), 2);
        assert!(catalog.workspaces(Some("team-2")).is_empty());
    }
}
