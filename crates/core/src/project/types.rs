//! Project data types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use palco_shared::types::ProjectId;

use crate::planning::{CommunicationItem, TeamMember};

/// Project lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Proposal still being edited.
    #[default]
    Draft,
    /// Proposal approved; payments can be reconciled.
    Finalized,
}

impl ProjectStatus {
    /// Convert to database string value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Finalized => "finalized",
        }
    }

    /// Parse from database string value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "finalized" => Some(Self::Finalized),
            _ => None,
        }
    }
}

/// Descriptive, user-editable fields of a project proposal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectFields {
    /// Project name.
    pub name: String,
    /// Who prepared the proposal.
    pub prepared_by: String,
    /// Object of the project.
    pub object: Option<String>,
    /// Objectives.
    pub objectives: Option<String>,
    /// Justification.
    pub justification: Option<String>,
    /// Goals and expected results.
    pub goals_and_results: Option<String>,
    /// Target audience profile.
    pub audience_profile: Option<String>,
    /// Estimated audience.
    pub audience_estimate: Option<String>,
    /// Accessibility structures offered.
    pub accessibility_structures: Option<String>,
    /// Complies with the visual accessibility law.
    pub visual_accessibility_law: bool,
    /// Charges admission.
    pub ticket_sales: bool,
    /// Collects food donations.
    pub food_collection: bool,
    /// Sells products.
    pub product_sales: bool,
    /// Has funding from other sources.
    pub other_funding_sources: bool,
    /// Execution period start.
    pub execution_start: Option<NaiveDate>,
    /// Execution period end.
    pub execution_end: Option<NaiveDate>,
}

/// A cultural project proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Project ID.
    pub id: ProjectId,
    /// Descriptive fields.
    #[serde(flatten)]
    pub fields: ProjectFields,
    /// Lifecycle status.
    pub status: ProjectStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Whether payments for this project are meant to be reconciled.
    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.status == ProjectStatus::Finalized
    }
}

/// Input for replacing a project's fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProjectInput {
    /// New descriptive fields.
    #[serde(flatten)]
    pub fields: ProjectFields,
    /// New status; the current one is kept when omitted.
    #[serde(default)]
    pub status: Option<ProjectStatus>,
}

/// A project together with its planning rows.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetail {
    /// The project.
    #[serde(flatten)]
    pub project: Project,
    /// Technical staff roster, in insertion order.
    pub team_members: Vec<TeamMember>,
    /// Communication plan, in insertion order.
    pub communication_items: Vec<CommunicationItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_status_roundtrip() {
        for status in [ProjectStatus::Draft, ProjectStatus::Finalized] {
            assert_eq!(ProjectStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ProjectStatus::parse("rascunho"), None);
    }

    #[test]
    fn test_project_serializes_flat() {
        let project = Project {
            id: ProjectId::new(),
            fields: ProjectFields {
                name: "Festival".to_string(),
                prepared_by: "Ana".to_string(),
                ..ProjectFields::default()
            },
            status: ProjectStatus::Finalized,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["name"], "Festival");
        assert_eq!(json["status"], "finalized");
        assert_eq!(json["ticket_sales"], false);
    }
}
