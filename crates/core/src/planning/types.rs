//! Planning row types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use palco_shared::types::{CommunicationItemId, ProjectId, TeamMemberId};

/// A technical staff roster row ("origin = roster").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    /// Row ID.
    pub id: TeamMemberId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Professional or company name.
    pub name: String,
    /// Role in the project.
    pub role: String,
    /// Tax ID (CPF/CNPJ).
    pub tax_id: Option<String>,
    /// Insertion timestamp; defines roster order.
    pub created_at: DateTime<Utc>,
}

impl TeamMember {
    /// Description used for payment lines that have no record yet.
    #[must_use]
    pub fn payment_description(&self) -> String {
        format!("{} - {}", self.role, self.name)
    }
}

/// A communication plan row ("origin = plan").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunicationItem {
    /// Row ID.
    pub id: CommunicationItemId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Item or service description.
    pub item_service: String,
    /// Format or medium.
    pub format: Option<String>,
    /// Quantity or period.
    pub quantity_period: Option<String>,
    /// Channel or circulation.
    pub channel: Option<String>,
    /// Insertion timestamp; defines plan order.
    pub created_at: DateTime<Utc>,
}

impl CommunicationItem {
    /// Description used for payment lines that have no record yet.
    #[must_use]
    pub fn payment_description(&self) -> String {
        self.item_service.clone()
    }
}

/// Input for adding a roster row.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTeamMember {
    /// Professional or company name.
    pub name: String,
    /// Role in the project.
    pub role: String,
    /// Tax ID (CPF/CNPJ).
    #[serde(default)]
    pub tax_id: Option<String>,
}

/// Input for adding a communication plan row.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCommunicationItem {
    /// Item or service description.
    pub item_service: String,
    /// Format or medium.
    #[serde(default)]
    pub format: Option<String>,
    /// Quantity or period.
    #[serde(default)]
    pub quantity_period: Option<String>,
    /// Channel or circulation.
    #[serde(default)]
    pub channel: Option<String>,
}
