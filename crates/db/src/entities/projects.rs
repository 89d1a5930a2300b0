//! `SeaORM` Entity for projects table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub prepared_by: String,
    pub object: Option<String>,
    pub objectives: Option<String>,
    pub justification: Option<String>,
    pub goals_and_results: Option<String>,
    pub audience_profile: Option<String>,
    pub audience_estimate: Option<String>,
    pub accessibility_structures: Option<String>,
    pub visual_accessibility_law: bool,
    pub ticket_sales: bool,
    pub food_collection: bool,
    pub product_sales: bool,
    pub other_funding_sources: bool,
    pub execution_start: Option<Date>,
    pub execution_end: Option<Date>,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::team_members::Entity")]
    TeamMembers,
    #[sea_orm(has_many = "super::communication_items::Entity")]
    CommunicationItems,
    #[sea_orm(has_many = "super::payment_records::Entity")]
    PaymentRecords,
}

impl Related<super::team_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeamMembers.def()
    }
}

impl Related<super::communication_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CommunicationItems.def()
    }
}

impl Related<super::payment_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
