//! `SeaORM` Entity for payment_records table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payment_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub project_id: Uuid,
    pub origin: String,
    pub source_item_id: Uuid,
    pub description: String,
    #[sea_orm(column_type = "Decimal(None)")]
    pub amount: Decimal,
    pub paid: bool,
    pub payment_date: Option<Date>,
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id",
        on_delete = "Cascade"
    )]
    Projects,
    #[sea_orm(has_many = "super::payment_attachments::Entity")]
    PaymentAttachments,
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl Related<super::payment_attachments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentAttachments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
