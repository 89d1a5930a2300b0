//! `SeaORM` entity definitions.

pub mod communication_items;
pub mod payment_attachments;
pub mod payment_records;
pub mod projects;
pub mod team_members;
