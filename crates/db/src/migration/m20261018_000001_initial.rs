//! Initial database migration.
//!
//! Creates the project, planning, payment record and attachment tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: PROJECTS
        // ============================================================
        db.execute_unprepared(PROJECTS_SQL).await?;

        // ============================================================
        // PART 2: PLANNING ROWS
        // ============================================================
        db.execute_unprepared(TEAM_MEMBERS_SQL).await?;
        db.execute_unprepared(COMMUNICATION_ITEMS_SQL).await?;

        // ============================================================
        // PART 3: PAYMENT LEDGER
        // ============================================================
        db.execute_unprepared(PAYMENT_RECORDS_SQL).await?;
        db.execute_unprepared(PAYMENT_ATTACHMENTS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const PROJECTS_SQL: &str = r"
CREATE TABLE projects (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    prepared_by VARCHAR(255) NOT NULL,
    object TEXT,
    objectives TEXT,
    justification TEXT,
    goals_and_results TEXT,
    audience_profile TEXT,
    audience_estimate TEXT,
    accessibility_structures TEXT,
    visual_accessibility_law BOOLEAN NOT NULL DEFAULT false,
    ticket_sales BOOLEAN NOT NULL DEFAULT false,
    food_collection BOOLEAN NOT NULL DEFAULT false,
    product_sales BOOLEAN NOT NULL DEFAULT false,
    other_funding_sources BOOLEAN NOT NULL DEFAULT false,
    execution_start DATE,
    execution_end DATE,
    status VARCHAR(20) NOT NULL DEFAULT 'draft'
        CHECK (status IN ('draft', 'finalized')),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_projects_execution_period
        CHECK (execution_start IS NULL OR execution_end IS NULL OR execution_start <= execution_end)
);

CREATE INDEX idx_projects_created ON projects(created_at DESC);
CREATE INDEX idx_projects_finalized ON projects(created_at DESC) WHERE status = 'finalized';
";

const TEAM_MEMBERS_SQL: &str = r"
CREATE TABLE team_members (
    id UUID PRIMARY KEY,
    project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    role VARCHAR(255) NOT NULL,
    tax_id VARCHAR(32),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_team_members_project ON team_members(project_id, created_at, id);
";

const COMMUNICATION_ITEMS_SQL: &str = r"
CREATE TABLE communication_items (
    id UUID PRIMARY KEY,
    project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    item_service VARCHAR(255) NOT NULL,
    format VARCHAR(255),
    quantity_period VARCHAR(255),
    channel VARCHAR(255),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_communication_items_project ON communication_items(project_id, created_at, id);
";

const PAYMENT_RECORDS_SQL: &str = r"
CREATE TABLE payment_records (
    id UUID PRIMARY KEY,
    project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    origin VARCHAR(10) NOT NULL CHECK (origin IN ('roster', 'plan')),
    source_item_id UUID NOT NULL,
    description TEXT NOT NULL,
    amount NUMERIC NOT NULL DEFAULT 0 CHECK (amount >= 0 AND amount <= 999999999999.99),
    paid BOOLEAN NOT NULL DEFAULT false,
    payment_date DATE,
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_payment_records_natural_key UNIQUE (project_id, origin, source_item_id)
);
";

const PAYMENT_ATTACHMENTS_SQL: &str = r"
CREATE TABLE payment_attachments (
    id UUID PRIMARY KEY,
    payment_record_id UUID NOT NULL REFERENCES payment_records(id) ON DELETE CASCADE,
    kind VARCHAR(10) NOT NULL CHECK (kind IN ('receipt', 'invoice')),
    file_name VARCHAR(255) NOT NULL,
    content_type VARCHAR(100) NOT NULL,
    storage_key VARCHAR(500) NOT NULL,
    size_bytes BIGINT NOT NULL CHECK (size_bytes >= 0),
    uploaded_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_payment_attachments_slot UNIQUE (payment_record_id, kind)
);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS payment_attachments;
DROP TABLE IF EXISTS payment_records;
DROP TABLE IF EXISTS communication_items;
DROP TABLE IF EXISTS team_members;
DROP TABLE IF EXISTS projects;
";
