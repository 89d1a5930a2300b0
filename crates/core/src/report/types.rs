//! Consolidated report data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use palco_shared::types::ProjectId;

/// Reconciliation progress of one finalized project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSummary {
    /// Project ID.
    pub project_id: ProjectId,
    /// Project name.
    pub name: String,
    /// Who prepared the proposal.
    pub prepared_by: String,
    /// Execution period start.
    pub execution_start: Option<NaiveDate>,
    /// Execution period end.
    pub execution_end: Option<NaiveDate>,
    /// Number of persisted payment records.
    pub total_items: u64,
    /// Sum of record amounts.
    pub total_planned: Decimal,
    /// Sum of paid record amounts.
    pub total_paid: Decimal,
    /// Number of paid records.
    pub items_paid: u64,
}

/// Grand totals across projects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConsolidatedTotals {
    /// Number of projects in the report.
    pub total_projects: u64,
    /// Sum of planned amounts.
    pub planned_total: Decimal,
    /// Sum of paid amounts.
    pub paid_total: Decimal,
    /// `planned_total - paid_total`.
    pub pending_total: Decimal,
    /// Number of payment records.
    pub total_items: u64,
    /// Number of paid records.
    pub items_paid: u64,
}

/// Consolidated reconciliation report over all finalized projects.
#[derive(Debug, Clone, Serialize)]
pub struct ConsolidatedReport {
    /// Per-project rows, newest project first.
    pub projects: Vec<ProjectSummary>,
    /// Grand totals.
    pub totals: ConsolidatedTotals,
}
