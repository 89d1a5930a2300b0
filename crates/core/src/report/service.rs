//! Consolidated report aggregation.

use rust_decimal::Decimal;

use super::types::{ConsolidatedReport, ConsolidatedTotals, ProjectSummary};
use crate::project::Project;
use crate::reconciliation::PaymentRecord;

/// Pure aggregation over persisted payment records.
///
/// Only stored records count; planning rows without a record contribute nothing.
pub struct ReportService;

impl ReportService {
    /// Summarize the payment records of one project.
    #[must_use]
    pub fn summarize(project: &Project, records: &[PaymentRecord]) -> ProjectSummary {
        let total_planned: Decimal = records.iter().map(|r| r.amount).sum();
        let total_paid: Decimal = records.iter().filter(|r| r.paid).map(|r| r.amount).sum();
        let items_paid = records.iter().filter(|r| r.paid).count();

        ProjectSummary {
            project_id: project.id,
            name: project.fields.name.clone(),
            prepared_by: project.fields.prepared_by.clone(),
            execution_start: project.fields.execution_start,
            execution_end: project.fields.execution_end,
            total_items: records.len() as u64,
            total_planned,
            total_paid,
            items_paid: items_paid as u64,
        }
    }

    /// Build the consolidated report from per-project summaries.
    #[must_use]
    pub fn consolidate(projects: Vec<ProjectSummary>) -> ConsolidatedReport {
        let planned_total: Decimal = projects.iter().map(|p| p.total_planned).sum();
        let paid_total: Decimal = projects.iter().map(|p| p.total_paid).sum();

        let totals = ConsolidatedTotals {
            total_projects: projects.len() as u64,
            planned_total,
            paid_total,
            pending_total: planned_total - paid_total,
            total_items: projects.iter().map(|p| p.total_items).sum(),
            items_paid: projects.iter().map(|p| p.items_paid).sum(),
        };

        ConsolidatedReport { projects, totals }
    }
}
