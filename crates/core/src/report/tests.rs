//! Tests for the consolidated report aggregation.

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use palco_shared::types::{PaymentRecordId, ProjectId};

use super::service::ReportService;
use crate::project::{Project, ProjectFields, ProjectStatus};
use crate::reconciliation::{Origin, PaymentRecord};

fn project(name: &str) -> Project {
    Project {
        id: ProjectId::new(),
        fields: ProjectFields {
            name: name.to_string(),
            prepared_by: "Ana".to_string(),
            execution_start: NaiveDate::from_ymd_opt(2024, 3, 1),
            execution_end: NaiveDate::from_ymd_opt(2024, 6, 30),
            ..ProjectFields::default()
        },
        status: ProjectStatus::Finalized,
        created_at: Utc::now(),
    }
}

fn record(project_id: ProjectId, amount: Decimal, paid: bool) -> PaymentRecord {
    let now = Utc::now();
    PaymentRecord {
        id: PaymentRecordId::new(),
        project_id,
        origin: Origin::Roster,
        source_item_id: Uuid::now_v7(),
        description: "Director - Ana".to_string(),
        amount,
        paid,
        payment_date: None,
        notes: None,
        created_at: now,
        updated_at: now,
    }
}

#[test]
fn test_summarize_project() {
    let p = project("Festival");
    let records = vec![
        record(p.id, dec!(1500), true),
        record(p.id, dec!(800), false),
        record(p.id, dec!(200.50), true),
    ];

    let summary = ReportService::summarize(&p, &records);

    assert_eq!(summary.project_id, p.id);
    assert_eq!(summary.name, "Festival");
    assert_eq!(summary.prepared_by, "Ana");
    assert_eq!(summary.execution_start, NaiveDate::from_ymd_opt(2024, 3, 1));
    assert_eq!(summary.total_items, 3);
    assert_eq!(summary.total_planned, dec!(2500.50));
    assert_eq!(summary.total_paid, dec!(1700.50));
    assert_eq!(summary.items_paid, 2);
}

#[test]
fn test_summarize_without_records() {
    let p = project("Mostra");
    let summary = ReportService::summarize(&p, &[]);

    assert_eq!(summary.total_items, 0);
    assert_eq!(summary.total_planned, Decimal::ZERO);
    assert_eq!(summary.total_paid, Decimal::ZERO);
    assert_eq!(summary.items_paid, 0);
}

#[test]
fn test_consolidate_grand_totals() {
    let a = project("A");
    let b = project("B");
    let summaries = vec![
        ReportService::summarize(&a, &[record(a.id, dec!(1000), true)]),
        ReportService::summarize(
            &b,
            &[record(b.id, dec!(300), false), record(b.id, dec!(700), true)],
        ),
    ];

    let report = ReportService::consolidate(summaries);

    assert_eq!(report.projects.len(), 2);
    assert_eq!(report.totals.total_projects, 2);
    assert_eq!(report.totals.planned_total, dec!(2000));
    assert_eq!(report.totals.paid_total, dec!(1700));
    assert_eq!(report.totals.pending_total, dec!(300));
    assert_eq!(report.totals.total_items, 3);
    assert_eq!(report.totals.items_paid, 2);
}

#[test]
fn test_consolidate_empty() {
    let report = ReportService::consolidate(Vec::new());
    assert!(report.projects.is_empty());
    assert_eq!(report.totals.total_projects, 0);
    assert_eq!(report.totals.pending_total, Decimal::ZERO);
}

proptest! {
    /// Pending is always planned minus paid, and the grand totals equal the
    /// sum of the per-project rows.
    #[test]
    fn prop_consolidated_totals_balance(
        projects in prop::collection::vec(
            prop::collection::vec((0i64..10_000_000, any::<bool>()), 0..8),
            0..6,
        ),
    ) {
        let summaries: Vec<_> = projects
            .iter()
            .map(|rows| {
                let p = project("P");
                let records: Vec<_> = rows
                    .iter()
                    .map(|(cents, paid)| record(p.id, Decimal::new(*cents, 2), *paid))
                    .collect();
                ReportService::summarize(&p, &records)
            })
            .collect();

        let expected_items: u64 = summaries.iter().map(|s| s.total_items).sum();
        let report = ReportService::consolidate(summaries);

        prop_assert_eq!(
            report.totals.paid_total + report.totals.pending_total,
            report.totals.planned_total
        );
        prop_assert!(report.totals.paid_total <= report.totals.planned_total);
        prop_assert_eq!(report.totals.total_items, expected_items);
        prop_assert!(report.totals.items_paid <= report.totals.total_items);
    }
}
