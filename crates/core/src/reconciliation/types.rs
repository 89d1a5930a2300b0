//! Reconciliation data types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use palco_shared::types::{PaymentRecordId, ProjectId};

use super::attachment::AttachmentSlots;
use crate::project::Project;

/// Which planning list a payment line item derives from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Technical staff roster.
    Roster,
    /// Communication plan.
    Plan,
}

impl Origin {
    /// Convert to database string value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Roster => "roster",
            Self::Plan => "plan",
        }
    }

    /// Parse from database string value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "roster" => Some(Self::Roster),
            "plan" => Some(Self::Plan),
            _ => None,
        }
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Business uniqueness key of a payment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NaturalKey {
    /// Owning project.
    pub project_id: ProjectId,
    /// Planning list of the source row.
    pub origin: Origin,
    /// Team member or communication item ID.
    pub source_item_id: Uuid,
}

/// A persisted payment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Record ID.
    pub id: PaymentRecordId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Planning list of the source row.
    pub origin: Origin,
    /// Team member or communication item ID.
    pub source_item_id: Uuid,
    /// User-editable description.
    pub description: String,
    /// Amount, never negative.
    pub amount: Decimal,
    /// Whether the amount has been paid.
    pub paid: bool,
    /// Payment date.
    pub payment_date: Option<NaiveDate>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl PaymentRecord {
    /// The natural key of this record.
    #[must_use]
    pub fn natural_key(&self) -> NaturalKey {
        NaturalKey {
            project_id: self.project_id,
            origin: self.origin,
            source_item_id: self.source_item_id,
        }
    }
}

/// One line of the payment view: a stored record or a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentEntry {
    /// Record ID, `None` for a placeholder.
    pub id: Option<PaymentRecordId>,
    /// Planning list of the source row.
    pub origin: Origin,
    /// Team member or communication item ID.
    pub source_item_id: Uuid,
    /// Description.
    pub description: String,
    /// Amount.
    pub amount: Decimal,
    /// Whether the amount has been paid.
    pub paid: bool,
    /// Payment date.
    pub payment_date: Option<NaiveDate>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Receipt and invoice slots.
    pub attachments: AttachmentSlots,
    /// Creation timestamp, `None` for a placeholder.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp, `None` for a placeholder.
    pub updated_at: Option<DateTime<Utc>>,
}

impl PaymentEntry {
    /// Synthesize an unsaved entry for a planning row with no record.
    #[must_use]
    pub fn placeholder(origin: Origin, source_item_id: Uuid, description: String) -> Self {
        Self {
            id: None,
            origin,
            source_item_id,
            description,
            amount: Decimal::ZERO,
            paid: false,
            payment_date: None,
            notes: None,
            attachments: AttachmentSlots::default(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Build an entry from a stored record and its resolved attachments.
    #[must_use]
    pub fn from_record(record: PaymentRecord, attachments: AttachmentSlots) -> Self {
        Self {
            id: Some(record.id),
            origin: record.origin,
            source_item_id: record.source_item_id,
            description: record.description,
            amount: record.amount,
            paid: record.paid,
            payment_date: record.payment_date,
            notes: record.notes,
            attachments,
            created_at: Some(record.created_at),
            updated_at: Some(record.updated_at),
        }
    }

    /// Whether this entry is an unsaved placeholder.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.id.is_none()
    }
}

/// Aggregate totals over a payment view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Totals {
    /// Sum of all amounts.
    pub total_planned: Decimal,
    /// Sum of paid amounts.
    pub total_paid: Decimal,
    /// `total_planned - total_paid`.
    pub total_pending: Decimal,
    /// Paid share in percent, one decimal place.
    pub percent_paid: Decimal,
}

impl Totals {
    /// Compute totals over payment entries.
    #[must_use]
    pub fn from_entries(entries: &[PaymentEntry]) -> Self {
        let total_planned: Decimal = entries.iter().map(|e| e.amount).sum();
        let total_paid: Decimal = entries.iter().filter(|e| e.paid).map(|e| e.amount).sum();

        Self {
            total_planned,
            total_paid,
            total_pending: total_planned - total_paid,
            percent_paid: percent(total_paid, total_planned),
        }
    }
}

/// `part / whole * 100` rounded to one decimal place, zero when `whole` is zero.
#[must_use]
pub fn percent(part: Decimal, whole: Decimal) -> Decimal {
    if whole > Decimal::ZERO {
        (part / whole * Decimal::ONE_HUNDRED).round_dp(1)
    } else {
        Decimal::ZERO
    }
}

/// The merged reconciliation view of a project.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentView {
    /// The project.
    pub project: Project,
    /// Roster entries followed by plan entries, each in planning order.
    pub entries: Vec<PaymentEntry>,
    /// Totals over `entries`.
    pub totals: Totals,
}

/// Input for creating or updating a payment record by natural key.
#[derive(Debug, Clone)]
pub struct UpsertPaymentInput {
    /// Owning project.
    pub project_id: ProjectId,
    /// Planning list of the source row.
    pub origin: Origin,
    /// Team member or communication item ID.
    pub source_item_id: Uuid,
    /// Description; derived from the source row on insert when omitted.
    pub description: Option<String>,
    /// Amount; zero when omitted.
    pub amount: Option<Decimal>,
    /// Paid flag; `false` when omitted.
    pub paid: Option<bool>,
    /// Payment date.
    pub payment_date: Option<NaiveDate>,
    /// Free-text notes.
    pub notes: Option<String>,
}

impl UpsertPaymentInput {
    /// The natural key addressed by this input.
    #[must_use]
    pub fn natural_key(&self) -> NaturalKey {
        NaturalKey {
            project_id: self.project_id,
            origin: self.origin,
            source_item_id: self.source_item_id,
        }
    }
}

/// Result of an upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpsertOutcome {
    /// Record ID.
    pub id: PaymentRecordId,
    /// `true` if a new record was inserted, `false` if one was updated.
    pub created: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry(amount: Decimal, paid: bool) -> PaymentEntry {
        let mut e = PaymentEntry::placeholder(Origin::Plan, Uuid::now_v7(), "x".to_string());
        e.amount = amount;
        e.paid = paid;
        e
    }

    #[test]
    fn test_origin_roundtrip() {
        for origin in [Origin::Roster, Origin::Plan] {
            assert_eq!(Origin::parse(origin.as_str()), Some(origin));
        }
        assert_eq!(Origin::parse("equipe"), None);
    }

    #[test]
    fn test_placeholder_defaults() {
        let e = PaymentEntry::placeholder(Origin::Roster, Uuid::now_v7(), "Director - Ana".into());
        assert!(e.is_placeholder());
        assert_eq!(e.amount, Decimal::ZERO);
        assert!(!e.paid);
        assert!(e.attachments.receipt.is_none());
        assert!(e.attachments.invoice.is_none());
    }

    #[test]
    fn test_totals_empty() {
        let totals = Totals::from_entries(&[]);
        assert_eq!(totals, Totals::default());
    }

    #[test]
    fn test_totals_mixed() {
        let totals = Totals::from_entries(&[
            entry(dec!(1500), true),
            entry(dec!(500), false),
            entry(dec!(1000), true),
        ]);

        assert_eq!(totals.total_planned, dec!(3000));
        assert_eq!(totals.total_paid, dec!(2500));
        assert_eq!(totals.total_pending, dec!(500));
        assert_eq!(totals.percent_paid, dec!(83.3));
    }

    #[test]
    fn test_percent_rounds_to_one_place() {
        assert_eq!(percent(dec!(1), dec!(3)), dec!(33.3));
        assert_eq!(percent(dec!(2), dec!(3)), dec!(66.7));
        assert_eq!(percent(dec!(1500), dec!(1500)), dec!(100.0));
        assert_eq!(percent(dec!(5), dec!(0)), dec!(0));
    }
}
