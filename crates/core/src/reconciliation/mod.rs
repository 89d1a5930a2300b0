//! Reconciliation Engine.
//!
//! Merges a project's planning rows with its payment ledger into a
//! [`PaymentView`] with derived [`Totals`], upserts payment records by natural
//! key and manages the receipt/invoice attachment slots of each record.

pub mod attachment;
pub mod error;
pub mod repository;
pub mod service;
pub mod types;
pub mod validation;


pub use attachment::{Attachment, AttachmentKind, AttachmentSlots, PutAttachmentInput};
pub use error::ReconciliationError;
pub use repository::{PaymentRepository, ReconciliationStore};
pub use service::ReconciliationService;
pub use types::{
    NaturalKey, Origin, PaymentEntry, PaymentRecord, PaymentView, Totals, UpsertOutcome,
    UpsertPaymentInput,
};
