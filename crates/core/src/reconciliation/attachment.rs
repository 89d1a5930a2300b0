//! Attachment types for payment records.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use palco_shared::types::{AttachmentId, PaymentRecordId};

/// Kind of document attached to a payment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    /// Payment receipt.
    Receipt,
    /// Invoice.
    Invoice,
}

impl AttachmentKind {
    /// Convert to database string value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Receipt => "receipt",
            Self::Invoice => "invoice",
        }
    }

    /// Parse from database string value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "receipt" => Some(Self::Receipt),
            "invoice" => Some(Self::Invoice),
            _ => None,
        }
    }
}

impl std::fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attachment metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Attachment ID.
    pub id: AttachmentId,
    /// Owning payment record.
    pub payment_record_id: PaymentRecordId,
    /// Slot this file occupies.
    pub kind: AttachmentKind,
    /// Original file name.
    pub file_name: String,
    /// MIME type.
    pub content_type: String,
    /// Key in the object store.
    #[serde(skip_serializing)]
    pub storage_key: String,
    /// Size in bytes.
    pub size: i64,
    /// Upload timestamp.
    pub uploaded_at: DateTime<Utc>,
}

/// The two attachment slots of a payment record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttachmentSlots {
    /// Receipt slot.
    pub receipt: Option<Attachment>,
    /// Invoice slot.
    pub invoice: Option<Attachment>,
}

impl AttachmentSlots {
    /// Place attachments into their slots.
    ///
    /// If a slot somehow holds more than one row, the newest upload wins.
    #[must_use]
    pub fn from_attachments(attachments: impl IntoIterator<Item = Attachment>) -> Self {
        let mut slots = Self::default();
        for attachment in attachments {
            let slot = match attachment.kind {
                AttachmentKind::Receipt => &mut slots.receipt,
                AttachmentKind::Invoice => &mut slots.invoice,
            };
            let newer = slot
                .as_ref()
                .is_none_or(|current| current.uploaded_at <= attachment.uploaded_at);
            if newer {
                *slot = Some(attachment);
            }
        }
        slots
    }
}

/// Input for storing a file in an attachment slot.
#[derive(Debug, Clone)]
pub struct PutAttachmentInput {
    /// Owning payment record.
    pub payment_record_id: PaymentRecordId,
    /// Target slot.
    pub kind: AttachmentKind,
    /// Original file name.
    pub file_name: String,
    /// MIME type, already validated at the boundary.
    pub content_type: String,
    /// File content.
    pub bytes: Bytes,
}
