//! Payment reconciliation routes.
//!
//! Upload handling owns MIME type and size validation; the engine only ever
//! sees files that passed [`StorageService::validate_upload`].
//!
//! [`StorageService::validate_upload`]: palco_core::storage::StorageService::validate_upload

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{delete, get, post},
};
use bytes::Bytes;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use palco_core::reconciliation::validation::{parse_amount, parse_attachment_kind, parse_origin};
use palco_core::reconciliation::{
    PaymentView, PutAttachmentInput, ReconciliationError, UpsertOutcome, UpsertPaymentInput,
};
use palco_core::report::{ConsolidatedReport, ProjectSummary};
use palco_shared::types::{AttachmentId, PaymentRecordId, ProjectId};

use crate::{AppState, error::ApiError};

/// Allowance for multipart boundaries and the `kind` field on top of the file cap.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Creates the reconciliation routes.
pub fn routes(max_file_size: u64) -> Router<AppState> {
    let body_limit = usize::try_from(max_file_size)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        .route("/reconciliation/projects", get(list_reconcilable_projects))
        .route(
            "/reconciliation/projects/{project_id}",
            get(get_payment_view),
        )
        .route("/reconciliation/records", post(upsert_payment_record))
        .route(
            "/reconciliation/records/{record_id}",
            delete(delete_payment_record),
        )
        .route(
            "/reconciliation/records/{record_id}/attachments",
            post(upload_attachment).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route(
            "/reconciliation/attachments/{attachment_id}",
            get(download_attachment).delete(delete_attachment),
        )
        .route("/reconciliation/report", get(get_consolidated_report))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating or updating a payment record.
#[derive(Debug, Deserialize)]
pub struct UpsertPaymentRequest {
    /// Owning project.
    pub project_id: ProjectId,
    /// `roster` or `plan`.
    pub origin: String,
    /// Team member or communication item ID.
    pub source_item_id: Uuid,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Amount as a JSON number or numeric string.
    #[serde(default)]
    pub amount: Option<Value>,
    /// Paid flag.
    #[serde(default)]
    pub paid: Option<bool>,
    /// Payment date.
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl UpsertPaymentRequest {
    fn into_input(self) -> Result<UpsertPaymentInput, ReconciliationError> {
        Ok(UpsertPaymentInput {
            project_id: self.project_id,
            origin: parse_origin(&self.origin)?,
            source_item_id: self.source_item_id,
            description: self.description,
            amount: coerce_amount(self.amount.as_ref())?,
            paid: self.paid,
            payment_date: self.payment_date,
            notes: self.notes,
        })
    }
}

/// Response for an uploaded attachment.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Attachment ID.
    pub attachment_id: AttachmentId,
    /// Original file name.
    pub file_name: String,
}

/// Accept a JSON number or a numeric string; `null` means omitted.
fn coerce_amount(value: Option<&Value>) -> Result<Option<Decimal>, ReconciliationError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => parse_amount(&n.to_string()).map(Some),
        Some(Value::String(s)) => parse_amount(s).map(Some),
        Some(other) => Err(ReconciliationError::invalid_amount(other.to_string())),
    }
}

/// File name safe to place in a quoted `Content-Disposition` parameter.
fn disposition_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            let keep = c == ' ' || (c.is_ascii_graphic() && c != '"' && c != '\\');
            if keep { c } else { '_' }
        })
        .collect();

    if cleaned.trim().is_empty() {
        "attachment".to_string()
    } else {
        cleaned
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/reconciliation/projects`
async fn list_reconcilable_projects(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProjectSummary>>, ApiError> {
    Ok(Json(state.engine().list_reconcilable_projects().await?))
}

/// GET `/reconciliation/projects/{project_id}`
async fn get_payment_view(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<PaymentView>, ApiError> {
    Ok(Json(state.engine().build_payment_view(project_id).await?))
}

/// POST `/reconciliation/records`
async fn upsert_payment_record(
    State(state): State<AppState>,
    payload: Result<Json<UpsertPaymentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UpsertOutcome>), ApiError> {
    let Json(request) = payload?;
    let outcome = state
        .engine()
        .upsert_payment_record(request.into_input()?)
        .await?;

    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(outcome)))
}

/// DELETE `/reconciliation/records/{record_id}`
async fn delete_payment_record(
    State(state): State<AppState>,
    Path(record_id): Path<PaymentRecordId>,
) -> Result<StatusCode, ApiError> {
    state.engine().delete_payment_record(record_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST `/reconciliation/records/{record_id}/attachments`
///
/// Multipart form with a `kind` text field and a `file` field.
async fn upload_attachment(
    State(state): State<AppState>,
    Path(record_id): Path<PaymentRecordId>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let mut kind = None;
    let mut file: Option<(String, String, Bytes)> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("kind") => kind = Some(field.text().await?),
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await?;
                file = Some((file_name, content_type, bytes));
            }
            _ => {}
        }
    }

    let kind = parse_attachment_kind(kind.as_deref().unwrap_or_default())?;
    let Some((file_name, content_type, bytes)) = file else {
        return Err(ApiError::validation("missing file field"));
    };

    let size = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
    state.storage.validate_upload(&content_type, size)?;

    let attachment = state
        .engine()
        .put_attachment(PutAttachmentInput {
            payment_record_id: record_id,
            kind,
            file_name,
            content_type,
            bytes,
        })
        .await?;

    info!(
        record_id = %record_id,
        attachment_id = %attachment.id,
        "attachment uploaded"
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            attachment_id: attachment.id,
            file_name: attachment.file_name,
        }),
    ))
}

/// GET `/reconciliation/attachments/{attachment_id}`
async fn download_attachment(
    State(state): State<AppState>,
    Path(attachment_id): Path<AttachmentId>,
) -> Result<impl IntoResponse, ApiError> {
    let (attachment, bytes) = state.engine().get_attachment(attachment_id).await?;

    let disposition = format!(
        "inline; filename=\"{}\"",
        disposition_file_name(&attachment.file_name)
    );

    Ok((
        [
            (header::CONTENT_TYPE, attachment.content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

/// DELETE `/reconciliation/attachments/{attachment_id}`
async fn delete_attachment(
    State(state): State<AppState>,
    Path(attachment_id): Path<AttachmentId>,
) -> Result<StatusCode, ApiError> {
    state.engine().delete_attachment(attachment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET `/reconciliation/report`
async fn get_consolidated_report(
    State(state): State<AppState>,
) -> Result<Json<ConsolidatedReport>, ApiError> {
    Ok(Json(state.engine().build_consolidated_report().await?))
}
