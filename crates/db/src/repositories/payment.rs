//! Payment ledger repository for database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait, Unchanged,
};

use palco_core::RepositoryError;
use palco_core::reconciliation::{
    Attachment, AttachmentKind, NaturalKey, Origin, PaymentRecord, PaymentRepository,
};
use palco_shared::types::{AttachmentId, PaymentRecordId, ProjectId};

use super::{PgRepository, corrupt, map_db_err};
use crate::entities::{payment_attachments, payment_records};

impl PaymentRepository for PgRepository {
    async fn list_payment_records(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<PaymentRecord>, RepositoryError> {
        let models = payment_records::Entity::find()
            .filter(payment_records::Column::ProjectId.eq(project_id.into_inner()))
            .order_by_asc(payment_records::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        models.into_iter().map(record_to_domain).collect()
    }

    async fn find_payment_record(
        &self,
        id: PaymentRecordId,
    ) -> Result<Option<PaymentRecord>, RepositoryError> {
        let model = payment_records::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        model.map(record_to_domain).transpose()
    }

    async fn find_by_natural_key(
        &self,
        key: &NaturalKey,
    ) -> Result<Option<PaymentRecord>, RepositoryError> {
        let model = payment_records::Entity::find()
            .filter(payment_records::Column::ProjectId.eq(key.project_id.into_inner()))
            .filter(payment_records::Column::Origin.eq(key.origin.as_str()))
            .filter(payment_records::Column::SourceItemId.eq(key.source_item_id))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        model.map(record_to_domain).transpose()
    }

    async fn insert_payment_record(
        &self,
        record: PaymentRecord,
    ) -> Result<PaymentRecord, RepositoryError> {
        let active_model = payment_records::ActiveModel {
            id: Set(record.id.into_inner()),
            project_id: Set(record.project_id.into_inner()),
            origin: Set(record.origin.as_str().to_string()),
            source_item_id: Set(record.source_item_id),
            description: Set(record.description),
            amount: Set(record.amount),
            paid: Set(record.paid),
            payment_date: Set(record.payment_date),
            notes: Set(record.notes),
            created_at: Set(record.created_at.into()),
            updated_at: Set(record.updated_at.into()),
        };

        // A concurrent insert on the same natural key surfaces as Conflict.
        let model = active_model.insert(&self.db).await.map_err(map_db_err)?;
        record_to_domain(model)
    }

    async fn update_payment_record(&self, record: PaymentRecord) -> Result<bool, RepositoryError> {
        let active_model = payment_records::ActiveModel {
            id: Unchanged(record.id.into_inner()),
            description: Set(record.description),
            amount: Set(record.amount),
            paid: Set(record.paid),
            payment_date: Set(record.payment_date),
            notes: Set(record.notes),
            updated_at: Set(record.updated_at.into()),
            ..Default::default()
        };

        match active_model.update(&self.db).await {
            Ok(_) => Ok(true),
            Err(DbErr::RecordNotUpdated) => Ok(false),
            Err(e) => Err(map_db_err(e)),
        }
    }

    async fn delete_payment_record(&self, id: PaymentRecordId) -> Result<bool, RepositoryError> {
        let result = payment_records::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn list_attachments(
        &self,
        record_ids: &[PaymentRecordId],
    ) -> Result<Vec<Attachment>, RepositoryError> {
        if record_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = payment_attachments::Entity::find()
            .filter(
                payment_attachments::Column::PaymentRecordId
                    .is_in(record_ids.iter().map(|id| id.into_inner())),
            )
            .order_by_asc(payment_attachments::Column::UploadedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        models.into_iter().map(attachment_to_domain).collect()
    }

    async fn find_attachment(
        &self,
        id: AttachmentId,
    ) -> Result<Option<Attachment>, RepositoryError> {
        let model = payment_attachments::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        model.map(attachment_to_domain).transpose()
    }

    async fn find_attachment_by_slot(
        &self,
        record_id: PaymentRecordId,
        kind: AttachmentKind,
    ) -> Result<Option<Attachment>, RepositoryError> {
        let model = payment_attachments::Entity::find()
            .filter(payment_attachments::Column::PaymentRecordId.eq(record_id.into_inner()))
            .filter(payment_attachments::Column::Kind.eq(kind.as_str()))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        model.map(attachment_to_domain).transpose()
    }

    async fn replace_attachment(
        &self,
        attachment: Attachment,
    ) -> Result<Option<Attachment>, RepositoryError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let previous = payment_attachments::Entity::find()
            .filter(
                payment_attachments::Column::PaymentRecordId
                    .eq(attachment.payment_record_id.into_inner()),
            )
            .filter(payment_attachments::Column::Kind.eq(attachment.kind.as_str()))
            .one(&txn)
            .await
            .map_err(map_db_err)?;

        if let Some(previous) = &previous {
            payment_attachments::Entity::delete_by_id(previous.id)
                .exec(&txn)
                .await
                .map_err(map_db_err)?;
        }

        let active_model = payment_attachments::ActiveModel {
            id: Set(attachment.id.into_inner()),
            payment_record_id: Set(attachment.payment_record_id.into_inner()),
            kind: Set(attachment.kind.as_str().to_string()),
            file_name: Set(attachment.file_name),
            content_type: Set(attachment.content_type),
            storage_key: Set(attachment.storage_key),
            size_bytes: Set(attachment.size),
            uploaded_at: Set(attachment.uploaded_at.into()),
        };
        active_model.insert(&txn).await.map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;

        previous.map(attachment_to_domain).transpose()
    }

    async fn delete_attachment(&self, id: AttachmentId) -> Result<bool, RepositoryError> {
        let result = payment_attachments::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected > 0)
    }
}

/// Convert database model to domain payment record.
fn record_to_domain(model: payment_records::Model) -> Result<PaymentRecord, RepositoryError> {
    let origin = Origin::parse(&model.origin)
        .ok_or_else(|| corrupt("payment_records.origin", &model.origin))?;

    Ok(PaymentRecord {
        id: PaymentRecordId::from_uuid(model.id),
        project_id: ProjectId::from_uuid(model.project_id),
        origin,
        source_item_id: model.source_item_id,
        description: model.description,
        amount: model.amount,
        paid: model.paid,
        payment_date: model.payment_date,
        notes: model.notes,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}

/// Convert database model to domain attachment.
fn attachment_to_domain(model: payment_attachments::Model) -> Result<Attachment, RepositoryError> {
    let kind = AttachmentKind::parse(&model.kind)
        .ok_or_else(|| corrupt("payment_attachments.kind", &model.kind))?;

    Ok(Attachment {
        id: AttachmentId::from_uuid(model.id),
        payment_record_id: PaymentRecordId::from_uuid(model.payment_record_id),
        kind,
        file_name: model.file_name,
        content_type: model.content_type,
        storage_key: model.storage_key,
        size: model.size_bytes,
        uploaded_at: model.uploaded_at.with_timezone(&Utc),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn now() -> DateTime<FixedOffset> {
        Utc::now().into()
    }

    fn record_model(origin: &str) -> payment_records::Model {
        payment_records::Model {
            id: Uuid::now_v7(),
            project_id: Uuid::now_v7(),
            origin: origin.to_string(),
            source_item_id: Uuid::now_v7(),
            description: "Director - Ana".to_string(),
            amount: dec!(1500.00),
            paid: true,
            payment_date: None,
            notes: Some("pix".to_string()),
            created_at: now(),
            updated_at: now(),
        }
    }

    #[test]
    fn test_record_to_domain() {
        let model = record_model("roster");
        let source = model.source_item_id;
        let record = record_to_domain(model).unwrap();

        assert_eq!(record.origin, Origin::Roster);
        assert_eq!(record.source_item_id, source);
        assert_eq!(record.amount, dec!(1500));
        assert_eq!(record.notes.as_deref(), Some("pix"));
    }

    #[test]
    fn test_record_to_domain_rejects_unknown_origin() {
        let err = record_to_domain(record_model("equipe")).unwrap_err();
        assert!(matches!(err, RepositoryError::Corrupt(_)));
    }

    fn attachment_model(kind: &str) -> payment_attachments::Model {
        payment_attachments::Model {
            id: Uuid::now_v7(),
            payment_record_id: Uuid::now_v7(),
            kind: kind.to_string(),
            file_name: "nota.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            storage_key: "p/r/invoice/a-nota.pdf".to_string(),
            size_bytes: 2048,
            uploaded_at: now(),
        }
    }

    #[test]
    fn test_attachment_to_domain() {
        let attachment = attachment_to_domain(attachment_model("invoice")).unwrap();
        assert_eq!(attachment.kind, AttachmentKind::Invoice);
        assert_eq!(attachment.size, 2048);
        assert_eq!(attachment.storage_key, "p/r/invoice/a-nota.pdf");
    }

    #[test]
    fn test_attachment_to_domain_rejects_unknown_kind() {
        assert!(matches!(
            attachment_to_domain(attachment_model("contract")),
            Err(RepositoryError::Corrupt(_))
        ));
    }
}
