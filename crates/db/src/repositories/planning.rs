//! Planning Store implementation for database operations.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use palco_core::RepositoryError;
use palco_core::planning::{CommunicationItem, PlanningStore, TeamMember};
use palco_shared::types::{CommunicationItemId, ProjectId, TeamMemberId};

use super::{PgRepository, map_db_err};
use crate::entities::{communication_items, team_members};

impl PlanningStore for PgRepository {
    async fn list_team_members(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<TeamMember>, RepositoryError> {
        let models = team_members::Entity::find()
            .filter(team_members::Column::ProjectId.eq(project_id.into_inner()))
            .order_by_asc(team_members::Column::CreatedAt)
            .order_by_asc(team_members::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(models.into_iter().map(member_to_domain).collect())
    }

    async fn list_communication_items(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<CommunicationItem>, RepositoryError> {
        let models = communication_items::Entity::find()
            .filter(communication_items::Column::ProjectId.eq(project_id.into_inner()))
            .order_by_asc(communication_items::Column::CreatedAt)
            .order_by_asc(communication_items::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(models.into_iter().map(item_to_domain).collect())
    }

    async fn find_team_member(
        &self,
        id: TeamMemberId,
    ) -> Result<Option<TeamMember>, RepositoryError> {
        let model = team_members::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(model.map(member_to_domain))
    }

    async fn find_communication_item(
        &self,
        id: CommunicationItemId,
    ) -> Result<Option<CommunicationItem>, RepositoryError> {
        let model = communication_items::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(model.map(item_to_domain))
    }

    async fn insert_team_member(&self, member: TeamMember) -> Result<TeamMember, RepositoryError> {
        let active_model = team_members::ActiveModel {
            id: Set(member.id.into_inner()),
            project_id: Set(member.project_id.into_inner()),
            name: Set(member.name),
            role: Set(member.role),
            tax_id: Set(member.tax_id),
            created_at: Set(member.created_at.into()),
        };

        let model = active_model.insert(&self.db).await.map_err(map_db_err)?;
        Ok(member_to_domain(model))
    }

    async fn insert_communication_item(
        &self,
        item: CommunicationItem,
    ) -> Result<CommunicationItem, RepositoryError> {
        let active_model = communication_items::ActiveModel {
            id: Set(item.id.into_inner()),
            project_id: Set(item.project_id.into_inner()),
            item_service: Set(item.item_service),
            format: Set(item.format),
            quantity_period: Set(item.quantity_period),
            channel: Set(item.channel),
            created_at: Set(item.created_at.into()),
        };

        let model = active_model.insert(&self.db).await.map_err(map_db_err)?;
        Ok(item_to_domain(model))
    }

    async fn delete_team_member(&self, id: TeamMemberId) -> Result<bool, RepositoryError> {
        let result = team_members::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn delete_communication_item(
        &self,
        id: CommunicationItemId,
    ) -> Result<bool, RepositoryError> {
        let result = communication_items::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected > 0)
    }
}

/// Convert database model to domain roster row.
fn member_to_domain(model: team_members::Model) -> TeamMember {
    TeamMember {
        id: TeamMemberId::from_uuid(model.id),
        project_id: ProjectId::from_uuid(model.project_id),
        name: model.name,
        role: model.role,
        tax_id: model.tax_id,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

/// Convert database model to domain communication plan row.
fn item_to_domain(model: communication_items::Model) -> CommunicationItem {
    CommunicationItem {
        id: CommunicationItemId::from_uuid(model.id),
        project_id: ProjectId::from_uuid(model.project_id),
        item_service: model.item_service,
        format: model.format,
        quantity_period: model.quantity_period,
        channel: model.channel,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
