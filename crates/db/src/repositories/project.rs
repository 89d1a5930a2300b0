//! Project repository for database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, Set, Unchanged,
};

use palco_core::RepositoryError;
use palco_core::project::{Project, ProjectFields, ProjectRepository, ProjectStatus};
use palco_shared::types::ProjectId;

use super::{PgRepository, corrupt, map_db_err};
use crate::entities::projects;

impl ProjectRepository for PgRepository {
    async fn create_project(&self, project: Project) -> Result<Project, RepositoryError> {
        let active_model = projects::ActiveModel {
            id: Set(project.id.into_inner()),
            status: Set(project.status.as_str().to_string()),
            created_at: Set(project.created_at.into()),
            ..fields_to_active(&project.fields)
        };

        let model = active_model.insert(&self.db).await.map_err(map_db_err)?;
        to_domain(model)
    }

    async fn find_project(&self, id: ProjectId) -> Result<Option<Project>, RepositoryError> {
        let model = projects::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        model.map(to_domain).transpose()
    }

    async fn list_projects(
        &self,
        status: Option<ProjectStatus>,
    ) -> Result<Vec<Project>, RepositoryError> {
        let mut query = projects::Entity::find();
        if let Some(status) = status {
            query = query.filter(projects::Column::Status.eq(status.as_str()));
        }

        let models = query
            .order_by_desc(projects::Column::CreatedAt)
            .order_by_desc(projects::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        models.into_iter().map(to_domain).collect()
    }

    async fn update_project(&self, project: Project) -> Result<bool, RepositoryError> {
        let active_model = projects::ActiveModel {
            id: Unchanged(project.id.into_inner()),
            status: Set(project.status.as_str().to_string()),
            ..fields_to_active(&project.fields)
        };

        match active_model.update(&self.db).await {
            Ok(_) => Ok(true),
            Err(DbErr::RecordNotUpdated) => Ok(false),
            Err(e) => Err(map_db_err(e)),
        }
    }

    async fn delete_project(&self, id: ProjectId) -> Result<bool, RepositoryError> {
        // Planning rows, payment records and attachments go with it (ON DELETE CASCADE).
        let result = projects::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        tracing::debug!(project_id = %id, rows = result.rows_affected, "project row deleted");
        Ok(result.rows_affected > 0)
    }
}

/// Active model with every descriptive column set and the rest untouched.
fn fields_to_active(fields: &ProjectFields) -> projects::ActiveModel {
    projects::ActiveModel {
        name: Set(fields.name.clone()),
        prepared_by: Set(fields.prepared_by.clone()),
        object: Set(fields.object.clone()),
        objectives: Set(fields.objectives.clone()),
        justification: Set(fields.justification.clone()),
        goals_and_results: Set(fields.goals_and_results.clone()),
        audience_profile: Set(fields.audience_profile.clone()),
        audience_estimate: Set(fields.audience_estimate.clone()),
        accessibility_structures: Set(fields.accessibility_structures.clone()),
        visual_accessibility_law: Set(fields.visual_accessibility_law),
        ticket_sales: Set(fields.ticket_sales),
        food_collection: Set(fields.food_collection),
        product_sales: Set(fields.product_sales),
        other_funding_sources: Set(fields.other_funding_sources),
        execution_start: Set(fields.execution_start),
        execution_end: Set(fields.execution_end),
        ..Default::default()
    }
}

/// Convert database model to domain project.
pub(crate) fn to_domain(model: projects::Model) -> Result<Project, RepositoryError> {
    let status =
        ProjectStatus::parse(&model.status).ok_or_else(|| corrupt("projects.status", &model.status))?;

    Ok(Project {
        id: ProjectId::from_uuid(model.id),
        fields: ProjectFields {
            name: model.name,
            prepared_by: model.prepared_by,
            object: model.object,
            objectives: model.objectives,
            justification: model.justification,
            goals_and_results: model.goals_and_results,
            audience_profile: model.audience_profile,
            audience_estimate: model.audience_estimate,
            accessibility_structures: model.accessibility_structures,
            visual_accessibility_law: model.visual_accessibility_law,
            ticket_sales: model.ticket_sales,
            food_collection: model.food_collection,
            product_sales: model.product_sales,
            other_funding_sources: model.other_funding_sources,
            execution_start: model.execution_start,
            execution_end: model.execution_end,
        },
        status,
        created_at: model.created_at.with_timezone(&Utc),
    })
}
