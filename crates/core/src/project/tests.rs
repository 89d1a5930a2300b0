//! Tests for project and planning management.

use std::sync::Arc;

use chrono::NaiveDate;
use rstest::rstest;

use palco_shared::types::{CommunicationItemId, ProjectId, TeamMemberId};

use super::*;
use crate::error::ErrorKind;
use crate::memory::MemoryRepository;
use crate::planning::{NewCommunicationItem, NewTeamMember};
use crate::storage::{StorageConfig, StorageProvider, StorageService};

fn service() -> ProjectService<MemoryRepository> {
    let storage = StorageService::from_config(StorageConfig::new(StorageProvider::Memory))
        .expect("memory storage");
    ProjectService::new(Arc::new(MemoryRepository::new()), Arc::new(storage))
}

fn fields(name: &str) -> ProjectFields {
    ProjectFields {
        name: name.to_string(),
        prepared_by: "Ana".to_string(),
        ..ProjectFields::default()
    }
}

fn member(name: &str, role: &str) -> NewTeamMember {
    NewTeamMember {
        name: name.to_string(),
        role: role.to_string(),
        tax_id: None,
    }
}

#[tokio::test]
async fn test_create_project_is_draft() {
    let svc = service();
    let project = svc.create_project(fields("  Festival  ")).await.unwrap();

    assert_eq!(project.status, ProjectStatus::Draft);
    assert_eq!(project.fields.name, "Festival");
    assert!(!project.is_finalized());
}

#[rstest]
#[case("", "Ana")]
#[case("   ", "Ana")]
#[case("Festival", "")]
#[tokio::test]
async fn test_create_project_requires_name_and_author(
    #[case] name: &str,
    #[case] prepared_by: &str,
) {
    let svc = service();
    let err = svc
        .create_project(ProjectFields {
            name: name.to_string(),
            prepared_by: prepared_by.to_string(),
            ..ProjectFields::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ProjectError::Validation(_)));
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_create_project_rejects_inverted_period() {
    let svc = service();
    let err = svc
        .create_project(ProjectFields {
            execution_start: NaiveDate::from_ymd_opt(2024, 6, 1),
            execution_end: NaiveDate::from_ymd_opt(2024, 5, 1),
            ..fields("Festival")
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ProjectError::Validation(_)));
}

#[tokio::test]
async fn test_list_projects_newest_first() {
    let svc = service();
    let first = svc.create_project(fields("Primeiro")).await.unwrap();
    let second = svc.create_project(fields("Segundo")).await.unwrap();

    let ids: Vec<_> = svc
        .list_projects()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[tokio::test]
async fn test_get_project_detail() {
    let svc = service();
    let project = svc.create_project(fields("Festival")).await.unwrap();

    svc.add_team_member(project.id, member("Ana", "Director"))
        .await
        .unwrap();
    svc.add_team_member(project.id, member("Bruno", "Producer"))
        .await
        .unwrap();
    svc.add_communication_item(
        project.id,
        NewCommunicationItem {
            item_service: "Cartazes".to_string(),
            format: Some("A3".to_string()),
            quantity_period: Some("  ".to_string()),
            channel: None,
        },
    )
    .await
    .unwrap();

    let detail = svc.get_project(project.id).await.unwrap();
    assert_eq!(detail.project.id, project.id);
    let names: Vec<_> = detail.team_members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Ana", "Bruno"]);
    assert_eq!(detail.communication_items.len(), 1);
    assert_eq!(detail.communication_items[0].format.as_deref(), Some("A3"));
    assert!(detail.communication_items[0].quantity_period.is_none());
}

#[tokio::test]
async fn test_get_unknown_project() {
    let svc = service();
    let err = svc.get_project(ProjectId::new()).await.unwrap_err();
    assert!(matches!(err, ProjectError::NotFound(_)));
}

#[tokio::test]
async fn test_update_project() {
    let svc = service();
    let project = svc.create_project(fields("Festival")).await.unwrap();

    let updated = svc
        .update_project(
            project.id,
            UpdateProjectInput {
                fields: ProjectFields {
                    ticket_sales: true,
                    ..fields("Festival de Inverno")
                },
                status: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.fields.name, "Festival de Inverno");
    assert!(updated.fields.ticket_sales);
    assert_eq!(updated.status, ProjectStatus::Draft);
    assert_eq!(updated.created_at, project.created_at);

    let finalized = svc
        .update_project(
            project.id,
            UpdateProjectInput {
                fields: updated.fields.clone(),
                status: Some(ProjectStatus::Finalized),
            },
        )
        .await
        .unwrap();
    assert!(finalized.is_finalized());

    let stored = svc.get_project(project.id).await.unwrap();
    assert!(stored.project.is_finalized());
    assert!(stored.project.fields.ticket_sales);
}

#[tokio::test]
async fn test_update_unknown_project() {
    let svc = service();
    let err = svc
        .update_project(
            ProjectId::new(),
            UpdateProjectInput {
                fields: fields("X"),
                status: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ProjectError::NotFound(_)));
}

#[tokio::test]
async fn test_add_planning_rows_validation() {
    let svc = service();
    let project = svc.create_project(fields("Festival")).await.unwrap();

    let err = svc
        .add_team_member(project.id, member("Ana", " "))
        .await
        .unwrap_err();
    assert!(matches!(err, ProjectError::Validation(_)));

    let err = svc
        .add_communication_item(project.id, NewCommunicationItem::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ProjectError::Validation(_)));

    let err = svc
        .add_team_member(ProjectId::new(), member("Ana", "Director"))
        .await
        .unwrap_err();
    assert!(matches!(err, ProjectError::NotFound(_)));
}

#[tokio::test]
async fn test_text_fields_are_length_bounded() {
    let svc = service();
    let long = "x".repeat(service::MAX_TEXT_LEN + 1);

    let err = svc.create_project(fields(&long)).await.unwrap_err();
    assert!(matches!(&err, ProjectError::Validation(msg) if msg.contains("name")));
    assert_eq!(err.kind(), ErrorKind::Validation);

    let project = svc
        .create_project(fields(&"é".repeat(service::MAX_TEXT_LEN)))
        .await
        .unwrap();

    let err = svc
        .add_team_member(project.id, member("Ana", &long))
        .await
        .unwrap_err();
    assert!(matches!(&err, ProjectError::Validation(msg) if msg.contains("role")));

    let err = svc
        .add_team_member(
            project.id,
            NewTeamMember {
                tax_id: Some("1".repeat(service::MAX_TAX_ID_LEN + 1)),
                ..member("Ana", "Director")
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(&err, ProjectError::Validation(msg) if msg.contains("tax_id")));

    let err = svc
        .add_communication_item(
            project.id,
            NewCommunicationItem {
                item_service: "Cartazes".to_string(),
                channel: Some(long.clone()),
                ..NewCommunicationItem::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(&err, ProjectError::Validation(msg) if msg.contains("channel")));

    let detail = svc.get_project(project.id).await.unwrap();
    assert!(detail.team_members.is_empty());
    assert!(detail.communication_items.is_empty());
}

#[tokio::test]
async fn test_delete_planning_rows_idempotent() {
    let svc = service();
    let project = svc.create_project(fields("Festival")).await.unwrap();
    let m = svc
        .add_team_member(project.id, member("Ana", "Director"))
        .await
        .unwrap();

    assert!(svc.delete_team_member(m.id).await.unwrap());
    assert!(!svc.delete_team_member(m.id).await.unwrap());
    assert!(!svc.delete_team_member(TeamMemberId::new()).await.unwrap());
    assert!(
        !svc.delete_communication_item(CommunicationItemId::new())
            .await
            .unwrap()
    );
    assert!(svc.get_project(project.id).await.unwrap().team_members.is_empty());
}

#[tokio::test]
async fn test_delete_project_idempotent() {
    let svc = service();
    let project = svc.create_project(fields("Festival")).await.unwrap();

    assert!(svc.delete_project(project.id).await.unwrap());
    assert!(!svc.delete_project(project.id).await.unwrap());
    assert!(matches!(
        svc.get_project(project.id).await,
        Err(ProjectError::NotFound(_))
    ));
}
