// ABOUTME: Demo data loader for local evaluation
// ABOUTME: Creates one user per role, sample projects, and baselines in every workflow state

use colored::*;
use tracing::info;

use planline_baselines::{BaselineCreateInput, FieldChange};
use planline_core::{Priority, ProjectCreateInput, ProjectStatus};
use planline_projects::db::DbState;
use planline_rbac::{Role, UserCreateInput};

/// Email of the first seeded user, used to detect an already-seeded database
const SEED_SENTINEL_EMAIL: &str = "nina@planline.dev";

pub async fn seed_database(db: &DbState, fresh: bool) -> anyhow::Result<()> {
    if fresh {
        clear_database(db).await?;
    } else if db
        .user_storage
        .get_user_by_email(SEED_SENTINEL_EMAIL)
        .await
        .is_ok()
    {
        println!(
            "{}",
            "Database already contains seed data. Re-run with --fresh to reload.".yellow()
        );
        return Ok(());
    }

    let nina = create_user(db, "nina@planline.dev", "Nina Vale", Role::ProjectLead).await?;
    let marcus = create_user(db, "marcus@planline.dev", "Marcus Webb", Role::Pmo).await?;
    create_user(db, "tessa@planline.dev", "Tessa Brook", Role::TeamMember).await?;
    create_user(db, "iris@planline.dev", "Iris Stone", Role::Admin).await?;

    let atlas = db
        .project_manager
        .create_project(ProjectCreateInput {
            name: "Atlas Migration".to_string(),
            code: Some("ATLAS".to_string()),
            description: Some("Portfolio-wide ERP migration".to_string()),
            status: Some(ProjectStatus::Active),
            priority: Some(Priority::High),
            tags: Some(vec!["infrastructure".to_string(), "q3".to_string()]),
        })
        .await?;

    let orion = db
        .project_manager
        .create_project(ProjectCreateInput {
            name: "Orion Rollout".to_string(),
            code: Some("ORION".to_string()),
            description: Some("Phased rollout of the customer portal".to_string()),
            status: Some(ProjectStatus::Active),
            priority: Some(Priority::Medium),
            tags: Some(vec!["product".to_string()]),
        })
        .await?;

    db.project_manager
        .create_project(ProjectCreateInput {
            name: "Helios Upgrade".to_string(),
            code: Some("HELIOS".to_string()),
            description: Some("Data center cooling refresh".to_string()),
            status: Some(ProjectStatus::OnHold),
            priority: Some(Priority::Low),
            tags: None,
        })
        .await?;

    // Atlas carries one baseline in each workflow state
    let v1 = db
        .baseline_service
        .create_baseline(
            &atlas.id,
            BaselineCreateInput {
                description: Some("Initial plan of record".to_string()),
                ..Default::default()
            },
        )
        .await?;
    db.baseline_service.submit_baseline(&v1.id, &nina.id).await?;
    db.baseline_service
        .approve_baseline(&v1.id, &marcus.id)
        .await?;

    let v2 = db
        .baseline_service
        .create_baseline(
            &atlas.id,
            BaselineCreateInput {
                label: Some("Q3 scope revision".to_string()),
                description: Some("Pulls the reporting milestone forward".to_string()),
                changes: Some(vec![
                    FieldChange {
                        field: "endDate".to_string(),
                        before: Some(serde_json::json!("2026-03-01")),
                        after: Some(serde_json::json!("2026-05-15")),
                    },
                    FieldChange {
                        field: "budget".to_string(),
                        before: Some(serde_json::json!(250_000)),
                        after: Some(serde_json::json!(310_000)),
                    },
                ]),
            },
        )
        .await?;
    db.baseline_service.submit_baseline(&v2.id, &nina.id).await?;
    db.baseline_service
        .reject_baseline(&v2.id, &marcus.id, "Capacity plan ignores the Q3 freeze")
        .await?;

    let v3 = db
        .baseline_service
        .create_baseline(&atlas.id, BaselineCreateInput::default())
        .await?;
    db.baseline_service.submit_baseline(&v3.id, &nina.id).await?;

    db.baseline_service
        .create_baseline(&atlas.id, BaselineCreateInput::default())
        .await?;

    // Orion gets two approvals so an earlier baseline can be restored
    let o1 = db
        .baseline_service
        .create_baseline(&orion.id, BaselineCreateInput::default())
        .await?;
    db.baseline_service.submit_baseline(&o1.id, &nina.id).await?;
    db.baseline_service
        .approve_baseline(&o1.id, &marcus.id)
        .await?;

    let o2 = db
        .baseline_service
        .create_baseline(&orion.id, BaselineCreateInput::default())
        .await?;
    db.baseline_service.submit_baseline(&o2.id, &nina.id).await?;
    db.baseline_service
        .approve_baseline(&o2.id, &marcus.id)
        .await?;

    info!("Seed data loaded");
    println!(
        "{} Seeded 4 users, 3 projects, and baselines in every workflow state",
        "✅".green()
    );

    Ok(())
}

async fn clear_database(db: &DbState) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM baselines").execute(&db.pool).await?;
    sqlx::query("DELETE FROM projects").execute(&db.pool).await?;
    sqlx::query("DELETE FROM users WHERE id != 'default-admin'")
        .execute(&db.pool)
        .await?;

    // The cached baseline lists no longer match the emptied tables
    db.baseline_service.invalidate_all();

    info!("Cleared existing data before seeding");
    Ok(())
}

async fn create_user(
    db: &DbState,
    email: &str,
    name: &str,
    role: Role,
) -> anyhow::Result<planline_rbac::User> {
    Ok(db
        .user_storage
        .create_user(UserCreateInput {
            email: email.to_string(),
            name: name.to_string(),
            role,
            avatar_url: None,
        })
        .await?)
}
