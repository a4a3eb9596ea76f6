// ABOUTME: Baseline workflow commands
// ABOUTME: Drive the draft/submit/approve/reject/restore lifecycle from the terminal

use clap::Subcommand;
use colored::*;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use inquire::Text;

use planline_baselines::{Baseline, BaselineCreateInput, BaselineError};
use planline_cli::open_database;
use planline_core::truncate;
use planline_rbac::Capability;

use super::utils::{colored_status, format_date, resolve_actor};

#[derive(Subcommand)]
pub enum BaselinesCommands {
    /// List a project's baselines
    List {
        /// Project ID
        project_id: String,
    },
    /// Show baseline details
    Show {
        /// Baseline ID to show
        id: String,
    },
    /// Create a draft baseline
    Create {
        /// Project ID
        project_id: String,
        /// Display label (defaults to the next version label)
        #[arg(short, long)]
        label: Option<String>,
        /// Baseline description
        #[arg(short, long)]
        description: Option<String>,
        /// Acting user's email
        #[arg(long = "as", value_name = "EMAIL")]
        actor: String,
    },
    /// Submit a draft baseline for validation
    Submit {
        /// Baseline ID
        id: String,
        /// Acting user's email
        #[arg(long = "as", value_name = "EMAIL")]
        actor: String,
    },
    /// Approve a submitted baseline and lock it as current
    Approve {
        /// Baseline ID
        id: String,
        /// Acting user's email
        #[arg(long = "as", value_name = "EMAIL")]
        actor: String,
    },
    /// Reject a submitted baseline
    Reject {
        /// Baseline ID
        id: String,
        /// Rejection reason (prompted when omitted)
        #[arg(short, long)]
        reason: Option<String>,
        /// Acting user's email
        #[arg(long = "as", value_name = "EMAIL")]
        actor: String,
    },
    /// Restore a superseded approved baseline as current
    Restore {
        /// Baseline ID
        id: String,
        /// Acting user's email
        #[arg(long = "as", value_name = "EMAIL")]
        actor: String,
    },
}

pub async fn handle_baselines_command(command: BaselinesCommands) -> anyhow::Result<()> {
    match command {
        BaselinesCommands::List { project_id } => list_baselines(&project_id).await,
        BaselinesCommands::Show { id } => show_baseline(&id).await,
        BaselinesCommands::Create {
            project_id,
            label,
            description,
            actor,
        } => create_baseline_cmd(&project_id, label, description, &actor).await,
        BaselinesCommands::Submit { id, actor } => submit_baseline_cmd(&id, &actor).await,
        BaselinesCommands::Approve { id, actor } => approve_baseline_cmd(&id, &actor).await,
        BaselinesCommands::Reject { id, reason, actor } => {
            reject_baseline_cmd(&id, reason, &actor).await
        }
        BaselinesCommands::Restore { id, actor } => restore_baseline_cmd(&id, &actor).await,
    }
}

async fn list_baselines(project_id: &str) -> anyhow::Result<()> {
    let db = open_database().await?;

    let project = match db.project_manager.get_project(project_id).await? {
        Some(p) => p,
        None => {
            eprintln!(
                "{}",
                format!("Project with ID '{}' not found", project_id).red()
            );
            anyhow::bail!("Project not found");
        }
    };

    let baselines = db.baseline_service.list_baselines(project_id).await?;

    if baselines.is_empty() {
        println!("{}", format!("No baselines for '{}'", project.name).yellow());
        println!(
            "{}",
            "Use 'planline baselines create' to start a draft".dimmed()
        );
        return Ok(());
    }

    println!(
        "{}",
        format!("📋 Baselines - {}", project.name).blue().bold()
    );
    println!();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec!["ID", "Label", "Version", "Status", "Locked", "Updated"]);

    for baseline in baselines.iter() {
        let locked_text = if baseline.is_locked { "yes" } else { "" };

        table.add_row(vec![
            baseline.id.clone(),
            truncate(&baseline.label, 25),
            baseline.version.to_string(),
            baseline.status.to_string(),
            locked_text.to_string(),
            format_date(&baseline.updated_at.to_rfc3339()),
        ]);
    }

    println!("{}", table);

    let counts = db.baseline_service.count_by_status(project_id).await?;
    println!(
        "Total: {} ({} draft, {} submitted, {} approved, {} rejected)",
        baselines.len().to_string().cyan(),
        counts.draft,
        counts.submitted,
        counts.approved,
        counts.rejected
    );

    if let Some(current) = db.baseline_service.current_baseline(project_id).await? {
        println!("Current: {} ({})", current.label.green(), current.id);
    }

    let next = db.baseline_service.next_version_label(project_id).await?;
    println!("Next version: {}", next.cyan());

    Ok(())
}

async fn show_baseline(id: &str) -> anyhow::Result<()> {
    let db = open_database().await?;

    match db.baseline_service.get_baseline(id).await {
        Ok(baseline) => {
            println!(
                "{}",
                format!("📋 Baseline Details - {}", baseline.label)
                    .blue()
                    .bold()
            );
            println!();
            print_baseline_details(&baseline);
            Ok(())
        }
        Err(BaselineError::NotFound(_)) => {
            eprintln!("{}", format!("Baseline with ID '{}' not found", id).red());
            anyhow::bail!("Baseline not found");
        }
        Err(e) => Err(e.into()),
    }
}

async fn create_baseline_cmd(
    project_id: &str,
    label: Option<String>,
    description: Option<String>,
    actor_email: &str,
) -> anyhow::Result<()> {
    let db = open_database().await?;
    let actor = resolve_actor(&db, actor_email, Capability::EditScope).await?;

    let input = BaselineCreateInput {
        label,
        description,
        changes: None,
    };

    match db.baseline_service.create_baseline(project_id, input).await {
        Ok(baseline) => {
            println!(
                "{}",
                format!(
                    "✅ Draft baseline '{}' created by {}",
                    baseline.label, actor.email
                )
                .green()
            );
            println!("ID: {}", baseline.id.cyan());
        }
        Err(e) => {
            eprintln!("{}", format!("❌ Failed to create baseline: {}", e).red());
            return Err(e.into());
        }
    }

    Ok(())
}

async fn submit_baseline_cmd(id: &str, actor_email: &str) -> anyhow::Result<()> {
    let db = open_database().await?;
    let actor = resolve_actor(&db, actor_email, Capability::EditScope).await?;

    match db.baseline_service.submit_baseline(id, &actor.id).await {
        Ok(baseline) => {
            println!(
                "{}",
                format!("✅ Baseline '{}' submitted for validation", baseline.label).green()
            );
        }
        Err(e) => {
            eprintln!("{}", format!("❌ Failed to submit baseline: {}", e).red());
            return Err(e.into());
        }
    }

    Ok(())
}

async fn approve_baseline_cmd(id: &str, actor_email: &str) -> anyhow::Result<()> {
    let db = open_database().await?;
    let actor = resolve_actor(&db, actor_email, Capability::ValidateBaseline).await?;

    match db.baseline_service.approve_baseline(id, &actor.id).await {
        Ok(baseline) => {
            println!(
                "{}",
                format!(
                    "✅ Baseline '{}' approved and locked as current",
                    baseline.label
                )
                .green()
            );
        }
        Err(e) => {
            eprintln!("{}", format!("❌ Failed to approve baseline: {}", e).red());
            return Err(e.into());
        }
    }

    Ok(())
}

async fn reject_baseline_cmd(
    id: &str,
    reason: Option<String>,
    actor_email: &str,
) -> anyhow::Result<()> {
    let db = open_database().await?;
    let actor = resolve_actor(&db, actor_email, Capability::ValidateBaseline).await?;

    let reason = match reason {
        Some(r) => r,
        None => Text::new("Rejection reason:").prompt()?,
    };

    match db.baseline_service.reject_baseline(id, &actor.id, &reason).await {
        Ok(baseline) => {
            println!(
                "{}",
                format!("✅ Baseline '{}' rejected", baseline.label).green()
            );
        }
        Err(e) => {
            eprintln!("{}", format!("❌ Failed to reject baseline: {}", e).red());
            return Err(e.into());
        }
    }

    Ok(())
}

async fn restore_baseline_cmd(id: &str, actor_email: &str) -> anyhow::Result<()> {
    let db = open_database().await?;
    let actor = resolve_actor(&db, actor_email, Capability::RestoreBaseline).await?;

    match db.baseline_service.restore_baseline(id, &actor.id).await {
        Ok(baseline) => {
            println!(
                "{}",
                format!("✅ Baseline '{}' restored as current", baseline.label).green()
            );
        }
        Err(e) => {
            eprintln!("{}", format!("❌ Failed to restore baseline: {}", e).red());
            return Err(e.into());
        }
    }

    Ok(())
}

fn print_baseline_details(baseline: &Baseline) {
    println!("{:<15} {}", "ID:".cyan(), baseline.id);
    println!("{:<15} {}", "Project:".cyan(), baseline.project_id);
    println!("{:<15} {}", "Label:".cyan(), baseline.label);
    println!("{:<15} {}", "Version:".cyan(), baseline.version);
    println!("{:<15} {}", "Status:".cyan(), colored_status(baseline.status));
    println!(
        "{:<15} {}",
        "Locked:".cyan(),
        if baseline.is_locked { "yes" } else { "no" }
    );

    if let Some(description) = &baseline.description {
        if !description.trim().is_empty() {
            println!("{:<15} {}", "Description:".cyan(), description);
        }
    }

    if let Some(submitted_by) = &baseline.submitted_by {
        println!(
            "{:<15} {} on {}",
            "Submitted:".cyan(),
            submitted_by,
            timestamp_text(&baseline.submitted_at)
        );
    }

    if let Some(approved_by) = &baseline.approved_by {
        println!(
            "{:<15} {} on {}",
            "Approved:".cyan(),
            approved_by,
            timestamp_text(&baseline.approved_at)
        );
    }

    if let Some(rejected_by) = &baseline.rejected_by {
        println!(
            "{:<15} {} on {}",
            "Rejected:".cyan(),
            rejected_by,
            timestamp_text(&baseline.rejected_at)
        );
    }

    if let Some(reason) = &baseline.rejection_reason {
        println!("{:<15} {}", "Reason:".cyan(), reason);
    }

    if let Some(changes) = &baseline.changes {
        if !changes.is_empty() {
            println!("{}", "Changes:".cyan());
            for change in changes {
                println!(
                    "  {}: {} -> {}",
                    change.field.yellow(),
                    render_value(&change.before),
                    render_value(&change.after)
                );
            }
        }
    }

    println!(
        "{:<15} {}",
        "Created:".cyan(),
        format_date(&baseline.created_at.to_rfc3339())
    );
    println!(
        "{:<15} {}",
        "Updated:".cyan(),
        format_date(&baseline.updated_at.to_rfc3339())
    );
}

fn timestamp_text(at: &Option<chrono::DateTime<chrono::Utc>>) -> String {
    match at {
        Some(t) => format_date(&t.to_rfc3339()),
        None => "unknown".to_string(),
    }
}

fn render_value(value: &Option<serde_json::Value>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "(none)".to_string(),
    }
}
