// ABOUTME: Project management commands
// ABOUTME: List, show, add, and delete projects from the terminal

use clap::Subcommand;
use colored::*;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use inquire::{Confirm, Select, Text};

use planline_cli::open_database;
use planline_core::{
    suggest_project_code, truncate, Priority, Project, ProjectCreateInput, ProjectStatus,
};
use planline_rbac::Capability;

use super::utils::{format_date, resolve_actor};

#[derive(Subcommand)]
pub enum ProjectsCommands {
    /// List all projects
    List,
    /// Show project details
    Show {
        /// Project ID to show
        id: String,
    },
    /// Add a new project
    Add {
        /// Project name
        #[arg(short, long)]
        name: Option<String>,
        /// Project description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete a project and its baselines
    Delete {
        /// Project ID to delete
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
        /// Acting user's email
        #[arg(long = "as", value_name = "EMAIL")]
        actor: String,
    },
}

pub async fn handle_projects_command(command: ProjectsCommands) -> anyhow::Result<()> {
    match command {
        ProjectsCommands::List => list_projects().await,
        ProjectsCommands::Show { id } => show_project(&id).await,
        ProjectsCommands::Add { name, description } => add_project(name, description).await,
        ProjectsCommands::Delete { id, yes, actor } => delete_project_cmd(&id, yes, &actor).await,
    }
}

async fn list_projects() -> anyhow::Result<()> {
    let db = open_database().await?;
    let projects = db.project_manager.list_projects().await?;

    if projects.is_empty() {
        println!("{}", "No projects found".yellow());
        println!(
            "{}",
            "Use 'planline projects add' to create your first project".dimmed()
        );
        return Ok(());
    }

    println!("{}", "📂 Planline Projects".blue().bold());
    println!();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        "ID", "Code", "Name", "Status", "Priority", "Tags", "Created",
    ]);

    for project in &projects {
        let tags_text = match &project.tags {
            Some(tags) if !tags.is_empty() => tags.join(", "),
            _ => "-".to_string(),
        };

        table.add_row(vec![
            project.id.clone(),
            project.code.clone(),
            truncate(&project.name, 25),
            project.status.to_string(),
            project.priority.to_string(),
            truncate(&tags_text, 20),
            format_date(&project.created_at.to_rfc3339()),
        ]);
    }

    println!("{}", table);
    println!("Total: {} projects", projects.len().to_string().cyan());

    Ok(())
}

async fn show_project(id: &str) -> anyhow::Result<()> {
    let db = open_database().await?;

    let project = match db.project_manager.get_project(id).await? {
        Some(p) => p,
        None => {
            eprintln!("{}", format!("Project with ID '{}' not found", id).red());
            anyhow::bail!("Project not found");
        }
    };

    println!(
        "{}",
        format!("📂 Project Details - {}", project.name).blue().bold()
    );
    println!();
    print_project_details(&project);

    let counts = db.baseline_service.count_by_status(id).await?;
    let total = counts.draft + counts.submitted + counts.approved + counts.rejected;
    if total > 0 {
        println!();
        println!(
            "{:<15} {} ({} draft, {} submitted, {} approved, {} rejected)",
            "Baselines:".cyan(),
            total,
            counts.draft,
            counts.submitted,
            counts.approved,
            counts.rejected
        );
        if let Some(current) = db.baseline_service.current_baseline(id).await? {
            println!("{:<15} {} ({})", "Current:".cyan(), current.label, current.id);
        }
    }

    Ok(())
}

async fn add_project(name: Option<String>, description: Option<String>) -> anyhow::Result<()> {
    println!("{}", "➕ Add New Project".blue().bold());
    println!();

    let name = match name {
        Some(n) => n,
        None => Text::new("Project name:").prompt()?,
    };

    let code = Text::new("Project code:")
        .with_default(&suggest_project_code(&name))
        .prompt()?;

    let description = match description {
        Some(d) => Some(d),
        None => {
            let desc = Text::new("Description (optional):").prompt()?;
            if desc.trim().is_empty() {
                None
            } else {
                Some(desc)
            }
        }
    };

    let status = Select::new(
        "Status:",
        vec![
            ProjectStatus::Planning,
            ProjectStatus::Active,
            ProjectStatus::OnHold,
            ProjectStatus::Completed,
            ProjectStatus::Archived,
        ],
    )
    .prompt()?;

    let priority = Select::new(
        "Priority:",
        vec![Priority::High, Priority::Medium, Priority::Low],
    )
    .prompt()?;

    let tags_input = Text::new("Tags (comma-separated, optional):").prompt()?;
    let tags = if tags_input.trim().is_empty() {
        None
    } else {
        Some(tags_input.split(',').map(|s| s.trim().to_string()).collect())
    };

    let project_data = ProjectCreateInput {
        name: name.clone(),
        code: Some(code),
        description,
        status: Some(status),
        priority: Some(priority),
        tags,
    };

    let db = open_database().await?;
    match db.project_manager.create_project(project_data).await {
        Ok(project) => {
            println!();
            println!(
                "{}",
                format!("✅ Project '{}' created successfully!", name).green()
            );
            println!("ID: {}", project.id.cyan());
        }
        Err(e) => {
            eprintln!("{}", format!("❌ Failed to create project: {}", e).red());
            return Err(e.into());
        }
    }

    Ok(())
}

async fn delete_project_cmd(
    id: &str,
    skip_confirmation: bool,
    actor_email: &str,
) -> anyhow::Result<()> {
    let db = open_database().await?;
    let actor = resolve_actor(&db, actor_email, Capability::DeleteProject).await?;

    let project = match db.project_manager.get_project(id).await? {
        Some(p) => p,
        None => {
            eprintln!("{}", format!("Project with ID '{}' not found", id).red());
            anyhow::bail!("Project not found");
        }
    };

    println!(
        "{}",
        format!("🗑️  Delete Project - {}", project.name).red().bold()
    );
    println!();
    print_project_details(&project);
    println!();

    let confirmed = if skip_confirmation {
        true
    } else {
        Confirm::new(&format!(
            "Are you sure you want to delete '{}' and all its baselines?",
            project.name
        ))
        .with_default(false)
        .prompt()?
    };

    if confirmed {
        match db.project_manager.delete_project(id).await {
            Ok(true) => {
                // The cascade removed the baselines behind the service's back
                db.baseline_service.invalidate_project(id).await;
                println!(
                    "{}",
                    format!("✅ Project '{}' deleted by {}", project.name, actor.email).green()
                );
            }
            Ok(false) => {
                eprintln!("{}", "❌ Project not found".red());
                anyhow::bail!("Project not found");
            }
            Err(e) => {
                eprintln!("{}", format!("❌ Failed to delete project: {}", e).red());
                return Err(e.into());
            }
        }
    } else {
        println!("{}", "❌ Operation cancelled".yellow());
    }

    Ok(())
}

fn print_project_details(project: &Project) {
    println!("{:<15} {}", "ID:".cyan(), project.id);
    println!("{:<15} {}", "Name:".cyan(), project.name);
    println!("{:<15} {}", "Code:".cyan(), project.code);

    let status_colored = match project.status {
        ProjectStatus::Planning => "Planning".blue(),
        ProjectStatus::Active => "Active".green(),
        ProjectStatus::OnHold => "On Hold".yellow(),
        ProjectStatus::Completed => "Completed".cyan(),
        ProjectStatus::Archived => "Archived".dimmed(),
    };
    println!("{:<15} {}", "Status:".cyan(), status_colored);

    let priority_colored = match project.priority {
        Priority::High => "High".red(),
        Priority::Medium => "Medium".yellow(),
        Priority::Low => "Low".green(),
    };
    println!("{:<15} {}", "Priority:".cyan(), priority_colored);

    if let Some(description) = &project.description {
        if !description.trim().is_empty() {
            println!("{:<15} {}", "Description:".cyan(), description);
        }
    }

    if let Some(tags) = &project.tags {
        if !tags.is_empty() {
            println!("{:<15} {}", "Tags:".cyan(), tags.join(", "));
        }
    }

    println!(
        "{:<15} {}",
        "Created:".cyan(),
        format_date(&project.created_at.to_rfc3339())
    );
    println!(
        "{:<15} {}",
        "Updated:".cyan(),
        format_date(&project.updated_at.to_rfc3339())
    );
}
