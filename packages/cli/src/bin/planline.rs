use clap::{Parser, Subcommand};
use colored::*;
use std::process;

mod cli;

use cli::baselines::BaselinesCommands;
use cli::projects::ProjectsCommands;

#[derive(Parser)]
#[command(name = "planline")]
#[command(about = "Planline CLI - project portfolio management")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve,
    /// Load demo data into the database
    Seed {
        /// Clear existing rows before seeding
        #[arg(long)]
        fresh: bool,
    },
    /// Manage projects
    #[command(subcommand)]
    Projects(ProjectsCommands),
    /// Manage baselines
    #[command(subcommand)]
    Baselines(BaselinesCommands),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    init_tracing(&cli.command);

    match handle_command(cli.command).await {
        Ok(_) => {}
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            process::exit(1);
        }
    }
}

/// The server logs at info by default; data commands stay quiet
/// unless RUST_LOG asks for more
fn init_tracing(command: &Commands) {
    use tracing_subscriber::EnvFilter;

    let default_level = match command {
        Commands::Serve => "info",
        _ => "warn",
    };

    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

async fn handle_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Serve => planline_cli::run_server().await,
        Commands::Seed { fresh } => {
            let db = planline_cli::open_database().await?;
            planline_cli::seed::seed_database(&db, fresh).await
        }
        Commands::Projects(command) => cli::projects::handle_projects_command(command).await,
        Commands::Baselines(command) => cli::baselines::handle_baselines_command(command).await,
    }
}
