// ABOUTME: Database connection management and storage initialization
// ABOUTME: Provides shared access to the SQLite pool and storage layers

use sqlx::migrate::MigrateDatabase;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::sync::Arc;
use tracing::{debug, info};

use planline_baselines::{BaselineService, BaselineStorage};
use planline_rbac::UserStorage;

use crate::manager::ProjectsManager;
use crate::storage::{ProjectStorage, StorageError};

/// Embedded schema migrations, shared with integration tests
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Storage handles shared by the API handlers, the CLI, and the seeder
#[derive(Clone)]
pub struct DbState {
    pub pool: SqlitePool,
    pub project_manager: Arc<ProjectsManager>,
    pub user_storage: Arc<UserStorage>,
    pub baseline_service: BaselineService,
}

impl DbState {
    /// Wires the storage layers over an existing pool; tests hand in
    /// migrated in-memory pools here
    pub fn new(pool: SqlitePool) -> Self {
        let project_storage = Arc::new(ProjectStorage::new(pool.clone()));
        let project_manager = Arc::new(ProjectsManager::new(project_storage));
        let user_storage = Arc::new(UserStorage::new(pool.clone()));
        let baseline_service = BaselineService::new(Arc::new(BaselineStorage::new(pool.clone())));

        Self {
            pool,
            project_manager,
            user_storage,
            baseline_service,
        }
    }

    /// Opens the database at the default ~/.planline location
    pub async fn init() -> Result<Self, StorageError> {
        Self::init_with_path(None).await
    }

    /// Opens the database file, creating it and running migrations as
    /// needed
    pub async fn init_with_path(
        database_path: Option<std::path::PathBuf>,
    ) -> Result<Self, StorageError> {
        let database_path = database_path.unwrap_or_else(planline_core::database_file);

        // The ~/.planline directory may not exist yet
        if let Some(parent) = database_path.parent() {
            std::fs::create_dir_all(parent).map_err(StorageError::Io)?;
        }

        let database_url = format!("sqlite:{}", database_path.display());

        if !sqlx::Sqlite::database_exists(&database_url).await? {
            debug!("Creating new database file at {}", database_url);
            sqlx::Sqlite::create_database(&database_url).await?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(10)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect(&database_url)
            .await?;

        // WAL keeps readers unblocked during writes; enforced foreign
        // keys back the project -> baseline cascade
        for pragma in [
            "PRAGMA journal_mode = WAL",
            "PRAGMA foreign_keys = ON",
            "PRAGMA synchronous = NORMAL",
        ] {
            sqlx::query(pragma).execute(&pool).await?;
        }

        MIGRATOR.run(&pool).await?;

        info!("Database ready at {}", database_path.display());

        Ok(Self::new(pool))
    }
}
