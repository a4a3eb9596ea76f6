// ABOUTME: Project registry for Planline
// ABOUTME: SQLite-backed project storage, validation manager, and shared database state

pub mod db;
pub mod manager;
pub mod storage;

pub use db::DbState;
pub use manager::{ManagerError, ManagerResult, ProjectsManager};
pub use storage::{ProjectStorage, StorageError, StorageResult};

// Domain types live in planline-core; re-exported for convenience
pub use planline_core::{Priority, Project, ProjectCreateInput, ProjectStatus, ProjectUpdateInput};
