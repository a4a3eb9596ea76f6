// ABOUTME: Baseline approval workflow for Planline
// ABOUTME: Draft/submit/approve/reject lifecycle with a single locked baseline per project

pub mod error;
pub mod service;
pub mod storage;
pub mod types;

pub use error::{BaselineError, BaselineResult};
pub use service::BaselineService;
pub use storage::BaselineStorage;
pub use types::{
    format_version_label, Baseline, BaselineCreateInput, BaselineStatus, BaselineStatusCounts,
    FieldChange,
};
