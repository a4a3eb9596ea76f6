// ABOUTME: Baseline type definitions for the approval workflow
// ABOUTME: Structures for baselines, their lifecycle status, and recorded field changes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle states of a baseline.
///
/// `Approved` and `Rejected` are terminal for the workflow; an approved
/// baseline additionally carries the project lock while it is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BaselineStatus {
    Draft,
    Submitted,
    Approved,
    Rejected,
}

impl BaselineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BaselineStatus::Draft => "draft",
            BaselineStatus::Submitted => "submitted",
            BaselineStatus::Approved => "approved",
            BaselineStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for BaselineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A field-level difference against the previous baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: String,
    pub before: Option<serde_json::Value>,
    pub after: Option<serde_json::Value>,
}

/// One snapshot of a project's plan, immutable once approved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Baseline {
    pub id: String,
    pub project_id: String,
    pub label: String,
    pub version: i32,
    pub status: BaselineStatus,
    /// True on the single approved baseline that is the project's
    /// baseline of record
    pub is_locked: bool,
    pub description: Option<String>,
    pub changes: Option<Vec<FieldChange>>,
    pub submitted_by: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_by: Option<String>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a draft baseline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineCreateInput {
    /// Display label; the canonical "V{version}.0" is derived when omitted
    pub label: Option<String>,
    pub description: Option<String>,
    pub changes: Option<Vec<FieldChange>>,
}

/// Per-status totals for a project's baselines
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BaselineStatusCounts {
    pub draft: i64,
    pub submitted: i64,
    pub approved: i64,
    pub rejected: i64,
}

/// Formats the canonical label for a version number, e.g. 4 -> "V4.0"
pub fn format_version_label(version: i32) -> String {
    format!("V{}.0", version)
}
