// ABOUTME: Baseline storage layer using SQLite
// ABOUTME: Guarded status transitions, version allocation, and lock management

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use crate::error::{BaselineError, BaselineResult};
use crate::types::{
    format_version_label, Baseline, BaselineCreateInput, BaselineStatus, BaselineStatusCounts,
};

const MAX_LABEL_LENGTH: usize = 40;
const MAX_REASON_LENGTH: usize = 500;

pub struct BaselineStorage {
    pool: SqlitePool,
}

impl BaselineStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All baselines for a project, newest version first
    pub async fn list_baselines(&self, project_id: &str) -> BaselineResult<Vec<Baseline>> {
        debug!("Listing baselines for project: {}", project_id);

        let rows = sqlx::query("SELECT * FROM baselines WHERE project_id = ? ORDER BY version DESC")
            .bind(project_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(|row| self.row_to_baseline(row)).collect()
    }

    pub async fn get_baseline(&self, id: &str) -> BaselineResult<Baseline> {
        debug!("Fetching baseline: {}", id);

        let row = sqlx::query("SELECT * FROM baselines WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| BaselineError::NotFound(id.to_string()))?;

        self.row_to_baseline(&row)
    }

    /// The project's baseline of record: approved and holding the lock
    pub async fn current_baseline(&self, project_id: &str) -> BaselineResult<Option<Baseline>> {
        let row = sqlx::query(
            "SELECT * FROM baselines WHERE project_id = ? AND status = 'approved' AND is_locked = 1",
        )
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| self.row_to_baseline(&row)).transpose()
    }

    /// Label the next baseline would receive, e.g. "V4.0"
    pub async fn next_version_label(&self, project_id: &str) -> BaselineResult<String> {
        let max: Option<i32> =
            sqlx::query_scalar("SELECT MAX(version) FROM baselines WHERE project_id = ?")
                .bind(project_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(format_version_label(max.unwrap_or(0) + 1))
    }

    /// Creates a draft baseline with the next version number.
    ///
    /// Version allocation and the insert share a transaction, so two
    /// concurrent creates cannot claim the same number; the
    /// UNIQUE(project_id, version) index is the backstop.
    pub async fn create_baseline(
        &self,
        project_id: &str,
        input: BaselineCreateInput,
    ) -> BaselineResult<Baseline> {
        let label = match input.label.as_deref().map(str::trim) {
            Some("") => {
                return Err(BaselineError::InvalidInput(
                    "Baseline label cannot be empty".to_string(),
                ))
            }
            Some(label) if label.len() > MAX_LABEL_LENGTH => {
                return Err(BaselineError::InvalidInput(format!(
                    "Baseline label exceeds {} characters",
                    MAX_LABEL_LENGTH
                )))
            }
            other => other.map(str::to_string),
        };

        let mut tx = self.pool.begin().await?;

        let project_exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM projects WHERE id = ?")
            .bind(project_id)
            .fetch_optional(&mut *tx)
            .await?;
        if project_exists.is_none() {
            return Err(BaselineError::ProjectNotFound(project_id.to_string()));
        }

        let max: Option<i32> =
            sqlx::query_scalar("SELECT MAX(version) FROM baselines WHERE project_id = ?")
                .bind(project_id)
                .fetch_one(&mut *tx)
                .await?;
        let version = max.unwrap_or(0) + 1;
        let label = label.unwrap_or_else(|| format_version_label(version));

        let id = nanoid::nanoid!();
        let now = Utc::now();

        let row = sqlx::query(
            r#"
            INSERT INTO baselines
            (id, project_id, label, version, status, is_locked, description, changes, created_at, updated_at)
            VALUES (?, ?, ?, ?, 'draft', 0, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(project_id)
        .bind(&label)
        .bind(version)
        .bind(&input.description)
        .bind(input.changes.as_ref().and_then(|c| serde_json::to_string(c).ok()))
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;
        let baseline = self.row_to_baseline(&row)?;

        tx.commit().await?;

        info!(
            "Created baseline {} ({}) for project {}",
            baseline.label, baseline.id, project_id
        );
        Ok(baseline)
    }

    /// Moves a draft into validation. Requires `draft` status.
    pub async fn submit_baseline(&self, id: &str, actor: &str) -> BaselineResult<Baseline> {
        let now = Utc::now();

        // Guard and write are one statement, so a concurrent transition
        // leaves exactly one winner
        let row = sqlx::query(
            r#"
            UPDATE baselines
            SET status = 'submitted', submitted_by = ?, submitted_at = ?, updated_at = ?
            WHERE id = ? AND status = 'draft'
            RETURNING *
            "#,
        )
        .bind(actor)
        .bind(now)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let baseline = self.row_to_baseline(&row)?;
                info!("Baseline {} ({}) submitted by {}", baseline.label, id, actor);
                Ok(baseline)
            }
            None => Err(self.transition_conflict(id, "submit").await),
        }
    }

    /// Approves a submitted baseline and makes it the baseline of record.
    ///
    /// The previous lock holder, if any, is released in the same
    /// transaction; readers never observe zero or two locked baselines.
    pub async fn approve_baseline(&self, id: &str, actor: &str) -> BaselineResult<Baseline> {
        let existing = self.get_baseline(id).await?;
        if existing.status != BaselineStatus::Submitted {
            return Err(BaselineError::InvalidTransition {
                from: existing.status,
                action: "approve",
            });
        }

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        // Release the previous lock first; the partial unique index
        // permits only one locked baseline per project
        sqlx::query(
            "UPDATE baselines SET is_locked = 0, updated_at = ? WHERE project_id = ? AND is_locked = 1",
        )
        .bind(now)
        .bind(&existing.project_id)
        .execute(&mut *tx)
        .await?;

        let row = sqlx::query(
            r#"
            UPDATE baselines
            SET status = 'approved', is_locked = 1, approved_by = ?, approved_at = ?, updated_at = ?
            WHERE id = ? AND status = 'submitted'
            RETURNING *
            "#,
        )
        .bind(actor)
        .bind(now)
        .bind(now)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            // The pre-check raced with another writer; dropping the
            // transaction restores the previous lock
            drop(tx);
            return Err(self.transition_conflict(id, "approve").await);
        };
        let baseline = self.row_to_baseline(&row)?;

        tx.commit().await?;

        info!(
            "Baseline {} ({}) approved and locked by {}",
            baseline.label, baseline.id, actor
        );
        Ok(baseline)
    }

    /// Rejects a submitted baseline with a reason. Terminal; recovery
    /// is a new draft.
    pub async fn reject_baseline(
        &self,
        id: &str,
        actor: &str,
        reason: &str,
    ) -> BaselineResult<Baseline> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(BaselineError::InvalidInput(
                "Rejection reason is required".to_string(),
            ));
        }
        if reason.len() > MAX_REASON_LENGTH {
            return Err(BaselineError::InvalidInput(format!(
                "Rejection reason exceeds {} characters",
                MAX_REASON_LENGTH
            )));
        }

        let now = Utc::now();

        let row = sqlx::query(
            r#"
            UPDATE baselines
            SET status = 'rejected', rejected_by = ?, rejected_at = ?, rejection_reason = ?, updated_at = ?
            WHERE id = ? AND status = 'submitted'
            RETURNING *
            "#,
        )
        .bind(actor)
        .bind(now)
        .bind(reason)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let baseline = self.row_to_baseline(&row)?;
                info!("Baseline {} ({}) rejected by {}", baseline.label, id, actor);
                Ok(baseline)
            }
            None => Err(self.transition_conflict(id, "reject").await),
        }
    }

    /// Re-locks a superseded approved baseline as the baseline of record.
    ///
    /// The original approval record is left untouched; only the lock
    /// moves.
    pub async fn restore_baseline(&self, id: &str, actor: &str) -> BaselineResult<Baseline> {
        let existing = self.get_baseline(id).await?;
        if existing.status != BaselineStatus::Approved {
            return Err(BaselineError::InvalidTransition {
                from: existing.status,
                action: "restore",
            });
        }
        if existing.is_locked {
            return Err(BaselineError::AlreadyCurrent(id.to_string()));
        }

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "UPDATE baselines SET is_locked = 0, updated_at = ? WHERE project_id = ? AND is_locked = 1",
        )
        .bind(now)
        .bind(&existing.project_id)
        .execute(&mut *tx)
        .await?;

        let row = sqlx::query(
            r#"
            UPDATE baselines
            SET is_locked = 1, updated_at = ?
            WHERE id = ? AND status = 'approved'
            RETURNING *
            "#,
        )
        .bind(now)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            drop(tx);
            return Err(self.transition_conflict(id, "restore").await);
        };
        let baseline = self.row_to_baseline(&row)?;

        tx.commit().await?;

        info!(
            "Baseline {} ({}) restored as current by {}",
            baseline.label, baseline.id, actor
        );
        Ok(baseline)
    }

    /// Per-status totals for a project's baselines
    pub async fn count_by_status(&self, project_id: &str) -> BaselineResult<BaselineStatusCounts> {
        let rows: Vec<(BaselineStatus, i64)> = sqlx::query_as(
            "SELECT status, COUNT(*) FROM baselines WHERE project_id = ? GROUP BY status",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        let mut counts = BaselineStatusCounts::default();
        for (status, count) in rows {
            match status {
                BaselineStatus::Draft => counts.draft = count,
                BaselineStatus::Submitted => counts.submitted = count,
                BaselineStatus::Approved => counts.approved = count,
                BaselineStatus::Rejected => counts.rejected = count,
            }
        }
        Ok(counts)
    }

    /// After a guarded update matched nothing, work out whether the row
    /// is missing or in the wrong state
    async fn transition_conflict(&self, id: &str, action: &'static str) -> BaselineError {
        match self.get_baseline(id).await {
            Ok(baseline) => BaselineError::InvalidTransition {
                from: baseline.status,
                action,
            },
            Err(err) => err,
        }
    }

    fn row_to_baseline(&self, row: &sqlx::sqlite::SqliteRow) -> BaselineResult<Baseline> {
        Ok(Baseline {
            id: row.try_get("id")?,
            project_id: row.try_get("project_id")?,
            label: row.try_get("label")?,
            version: row.try_get("version")?,
            status: row.try_get("status")?,
            is_locked: row.try_get("is_locked")?,
            description: row.try_get("description")?,
            changes: row
                .try_get::<Option<String>, _>("changes")?
                .and_then(|s| serde_json::from_str(&s).ok()),
            submitted_by: row.try_get("submitted_by")?,
            submitted_at: row.try_get("submitted_at")?,
            approved_by: row.try_get("approved_by")?,
            approved_at: row.try_get("approved_at")?,
            rejected_by: row.try_get("rejected_by")?,
            rejected_at: row.try_get("rejected_at")?,
            rejection_reason: row.try_get("rejection_reason")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}
