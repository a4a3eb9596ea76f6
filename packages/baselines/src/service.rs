// ABOUTME: Cached read path over baseline storage
// ABOUTME: Every mutation invalidates the owning project's cached list

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::debug;

use crate::error::BaselineResult;
use crate::storage::BaselineStorage;
use crate::types::{Baseline, BaselineCreateInput, BaselineStatus, BaselineStatusCounts};

const CACHE_CAPACITY: u64 = 1_000;
const CACHE_TTL_SECS: u64 = 300;

/// Serves baseline reads from a per-project cache and writes through
/// storage. Mutations drop the project's cache entry, so the next read
/// always reflects the transition that just happened.
#[derive(Clone)]
pub struct BaselineService {
    storage: Arc<BaselineStorage>,
    lists: Cache<String, Arc<Vec<Baseline>>>,
}

impl BaselineService {
    pub fn new(storage: Arc<BaselineStorage>) -> Self {
        Self {
            storage,
            lists: Cache::builder()
                .max_capacity(CACHE_CAPACITY)
                .time_to_live(Duration::from_secs(CACHE_TTL_SECS))
                .build(),
        }
    }

    pub async fn list_baselines(&self, project_id: &str) -> BaselineResult<Arc<Vec<Baseline>>> {
        if let Some(cached) = self.lists.get(project_id).await {
            debug!("Baseline list cache hit for project: {}", project_id);
            return Ok(cached);
        }

        let baselines = Arc::new(self.storage.list_baselines(project_id).await?);
        self.lists
            .insert(project_id.to_string(), baselines.clone())
            .await;
        Ok(baselines)
    }

    pub async fn current_baseline(&self, project_id: &str) -> BaselineResult<Option<Baseline>> {
        let baselines = self.list_baselines(project_id).await?;
        Ok(baselines
            .iter()
            .find(|b| b.is_locked && b.status == BaselineStatus::Approved)
            .cloned())
    }

    pub async fn get_baseline(&self, id: &str) -> BaselineResult<Baseline> {
        self.storage.get_baseline(id).await
    }

    pub async fn next_version_label(&self, project_id: &str) -> BaselineResult<String> {
        self.storage.next_version_label(project_id).await
    }

    pub async fn count_by_status(&self, project_id: &str) -> BaselineResult<BaselineStatusCounts> {
        self.storage.count_by_status(project_id).await
    }

    pub async fn create_baseline(
        &self,
        project_id: &str,
        input: BaselineCreateInput,
    ) -> BaselineResult<Baseline> {
        let baseline = self.storage.create_baseline(project_id, input).await?;
        self.invalidate(project_id).await;
        Ok(baseline)
    }

    pub async fn submit_baseline(&self, id: &str, actor: &str) -> BaselineResult<Baseline> {
        let baseline = self.storage.submit_baseline(id, actor).await?;
        self.invalidate(&baseline.project_id).await;
        Ok(baseline)
    }

    pub async fn approve_baseline(&self, id: &str, actor: &str) -> BaselineResult<Baseline> {
        let baseline = self.storage.approve_baseline(id, actor).await?;
        self.invalidate(&baseline.project_id).await;
        Ok(baseline)
    }

    pub async fn reject_baseline(
        &self,
        id: &str,
        actor: &str,
        reason: &str,
    ) -> BaselineResult<Baseline> {
        let baseline = self.storage.reject_baseline(id, actor, reason).await?;
        self.invalidate(&baseline.project_id).await;
        Ok(baseline)
    }

    pub async fn restore_baseline(&self, id: &str, actor: &str) -> BaselineResult<Baseline> {
        let baseline = self.storage.restore_baseline(id, actor).await?;
        self.invalidate(&baseline.project_id).await;
        Ok(baseline)
    }

    /// Drops the cached list for one project. For writes that bypass the
    /// service, such as a project delete cascading to its baselines.
    pub async fn invalidate_project(&self, project_id: &str) {
        self.invalidate(project_id).await;
    }

    /// Drops every cached list. Used after out-of-band writes such as
    /// reseeding the database.
    pub fn invalidate_all(&self) {
        self.lists.invalidate_all();
        debug!("Invalidated all baseline caches");
    }

    async fn invalidate(&self, project_id: &str) {
        self.lists.invalidate(project_id).await;
        debug!("Invalidated baseline cache for project: {}", project_id);
    }
}
