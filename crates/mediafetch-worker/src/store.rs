//! In-memory job store.
//!
//! The store owns every job record for the lifetime of the process. The lock
//! is only held for the duration of a single insert, read or update closure,
//! never across a subprocess await.

use std::collections::HashMap;

use tokio::sync::RwLock;

use mediafetch_models::{Job, JobId, JobOptions, JobView};

/// Concurrency-safe mapping from job ID to job record.
#[derive(Debug, Default)]
pub struct JobStore {
    jobs: RwLock<HashMap<JobId, Job>>,
}

impl JobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new queued job and return its ID.
    ///
    /// IDs are never reused: a colliding ID is regenerated.
    pub async fn create(&self, source_url: &str, options: JobOptions) -> JobId {
        let mut jobs = self.jobs.write().await;
        let id = loop {
            let id = JobId::new();
            if !jobs.contains_key(&id) {
                break id;
            }
        };
        jobs.insert(id.clone(), Job::new(id.clone(), source_url, options));
        id
    }

    /// Snapshot of a job record.
    pub async fn get(&self, id: &JobId) -> Option<Job> {
        self.jobs.read().await.get(id).cloned()
    }

    /// Polling view of a job, `NotFound` for unknown IDs.
    pub async fn view(&self, id: &JobId) -> JobView {
        JobView::from(self.jobs.read().await.get(id))
    }

    /// Mutate a job record in place. Returns `None` for unknown IDs.
    pub async fn update<F, R>(&self, id: &JobId, f: F) -> Option<R>
    where
        F: FnOnce(&mut Job) -> R,
    {
        self.jobs.write().await.get_mut(id).map(f)
    }

    /// Number of tracked jobs.
    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }
}
