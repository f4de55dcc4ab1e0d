//! Supervised background indexing.
//!
//! Each job runs on its own named thread and records its outcome, so callers
//! can poll or wait instead of watching logs.

use semdex_core::models::ProjectId;
use semdex_index::Result;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use tracing::{error, info};

pub type JobId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum JobState {
    Pending,
    Running,
    Succeeded { indexed_chunks: usize },
    Failed { reason: String },
}

impl JobState {
    pub fn is_finished(&self) -> bool {
        matches!(self, JobState::Succeeded { .. } | JobState::Failed { .. })
    }
}

struct JobEntry {
    project_id: ProjectId,
    state: Arc<Mutex<JobState>>,
    handle: Option<JoinHandle<()>>,
}

#[derive(Default)]
pub struct JobTracker {
    next_id: AtomicU64,
    jobs: Mutex<HashMap<JobId, JobEntry>>,
}

impl JobTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `work` for `project_id` on a background thread. `work` returns the number of chunks indexed.
    pub fn spawn<F>(&self, project_id: ProjectId, work: F) -> JobId
    where
        F: FnOnce() -> Result<usize> + Send + 'static,
    {
        let job_id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let state = Arc::new(Mutex::new(JobState::Pending));

        let thread_state = state.clone();
        let spawned = thread::Builder::new()
            .name(format!("semdex-index-{}", project_id))
            .spawn(move || {
                set_state(&thread_state, JobState::Running);
                let outcome = match work() {
                    Ok(indexed_chunks) => {
                        info!(
                            "job {} finished: {} chunks indexed for project {}",
                            job_id, indexed_chunks, project_id
                        );
                        JobState::Succeeded { indexed_chunks }
                    }
                    Err(e) => {
                        error!("job {} for project {} failed: {}", job_id, project_id, e);
                        JobState::Failed {
                            reason: e.to_string(),
                        }
                    }
                };
                set_state(&thread_state, outcome);
            });

        let handle = match spawned {
            Ok(handle) => Some(handle),
            Err(e) => {
                error!("could not start job {} for project {}: {}", job_id, project_id, e);
                set_state(
                    &state,
                    JobState::Failed {
                        reason: format!("could not start indexing thread: {}", e),
                    },
                );
                None
            }
        };

        self.lock().insert(
            job_id,
            JobEntry {
                project_id,
                state,
                handle,
            },
        );
        job_id
    }

    pub fn state(&self, job_id: JobId) -> Option<JobState> {
        self.lock().get(&job_id).map(|entry| read_state(&entry.state))
    }

    /// Block until the job finishes and return its final state.
    pub fn wait(&self, job_id: JobId) -> Option<JobState> {
        let (state, handle) = {
            let mut jobs = self.lock();
            let entry = jobs.get_mut(&job_id)?;
            (entry.state.clone(), entry.handle.take())
        };
        if let Some(handle) = handle {
            if handle.join().is_err() {
                error!("job {} panicked", job_id);
                set_state(
                    &state,
                    JobState::Failed {
                        reason: "indexing thread panicked".to_string(),
                    },
                );
            }
        }
        Some(read_state(&state))
    }

    /// Jobs started for `project_id`, oldest first.
    pub fn jobs_for_project(&self, project_id: ProjectId) -> Vec<(JobId, JobState)> {
        let mut jobs: Vec<(JobId, JobState)> = self
            .lock()
            .iter()
            .filter(|(_, entry)| entry.project_id == project_id)
            .map(|(id, entry)| (*id, read_state(&entry.state)))
            .collect();
        jobs.sort_by_key(|(id, _)| *id);
        jobs
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<JobId, JobEntry>> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn set_state(state: &Mutex<JobState>, next: JobState) {
    *state.lock().unwrap_or_else(PoisonError::into_inner) = next;
}

fn read_state(state: &Mutex<JobState>) -> JobState {
    state.lock().unwrap_or_else(PoisonError::into_inner).clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use semdex_index::IndexError;
    use std::sync::mpsc;

    #[test]
    fn test_successful_job() {
        let tracker = JobTracker::new();
        let job = tracker.spawn(3, || Ok(12));
        assert_eq!(
            tracker.wait(job),
            Some(JobState::Succeeded { indexed_chunks: 12 })
        );
        assert_eq!(tracker.state(job), Some(JobState::Succeeded { indexed_chunks: 12 }));
    }

    #[test]
    fn test_failed_job_records_reason() {
        let tracker = JobTracker::new();
        let job = tracker.spawn(3, || {
            Err(IndexError::NotFound {
                kind: "project",
                id: 3,
            })
        });
        match tracker.wait(job) {
            Some(JobState::Failed { reason }) => assert_eq!(reason, "project 3 not found"),
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn test_running_state_is_observable() {
        let tracker = JobTracker::new();
        let (started_tx, started_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let job = tracker.spawn(1, move || {
            started_tx.send(()).unwrap();
            release_rx.recv().unwrap();
            Ok(0)
        });

        started_rx.recv().unwrap();
        assert_eq!(tracker.state(job), Some(JobState::Running));
        release_tx.send(()).unwrap();
        assert!(tracker.wait(job).unwrap().is_finished());
    }

    #[test]
    fn test_panicking_job_is_failed() {
        let tracker = JobTracker::new();
        let job = tracker.spawn(1, || panic!("boom"));
        assert!(matches!(tracker.wait(job), Some(JobState::Failed { .. })));
    }

    #[test]
    fn test_jobs_for_project_and_unknown_ids() {
        let tracker = JobTracker::new();
        let a = tracker.spawn(1, || Ok(1));
        let b = tracker.spawn(2, || Ok(2));
        let c = tracker.spawn(1, || Ok(3));
        for job in [a, b, c] {
            tracker.wait(job);
        }
        let ids: Vec<JobId> = tracker.jobs_for_project(1).into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, c]);
        assert_eq!(tracker.state(999), None);
        assert_eq!(tracker.wait(999), None);
    }
}
