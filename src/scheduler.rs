use crate::{
    model::job::{Id, Job, Status},
    pool::{JobPool, PoolError},
};
use time::OffsetDateTime;
use tracing::{debug, error};

/// Façade over the job pool and the readiness test: the only surface the
/// daemon, CLI, and execution engine talk to.
///
/// Single-writer by construction; a host that shares it across threads puts
/// one coarse lock around the whole scheduler. The pool is small and every
/// operation here is cheap.
#[derive(Debug, Default)]
pub struct Scheduler {
    pool: JobPool,
}

impl Scheduler {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_job(&mut self, job: Job) -> Result<(), PoolError> {
        self.pool.add(job)
    }

    pub fn remove_job_by_id(&mut self, id: &Id) -> bool {
        self.pool.remove_by_id(id).is_some()
    }

    pub fn job(&self, id: &Id) -> Option<&Job> {
        self.pool.get(id)
    }

    /// Mutable access for the execution engine's lifecycle transitions
    /// (queued, running, completed, failed, re-armed to scheduled).
    pub fn job_mut(&mut self, id: &Id) -> Option<&mut Job> {
        self.pool.get_mut(id)
    }

    pub fn jobs(&self) -> impl Iterator<Item = &Job> {
        self.pool.iter()
    }

    /// The jobs whose scheduled occurrence has arrived as of `now`: status is
    /// `Scheduled` and the recurrence test passes. Never mutates status; the
    /// queued transition belongs to the dispatcher, which is what keeps a job
    /// from firing twice in one polling window.
    ///
    /// A job the readiness test cannot evaluate is logged and skipped so one
    /// bad record cannot poison the rest of the tick.
    pub fn get_ready_jobs(&self, now: OffsetDateTime) -> Vec<&Job> {
        let mut ready = Vec::new();
        for job in self.pool.iter() {
            if job.status != Status::Scheduled {
                continue;
            }
            match job.is_due(now) {
                Ok(true) => {
                    debug!("job '{}' is due", job.id());
                    ready.push(job);
                }
                Ok(false) => {}
                Err(err) => {
                    error!("skipping job '{}': {:#}", job.id(), err);
                }
            }
        }
        ready
    }
}
