use crate::model::job::{Id, Job, ValidationError};
use std::collections::HashMap;

#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("job id '{0}' already exists in the pool")]
    DuplicateJobId(Id),
    #[error("job '{0}' failed validation")]
    ValidationFailed(Id, #[source] ValidationError),
}

/// The sole admission point for jobs into the scheduling system: a mapping
/// from job id to job, so no two members ever share an id. Iteration order is
/// unspecified.
#[derive(Debug, Default)]
pub struct JobPool {
    jobs: HashMap<Id, Job>,
}

impl JobPool {
    pub fn new() -> Self {
        Default::default()
    }

    /// Validates and inserts. The duplicate check runs first; either failure
    /// leaves the pool exactly as it was.
    pub fn add(&mut self, job: Job) -> Result<(), PoolError> {
        if self.jobs.contains_key(job.id()) {
            return Err(PoolError::DuplicateJobId(job.id().clone()));
        }
        job.validate()
            .map_err(|error| PoolError::ValidationFailed(job.id().clone(), error))?;
        self.jobs.insert(job.id().clone(), job);
        Ok(())
    }

    /// Removes and returns the job, `None` for an unknown id. Never an error.
    pub fn remove_by_id(&mut self, id: &Id) -> Option<Job> {
        self.jobs.remove(id)
    }

    pub fn get(&self, id: &Id) -> Option<&Job> {
        self.jobs.get(id)
    }

    /// In-place access for the execution engine's status transitions. Changes
    /// made through here bypass validation; re-checking is the caller's
    /// responsibility.
    pub fn get_mut(&mut self, id: &Id) -> Option<&mut Job> {
        self.jobs.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.values()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
