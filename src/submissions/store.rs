//! # Submission Store
//!
//! The repository trait and its in-memory implementation.

use std::sync::RwLock;

use serde_json::{Map, Value};
use uuid::Uuid;

use super::errors::{SubmissionError, SubmissionResult};
use super::pagination::{Page, PageRequest, SortDirection};
use super::record::Submission;

/// Submission repository trait
///
/// Abstracts storage of validated submissions. Callers hand over only
/// records that passed validation; the repository does not re-validate.
pub trait SubmissionRepository: Send + Sync {
    /// Store a new submission, assigning its id and creation time
    fn create(&self, data: Map<String, Value>) -> SubmissionResult<Submission>;

    /// Find a submission by id
    fn get(&self, id: Uuid) -> SubmissionResult<Option<Submission>>;

    /// Replace a submission's data. Returns `None` if the id is unknown.
    fn update(&self, id: Uuid, data: Map<String, Value>) -> SubmissionResult<Option<Submission>>;

    /// Remove a submission. Returns whether it existed.
    fn delete(&self, id: Uuid) -> SubmissionResult<bool>;

    /// List one page of submissions ordered by creation time
    fn list(&self, request: &PageRequest) -> SubmissionResult<Page<Submission>>;

    /// Number of stored submissions
    fn count(&self) -> SubmissionResult<usize>;
}

// ==================
// Shared operations on a submission list
// ==================

pub(super) fn insert(submissions: &mut Vec<Submission>, data: Map<String, Value>) -> Submission {
    let submission = Submission::new(data);
    submissions.push(submission.clone());
    submission
}

pub(super) fn replace(
    submissions: &mut [Submission],
    id: Uuid,
    data: Map<String, Value>,
) -> Option<Submission> {
    let existing = submissions.iter_mut().find(|s| s.id == id)?;
    existing.replace_data(data);
    Some(existing.clone())
}

pub(super) fn remove(submissions: &mut Vec<Submission>, id: Uuid) -> bool {
    let len_before = submissions.len();
    submissions.retain(|s| s.id != id);
    submissions.len() != len_before
}

/// Sort by creation time (stable, so ties keep insertion order) and slice.
pub(super) fn page_of(submissions: &[Submission], request: &PageRequest) -> Page<Submission> {
    let mut sorted = submissions.to_vec();
    match request.sort_direction {
        SortDirection::Asc => sorted.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortDirection::Desc => sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
    Page::from_sorted(&sorted, request)
}

/// In-memory submission repository
///
/// Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemorySubmissionStore {
    submissions: RwLock<Vec<Submission>>,
}

impl MemorySubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SubmissionRepository for MemorySubmissionStore {
    fn create(&self, data: Map<String, Value>) -> SubmissionResult<Submission> {
        let mut submissions = self
            .submissions
            .write()
            .map_err(|_| SubmissionError::LockPoisoned)?;
        Ok(insert(&mut submissions, data))
    }

    fn get(&self, id: Uuid) -> SubmissionResult<Option<Submission>> {
        let submissions = self
            .submissions
            .read()
            .map_err(|_| SubmissionError::LockPoisoned)?;
        Ok(submissions.iter().find(|s| s.id == id).cloned())
    }

    fn update(&self, id: Uuid, data: Map<String, Value>) -> SubmissionResult<Option<Submission>> {
        let mut submissions = self
            .submissions
            .write()
            .map_err(|_| SubmissionError::LockPoisoned)?;
        Ok(replace(&mut submissions, id, data))
    }

    fn delete(&self, id: Uuid) -> SubmissionResult<bool> {
        let mut submissions = self
            .submissions
            .write()
            .map_err(|_| SubmissionError::LockPoisoned)?;
        Ok(remove(&mut submissions, id))
    }

    fn list(&self, request: &PageRequest) -> SubmissionResult<Page<Submission>> {
        let submissions = self
            .submissions
            .read()
            .map_err(|_| SubmissionError::LockPoisoned)?;
        Ok(page_of(&submissions, request))
    }

    fn count(&self) -> SubmissionResult<usize> {
        let submissions = self
            .submissions
            .read()
            .map_err(|_| SubmissionError::LockPoisoned)?;
        Ok(submissions.len())
    }
}
