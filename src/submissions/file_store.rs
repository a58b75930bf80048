//! # File-backed Submission Store
//!
//! Keeps all submissions in memory and mirrors them to a single JSON file.
//!
//! Every mutation is applied to a copy, written to a sibling `.tmp` file, renamed
//! over the data file, and only then made visible in memory. A failed write
//! leaves both the file and the in-memory view unchanged.

use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use serde_json::{Map, Value};
use uuid::Uuid;

use super::errors::{SubmissionError, SubmissionResult};
use super::pagination::{Page, PageRequest};
use super::record::Submission;
use super::store::{insert, page_of, remove, replace, SubmissionRepository};

/// Submission repository persisted to a JSON file
#[derive(Debug)]
pub struct FileSubmissionStore {
    path: PathBuf,
    submissions: RwLock<Vec<Submission>>,
}

impl FileSubmissionStore {
    /// Open a store, loading existing submissions if the file exists.
    pub fn open(path: impl Into<PathBuf>) -> SubmissionResult<Self> {
        let path = path.into();
        let submissions = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&content).map_err(|e| {
                    SubmissionError::Corrupt(format!("{}: {}", path.display(), e))
                })?
            }
        } else {
            Vec::new()
        };

        Ok(Self {
            path,
            submissions: RwLock::new(submissions),
        })
    }

    fn persist(&self, submissions: &[Submission]) -> SubmissionResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(submissions)
            .map_err(|e| SubmissionError::Storage(format!("Failed to serialize: {}", e)))?;

        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Apply a mutation under the write lock and commit it only once written.
    fn mutate<T>(
        &self,
        apply: impl FnOnce(&mut Vec<Submission>) -> T,
        changed: impl FnOnce(&T) -> bool,
    ) -> SubmissionResult<T> {
        let mut submissions = self
            .submissions
            .write()
            .map_err(|_| SubmissionError::LockPoisoned)?;

        let mut next = submissions.clone();
        let outcome = apply(&mut next);

        if changed(&outcome) {
            self.persist(&next)?;
            *submissions = next;
        }
        Ok(outcome)
    }
}

impl SubmissionRepository for FileSubmissionStore {
    fn create(&self, data: Map<String, Value>) -> SubmissionResult<Submission> {
        self.mutate(|all| insert(all, data), |_| true)
    }

    fn get(&self, id: Uuid) -> SubmissionResult<Option<Submission>> {
        let submissions = self
            .submissions
            .read()
            .map_err(|_| SubmissionError::LockPoisoned)?;
        Ok(submissions.iter().find(|s| s.id == id).cloned())
    }

    fn update(&self, id: Uuid, data: Map<String, Value>) -> SubmissionResult<Option<Submission>> {
        self.mutate(|all| replace(all, id, data), Option::is_some)
    }

    fn delete(&self, id: Uuid) -> SubmissionResult<bool> {
        self.mutate(|all| remove(all, id), |removed| *removed)
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
