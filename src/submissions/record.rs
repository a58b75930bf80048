//! # Submission Record
//!
//! A stored, validated form submission.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A persisted submission.
///
/// Only a repository creates these. `id` and `created_at` never change
/// after creation; an update replaces `data` alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// Unique submission identifier
    pub id: Uuid,

    /// When the submission was first stored
    pub created_at: DateTime<Utc>,

    /// Normalized record, one key per schema field
    pub data: Map<String, Value>,
}

impl Submission {
    /// Create a new submission stamped with a fresh id and the current time
    pub fn new(data: Map<String, Value>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            data,
        }
    }

    /// Replace the stored data, keeping identity and creation time
    pub fn replace_data(&mut self, data: Map<String, Value>) {
        self.data = data;
    }
}

/// Acknowledgement returned after a successful create
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<&Submission> for SubmissionReceipt {
    fn from(submission: &Submission) -> Self {
        Self {
            id: submission.id,
            created_at: submission.created_at,
        }
    }
}
