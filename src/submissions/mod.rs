//! # Submissions
//!
//! Storage for validated form submissions.
//!
//! # Features
//!
//! - `SubmissionRepository` trait shared by all stores
//! - In-memory store for development and tests
//! - JSON-file store that survives restarts
//! - Paginated listing sorted by creation time

pub mod errors;
pub mod file_store;
pub mod pagination;
pub mod record;
pub mod store;

pub use errors::{SubmissionError, SubmissionResult};
pub use file_store::FileSubmissionStore;
pub use pagination::{Page, PageQuery, PageRequest, SortDirection, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
pub use record::{Submission, SubmissionReceipt};
pub use store::{MemorySubmissionStore, SubmissionRepository};
