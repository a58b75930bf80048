//! formintake - schema-driven form submissions
//!
//! A form is described by a [`schema::FormSchema`]. Incoming payloads are
//! validated and normalized against it in one pass; only valid, normalized
//! records reach a [`submissions::SubmissionRepository`]. The
//! [`http_server`] exposes this as a JSON API and [`cli`] wires it up.

pub mod cli;
pub mod http_server;
pub mod observability;
pub mod schema;
pub mod submissions;
