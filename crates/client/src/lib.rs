//! Client-side access to the issue tracker.
//!
//! [`api::IssueApi`] speaks the HTTP contract; [`board::IssueBoard`] keeps a
//! local copy of the current page of issues and reconciles it from mutation
//! responses.

pub mod api;
pub mod board;

pub use api::{ClientError, IssueApi};
pub use board::IssueBoard;
