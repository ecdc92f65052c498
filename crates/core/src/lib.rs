//! Domain core for the issue tracker.
//!
//! Holds the wire types, validation schemas and pagination math shared by
//! the store, the HTTP service and the client. No I/O lives here.

pub mod error;
pub mod issue;
pub mod query;
pub mod types;
