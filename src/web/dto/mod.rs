//! Data Transfer Objects for the HTTP API.
//!
//! Thread and reply responses reuse the redacted
//! [`crate::board::ThreadView`] projection directly.

pub mod request;
pub mod response;
pub mod validation;

pub use request::*;
pub use response::*;
pub use validation::{not_empty_trimmed, ValidatedJson};
