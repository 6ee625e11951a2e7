//! HTTP API for anonboard.
//!
//! Exposes the board service over JSON endpoints under `/api/threads/:board`
//! and `/api/replies/:board`, plus a `/health` check.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
