//! Response DTOs for the HTTP API.

use serde::Serialize;

use crate::board::ThreadId;

/// Body returned after a thread is created.
#[derive(Debug, Serialize)]
pub struct ThreadCreatedResponse {
    /// Id of the new thread.
    #[serde(rename = "_id")]
    pub id: ThreadId,
}
