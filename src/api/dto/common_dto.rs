//! Shared DTO types used across multiple endpoints.

use serde::Serialize;
use utoipa::ToSchema;

/// Generic acknowledgement body for mutations with nothing to return.
#[derive(Debug, Serialize, ToSchema)]
pub struct AckResponse {
    /// Always `"ok"`.
    pub status: &'static str,
}

impl AckResponse {
    /// The canonical acknowledgement.
    #[must_use]
    pub const fn ok() -> Self {
        Self { status: "ok" }
    }
}
