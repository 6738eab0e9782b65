//! Editor error types with HTTP status code mapping.
//!
//! [`EditorError`] is the central error type for the editor backend. Each
//! variant maps to a specific HTTP status code and structured JSON error
//! response. Parse anomalies are deliberately absent: the YAML micro-parser
//! never fails (see `crate::yaml`).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::Slot;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 4001,
///     "message": "slot 22 is already used by buttons.confirm",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`EditorError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category            | HTTP Status                  |
/// |-----------|---------------------|------------------------------|
/// | 1000–1999 | Validation          | 400 Bad Request              |
/// | 2000–2999 | Not Found           | 404 Not Found                |
/// | 3000–3999 | Server              | 500 Internal Server Error    |
/// | 4000–4999 | Structural Conflict | 409 Conflict / 422           |
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Slot value outside the 0–53 grid.
    #[error("invalid slot: {0} (must be 0-53)")]
    InvalidSlot(i64),

    /// No shop file with the given stem is loaded.
    #[error("shop not found: {0}")]
    ShopNotFound(String),

    /// No item with the given id exists in the current shop.
    #[error("item not found: {0}")]
    ItemNotFound(u64),

    /// No main-menu button with the given key exists.
    #[error("button not found: {0}")]
    ButtonNotFound(String),

    /// No activity log entry with the given id exists.
    #[error("activity entry not found: {0}")]
    EntryNotFound(String),

    /// The entity a rollback targets can no longer be located.
    #[error("rollback target missing: {0}")]
    RollbackTargetMissing(String),

    /// The entry kind does not support rollback.
    #[error("rollback not supported: {0}")]
    RollbackUnsupported(String),

    /// A slot is already occupied by another element of the same menu.
    #[error("slot {slot} is already used by {occupied_by}")]
    SlotConflict {
        /// The contested slot.
        slot: Slot,
        /// Location string of the element already holding the slot.
        occupied_by: String,
    },

    /// A shop file with the same stem already exists.
    #[error("shop file already exists: {0}")]
    DuplicateShopFile(String),

    /// No shop document is currently open.
    #[error("no shop is currently open")]
    NoShopOpen,

    /// Persistence layer failure (file store or activity store).
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl EditorError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::InvalidSlot(_) => 1002,
            Self::ShopNotFound(_) => 2001,
            Self::ItemNotFound(_) => 2002,
            Self::ButtonNotFound(_) => 2003,
            Self::EntryNotFound(_) => 2004,
            Self::RollbackTargetMissing(_) => 2005,
            Self::SlotConflict { .. } => 4001,
            Self::DuplicateShopFile(_) => 4002,
            Self::NoShopOpen => 4003,
            Self::RollbackUnsupported(_) => 4004,
            Self::PersistenceError(_) => 3001,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::InvalidSlot(_) => StatusCode::BAD_REQUEST,
            Self::ShopNotFound(_)
            | Self::ItemNotFound(_)
            | Self::ButtonNotFound(_)
            | Self::EntryNotFound(_)
            | Self::RollbackTargetMissing(_) => StatusCode::NOT_FOUND,
            Self::SlotConflict { .. } | Self::DuplicateShopFile(_) | Self::NoShopOpen => {
                StatusCode::CONFLICT
            }
            Self::RollbackUnsupported(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::PersistenceError(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for EditorError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
