//! Matcher error types with HTTP status code mapping.
//!
//! [`MatcherError`] is the central error type for the service. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{GroupId, PairId, ParticipantId, RoundId};

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2101,
///     "message": "round 7d0c… already has pairs",
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
    /// Numeric error code (see the code table on [`MatcherError`]).
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
/// | Range     | Category         | HTTP Status                  |
/// |-----------|------------------|------------------------------|
/// | 1000–1999 | Validation       | 400 Bad Request              |
/// | 2000–2999 | State/Not Found  | 404 Not Found / 409 Conflict |
/// | 3000–3999 | Server           | 500 Internal Server Error    |
/// | 4000–4999 | Pairing-Specific | 422 Unprocessable Entity     |
#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Group with the given ID was not found.
    #[error("group not found: {0}")]
    GroupNotFound(GroupId),

    /// Round with the given ID was not found.
    #[error("round not found: {0}")]
    RoundNotFound(RoundId),

    /// Participant with the given ID was not found.
    #[error("participant not found: {0}")]
    ParticipantNotFound(ParticipantId),

    /// Pair with the given ID was not found.
    #[error("pair not found: {0}")]
    PairNotFound(PairId),

    /// The round already has persisted pairs; pairing it again is refused.
    #[error("round {0} already has pairs")]
    AlreadyPaired(RoundId),

    /// A uniqueness constraint was violated (group name, channel, handle).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Odd number of available participants and none of them may be left out.
    #[error(
        "round {round_id} has {available} available participants and none of them is excludable"
    )]
    NoExcludableParticipant {
        /// Round that could not be paired.
        round_id: RoundId,
        /// Number of available participants (always odd).
        available: usize,
    },

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MatcherError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::GroupNotFound(_) => 2001,
            Self::RoundNotFound(_) => 2002,
            Self::ParticipantNotFound(_) => 2003,
            Self::PairNotFound(_) => 2004,
            Self::AlreadyPaired(_) => 2101,
            Self::Conflict(_) => 2102,
            Self::Internal(_) => 3000,
            Self::Persistence(_) => 3001,
            Self::NoExcludableParticipant { .. } => 4001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::GroupNotFound(_)
            | Self::RoundNotFound(_)
            | Self::ParticipantNotFound(_)
            | Self::PairNotFound(_) => StatusCode::NOT_FOUND,
            Self::AlreadyPaired(_) | Self::Conflict(_) => StatusCode::CONFLICT,
            Self::NoExcludableParticipant { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Persistence(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Operator hint attached to the response body, if any.
    fn details(&self) -> Option<String> {
        match self {
            Self::NoExcludableParticipant { .. } => Some(
                "mark an available participant as excludable or change availability, then retry"
                    .to_string(),
            ),
            Self::AlreadyPaired(_) => {
                Some("pairing a round is a one-time action; open a new round instead".to_string())
            }
            _ => None,
        }
    }
}

impl IntoResponse for MatcherError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: self.details(),
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn fatal_pairing_errors_are_operator_visible() {
        let round_id = RoundId::new();
        let already = MatcherError::AlreadyPaired(round_id);
        assert_eq!(already.status_code(), StatusCode::CONFLICT);
        assert_eq!(already.error_code(), 2101);

        let odd = MatcherError::NoExcludableParticipant {
            round_id,
            available: 3,
        };
        assert_eq!(odd.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(odd.to_string().contains("3 available"));
        assert!(odd.details().is_some());
    }

    #[test]
    fn not_found_maps_to_404() {
        let err = MatcherError::PairNotFound(PairId::new());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn server_errors_are_plain_500s() {
        let persistence = MatcherError::Persistence("pool timed out".to_string());
        assert_eq!(persistence.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(persistence.error_code(), 3001);

        let internal = MatcherError::Internal("task panicked".to_string());
        assert_eq!(internal.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(internal.error_code(), 3000);
    }

    #[test]
    fn into_response_sets_status() {
        let response = MatcherError::InvalidRequest("empty name".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
