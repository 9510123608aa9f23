//! Error types for the scheduling engine and its HTTP surface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors produced by the scheduling engine.
///
/// Every failure is synchronous and raised at the point of detection; the
/// engine never retries internally and never returns partial results for
/// malformed input. "No conflicts" and "no slots found" are empty
/// collections, not errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("invalid time format: {0:?} (expected HH:MM)")]
    InvalidFormat(String),

    #[error("minute offset {0} is outside the valid day range (0-1439)")]
    OutOfRange(i32),

    #[error("end time must be strictly after start time")]
    NonPositiveDuration,

    #[error("meeting falls outside working hours ({window_start}-{window_end})")]
    OutsideWorkingHours {
        window_start: String,
        window_end: String,
    },

    #[error("duration of {actual} minutes is below the {minimum}-minute floor")]
    DurationTooShort { actual: i32, minimum: i32 },

    #[error("storage error: {0}")]
    Storage(String),
}

impl ScheduleError {
    /// Stable machine-readable kind, used by callers to map errors onto
    /// form-validation messages.
    pub fn kind(&self) -> &'static str {
        match self {
            ScheduleError::InvalidFormat(_) => "invalid_format",
            ScheduleError::OutOfRange(_) => "out_of_range",
            ScheduleError::NonPositiveDuration => "non_positive_duration",
            ScheduleError::OutsideWorkingHours { .. } => "outside_working_hours",
            ScheduleError::DurationTooShort { .. } => "duration_too_short",
            ScheduleError::Storage(_) => "storage",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ScheduleError::InvalidFormat(_) | ScheduleError::OutOfRange(_) => {
                StatusCode::BAD_REQUEST
            }
            ScheduleError::NonPositiveDuration
            | ScheduleError::OutsideWorkingHours { .. }
            | ScheduleError::DurationTooShort { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ScheduleError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ScheduleError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.kind(),
            "message": self.to_string(),
        }));
        (self.status_code(), body).into_response()
    }
}
