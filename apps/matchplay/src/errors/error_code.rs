//! Error codes for the matchplay core.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All codes are SCREAMING_SNAKE_CASE and are what the CLI and any
//! embedding screen see in `AppError::code()`.

use core::fmt;

/// Centralized error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Local validation
    /// Roster is not four distinct players
    MalformedRoster,
    /// Combination id does not exist for this roster
    UnknownCombination,
    /// Queue index out of range
    SlotOutOfRange,
    /// Score is not a single digit
    InvalidScore,
    /// General validation error
    ValidationError,

    // Not found
    /// Selection queue slot not found
    SlotNotFound,
    /// Queued result not found in the cart
    QueuedResultNotFound,
    /// General not found error
    NotFound,

    // Conflicts
    /// Slot has already been persisted to the rating backend
    SlotAlreadySubmitted,
    /// A submission batch is already running
    SubmissionInFlight,
    /// General conflict
    Conflict,

    // Submission
    /// Submit invoked with nothing queued
    EmptyBatch,
    /// createMatch failed
    CreateMatchFailed,
    /// insertSetScore failed
    InsertSetScoreFailed,
    /// calculateMmrChange failed
    CalculateMmrChangeFailed,
    /// completeMatch failed
    CompleteMatchFailed,

    // System
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            // Local validation
            Self::MalformedRoster => "MALFORMED_ROSTER",
            Self::UnknownCombination => "UNKNOWN_COMBINATION",
            Self::SlotOutOfRange => "SLOT_OUT_OF_RANGE",
            Self::InvalidScore => "INVALID_SCORE",
            Self::ValidationError => "VALIDATION_ERROR",

            // Not found
            Self::SlotNotFound => "SLOT_NOT_FOUND",
            Self::QueuedResultNotFound => "QUEUED_RESULT_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            // Conflicts
            Self::SlotAlreadySubmitted => "SLOT_ALREADY_SUBMITTED",
            Self::SubmissionInFlight => "SUBMISSION_IN_FLIGHT",
            Self::Conflict => "CONFLICT",

            // Submission
            Self::EmptyBatch => "EMPTY_BATCH",
            Self::CreateMatchFailed => "CREATE_MATCH_FAILED",
            Self::InsertSetScoreFailed => "INSERT_SET_SCORE_FAILED",
            Self::CalculateMmrChangeFailed => "CALCULATE_MMR_CHANGE_FAILED",
            Self::CompleteMatchFailed => "COMPLETE_MATCH_FAILED",

            // System
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
