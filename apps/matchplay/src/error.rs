use thiserror::Error;

use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use crate::errors::ErrorCode;
use crate::rating::SubmissionStage;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {detail}")]
    Validation { code: ErrorCode, detail: String },
    #[error("Not found: {detail}")]
    NotFound { code: ErrorCode, detail: String },
    #[error("Conflict: {detail}")]
    Conflict { code: ErrorCode, detail: String },
    #[error("{}: {detail}", .stage.failure_message())]
    Remote {
        stage: SubmissionStage,
        detail: String,
    },
    #[error("Nothing to submit")]
    EmptyBatch,
    #[error("A submission is already in progress")]
    SubmissionInFlight,
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    /// Helper method to extract error code from any error variant
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { code, .. } => *code,
            AppError::NotFound { code, .. } => *code,
            AppError::Conflict { code, .. } => *code,
            AppError::Remote { stage, .. } => stage.error_code(),
            AppError::EmptyBatch => ErrorCode::EmptyBatch,
            AppError::SubmissionInFlight => ErrorCode::SubmissionInFlight,
            AppError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    pub fn invalid(code: ErrorCode, detail: String) -> Self {
        Self::Validation { code, detail }
    }

    pub fn not_found(code: ErrorCode, detail: String) -> Self {
        Self::NotFound { code, detail }
    }

    pub fn conflict(code: ErrorCode, detail: String) -> Self {
        Self::Conflict { code, detail }
    }

    pub fn config(detail: String) -> Self {
        Self::Config { detail }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(kind, detail) => {
                let code = match kind {
                    ValidationKind::MalformedRoster => ErrorCode::MalformedRoster,
                    ValidationKind::UnknownCombination => ErrorCode::UnknownCombination,
                    ValidationKind::SlotOutOfRange => ErrorCode::SlotOutOfRange,
                    ValidationKind::InvalidScore => ErrorCode::InvalidScore,
                    ValidationKind::Other(_) => ErrorCode::ValidationError,
                };
                AppError::invalid(code, detail)
            }
            DomainError::NotFound(kind, detail) => {
                let code = match kind {
                    NotFoundKind::Slot => ErrorCode::SlotNotFound,
                    NotFoundKind::QueuedResult => ErrorCode::QueuedResultNotFound,
                    NotFoundKind::Other(_) => ErrorCode::NotFound,
                };
                AppError::not_found(code, detail)
            }
            DomainError::Conflict(kind, detail) => {
                let code = match kind {
                    ConflictKind::SlotAlreadySubmitted => ErrorCode::SlotAlreadySubmitted,
                    ConflictKind::Other(_) => ErrorCode::Conflict,
                };
                AppError::conflict(code, detail)
            }
        }
    }
}
