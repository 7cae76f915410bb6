use thiserror::Error;

use crate::storage::StorageError;

/// Machine-readable reason for a rejected input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationCode {
    StartRequired,
    UserIdRequired,
    IdRequired,
    DescriptionRequired,
    StopDurationPairing,
    StartUnparseable,
}

impl ValidationCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StartRequired => "start_required",
            Self::UserIdRequired => "user_id_required",
            Self::IdRequired => "id_required",
            Self::DescriptionRequired => "description_required",
            Self::StopDurationPairing => "stop_duration_pairing",
            Self::StartUnparseable => "start_unparseable",
        }
    }
}

/// Caller-supplied data violated a field-presence or field-pairing rule.
/// Carries a reason code alongside the human message so callers can react
/// without parsing the text.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub code: ValidationCode,
    pub message: String,
}

impl ValidationError {
    pub fn new(code: ValidationCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ServiceError {
    /// The validation code, when this is a validation failure.
    pub fn validation_code(&self) -> Option<ValidationCode> {
        match self {
            Self::Validation(v) => Some(v.code),
            Self::Storage(_) => None,
        }
    }
}
