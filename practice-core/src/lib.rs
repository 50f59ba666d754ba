pub mod repository;
pub mod patient;
pub mod role;

pub use repository::{OfferRepository, PatientDirectory};
pub use patient::{PatientRecord, PatientSummary};
pub use role::Role;

use practice_offer::OfferError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Internal service error: {0}")]
    Internal(String),
}

impl From<OfferError> for CoreError {
    fn from(err: OfferError) -> Self {
        match err {
            OfferError::Validation(msg) => CoreError::Validation(msg),
            other => CoreError::Validation(other.to_string()),
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
