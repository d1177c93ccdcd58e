// src/domain/error.rs
use crate::domain::validation::FieldErrors;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Missing or unusable startup setting. Fatal.
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// Transport failure or non-2xx answer. The message is user-facing.
    #[error("{0}")]
    Network(String),
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),
}
