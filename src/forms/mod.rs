//! Form definitions backing the directory routes.

use thiserror::Error;
use validator::ValidationErrors;

pub mod member;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid id number")]
    InvalidIdNo,

    #[error("invalid name")]
    InvalidName,

    #[error("invalid phone number")]
    InvalidPhoneNumber,

    #[error("invalid category")]
    InvalidCategory,

    #[error("invalid date of birth")]
    InvalidDateOfBirth,
}
