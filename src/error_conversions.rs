//! Conversions from the `data` layer errors into service errors.
//!
//! The domain and form modules build without the `server` feature, so they
//! cannot name [`ServiceError`] themselves.

use crate::domain::types::TypeConstraintError;
use crate::forms::FormError;
use crate::services::ServiceError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}

impl From<FormError> for ServiceError {
    fn from(val: FormError) -> Self {
        match val {
            FormError::Validation(_) => {
                ServiceError::Form("Please fill in all required fields.".to_string())
            }
            FormError::InvalidCategory => {
                ServiceError::Form("Category must be A or B.".to_string())
            }
            FormError::InvalidDateOfBirth => {
                ServiceError::Form("Date of birth must be a valid date.".to_string())
            }
            other => ServiceError::Form(format!("Invalid member data: {other}")),
        }
    }
}
