use crate::errors::GenericError;
use crate::utils::error_chain_fmt;

#[derive(thiserror::Error)]
pub enum AuthError {
    #[error("Incorrect Email")]
    UnknownEmail,
    #[error("Incorrect Password")]
    InvalidPassword(#[source] anyhow::Error),
    #[error("User is not active")]
    InactiveUser,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<AuthError> for GenericError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::UnknownEmail | AuthError::InvalidPassword(_) | AuthError::InactiveUser => {
                GenericError::ValidationError(err.to_string())
            }
            AuthError::UnexpectedError(e) => GenericError::UnexpectedError(e),
        }
    }
}

#[derive(thiserror::Error)]
pub enum UserRegistrationError {
    #[error("Password not matched")]
    PasswordMismatch,
    #[error("Email already exists")]
    DuplicateEmail,
    #[error("{0}")]
    DatabaseError(String, anyhow::Error),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for UserRegistrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<UserRegistrationError> for GenericError {
    fn from(err: UserRegistrationError) -> Self {
        match err {
            UserRegistrationError::PasswordMismatch | UserRegistrationError::DuplicateEmail => {
                GenericError::ValidationError(err.to_string())
            }
            UserRegistrationError::DatabaseError(message, e) => {
                GenericError::DatabaseError(message, e)
            }
            UserRegistrationError::UnexpectedError(e) => GenericError::UnexpectedError(e),
        }
    }
}

#[derive(thiserror::Error, PartialEq)]
pub enum OtpVerificationError {
    #[error("No active OTP found for this email.")]
    NoActiveOtp,
    #[error("Invalid OTP.")]
    InvalidOtp,
    #[error("OTP expired.")]
    Expired,
}

impl std::fmt::Debug for OtpVerificationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<OtpVerificationError> for GenericError {
    fn from(err: OtpVerificationError) -> Self {
        GenericError::ValidationError(err.to_string())
    }
}
