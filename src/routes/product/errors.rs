use crate::errors::GenericError;
use crate::utils::error_chain_fmt;

#[derive(thiserror::Error)]
pub enum ProductError {
    #[error("{0}")]
    NotFound(String),
    #[error("Product is referenced by orders and cannot be deleted")]
    InUse(#[source] anyhow::Error),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for ProductError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<ProductError> for GenericError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(message) => GenericError::DataNotFound(message),
            ProductError::InUse(_) => GenericError::ValidationError(err.to_string()),
            ProductError::UnexpectedError(e) => GenericError::UnexpectedError(e),
        }
    }
}
