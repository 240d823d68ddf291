use crate::errors::GenericError;
use crate::utils::error_chain_fmt;

#[derive(thiserror::Error)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,
    #[error("{0}")]
    InvalidCart(String),
    #[error("Failed to create payment session")]
    GatewayError(#[source] anyhow::Error),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for CheckoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<CheckoutError> for GenericError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::EmptyCart | CheckoutError::InvalidCart(_) => {
                GenericError::ValidationError(err.to_string())
            }
            CheckoutError::GatewayError(_) => GenericError::UnexpectedCustomError(err.to_string()),
            CheckoutError::UnexpectedError(e) => GenericError::UnexpectedError(e),
        }
    }
}

#[derive(thiserror::Error)]
pub enum OrderFetchError {
    #[error("Order not found")]
    NotFound,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for OrderFetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<OrderFetchError> for GenericError {
    fn from(err: OrderFetchError) -> Self {
        match err {
            OrderFetchError::NotFound => GenericError::DataNotFound(err.to_string()),
            OrderFetchError::UnexpectedError(e) => GenericError::UnexpectedError(e),
        }
    }
}
