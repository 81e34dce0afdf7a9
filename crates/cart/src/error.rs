//! Unified error handling.
//!
//! Every public operation returns [`Result<T>`]. Store failures are never
//! swallowed: an unreachable store becomes [`Error::StoreUnavailable`], any
//! other store failure [`Error::Store`].

use quickcart_core::{IdError, PriceError, QuantityError};
use thiserror::Error;

use crate::store::StoreError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Caller passed a value the operation cannot accept.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A user, SKU or cart the operation needs does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The store could not be reached or timed out.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Data in the store does not have the expected shape.
    #[error("Data corruption: {0}")]
    DataCorruption(String),

    /// The store rejected an operation for a reason other than availability.
    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => Self::StoreUnavailable(msg),
            other => Self::Store(other),
        }
    }
}

impl From<QuantityError> for Error {
    fn from(err: QuantityError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

impl From<PriceError> for Error {
    fn from(err: PriceError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

impl From<IdError> for Error {
    fn from(err: IdError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

/// Result type alias for [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NotFound("sku:sku999".to_string());
        assert_eq!(err.to_string(), "Not found: sku:sku999");

        let err = Error::InvalidArgument("quantity must be positive (got 0)".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid argument: quantity must be positive (got 0)"
        );
    }

    #[test]
    fn test_unavailable_store_maps_to_store_unavailable() {
        let err = Error::from(StoreError::Unavailable("refused".to_string()));
        assert!(matches!(err, Error::StoreUnavailable(ref m) if m == "refused"));
    }

    #[test]
    fn test_other_store_errors_keep_their_kind() {
        let err = Error::from(StoreError::WrongType("cart:1".to_string()));
        assert!(matches!(err, Error::Store(StoreError::WrongType(_))));
    }

    #[test]
    fn test_validation_errors_are_invalid_arguments() {
        let err = Error::from(QuantityError::NotPositive(-1));
        assert!(matches!(err, Error::InvalidArgument(_)));

        let err = Error::from(IdError::Empty);
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
