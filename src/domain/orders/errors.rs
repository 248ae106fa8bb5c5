//! Order ledger errors.

use thiserror::Error;

use crate::{domain::orders::models::FieldError, storage::StorageError};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("customer details are incomplete")]
    Validation(Vec<FieldError>),

    #[error("order not found")]
    NotFound,

    #[error("order has already been rated")]
    AlreadyRated,

    #[error("rating {0} is outside 1..=5")]
    RatingOutOfRange(u8),

    #[error("storage error")]
    Storage(#[from] StorageError),
}
