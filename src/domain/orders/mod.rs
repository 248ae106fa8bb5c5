//! Orders

pub mod errors;
pub mod models;
pub mod service;

pub use errors::OrdersServiceError;
pub use models::{Customer, CustomerField, FieldError, Order};
pub use service::OrderLedger;
