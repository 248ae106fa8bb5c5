//! Cart

pub mod models;
pub mod service;

pub use models::{Cart, CartAction, CartLine};
pub use service::CartManager;
