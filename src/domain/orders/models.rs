//! Order Models

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::cart::CartLine;

/// Checkout details. Every field is required non-blank at commit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub payment_method: String,
}

impl Customer {
    /// Field-level problems, one per blank field, so the UI can highlight each
    /// input instead of showing one aggregate message.
    #[must_use]
    pub fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        let required = [
            (CustomerField::FullName, &self.full_name),
            (CustomerField::Email, &self.email),
            (CustomerField::Phone, &self.phone),
            (CustomerField::Address, &self.address),
        ];

        for (field, value) in required {
            if value.trim().is_empty() {
                errors.push(FieldError {
                    field,
                    reason: "Required",
                });
            }
        }

        if self.payment_method.trim().is_empty() {
            errors.push(FieldError {
                field: CustomerField::PaymentMethod,
                reason: "Select one",
            });
        }

        errors
    }
}

/// A customer input field, for targeting validation messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomerField {
    FullName,
    Email,
    Phone,
    Address,
    PaymentMethod,
}

/// One field's validation problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: CustomerField,
    pub reason: &'static str,
}

/// A committed checkout.
///
/// Immutable once persisted, except `rating`, which transitions once from
/// `None` to a value in 1..=5. The total is computed from the lines at commit
/// and never drifts independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub lines: Vec<CartLine>,
    pub total: Decimal,
    pub created_at: Timestamp,
    pub customer: Customer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

impl Order {
    /// Creation time formatted for notifications and order summaries.
    #[must_use]
    pub fn created_at_display(&self) -> String {
        self.created_at.strftime("%Y-%m-%d %H:%M").to_string()
    }
}
