//! Cart Models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::Meal;

/// One draft-order line: the meal as it looked when it was added, plus a
/// quantity of at least 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub meal: Meal,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

impl CartLine {
    #[must_use]
    pub fn new(meal: Meal) -> Self {
        Self { meal, quantity: 1 }
    }

    /// Line subtotal: price × quantity.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.meal.price * Decimal::from(self.quantity)
    }
}

fn default_quantity() -> u32 {
    1
}

/// The single in-progress draft order.
///
/// Lines keep insertion order and hold at most one entry per meal id. Persisted
/// as a bare JSON array of lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Build a cart from arbitrary lines: duplicate meal ids collapse to the
    /// first occurrence and quantities floor at 1.
    #[must_use]
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Self::default();

        for mut line in lines {
            line.quantity = line.quantity.max(1);
            if !cart.contains(line.meal.id) {
                cart.lines.push(line);
            }
        }

        cart
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn line(&self, meal_id: u32) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.meal.id == meal_id)
    }

    #[must_use]
    pub fn contains(&self, meal_id: u32) -> bool {
        self.line(meal_id).is_some()
    }

    /// Grand total, always recomputed from the lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    pub(crate) fn push_line(&mut self, line: CartLine) {
        self.lines.push(line);
    }

    pub(crate) fn remove_line(&mut self, meal_id: u32) -> Option<CartLine> {
        let at = self.lines.iter().position(|line| line.meal.id == meal_id)?;

        Some(self.lines.remove(at))
    }

    /// Shift a line's quantity by `delta`, flooring at 1. Returns whether the
    /// line exists.
    pub(crate) fn adjust_quantity(&mut self, meal_id: u32, delta: i64) -> bool {
        let Some(at) = self.lines.iter().position(|line| line.meal.id == meal_id) else {
            return false;
        };

        let line = &mut self.lines[at];
        let next = (i64::from(line.quantity) + delta).clamp(1, i64::from(u32::MAX));
        line.quantity = next as u32;

        true
    }
}

/// What a toggle did, so the call site can word its notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartAction {
    Added,
    Removed,
}
