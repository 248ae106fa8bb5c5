//! Static meal catalog.
//!
//! The catalog is supplied by the app shell and never mutated here; cart lines
//! copy meal fields at add-time, so a later catalog change does not rewrite
//! history.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    /// Image asset key, resolved by the presentation layer.
    pub image: String,
    pub calories: u32,
    pub rating: f32,
    pub review_count: u32,
    pub top_comment: String,
    pub category: String,
}

/// Read-only lookup over the meal list.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    meals: Vec<Meal>,
}

impl Catalog {
    #[must_use]
    pub fn new(meals: Vec<Meal>) -> Self {
        Self { meals }
    }

    #[must_use]
    pub fn meals(&self) -> &[Meal] {
        &self.meals
    }

    #[must_use]
    pub fn get(&self, id: u32) -> Option<&Meal> {
        self.meals.iter().find(|meal| meal.id == id)
    }

    /// Distinct categories in first-appearance order, for the filter pills.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = rustc_hash::FxHashSet::default();

        self.meals
            .iter()
            .map(|meal| meal.category.as_str())
            .filter(|category| seen.insert(*category))
            .collect()
    }

    /// Meals matching an optional category and a case-insensitive name query.
    #[must_use]
    pub fn filter(&self, category: Option<&str>, query: &str) -> Vec<&Meal> {
        let query = query.to_lowercase();

        self.meals
            .iter()
            .filter(|meal| category.is_none_or(|c| meal.category == c))
            .filter(|meal| meal.name.to_lowercase().contains(&query))
            .collect()
    }
}
