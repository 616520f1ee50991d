//! # Restaurant Catalog
//!
//! The catalog maps each restaurant to the ordered list of dishes it offers.
//! It is loaded once, validated at load time, and never mutated afterwards.
//!
//! Every constructor runs the same checks:
//! - restaurant names are non-empty and unique,
//! - every restaurant offers at least one dish,
//! - dish names are non-empty.
//!
//! Dish names are scoped to their restaurant; two restaurants may offer a dish
//! with the same name.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// The compiled-in catalog fixture.
const BUILTIN: &[(&str, &[&str])] = &[
    (
        "Agadir",
        &["Classic Burger", "Vegan Burger", "Sweet Potato Fries", "Chicken Wings", "Onion Rings"],
    ),
    (
        "Giraffe",
        &["Pad Thai", "Ramen Bowl", "Asian Salad", "Sushi Combo", "Spring Rolls"],
    ),
    (
        "Zozobra",
        &["Spicy Noodles", "Chicken Teriyaki", "Miso Soup", "Poke Bowl", "Soba Salad"],
    ),
    (
        "Humus Eliau",
        &["Hummus Masabacha", "Hummus with Egg", "Falafel", "Pita Plate", "Shakshuka"],
    ),
    (
        "Pizza Hut",
        &["Pepperoni Pizza", "Margarita Pizza", "Cheesy Bites", "Garlic Bread", "Coke Bottle"],
    ),
];

/// Errors raised while building or loading a [`Catalog`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    /// A restaurant entry has a blank name.
    #[error("Restaurant name must not be empty")]
    EmptyRestaurantName,

    /// The same restaurant appears twice.
    #[error("Duplicate restaurant: {0}")]
    DuplicateRestaurant(String),

    /// A restaurant offers no dishes.
    #[error("Restaurant {0} has no dishes")]
    NoDishes(String),

    /// A restaurant lists a blank dish name.
    #[error("Restaurant {0} lists an empty dish name")]
    EmptyDishName(String),

    /// The catalog file could not be read.
    #[error("Catalog file error: {0}")]
    Io(String),

    /// The catalog file is not valid catalog JSON.
    #[error("Malformed catalog: {0}")]
    Malformed(String),
}

/// One restaurant and the dishes it offers, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogEntry {
    pub restaurant: String,
    pub dishes: Vec<String>,
}

/// Validated, immutable restaurant → dishes mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Builds a catalog from entries, preserving their order.
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.restaurant.trim().is_empty() {
                return Err(CatalogError::EmptyRestaurantName);
            }
            if !seen.insert(entry.restaurant.as_str()) {
                return Err(CatalogError::DuplicateRestaurant(entry.restaurant.clone()));
            }
            if entry.dishes.is_empty() {
                return Err(CatalogError::NoDishes(entry.restaurant.clone()));
            }
            if entry.dishes.iter().any(|dish| dish.trim().is_empty()) {
                return Err(CatalogError::EmptyDishName(entry.restaurant.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// The compiled-in catalog of five restaurants.
    pub fn builtin() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|(restaurant, dishes)| CatalogEntry {
                restaurant: (*restaurant).to_string(),
                dishes: dishes.iter().map(|d| (*d).to_string()).collect(),
            })
            .collect();
        // BUILTIN is covered by `builtin_catalog_passes_validation`.
        Self { entries }
    }

    /// Parses a catalog from JSON of the form
    /// `[{"restaurant": "...", "dishes": ["...", ...]}, ...]`.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let entries: Vec<CatalogEntry> =
            serde_json::from_str(json).map_err(|e| CatalogError::Malformed(e.to_string()))?;
        Self::new(entries)
    }

    /// Reads and parses a JSON catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Dishes offered by `restaurant`, in order.
    ///
    /// Unknown restaurants yield an empty slice: callers treat that as
    /// "no dishes available", not as a failure.
    pub fn lookup(&self, restaurant: &str) -> &[String] {
        self.entries
            .iter()
            .find(|entry| entry.restaurant == restaurant)
            .map(|entry| entry.dishes.as_slice())
            .unwrap_or(&[])
    }

    /// Restaurant names in catalog order.
    pub fn restaurants(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.restaurant.as_str())
    }

    pub fn contains_restaurant(&self, restaurant: &str) -> bool {
        self.entries.iter().any(|entry| entry.restaurant == restaurant)
    }

    /// Whether `restaurant` offers `dish`.
    pub fn offers(&self, restaurant: &str, dish: &str) -> bool {
        self.lookup(restaurant).iter().any(|d| d == dish)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
