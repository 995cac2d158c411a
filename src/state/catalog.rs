use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::error::{PlannerError, Result};
use crate::models::{FoodCategory, FoodItem};

/// Read-only food catalog, in the order it was supplied.
#[derive(Debug, Clone, Default)]
pub struct FoodCatalog {
    foods: Vec<Arc<FoodItem>>,
    /// Position of each food keyed by id.
    index: HashMap<String, usize>,
}

impl FoodCatalog {
    /// Build a catalog from a list of foods.
    ///
    /// A repeated id replaces the earlier entry in place (last occurrence wins).
    pub fn new(foods: Vec<FoodItem>) -> Self {
        let mut catalog = Self::default();
        for food in foods {
            if !food.is_valid() {
                warn!(
                    food = %food.id,
                    safe_amount = food.safe_amount,
                    "food declares FODMAPs without a positive safe amount, load counts as zero"
                );
            }

            match catalog.index.get(&food.id) {
                Some(&pos) => catalog.foods[pos] = Arc::new(food),
                None => {
                    catalog.index.insert(food.id.clone(), catalog.foods.len());
                    catalog.foods.push(Arc::new(food));
                }
            }
        }
        catalog
    }

    /// Get a food by id.
    pub fn get(&self, id: &str) -> Option<&Arc<FoodItem>> {
        self.index.get(id).map(|&pos| &self.foods[pos])
    }

    /// Get a food by id, failing with `FoodNotFound`.
    pub fn require(&self, id: &str) -> Result<&Arc<FoodItem>> {
        self.get(id)
            .ok_or_else(|| PlannerError::FoodNotFound(id.to_string()))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arc<FoodItem>> {
        self.foods.iter()
    }

    /// Foods in any of the given categories, in catalog order.
    pub fn in_categories(&self, categories: &[FoodCategory]) -> Vec<Arc<FoodItem>> {
        self.foods
            .iter()
            .filter(|f| categories.contains(&f.category))
            .cloned()
            .collect()
    }

    /// Count of foods in the catalog.
    pub fn len(&self) -> usize {
        self.foods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }
}
