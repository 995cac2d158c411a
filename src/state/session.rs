use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PlannerError, Result};
use crate::models::{FoodItem, Meal, MealItem, MealTemplate};
use crate::planner::assembler::expand_template;
use crate::planner::calculations::{summarize_meal, MealSummary};
use crate::planner::constants::MAX_HISTORY_ENTRIES;
use crate::state::FoodCatalog;

/// The meal currently being built.
///
/// Every edit swaps in a freshly built `Meal`.
#[derive(Debug, Clone, Default)]
pub struct MealSession {
    meal: Meal,
}

impl MealSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn meal(&self) -> &Meal {
        &self.meal
    }

    /// Add a food at its default portion and return the new instance id.
    pub fn add_food(&mut self, food: Arc<FoodItem>) -> Uuid {
        let item = MealItem::with_default_portion(food);
        let id = item.instance_id;
        self.meal = self.meal.with_item(item);
        id
    }

    pub fn add_by_id(&mut self, catalog: &FoodCatalog, food_id: &str) -> Result<Uuid> {
        let food = Arc::clone(catalog.require(food_id)?);
        Ok(self.add_food(food))
    }

    pub fn remove(&mut self, instance_id: Uuid) -> Result<()> {
        if !self.meal.contains(instance_id) {
            return Err(PlannerError::InstanceNotFound(instance_id));
        }
        self.meal = self.meal.without(instance_id);
        Ok(())
    }

    /// Set an item's portion; negative amounts clamp to zero.
    pub fn update_amount(&mut self, instance_id: Uuid, amount: f64) -> Result<()> {
        if !self.meal.contains(instance_id) {
            return Err(PlannerError::InstanceNotFound(instance_id));
        }
        if !amount.is_finite() {
            return Err(PlannerError::InvalidInput(format!(
                "portion must be a number, got {}",
                amount
            )));
        }
        self.meal = self.meal.with_amount(instance_id, amount.max(0.0));
        Ok(())
    }

    pub fn clear(&mut self) {
        self.meal = Meal::new();
    }

    /// Replace the session meal with a template expansion.
    pub fn load_template(&mut self, template: &MealTemplate, catalog: &FoodCatalog) {
        self.meal = expand_template(template, catalog);
    }

    /// Replace the session meal, e.g. with a shuffle result.
    pub fn load_meal(&mut self, meal: Meal) {
        self.meal = meal;
    }

    pub fn summary(&self) -> MealSummary {
        summarize_meal(&self.meal)
    }
}

/// A saved meal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalMeal {
    pub id: Uuid,
    pub name: String,
    /// Unix seconds.
    pub created_at: u64,
    pub meal: Meal,
}

/// Display name: the first three foods, "..." when there are more.
pub fn meal_name(meal: &Meal) -> String {
    if meal.is_empty() {
        return "Empty meal".to_string();
    }

    let names: Vec<&str> = meal.iter().take(3).map(|i| i.food.name.as_str()).collect();
    let mut name = names.join(", ");
    if meal.len() > 3 {
        name.push_str("...");
    }
    name
}

/// Recently saved meals, newest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MealHistory {
    entries: Vec<HistoricalMeal>,
}

impl MealHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a meal at the front, dropping the oldest beyond the cap.
    ///
    /// Empty meals are not recorded.
    pub fn record(&mut self, meal: &Meal) -> Option<Uuid> {
        if meal.is_empty() {
            return None;
        }

        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        let entry = HistoricalMeal {
            id: Uuid::new_v4(),
            name: meal_name(meal),
            created_at,
            meal: meal.clone(),
        };
        let id = entry.id;

        self.entries.insert(0, entry);
        self.entries.truncate(MAX_HISTORY_ENTRIES);
        Some(id)
    }

    /// A copy of a saved meal under fresh instance ids.
    pub fn load(&self, id: Uuid) -> Option<Meal> {
        self.get(id).map(|entry| entry.meal.reissued())
    }

    pub fn get(&self, id: Uuid) -> Option<&HistoricalMeal> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HistoricalMeal> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FoodCategory;

    fn food(name: &str) -> Arc<FoodItem> {
        Arc::new(FoodItem {
            id: name.to_lowercase(),
            name: name.to_string(),
            category: FoodCategory::Other,
            unit: "g".to_string(),
            calories_per_basis: Some(100.0),
            safe_amount: 0.0,
            fodmaps: vec![],
            notes: None,
        })
    }

    #[test]
    fn test_meal_name() {
        assert_eq!(meal_name(&Meal::new()), "Empty meal");

        let meal: Meal = ["Rice", "Egg", "Kiwi"]
            .iter()
            .map(|n| MealItem::new(food(n), 1.0))
            .collect();
        assert_eq!(meal_name(&meal), "Rice, Egg, Kiwi");

        let meal = meal.with_item(MealItem::new(food("Oats"), 1.0));
        assert_eq!(meal_name(&meal), "Rice, Egg, Kiwi...");
    }

    #[test]
    fn test_update_amount_clamps_negative() {
        let mut session = MealSession::new();
        let id = session.add_food(food("Rice"));
        session.update_amount(id, -20.0).unwrap();
        assert_eq!(session.meal().get(id).unwrap().current_amount, 0.0);
    }
}
