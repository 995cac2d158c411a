use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::Serialize;

use crate::models::{FoodCategory, FoodItem, WeeklyPlan};

/// Total amount of one food needed for the week.
#[derive(Debug, Clone, Serialize)]
pub struct ShoppingItem {
    pub food: Arc<FoodItem>,
    pub amount: f64,
}

impl ShoppingItem {
    pub fn name(&self) -> &str {
        &self.food.name
    }

    pub fn unit(&self) -> &str {
        &self.food.unit
    }
}

/// Items grouped by category, categories in enumeration order.
///
/// Within a category items sort by name, then id.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ShoppingList {
    groups: BTreeMap<FoodCategory, Vec<ShoppingItem>>,
}

impl ShoppingList {
    pub fn groups(&self) -> impl Iterator<Item = (FoodCategory, &[ShoppingItem])> {
        self.groups.iter().map(|(c, items)| (*c, items.as_slice()))
    }

    pub fn items(&self) -> impl Iterator<Item = &ShoppingItem> {
        self.groups.values().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

/// Sum every food's portions across the plan.
pub fn build_shopping_list(plan: &WeeklyPlan) -> ShoppingList {
    let mut totals: HashMap<&str, ShoppingItem> = HashMap::new();

    for (_, _, meal) in plan.meals() {
        for item in meal {
            totals
                .entry(item.food.id.as_str())
                .and_modify(|entry| entry.amount += item.current_amount)
                .or_insert_with(|| ShoppingItem {
                    food: Arc::clone(&item.food),
                    amount: item.current_amount,
                });
        }
    }

    let mut groups: BTreeMap<FoodCategory, Vec<ShoppingItem>> = BTreeMap::new();
    for item in totals.into_values() {
        groups.entry(item.food.category).or_default().push(item);
    }
    for items in groups.values_mut() {
        items.sort_by(|a, b| {
            a.food
                .name
                .cmp(&b.food.name)
                .then_with(|| a.food.id.cmp(&b.food.id))
        });
    }

    ShoppingList { groups }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Meal, MealItem, MealSlot, Weekday};

    fn food(id: &str, category: FoodCategory) -> Arc<FoodItem> {
        Arc::new(FoodItem {
            id: id.to_string(),
            name: id.to_string(),
            category,
            unit: "g".to_string(),
            calories_per_basis: Some(100.0),
            safe_amount: 0.0,
            fodmaps: vec![],
            notes: None,
        })
    }

    #[test]
    fn test_amounts_aggregate_across_days() {
        let rice = food("rice", FoodCategory::Cereal);
        let oats = food("oats", FoodCategory::Cereal);
        let kiwi = food("kiwi", FoodCategory::Fruit);

        let monday = Meal::from_items(vec![
            MealItem::new(Arc::clone(&rice), 100.0),
            MealItem::new(Arc::clone(&kiwi), 150.0),
        ]);
        let tuesday = Meal::from_items(vec![
            MealItem::new(Arc::clone(&rice), 80.0),
            MealItem::new(Arc::clone(&oats), 40.0),
        ]);

        let plan = WeeklyPlan::new()
            .with_meal(Weekday::Monday, MealSlot::Lunch, monday)
            .with_meal(Weekday::Tuesday, MealSlot::Dinner, tuesday);

        let list = build_shopping_list(&plan);
        assert_eq!(list.len(), 3);

        let groups: Vec<_> = list.groups().collect();
        // Fruit precedes Cereal in the category enumeration
        assert_eq!(groups[0].0, FoodCategory::Fruit);
        assert_eq!(groups[1].0, FoodCategory::Cereal);

        let cereals: Vec<_> = groups[1].1.iter().map(|i| (i.name(), i.amount)).collect();
        assert_eq!(cereals, vec![("oats", 40.0), ("rice", 180.0)]);
    }

    #[test]
    fn test_same_name_orders_by_id() {
        let mut zucchini = (*food("zucchini-b", FoodCategory::Vegetable)).clone();
        zucchini.name = "Zucchini".to_string();
        let mut other = zucchini.clone();
        other.id = "zucchini-a".to_string();

        let meal = Meal::from_items(vec![
            MealItem::new(Arc::new(zucchini), 100.0),
            MealItem::new(Arc::new(other), 50.0),
        ]);
        let plan = WeeklyPlan::new().with_meal(Weekday::Friday, MealSlot::Dinner, meal);

        let list = build_shopping_list(&plan);
        let ids: Vec<&str> = list.items().map(|i| i.food.id.as_str()).collect();
        assert_eq!(ids, vec!["zucchini-a", "zucchini-b"]);
    }
}
