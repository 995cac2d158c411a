use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::FoodItem;

/// One food portion inside a meal.
///
/// `instance_id` is issued fresh on every addition, so the same food can
/// appear twice in one meal under different ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealItem {
    pub instance_id: Uuid,
    pub food: Arc<FoodItem>,
    pub current_amount: f64,
}

impl MealItem {
    pub fn new(food: Arc<FoodItem>, current_amount: f64) -> Self {
        Self {
            instance_id: Uuid::new_v4(),
            food,
            current_amount,
        }
    }

    /// New item at the food's default portion.
    pub fn with_default_portion(food: Arc<FoodItem>) -> Self {
        let amount = food.default_portion();
        Self::new(food, amount)
    }

    /// Same food and amount under a new instance id.
    pub fn reissued(&self) -> Self {
        Self::new(Arc::clone(&self.food), self.current_amount)
    }

    fn with_amount(&self, current_amount: f64) -> Self {
        Self {
            instance_id: self.instance_id,
            food: Arc::clone(&self.food),
            current_amount,
        }
    }
}

/// An ordered list of meal items.
///
/// Every edit returns a new `Meal`; insertion order is preserved for display
/// and for tie-breaks between equally loaded items.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meal {
    items: Vec<MealItem>,
}

impl Meal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<MealItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[MealItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MealItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, instance_id: Uuid) -> Option<&MealItem> {
        self.items.iter().find(|i| i.instance_id == instance_id)
    }

    pub fn contains(&self, instance_id: Uuid) -> bool {
        self.get(instance_id).is_some()
    }

    /// Append an item.
    pub fn with_item(&self, item: MealItem) -> Meal {
        let mut items = self.items.clone();
        items.push(item);
        Meal { items }
    }

    /// Drop the item with the given instance id, if present.
    pub fn without(&self, instance_id: Uuid) -> Meal {
        Meal {
            items: self
                .items
                .iter()
                .filter(|i| i.instance_id != instance_id)
                .cloned()
                .collect(),
        }
    }

    /// Replace one item's amount.
    pub fn with_amount(&self, instance_id: Uuid, amount: f64) -> Meal {
        self.map_amounts(|item| {
            if item.instance_id == instance_id {
                amount
            } else {
                item.current_amount
            }
        })
    }

    /// Rebuild every item with an amount computed from the old one.
    pub fn map_amounts<F>(&self, mut f: F) -> Meal
    where
        F: FnMut(&MealItem) -> f64,
    {
        Meal {
            items: self.items.iter().map(|i| i.with_amount(f(i))).collect(),
        }
    }

    /// Drop items whose amount is no longer positive.
    pub fn pruned(&self) -> Meal {
        Meal {
            items: self
                .items
                .iter()
                .filter(|i| i.current_amount > 0.0)
                .cloned()
                .collect(),
        }
    }

    /// Same foods and amounts, all under fresh instance ids.
    pub fn reissued(&self) -> Meal {
        Meal {
            items: self.items.iter().map(MealItem::reissued).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Meal {
    type Item = &'a MealItem;
    type IntoIter = std::slice::Iter<'a, MealItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl FromIterator<MealItem> for Meal {
    fn from_iter<I: IntoIterator<Item = MealItem>>(iter: I) -> Self {
        Meal {
            items: iter.into_iter().collect(),
        }
    }
}
