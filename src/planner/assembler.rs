use std::sync::Arc;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, warn};

use crate::models::{
    FoodCategory, FoodItem, FoodPreferences, Meal, MealItem, MealSlot, MealTemplate, TemplateBook,
};
use crate::planner::config::PlannerConfig;
use crate::planner::constants::*;
use crate::state::FoodCatalog;

/// What a shuffle was asked for: a slot, or the soup pseudo-slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShuffleOption {
    Slot(MealSlot),
    Soup,
}

/// Eligible categories and item-count range for a shuffle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShuffleRule {
    pub categories: &'static [FoodCategory],
    pub min_items: usize,
    pub max_items: usize,
}

pub fn shuffle_rule(option: ShuffleOption) -> ShuffleRule {
    let (categories, min_items, max_items) = match option {
        ShuffleOption::Slot(MealSlot::Breakfast) => (BREAKFAST_CATEGORIES, 2, 4),
        ShuffleOption::Slot(MealSlot::Lunch | MealSlot::Dinner) => (MAIN_MEAL_CATEGORIES, 3, 4),
        ShuffleOption::Slot(MealSlot::AfternoonSnack | MealSlot::Snacks) => {
            (SNACK_CATEGORIES, 1, 2)
        }
        ShuffleOption::Soup => (DEFAULT_CATEGORIES, 3, 4),
    };

    ShuffleRule {
        categories,
        min_items,
        max_items,
    }
}

/// Resolve a template's food ids against the catalog.
///
/// Unknown ids are skipped with a warning; the rest of the template still
/// populates the meal.
pub fn expand_template(template: &MealTemplate, catalog: &FoodCatalog) -> Meal {
    template
        .items
        .iter()
        .filter_map(|entry| match catalog.get(&entry.food_id) {
            Some(food) => Some(MealItem::new(Arc::clone(food), entry.amount)),
            None => {
                warn!(
                    template = %template.id,
                    food = %entry.food_id,
                    "template references unknown food, skipping"
                );
                None
            }
        })
        .collect()
}

/// Expand a random soup template, if any yields a non-empty meal.
fn pick_soup<R: Rng + ?Sized>(
    templates: &TemplateBook,
    catalog: &FoodCatalog,
    rng: &mut R,
) -> Option<Meal> {
    let soup = templates.soups().choose(rng).copied()?;
    let meal = expand_template(soup, catalog);

    if meal.is_empty() {
        warn!(template = %soup.id, "soup template resolved to no foods");
        None
    } else {
        debug!(template = %soup.id, "serving soup template");
        Some(meal)
    }
}

/// Randomly permute `pool` and keep the first `count` foods at default portions.
fn draw<R: Rng + ?Sized>(mut pool: Vec<Arc<FoodItem>>, count: usize, rng: &mut R) -> Meal {
    pool.shuffle(rng);
    pool.into_iter()
        .take(count)
        .map(MealItem::with_default_portion)
        .collect()
}

/// Build a random meal for a slot from the slot's eligible categories.
///
/// Lunch and dinner first flip a coin for soup substitution; a direct soup
/// request always tries a soup template and otherwise falls back to the
/// default categories. An empty pool yields an empty meal.
pub fn shuffle_meal<R: Rng + ?Sized>(
    option: ShuffleOption,
    catalog: &FoodCatalog,
    templates: &TemplateBook,
    config: &PlannerConfig,
    rng: &mut R,
) -> Meal {
    let try_soup = match option {
        ShuffleOption::Soup => true,
        ShuffleOption::Slot(MealSlot::Lunch | MealSlot::Dinner) => {
            rng.gen_bool(soup_chance(config.soup_probability))
        }
        ShuffleOption::Slot(_) => false,
    };

    if try_soup {
        if let Some(meal) = pick_soup(templates, catalog, rng) {
            return meal;
        }
    }

    let rule = shuffle_rule(option);
    let pool = catalog.in_categories(rule.categories);
    if pool.is_empty() {
        debug!(?option, "no eligible foods for shuffle");
        return Meal::new();
    }

    let count = rng.gen_range(rule.min_items..=rule.max_items);
    draw(pool, count, rng)
}

fn soup_chance(probability: f64) -> f64 {
    if probability.is_finite() {
        probability.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Foods the user pre-selected for a slot, in id order.
pub fn preference_pool(
    slot: MealSlot,
    preferences: &FoodPreferences,
    catalog: &FoodCatalog,
) -> Vec<Arc<FoodItem>> {
    preferences
        .for_slot(slot)
        .filter_map(|id| match catalog.get(id) {
            Some(food) => Some(Arc::clone(food)),
            None => {
                warn!(slot = slot.label(), food = %id, "preferred food not in catalog, skipping");
                None
            }
        })
        .collect()
}

/// Number of foods to seed an optimizer meal with.
pub fn seed_item_count<R: Rng + ?Sized>(slot: MealSlot, rng: &mut R) -> usize {
    if slot.is_snack() {
        SNACK_ITEM_COUNT
    } else {
        let (min, max) = MAIN_ITEM_COUNT;
        rng.gen_range(min..=max)
    }
}

/// Seed a candidate meal from the slot's preference pool.
///
/// Returns `None` when the pool is empty so the slot stays unplanned.
pub fn draw_from_preferences<R: Rng + ?Sized>(
    slot: MealSlot,
    preferences: &FoodPreferences,
    catalog: &FoodCatalog,
    rng: &mut R,
) -> Option<Meal> {
    let pool = preference_pool(slot, preferences, catalog);
    if pool.is_empty() {
        return None;
    }

    Some(seed_from_pool(slot, &pool, rng))
}

/// Seed a candidate meal from an already resolved pool.
pub fn seed_from_pool<R: Rng + ?Sized>(
    slot: MealSlot,
    pool: &[Arc<FoodItem>],
    rng: &mut R,
) -> Meal {
    let count = seed_item_count(slot, rng);
    draw(pool.to_vec(), count, rng)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::models::{TemplateItem, TemplateKind};

    fn food(id: &str, category: FoodCategory) -> FoodItem {
        FoodItem {
            id: id.to_string(),
            name: id.to_string(),
            category,
            unit: "g".to_string(),
            calories_per_basis: Some(100.0),
            safe_amount: 0.0,
            fodmaps: vec![],
            notes: None,
        }
    }

    fn soup_book() -> TemplateBook {
        TemplateBook::new(vec![MealTemplate {
            id: "carrot-soup".to_string(),
            name: "Carrot soup".to_string(),
            description: String::new(),
            category: "Soup".to_string(),
            items: vec![TemplateItem {
                food_id: "carrot".to_string(),
                amount: 250.0,
            }],
            kind: TemplateKind::Soup,
        }])
    }

    #[test]
    fn test_shuffle_rules() {
        let rule = shuffle_rule(ShuffleOption::Slot(MealSlot::AfternoonSnack));
        assert_eq!((rule.min_items, rule.max_items), (1, 2));
        assert_eq!(rule, shuffle_rule(ShuffleOption::Slot(MealSlot::Snacks)));
        assert_eq!(
            shuffle_rule(ShuffleOption::Soup).categories,
            DEFAULT_CATEGORIES
        );
    }

    #[test]
    fn test_soup_request_uses_soup_template() {
        let catalog = FoodCatalog::new(vec![food("carrot", FoodCategory::Vegetable)]);
        let mut rng = StdRng::seed_from_u64(7);

        let meal = shuffle_meal(
            ShuffleOption::Soup,
            &catalog,
            &soup_book(),
            &PlannerConfig::default(),
            &mut rng,
        );
        assert_eq!(meal.len(), 1);
        assert_eq!(meal.items()[0].current_amount, 250.0);
    }

    #[test]
    fn test_soup_falls_back_to_default_categories() {
        let catalog = FoodCatalog::new(vec![
            food("chicken", FoodCategory::Protein),
            food("kiwi", FoodCategory::Fruit),
            food("rice", FoodCategory::Cereal),
            food("almond", FoodCategory::Nuts),
        ]);
        let mut rng = StdRng::seed_from_u64(7);

        // soup template references a food the catalog lacks
        let meal = shuffle_meal(
            ShuffleOption::Soup,
            &catalog,
            &soup_book(),
            &PlannerConfig::default(),
            &mut rng,
        );
        assert_eq!(meal.len(), 3);
        assert!(meal.iter().all(|i| i.food.category != FoodCategory::Nuts));
    }

    #[test]
    fn test_lunch_without_soup_chance_never_serves_soup() {
        let catalog = FoodCatalog::new(vec![
            food("carrot", FoodCategory::Vegetable),
            food("chicken", FoodCategory::Protein),
            food("rice", FoodCategory::Cereal),
        ]);
        let config = PlannerConfig {
            soup_probability: 0.0,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..50 {
            let meal = shuffle_meal(
                ShuffleOption::Slot(MealSlot::Lunch),
                &catalog,
                &soup_book(),
                &config,
                &mut rng,
            );
            assert_eq!(meal.len(), 3);
            assert!(meal.iter().all(|i| i.current_amount == 100.0));
        }
    }

    #[test]
    fn test_empty_pool_gives_empty_meal() {
        let catalog = FoodCatalog::new(vec![food("almond", FoodCategory::Nuts)]);
        let mut rng = StdRng::seed_from_u64(3);

        let meal = shuffle_meal(
            ShuffleOption::Slot(MealSlot::Breakfast),
            &catalog,
            &TemplateBook::default(),
            &PlannerConfig::default(),
            &mut rng,
        );
        assert!(meal.is_empty());
    }

    #[test]
    fn test_snack_seed_count_is_two() {
        let mut rng = StdRng::seed_from_u64(11);
        assert_eq!(seed_item_count(MealSlot::Snacks, &mut rng), 2);
        for _ in 0..20 {
            let n = seed_item_count(MealSlot::Dinner, &mut rng);
            assert!((3..=4).contains(&n));
        }
    }
}
