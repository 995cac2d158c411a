use crate::models::FoodCategory;

/// Daily calorie goal used when none is configured.
pub const DEFAULT_DAILY_CALORIE_GOAL: f64 = 2000.0;

/// Symmetric tolerance band around a slot's calorie target (±15%).
pub const CALORIE_TOLERANCE: f64 = 0.15;

/// Slack on the calorie band edges, absorbing float error in `target * (1 ± tolerance)`.
pub const CALORIE_BAND_EPSILON: f64 = 1e-6;

/// Aggregate load above which a FODMAP family is at accumulation risk.
pub const OVERLOAD_THRESHOLD: f64 = 1.0;

/// Refinement loop budget per slot.
pub const MAX_REFINEMENT_ITERATIONS: usize = 50;

/// Fraction removed from the worst contributor on each overload step.
pub const OVERLOAD_REDUCTION_STEP: f64 = 0.10;

/// Chance that a lunch or dinner shuffle serves a soup template instead.
pub const SOUP_PROBABILITY: f64 = 0.40;

/// Floor applied to each portion when scaling a meal down for calories.
pub const MIN_SCALED_PORTION: f64 = 1.0;

/// Seed size for optimizer meals in snack slots.
pub const SNACK_ITEM_COUNT: usize = 2;

/// Seed size range for optimizer meals in main slots.
pub const MAIN_ITEM_COUNT: (usize, usize) = (3, 4);

// ─────────────────────────────────────────────────────────────────────────────
// Display thresholds
// ─────────────────────────────────────────────────────────────────────────────

/// Load percentage above which a FODMAP family is shown as moderate.
pub const LOAD_WARNING_PERCENT: f64 = 75.0;

/// Load percentage above which a FODMAP family is shown as high.
pub const LOAD_DANGER_PERCENT: f64 = 100.0;

/// Day total (as % of goal) above which the day is flagged as over.
pub const DAY_WARNING_PERCENT: f64 = 100.0;

/// Day total (as % of goal) above which the day is flagged as well over.
pub const DAY_HIGH_PERCENT: f64 = 115.0;

// ─────────────────────────────────────────────────────────────────────────────
// Search and history
// ─────────────────────────────────────────────────────────────────────────────

/// Maximum number of fuzzy search results.
pub const MAX_SEARCH_RESULTS: usize = 5;

/// Candidates scoring at or below this are dropped.
pub const MIN_SEARCH_SCORE: f64 = 0.4;

/// Bonus when the name starts with the query.
pub const PREFIX_BONUS: f64 = 1.0;

/// Bonus when the name contains the query elsewhere.
pub const SUBSTRING_BONUS: f64 = 0.5;

/// Saved meals kept in the history.
pub const MAX_HISTORY_ENTRIES: usize = 15;

// ─────────────────────────────────────────────────────────────────────────────
// Shuffle rules
// ─────────────────────────────────────────────────────────────────────────────

pub const BREAKFAST_CATEGORIES: &[FoodCategory] = &[
    FoodCategory::Protein,
    FoodCategory::Fruit,
    FoodCategory::Cereal,
    FoodCategory::Dairy,
    FoodCategory::Seeds,
    FoodCategory::Spreads,
];

pub const MAIN_MEAL_CATEGORIES: &[FoodCategory] = &[
    FoodCategory::Protein,
    FoodCategory::Vegetable,
    FoodCategory::Cereal,
    FoodCategory::Legumes,
    FoodCategory::VegetarianSubstitutes,
];

pub const SNACK_CATEGORIES: &[FoodCategory] = &[
    FoodCategory::Fruit,
    FoodCategory::Nuts,
    FoodCategory::Seeds,
    FoodCategory::Cereal,
    FoodCategory::Dairy,
    FoodCategory::Sweets,
];

pub const DEFAULT_CATEGORIES: &[FoodCategory] = &[
    FoodCategory::Protein,
    FoodCategory::Fruit,
    FoodCategory::Vegetable,
    FoodCategory::Cereal,
];
