pub mod assembler;
pub mod calculations;
pub mod config;
pub mod constants;
pub mod optimizer;
pub mod search;
pub mod shopping;

pub use assembler::{
    draw_from_preferences, expand_template, preference_pool, shuffle_meal, shuffle_rule,
    ShuffleOption, ShuffleRule,
};
pub use calculations::{
    calculate_fodmap_loads, calculate_meal_calories, daily_totals, item_calories, item_load,
    summarize_meal, CalorieTarget, DailyTotal, DayCalorieStatus, FodmapAnalysis, FodmapLoad,
    FodmapLoads, LoadStatus, MealSummary,
};
pub use config::{PlannerConfig, RoundingMode};
pub use constants::*;
pub use optimizer::{
    generate_weekly_plan, refine_meal, PlanReport, Refinement, RefinementOutcome, SlotReport,
};
pub use search::{search_foods, FodmapFilter, SearchHit};
pub use shopping::{build_shopping_list, ShoppingItem, ShoppingList};
