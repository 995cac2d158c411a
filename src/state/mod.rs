mod catalog;
mod persistence;
mod session;

pub use catalog::FoodCatalog;
pub use persistence::{
    load_catalog, load_config, load_preferences, load_templates, write_plan_json,
    write_shopping_csv,
};
pub use session::{meal_name, HistoricalMeal, MealHistory, MealSession};
