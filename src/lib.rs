pub mod cli;
pub mod error;
pub mod interface;
pub mod logging;
pub mod models;
pub mod planner;
pub mod state;

pub use error::{PlannerError, Result};
pub use models::{FoodItem, FoodPreferences, Meal, MealItem, MealSlot, TemplateBook, WeeklyPlan};
pub use state::FoodCatalog;
