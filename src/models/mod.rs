pub mod food;
pub mod meal;
pub mod plan;
pub mod template;

pub use food::{FodmapType, FoodCategory, FoodFodmapInfo, FoodItem, FructanGroup};
pub use meal::{Meal, MealItem};
pub use plan::{DayPlan, FoodPreferences, MealSlot, Weekday, WeeklyPlan};
pub use template::{MealTemplate, TemplateBook, TemplateItem, TemplateKind};
