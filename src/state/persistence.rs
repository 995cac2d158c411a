use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::models::{FoodItem, FoodPreferences, MealTemplate, TemplateBook, WeeklyPlan};
use crate::planner::config::PlannerConfig;
use crate::planner::shopping::ShoppingList;
use crate::state::FoodCatalog;

fn read_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Load the food catalog from a JSON array.
///
/// Duplicate ids collapse to the last occurrence.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<FoodCatalog> {
    let foods: Vec<FoodItem> = read_json(path)?;
    Ok(FoodCatalog::new(foods))
}

pub fn load_templates<P: AsRef<Path>>(path: P) -> Result<TemplateBook> {
    let templates: Vec<MealTemplate> = read_json(path)?;
    Ok(TemplateBook::new(templates))
}

/// Load slot preferences: `{"Lunch": ["rice", ...], ...}`.
pub fn load_preferences<P: AsRef<Path>>(path: P) -> Result<FoodPreferences> {
    read_json(path)
}

/// Load and validate planner settings; absent fields keep their defaults.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PlannerConfig> {
    let config: PlannerConfig = read_json(path)?;
    config.validate()?;
    Ok(config)
}

pub fn write_plan_json<P: AsRef<Path>>(path: P, plan: &WeeklyPlan) -> Result<()> {
    let json = serde_json::to_string_pretty(plan)?;
    fs::write(path, json)?;
    Ok(())
}

/// Write the shopping list as `category,name,amount,unit` rows.
pub fn write_shopping_csv<P: AsRef<Path>>(path: P, list: &ShoppingList) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["category", "name", "amount", "unit"])?;

    for (category, items) in list.groups() {
        for item in items {
            let amount = format!("{:.0}", item.amount);
            writer.write_record([category.label(), item.name(), amount.as_str(), item.unit()])?;
        }
    }

    writer.flush()?;
    Ok(())
}
