use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::models::{DayPlan, FodmapType, Meal, MealItem, MealSlot, Weekday, WeeklyPlan};
use crate::planner::constants::*;

/// Aggregate load for one FODMAP family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FodmapLoad {
    pub fodmap: FodmapType,
    pub load: f64,
}

/// Per-family aggregate loads, in the order families were first encountered.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FodmapLoads {
    entries: Vec<FodmapLoad>,
}

impl FodmapLoads {
    fn add(&mut self, fodmap: FodmapType, load: f64) {
        match self.entries.iter_mut().find(|e| e.fodmap == fodmap) {
            Some(entry) => entry.load += load,
            None => self.entries.push(FodmapLoad { fodmap, load }),
        }
    }

    pub fn get(&self, fodmap: FodmapType) -> f64 {
        self.entries
            .iter()
            .find(|e| e.fodmap == fodmap)
            .map(|e| e.load)
            .unwrap_or(0.0)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FodmapLoad> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First family, in encounter order, whose load exceeds `threshold`.
    pub fn first_over(&self, threshold: f64) -> Option<FodmapType> {
        self.entries
            .iter()
            .find(|e| e.load > threshold)
            .map(|e| e.fodmap)
    }

    pub fn any_over(&self, threshold: f64) -> bool {
        self.first_over(threshold).is_some()
    }
}

/// Load ratio of a single item: portion over safe amount.
///
/// Zero when the food has no declared FODMAPs or no safe amount.
pub fn item_load(item: &MealItem) -> f64 {
    let food = &item.food;
    if food.safe_amount > 0.0 && food.has_fodmaps() {
        item.current_amount / food.safe_amount
    } else {
        0.0
    }
}

/// Result of [`calculate_fodmap_loads`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FodmapAnalysis {
    pub fodmap_loads: FodmapLoads,
    /// Percentage load per item, keyed by instance id.
    pub individual_loads: HashMap<Uuid, f64>,
}

/// Sum item loads within each declared FODMAP family.
///
/// Families never add into each other: a fructan item and a lactose item each
/// count only towards their own family.
pub fn calculate_fodmap_loads(meal: &Meal) -> FodmapAnalysis {
    let mut analysis = FodmapAnalysis::default();

    for item in meal {
        let load = item_load(item);
        analysis.individual_loads.insert(item.instance_id, load * 100.0);

        if load > 0.0 {
            for info in &item.food.fodmaps {
                analysis.fodmap_loads.add(info.fodmap, load);
            }
        }
    }

    analysis
}

/// Calories for one item.
///
/// Mass/volume units use a per-100 basis; count units use a per-unit basis.
pub fn item_calories(item: &MealItem) -> f64 {
    let Some(basis) = item.food.calories_per_basis else {
        return 0.0;
    };

    let calories = if item.food.is_mass_or_volume() {
        (item.current_amount / 100.0) * basis
    } else {
        item.current_amount * basis
    };

    if calories.is_finite() { calories } else { 0.0 }
}

/// Unrounded calorie total for a meal.
pub fn calculate_meal_calories(meal: &Meal) -> f64 {
    meal.iter().map(item_calories).sum()
}

/// Risk band for a family's aggregate load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoadStatus {
    Safe,
    Moderate,
    High,
}

impl LoadStatus {
    /// Classify an aggregate load ratio by its rounded percentage.
    pub fn classify(load: f64) -> Self {
        let percent = (load * 100.0).round();
        if percent > LOAD_DANGER_PERCENT {
            LoadStatus::High
        } else if percent > LOAD_WARNING_PERCENT {
            LoadStatus::Moderate
        } else {
            LoadStatus::Safe
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LoadStatus::Safe => "Safe",
            LoadStatus::Moderate => "Moderate",
            LoadStatus::High => "High - accumulation risk",
        }
    }
}

/// Everything a caller needs to display a meal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealSummary {
    pub fodmap_loads: FodmapLoads,
    pub individual_loads: HashMap<Uuid, f64>,
    pub total_calories: f64,
}

impl MealSummary {
    pub fn rounded_calories(&self) -> i64 {
        self.total_calories.round() as i64
    }

    /// Status per family with a positive load, in encounter order.
    pub fn load_statuses(&self) -> Vec<(FodmapType, f64, LoadStatus)> {
        self.fodmap_loads
            .iter()
            .filter(|e| e.load > 0.0)
            .map(|e| (e.fodmap, e.load, LoadStatus::classify(e.load)))
            .collect()
    }

    pub fn individual_load(&self, instance_id: Uuid) -> f64 {
        self.individual_loads
            .get(&instance_id)
            .copied()
            .unwrap_or(0.0)
    }

    pub fn has_accumulation_risk(&self) -> bool {
        self.fodmap_loads.any_over(OVERLOAD_THRESHOLD)
    }
}

pub fn summarize_meal(meal: &Meal) -> MealSummary {
    let FodmapAnalysis {
        fodmap_loads,
        individual_loads,
    } = calculate_fodmap_loads(meal);

    MealSummary {
        fodmap_loads,
        individual_loads,
        total_calories: calculate_meal_calories(meal),
    }
}

/// Calorie target for one slot with its tolerance band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalorieTarget {
    pub target: f64,
    pub tolerance: f64,
}

impl CalorieTarget {
    pub fn for_slot(slot: MealSlot, daily_goal: f64, tolerance: f64) -> Self {
        Self {
            target: daily_goal * slot.calorie_share(),
            tolerance,
        }
    }

    pub fn lower(&self) -> f64 {
        self.target * (1.0 - self.tolerance)
    }

    pub fn upper(&self) -> f64 {
        self.target * (1.0 + self.tolerance)
    }

    pub fn is_above(&self, calories: f64) -> bool {
        calories > self.upper() + CALORIE_BAND_EPSILON
    }

    pub fn is_below(&self, calories: f64) -> bool {
        calories < self.lower() - CALORIE_BAND_EPSILON
    }

    pub fn contains(&self, calories: f64) -> bool {
        !self.is_above(calories) && !self.is_below(calories)
    }
}

/// How a day's total compares with the daily goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DayCalorieStatus {
    Good,
    Warning,
    High,
}

impl DayCalorieStatus {
    pub fn classify(calories: f64, daily_goal: f64) -> Self {
        if daily_goal <= 0.0 {
            return DayCalorieStatus::Good;
        }
        let percent = calories / daily_goal * 100.0;
        if percent > DAY_HIGH_PERCENT {
            DayCalorieStatus::High
        } else if percent > DAY_WARNING_PERCENT {
            DayCalorieStatus::Warning
        } else {
            DayCalorieStatus::Good
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyTotal {
    pub day: Weekday,
    pub calories: f64,
    pub status: DayCalorieStatus,
}

pub fn day_calories(day: &DayPlan) -> f64 {
    day.iter().map(|(_, meal)| calculate_meal_calories(meal)).sum()
}

/// Totals for all seven days; unplanned days report zero.
pub fn daily_totals(plan: &WeeklyPlan, daily_goal: f64) -> Vec<DailyTotal> {
    Weekday::ALL
        .iter()
        .map(|&day| {
            let calories = plan.day(day).map(day_calories).unwrap_or(0.0);
            DailyTotal {
                day,
                calories,
                status: DayCalorieStatus::classify(calories, daily_goal),
            }
        })
        .collect()
}
