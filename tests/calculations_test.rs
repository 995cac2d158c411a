use std::sync::Arc;

use assert_float_eq::*;

use fodmap_planner_rs::models::{
    FodmapType, FoodCategory, FoodFodmapInfo, FoodItem, Meal, MealItem, MealSlot, Weekday,
    WeeklyPlan,
};
use fodmap_planner_rs::planner::{
    calculate_fodmap_loads, calculate_meal_calories, daily_totals, summarize_meal,
    DayCalorieStatus, LoadStatus,
};

fn make_food(
    id: &str,
    unit: &str,
    calories: Option<f64>,
    safe: f64,
    fodmaps: &[FodmapType],
) -> Arc<FoodItem> {
    Arc::new(FoodItem {
        id: id.to_string(),
        name: id.to_string(),
        category: FoodCategory::Other,
        unit: unit.to_string(),
        calories_per_basis: calories,
        safe_amount: safe,
        fodmaps: fodmaps.iter().map(|f| FoodFodmapInfo::new(*f)).collect(),
        notes: None,
    })
}

#[test]
fn test_loads_accumulate_within_a_type_only() {
    let a = MealItem::new(make_food("a", "g", Some(50.0), 100.0, &[FodmapType::Fructans]), 50.0);
    let b = MealItem::new(make_food("b", "g", Some(50.0), 100.0, &[FodmapType::Fructans]), 70.0);
    let c = MealItem::new(make_food("c", "g", Some(50.0), 100.0, &[FodmapType::Lactose]), 90.0);
    let (a_id, c_id) = (a.instance_id, c.instance_id);
    let meal = Meal::from_items(vec![a, b, c]);

    let analysis = calculate_fodmap_loads(&meal);
    assert_float_absolute_eq!(analysis.fodmap_loads.get(FodmapType::Fructans), 1.2, 1e-9);
    assert_float_absolute_eq!(analysis.fodmap_loads.get(FodmapType::Lactose), 0.9, 1e-9);
    assert_eq!(analysis.fodmap_loads.first_over(1.0), Some(FodmapType::Fructans));

    assert_float_absolute_eq!(analysis.individual_loads[&a_id], 50.0, 1e-9);
    assert_float_absolute_eq!(analysis.individual_loads[&c_id], 90.0, 1e-9);

    let summary = summarize_meal(&meal);
    assert!(summary.has_accumulation_risk());
    let statuses = summary.load_statuses();
    assert_eq!(statuses[0].0, FodmapType::Fructans);
    assert_eq!(statuses[0].2, LoadStatus::High);
    assert_eq!(statuses[1].2, LoadStatus::Moderate);
}

#[test]
fn test_multi_type_food_counts_towards_each_type() {
    let oats = MealItem::new(
        make_food("oats", "g", Some(389.0), 50.0, &[FodmapType::Fructans, FodmapType::Gos]),
        25.0,
    );
    let meal = Meal::from_items(vec![oats]);

    let loads = calculate_fodmap_loads(&meal).fodmap_loads;
    assert_float_absolute_eq!(loads.get(FodmapType::Fructans), 0.5, 1e-9);
    assert_float_absolute_eq!(loads.get(FodmapType::Gos), 0.5, 1e-9);
    assert_eq!(loads.get(FodmapType::Sorbitol), 0.0);
}

#[test]
fn test_calorie_basis_by_unit() {
    let rice = MealItem::new(make_food("rice", "g", Some(130.0), 0.0, &[]), 200.0);
    let milk = MealItem::new(make_food("milk", "ml", Some(42.0), 0.0, &[]), 250.0);
    let egg = MealItem::new(make_food("egg", "unidade", Some(80.0), 0.0, &[]), 2.0);
    let unknown = MealItem::new(make_food("mystery", "g", None, 0.0, &[]), 500.0);

    let meal = Meal::from_items(vec![rice, milk, egg, unknown]);
    // 260 + 105 + 160 + 0
    assert_float_absolute_eq!(calculate_meal_calories(&meal), 525.0, 1e-9);
}

#[test]
fn test_calories_are_not_rounded_internally() {
    let item = MealItem::new(make_food("x", "g", Some(33.0), 0.0, &[]), 1.0);
    let meal = Meal::from_items(vec![item]);

    let summary = summarize_meal(&meal);
    assert_float_absolute_eq!(summary.total_calories, 0.33, 1e-9);
    assert_eq!(summary.rounded_calories(), 0);
}

#[test]
fn test_calculators_are_pure() {
    let kiwi = make_food("kiwi", "g", Some(61.0), 150.0, &[FodmapType::Fructose]);
    let item = MealItem::new(kiwi, 75.0);
    let meal = Meal::from_items(vec![item]);

    let first = summarize_meal(&meal);
    let second = summarize_meal(&meal);
    assert_eq!(first, second);
    assert_eq!(meal.items()[0].current_amount, 75.0);
}

#[test]
fn test_daily_totals_cover_the_whole_week() {
    let food = make_food("rice", "g", Some(100.0), 0.0, &[]);
    let big = Meal::from_items(vec![MealItem::new(Arc::clone(&food), 2200.0)]);
    let small = Meal::from_items(vec![MealItem::new(Arc::clone(&food), 500.0)]);

    let plan = WeeklyPlan::new()
        .with_meal(Weekday::Monday, MealSlot::Lunch, big)
        .with_meal(Weekday::Tuesday, MealSlot::Dinner, small);

    let totals = daily_totals(&plan, 2000.0);
    assert_eq!(totals.len(), 7);
    assert_eq!(totals[0].status, DayCalorieStatus::Warning);
    assert_float_absolute_eq!(totals[1].calories, 500.0, 1e-9);
    assert_eq!(totals[1].status, DayCalorieStatus::Good);
    assert_eq!(totals[6].calories, 0.0);
}
