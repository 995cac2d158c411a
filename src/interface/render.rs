use crate::models::{Meal, MealSlot, WeeklyPlan};
use crate::planner::calculations::{
    calculate_meal_calories, daily_totals, DayCalorieStatus, LoadStatus, MealSummary,
};
use crate::planner::optimizer::PlanReport;
use crate::planner::search::SearchHit;
use crate::planner::shopping::ShoppingList;

fn status_tag(status: LoadStatus) -> &'static str {
    match status {
        LoadStatus::Safe => "ok",
        LoadStatus::Moderate => "!",
        LoadStatus::High => "!!",
    }
}

/// Display a meal with per-item loads and per-family totals.
pub fn display_meal_summary(meal: &Meal, summary: &MealSummary) {
    println!();
    println!("=== Current Meal ===");

    if meal.is_empty() {
        println!("(empty)");
        println!();
        return;
    }

    let max_name_len = meal.iter().map(|i| i.food.name.len()).max().unwrap_or(10);

    for (i, item) in meal.iter().enumerate() {
        let load = summary.individual_load(item.instance_id);
        let load_str = if item.food.has_fodmaps() {
            format!("  load {:>3.0}%", load)
        } else {
            String::new()
        };

        println!(
            "{:>3}. {:<width$} - {:>6.0} {:<8}{}",
            i + 1,
            item.food.name,
            item.current_amount,
            item.food.unit,
            load_str,
            width = max_name_len
        );
    }

    println!();
    println!("--- FODMAP load ---");
    let statuses = summary.load_statuses();
    if statuses.is_empty() {
        println!("No FODMAPs declared.");
    }
    for (fodmap, load, status) in statuses {
        println!(
            "  {:<9} {:>4.0}%  [{}] {}",
            fodmap.label(),
            load * 100.0,
            status_tag(status),
            status.label()
        );
    }
    if summary.has_accumulation_risk() {
        println!("Warning: accumulation risk, reduce the flagged foods.");
    }

    println!("Total calories: {}", summary.rounded_calories());
    println!();
}

/// Display ranked search matches.
pub fn display_search_results(hits: &[SearchHit]) {
    if hits.is_empty() {
        println!("No matches.");
        return;
    }

    for (i, hit) in hits.iter().enumerate() {
        let fodmaps: Vec<&str> = hit.food.fodmaps.iter().map(|f| f.fodmap.label()).collect();
        let fodmap_str = if fodmaps.is_empty() {
            "no FODMAPs".to_string()
        } else {
            fodmaps.join(", ")
        };

        println!(
            "{:>2}. {} ({}) - {} [score {:.2}]",
            i + 1,
            hit.food.name,
            hit.food.category.label(),
            fodmap_str,
            hit.score
        );
    }
}

/// Display the week slot by slot, followed by day totals.
pub fn display_weekly_plan(plan: &WeeklyPlan, daily_goal: f64) {
    if plan.is_empty() {
        println!("No meals planned (no preferred foods for any slot).");
        return;
    }

    println!();
    println!("=== Weekly Plan ===");

    for (day, day_plan) in plan.iter() {
        println!();
        println!("{}", day.label());
        for slot in MealSlot::ALL {
            let Some(meal) = day_plan.get(slot) else {
                continue;
            };
            let foods: Vec<String> = meal
                .iter()
                .map(|i| format!("{} {:.0}{}", i.food.name, i.current_amount, i.food.unit))
                .collect();
            println!(
                "  {:<16} {:>5.0} cal | {}",
                slot.label(),
                calculate_meal_calories(meal),
                foods.join(", ")
            );
        }
    }

    println!();
    println!("--- Daily totals (goal {:.0}) ---", daily_goal);
    for total in daily_totals(plan, daily_goal) {
        let tag = match total.status {
            DayCalorieStatus::Good => "",
            DayCalorieStatus::Warning => "  [over goal]",
            DayCalorieStatus::High => "  [well over goal]",
        };
        println!("  {:<10} {:>5.0} cal{}", total.day.label(), total.calories, tag);
    }
    println!();
}

/// Display slots whose refinement stopped short of its targets.
pub fn display_plan_diagnostics(report: &PlanReport) {
    let unconverged: Vec<_> = report.unconverged().collect();
    if unconverged.is_empty() && report.unplanned.is_empty() {
        return;
    }

    println!("--- Notes ---");
    for slot in unconverged {
        println!(
            "  {} {}: best effort after {} iterations ({:?})",
            slot.day.label(),
            slot.slot.label(),
            slot.iterations,
            slot.outcome
        );
    }
    if !report.unplanned.is_empty() {
        println!("  {} slot(s) left unplanned", report.unplanned.len());
    }
    println!();
}

pub fn display_shopping_list(list: &ShoppingList) {
    if list.is_empty() {
        return;
    }

    println!("=== Shopping List ===");
    for (category, items) in list.groups() {
        println!("{}", category.label());
        for item in items {
            println!("  {:<24} {:>6.0} {}", item.name(), item.amount, item.unit());
        }
    }
    println!();
}
