use std::ops::{ControlFlow, RangeInclusive};
use std::sync::Arc;

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::models::{
    FodmapType, FoodItem, FoodPreferences, Meal, MealItem, MealSlot, Weekday, WeeklyPlan,
};
use crate::planner::assembler::{preference_pool, seed_from_pool};
use crate::planner::calculations::{
    calculate_fodmap_loads, calculate_meal_calories, item_load, CalorieTarget,
};
use crate::planner::config::{PlannerConfig, RoundingMode};
use crate::planner::constants::MIN_SCALED_PORTION;
use crate::state::FoodCatalog;

/// How a slot's refinement loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RefinementOutcome {
    /// Within the calorie band with no overloaded FODMAP.
    Converged,
    /// Iteration budget spent; the meal is the last computed state.
    BudgetExhausted,
    /// Calories too low to scale from (usually zero).
    NonFiniteRatio,
    /// A family was overloaded but no item could be reduced.
    NoContributor,
}

impl RefinementOutcome {
    pub fn is_converged(self) -> bool {
        self == RefinementOutcome::Converged
    }
}

/// Final meal of a refinement loop with how it got there.
#[derive(Debug, Clone)]
pub struct Refinement {
    pub meal: Meal,
    /// Loop passes run, counting the one that accepted or stopped.
    pub iterations: usize,
    pub outcome: RefinementOutcome,
}

/// Outcome of one pass over a meal snapshot.
enum Step {
    Adjusted(Meal),
    Stop(RefinementOutcome),
}

fn settle(amount: f64, rounding: RoundingMode) -> f64 {
    match rounding {
        RoundingMode::PerStep => amount.round(),
        RoundingMode::Deferred => amount,
    }
}

/// Largest individual load among items contributing to `fodmap`.
///
/// Ties keep the earliest item.
fn worst_contributor(meal: &Meal, fodmap: FodmapType) -> Option<&MealItem> {
    // max_by keeps the last maximum, so walk backwards
    meal.iter()
        .rev()
        .filter(|item| item.food.declares(fodmap) && item_load(item) > 0.0)
        .max_by(|a, b| {
            item_load(a)
                .partial_cmp(&item_load(b))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

fn reduce_overload(
    meal: &Meal,
    fodmap: FodmapType,
    reduction_step: f64,
    rounding: RoundingMode,
) -> Step {
    let Some(worst) = worst_contributor(meal, fodmap) else {
        return Step::Stop(RefinementOutcome::NoContributor);
    };

    let reduced = settle(worst.current_amount * (1.0 - reduction_step), rounding).max(0.0);

    debug!(
        fodmap = fodmap.label(),
        food = %worst.food.id,
        from = worst.current_amount,
        to = reduced,
        "reducing worst contributor"
    );

    Step::Adjusted(meal.with_amount(worst.instance_id, reduced).pruned())
}

fn scale(meal: &Meal, ratio: f64, floor: f64, rounding: RoundingMode) -> Meal {
    meal.map_amounts(|item| settle(item.current_amount * ratio, rounding).max(floor))
        .pruned()
}

/// One pass of the refinement loop.
///
/// Overload correction always wins over calorie correction.
fn refine_step(
    meal: &Meal,
    target: &CalorieTarget,
    config: &PlannerConfig,
    rounding: RoundingMode,
) -> Step {
    let loads = calculate_fodmap_loads(meal).fodmap_loads;
    if let Some(fodmap) = loads.first_over(config.overload_threshold) {
        return reduce_overload(meal, fodmap, config.reduction_step, rounding);
    }

    let calories = calculate_meal_calories(meal);

    if target.is_above(calories) {
        let ratio = target.upper() / calories;
        debug!(calories, ratio, "scaling down for calories");
        return Step::Adjusted(scale(meal, ratio, MIN_SCALED_PORTION, rounding));
    }

    if target.is_below(calories) && target.target > 0.0 {
        let ratio = target.lower() / calories;
        if !ratio.is_finite() || ratio <= 0.0 {
            return Step::Stop(RefinementOutcome::NonFiniteRatio);
        }
        debug!(calories, ratio, "scaling up for calories");
        return Step::Adjusted(scale(meal, ratio, 0.0, rounding));
    }

    Step::Stop(RefinementOutcome::Converged)
}

/// Run refinement passes over `passes`, numbering each pass.
fn run_passes(
    meal: Meal,
    mut passes: RangeInclusive<usize>,
    target: &CalorieTarget,
    config: &PlannerConfig,
    rounding: RoundingMode,
) -> (Meal, usize, RefinementOutcome) {
    let last = *passes.end();
    let flow = passes.try_fold(meal, |meal, iteration| {
        match refine_step(&meal, target, config, rounding) {
            Step::Adjusted(next) => ControlFlow::Continue(next),
            Step::Stop(outcome) => ControlFlow::Break((meal, iteration, outcome)),
        }
    });

    match flow {
        ControlFlow::Break(stopped) => stopped,
        ControlFlow::Continue(meal) => (meal, last, RefinementOutcome::BudgetExhausted),
    }
}

/// Round every portion to a whole number.
///
/// Items of a family that nearest rounding would push over `threshold` are
/// rounded down instead, so rounding never adds load to that family.
fn round_portions(meal: &Meal, threshold: f64) -> Meal {
    let nearest = meal.map_amounts(|item| item.current_amount.round());
    let loads = calculate_fodmap_loads(&nearest).fodmap_loads;
    let over: Vec<FodmapType> = loads
        .iter()
        .filter(|entry| entry.load > threshold)
        .map(|entry| entry.fodmap)
        .collect();

    if over.is_empty() {
        return nearest.pruned();
    }

    meal.map_amounts(|item| {
        if over.iter().any(|&fodmap| item.food.declares(fodmap)) {
            item.current_amount.floor()
        } else {
            item.current_amount.round()
        }
    })
    .pruned()
}

fn fits(meal: &Meal, target: &CalorieTarget, config: &PlannerConfig) -> bool {
    matches!(
        refine_step(meal, target, config, RoundingMode::PerStep),
        Step::Stop(RefinementOutcome::Converged)
    )
}

/// Adjust portions until the meal fits its calorie band without overloading
/// any FODMAP family, or the iteration budget runs out.
///
/// Each pass rebuilds the meal; the input is never mutated. With deferred
/// rounding a converged meal is rounded and checked again; if it no longer
/// fits, the remaining budget is spent refining with per-step rounding.
pub fn refine_meal(meal: Meal, target: &CalorieTarget, config: &PlannerConfig) -> Refinement {
    let max = config.max_iterations;
    let (meal, iterations, outcome) = run_passes(meal, 1..=max, target, config, config.rounding);

    if config.rounding == RoundingMode::PerStep {
        return Refinement {
            meal,
            iterations,
            outcome,
        };
    }

    let rounded = round_portions(&meal, config.overload_threshold);
    if !outcome.is_converged() || fits(&rounded, target, config) {
        return Refinement {
            meal: rounded,
            iterations,
            outcome,
        };
    }

    debug!(iterations, "rounded meal left its target, refining per step");
    let (meal, iterations, outcome) = run_passes(
        rounded,
        iterations + 1..=max,
        target,
        config,
        RoundingMode::PerStep,
    );

    Refinement {
        meal,
        iterations,
        outcome,
    }
}

/// Refinement result for one planned slot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotReport {
    pub day: Weekday,
    pub slot: MealSlot,
    pub iterations: usize,
    pub outcome: RefinementOutcome,
    pub calories: f64,
}

/// A generated plan with per-slot diagnostics.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanReport {
    pub plan: WeeklyPlan,
    pub slots: Vec<SlotReport>,
    /// Slots skipped because the user selected no usable foods for them.
    pub unplanned: Vec<(Weekday, MealSlot)>,
}

impl PlanReport {
    /// Slots that ended without converging.
    pub fn unconverged(&self) -> impl Iterator<Item = &SlotReport> {
        self.slots.iter().filter(|s| !s.outcome.is_converged())
    }
}

/// Build a week of meals from the user's preferred foods.
///
/// Every slot is seeded from its preference pool and refined independently;
/// slots with an empty pool stay unplanned.
pub fn generate_weekly_plan<R: Rng + ?Sized>(
    catalog: &FoodCatalog,
    preferences: &FoodPreferences,
    config: &PlannerConfig,
    rng: &mut R,
) -> PlanReport {
    let pools: Vec<(MealSlot, Vec<Arc<FoodItem>>)> = MealSlot::ALL
        .iter()
        .map(|&slot| (slot, preference_pool(slot, preferences, catalog)))
        .collect();

    let mut report = PlanReport::default();

    for &day in &Weekday::ALL {
        for (slot, pool) in &pools {
            let slot = *slot;
            if pool.is_empty() {
                report.unplanned.push((day, slot));
                continue;
            }

            let target =
                CalorieTarget::for_slot(slot, config.daily_calorie_goal, config.calorie_tolerance);
            let seed = seed_from_pool(slot, pool, rng);
            let refinement = refine_meal(seed, &target, config);
            let calories = calculate_meal_calories(&refinement.meal);

            if !refinement.outcome.is_converged() {
                warn!(
                    day = day.label(),
                    slot = slot.label(),
                    iterations = refinement.iterations,
                    outcome = ?refinement.outcome,
                    calories,
                    target = target.target,
                    "slot refinement did not converge"
                );
            }

            report.slots.push(SlotReport {
                day,
                slot,
                iterations: refinement.iterations,
                outcome: refinement.outcome,
                calories,
            });

            if !refinement.meal.is_empty() {
                report.plan = report.plan.with_meal(day, slot, refinement.meal);
            }
        }
    }

    info!(
        planned = report.slots.len(),
        unplanned = report.unplanned.len(),
        unconverged = report.unconverged().count(),
        "weekly plan generated"
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FoodCategory, FoodFodmapInfo};
    use crate::planner::constants::OVERLOAD_REDUCTION_STEP;

    fn item(id: &str, safe: f64, calories: f64, amount: f64, fodmaps: &[FodmapType]) -> MealItem {
        MealItem::new(
            Arc::new(FoodItem {
                id: id.to_string(),
                name: id.to_string(),
                category: FoodCategory::Other,
                unit: "g".to_string(),
                calories_per_basis: Some(calories),
                safe_amount: safe,
                fodmaps: fodmaps.iter().map(|f| FoodFodmapInfo::new(*f)).collect(),
                notes: None,
            }),
            amount,
        )
    }

    #[test]
    fn test_worst_contributor_prefers_first_on_tie() {
        let first = item("a", 100.0, 0.0, 60.0, &[FodmapType::Fructose]);
        let second = item("b", 100.0, 0.0, 60.0, &[FodmapType::Fructose]);
        let first_id = first.instance_id;
        let meal = Meal::from_items(vec![first, second]);

        let worst = worst_contributor(&meal, FodmapType::Fructose).unwrap();
        assert_eq!(worst.instance_id, first_id);
    }

    #[test]
    fn test_overload_reduces_only_the_worst_item() {
        let small = item("a", 100.0, 0.0, 40.0, &[FodmapType::Lactose]);
        let large = item("b", 100.0, 0.0, 80.0, &[FodmapType::Lactose]);
        let meal = Meal::from_items(vec![small, large]);

        let step = reduce_overload(
            &meal,
            FodmapType::Lactose,
            OVERLOAD_REDUCTION_STEP,
            RoundingMode::Deferred,
        );
        let Step::Adjusted(next) = step else {
            panic!("expected an adjustment");
        };
        assert_eq!(next.items()[0].current_amount, 40.0);
        assert!((next.items()[1].current_amount - 72.0).abs() < 1e-9);
    }

    #[test]
    fn test_overload_without_contributor_stops() {
        let meal = Meal::from_items(vec![item("a", 100.0, 0.0, 80.0, &[FodmapType::Lactose])]);
        let step = reduce_overload(
            &meal,
            FodmapType::Sorbitol,
            OVERLOAD_REDUCTION_STEP,
            RoundingMode::Deferred,
        );
        assert!(matches!(
            step,
            Step::Stop(RefinementOutcome::NoContributor)
        ));
    }

    #[test]
    fn test_over_calorie_scaling_floors_at_one() {
        let meal = Meal::from_items(vec![
            item("oil", 0.0, 900.0, 100.0, &[]),
            item("salt", 0.0, 0.0, 1.0, &[]),
        ]);
        let scaled = scale(&meal, 0.1, MIN_SCALED_PORTION, RoundingMode::PerStep);
        assert_eq!(scaled.items()[0].current_amount, 10.0);
        assert_eq!(scaled.items()[1].current_amount, 1.0);
    }

    #[test]
    fn test_zero_budget_returns_seed() {
        let meal = Meal::from_items(vec![item("a", 0.0, 100.0, 100.0, &[])]);
        let config = PlannerConfig {
            max_iterations: 0,
            ..Default::default()
        };
        let target = CalorieTarget::for_slot(MealSlot::Lunch, 2000.0, 0.15);

        let refinement = refine_meal(meal, &target, &config);
        assert_eq!(refinement.iterations, 0);
        assert_eq!(refinement.outcome, RefinementOutcome::BudgetExhausted);
        assert_eq!(refinement.meal.items()[0].current_amount, 100.0);
    }

    #[test]
    fn test_rounding_never_overloads_a_family() {
        let meal = Meal::from_items(vec![
            item("a", 100.0, 100.0, 33.5, &[FodmapType::Fructose]),
            item("b", 100.0, 100.0, 33.5, &[FodmapType::Fructose]),
            item("c", 100.0, 100.0, 33.0, &[FodmapType::Fructose]),
            item("d", 0.0, 100.0, 20.6, &[]),
        ]);

        let rounded = round_portions(&meal, 1.0);
        let amounts: Vec<f64> = rounded.iter().map(|i| i.current_amount).collect();
        assert_eq!(amounts, vec![33.0, 33.0, 33.0, 21.0]);
        assert!(!calculate_fodmap_loads(&rounded).fodmap_loads.any_over(1.0));
    }

    #[test]
    fn test_rounding_to_nearest_when_safe() {
        let meal = Meal::from_items(vec![
            item("a", 100.0, 100.0, 40.5, &[FodmapType::Lactose]),
            item("b", 0.0, 100.0, 0.4, &[]),
        ]);

        let rounded = round_portions(&meal, 1.0);
        assert_eq!(rounded.len(), 1);
        assert_eq!(rounded.items()[0].current_amount, 41.0);
    }
}
