use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::planner::constants::*;

/// When portions are rounded to whole units during refinement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoundingMode {
    /// Carry fractional amounts through the loop, round once at commit.
    #[default]
    Deferred,
    /// Round every scaled portion to the nearest integer immediately.
    PerStep,
}

/// Tunable parameters for the assembler and weekly optimizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub daily_calorie_goal: f64,
    pub calorie_tolerance: f64,
    pub overload_threshold: f64,
    pub max_iterations: usize,
    pub reduction_step: f64,
    pub soup_probability: f64,
    pub rounding: RoundingMode,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            daily_calorie_goal: DEFAULT_DAILY_CALORIE_GOAL,
            calorie_tolerance: CALORIE_TOLERANCE,
            overload_threshold: OVERLOAD_THRESHOLD,
            max_iterations: MAX_REFINEMENT_ITERATIONS,
            reduction_step: OVERLOAD_REDUCTION_STEP,
            soup_probability: SOUP_PROBABILITY,
            rounding: RoundingMode::default(),
        }
    }
}

impl PlannerConfig {
    pub fn with_daily_goal(mut self, goal: f64) -> Self {
        self.daily_calorie_goal = goal;
        self
    }

    /// Reject goals and fractions the optimizer cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !self.daily_calorie_goal.is_finite() || self.daily_calorie_goal <= 0.0 {
            return Err(PlannerError::InvalidCalorieGoal(self.daily_calorie_goal));
        }

        check_fraction("calorie_tolerance", self.calorie_tolerance, false)?;
        // a zero step would never shrink an overloaded item
        check_fraction("reduction_step", self.reduction_step, false)?;
        check_fraction("soup_probability", self.soup_probability, true)?;

        if !self.overload_threshold.is_finite() || self.overload_threshold <= 0.0 {
            return Err(PlannerError::InvalidInput(format!(
                "overload_threshold must be positive, got {}",
                self.overload_threshold
            )));
        }

        Ok(())
    }
}

fn check_fraction(name: &str, value: f64, allow_zero: bool) -> Result<()> {
    let lower_ok = if allow_zero { value >= 0.0 } else { value > 0.0 };

    if value.is_finite() && lower_ok && value <= 1.0 {
        Ok(())
    } else {
        Err(PlannerError::InvalidInput(format!(
            "{} out of range: {}",
            name, value
        )))
    }
}
