use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::models::Meal;

/// Named meal occasions within a day, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MealSlot {
    Breakfast,
    Lunch,
    AfternoonSnack,
    Dinner,
    Snacks,
}

impl MealSlot {
    pub const ALL: [MealSlot; 5] = [
        MealSlot::Breakfast,
        MealSlot::Lunch,
        MealSlot::AfternoonSnack,
        MealSlot::Dinner,
        MealSlot::Snacks,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "Breakfast",
            MealSlot::Lunch => "Lunch",
            MealSlot::AfternoonSnack => "Afternoon snack",
            MealSlot::Dinner => "Dinner",
            MealSlot::Snacks => "Snacks",
        }
    }

    /// Share of the daily calorie goal assigned to this slot.
    pub fn calorie_share(self) -> f64 {
        match self {
            MealSlot::Breakfast => 0.25,
            MealSlot::Lunch => 0.35,
            MealSlot::Dinner => 0.30,
            MealSlot::AfternoonSnack | MealSlot::Snacks => 0.05,
        }
    }

    pub fn is_snack(self) -> bool {
        matches!(self, MealSlot::AfternoonSnack | MealSlot::Snacks)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

/// Meals planned for one day.
///
/// A slot missing from the map is unplanned, which is not the same as a slot
/// holding an empty meal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayPlan {
    meals: BTreeMap<MealSlot, Meal>,
}

impl DayPlan {
    pub fn get(&self, slot: MealSlot) -> Option<&Meal> {
        self.meals.get(&slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = (MealSlot, &Meal)> {
        self.meals.iter().map(|(slot, meal)| (*slot, meal))
    }

    pub fn is_empty(&self) -> bool {
        self.meals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.meals.len()
    }

    pub fn with_meal(&self, slot: MealSlot, meal: Meal) -> DayPlan {
        let mut meals = self.meals.clone();
        meals.insert(slot, meal);
        DayPlan { meals }
    }

    pub fn without(&self, slot: MealSlot) -> DayPlan {
        let mut meals = self.meals.clone();
        meals.remove(&slot);
        DayPlan { meals }
    }
}

/// A week of day plans. A missing day is fully unplanned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklyPlan {
    days: BTreeMap<Weekday, DayPlan>,
}

impl WeeklyPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn day(&self, day: Weekday) -> Option<&DayPlan> {
        self.days.get(&day)
    }

    pub fn meal(&self, day: Weekday, slot: MealSlot) -> Option<&Meal> {
        self.day(day).and_then(|d| d.get(slot))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &DayPlan)> {
        self.days.iter().map(|(day, plan)| (*day, plan))
    }

    /// Every planned meal, in week then slot order.
    pub fn meals(&self) -> impl Iterator<Item = (Weekday, MealSlot, &Meal)> {
        self.iter()
            .flat_map(|(day, plan)| plan.iter().map(move |(slot, meal)| (day, slot, meal)))
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Store `meal` in `slot` on each of `days`. Each day gets its own
    /// instance ids so later edits to one day never alias another.
    pub fn with_meal_on(&self, days: &[Weekday], slot: MealSlot, meal: &Meal) -> WeeklyPlan {
        let mut plan = self.clone();
        for (i, day) in days.iter().enumerate() {
            let copy = if i == 0 { meal.clone() } else { meal.reissued() };
            let updated = plan.days.get(day).cloned().unwrap_or_default().with_meal(slot, copy);
            plan.days.insert(*day, updated);
        }
        plan
    }

    /// Replace the meal in one slot.
    pub fn with_meal(&self, day: Weekday, slot: MealSlot, meal: Meal) -> WeeklyPlan {
        self.with_meal_on(&[day], slot, &meal)
    }

    /// Unplan one slot; the day disappears once it has no slots left.
    pub fn without_slot(&self, day: Weekday, slot: MealSlot) -> WeeklyPlan {
        let mut plan = self.clone();
        if let Some(day_plan) = plan.days.get(&day) {
            let updated = day_plan.without(slot);
            if updated.is_empty() {
                plan.days.remove(&day);
            } else {
                plan.days.insert(day, updated);
            }
        }
        plan
    }
}

/// Foods the user marked as eligible for each slot, by catalog id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FoodPreferences {
    slots: BTreeMap<MealSlot, BTreeSet<String>>,
}

impl FoodPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_foods<I, S>(mut self, slot: MealSlot, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.slots
            .entry(slot)
            .or_default()
            .extend(ids.into_iter().map(Into::into));
        self
    }

    /// Preferred ids for a slot, in id order. Empty when the slot has none.
    pub fn for_slot(&self, slot: MealSlot) -> impl Iterator<Item = &str> {
        self.slots
            .get(&slot)
            .into_iter()
            .flat_map(|ids| ids.iter().map(String::as_str))
    }

    pub fn is_empty(&self) -> bool {
        self.slots.values().all(BTreeSet::is_empty)
    }
}
