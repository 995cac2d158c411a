use std::sync::Arc;

use dialoguer::{Confirm, Input, Select};
use rand::Rng;
use uuid::Uuid;

use crate::error::{PlannerError, Result};
use crate::interface::render::{display_meal_summary, display_search_results};
use crate::models::{FoodItem, MealSlot, TemplateBook};
use crate::planner::assembler::{shuffle_meal, ShuffleOption};
use crate::planner::config::PlannerConfig;
use crate::planner::search::{search_foods, FodmapFilter, SearchHit};
use crate::state::{FoodCatalog, MealHistory, MealSession};

/// Prompt for a search query; `None` when the user enters nothing.
pub fn prompt_food_query() -> Result<Option<String>> {
    let input: String = Input::new()
        .with_prompt("Search for a food (or press Enter to finish)")
        .allow_empty(true)
        .interact_text()?;

    let input = input.trim();
    Ok(if input.is_empty() {
        None
    } else {
        Some(input.to_string())
    })
}

/// Let the user pick one of the ranked matches.
pub fn prompt_pick_food(hits: &[SearchHit]) -> Result<Option<Arc<FoodItem>>> {
    let mut options: Vec<String> = hits
        .iter()
        .map(|h| format!("{} ({})", h.food.name, h.food.category.label()))
        .collect();
    options.push("None of these".to_string());

    let selection = Select::new()
        .with_prompt("Which did you mean?")
        .items(&options)
        .default(0)
        .interact()?;

    Ok(hits.get(selection).map(|h| Arc::clone(&h.food)))
}

/// Prompt for a portion in the food's unit.
pub fn prompt_portion(food: &FoodItem, default: f64) -> Result<f64> {
    let input: String = Input::new()
        .with_prompt(format!("Portion of '{}' ({})", food.name, food.unit))
        .default(format!("{}", default))
        .interact_text()?;

    let amount: f64 = input
        .trim()
        .parse()
        .map_err(|_| PlannerError::InvalidInput("Invalid number".to_string()))?;

    if !amount.is_finite() || amount < 0.0 {
        return Err(PlannerError::InvalidInput(
            "Portion must be zero or more".to_string(),
        ));
    }

    Ok(amount)
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

/// Search, pick and portion foods until the user enters an empty query.
pub fn add_foods_loop(
    session: &mut MealSession,
    catalog: &FoodCatalog,
    filter: FodmapFilter,
) -> Result<()> {
    while let Some(query) = prompt_food_query()? {
        let hits = search_foods(&query, catalog.iter(), filter);
        if hits.is_empty() {
            println!("No matching food found for '{}'", query);
            continue;
        }

        display_search_results(&hits);
        let Some(food) = prompt_pick_food(&hits)? else {
            continue;
        };

        let portion = prompt_portion(&food, food.default_portion())?;
        let id = session.add_food(Arc::clone(&food));
        session.update_amount(id, portion)?;
        println!("Added: {}", food.name);
    }
    Ok(())
}

fn select_item(session: &MealSession, prompt: &str) -> Result<Option<Uuid>> {
    let items = session.meal().items();
    if items.is_empty() {
        println!("The meal is empty.");
        return Ok(None);
    }

    let options: Vec<String> = items
        .iter()
        .map(|i| format!("{} - {} {}", i.food.name, i.current_amount, i.food.unit))
        .collect();

    let selection = Select::new()
        .with_prompt(prompt)
        .items(&options)
        .default(0)
        .interact()?;

    Ok(items.get(selection).map(|i| i.instance_id))
}

fn prompt_shuffle_option() -> Result<ShuffleOption> {
    let mut options: Vec<&str> = MealSlot::ALL.iter().map(|s| s.label()).collect();
    options.push("Soup");

    let selection = Select::new()
        .with_prompt("Shuffle which meal?")
        .items(&options)
        .default(0)
        .interact()?;

    Ok(MealSlot::ALL
        .get(selection)
        .map(|&slot| ShuffleOption::Slot(slot))
        .unwrap_or(ShuffleOption::Soup))
}

const BUILDER_ACTIONS: [&str; 9] = [
    "Add foods",
    "Change a portion",
    "Remove a food",
    "Load a template",
    "Shuffle a meal",
    "Save to history",
    "Load from history",
    "Clear meal",
    "Done",
];

/// Interactive meal builder.
///
/// History lives for the duration of the session only.
pub fn run_meal_builder<R: Rng + ?Sized>(
    catalog: &FoodCatalog,
    templates: &TemplateBook,
    config: &PlannerConfig,
    rng: &mut R,
) -> Result<MealSession> {
    let mut session = MealSession::new();
    let mut history = MealHistory::new();

    loop {
        display_meal_summary(session.meal(), &session.summary());

        let action = Select::new()
            .with_prompt("What next?")
            .items(&BUILDER_ACTIONS)
            .default(0)
            .interact()?;

        match action {
            0 => add_foods_loop(&mut session, catalog, FodmapFilter::All)?,
            1 => {
                let picked = select_item(&session, "Change which portion?")?;
                if let Some(item) = picked.and_then(|id| session.meal().get(id).cloned()) {
                    let amount = prompt_portion(&item.food, item.current_amount)?;
                    session.update_amount(item.instance_id, amount)?;
                }
            }
            2 => {
                if let Some(id) = select_item(&session, "Remove which food?")? {
                    session.remove(id)?;
                }
            }
            3 => {
                if templates.is_empty() {
                    println!("No templates loaded.");
                    continue;
                }
                let names: Vec<&str> = templates.iter().map(|t| t.name.as_str()).collect();
                let selection = Select::new()
                    .with_prompt("Which template?")
                    .items(&names)
                    .default(0)
                    .interact()?;
                if let Some(template) = templates.iter().nth(selection) {
                    session.load_template(template, catalog);
                }
            }
            4 => {
                let option = prompt_shuffle_option()?;
                session.load_meal(shuffle_meal(option, catalog, templates, config, rng));
            }
            5 => match history.record(session.meal()) {
                Some(_) => println!("Saved. {} meal(s) in history.", history.len()),
                None => println!("Nothing to save."),
            },
            6 => {
                if history.is_empty() {
                    println!("History is empty.");
                    continue;
                }
                let names: Vec<&str> = history.iter().map(|h| h.name.as_str()).collect();
                let selection = Select::new()
                    .with_prompt("Load which meal?")
                    .items(&names)
                    .default(0)
                    .interact()?;
                let id = history.iter().nth(selection).map(|h| h.id);
                if let Some(meal) = id.and_then(|id| history.load(id)) {
                    session.load_meal(meal);
                }
            }
            7 => {
                if prompt_yes_no("Clear the current meal?", false)? {
                    session.clear();
                }
            }
            _ => break,
        }
    }

    Ok(session)
}
