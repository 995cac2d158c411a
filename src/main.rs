use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use fodmap_planner_rs::cli::{Cli, Command, FodmapArg, ShuffleArg};
use fodmap_planner_rs::error::{PlannerError, Result};
use fodmap_planner_rs::interface::{
    display_meal_summary, display_plan_diagnostics, display_search_results,
    display_shopping_list, display_weekly_plan, run_meal_builder,
};
use fodmap_planner_rs::logging::init_logging;
use fodmap_planner_rs::planner::{
    build_shopping_list, expand_template, generate_weekly_plan, search_foods, shuffle_meal,
    summarize_meal, PlannerConfig,
};
use fodmap_planner_rs::state::{
    load_catalog, load_config, load_preferences, load_templates, write_plan_json,
    write_shopping_csv, FoodCatalog,
};
use fodmap_planner_rs::TemplateBook;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => PlannerConfig::default(),
    };
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let catalog = load_catalog(&cli.catalog)?;
    info!(foods = catalog.len(), path = %cli.catalog, "catalog loaded");

    match cli.command.unwrap_or_default() {
        Command::Search { query, fodmap } => cmd_search(&catalog, &query, fodmap),
        Command::Shuffle { slot } => {
            let templates = load_templates_or_empty(&cli.templates)?;
            cmd_shuffle(&catalog, &templates, &config, slot, &mut rng)
        }
        Command::Template { id } => {
            let templates = load_templates(&cli.templates)?;
            cmd_template(&catalog, &templates, &id)
        }
        Command::Plan {
            preferences,
            daily_goal,
            json,
            shopping_csv,
        } => {
            let config = match daily_goal {
                Some(goal) => config.with_daily_goal(goal),
                None => config,
            };
            config.validate()?;
            cmd_plan(
                &catalog,
                &config,
                &preferences,
                json.as_deref(),
                shopping_csv.as_deref(),
                &mut rng,
            )
        }
        Command::Build => {
            let templates = load_templates_or_empty(&cli.templates)?;
            cmd_build(&catalog, &templates, &config, &mut rng)
        }
    }
}

/// Templates are optional for commands that only use them for soups.
fn load_templates_or_empty(path: &str) -> Result<TemplateBook> {
    if std::path::Path::new(path).exists() {
        load_templates(path)
    } else {
        info!(path, "no templates file, continuing without templates");
        Ok(TemplateBook::default())
    }
}

/// Print the best matches for a query.
fn cmd_search(catalog: &FoodCatalog, query: &str, fodmap: FodmapArg) -> Result<()> {
    let hits = search_foods(query, catalog.iter(), fodmap.into());
    display_search_results(&hits);
    Ok(())
}

/// Assemble and print a random meal.
fn cmd_shuffle(
    catalog: &FoodCatalog,
    templates: &TemplateBook,
    config: &PlannerConfig,
    slot: ShuffleArg,
    rng: &mut StdRng,
) -> Result<()> {
    let meal = shuffle_meal(slot.into(), catalog, templates, config, rng);
    if meal.is_empty() {
        println!("No eligible foods for this meal.");
        return Ok(());
    }
    display_meal_summary(&meal, &summarize_meal(&meal));
    Ok(())
}

/// Expand a template and print it.
fn cmd_template(catalog: &FoodCatalog, templates: &TemplateBook, id: &str) -> Result<()> {
    let template = templates
        .get(id)
        .ok_or_else(|| PlannerError::InvalidInput(format!("Unknown template: {}", id)))?;

    println!("{}", template.name);
    if !template.description.is_empty() {
        println!("{}", template.description);
    }

    let meal = expand_template(template, catalog);
    display_meal_summary(&meal, &summarize_meal(&meal));
    Ok(())
}

/// Generate a weekly plan, print it and optionally export it.
fn cmd_plan(
    catalog: &FoodCatalog,
    config: &PlannerConfig,
    preferences_path: &str,
    json_out: Option<&str>,
    csv_out: Option<&str>,
    rng: &mut StdRng,
) -> Result<()> {
    let preferences = load_preferences(preferences_path)?;
    if preferences.is_empty() {
        println!("No preferred foods selected; nothing to plan.");
        return Ok(());
    }

    println!(
        "Planning a week at {:.0} calories per day...",
        config.daily_calorie_goal
    );

    let report = generate_weekly_plan(catalog, &preferences, config, rng);

    display_weekly_plan(&report.plan, config.daily_calorie_goal);
    display_plan_diagnostics(&report);

    let shopping = build_shopping_list(&report.plan);
    display_shopping_list(&shopping);

    if let Some(path) = json_out {
        write_plan_json(path, &report.plan)?;
        println!("Plan written to {}", path);
    }
    if let Some(path) = csv_out {
        write_shopping_csv(path, &shopping)?;
        println!("Shopping list written to {}", path);
    }

    Ok(())
}

/// Run the interactive builder and print the final meal.
fn cmd_build(
    catalog: &FoodCatalog,
    templates: &TemplateBook,
    config: &PlannerConfig,
    rng: &mut StdRng,
) -> Result<()> {
    if catalog.is_empty() {
        println!("The catalog is empty.");
        return Ok(());
    }

    println!("Loaded {} foods", catalog.len());
    let session = run_meal_builder(catalog, templates, config, rng)?;

    if !session.meal().is_empty() {
        println!("Final meal:");
        display_meal_summary(session.meal(), &session.summary());
    }
    Ok(())
}
