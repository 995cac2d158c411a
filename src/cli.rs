use clap::{Parser, Subcommand, ValueEnum};

use crate::models::MealSlot;
use crate::planner::assembler::ShuffleOption;
use crate::planner::search::FodmapFilter;

/// fodmap_planner: build low-FODMAP meals and weekly plans that respect
/// per-FODMAP tolerances and calorie targets.
#[derive(Parser, Debug)]
#[command(name = "fodmap_planner")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the food catalog JSON file.
    #[arg(long, default_value = "data/catalog.json", global = true)]
    pub catalog: String,

    /// Path to the meal templates JSON file.
    #[arg(long, default_value = "data/templates.json", global = true)]
    pub templates: String,

    /// Optional planner settings JSON file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Seed for reproducible shuffles and plans.
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fuzzy-search the catalog by name.
    Search {
        query: String,

        /// Restrict to foods with or without declared FODMAPs.
        #[arg(long, value_enum, default_value_t = FodmapArg::All)]
        fodmap: FodmapArg,
    },

    /// Assemble a random meal for a slot.
    Shuffle {
        #[arg(value_enum)]
        slot: ShuffleArg,
    },

    /// Expand a meal template by id.
    Template { id: String },

    /// Generate a weekly plan from slot preferences.
    Plan {
        /// Preferences JSON: slot name to list of food ids.
        #[arg(long)]
        preferences: String,

        /// Daily calorie goal (overrides the config file).
        #[arg(long)]
        daily_goal: Option<f64>,

        /// Write the plan as JSON.
        #[arg(long)]
        json: Option<String>,

        /// Write the shopping list as CSV.
        #[arg(long)]
        shopping_csv: Option<String>,
    },

    /// Build a meal interactively.
    Build,
}

impl Default for Command {
    fn default() -> Self {
        Command::Build
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FodmapArg {
    All,
    With,
    Without,
}

impl From<FodmapArg> for FodmapFilter {
    fn from(arg: FodmapArg) -> Self {
        match arg {
            FodmapArg::All => FodmapFilter::All,
            FodmapArg::With => FodmapFilter::WithFodmaps,
            FodmapArg::Without => FodmapFilter::WithoutFodmaps,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShuffleArg {
    Breakfast,
    Lunch,
    AfternoonSnack,
    Dinner,
    Snacks,
    Soup,
}

impl From<ShuffleArg> for ShuffleOption {
    fn from(arg: ShuffleArg) -> Self {
        match arg {
            ShuffleArg::Breakfast => ShuffleOption::Slot(MealSlot::Breakfast),
            ShuffleArg::Lunch => ShuffleOption::Slot(MealSlot::Lunch),
            ShuffleArg::AfternoonSnack => ShuffleOption::Slot(MealSlot::AfternoonSnack),
            ShuffleArg::Dinner => ShuffleOption::Slot(MealSlot::Dinner),
            ShuffleArg::Snacks => ShuffleOption::Slot(MealSlot::Snacks),
            ShuffleArg::Soup => ShuffleOption::Soup,
        }
    }
}
