pub mod prompts;
pub mod render;

pub use prompts::{
    add_foods_loop, prompt_food_query, prompt_pick_food, prompt_portion, prompt_yes_no,
    run_meal_builder,
};
pub use render::{
    display_meal_summary, display_plan_diagnostics, display_search_results,
    display_shopping_list, display_weekly_plan,
};
