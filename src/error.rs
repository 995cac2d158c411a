use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("Food not found: {0}")]
    FoodNotFound(String),

    #[error("Meal item not found: {0}")]
    InstanceNotFound(Uuid),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid daily calorie goal: {0}")]
    InvalidCalorieGoal(f64),
}

pub type Result<T> = std::result::Result<T, PlannerError>;
