use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateItem {
    pub food_id: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    #[default]
    Recipe,
    Soup,
}

/// A predefined meal: food ids with fixed amounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealTemplate {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Free-form grouping label (a slot name, "Soup", or a plan theme).
    #[serde(default)]
    pub category: String,

    pub items: Vec<TemplateItem>,

    #[serde(rename = "type", default)]
    pub kind: TemplateKind,
}

impl MealTemplate {
    pub fn is_soup(&self) -> bool {
        self.kind == TemplateKind::Soup
    }
}

/// The set of templates available to the assembler.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateBook {
    templates: Vec<MealTemplate>,
}

impl TemplateBook {
    pub fn new(templates: Vec<MealTemplate>) -> Self {
        Self { templates }
    }

    pub fn get(&self, id: &str) -> Option<&MealTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn soups(&self) -> Vec<&MealTemplate> {
        self.templates.iter().filter(|t| t.is_soup()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MealTemplate> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
