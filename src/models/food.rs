use serde::{Deserialize, Deserializer, Serialize};

/// FODMAP families tracked by the planner.
///
/// Loads accumulate within a family across foods but never across families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FodmapType {
    Fructans,
    Fructose,
    Sorbitol,
    Mannitol,
    #[serde(rename = "GOS")]
    Gos,
    Lactose,
}

impl FodmapType {
    pub const ALL: [FodmapType; 6] = [
        FodmapType::Fructans,
        FodmapType::Fructose,
        FodmapType::Sorbitol,
        FodmapType::Mannitol,
        FodmapType::Gos,
        FodmapType::Lactose,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FodmapType::Fructans => "Fructans",
            FodmapType::Fructose => "Fructose",
            FodmapType::Sorbitol => "Sorbitol",
            FodmapType::Mannitol => "Mannitol",
            FodmapType::Gos => "GOS",
            FodmapType::Lactose => "Lactose",
        }
    }
}

/// Source of a fructan: fruit/vegetable or cereal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FructanGroup {
    FruitVeg,
    Cereal,
}

/// One declared FODMAP on a food.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodFodmapInfo {
    #[serde(rename = "type")]
    pub fodmap: FodmapType,

    /// Only meaningful for [`FodmapType::Fructans`].
    #[serde(
        rename = "group",
        alias = "fructanGroup",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub fructan_group: Option<FructanGroup>,
}

impl FoodFodmapInfo {
    pub fn new(fodmap: FodmapType) -> Self {
        Self {
            fodmap,
            fructan_group: None,
        }
    }

    pub fn fructans(group: FructanGroup) -> Self {
        Self {
            fodmap: FodmapType::Fructans,
            fructan_group: Some(group),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FoodCategory {
    Protein,
    Fruit,
    Vegetable,
    Cereal,
    Dairy,
    Seeds,
    Spreads,
    Nuts,
    Legumes,
    VegetarianSubstitutes,
    Sweets,
    #[serde(other)]
    Other,
}

impl FoodCategory {
    pub const ALL: [FoodCategory; 12] = [
        FoodCategory::Protein,
        FoodCategory::Fruit,
        FoodCategory::Vegetable,
        FoodCategory::Cereal,
        FoodCategory::Dairy,
        FoodCategory::Seeds,
        FoodCategory::Spreads,
        FoodCategory::Nuts,
        FoodCategory::Legumes,
        FoodCategory::VegetarianSubstitutes,
        FoodCategory::Sweets,
        FoodCategory::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FoodCategory::Protein => "Protein",
            FoodCategory::Fruit => "Fruit",
            FoodCategory::Vegetable => "Vegetable",
            FoodCategory::Cereal => "Cereal",
            FoodCategory::Dairy => "Dairy",
            FoodCategory::Seeds => "Seeds",
            FoodCategory::Spreads => "Spreads",
            FoodCategory::Nuts => "Nuts",
            FoodCategory::Legumes => "Legumes",
            FoodCategory::VegetarianSubstitutes => "Vegetarian substitutes",
            FoodCategory::Sweets => "Sweets",
            FoodCategory::Other => "Other",
        }
    }
}

/// A catalog food.
///
/// `calories_per_basis` is per 100 units for mass/volume units ("g", "ml")
/// and per single unit for count units ("unidade"). A missing or non-numeric
/// value deserializes to `None` and contributes no calories.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    pub id: String,

    pub name: String,

    pub category: FoodCategory,

    pub unit: String,

    #[serde(
        rename = "calories",
        alias = "caloriesPerBasis",
        default,
        deserialize_with = "lenient_number"
    )]
    pub calories_per_basis: Option<f64>,

    /// 0 means "no known FODMAP limit".
    #[serde(default)]
    pub safe_amount: f64,

    #[serde(default)]
    pub fodmaps: Vec<FoodFodmapInfo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| v.as_f64())
        .filter(|calories| calories.is_finite()))
}

impl FoodItem {
    /// True when the unit carries a mass or volume marker.
    #[inline]
    pub fn is_mass_or_volume(&self) -> bool {
        let unit = self.unit.to_lowercase();
        unit.contains('g') || unit.contains("ml")
    }

    #[inline]
    pub fn has_fodmaps(&self) -> bool {
        !self.fodmaps.is_empty()
    }

    /// Whether this food declares the given FODMAP family.
    pub fn declares(&self, fodmap: FodmapType) -> bool {
        self.fodmaps.iter().any(|info| info.fodmap == fodmap)
    }

    /// Portion used when a food is added without an explicit amount.
    pub fn default_portion(&self) -> f64 {
        if self.safe_amount > 0.0 {
            self.safe_amount
        } else if self.is_mass_or_volume() {
            100.0
        } else {
            1.0
        }
    }

    /// A food with declared FODMAPs needs a positive safe amount to be scored.
    pub fn is_valid(&self) -> bool {
        self.safe_amount.is_finite()
            && self.safe_amount >= 0.0
            && (self.fodmaps.is_empty() || self.safe_amount > 0.0)
    }
}

impl PartialEq for FoodItem {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FoodItem {}

impl std::hash::Hash for FoodItem {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
