use std::sync::Arc;

use strsim::levenshtein;

use crate::models::FoodItem;
use crate::planner::constants::{
    MAX_SEARCH_RESULTS, MIN_SEARCH_SCORE, PREFIX_BONUS, SUBSTRING_BONUS,
};

/// Optional pre-filter on whether a food declares any FODMAP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FodmapFilter {
    #[default]
    All,
    WithFodmaps,
    WithoutFodmaps,
}

impl FodmapFilter {
    pub fn accepts(self, food: &FoodItem) -> bool {
        match self {
            FodmapFilter::All => true,
            FodmapFilter::WithFodmaps => food.has_fodmaps(),
            FodmapFilter::WithoutFodmaps => !food.has_fodmaps(),
        }
    }
}

/// A ranked search result.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub food: Arc<FoodItem>,
    pub score: f64,
}

/// Normalized Levenshtein similarity in [0, 1], over characters.
pub fn name_similarity(query: &str, name: &str) -> f64 {
    let longest = query.chars().count().max(name.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein(query, name) as f64 / longest as f64
}

/// Relevance of `name` for an already trimmed, lower-cased query.
///
/// Prefix and substring bonuses are mutually exclusive.
pub fn match_score(query: &str, name: &str) -> f64 {
    let name = name.to_lowercase();
    let similarity = name_similarity(query, &name);

    let bonus = if name.starts_with(query) {
        PREFIX_BONUS
    } else if name.contains(query) {
        SUBSTRING_BONUS
    } else {
        0.0
    };

    similarity + bonus
}

/// Rank foods against free text.
///
/// Returns at most five hits with score above 0.4, best first. Ties keep
/// catalog order. A blank query returns nothing.
pub fn search_foods<'a, I>(query: &str, foods: I, filter: FodmapFilter) -> Vec<SearchHit>
where
    I: IntoIterator<Item = &'a Arc<FoodItem>>,
{
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let mut hits: Vec<SearchHit> = foods
        .into_iter()
        .filter(|food| filter.accepts(food))
        .map(|food| SearchHit {
            food: Arc::clone(food),
            score: match_score(&query, &food.name),
        })
        .filter(|hit| hit.score > MIN_SEARCH_SCORE)
        .collect();

    // sort_by is stable, so equal scores stay in catalog order
    hits.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    hits.truncate(MAX_SEARCH_RESULTS);
    hits
}
