use std::sync::Arc;

use assert_float_eq::*;

use fodmap_planner_rs::models::{FodmapType, FoodCategory, FoodFodmapInfo, FoodItem};
use fodmap_planner_rs::planner::{search_foods, FodmapFilter};

fn make_food(id: &str, name: &str, fodmaps: &[FodmapType]) -> Arc<FoodItem> {
    Arc::new(FoodItem {
        id: id.to_string(),
        name: name.to_string(),
        category: FoodCategory::Fruit,
        unit: "g".to_string(),
        calories_per_basis: Some(89.0),
        safe_amount: if fodmaps.is_empty() { 0.0 } else { 100.0 },
        fodmaps: fodmaps.iter().map(|f| FoodFodmapInfo::new(*f)).collect(),
        notes: None,
    })
}

fn sample_foods() -> Vec<Arc<FoodItem>> {
    vec![
        make_food("apple", "Maçã", &[FodmapType::Fructose, FodmapType::Sorbitol]),
        make_food("bread", "Bread", &[FodmapType::Fructans]),
        make_food("green-banana", "Green banana", &[]),
        make_food("banana-firm", "Banana, firm", &[FodmapType::Fructans]),
        make_food("banana", "Banana", &[FodmapType::Fructans]),
    ]
}

#[test]
fn test_partial_name_ranks_prefix_matches_first() {
    let foods = sample_foods();
    let hits = search_foods("banan", &foods, FodmapFilter::All);

    let ids: Vec<&str> = hits.iter().map(|h| h.food.id.as_str()).collect();
    assert_eq!(ids, vec!["banana", "banana-firm", "green-banana"]);

    // 1 - 1/6 + 1.0
    assert_float_absolute_eq!(hits[0].score, 1.0 + 5.0 / 6.0, 1e-9);
    // 1 - 7/12 + 0.5
    assert_float_absolute_eq!(hits[2].score, 0.5 + 5.0 / 12.0, 1e-9);
}

#[test]
fn test_weak_matches_are_dropped() {
    let foods = sample_foods();
    let hits = search_foods("banan", &foods, FodmapFilter::All);

    // "Maçã" scores 0.2 and "Bread" exactly 0.4
    assert!(hits.iter().all(|h| h.food.id != "apple"));
    assert!(hits.iter().all(|h| h.food.id != "bread"));
}

#[test]
fn test_query_is_case_and_whitespace_insensitive() {
    let foods = sample_foods();
    let upper = search_foods("  BANANA ", &foods, FodmapFilter::All);
    let lower = search_foods("banana", &foods, FodmapFilter::All);

    assert_eq!(upper.len(), lower.len());
    assert_eq!(upper[0].food.id, "banana");
    assert_float_absolute_eq!(upper[0].score, 2.0, 1e-9);
}

#[test]
fn test_blank_query_returns_nothing() {
    let foods = sample_foods();
    assert!(search_foods("", &foods, FodmapFilter::All).is_empty());
    assert!(search_foods("   ", &foods, FodmapFilter::All).is_empty());
}

#[test]
fn test_fodmap_prefilter() {
    let foods = sample_foods();

    let without = search_foods("banan", &foods, FodmapFilter::WithoutFodmaps);
    let ids: Vec<&str> = without.iter().map(|h| h.food.id.as_str()).collect();
    assert_eq!(ids, vec!["green-banana"]);

    let with = search_foods("banan", &foods, FodmapFilter::WithFodmaps);
    assert_eq!(with.len(), 2);
}

#[test]
fn test_results_capped_at_five_and_ties_keep_catalog_order() {
    let foods: Vec<Arc<FoodItem>> = (1..=7)
        .map(|i| make_food(&format!("rice-{}", i), &format!("Rice {}", i), &[]))
        .collect();

    let hits = search_foods("rice", &foods, FodmapFilter::All);
    let ids: Vec<&str> = hits.iter().map(|h| h.food.id.as_str()).collect();
    assert_eq!(ids, vec!["rice-1", "rice-2", "rice-3", "rice-4", "rice-5"]);
}
