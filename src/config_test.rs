use crate::engine::{AddressField, CategoryMode, MatchMode, SortOrder};
use crate::error::QueryError;
use crate::loader::ColumnMapping;
use crate::sampling::{OnInsufficient, SamplePolicy};
use crate::types::PlaceType;

use super::DashboardConfig;

const SHIPPED_CONFIG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/config/dashboard.toml");

#[test]
fn test_defaults_are_valid() {
    let config = DashboardConfig::default();
    config.validate().unwrap();
    assert_eq!(config.regions.len(), 17);
    assert_eq!(config.search.title_order, SortOrder::Descending);
    assert_eq!(config.search.title_match, MatchMode::Exact);
    assert_eq!(config.search.recommendation_title_match, MatchMode::Substring);
    assert_eq!(config.sample, SamplePolicy::three_of_at_least_three());
}

#[test]
fn test_shipped_config_matches_defaults_except_columns() {
    let config = DashboardConfig::load(SHIPPED_CONFIG).unwrap();
    let defaults = DashboardConfig::default();

    assert_eq!(config.columns, ColumnMapping::korean());
    assert_eq!(config.regions, defaults.regions);
    assert_eq!(config.palette, defaults.palette);
    assert_eq!(config.map, defaults.map);
    assert_eq!(config.search, defaults.search);
    assert_eq!(config.categories, CategoryMode::FixedOrder);
}

#[test]
fn test_partial_config_falls_back_to_defaults() {
    let config = DashboardConfig::from_toml_str(
        r#"
        regions = ["경기", "서울"]

        [sample]
        sample_size = 5
        on_insufficient = "return_all"

        [search]
        address_field = "detail_address"
        title_match = "substring"
        recommendation_title_match = "exact"
        "#,
    )
    .unwrap();

    assert_eq!(config.regions, vec!["경기".to_string(), "서울".to_string()]);
    assert_eq!(config.sample.sample_size, 5);
    assert_eq!(config.sample.min_required, 3);
    assert_eq!(config.sample.on_insufficient, OnInsufficient::ReturnAll);
    assert_eq!(config.search.address_field, AddressField::DetailAddress);
    assert_eq!(config.search.title_match, MatchMode::Substring);
    assert_eq!(config.search.recommendation_title_match, MatchMode::Exact);
    assert_eq!(config.search.title_order, SortOrder::Descending);
    assert_eq!(config.recommendation.description_chars, 60);
    assert_eq!(
        config.palette_colors().unwrap()[&PlaceType::from("cafe")],
        [0xa4, 0x5a, 0x52, 255]
    );
}

#[test]
fn test_invalid_configs_are_rejected() {
    let cases = [
        "regions = [\"서울\", \" \"]",
        "[sample]\nsample_size = 0",
        "[palette]\ncafe = \"tomato\"",
        "heat_gradient = []",
        "[recommendation]\ndescription_chars = 0",
        "categories = \"alphabetical\"",
    ];
    for case in cases {
        assert!(
            matches!(DashboardConfig::from_toml_str(case), Err(QueryError::Config(_))),
            "accepted: {case}"
        );
    }
}
