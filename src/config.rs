use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::Path,
};

use log::info;
use serde::{Deserialize, Serialize};

use crate::colors::{parse_hex, Rgba};
use crate::engine::{AddressField, CategoryMode, MatchMode, SortOrder};
use crate::error::{QueryError, Result};
use crate::loader::ColumnMapping;
use crate::sampling::SamplePolicy;
use crate::types::{Coordinates, PlaceType};

const DEFAULT_CENTER_LATITUDE: f64 = 36.5;
const DEFAULT_CENTER_LONGITUDE: f64 = 127.5;
const ADDRESS_ZOOM_DEFAULT: u8 = 8;
const TITLE_ZOOM_DEFAULT: u8 = 7;
const MARKER_LIMIT_DEFAULT: usize = 5000;
const DESCRIPTION_CHARS_DEFAULT: usize = 60;

const REGIONS_DEFAULT: [&str; 17] = [
    "서울",
    "부산",
    "대구",
    "인천",
    "광주",
    "대전",
    "울산",
    "세종",
    "경기",
    "강원",
    "충청북도",
    "충청남도",
    "전라북도",
    "전라남도",
    "경상북도",
    "경상남도",
    "제주",
];

const PALETTE_DEFAULT: [(&str, &str); 6] = [
    ("cafe", "#A45A52"),
    ("playground", "#E89C5D"),
    ("restaurant", "#C4B454"),
    ("stay", "#52606D"),
    ("station", "#5478A6"),
    ("store", "#8D6C8D"),
];

const FALLBACK_GRADIENT_DEFAULT: [&str; 3] = ["#6C8EAD", "#A3B18A", "#D4A373"];
const HEAT_GRADIENT_DEFAULT: [&str; 3] = ["#FFF5EB", "#FD8D3C", "#7F2704"];

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Viewport centre for title searches and for results without locations.
    pub default_center: Coordinates,
    pub address_zoom: u8,
    pub title_zoom: u8,
    pub marker_limit: usize,
}

impl Default for MapConfig {
    fn default() -> Self {
        MapConfig {
            default_center: Coordinates::new(DEFAULT_CENTER_LATITUDE, DEFAULT_CENTER_LONGITUDE),
            address_zoom: ADDRESS_ZOOM_DEFAULT,
            title_zoom: TITLE_ZOOM_DEFAULT,
            marker_limit: MARKER_LIMIT_DEFAULT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub address_field: AddressField,
    /// Title match used for the map and the charts.
    pub title_match: MatchMode,
    /// Title match used to build the pool of daily recommendations.
    pub recommendation_title_match: MatchMode,
    pub title_order: SortOrder,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            address_field: AddressField::Address,
            title_match: MatchMode::Exact,
            recommendation_title_match: MatchMode::Substring,
            title_order: SortOrder::Descending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    pub description_chars: usize,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        RecommendationConfig {
            description_chars: DESCRIPTION_CHARS_DEFAULT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub regions: Vec<String>,
    pub palette: BTreeMap<String, String>,
    pub fallback_gradient: Vec<String>,
    pub heat_gradient: Vec<String>,
    pub categories: CategoryMode,
    pub sample: SamplePolicy,
    pub map: MapConfig,
    pub search: SearchConfig,
    pub recommendation: RecommendationConfig,
    pub columns: ColumnMapping,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            regions: strings(&REGIONS_DEFAULT),
            palette: PALETTE_DEFAULT
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            fallback_gradient: strings(&FALLBACK_GRADIENT_DEFAULT),
            heat_gradient: strings(&HEAT_GRADIENT_DEFAULT),
            categories: CategoryMode::default(),
            sample: SamplePolicy::default(),
            map: MapConfig::default(),
            search: SearchConfig::default(),
            recommendation: RecommendationConfig::default(),
            columns: ColumnMapping::default(),
        }
    }
}

fn stops(values: &[String], name: &str) -> Result<Vec<Rgba>> {
    if values.is_empty() {
        return Err(QueryError::Config(format!("{name} needs at least one colour")));
    }
    values.iter().map(|v| parse_hex(v)).collect()
}

impl DashboardConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: DashboardConfig =
            toml::from_str(content).map_err(|e| QueryError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Reading dashboard config from {:?}", path);
        let content = fs::read_to_string(path)?;
        DashboardConfig::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(ix) = self.regions.iter().position(|r| r.trim().is_empty()) {
            return Err(QueryError::Config(format!("region {ix} is empty")));
        }
        self.sample
            .validate()
            .map_err(|e| QueryError::Config(e.to_string()))?;
        if self.recommendation.description_chars == 0 {
            return Err(QueryError::Config(
                "description_chars must be at least 1".to_string(),
            ));
        }
        self.palette_colors()?;
        self.fallback_stops()?;
        self.heat_stops()?;
        Ok(())
    }

    pub fn palette_colors(&self) -> Result<HashMap<PlaceType, Rgba>> {
        self.palette
            .iter()
            .map(|(place_type, hex)| {
                parse_hex(hex).map(|color| (PlaceType::from(place_type.as_str()), color))
            })
            .collect()
    }

    pub fn fallback_stops(&self) -> Result<Vec<Rgba>> {
        stops(&self.fallback_gradient, "fallback_gradient")
    }

    pub fn heat_stops(&self) -> Result<Vec<Rgba>> {
        stops(&self.heat_gradient, "heat_gradient")
    }
}

#[cfg(test)]
#[path = "./config_test.rs"]
mod config_test;
