//! Turns query results into the values a map/chart front end draws.
//!
//! Nothing here renders. Every typed failure of the engine (no matches, no
//! usable coordinates, too few rows to sample) ends up as a [`Notice`] so the
//! front end can show a message instead of an empty widget.

use chrono::NaiveDate;
use log::{debug, warn};
use serde::Serialize;

use crate::colors::{heat_color, to_hex, CategoryPalette, Rgba};
use crate::config::DashboardConfig;
use crate::engine::{LocationQueryEngine, SearchCriterion};
use crate::error::{QueryError, Result};
use crate::types::{Coordinates, PlaceType, Record, ResultSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    NoResults,
    NoLocation,
    InsufficientData,
    MissingCoordinates,
    MarkersTruncated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Notice {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerTooltip {
    pub title: String,
    pub description: String,
    pub place_type: PlaceType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerPopup {
    pub place_name: String,
    pub address: String,
    pub business_hours: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub position: Coordinates,
    pub color: String,
    pub tooltip: MarkerTooltip,
    pub popup: MarkerPopup,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
    pub markers: Vec<Marker>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySlice {
    pub place_type: PlaceType,
    pub count: usize,
    pub share: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionBar {
    pub region: String,
    pub count: usize,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub title: String,
    pub place_name: String,
    pub business_hours: String,
    pub phone: String,
    pub address: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub heading: Option<String>,
    pub result_count: usize,
    pub map: Option<MapView>,
    pub categories: Vec<CategorySlice>,
    pub regions: Vec<RegionBar>,
    pub recommendations: Vec<Recommendation>,
    pub notices: Vec<Notice>,
}

/// Cuts `text` to at most `max_chars` characters, marking the cut with `...`.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

pub struct Dashboard<'e> {
    engine: &'e LocationQueryEngine,
    config: &'e DashboardConfig,
    palette: CategoryPalette,
    heat_stops: Vec<Rgba>,
}

impl<'e> Dashboard<'e> {
    pub fn new(engine: &'e LocationQueryEngine, config: &'e DashboardConfig) -> Result<Self> {
        let palette = CategoryPalette::new(
            engine.dataset().place_types(),
            &config.palette_colors()?,
            &config.fallback_stops()?,
        );
        Ok(Dashboard {
            engine,
            config,
            palette,
            heat_stops: config.heat_stops()?,
        })
    }

    /// Address search using the configured address column. Input box text is
    /// trimmed.
    pub fn address_query(&self, term: &str) -> SearchCriterion {
        SearchCriterion::ByAddress {
            needle: Some(term.trim().to_string()),
            field: self.config.search.address_field,
        }
    }

    /// Program or artist search using the configured match mode.
    pub fn title_query(&self, term: &str) -> SearchCriterion {
        SearchCriterion::by_title(term.trim(), self.config.search.title_match)
    }

    /// Criterion whose result feeds the recommendation panel. Title searches
    /// use their own match mode here; everything else reuses `criterion`.
    pub fn recommendation_query(&self, criterion: &SearchCriterion) -> SearchCriterion {
        match criterion {
            SearchCriterion::ByTitle { needle, .. } => SearchCriterion::by_title(
                needle.as_str(),
                self.config.search.recommendation_title_match,
            ),
            other => other.clone(),
        }
    }

    pub fn report(&self, criterion: &SearchCriterion, date: NaiveDate) -> Result<DashboardReport> {
        let result = self.engine.search(criterion);
        let mut notices = vec![];

        let heading = criterion.term().map(str::to_string);
        if result.is_empty() {
            notices.push(Notice::new(NoticeKind::NoResults, "검색 결과가 없습니다."));
            return Ok(DashboardReport {
                heading,
                result_count: 0,
                map: None,
                categories: vec![],
                regions: vec![],
                recommendations: vec![],
                notices,
            });
        }

        let map = self.map_view(criterion, &result, &mut notices);
        let categories = self.category_slices(&result);
        let regions = self.region_bars(&result)?;
        let pool = self.engine.search(&self.recommendation_query(criterion));
        let recommendations = self.recommendations(&pool, date, &mut notices)?;

        debug!(
            "Report for {:?}: {} records, {} notices",
            heading,
            result.len(),
            notices.len()
        );
        Ok(DashboardReport {
            heading,
            result_count: result.len(),
            map: Some(map),
            categories,
            regions,
            recommendations,
            notices,
        })
    }

    fn map_view(
        &self,
        criterion: &SearchCriterion,
        result: &ResultSet,
        notices: &mut Vec<Notice>,
    ) -> MapView {
        let map_config = &self.config.map;
        let (center, zoom) = match criterion {
            SearchCriterion::ByTitle { .. } => (map_config.default_center, map_config.title_zoom),
            _ => match self.engine.centroid(result) {
                Ok(center) => (center, map_config.address_zoom),
                Err(_) => {
                    notices.push(Notice::new(
                        NoticeKind::NoLocation,
                        "위치 정보가 있는 촬영지가 없어 기본 위치를 표시합니다.",
                    ));
                    (map_config.default_center, map_config.title_zoom)
                }
            },
        };

        let located: Vec<&Record> = result.iter().filter(|r| r.has_location()).collect();
        let missing = result.len() - located.len();
        if missing > 0 {
            warn!("{} matching records cannot be placed on the map", missing);
            notices.push(Notice::new(
                NoticeKind::MissingCoordinates,
                format!("{missing}곳은 좌표가 없어 지도에 표시되지 않습니다."),
            ));
        }
        if located.len() > map_config.marker_limit {
            notices.push(Notice::new(
                NoticeKind::MarkersTruncated,
                format!(
                    "{}곳 중 {}곳만 지도에 표시합니다.",
                    located.len(),
                    map_config.marker_limit
                ),
            ));
        }

        let markers = located
            .into_iter()
            .take(map_config.marker_limit)
            .filter_map(|r| {
                Some(Marker {
                    position: r.coordinates()?,
                    color: self.palette.hex_of(&r.place_type),
                    tooltip: MarkerTooltip {
                        title: r.title.clone(),
                        description: r.description.clone(),
                        place_type: r.place_type.clone(),
                    },
                    popup: MarkerPopup {
                        place_name: r.place_name.clone(),
                        address: r.address.clone(),
                        business_hours: r.business_hours.clone(),
                        phone: r.phone.clone(),
                    },
                })
            })
            .collect();

        MapView {
            center,
            zoom,
            markers,
        }
    }

    fn category_slices(&self, result: &ResultSet) -> Vec<CategorySlice> {
        let distribution = self
            .engine
            .category_distribution(result, self.config.categories);
        let total = distribution.total().max(1) as f64;
        distribution
            .counts
            .into_iter()
            .map(|c| CategorySlice {
                color: self.palette.hex_of(&c.place_type),
                share: c.count as f64 / total,
                place_type: c.place_type,
                count: c.count,
            })
            .collect()
    }

    fn region_bars(&self, result: &ResultSet) -> Result<Vec<RegionBar>> {
        let counts = self
            .engine
            .regional_counts(result, self.config.regions.as_slice(), None)?;
        let max = counts.first().map_or(0, |c| c.count);
        Ok(counts
            .into_iter()
            .map(|c| RegionBar {
                color: to_hex(&heat_color(c.count, max, &self.heat_stops)),
                region: c.region,
                count: c.count,
            })
            .collect())
    }

    fn recommendations(
        &self,
        result: &ResultSet,
        date: NaiveDate,
        notices: &mut Vec<Notice>,
    ) -> Result<Vec<Recommendation>> {
        let picks = match self.engine.daily_sample(result, &self.config.sample, date) {
            Ok(picks) => picks,
            Err(QueryError::InsufficientData {
                available,
                required,
            }) => {
                notices.push(Notice::new(
                    NoticeKind::InsufficientData,
                    format!("추천하려면 {required}곳 이상이 필요합니다 (현재 {available}곳)."),
                ));
                return Ok(vec![]);
            }
            Err(e) => return Err(e),
        };

        let max_chars = self.config.recommendation.description_chars;
        Ok(picks
            .iter()
            .map(|r| Recommendation {
                title: r.title.clone(),
                place_name: r.place_name.clone(),
                business_hours: r.business_hours.clone(),
                phone: r.phone.clone(),
                address: r.address.clone(),
                description: truncate_chars(&r.description, max_chars),
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "./dashboard_test.rs"]
mod dashboard_test;
