use std::{collections::HashMap, str::FromStr, sync::Arc};

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{QueryError, Result};
use crate::sampling::{daily_sample, SamplePolicy};
use crate::types::{Coordinates, Dataset, PlaceType, Record, ResultSet};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressField {
    #[default]
    Address,
    DetailAddress,
}

impl AddressField {
    fn of<'r>(&self, record: &'r Record) -> &'r str {
        match self {
            AddressField::Address => &record.address,
            AddressField::DetailAddress => &record.detail_address,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    #[default]
    Exact,
    Substring,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCriterion {
    /// Case-sensitive substring match on an address column. `None` means the
    /// user has not typed anything yet.
    ByAddress {
        needle: Option<String>,
        field: AddressField,
    },
    ByTitle {
        needle: String,
        mode: MatchMode,
    },
    All,
}

impl SearchCriterion {
    pub fn by_address(needle: impl Into<String>) -> Self {
        SearchCriterion::ByAddress {
            needle: Some(needle.into()),
            field: AddressField::Address,
        }
    }

    pub fn by_title(needle: impl Into<String>, mode: MatchMode) -> Self {
        SearchCriterion::ByTitle {
            needle: needle.into(),
            mode,
        }
    }

    /// Search term as given, `None` for `All`.
    pub fn term(&self) -> Option<&str> {
        match self {
            SearchCriterion::ByAddress { needle, .. } => {
                Some(needle.as_deref().unwrap_or_default())
            }
            SearchCriterion::ByTitle { needle, .. } => Some(needle),
            SearchCriterion::All => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitlePartition {
    Programs,
    Artists,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryMode {
    /// Every place type of the dataset in first-seen order, zeros included.
    #[default]
    FixedOrder,
    /// Only place types present in the result, most frequent first.
    PresentOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub place_type: PlaceType,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryDistribution {
    pub counts: Vec<CategoryCount>,
}

impl CategoryDistribution {
    pub fn get(&self, place_type: &str) -> Option<usize> {
        self.counts
            .iter()
            .find(|c| c.place_type.as_str() == place_type)
            .map(|c| c.count)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|c| c.count).sum()
    }
}

/// Number of records whose address mentions `region`. Regions may overlap, so
/// these counts need not add up to the number of records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionCount {
    pub region: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    MediaType,
    PlaceType,
    Title,
}

impl GroupKey {
    fn of<'r>(&self, record: &'r Record) -> &'r str {
        match self {
            GroupKey::MediaType => record.media_type.as_str(),
            GroupKey::PlaceType => record.place_type.as_str(),
            GroupKey::Title => &record.title,
        }
    }
}

impl FromStr for GroupKey {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mediaType" | "media_type" => Ok(GroupKey::MediaType),
            "placeType" | "place_type" => Ok(GroupKey::PlaceType),
            "title" => Ok(GroupKey::Title),
            other => Err(QueryError::Validation(format!(
                "cannot group by unknown column '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupCentroid {
    pub group: String,
    pub center: Coordinates,
    pub count: usize,
}

/// Arithmetic mean over records with usable coordinates.
pub fn mean_location<'a>(records: impl IntoIterator<Item = &'a Record>) -> Option<Coordinates> {
    let mut count = 0usize;
    let mut latitude = 0.0;
    let mut longitude = 0.0;
    for c in records.into_iter().filter_map(Record::coordinates) {
        count += 1;
        latitude += c.latitude;
        longitude += c.longitude;
    }
    (count > 0).then(|| Coordinates::new(latitude / count as f64, longitude / count as f64))
}

/// Read-only queries over one loaded dataset. Cloning shares the dataset.
#[derive(Debug, Clone)]
pub struct LocationQueryEngine {
    dataset: Arc<Dataset>,
}

impl LocationQueryEngine {
    pub fn new(dataset: Dataset) -> Result<Self> {
        LocationQueryEngine::from_shared(Arc::new(dataset))
    }

    pub fn from_shared(dataset: Arc<Dataset>) -> Result<Self> {
        if dataset.is_empty() {
            return Err(QueryError::DataLoad("dataset is empty".to_string()));
        }
        Ok(LocationQueryEngine { dataset })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Stable filter over the dataset. A missing or empty address means "not
    /// searching" and yields an empty result; title needles are compared as
    /// given.
    pub fn search(&self, criterion: &SearchCriterion) -> ResultSet<'_> {
        let records = self.dataset.records();
        let result: ResultSet = match criterion {
            SearchCriterion::All => records.iter().collect(),
            SearchCriterion::ByAddress { needle, field } => match needle.as_deref() {
                Some(needle) if !needle.is_empty() => records
                    .iter()
                    .filter(|r| field.of(r).contains(needle))
                    .collect(),
                _ => ResultSet::empty(),
            },
            SearchCriterion::ByTitle { needle, mode } => records
                .iter()
                .filter(|r| match mode {
                    MatchMode::Exact => r.title == *needle,
                    MatchMode::Substring => r.title.contains(needle.as_str()),
                })
                .collect(),
        };
        debug!("{:?} matched {} records", criterion, result.len());
        result
    }

    pub fn all(&self) -> ResultSet<'_> {
        self.search(&SearchCriterion::All)
    }

    pub fn distinct_titles(&self, partition: TitlePartition, order: SortOrder) -> Vec<&str> {
        let want_artists = partition == TitlePartition::Artists;
        let mut titles: Vec<&str> = self
            .dataset
            .records()
            .iter()
            .filter(|r| r.media_type.is_artist() == want_artists)
            .map(|r| r.title.as_str())
            .collect();
        titles.sort_unstable();
        titles.dedup();
        if order == SortOrder::Descending {
            titles.reverse();
        }
        titles
    }

    pub fn category_distribution(
        &self,
        result: &ResultSet,
        mode: CategoryMode,
    ) -> CategoryDistribution {
        let mut counts: HashMap<&PlaceType, usize> = HashMap::new();
        for record in result.iter() {
            *counts.entry(&record.place_type).or_default() += 1;
        }

        let mut ordered: Vec<CategoryCount> = self
            .dataset
            .place_types()
            .iter()
            .map(|place_type| CategoryCount {
                place_type: place_type.clone(),
                count: counts.get(place_type).copied().unwrap_or(0),
            })
            .collect();

        if mode == CategoryMode::PresentOnly {
            ordered.retain(|c| c.count > 0);
            ordered.sort_by(|a, b| b.count.cmp(&a.count));
        }
        CategoryDistribution { counts: ordered }
    }

    /// Counts per region name, most frequent first, ties in input order. A
    /// record is counted once for every region its address mentions.
    pub fn regional_counts<S: AsRef<str>>(
        &self,
        result: &ResultSet,
        region_names: &[S],
        place_type_filter: Option<&str>,
    ) -> Result<Vec<RegionCount>> {
        if let Some(empty) = region_names.iter().position(|r| r.as_ref().trim().is_empty()) {
            return Err(QueryError::Validation(format!(
                "region name at position {empty} is empty"
            )));
        }

        let candidates: Vec<&Record> = result
            .iter()
            .filter(|r| place_type_filter.map_or(true, |p| r.place_type.as_str() == p))
            .collect();

        let mut counts: Vec<RegionCount> = region_names
            .iter()
            .map(|region| {
                let region = region.as_ref();
                RegionCount {
                    region: region.to_string(),
                    count: candidates
                        .iter()
                        .filter(|r| r.address.contains(region))
                        .count(),
                }
            })
            .collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count));
        Ok(counts)
    }

    pub fn centroid(&self, result: &ResultSet) -> Result<Coordinates> {
        mean_location(result.iter()).ok_or(QueryError::NoLocation)
    }

    pub fn daily_sample<'a>(
        &self,
        result: &ResultSet<'a>,
        policy: &SamplePolicy,
        date: NaiveDate,
    ) -> Result<ResultSet<'a>> {
        daily_sample(result, policy, date)
    }

    /// One mean position per group value, groups in first-seen order. This is
    /// a single centroid per group, not a clustering.
    pub fn group_centroids(&self, result: &ResultSet, key: GroupKey) -> Vec<GroupCentroid> {
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut groups: Vec<(&str, Vec<&Record>)> = vec![];

        for record in result.iter().filter(|r| r.has_location()) {
            let value = key.of(record);
            let ix = *positions.entry(value).or_insert_with(|| {
                groups.push((value, vec![]));
                groups.len() - 1
            });
            groups[ix].1.push(record);
        }

        groups
            .into_iter()
            .filter_map(|(group, records)| {
                let count = records.len();
                mean_location(records).map(|center| GroupCentroid {
                    group: group.to_string(),
                    center,
                    count,
                })
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "./engine_test.rs"]
mod engine_test;
