use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Coordinates {
            latitude,
            longitude,
        }
    }

    /// A zero or non-finite component means the row was never geocoded.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude != 0.0
            && self.longitude != 0.0
    }
}

/// Kind of work a title belongs to. `Artist` rows describe people, every other
/// kind describes a program.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MediaType {
    Drama,
    Movie,
    Show,
    Artist,
    Other(String),
}

impl MediaType {
    pub fn is_artist(&self) -> bool {
        matches!(self, MediaType::Artist)
    }

    pub fn as_str(&self) -> &str {
        match self {
            MediaType::Drama => "drama",
            MediaType::Movie => "movie",
            MediaType::Show => "show",
            MediaType::Artist => "artist",
            MediaType::Other(s) => s,
        }
    }
}

impl From<&str> for MediaType {
    fn from(value: &str) -> Self {
        match value.trim() {
            "drama" => MediaType::Drama,
            "movie" => MediaType::Movie,
            "show" => MediaType::Show,
            "artist" => MediaType::Artist,
            other => MediaType::Other(other.to_string()),
        }
    }
}

impl From<String> for MediaType {
    fn from(value: String) -> Self {
        MediaType::from(value.as_str())
    }
}

impl From<MediaType> for String {
    fn from(value: MediaType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for MediaType {
    fn default() -> Self {
        MediaType::Other(String::new())
    }
}

/// Open set of place categories (cafe, restaurant, stay, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceType(pub String);

impl PlaceType {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlaceType {
    fn from(value: &str) -> Self {
        PlaceType(value.trim().to_string())
    }
}

impl fmt::Display for PlaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub title: String,
    pub media_type: MediaType,
    pub place_type: PlaceType,
    pub address: String,
    pub detail_address: String,
    pub place_name: String,
    pub description: String,
    pub business_hours: String,
    pub phone: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Record {
    pub fn coordinates(&self) -> Option<Coordinates> {
        let coordinates = Coordinates::new(self.latitude?, self.longitude?);
        coordinates.is_valid().then_some(coordinates)
    }

    pub fn has_location(&self) -> bool {
        self.coordinates().is_some()
    }
}

/// The loaded table. Read-only once built; reloading means building a new one.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
    place_types: Vec<PlaceType>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        let mut place_types: Vec<PlaceType> = vec![];
        for record in &records {
            if !place_types.contains(&record.place_type) {
                place_types.push(record.place_type.clone());
            }
        }
        Dataset {
            records,
            place_types,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Place types in the order they first appear in the table.
    pub fn place_types(&self) -> &[PlaceType] {
        &self.place_types
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Ordered view over dataset rows produced by a query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet<'a> {
    records: Vec<&'a Record>,
}

impl<'a> ResultSet<'a> {
    pub fn new(records: Vec<&'a Record>) -> Self {
        ResultSet { records }
    }

    pub fn empty() -> Self {
        ResultSet { records: vec![] }
    }

    pub fn records(&self) -> &[&'a Record] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.records.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn to_records(&self) -> Vec<Record> {
        self.records.iter().map(|&r| r.clone()).collect()
    }
}

impl<'a> FromIterator<&'a Record> for ResultSet<'a> {
    fn from_iter<I: IntoIterator<Item = &'a Record>>(iter: I) -> Self {
        ResultSet {
            records: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
#[path = "./types_test.rs"]
mod types_test;
