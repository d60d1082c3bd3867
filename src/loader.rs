use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{QueryError, Result};
use crate::types::{Dataset, MediaType, PlaceType, Record};

/// An already-parsed table: header row plus cells, `None` for missing cells.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

/// Which column header holds each record field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub title: String,
    pub media_type: String,
    pub place_type: String,
    pub address: String,
    pub detail_address: String,
    pub place_name: String,
    pub description: String,
    pub business_hours: String,
    pub phone: String,
    pub latitude: String,
    pub longitude: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        ColumnMapping {
            title: "title".to_string(),
            media_type: "mediaType".to_string(),
            place_type: "placeType".to_string(),
            address: "address".to_string(),
            detail_address: "detailAddress".to_string(),
            place_name: "placeName".to_string(),
            description: "description".to_string(),
            business_hours: "businessHours".to_string(),
            phone: "phone".to_string(),
            latitude: "latitude".to_string(),
            longitude: "longitude".to_string(),
        }
    }
}

impl ColumnMapping {
    /// Headers used by the public filming-location export.
    pub fn korean() -> Self {
        ColumnMapping {
            title: "제목".to_string(),
            media_type: "미디어타입".to_string(),
            place_type: "장소타입".to_string(),
            address: "주소".to_string(),
            detail_address: "상세주소".to_string(),
            place_name: "장소명".to_string(),
            description: "장소설명".to_string(),
            business_hours: "영업시간".to_string(),
            phone: "전화번호".to_string(),
            latitude: "위도".to_string(),
            longitude: "경도".to_string(),
        }
    }

    fn required(&self) -> [&str; 6] {
        [
            self.title.as_str(),
            self.media_type.as_str(),
            self.place_type.as_str(),
            self.address.as_str(),
            self.latitude.as_str(),
            self.longitude.as_str(),
        ]
    }
}

struct ColumnIndex<'t> {
    positions: HashMap<&'t str, usize>,
}

impl<'t> ColumnIndex<'t> {
    fn new(table: &'t Table, mapping: &ColumnMapping) -> Result<Self> {
        let mut positions = HashMap::new();
        for (i, column) in table.columns.iter().enumerate() {
            positions.entry(column.trim()).or_insert(i);
        }
        if let Some(missing) = mapping
            .required()
            .into_iter()
            .find(|header| !positions.contains_key(*header))
        {
            return Err(QueryError::DataLoad(format!(
                "missing required column '{missing}'"
            )));
        }
        Ok(ColumnIndex { positions })
    }

    fn cell<'r>(&self, row: &'r [Option<String>], header: &str) -> Option<&'r str> {
        let ix = *self.positions.get(header)?;
        row.get(ix)?.as_deref()
    }

    fn text(&self, row: &[Option<String>], header: &str) -> String {
        self.cell(row, header).unwrap_or_default().to_string()
    }

    fn number(&self, row: &[Option<String>], header: &str) -> Option<f64> {
        self.cell(row, header)?
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|x| x.is_finite())
    }
}

impl Dataset {
    /// Builds a dataset from a parsed table. Only the title, media type, place
    /// type, address and coordinate columns are mandatory.
    pub fn from_table(table: &Table, mapping: &ColumnMapping) -> Result<Dataset> {
        let index = ColumnIndex::new(table, mapping)?;

        let mut without_location = 0;
        let records: Vec<Record> = table
            .rows
            .iter()
            .map(|row| {
                let record = Record {
                    title: index.text(row, &mapping.title),
                    media_type: MediaType::from(index.text(row, &mapping.media_type)),
                    place_type: PlaceType::from(
                        index.cell(row, &mapping.place_type).unwrap_or_default(),
                    ),
                    address: index.text(row, &mapping.address),
                    detail_address: index.text(row, &mapping.detail_address),
                    place_name: index.text(row, &mapping.place_name),
                    description: index.text(row, &mapping.description),
                    business_hours: index.text(row, &mapping.business_hours),
                    phone: index.text(row, &mapping.phone),
                    latitude: index.number(row, &mapping.latitude),
                    longitude: index.number(row, &mapping.longitude),
                };
                if !record.has_location() {
                    without_location += 1;
                }
                record
            })
            .collect();

        if without_location > 0 {
            warn!(
                "{} of {} records have no usable coordinates",
                without_location,
                records.len()
            );
        }
        Ok(Dataset::new(records))
    }
}

fn cell_from_value(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Reads one JSON object per line into a [`Table`]. Columns are collected in
/// the order they are first seen.
pub fn table_from_jsonl(reader: impl BufRead) -> Result<Table> {
    let mut table = Table::default();
    let mut positions = HashMap::<String, usize>::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let object: Map<String, Value> =
            serde_json::from_str(&line).map_err(|source| QueryError::Json {
                line: i + 1,
                source,
            })?;

        let mut row = vec![None; table.columns.len()];
        for (key, value) in object {
            let ix = match positions.get(&key) {
                Some(&ix) => ix,
                None => {
                    let ix = table.columns.len();
                    positions.insert(key.clone(), ix);
                    table.columns.push(key);
                    ix
                }
            };
            if row.len() <= ix {
                row.resize(ix + 1, None);
            }
            row[ix] = cell_from_value(value);
        }
        table.rows.push(row);
    }
    Ok(table)
}

pub fn load_jsonl(path: impl AsRef<Path>, mapping: &ColumnMapping) -> Result<Dataset> {
    let path = path.as_ref();
    info!("Loading filming locations from {:?}", path);
    let reader = BufReader::new(File::open(path)?);
    let table = table_from_jsonl(reader)?;
    let dataset = Dataset::from_table(&table, mapping)?;
    info!(
        "Loaded {} records with {} place types",
        dataset.len(),
        dataset.place_types().len()
    );
    Ok(dataset)
}

#[cfg(test)]
#[path = "./loader_test.rs"]
mod loader_test;
