use std::io::Cursor;

use crate::error::QueryError;
use crate::types::{MediaType, PlaceType};

use super::{load_jsonl, table_from_jsonl, ColumnMapping, Table};
use crate::types::Dataset;

const FIXTURE: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/testdata/filming_locations.jsonl"
);

fn cells(values: &[Option<&str>]) -> Vec<Option<String>> {
    values.iter().map(|v| v.map(str::to_string)).collect()
}

#[test]
fn test_load_fixture() {
    let dataset = load_jsonl(FIXTURE, &ColumnMapping::default()).unwrap();

    assert_eq!(dataset.len(), 6);
    let bts = &dataset.records()[3];
    assert_eq!(bts.title, "BTS");
    assert_eq!(bts.media_type, MediaType::Artist);
    assert_eq!(bts.latitude, Some(37.5289));
    assert_eq!(bts.business_hours, "10:00-20:00");

    let running_man = &dataset.records()[4];
    assert_eq!(running_man.business_hours, "");
    assert!(!running_man.has_location());

    assert_eq!(
        dataset.place_types(),
        &[
            PlaceType::from("cafe"),
            PlaceType::from("playground"),
            PlaceType::from("restaurant"),
            PlaceType::from("store"),
            PlaceType::from("stay"),
            PlaceType::from("station"),
        ]
    );
}

#[test]
fn test_missing_required_column() {
    let table = Table {
        columns: vec!["title".into(), "mediaType".into(), "placeType".into()],
        rows: vec![cells(&[Some("a"), Some("drama"), Some("cafe")])],
    };
    match Dataset::from_table(&table, &ColumnMapping::default()) {
        Err(QueryError::DataLoad(reason)) => assert!(reason.contains("address")),
        other => panic!("expected DataLoad, got {:?}", other.map(|d| d.len())),
    }
}

#[test]
fn test_korean_headers_and_short_rows() {
    let table = Table {
        columns: ["제목", "미디어타입", "장소타입", "주소", "위도", "경도", "장소명"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        rows: vec![
            cells(&[
                Some("도깨비"),
                Some("drama"),
                Some("cafe"),
                Some("서울특별시 강남구"),
                Some("37.5"),
                Some("127.0"),
                Some("카페"),
            ]),
            cells(&[Some("기생충"), Some("movie"), None, Some("서울"), Some("n/a")]),
        ],
    };
    let dataset = Dataset::from_table(&table, &ColumnMapping::korean()).unwrap();

    assert_eq!(dataset.len(), 2);
    assert_eq!(dataset.records()[0].place_name, "카페");
    assert_eq!(dataset.records()[0].detail_address, "");
    assert_eq!(dataset.records()[1].latitude, None);
    assert_eq!(dataset.records()[1].longitude, None);
    assert_eq!(dataset.records()[1].place_type, PlaceType::from(""));
}

#[test]
fn test_jsonl_reports_bad_line() {
    let input = "{\"title\": \"a\"}\nnot json\n";
    match table_from_jsonl(Cursor::new(input)) {
        Err(QueryError::Json { line, .. }) => assert_eq!(line, 2),
        _ => panic!("expected a JSON error"),
    }
}

#[test]
fn test_jsonl_aligns_columns_across_lines() {
    let input = "{\"a\": 1}\n\n{\"b\": \"x\", \"a\": null}\n";
    let table = table_from_jsonl(Cursor::new(input)).unwrap();

    assert_eq!(table.columns, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0], vec![Some("1".to_string())]);
    assert_eq!(table.rows[1], vec![None, Some("x".to_string())]);
}
