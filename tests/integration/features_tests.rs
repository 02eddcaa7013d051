//! Feature catalogue conversion tests against real files.
//!
//! Tests verify:
//! - The JSON document the viewer loads (keys, order, indentation)
//! - Rows without coordinates are skipped and ids stay gapless
//! - Error kinds for a missing CSV, a missing column and a bad coordinate

use serde_json::Value;

use lunar_tiles::features::{convert_features, DEFAULT_FEATURES_OUTPUT};
use lunar_tiles::FeatureError;

use super::test_utils::write_features_csv;

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_convert_writes_viewer_feature_list() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_features_csv(
        dir.path(),
        &[
            "Tycho,Crater,85.29,-43.31,-11.36",
            "Mare Tranquillitatis,Mare,875.7,8.35,30.83",
        ],
    );
    let out = dir.path().join(DEFAULT_FEATURES_OUTPUT);

    let catalogue = convert_features(&csv, &out).unwrap();
    assert_eq!(catalogue.features.len(), 2);
    assert_eq!(catalogue.skipped_rows, 0);

    let json = read_json(&out);
    assert_eq!(
        json,
        serde_json::json!([
            {
                "id": "TYC-1",
                "name": "Tycho",
                "coordinates": [-43.31, -11.36],
                "description": "A Crater on the Moon with a diameter of 85.29 km.",
                "imageUrl": ""
            },
            {
                "id": "MAR-2",
                "name": "Mare Tranquillitatis",
                "coordinates": [8.35, 30.83],
                "description": "A Mare on the Moon with a diameter of 875.7 km.",
                "imageUrl": ""
            }
        ])
    );
}

#[test]
fn test_json_keys_in_viewer_order() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_features_csv(dir.path(), &["Plato,Crater,101,51.6,-9.4"]);
    let out = dir.path().join("features.json");

    convert_features(&csv, &out).unwrap();

    let text = std::fs::read_to_string(&out).unwrap();
    let keys = ["\"id\"", "\"name\"", "\"coordinates\"", "\"description\"", "\"imageUrl\""];
    let positions: Vec<usize> = keys
        .iter()
        .map(|key| text.find(key).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{text}");
    assert!(text.starts_with("[\n  {\n    \"id\""));
}

#[test]
fn test_rows_without_coordinates_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_features_csv(
        dir.path(),
        &[
            "Tycho,Crater,85.29,-43.31,-11.36",
            "Unplaced,Crater,3.0,,",
            "Copernicus,Crater,96.07,9.62,-20.08",
            "Halfway,Crater,1.5,12.0,",
            "Plato,Crater,101,51.6,-9.4",
        ],
    );
    let out = dir.path().join("features.json");

    let catalogue = convert_features(&csv, &out).unwrap();
    assert_eq!(catalogue.skipped_rows, 2);

    let json = read_json(&out);
    let ids: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["TYC-1", "COP-2", "PLA-3"]);
}

#[test]
fn test_empty_catalogue_writes_empty_list() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_features_csv(dir.path(), &["Unplaced,Crater,3.0,,"]);
    let out = dir.path().join("features.json");

    convert_features(&csv, &out).unwrap();
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "[]");
}

#[test]
fn test_missing_csv() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("features.json");

    let err = convert_features(&dir.path().join("lunar_features.csv"), &out).unwrap_err();
    assert!(matches!(err, FeatureError::CsvNotFound { .. }));
    assert!(!out.exists());
}

#[test]
fn test_missing_column() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("lunar_features.csv");
    std::fs::write(
        &csv,
        "Feature Name,Feature Type,Diameter,Center Latitude\nTycho,Crater,85,1\n",
    )
    .unwrap();
    let out = dir.path().join("features.json");

    let err = convert_features(&csv, &out).unwrap_err();
    assert!(matches!(err, FeatureError::MissingColumn("Center Longitude")));
    assert!(!out.exists());
}

#[test]
fn test_bad_coordinate_aborts_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_features_csv(
        dir.path(),
        &["Tycho,Crater,85.29,-43.31,-11.36", "Plato,Crater,101,51.6,west"],
    );
    let out = dir.path().join("features.json");

    let err = convert_features(&csv, &out).unwrap_err();
    match err {
        FeatureError::InvalidCoordinate { line, column, .. } => {
            assert_eq!(line, 3);
            assert_eq!(column, "Center Longitude");
        }
        other => panic!("Expected invalid coordinate, got {:?}", other),
    }
    assert!(!out.exists());
}
