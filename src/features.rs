//! Lunar feature catalogue conversion.
//!
//! The viewer's search box and markers load a JSON list of named surface
//! features. That list is produced from the lunar nomenclature CSV export:
//!
//! ```text
//! Feature Name,Feature Type,Diameter,Center Latitude,Center Longitude
//! Tycho,Crater,85.29,-43.31,-11.36
//! ```
//!
//! becomes
//!
//! ```text
//! [
//!   {
//!     "id": "TYC-1",
//!     "name": "Tycho",
//!     "coordinates": [-43.31, -11.36],
//!     "description": "A Crater on the Moon with a diameter of 85.29 km.",
//!     "imageUrl": ""
//!   }
//! ]
//! ```
//!
//! Rows with an empty latitude or longitude are skipped. Ids number the kept
//! rows only, so they stay gapless.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use tracing::{info, trace};

use crate::error::FeatureError;

/// Default JSON output file.
pub const DEFAULT_FEATURES_OUTPUT: &str = "features_all.json";

pub const NAME_COLUMN: &str = "Feature Name";
pub const TYPE_COLUMN: &str = "Feature Type";
pub const DIAMETER_COLUMN: &str = "Diameter";
pub const LATITUDE_COLUMN: &str = "Center Latitude";
pub const LONGITUDE_COLUMN: &str = "Center Longitude";

const REQUIRED_COLUMNS: [&str; 5] = [
    NAME_COLUMN,
    TYPE_COLUMN,
    DIAMETER_COLUMN,
    LATITUDE_COLUMN,
    LONGITUDE_COLUMN,
];

// =============================================================================
// Types
// =============================================================================

/// One catalogue row, cells kept as text.
#[derive(Debug, Deserialize)]
struct FeatureRow {
    #[serde(rename = "Feature Name")]
    name: String,

    #[serde(rename = "Feature Type")]
    feature_type: String,

    #[serde(rename = "Diameter")]
    diameter: String,

    #[serde(rename = "Center Latitude")]
    latitude: String,

    #[serde(rename = "Center Longitude")]
    longitude: String,
}

/// A named surface feature as the viewer consumes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    /// First three letters of the name, upper-cased, plus a running number
    pub id: String,

    pub name: String,

    /// `[latitude, longitude]` in degrees
    pub coordinates: [f64; 2],

    pub description: String,

    /// Always empty; filled in by hand for features that have a picture
    pub image_url: String,
}

/// Result of parsing a catalogue.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCatalogue {
    /// Converted features, in CSV order
    pub features: Vec<Feature>,

    /// Rows dropped for lacking a latitude or longitude
    pub skipped_rows: usize,
}

// =============================================================================
// Conversion
// =============================================================================

/// Read the catalogue at `csv_path` and write it as pretty JSON to `json_path`.
pub fn convert_features(
    csv_path: &Path,
    json_path: &Path,
) -> Result<FeatureCatalogue, FeatureError> {
    info!("Reading data from {}", csv_path.display());
    let catalogue = load_features(csv_path)?;

    info!(
        "Processed {} features ({} rows without coordinates skipped)",
        catalogue.features.len(),
        catalogue.skipped_rows
    );

    write_features(&catalogue.features, json_path)?;
    info!("Features saved to {}", json_path.display());

    Ok(catalogue)
}

/// Open and parse a catalogue CSV.
pub fn load_features(csv_path: &Path) -> Result<FeatureCatalogue, FeatureError> {
    let file = File::open(csv_path).map_err(|e| FeatureError::CsvNotFound {
        path: csv_path.to_path_buf(),
        message: e.to_string(),
    })?;
    parse_features(file)
}

/// Parse a catalogue from any UTF-8 CSV stream with a header row.
///
/// Rows shorter than the header are padded with empty cells.
pub fn parse_features<R: io::Read>(reader: R) -> Result<FeatureCatalogue, FeatureError> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = reader.headers().map_err(csv_error)?.clone();

    if let Some(column) = REQUIRED_COLUMNS
        .into_iter()
        .find(|column| !headers.iter().any(|h| h == *column))
    {
        return Err(FeatureError::MissingColumn(column));
    }

    let mut catalogue = FeatureCatalogue::default();

    for result in reader.records() {
        let record = result.map_err(csv_error)?;
        let line = record.position().map_or(0, |p| p.line());
        let row = deserialize_row(record, &headers, line)?;

        if row.latitude.is_empty() || row.longitude.is_empty() {
            trace!(line, name = %row.name, "Skipping row without coordinates");
            catalogue.skipped_rows += 1;
            continue;
        }

        let coordinates = [
            parse_coordinate(&row.latitude, LATITUDE_COLUMN, line)?,
            parse_coordinate(&row.longitude, LONGITUDE_COLUMN, line)?,
        ];

        let id = feature_id(&row.name, catalogue.features.len() + 1);
        catalogue.features.push(Feature {
            id,
            description: format!(
                "A {} on the Moon with a diameter of {} km.",
                row.feature_type, row.diameter
            ),
            name: row.name,
            coordinates,
            image_url: String::new(),
        });
    }

    Ok(catalogue)
}

/// Write `features` as a JSON array indented by two spaces.
pub fn write_features(features: &[Feature], json_path: &Path) -> Result<(), FeatureError> {
    let write_error = |message: String| FeatureError::Write {
        path: json_path.to_path_buf(),
        message,
    };

    let json = serde_json::to_string_pretty(features).map_err(|e| write_error(e.to_string()))?;
    fs::write(json_path, json).map_err(|e| write_error(e.to_string()))
}

/// Build the id of the `counter`-th kept feature, e.g. `TYC-1`.
pub fn feature_id(name: &str, counter: usize) -> String {
    let prefix: String = name.chars().take(3).collect();
    format!("{}-{}", prefix.to_uppercase(), counter)
}

fn deserialize_row(
    mut record: StringRecord,
    headers: &StringRecord,
    line: u64,
) -> Result<FeatureRow, FeatureError> {
    record.truncate(headers.len());
    while record.len() < headers.len() {
        record.push_field("");
    }

    record
        .deserialize(Some(headers))
        .map_err(|e| FeatureError::Csv {
            line,
            message: e.to_string(),
        })
}

fn parse_coordinate(value: &str, column: &'static str, line: u64) -> Result<f64, FeatureError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| FeatureError::InvalidCoordinate {
            line,
            column,
            value: value.to_string(),
        })
}

fn csv_error(err: csv::Error) -> FeatureError {
    FeatureError::Csv {
        line: err.position().map_or(0, |p| p.line()),
        message: err.to_string(),
    }
}

// =============================================================================
// Tests
// =============================================================================
