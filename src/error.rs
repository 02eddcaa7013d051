use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that abort a pyramid build.
///
/// A level whose scaled dimensions round below one pixel is not an error; it is
/// skipped and counted in [`PyramidStats`](crate::pyramid::PyramidStats).
#[derive(Debug, Clone, Error)]
pub enum BuildError {
    /// The source path does not exist or cannot be opened
    #[error("Source image not found: {}: {message}", path.display())]
    SourceNotFound { path: PathBuf, message: String },

    /// The source exists but cannot be decoded as a raster image
    #[error("Unsupported image format: {}: {reason}", path.display())]
    UnsupportedFormat { path: PathBuf, reason: String },

    /// A tile directory or file could not be written
    #[error("Failed to write {}: {message}", path.display())]
    IoWrite { path: PathBuf, message: String },

    /// The PNG encoder rejected a tile
    #[error("Failed to encode tile {}: {message}", path.display())]
    Encode { path: PathBuf, message: String },

    /// Tile edge length must be at least one pixel
    #[error("Invalid tile size: {0} (must be greater than 0)")]
    InvalidTileSize(u32),

    /// The finest requested level is too large to address in pixels
    #[error("max_zoom {max_zoom} is too deep for a {width}x{height} source")]
    ZoomTooDeep {
        max_zoom: i32,
        width: u32,
        height: u32,
    },

    /// The worker pool for tile writes could not be started
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(String),
}

impl BuildError {
    pub(crate) fn io_write(path: &Path, err: impl ToString) -> Self {
        BuildError::IoWrite {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    /// The path the error refers to, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            BuildError::SourceNotFound { path, .. }
            | BuildError::UnsupportedFormat { path, .. }
            | BuildError::IoWrite { path, .. }
            | BuildError::Encode { path, .. } => Some(path),
            BuildError::InvalidTileSize(_)
            | BuildError::ZoomTooDeep { .. }
            | BuildError::ThreadPool(_) => None,
        }
    }
}

/// Errors raised while serving tiles.
///
/// A missing tile is not an error: sources report it as `Ok(None)`.
#[derive(Debug, Clone, Error)]
pub enum TileError {
    /// Reading an existing tile failed
    #[error("I/O error reading {}: {message}", path.display())]
    Io { path: PathBuf, message: String },
}

/// Errors raised while converting a lunar feature catalogue to JSON.
#[derive(Debug, Clone, Error)]
pub enum FeatureError {
    /// The CSV file does not exist or cannot be opened
    #[error("Feature CSV not found: {}: {message}", path.display())]
    CsvNotFound { path: PathBuf, message: String },

    /// The CSV is malformed or not valid UTF-8
    #[error("Malformed CSV at line {line}: {message}")]
    Csv { line: u64, message: String },

    /// A column the conversion reads is absent from the header row
    #[error("Missing CSV column: {0:?}")]
    MissingColumn(&'static str),

    /// A coordinate cell is not a number
    #[error("Invalid {column} at line {line}: {value:?}")]
    InvalidCoordinate {
        line: u64,
        column: &'static str,
        value: String,
    },

    /// The JSON output could not be written
    #[error("Failed to write {}: {message}", path.display())]
    Write { path: PathBuf, message: String },
}
