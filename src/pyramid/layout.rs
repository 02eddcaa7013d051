//! On-disk tile naming.
//!
//! Tiles live at `<root>/<z>/<tile_y>/<tile_x>.png`. The builder writes this
//! layout and the tile server reads it back; nothing else is shared between
//! the two.

use std::fmt;
use std::path::{Path, PathBuf};

/// File extension of every tile.
pub const TILE_EXTENSION: &str = "png";

/// Address of a single tile in the pyramid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    /// Zoom level (0 = native resolution, negative = coarser)
    pub z: i32,

    /// Tile column (0-indexed from left)
    pub x: u32,

    /// Tile row (0-indexed from top)
    pub y: u32,
}

impl TileCoord {
    pub fn new(z: i32, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Parse the URL segments `{z}/{y}/{x}.png`.
    ///
    /// Returns `None` for anything that cannot name a tile: a non-integer
    /// zoom, a negative or non-integer index, or a filename without the
    /// `.png` extension.
    pub fn from_segments(z: &str, y: &str, filename: &str) -> Option<Self> {
        let x = filename.strip_suffix(".png")?;
        Some(Self {
            z: parse_decimal(z)?,
            x: parse_decimal(x)?,
            y: parse_decimal(y)?,
        })
    }

    /// Path of the tile relative to the pyramid root.
    pub fn relative_path(&self) -> PathBuf {
        self.row_dir(Path::new(""))
            .join(format!("{}.{}", self.x, TILE_EXTENSION))
    }

    /// Path of the tile under `root`.
    pub fn resolve(&self, root: &Path) -> PathBuf {
        root.join(self.relative_path())
    }

    /// Directory holding every tile of this tile's row.
    pub fn row_dir(&self, root: &Path) -> PathBuf {
        root.join(self.z.to_string()).join(self.y.to_string())
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.y, self.x)
    }
}

/// Parse a decimal integer in the form the builder writes it.
///
/// Leading zeros, a `+` sign and `-0` are rejected.
fn parse_decimal<T>(s: &str) -> Option<T>
where
    T: std::str::FromStr + ToString,
{
    let value: T = s.parse().ok()?;
    (value.to_string() == s).then_some(value)
}
