//! Tile pyramid generation.
//!
//! This module slices one large raster into a multi-resolution set of
//! fixed-size PNG tiles, laid out for a Leaflet `CRS.Simple` map.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             PyramidBuilder              │
//! │   open source → for each zoom level:    │
//! │     resize (Lanczos3) → crop → PNG      │
//! └──────────┬───────────────────┬──────────┘
//!            │                   │
//!            ▼                   ▼
//! ┌────────────────────┐ ┌────────────────────┐
//! │       levels       │ │       layout       │
//! │ (zoom range, grid, │ │ (<z>/<y>/<x>.png)  │
//! │  edge tile sizes)  │ │                    │
//! └────────────────────┘ └────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`PyramidBuilder`]: Runs a full build and reports [`PyramidStats`]
//! - [`ZoomLevel`]: Dimensions and tile grid of one level
//! - [`TileCoord`]: Tile address and its on-disk path
//!
//! # Example
//!
//! ```
//! use lunar_tiles::pyramid::{min_zoom, plan_levels};
//!
//! // A 300x300 image needs one halving to fit a 256 pixel tile
//! assert_eq!(min_zoom(300, 300, 256), -1);
//!
//! let levels = plan_levels(300, 300, 256, 0);
//! assert_eq!(levels.len(), 2);
//! assert_eq!(levels[0].tile_count(256), 1);
//! assert_eq!(levels[1].tile_count(256), 4);
//! ```

mod builder;
mod layout;
mod levels;

pub use builder::{build, open_source, BuildOptions, PyramidBuilder, PyramidStats, RESAMPLE_FILTER};
pub use layout::{TileCoord, TILE_EXTENSION};
pub use levels::{
    checked_level_dimensions, level_dimensions, min_zoom, plan_levels, tile_extent, tiles_across,
    zoom_range, ZoomLevel, DEFAULT_MAX_ZOOM, DEFAULT_TILE_SIZE,
};
