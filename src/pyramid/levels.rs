//! Zoom level arithmetic.
//!
//! Levels follow the simple (non-geographic) CRS convention used by Leaflet:
//! zoom 0 is native resolution and each step down halves both dimensions.
//! The coarsest level is the first one at which the whole image fits in a
//! single tile.
//!
//! ```text
//!   z = 0    300×300   ┌────┬──┐
//!                      │0,0 │1,0
//!                      ├────┼──┤
//!                      │0,1 │1,1
//!                      └────┴──┘
//!   z = -1   150×150   ┌───┐
//!                      │0,0│
//!                      └───┘
//! ```

use std::ops::RangeInclusive;

use super::layout::TileCoord;

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// Default finest zoom level (native resolution).
pub const DEFAULT_MAX_ZOOM: i32 = 0;

// =============================================================================
// Zoom Math
// =============================================================================

/// Compute the coarsest zoom level at which an image of `width × height`
/// fits inside one `tile_size` tile.
///
/// This is `-ceil(log2(max(width, height) / tile_size))`, evaluated with
/// integer arithmetic so exact powers of two land on the right level.
/// Images already no larger than one tile get level 0.
pub fn min_zoom(width: u32, height: u32, tile_size: u32) -> i32 {
    debug_assert!(tile_size > 0);
    let max_dim = u64::from(width.max(height));
    let tile_size = u64::from(tile_size.max(1));

    let mut halvings = 0i32;
    while (tile_size << halvings) < max_dim {
        halvings += 1;
    }
    -halvings
}

/// Dimensions of the source raster rescaled by `2^z`.
///
/// Rounds half to even, so a 301 pixel edge becomes 150 at `z = -1`.
pub fn level_dimensions(width: u32, height: u32, z: i32) -> (u32, u32) {
    let scale = 2f64.powi(z);
    let scaled = |len: u32| (f64::from(len) * scale).round_ties_even() as u32;
    (scaled(width), scaled(height))
}

/// Like [`level_dimensions`], but `None` when a scaled dimension does not
/// fit in `u32`.
pub fn checked_level_dimensions(width: u32, height: u32, z: i32) -> Option<(u32, u32)> {
    let scale = 2f64.powi(z);
    let scaled = |len: u32| {
        let value = (f64::from(len) * scale).round_ties_even();
        (value <= f64::from(u32::MAX)).then_some(value as u32)
    };
    Some((scaled(width)?, scaled(height)?))
}

/// The inclusive range of zoom levels a build visits.
///
/// Empty when `max_zoom` is coarser than the computed minimum.
pub fn zoom_range(width: u32, height: u32, tile_size: u32, max_zoom: i32) -> RangeInclusive<i32> {
    min_zoom(width, height, tile_size)..=max_zoom
}

/// Number of tiles needed to cover `len` pixels.
#[inline]
pub fn tiles_across(len: u32, tile_size: u32) -> u32 {
    len.div_ceil(tile_size)
}

/// Pixel extent of the tile at `index` along an axis of `len` pixels.
///
/// Every tile is `tile_size` long except the last, which holds the remainder.
#[inline]
pub fn tile_extent(index: u32, len: u32, tile_size: u32) -> u32 {
    let start = u64::from(index) * u64::from(tile_size);
    let remaining = u64::from(len).saturating_sub(start);
    remaining.min(u64::from(tile_size)) as u32
}

// =============================================================================
// Zoom Level
// =============================================================================

/// One level of the pyramid with its rescaled dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoomLevel {
    /// Zoom level (0 = native, negative = coarser)
    pub z: i32,

    /// Width of the level raster in pixels
    pub width: u32,

    /// Height of the level raster in pixels
    pub height: u32,
}

impl ZoomLevel {
    /// Describe level `z` of a `source_width × source_height` raster.
    pub fn new(source_width: u32, source_height: u32, z: i32) -> Self {
        let (width, height) = level_dimensions(source_width, source_height, z);
        Self { z, width, height }
    }

    /// A level is degenerate when either scaled dimension rounds below one pixel.
    pub fn is_degenerate(&self) -> bool {
        self.width < 1 || self.height < 1
    }

    /// Number of tile columns.
    pub fn tiles_x(&self, tile_size: u32) -> u32 {
        tiles_across(self.width, tile_size)
    }

    /// Number of tile rows.
    pub fn tiles_y(&self, tile_size: u32) -> u32 {
        tiles_across(self.height, tile_size)
    }

    /// Total tiles in this level's grid.
    pub fn tile_count(&self, tile_size: u32) -> u64 {
        u64::from(self.tiles_x(tile_size)) * u64::from(self.tiles_y(tile_size))
    }

    /// Pixel size of the tile at `(tile_x, tile_y)`.
    pub fn tile_dimensions(&self, tile_x: u32, tile_y: u32, tile_size: u32) -> (u32, u32) {
        (
            tile_extent(tile_x, self.width, tile_size),
            tile_extent(tile_y, self.height, tile_size),
        )
    }

    /// Every tile coordinate of this level, row by row.
    pub fn tile_coords(&self, tile_size: u32) -> impl Iterator<Item = TileCoord> {
        let z = self.z;
        let tiles_x = self.tiles_x(tile_size);
        (0..self.tiles_y(tile_size))
            .flat_map(move |y| (0..tiles_x).map(move |x| TileCoord::new(z, x, y)))
    }
}

/// Describe every level a build visits, degenerate ones included.
pub fn plan_levels(width: u32, height: u32, tile_size: u32, max_zoom: i32) -> Vec<ZoomLevel> {
    zoom_range(width, height, tile_size, max_zoom)
        .map(|z| ZoomLevel::new(width, height, z))
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
