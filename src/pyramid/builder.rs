//! Tile pyramid generation.
//!
//! The builder decodes one source raster, then for each zoom level from the
//! coarsest to `max_zoom`:
//!
//! 1. rescales the source with a Lanczos filter,
//! 2. cuts the level raster into `tile_size` squares (edge tiles are cropped,
//!    not padded),
//! 3. writes each tile as PNG to `<output>/<z>/<tile_y>/<tile_x>.png`.
//!
//! Only one level raster is alive at a time. Tiles within a level are written
//! in parallel; levels are processed one after another.

use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::Path;
use std::time::Instant;

use image::imageops::FilterType;
use image::{DynamicImage, ImageError, ImageFormat, ImageReader};
use rayon::prelude::*;
use tracing::{debug, info, trace};

use crate::error::BuildError;

use super::layout::TileCoord;
use super::levels::{
    checked_level_dimensions, min_zoom, plan_levels, ZoomLevel, DEFAULT_MAX_ZOOM,
    DEFAULT_TILE_SIZE,
};

/// Resampling filter used for every level.
pub const RESAMPLE_FILTER: FilterType = FilterType::Lanczos3;

// =============================================================================
// Options & Stats
// =============================================================================

/// Parameters of a pyramid build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Tile edge length in pixels
    pub tile_size: u32,

    /// Finest zoom level to generate (0 = native resolution)
    pub max_zoom: i32,

    /// Worker threads for tile writes (None = one per core)
    pub threads: Option<usize>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            max_zoom: DEFAULT_MAX_ZOOM,
            threads: None,
        }
    }
}

impl BuildOptions {
    pub fn new(tile_size: u32, max_zoom: i32) -> Self {
        Self {
            tile_size,
            max_zoom,
            threads: None,
        }
    }

    /// Set the number of worker threads. `1` writes tiles sequentially.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn validate(&self) -> Result<(), BuildError> {
        if self.tile_size == 0 {
            return Err(BuildError::InvalidTileSize(self.tile_size));
        }
        Ok(())
    }

    /// Validate the options against a `width × height` source.
    ///
    /// Fails when the finest requested level would not fit in `u32` pixels.
    pub fn validate_for(&self, width: u32, height: u32) -> Result<(), BuildError> {
        self.validate()?;
        if checked_level_dimensions(width, height, self.max_zoom).is_none() {
            return Err(BuildError::ZoomTooDeep {
                max_zoom: self.max_zoom,
                width,
                height,
            });
        }
        Ok(())
    }
}

/// Summary of a finished build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PyramidStats {
    /// Width of the source raster
    pub source_width: u32,

    /// Height of the source raster
    pub source_height: u32,

    /// Coarsest zoom level visited
    pub min_zoom: i32,

    /// Finest zoom level visited
    pub max_zoom: i32,

    /// Levels that produced tiles
    pub levels: usize,

    /// Levels skipped because a scaled dimension rounded below one pixel
    pub skipped_levels: usize,

    /// Tile files written
    pub tiles: u64,
}

// =============================================================================
// Builder
// =============================================================================

/// Builds a tile pyramid from a single raster.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use lunar_tiles::pyramid::{BuildOptions, PyramidBuilder};
///
/// let builder = PyramidBuilder::new(BuildOptions::default());
/// let stats = builder.build(Path::new("Assets/Moon.tiff"), Path::new("tiles/moon"))?;
/// println!("{} tiles across {} levels", stats.tiles, stats.levels);
/// # Ok::<(), lunar_tiles::BuildError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct PyramidBuilder {
    options: BuildOptions,
}

impl PyramidBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    /// Decode `source` and write its full pyramid under `output_dir`.
    ///
    /// Source errors are reported before anything is written. A write failure
    /// aborts the run; tiles already on disk are left in place. Existing tiles
    /// at the same paths are overwritten.
    pub fn build(&self, source: &Path, output_dir: &Path) -> Result<PyramidStats, BuildError> {
        self.options.validate()?;

        info!("Opening image: {}", source.display());
        let image = open_source(source)?;

        self.build_from_image(&image, output_dir)
    }

    /// Write the pyramid of an already decoded raster under `output_dir`.
    pub fn build_from_image(
        &self,
        image: &DynamicImage,
        output_dir: &Path,
    ) -> Result<PyramidStats, BuildError> {
        let (width, height) = (image.width(), image.height());
        self.options.validate_for(width, height)?;
        let tile_size = self.options.tile_size;

        let coarsest = min_zoom(width, height, tile_size);
        let plan = plan_levels(width, height, tile_size, self.options.max_zoom);

        info!("Source size: {}x{} pixels", width, height);
        info!(
            "Zoom range: z={} to z={} ({} levels)",
            coarsest,
            self.options.max_zoom,
            plan.len()
        );

        fs::create_dir_all(output_dir).map_err(|e| BuildError::io_write(output_dir, e))?;

        let pool = worker_pool(self.options.threads)?;

        let mut stats = PyramidStats {
            source_width: width,
            source_height: height,
            min_zoom: coarsest,
            max_zoom: self.options.max_zoom,
            ..Default::default()
        };

        for level in plan {
            if level.is_degenerate() {
                debug!(
                    z = level.z,
                    "Skipping level: scales to {}x{}", level.width, level.height
                );
                stats.skipped_levels += 1;
                continue;
            }

            let started = Instant::now();
            info!(
                "Processing z={} ({}x{}, {} tiles)",
                level.z,
                level.width,
                level.height,
                level.tile_count(tile_size)
            );

            let raster = render_level(image, &level);
            let written = pool.install(|| write_level(&raster, &level, tile_size, output_dir))?;

            debug!(
                z = level.z,
                tiles = written,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Level complete"
            );
            stats.levels += 1;
            stats.tiles += written;
        }

        info!(
            "Pyramid complete: {} tiles in {} levels under {}",
            stats.tiles,
            stats.levels,
            output_dir.display()
        );

        Ok(stats)
    }
}

/// Build a pyramid with explicit parameters.
///
/// Equivalent to `PyramidBuilder::new(BuildOptions::new(tile_size, max_zoom)).build(..)`.
pub fn build(
    source: &Path,
    output_dir: &Path,
    tile_size: u32,
    max_zoom: i32,
) -> Result<PyramidStats, BuildError> {
    PyramidBuilder::new(BuildOptions::new(tile_size, max_zoom)).build(source, output_dir)
}

// =============================================================================
// Source Loading
// =============================================================================

/// Open and fully decode the source raster.
///
/// No pixel-count limit is applied; lunar mosaics routinely exceed the
/// decoder's defaults.
pub fn open_source(path: &Path) -> Result<DynamicImage, BuildError> {
    let not_found = |e: io::Error| BuildError::SourceNotFound {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut reader = ImageReader::open(path)
        .map_err(not_found)?
        .with_guessed_format()
        .map_err(not_found)?;
    reader.no_limits();

    let image = reader.decode().map_err(|e| BuildError::UnsupportedFormat {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    Ok(png_compatible(image))
}

/// PNG has no floating point samples; widen-to-16-bit is the closest fit.
fn png_compatible(image: DynamicImage) -> DynamicImage {
    match image {
        DynamicImage::ImageRgb32F(_) => DynamicImage::ImageRgb16(image.to_rgb16()),
        DynamicImage::ImageRgba32F(_) => DynamicImage::ImageRgba16(image.to_rgba16()),
        other => other,
    }
}

// =============================================================================
// Level Rendering
// =============================================================================

/// Rescale the source to the level's dimensions.
///
/// The native level borrows the source unchanged.
fn render_level<'a>(source: &'a DynamicImage, level: &ZoomLevel) -> Cow<'a, DynamicImage> {
    if (source.width(), source.height()) == (level.width, level.height) {
        Cow::Borrowed(source)
    } else {
        Cow::Owned(source.resize_exact(level.width, level.height, RESAMPLE_FILTER))
    }
}

/// Write every tile of one level. Returns the number of tiles written.
fn write_level(
    raster: &DynamicImage,
    level: &ZoomLevel,
    tile_size: u32,
    output_dir: &Path,
) -> Result<u64, BuildError> {
    let coords: Vec<TileCoord> = level.tile_coords(tile_size).collect();

    coords
        .par_iter()
        .try_for_each(|coord| write_tile(raster, level, coord, tile_size, output_dir))?;

    Ok(coords.len() as u64)
}

fn write_tile(
    raster: &DynamicImage,
    level: &ZoomLevel,
    coord: &TileCoord,
    tile_size: u32,
    output_dir: &Path,
) -> Result<(), BuildError> {
    let (width, height) = level.tile_dimensions(coord.x, coord.y, tile_size);
    let tile = raster.crop_imm(coord.x * tile_size, coord.y * tile_size, width, height);

    let row_dir = coord.row_dir(output_dir);
    fs::create_dir_all(&row_dir).map_err(|e| BuildError::io_write(&row_dir, e))?;

    let path = coord.resolve(output_dir);
    tile.save_with_format(&path, ImageFormat::Png)
        .map_err(|e| match e {
            ImageError::IoError(io_err) => BuildError::io_write(&path, io_err),
            other => BuildError::Encode {
                path: path.clone(),
                message: other.to_string(),
            },
        })?;

    trace!(tile = %coord, width, height, "Wrote tile");
    Ok(())
}

fn worker_pool(threads: Option<usize>) -> Result<rayon::ThreadPool, BuildError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads.unwrap_or(0))
        .thread_name(|i| format!("tile-writer-{i}"))
        .build()
        .map_err(|e| BuildError::ThreadPool(e.to_string()))
}

// =============================================================================
// Tests
// =============================================================================
