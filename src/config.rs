//! Configuration management for Lunar Tiles.
//!
//! Command-line arguments are parsed with clap. Every option can also be set
//! through an environment variable with the `LUNAR_` prefix.
//!
//! # Commands
//!
//! - `build` - Slice a source image into a tile pyramid
//! - `serve` - Serve a generated pyramid over HTTP
//! - `convert-features` - Convert the lunar feature CSV to the viewer's JSON
//!
//! # Environment Variables
//!
//! - `LUNAR_OUTPUT_DIR` - Pyramid output directory (default: tiles/moon)
//! - `LUNAR_TILE_SIZE` - Tile edge length in pixels (default: 256)
//! - `LUNAR_MAX_ZOOM` - Finest zoom level (default: 0)
//! - `LUNAR_THREADS` - Tile writer threads (default: one per core)
//! - `LUNAR_HOST` - Server bind address (default: 127.0.0.1)
//! - `LUNAR_PORT` - Server port (default: 5000)
//! - `LUNAR_TILES_DIR` - Pyramid directory to serve (default: tiles/moon)
//! - `LUNAR_CACHE_MAX_AGE` - HTTP cache max-age seconds (default: 3600)
//! - `LUNAR_CORS_ORIGINS` - Allowed CORS origins, comma-separated (default: any)
//! - `LUNAR_FEATURES_OUTPUT` - Feature JSON output file (default: features_all.json)

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::features::DEFAULT_FEATURES_OUTPUT;
use crate::pyramid::{BuildOptions, DEFAULT_MAX_ZOOM, DEFAULT_TILE_SIZE};
use crate::server::DEFAULT_CACHE_MAX_AGE;

// =============================================================================
// Default Values
// =============================================================================

/// Default pyramid directory, shared by `build` and `serve`.
pub const DEFAULT_TILES_DIR: &str = "tiles/moon";

/// Default server host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port.
pub const DEFAULT_PORT: u16 = 5000;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Lunar Tiles - tile pyramid generator and tile server for lunar imagery.
#[derive(Parser, Debug, Clone)]
#[command(name = "lunar-tiles")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn into_command(self) -> Command {
        self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Slice a source image into a zoomable tile pyramid.
    Build(BuildConfig),

    /// Serve a generated tile pyramid over HTTP.
    Serve(ServeConfig),

    /// Convert the lunar feature CSV into the viewer's JSON feature list.
    ConvertFeatures(FeaturesConfig),
}

// =============================================================================
// Build Command
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct BuildConfig {
    /// Source raster image (TIFF, PNG or JPEG).
    pub source: PathBuf,

    /// Directory the pyramid is written to.
    #[arg(short, long, default_value = DEFAULT_TILES_DIR, env = "LUNAR_OUTPUT_DIR")]
    pub output: PathBuf,

    /// Tile edge length in pixels.
    #[arg(long, default_value_t = DEFAULT_TILE_SIZE, env = "LUNAR_TILE_SIZE")]
    pub tile_size: u32,

    /// Finest zoom level to generate (0 = native resolution).
    #[arg(long, default_value_t = DEFAULT_MAX_ZOOM, env = "LUNAR_MAX_ZOOM", allow_hyphen_values = true)]
    pub max_zoom: i32,

    /// Number of tile writer threads (defaults to one per core).
    #[arg(long, env = "LUNAR_THREADS")]
    pub threads: Option<usize>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl BuildConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.tile_size == 0 {
            return Err("tile_size must be greater than 0".to_string());
        }

        if self.threads == Some(0) {
            return Err("threads must be greater than 0".to_string());
        }

        if self.source.as_os_str().is_empty() {
            return Err("A source image path is required".to_string());
        }

        Ok(())
    }

    /// Builder options for this configuration.
    pub fn build_options(&self) -> BuildOptions {
        let options = BuildOptions::new(self.tile_size, self.max_zoom);
        match self.threads {
            Some(threads) => options.with_threads(threads),
            None => options,
        }
    }
}

// =============================================================================
// Serve Command
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct ServeConfig {
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "LUNAR_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "LUNAR_PORT")]
    pub port: u16,

    /// Directory containing the generated pyramid.
    #[arg(long, default_value = DEFAULT_TILES_DIR, env = "LUNAR_TILES_DIR")]
    pub tiles_dir: PathBuf,

    /// HTTP Cache-Control max-age in seconds.
    #[arg(long, default_value_t = DEFAULT_CACHE_MAX_AGE, env = "LUNAR_CACHE_MAX_AGE")]
    pub cache_max_age: u32,

    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "LUNAR_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl ServeConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.host.is_empty() {
            return Err("host must not be empty".to_string());
        }

        if !self.tiles_dir.is_dir() {
            return Err(format!(
                "Tiles directory '{}' does not exist. Run `lunar-tiles build` first \
                 or set --tiles-dir / LUNAR_TILES_DIR",
                self.tiles_dir.display()
            ));
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =============================================================================
// Convert Features Command
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct FeaturesConfig {
    /// Feature catalogue CSV.
    #[arg(value_name = "CSV")]
    pub source: PathBuf,

    /// JSON file the feature list is written to.
    #[arg(short, long, default_value = DEFAULT_FEATURES_OUTPUT, env = "LUNAR_FEATURES_OUTPUT")]
    pub output: PathBuf,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl FeaturesConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.output.as_os_str().is_empty() {
            return Err("An output path is required".to_string());
        }

        if self.source == self.output {
            return Err("Output must not overwrite the source CSV".to_string());
        }

        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
