//! # Lunar Tiles
//!
//! Tile pyramid generator and static tile server for a lunar imagery viewer.
//!
//! A single large raster (typically a global lunar mosaic) is sliced into a
//! pyramid of 256×256 PNG tiles laid out as `<z>/<y>/<x>.png`, following the
//! Leaflet `CRS.Simple` convention: zoom 0 is native resolution, each negative
//! level halves it, and the coarsest level fits the whole image in one tile.
//! The bundled server then answers `GET /tiles/{z}/{y}/{x}.png` straight from
//! that directory tree. A third command converts the lunar nomenclature CSV
//! into the feature list the viewer searches.
//!
//! ## Architecture
//!
//! - [`pyramid`] - Zoom math, tile layout and the pyramid builder
//! - [`tile`] - Tile storage backends read by the server
//! - [`server`] - Axum-based HTTP server and routes
//! - [`features`] - Feature catalogue CSV to JSON conversion
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use lunar_tiles::{create_router, FsTileSource, PyramidBuilder, RouterConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let stats = PyramidBuilder::default()
//!         .build(Path::new("Assets/Moon.tiff"), Path::new("tiles/moon"))?;
//!     println!("wrote {} tiles", stats.tiles);
//!
//!     let router = create_router(FsTileSource::new("tiles/moon"), RouterConfig::new());
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await?;
//!     axum::serve(listener, router).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod features;
pub mod pyramid;
pub mod server;
pub mod tile;

// Re-export commonly used types
pub use config::{BuildConfig, Cli, Command, FeaturesConfig, ServeConfig};
pub use error::{BuildError, FeatureError, TileError};
pub use features::{convert_features, Feature, FeatureCatalogue};
pub use pyramid::{
    build, min_zoom, plan_levels, BuildOptions, PyramidBuilder, PyramidStats, TileCoord,
    ZoomLevel, DEFAULT_MAX_ZOOM, DEFAULT_TILE_SIZE,
};
pub use server::{create_router, AppState, RouterConfig};
pub use tile::{FsTileSource, TileSource};
