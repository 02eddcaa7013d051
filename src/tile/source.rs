//! Tile storage backends.
//!
//! The server reads tiles through the [`TileSource`] trait so the HTTP layer
//! does not depend on where the pyramid lives. [`FsTileSource`] reads the
//! directory tree written by the pyramid builder.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::trace;

use crate::error::TileError;
use crate::pyramid::TileCoord;

// =============================================================================
// TileSource Trait
// =============================================================================

/// Read access to an existing tile pyramid.
#[async_trait]
pub trait TileSource: Send + Sync {
    /// Fetch the encoded bytes of one tile.
    ///
    /// Returns `Ok(None)` when the pyramid has no tile at `coord`.
    async fn read_tile(&self, coord: TileCoord) -> Result<Option<Bytes>, TileError>;
}

// =============================================================================
// Filesystem Source
// =============================================================================

/// Serves tiles from `<root>/<z>/<y>/<x>.png`.
///
/// # Example
///
/// ```no_run
/// use lunar_tiles::pyramid::TileCoord;
/// use lunar_tiles::tile::{FsTileSource, TileSource};
///
/// # async fn example() -> Result<(), lunar_tiles::TileError> {
/// let source = FsTileSource::new("tiles/moon");
/// if let Some(png) = source.read_tile(TileCoord::new(-1, 0, 0)).await? {
///     println!("{} bytes", png.len());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FsTileSource {
    root: PathBuf,
}

impl FsTileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the pyramid.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl TileSource for FsTileSource {
    async fn read_tile(&self, coord: TileCoord) -> Result<Option<Bytes>, TileError> {
        let path = coord.resolve(&self.root);

        match tokio::fs::read(&path).await {
            Ok(data) => {
                trace!(tile = %coord, bytes = data.len(), "Read tile");
                Ok(Some(Bytes::from(data)))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(TileError::Io {
                path,
                message: e.to_string(),
            }),
        }
    }
}
