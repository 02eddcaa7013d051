//! Tile storage layer.
//!
//! The tile server is a pure key→file lookup: a [`TileCoord`] parsed from the
//! request path resolves to one PNG produced by the pyramid builder.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              HTTP Handlers              │
//! └────────────────────┬────────────────────┘
//!                      │  TileCoord
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │            TileSource Trait             │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │             FsTileSource                │
//! │       (<root>/<z>/<y>/<x>.png)          │
//! └─────────────────────────────────────────┘
//! ```
//!
//! [`TileCoord`]: crate::pyramid::TileCoord

mod source;

pub use source::{FsTileSource, TileSource};
