//! HTTP server layer for the tile pyramid.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │                 GET /tiles/{z}/{y}/{x}.png                      │
//! │                                                                 │
//! │        ┌─────────────────┐        ┌─────────────────────┐       │
//! │        │    handlers     │        │       routes        │       │
//! │        │   (requests)    │        │  (router, CORS)     │       │
//! │        └─────────────────┘        └─────────────────────┘       │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    health_handler, tile_handler, AppState, ErrorResponse, HealthResponse, TilePathParams,
    DEFAULT_CACHE_MAX_AGE,
};
pub use routes::{create_router, RouterConfig};
