//! Lunar Tiles - tile pyramid generator and tile server.
//!
//! This binary parses the CLI and dispatches to the `build`, `serve` or
//! `convert-features` command.

use clap::Parser;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lunar_tiles::{
    config::{BuildConfig, Cli, Command, FeaturesConfig, ServeConfig},
    features::convert_features,
    server::{create_router, RouterConfig},
    tile::FsTileSource,
    PyramidBuilder,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Build(config) => run_build(config).await,
        Command::Serve(config) => run_serve(config).await,
        Command::ConvertFeatures(config) => run_convert_features(config),
    }
}

// =============================================================================
// Build Command
// =============================================================================

async fn run_build(config: BuildConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Configuration:");
    info!("  Source: {}", config.source.display());
    info!("  Output: {}", config.output.display());
    info!("  Tile size: {}px", config.tile_size);
    info!("  Max zoom: {}", config.max_zoom);
    match config.threads {
        Some(threads) => info!("  Threads: {}", threads),
        None => info!("  Threads: one per core"),
    }

    let builder = PyramidBuilder::new(config.build_options());
    let started = Instant::now();

    // Decoding and resampling are CPU bound; keep them off the async workers.
    let result =
        tokio::task::spawn_blocking(move || builder.build(&config.source, &config.output)).await;

    match result {
        Ok(Ok(stats)) => {
            info!("");
            info!(
                "Done in {:.1}s: {} tiles, {} levels (z={} to z={}), {} skipped",
                started.elapsed().as_secs_f64(),
                stats.tiles,
                stats.levels,
                stats.min_zoom,
                stats.max_zoom,
                stats.skipped_levels
            );
            info!("Tiles are laid out as {{z}}/{{y}}/{{x}}.png");
            ExitCode::SUCCESS
        }
        Ok(Err(e)) => {
            error!("Build failed: {}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("Build task panicked: {}", e);
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// Serve Command
// =============================================================================

async fn run_serve(config: ServeConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Configuration:");
    info!("  Tiles directory: {}", config.tiles_dir.display());
    info!("  Cache max-age: {}s", config.cache_max_age);
    match config.cors_origins {
        Some(ref origins) => info!("  CORS origins: {}", origins.join(", ")),
        None => info!("  CORS origins: any"),
    }

    let source = FsTileSource::new(&config.tiles_dir);
    let router = create_router(source, build_router_config(&config));

    let addr = config.bind_address();

    info!("");
    info!("────────────────────────────────────────────────────────────────");
    info!("  Server listening on: http://{}", addr);
    info!("");
    info!("  Try these endpoints:");
    info!("    curl http://{}/health", addr);
    info!("    curl -o tile.png http://{}/tiles/0/0/0.png", addr);
    info!("────────────────────────────────────────────────────────────────");
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

// =============================================================================
// Convert Features Command
// =============================================================================

fn run_convert_features(config: FeaturesConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    match convert_features(&config.source, &config.output) {
        Ok(catalogue) => {
            info!(
                "Wrote {} features to {}",
                catalogue.features.len(),
                config.output.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Feature conversion failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Build RouterConfig from the application ServeConfig.
fn build_router_config(config: &ServeConfig) -> RouterConfig {
    let mut router_config = RouterConfig::new().with_cache_max_age(config.cache_max_age);

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config.with_tracing(!config.no_tracing)
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "lunar_tiles=debug,tower_http=debug"
    } else {
        "lunar_tiles=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
