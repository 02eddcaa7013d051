//! Pyramid generation tests against the real filesystem.
//!
//! Tests verify:
//! - Level range and per-level tile grids
//! - Edge tile cropping
//! - Degenerate level skipping
//! - Idempotent regeneration
//! - Error kinds for bad sources and unwritable outputs

use std::collections::BTreeSet;
use std::path::PathBuf;

use image::GenericImageView;

use lunar_tiles::pyramid::{build, BuildOptions, PyramidBuilder, TileCoord, ZoomLevel};
use lunar_tiles::BuildError;

use super::test_utils::{
    gradient_image, list_files, tile_dimensions, tiles_in_level, write_source_image,
};

fn paths(items: &[&str]) -> BTreeSet<PathBuf> {
    items.iter().map(PathBuf::from).collect()
}

// =============================================================================
// Reference Scenarios
// =============================================================================

#[test]
fn test_300_pixel_source_produces_two_levels() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source_image(dir.path(), "moon.png", 300, 300);
    let out = dir.path().join("tiles");

    let stats = build(&source, &out, 256, 0).unwrap();

    assert_eq!(stats.min_zoom, -1);
    assert_eq!(stats.max_zoom, 0);
    assert_eq!(stats.levels, 2);
    assert_eq!(stats.skipped_levels, 0);
    assert_eq!(stats.tiles, 5);

    assert_eq!(
        list_files(&out),
        paths(&[
            "-1/0/0.png",
            "0/0/0.png",
            "0/0/1.png",
            "0/1/0.png",
            "0/1/1.png",
        ])
    );

    assert_eq!(tile_dimensions(&out, TileCoord::new(-1, 0, 0)), (150, 150));
    assert_eq!(tile_dimensions(&out, TileCoord::new(0, 0, 0)), (256, 256));
    assert_eq!(tile_dimensions(&out, TileCoord::new(0, 1, 0)), (44, 256));
    assert_eq!(tile_dimensions(&out, TileCoord::new(0, 0, 1)), (256, 44));
    assert_eq!(tile_dimensions(&out, TileCoord::new(0, 1, 1)), (44, 44));
}

#[test]
fn test_single_tile_source() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source_image(dir.path(), "moon.png", 256, 256);
    let out = dir.path().join("tiles");

    let stats = build(&source, &out, 256, 0).unwrap();

    assert_eq!(stats.min_zoom, 0);
    assert_eq!(stats.levels, 1);
    assert_eq!(stats.tiles, 1);
    assert_eq!(list_files(&out), paths(&["0/0/0.png"]));
    assert_eq!(tile_dimensions(&out, TileCoord::new(0, 0, 0)), (256, 256));
}

#[test]
fn test_native_tiles_are_exact_crops() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source_image(dir.path(), "moon.png", 300, 300);
    let out = dir.path().join("tiles");

    build(&source, &out, 256, 0).unwrap();

    let original = gradient_image(300, 300);
    let tile = image::open(TileCoord::new(0, 1, 1).resolve(&out))
        .unwrap()
        .to_rgb8();
    for (x, y, pixel) in tile.enumerate_pixels() {
        assert_eq!(pixel, original.get_pixel(256 + x, 256 + y));
    }
}

// =============================================================================
// Grid Properties
// =============================================================================

#[test]
fn test_tile_count_and_dimensions_per_level() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source_image(dir.path(), "moon.png", 1000, 600);
    let out = dir.path().join("tiles");
    let tile_size = 256;

    let stats = build(&source, &out, tile_size, 0).unwrap();
    assert_eq!(stats.min_zoom, -2);
    // 250x150 -> 1, 500x300 -> 4, 1000x600 -> 12
    assert_eq!(stats.tiles, 1 + 4 + 12);

    for z in stats.min_zoom..=stats.max_zoom {
        let level = ZoomLevel::new(1000, 600, z);
        let files = tiles_in_level(&out, z);
        assert_eq!(
            files.len() as u64,
            level.tile_count(tile_size),
            "tile count at z={z}"
        );

        for coord in level.tile_coords(tile_size) {
            assert_eq!(
                tile_dimensions(&out, coord),
                level.tile_dimensions(coord.x, coord.y, tile_size),
                "dimensions of {coord}"
            );
        }
    }
}

#[test]
fn test_max_zoom_above_native_upscales() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source_image(dir.path(), "moon.png", 300, 300);
    let out = dir.path().join("tiles");

    let stats = build(&source, &out, 256, 1).unwrap();

    assert_eq!(stats.levels, 3);
    // z=1 is 600x600 -> 3x3 tiles
    assert_eq!(tiles_in_level(&out, 1).len(), 9);
    assert_eq!(tile_dimensions(&out, TileCoord::new(1, 2, 2)), (88, 88));
}

#[test]
fn test_degenerate_levels_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source_image(dir.path(), "strip.png", 1000, 1);
    let out = dir.path().join("tiles");

    let stats = build(&source, &out, 256, 0).unwrap();

    // z=-2 and z=-1 round the height to 0
    assert_eq!(stats.min_zoom, -2);
    assert_eq!(stats.skipped_levels, 2);
    assert_eq!(stats.levels, 1);
    assert_eq!(stats.tiles, 4);
    assert!(tiles_in_level(&out, -1).is_empty());
    assert!(!out.join("-2").exists());
    assert_eq!(tile_dimensions(&out, TileCoord::new(0, 3, 0)), (232, 1));
}

#[test]
fn test_tiff_source() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source_image(dir.path(), "Moon.tiff", 520, 130);
    let out = dir.path().join("tiles");

    let stats = build(&source, &out, 256, 0).unwrap();

    assert_eq!(stats.min_zoom, -2);
    assert_eq!(stats.tiles, 1 + 2 + 3);
    assert_eq!(tile_dimensions(&out, TileCoord::new(-2, 0, 0)), (130, 32));
}

// =============================================================================
// Regeneration
// =============================================================================

#[test]
fn test_rebuild_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source_image(dir.path(), "moon.png", 700, 500);
    let out = dir.path().join("tiles");

    let first = build(&source, &out, 256, 0).unwrap();
    let files_first = list_files(&out);
    let bytes_first = std::fs::read(TileCoord::new(-1, 1, 0).resolve(&out)).unwrap();

    let second = build(&source, &out, 256, 0).unwrap();
    let files_second = list_files(&out);
    let bytes_second = std::fs::read(TileCoord::new(-1, 1, 0).resolve(&out)).unwrap();

    assert_eq!(first, second);
    assert_eq!(files_first, files_second);
    assert_eq!(bytes_first, bytes_second);
}

#[test]
fn test_existing_tiles_are_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source_image(dir.path(), "moon.png", 256, 256);
    let out = dir.path().join("tiles");

    let stale = TileCoord::new(0, 0, 0);
    std::fs::create_dir_all(stale.row_dir(&out)).unwrap();
    std::fs::write(stale.resolve(&out), b"stale").unwrap();

    build(&source, &out, 256, 0).unwrap();

    let tile = image::open(stale.resolve(&out)).unwrap();
    assert_eq!(tile.dimensions(), (256, 256));
}

#[test]
fn test_sequential_and_parallel_builds_match() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source_image(dir.path(), "moon.png", 600, 400);
    let sequential = dir.path().join("sequential");
    let parallel = dir.path().join("parallel");

    PyramidBuilder::new(BuildOptions::default().with_threads(1))
        .build(&source, &sequential)
        .unwrap();
    PyramidBuilder::new(BuildOptions::default().with_threads(4))
        .build(&source, &parallel)
        .unwrap();

    let files = list_files(&sequential);
    assert_eq!(files, list_files(&parallel));
    for file in files {
        assert_eq!(
            std::fs::read(sequential.join(&file)).unwrap(),
            std::fs::read(parallel.join(&file)).unwrap(),
            "{}",
            file.display()
        );
    }
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_missing_source() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("tiles");

    let err = build(&dir.path().join("missing.tiff"), &out, 256, 0).unwrap_err();

    assert!(matches!(err, BuildError::SourceNotFound { .. }));
    assert_eq!(err.path(), Some(dir.path().join("missing.tiff").as_path()));
    assert!(!out.exists());
}

#[test]
fn test_undecodable_source() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("moon.tiff");
    std::fs::write(&source, b"this is not an image").unwrap();
    let out = dir.path().join("tiles");

    let err = build(&source, &out, 256, 0).unwrap_err();

    assert!(matches!(err, BuildError::UnsupportedFormat { .. }));
    assert!(!out.exists());
}

#[test]
fn test_zero_tile_size() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source_image(dir.path(), "moon.png", 10, 10);

    let err = build(&source, &dir.path().join("tiles"), 0, 0).unwrap_err();
    assert!(matches!(err, BuildError::InvalidTileSize(0)));
}

#[test]
fn test_unaddressable_max_zoom_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source_image(dir.path(), "moon.png", 10, 10);
    let out = dir.path().join("tiles");

    let err = build(&source, &out, 256, 40).unwrap_err();
    assert!(matches!(
        err,
        BuildError::ZoomTooDeep {
            max_zoom: 40,
            width: 10,
            height: 10
        }
    ));
    assert!(!out.exists());
}

#[test]
fn test_write_failure_reports_path_and_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source_image(dir.path(), "moon.png", 300, 300);
    let out = dir.path().join("tiles");

    // A regular file where the z=-1 directory belongs
    std::fs::create_dir_all(&out).unwrap();
    std::fs::write(out.join("-1"), b"in the way").unwrap();

    let err = build(&source, &out, 256, 0).unwrap_err();

    match &err {
        BuildError::IoWrite { path, .. } => assert_eq!(path, &out.join("-1").join("0")),
        other => panic!("Expected IoWrite, got {other:?}"),
    }
    // z=-1 is processed first, so the native level was never started
    assert!(!out.join("0").exists());
}
