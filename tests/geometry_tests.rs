// Geometry invariants exercised through the public batching API.

use rpgm_tilemap::{CompositeLayer, TileOptions, TileRef, TileTexture};

fn options(size: f32) -> TileOptions {
    TileOptions {
        tile_width: size,
        tile_height: size,
        ..Default::default()
    }
}

#[test]
fn built_geometry_matches_command_counts() {
    let mut layer = CompositeLayer::new();
    let sheet = TileTexture::detached("B", 512.0, 512.0);
    for i in 0..10 {
        layer.tile(TileRef::Texture(&sheet), i as f32 * 48.0, 0.0, &options(48.0));
    }

    let batch = layer.batches_mut().next().expect("one batch");
    let n = batch.commands().len();
    assert_eq!(n, 10);
    let mesh = batch.build_geometry(0.0, 0.0);
    assert_eq!(mesh.positions.len(), 8 * n);
    assert_eq!(mesh.uvs.len(), 8 * n);
    assert_eq!(mesh.indices.len(), 6 * n);
    assert!(mesh.indices.iter().all(|&i| (i as usize) < 4 * n));
}

#[test]
fn bounds_cover_every_routed_quad() {
    let mut layer = CompositeLayer::new();
    let sheet = TileTexture::detached("B", 512.0, 512.0);
    layer.tile(TileRef::Texture(&sheet), -48.0, 96.0, &options(48.0));
    layer.tile(TileRef::Texture(&sheet), 144.0, 0.0, &options(48.0));

    let batch = &layer.batches()[0];
    let bounds = batch.bounds();
    assert_eq!((bounds.min_x, bounds.min_y), (-48.0, 0.0));
    assert_eq!((bounds.max_x, bounds.max_y), (192.0, 144.0));
}

#[test]
fn shadow_batches_build_geometry_too() {
    let mut layer = CompositeLayer::new();
    layer.tile(TileRef::Shadow, 0.0, 0.0, &options(24.0));
    layer.tile(TileRef::Shadow, 24.0, 24.0, &options(24.0));

    let shadow = layer.shadow_mut().expect("shadow batch");
    let mesh = shadow.build_geometry(0.0, 0.0);
    assert_eq!(mesh.quad_count(), 2);
    // The shadow pseudo-texture is 1x1, so UVs equal the pixel rectangle.
    assert_eq!(mesh.uvs[0], 0.0);
    assert_eq!(mesh.uvs[4], 24.0);
}
