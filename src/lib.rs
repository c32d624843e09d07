#![warn(missing_docs)]

//! RPG-Maker-style autotile tilemap renderer for Macroquad.
//!
//! Decodes the legacy tile-ID encoding (plain sheets, 48-shape autotiles,
//! animated water/waterfalls, table overhangs, shadow masks) into batched
//! quad geometry, repainted against a scrolling viewport.

pub mod autotile {
    //! Autotile corner tables and the pure tile-ID decoder.
    pub mod decode;
    pub mod tables;
}
mod clock;
mod document;
mod error;
mod loader {
    pub mod json_loader;
}
mod render {
    pub mod batch;
    pub mod composite;
    pub mod renderer;
}
mod texture;
pub mod tile_id;

pub use clock::{AnimationClock, ANIMATION_CYCLE, ANIMATION_STEPS_PER_SECOND};
pub use document::{
    MapDocument, TileFlags, TilesetDescriptor, FLAG_HIGHER, FLAG_TABLE, MAP_PLANES,
};
pub use error::Error;
pub use loader::json_loader::{
    decode_map_document, decode_tileset_list, descriptor_for, load_map_document,
    load_tileset_list,
};
pub use render::batch::{Bounds, DrawCommand, MeshData, TileBatch};
pub use render::composite::{CompositeLayer, TileOptions, TileRef, TEXTURES_PER_TILEMAP};
pub use render::renderer::{MapRenderer, RendererSettings, Update, TILE_LAYERS};
pub use texture::{
    TileTexture, TilesetTextures, SLOT_A1, SLOT_A2, SLOT_A3, SLOT_A4, SLOT_A5, SLOT_B, SLOT_C,
    SLOT_D, SLOT_E, TILESET_SLOTS,
};
