//! Routing of tile draws to per-texture batch buffers.
//!
//! A composite layer is one z-order slot of the map: an ordered list of
//! single-texture batches plus a reserved shadow batch. A tile reference is
//! routed by texture identity, slot index, or the shadow sentinel; new
//! textures lazily create new batches.

use crate::error::Error;
use crate::render::batch::{DrawCommand, TileBatch};
use crate::texture::TileTexture;

/// Legacy per-buffer texture budget. At 1, every batch is bound to exactly
/// one texture and a new texture always opens a new batch.
pub const TEXTURES_PER_TILEMAP: usize = 1;

/// Identity key of the reserved shadow batch's pseudo-texture.
const SHADOW_KEY: &str = "(shadow)";

/// How a tile draw names its texture.
///
/// The legacy engine accepted a texture object, a name string, a slot
/// number, or the sentinel -1 in a single parameter; the variants make that
/// dispatch explicit while keeping the exact fallback semantics.
#[derive(Debug, Clone, Copy)]
pub enum TileRef<'a> {
    /// A concrete texture; routed by its identity key, creating a batch on
    /// first sight.
    Texture(&'a TileTexture),
    /// A texture named by identity key; unknown names are a no-op.
    Named(&'a str),
    /// A pre-seeded slot index; unknown slots fall back to slot 0, and with
    /// no slots at all the draw is a no-op.
    Slot(usize),
    /// The reserved translucent-black shadow fill.
    Shadow,
}

/// Per-draw parameters accompanying a [`TileRef`].
#[derive(Debug, Clone, Copy)]
pub struct TileOptions {
    /// Source x in pixels.
    pub u: f32,
    /// Source y in pixels.
    pub v: f32,
    /// Quad width in pixels.
    pub tile_width: f32,
    /// Quad height in pixels.
    pub tile_height: f32,
    /// Horizontal animation stride in pixels per frame.
    pub anim_x: f32,
    /// Vertical animation stride in pixels per frame.
    pub anim_y: f32,
    /// Frame count of the horizontal animation strip.
    pub anim_count_x: u32,
    /// Frame count of the vertical animation strip.
    pub anim_count_y: u32,
    /// Clock divisor applied before frame quantization.
    pub anim_divisor: f64,
    /// Opacity multiplier.
    pub alpha: f32,
}

impl Default for TileOptions {
    fn default() -> Self {
        let d = DrawCommand::default();
        TileOptions {
            u: d.u,
            v: d.v,
            tile_width: d.tile_width,
            tile_height: d.tile_height,
            anim_x: d.anim_x,
            anim_y: d.anim_y,
            anim_count_x: d.anim_count_x,
            anim_count_y: d.anim_count_y,
            anim_divisor: d.anim_divisor,
            alpha: d.alpha,
        }
    }
}

/// One z-order slot of the map: per-texture batches plus the shadow batch.
#[derive(Debug)]
pub struct CompositeLayer {
    batches: Vec<TileBatch>,
    shadow: Option<TileBatch>,
    shadow_color: [f32; 4],
}

impl Default for CompositeLayer {
    fn default() -> Self {
        CompositeLayer::new()
    }
}

impl CompositeLayer {
    /// An empty layer with the legacy translucent-black shadow color.
    pub fn new() -> Self {
        CompositeLayer {
            batches: Vec::new(),
            shadow: None,
            shadow_color: [0.0, 0.0, 0.0, 0.5],
        }
    }

    /// Pre-seed batches for an ordered slot list. Vacant entries (`None`)
    /// still occupy a batch so later slots keep their indices; draws into
    /// them build no output.
    ///
    /// Slots may be appended and vacant slots filled in, but swapping a
    /// different texture into an occupied slot is a caller bug and fails
    /// loudly; shrinking is likewise unsupported (extra old slots are left
    /// untouched).
    pub fn tileset(&mut self, textures: &[Option<TileTexture>]) -> Result<(), Error> {
        for (slot, incoming) in textures.iter().enumerate() {
            if slot >= self.batches.len() {
                self.batches.push(TileBatch::new(incoming.clone()));
                continue;
            }
            let Some(tex) = incoming else {
                continue;
            };
            let batch = &mut self.batches[slot];
            match batch.texture() {
                Some(bound) if bound.key() != tex.key() => {
                    return Err(Error::SlotReassigned { slot });
                }
                Some(_) => {}
                None => batch.bind_texture(tex.clone()),
            }
        }
        Ok(())
    }

    /// Route one tile draw. See [`TileRef`] for the fallback rules.
    pub fn tile(&mut self, tile_ref: TileRef<'_>, x: f32, y: f32, options: &TileOptions) {
        let command = DrawCommand {
            u: options.u,
            v: options.v,
            x,
            y,
            tile_width: options.tile_width,
            tile_height: options.tile_height,
            rotate: 0,
            anim_x: options.anim_x,
            anim_y: options.anim_y,
            anim_count_x: options.anim_count_x,
            anim_count_y: options.anim_count_y,
            anim_divisor: options.anim_divisor,
            alpha: options.alpha,
        };
        match tile_ref {
            TileRef::Shadow => {
                self.shadow
                    .get_or_insert_with(|| {
                        TileBatch::new(Some(TileTexture::detached(SHADOW_KEY, 1.0, 1.0)))
                    })
                    .add_tile(command);
            }
            TileRef::Slot(slot) => {
                let index = if slot < self.batches.len() {
                    slot
                } else if !self.batches.is_empty() {
                    0
                } else {
                    return;
                };
                self.batches[index].add_tile(command);
            }
            TileRef::Named(name) => {
                if let Some(batch) = self.find_by_key(name) {
                    batch.add_tile(command);
                }
            }
            TileRef::Texture(texture) => match self.position_of(texture.key()) {
                Some(index) => self.batches[index].add_tile(command),
                None => {
                    let mut batch = TileBatch::new(Some(texture.clone()));
                    batch.add_tile(command);
                    self.batches.push(batch);
                }
            },
        }
    }

    // Small-N linear scan; batch counts are bounded by the texture budget.
    fn position_of(&self, key: &str) -> Option<usize> {
        self.batches
            .iter()
            .position(|b| b.texture().is_some_and(|t| t.key() == key))
    }

    fn find_by_key(&mut self, key: &str) -> Option<&mut TileBatch> {
        let index = self.position_of(key)?;
        Some(&mut self.batches[index])
    }

    /// Drop all queued commands in every batch, including the shadow batch.
    pub fn clear(&mut self) {
        for batch in &mut self.batches {
            batch.clear();
        }
        if let Some(shadow) = &mut self.shadow {
            shadow.clear();
        }
    }

    /// The per-texture batches, in slot/creation order.
    pub fn batches(&self) -> &[TileBatch] {
        &self.batches
    }

    /// Mutable access for geometry building.
    pub fn batches_mut(&mut self) -> impl Iterator<Item = &mut TileBatch> {
        self.batches.iter_mut()
    }

    /// The reserved shadow batch, if any shadow was ever drawn.
    pub fn shadow(&self) -> Option<&TileBatch> {
        self.shadow.as_ref()
    }

    /// Mutable access to the shadow batch.
    pub fn shadow_mut(&mut self) -> Option<&mut TileBatch> {
        self.shadow.as_mut()
    }

    /// Color the shadow batch is drawn with.
    pub fn shadow_color(&self) -> [f32; 4] {
        self.shadow_color
    }

    /// Total queued commands across the per-texture batches (the shadow
    /// batch is counted separately via [`CompositeLayer::shadow`]).
    pub fn command_count(&self) -> usize {
        self.batches.iter().map(|b| b.commands().len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(size: f32) -> TileOptions {
        TileOptions {
            tile_width: size,
            tile_height: size,
            ..Default::default()
        }
    }

    fn seeded_layer() -> CompositeLayer {
        let mut layer = CompositeLayer::new();
        layer
            .tileset(&[
                Some(TileTexture::detached("A5", 256.0, 256.0)),
                Some(TileTexture::detached("A1", 256.0, 256.0)),
                None,
            ])
            .unwrap();
        layer
    }

    #[test]
    fn slot_routing_falls_back_to_slot_zero_then_noop() {
        let mut layer = seeded_layer();
        layer.tile(TileRef::Slot(1), 0.0, 0.0, &opts(16.0));
        layer.tile(TileRef::Slot(7), 16.0, 0.0, &opts(16.0));
        assert_eq!(layer.batches()[1].commands().len(), 1);
        assert_eq!(layer.batches()[0].commands().len(), 1);

        let mut empty = CompositeLayer::new();
        empty.tile(TileRef::Slot(0), 0.0, 0.0, &opts(16.0));
        assert!(empty.batches().is_empty());
    }

    #[test]
    fn texture_routing_deduplicates_by_identity_key() {
        let mut layer = CompositeLayer::new();
        // Two texture objects over the same underlying image resource.
        let a = TileTexture::detached("B", 256.0, 256.0);
        let b = TileTexture::detached("B", 256.0, 256.0);
        layer.tile(TileRef::Texture(&a), 0.0, 0.0, &opts(16.0));
        layer.tile(TileRef::Texture(&b), 16.0, 0.0, &opts(16.0));
        assert_eq!(layer.batches().len(), 1);
        assert_eq!(layer.batches()[0].commands().len(), 2);

        layer.tile(
            TileRef::Texture(&TileTexture::detached("C", 256.0, 256.0)),
            0.0,
            16.0,
            &opts(16.0),
        );
        assert_eq!(layer.batches().len(), 2);
    }

    #[test]
    fn named_routing_hits_existing_batches_only() {
        let mut layer = seeded_layer();
        layer.tile(TileRef::Named("A1"), 0.0, 0.0, &opts(16.0));
        layer.tile(TileRef::Named("nope"), 0.0, 0.0, &opts(16.0));
        assert_eq!(layer.batches()[1].commands().len(), 1);
        assert_eq!(layer.command_count(), 1);
    }

    #[test]
    fn shadow_routes_to_one_reserved_batch_created_lazily() {
        let mut layer = seeded_layer();
        assert!(layer.shadow().is_none());
        layer.tile(TileRef::Shadow, 0.0, 0.0, &opts(24.0));
        layer.tile(TileRef::Shadow, 24.0, 0.0, &opts(24.0));
        let shadow = layer.shadow().unwrap();
        assert_eq!(shadow.commands().len(), 2);
        // Shadow never lands in the texture batches.
        assert_eq!(layer.command_count(), 0);
    }

    #[test]
    fn reassigning_an_occupied_slot_is_an_error() {
        let mut layer = seeded_layer();
        // Same identity again: fine. Filling the vacant slot: fine.
        layer
            .tileset(&[
                Some(TileTexture::detached("A5", 256.0, 256.0)),
                Some(TileTexture::detached("A1", 256.0, 256.0)),
                Some(TileTexture::detached("A2", 256.0, 256.0)),
            ])
            .unwrap();
        let err = layer
            .tileset(&[Some(TileTexture::detached("other", 256.0, 256.0))])
            .unwrap_err();
        assert!(matches!(err, Error::SlotReassigned { slot: 0 }));
    }

    #[test]
    fn clear_empties_every_batch_but_keeps_the_layout() {
        let mut layer = seeded_layer();
        layer.tile(TileRef::Slot(0), 0.0, 0.0, &opts(16.0));
        layer.tile(TileRef::Shadow, 0.0, 0.0, &opts(16.0));
        layer.clear();
        assert_eq!(layer.command_count(), 0);
        assert_eq!(layer.batches().len(), 3);
        assert_eq!(layer.shadow().unwrap().commands().len(), 0);
    }
}
