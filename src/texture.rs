//! Texture identity and the nine-slot tileset texture set.

use anyhow::Context;
use macroquad::prelude::*;
use std::path::Path;

use crate::document::TilesetDescriptor;

/// Number of texture slots in a tileset.
pub const TILESET_SLOTS: usize = 9;

/// Tileset slot of the A5 sheet.
pub const SLOT_A5: usize = 0;
/// Tileset slot of the A1 sheet.
pub const SLOT_A1: usize = 1;
/// Tileset slot of the A2 sheet.
pub const SLOT_A2: usize = 2;
/// Tileset slot of the A3 sheet.
pub const SLOT_A3: usize = 3;
/// Tileset slot of the A4 sheet.
pub const SLOT_A4: usize = 4;
/// Tileset slot of the B sheet.
pub const SLOT_B: usize = 5;
/// Tileset slot of the C sheet.
pub const SLOT_C: usize = 6;
/// Tileset slot of the D sheet.
pub const SLOT_D: usize = 7;
/// Tileset slot of the E sheet.
pub const SLOT_E: usize = 8;

/// A tile sheet with a stable identity.
///
/// Identity is the underlying image-resource key (typically the sheet name),
/// not the GPU handle: several handles may view the same image, and batch
/// routing must treat them as one texture. The handle itself is optional so
/// that geometry can be built and tested without a GPU context, and so a
/// declared-but-missing sheet can still occupy a slot.
#[derive(Debug, Clone)]
pub struct TileTexture {
    key: String,
    width: f32,
    height: f32,
    handle: Option<Texture2D>,
}

impl TileTexture {
    /// Wrap a loaded texture under an identity key.
    pub fn from_texture(key: impl Into<String>, texture: Texture2D) -> Self {
        let (width, height) = (texture.width(), texture.height());
        TileTexture {
            key: key.into(),
            width,
            height,
            handle: Some(texture),
        }
    }

    /// A texture-less sheet of the given pixel size. Used for headless
    /// geometry building (tests) and for vacant-but-declared slots.
    pub fn detached(key: impl Into<String>, width: f32, height: f32) -> Self {
        TileTexture {
            key: key.into(),
            width,
            height,
            handle: None,
        }
    }

    /// Load a sheet from disk with nearest-neighbor filtering.
    pub async fn load(path: &Path, key: &str) -> anyhow::Result<Self> {
        let tex = load_texture(path.to_str().unwrap_or_default())
            .await
            .with_context(|| format!("Loading texture {}", path.display()))?;
        tex.set_filter(FilterMode::Nearest);
        Ok(TileTexture::from_texture(key, tex))
    }

    /// Image-resource identity key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Sheet size in pixels.
    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// GPU handle, if this sheet is backed by one.
    pub fn handle(&self) -> Option<&Texture2D> {
        self.handle.as_ref()
    }
}

/// The ordered texture slots of one tileset.
#[derive(Debug, Clone, Default)]
pub struct TilesetTextures {
    slots: [Option<TileTexture>; TILESET_SLOTS],
}

impl TilesetTextures {
    /// An all-vacant slot set.
    pub fn new() -> Self {
        TilesetTextures {
            slots: std::array::from_fn(|_| None),
        }
    }

    /// Resolve a descriptor's sheet names against image files under
    /// `base_dir` (`<base_dir>/<name>.png`). A missing or unreadable file
    /// leaves its slot vacant; tile references into it degrade to no-ops.
    pub async fn load(descriptor: &TilesetDescriptor, base_dir: &Path) -> Self {
        let mut slots: [Option<TileTexture>; TILESET_SLOTS] = std::array::from_fn(|_| None);
        let mut loaded = 0;
        for (i, slot) in slots.iter_mut().enumerate() {
            let Some(name) = descriptor.tileset_names.get(i).filter(|n| !n.is_empty()) else {
                continue;
            };
            let path = base_dir.join(format!("{}.png", name));
            match TileTexture::load(&path, name).await {
                Ok(tex) => {
                    loaded += 1;
                    *slot = Some(tex);
                }
                Err(err) => {
                    warn!("Tileset {} slot {} unavailable: {:#}", descriptor.id, i, err);
                }
            }
        }
        info!(
            "Loaded {} of {} sheets for tileset {}",
            loaded, TILESET_SLOTS, descriptor.id
        );
        TilesetTextures { slots }
    }

    /// Assign one slot.
    pub fn set(&mut self, slot: usize, texture: TileTexture) {
        if slot < TILESET_SLOTS {
            self.slots[slot] = Some(texture);
        }
    }

    /// Read one slot.
    pub fn get(&self, slot: usize) -> Option<&TileTexture> {
        self.slots.get(slot).and_then(|s| s.as_ref())
    }

    /// All slots in order.
    pub fn slots(&self) -> &[Option<TileTexture>; TILESET_SLOTS] {
        &self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detached_textures_carry_identity_and_size() {
        let tex = TileTexture::detached("A2", 768.0, 576.0);
        assert_eq!(tex.key(), "A2");
        assert_eq!(tex.size(), (768.0, 576.0));
        assert!(tex.handle().is_none());
    }

    #[test]
    fn slot_assignment_ignores_out_of_range_indices() {
        let mut set = TilesetTextures::new();
        set.set(2, TileTexture::detached("A2", 1.0, 1.0));
        set.set(99, TileTexture::detached("X", 1.0, 1.0));
        assert!(set.get(2).is_some());
        assert!(set.get(99).is_none());
        assert!(set.get(0).is_none());
    }
}
