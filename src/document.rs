//! Canonical, host-format-agnostic map data.
//!
//! A map document is a flat array of tile IDs conceptually stacked as five
//! width x height planes: planes 0-3 are tile layers, plane 4 is a 4-bit
//! shadow mask per cell. The renderer never mutates a document; it is owned
//! by the editor/host layer.

use crate::error::Error;
use crate::tile_id::is_tile_a2;

/// Number of stacked data planes in a map document.
pub const MAP_PLANES: usize = 5;

/// Flag bit marking a tile as drawn above characters.
pub const FLAG_HIGHER: u32 = 0x10;
/// Flag bit marking an A2 tile as an elevated table.
pub const FLAG_TABLE: u32 = 0x80;

/// A raw tile-ID grid plus the tileset it is drawn with.
#[derive(Debug, Clone)]
pub struct MapDocument {
    /// Id of the tileset descriptor this map references.
    pub tileset_id: i32,
    /// Map width in tiles.
    pub width: u32,
    /// Map height in tiles.
    pub height: u32,
    data: Vec<i32>,
}

impl MapDocument {
    /// Build a document, validating that `data` holds exactly
    /// `width * height * 5` entries.
    pub fn new(tileset_id: i32, width: u32, height: u32, data: Vec<i32>) -> Result<Self, Error> {
        let expected = width as usize * height as usize * MAP_PLANES;
        if width == 0 || height == 0 || data.len() != expected {
            return Err(Error::InvalidMapSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(MapDocument {
            tileset_id,
            width,
            height,
            data,
        })
    }

    /// Build a document whose ground plane is filled with one tile ID.
    /// Handy for demos and tests.
    pub fn flat(tileset_id: i32, width: u32, height: u32, tile_id: i32) -> Result<Self, Error> {
        let cells = width as usize * height as usize;
        let mut data = vec![0; cells * MAP_PLANES];
        data[..cells].fill(tile_id);
        MapDocument::new(tileset_id, width, height, data)
    }

    /// The raw flat data array.
    pub fn data(&self) -> &[i32] {
        &self.data
    }

    /// Read one plane value. Out-of-range coordinates (in any axis, or a
    /// plane past 4) read as 0 rather than failing.
    pub fn plane_value(&self, x: i32, y: i32, z: usize) -> i32 {
        let (w, h) = (self.width as i32, self.height as i32);
        if z >= MAP_PLANES || x < 0 || x >= w || y < 0 || y >= h {
            return 0;
        }
        self.data[((z as i32 * h + y) * w + x) as usize]
    }

    /// Overwrite one plane value. Out-of-range writes are ignored.
    pub fn set_plane_value(&mut self, x: i32, y: i32, z: usize, value: i32) {
        let (w, h) = (self.width as i32, self.height as i32);
        if z < MAP_PLANES && (0..w).contains(&x) && (0..h).contains(&y) {
            self.data[((z as i32 * h + y) * w + x) as usize] = value;
        }
    }
}

/// One tileset entry from the host's tileset list: the nine sheet names in
/// slot order (A5, A1, A2, A3, A4, B, C, D, E) and the per-tile-ID flag
/// array.
#[derive(Debug, Clone)]
pub struct TilesetDescriptor {
    /// Id this descriptor is looked up by.
    pub id: i32,
    /// Sheet names, in tileset-slot order. Empty names mean a vacant slot.
    pub tileset_names: Vec<String>,
    /// Bit flags per tile ID.
    pub flags: Vec<u32>,
}

/// Per-tile-ID flag queries over a tileset's flag array.
#[derive(Debug, Clone, Default)]
pub struct TileFlags {
    flags: Vec<u32>,
}

impl TileFlags {
    /// Wrap a raw flag array.
    pub fn new(flags: Vec<u32>) -> Self {
        TileFlags { flags }
    }

    /// Raw flag bits for a tile ID; missing entries read as 0.
    pub fn value(&self, tile_id: i32) -> u32 {
        usize::try_from(tile_id)
            .ok()
            .and_then(|i| self.flags.get(i).copied())
            .unwrap_or(0)
    }

    /// Whether the tile draws above characters.
    pub fn is_higher(&self, tile_id: i32) -> bool {
        self.value(tile_id) & FLAG_HIGHER != 0
    }

    /// Whether the tile is an elevated A2 table.
    pub fn is_table(&self, tile_id: i32) -> bool {
        is_tile_a2(tile_id) && self.value(tile_id) & FLAG_TABLE != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile_id::TILE_ID_A2;

    #[test]
    fn rejects_mismatched_data_length() {
        let err = MapDocument::new(1, 2, 2, vec![0; 19]).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidMapSize {
                expected: 20,
                actual: 19
            }
        ));
        assert!(MapDocument::new(1, 0, 2, vec![]).is_err());
    }

    #[test]
    fn plane_addressing_matches_the_flat_layout() {
        let mut map = MapDocument::flat(1, 3, 2, 7).unwrap();
        assert_eq!(map.plane_value(2, 1, 0), 7);
        assert_eq!(map.plane_value(2, 1, 1), 0);
        map.set_plane_value(1, 0, 4, 0b0101);
        assert_eq!(map.plane_value(1, 0, 4), 0b0101);
        // data[(z*height + y)*width + x]
        assert_eq!(map.data()[(4 * 2) * 3 + 1], 0b0101);
    }

    #[test]
    fn out_of_range_reads_are_zero() {
        let map = MapDocument::flat(1, 2, 2, 7).unwrap();
        assert_eq!(map.plane_value(-1, 0, 0), 0);
        assert_eq!(map.plane_value(0, 2, 0), 0);
        assert_eq!(map.plane_value(0, 0, 5), 0);
    }

    #[test]
    fn table_flag_requires_the_a2_band() {
        let mut flags = vec![0u32; 8192];
        flags[TILE_ID_A2 as usize] = FLAG_TABLE;
        flags[100] = FLAG_TABLE | FLAG_HIGHER;
        let flags = TileFlags::new(flags);
        assert!(flags.is_table(TILE_ID_A2));
        assert!(!flags.is_table(100));
        assert!(flags.is_higher(100));
        assert!(!flags.is_higher(-3));
    }
}
