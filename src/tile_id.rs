//! Tile-ID numerology for the legacy RPG-Maker map encoding.
//!
//! Tile IDs are partitioned into contiguous numeric bands, each with its own
//! decoding rule and source tileset slot. Autotile bands (A1-A4) subdivide
//! further into a `kind` (terrain index, one per 48 IDs) and a `shape`
//! (corner configuration 0-47).

/// First ID of the B band.
pub const TILE_ID_B: i32 = 0;
/// First ID of the C band.
pub const TILE_ID_C: i32 = 256;
/// First ID of the D band.
pub const TILE_ID_D: i32 = 512;
/// First ID of the E band.
pub const TILE_ID_E: i32 = 768;
/// First ID of the A5 band.
pub const TILE_ID_A5: i32 = 1536;
/// First ID of the A1 band (animated water terrain).
pub const TILE_ID_A1: i32 = 2048;
/// First ID of the A2 band (ground/table terrain).
pub const TILE_ID_A2: i32 = 2816;
/// First ID of the A3 band (building walls).
pub const TILE_ID_A3: i32 = 4352;
/// First ID of the A4 band (wall tops and sides).
pub const TILE_ID_A4: i32 = 5888;
/// One past the largest drawable tile ID.
pub const TILE_ID_MAX: i32 = 8192;

/// Number of tile IDs reserved per autotile kind.
pub const AUTOTILE_STRIDE: i32 = 48;

/// Which decoding rule a tile ID falls under.
///
/// Classification is total over `i32`: anything outside the known bands
/// (including the unassigned gap between E and A5) is `Invisible`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileBand {
    /// Not drawn at all.
    Invisible,
    /// Plain tiles, sheet B.
    B,
    /// Plain tiles, sheet C.
    C,
    /// Plain tiles, sheet D.
    D,
    /// Plain tiles, sheet E.
    E,
    /// Plain tiles, sheet A5.
    A5,
    /// Water/waterfall autotiles.
    A1,
    /// Ground autotiles (including table tiles).
    A2,
    /// Building autotiles.
    A3,
    /// Wall autotiles.
    A4,
}

impl TileBand {
    /// Classify an arbitrary tile ID.
    pub fn classify(tile_id: i32) -> TileBand {
        if tile_id <= 0 || tile_id >= TILE_ID_MAX {
            TileBand::Invisible
        } else if tile_id >= TILE_ID_A4 {
            TileBand::A4
        } else if tile_id >= TILE_ID_A3 {
            TileBand::A3
        } else if tile_id >= TILE_ID_A2 {
            TileBand::A2
        } else if tile_id >= TILE_ID_A1 {
            TileBand::A1
        } else if tile_id >= TILE_ID_A5 {
            TileBand::A5
        } else if tile_id >= 1024 {
            // Unassigned gap between the E and A5 sheets.
            TileBand::Invisible
        } else if tile_id >= TILE_ID_E {
            TileBand::E
        } else if tile_id >= TILE_ID_D {
            TileBand::D
        } else if tile_id >= TILE_ID_C {
            TileBand::C
        } else {
            TileBand::B
        }
    }
}

/// Whether the ID resolves to any drawable tile.
#[inline]
pub fn is_visible_tile(tile_id: i32) -> bool {
    TileBand::classify(tile_id) != TileBand::Invisible
}

/// Whether the ID lies in any autotile band.
#[inline]
pub fn is_autotile(tile_id: i32) -> bool {
    tile_id >= TILE_ID_A1 && tile_id < TILE_ID_MAX
}

/// A1 band check.
#[inline]
pub fn is_tile_a1(tile_id: i32) -> bool {
    tile_id >= TILE_ID_A1 && tile_id < TILE_ID_A2
}

/// A2 band check.
#[inline]
pub fn is_tile_a2(tile_id: i32) -> bool {
    tile_id >= TILE_ID_A2 && tile_id < TILE_ID_A3
}

/// A3 band check.
#[inline]
pub fn is_tile_a3(tile_id: i32) -> bool {
    tile_id >= TILE_ID_A3 && tile_id < TILE_ID_A4
}

/// A4 band check.
#[inline]
pub fn is_tile_a4(tile_id: i32) -> bool {
    tile_id >= TILE_ID_A4 && tile_id < TILE_ID_MAX
}

/// A5 band check.
#[inline]
pub fn is_tile_a5(tile_id: i32) -> bool {
    tile_id >= TILE_ID_A5 && tile_id < TILE_ID_A1
}

/// Terrain-type index of an autotile, counted from the start of A1.
#[inline]
pub fn autotile_kind(tile_id: i32) -> i32 {
    (tile_id - TILE_ID_A1) / AUTOTILE_STRIDE
}

/// Corner-configuration index (0-47) of an autotile.
#[inline]
pub fn autotile_shape(tile_id: i32) -> i32 {
    (tile_id - TILE_ID_A1) % AUTOTILE_STRIDE
}

/// Rebuild an autotile ID from its kind and shape.
#[inline]
pub fn make_autotile_id(kind: i32, shape: i32) -> i32 {
    TILE_ID_A1 + kind * AUTOTILE_STRIDE + shape
}

/// Still or animated water surface (A1 minus the two still sub-sheets).
pub fn is_water_tile(tile_id: i32) -> bool {
    is_tile_a1(tile_id) && !(tile_id >= TILE_ID_A1 + 96 && tile_id < TILE_ID_A1 + 192)
}

/// Downward-animated waterfall column (odd A1 kinds from 4 up).
pub fn is_waterfall_tile(tile_id: i32) -> bool {
    if tile_id >= TILE_ID_A1 + 192 && is_tile_a1(tile_id) {
        autotile_kind(tile_id) % 2 == 1
    } else {
        false
    }
}

/// Walkable ground terrain (water, ground autotiles, or the A5 sheet).
pub fn is_ground_tile(tile_id: i32) -> bool {
    is_tile_a1(tile_id) || is_tile_a2(tile_id) || is_tile_a5(tile_id)
}

/// Tile that casts the elevation shadow used by the table-edge rule.
pub fn is_shadowing_tile(tile_id: i32) -> bool {
    is_tile_a3(tile_id) || is_tile_a4(tile_id)
}

/// Roof section of an A3 building autotile.
pub fn is_roof_tile(tile_id: i32) -> bool {
    is_tile_a3(tile_id) && autotile_kind(tile_id) % 16 < 8
}

/// Vertical wall-side section of an A3/A4 autotile.
pub fn is_wall_side_tile(tile_id: i32) -> bool {
    (is_tile_a3(tile_id) || is_tile_a4(tile_id)) && autotile_kind(tile_id) % 16 >= 8
}

/// Top surface of an A4 wall autotile.
pub fn is_wall_top_tile(tile_id: i32) -> bool {
    is_tile_a4(tile_id) && autotile_kind(tile_id) % 16 < 8
}

/// Any wall piece (top or side).
pub fn is_wall_tile(tile_id: i32) -> bool {
    is_wall_top_tile(tile_id) || is_wall_side_tile(tile_id)
}

/// Autotile assembled from the floor corner table.
pub fn is_floor_type_autotile(tile_id: i32) -> bool {
    (is_tile_a1(tile_id) && !is_waterfall_tile(tile_id))
        || is_tile_a2(tile_id)
        || is_wall_top_tile(tile_id)
}

/// Autotile assembled from the wall corner table.
pub fn is_wall_type_autotile(tile_id: i32) -> bool {
    is_roof_tile(tile_id) || is_wall_side_tile(tile_id)
}
