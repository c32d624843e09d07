//! Pure tile-ID decoder.
//!
//! Maps a numeric tile ID to the quadrant quads that render it: a single
//! full tile for the plain bands (B-E, A5), four half-tile quadrants for
//! autotiles, with the A2 "table" split, the table-edge strip, and the
//! shadow-mask quads as separate entry points. Decoding is total over `i32`;
//! IDs outside the known bands simply produce nothing.

use super::tables::{
    CornerEntry, FLOOR_AUTOTILE_TABLE, WALL_AUTOTILE_TABLE, WATERFALL_AUTOTILE_TABLE,
};
use crate::texture::{SLOT_A1, SLOT_A2, SLOT_A3, SLOT_A4, SLOT_A5, SLOT_B};
use crate::tile_id::{
    autotile_kind, autotile_shape, is_tile_a1, is_tile_a2, is_tile_a3, is_tile_a5, TileBand,
};

/// Frames in the horizontal water-surface animation strip.
pub const WATER_ANIM_FRAMES: u32 = 3;
/// Frames in the vertical waterfall animation strip.
pub const WATERFALL_ANIM_FRAMES: u32 = 3;

/// One textured quad produced by the decoder.
///
/// Source coordinates are in pixels on the sheet selected by `set_number`;
/// destination coordinates are pixel offsets relative to the tile's top-left
/// corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadSpec {
    /// Tileset slot (0-8) whose texture this quad samples.
    pub set_number: usize,
    /// Source x in pixels.
    pub sx: f32,
    /// Source y in pixels.
    pub sy: f32,
    /// Destination x offset within the tile.
    pub dx: f32,
    /// Destination y offset within the tile.
    pub dy: f32,
    /// Quad width in pixels.
    pub width: f32,
    /// Quad height in pixels.
    pub height: f32,
    /// Horizontal animation stride in pixels per frame (0 = static).
    pub anim_x: f32,
    /// Vertical animation stride in pixels per frame (0 = static).
    pub anim_y: f32,
    /// Frame count of the horizontal animation strip.
    pub anim_count_x: u32,
    /// Frame count of the vertical animation strip.
    pub anim_count_y: u32,
}

impl QuadSpec {
    fn new(set_number: usize, sx: f32, sy: f32, dx: f32, dy: f32, width: f32, height: f32) -> Self {
        QuadSpec {
            set_number,
            sx,
            sy,
            dx,
            dy,
            width,
            height,
            anim_x: 0.0,
            anim_y: 0.0,
            anim_count_x: 1,
            anim_count_y: 1,
        }
    }
}

/// One half-tile shadow quad (always sampled from the shadow fill).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowQuad {
    /// Destination x offset within the tile.
    pub dx: f32,
    /// Destination y offset within the tile.
    pub dy: f32,
    /// Quad width in pixels.
    pub width: f32,
    /// Quad height in pixels.
    pub height: f32,
}

/// Decode a tile ID into its quads, appending to `out`.
///
/// `is_table` must be the tileset's table-flag verdict for this ID; it only
/// affects A2 autotiles.
pub fn decode_tile(tile_id: i32, is_table: bool, tile_w: f32, tile_h: f32, out: &mut Vec<QuadSpec>) {
    match TileBand::classify(tile_id) {
        TileBand::Invisible => {}
        TileBand::A1 | TileBand::A2 | TileBand::A3 | TileBand::A4 => {
            decode_autotile(tile_id, is_table, tile_w, tile_h, out)
        }
        _ => decode_normal(tile_id, tile_w, tile_h, out),
    }
}

/// Decode a plain (non-autotile) tile: one full-size quad whose source
/// position is pure arithmetic on the ID.
fn decode_normal(tile_id: i32, tile_w: f32, tile_h: f32, out: &mut Vec<QuadSpec>) {
    let set_number = if is_tile_a5(tile_id) {
        SLOT_A5
    } else {
        SLOT_B + (tile_id / 256) as usize
    };
    let sx = ((tile_id / 128 % 2) * 8 + tile_id % 8) as f32 * tile_w;
    let sy = (tile_id % 256 / 8 % 16) as f32 * tile_h;
    out.push(QuadSpec::new(set_number, sx, sy, 0.0, 0.0, tile_w, tile_h));
}

/// Decode an A1-A4 autotile into four half-tile quadrants.
fn decode_autotile(
    tile_id: i32,
    is_table: bool,
    tile_w: f32,
    tile_h: f32,
    out: &mut Vec<QuadSpec>,
) {
    let kind = autotile_kind(tile_id);
    let shape = autotile_shape(tile_id);
    let tx = kind % 8;
    let ty = kind / 8;
    let mut bx = 0;
    let mut by = 0;
    let mut anim_x = 0.0;
    let mut anim_y = 0.0;
    let mut anim_count_x = 1;
    let mut anim_count_y = 1;
    let mut table: &[CornerEntry] = &FLOOR_AUTOTILE_TABLE;
    let set_number;

    if is_tile_a1(tile_id) {
        set_number = SLOT_A1;
        match kind {
            // Animated water surfaces: three frames, two tiles apart.
            0 => {
                anim_x = 2.0 * tile_w;
                anim_count_x = WATER_ANIM_FRAMES;
            }
            1 => {
                by = 3;
                anim_x = 2.0 * tile_w;
                anim_count_x = WATER_ANIM_FRAMES;
            }
            // Still sub-sheets.
            2 => bx = 6,
            3 => {
                bx = 6;
                by = 3;
            }
            _ => {
                bx = tx / 4 * 8;
                by = ty * 6 + tx / 2 % 2 * 3;
                if kind % 2 == 0 {
                    anim_x = 2.0 * tile_w;
                    anim_count_x = WATER_ANIM_FRAMES;
                } else {
                    // Odd kinds are waterfalls: the alternate corner table,
                    // animated downward one tile per frame.
                    bx += 6;
                    table = &WATERFALL_AUTOTILE_TABLE;
                    anim_y = tile_h;
                    anim_count_y = WATERFALL_ANIM_FRAMES;
                }
            }
        }
    } else if is_tile_a2(tile_id) {
        set_number = SLOT_A2;
        bx = tx * 2;
        by = (ty - 2) * 3;
    } else if is_tile_a3(tile_id) {
        set_number = SLOT_A3;
        bx = tx * 2;
        by = (ty - 6) * 2;
        table = &WALL_AUTOTILE_TABLE;
    } else {
        set_number = SLOT_A4;
        bx = tx * 2;
        by = ((ty - 10) as f32 * 2.5 + if ty % 2 == 1 { 0.5 } else { 0.0 }).floor() as i32;
        if ty % 2 == 1 {
            table = &WALL_AUTOTILE_TABLE;
        }
    }

    let Some(corners) = table.get(shape as usize) else {
        return;
    };
    let w1 = tile_w / 2.0;
    let h1 = tile_h / 2.0;
    for (i, &[qsx, qsy]) in corners.iter().enumerate() {
        let sx1 = (bx * 2 + qsx) as f32 * w1;
        let sy1 = (by * 2 + qsy) as f32 * h1;
        let dx1 = (i % 2) as f32 * w1;
        let mut dy1 = (i / 2) as f32 * h1;
        let with_anim = |mut q: QuadSpec| {
            q.anim_x = anim_x;
            q.anim_y = anim_y;
            q.anim_count_x = anim_count_x;
            q.anim_count_y = anim_count_y;
            q
        };
        if is_table && is_tile_a2(tile_id) && (qsy == 1 || qsy == 5) {
            // Table top band: a full quadrant from the mirrored column as the
            // underlay, then the original source squeezed into the lower half.
            let mut qsx2 = qsx;
            let qsy2 = 3;
            if qsy == 1 {
                qsx2 = (4 - qsx) % 4;
            }
            let sx2 = (bx * 2 + qsx2) as f32 * w1;
            let sy2 = (by * 2 + qsy2) as f32 * h1;
            out.push(with_anim(QuadSpec::new(
                set_number, sx2, sy2, dx1, dy1, w1, h1,
            )));
            dy1 += h1 / 2.0;
            out.push(with_anim(QuadSpec::new(
                set_number,
                sx1,
                sy1,
                dx1,
                dy1,
                w1,
                h1 / 2.0,
            )));
        } else {
            out.push(with_anim(QuadSpec::new(
                set_number, sx1, sy1, dx1, dy1, w1, h1,
            )));
        }
    }
}

/// Decode the overhang strip drawn one cell below a table tile: the lower
/// two quadrants of the table's floor pattern as a half-height slice.
pub fn decode_table_edge(tile_id: i32, tile_w: f32, tile_h: f32, out: &mut Vec<QuadSpec>) {
    if !is_tile_a2(tile_id) {
        return;
    }
    let kind = autotile_kind(tile_id);
    let shape = autotile_shape(tile_id);
    let tx = kind % 8;
    let ty = kind / 8;
    let bx = tx * 2;
    let by = (ty - 2) * 3;
    let Some(corners) = FLOOR_AUTOTILE_TABLE.get(shape as usize) else {
        return;
    };
    let w1 = tile_w / 2.0;
    let h1 = tile_h / 2.0;
    for (i, &[qsx, qsy]) in corners[2..4].iter().enumerate() {
        let sx1 = (bx * 2 + qsx) as f32 * w1;
        let sy1 = (by * 2 + qsy) as f32 * h1 + h1 / 2.0;
        let dx1 = (i % 2) as f32 * w1;
        out.push(QuadSpec::new(
            SLOT_A2,
            sx1,
            sy1,
            dx1,
            0.0,
            w1,
            h1 / 2.0,
        ));
    }
}

/// Decode a 4-bit shadow mask into half-tile quads, one per set bit, in
/// quadrant order top-left, top-right, bottom-left, bottom-right.
pub fn decode_shadow(shadow_bits: u32, tile_w: f32, tile_h: f32, out: &mut Vec<ShadowQuad>) {
    if shadow_bits & 0x0f == 0 {
        return;
    }
    let w1 = tile_w / 2.0;
    let h1 = tile_h / 2.0;
    for i in 0..4 {
        if shadow_bits & (1 << i) != 0 {
            out.push(ShadowQuad {
                dx: (i % 2) as f32 * w1,
                dy: (i / 2) as f32 * h1,
                width: w1,
                height: h1,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile_id::{make_autotile_id, TILE_ID_A2, TILE_ID_A4};

    fn decode(tile_id: i32, is_table: bool) -> Vec<QuadSpec> {
        let mut out = Vec::new();
        decode_tile(tile_id, is_table, 48.0, 48.0, &mut out);
        out
    }

    #[test]
    fn out_of_band_ids_decode_to_nothing() {
        for id in [-5, 0, 1024, 1400, 8192, 100_000] {
            assert!(decode(id, false).is_empty(), "id {}", id);
        }
    }

    #[test]
    fn plain_tile_source_arithmetic() {
        // B-band tile 10: column 2, row 1 of sheet B.
        let quads = decode(10, false);
        assert_eq!(quads.len(), 1);
        let q = quads[0];
        assert_eq!(q.set_number, SLOT_B);
        assert_eq!((q.sx, q.sy), (2.0 * 48.0, 48.0));
        assert_eq!((q.width, q.height), (48.0, 48.0));
        // C-band tiles land one slot over.
        assert_eq!(decode(256, false)[0].set_number, SLOT_B + 1);
    }

    #[test]
    fn a5_tiles_use_slot_zero() {
        let quads = decode(1536, false);
        assert_eq!(quads.len(), 1);
        assert_eq!(quads[0].set_number, SLOT_A5);
        assert_eq!((quads[0].sx, quads[0].sy), (0.0, 0.0));
    }

    #[test]
    fn flat_a2_autotile_yields_four_half_quadrants() {
        let quads = decode(TILE_ID_A2, false);
        assert_eq!(quads.len(), 4);
        for (i, q) in quads.iter().enumerate() {
            assert_eq!(q.set_number, SLOT_A2);
            assert_eq!((q.width, q.height), (24.0, 24.0));
            assert_eq!(q.dx, (i % 2) as f32 * 24.0);
            assert_eq!(q.dy, (i / 2) as f32 * 24.0);
        }
        // Shape 0 is the fully-surrounded center pattern.
        assert_eq!((quads[0].sx, quads[0].sy), (2.0 * 24.0, 4.0 * 24.0));
    }

    #[test]
    fn animated_water_carries_a_horizontal_stride() {
        let quads = decode(make_autotile_id(0, 0), false);
        assert_eq!(quads.len(), 4);
        for q in &quads {
            assert_eq!(q.anim_x, 96.0);
            assert_eq!(q.anim_count_x, WATER_ANIM_FRAMES);
            assert_eq!(q.anim_y, 0.0);
        }
    }

    #[test]
    fn waterfall_kind_uses_the_waterfall_table_and_vertical_stride() {
        // Kind 5 is the first waterfall column; shape 0 picks entry 0.
        let quads = decode(make_autotile_id(5, 0), false);
        assert_eq!(quads.len(), 4);
        for q in &quads {
            assert_eq!(q.anim_y, 48.0);
            assert_eq!(q.anim_count_y, WATERFALL_ANIM_FRAMES);
            assert_eq!(q.anim_x, 0.0);
        }
        // Waterfall shapes past 3 decode to nothing.
        assert!(decode(make_autotile_id(5, 4), false).is_empty());
    }

    #[test]
    fn wall_shapes_past_the_table_end_are_invisible() {
        use crate::tile_id::TILE_ID_A3;
        assert!(decode(TILE_ID_A3 + 16, false).is_empty());
        assert_eq!(decode(TILE_ID_A3, false).len(), 4);
    }

    #[test]
    fn a4_alternates_floor_and_wall_tables_by_row_parity() {
        // Global kind 80 -> ty=10 (even): floor table, so shape 16 is still
        // a valid entry.
        let even_row = TILE_ID_A4 + 16;
        assert_eq!(decode(even_row, false).len(), 4);
        // Global kind 88 -> ty=11, odd: wall table, shape 16 out of range.
        let odd_row = TILE_ID_A4 + 8 * 48 + 16;
        assert!(decode(odd_row, false).is_empty());
    }

    #[test]
    fn table_top_band_splits_into_underlay_and_half_slice() {
        // Shape 47 is the isolated pattern: its lower quadrants sample the
        // qsy=1 band, which triggers the split for table-flagged tiles.
        let id = make_autotile_id(16, 47);
        let plain = decode(id, false);
        let table = decode(id, true);
        assert_eq!(plain.len(), 4);
        assert_eq!(table.len(), 6);
        // Quadrant 3 (qsx=1) splits into a full underlay from the mirrored
        // column (4 - 1) % 4 = 3 of the qsy2=3 row, then a half-height slice
        // of the original source below it.
        let mirrored = &table[4];
        let slice = &table[5];
        assert_eq!((mirrored.sx, mirrored.sy), (3.0 * 24.0, 3.0 * 24.0));
        assert_eq!(mirrored.height, 24.0);
        assert_eq!((slice.sx, slice.sy), (plain[3].sx, plain[3].sy));
        assert_eq!(slice.height, 12.0);
        assert_eq!(slice.dy, mirrored.dy + 12.0);
        assert_eq!(slice.dx, mirrored.dx);
    }

    #[test]
    fn table_edge_is_a_half_height_strip_of_the_lower_quadrants() {
        let mut out = Vec::new();
        decode_table_edge(make_autotile_id(16, 0), 48.0, 48.0, &mut out);
        assert_eq!(out.len(), 2);
        for (i, q) in out.iter().enumerate() {
            assert_eq!(q.set_number, SLOT_A2);
            assert_eq!((q.width, q.height), (24.0, 12.0));
            assert_eq!(q.dx, i as f32 * 24.0);
            assert_eq!(q.dy, 0.0);
        }
        // Non-A2 IDs produce nothing.
        decode_table_edge(512, 48.0, 48.0, &mut out);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn shadow_mask_emits_one_half_tile_per_set_bit() {
        let mut out = Vec::new();
        decode_shadow(0b0011, 48.0, 48.0, &mut out);
        assert_eq!(out.len(), 2);
        assert_eq!((out[0].dx, out[0].dy), (0.0, 0.0));
        assert_eq!((out[1].dx, out[1].dy), (24.0, 0.0));
        for q in &out {
            assert_eq!((q.width, q.height), (24.0, 24.0));
        }
        out.clear();
        decode_shadow(0, 48.0, 48.0, &mut out);
        assert!(out.is_empty());
    }
}
