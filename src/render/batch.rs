//! Single-texture quad batching and geometry building.

use macroquad::prelude::Vec2;

use crate::texture::TileTexture;

/// One queued quad: source rectangle, destination rectangle, and animation
/// stride parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    /// Source x in pixels.
    pub u: f32,
    /// Source y in pixels.
    pub v: f32,
    /// Destination x in pixels.
    pub x: f32,
    /// Destination y in pixels.
    pub y: f32,
    /// Quad width in pixels.
    pub tile_width: f32,
    /// Quad height in pixels.
    pub tile_height: f32,
    /// Texture-rotation selector. Carried for API parity; unrotated is 0.
    pub rotate: u8,
    /// Horizontal animation stride in pixels per frame (0 = static).
    pub anim_x: f32,
    /// Vertical animation stride in pixels per frame (0 = static).
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

impl Default for DrawCommand {
    fn default() -> Self {
        DrawCommand {
            u: 0.0,
            v: 0.0,
            x: 0.0,
            y: 0.0,
            tile_width: 0.0,
            tile_height: 0.0,
            rotate: 0,
            anim_x: 0.0,
            anim_y: 0.0,
            anim_count_x: 1024,
            anim_count_y: 1024,
            anim_divisor: 1.0,
            alpha: 1.0,
        }
    }
}

/// Axis-aligned bounds accumulated additively; only a full clear shrinks
/// them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Smallest covered x.
    pub min_x: f32,
    /// Smallest covered y.
    pub min_y: f32,
    /// Largest covered x.
    pub max_x: f32,
    /// Largest covered y.
    pub max_y: f32,
}

impl Bounds {
    /// Bounds covering nothing.
    pub const EMPTY: Bounds = Bounds {
        min_x: f32::INFINITY,
        min_y: f32::INFINITY,
        max_x: f32::NEG_INFINITY,
        max_y: f32::NEG_INFINITY,
    };

    /// Whether nothing has been accumulated.
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x
    }

    /// Grow to cover a rectangle.
    pub fn add_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x + w);
        self.max_y = self.max_y.max(y + h);
    }

    /// Standard min/max containment check.
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds::EMPTY
    }
}

/// Triangulated geometry for one batch: two CCW triangles per quad.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// Quad corner positions, 8 floats per quad.
    pub positions: Vec<f32>,
    /// Normalized texture coordinates, 8 floats per quad.
    pub uvs: Vec<f32>,
    /// Triangle indices, 6 per quad.
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Number of quads currently realized.
    pub fn quad_count(&self) -> usize {
        self.indices.len() / 6
    }
}

/// Animation offset for one axis: quantize the clock with nearest-rounding,
/// then wrap into the declared strip.
fn anim_offset(clock: f64, divisor: f64, stride: f32, count: u32) -> f32 {
    if stride <= 0.0 || count == 0 {
        return 0.0;
    }
    let divisor = if divisor > 0.0 { divisor } else { 1.0 };
    let frame = (clock / divisor + 0.5).floor() as i64;
    stride * frame.rem_euclid(count as i64) as f32
}

/// A growable list of draw commands against one texture, with lazily built
/// geometry.
///
/// Backing geometry storage is reused across rebuilds; `clear` drops the
/// commands and bounds but keeps the allocations for the next frame.
#[derive(Debug, Default)]
pub struct TileBatch {
    texture: Option<TileTexture>,
    commands: Vec<DrawCommand>,
    bounds: Bounds,
    mesh: MeshData,
    dirty: bool,
    built_axes: (f64, f64),
}

impl TileBatch {
    /// A batch bound to the given texture (or vacant).
    pub fn new(texture: Option<TileTexture>) -> Self {
        TileBatch {
            texture,
            ..Default::default()
        }
    }

    /// The texture this batch samples.
    pub fn texture(&self) -> Option<&TileTexture> {
        self.texture.as_ref()
    }

    /// Bind a texture to a previously vacant batch.
    pub(crate) fn bind_texture(&mut self, texture: TileTexture) {
        self.texture = Some(texture);
        self.dirty = true;
    }

    /// Queue one quad.
    pub fn add_tile(&mut self, command: DrawCommand) {
        self.bounds
            .add_rect(command.x, command.y, command.tile_width, command.tile_height);
        self.commands.push(command);
        self.dirty = true;
    }

    /// Queued commands, in submission order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Whether no commands are queued.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Accumulated destination bounds.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Drop all commands and bounds. Geometry storage is retained.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.bounds = Bounds::EMPTY;
        self.dirty = true;
    }

    /// Realize the queued commands as geometry for the given per-axis
    /// animation clocks. Rebuilds only when commands changed or the clocks
    /// moved; otherwise the cached mesh is returned as-is.
    pub fn build_geometry(&mut self, anim_x_clock: f64, anim_y_clock: f64) -> &MeshData {
        let axes = (anim_x_clock, anim_y_clock);
        if self.dirty || self.built_axes != axes {
            self.rebuild(axes);
        }
        &self.mesh
    }

    fn rebuild(&mut self, axes: (f64, f64)) {
        let (tex_w, tex_h) = self
            .texture
            .as_ref()
            .map(|t| t.size())
            .unwrap_or((1.0, 1.0));
        let mesh = &mut self.mesh;
        mesh.positions.clear();
        mesh.uvs.clear();
        mesh.indices.clear();
        for (n, cmd) in self.commands.iter().enumerate() {
            let off_x = anim_offset(axes.0, cmd.anim_divisor, cmd.anim_x, cmd.anim_count_x);
            let off_y = anim_offset(axes.1, cmd.anim_divisor, cmd.anim_y, cmd.anim_count_y);
            let (x0, y0) = (cmd.x, cmd.y);
            let (x1, y1) = (cmd.x + cmd.tile_width, cmd.y + cmd.tile_height);
            let u0 = (cmd.u + off_x) / tex_w;
            let v0 = (cmd.v + off_y) / tex_h;
            let u1 = (cmd.u + off_x + cmd.tile_width) / tex_w;
            let v1 = (cmd.v + off_y + cmd.tile_height) / tex_h;
            mesh.positions
                .extend_from_slice(&[x0, y0, x1, y0, x1, y1, x0, y1]);
            mesh.uvs.extend_from_slice(&[u0, v0, u1, v0, u1, v1, u0, v1]);
            let base = (n * 4) as u32;
            mesh.indices.extend_from_slice(&[
                base,
                base + 1,
                base + 2,
                base,
                base + 2,
                base + 3,
            ]);
        }
        self.dirty = false;
        self.built_axes = axes;
    }
}
