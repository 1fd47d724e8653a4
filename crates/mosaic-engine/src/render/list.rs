use crate::paint::Color;

use super::fan::fan_triangles;
use super::DrawSurface;

/// One recorded fan draw.
///
/// `first_vertex` indexes into [`DrawList::vertices`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FanDraw {
    pub first_vertex: u32,
    pub vertex_count: u32,
    pub color: Color,
}

/// Recorded surface command.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum DrawCmd {
    Clear(Color),
    Fan(FanDraw),
}

/// Recorded draw stream for a frame.
///
/// Implements [`DrawSurface`] by snapshotting the active vertex buffer into a
/// frame-wide vertex arena at each draw, so the whole frame can be replayed
/// by `PolygonPipeline` with a single upload.
///
/// Performance characteristics:
/// - `reset()` keeps allocated capacity; no per-frame allocation once warmed
/// - the active buffer is overwritten in place on each upload
#[derive(Debug, Default)]
pub struct DrawList {
    cmds: Vec<DrawCmd>,
    vertices: Vec<[f32; 2]>,

    /// Contents of the last `upload_vertices` call.
    active: Vec<[f32; 2]>,
    color: Color,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears recorded commands and vertices. Keeps allocated capacity for reuse.
    pub fn reset(&mut self) {
        self.cmds.clear();
        self.vertices.clear();
        self.active.clear();
        self.color = Color::default();
    }

    /// Returns commands in issue order.
    #[inline]
    pub fn commands(&self) -> &[DrawCmd] {
        &self.cmds
    }

    /// Returns the frame's vertex arena (NDC).
    #[inline]
    pub fn vertices(&self) -> &[[f32; 2]] {
        &self.vertices
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    /// Iterates recorded fan draws in issue order.
    pub fn fans(&self) -> impl Iterator<Item = &FanDraw> {
        self.cmds.iter().filter_map(|cmd| match cmd {
            DrawCmd::Fan(f) => Some(f),
            DrawCmd::Clear(_) => None,
        })
    }

    /// Vertices of a recorded fan.
    pub fn fan_vertices(&self, fan: &FanDraw) -> &[[f32; 2]] {
        let start = fan.first_vertex as usize;
        &self.vertices[start..start + fan.vertex_count as usize]
    }

    /// Triangles of a recorded fan, as vertex positions, in fan order.
    pub fn fan_triangles<'a>(&'a self, fan: &FanDraw) -> impl Iterator<Item = [[f32; 2]; 3]> + 'a {
        let verts = self.fan_vertices(fan);
        fan_triangles(fan.vertex_count).map(move |tri| tri.map(|i| verts[i as usize]))
    }
}

impl DrawSurface for DrawList {
    fn clear(&mut self, color: Color) {
        self.cmds.push(DrawCmd::Clear(color));
    }

    fn upload_vertices(&mut self, vertices: &[f32]) {
        debug_assert!(vertices.len() % 2 == 0, "vertex data must be x/y pairs");
        self.active.clear();
        self.active
            .extend(vertices.chunks_exact(2).map(|xy| [xy[0], xy[1]]));
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// A fan longer than the uploaded buffer is dropped, not truncated.
    fn draw_triangle_fan(&mut self, vertex_count: u32) {
        let count = vertex_count as usize;
        if count > self.active.len() {
            log::warn!(
                "dropping fan of {vertex_count} vertices: only {} uploaded",
                self.active.len()
            );
            return;
        }

        let first_vertex = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&self.active[..count]);
        self.cmds.push(DrawCmd::Fan(FanDraw {
            first_vertex,
            vertex_count,
            color: self.color,
        }));
    }
}
