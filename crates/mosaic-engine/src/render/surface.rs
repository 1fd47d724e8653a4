use crate::paint::Color;

/// The drawing operations the polygon renderer needs from a target.
///
/// Calls arrive in the order the renderer issues them; an implementation
/// must preserve that order when it presents.
pub trait DrawSurface {
    /// Resets the whole target to `color`.
    fn clear(&mut self, color: Color);

    /// Replaces the active vertex buffer with flattened `[x, y, x, y, ...]` NDC pairs.
    fn upload_vertices(&mut self, vertices: &[f32]);

    /// Sets the color used by subsequent draws.
    fn set_color(&mut self, color: Color);

    /// Fills a triangle fan over the first `vertex_count` active vertices.
    fn draw_triangle_fan(&mut self, vertex_count: u32);
}
