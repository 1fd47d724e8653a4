//! Triangle-fan expansion.
//!
//! A fan of N vertices shares vertex 0 as its apex and yields the N-2
//! triangles `(v0, vi, vi+1)` for `i = 1..=N-2`. wgpu has no fan topology, so
//! the GPU path expands fans into indexed triangle lists with these helpers.

/// Number of triangles in a fan of `vertex_count` vertices.
#[inline]
pub fn fan_triangle_count(vertex_count: u32) -> u32 {
    vertex_count.saturating_sub(2)
}

/// Local vertex indices of each fan triangle, in draw order.
pub fn fan_triangles(vertex_count: u32) -> impl Iterator<Item = [u32; 3]> {
    (1..vertex_count.saturating_sub(1)).map(|i| [0, i, i + 1])
}

/// Appends the absolute indices of a fan starting at `first_vertex` to `out`.
pub fn push_fan_indices(first_vertex: u32, vertex_count: u32, out: &mut Vec<u32>) {
    out.reserve(fan_triangle_count(vertex_count) as usize * 3);
    for tri in fan_triangles(vertex_count) {
        out.extend(tri.map(|i| first_vertex + i));
    }
}
