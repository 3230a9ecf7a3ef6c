//! Quad-to-vertex conversion for the batch layout.
//!
//! Vertex record: `[x, y, z, u, v]` with `z = 0`.
//!
//! Corner order per quad (anchor `p`, size `s`):
//!
//! | corner | position          | uv       |
//! |--------|-------------------|----------|
//! | 0      | `(px, py)`        | `(0, 0)` |
//! | 1      | `(px, py+sy)`     | `(0, 1)` |
//! | 2      | `(px+sx, py)`     | `(1, 0)` |
//! | 3      | `(px+sx, py+sy)`  | `(1, 1)` |
//!
//! Triangles: `{0, 1, 3}` and `{0, 2, 3}`, offset by the quad's base vertex.

use super::Quad;

pub const FLOATS_PER_VERTEX: usize = 5;
pub const VERTICES_PER_QUAD: usize = 4;
pub const FLOATS_PER_QUAD: usize = FLOATS_PER_VERTEX * VERTICES_PER_QUAD;
pub const INDICES_PER_QUAD: usize = 6;

const CORNER_UVS: [[f32; 2]; VERTICES_PER_QUAD] = [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];

const QUAD_INDEX_PATTERN: [u32; INDICES_PER_QUAD] = [0, 1, 3, 0, 2, 3];

/// Writes one quad into the given tail slots.
///
/// `vertices` must be exactly [`FLOATS_PER_QUAD`] long and `indices` exactly
/// [`INDICES_PER_QUAD`]; capacity checks belong to the caller.
pub fn emit_quad(quad: Quad, base_vertex: u32, vertices: &mut [f32], indices: &mut [u32]) {
    debug_assert_eq!(vertices.len(), FLOATS_PER_QUAD);
    debug_assert_eq!(indices.len(), INDICES_PER_QUAD);

    let Quad { size, position: p } = quad;
    let corners = [
        [p.x, p.y],
        [p.x, p.y + size.y],
        [p.x + size.x, p.y],
        [p.x + size.x, p.y + size.y],
    ];

    for ((dst, corner), uv) in vertices
        .chunks_exact_mut(FLOATS_PER_VERTEX)
        .zip(corners)
        .zip(CORNER_UVS)
    {
        dst.copy_from_slice(&[corner[0], corner[1], 0.0, uv[0], uv[1]]);
    }

    for (dst, offset) in indices.iter_mut().zip(QUAD_INDEX_PATTERN) {
        *dst = base_vertex + offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;

    fn emit(quad: Quad, base: u32) -> ([f32; FLOATS_PER_QUAD], [u32; INDICES_PER_QUAD]) {
        let mut v = [f32::NAN; FLOATS_PER_QUAD];
        let mut i = [u32::MAX; INDICES_PER_QUAD];
        emit_quad(quad, base, &mut v, &mut i);
        (v, i)
    }

    #[test]
    fn corners_follow_winding_order() {
        let (v, _) = emit(Quad::new(Vec2::new(2.0, 3.0), Vec2::new(1.0, 1.0)), 0);
        assert_eq!(
            v,
            [
                1.0, 1.0, 0.0, 0.0, 0.0, //
                1.0, 4.0, 0.0, 0.0, 1.0, //
                3.0, 1.0, 0.0, 1.0, 0.0, //
                3.0, 4.0, 0.0, 1.0, 1.0,
            ]
        );
    }

    #[test]
    fn z_is_always_zero() {
        let (v, _) = emit(Quad::new(Vec2::new(-5.0, 7.5), Vec2::new(100.0, -3.0)), 0);
        for vertex in v.chunks_exact(FLOATS_PER_VERTEX) {
            assert_eq!(vertex[2], 0.0);
        }
    }

    #[test]
    fn indices_offset_by_base_vertex() {
        let (_, i) = emit(Quad::default(), 0);
        assert_eq!(i, [0, 1, 3, 0, 2, 3]);

        let (_, i) = emit(Quad::default(), 8);
        assert_eq!(i, [8, 9, 11, 8, 10, 11]);
    }

    #[test]
    fn zero_size_quad_collapses_to_anchor() {
        let (v, _) = emit(Quad::new(Vec2::zero(), Vec2::new(4.0, 5.0)), 0);
        for vertex in v.chunks_exact(FLOATS_PER_VERTEX) {
            assert_eq!(&vertex[..2], &[4.0, 5.0]);
        }
    }
}
