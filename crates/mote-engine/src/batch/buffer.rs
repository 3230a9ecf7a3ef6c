use super::Quad;
use super::geometry::{self, FLOATS_PER_QUAD, FLOATS_PER_VERTEX, INDICES_PER_QUAD};

/// Default slot count shared by the vertex and index arrays (150 quads per flush).
pub const MAX_PRIMITIVES: usize = 3000;

/// Slot counts for the two batch arrays.
///
/// The default couples both arrays to [`MAX_PRIMITIVES`] slots even though a quad
/// costs 20 vertex scalars but only 6 indices, so the vertex array is always the
/// binding limit. Use [`BatchCapacity::new`] to size them independently.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BatchCapacity {
    /// Number of `f32` vertex scalars.
    pub vertex_scalars: usize,
    /// Number of `u32` indices.
    pub indices: usize,
}

impl BatchCapacity {
    #[inline]
    pub const fn new(vertex_scalars: usize, indices: usize) -> Self {
        Self { vertex_scalars, indices }
    }

    /// Same slot count for both arrays.
    #[inline]
    pub const fn shared(slots: usize) -> Self {
        Self::new(slots, slots)
    }

    /// Whole quads that fit before the first rejected append.
    #[inline]
    pub const fn max_quads(self) -> usize {
        let by_vertices = self.vertex_scalars / FLOATS_PER_QUAD;
        let by_indices = self.indices / INDICES_PER_QUAD;
        if by_vertices < by_indices { by_vertices } else { by_indices }
    }
}

impl Default for BatchCapacity {
    fn default() -> Self {
        Self::shared(MAX_PRIMITIVES)
    }
}

/// Fixed-capacity vertex/index storage with write cursors.
///
/// Invariants:
/// - an append is accepted only if both `cursor + per_quad_cost <= capacity`
/// - a rejected append writes nothing and raises the full flag
/// - only `clear` lowers the flag and rewinds the cursors
pub struct BatchBuffer {
    vertices: Box<[f32]>,
    indices: Box<[u32]>,
    vertex_cursor: usize,
    index_cursor: usize,
    full: bool,
}

impl BatchBuffer {
    pub fn new(capacity: BatchCapacity) -> Self {
        Self {
            vertices: vec![0.0; capacity.vertex_scalars].into_boxed_slice(),
            indices: vec![0; capacity.indices].into_boxed_slice(),
            vertex_cursor: 0,
            index_cursor: 0,
            full: false,
        }
    }

    /// Appends a whole quad, or nothing.
    ///
    /// Returns `false` (and marks the buffer full) if either array lacks room.
    pub fn try_append(&mut self, quad: Quad) -> bool {
        let vertex_end = self.vertex_cursor + FLOATS_PER_QUAD;
        let index_end = self.index_cursor + INDICES_PER_QUAD;

        if vertex_end > self.vertices.len() || index_end > self.indices.len() {
            self.full = true;
            return false;
        }

        let base_vertex = (self.vertex_cursor / FLOATS_PER_VERTEX) as u32;
        geometry::emit_quad(
            quad,
            base_vertex,
            &mut self.vertices[self.vertex_cursor..vertex_end],
            &mut self.indices[self.index_cursor..index_end],
        );

        self.vertex_cursor = vertex_end;
        self.index_cursor = index_end;
        true
    }

    /// Set by the last rejected append, until the next `clear`.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Rewinds both cursors and lowers the full flag.
    ///
    /// Anything not yet flushed is discarded.
    #[inline]
    pub fn clear(&mut self) {
        self.vertex_cursor = 0;
        self.index_cursor = 0;
        self.full = false;
    }

    /// Written prefix of the vertex array.
    #[inline]
    pub fn vertex_slice(&self) -> &[f32] {
        &self.vertices[..self.vertex_cursor]
    }

    /// Written prefix of the index array.
    #[inline]
    pub fn index_slice(&self) -> &[u32] {
        &self.indices[..self.index_cursor]
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.index_cursor / INDICES_PER_QUAD
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index_cursor == 0
    }

    #[inline]
    pub fn capacity(&self) -> BatchCapacity {
        BatchCapacity::new(self.vertices.len(), self.indices.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;

    fn quad(i: usize) -> Quad {
        let f = i as f32;
        Quad::new(Vec2::new(1.0 + f, 2.0), Vec2::new(f * 10.0, -f))
    }

    fn fill(buf: &mut BatchBuffer, n: usize) -> usize {
        (0..n).filter(|&i| buf.try_append(quad(i))).count()
    }

    // ── capacity ──────────────────────────────────────────────────────────

    #[test]
    fn default_capacity_holds_150_quads() {
        let mut buf = BatchBuffer::new(BatchCapacity::default());
        assert_eq!(BatchCapacity::default().max_quads(), 150);
        assert_eq!(fill(&mut buf, 150), 150);
        assert!(!buf.is_full());
        assert!(!buf.try_append(quad(150)));
        assert!(buf.is_full());
    }

    #[test]
    fn boundary_is_floor_of_capacity_over_vertex_cost() {
        // 110 / 20 = 5 quads; 10 slots of slack are never used.
        let mut buf = BatchBuffer::new(BatchCapacity::shared(110));
        assert_eq!(fill(&mut buf, 5), 5);
        assert!(!buf.try_append(quad(5)));
        assert_eq!(buf.vertex_slice().len(), 100);
        assert_eq!(buf.index_slice().len(), 30);
    }

    #[test]
    fn exact_fit_accepts_last_quad() {
        let mut buf = BatchBuffer::new(BatchCapacity::shared(40));
        assert!(buf.try_append(quad(0)));
        assert!(buf.try_append(quad(1)));
        assert!(!buf.is_full());
        assert!(!buf.try_append(quad(2)));
    }

    #[test]
    fn index_array_can_be_the_binding_limit() {
        let cap = BatchCapacity::new(1000, 13);
        assert_eq!(cap.max_quads(), 2);
        let mut buf = BatchBuffer::new(cap);
        assert_eq!(fill(&mut buf, 10), 2);
        assert!(buf.is_full());
        assert_eq!(buf.vertex_slice().len(), 40);
    }

    #[test]
    fn zero_capacity_rejects_everything() {
        let mut buf = BatchBuffer::new(BatchCapacity::shared(0));
        assert!(!buf.try_append(quad(0)));
        assert!(buf.is_full());
        assert!(buf.is_empty());
    }

    // ── append invariant ──────────────────────────────────────────────────

    #[test]
    fn rejected_append_leaves_no_trace() {
        let mut buf = BatchBuffer::new(BatchCapacity::shared(60));
        fill(&mut buf, 3);
        let vertices = buf.vertex_slice().to_vec();
        let indices = buf.index_slice().to_vec();

        for i in 3..10 {
            assert!(!buf.try_append(quad(i)));
        }

        assert_eq!(buf.vertex_slice(), vertices.as_slice());
        assert_eq!(buf.index_slice(), indices.as_slice());
        assert_eq!(buf.quad_count(), 3);
    }

    #[test]
    fn committed_quads_match_accepted_calls() {
        let mut buf = BatchBuffer::new(BatchCapacity::shared(100));
        let mut accepted = 0;
        for i in 0..12 {
            if buf.try_append(quad(i)) {
                accepted += 1;
            }
            assert_eq!(buf.quad_count(), accepted);
            assert_eq!(buf.vertex_slice().len(), accepted * FLOATS_PER_QUAD);
            assert_eq!(buf.index_slice().len(), accepted * INDICES_PER_QUAD);
        }
        assert_eq!(accepted, 5);
    }

    // ── indices ───────────────────────────────────────────────────────────

    #[test]
    fn indices_follow_batch_position() {
        let mut buf = BatchBuffer::new(BatchCapacity::default());
        fill(&mut buf, 20);
        for (k, tri) in buf.index_slice().chunks_exact(INDICES_PER_QUAD).enumerate() {
            let b = 4 * k as u32;
            assert_eq!(tri, &[b, b + 1, b + 3, b, b + 2, b + 3]);
        }
    }

    #[test]
    fn indices_restart_after_clear() {
        let mut buf = BatchBuffer::new(BatchCapacity::default());
        fill(&mut buf, 7);
        buf.clear();
        assert!(buf.try_append(quad(0)));
        assert_eq!(buf.index_slice(), &[0, 1, 3, 0, 2, 3]);
    }

    #[test]
    fn vertices_land_at_cursor() {
        let mut buf = BatchBuffer::new(BatchCapacity::default());
        buf.try_append(Quad::new(Vec2::new(1.0, 1.0), Vec2::zero()));
        buf.try_append(Quad::new(Vec2::new(2.0, 3.0), Vec2::new(1.0, 1.0)));
        let second = &buf.vertex_slice()[FLOATS_PER_QUAD..];
        assert_eq!(&second[..5], &[1.0, 1.0, 0.0, 0.0, 0.0]);
        assert_eq!(&second[15..], &[3.0, 4.0, 0.0, 1.0, 1.0]);
    }

    // ── clear ─────────────────────────────────────────────────────────────

    #[test]
    fn clear_is_idempotent() {
        let mut buf = BatchBuffer::new(BatchCapacity::shared(40));
        fill(&mut buf, 3);
        assert!(buf.is_full());

        buf.clear();
        buf.clear();

        assert!(!buf.is_full());
        assert!(buf.is_empty());
        assert!(buf.vertex_slice().is_empty());
        assert!(buf.index_slice().is_empty());
    }

    #[test]
    fn cleared_buffer_behaves_like_new() {
        let cap = BatchCapacity::shared(100);
        let mut used = BatchBuffer::new(cap);
        fill(&mut used, 9);
        used.clear();

        let mut fresh = BatchBuffer::new(cap);
        for i in 0..9 {
            assert_eq!(used.try_append(quad(i)), fresh.try_append(quad(i)));
        }
        assert_eq!(used.vertex_slice(), fresh.vertex_slice());
        assert_eq!(used.index_slice(), fresh.index_slice());
        assert_eq!(used.is_full(), fresh.is_full());
    }

    #[test]
    fn full_flag_persists_until_clear() {
        let mut buf = BatchBuffer::new(BatchCapacity::shared(20));
        assert!(buf.try_append(quad(0)));
        assert!(!buf.try_append(quad(1)));
        assert!(buf.is_full());
        assert!(buf.is_full());
        buf.clear();
        assert!(!buf.is_full());
    }
}
