use crate::paint::Color;
use crate::scene::shapes::Shape;

use super::{BatchBackend, BatchBuffer, BatchCapacity, BatchUniforms, Quad};

/// Single texture; the slot never changes.
const TEXTURE_SLOT: i32 = 0;

/// Counters accumulated across flushes until [`BatchRenderer::take_stats`].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Submits that issued a draw.
    pub flushes: u64,
    /// Quads drawn by those submits.
    pub quads: u64,
    /// Appends rejected because the buffer was full.
    pub rejected: u64,
}

/// Append-and-flush front end over a [`BatchBuffer`] and its backend.
///
/// `draw_quad` never flushes on its own. When an append is rejected the caller
/// observes [`buffer_is_full`](Self::buffer_is_full), submits, clears and draws
/// the rejected shape again:
///
/// ```rust,ignore
/// for shape in &shapes {
///     renderer.draw(shape);
///     if renderer.buffer_is_full() {
///         renderer.submit(frame);
///         renderer.clear();
///         renderer.draw(shape);
///     }
/// }
/// renderer.submit(frame);
/// renderer.clear();
/// ```
pub struct BatchRenderer<B: BatchBackend> {
    backend: B,
    buffer: BatchBuffer,
    tint: Color,
    stats: BatchStats,
}

impl<B: BatchBackend> BatchRenderer<B> {
    pub fn new(backend: B, capacity: BatchCapacity) -> Self {
        log::debug!(
            "batch renderer: {} vertex scalars, {} indices ({} quads per flush)",
            capacity.vertex_scalars,
            capacity.indices,
            capacity.max_quads()
        );

        Self {
            backend,
            buffer: BatchBuffer::new(capacity),
            tint: Color::WHITE,
            stats: BatchStats::default(),
        }
    }

    /// Appends a quad to the current batch.
    ///
    /// If it does not fit, nothing is written and `buffer_is_full()` turns true.
    pub fn draw_quad(&mut self, quad: Quad) {
        if !self.buffer.try_append(quad) {
            self.stats.rejected += 1;
            log::trace!("batch full at {} quads; append rejected", self.buffer.quad_count());
        }
    }

    /// Appends the shape's backing quad.
    #[inline]
    pub fn draw<S: Shape + ?Sized>(&mut self, shape: &S) {
        self.draw_quad(shape.quad());
    }

    #[inline]
    pub fn buffer_is_full(&self) -> bool {
        self.buffer.is_full()
    }

    /// Flushes the written prefix as one indexed draw and rewinds the buffer.
    ///
    /// An empty batch issues no backend calls.
    pub fn submit(&mut self, frame: &mut B::Frame<'_>) {
        if self.buffer.is_empty() {
            self.buffer.clear();
            return;
        }

        let quads = self.buffer.quad_count();
        let index_count = self.buffer.index_slice().len() as u32;

        self.backend.upload(frame, self.buffer.vertex_slice(), self.buffer.index_slice());
        self.backend.set_uniforms(
            frame,
            BatchUniforms {
                tint: self.tint.rgb(),
                texture_slot: TEXTURE_SLOT,
            },
        );
        self.backend.draw_indexed(frame, index_count);

        self.stats.flushes += 1;
        self.stats.quads += quads as u64;
        log::trace!("flushed {quads} quads ({index_count} indices)");

        self.buffer.clear();
    }

    /// Rewinds the buffer. Unflushed quads are discarded.
    #[inline]
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Sets the color applied to subsequent flushes.
    #[inline]
    pub fn set_tint(&mut self, tint: Color) {
        self.tint = tint;
    }

    #[inline]
    pub fn tint(&self) -> Color {
        self.tint
    }

    #[inline]
    pub fn buffer(&self) -> &BatchBuffer {
        &self.buffer
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    pub fn stats(&self) -> BatchStats {
        self.stats
    }

    /// Returns the accumulated counters and resets them.
    #[inline]
    pub fn take_stats(&mut self) -> BatchStats {
        std::mem::take(&mut self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::geometry::{FLOATS_PER_QUAD, INDICES_PER_QUAD};
    use crate::coords::Vec2;
    use crate::scene::shapes::Circle;

    /// Backend that records every call instead of touching a GPU.
    #[derive(Default)]
    struct Recorder {
        uploads: Vec<(Vec<f32>, Vec<u32>)>,
        uniforms: Vec<BatchUniforms>,
        draws: Vec<u32>,
    }

    impl BatchBackend for Recorder {
        type Frame<'f> = ();

        fn upload(&mut self, _: &mut (), vertices: &[f32], indices: &[u32]) {
            self.uploads.push((vertices.to_vec(), indices.to_vec()));
        }

        fn set_uniforms(&mut self, _: &mut (), uniforms: BatchUniforms) {
            self.uniforms.push(uniforms);
        }

        fn draw_indexed(&mut self, _: &mut (), index_count: u32) {
            self.draws.push(index_count);
        }
    }

    fn renderer(slots: usize) -> BatchRenderer<Recorder> {
        BatchRenderer::new(Recorder::default(), BatchCapacity::shared(slots))
    }

    fn quad(i: usize) -> Quad {
        Quad::new(Vec2::new(1.0, 1.0), Vec2::new(i as f32, 0.0))
    }

    // ── append / full ─────────────────────────────────────────────────────

    #[test]
    fn draw_quad_does_not_flush_when_full() {
        let mut r = renderer(40);
        r.draw_quad(quad(0));
        r.draw_quad(quad(1));
        r.draw_quad(quad(2));

        assert!(r.buffer_is_full());
        assert!(r.backend().draws.is_empty());
        assert_eq!(r.buffer().quad_count(), 2);
        assert_eq!(r.stats().rejected, 1);
    }

    #[test]
    fn draw_shape_feeds_backing_quad() {
        let mut r = renderer(100);
        let circle = Circle::new(4.0, Vec2::new(10.0, 10.0));
        r.draw(&circle);

        let v = r.buffer().vertex_slice();
        assert_eq!(&v[..2], &[8.0, 8.0]);
        assert_eq!(&v[15..17], &[12.0, 12.0]);
    }

    // ── submit ────────────────────────────────────────────────────────────

    #[test]
    fn submit_issues_one_draw_over_written_indices() {
        let mut r = renderer(200);
        for i in 0..3 {
            r.draw_quad(quad(i));
        }
        r.submit(&mut ());

        let rec = r.backend();
        assert_eq!(rec.draws, vec![18]);
        assert_eq!(rec.uploads.len(), 1);
        assert_eq!(rec.uploads[0].0.len(), 3 * FLOATS_PER_QUAD);
        assert_eq!(rec.uploads[0].1.len(), 3 * INDICES_PER_QUAD);
        assert!(r.buffer().is_empty());
    }

    #[test]
    fn submit_resets_full_flag() {
        let mut r = renderer(20);
        r.draw_quad(quad(0));
        r.draw_quad(quad(1));
        assert!(r.buffer_is_full());

        r.submit(&mut ());
        assert!(!r.buffer_is_full());

        // Explicit clear after submit is harmless.
        r.clear();
        r.draw_quad(quad(1));
        assert_eq!(r.buffer().quad_count(), 1);
    }

    #[test]
    fn empty_submit_issues_nothing() {
        let mut r = renderer(100);
        r.submit(&mut ());
        r.submit(&mut ());

        let rec = r.backend();
        assert!(rec.uploads.is_empty());
        assert!(rec.uniforms.is_empty());
        assert!(rec.draws.is_empty());
        assert_eq!(r.stats(), BatchStats::default());
    }

    #[test]
    fn uniforms_carry_tint_and_slot() {
        let mut r = renderer(100);
        r.set_tint(Color::from_straight(1.0, 0.5, 0.25, 1.0));
        r.draw_quad(quad(0));
        r.submit(&mut ());

        assert_eq!(
            r.backend().uniforms,
            vec![BatchUniforms { tint: [1.0, 0.5, 0.25], texture_slot: 0 }]
        );
    }

    // ── flush-then-continue ───────────────────────────────────────────────

    #[test]
    fn flush_then_continue_loses_nothing() {
        // 100 slots → 5 quads per flush.
        let mut r = renderer(100);
        let attempted = 12;

        for i in 0..attempted {
            r.draw_quad(quad(i));
            if r.buffer_is_full() {
                r.submit(&mut ());
                r.clear();
                r.draw_quad(quad(i));
            }
        }
        r.submit(&mut ());
        r.clear();

        let rec = r.backend();
        assert_eq!(rec.draws, vec![30, 30, 12]);

        let drawn: u32 = rec.draws.iter().map(|n| n / INDICES_PER_QUAD as u32).sum();
        assert_eq!(drawn as usize, attempted);

        // Every flush indexes from zero; nothing references a previous batch.
        for (vertices, indices) in &rec.uploads {
            let vertex_count = (vertices.len() / 5) as u32;
            assert_eq!(&indices[..6], &[0, 1, 3, 0, 2, 3]);
            assert!(indices.iter().all(|&i| i < vertex_count));
        }

        // The re-drawn quad opens the next batch at its own position.
        assert_eq!(rec.uploads[1].0[0], 5.0);
        assert_eq!(rec.uploads[2].0[0], 10.0);

        let stats = r.stats();
        assert_eq!(stats.flushes, 3);
        assert_eq!(stats.quads, attempted as u64);
        assert_eq!(stats.rejected, 2);
    }

    #[test]
    fn take_stats_resets_counters() {
        let mut r = renderer(100);
        r.draw_quad(quad(0));
        r.submit(&mut ());

        let taken = r.take_stats();
        assert_eq!(taken.flushes, 1);
        assert_eq!(taken.quads, 1);
        assert_eq!(r.stats(), BatchStats::default());
    }
}
