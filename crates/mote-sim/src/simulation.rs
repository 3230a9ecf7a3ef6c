use anyhow::Result;
use mote_engine::batch::{BatchBackend, BatchRenderer, BatchStats};
use mote_engine::coords::{Vec2, Viewport};
use mote_engine::core::{App, AppControl, FrameCtx, StartCtx};
use mote_engine::paint::Color;
use mote_engine::render::QuadRenderer;
use mote_engine::scene::{Circle, Shape};

use crate::config::SimConfig;

const CLEAR: Color = Color::from_premul(0.05, 0.06, 0.09, 1.0);

/// Radians per second of the radius oscillation.
const PULSE_SPEED: f32 = 2.0;

/// Seconds between stats summaries.
const STATS_INTERVAL: f32 = 2.0;

/// Draws every shape, flushing whenever the batch fills up, then flushes the
/// remainder.
///
/// A shape rejected by a full batch is drawn again right after the flush, so no
/// geometry is lost.
pub fn draw_all<'s, B, S, I>(renderer: &mut BatchRenderer<B>, shapes: I, frame: &mut B::Frame<'_>)
where
    B: BatchBackend,
    S: Shape + 's,
    I: IntoIterator<Item = &'s S>,
{
    for shape in shapes {
        renderer.draw(shape);
        if renderer.buffer_is_full() {
            renderer.submit(frame);
            renderer.clear();
            renderer.draw(shape);
        }
    }

    renderer.submit(frame);
    renderer.clear();
}

/// Cell centers of a near-square grid holding `count` items in `viewport`.
///
/// Filled row-major from the top-left.
pub fn grid_layout(count: usize, viewport: Viewport) -> Vec<Vec2> {
    if count == 0 || !viewport.is_valid() {
        return Vec::new();
    }

    let aspect = viewport.width / viewport.height;
    let cols = ((count as f32 * aspect).sqrt().ceil() as usize).clamp(1, count);
    let rows = count.div_ceil(cols);

    let cell = Vec2::new(viewport.width / cols as f32, viewport.height / rows as f32);

    (0..count)
        .map(|i| {
            let (col, row) = (i % cols, i / cols);
            Vec2::new(
                (col as f32 + 0.5) * cell.x,
                (row as f32 + 0.5) * cell.y,
            )
        })
        .collect()
}

/// Radius at time `t`, swinging between `min` and `max`.
pub fn pulse_radius(min: f32, max: f32, t: f32, phase: f32) -> f32 {
    let s = 0.5 * (1.0 + (t * PULSE_SPEED + phase).sin());
    min + (max - min) * s
}

struct Ball {
    circle: Circle,
    phase: f32,
}

#[derive(Default)]
struct StatsWindow {
    frames: u64,
    totals: BatchStats,
    since: f32,
}

impl StatsWindow {
    fn record(&mut self, stats: BatchStats, elapsed: f32) {
        self.frames += 1;
        self.totals.flushes += stats.flushes;
        self.totals.quads += stats.quads;
        self.totals.rejected += stats.rejected;

        let span = elapsed - self.since;
        if span < STATS_INTERVAL {
            return;
        }

        let frames = self.frames.max(1) as f32;
        log::debug!(
            "{:.1} fps, {:.1} flushes/frame, {:.0} quads/frame, {} rejected appends",
            frames / span,
            self.totals.flushes as f32 / frames,
            self.totals.quads as f32 / frames,
            self.totals.rejected
        );

        *self = Self {
            since: elapsed,
            ..Self::default()
        };
    }
}

/// The ball field: circles on a grid with pulsing radii.
pub struct Simulation {
    config: SimConfig,
    renderer: Option<QuadRenderer>,
    balls: Vec<Ball>,
    layout_viewport: Viewport,
    stats: StatsWindow,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            renderer: None,
            balls: Vec::new(),
            layout_viewport: Viewport::default(),
            stats: StatsWindow::default(),
        }
    }

    fn relayout(&mut self, viewport: Viewport) {
        let centers = grid_layout(self.config.ball_count, viewport);
        let n = centers.len().max(1) as f32;

        self.balls = centers
            .into_iter()
            .enumerate()
            .map(|(i, center)| Ball {
                circle: Circle::new(self.config.min_radius, center),
                phase: i as f32 / n * std::f32::consts::TAU,
            })
            .collect();

        self.layout_viewport = viewport;
        log::debug!(
            "laid out {} balls in {}x{}",
            self.balls.len(),
            viewport.width,
            viewport.height
        );
    }

    fn animate(&mut self, elapsed: f32) {
        let (min, max) = (self.config.min_radius, self.config.max_radius);
        for ball in &mut self.balls {
            ball.circle.set_radius(pulse_radius(min, max, elapsed, ball.phase));
        }
    }
}

impl App for Simulation {
    fn start(&mut self, ctx: &mut StartCtx<'_, '_>) -> Result<()> {
        let renderer = QuadRenderer::from_config(ctx.gpu, &self.config.pipeline_config())?;

        log::info!(
            "{}: {} balls, {} quads per flush, texture {:?}",
            self.config.title,
            self.config.ball_count,
            renderer.buffer().capacity().max_quads(),
            renderer.backend().texture_size()
        );

        self.renderer = Some(renderer);
        self.relayout(ctx.viewport());
        Ok(())
    }

    fn update(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let viewport = ctx.viewport();
        if !viewport.is_valid() {
            return AppControl::Continue;
        }
        if viewport != self.layout_viewport {
            self.relayout(viewport);
        }

        self.animate(ctx.time.elapsed);

        let Some(renderer) = self.renderer.as_mut() else {
            log::error!("update called before start");
            return AppControl::Exit;
        };

        let balls = &self.balls;
        let control = ctx.render(CLEAR, |frame| {
            draw_all(renderer, balls.iter().map(|b| &b.circle), frame);
        });

        self.stats.record(renderer.take_stats(), ctx.time.elapsed);
        control
    }
}
