use std::path::PathBuf;

use anyhow::{Context, Result};
use mote_engine::paint::Color;
use mote_engine::render::{QuadPipelineConfig, TextureSource};
use mote_engine::window::RuntimeConfig;
use winit::dpi::LogicalSize;

/// Number of balls, overrides [`SimConfig::ball_count`].
pub const ENV_BALLS: &str = "MOTE_BALLS";
/// Image used for every ball instead of the generated mask.
pub const ENV_TEXTURE: &str = "MOTE_TEXTURE";

const BALL_TINT: Color = Color::from_premul(1.0, 0.78, 0.35, 1.0);

/// Settings for the ball simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub ball_count: usize,
    pub min_radius: f32,
    pub max_radius: f32,
    pub texture_path: Option<PathBuf>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            title: "Ball Simulation".to_string(),
            width: 1280,
            height: 720,
            ball_count: 1000,
            min_radius: 6.0,
            max_radius: 24.0,
            texture_path: None,
        }
    }
}

impl SimConfig {
    /// Defaults overridden by `MOTE_BALLS` / `MOTE_TEXTURE`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for the known keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_BALLS) {
            config.ball_count = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_BALLS} must be a ball count, got {raw:?}"))?;
        }

        if let Some(raw) = lookup(ENV_TEXTURE).filter(|p| !p.trim().is_empty()) {
            config.texture_path = Some(PathBuf::from(raw));
        }

        Ok(config)
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            title: self.title.clone(),
            initial_size: LogicalSize::new(self.width as f64, self.height as f64),
            ..RuntimeConfig::default()
        }
    }

    pub fn pipeline_config(&self) -> QuadPipelineConfig {
        let texture = match &self.texture_path {
            Some(path) => TextureSource::File(path.clone()),
            None => TextureSource::default(),
        };

        QuadPipelineConfig {
            texture,
            tint: BALL_TINT,
            ..QuadPipelineConfig::default()
        }
    }
}
