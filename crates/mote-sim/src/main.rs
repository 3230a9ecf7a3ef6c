//! Ball Simulation: a pulsing field of circles drawn through the quad batch.
//!
//! Environment:
//! - `MOTE_BALLS`: number of balls (default 1000)
//! - `MOTE_TEXTURE`: image to use instead of the generated circle mask
//! - `RUST_LOG`: log filter (`debug` prints batch stats)

mod config;
mod simulation;

use anyhow::Result;
use mote_engine::device::GpuInit;
use mote_engine::logging::{init_logging, LoggingConfig};
use mote_engine::window::Runtime;

use crate::config::SimConfig;
use crate::simulation::Simulation;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = SimConfig::from_env()?;
    let runtime = config.runtime_config();

    Runtime::run(runtime, GpuInit::default(), Simulation::new(config))
}
