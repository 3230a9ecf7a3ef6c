use std::sync::Once;

/// Modules whose info-level output drowns the engine's own logs.
const NOISY_MODULES: [&str; 3] = ["wgpu_core", "wgpu_hal", "naga"];

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info", "warn",
/// "mote_engine=debug,wgpu_core=warn"). When unset, `RUST_LOG` is consulted,
/// then `default_level`.
///
/// `write_style` controls ANSI coloring behavior.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub default_level: log::LevelFilter,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            default_level: log::LevelFilter::Info,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// This function is idempotent; subsequent calls are ignored.
/// Intended usage is early in `main`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();
        builder.filter_level(config.default_level);

        // wgpu internals stay at warn unless a filter names them explicitly.
        for module in NOISY_MODULES {
            builder.filter_module(module, log::LevelFilter::Warn);
        }

        if let Some(filter) = resolve_filter(config.env_filter, std::env::var("RUST_LOG").ok()) {
            builder.parse_filters(&filter);
        }

        builder.write_style(config.write_style);

        if builder.try_init().is_err() {
            // Another logger was installed by the host; keep it.
            return;
        }

        log::debug!("logging initialized");
    });
}

fn resolve_filter(explicit: Option<String>, env: Option<String>) -> Option<String> {
    explicit
        .or(env)
        .filter(|f| !f.trim().is_empty())
}
