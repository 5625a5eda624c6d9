use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info", "warn",
/// "prism_engine=debug,wgpu_core=warn").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,

    /// Level used when neither `env_filter` nor `RUST_LOG` is set.
    pub default_level: log::LevelFilter,

    /// Caps wgpu's internal crates at `warn` unless the filter names them.
    pub quiet_gpu_internals: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
            default_level: log::LevelFilter::Info,
            quiet_gpu_internals: true,
        }
    }
}

const GPU_INTERNALS: [&str; 4] = ["wgpu_core", "wgpu_hal", "wgpu", "naga"];

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// This function is idempotent; subsequent calls are ignored.
/// Intended usage is early in `main`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = effective_filter(&config, std::env::var("RUST_LOG").ok());

        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&filter);
        builder.write_style(config.write_style);

        // Another logger may already be installed (e.g. by a test harness).
        if builder.try_init().is_err() {
            return;
        }

        log::debug!("logging initialized with `{filter}`");
    });
}

/// Resolves the filter string: explicit filter, then `RUST_LOG`, then the
/// default level, with wgpu internals capped when requested.
fn effective_filter(config: &LoggingConfig, rust_log: Option<String>) -> String {
    let base = config
        .env_filter
        .clone()
        .or(rust_log)
        .filter(|f| !f.trim().is_empty())
        .unwrap_or_else(|| config.default_level.to_string().to_lowercase());

    if !config.quiet_gpu_internals {
        return base;
    }

    let mut filter = base;
    for module in GPU_INTERNALS {
        if !names_module(&filter, module) {
            filter.push_str(&format!(",{module}=warn"));
        }
    }
    filter
}

fn names_module(filter: &str, module: &str) -> bool {
    filter
        .split(',')
        .filter_map(|directive| directive.split('=').next())
        .any(|name| name.trim() == module)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(filter: Option<&str>, quiet: bool) -> LoggingConfig {
        LoggingConfig {
            env_filter: filter.map(str::to_owned),
            quiet_gpu_internals: quiet,
            ..Default::default()
        }
    }

    #[test]
    fn explicit_filter_wins_over_env() {
        let f = effective_filter(&cfg(Some("debug"), false), Some("trace".to_string()));
        assert_eq!(f, "debug");
    }

    #[test]
    fn env_used_without_explicit_filter() {
        let f = effective_filter(&cfg(None, false), Some("warn".to_string()));
        assert_eq!(f, "warn");
    }

    #[test]
    fn default_level_as_fallback() {
        assert_eq!(effective_filter(&cfg(None, false), None), "info");
    }

    #[test]
    fn gpu_internals_capped() {
        let f = effective_filter(&cfg(Some("debug"), true), None);
        assert_eq!(f, "debug,wgpu_core=warn,wgpu_hal=warn,wgpu=warn,naga=warn");
    }

    #[test]
    fn named_gpu_module_left_alone() {
        let f = effective_filter(&cfg(Some("info,wgpu_hal=trace"), true), None);
        assert!(f.contains("wgpu_hal=trace"));
        assert!(!f.contains("wgpu_hal=warn"));
        assert!(f.contains("wgpu_core=warn"));
    }

    #[test]
    fn init_is_idempotent() {
        init_logging(LoggingConfig::default());
        init_logging(cfg(Some("trace"), false));
    }
}
