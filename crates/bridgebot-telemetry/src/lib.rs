use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Configuration for the tracing subscriber.
#[derive(Clone, Debug)]
pub struct TelemetryConfig {
    /// Default log level. Overridden by the RUST_LOG env var.
    pub log_level: Level,
    /// Per-module level overrides (e.g. "bridgebot_stream" => DEBUG).
    pub module_levels: Vec<(String, Level)>,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: Level::INFO,
            module_levels: Vec::new(),
            json: false,
        }
    }
}

/// Build the EnvFilter directive string from the config.
fn filter_directives(config: &TelemetryConfig) -> String {
    let mut directives = config.log_level.to_string().to_lowercase();
    for (module, level) in &config.module_levels {
        directives.push_str(&format!(",{}={}", module, level.to_string().to_lowercase()));
    }
    directives
}

/// Initialize the global tracing subscriber. Call once at startup.
pub fn init(config: TelemetryConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(&config)));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    if config.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_default() {
        let config = TelemetryConfig::default();
        assert_eq!(filter_directives(&config), "info");
    }

    #[test]
    fn directives_with_module_overrides() {
        let config = TelemetryConfig {
            log_level: Level::WARN,
            module_levels: vec![
                ("bridgebot_stream".to_string(), Level::DEBUG),
                ("bridgebot_pipeline".to_string(), Level::TRACE),
            ],
            json: false,
        };
        assert_eq!(
            filter_directives(&config),
            "warn,bridgebot_stream=debug,bridgebot_pipeline=trace"
        );
    }
}
