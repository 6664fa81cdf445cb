use serde::Deserialize;

/// Log output configuration.
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, used when `RUST_LOG` is not set
    /// (e.g. `"info"` or `"hookcast_dispatcher=debug,info"`).
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_owned()
}
