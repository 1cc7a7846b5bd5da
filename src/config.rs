use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure for workout-flow
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkoutFlowConfig {
    /// Workflow runtime settings
    pub engine: EngineConfig,
    /// Logging settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How long `saved` stays up before returning to editing
    pub saved_expiry_ms: u64,
    /// Capacity of the per-instance event queue
    pub event_buffer: usize,
    /// Transition records kept per instance
    pub history_limit: usize,
    /// Upper bound for one save actor; unbounded when absent
    pub save_timeout_ms: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            saved_expiry_ms: 3000,
            event_buffer: 64,
            history_limit: 100,
            save_timeout_ms: None,
        }
    }
}

impl EngineConfig {
    pub fn saved_expiry(&self) -> Duration {
        Duration::from_millis(self.saved_expiry_ms)
    }

    pub fn save_timeout(&self) -> Option<Duration> {
        self.save_timeout_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default log level when RUST_LOG is not set
    pub log_level: String,
    /// Emit JSON log lines instead of human readable output
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: true,
        }
    }
}

impl WorkoutFlowConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (workout-flow.toml)
    /// 3. Environment variables (prefixed with WORKOUT_FLOW__)
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("workout-flow.toml"))
    }

    /// Same as `load` with an explicit configuration file
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut builder = Config::builder();

        if path.exists() {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix("WORKOUT_FLOW")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<WorkoutFlowConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        let _ = WorkoutFlowConfig::load_env_file();
        WorkoutFlowConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static WorkoutFlowConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}

/// Initialize configuration (called at startup)
pub fn init_config() -> Result<()> {
    let _config = config()?;
    tracing::info!("Configuration loaded successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_file() {
        let dir = TempDir::new().unwrap();
        let config = WorkoutFlowConfig::load_from(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config.engine, EngineConfig::default());
        assert_eq!(config.engine.saved_expiry(), Duration::from_secs(3));
        assert_eq!(config.engine.save_timeout(), None);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("workout-flow.toml");
        std::fs::write(
            &path,
            "[engine]\nsaved_expiry_ms = 1500\nsave_timeout_ms = 10000\n\n[observability]\njson_logs = false\n",
        )
        .unwrap();

        let config = WorkoutFlowConfig::load_from(&path).unwrap();
        assert_eq!(config.engine.saved_expiry_ms, 1500);
        assert_eq!(config.engine.event_buffer, 64);
        assert_eq!(config.engine.save_timeout(), Some(Duration::from_secs(10)));
        assert!(!config.observability.json_logs);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_save_to_file_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("saved.toml");
        let mut config = WorkoutFlowConfig::default();
        config.engine.history_limit = 7;

        config.save_to_file(&path).unwrap();
        let loaded = WorkoutFlowConfig::load_from(&path).unwrap();
        assert_eq!(loaded.engine.history_limit, 7);
    }
}
