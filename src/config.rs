use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::spine::PaperStock;

pub const CONFIG_FILE_STEM: &str = "publishing-desk";
pub const ENV_PREFIX: &str = "PUBLISHING_DESK";

/// Main configuration structure for Publishing Desk
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PublishingDeskConfig {
    pub storage: StorageConfig,
    pub delivery: DeliveryConfig,
    pub print: PrintConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory holding one JSON file per project
    pub projects_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DeliveryConfig {
    /// Time each simulated delivery phase stays on screen
    pub phase_interval_ms: u64,
}

impl DeliveryConfig {
    pub fn phase_interval(&self) -> Duration {
        Duration::from_millis(self.phase_interval_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PrintConfig {
    pub default_paper: PaperStock,
    pub words_per_page: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level or EnvFilter directive
    pub log_level: String,
    /// Emit logs as JSON lines
    pub json_logs: bool,
}

impl Default for PublishingDeskConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                projects_dir: PathBuf::from(".publishing-desk/projects"),
            },
            delivery: DeliveryConfig {
                phase_interval_ms: 1500,
            },
            print: PrintConfig {
                default_paper: PaperStock::Cream,
                words_per_page: 250,
            },
            observability: ObservabilityConfig {
                log_level: "info".to_string(),
                json_logs: false,
            },
        }
    }
}

impl PublishingDeskConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (publishing-desk.toml in the working directory)
    /// 3. Environment variables (PUBLISHING_DESK__SECTION__KEY)
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("."))
    }

    /// Same as `load`, looking for the configuration file under `dir`.
    pub fn load_from(dir: &Path) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        let file = dir.join(format!("{CONFIG_FILE_STEM}.toml"));
        if file.exists() {
            builder = builder.add_source(File::from(file));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: PublishingDeskConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.delivery.phase_interval_ms == 0 {
            anyhow::bail!("delivery.phase_interval_ms must be positive");
        }
        if self.print.words_per_page == 0 {
            anyhow::bail!("print.words_per_page must be positive");
        }
        Ok(())
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

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = PublishingDeskConfig::load_from(temp_dir.path()).unwrap();
        assert_eq!(config.delivery.phase_interval(), Duration::from_millis(1500));
        assert_eq!(config.print.default_paper, PaperStock::Cream);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("publishing-desk.toml"),
            "[delivery]\nphase_interval_ms = 200\n\n[print]\ndefault_paper = \"white\"\nwords_per_page = 300\n",
        )
        .unwrap();

        let config = PublishingDeskConfig::load_from(temp_dir.path()).unwrap();
        assert_eq!(config.delivery.phase_interval_ms, 200);
        assert_eq!(config.print.default_paper, PaperStock::White);
        assert_eq!(config.print.words_per_page, 300);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = PublishingDeskConfig::default();
        config.delivery.phase_interval_ms = 42;
        config
            .save_to_file(temp_dir.path().join("publishing-desk.toml"))
            .unwrap();

        let loaded = PublishingDeskConfig::load_from(temp_dir.path()).unwrap();
        assert_eq!(loaded.delivery.phase_interval_ms, 42);
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let mut config = PublishingDeskConfig::default();
        config.delivery.phase_interval_ms = 0;
        assert!(config.validate().is_err());
    }
}
