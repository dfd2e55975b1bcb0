//! Pipeline configuration

use dataset_builder::{AssemblerConfig, MetadataSchema, MetadataSource};
use serde::{Deserialize, Serialize};
use signal_loader::ChannelSpec;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable prefix, e.g. `MOTOR_FEATURES__OUTPUT_DIR`
pub const ENV_PREFIX: &str = "MOTOR_FEATURES";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Root of the train split; relative waveform references resolve here
    pub train_root: PathBuf,

    /// Root of the test split
    pub test_root: PathBuf,

    /// Directory receiving the feature tables and run report
    pub output_dir: PathBuf,

    /// Sensor channel to extract
    pub channel: ChannelSpec,

    /// Metadata tables; empty means the BrushlessMotor layout under the split roots
    pub sources: Vec<MetadataSource>,

    /// Column holding the segment id in every metadata table
    pub segment_id_column: String,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Emit JSON log lines
    pub log_json: bool,

    /// Worker threads for loading and extraction (0 = one per core)
    pub threads: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            train_root: PathBuf::from("data/imad/BrushlessMotor/train"),
            test_root: PathBuf::from("data/imad/BrushlessMotor/test"),
            output_dir: PathBuf::from("data"),
            channel: ChannelSpec::microphone(),
            sources: Vec::new(),
            segment_id_column: "segment_id".to_string(),
            log_level: "info".to_string(),
            log_json: false,
            threads: 0,
        }
    }
}

impl PipelineConfig {
    /// Load defaults, then the optional TOML file, then `MOTOR_FEATURES__*` variables
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).required(true));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot produce a run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel.reference_column.trim().is_empty() {
            return Err(ConfigError::Invalid("channel.reference_column is empty".into()));
        }
        if self.channel.waveform_column.trim().is_empty() {
            return Err(ConfigError::Invalid("channel.waveform_column is empty".into()));
        }
        if self.segment_id_column.trim().is_empty() {
            return Err(ConfigError::Invalid("segment_id_column is empty".into()));
        }
        if self.log_level.parse::<tracing::Level>().is_err() {
            return Err(ConfigError::Invalid(format!("unknown log_level '{}'", self.log_level)));
        }
        Ok(())
    }

    /// Metadata tables to assemble
    pub fn metadata_sources(&self) -> Vec<MetadataSource> {
        if self.sources.is_empty() {
            MetadataSource::brushless_motor(&self.train_root, &self.test_root)
        } else {
            self.sources.clone()
        }
    }

    pub fn assembler_config(&self) -> AssemblerConfig {
        AssemblerConfig {
            train_root: self.train_root.clone(),
            test_root: self.test_root.clone(),
            channel: self.channel.clone(),
        }
    }

    pub fn metadata_schema(&self) -> MetadataSchema {
        MetadataSchema::new(&self.segment_id_column, [self.channel.reference_column.clone()])
    }

    pub fn train_table_path(&self) -> PathBuf {
        self.output_dir.join("features_train.csv")
    }

    pub fn test_table_path(&self) -> PathBuf {
        self.output_dir.join("features_test.csv")
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join("pipeline_report.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataset_builder::{Domain, Label, Split};
    use std::sync::Mutex;

    // `load` reads the process environment; tests that call it take this lock
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.metadata_sources().len(), 6);
        assert_eq!(config.train_table_path(), PathBuf::from("data/features_train.csv"));
    }

    #[test]
    fn test_load_toml_file() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.toml");
        std::fs::write(
            &path,
            r#"
output_dir = "out"
threads = 2

[channel]
reference_column = "ism330dhcx_acc"
waveform_column = "A_x [g]"

[[sources]]
path = "meta/train.csv"
split = "train"
domain = "target"
label = 0
"#,
        )
        .unwrap();

        let config = PipelineConfig::load(Some(path.as_path())).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.threads, 2);
        assert_eq!(config.channel, ChannelSpec::new("ism330dhcx_acc", "A_x [g]"));
        assert_eq!(
            config.metadata_sources(),
            vec![MetadataSource::new("meta/train.csv", Split::Train, Domain::Target, Label::Normal)]
        );
        // Unset keys keep their defaults
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_env_overrides_file_and_defaults() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.toml");
        std::fs::write(
            &path,
            r#"
log_level = "warn"

[channel]
reference_column = "ism330dhcx_gyro"
waveform_column = "G_x [dps]"
"#,
        )
        .unwrap();

        std::env::set_var("MOTOR_FEATURES__LOG_LEVEL", "debug");
        std::env::set_var("MOTOR_FEATURES__CHANNEL__WAVEFORM_COLUMN", "G_z [dps]");
        std::env::set_var("MOTOR_FEATURES__OUTPUT_DIR", "env_out");
        let loaded = PipelineConfig::load(Some(path.as_path()));
        std::env::remove_var("MOTOR_FEATURES__LOG_LEVEL");
        std::env::remove_var("MOTOR_FEATURES__CHANNEL__WAVEFORM_COLUMN");
        std::env::remove_var("MOTOR_FEATURES__OUTPUT_DIR");

        let config = loaded.unwrap();
        // Flat keys override the file and the defaults
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.output_dir, PathBuf::from("env_out"));
        // Nested keys override one field and keep its siblings from the file
        assert_eq!(config.channel, ChannelSpec::new("ism330dhcx_gyro", "G_z [dps]"));
        assert_eq!(config.segment_id_column, "segment_id");
    }

    #[test]
    fn test_rejects_bad_level() {
        let config = PipelineConfig {
            log_level: "loud".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_empty_channel() {
        let config = PipelineConfig {
            channel: ChannelSpec::new("", "MIC [Waveform]"),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
