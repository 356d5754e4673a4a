use crate::errors::ConfigError;
use crate::logger::DEFAULT_LOG_FILE;
use crate::models::FieldSchema;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const QUESTIONS_FILE: &str = "questions.json";
pub const CARS_FILE: &str = "cars.json";
pub const CONFIG_FILE: &str = "config.json";
pub const DEFAULT_SAMPLE_SIZE: usize = 10;
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub sample_size: usize,
    pub schema: FieldSchema,
    pub load_timeout: Duration,
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            sample_size: DEFAULT_SAMPLE_SIZE,
            schema: FieldSchema::FULL,
            load_timeout: DEFAULT_LOAD_TIMEOUT,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum SchemaName {
    Full,
    Simple,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ConfigFile {
    sample_size: Option<usize>,
    schema: Option<SchemaName>,
    load_timeout_secs: Option<u64>,
    log_file: Option<PathBuf>,
    year_from: Option<i32>,
    year_to: Option<i32>,
}

impl Config {
    /// Defaults for `data_dir`, overlaid with `config.json` when it exists.
    pub fn load(data_dir: &Path) -> Result<Self, ConfigError> {
        let mut config = Config {
            data_dir: data_dir.to_path_buf(),
            ..Config::default()
        };

        let path = data_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(config);
        }

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let file: ConfigFile =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?;

        config.apply(file);
        config.validate()?;
        Ok(config)
    }

    fn apply(&mut self, file: ConfigFile) {
        if let Some(sample_size) = file.sample_size {
            self.sample_size = sample_size;
        }
        if let Some(schema) = file.schema {
            self.schema = match schema {
                SchemaName::Full => FieldSchema::FULL,
                SchemaName::Simple => FieldSchema::SIMPLE,
            };
        }
        if let Some(secs) = file.load_timeout_secs {
            self.load_timeout = Duration::from_secs(secs);
        }
        if let Some(log_file) = file.log_file {
            self.log_file = log_file;
        }
        if let Some(year_from) = file.year_from {
            self.schema.year_from = year_from;
        }
        if let Some(year_to) = file.year_to {
            self.schema.year_to = year_to;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_size == 0 {
            return Err(ConfigError::Invalid("sampleSize must be at least 1".to_string()));
        }
        if self.schema.year_from > self.schema.year_to {
            return Err(ConfigError::Invalid(format!(
                "year range {}..={} is empty",
                self.schema.year_from, self.schema.year_to
            )));
        }
        if self.load_timeout.is_zero() {
            return Err(ConfigError::Invalid("loadTimeoutSecs must be positive".to_string()));
        }
        Ok(())
    }

    pub fn questions_path(&self) -> PathBuf {
        self.data_dir.join(QUESTIONS_FILE)
    }

    pub fn cars_path(&self) -> PathBuf {
        self.data_dir.join(CARS_FILE)
    }
}
