use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::constants;
use crate::error::{PipelineError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub sources: HashMap<String, SourceParams>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    pub destination: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            destination: constants::DEFAULT_DESTINATION.to_string(),
        }
    }
}

/// Connection and generation parameters for one source. The pipeline core
/// never interprets these; they are handed to the source collaborator
/// unmodified.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceParams {
    pub rows: Option<usize>,
    pub seed: Option<u64>,
    pub customer_pool: Option<i64>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from("config.toml")
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_sources_and_destination() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[pipeline]
destination = "lake"

[sources.database]
rows = 25
seed = 7

[sources.api]
rows = 100
customer_pool = 25
"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.pipeline.destination, "lake");
        assert_eq!(config.sources["database"].rows, Some(25));
        assert_eq!(config.sources["database"].seed, Some(7));
        assert_eq!(config.sources["api"].customer_pool, Some(25));
        assert_eq!(config.sources["api"].seed, None);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.pipeline.destination, constants::DEFAULT_DESTINATION);
        assert!(config.sources.is_empty());
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = Config::load_from("does/not/exist.toml").unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }
}
