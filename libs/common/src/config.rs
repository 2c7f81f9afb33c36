//! Layered configuration
//!
//! Serialized defaults are merged with a single file whose extension picks
//! the format (`toml`, `yaml`/`yml`, `json`). Keys missing from the file
//! keep their default values.

use std::path::Path;

use ecl_keyword::CodecConfig;
use figment::{
    providers::{Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use well_log::CurveConfig;

use crate::error::{Error, Result};
use crate::logging::LogConfig;

/// Configuration of the whole toolkit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LogConfig,
    pub codec: CodecConfig,
    pub curves: CurveConfig,
}

impl AppConfig {
    /// Defaults overlaid with the settings in `path`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        load_config_from_file(path)
    }
}

enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

fn config_format(path: &Path) -> Result<ConfigFormat> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::config("Config file must have an extension"))?;

    match extension.to_ascii_lowercase().as_str() {
        "toml" => Ok(ConfigFormat::Toml),
        "yaml" | "yml" => Ok(ConfigFormat::Yaml),
        "json" => Ok(ConfigFormat::Json),
        _ => Err(Error::config(format!(
            "Unsupported config file format: {}",
            extension
        ))),
    }
}

/// Load configuration from a specific file on top of `T::default()`
pub fn load_config_from_file<T, P>(path: P) -> Result<T>
where
    T: Serialize + for<'de> Deserialize<'de> + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let format = config_format(path)?;
    if !path.is_file() {
        return Err(Error::config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    let figment = Figment::from(Serialized::defaults(T::default()));
    let figment = match format {
        ConfigFormat::Toml => figment.merge(Toml::file(path)),
        ConfigFormat::Yaml => figment.merge(Yaml::file(path)),
        ConfigFormat::Json => figment.merge(Json::file(path)),
    };

    let config = figment
        .extract()
        .map_err(|e| Error::config(format!("Failed to load configuration from file: {}", e)))?;
    debug!(path = %path.display(), "Loaded configuration");
    Ok(config)
}

/// Save configuration to a file, format chosen by extension
pub fn save_config_to_file<T, P>(config: &T, path: P) -> Result<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let content = match config_format(path)? {
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_from_extension() {
        assert!(matches!(
            config_format(Path::new("a.toml")),
            Ok(ConfigFormat::Toml)
        ));
        assert!(matches!(
            config_format(Path::new("a.YML")),
            Ok(ConfigFormat::Yaml)
        ));
        assert!(matches!(
            config_format(Path::new("a.json")),
            Ok(ConfigFormat::Json)
        ));
        assert!(matches!(
            config_format(Path::new("a.ini")),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            config_format(&PathBuf::from("config")),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.codec, CodecConfig::default());
        assert_eq!(config.curves.depth_diff_tolerance, 0.1);
    }
}
