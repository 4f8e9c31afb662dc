use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use dirs::home_dir;
use serde::{Deserialize, Serialize};

use crate::{
    errors::ConfigError,
    ledger::{UndoPolicy, Variant},
    raster::{RasterOptions, DEFAULT_JPEG_QUALITY, DEFAULT_SCALE},
};

const DEFAULT_DIR_NAME: &str = ".worklog";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";
const MAX_RASTER_SCALE: f32 = 8.0;
pub const HOME_ENV: &str = "WORKLOG_HOME";

/// Keys accepted by [`Config::set`].
pub const CONFIG_KEYS: &[&str] = &[
    "variant",
    "undo_policy",
    "jpeg_quality",
    "raster_scale",
    "export_dir",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub variant: Variant,
    pub undo_policy: UndoPolicy,
    pub jpeg_quality: u8,
    pub raster_scale: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            undo_policy: UndoPolicy::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            raster_scale: DEFAULT_SCALE,
            export_dir: None,
        }
    }
}

impl Config {
    pub fn raster_options(&self) -> RasterOptions {
        RasterOptions {
            quality: self.jpeg_quality,
            scale: self.raster_scale,
        }
    }

    /// Updates one setting from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "variant" => self.variant = value.parse().map_err(ConfigError::Invalid)?,
            "undo_policy" => self.undo_policy = value.parse().map_err(ConfigError::Invalid)?,
            "jpeg_quality" => {
                self.jpeg_quality = value
                    .parse::<u8>()
                    .map_err(|_| quality_error(value))
                    .and_then(check_quality)?;
            }
            "raster_scale" => {
                self.raster_scale = value
                    .parse::<f32>()
                    .map_err(|_| scale_error(value))
                    .and_then(check_scale)?;
            }
            "export_dir" => {
                let trimmed = value.trim();
                self.export_dir = (!trimmed.is_empty()).then(|| PathBuf::from(trimmed));
            }
            other => {
                return Err(ConfigError::Invalid(format!(
                    "unknown setting `{other}` (expected one of: {})",
                    CONFIG_KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }

    /// Applies the limits of [`Config::set`] to values read from disk.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_quality(self.jpeg_quality)?;
        check_scale(self.raster_scale)?;
        Ok(())
    }

    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("variant", self.variant.to_string()),
            ("undo_policy", self.undo_policy.to_string()),
            ("jpeg_quality", self.jpeg_quality.to_string()),
            ("raster_scale", self.raster_scale.to_string()),
            (
                "export_dir",
                self.export_dir
                    .as_ref()
                    .map(|dir| dir.display().to_string())
                    .unwrap_or_else(|| "-".into()),
            ),
        ]
    }
}

fn check_quality(quality: u8) -> Result<u8, ConfigError> {
    if (1..=100).contains(&quality) {
        Ok(quality)
    } else {
        Err(quality_error(quality))
    }
}

fn check_scale(scale: f32) -> Result<f32, ConfigError> {
    if scale.is_finite() && scale > 0.0 && scale <= MAX_RASTER_SCALE {
        Ok(scale)
    } else {
        Err(scale_error(scale))
    }
}

fn quality_error(value: impl std::fmt::Display) -> ConfigError {
    ConfigError::Invalid(format!(
        "jpeg_quality must be between 1 and 100 (got `{value}`)"
    ))
}

fn scale_error(value: impl std::fmt::Display) -> ConfigError {
    ConfigError::Invalid(format!(
        "raster_scale must be a number in (0, {MAX_RASTER_SCALE}] (got `{value}`)"
    ))
}

/// Returns the application directory, defaulting to `~/.worklog`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Loads and persists [`Config`] as pretty JSON.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Self {
        Self {
            path: base.join(CONFIG_FILE),
        }
    }

    /// Missing files yield the defaults. Out-of-range values are rejected.
    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            let config: Config = serde_json::from_str(&data)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Writes through a temporary file and renames it into place.
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_file(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &str) -> Result<(), ConfigError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_defaults() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf());
        assert_eq!(manager.load().unwrap(), Config::default());
    }

    #[test]
    fn save_then_load_keeps_settings() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().join("nested"));
        let mut config = Config::default();
        config.set("variant", "shift-times").unwrap();
        config.set("undo_policy", "keep-first-entry").unwrap();
        config.set("jpeg_quality", "80").unwrap();
        manager.save(&config).unwrap();

        assert_eq!(manager.load().unwrap(), config);
        assert!(!tmp_path(manager.path()).exists());
    }

    #[test]
    fn partial_files_fall_back_to_defaults() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf());
        fs::write(manager.path(), r#"{ "jpeg_quality": 70 }"#).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.jpeg_quality, 70);
        assert_eq!(config.variant, Variant::ElapsedHours);
    }

    #[test]
    fn out_of_range_file_values_are_rejected() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf());
        fs::write(manager.path(), r#"{ "raster_scale": 100000.0 }"#).unwrap();
        assert!(matches!(manager.load(), Err(ConfigError::Invalid(_))));

        fs::write(manager.path(), r#"{ "jpeg_quality": 0 }"#).unwrap();
        assert!(matches!(manager.load(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut config = Config::default();
        assert!(config.set("jpeg_quality", "0").is_err());
        assert!(config.set("raster_scale", "-1").is_err());
        assert!(config.set("variant", "weekly").is_err());
        assert!(config.set("colour", "blue").is_err());
        assert_eq!(config, Config::default());
    }
}
