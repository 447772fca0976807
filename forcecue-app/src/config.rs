use forcecue_core::Settings;
use forcecue_playback::{PlaybackConfig, TrialKey};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::cli::Cli;

pub const DEFAULT_CONFIG_FILE: &str = "forcecue.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// TrueType/OpenType font for on-screen text. System fonts are tried when
    /// unset.
    pub font_path: Option<PathBuf>,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            font_path: None,
            width: 960,
            height: 640,
            fullscreen: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the `S1_T1.json` .. `S2_T3.json` trial files.
    pub data_dir: PathBuf,
    pub playback: PlaybackConfig,
    /// Initial settings; keys are camelCase as in the settings store.
    pub settings: Settings,
    pub display: DisplayConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            playback: PlaybackConfig::default(),
            settings: Settings::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// The explicit file if given, else `forcecue.toml` when present, else
    /// defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                tracing::info!(path = %path.display(), "loading config");
                Self::from_file(path)
            }
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                tracing::info!(path = DEFAULT_CONFIG_FILE, "loading config");
                Self::from_file(DEFAULT_CONFIG_FILE)
            }
            None => {
                tracing::debug!("no config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Command-line flags win over file values.
    pub fn apply_cli(&mut self, cli: &Cli) -> Result<(), ConfigError> {
        if let Some(dir) = &cli.data_dir {
            self.data_dir = dir.clone();
        }
        if let Some(key) = &cli.dataset {
            self.settings.data_source = key.clone();
        }
        if cli.audio {
            self.settings.audio = true;
        }
        if cli.no_vibration {
            self.settings.vibration = false;
        }
        if let Some(sound) = &cli.sound {
            self.settings.sound = sound.clone();
        }
        if let Some(volume) = cli.volume {
            self.settings.volume = volume;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.settings.volume) {
            return Err(ConfigError::Validation(format!(
                "volume must be within 0..=1, got {}",
                self.settings.volume
            )));
        }
        if self.settings.data_source.parse::<TrialKey>().is_err() {
            return Err(ConfigError::Validation(format!(
                "unknown dataset '{}'",
                self.settings.data_source
            )));
        }
        if self.playback.poll_interval_ms == 0 {
            return Err(ConfigError::Validation("poll_interval_ms must be positive".into()));
        }
        if self.playback.initial_tempo_bpm == 0 {
            return Err(ConfigError::Validation("initial_tempo_bpm must be positive".into()));
        }
        if self.display.width == 0 || self.display.height == 0 {
            return Err(ConfigError::Validation("display size must be non-zero".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn empty_file_gives_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.playback.poll_interval_ms, 50);
        assert_eq!(config.settings.sound, "Scan");
    }

    #[test]
    fn reads_sections_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
data_dir = "/srv/trials"

[playback]
poll_interval_ms = 25

[settings]
audio = true
dataSource = "Surgeon_2_Trial_3"
sound = "GTA"

[display]
font_path = "/fonts/Inter.ttf"
fullscreen = true
"#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/trials"));
        assert_eq!(config.playback.poll_interval_ms, 25);
        assert_eq!(config.playback.initial_tempo_bpm, 60);
        assert!(config.settings.audio);
        assert!(config.settings.vibration);
        assert_eq!(config.settings.data_source, "Surgeon_2_Trial_3");
        assert_eq!(config.settings.sound, "GTA");
        assert_eq!(config.display.font_path, Some(PathBuf::from("/fonts/Inter.ttf")));
        assert!(config.display.fullscreen);
        assert_eq!(config.display.width, 960);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[playback\npoll_interval_ms = ").unwrap();
        assert!(matches!(
            AppConfig::from_file(file.path()),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn cli_overrides_file_values() {
        let mut config = AppConfig::default();
        let cli = Cli::parse_from([
            "forcecue",
            "--data-dir",
            "/tmp/d",
            "--dataset",
            "Surgeon_1_Trial_4",
            "--audio",
            "--no-vibration",
            "--sound",
            "Electronic",
            "--volume",
            "0.8",
        ]);
        config.apply_cli(&cli).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/d"));
        assert_eq!(config.settings.data_source, "Surgeon_1_Trial_4");
        assert!(config.settings.audio);
        assert!(!config.settings.vibration);
        assert_eq!(config.settings.sound, "Electronic");
        assert_eq!(config.settings.volume, 0.8);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let mut config = AppConfig::default();
        let cli = Cli::parse_from(["forcecue", "--volume", "1.5"]);
        assert!(matches!(
            config.apply_cli(&cli),
            Err(ConfigError::Validation(_))
        ));

        let mut config = AppConfig::default();
        let cli = Cli::parse_from(["forcecue", "--dataset", "Surgeon_5_Trial_1"]);
        assert!(matches!(
            config.apply_cli(&cli),
            Err(ConfigError::Validation(_))
        ));
    }
}
