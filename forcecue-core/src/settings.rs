use serde::{Deserialize, Serialize};

use crate::sound::SoundName;

/// User preferences shared by every screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub vibration: bool,
    pub audio: bool,
    pub data_source: String,
    pub volume: f32,
    pub sound: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            vibration: true,
            audio: false,
            data_source: "Surgeon_1_Trial_1".to_string(),
            volume: 0.5,
            sound: SoundName::Scan.as_str().to_string(),
        }
    }
}

impl Settings {
    pub fn sound_name(&self) -> SoundName {
        SoundName::resolve(&self.sound)
    }

    /// Shallow merge; fields absent from `update` keep their value. Nothing is
    /// validated here.
    pub fn merged(&self, update: &SettingsUpdate) -> Settings {
        Settings {
            vibration: update.vibration.unwrap_or(self.vibration),
            audio: update.audio.unwrap_or(self.audio),
            data_source: update
                .data_source
                .clone()
                .unwrap_or_else(|| self.data_source.clone()),
            volume: update.volume.unwrap_or(self.volume),
            sound: update.sound.clone().unwrap_or_else(|| self.sound.clone()),
        }
    }
}

/// Partial settings change requested by a control.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub vibration: Option<bool>,
    pub audio: Option<bool>,
    pub data_source: Option<String>,
    pub volume: Option<f32>,
    pub sound: Option<String>,
}

impl SettingsUpdate {
    pub fn vibration(on: bool) -> Self {
        Self {
            vibration: Some(on),
            ..Default::default()
        }
    }

    pub fn audio(on: bool) -> Self {
        Self {
            audio: Some(on),
            ..Default::default()
        }
    }

    pub fn data_source(key: impl Into<String>) -> Self {
        Self {
            data_source: Some(key.into()),
            ..Default::default()
        }
    }

    pub fn volume(volume: f32) -> Self {
        Self {
            volume: Some(volume),
            ..Default::default()
        }
    }

    pub fn sound(name: impl Into<String>) -> Self {
        Self {
            sound: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_is_shallow() {
        let base = Settings::default();
        let merged = base.merged(&SettingsUpdate {
            audio: Some(true),
            volume: Some(0.8),
            ..Default::default()
        });

        assert!(merged.audio);
        assert_eq!(merged.volume, 0.8);
        assert!(merged.vibration);
        assert_eq!(merged.data_source, base.data_source);
        assert_eq!(merged.sound, base.sound);
    }

    #[test]
    fn merge_does_not_validate() {
        let merged = Settings::default().merged(&SettingsUpdate {
            volume: Some(3.0),
            data_source: Some("nope".into()),
            sound: Some("Kazoo".into()),
            ..Default::default()
        });
        assert_eq!(merged.volume, 3.0);
        assert_eq!(merged.data_source, "nope");
        assert_eq!(merged.sound_name(), SoundName::Scan);
    }

    #[test]
    fn empty_update_changes_nothing() {
        let base = Settings::default();
        assert!(SettingsUpdate::default().is_empty());
        assert_eq!(base.merged(&SettingsUpdate::default()), base);
    }
}
