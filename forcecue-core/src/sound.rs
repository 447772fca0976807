use serde::{Deserialize, Serialize};
use std::fmt;

/// Beep sounds offered in settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SoundName {
    #[default]
    Scan,
    LoudBeep,
    Electronic,
    Gta,
}

impl SoundName {
    pub const ALL: [SoundName; 4] = [
        SoundName::Scan,
        SoundName::LoudBeep,
        SoundName::Electronic,
        SoundName::Gta,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SoundName::Scan => "Scan",
            SoundName::LoudBeep => "Loud Beep",
            SoundName::Electronic => "Electronic",
            SoundName::Gta => "GTA",
        }
    }

    /// Unrecognized names fall back to `Scan`.
    pub fn resolve(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str() == name)
            .unwrap_or_default()
    }

    /// Next entry in picker order, wrapping around.
    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|s| s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for SoundName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
