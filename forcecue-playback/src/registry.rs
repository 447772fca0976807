use forcecue_core::TrialSample;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::DatasetError;

/// The fixed catalog of recorded trials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TrialKey {
    #[serde(rename = "Surgeon_1_Trial_1")]
    Surgeon1Trial1,
    #[serde(rename = "Surgeon_1_Trial_2")]
    Surgeon1Trial2,
    #[serde(rename = "Surgeon_1_Trial_3")]
    Surgeon1Trial3,
    #[serde(rename = "Surgeon_1_Trial_4")]
    Surgeon1Trial4,
    #[serde(rename = "Surgeon_2_Trial_1")]
    Surgeon2Trial1,
    #[serde(rename = "Surgeon_2_Trial_2")]
    Surgeon2Trial2,
    #[serde(rename = "Surgeon_2_Trial_3")]
    Surgeon2Trial3,
}

impl TrialKey {
    pub const ALL: [TrialKey; 7] = [
        TrialKey::Surgeon1Trial1,
        TrialKey::Surgeon1Trial2,
        TrialKey::Surgeon1Trial3,
        TrialKey::Surgeon1Trial4,
        TrialKey::Surgeon2Trial1,
        TrialKey::Surgeon2Trial2,
        TrialKey::Surgeon2Trial3,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrialKey::Surgeon1Trial1 => "Surgeon_1_Trial_1",
            TrialKey::Surgeon1Trial2 => "Surgeon_1_Trial_2",
            TrialKey::Surgeon1Trial3 => "Surgeon_1_Trial_3",
            TrialKey::Surgeon1Trial4 => "Surgeon_1_Trial_4",
            TrialKey::Surgeon2Trial1 => "Surgeon_2_Trial_1",
            TrialKey::Surgeon2Trial2 => "Surgeon_2_Trial_2",
            TrialKey::Surgeon2Trial3 => "Surgeon_2_Trial_3",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            TrialKey::Surgeon1Trial1 => "S1_T1.json",
            TrialKey::Surgeon1Trial2 => "S1_T2.json",
            TrialKey::Surgeon1Trial3 => "S1_T3.json",
            TrialKey::Surgeon1Trial4 => "S1_T4.json",
            TrialKey::Surgeon2Trial1 => "S2_T1.json",
            TrialKey::Surgeon2Trial2 => "S2_T2.json",
            TrialKey::Surgeon2Trial3 => "S2_T3.json",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|k| k == self).unwrap_or(0)
    }
}

impl fmt::Display for TrialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrialKey {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| DatasetError::Unknown(s.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct Dataset {
    pub key: TrialKey,
    pub samples: Arc<[TrialSample]>,
}

impl Dataset {
    /// Timestamp of the final sample; playback ends once elapsed time passes it.
    pub fn end_time(&self) -> f64 {
        self.samples.last().map_or(0.0, |s| s.time)
    }

    pub fn peak_force(&self) -> f64 {
        self.samples.iter().map(|s| s.force).fold(0.0, f64::max)
    }
}

/// Trial samples by key. Keys whose file was absent have no entry.
#[derive(Debug, Clone, Default)]
pub struct DatasetRegistry {
    datasets: BTreeMap<TrialKey, Arc<[TrialSample]>>,
}

impl DatasetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads every catalog file present in `dir`. Absent files are logged and
    /// left out; a file that exists but does not parse fails the load.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let dir = dir.as_ref();
        let mut registry = Self::new();
        for key in TrialKey::ALL {
            let path = dir.join(key.file_name());
            let raw = match std::fs::read(&path) {
                Ok(raw) => raw,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    tracing::warn!(dataset = %key, path = %path.display(), "trial file not found");
                    continue;
                }
                Err(source) => return Err(DatasetError::Io { path, source }),
            };
            let samples: Vec<TrialSample> = serde_json::from_slice(&raw)
                .map_err(|source| DatasetError::Parse {
                    path: path.clone(),
                    source,
                })?;
            tracing::info!(dataset = %key, samples = samples.len(), "loaded trial");
            registry.insert(key, samples);
        }
        Ok(registry)
    }

    pub fn insert(&mut self, key: TrialKey, samples: Vec<TrialSample>) {
        self.datasets.insert(key, samples.into());
    }

    pub fn with(mut self, key: TrialKey, samples: Vec<TrialSample>) -> Self {
        self.insert(key, samples);
        self
    }

    pub fn get(&self, key: TrialKey) -> Result<Dataset, DatasetError> {
        let samples = self
            .datasets
            .get(&key)
            .ok_or(DatasetError::Missing(key))?;
        if samples.is_empty() {
            return Err(DatasetError::Empty(key));
        }
        Ok(Dataset {
            key,
            samples: Arc::clone(samples),
        })
    }

    pub fn resolve(&self, key: &str) -> Result<Dataset, DatasetError> {
        self.get(key.parse()?)
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forcecue_core::Label;

    #[test]
    fn keys_round_trip_through_strings() {
        for key in TrialKey::ALL {
            assert_eq!(key.as_str().parse::<TrialKey>().unwrap(), key);
        }
        assert!(matches!(
            "Surgeon_3_Trial_1".parse::<TrialKey>(),
            Err(DatasetError::Unknown(_))
        ));
    }

    #[test]
    fn empty_and_missing_are_distinct_errors() {
        let registry = DatasetRegistry::new().with(TrialKey::Surgeon1Trial2, Vec::new());
        assert!(matches!(
            registry.get(TrialKey::Surgeon1Trial2),
            Err(DatasetError::Empty(TrialKey::Surgeon1Trial2))
        ));
        assert!(matches!(
            registry.get(TrialKey::Surgeon1Trial1),
            Err(DatasetError::Missing(TrialKey::Surgeon1Trial1))
        ));
    }

    #[test]
    fn loads_catalog_files_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("S1_T1.json"),
            r#"[{"Time":0,"Force":0.01,"label":""},{"Time":0.5,"Force":0.081,"label":"red"}]"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("S2_T3.json"), "[]").unwrap();

        let registry = DatasetRegistry::load_dir(dir.path()).unwrap();
        let trial = registry.resolve("Surgeon_1_Trial_1").unwrap();
        assert_eq!(trial.samples.len(), 2);
        assert_eq!(trial.samples[1].label, Label::Red);
        assert_eq!(trial.end_time(), 0.5);
        assert_eq!(trial.peak_force(), 0.081);

        assert!(matches!(
            registry.get(TrialKey::Surgeon2Trial3),
            Err(DatasetError::Empty(_))
        ));
        assert!(matches!(
            registry.get(TrialKey::Surgeon1Trial4),
            Err(DatasetError::Missing(_))
        ));
    }

    #[test]
    fn malformed_file_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("S1_T2.json"), r#"{"Time": 1}"#).unwrap();
        assert!(matches!(
            DatasetRegistry::load_dir(dir.path()),
            Err(DatasetError::Parse { .. })
        ));
    }
}
