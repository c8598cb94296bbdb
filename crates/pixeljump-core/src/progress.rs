use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Persisted player progress.
///
/// Both fields are monotonically non-decreasing across saves: a save never
/// lowers either value relative to the stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressRecord {
    pub unlocked_level: u32,
    pub high_score: u32,
}

impl Default for ProgressRecord {
    fn default() -> Self {
        Self {
            unlocked_level: 1,
            high_score: 0,
        }
    }
}

/// Persisted settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sound_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
        }
    }
}

/// Monotonic merge: the stored record only ever moves forward.
pub fn merge_progress(current: ProgressRecord, patch: ProgressRecord) -> ProgressRecord {
    ProgressRecord {
        unlocked_level: current.unlocked_level.max(patch.unlocked_level),
        high_score: current.high_score.max(patch.high_score),
    }
}

/// Opaque key-value persistence consumed by the level core.
///
/// Implementations must never propagate storage failures to gameplay code;
/// malformed or unreadable data falls back to defaults.
pub trait ProgressStore {
    fn load_progress(&self) -> ProgressRecord;
    /// Merge `patch` into the stored record (monotonic) and return the result.
    fn save_progress(&mut self, patch: ProgressRecord) -> ProgressRecord;
    fn load_settings(&self) -> Settings;
    fn save_settings(&mut self, settings: Settings) -> Settings;
}

/// In-memory store; the default when no backing file is available and the
/// fallback when persistence fails.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    progress: Option<ProgressRecord>,
    settings: Option<Settings>,
}

impl ProgressStore for MemoryStore {
    fn load_progress(&self) -> ProgressRecord {
        self.progress.unwrap_or_default()
    }

    fn save_progress(&mut self, patch: ProgressRecord) -> ProgressRecord {
        let merged = merge_progress(self.load_progress(), patch);
        self.progress = Some(merged);
        merged
    }

    fn load_settings(&self) -> Settings {
        self.settings.unwrap_or_default()
    }

    fn save_settings(&mut self, settings: Settings) -> Settings {
        self.settings = Some(settings);
        settings
    }
}

/// File-backed store: one JSON document per key under a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn read<T: Default + for<'de> Deserialize<'de>>(&self, file: &str) -> T {
        let path = self.dir.join(file);
        match std::fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<T>(&text) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!("malformed {}: {e}, using defaults", path.display());
                    T::default()
                },
            },
            Err(_) => T::default(),
        }
    }

    fn write<T: Serialize>(&self, file: &str, value: &T) {
        let path = self.dir.join(file);
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("failed to serialize {}: {e}", path.display());
                return;
            },
        };
        if let Err(e) = std::fs::create_dir_all(&self.dir) {
            tracing::warn!("failed to create {}: {e}", self.dir.display());
            return;
        }
        if let Err(e) = std::fs::write(&path, json) {
            tracing::warn!("failed to write {}: {e}", path.display());
        }
    }
}

const PROGRESS_FILE: &str = "progress.json";
const SETTINGS_FILE: &str = "settings.json";

impl ProgressStore for JsonFileStore {
    fn load_progress(&self) -> ProgressRecord {
        self.read(PROGRESS_FILE)
    }

    fn save_progress(&mut self, patch: ProgressRecord) -> ProgressRecord {
        let merged = merge_progress(self.load_progress(), patch);
        self.write(PROGRESS_FILE, &merged);
        merged
    }

    fn load_settings(&self) -> Settings {
        self.read(SETTINGS_FILE)
    }

    fn save_settings(&mut self, settings: Settings) -> Settings {
        self.write(SETTINGS_FILE, &settings);
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_start_at_level_one() {
        let store = MemoryStore::default();
        assert_eq!(store.load_progress(), ProgressRecord::default());
        assert_eq!(store.load_progress().unlocked_level, 1);
        assert!(store.load_settings().sound_enabled);
    }

    #[test]
    fn save_is_monotonic() {
        let mut store = MemoryStore::default();
        store.save_progress(ProgressRecord {
            unlocked_level: 3,
            high_score: 500,
        });
        // A later save with lower values must not regress the record.
        let after = store.save_progress(ProgressRecord {
            unlocked_level: 2,
            high_score: 100,
        });
        assert_eq!(after.unlocked_level, 3);
        assert_eq!(after.high_score, 500);
    }

    #[test]
    fn save_advances_each_field_independently() {
        let mut store = MemoryStore::default();
        store.save_progress(ProgressRecord {
            unlocked_level: 2,
            high_score: 100,
        });
        let after = store.save_progress(ProgressRecord {
            unlocked_level: 1,
            high_score: 250,
        });
        assert_eq!(after.unlocked_level, 2);
        assert_eq!(after.high_score, 250);
    }

    #[test]
    fn settings_roundtrip_in_memory() {
        let mut store = MemoryStore::default();
        store.save_settings(Settings {
            sound_enabled: false,
        });
        assert!(!store.load_settings().sound_enabled);
    }

    #[test]
    fn malformed_progress_json_falls_back_to_defaults() {
        let json = r#"{"unlocked_level": "three"}"#;
        let parsed = serde_json::from_str::<ProgressRecord>(json);
        assert!(parsed.is_err());
        // The file store maps this parse failure to defaults.
        let dir = std::env::temp_dir().join("pixeljump-progress-test");
        let _ = std::fs::create_dir_all(&dir);
        std::fs::write(dir.join("progress.json"), json).unwrap();
        let store = JsonFileStore::new(&dir);
        assert_eq!(store.load_progress(), ProgressRecord::default());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn partial_progress_json_keeps_defaults_for_missing_fields() {
        let record: ProgressRecord = serde_json::from_str(r#"{"high_score": 40}"#).unwrap();
        assert_eq!(record.unlocked_level, 1);
        assert_eq!(record.high_score, 40);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn sequential_saves_never_regress(
                saves in proptest::collection::vec((0u32..10, 0u32..10_000), 1..20)
            ) {
                let mut store = MemoryStore::default();
                let mut prev = store.load_progress();
                for (level, score) in saves {
                    let after = store.save_progress(ProgressRecord {
                        unlocked_level: level,
                        high_score: score,
                    });
                    prop_assert!(after.unlocked_level >= prev.unlocked_level);
                    prop_assert!(after.high_score >= prev.high_score);
                    prev = after;
                }
            }
        }
    }
}
