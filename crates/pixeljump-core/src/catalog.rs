use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::LevelError;

/// Catalog entry: a named level and the map file it resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelMeta {
    pub id: u32,
    pub name: String,
    pub map: String,
}

/// The ordered list of playable levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCatalog {
    pub levels: Vec<LevelMeta>,
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self {
            levels: (1..=3)
                .map(|id| LevelMeta {
                    id,
                    name: format!("Level {id}"),
                    map: format!("level{id}.json"),
                })
                .collect(),
        }
    }
}

impl LevelCatalog {
    /// Parse a catalog document. Falls back to the built-in catalog on
    /// malformed data so a broken file never blocks the menu.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<LevelCatalog>(json) {
            Ok(catalog) if !catalog.levels.is_empty() => catalog,
            Ok(_) => {
                tracing::warn!("level catalog is empty, using built-in catalog");
                Self::default()
            },
            Err(e) => {
                tracing::warn!("failed to parse level catalog: {e}, using built-in catalog");
                Self::default()
            },
        }
    }

    pub fn resolve(&self, level_id: u32) -> Result<&LevelMeta, LevelError> {
        self.levels
            .iter()
            .find(|m| m.id == level_id)
            .ok_or(LevelError::UnknownLevel(level_id))
    }

    pub fn max_level(&self) -> u32 {
        self.levels.iter().map(|m| m.id).max().unwrap_or(1)
    }
}

/// The set of texture keys the host has loaded. Theme resolution degrades
/// gracefully when a themed key is absent.
#[derive(Debug, Clone, Default)]
pub struct TextureSet(HashSet<String>);

impl TextureSet {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(keys.into_iter().map(Into::into).collect())
    }

    pub fn has(&self, key: &str) -> bool {
        self.0.contains(key)
    }
}

/// Texture keys for a level's theme after fallback resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeAssets {
    pub platform: String,
    pub stage: String,
    pub background: String,
}

/// Resolve themed texture keys for a level.
///
/// Preference order per slot: the level-specific key, the default key,
/// then any other themed key, so a missing asset never blanks the screen.
pub fn resolve_theme(level_id: u32, textures: &TextureSet) -> ThemeAssets {
    let platform_themed = match level_id {
        2 => Some("platform_snow"),
        3 => Some("platform_desert"),
        _ => None,
    };
    let stage_themed = match level_id {
        2 => Some("stage_snow"),
        3 => Some("stage_desert"),
        _ => None,
    };
    let background_themed = match level_id {
        2 => Some("level_bg_snow"),
        3 => Some("level_bg_desert"),
        _ => None,
    };
    ThemeAssets {
        platform: pick_texture(
            platform_themed,
            "platform",
            &["platform_snow", "platform_desert"],
            textures,
        ),
        stage: pick_texture(stage_themed, "stage", &[], textures),
        background: pick_texture(
            background_themed,
            "level_bg",
            &["level_bg_desert", "level_bg_snow"],
            textures,
        ),
    }
}

fn pick_texture(
    themed: Option<&str>,
    default: &str,
    alternates: &[&str],
    textures: &TextureSet,
) -> String {
    if let Some(key) = themed
        && textures.has(key)
    {
        return key.to_string();
    }
    if textures.has(default) {
        if themed.is_some() {
            tracing::warn!("themed texture {themed:?} missing, falling back to {default:?}");
        }
        return default.to_string();
    }
    for alt in alternates {
        if textures.has(alt) {
            tracing::warn!("texture {default:?} missing, falling back to {alt:?}");
            return alt.to_string();
        }
    }
    // Nothing is loaded; return the preferred key and let the builder
    // skip stamping with a warning.
    themed.unwrap_or(default).to_string()
}
