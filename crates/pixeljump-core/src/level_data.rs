use serde::{Deserialize, Serialize};

use crate::error::LevelError;

/// Object kinds recognized in a level's object layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Ground,
    Hazard,
    Goal,
    Spawn,
}

/// One typed rectangle from the declarative object layer.
///
/// `y` is the rectangle's bottom edge (tile objects anchor bottom-left),
/// so a ground surface's top sits at `y - height`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelObject {
    #[serde(rename = "type")]
    pub kind: ObjectKind,
    pub x: f32,
    pub y: f32,
    #[serde(default = "default_extent")]
    pub width: f32,
    #[serde(default = "default_extent")]
    pub height: f32,
}

fn default_extent() -> f32 {
    16.0
}

/// A named object layer within a level map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectLayer {
    pub name: String,
    #[serde(default)]
    pub objects: Vec<LevelObject>,
}

/// A loaded level map: a flat list of object layers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelMap {
    #[serde(default)]
    pub layers: Vec<ObjectLayer>,
}

/// Name of the object layer level geometry is read from.
pub const OBJECTS_LAYER: &str = "Objects";

impl LevelMap {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The "Objects" layer, or a content error when it is absent.
    pub fn object_layer(&self) -> Result<&ObjectLayer, LevelError> {
        self.layers
            .iter()
            .find(|l| l.name == OBJECTS_LAYER)
            .ok_or(LevelError::MissingObjectLayer(OBJECTS_LAYER))
    }
}
