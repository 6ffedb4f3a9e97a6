use serde::{Deserialize, Serialize};

pub const MANIFEST_VERSION: &str = "1.0";

/// Asset manifest bundled with the app.
///
/// Describes where the country dataset is fetched from and which image
/// assets the renderer may upload. Every texture path is optional; a
/// missing asset degrades visuals, never behavior.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SceneManifest {
    pub version: String,
    pub name: Option<String>,
    pub dataset: DatasetEntry,
    #[serde(default)]
    pub textures: TextureSet,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatasetEntry {
    /// Fetched once at scene initialization.
    pub url: String,
    /// Property key holding each feature's display name.
    pub name_property: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TextureSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub night: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bump: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specular: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clouds: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starfield: Option<String>,
}

impl SceneManifest {
    pub fn from_json_str(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }
}
