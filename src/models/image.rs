//! Character image models.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// One image in a character's gallery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/types/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct CharacterImage {
    pub id: String,
    pub character_id: String,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_primary: bool,
    pub order: u32,
    pub uploaded_at: String,
    pub file_type: Option<String>,
    pub file_size: Option<u64>,
}

/// Upload payload. `data` travels base64-encoded on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUploadRequest {
    #[serde(default)]
    pub character_id: String,
    pub file_type: String,
    pub data: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_primary: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUpdateRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub character_id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_primary: Option<bool>,
    pub order: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderImagesRequest {
    pub character_id: String,
    /// New order of image IDs
    pub image_ids: Vec<String>,
}
