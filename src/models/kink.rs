//! Kink preference models.

use serde::{Deserialize, Serialize};
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A character's interest level in a preference tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/types/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum KinkRating {
    Fave,
    Yes,
    Maybe,
    No,
}

/// Rating of a catalog kink. Unique per (character_id, kink_id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/types/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct CharacterKink {
    pub id: String,
    pub character_id: String,
    pub kink_id: String,
    pub rating: KinkRating,
}

/// Character-defined preference outside the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CustomKink {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub character_id: String,
    #[validate(length(min = 2, max = 50, message = "Kink name must be between 2 and 50 characters."))]
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub rating: KinkRating,
}

/// One entry of a bulk rating replacement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KinkSelection {
    pub kink_id: String,
    pub rating: KinkRating,
}

/// Search filter: characters rating `id` with any of `rating`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KinkFilter {
    pub id: String,
    pub rating: Vec<KinkRating>,
}
