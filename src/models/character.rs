//! Character model, requests and search types.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use super::kink::KinkFilter;

/// Genders accepted by create/update.
pub const GENDERS: [&str; 3] = ["male", "female", "other"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/types/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum CharacterStatus {
    #[default]
    Available,
    Busy,
    Away,
    Looking,
    Private,
}

impl CharacterStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CharacterStatus::Available => "available",
            CharacterStatus::Busy => "busy",
            CharacterStatus::Away => "away",
            CharacterStatus::Looking => "looking",
            CharacterStatus::Private => "private",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "available" => Some(CharacterStatus::Available),
            "busy" => Some(CharacterStatus::Busy),
            "away" => Some(CharacterStatus::Away),
            "looking" => Some(CharacterStatus::Looking),
            "private" => Some(CharacterStatus::Private),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/types/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum CharacterMood {
    Neutral,
    Flirty,
    Playful,
    Passionate,
    Dominant,
    Submissive,
    Shy,
    Confident,
    Curious,
    Seductive,
}

/// Full character profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/types/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub age: Option<String>,
    pub gender: String,
    pub species: String,
    pub height: Option<String>,
    pub body_type: Option<String>,
    pub personality: String,
    pub background: Option<String>,
    pub appearance: Option<String>,
    pub public: bool,
    pub views: u64,
    pub created_at: String,
    pub updated_at: String,
    pub current_status: CharacterStatus,
    pub current_mood: Option<CharacterMood>,
    pub custom_status: Option<String>,
    pub allow_random_rp: bool,
    pub private_details: Option<String>,
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "Record<string, unknown>"))]
    pub content_preferences: serde_json::Map<String, serde_json::Value>,
}

impl Character {
    /// Leading integer of the free-text age ("25", "25 years", "about 300").
    pub fn numeric_age(&self) -> Option<u32> {
        let age = self.age.as_deref()?;
        let digits: String = age
            .trim_start_matches(|c: char| !c.is_ascii_digit())
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        digits.parse().ok()
    }

    /// List projection with the primary image URL, if any.
    pub fn to_summary(&self, image: Option<String>) -> CharacterSummary {
        CharacterSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            species: self.species.clone(),
            gender: self.gender.clone(),
            age: self.age.clone(),
            current_status: self.current_status,
            image,
            updated_at: self.updated_at.clone(),
        }
    }
}

/// Character list item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/types/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSummary {
    pub id: String,
    pub name: String,
    pub species: String,
    pub gender: String,
    pub age: Option<String>,
    pub current_status: CharacterStatus,
    /// Primary image URL
    pub image: Option<String>,
    pub updated_at: String,
}

fn validate_gender(gender: &str) -> Result<(), ValidationError> {
    if GENDERS.contains(&gender) {
        Ok(())
    } else {
        Err(ValidationError::new("gender").with_message(Cow::Borrowed(
            "Gender must be one of: male, female, other.",
        )))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CharacterCreateRequest {
    #[validate(length(min = 2, max = 50, message = "Name must be between 2 and 50 characters."))]
    pub name: String,
    #[validate(length(
        min = 2,
        max = 50,
        message = "Species must be between 2 and 50 characters."
    ))]
    pub species: String,
    #[validate(custom(function = "validate_gender"))]
    pub gender: String,
    pub age: Option<String>,
    pub height: Option<String>,
    pub body_type: Option<String>,
    #[validate(length(
        min = 10,
        max = 200,
        message = "Personality must be between 10 and 200 characters."
    ))]
    pub personality: String,
    pub background: Option<String>,
    pub appearance: Option<String>,
    pub public: Option<bool>,
    pub current_status: Option<CharacterStatus>,
    pub current_mood: Option<CharacterMood>,
    pub custom_status: Option<String>,
    pub allow_random_rp: Option<bool>,
    pub private_details: Option<String>,
    pub content_preferences: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CharacterUpdateRequest {
    pub id: String,
    #[validate(length(min = 2, max = 50, message = "Name must be between 2 and 50 characters."))]
    pub name: Option<String>,
    #[validate(length(
        min = 2,
        max = 50,
        message = "Species must be between 2 and 50 characters."
    ))]
    pub species: Option<String>,
    #[validate(custom(function = "validate_gender"))]
    pub gender: Option<String>,
    pub age: Option<String>,
    pub height: Option<String>,
    pub body_type: Option<String>,
    #[validate(length(
        min = 10,
        max = 200,
        message = "Personality must be between 10 and 200 characters."
    ))]
    pub personality: Option<String>,
    pub background: Option<String>,
    pub appearance: Option<String>,
    pub public: Option<bool>,
    pub current_status: Option<CharacterStatus>,
    pub current_mood: Option<CharacterMood>,
    pub custom_status: Option<String>,
    pub allow_random_rp: Option<bool>,
    pub private_details: Option<String>,
    pub content_preferences: Option<serde_json::Map<String, serde_json::Value>>,
}

impl CharacterUpdateRequest {
    /// Merge present fields into `character`.
    pub fn apply_to(&self, character: &mut Character) {
        fn set<T: Clone>(slot: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *slot = v.clone();
            }
        }
        fn set_opt<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
            if value.is_some() {
                *slot = value.clone();
            }
        }

        set(&mut character.name, &self.name);
        set(&mut character.species, &self.species);
        set(&mut character.gender, &self.gender);
        set(&mut character.personality, &self.personality);
        set(&mut character.public, &self.public);
        set(&mut character.current_status, &self.current_status);
        set(&mut character.allow_random_rp, &self.allow_random_rp);
        set(&mut character.content_preferences, &self.content_preferences);
        set_opt(&mut character.age, &self.age);
        set_opt(&mut character.height, &self.height);
        set_opt(&mut character.body_type, &self.body_type);
        set_opt(&mut character.background, &self.background);
        set_opt(&mut character.appearance, &self.appearance);
        set_opt(&mut character.current_mood, &self.current_mood);
        set_opt(&mut character.custom_status, &self.custom_status);
        set_opt(&mut character.private_details, &self.private_details);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Newest,
    Updated,
    Popular,
    NameAsc,
    NameDesc,
}

impl SortOrder {
    /// `order_by` query value understood by the API.
    pub fn as_order_by(self) -> &'static str {
        match self {
            SortOrder::Newest => "-createdAt",
            SortOrder::Updated => "-updatedAt",
            SortOrder::Popular => "-views",
            SortOrder::NameAsc => "name",
            SortOrder::NameDesc => "-name",
        }
    }

    pub fn from_order_by(raw: &str) -> Option<Self> {
        match raw {
            "-createdAt" => Some(SortOrder::Newest),
            "-updatedAt" => Some(SortOrder::Updated),
            "-views" => Some(SortOrder::Popular),
            "name" => Some(SortOrder::NameAsc),
            "-name" => Some(SortOrder::NameDesc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AgeRange {
    pub min: Option<u32>,
    pub max: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CharacterSearchFilters {
    pub query: Option<String>,
    #[serde(default)]
    pub species: Vec<String>,
    #[serde(default)]
    pub gender: Vec<String>,
    pub age: Option<AgeRange>,
    #[serde(default)]
    pub status: Vec<CharacterStatus>,
    #[serde(default)]
    pub kinks: Vec<KinkFilter>,
    pub sort: Option<SortOrder>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/types/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSearchResponse {
    pub characters: Vec<CharacterSummary>,
    pub total: u32,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_age_takes_leading_number() {
        let mut c = crate::db::seed::characters().remove(0);
        c.age = Some("about 300 years".to_string());
        assert_eq!(c.numeric_age(), Some(300));
        c.age = Some("ageless".to_string());
        assert_eq!(c.numeric_age(), None);
        c.age = None;
        assert_eq!(c.numeric_age(), None);
    }

    #[test]
    fn test_sort_order_roundtrip_names() {
        for sort in [
            SortOrder::Newest,
            SortOrder::Updated,
            SortOrder::Popular,
            SortOrder::NameAsc,
            SortOrder::NameDesc,
        ] {
            assert_eq!(SortOrder::from_order_by(sort.as_order_by()), Some(sort));
        }
    }

    #[test]
    fn test_gender_validation_message() {
        let request = CharacterCreateRequest {
            name: "Aria".to_string(),
            species: "Elf".to_string(),
            gender: "unknown".to_string(),
            personality: "Curious and kind-hearted".to_string(),
            ..Default::default()
        };
        let errors = request.validate().unwrap_err();
        let field = errors.field_errors();
        let gender = field.get("gender").expect("gender error");
        assert_eq!(
            gender[0].message.as_deref(),
            Some("Gender must be one of: male, female, other.")
        );
    }

    #[test]
    fn test_update_merges_present_fields_only() {
        let mut c = crate::db::seed::characters().remove(0);
        let original_species = c.species.clone();
        let update = CharacterUpdateRequest {
            id: c.id.clone(),
            name: Some("Renamed".to_string()),
            current_status: Some(CharacterStatus::Busy),
            ..Default::default()
        };
        update.apply_to(&mut c);
        assert_eq!(c.name, "Renamed");
        assert_eq!(c.species, original_species);
        assert_eq!(c.current_status, CharacterStatus::Busy);
    }
}
