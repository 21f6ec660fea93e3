//! Character search: filtering, sorting and pagination.
//!
//! Runs against the mock store both for the façade fallback and for the
//! HTTP backend, and converts filters to and from API query parameters.

use crate::db::MockDb;
use crate::models::character::AgeRange;
use crate::models::{
    Character, CharacterSearchFilters, CharacterSearchResponse, CharacterStatus, KinkFilter,
    KinkRating, SortOrder,
};
use serde::Deserialize;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Search public characters in the store.
pub fn search_characters(db: &MockDb, filters: &CharacterSearchFilters) -> CharacterSearchResponse {
    let query = filters
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase);

    let mut matches: Vec<Character> = db
        .all_characters()
        .into_iter()
        .filter(|c| c.public)
        .filter(|c| {
            query.as_deref().map_or(true, |q| {
                c.name.to_lowercase().contains(q) || c.species.to_lowercase().contains(q)
            })
        })
        .filter(|c| {
            filters.species.is_empty()
                || filters.species.iter().any(|s| s.eq_ignore_ascii_case(&c.species))
        })
        .filter(|c| {
            filters.gender.is_empty()
                || filters.gender.iter().any(|g| g.eq_ignore_ascii_case(&c.gender))
        })
        .filter(|c| filters.status.is_empty() || filters.status.contains(&c.current_status))
        .filter(|c| filters.age.map_or(true, |range| age_in_range(c, range)))
        .filter(|c| {
            filters.kinks.iter().all(|kink| {
                db.kink_rating(&c.id, &kink.id)
                    .is_some_and(|rating| kink.rating.is_empty() || kink.rating.contains(&rating))
            })
        })
        .collect();

    sort_characters(&mut matches, filters.sort.unwrap_or_default());

    let limit = filters
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let page = filters.page.unwrap_or(1).max(1);
    let total = matches.len() as u32;
    let total_pages = total.div_ceil(limit);

    let characters = matches
        .iter()
        .skip((page - 1).saturating_mul(limit) as usize)
        .take(limit as usize)
        .map(|c| db.summarize(c))
        .collect();

    CharacterSearchResponse {
        characters,
        total,
        page,
        limit,
        total_pages,
    }
}

fn age_in_range(character: &Character, range: AgeRange) -> bool {
    match character.numeric_age() {
        Some(age) => range.min.map_or(true, |min| age >= min) && range.max.map_or(true, |max| age <= max),
        // Unknown age only passes an unbounded range.
        None => range.min.is_none() && range.max.is_none(),
    }
}

fn sort_characters(characters: &mut [Character], sort: SortOrder) {
    match sort {
        SortOrder::Newest => characters.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOrder::Updated => characters.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
        SortOrder::Popular => characters.sort_by(|a, b| b.views.cmp(&a.views)),
        SortOrder::NameAsc => characters.sort_by_key(|c| c.name.to_lowercase()),
        SortOrder::NameDesc => {
            characters.sort_by_key(|c| std::cmp::Reverse(c.name.to_lowercase()))
        }
    }
}

/// Encode filters as API query parameters.
pub fn query_params(filters: &CharacterSearchFilters) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();

    if let Some(query) = filters.query.as_deref().filter(|q| !q.is_empty()) {
        params.push(("search", query.to_string()));
    }
    if !filters.species.is_empty() {
        params.push(("species", filters.species.join(",")));
    }
    if !filters.gender.is_empty() {
        params.push(("gender", filters.gender.join(",")));
    }
    if !filters.status.is_empty() {
        let status: Vec<&str> = filters.status.iter().map(|s| s.as_str()).collect();
        params.push(("currentStatus", status.join(",")));
    }
    if let Some(range) = filters.age {
        if let Some(min) = range.min {
            params.push(("age_min", min.to_string()));
        }
        if let Some(max) = range.max {
            params.push(("age_max", max.to_string()));
        }
    }
    if !filters.kinks.is_empty() {
        params.push(("kinks", encode_kink_filters(&filters.kinks)));
    }

    params.push(("page", filters.page.unwrap_or(1).to_string()));
    params.push((
        "page_size",
        filters.limit.unwrap_or(DEFAULT_PAGE_SIZE).to_string(),
    ));
    if let Some(sort) = filters.sort {
        params.push(("order_by", sort.as_order_by().to_string()));
    }

    params
}

/// `romance:fave|yes,adventure:maybe`
fn encode_kink_filters(kinks: &[KinkFilter]) -> String {
    kinks
        .iter()
        .map(|k| {
            let ratings: Vec<&str> = k.rating.iter().map(|r| rating_str(*r)).collect();
            format!("{}:{}", k.id, ratings.join("|"))
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn rating_str(rating: KinkRating) -> &'static str {
    match rating {
        KinkRating::Fave => "fave",
        KinkRating::Yes => "yes",
        KinkRating::Maybe => "maybe",
        KinkRating::No => "no",
    }
}

fn parse_rating(raw: &str) -> Option<KinkRating> {
    match raw {
        "fave" => Some(KinkRating::Fave),
        "yes" => Some(KinkRating::Yes),
        "maybe" => Some(KinkRating::Maybe),
        "no" => Some(KinkRating::No),
        _ => None,
    }
}

/// Query parameters accepted by the search endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
    pub species: Option<String>,
    pub gender: Option<String>,
    #[serde(rename = "currentStatus")]
    pub current_status: Option<String>,
    pub age_min: Option<u32>,
    pub age_max: Option<u32>,
    pub kinks: Option<String>,
    pub order_by: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

impl SearchQuery {
    /// Decode into filters. Unknown status, rating or sort values are ignored.
    pub fn into_filters(self) -> CharacterSearchFilters {
        let age = (self.age_min.is_some() || self.age_max.is_some()).then_some(AgeRange {
            min: self.age_min,
            max: self.age_max,
        });

        let kinks = split_list(self.kinks.as_deref())
            .into_iter()
            .filter_map(|entry| {
                let (id, ratings) = entry.split_once(':').unwrap_or((entry.as_str(), ""));
                (!id.is_empty()).then(|| KinkFilter {
                    id: id.to_string(),
                    rating: ratings.split('|').filter_map(parse_rating).collect(),
                })
            })
            .collect();

        CharacterSearchFilters {
            query: self.search,
            species: split_list(self.species.as_deref()),
            gender: split_list(self.gender.as_deref()),
            age,
            status: split_list(self.current_status.as_deref())
                .iter()
                .filter_map(|s| CharacterStatus::parse(s))
                .collect(),
            kinks,
            sort: self.order_by.as_deref().and_then(SortOrder::from_order_by),
            page: self.page,
            limit: self.page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params_roundtrip_through_search_query() {
        let filters = CharacterSearchFilters {
            query: Some("elf".to_string()),
            species: vec!["Elf".to_string(), "Dwarf".to_string()],
            status: vec![CharacterStatus::Available, CharacterStatus::Busy],
            age: Some(AgeRange {
                min: Some(18),
                max: None,
            }),
            kinks: vec![KinkFilter {
                id: "romance".to_string(),
                rating: vec![KinkRating::Fave, KinkRating::Yes],
            }],
            sort: Some(SortOrder::Popular),
            page: Some(2),
            limit: Some(5),
            ..Default::default()
        };

        let params = query_params(&filters);
        let get = |key: &str| {
            params
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.clone())
        };
        let decoded = SearchQuery {
            search: get("search"),
            species: get("species"),
            gender: get("gender"),
            current_status: get("currentStatus"),
            age_min: get("age_min").and_then(|v| v.parse().ok()),
            age_max: get("age_max").and_then(|v| v.parse().ok()),
            kinks: get("kinks"),
            order_by: get("order_by"),
            page: get("page").and_then(|v| v.parse().ok()),
            page_size: get("page_size").and_then(|v| v.parse().ok()),
        }
        .into_filters();

        assert_eq!(decoded.species, filters.species);
        assert_eq!(decoded.status, filters.status);
        assert_eq!(decoded.age, filters.age);
        assert_eq!(decoded.kinks, filters.kinks);
        assert_eq!(decoded.sort, Some(SortOrder::Popular));
        assert_eq!(decoded.page, Some(2));
        assert_eq!(decoded.limit, Some(5));
    }

    #[test]
    fn test_unknown_age_fails_bounded_range() {
        let db = MockDb::seeded();
        let ignis = db.get_character("char_5").unwrap();
        assert!(!age_in_range(
            &ignis,
            AgeRange {
                min: Some(1),
                max: None
            }
        ));
        assert!(age_in_range(&ignis, AgeRange::default()));
    }
}
