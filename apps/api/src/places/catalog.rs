//! Static catalog of point-of-interest queries run on every landmark refresh.
//! Catalog order defines query order and deduplication precedence.

use serde::{Deserialize, Serialize};

/// Semantic grouping for a cached landmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Education,
    Recreation,
    Culture,
    Shopping,
    Dining,
    Healthcare,
    Worship,
    Fitness,
    Sports,
    Government,
    Services,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Education => "education",
            Category::Recreation => "recreation",
            Category::Culture => "culture",
            Category::Shopping => "shopping",
            Category::Dining => "dining",
            Category::Healthcare => "healthcare",
            Category::Worship => "worship",
            Category::Fitness => "fitness",
            Category::Sports => "sports",
            Category::Government => "government",
            Category::Services => "services",
        }
    }
}

/// One nearby-search query: the provider place type plus the category tag
/// stamped onto its results.
#[derive(Debug, Clone, Copy)]
pub struct PlaceTypeQuery {
    pub place_type: &'static str,
    pub category: Category,
}

const fn query(place_type: &'static str, category: Category) -> PlaceTypeQuery {
    PlaceTypeQuery {
        place_type,
        category,
    }
}

/// Place types fetched for local SEO content.
pub const PLACE_TYPES: &[PlaceTypeQuery] = &[
    query("school", Category::Education),
    query("park", Category::Recreation),
    query("museum", Category::Culture),
    query("library", Category::Education),
    query("shopping_mall", Category::Shopping),
    query("restaurant", Category::Dining),
    query("hospital", Category::Healthcare),
    query("church", Category::Worship),
    query("gym", Category::Fitness),
    query("stadium", Category::Sports),
    query("university", Category::Education),
    query("city_hall", Category::Government),
    query("post_office", Category::Services),
    query("fire_station", Category::Services),
    query("police", Category::Services),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_has_fifteen_queries() {
        assert_eq!(PLACE_TYPES.len(), 15);
    }

    #[test]
    fn test_place_types_are_unique() {
        let distinct: HashSet<&str> = PLACE_TYPES.iter().map(|q| q.place_type).collect();
        assert_eq!(distinct.len(), PLACE_TYPES.len());
    }

    #[test]
    fn test_category_round_trips_through_serde() {
        let json = serde_json::to_string(&Category::Worship).unwrap();
        assert_eq!(json, "\"worship\"");
        let back: Category = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Category::Worship);
    }
}
