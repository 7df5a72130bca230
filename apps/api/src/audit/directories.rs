//! Static catalog of citation directories audited for every location.
//! Changing this list is a deployment-time change, not runtime state.

use serde::Serialize;

/// One directory in the audit checklist. Priority tiers run 1 (essential)
/// through 3 (long tail).
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Directory {
    pub name: &'static str,
    pub url: &'static str,
    pub priority: u8,
}

const fn directory(name: &'static str, url: &'static str, priority: u8) -> Directory {
    Directory {
        name,
        url,
        priority,
    }
}

/// Common citation directories for local businesses, in checklist order.
pub const CITATION_DIRECTORIES: &[Directory] = &[
    directory("Google Business Profile", "https://business.google.com", 1),
    directory("Yelp", "https://yelp.com", 1),
    directory("Facebook Business", "https://facebook.com/business", 1),
    directory("Apple Maps", "https://mapsconnect.apple.com", 1),
    directory("Bing Places", "https://bingplaces.com", 2),
    directory("Yellow Pages", "https://yellowpages.com", 2),
    directory("BBB", "https://bbb.org", 2),
    directory("Angi", "https://angi.com", 2),
    directory("HomeAdvisor", "https://homeadvisor.com", 2),
    directory("Thumbtack", "https://thumbtack.com", 2),
    directory("Nextdoor", "https://nextdoor.com", 2),
    directory("MapQuest", "https://mapquest.com", 3),
    directory("Foursquare", "https://foursquare.com", 3),
    directory("Manta", "https://manta.com", 3),
    directory("Superpages", "https://superpages.com", 3),
];

/// Names of the tier-1 directories — a missing listing on any of these is
/// flagged as critical.
pub fn priority_directory_names() -> Vec<&'static str> {
    CITATION_DIRECTORIES
        .iter()
        .filter(|d| d.priority == 1)
        .map(|d| d.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_has_fifteen_directories() {
        assert_eq!(CITATION_DIRECTORIES.len(), 15);
    }

    #[test]
    fn test_directory_names_are_unique() {
        let names: HashSet<&str> = CITATION_DIRECTORIES.iter().map(|d| d.name).collect();
        assert_eq!(names.len(), CITATION_DIRECTORIES.len());
    }

    #[test]
    fn test_priorities_are_within_tiers() {
        assert!(CITATION_DIRECTORIES
            .iter()
            .all(|d| (1..=3).contains(&d.priority)));
    }

    #[test]
    fn test_priority_directories_are_tier_one() {
        let names = priority_directory_names();
        assert_eq!(
            names,
            vec![
                "Google Business Profile",
                "Yelp",
                "Facebook Business",
                "Apple Maps"
            ]
        );
    }
}
