//! Country dataset and pool filtering
//!
//! Countries are embedded at build time from `data/countries.json` and never
//! mutated; the session engine only ever sees filtered clones of this pool.

use serde::{Deserialize, Serialize};

use crate::config::ContentKind;

/// The fixed region ids used by the area filter
pub const REGIONS: [&str; 6] = [
    "asia",
    "europe",
    "africa",
    "north-america",
    "south-america",
    "oceania",
];

/// One quiz subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    /// ISO 3166-1 alpha-2 code, lowercase (also the flag image id)
    pub code: String,
    pub name: String,
    pub capital: String,
    /// Region tags; a country may span more than one
    pub continent: Vec<String>,
    /// Country-code TLD; absent for entities without an assigned one
    pub tld: Option<String>,
}

impl Country {
    /// Text shown for this country under the given content kind.
    /// `Flag` has no text; the shell renders the flag image instead.
    pub fn content_text(&self, kind: ContentKind) -> Option<&str> {
        match kind {
            ContentKind::Name => Some(&self.name),
            ContentKind::Capital => Some(&self.capital),
            ContentKind::Domain => self.tld.as_deref(),
            ContentKind::Flag => None,
        }
    }

    /// Whether this country carries the given region tag
    pub fn in_region(&self, region: &str) -> bool {
        self.continent.iter().any(|r| r == region)
    }
}

/// Embedded dataset JSON
const COUNTRIES_JSON: &str = include_str!("../data/countries.json");

/// Load the embedded country dataset
pub fn load_countries() -> Result<Vec<Country>, serde_json::Error> {
    serde_json::from_str(COUNTRIES_JSON)
}

/// Filter the pool for a session: region filter first, then drop countries
/// without a domain when either content kind asks for one. May return an
/// empty pool; the session engine treats that as an immediately finished
/// session rather than an error.
pub fn filter_pool(
    countries: &[Country],
    region: Option<&str>,
    question_kind: ContentKind,
    choice_kind: ContentKind,
) -> Vec<Country> {
    let mut pool: Vec<Country> = match region {
        Some(r) if !r.is_empty() => countries
            .iter()
            .filter(|c| c.in_region(r))
            .cloned()
            .collect(),
        _ => countries.to_vec(),
    };

    if question_kind == ContentKind::Domain || choice_kind == ContentKind::Domain {
        pool.retain(|c| c.tld.is_some());
    }

    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    fn country(code: &str, regions: &[&str], tld: Option<&str>) -> Country {
        Country {
            code: code.to_string(),
            name: code.to_uppercase(),
            capital: format!("{code}-capital"),
            continent: regions.iter().map(|r| r.to_string()).collect(),
            tld: tld.map(|t| t.to_string()),
        }
    }

    #[test]
    fn test_dataset_loads_and_is_well_formed() {
        let countries = load_countries().expect("embedded dataset must parse");
        assert!(countries.len() >= 40);

        for c in &countries {
            assert_eq!(c.code.len(), 2, "bad code: {}", c.code);
            assert!(!c.name.is_empty());
            assert!(!c.capital.is_empty());
            assert!(!c.continent.is_empty(), "{} has no region", c.code);
            for r in &c.continent {
                assert!(REGIONS.contains(&r.as_str()), "unknown region {r}");
            }
            if let Some(tld) = &c.tld {
                assert!(tld.starts_with('.') && tld.len() == 3, "bad tld {tld}");
            }
        }

        // Codes are unique
        let mut codes: Vec<&str> = countries.iter().map(|c| c.code.as_str()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), countries.len());
    }

    #[test]
    fn test_region_filter() {
        let pool = vec![
            country("jp", &["asia"], Some(".jp")),
            country("fr", &["europe"], Some(".fr")),
            country("ru", &["asia", "europe"], Some(".ru")),
        ];

        let asia = filter_pool(&pool, Some("asia"), ContentKind::Name, ContentKind::Flag);
        let codes: Vec<&str> = asia.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, ["jp", "ru"]);

        // Empty region string means no filtering
        let all = filter_pool(&pool, Some(""), ContentKind::Name, ContentKind::Flag);
        assert_eq!(all.len(), 3);
        let all = filter_pool(&pool, None, ContentKind::Name, ContentKind::Flag);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_domain_kind_drops_countries_without_tld() {
        let pool = vec![
            country("jp", &["asia"], Some(".jp")),
            country("xk", &["europe"], None),
        ];

        // Either side asking for a domain excludes tld-less entries
        for (q, c) in [
            (ContentKind::Domain, ContentKind::Flag),
            (ContentKind::Name, ContentKind::Domain),
        ] {
            let filtered = filter_pool(&pool, None, q, c);
            assert_eq!(filtered.len(), 1);
            assert_eq!(filtered[0].code, "jp");
        }

        // No domain kind involved: everything stays
        let filtered = filter_pool(&pool, None, ContentKind::Name, ContentKind::Capital);
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_content_text() {
        let c = country("jp", &["asia"], Some(".jp"));
        assert_eq!(c.content_text(ContentKind::Name), Some("JP"));
        assert_eq!(c.content_text(ContentKind::Capital), Some("jp-capital"));
        assert_eq!(c.content_text(ContentKind::Domain), Some(".jp"));
        assert_eq!(c.content_text(ContentKind::Flag), None);

        let no_tld = country("xk", &["europe"], None);
        assert_eq!(no_tld.content_text(ContentKind::Domain), None);
    }
}
