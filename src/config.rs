//! Session configuration and query-string parsing
//!
//! The launcher form encodes its settings as URL query parameters; this is
//! the validation/defaulting boundary. Everything downstream of
//! [`QuizConfig::from_query`] assumes sane numeric values and never
//! re-validates.

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_QUESTION_COUNT;
use crate::country::{Country, REGIONS, filter_pool};

/// What a question prompt or an answer choice displays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ContentKind {
    #[default]
    Name,
    Capital,
    Domain,
    Flag,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Name => "name",
            ContentKind::Capital => "capital",
            ContentKind::Domain => "domain",
            ContentKind::Flag => "flag",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "name" => Some(ContentKind::Name),
            "capital" => Some(ContentKind::Capital),
            "domain" => Some(ContentKind::Domain),
            "flag" => Some(ContentKind::Flag),
            _ => None,
        }
    }

    /// Display label for the launcher and result views
    pub fn label(&self) -> &'static str {
        match self {
            ContentKind::Name => "Country name",
            ContentKind::Capital => "Capital",
            ContentKind::Domain => "Domain",
            ContentKind::Flag => "Flag",
        }
    }
}

/// A launcher rule preset (question count + per-question time limit)
#[derive(Debug, Clone, Copy)]
pub struct RulePreset {
    pub id: &'static str,
    pub label: &'static str,
    pub count: usize,
    pub time_limit: u32,
}

/// Presets offered by the launcher; "custom" lets the player type their own
pub const RULE_PRESETS: [RulePreset; 3] = [
    RulePreset { id: "casual", label: "Casual", count: 5, time_limit: 15 },
    RulePreset { id: "standard", label: "Standard", count: 10, time_limit: 10 },
    RulePreset { id: "hardcore", label: "Hardcore", count: 20, time_limit: 5 },
];

/// Validated per-session configuration. Immutable once built; a restart
/// constructs a fresh one with a new seed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizConfig {
    pub question_kind: ContentKind,
    pub choice_kind: ContentKind,
    /// Region id filter; `None` means all regions
    pub region: Option<String>,
    /// Effective question count, already capped to the filtered pool size
    pub count: usize,
    /// End the session on the first incorrect answer
    pub one_shot: bool,
    /// Per-question countdown in seconds; `None` means untimed
    pub time_limit: Option<u32>,
    /// Seed for all shuffling in the session
    pub seed: u64,
}

impl QuizConfig {
    /// Build a config from query parameters, and return the filtered pool
    /// the session should draw from.
    ///
    /// Defaulting rules: missing/unparseable count -> 10, `count=all` ->
    /// pool size; missing/unparseable/zero time limit -> untimed;
    /// `oneShotMode=on` -> true, anything else -> false; unrecognized
    /// content kinds fall back to the launcher defaults (name question,
    /// flag choices); an area outside [`REGIONS`] means all regions.
    pub fn from_query<F>(get: F, countries: &[Country], seed: u64) -> (Self, Vec<Country>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let question_kind = get("question")
            .and_then(|s| ContentKind::from_str(&s))
            .unwrap_or(ContentKind::Name);
        let choice_kind = get("choice")
            .and_then(|s| ContentKind::from_str(&s))
            .unwrap_or(ContentKind::Flag);

        let region = get("area").filter(|a| REGIONS.contains(&a.as_str()));

        let pool = filter_pool(countries, region.as_deref(), question_kind, choice_kind);

        let count = parse_count(get("count").as_deref(), pool.len()).min(pool.len());
        let time_limit = parse_time_limit(get("timeLimit").as_deref());
        let one_shot = get("oneShotMode").as_deref() == Some("on");

        let config = QuizConfig {
            question_kind,
            choice_kind,
            region,
            count,
            one_shot,
            time_limit,
            seed,
        };
        (config, pool)
    }
}

/// Parse the `count` parameter; `all` is a sentinel for the whole pool
fn parse_count(raw: Option<&str>, pool_len: usize) -> usize {
    match raw {
        None => DEFAULT_QUESTION_COUNT,
        Some("all") => pool_len,
        Some(s) => s.parse().unwrap_or(DEFAULT_QUESTION_COUNT),
    }
}

/// Parse the `timeLimit` parameter; zero and garbage both mean untimed
fn parse_time_limit(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|s| s.parse::<u32>().ok()).filter(|&t| t > 0)
}
