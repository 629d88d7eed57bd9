//! Country Quiz - a multiple-choice country quiz game
//!
//! Core modules:
//! - `quiz`: Deterministic session engine (seeded question/choice generation,
//!   answer/timeout state machine, scoring)
//! - `country`: Country dataset and pool filtering
//! - `config`: Session configuration and query-string parsing

pub mod config;
pub mod country;
pub mod quiz;

pub use config::{ContentKind, QuizConfig};
pub use country::Country;

/// Game configuration constants
pub mod consts {
    /// Question count used when the launcher supplies none
    pub const DEFAULT_QUESTION_COUNT: usize = 10;
    /// Target choice-set size (correct answer + 3 distractors)
    pub const CHOICE_SET_SIZE: usize = 4;

    /// Seed offset decorrelating distractor draws from choice-order draws
    pub const DISTRACTOR_SEED_OFFSET: u64 = 1024;

    /// Countdown tick interval (ms)
    pub const TICK_INTERVAL_MS: u32 = 1000;
    /// Countdown value at or below which the HUD shows urgency
    pub const TIME_URGENT_SECS: u32 = 3;

    /// Result overlay auto-dismiss delay after a correct answer (ms)
    pub const OVERLAY_CORRECT_MS: u32 = 400;
    /// Result overlay auto-dismiss delay after an incorrect answer (ms)
    pub const OVERLAY_INCORRECT_MS: u32 = 1500;

    /// Flag image CDN
    pub const FLAG_CDN_BASE: &str = "https://flagcdn.com";
}

/// URL of the flag image for a country code
#[inline]
pub fn flag_url(code: &str) -> String {
    format!("{}/{}.svg", consts::FLAG_CDN_BASE, code)
}
