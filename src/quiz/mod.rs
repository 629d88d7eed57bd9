//! Deterministic quiz session engine
//!
//! All session logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only, no hidden global randomness
//! - Question/choice lists are built once per seed and never mutated
//! - Timer and overlay callbacks are guarded by serial tokens so stale
//!   callbacks never mutate state
//! - No rendering or platform dependencies

pub mod plan;
pub mod session;
pub mod shuffle;

pub use plan::SessionPlan;
pub use session::{AnswerFeedback, DismissToken, Overlay, Phase, Session};
pub use shuffle::seeded_shuffle;
