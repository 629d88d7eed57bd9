//! Session runner state machine
//!
//! Owns all mutable per-session state: current phase, score counters, the
//! per-question countdown and the transient result overlay. The plan it
//! consumes is immutable; restarting a session means building a new plan
//! from a new seed and mounting a fresh `Session`.
//!
//! Timing is host-driven: the shell calls [`Session::tick`] once per second
//! and schedules [`Session::dismiss_overlay`] after the delay reported in
//! [`AnswerFeedback`]. Both are guarded so callbacks scheduled for an
//! earlier question are no-ops by the time they fire.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::{ContentKind, QuizConfig};
use crate::consts::{OVERLAY_CORRECT_MS, OVERLAY_INCORRECT_MS};
use crate::country::Country;

use super::plan::SessionPlan;

/// Monotonic instance id; a token minted by one session must never act on
/// the session mounted after a restart
static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(0);

/// Where the session is in its strictly-forward lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Plan built, start button not pressed yet
    NotStarted,
    /// Question at this index is on screen
    Active(usize),
    /// All questions presented (or one-shot mode ended the run early)
    Finished,
}

/// Cancellation token for a scheduled overlay dismissal. Tokens from an
/// earlier overlay are stale once a new overlay is shown, and tokens from a
/// torn-down session never match its replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DismissToken {
    session_id: u64,
    serial: u64,
}

/// Transient result overlay contents. The correct entity is carried here
/// because after a timeout there is no clicked choice to display.
#[derive(Debug, Clone)]
pub struct Overlay {
    pub correct: bool,
    pub answer: Country,
}

/// Returned from every answer/timeout so the shell can render the overlay
/// and schedule its dismissal
#[derive(Debug, Clone)]
pub struct AnswerFeedback {
    pub correct: bool,
    /// The entity that was the right answer
    pub answer: Country,
    pub dismiss: DismissToken,
    /// Correct answers dismiss faster than incorrect ones
    pub dismiss_after_ms: u32,
}

/// One quiz session in flight
pub struct Session {
    id: u64,
    plan: SessionPlan,
    config: QuizConfig,
    phase: Phase,
    correct_count: u32,
    incorrect_count: u32,
    /// Seconds left on the active question; `None` when untimed
    time_left: Option<u32>,
    overlay: Option<Overlay>,
    /// Bumped on every overlay show; stale dismiss tokens compare unequal
    overlay_serial: u64,
    on_restart: Option<Box<dyn FnMut()>>,
}

impl Session {
    pub fn new(plan: SessionPlan, config: QuizConfig) -> Self {
        Self {
            id: NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed),
            plan,
            config,
            phase: Phase::NotStarted,
            correct_count: 0,
            incorrect_count: 0,
            time_left: None,
            overlay: None,
            overlay_serial: 0,
            on_restart: None,
        }
    }

    /// Hook invoked by `restart()`; the collaborator is expected to build a
    /// new seed/config and remount the engine
    pub fn set_restart_hook(&mut self, hook: impl FnMut() + 'static) {
        self.on_restart = Some(Box::new(hook));
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    /// Total questions in the plan
    pub fn len(&self) -> usize {
        self.plan.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plan.is_empty()
    }

    /// `(correct, incorrect)` counters
    pub fn score(&self) -> (u32, u32) {
        (self.correct_count, self.incorrect_count)
    }

    /// Questions answered or timed out so far
    pub fn presented(&self) -> u32 {
        self.correct_count + self.incorrect_count
    }

    pub fn current_question(&self) -> Option<&Country> {
        match self.phase {
            Phase::Active(i) => self.plan.questions.get(i),
            _ => None,
        }
    }

    pub fn current_choices(&self) -> Option<&[Country]> {
        match self.phase {
            Phase::Active(i) => self.plan.choices.get(i).map(Vec::as_slice),
            _ => None,
        }
    }

    pub fn time_left(&self) -> Option<u32> {
        self.time_left
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    /// NotStarted -> Active(0), arming the countdown. A zero-question plan
    /// finishes immediately with a 0/0 score.
    pub fn start(&mut self) {
        if self.phase != Phase::NotStarted {
            return;
        }
        if self.plan.is_empty() {
            self.phase = Phase::Finished;
            return;
        }
        self.phase = Phase::Active(0);
        self.time_left = self.config.time_limit;
    }

    /// Submit the choice identified by `code` for the active question.
    /// Returns `None` outside `Active` (including for a click racing a
    /// timeout that already advanced the index).
    pub fn submit_answer(&mut self, code: &str) -> Option<AnswerFeedback> {
        let index = match self.phase {
            Phase::Active(i) => i,
            _ => return None,
        };
        let correct = self.plan.questions[index].code == code;
        Some(self.record_result(index, correct))
    }

    /// One-second countdown tick. No-op unless the session is timed and a
    /// question is active; hitting zero is exactly a wrong answer with no
    /// chosen entity.
    pub fn tick(&mut self) -> Option<AnswerFeedback> {
        let index = match self.phase {
            Phase::Active(i) => i,
            _ => return None,
        };
        let remaining = self.time_left?.checked_sub(1)?;
        self.time_left = Some(remaining);
        if remaining > 0 {
            return None;
        }
        Some(self.record_result(index, false))
    }

    /// Hide the overlay, unless `token` belongs to an overlay that has
    /// already been replaced or to a previous session. Returns whether
    /// anything was hidden.
    pub fn dismiss_overlay(&mut self, token: DismissToken) -> bool {
        if self.overlay.is_some()
            && token.session_id == self.id
            && token.serial == self.overlay_serial
        {
            self.overlay = None;
            true
        } else {
            false
        }
    }

    /// Valid in `Finished` only: fire the external new-session hook.
    /// Returns whether the hook ran.
    pub fn restart(&mut self) -> bool {
        if self.phase != Phase::Finished {
            return false;
        }
        if let Some(hook) = self.on_restart.as_mut() {
            hook();
            true
        } else {
            false
        }
    }

    /// Entities whose flag images should be fetched ahead of the next index
    /// change. Empty unless a content kind is `Flag`; pure query with no
    /// effect on the state machine.
    pub fn prefetch_targets(&self) -> Vec<&Country> {
        let upcoming = match self.phase {
            // The first question's assets are fetched before start is pressed
            Phase::NotStarted => 0,
            Phase::Active(i) => i + 1,
            Phase::Finished => return Vec::new(),
        };

        let mut targets = Vec::new();
        if self.config.question_kind == ContentKind::Flag {
            if let Some(q) = self.plan.questions.get(upcoming) {
                targets.push(q);
            }
        }
        if self.config.choice_kind == ContentKind::Flag {
            if let Some(set) = self.plan.choices.get(upcoming) {
                targets.extend(set.iter());
            }
        }
        targets
    }

    /// Count the result for `questions[index]`, show the overlay and advance.
    /// Shared by answers and timeouts so both follow the same one-shot rule.
    fn record_result(&mut self, index: usize, correct: bool) -> AnswerFeedback {
        if correct {
            self.correct_count += 1;
        } else {
            self.incorrect_count += 1;
        }

        let answer = self.plan.questions[index].clone();
        self.overlay_serial += 1;
        self.overlay = Some(Overlay {
            correct,
            answer: answer.clone(),
        });

        if (self.config.one_shot && !correct) || index + 1 >= self.plan.len() {
            self.phase = Phase::Finished;
            self.time_left = None;
            log::info!(
                "session finished: {}/{} correct",
                self.correct_count,
                self.presented()
            );
        } else {
            self.phase = Phase::Active(index + 1);
            self.time_left = self.config.time_limit;
        }

        AnswerFeedback {
            correct,
            answer,
            dismiss: DismissToken {
                session_id: self.id,
                serial: self.overlay_serial,
            },
            dismiss_after_ms: if correct {
                OVERLAY_CORRECT_MS
            } else {
                OVERLAY_INCORRECT_MS
            },
        }
    }
}
