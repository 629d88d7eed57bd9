//! Session plan builder
//!
//! Selects the ordered question list and one choice set per question, fully
//! reproducible from `(pool, count, seed)`. The per-question seeds are
//! offset from the base seed so distractor draws and on-screen choice order
//! stay decorrelated between questions.

use crate::consts::{CHOICE_SET_SIZE, DISTRACTOR_SEED_OFFSET};
use crate::country::Country;

use super::shuffle::seeded_shuffle;

/// Immutable question/choice lists for one session, keyed by seed.
/// Regenerating requires a new seed.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPlan {
    /// Question entities in presentation order; each is the correct answer
    /// for its own choice set
    pub questions: Vec<Country>,
    /// `choices[i]` is the display-ordered choice set for `questions[i]`
    pub choices: Vec<Vec<Country>>,
}

impl SessionPlan {
    /// Build a plan from an already-filtered pool. The effective question
    /// count is `min(count, pool.len())`; a tiny pool degrades choice sets
    /// below 4 members rather than failing.
    pub fn build(pool: &[Country], count: usize, seed: u64) -> Self {
        let mut questions = pool.to_vec();
        seeded_shuffle(&mut questions, seed);
        questions.truncate(count.min(pool.len()));

        let choices = questions
            .iter()
            .enumerate()
            .map(|(i, question)| {
                let i = i as u64;

                let mut distractors: Vec<Country> = pool
                    .iter()
                    .filter(|c| c.code != question.code)
                    .cloned()
                    .collect();
                seeded_shuffle(&mut distractors, seed + i + DISTRACTOR_SEED_OFFSET);
                distractors.truncate(CHOICE_SET_SIZE - 1);

                let mut set = Vec::with_capacity(CHOICE_SET_SIZE);
                set.push(question.clone());
                set.append(&mut distractors);
                // Separate seed so the correct answer's position carries no bias
                seeded_shuffle(&mut set, seed + i);
                set
            })
            .collect();

        Self { questions, choices }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pool(n: usize) -> Vec<Country> {
        (0..n)
            .map(|i| Country {
                code: format!("c{i:02}"),
                name: format!("Country {i}"),
                capital: format!("Capital {i}"),
                continent: vec!["asia".to_string()],
                tld: Some(format!(".x{i}")),
            })
            .collect()
    }

    #[test]
    fn test_build_is_deterministic() {
        let pool = pool(20);
        let a = SessionPlan::build(&pool, 10, 42);
        let b = SessionPlan::build(&pool, 10, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn test_count_caps_to_pool_size() {
        let pool = pool(5);
        let plan = SessionPlan::build(&pool, 10, 42);
        assert_eq!(plan.len(), 5);
        assert_eq!(plan.choices.len(), 5);
    }

    #[test]
    fn test_correct_answer_is_in_its_choice_set() {
        let pool = pool(20);
        let plan = SessionPlan::build(&pool, 20, 7);
        for (question, set) in plan.questions.iter().zip(&plan.choices) {
            assert_eq!(set.len(), 4);
            assert_eq!(set.iter().filter(|c| c.code == question.code).count(), 1);
        }
    }

    #[test]
    fn test_choice_sets_degrade_on_tiny_pool() {
        let pool = pool(3);
        let plan = SessionPlan::build(&pool, 3, 1);
        for (question, set) in plan.questions.iter().zip(&plan.choices) {
            assert_eq!(set.len(), 3);
            assert!(set.iter().any(|c| c.code == question.code));
        }
    }

    #[test]
    fn test_empty_pool_yields_empty_plan() {
        let plan = SessionPlan::build(&[], 10, 1);
        assert!(plan.is_empty());
        assert!(plan.choices.is_empty());
    }

    #[test]
    fn test_seed_varies_question_order() {
        let pool = pool(16);
        let reference = SessionPlan::build(&pool, 16, 0);
        let any_differs =
            (1u64..32).any(|seed| SessionPlan::build(&pool, 16, seed).questions != reference.questions);
        assert!(any_differs);
    }

    proptest! {
        #[test]
        fn prop_plan_invariants(pool_size in 0usize..24, count in 0usize..40, seed: u64) {
            let pool = pool(pool_size);
            let plan = SessionPlan::build(&pool, count, seed);

            // Coverage bound
            prop_assert_eq!(plan.len(), count.min(pool_size));
            prop_assert_eq!(plan.choices.len(), plan.len());

            // No repeated questions
            let mut codes: Vec<&str> = plan.questions.iter().map(|c| c.code.as_str()).collect();
            codes.sort_unstable();
            codes.dedup();
            prop_assert_eq!(codes.len(), plan.len());

            for (question, set) in plan.questions.iter().zip(&plan.choices) {
                // Choice sets hold 4 distinct members when the pool allows it
                prop_assert_eq!(set.len(), CHOICE_SET_SIZE.min(pool_size));
                let mut set_codes: Vec<&str> = set.iter().map(|c| c.code.as_str()).collect();
                set_codes.sort_unstable();
                set_codes.dedup();
                prop_assert_eq!(set_codes.len(), set.len());

                // The correct entity never repeats among its distractors
                prop_assert_eq!(set.iter().filter(|c| c.code == question.code).count(), 1);
            }
        }
    }
}
