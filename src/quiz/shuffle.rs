//! Seeded permutation primitive
//!
//! Every shuffle in a session runs through here with a seed derived from the
//! session seed, so identical seeds reproduce identical sessions across runs
//! and platforms. Pcg32 keeps the draw sequence stable everywhere.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;

/// Shuffle `items` in place, deterministically for a given seed
pub fn seeded_shuffle<T>(items: &mut [T], seed: u64) {
    let mut rng = Pcg32::seed_from_u64(seed);
    items.shuffle(&mut rng);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shuffled<T: Clone>(items: &[T], seed: u64) -> Vec<T> {
        let mut out = items.to_vec();
        seeded_shuffle(&mut out, seed);
        out
    }

    #[test]
    fn test_same_seed_same_order() {
        let items: Vec<u32> = (0..32).collect();
        assert_eq!(shuffled(&items, 42), shuffled(&items, 42));
        assert_eq!(shuffled(&items, 0), shuffled(&items, 0));
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let items: Vec<u32> = (0..32).collect();
        let mut out = shuffled(&items, 7);
        out.sort_unstable();
        assert_eq!(out, items);
    }

    #[test]
    fn test_seed_changes_order() {
        let items: Vec<u32> = (0..32).collect();
        let reference = shuffled(&items, 0);
        // Not every pair of seeds must differ, but if every seed in a wide
        // range produces the same order the seeding is broken.
        let any_differs = (1u64..64).any(|seed| shuffled(&items, seed) != reference);
        assert!(any_differs);
    }

    #[test]
    fn test_degenerate_inputs() {
        let empty: Vec<u32> = vec![];
        assert_eq!(shuffled(&empty, 5), empty);
        assert_eq!(shuffled(&[9u32], 5), vec![9]);
    }
}
