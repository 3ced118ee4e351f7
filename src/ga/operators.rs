//! Permutation operators used by [`Tour`](super::Tour).
//!
//! These work on plain `&[usize]` chromosomes so they can be tested
//! without a distance provider.
//!
//! # Crossover
//!
//! - [`segment_crossover`]: a segment of one parent followed by the rest
//!   of the other parent in its own order. Always yields a permutation.
//!
//! # Mutation
//!
//! - [`windowed_swap_mutation`]: swaps driven from a fixed leading window.

use rand::Rng;

// ============================================================================
// Crossover
// ============================================================================

/// Segment crossover.
///
/// The child is `template[start..end]` followed by every gene of `donor`,
/// in `donor`'s order, that is not in that segment. Both parents must be
/// permutations of `0..n` and `start <= end <= n`.
///
/// With `(start, end) == (0, n)` the child equals `template`.
///
/// # Complexity
/// O(n) time, O(n) space
pub fn segment_crossover(template: &[usize], donor: &[usize], start: usize, end: usize) -> Vec<usize> {
    let n = template.len();
    debug_assert_eq!(n, donor.len(), "parents must have equal length");
    debug_assert!(start <= end && end <= n);

    let mut child = Vec::with_capacity(n);
    let mut in_segment = vec![false; n];

    for &gene in &template[start..end] {
        child.push(gene);
        in_segment[gene] = true;
    }

    child.extend(donor.iter().copied().filter(|&gene| !in_segment[gene]));
    child
}

// ============================================================================
// Mutation
// ============================================================================

/// Length of the mutation window for a chromosome of `n` genes.
///
/// `round(n * gene_change_percent)` with ties to even, capped at `n`.
pub fn mutation_window(n: usize, gene_change_percent: f64) -> usize {
    let w = (n as f64 * gene_change_percent).round_ties_even();
    if w <= 0.0 {
        0
    } else {
        (w as usize).min(n)
    }
}

/// Windowed swap mutation.
///
/// For each index in `[0, w)`, `w = mutation_window(n, gene_change_percent)`,
/// with probability `mutation_prob` the gene is swapped with the gene at an
/// index drawn uniformly from `[0, n)`.
///
/// # Panics
/// Panics if `mutation_prob` is outside `[0, 1]` and the window is not empty.
pub fn windowed_swap_mutation<R: Rng>(
    perm: &mut [usize],
    gene_change_percent: f64,
    mutation_prob: f64,
    rng: &mut R,
) {
    let n = perm.len();
    for idx in 0..mutation_window(n, gene_change_percent) {
        if rng.random_bool(mutation_prob) {
            let swap_idx = rng.random_range(0..n);
            perm.swap(idx, swap_idx);
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Draws two indices uniformly from `[0, n)` and returns them as
/// `(start, end)` with `start <= end`.
///
/// # Panics
/// Panics if `n == 0`.
pub fn random_cut<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    let a = rng.random_range(0..n);
    let b = rng.random_range(0..n);
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

// ============================================================================
// Tests
// ============================================================================
