//! Operators on gene sequences, where gene `i` is the column of the queen in row `i`.
//!
//! - **Crossover**: [`crossover`] keeps a prefix of one parent and appends the
//!   other parent's genes not already in that prefix
//! - **Repair**: [`repair`] brings a child back to exactly `n` genes
//! - **Mutation**: [`mutate`] swaps two genes
//!
//! # Repair Policy
//!
//! Crossover children are not always `n` genes long. A child with too many
//! genes is truncated. A child with too few is filled with the columns it does
//! not use yet, in ascending order. The policy is deterministic, so the same
//! parents and cut point always give the same child.

use rand::{Rng, seq::index};

/// Combines `first[..cut]` with the genes of `second` missing from that prefix.
///
/// The result may be shorter or longer than the parents; see [`repair`].
///
/// ```
/// use nqueens_solver::genes;
///
/// assert_eq!(genes::crossover(&[0, 1, 2, 3], &[3, 2, 1, 0], 2), [0, 1, 3, 2]);
/// assert_eq!(genes::crossover(&[0, 0, 2, 3], &[0, 1, 2, 3], 2), [0, 0, 1, 2, 3]);
/// ```
#[must_use]
pub fn crossover(first: &[usize], second: &[usize], cut: usize) -> Vec<usize> {
    let prefix = &first[..cut];
    prefix
        .iter()
        .copied()
        .chain(second.iter().copied().filter(|gene| !prefix.contains(gene)))
        .collect()
}

/// Truncates or pads `genes` to exactly `n` entries.
///
/// ```
/// use nqueens_solver::genes;
///
/// let mut genes = vec![3, 3];
/// genes::repair(&mut genes, 4);
/// assert_eq!(genes, [3, 3, 0, 1]);
/// ```
pub fn repair(genes: &mut Vec<usize>, n: usize) {
    genes.truncate(n);
    let missing = (0..n).filter(|col| !genes.contains(col)).collect::<Vec<_>>();
    let shortfall = n - genes.len();
    genes.extend(missing.into_iter().take(shortfall));
}

/// Swaps two distinct random genes with probability `rate`.
pub fn mutate<R>(genes: &mut [usize], rate: f64, rng: &mut R)
where
    R: Rng + ?Sized,
{
    if genes.len() < 2 || !rng.random_bool(rate) {
        return;
    }
    let picked = index::sample(rng, genes.len(), 2);
    genes.swap(picked.index(0), picked.index(1));
}
