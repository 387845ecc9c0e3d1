//! Genetic search for a conflict-free board.
//!
//! Each individual is a complete board read as a gene sequence (gene `i` is the
//! column of row `i`). The initial population consists of random permutations.
//!
//! # Generation Cycle
//!
//! 1. **Evaluate** - Fitness is `n - conflicts`
//! 2. **Record** - The best individual is appended to the trace; a
//!    conflict-free one ends the search
//! 3. **Select** - Two parents are drawn with replacement, weighted by fitness
//!    clamped at zero (uniformly when every weight is zero)
//! 4. **Crossover** - See [`genes::crossover`] and [`genes::repair`]
//! 5. **Mutate** - See [`genes::mutate`]
//!
//! The search stops after `max_generations` generations and then reports the
//! best individual seen over the whole run.

use std::time::Instant;

use nqueens_engine::{Board, BoardSize, Trace};
use rand::{
    Rng,
    distr::{Distribution as _, weighted::WeightedIndex},
    seq::IndexedRandom as _,
};

use crate::{
    config::{GeneticParams, SolverConfig},
    genes,
    report::{Algorithm, SolveReport},
};

/// A candidate board with its fitness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Individual {
    board: Board,
    fitness: i64,
}

impl Individual {
    #[must_use]
    pub fn new(board: Board) -> Self {
        let n = i64::try_from(board.size().get()).unwrap_or(i64::MAX);
        let conflicts = i64::try_from(board.conflict_count()).unwrap_or(i64::MAX);
        Self {
            fitness: n - conflicts,
            board,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// `n - conflicts`; may be negative on crowded boards.
    #[must_use]
    pub fn fitness(&self) -> i64 {
        self.fitness
    }

    #[must_use]
    pub fn is_solution(&self) -> bool {
        self.board.conflict_count() == 0
    }

    fn genes(&self) -> Vec<usize> {
        self.board.placements().flatten().collect()
    }

    fn selection_weight(&self) -> u64 {
        u64::try_from(self.fitness).unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct Population {
    size: BoardSize,
    individuals: Vec<Individual>,
}

impl Population {
    /// Creates `count` individuals with distinct columns in every row.
    pub fn random<R>(size: BoardSize, count: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let individuals = (0..count)
            .map(|_| Individual::new(Board::random_permutation(size, rng)))
            .collect();
        Self { size, individuals }
    }

    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// The fittest individual; the first one wins ties.
    #[must_use]
    pub fn best(&self) -> Option<&Individual> {
        self.individuals
            .iter()
            .reduce(|best, ind| if ind.fitness > best.fitness { ind } else { best })
    }
}

/// Builds the next generation by fitness-proportional selection, crossover and mutation.
#[derive(Debug)]
pub struct PopulationEvolver {
    /// Probability of swapping two genes of each child.
    pub mutation_rate: f64,
}

impl PopulationEvolver {
    pub fn evolve<R>(&self, population: &Population, rng: &mut R) -> Population
    where
        R: Rng + ?Sized,
    {
        let n = population.size.get();
        let weights = population
            .individuals
            .iter()
            .map(Individual::selection_weight)
            .collect::<Vec<_>>();
        let weighted = WeightedIndex::new(&weights).ok();

        let individuals = (0..population.individuals.len())
            .map(|_| {
                let first = select(&population.individuals, weighted.as_ref(), rng).genes();
                let second = select(&population.individuals, weighted.as_ref(), rng).genes();
                let cut = rng.random_range(1..n);
                let mut child = genes::crossover(&first, &second, cut);
                genes::repair(&mut child, n);
                genes::mutate(&mut child, self.mutation_rate, rng);
                let board = Board::from_columns(child).expect("repaired genes fit the board");
                Individual::new(board)
            })
            .collect();

        Population {
            size: population.size,
            individuals,
        }
    }
}

/// Draws one parent, uniformly when no weighted distribution exists.
fn select<'a, R>(
    individuals: &'a [Individual],
    weighted: Option<&WeightedIndex<u64>>,
    rng: &mut R,
) -> &'a Individual
where
    R: Rng + ?Sized,
{
    match weighted {
        Some(dist) => &individuals[dist.sample(rng)],
        None => individuals.choose(rng).expect("population is never empty"),
    }
}

/// Runs the genetic search on an `size × size` board.
///
/// `steps` in the report is the number of generations evaluated.
///
/// ```
/// use nqueens_engine::BoardSize;
/// use nqueens_solver::{SolverConfig, solve_genetic};
///
/// let mut rng = rand::rng();
/// let report = solve_genetic(BoardSize::new(6).unwrap(), &SolverConfig::default(), &mut rng);
/// assert_eq!(report.trace.len(), report.steps);
/// ```
pub fn solve_genetic<R>(size: BoardSize, config: &SolverConfig, rng: &mut R) -> SolveReport
where
    R: Rng + ?Sized,
{
    let start = Instant::now();
    let GeneticParams {
        population_size,
        max_generations,
        mutation_rate,
    } = config.genetic;
    let evolver = PopulationEvolver { mutation_rate };

    let mut population = Population::random(size, population_size.max(1), rng);
    let mut trace = Trace::new();
    let mut best_seen: Option<Individual> = None;

    for generation in 0..max_generations {
        let best = population.best().expect("population is never empty");
        trace.record(best.board());
        if best_seen
            .as_ref()
            .is_none_or(|seen| best.fitness > seen.fitness)
        {
            best_seen = Some(best.clone());
        }
        if best.is_solution() {
            log::debug!("genetic search solved in generation {generation}");
            return SolveReport::new(
                Algorithm::Genetic,
                size,
                Some(best.board().clone()),
                trace,
                generation + 1,
                start.elapsed(),
            );
        }
        population = evolver.evolve(&population, rng);
    }

    let last = population.best().expect("population is never empty");
    let best = match best_seen {
        Some(seen) if seen.fitness >= last.fitness => seen,
        _ => last.clone(),
    };
    SolveReport::new(
        Algorithm::Genetic,
        size,
        Some(best.board().clone()),
        trace,
        max_generations,
        start.elapsed(),
    )
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_fitness() {
        let solved = Individual::new(Board::from_columns([1, 3, 0, 2]).unwrap());
        assert_eq!(solved.fitness(), 4);
        assert!(solved.is_solution());

        // 28 conflicts on the main diagonal of an 8x8 board
        let diagonal = Individual::new(Board::from_columns(0..8).unwrap());
        assert_eq!(diagonal.fitness(), 8 - 28);
        assert_eq!(diagonal.selection_weight(), 0);
    }

    #[test]
    fn test_best_prefers_first_on_ties() {
        let a = Individual::new(Board::from_columns([0, 2, 1, 3]).unwrap());
        let b = Individual::new(Board::from_columns([3, 1, 2, 0]).unwrap());
        assert_eq!(a.fitness(), b.fitness());
        let population = Population {
            size: BoardSize::MIN,
            individuals: vec![a.clone(), b],
        };
        assert_eq!(population.best(), Some(&a));
    }

    #[test]
    fn test_evolve_keeps_population_shape() {
        let mut rng = Pcg32::seed_from_u64(1);
        let size = BoardSize::new(7).unwrap();
        let population = Population::random(size, 30, &mut rng);
        let evolver = PopulationEvolver { mutation_rate: 0.1 };
        let next = evolver.evolve(&population, &mut rng);
        assert_eq!(next.individuals().len(), 30);
        assert!(
            next.individuals()
                .iter()
                .all(|ind| ind.board().size() == size && ind.board().is_complete())
        );
    }

    #[test]
    fn test_evolve_with_all_zero_weights() {
        let mut rng = Pcg32::seed_from_u64(2);
        let crowded = Individual::new(Board::from_columns(0..8).unwrap());
        let population = Population {
            size: BoardSize::MAX,
            individuals: vec![crowded; 10],
        };
        let next = PopulationEvolver { mutation_rate: 0.5 }.evolve(&population, &mut rng);
        assert_eq!(next.individuals().len(), 10);
    }

    #[test]
    fn test_solve_reports_best_per_generation() {
        let mut rng = Pcg32::seed_from_u64(3);
        let config = SolverConfig {
            genetic: GeneticParams {
                population_size: 10,
                max_generations: 5,
                mutation_rate: 0.1,
            },
            ..SolverConfig::default()
        };
        let report = solve_genetic(BoardSize::MAX, &config, &mut rng);
        assert_eq!(report.trace.len(), report.steps);
        assert!(report.steps <= 5);
        if !report.success {
            assert_eq!(report.steps, 5);
        }
        let best_traced = report.trace.iter().map(Board::conflict_count).min().unwrap();
        assert!(report.conflicts <= best_traced);
    }

    #[test]
    fn test_solve_eight_queens_converges() {
        let config = SolverConfig::default();
        let successes = (0..5)
            .filter(|&seed| {
                let mut rng = Pcg32::seed_from_u64(seed);
                let report = solve_genetic(BoardSize::MAX, &config, &mut rng);
                if report.success {
                    assert_eq!(report.conflicts, 0);
                    assert_eq!(report.trace.last(), report.solution.as_ref());
                }
                report.success
            })
            .count();
        assert!(successes >= 4, "only {successes} of 5 seeds solved the board");
    }
}
