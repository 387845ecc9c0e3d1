//! The AI seat's move policy.
//!
//! Every turn the opponent draws against the difficulty's exploration rate and
//! then plays either an exploring move or the [`TurnEvaluator`]'s choice:
//!
//! | Phase      | Exploring                                                   | Strategic                         |
//! |------------|-------------------------------------------------------------|-----------------------------------|
//! | Placement  | random empty row, then a random unattacked column in it     | most free squares left            |
//! | Correction | random attacked queen, then a random legal destination      | fewest conflicts left             |
//!
//! An exploring draw that finds nothing to play falls back to the strategic
//! choice. In the correction phase only queens attacked by another queen are
//! moved. When no candidate exists at all the opponent returns `None` and the
//! session store passes its turn.

use nqueens_engine::{
    Board, CorrectionMove, Difficulty, GameSession, Move, Opponent, Phase, PlacementMove,
    SelectedMove,
};
use rand::{Rng, SeedableRng as _, seq::IndexedRandom as _};
use rand_pcg::Pcg32;

use crate::{
    move_evaluator::{ConflictEvaluator, MobilityEvaluator},
    turn_evaluator::TurnEvaluator,
};

/// Explore-or-exploit opponent over one-ply heuristics.
#[derive(Debug)]
pub struct HeuristicOpponent<R = Pcg32> {
    rng: R,
    placement: TurnEvaluator<'static>,
    correction: TurnEvaluator<'static>,
}

impl HeuristicOpponent<Pcg32> {
    /// Creates an opponent with a reproducible move sequence.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(Pcg32::seed_from_u64(seed))
    }
}

impl<R> HeuristicOpponent<R>
where
    R: Rng,
{
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            placement: TurnEvaluator::new(Box::new(MobilityEvaluator)),
            correction: TurnEvaluator::new(Box::new(ConflictEvaluator)),
        }
    }

    fn placement_move(&mut self, session: &GameSession, explore: bool) -> Option<SelectedMove> {
        let board = session.board();
        let candidates = session.legal_moves();
        if explore {
            let empty_rows = board.empty_rows().collect::<Vec<_>>();
            if let Some(&row) = empty_rows.choose(&mut self.rng) {
                let in_row = candidates
                    .iter()
                    .copied()
                    .filter(|mv| matches!(mv, Move::Place(PlacementMove { row: r, .. }) if *r == row))
                    .collect::<Vec<_>>();
                if let Some(&mv) = in_row.choose(&mut self.rng) {
                    return Some(SelectedMove { mv, exploring: true });
                }
                log::debug!("row {row} has no free square, falling back to strategy");
            }
        }
        strategic(&self.placement, board, candidates)
    }

    fn correction_move(&mut self, session: &GameSession, explore: bool) -> Option<SelectedMove> {
        let board = session.board();
        let sources = board.attacked_queens().map(|queen| queen.row).collect::<Vec<_>>();
        let candidates = session
            .legal_moves()
            .into_iter()
            .filter(|&mv| source_row(mv).is_some_and(|row| sources.contains(&row)))
            .collect::<Vec<_>>();
        if explore && let Some(&from) = sources.choose(&mut self.rng) {
            let from_source = candidates
                .iter()
                .copied()
                .filter(|&mv| source_row(mv) == Some(from))
                .collect::<Vec<_>>();
            if let Some(&mv) = from_source.choose(&mut self.rng) {
                return Some(SelectedMove { mv, exploring: true });
            }
            log::debug!("queen in row {from} cannot move, falling back to strategy");
        }
        strategic(&self.correction, board, candidates)
    }
}

impl<R> Opponent for HeuristicOpponent<R>
where
    R: Rng,
{
    fn select_move(&mut self, session: &GameSession, difficulty: Difficulty) -> Option<SelectedMove> {
        if session.status().is_finished() {
            return None;
        }
        let exploration_rate = difficulty.params().exploration_rate;
        let explore = self.rng.random::<f32>() < exploration_rate;
        let selected = match session.phase() {
            Phase::Placement => self.placement_move(session, explore),
            Phase::Correction => self.correction_move(session, explore),
        };
        match selected {
            Some(SelectedMove { mv, exploring }) => {
                log::debug!("{difficulty} AI chose {mv} (exploring: {exploring})");
            }
            None => log::debug!("{difficulty} AI found no move in {} phase", session.phase()),
        }
        selected
    }
}

fn strategic(evaluator: &TurnEvaluator<'_>, board: &Board, candidates: Vec<Move>) -> Option<SelectedMove> {
    evaluator
        .select_best_move(board, candidates)
        .map(|best| SelectedMove {
            mv: best.mv,
            exploring: false,
        })
}

fn source_row(mv: Move) -> Option<usize> {
    match mv {
        Move::Relocate(CorrectionMove { from_row, .. }) => Some(from_row),
        Move::Place(_) => None,
    }
}
