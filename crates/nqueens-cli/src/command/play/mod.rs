use std::path::PathBuf;

use chrono::Local;
use nqueens_engine::{Difficulty, GameResult, Leaderboard, PlayerId};

use self::{
    app::PlayApp,
    game::{Game, GameSettings},
};
use crate::{
    tui::Runtime,
    util::{self, Output},
};

mod app;
mod game;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Board size; values outside 4..=8 are clamped
    #[arg(long, short, default_value_t = 8)]
    size: usize,
    /// AI difficulty (easy, medium or hard)
    #[arg(long, short, default_value_t = Difficulty::default())]
    difficulty: Difficulty,
    /// Start from a random full board and play the correction phase
    #[arg(long)]
    scramble: bool,
    /// Let the AI answer immediately instead of waiting its think delay
    #[arg(long)]
    no_delay: bool,
    /// Seed for reproducible games
    #[arg(long)]
    seed: Option<u64>,
    /// Leaderboard file (JSON) to load and update with finished games
    #[arg(long)]
    leaderboard: Option<PathBuf>,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            size: 8,
            difficulty: Difficulty::default(),
            scramble: false,
            no_delay: false,
            seed: None,
            leaderboard: None,
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        size,
        difficulty,
        scramble,
        no_delay,
        seed,
        leaderboard: leaderboard_path,
    } = arg;

    let leaderboard = match leaderboard_path {
        Some(path) => util::read_leaderboard(path)?,
        None => Leaderboard::new(),
    };
    let recorded_before = leaderboard.len();
    let settings = GameSettings {
        size: util::clamp_board_size(*size),
        difficulty: *difficulty,
        scramble: *scramble,
        think_delay: if *no_delay {
            std::time::Duration::ZERO
        } else {
            difficulty.params().think_delay
        },
    };
    let game = Game::new(settings, leaderboard, util::make_rng(*seed))?;

    let mut app = PlayApp::new(game);
    Runtime::new().run(&mut app)?;
    let leaderboard = app.into_game().into_leaderboard();

    let played = leaderboard.iter().skip(recorded_before).collect::<Vec<_>>();
    print_results(&played, &leaderboard);
    if let Some(path) = leaderboard_path {
        let mut output = Output::from_output_path(Some(path.clone()))?;
        output.write_json(&leaderboard)?;
        eprintln!("Leaderboard saved to {}", output.display_path());
    }
    Ok(())
}

fn print_results(played: &[&GameResult], leaderboard: &Leaderboard) {
    if played.is_empty() {
        eprintln!("No game finished.");
        return;
    }
    eprintln!("Finished games:");
    for result in played {
        let outcome = match result.winner {
            Some(PlayerId::Human) => "won",
            Some(PlayerId::Ai) => "lost",
            None => "stalled",
        };
        eprintln!(
            "  #{id} {n}x{n}: {outcome} in {moves} moves ({secs:.1} s) at {at}",
            id = result.session_id,
            n = result.board_size,
            moves = result.moves,
            secs = result.elapsed_secs,
            at = result.finished_at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"),
        );
    }

    let ranked = leaderboard.ranked(PlayerId::Human);
    if !ranked.is_empty() {
        eprintln!("Fastest wins:");
        for (rank, result) in ranked.iter().take(5).enumerate() {
            let difficulty = result
                .ai_difficulty
                .map_or_else(|| "-".to_string(), |d| d.to_string());
            eprintln!(
                "  {rank}. {secs:.1} s, {moves} moves ({n}x{n}, {difficulty})",
                rank = rank + 1,
                secs = result.elapsed_secs,
                moves = result.moves,
                n = result.board_size,
            );
        }
    }
}
