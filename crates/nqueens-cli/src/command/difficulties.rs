use std::path::PathBuf;

use nqueens_engine::{Difficulty, DifficultyParams};
use serde::Serialize;

use crate::util::Output;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct DifficultiesArg {
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct Preset {
    name: Difficulty,
    #[serde(flatten)]
    params: DifficultyParams,
}

#[derive(Debug, Serialize)]
struct Presets {
    levels: Vec<Preset>,
    default: Difficulty,
}

pub(crate) fn run(arg: &DifficultiesArg) -> anyhow::Result<()> {
    let presets = Presets {
        levels: Difficulty::ALL
            .into_iter()
            .map(|name| Preset {
                name,
                params: name.params(),
            })
            .collect(),
        default: Difficulty::default(),
    };
    Output::save_json(&presets, arg.output.clone())
}
