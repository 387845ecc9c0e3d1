use clap::{Parser, Subcommand};

use self::{
    compare::CompareArg, difficulties::DifficultiesArg, play::PlayArg, solve::SolveArg,
};

mod compare;
mod difficulties;
mod play;
mod solve;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play against the AI in the terminal
    Play(#[clap(flatten)] PlayArg),
    /// Solve a board with one algorithm and print the report as JSON
    Solve(#[clap(flatten)] SolveArg),
    /// Run every algorithm on the same board size and summarize
    Compare(#[clap(flatten)] CompareArg),
    /// List the AI difficulty presets
    Difficulties(#[clap(flatten)] DifficultiesArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Solve(arg) => solve::run(&arg)?,
        Mode::Compare(arg) => compare::run(&arg)?,
        Mode::Difficulties(arg) => difficulties::run(&arg)?,
    }
    Ok(())
}
