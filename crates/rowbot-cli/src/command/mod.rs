use std::path::PathBuf;

use clap::{Parser, Subcommand};

use self::{parse::ParseArg, replay::ReplayArg, score::ScoreArg, train::TrainArg};
use crate::{logging, util};

mod parse;
mod replay;
mod score;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Game configuration file (JSON); defaults are used for missing fields
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Train policies against the game executable
    Train(#[clap(flatten)] TrainArg),
    /// Play one game per saved elite policy
    Replay(#[clap(flatten)] ReplayArg),
    /// Score a board given as O/X/. rows
    Score(#[clap(flatten)] ScoreArg),
    /// Extract boards and the outcome from captured game output
    Parse(#[clap(flatten)] ParseArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    logging::init(args.verbose);
    let config = util::load_config(args.config.as_deref())?;
    match args.mode {
        Mode::Train(arg) => train::run(&arg, &config)?,
        Mode::Replay(arg) => replay::run(&arg, &config)?,
        Mode::Score(arg) => score::run(&arg)?,
        Mode::Parse(arg) => parse::run(&arg, &config)?,
    }
    Ok(())
}
