use std::path::PathBuf;

use clap::Parser;

/// Command-line options for a snake session.
#[derive(Parser, Debug, Clone)]
#[command(name = "snake", version, about = "Classic snake with a persisted high-score table")]
pub struct Config {
    /// JSON file holding the high-score table
    #[arg(long, default_value = "high_scores.json")]
    pub scores_file: PathBuf,

    /// File the log is written to
    #[arg(long, default_value = "snake.log")]
    pub log_file: PathBuf,

    /// Play-field width in cells
    #[arg(long, default_value_t = 24, value_parser = clap::value_parser!(u16).range(10..=100))]
    pub cols: u16,

    /// Play-field height in cells
    #[arg(long, default_value_t = 24, value_parser = clap::value_parser!(u16).range(10..=100))]
    pub rows: u16,

    /// Log more (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
