#![forbid(unsafe_code)]
//! # distant_reading CLI
//!
//! Analyses every `pg*.txt` file in the working directory and writes
//! `analysis_data.json` for the visualization front end.
//!
//! ## Example
//! ```bash
//! cargo run --release
//! cargo run --release -- --dir plays --date 2025-11-23 --summary-csv summary.csv
//! ```
//!
//! See `--help` for all available options. Set `RUST_LOG=info` for progress logs.

use chrono::NaiveDate;
use clap::Parser;
use log::error;
use std::path::PathBuf;
use std::process;

use distant_reading::resources::{DEFAULT_LEXICON_PATH, DEFAULT_LEXICON_URL};
use distant_reading::{
    AnalysisOptions, DEFAULT_OUTPUT, DEFAULT_OVERLAP_CAP, DEFAULT_PATTERN, DEFAULT_TOP_WORDS, run,
};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Directory containing the input texts
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// File name pattern of the input texts
    #[arg(long, default_value = DEFAULT_PATTERN)]
    pattern: String,

    /// Path of the JSON output
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Number of most frequent words kept per text
    #[arg(long, default_value_t = DEFAULT_TOP_WORDS)]
    top_words: usize,

    /// Number of shared words listed per comparison
    #[arg(long, default_value_t = DEFAULT_OVERLAP_CAP)]
    overlap_cap: usize,

    /// Keep stopwords in the word frequencies (default: false)
    #[arg(long, default_value_t = false)]
    keep_stopwords: bool,

    /// Optional path to additional stopword file (.txt, one word per line)
    #[arg(long)]
    stopwords: Option<PathBuf>,

    /// Location of the sentiment lexicon; fetched once if missing
    #[arg(long, default_value = DEFAULT_LEXICON_PATH)]
    lexicon: PathBuf,

    /// Download location of the sentiment lexicon
    #[arg(long, default_value = DEFAULT_LEXICON_URL)]
    lexicon_url: String,

    /// Never download the lexicon (default: false)
    #[arg(long, default_value_t = false)]
    offline: bool,

    /// Analysis date recorded in the output (YYYY-MM-DD, default: today)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Also write a per-text summary table as CSV
    #[arg(long)]
    summary_csv: Option<PathBuf>,
}

impl From<Cli> for AnalysisOptions {
    fn from(cli: Cli) -> Self {
        AnalysisOptions {
            dir: cli.dir,
            pattern: cli.pattern,
            output: cli.output,
            top_words: cli.top_words,
            overlap_cap: cli.overlap_cap,
            remove_stopwords: !cli.keep_stopwords,
            extra_stopwords: cli.stopwords,
            lexicon_path: cli.lexicon,
            lexicon_url: (!cli.offline).then_some(cli.lexicon_url),
            analysis_date: cli.date,
            summary_csv: cli.summary_csv,
        }
    }
}

fn main() {
    env_logger::init();
    let opts = AnalysisOptions::from(Cli::parse());

    println!("{}", "=".repeat(60));
    println!("Distant Reading Analysis");
    println!("{}", "=".repeat(60));

    match run(&opts) {
        Ok(report) => {
            println!("{}", report.summary);
        }
        Err(e) => {
            error!("Error: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
