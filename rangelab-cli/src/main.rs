//! RangeLab CLI — quote replay, synthetic quotes and config checks.
//!
//! Commands:
//! - `run` — replay a CSV of quotes through the configured pairs
//! - `synth` — write a seeded random-walk quote CSV
//! - `check-config` — validate a TOML config and print its run id

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::path::{Path, PathBuf};
use rangelab_runner::{
    generate_quotes, init_logger, run_replay, save_artifacts, write_quotes_csv, CsvQuoteFeed,
    ReplayConfig, ReplayResult, SynthParams,
};

#[derive(Parser)]
#[command(
    name = "rangelab",
    about = "RangeLab CLI — range tracking and position sizing for FX scalping"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay recorded quotes through the decision loop.
    Run {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,

        /// CSV of quotes with columns timestamp,pair,ask,bid.
        #[arg(long)]
        quotes: PathBuf,

        /// Output directory for result JSON.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,

        /// Console log level (error, warn, info, debug, trace).
        #[arg(long, default_value = "info")]
        log_level: LevelFilter,

        /// Also write a trace-level log to this file.
        #[arg(long)]
        log_file: Option<PathBuf>,
    },
    /// Generate a synthetic quote CSV.
    Synth {
        /// Currency pair name written on every row.
        #[arg(long, default_value = "USDJPY")]
        pair: String,

        /// Number of quotes.
        #[arg(long, default_value_t = 3_600)]
        ticks: usize,

        /// RNG seed; the same seed gives the same quotes.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// First quote time (RFC 3339). Defaults to now.
        #[arg(long)]
        start: Option<String>,

        /// Bid of the first quote.
        #[arg(long, default_value_t = 14_500)]
        start_bid: i64,

        /// Constant ask - bid.
        #[arg(long, default_value_t = 3)]
        spread: i64,

        /// Largest bid move per quote.
        #[arg(long, default_value_t = 2)]
        max_step: i64,

        /// Seconds between quotes.
        #[arg(long, default_value_t = 1)]
        step_seconds: i64,

        /// Output CSV path.
        #[arg(long)]
        out: PathBuf,
    },
    /// Validate a TOML config and print its run id.
    CheckConfig {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,

        /// Print the fully defaulted config as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            quotes,
            output_dir,
            log_level,
            log_file,
        } => run_replay_cmd(&config, &quotes, &output_dir, log_level, log_file.as_deref()),
        Commands::Synth {
            pair,
            ticks,
            seed,
            start,
            start_bid,
            spread,
            max_step,
            step_seconds,
            out,
        } => {
            let start = match start {
                Some(s) => DateTime::parse_from_rfc3339(&s)
                    .with_context(|| format!("invalid --start '{s}'"))?
                    .with_timezone(&Utc),
                None => Utc::now(),
            };
            let params = SynthParams {
                pair,
                ticks,
                seed,
                start,
                start_bid,
                spread,
                max_step,
                step_seconds,
            };
            run_synth(&params, &out)
        }
        Commands::CheckConfig { config, json } => run_check_config(&config, json),
    }
}

fn run_replay_cmd(
    config_path: &Path,
    quotes_path: &Path,
    output_dir: &Path,
    log_level: LevelFilter,
    log_file: Option<&Path>,
) -> Result<()> {
    init_logger(log_level, log_file);

    let config = ReplayConfig::from_file(config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    let mut feed = CsvQuoteFeed::from_path(quotes_path, &config.pairs)
        .with_context(|| format!("opening {}", quotes_path.display()))?;

    let result = run_replay(&config, &mut feed)?;
    print_summary(&result);

    let path = save_artifacts(&result, output_dir)?;
    println!("Result saved to: {}", path.display());

    Ok(())
}

fn run_synth(params: &SynthParams, out: &Path) -> Result<()> {
    if params.ticks == 0 {
        bail!("--ticks must be > 0");
    }
    if params.spread < 0 {
        bail!("--spread must be >= 0, got {}", params.spread);
    }
    if params.step_seconds <= 0 {
        bail!("--step-seconds must be > 0, got {}", params.step_seconds);
    }
    if params.start_bid <= 0 {
        bail!("--start-bid must be > 0, got {}", params.start_bid);
    }

    let quotes = generate_quotes(params);
    write_quotes_csv(out, &quotes)?;
    println!(
        "Wrote {} {} quotes to {}",
        quotes.len(),
        params.pair,
        out.display()
    );
    Ok(())
}

fn run_check_config(config_path: &Path, json: bool) -> Result<()> {
    let config = ReplayConfig::from_file(config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("Config OK:      {}", config_path.display());
    println!("Run id:         {}", config.run_id());
    println!("Initial margin: {}", config.account.initial_margin);
    println!(
        "Engine:         window {}m, warm-up {}m, apply every {}s",
        config.engine.window_minutes,
        config.engine.min_history_minutes,
        config.engine.apply_after_seconds
    );
    for pair in &config.pairs {
        println!(
            "Pair:           {} (max spread {}, margin/lot {})",
            pair.name, pair.min_spread, pair.margin_requirement
        );
    }
    Ok(())
}

fn print_summary(result: &ReplayResult) {
    println!();
    println!("=== Replay Result ===");
    println!("Run id:         {}", result.run_id);
    println!("Malformed rows: {}", result.malformed_rows);
    println!("Unrouted rows:  {}", result.unrouted_rows);
    for report in &result.pairs {
        println!();
        println!("--- {} ---", report.pair);
        println!(
            "Quotes:         {} ({} rejected)",
            report.ticks, report.rejected
        );
        println!("Opens:          {}", report.opens);
        println!("Adds:           {}", report.adds);
        println!("Closes:         {}", report.closes);
        println!("Lot limit hits: {}", report.lot_limit_holds);
        println!("Realized:       {}", report.realized_profit);
        println!(
            "Open lots:      ask {} / bid {}",
            report.final_position.ask_lot, report.final_position.bid_lot
        );
        println!("Eff. margin:    {}", report.final_effective_margin);
    }
    println!();
    println!("Total realized: {}", result.total_realized_profit());
}
