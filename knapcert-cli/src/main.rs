//! knapcert CLI - Generate a random 0/1 knapsack instance and certify its optimum

mod config;
mod error;
mod generate;
mod output;

use clap::{CommandFactory, Parser, ValueEnum};
use clap_complete::{Shell, generate};
use knapcert_opt::{CertifyConfig, Certifier, KnapsackInstance};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;
use std::process;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use config::CliConfig;
use error::{CliError, CliResult};
use generate::{DEFAULT_SEED, random_instance};
use output::Summary;

pub(crate) const DEFAULT_INSTANCE: &str = "knapsack.opb";
pub(crate) const DEFAULT_PROOF: &str = "knapsack.veripb";
pub(crate) const DEFAULT_DELETION_LAG: usize = 2;

/// Summary format
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub(crate) enum SummaryFormat {
    /// `widest_layer total_states total_transitions` (default)
    Text,
    /// JSON object with additional counters
    Json,
}

/// Verbosity level
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Verbosity {
    /// No log output
    Quiet,
    /// Warnings only
    Normal,
    /// Progress information
    Verbose,
    /// Per-layer details
    Debug,
    /// Every proof statement
    Trace,
}

fn parse_deletion_lag(s: &str) -> Result<usize, String> {
    let lag: usize = s.parse().map_err(|e| format!("{e}"))?;
    if lag == 1 {
        return Err("a lag of 1 deletes definitions that are still needed; use 0 or >= 2".into());
    }
    Ok(lag)
}

/// knapcert - certified 0/1 knapsack optimization
#[derive(Parser, Debug, Clone)]
#[command(name = "knapcert")]
#[command(version)]
#[command(about = "Generates a random 0/1 knapsack instance and a VeriPB proof of its optimum")]
pub(crate) struct Args {
    /// Number of items
    #[arg(value_name = "N_ITEMS", required_unless_present = "completions",
          value_parser = clap::value_parser!(u64).range(1..))]
    n_items: Option<u64>,

    /// Largest weight and profit of an item
    #[arg(value_name = "MAX_ITEM_WEIGHT", required_unless_present = "completions",
          value_parser = clap::value_parser!(i64).range(1..))]
    max_item_weight: Option<i64>,

    /// Knapsack capacity
    #[arg(value_name = "MAX_WEIGHT", required_unless_present = "completions",
          value_parser = clap::value_parser!(i64).range(1..))]
    max_weight: Option<i64>,

    /// Random seed for the instance
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub(crate) seed: u64,

    /// Instance output file (OPB)
    #[arg(long, value_name = "FILE", default_value = DEFAULT_INSTANCE)]
    pub(crate) instance: PathBuf,

    /// Proof output file (VeriPB)
    #[arg(long, value_name = "FILE", default_value = DEFAULT_PROOF)]
    pub(crate) proof: PathBuf,

    /// Prune dominated states (default; overrides a config file)
    #[arg(long, overrides_with = "no_dominance")]
    pub(crate) dominance: bool,

    /// Keep dominated states
    #[arg(long, overrides_with = "dominance")]
    pub(crate) no_dominance: bool,

    /// Delete proof constraints this many layers behind (0 disables)
    #[arg(long, value_name = "N", default_value_t = DEFAULT_DELETION_LAG,
          value_parser = parse_deletion_lag)]
    pub(crate) deletion_lag: usize,

    /// Compare the certified optimum with an independent DP
    #[arg(long)]
    check: bool,

    /// Summary format
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    pub(crate) format: SummaryFormat,

    /// Verbosity level
    #[arg(short, long, value_enum, default_value = "normal")]
    pub(crate) verbosity: Verbosity,

    /// Enable quiet mode (equivalent to --verbosity quiet)
    #[arg(short, long)]
    quiet: bool,

    /// Generate shell completions
    #[arg(long, value_name = "SHELL", value_enum)]
    completions: Option<Shell>,
}

impl Args {
    fn certify_config(&self) -> CertifyConfig {
        CertifyConfig {
            dominance: !self.no_dominance,
            deletion_lag: (self.deletion_lag != 0).then_some(self.deletion_lag),
            retain_layers: false,
        }
    }
}

fn main() {
    let mut args = Args::parse();

    // Handle completion generation
    if let Some(shell) = args.completions {
        let mut cmd = Args::command();
        let bin_name = cmd.get_name().to_string();
        generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
        return;
    }

    // Load configuration file and merge with args
    let config = CliConfig::load();
    config.merge_with_args(&mut args);

    // Determine verbosity level
    let verbosity = if args.quiet {
        Verbosity::Quiet
    } else {
        args.verbosity
    };

    // Set up logging
    if verbosity > Verbosity::Quiet {
        let level = match verbosity {
            Verbosity::Trace => Level::TRACE,
            Verbosity::Debug => Level::DEBUG,
            Verbosity::Verbose => Level::INFO,
            _ => Level::WARN,
        };
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .finish();
        if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
            eprintln!("error: failed to set tracing subscriber: {e}");
            process::exit(1);
        }
    }

    match run(&args) {
        Ok(summary) => {
            let line = match args.format {
                SummaryFormat::Text => Ok(summary.text()),
                SummaryFormat::Json => summary.json(),
            };
            match line {
                Ok(line) => println!("{line}"),
                Err(e) => {
                    eprintln!("error: {}", CliError::from(e));
                    process::exit(1);
                }
            }
        }
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

fn item_count(n: u64) -> CliResult<usize> {
    usize::try_from(n)
        .map_err(|_| CliError::Usage(format!("N_ITEMS {n} exceeds this platform's address space")))
}

/// Generate, certify and write both files; partial files are removed on error.
fn run(args: &Args) -> CliResult<Summary> {
    let (Some(n), Some(max), Some(capacity)) =
        (args.n_items, args.max_item_weight, args.max_weight)
    else {
        return Err(CliError::Usage(
            "N_ITEMS, MAX_ITEM_WEIGHT and MAX_WEIGHT are required".to_string(),
        ));
    };
    let n = item_count(n)?;
    let instance = random_instance(n, max, capacity, args.seed)?;
    info!(items = n, max, capacity, seed = args.seed, "generated instance");

    let result = write_and_certify(args, &instance);
    if result.is_err() {
        for path in [&args.instance, &args.proof] {
            let _ = fs::remove_file(path);
        }
    }
    result
}

fn write_and_certify(args: &Args, instance: &KnapsackInstance) -> CliResult<Summary> {
    let opb = File::create(&args.instance).map_err(CliError::io(&args.instance))?;
    instance
        .write_opb(BufWriter::new(opb))
        .map_err(CliError::io(&args.instance))?;

    let proof = File::create(&args.proof).map_err(CliError::io(&args.proof))?;
    let (certificate, _) =
        Certifier::with_config(args.certify_config()).certify_to(instance, BufWriter::new(proof))?;

    if args.check {
        let reference = instance.reference_optimum();
        if certificate.optimum() != Some(reference) {
            return Err(CliError::Mismatch {
                certified: certificate.optimum(),
                reference,
            });
        }
        info!(reference, "optimum confirmed by reference DP");
    }

    Ok(Summary::new(&certificate, instance.len(), args.seed))
}
