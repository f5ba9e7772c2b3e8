//! Optional YAML configuration file.

use crate::generate::DEFAULT_SEED;
use crate::{Args, DEFAULT_DELETION_LAG, DEFAULT_INSTANCE, DEFAULT_PROOF, SummaryFormat, Verbosity};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Default verbosity level
    #[serde(default)]
    pub verbosity: Option<String>,
    /// Default random seed
    #[serde(default)]
    pub seed: Option<u64>,
    /// Default instance file
    #[serde(default)]
    pub instance: Option<PathBuf>,
    /// Default proof file
    #[serde(default)]
    pub proof: Option<PathBuf>,
    /// Prune dominated states
    #[serde(default)]
    pub dominance: Option<bool>,
    /// Deletion lag (0 disables deletion)
    #[serde(default)]
    pub deletion_lag: Option<usize>,
    /// Summary format (`text` or `json`)
    #[serde(default)]
    pub format: Option<String>,
}

impl CliConfig {
    /// Candidate locations, most specific first.
    pub fn candidates() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(mut p) = dirs::home_dir() {
            p.push(".knapcertrc");
            paths.push(p);
        }
        if let Some(mut p) = dirs::config_dir() {
            p.push("knapcert");
            p.push("config.yaml");
            paths.push(p);
        }
        paths
    }

    /// Load configuration from the first existing candidate file
    pub fn load() -> Self {
        Self::candidates()
            .iter()
            .find(|p| p.exists())
            .map_or_else(Self::default, |p| Self::load_from(p))
    }

    /// Load configuration from `path`; a malformed file is reported and ignored
    pub fn load_from(path: &Path) -> Self {
        let parsed = fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|contents| serde_yaml::from_str(&contents).map_err(|e| e.to_string()));
        match parsed {
            Ok(config) => config,
            Err(e) => {
                eprintln!("warning: ignoring config {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Merge configuration with command-line arguments
    pub fn merge_with_args(&self, args: &mut Args) {
        // Only apply config if arg is not explicitly set
        if args.verbosity == Verbosity::Normal
            && let Some(ref v) = self.verbosity
        {
            match v.as_str() {
                "quiet" => args.verbosity = Verbosity::Quiet,
                "verbose" => args.verbosity = Verbosity::Verbose,
                "debug" => args.verbosity = Verbosity::Debug,
                "trace" => args.verbosity = Verbosity::Trace,
                _ => {}
            }
        }

        if let Some(seed) = self.seed
            && args.seed == DEFAULT_SEED
        {
            args.seed = seed;
        }

        if let Some(ref path) = self.instance
            && args.instance == Path::new(DEFAULT_INSTANCE)
        {
            args.instance = path.clone();
        }

        if let Some(ref path) = self.proof
            && args.proof == Path::new(DEFAULT_PROOF)
        {
            args.proof = path.clone();
        }

        if self.dominance == Some(false) && !args.dominance {
            args.no_dominance = true;
        }

        if let Some(lag) = self.deletion_lag
            && args.deletion_lag == DEFAULT_DELETION_LAG
        {
            args.deletion_lag = lag;
        }

        if args.format == SummaryFormat::Text && self.format.as_deref() == Some("json") {
            args.format = SummaryFormat::Json;
        }
    }
}
