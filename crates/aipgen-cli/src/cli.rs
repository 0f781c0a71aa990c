use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan, Ted Yu, William A. Goddard III, Victor Wai Tak Kam",
    version,
    about = "aipgen - Extracts atom interaction points (AIPs) of small molecules from sampled electrostatic potential isosurfaces.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Footprint a molecule: type its atoms, extract AIPs and summarize the surface.
    Footprint(FootprintArgs),
    /// Print the atom types assigned to every atom of a molecule.
    Types(TypesArgs),
}

/// Arguments for the `footprint` subcommand.
#[derive(Args, Debug)]
pub struct FootprintArgs {
    // --- Inputs ---
    /// Path to the molecule description (TOML with atoms and bonds).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub molecule: PathBuf,

    /// Tight isosurface samples (CSV: x,y,z,potential in Bohr and Hartree).
    #[arg(long, required = true, value_name = "PATH")]
    pub tight: PathBuf,

    /// Middle isosurface samples.
    #[arg(long, required = true, value_name = "PATH")]
    pub middle: PathBuf,

    /// Loose isosurface samples.
    #[arg(long, required = true, value_name = "PATH")]
    pub loose: PathBuf,

    // --- Outputs ---
    /// Path for the AIP table (CSV).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Optional path for the surface statistics (TOML).
    #[arg(long, value_name = "PATH")]
    pub statistics: Option<PathBuf>,

    // --- Configuration ---
    /// Path to a footprint configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Calibration table overrides (TOML). Built-in tables are used when absent.
    #[arg(long, value_name = "PATH")]
    pub tables: Option<PathBuf>,

    /// Surface ownership metric: 'vdw-scaled', 'vdw-offset' or 'euclidean'.
    #[arg(long, value_name = "METRIC")]
    pub ownership: Option<String>,

    /// Sparsity percentile kept by the edge detector.
    #[arg(long, value_name = "FLOAT")]
    pub edge_percentile: Option<f64>,

    /// Seed for the random restarts of the two-cluster split.
    #[arg(long, value_name = "INT")]
    pub random_seed: Option<u64>,

    /// Minority area fraction above which a dual AIP is emitted.
    #[arg(long, value_name = "FLOAT")]
    pub dual_fraction: Option<f64>,

    /// Set a configuration value, overriding the config file (e.g., -S lone-pair.exclusion-radius=1.2).
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", action = clap::ArgAction::Append)]
    pub set_values: Vec<String>,
}

/// Arguments for the `types` subcommand.
#[derive(Args, Debug)]
pub struct TypesArgs {
    /// Path to the molecule description (TOML with atoms and bonds).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub molecule: PathBuf,
}
