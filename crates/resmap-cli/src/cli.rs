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
    about = "resmap - Maps canonical chain sequences onto the residues that carry coordinates.",
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

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute sequence-to-structure correspondences for one or more residue stores.
    Map(MapArgs),
    /// Print the alpha-carbon coordinates of a contiguous range of sequence positions.
    Slice(SliceArgs),
}

/// Options shared by every command that computes correspondences.
#[derive(Args, Debug, Clone, Default)]
pub struct EngineArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the alignment gap-open penalty (a non-positive score).
    #[arg(long, value_name = "INT", allow_hyphen_values = true)]
    pub gap_open: Option<i32>,

    /// Override the alignment gap-extension penalty (a non-positive score).
    #[arg(long, value_name = "INT", allow_hyphen_values = true)]
    pub gap_extend: Option<i32>,

    /// Override the atom used as each residue's position.
    #[arg(long, value_name = "NAME")]
    pub ca_atom: Option<String>,
}

/// Arguments for the `map` subcommand.
#[derive(Args, Debug)]
pub struct MapArgs {
    /// Residue store files to process (TOML, optionally gzip-compressed).
    #[arg(short, long, required = true, num_args = 1.., value_name = "PATH")]
    pub input: Vec<PathBuf>,

    /// Directory receiving one CSV report per input.
    /// Without it, a summary line per chain and model is printed.
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub engine: EngineArgs,
}

/// Arguments for the `slice` subcommand.
#[derive(Args, Debug)]
pub struct SliceArgs {
    /// Residue store file to read.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Chain identifier.
    #[arg(long, value_name = "CHAR")]
    pub chain: char,

    /// Model number. Defaults to the chain's first model.
    #[arg(short, long, value_name = "INT")]
    pub model: Option<i32>,

    /// First sequence position of the range (0-based, inclusive).
    #[arg(long, value_name = "INT")]
    pub start: usize,

    /// End of the range (0-based, exclusive).
    #[arg(long, value_name = "INT")]
    pub end: usize,

    #[command(flatten)]
    pub engine: EngineArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_accepts_multiple_inputs_and_negative_penalties() {
        let cli = Cli::parse_from([
            "resmap", "map", "-i", "a.toml", "b.toml.gz", "--gap-open", "-12", "-vv",
        ]);
        assert_eq!(cli.verbose, 2);
        let Commands::Map(args) = cli.command else {
            panic!("Expected 'map' subcommand");
        };
        assert_eq!(args.input.len(), 2);
        assert_eq!(args.engine.gap_open, Some(-12));
        assert!(args.output.is_none());
    }

    #[test]
    fn slice_parses_range_and_selection() {
        let cli = Cli::parse_from([
            "resmap", "slice", "-i", "a.toml", "--chain", "B", "--start", "3", "--end", "9",
            "-j", "2",
        ]);
        assert_eq!(cli.threads, Some(2));
        let Commands::Slice(args) = cli.command else {
            panic!("Expected 'slice' subcommand");
        };
        assert_eq!((args.chain, args.model, args.start, args.end), ('B', None, 3, 9));
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["resmap", "-q", "-v", "map", "-i", "a.toml"]);
        assert!(result.is_err());
    }
}
