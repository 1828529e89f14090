use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod error;

use config::Config;
use error::{print_error_and_exit, CliError};

#[derive(Parser)]
#[command(name = "isovis")]
#[command(about = "isovis - gene isoform layout engine")]
#[command(version)]
#[command(long_about = "
isovis lays out the isoforms of a gene for plotting: it merges exons into a
metagene, classifies splice junctions as constitutive or alternative, shrinks
introns and maps genomic and protein coordinates onto screen pixels. RNA
modification sites and their levels can be placed on the same axis.

Examples:
  isovis layout --input isoforms.json --out layout.json --width 800
  isovis layout --input isoforms.json.gz --zoom 1200-5400 --no-shrink
  isovis layout --input isoforms.json --sites m6a.bed --gene ENSG00000186092 --levels m6a.csv
  isovis junctions --input isoforms.json
  isovis protein --input isoforms.json --isoform ENST00000335137 --features domains.json
  isovis config --example --out isovis.toml
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a gene layout and write it as JSON
    Layout {
        /// Isoform record file (JSON, optionally .gz)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Plot width in pixels
        #[arg(long)]
        width: Option<f64>,

        /// Genomic window to show, as START-END
        #[arg(long)]
        zoom: Option<String>,

        /// Keep introns at genomic scale
        #[arg(long)]
        no_shrink: bool,

        /// Draw coordinates decreasing from left to right
        #[arg(long)]
        descending: bool,

        /// RNA modification sites (BED4 to BED9 or BED12)
        #[arg(long)]
        sites: Option<PathBuf>,

        /// Gene id whose modification sites and levels are kept
        #[arg(long)]
        gene: Option<String>,

        /// Per-sample modification levels (.csv, .tsv or .txt)
        #[arg(long, requires = "sites")]
        levels: Option<PathBuf>,
    },

    /// Print splice junctions with their classification and arc heights
    Junctions {
        /// Isoform record file (JSON, optionally .gz)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Project protein domains and motifs onto one isoform
    Protein {
        /// Isoform record file (JSON, optionally .gz)
        #[arg(short, long)]
        input: PathBuf,

        /// Id of the coding isoform
        #[arg(long)]
        isoform: String,

        /// Protein annotation file (JSON)
        #[arg(long)]
        features: PathBuf,

        /// Plot width in pixels
        #[arg(long)]
        width: Option<f64>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Print or write the configuration file
    Config {
        /// Use the default configuration instead of the loaded one
        #[arg(long)]
        example: bool,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn setup_logging(verbose: u8, quiet: bool) -> Result<()> {
    if quiet {
        std::env::set_var("RUST_LOG", "error");
    } else {
        let level = match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        std::env::set_var("RUST_LOG", level);
    }

    env_logger::Builder::from_default_env()
        .format_timestamp_secs()
        .init();

    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Layout {
            input,
            out,
            width,
            zoom,
            no_shrink,
            descending,
            sites,
            gene,
            levels,
        } => {
            let flags = commands::layout::AxisFlags {
                width,
                zoom,
                no_shrink,
                descending,
            };
            let site_inputs = commands::layout::SiteInputs { sites, gene, levels };
            commands::layout::execute(&config, input, out, flags, site_inputs)?;
        }

        Commands::Junctions { input } => {
            commands::junctions::execute(&config, input)?;
        }

        Commands::Protein {
            input,
            isoform,
            features,
            width,
            out,
        } => {
            commands::protein::execute(&config, input, isoform, features, width, out)?;
        }

        Commands::Config { example, out } => {
            commands::config::execute(&config, example, out)?;
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet)?;

    if let Err(err) = run(cli) {
        if let Some(cli_err) = err.downcast_ref::<CliError>() {
            print_error_and_exit(cli_err);
        }
        return Err(err);
    }

    Ok(())
}
