//! CLI argument definitions for wfmerge

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "wfmerge")]
#[command(about = "Warframe, archwing and necramech data merger", long_about = None)]
pub struct Cli {
    /// Log at debug level (RUST_LOG still takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge every source into one document
    #[command(visible_alias = "m")]
    Merge(MergeArgs),

    /// Summarize a merged document or print one entity
    #[command(visible_alias = "i")]
    Inspect {
        /// Merged document (defaults to the configured output)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print the entity with this name or slug
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Configure default settings
    #[command(visible_alias = "c")]
    Configure {
        /// Set the default data directory
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Set the default output file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

/// Arguments for `wfmerge merge`. Per-source flags override the file
/// normally found in the data directory.
#[derive(Args, Debug, Default)]
pub struct MergeArgs {
    /// Directory holding the source files
    #[arg(short, long, env = "WFMERGE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Output file (defaults to <DATA_DIR>/merged_warframe.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Primary public export
    #[arg(long)]
    pub primary: Option<PathBuf>,

    /// Scraped wiki metadata
    #[arg(long)]
    pub supplement: Option<PathBuf>,

    /// Ability detail dataset
    #[arg(long)]
    pub details: Option<PathBuf>,

    /// Per-frame ability metadata
    #[arg(long)]
    pub frame_index: Option<PathBuf>,

    /// Ability names by frame
    #[arg(long)]
    pub name_lists: Option<PathBuf>,

    /// Polarity fallback table
    #[arg(long)]
    pub polarities: Option<PathBuf>,

    /// Manual override table
    #[arg(long)]
    pub overrides: Option<PathBuf>,

    /// Progenitor element table
    #[arg(long)]
    pub lineage: Option<PathBuf>,
}
