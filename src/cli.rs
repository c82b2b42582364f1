//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Resolve specimen records into AntWeb reference images and download them.
///
/// Reads a workbook or CSV/TSV export with `Genus`, `Species` and
/// `Sub_Species` columns and stores one image per row as
/// `<output>/images/<row>.tif`. Re-running skips rows whose image already
/// exists.
#[derive(Parser, Debug)]
#[command(name = "antweb-scraper")]
#[command(author, version, about)]
pub struct Args {
    /// Specimen table: a workbook (.xlsx, .xls, .ods; first sheet) or comma/tab separated UTF-8 text, header row required
    pub input: PathBuf,

    /// Output root directory (images are written to <OUTPUT_DIR>/images)
    #[arg(short = 'o', long)]
    pub output_dir: Option<PathBuf>,

    /// AntWeb site root (e.g. https://antweb.org)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Config file path (defaults to $XDG_CONFIG_HOME/antweb-scraper/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write a JSON attribution sidecar next to each image downloaded in this run; images already on disk are skipped without lookups and get none
    #[arg(long)]
    pub sidecar: bool,

    /// First data row to process (0-based)
    #[arg(long, default_value_t = 0)]
    pub start: usize,

    /// Maximum number of rows to process
    #[arg(long)]
    pub limit: Option<usize>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}
