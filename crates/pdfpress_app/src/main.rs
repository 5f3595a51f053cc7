mod app;
mod effects;
mod settings;

use std::path::PathBuf;

use clap::Parser;

/// Batch-exports web pages into per-language PDF files under a dated
/// desktop folder.
#[derive(Parser, Debug)]
#[command(name = "pdfpress", version, about = "Batch-export web pages to per-language PDFs")]
pub struct Cli {
    /// Target URLs to export, processed in order.
    pub urls: Vec<String>,

    /// Read additional URLs from a file, one per line.
    #[arg(long)]
    pub url_file: Option<PathBuf>,

    /// Root for the AutoGeneratePDF output tree (defaults to the desktop).
    #[arg(long)]
    pub output_root: Option<PathBuf>,

    /// RON profile overriding the variant table and timing knobs.
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Log to file only, keeping the terminal for progress output.
    #[arg(long)]
    pub quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    app::run(cli)
}
