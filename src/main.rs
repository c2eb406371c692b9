use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod batch;
mod bg_remove;
mod report;

use batch::BatchConfig;

#[derive(Debug, Parser)]
#[clap(
    name = "icon-clean",
    about = "Make the near-white background of numbered PNG icons transparent"
)]
struct Args {
    /// Directory containing the icons.
    #[clap(value_name = "DIR", default_value = ".")]
    dir: PathBuf,

    /// File name pattern. `{i}` is replaced by the index.
    #[clap(long, value_name = "PATTERN", default_value = "mountain-{i}.png")]
    pattern: String,

    /// First index to process.
    #[clap(long, value_name = "N", default_value_t = 1)]
    start: u32,

    /// Last index to process (inclusive).
    #[clap(long, value_name = "N", default_value_t = 9)]
    end: u32,

    /// Pixels with red, green and blue all above this value become transparent.
    #[clap(short, long, value_name = "0-255", default_value_t = bg_remove::DEFAULT_THRESHOLD)]
    threshold: u8,

    /// Backup directory for the originals. Relative paths are resolved against DIR.
    #[clap(long, value_name = "DIR", default_value = "backup")]
    backup_dir: PathBuf,

    /// Write a JSON summary of the run to this file.
    #[clap(long, value_name = "FILE")]
    report: Option<PathBuf>,
}

impl Args {
    fn batch_config(&self) -> BatchConfig {
        BatchConfig {
            dir: self.dir.clone(),
            pattern: self.pattern.clone(),
            start: self.start,
            end: self.end,
            threshold: self.threshold,
            // join keeps an absolute backup_dir as is
            backup_dir: self.dir.join(&self.backup_dir),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let report = batch::process_batch(&args.batch_config())?;

    if let Some(path) = &args.report {
        report.write_to_file(path)?;
    }

    Ok(())
}
