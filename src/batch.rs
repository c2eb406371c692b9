use crate::bg_remove::remove_white_background;
use crate::report::{BatchReport, FileOutcome};
use anyhow::{Context, Result};
use image::{io::Reader as ImageReader, DynamicImage, ImageOutputFormat};
use std::{
    fs::{create_dir_all, File},
    io::BufWriter,
    path::{Path, PathBuf},
};

/// Placeholder in the file name pattern that is replaced by the index
pub const INDEX_PLACEHOLDER: &str = "{i}";

#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Directory containing the icons
    pub dir: PathBuf,
    /// File name pattern, e.g. `mountain-{i}.png`
    pub pattern: String,
    /// First index (inclusive)
    pub start: u32,
    /// Last index (inclusive)
    pub end: u32,
    pub threshold: u8,
    /// Where the untouched originals are copied to
    pub backup_dir: PathBuf,
}

impl BatchConfig {
    pub fn file_name(&self, index: u32) -> String {
        self.pattern.replace(INDEX_PLACEHOLDER, &index.to_string())
    }

    pub fn validate(&self) -> Result<()> {
        if !self.pattern.contains(INDEX_PLACEHOLDER) {
            anyhow::bail!(
                "File name pattern must contain the {} placeholder: {}",
                INDEX_PLACEHOLDER,
                self.pattern
            );
        }
        if self.start > self.end {
            anyhow::bail!("Empty index range: {}..={}", self.start, self.end);
        }
        Ok(())
    }
}

/// Clean every icon in the configured range
///
/// Missing files are skipped and per-file errors are reported without
/// stopping the batch. Only configuration errors and a backup directory that
/// can't be created, or that resolves to the icon directory, abort the run.
pub fn process_batch(config: &BatchConfig) -> Result<BatchReport> {
    config.validate()?;

    println!("Removing backgrounds from icons in {}...", config.dir.display());

    create_dir_all(&config.backup_dir).with_context(|| {
        format!(
            "Can't create backup directory {}",
            config.backup_dir.display()
        )
    })?;

    if same_path(&config.dir, &config.backup_dir) {
        anyhow::bail!(
            "Backup directory {} is the icon directory; originals would be overwritten",
            config.backup_dir.display()
        );
    }

    let mut report = BatchReport::new(config.threshold, config.backup_dir.clone());

    for index in config.start..=config.end {
        let file_name = config.file_name(index);
        let input_path = config.dir.join(&file_name);

        if !input_path.exists() {
            println!("⚠ File not found: {}", input_path.display());
            report.push(index, file_name, FileOutcome::Skipped);
            continue;
        }

        println!("Processing {file_name}...");

        let backup_path = config.backup_dir.join(&file_name);
        match process_file(&input_path, &backup_path, config.threshold) {
            Ok(()) => {
                println!("  ✓ Processed {file_name}");
                report.push(index, file_name, FileOutcome::Processed);
            }
            Err(err) => {
                eprintln!("✗ Failed to process {file_name}: {err:#}");
                report.push(
                    index,
                    file_name,
                    FileOutcome::Failed {
                        error: format!("{err:#}"),
                    },
                );
            }
        }
    }

    println!(
        "Done: {} processed, {} skipped, {} failed",
        report.processed(),
        report.skipped(),
        report.failed()
    );
    println!("Originals saved in: {}", config.backup_dir.display());

    Ok(report)
}

/// Clean a single icon: back up the original, then overwrite it
///
/// There is no rollback. If the overwrite fails after the backup was written,
/// the backup is the only intact copy.
pub fn process_file(path: &Path, backup_path: &Path, threshold: u8) -> Result<()> {
    if is_same_file(path, backup_path) {
        anyhow::bail!("Backup path {} is the input file", backup_path.display());
    }

    let source = load_image(path)?;

    let cleaned = remove_white_background(&source, threshold);

    std::fs::copy(path, backup_path)
        .with_context(|| format!("Failed to write backup {}", backup_path.display()))?;

    save_png(&DynamicImage::ImageRgba8(cleaned), path)
}

/// Decode an image, detecting the format from its content rather than the extension
fn load_image(path: &Path) -> Result<DynamicImage> {
    ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .context("Failed to load image")?
        .decode()
        .context("Failed to load image")
}

/// Both paths exist and resolve to the same location
fn same_path(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// `backup` may not exist yet, so compare through its parent directory
fn is_same_file(path: &Path, backup: &Path) -> bool {
    if same_path(path, backup) {
        return true;
    }
    match (backup.parent(), backup.file_name()) {
        (Some(parent), Some(name)) => {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            same_path(path, &parent.join(name))
        }
        _ => false,
    }
}

fn save_png(image: &DynamicImage, path: &Path) -> Result<()> {
    let file = File::create(path).context("Failed to create PNG file")?;
    let mut writer = BufWriter::new(file);
    image
        .write_to(&mut writer, ImageOutputFormat::Png)
        .context("Failed to write PNG")?;
    Ok(())
}
