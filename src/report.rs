//! Summary of a batch run
//!
//! The batch driver records one entry per index it visits. The report can be
//! written out as JSON so scripts do not have to scrape the console output.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// What happened to a single file
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileOutcome {
    /// Backed up and overwritten with the cleaned image
    Processed,
    /// The file does not exist
    Skipped,
    /// Something failed while opening, cleaning or saving
    Failed { error: String },
}

/// One visited index
#[derive(Serialize, Debug, Clone)]
pub struct FileEntry {
    pub index: u32,
    pub file: String,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

/// Totals, included in the JSON output
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Serialize, Debug, Clone)]
pub struct BatchReport {
    pub threshold: u8,
    pub backup_dir: PathBuf,
    pub files: Vec<FileEntry>,
}

#[derive(Serialize)]
struct ReportFile<'a> {
    #[serde(flatten)]
    report: &'a BatchReport,
    totals: Totals,
}

impl BatchReport {
    pub fn new(threshold: u8, backup_dir: PathBuf) -> Self {
        Self {
            threshold,
            backup_dir,
            files: Vec::new(),
        }
    }

    pub fn push(&mut self, index: u32, file: String, outcome: FileOutcome) {
        self.files.push(FileEntry {
            index,
            file,
            outcome,
        });
    }

    pub fn processed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Processed))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Failed { .. }))
    }

    pub fn totals(&self) -> Totals {
        Totals {
            processed: self.processed(),
            skipped: self.skipped(),
            failed: self.failed(),
        }
    }

    fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.files.iter().filter(|e| pred(&e.outcome)).count()
    }

    /// Serialize the report to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        let file = ReportFile {
            report: self,
            totals: self.totals(),
        };
        serde_json::to_string_pretty(&file).context("Failed to serialize batch report")
    }

    /// Write the report as JSON to the given path
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        println!("✓ Wrote report to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> BatchReport {
        let mut report = BatchReport::new(240, PathBuf::from("assets/backup"));
        report.push(1, "mountain-1.png".to_string(), FileOutcome::Processed);
        report.push(2, "mountain-2.png".to_string(), FileOutcome::Skipped);
        report.push(
            3,
            "mountain-3.png".to_string(),
            FileOutcome::Failed {
                error: "Failed to open image".to_string(),
            },
        );
        report.push(4, "mountain-4.png".to_string(), FileOutcome::Processed);
        report
    }

    #[test]
    fn test_counts() {
        let report = sample_report();
        assert_eq!(report.processed(), 2);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(
            report.totals(),
            Totals {
                processed: 2,
                skipped: 1,
                failed: 1
            }
        );
    }

    #[test]
    fn test_empty_report() {
        let report = BatchReport::new(200, PathBuf::from("backup"));
        assert_eq!(report.processed(), 0);
        assert_eq!(report.skipped(), 0);
        assert_eq!(report.failed(), 0);
    }

    #[test]
    fn test_json_layout() {
        let json = sample_report().to_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["threshold"], 240);
        assert_eq!(parsed["backup_dir"], "assets/backup");
        assert_eq!(parsed["totals"]["processed"], 2);
        assert_eq!(parsed["totals"]["skipped"], 1);
        assert_eq!(parsed["totals"]["failed"], 1);

        let files = parsed["files"].as_array().unwrap();
        assert_eq!(files.len(), 4);
        assert_eq!(files[0]["index"], 1);
        assert_eq!(files[0]["file"], "mountain-1.png");
        assert_eq!(files[0]["status"], "processed");
        assert_eq!(files[1]["status"], "skipped");
        assert!(files[1].get("error").is_none());
        assert_eq!(files[2]["status"], "failed");
        assert_eq!(files[2]["error"], "Failed to open image");
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("report.json");

        sample_report().write_to_file(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["files"].as_array().unwrap().len(), 4);
    }
}
