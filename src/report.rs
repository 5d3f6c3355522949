/*!
 * Run report: per-job results, folded statistics and the exit decision.
 */

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::file_utils::FileManager;
use crate::translation::RunStatistics;

/// What happened to one (language, file) job
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum JobStatus {
    /// Machine translations were added and the file was written
    Written,
    /// Nothing to add, or a dry run; the file was left alone
    Unchanged,
    /// The job did not run
    Skipped(String),
    /// The job ran and failed
    Failed(String),
}

/// Result of one (language, file) job
#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub language: String,
    pub file: String,
    pub target_path: PathBuf,
    #[serde(flatten)]
    pub status: JobStatus,
    pub stats: RunStatistics,
    /// Keys left without a translation; retried on the next run
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_keys: Vec<String>,
}

impl JobReport {
    pub fn new(language: &str, file: &str, target_path: PathBuf, status: JobStatus, stats: RunStatistics) -> Self {
        Self {
            language: language.to_string(),
            file: file.to_string(),
            target_path,
            status,
            stats,
            failed_keys: Vec::new(),
        }
    }

    pub fn with_failed_keys(mut self, keys: Vec<String>) -> Self {
        self.failed_keys = keys;
        self
    }

    pub fn skipped(language: &str, file: &str, target_path: PathBuf, reason: impl Into<String>) -> Self {
        Self::new(language, file, target_path, JobStatus::Skipped(reason.into()), RunStatistics::default())
    }
}

/// Everything a run did
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub stats: RunStatistics,
    pub files_written: usize,
    pub files_unchanged: usize,
    pub files_skipped: usize,
    pub files_failed: usize,
    pub translation_enabled: bool,
    pub provider: String,
    pub dry_run: bool,
    pub jobs: Vec<JobReport>,
}

impl RunReport {
    pub fn new(translation_enabled: bool, provider: impl Into<String>, dry_run: bool) -> Self {
        Self {
            translation_enabled,
            provider: provider.into(),
            dry_run,
            ..Default::default()
        }
    }

    /// Fold one job into the report
    pub fn record(&mut self, job: JobReport) {
        self.stats += job.stats;
        match job.status {
            JobStatus::Written => self.files_written += 1,
            JobStatus::Unchanged => self.files_unchanged += 1,
            JobStatus::Skipped(_) => self.files_skipped += 1,
            JobStatus::Failed(_) => self.files_failed += 1,
        }
        self.jobs.push(job);
    }

    /// Jobs that actually ran
    pub fn attempted_jobs(&self) -> usize {
        self.jobs.len() - self.files_skipped
    }

    /// Nothing useful happened: every job that ran failed, or every
    /// translation attempt failed
    pub fn is_total_failure(&self) -> bool {
        let attempted = self.attempted_jobs();
        (attempted > 0 && self.files_failed == attempted) || self.stats.all_attempts_failed()
    }

    /// Process exit code for this report
    pub fn exit_code(&self, strict: bool) -> i32 {
        if self.is_total_failure() || (strict && self.files_failed > 0) {
            1
        } else {
            0
        }
    }

    /// Human-readable summary lines
    pub fn summary(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Total processed: {}", self.stats.total_processed),
            format!("MT added: {}", self.stats.mt_added),
            format!("Already translated (skipped): {}", self.stats.skipped),
            format!("Errors: {}", self.stats.errors),
            format!(
                "Files modified: {}{}",
                self.files_written,
                if self.dry_run { " (dry run)" } else { "" }
            ),
        ];
        if self.files_skipped > 0 || self.files_failed > 0 {
            lines.push(format!(
                "Files skipped: {}, failed: {}",
                self.files_skipped, self.files_failed
            ));
        }
        if !self.translation_enabled {
            lines.push("Machine translation disabled: no provider credential".to_string());
        }
        lines
    }

    /// Write the report as pretty JSON
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize run report")?;
        FileManager::write_atomic(path, &json)
            .with_context(|| format!("Failed to write run report: {}", path.display()))
    }
}
