use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{debug, error, info, warn};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::language_utils::get_language_name;
use crate::report::{JobReport, JobStatus, RunReport};
use crate::resources::{parser, validator, writer, ResourceDictionary};
use crate::translation::{MergeEngine, RunStatistics, TranslationService};

// @module: Application controller for resource synchronization

/// One (language, file) unit of work
#[derive(Debug, Clone)]
struct Job {
    language: String,
    file: String,
    source_path: PathBuf,
    target_path: PathBuf,
}

/// Single-writer guard per target path
#[derive(Debug, Default)]
struct PathLocks {
    locks: Mutex<HashMap<PathBuf, Arc<tokio::sync::Mutex<()>>>>,
}

impl PathLocks {
    fn lock_for(&self, path: &Path) -> Arc<tokio::sync::Mutex<()>> {
        self.locks
            .lock()
            .entry(path.to_path_buf())
            .or_default()
            .clone()
    }
}

/// Outcome of validating, parsing and merging a job, before any write
enum Prepared {
    Skip(String),
    Merge {
        source: ResourceDictionary,
        target: ResourceDictionary,
    },
}

/// Main application controller for dictionary synchronization
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Shared translation capability
    service: TranslationService,
    // @field: Per-path write locks
    locks: PathLocks,
}

impl Controller {
    // @method: Create a controller with the service the config asks for
    pub fn with_config(config: Config) -> Result<Self> {
        let service = TranslationService::from_config(&config.translation)
            .context("Failed to create translation service")?;
        Ok(Self::with_service(config, service))
    }

    // @method: Create a controller with an explicit service
    pub fn with_service(config: Config, service: TranslationService) -> Self {
        Self {
            config,
            service,
            locks: PathLocks::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn service(&self) -> &TranslationService {
        &self.service
    }

    /// Run every (language, file) job and fold the results
    pub async fn run(&self) -> Result<RunReport> {
        let start_time = Instant::now();
        let mut report = RunReport::new(
            self.service.is_enabled(),
            self.service.provider_name(),
            self.config.dry_run,
        );

        let files = self.dictionary_files()?;
        if files.is_empty() {
            warn!("No dictionary files found in {:?}", self.config.source_dir());
            return Ok(report);
        }

        let jobs = self.plan_jobs(&files, &mut report);
        info!(
            "Synchronizing {} file(s) across {} job(s) using {}",
            files.len(),
            jobs.len(),
            self.service.provider_name()
        );

        let progress_bar = Self::progress_bar(jobs.len() as u64);
        let engine = MergeEngine::new(self.config.translation.concurrent_requests);

        let results: Vec<JobReport> = stream::iter(jobs)
            .map(|job| {
                let pb = progress_bar.clone();
                async move {
                    pb.set_message(format!("{} [{}]", job.file, job.language));
                    let result = self.run_job(&job, &engine).await;
                    pb.inc(1);
                    result
                }
            })
            .buffered(self.config.translation.concurrent_files)
            .collect()
            .await;

        progress_bar.finish_and_clear();

        for job in results {
            report.record(job);
        }

        for line in report.summary() {
            info!("{}", line);
        }
        if self.service.is_enabled() {
            info!(
                "{} translation request(s), {} without a usable result",
                self.service.call_count(),
                self.service.failure_count()
            );
        }
        info!("Finished in {}", Self::format_duration(start_time.elapsed()));

        Ok(report)
    }

    /// Check every source and target dictionary without modifying anything
    ///
    /// Returns the files that are not well-formed.
    pub fn validate_all(&self) -> Result<Vec<PathBuf>> {
        let mut broken = Vec::new();
        let files = self.dictionary_files()?;

        let mut dirs = vec![self.config.source_dir()];
        dirs.extend(self.config.target_languages().iter().map(|l| self.config.target_dir(l)));

        for dir in dirs {
            for file in &files {
                let path = dir.join(file);
                if !FileManager::file_exists(&path) {
                    continue;
                }
                match validator::check_file(&path) {
                    Ok(()) => debug!("OK: {}", path.display()),
                    Err(e) => {
                        error!("{}", e);
                        broken.push(path);
                    }
                }
            }
        }

        Ok(broken)
    }

    // @method: Configured file names, or every resource file in the source dir
    fn dictionary_files(&self) -> Result<Vec<String>> {
        if !self.config.string_files.is_empty() {
            return Ok(self.config.string_files.clone());
        }
        let source_dir = self.config.source_dir();
        if !FileManager::dir_exists(&source_dir) {
            return Ok(Vec::new());
        }
        FileManager::find_resource_files(&source_dir)
            .with_context(|| format!("Failed to list dictionaries in {:?}", source_dir))
    }

    // @method: Apply the directory convention; record skips for missing inputs
    fn plan_jobs(&self, files: &[String], report: &mut RunReport) -> Vec<Job> {
        let mut jobs = Vec::new();
        let source_dir = self.config.source_dir();

        for language in self.config.target_languages() {
            match get_language_name(&language) {
                Ok(name) => debug!("Planning '{}' ({})", language, name),
                Err(_) => warn!("'{}' is not a recognised language qualifier", language),
            }
            let target_dir = self.config.target_dir(&language);
            if !FileManager::dir_exists(&target_dir) && !self.config.create_missing_targets {
                warn!("Target directory {:?} does not exist, skipping '{}'", target_dir, language);
                for file in files {
                    report.record(JobReport::skipped(&language, file, target_dir.join(file), "target directory missing"));
                }
                continue;
            }

            for file in files {
                let source_path = source_dir.join(file);
                let target_path = target_dir.join(file);

                if !FileManager::file_exists(&source_path) {
                    warn!("Source file {:?} does not exist, skipping", source_path);
                    report.record(JobReport::skipped(&language, file, target_path, "source file missing"));
                    continue;
                }
                if !FileManager::file_exists(&target_path) && !self.config.create_missing_targets {
                    warn!("Target file {:?} does not exist, skipping", target_path);
                    report.record(JobReport::skipped(&language, file, target_path, "target file missing"));
                    continue;
                }

                jobs.push(Job {
                    language: language.clone(),
                    file: file.clone(),
                    source_path,
                    target_path,
                });
            }
        }

        jobs
    }

    // @method: Validate, parse, reconcile, write and re-validate one job
    async fn run_job(&self, job: &Job, engine: &MergeEngine) -> JobReport {
        let lock = self.locks.lock_for(&job.target_path);
        let _guard = lock.lock().await;

        let report = |status: JobStatus, stats: RunStatistics| {
            JobReport::new(&job.language, &job.file, job.target_path.clone(), status, stats)
        };

        let (source, target) = match self.prepare(job) {
            Ok(Prepared::Merge { source, target }) => (source, target),
            Ok(Prepared::Skip(reason)) => return report(JobStatus::Skipped(reason), RunStatistics::default()),
            Err(e) => {
                error!("{} [{}]: {:#}", job.file, job.language, e);
                return report(JobStatus::Failed(format!("{:#}", e)), RunStatistics::default());
            }
        };

        let outcome = engine.reconcile(&source, target, &job.language, &self.service).await;
        let stats = outcome.stats;

        let failed_keys: Vec<String> = outcome
            .outcomes
            .iter()
            .filter(|o| o.outcome.is_failure())
            .map(|o| o.key.clone())
            .collect();
        if self.service.is_enabled() && !failed_keys.is_empty() {
            warn!(
                "{} [{}]: no translation for {}",
                job.file,
                job.language,
                failed_keys.join(", ")
            );
        }
        let finish = |status: JobStatus, stats: RunStatistics| report(status, stats).with_failed_keys(failed_keys.clone());

        if !outcome.modified {
            debug!("{} [{}]: nothing to write", job.file, job.language);
            return finish(JobStatus::Unchanged, stats);
        }

        if self.config.dry_run {
            info!(
                "{} [{}]: dry run, {} translation(s) not written",
                job.file, job.language, stats.mt_added
            );
            return finish(JobStatus::Unchanged, stats);
        }

        if let Err(e) = writer::write(&outcome.dictionary, &job.target_path) {
            error!("{}", e);
            return finish(JobStatus::Failed(e.to_string()), stats);
        }

        if let Err(e) = validator::check_file(&job.target_path) {
            error!("Written file failed validation: {}", e);
            return finish(JobStatus::Failed(e.to_string()), stats);
        }

        info!("Updated {}", job.target_path.display());
        finish(JobStatus::Written, stats)
    }

    // @method: Pre-validate and parse both sides of a job
    fn prepare(&self, job: &Job) -> Result<Prepared> {
        if !validator::is_well_formed(&job.source_path) {
            return Ok(Prepared::Skip("source file is not well-formed".to_string()));
        }
        let source = parser::parse(&job.source_path, &self.config.source_dir_name)?;

        let target = if FileManager::file_exists(&job.target_path) {
            if !validator::is_well_formed(&job.target_path) {
                return Ok(Prepared::Skip("target file is not well-formed".to_string()));
            }
            parser::parse(&job.target_path, &job.language)?
        } else {
            info!("Creating {:?}", job.target_path);
            ResourceDictionary::new(job.language.clone(), job.target_path.clone())
        };

        Ok(Prepared::Merge { source, target })
    }

    fn progress_bar(len: u64) -> ProgressBar {
        let progress_bar = ProgressBar::new(len);
        if !std::io::stderr().is_terminal() {
            progress_bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("=> "));
        progress_bar
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;

        if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
