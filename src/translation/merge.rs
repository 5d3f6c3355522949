/*!
 * Diff and merge of a source dictionary into a target dictionary.
 *
 * For every source key, in source order, the engine decides whether the
 * target already has a translation, whether the entry can be translated at
 * all, or whether it is a candidate for machine translation. Candidates are
 * translated on a bounded pool and successful results are filled into the
 * target. Human content is never overwritten and target-only keys are never
 * removed.
 */

use futures::stream::{self, StreamExt};
use log::{debug, info};

use crate::resources::{DictionaryEntry, ResourceDictionary};
use super::core::TranslationService;
use super::outcome::{EntryOutcome, FailureReason, SkipReason, TranslationOutcome};
use super::stats::RunStatistics;

/// Result of reconciling one (source, target) pair
#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    /// The updated target dictionary
    pub dictionary: ResourceDictionary,
    /// Counters for this pair
    pub stats: RunStatistics,
    /// Whether any entry was filled
    pub modified: bool,
    /// One outcome per source entry, in source order
    pub outcomes: Vec<EntryOutcome>,
}

/// Decides candidates and fills machine translations
#[derive(Debug, Clone, Copy)]
pub struct MergeEngine {
    concurrency: usize,
}

impl Default for MergeEngine {
    fn default() -> Self {
        Self::new(4)
    }
}

/// Classification of a source entry before any provider call
enum Plan<'a> {
    Skip(SkipReason),
    Translate(&'a DictionaryEntry),
}

impl MergeEngine {
    /// Create an engine issuing at most `concurrency` provider calls at once
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }

    fn plan<'a>(source_entry: &'a DictionaryEntry, target: &ResourceDictionary) -> Plan<'a> {
        if target.get(&source_entry.key).is_some_and(DictionaryEntry::has_content) {
            return Plan::Skip(SkipReason::AlreadyTranslated);
        }
        if !source_entry.translatable {
            return Plan::Skip(SkipReason::NotTranslatable);
        }
        if !source_entry.has_content() {
            return Plan::Skip(SkipReason::EmptySource);
        }
        Plan::Translate(source_entry)
    }

    /// Reconcile `target` against `source` for `target_language`
    pub async fn reconcile(
        &self,
        source: &ResourceDictionary,
        mut target: ResourceDictionary,
        target_language: &str,
        service: &TranslationService,
    ) -> ReconcileOutcome {
        let mut stats = RunStatistics::default();
        let plans: Vec<Plan> = source.entries().map(|e| Self::plan(e, &target)).collect();

        for plan in &plans {
            match plan {
                Plan::Skip(SkipReason::AlreadyTranslated) => stats.skipped += 1,
                Plan::Skip(_) => {}
                Plan::Translate(_) => stats.total_processed += 1,
            }
        }

        debug!(
            "{} [{}]: {} candidate(s), {} already translated",
            target.file_name(),
            target_language,
            stats.total_processed,
            stats.skipped
        );

        // buffered() keeps results in source order
        let outcomes: Vec<EntryOutcome> = stream::iter(plans)
            .map(|plan| async move {
                match plan {
                    Plan::Skip(reason) => (None, TranslationOutcome::Skipped(reason)),
                    Plan::Translate(entry) => {
                        if !service.is_enabled() {
                            return (Some(entry), TranslationOutcome::Failure(FailureReason::Unavailable));
                        }
                        match service.translate(&entry.text, target_language).await {
                            Some(text) => (Some(entry), TranslationOutcome::Success(text)),
                            None => (
                                Some(entry),
                                TranslationOutcome::Failure(FailureReason::Provider(format!(
                                    "no translation from {}",
                                    service.provider_name()
                                ))),
                            ),
                        }
                    }
                }
            })
            .buffered(self.concurrency)
            .collect::<Vec<_>>()
            .await
            .into_iter()
            .zip(source.keys())
            .map(|((entry, outcome), key)| {
                match (&outcome, entry) {
                    (TranslationOutcome::Success(text), Some(entry)) => {
                        target.fill_translation(entry, text.clone());
                        stats.mt_added += 1;
                    }
                    (TranslationOutcome::Failure(FailureReason::Provider(_)), _) => stats.errors += 1,
                    _ => {}
                }
                EntryOutcome::new(key, outcome)
            })
            .collect();

        let modified = stats.mt_added > 0;
        if modified || stats.errors > 0 {
            info!(
                "{} [{}]: {} machine translation(s) added, {} error(s)",
                target.file_name(),
                target_language,
                stats.mt_added,
                stats.errors
            );
        }

        ReconcileOutcome {
            dictionary: target,
            stats,
            modified,
            outcomes,
        }
    }
}
