use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// Counters for one reconciliation, or a whole run once folded
///
/// A plain value: each reconciliation returns its own and the caller sums
/// them, so no counter is ever shared between tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatistics {
    /// Candidates sent (or offered) to the translation service
    pub total_processed: usize,
    /// Entries filled with a machine translation
    pub mt_added: usize,
    /// Entries left alone because the target was already translated
    pub skipped: usize,
    /// Candidates the provider failed to translate
    pub errors: usize,
}

impl RunStatistics {
    /// Fold another set of counters into this one
    pub fn merge(&mut self, other: &RunStatistics) {
        self.total_processed += other.total_processed;
        self.mt_added += other.mt_added;
        self.skipped += other.skipped;
        self.errors += other.errors;
    }

    /// Whether translations were attempted and none succeeded
    pub fn all_attempts_failed(&self) -> bool {
        self.errors > 0 && self.mt_added == 0
    }
}

impl AddAssign for RunStatistics {
    fn add_assign(&mut self, other: Self) {
        self.merge(&other);
    }
}

impl std::iter::Sum for RunStatistics {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |mut acc, s| {
            acc += s;
            acc
        })
    }
}
