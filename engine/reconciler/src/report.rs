//! Aggregated outcome of one correction run

use crate::alias::AliasIssue;
use crate::matcher::MatchTier;
use serde::Serialize;

/// One correction that was matched and applied
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedCorrection {
    /// Name as the operator wrote it
    pub query: String,
    /// Canonical name the matcher settled on
    pub canonical: String,
    /// Which rule identified the record
    pub tier: MatchTier,
    /// How many records received the merge (duplicates across buckets all
    /// get it)
    pub records_updated: usize,
}

/// One correction nothing matched
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnmatchedCorrection {
    pub query: String,
    /// Closest canonical names by fuzzy score, for operator review
    pub suggestions: Vec<String>,
}

/// One correction that hit an unresolvable name collision
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmbiguousCorrection {
    pub query: String,
    pub candidates: Vec<String>,
}

/// Everything a correction run did and declined to do
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconcileReport {
    pub matched: Vec<MatchedCorrection>,
    pub unmatched: Vec<UnmatchedCorrection>,
    pub ambiguous: Vec<AmbiguousCorrection>,
    /// Alias entries validation removed before the run
    pub rejected_aliases: Vec<AliasIssue>,
    /// Malformed store rows skipped at load time
    pub skipped_store_rows: usize,
    /// Malformed correction entries skipped at load time
    pub skipped_corrections: usize,
}

impl ReconcileReport {
    /// Whether the run had nothing to complain about
    pub fn is_clean(&self) -> bool {
        self.unmatched.is_empty()
            && self.ambiguous.is_empty()
            && self.rejected_aliases.is_empty()
            && self.skipped_store_rows == 0
            && self.skipped_corrections == 0
    }

    /// Corrections the run attempted (matched or not)
    pub fn total_attempted(&self) -> usize {
        self.matched.len() + self.unmatched.len() + self.ambiguous.len()
    }
}
