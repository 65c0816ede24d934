//! Externalized alias configuration for known-bad names
//!
//! The alias table is loaded once (a JSON object of misspelling to
//! canonical name) and injected into the matcher; it is never re-declared
//! per correction batch. Before use every entry is screened against the
//! store: entries pointing at a name the store does not hold, or splicing
//! two people who share neither a surname nor any real spelling
//! similarity, are data-entry bugs and get rejected rather than applied.

use crate::error::{ReconcileError, Result};
use crate::normalize::{last_name, normalize};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

/// Minimum fuzzy score for an alias pair to count as the same person when
/// the last names disagree
const ALIAS_SIMILARITY_FLOOR: i64 = 60;

/// Mapping of known-bad human names to canonical names
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: HashMap<String, String>,
}

/// An alias entry removed by validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasIssue {
    pub from: String,
    pub to: String,
    pub reason: AliasIssueKind,
}

/// Why an alias entry was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AliasIssueKind {
    /// The canonical target is not in the store
    DanglingTarget,
    /// Source and target look like two different people
    CrossPerson,
}

impl fmt::Display for AliasIssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AliasIssueKind::DanglingTarget => write!(f, "target not in store"),
            AliasIssueKind::CrossPerson => write!(f, "source and target look like different people"),
        }
    }
}

impl AliasIssue {
    /// Typed error form, for callers that want to fail on the first issue
    pub fn to_error(&self) -> ReconcileError {
        ReconcileError::InvalidAlias {
            from: self.from.clone(),
            to: self.to.clone(),
            reason: self.reason.to_string(),
        }
    }
}

impl AliasTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a table from a JSON object of misspelling -> canonical name
    pub fn from_json_str(json: &str) -> Result<Self> {
        let entries: HashMap<String, String> = serde_json::from_str(json)?;
        Ok(Self { entries })
    }

    /// Add one entry
    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.entries.insert(from.into(), to.into());
    }

    /// Canonical target for a known-bad name, if the table has one
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Screen every entry against the store's canonical names. Dangling and
    /// cross-person entries are removed from the working table and
    /// returned, sorted by source name for deterministic reporting.
    pub fn validate(&mut self, canonical_names: &[String]) -> Vec<AliasIssue> {
        let scorer = SkimMatcherV2::default();
        let mut issues = Vec::new();

        self.entries.retain(|from, to| {
            if !canonical_names.iter().any(|name| name == to) {
                warn!("rejecting alias '{}' -> '{}': target not in store", from, to);
                issues.push(AliasIssue {
                    from: from.clone(),
                    to: to.clone(),
                    reason: AliasIssueKind::DanglingTarget,
                });
                return false;
            }

            let same_last = match (last_name(from), last_name(to)) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            };
            if !same_last && similarity(&scorer, from, to) < ALIAS_SIMILARITY_FLOOR {
                warn!(
                    "rejecting alias '{}' -> '{}': names look like different people",
                    from, to
                );
                issues.push(AliasIssue {
                    from: from.clone(),
                    to: to.clone(),
                    reason: AliasIssueKind::CrossPerson,
                });
                return false;
            }

            true
        });

        issues.sort_by(|a, b| a.from.cmp(&b.from));
        issues
    }
}

/// Direction-insensitive fuzzy score over normalized names. Skim requires
/// the pattern to be a subsequence of the choice, so score both ways and
/// keep the better one.
pub(crate) fn similarity(scorer: &SkimMatcherV2, a: &str, b: &str) -> i64 {
    let norm_a = normalize(a);
    let norm_b = normalize(b);
    let forward = scorer.fuzzy_match(&norm_a, &norm_b).unwrap_or(0);
    let backward = scorer.fuzzy_match(&norm_b, &norm_a).unwrap_or(0);
    forward.max(backward)
}
