//! # Reconciler
//!
//! Matches human-supplied player names against the canonical store and
//! overlays corrected stat fields onto the identified records.
//!
//! ## Pipeline
//!
//! - **Normalizer**: strips status tags and punctuation for comparison
//! - **AliasTable**: externalized known-bad-name mapping, validated against
//!   the store before use
//! - **Matcher**: strict priority tiers (alias, exact, normalized, last
//!   name, last name + first initial); ambiguity fails closed
//! - **Merger**: pure field overlay that preserves identity and placement
//! - **Report**: aggregated matched/unmatched/ambiguous outcomes per run
//!
//! Matching never fabricates a record: a name the matcher cannot place is
//! reported and skipped.

pub mod alias;
pub mod apply;
pub mod error;
pub mod matcher;
pub mod merge;
pub mod normalize;
pub mod report;

pub use alias::{AliasIssue, AliasIssueKind, AliasTable};
pub use apply::{apply_corrections, parse_corrections};
pub use error::{ReconcileError, Result};
pub use matcher::{MatchOutcome, MatchTier, Matcher};
pub use merge::{merge_correction, Correction, CorrectionFields};
pub use report::{AmbiguousCorrection, MatchedCorrection, ReconcileReport, UnmatchedCorrection};
