//! Priority-ordered name matching against the canonical store

use crate::alias::AliasTable;
use crate::error::{ReconcileError, Result};
use crate::normalize::{first_initial, last_name, normalize};
use serde::Serialize;

/// Which rule produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchTier {
    /// Alias-table entry redirected the query
    Alias,
    /// Case-sensitive equality with the query as given
    Exact,
    /// Equality after normalization
    Normalized,
    /// Unique last-name token match
    LastName,
    /// Last-name collision resolved by first initial
    LastNameInitial,
}

impl MatchTier {
    /// Short operator-facing label
    pub fn label(&self) -> &'static str {
        match self {
            MatchTier::Alias => "alias",
            MatchTier::Exact => "exact",
            MatchTier::Normalized => "normalized",
            MatchTier::LastName => "last name",
            MatchTier::LastNameInitial => "last name + initial",
        }
    }
}

/// Outcome of resolving one query name against the canonical name set
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    /// Exactly one canonical name was identified
    Matched { canonical: String, tier: MatchTier },
    /// Several candidates survived every tie-break; fail closed
    Ambiguous { candidates: Vec<String> },
    /// Nothing matched; the caller logs and skips, never fabricates
    NoMatch,
}

impl MatchOutcome {
    /// Check whether a single canonical name was identified
    pub fn is_match(&self) -> bool {
        matches!(self, MatchOutcome::Matched { .. })
    }
}

/// Resolves human-supplied names to canonical store names.
///
/// Candidates are the store's distinct display names in store order, so
/// resolution is deterministic and idempotent; nothing depends on hash-map
/// iteration order.
pub struct Matcher<'a> {
    aliases: &'a AliasTable,
}

impl<'a> Matcher<'a> {
    /// Create a matcher over a validated alias table
    pub fn new(aliases: &'a AliasTable) -> Self {
        Self { aliases }
    }

    /// Resolve `query` against the distinct canonical names. Strict
    /// priority order, first hit wins:
    ///
    /// 1. alias-table lookup (wins even over an exact same-name candidate)
    /// 2. exact, case-sensitive equality
    /// 3. normalized equality, first candidate in store order
    /// 4. last-name token equality when exactly one candidate matches
    /// 5. last-name collision filtered by first initial, unique survivor only
    ///
    /// A collision no tie-break can settle is [`MatchOutcome::Ambiguous`];
    /// everything else falls through to [`MatchOutcome::NoMatch`]. Both
    /// leave the store untouched.
    pub fn resolve(&self, query: &str, candidates: &[String]) -> MatchOutcome {
        // 1. alias table
        if let Some(target) = self.aliases.resolve(query) {
            return if candidates.iter().any(|c| c == target) {
                MatchOutcome::Matched { canonical: target.to_string(), tier: MatchTier::Alias }
            } else {
                MatchOutcome::NoMatch
            };
        }

        // 2. exact
        if let Some(hit) = candidates.iter().find(|c| c.as_str() == query) {
            return MatchOutcome::Matched { canonical: hit.clone(), tier: MatchTier::Exact };
        }

        // 3. normalized
        let query_norm = normalize(query);
        if !query_norm.is_empty() {
            if let Some(hit) = candidates.iter().find(|c| normalize(c) == query_norm) {
                return MatchOutcome::Matched {
                    canonical: hit.clone(),
                    tier: MatchTier::Normalized,
                };
            }
        }

        // 4. last name
        let query_last = match last_name(query) {
            Some(token) => token,
            None => return MatchOutcome::NoMatch,
        };
        let by_last: Vec<&String> = candidates
            .iter()
            .filter(|c| last_name(c).as_deref() == Some(query_last.as_str()))
            .collect();

        match by_last.len() {
            0 => MatchOutcome::NoMatch,
            1 => MatchOutcome::Matched {
                canonical: by_last[0].clone(),
                tier: MatchTier::LastName,
            },
            // 5. disambiguate by first initial of the full name
            _ => {
                let survivors: Vec<&String> = match first_initial(query) {
                    Some(initial) => by_last
                        .iter()
                        .filter(|c| first_initial(c) == Some(initial))
                        .copied()
                        .collect(),
                    None => Vec::new(),
                };

                if survivors.len() == 1 {
                    MatchOutcome::Matched {
                        canonical: survivors[0].clone(),
                        tier: MatchTier::LastNameInitial,
                    }
                } else {
                    // the surname collision stands; report every colliding
                    // candidate so the operator can fix the input
                    MatchOutcome::Ambiguous {
                        candidates: by_last.into_iter().cloned().collect(),
                    }
                }
            }
        }
    }

    /// [`Matcher::resolve`] with a `Result` shape, for callers that treat a
    /// failed identification as an error rather than a reportable outcome
    pub fn resolve_strict(&self, query: &str, candidates: &[String]) -> Result<String> {
        match self.resolve(query, candidates) {
            MatchOutcome::Matched { canonical, .. } => Ok(canonical),
            MatchOutcome::Ambiguous { candidates } => {
                Err(ReconcileError::Ambiguous { query: query.to_string(), candidates })
            }
            MatchOutcome::NoMatch => Err(ReconcileError::NoMatch(query.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_match() {
        let aliases = AliasTable::new();
        let matcher = Matcher::new(&aliases);
        let candidates = names(&["Tom De Koning", "Sam Davidson"]);

        let outcome = matcher.resolve("Sam Davidson", &candidates);
        assert_eq!(
            outcome,
            MatchOutcome::Matched {
                canonical: "Sam Davidson".to_string(),
                tier: MatchTier::Exact
            }
        );
    }

    #[test]
    fn test_normalized_match() {
        let aliases = AliasTable::new();
        let matcher = Matcher::new(&aliases);
        let candidates = names(&["Tom De Koning"]);

        let outcome = matcher.resolve("tom de koning INJ", &candidates);
        assert_eq!(
            outcome,
            MatchOutcome::Matched {
                canonical: "Tom De Koning".to_string(),
                tier: MatchTier::Normalized
            }
        );
    }

    #[test]
    fn test_unique_last_name_match() {
        let aliases = AliasTable::new();
        let matcher = Matcher::new(&aliases);
        let candidates = names(&["Brodie Grundy", "Sam Davidson"]);

        let outcome = matcher.resolve("B Grundy", &candidates);
        assert_eq!(
            outcome,
            MatchOutcome::Matched {
                canonical: "Brodie Grundy".to_string(),
                tier: MatchTier::LastName
            }
        );
    }

    #[test]
    fn test_first_initial_disambiguation() {
        let aliases = AliasTable::new();
        let matcher = Matcher::new(&aliases);
        let candidates = names(&["John Smith", "Bob Smith"]);

        let outcome = matcher.resolve("J. Smith", &candidates);
        assert_eq!(
            outcome,
            MatchOutcome::Matched {
                canonical: "John Smith".to_string(),
                tier: MatchTier::LastNameInitial
            }
        );
    }

    #[test]
    fn test_bare_surname_collision_fails_closed() {
        let aliases = AliasTable::new();
        let matcher = Matcher::new(&aliases);
        let candidates = names(&["John Smith", "Jack Smith"]);

        // "Smith" offers no initial that separates John from Jack
        let outcome = matcher.resolve("Smith", &candidates);
        assert!(!outcome.is_match());
        assert_eq!(
            outcome,
            MatchOutcome::Ambiguous { candidates: names(&["John Smith", "Jack Smith"]) }
        );
    }

    #[test]
    fn test_alias_takes_priority_over_exact() {
        let mut aliases = AliasTable::new();
        aliases.insert("San Davidson", "Sam Davidson");
        let matcher = Matcher::new(&aliases);
        // the stale misspelling still exists as its own record
        let candidates = names(&["San Davidson", "Sam Davidson"]);

        let outcome = matcher.resolve("San Davidson", &candidates);
        assert_eq!(
            outcome,
            MatchOutcome::Matched {
                canonical: "Sam Davidson".to_string(),
                tier: MatchTier::Alias
            }
        );
    }

    #[test]
    fn test_alias_to_absent_target_is_no_match() {
        let mut aliases = AliasTable::new();
        aliases.insert("Tom de konning", "Tom De Koning");
        let matcher = Matcher::new(&aliases);

        let outcome = matcher.resolve("Tom de konning", &names(&["Sam Davidson"]));
        assert_eq!(outcome, MatchOutcome::NoMatch);
    }

    #[test]
    fn test_no_match_for_unknown_name() {
        let aliases = AliasTable::new();
        let matcher = Matcher::new(&aliases);

        let outcome = matcher.resolve("Nobody Here", &names(&["Sam Davidson"]));
        assert_eq!(outcome, MatchOutcome::NoMatch);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let aliases = AliasTable::new();
        let matcher = Matcher::new(&aliases);
        let candidates = names(&["John Smith", "Jack Smith", "Brodie Grundy"]);

        let first = matcher.resolve("Grundy", &candidates);
        let second = matcher.resolve("Grundy", &candidates);
        assert_eq!(first, second);
        assert!(first.is_match());
    }

    #[test]
    fn test_resolve_strict_maps_outcomes_to_errors() {
        let aliases = AliasTable::new();
        let matcher = Matcher::new(&aliases);
        let candidates = names(&["John Smith", "Jack Smith"]);

        assert!(matches!(
            matcher.resolve_strict("Smith", &candidates),
            Err(ReconcileError::Ambiguous { .. })
        ));
        assert!(matches!(
            matcher.resolve_strict("Nobody", &candidates),
            Err(ReconcileError::NoMatch(_))
        ));
    }
}
