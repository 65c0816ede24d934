//! One-pass application of a correction batch to a loaded store

use crate::alias::{similarity, AliasTable};
use crate::error::Result;
use crate::matcher::{MatchOutcome, Matcher};
use crate::merge::{merge_correction, Correction};
use crate::report::{
    AmbiguousCorrection, MatchedCorrection, ReconcileReport, UnmatchedCorrection,
};
use fuzzy_matcher::skim::SkimMatcherV2;
use player_store::PlayerStore;
use tracing::{info, warn};

/// Minimum fuzzy score for a near-miss to be offered as a suggestion
const SUGGESTION_FLOOR: i64 = 50;

/// Suggestions offered per unmatched name
const MAX_SUGGESTIONS: usize = 3;

/// Parse a corrections file (a JSON array of name + fields entries),
/// skipping malformed entries the same way the store loader skips rows.
/// Returns the usable corrections and the skipped count.
pub fn parse_corrections(json: &str) -> Result<(Vec<Correction>, usize)> {
    let items: Vec<serde_json::Value> = serde_json::from_str(json)?;
    let mut skipped = 0;
    let corrections = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Correction>(item) {
            Ok(correction) => Some(correction),
            Err(err) => {
                warn!("skipping malformed correction entry: {}", err);
                skipped += 1;
                None
            }
        })
        .collect();
    Ok((corrections, skipped))
}

/// Apply a correction batch to an in-memory store, sequentially.
///
/// The alias table should already be validated against this store. A match
/// merges into every record bearing the canonical name; a failed or
/// ambiguous identification leaves the store untouched for that entry and
/// is recorded in the report. No record is ever fabricated.
pub fn apply_corrections(
    store: &mut PlayerStore,
    corrections: &[Correction],
    aliases: &AliasTable,
) -> ReconcileReport {
    let candidates = store.distinct_names();
    let matcher = Matcher::new(aliases);
    let scorer = SkimMatcherV2::default();
    let mut report = ReconcileReport::default();

    for correction in corrections {
        match matcher.resolve(&correction.name, &candidates) {
            MatchOutcome::Matched { canonical, tier } => {
                let mut records_updated = 0;
                for record in store.records_mut() {
                    if record.name == canonical {
                        let merged = merge_correction(record, &correction.fields);
                        *record = merged;
                        records_updated += 1;
                    }
                }
                info!(
                    "corrected {} record(s) for '{}' (query '{}', {} match)",
                    records_updated,
                    canonical,
                    correction.name,
                    tier.label()
                );
                report.matched.push(MatchedCorrection {
                    query: correction.name.clone(),
                    canonical,
                    tier,
                    records_updated,
                });
            }
            MatchOutcome::Ambiguous { candidates: colliding } => {
                warn!(
                    "ambiguous name '{}' ({} candidates), skipping",
                    correction.name,
                    colliding.len()
                );
                report.ambiguous.push(AmbiguousCorrection {
                    query: correction.name.clone(),
                    candidates: colliding,
                });
            }
            MatchOutcome::NoMatch => {
                let suggestions = suggest(&scorer, &correction.name, &candidates);
                warn!("no match for '{}', skipping", correction.name);
                report
                    .unmatched
                    .push(UnmatchedCorrection { query: correction.name.clone(), suggestions });
            }
        }
    }

    report
}

/// Best near-miss canonical names for an unmatched query, highest score
/// first, ties broken alphabetically for determinism
fn suggest(scorer: &SkimMatcherV2, query: &str, candidates: &[String]) -> Vec<String> {
    let mut scored: Vec<(i64, &String)> = candidates
        .iter()
        .filter_map(|candidate| {
            let score = similarity(scorer, candidate, query);
            (score >= SUGGESTION_FLOOR).then_some((score, candidate))
        })
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));
    scored.into_iter().take(MAX_SUGGESTIONS).map(|(_, candidate)| candidate.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::CorrectionFields;

    fn roster_store() -> PlayerStore {
        let json = r#"{
            "defenders": [{"name": "Harry Sheezel", "price": 800000}],
            "midfielders": [{"name": "Sam Davidson", "price": 500000}],
            "rucks": [{"name": "Tom De Koning", "price": 900000, "breakeven": 90}],
            "forwards": [{"name": "John Smith"}, {"name": "Jack Smith"}],
            "bench": {
                "defenders": [],
                "midfielders": [{"name": "Sam Davidson", "price": 500000, "isOnBench": true}],
                "rucks": [],
                "forwards": [],
                "utility": []
            }
        }"#;
        PlayerStore::from_json_str(json).unwrap().0
    }

    #[test]
    fn test_alias_match_updates_record() {
        let mut store = roster_store();
        let mut aliases = AliasTable::new();
        aliases.insert("Tom de konning", "Tom De Koning");

        let corrections = vec![Correction {
            name: "Tom de konning".to_string(),
            fields: CorrectionFields {
                price: Some(940_000),
                breakeven: Some(94),
                ..Default::default()
            },
        }];

        let report = apply_corrections(&mut store, &corrections, &aliases);
        assert_eq!(report.matched.len(), 1);
        assert_eq!(report.matched[0].canonical, "Tom De Koning");
        assert_eq!(report.matched[0].records_updated, 1);

        let tdk = store.records().into_iter().find(|r| r.name == "Tom De Koning").unwrap();
        assert_eq!(tdk.price, Some(940_000));
        assert_eq!(tdk.breakeven, Some(94));
        assert_eq!(tdk.break_even, Some(94));
    }

    #[test]
    fn test_duplicate_appearances_all_receive_the_merge() {
        let mut store = roster_store();
        let aliases = AliasTable::new();

        let corrections = vec![Correction {
            name: "Sam Davidson".to_string(),
            fields: CorrectionFields { price: Some(512_300), ..Default::default() },
        }];

        let report = apply_corrections(&mut store, &corrections, &aliases);
        assert_eq!(report.matched[0].records_updated, 2);

        let prices: Vec<_> = store
            .records()
            .into_iter()
            .filter(|r| r.name == "Sam Davidson")
            .map(|r| r.price)
            .collect();
        assert_eq!(prices, vec![Some(512_300), Some(512_300)]);

        // placement flag untouched by the merge
        let bench_sam = store
            .records()
            .into_iter()
            .find(|r| r.name == "Sam Davidson" && r.is_on_bench == Some(true));
        assert!(bench_sam.is_some());
    }

    #[test]
    fn test_ambiguous_and_unmatched_leave_store_untouched() {
        let mut store = roster_store();
        let before = store.clone();
        let aliases = AliasTable::new();

        let corrections = vec![
            Correction {
                name: "Smith".to_string(),
                fields: CorrectionFields { price: Some(1), ..Default::default() },
            },
            Correction {
                name: "Nobody Atall".to_string(),
                fields: CorrectionFields { price: Some(2), ..Default::default() },
            },
        ];

        let report = apply_corrections(&mut store, &corrections, &aliases);
        assert_eq!(report.matched.len(), 0);
        assert_eq!(report.ambiguous.len(), 1);
        assert_eq!(report.unmatched.len(), 1);
        assert_eq!(store, before);
    }

    #[test]
    fn test_unmatched_gets_suggestions() {
        let mut store = roster_store();
        let aliases = AliasTable::new();

        let corrections = vec![Correction {
            name: "Harry Sheez".to_string(),
            fields: CorrectionFields { price: Some(810_000), ..Default::default() },
        }];

        let report = apply_corrections(&mut store, &corrections, &aliases);
        assert_eq!(report.unmatched.len(), 1);
        assert!(report.unmatched[0]
            .suggestions
            .iter()
            .any(|s| s == "Harry Sheezel"));
    }

    #[test]
    fn test_parse_corrections_skips_malformed_entries() {
        let json = r#"[
            {"name": "Tom De Koning", "price": 940000},
            {"price": 1},
            "nonsense"
        ]"#;
        let (corrections, skipped) = parse_corrections(json).unwrap();
        assert_eq!(corrections.len(), 1);
        assert_eq!(skipped, 2);
    }
}
