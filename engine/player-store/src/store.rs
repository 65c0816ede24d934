//! Lenient loading and uniform iteration for both store shapes

use crate::error::{Result, StoreError};
use crate::types::{BenchRoster, PlayerRecord, TeamRoster};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::warn;

/// Counts from a lenient store load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    /// Records parsed successfully
    pub loaded: usize,
    /// Malformed elements skipped (logged, never fatal)
    pub skipped: usize,
}

/// A canonical store in either on-disk shape: the flat "all players" array
/// or the nested roster object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlayerStore {
    /// Roster dataset (`user_team.json` shape)
    Roster(TeamRoster),
    /// Flat dataset (`player_data.json` shape)
    List(Vec<PlayerRecord>),
}

impl PlayerStore {
    /// Parse a store document, skipping malformed player elements.
    ///
    /// A bad row is logged and counted but never aborts the batch; a
    /// document that is not an array or object at all is an error.
    pub fn from_json_str(json: &str) -> Result<(Self, ParseStats)> {
        let value: Value = serde_json::from_str(json)?;
        let mut stats = ParseStats::default();

        let store = match value {
            Value::Array(items) => PlayerStore::List(parse_records(items, "players", &mut stats)),
            Value::Object(obj) => PlayerStore::Roster(roster_from_object(obj, &mut stats)?),
            other => {
                return Err(StoreError::unexpected_shape(format!(
                    "expected a player array or roster object, got {}",
                    json_kind(&other)
                )))
            }
        };

        Ok((store, stats))
    }

    /// Canonical pretty serialization for the store file
    pub fn to_json_string_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Every record across every bucket, in a fixed deterministic order
    /// (field buckets, then bench buckets, then utility).
    pub fn records(&self) -> Vec<&PlayerRecord> {
        match self {
            PlayerStore::List(list) => list.iter().collect(),
            PlayerStore::Roster(roster) => {
                let mut out = Vec::with_capacity(roster.record_count());
                out.extend(roster.defenders.iter());
                out.extend(roster.midfielders.iter());
                out.extend(roster.rucks.iter());
                out.extend(roster.forwards.iter());
                out.extend(roster.bench.defenders.iter());
                out.extend(roster.bench.midfielders.iter());
                out.extend(roster.bench.rucks.iter());
                out.extend(roster.bench.forwards.iter());
                out.extend(roster.bench.utility.iter());
                out
            }
        }
    }

    /// Mutable variant of [`PlayerStore::records`], same ordering
    pub fn records_mut(&mut self) -> Vec<&mut PlayerRecord> {
        match self {
            PlayerStore::List(list) => list.iter_mut().collect(),
            PlayerStore::Roster(roster) => {
                let mut out = Vec::with_capacity(roster.record_count());
                out.extend(roster.defenders.iter_mut());
                out.extend(roster.midfielders.iter_mut());
                out.extend(roster.rucks.iter_mut());
                out.extend(roster.forwards.iter_mut());
                out.extend(roster.bench.defenders.iter_mut());
                out.extend(roster.bench.midfielders.iter_mut());
                out.extend(roster.bench.rucks.iter_mut());
                out.extend(roster.bench.forwards.iter_mut());
                out.extend(roster.bench.utility.iter_mut());
                out
            }
        }
    }

    /// Distinct display names in first-seen order; the matcher's candidate
    /// universe. Duplicate appearances of one player across buckets count
    /// once.
    pub fn distinct_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut names = Vec::new();
        for record in self.records() {
            if seen.insert(record.name.clone()) {
                names.push(record.name.clone());
            }
        }
        names
    }

    /// Total number of records
    pub fn len(&self) -> usize {
        match self {
            PlayerStore::List(list) => list.len(),
            PlayerStore::Roster(roster) => roster.record_count(),
        }
    }

    /// Check whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn roster_from_object(mut obj: Map<String, Value>, stats: &mut ParseStats) -> Result<TeamRoster> {
    let defenders = take_bucket(&mut obj, "defenders", stats);
    let midfielders = take_bucket(&mut obj, "midfielders", stats);
    let rucks = take_bucket(&mut obj, "rucks", stats);
    let forwards = take_bucket(&mut obj, "forwards", stats);

    let bench = match obj.remove("bench") {
        Some(Value::Object(mut bench_obj)) => BenchRoster {
            defenders: take_bucket(&mut bench_obj, "defenders", stats),
            midfielders: take_bucket(&mut bench_obj, "midfielders", stats),
            rucks: take_bucket(&mut bench_obj, "rucks", stats),
            forwards: take_bucket(&mut bench_obj, "forwards", stats),
            utility: take_bucket(&mut bench_obj, "utility", stats),
            extra: bench_obj,
        },
        Some(other) => {
            return Err(StoreError::unexpected_shape(format!(
                "roster bench must be an object, got {}",
                json_kind(&other)
            )))
        }
        None => BenchRoster::default(),
    };

    Ok(TeamRoster { defenders, midfielders, rucks, forwards, bench, extra: obj })
}

fn take_bucket(obj: &mut Map<String, Value>, key: &str, stats: &mut ParseStats) -> Vec<PlayerRecord> {
    match obj.remove(key) {
        Some(Value::Array(items)) => parse_records(items, key, stats),
        Some(other) => {
            warn!("skipping bucket '{}': expected an array, got {}", key, json_kind(&other));
            stats.skipped += 1;
            Vec::new()
        }
        None => Vec::new(),
    }
}

fn parse_records(items: Vec<Value>, context: &str, stats: &mut ParseStats) -> Vec<PlayerRecord> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<PlayerRecord>(item) {
            Ok(mut record) => {
                record.sync_stat_aliases();
                stats.loaded += 1;
                Some(record)
            }
            Err(err) => {
                warn!("skipping malformed player record in '{}': {}", context, err);
                stats.skipped += 1;
                None
            }
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
