use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single canonical player record.
///
/// Several stats are stored under two spellings (`breakeven`/`breakEven`,
/// `avg`/`averagePoints`) because earlier producers disagreed on the key
/// name. Both sides must hold the same value for legacy readers; call
/// [`PlayerRecord::sync_stat_aliases`] after any mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Opaque external identifier; never derived from the name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Display name (e.g., "Tom De Koning"), possibly carrying a trailing
    /// " INJ" or " SUS" status tag in older files
    pub name: String,

    /// Franchise name; abbreviation, full name and nickname all occur
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,

    /// Coarse role tag (defender/midfielder/ruck/forward), sometimes a
    /// slash-joined dual tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,

    /// Salary-cap price in whole dollars
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<u64>,

    /// Breakeven score, canonical spelling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakeven: Option<i64>,

    /// Breakeven score, legacy camel-case spelling
    #[serde(rename = "breakEven", default, skip_serializing_if = "Option::is_none")]
    pub break_even: Option<i64>,

    /// Season average, canonical spelling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg: Option<f64>,

    /// Season average, legacy spelling
    #[serde(rename = "averagePoints", default, skip_serializing_if = "Option::is_none")]
    pub average_points: Option<f64>,

    /// Average over the last three rounds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last3_avg: Option<f64>,

    /// Average over the last five rounds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last5_avg: Option<f64>,

    /// Games played this season
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub games: Option<u32>,

    /// Projected score for the next round
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projected_score: Option<f64>,

    /// Availability status (e.g., "fit", "injured", "suspended")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Placement flag stamped by whichever container holds the record;
    /// not an intrinsic property of the player
    #[serde(rename = "isOnBench", default, skip_serializing_if = "Option::is_none")]
    pub is_on_bench: Option<bool>,

    /// Every key this model does not know about, carried through unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PlayerRecord {
    /// Create a minimal record with just a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            team: None,
            position: None,
            price: None,
            breakeven: None,
            break_even: None,
            avg: None,
            average_points: None,
            last3_avg: None,
            last5_avg: None,
            games: None,
            projected_score: None,
            status: None,
            is_on_bench: None,
            extra: Map::new(),
        }
    }

    /// Bring both spellings of each legacy-duplicated stat to the same
    /// value. The canonical spelling wins when both are present.
    pub fn sync_stat_aliases(&mut self) {
        match (self.breakeven, self.break_even) {
            (Some(v), _) => self.break_even = Some(v),
            (None, Some(v)) => self.breakeven = Some(v),
            (None, None) => {}
        }
        match (self.avg, self.average_points) {
            (Some(v), _) => self.average_points = Some(v),
            (None, Some(v)) => self.avg = Some(v),
            (None, None) => {}
        }
    }
}

/// A team roster: four on-field position buckets plus a bench with the same
/// four buckets and a utility slot. Nothing enforces uniqueness across
/// buckets; the same player can legitimately appear more than once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamRoster {
    #[serde(default)]
    pub defenders: Vec<PlayerRecord>,

    #[serde(default)]
    pub midfielders: Vec<PlayerRecord>,

    #[serde(default)]
    pub rucks: Vec<PlayerRecord>,

    #[serde(default)]
    pub forwards: Vec<PlayerRecord>,

    #[serde(default)]
    pub bench: BenchRoster,

    /// Roster-level keys this model does not know about
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The bench sub-object of a roster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchRoster {
    #[serde(default)]
    pub defenders: Vec<PlayerRecord>,

    #[serde(default)]
    pub midfielders: Vec<PlayerRecord>,

    #[serde(default)]
    pub rucks: Vec<PlayerRecord>,

    #[serde(default)]
    pub forwards: Vec<PlayerRecord>,

    #[serde(default)]
    pub utility: Vec<PlayerRecord>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TeamRoster {
    /// Stamp `isOnBench` on every record from the container holding it:
    /// false for the field buckets, true for every bench bucket.
    pub fn mark_bench_placement(&mut self) {
        for record in self
            .defenders
            .iter_mut()
            .chain(self.midfielders.iter_mut())
            .chain(self.rucks.iter_mut())
            .chain(self.forwards.iter_mut())
        {
            record.is_on_bench = Some(false);
        }
        for record in self
            .bench
            .defenders
            .iter_mut()
            .chain(self.bench.midfielders.iter_mut())
            .chain(self.bench.rucks.iter_mut())
            .chain(self.bench.forwards.iter_mut())
            .chain(self.bench.utility.iter_mut())
        {
            record.is_on_bench = Some(true);
        }
    }

    /// Total number of records across every bucket
    pub fn record_count(&self) -> usize {
        self.defenders.len()
            + self.midfielders.len()
            + self.rucks.len()
            + self.forwards.len()
            + self.bench.defenders.len()
            + self.bench.midfielders.len()
            + self.bench.rucks.len()
            + self.bench.forwards.len()
            + self.bench.utility.len()
    }
}
