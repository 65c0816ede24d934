//! Field overlay for verified corrections

use player_store::PlayerRecord;
use serde::{Deserialize, Serialize};

/// Corrected values for one player. Every field is optional; only supplied
/// fields overwrite the canonical record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrectionFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakeven: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last3_avg: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last5_avg: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub games: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projected_score: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// One entry in a corrections file: the human-supplied name plus the
/// fields to overlay once the record is identified
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correction {
    /// Name as the operator wrote it; resolved by the matcher
    pub name: String,

    #[serde(flatten)]
    pub fields: CorrectionFields,
}

/// Overlay `fields` onto `record`. Pure and total.
///
/// Fields absent from the correction survive unchanged: the opaque `id`,
/// the `isOnBench` placement flag, the display name, and every unmodeled
/// key. Supplied stats overwrite both spellings of any legacy-duplicated
/// key.
pub fn merge_correction(record: &PlayerRecord, fields: &CorrectionFields) -> PlayerRecord {
    let mut merged = record.clone();

    if let Some(team) = &fields.team {
        merged.team = Some(team.clone());
    }
    if let Some(position) = &fields.position {
        merged.position = Some(position.clone());
    }
    if let Some(price) = fields.price {
        merged.price = Some(price);
    }
    if let Some(breakeven) = fields.breakeven {
        merged.breakeven = Some(breakeven);
        merged.break_even = Some(breakeven);
    }
    if let Some(avg) = fields.avg {
        merged.avg = Some(avg);
        merged.average_points = Some(avg);
    }
    if let Some(last3) = fields.last3_avg {
        merged.last3_avg = Some(last3);
    }
    if let Some(last5) = fields.last5_avg {
        merged.last5_avg = Some(last5);
    }
    if let Some(games) = fields.games {
        merged.games = Some(games);
    }
    if let Some(projected) = fields.projected_score {
        merged.projected_score = Some(projected);
    }
    if let Some(status) = &fields.status {
        merged.status = Some(status.clone());
    }

    merged.sync_stat_aliases();
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing_record() -> PlayerRecord {
        let mut record = PlayerRecord::named("Tom De Koning");
        record.id = Some("CD_I1002345".to_string());
        record.price = Some(900_000);
        record.breakeven = Some(90);
        record.is_on_bench = Some(true);
        record.extra.insert("ownership_pct".to_string(), serde_json::json!(31.4));
        record.sync_stat_aliases();
        record
    }

    #[test]
    fn test_supplied_fields_overwrite_both_spellings() {
        let correction = CorrectionFields {
            price: Some(940_000),
            breakeven: Some(94),
            avg: Some(101.2),
            ..Default::default()
        };

        let merged = merge_correction(&existing_record(), &correction);
        assert_eq!(merged.price, Some(940_000));
        assert_eq!(merged.breakeven, Some(94));
        assert_eq!(merged.break_even, Some(94));
        assert_eq!(merged.avg, Some(101.2));
        assert_eq!(merged.average_points, Some(101.2));
    }

    #[test]
    fn test_absent_fields_survive_unchanged() {
        let correction = CorrectionFields { price: Some(940_000), ..Default::default() };

        let merged = merge_correction(&existing_record(), &correction);
        assert_eq!(merged.id.as_deref(), Some("CD_I1002345"));
        assert_eq!(merged.is_on_bench, Some(true));
        assert_eq!(merged.name, "Tom De Koning");
        assert_eq!(merged.breakeven, Some(90));
        assert_eq!(merged.extra.get("ownership_pct"), Some(&serde_json::json!(31.4)));
    }

    #[test]
    fn test_empty_correction_is_identity() {
        let record = existing_record();
        let merged = merge_correction(&record, &CorrectionFields::default());
        assert_eq!(merged, record);
    }

    #[test]
    fn test_correction_entry_parses_with_flattened_fields() {
        let correction: Correction =
            serde_json::from_str(r#"{"name": "Tom de konning", "price": 940000, "breakeven": 94}"#)
                .unwrap();
        assert_eq!(correction.name, "Tom de konning");
        assert_eq!(correction.fields.price, Some(940_000));
        assert_eq!(correction.fields.breakeven, Some(94));
    }
}
