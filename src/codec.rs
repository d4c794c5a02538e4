//! Row codec for attendance entries.
//!
//! Converts between [`AttendanceEntry`] and the nine-column text row kept in
//! the attendance sheet:
//!
//! ```text
//! [name, class, raid id, report id, dd-MM-yyyy, day, zone, [RC,DMT], true]
//! ```
//!
//! Decoding restores the stored day of week and buff verdict verbatim and
//! never checks them against the date or the eligibility rule.

use crate::buffs::{BuffTable, WorldBuffSet};
use crate::constants::{
    ROW_WIDTH, WORLD_BUFF_ERROR_MARKER, WORLD_BUFF_ERROR_SENTINEL, WORLD_BUFF_SEPARATOR, columns,
};
use crate::error::{AttendanceError, Result};
use crate::models::{AttendanceEntry, DayOfWeek, Player, WowClass};
use tracing::debug;

/// Encoder/decoder for stored attendance rows
#[derive(Debug, Clone)]
pub struct RowCodec {
    buffs: BuffTable,
}

impl RowCodec {
    pub fn new(buffs: BuffTable) -> Self {
        Self { buffs }
    }

    /// Codec over the full table of known buffs
    pub fn with_known_buffs() -> Result<Self> {
        Ok(Self::new(BuffTable::new()?))
    }

    pub fn buff_table(&self) -> &BuffTable {
        &self.buffs
    }

    /// Encode an entry into its stored row
    pub fn to_row(&self, entry: &AttendanceEntry) -> Vec<String> {
        let player = entry.player();
        vec![
            player.name.clone(),
            player.class.label().to_string(),
            entry.raid_instance_id().to_string(),
            entry.report_id().to_string(),
            entry.date().to_string(),
            entry.day_of_week().label().to_string(),
            entry.zone().to_string(),
            encode_world_buffs(entry.world_buffs()),
            entry.acceptable_wbuffs().to_string(),
        ]
    }

    /// Decode one stored row of exactly nine fields
    pub fn from_row<S: AsRef<str>>(&self, row: &[S]) -> Result<AttendanceEntry> {
        if row.len() != ROW_WIDTH {
            return Err(AttendanceError::format(
                "row",
                row.iter()
                    .map(|cell| cell.as_ref())
                    .collect::<Vec<&str>>()
                    .join(" | "),
                format!("expected {} fields, found {}", ROW_WIDTH, row.len()),
            ));
        }
        let field = |index: usize| row[index].as_ref();

        let class: WowClass = field(columns::PLAYER_CLASS).parse()?;
        let player = Player::new(field(columns::PLAYER_NAME), class);

        let raid_id_text = field(columns::RAID_INSTANCE_ID);
        let raid_instance_id = raid_id_text.parse::<i32>().map_err(|e| {
            AttendanceError::format("raid_instance_id", raid_id_text, e.to_string())
        })?;

        let day_of_week: DayOfWeek = field(columns::DAY_OF_WEEK).parse()?;
        let world_buffs = self.decode_world_buffs(field(columns::WORLD_BUFFS))?;
        let acceptable_wbuffs = parse_stored_bool(field(columns::ACCEPTABLE_WBUFFS));

        Ok(AttendanceEntry::restore(
            player,
            raid_instance_id,
            field(columns::REPORT_ID).to_string(),
            field(columns::DATE).to_string(),
            day_of_week,
            field(columns::ZONE).to_string(),
            world_buffs,
            acceptable_wbuffs,
        ))
    }

    /// Decode the bracketed buff field.
    ///
    /// One leading and one trailing character are dropped unchecked. Text
    /// containing the error marker means the buffs are unknown.
    pub fn decode_world_buffs(&self, field: &str) -> Result<Option<WorldBuffSet>> {
        let mut chars = field.chars();
        if chars.next().is_none() || chars.next_back().is_none() {
            return Err(AttendanceError::format(
                "world_buffs",
                field,
                "too short to hold a bracketed list",
            ));
        }
        let inner = chars.as_str();

        if inner.contains(WORLD_BUFF_ERROR_MARKER) {
            debug!("Stored world buffs marked as unknown: {}", field);
            return Ok(None);
        }

        if inner.is_empty() {
            return Ok(Some(WorldBuffSet::new()));
        }

        inner
            .split(WORLD_BUFF_SEPARATOR)
            .map(|token| self.buffs.by_shorthand(token))
            .collect::<Result<WorldBuffSet>>()
            .map(Some)
    }
}

/// Encode a buff set as `[RC,DMT]`, `[]`, or the error sentinel when unknown
pub fn encode_world_buffs(world_buffs: Option<&WorldBuffSet>) -> String {
    match world_buffs {
        None => WORLD_BUFF_ERROR_SENTINEL.to_string(),
        Some(buffs) => {
            let tokens: Vec<&str> = buffs.iter().map(|buff| buff.shorthand()).collect();
            format!("[{}]", tokens.join(","))
        }
    }
}

/// Stored verdicts read as true only for "true" in any letter case
fn parse_stored_bool(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffs::WorldBuff;
    use chrono::NaiveDate;

    fn codec() -> RowCodec {
        RowCodec::with_known_buffs().unwrap()
    }

    fn sample_row(buffs: &str) -> Vec<String> {
        [
            "Sam",
            "WARRIOR",
            "3",
            "rep1",
            "01-01-2020",
            "WEDNESDAY",
            "Naxxramas",
            buffs,
            "true",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    #[test]
    fn test_decode_example_row() {
        let entry = codec().from_row(&sample_row("[RC,DMT]")).unwrap();

        assert_eq!(entry.player().name, "Sam");
        assert_eq!(entry.player().class, WowClass::Warrior);
        assert_eq!(entry.raid_instance_id(), 3);
        assert_eq!(entry.report_id(), "rep1");
        assert_eq!(entry.date(), "01-01-2020");
        assert_eq!(entry.day_of_week(), DayOfWeek::Wednesday);
        assert_eq!(entry.zone(), "Naxxramas");
        let expected: WorldBuffSet = [
            WorldBuff::RallyingCryOfTheDragonslayer,
            WorldBuff::DireMaulTribute,
        ]
        .into_iter()
        .collect();
        assert_eq!(entry.world_buffs(), Some(&expected));
        assert!(entry.acceptable_wbuffs());
    }

    #[test]
    fn test_encode_fresh_entry() {
        let date = NaiveDate::from_ymd_opt(2020, 3, 14)
            .unwrap()
            .and_hms_opt(20, 0, 0)
            .unwrap();
        let buffs: WorldBuffSet = [WorldBuff::SongflowerSerenade, WorldBuff::DireMaulTribute]
            .into_iter()
            .collect();
        let entry = AttendanceEntry::new(
            Player::new("Ana", WowClass::Mage),
            12,
            "abcXYZ",
            date,
            "Molten Core",
            Some(buffs),
        );

        let row = codec().to_row(&entry);
        assert_eq!(
            row,
            vec![
                "Ana",
                "MAGE",
                "12",
                "abcXYZ",
                "14-03-2020",
                "SATURDAY",
                "Molten Core",
                "[DMT,SF]",
                "false"
            ]
        );
    }

    #[test]
    fn test_unknown_buffs_encode_to_sentinel() {
        assert_eq!(encode_world_buffs(None), WORLD_BUFF_ERROR_SENTINEL);
        assert_eq!(encode_world_buffs(Some(&WorldBuffSet::new())), "[]");
    }

    #[test]
    fn test_any_error_marker_decodes_to_unknown() {
        let codec = codec();
        assert_eq!(codec.decode_world_buffs(WORLD_BUFF_ERROR_SENTINEL).unwrap(), None);
        assert_eq!(codec.decode_world_buffs("[ERROR]").unwrap(), None);
        assert_eq!(codec.decode_world_buffs("[RC,ERROR]").unwrap(), None);
    }

    #[test]
    fn test_empty_list_decodes_to_empty_set() {
        let decoded = codec().decode_world_buffs("[]").unwrap();
        assert_eq!(decoded, Some(WorldBuffSet::new()));
    }

    #[test]
    fn test_brackets_are_not_verified() {
        // The first and last characters are dropped whatever they are
        let decoded = codec().decode_world_buffs("(RC)").unwrap();
        assert_eq!(
            decoded.unwrap().into_iter().collect::<Vec<_>>(),
            vec![WorldBuff::RallyingCryOfTheDragonslayer]
        );
        assert!(matches!(
            codec().decode_world_buffs("RC,DMT"),
            Err(AttendanceError::UnknownBuffToken { token }) if token == "C"
        ));
        assert!(matches!(
            codec().decode_world_buffs("["),
            Err(AttendanceError::Format { field: "world_buffs", .. })
        ));
    }

    #[test]
    fn test_unknown_token_fails() {
        let result = codec().from_row(&sample_row("[ZZ]"));
        assert!(matches!(
            result,
            Err(AttendanceError::UnknownBuffToken { token }) if token == "ZZ"
        ));
    }

    #[test]
    fn test_non_numeric_raid_id_fails() {
        let mut row = sample_row("[RC]");
        row[columns::RAID_INSTANCE_ID] = "three".to_string();
        assert!(matches!(
            codec().from_row(&row),
            Err(AttendanceError::Format { field: "raid_instance_id", .. })
        ));
    }

    #[test]
    fn test_unknown_day_fails() {
        let mut row = sample_row("[RC]");
        row[columns::DAY_OF_WEEK] = "Wednesday".to_string();
        assert!(matches!(
            codec().from_row(&row),
            Err(AttendanceError::Format { field: "day_of_week", .. })
        ));
    }

    #[test]
    fn test_wrong_width_fails() {
        let mut row = sample_row("[RC]");
        row.pop();
        assert!(matches!(
            codec().from_row(&row),
            Err(AttendanceError::Format { field: "row", .. })
        ));
    }

    #[test]
    fn test_stored_fields_are_not_rederived() {
        // Day and verdict disagree with the date and the rule, and are kept as written
        let mut row = sample_row("[SF]");
        row[columns::DAY_OF_WEEK] = "SUNDAY".to_string();
        let entry = codec().from_row(&row).unwrap();

        assert_eq!(entry.day_of_week(), DayOfWeek::Sunday);
        assert!(entry.acceptable_wbuffs());
        assert!(entry.verdict_is_stale());
    }

    #[test]
    fn test_stored_bool_parsing() {
        assert!(parse_stored_bool("true"));
        assert!(parse_stored_bool("TRUE"));
        assert!(!parse_stored_bool("false"));
        assert!(!parse_stored_bool("yes"));
        assert!(!parse_stored_bool(""));
    }
}
