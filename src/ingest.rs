//! Batch decoding of stored attendance rows
//!
//! [`RowCodec::from_row`] fails a malformed row outright. Whole sheets are
//! decoded here, where a bad row is skipped and recorded so the rest of the
//! sheet is still usable.

use crate::codec::RowCodec;
use crate::models::AttendanceEntry;
use crate::store::{RangeSpec, RowStore};
use crate::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Decoded entries with basic statistics
#[derive(Debug, Clone)]
pub struct DecodeResult {
    /// Successfully decoded entries, in row order
    pub entries: Vec<AttendanceEntry>,

    pub stats: DecodeStats,
}

/// Outcome counters for one batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecodeStats {
    /// Rows seen, including skipped ones
    pub total_rows: usize,

    pub entries_decoded: usize,

    /// Rows skipped because they failed to decode
    pub rows_skipped: usize,

    /// One message per skipped row, prefixed with its position in the batch
    pub errors: Vec<String>,
}

impl DecodeStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decoded rows as a percentage of all rows
    pub fn success_rate(&self) -> f64 {
        if self.total_rows == 0 {
            0.0
        } else {
            (self.entries_decoded as f64 / self.total_rows as f64) * 100.0
        }
    }

    pub fn is_clean(&self) -> bool {
        self.rows_skipped == 0
    }
}

/// Decode every row, skipping rows that fail.
///
/// Blank rows (no cells, or only empty cells) are ignored rather than counted
/// as failures.
pub fn decode_rows<S: AsRef<str>>(codec: &RowCodec, rows: &[Vec<S>]) -> DecodeResult {
    let mut entries = Vec::with_capacity(rows.len());
    let mut stats = DecodeStats::new();

    for (index, row) in rows.iter().enumerate() {
        if row.iter().all(|cell| cell.as_ref().is_empty()) {
            continue;
        }
        stats.total_rows += 1;

        match codec.from_row(row) {
            Ok(entry) => {
                entries.push(entry);
                stats.entries_decoded += 1;
            }
            Err(e) => {
                warn!("Skipping row {}: {}", index + 1, e);
                stats.rows_skipped += 1;
                stats.errors.push(format!("row {}: {}", index + 1, e));
            }
        }
    }

    debug!(
        "Decoded {} of {} rows ({:.1}%)",
        stats.entries_decoded,
        stats.total_rows,
        stats.success_rate()
    );

    DecodeResult { entries, stats }
}

/// Decode every row, stopping at the first failure
pub fn decode_rows_strict<S: AsRef<str>>(
    codec: &RowCodec,
    rows: &[Vec<S>],
) -> Result<Vec<AttendanceEntry>> {
    rows.iter().map(|row| codec.from_row(row)).collect()
}

/// Fetch a range from a store and decode it, skipping bad rows
pub fn load_entries(
    store: &dyn RowStore,
    codec: &RowCodec,
    range: &RangeSpec,
) -> Result<DecodeResult> {
    let rows = store.fetch_rows(range)?;
    Ok(decode_rows(codec, &rows))
}

/// Encode entries and append them to a sheet, creating the sheet if missing
pub fn append_entries(
    store: &mut dyn RowStore,
    codec: &RowCodec,
    entries: &[AttendanceEntry],
    sheet: &str,
) -> Result<usize> {
    if !store.has_sheet(sheet)? {
        store.create_sheet(sheet)?;
    }
    let rows: Vec<Vec<String>> = entries.iter().map(|entry| codec.to_row(entry)).collect();
    store.append_rows(&rows, sheet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AttendanceError;
    use crate::store::MemoryStore;

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    fn good_row(name: &str) -> Vec<String> {
        row(&[
            name,
            "ROGUE",
            "1",
            "rep",
            "02-01-2020",
            "THURSDAY",
            "Molten Core",
            "[RC,DMT]",
            "true",
        ])
    }

    #[test]
    fn test_decode_rows_skips_bad_rows() {
        let codec = RowCodec::with_known_buffs().unwrap();
        let mut bad = good_row("Bad");
        bad[7] = "[XX]".to_string();
        let rows = vec![good_row("Ann"), bad, Vec::new(), good_row("Bob")];

        let result = decode_rows(&codec, &rows);

        assert_eq!(result.entries.len(), 2);
        assert_eq!(result.stats.total_rows, 3);
        assert_eq!(result.stats.rows_skipped, 1);
        assert!(result.stats.errors[0].starts_with("row 2:"));
        assert!(!result.stats.is_clean());
        assert!((result.stats.success_rate() - 66.666).abs() < 0.01);
    }

    #[test]
    fn test_decode_rows_strict_fails_fast() {
        let codec = RowCodec::with_known_buffs().unwrap();
        let mut bad = good_row("Bad");
        bad[2] = "x".to_string();

        let result = decode_rows_strict(&codec, &[good_row("Ann"), bad]);
        assert!(matches!(result, Err(AttendanceError::Format { .. })));
    }

    #[test]
    fn test_empty_batch_stats() {
        let stats = DecodeStats::new();
        assert_eq!(stats.success_rate(), 0.0);
        assert!(stats.is_clean());
    }

    #[test]
    fn test_append_then_load() {
        let codec = RowCodec::with_known_buffs().unwrap();
        let mut store = MemoryStore::new();
        let entries = decode_rows_strict(&codec, &[good_row("Ann"), good_row("Bob")]).unwrap();

        let appended = append_entries(&mut store, &codec, &entries, "Attendance").unwrap();
        assert_eq!(appended, 2);

        let loaded = load_entries(
            &store,
            &codec,
            &RangeSpec::parse("Attendance!A1:I").unwrap(),
        )
        .unwrap();
        assert_eq!(loaded.entries, entries);
    }
}
