//! Attendance audit over decoded entries.
//!
//! Summarises how many attendances met the world buff requirement and lists
//! stored verdicts that no longer agree with the rule. The report only points
//! them out; stored rows stay authoritative.

use crate::codec::encode_world_buffs;
use crate::ingest::DecodeStats;
use crate::models::{AttendanceEntry, WowClass};
use serde::Serialize;
use std::collections::BTreeMap;

/// Attendance tally for one name and class.
///
/// A name seen with two classes (a rerolled or renamed character) gets one
/// summary per class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSummary {
    pub name: String,
    pub class: WowClass,
    pub attendances: usize,
    pub acceptable: usize,
    pub unknown_buffs: usize,
}

impl PlayerSummary {
    /// Share of attendances with an acceptable verdict, as a percentage
    pub fn acceptable_rate(&self) -> f64 {
        if self.attendances == 0 {
            0.0
        } else {
            (self.acceptable as f64 / self.attendances as f64) * 100.0
        }
    }
}

/// Entry whose stored verdict disagrees with the rule
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaleVerdict {
    pub player: String,
    pub raid_instance_id: i32,
    pub report_id: String,
    pub date: String,
    pub world_buffs: String,
    pub stored_verdict: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AuditReport {
    pub total_entries: usize,
    pub acceptable: usize,
    pub not_acceptable: usize,
    /// Entries whose buffs could not be determined
    pub unknown_buffs: usize,
    pub stale_verdicts: Vec<StaleVerdict>,
    /// Players ordered by name, then class
    pub players: Vec<PlayerSummary>,
    pub decode: DecodeStats,
}

impl AuditReport {
    pub fn build(entries: &[AttendanceEntry], decode: DecodeStats) -> Self {
        let mut report = AuditReport {
            total_entries: entries.len(),
            decode,
            ..Default::default()
        };
        let mut players: BTreeMap<(&str, WowClass), PlayerSummary> = BTreeMap::new();

        for entry in entries {
            let player = entry.player();
            let summary = players
                .entry((player.name.as_str(), player.class))
                .or_insert_with(|| PlayerSummary {
                    name: player.name.clone(),
                    class: player.class,
                    attendances: 0,
                    acceptable: 0,
                    unknown_buffs: 0,
                });
            summary.attendances += 1;

            if entry.acceptable_wbuffs() {
                report.acceptable += 1;
                summary.acceptable += 1;
            } else {
                report.not_acceptable += 1;
            }

            if entry.world_buffs().is_none() {
                report.unknown_buffs += 1;
                summary.unknown_buffs += 1;
            }

            if entry.verdict_is_stale() {
                report.stale_verdicts.push(StaleVerdict {
                    player: player.name.clone(),
                    raid_instance_id: entry.raid_instance_id(),
                    report_id: entry.report_id().to_string(),
                    date: entry.date().to_string(),
                    world_buffs: encode_world_buffs(entry.world_buffs()),
                    stored_verdict: entry.acceptable_wbuffs(),
                });
            }
        }

        report.players = players.into_values().collect();
        report
    }
}
