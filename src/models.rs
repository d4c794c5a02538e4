//! Core data structures for raid attendance tracking.
//!
//! An [`AttendanceEntry`] records one player's presence at one raid. It is
//! created either fresh from raid log input, where the day of week and the
//! buff verdict are derived, or restored from a stored row, where both are
//! taken literally from what was written at the time.

use crate::buffs::WorldBuffSet;
use crate::constants::DATE_FORMAT;
use crate::eligibility::world_buffs_acceptable;
use crate::error::{AttendanceError, Result};
use chrono::{Datelike, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Character Class
// =============================================================================

/// Playable character classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WowClass {
    Druid,
    Hunter,
    Mage,
    Paladin,
    Priest,
    Rogue,
    Shaman,
    Warlock,
    Warrior,
}

impl WowClass {
    pub const ALL: [WowClass; 9] = [
        WowClass::Druid,
        WowClass::Hunter,
        WowClass::Mage,
        WowClass::Paladin,
        WowClass::Priest,
        WowClass::Rogue,
        WowClass::Shaman,
        WowClass::Warlock,
        WowClass::Warrior,
    ];

    /// Stored label, e.g. "WARRIOR"
    pub fn label(self) -> &'static str {
        match self {
            WowClass::Druid => "DRUID",
            WowClass::Hunter => "HUNTER",
            WowClass::Mage => "MAGE",
            WowClass::Paladin => "PALADIN",
            WowClass::Priest => "PRIEST",
            WowClass::Rogue => "ROGUE",
            WowClass::Shaman => "SHAMAN",
            WowClass::Warlock => "WARLOCK",
            WowClass::Warrior => "WARRIOR",
        }
    }
}

impl FromStr for WowClass {
    type Err = AttendanceError;

    fn from_str(s: &str) -> Result<Self> {
        WowClass::ALL
            .into_iter()
            .find(|class| class.label() == s)
            .ok_or_else(|| AttendanceError::format("player_class", s, "unknown character class"))
    }
}

impl fmt::Display for WowClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Player
// =============================================================================

/// Guild member identity; name is unique per roster
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub class: WowClass,
}

impl Player {
    pub fn new(name: impl Into<String>, class: WowClass) -> Self {
        Self {
            name: name.into(),
            class,
        }
    }
}

// =============================================================================
// Day of Week
// =============================================================================

/// Day of week as stored in attendance rows ("MONDAY" .. "SUNDAY")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DayOfWeek::Monday => "MONDAY",
            DayOfWeek::Tuesday => "TUESDAY",
            DayOfWeek::Wednesday => "WEDNESDAY",
            DayOfWeek::Thursday => "THURSDAY",
            DayOfWeek::Friday => "FRIDAY",
            DayOfWeek::Saturday => "SATURDAY",
            DayOfWeek::Sunday => "SUNDAY",
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

impl FromStr for DayOfWeek {
    type Err = AttendanceError;

    fn from_str(s: &str) -> Result<Self> {
        DayOfWeek::ALL
            .into_iter()
            .find(|day| day.label() == s)
            .ok_or_else(|| AttendanceError::format("day_of_week", s, "unknown day of week"))
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Attendance Entry
// =============================================================================

/// How an entry came to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryOrigin {
    /// Built from raid log input; derived fields were computed here
    Fresh,
    /// Decoded from a stored row; derived fields are historical values
    Stored,
}

/// One player's attendance at one raid instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceEntry {
    player: Player,
    raid_instance_id: i32,
    report_id: String,
    date: String,
    day_of_week: DayOfWeek,
    zone: String,
    world_buffs: Option<WorldBuffSet>,
    acceptable_wbuffs: bool,
    origin: EntryOrigin,
}

impl AttendanceEntry {
    /// Create an entry from raid log input.
    ///
    /// `world_buffs` is `None` when the buffs could not be determined; such an
    /// entry is never acceptable.
    pub fn new(
        player: Player,
        raid_instance_id: i32,
        report_id: impl Into<String>,
        date: NaiveDateTime,
        zone: impl Into<String>,
        world_buffs: Option<WorldBuffSet>,
    ) -> Self {
        let acceptable_wbuffs = world_buffs_acceptable(world_buffs.as_ref());

        Self {
            player,
            raid_instance_id,
            report_id: report_id.into(),
            date: date.format(DATE_FORMAT).to_string(),
            day_of_week: date.weekday().into(),
            zone: zone.into(),
            world_buffs,
            acceptable_wbuffs,
            origin: EntryOrigin::Fresh,
        }
    }

    /// Rebuild an entry from stored values without re-deriving anything
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn restore(
        player: Player,
        raid_instance_id: i32,
        report_id: String,
        date: String,
        day_of_week: DayOfWeek,
        zone: String,
        world_buffs: Option<WorldBuffSet>,
        acceptable_wbuffs: bool,
    ) -> Self {
        Self {
            player,
            raid_instance_id,
            report_id,
            date,
            day_of_week,
            zone,
            world_buffs,
            acceptable_wbuffs,
            origin: EntryOrigin::Stored,
        }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn raid_instance_id(&self) -> i32 {
        self.raid_instance_id
    }

    pub fn report_id(&self) -> &str {
        &self.report_id
    }

    /// Date in dd-MM-yyyy form
    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn day_of_week(&self) -> DayOfWeek {
        self.day_of_week
    }

    pub fn zone(&self) -> &str {
        &self.zone
    }

    /// Buffs present, or `None` when they could not be determined
    pub fn world_buffs(&self) -> Option<&WorldBuffSet> {
        self.world_buffs.as_ref()
    }

    pub fn acceptable_wbuffs(&self) -> bool {
        self.acceptable_wbuffs
    }

    pub fn origin(&self) -> EntryOrigin {
        self.origin
    }

    /// Whether the stored verdict differs from what the rule gives today.
    ///
    /// Always false for fresh entries.
    pub fn verdict_is_stale(&self) -> bool {
        self.acceptable_wbuffs != world_buffs_acceptable(self.world_buffs.as_ref())
    }
}
