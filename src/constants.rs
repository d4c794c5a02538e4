//! Application constants for the raid attendance tracker
//!
//! Row layout, text formats and configuration defaults shared by the
//! codec, the row stores and the CLI.

// =============================================================================
// Row Layout
// =============================================================================

/// Number of columns in one stored attendance row
pub const ROW_WIDTH: usize = 9;

/// Column indices of the stored attendance row
pub mod columns {
    pub const PLAYER_NAME: usize = 0;
    pub const PLAYER_CLASS: usize = 1;
    pub const RAID_INSTANCE_ID: usize = 2;
    pub const REPORT_ID: usize = 3;
    pub const DATE: usize = 4;
    pub const DAY_OF_WEEK: usize = 5;
    pub const ZONE: usize = 6;
    pub const WORLD_BUFFS: usize = 7;
    pub const ACCEPTABLE_WBUFFS: usize = 8;

    /// Header labels in column order
    pub const NAMES: [&str; super::ROW_WIDTH] = [
        "Player",
        "Class",
        "Raid ID",
        "Report ID",
        "Date",
        "Day",
        "Zone",
        "World Buffs",
        "Acceptable Buffs",
    ];
}

// =============================================================================
// Text Formats
// =============================================================================

/// Canonical stored date format (dd-MM-yyyy)
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Stored in place of the buff list when buffs could not be determined
pub const WORLD_BUFF_ERROR_SENTINEL: &str = "[ERROR. Were you in the first boss fight?]";

/// Any stripped buff field containing this marker decodes to "unknown"
pub const WORLD_BUFF_ERROR_MARKER: &str = "ERROR";

/// Separator between short tokens in the encoded buff list
pub const WORLD_BUFF_SEPARATOR: char = ',';

// =============================================================================
// Eligibility Rule
// =============================================================================

/// Distinct world buffs that qualify regardless of which ones they are
pub const MIN_DISTINCT_WORLD_BUFFS: usize = 3;

// =============================================================================
// Configuration Defaults
// =============================================================================

/// Application directory name under the platform config/data directories
pub const APP_DIR_NAME: &str = "raid-attendance";

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default sheet holding attendance rows
pub const DEFAULT_ATTENDANCE_SHEET: &str = "Attendance";

/// Default data range (below the header row, all nine columns)
pub const DEFAULT_DATA_RANGE: &str = "A2:I";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// File extension used by the file-backed row store
pub const SHEET_FILE_EXTENSION: &str = "tsv";

// =============================================================================
// Sheet Limits
// =============================================================================

/// Highest addressable row count of a sheet
pub const MAX_SHEET_ROWS: usize = 10_000_000;

/// Highest addressable column count of a sheet (A..ZZZ)
pub const MAX_SHEET_COLUMNS: usize = 18_278;

/// Environment variable overrides
pub mod env {
    pub const STORE_DIR: &str = "RAID_ATTENDANCE_STORE_DIR";
    pub const SHEET: &str = "RAID_ATTENDANCE_SHEET";
    pub const LOG_LEVEL: &str = "RAID_ATTENDANCE_LOG_LEVEL";
}
