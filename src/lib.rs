//! Raid Attendance Library
//!
//! Tracks guild raid attendance and whether each player arrived with enough
//! world buffs.
//!
//! This library provides tools for:
//! - Building attendance entries from raid log input and judging their world buffs
//! - Encoding entries to and decoding them from nine-column spreadsheet rows
//! - Reading and writing rows through a spreadsheet-shaped [`store::RowStore`]
//! - Auditing stored attendance, including verdicts that no longer match the rule
//!
//! ```rust
//! use raid_attendance::{RowCodec, WorldBuff};
//!
//! # fn example() -> raid_attendance::Result<()> {
//! let codec = RowCodec::with_known_buffs()?;
//! let row = ["Sam", "WARRIOR", "3", "rep1", "01-01-2020", "WEDNESDAY", "Naxxramas", "[RC,DMT]", "true"];
//! let entry = codec.from_row(&row)?;
//!
//! assert!(entry.world_buffs().unwrap().contains(&WorldBuff::DireMaulTribute));
//! assert_eq!(codec.to_row(&entry), row);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod buffs;
pub mod cli;
pub mod codec;
pub mod config;
pub mod constants;
pub mod eligibility;
pub mod error;
pub mod ingest;
pub mod models;
pub mod report;
pub mod store;

// Re-export commonly used types
pub use buffs::{BuffTable, WorldBuff, WorldBuffSet};
pub use codec::RowCodec;
pub use config::Config;
pub use eligibility::world_buffs_acceptable;
pub use error::{AttendanceError, Result};
pub use models::{AttendanceEntry, DayOfWeek, EntryOrigin, Player, WowClass};
