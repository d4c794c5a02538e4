//! World buff enumeration and lookup tables.
//!
//! Every [`WorldBuff`] has a canonical name and a short token used in the
//! compact row encoding. [`BuffTable`] holds both directions of the mapping
//! and refuses to build if any name or token is claimed twice.

use crate::error::{AttendanceError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Set of world buffs carried by one player, ordered by declaration so
/// that encoding is stable.
pub type WorldBuffSet = BTreeSet<WorldBuff>;

/// World buffs tracked for raid attendance
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorldBuff {
    RallyingCryOfTheDragonslayer,
    DireMaulTribute,
    SpiritOfZandalar,
    SongflowerSerenade,
    WarchiefsBlessing,
    SaygesDarkFortune,
}

impl WorldBuff {
    /// All buffs in declaration order
    pub const ALL: [WorldBuff; 6] = [
        WorldBuff::RallyingCryOfTheDragonslayer,
        WorldBuff::DireMaulTribute,
        WorldBuff::SpiritOfZandalar,
        WorldBuff::SongflowerSerenade,
        WorldBuff::WarchiefsBlessing,
        WorldBuff::SaygesDarkFortune,
    ];

    /// Canonical in-game name
    pub fn name(self) -> &'static str {
        match self {
            WorldBuff::RallyingCryOfTheDragonslayer => "Rallying Cry of the Dragonslayer",
            WorldBuff::DireMaulTribute => "Dire Maul Tribute",
            WorldBuff::SpiritOfZandalar => "Spirit of Zandalar",
            WorldBuff::SongflowerSerenade => "Songflower Serenade",
            WorldBuff::WarchiefsBlessing => "Warchief's Blessing",
            WorldBuff::SaygesDarkFortune => "Sayge's Dark Fortune",
        }
    }

    /// Short token stored in encoded rows
    pub fn shorthand(self) -> &'static str {
        match self {
            WorldBuff::RallyingCryOfTheDragonslayer => "RC",
            WorldBuff::DireMaulTribute => "DMT",
            WorldBuff::SpiritOfZandalar => "ZG",
            WorldBuff::SongflowerSerenade => "SF",
            WorldBuff::WarchiefsBlessing => "WCB",
            WorldBuff::SaygesDarkFortune => "DMF",
        }
    }

    /// Map a combat log aura spell id to the buff it represents.
    ///
    /// The three Dire Maul tribute auras (Fengus' Ferocity, Mol'dar's Moxie,
    /// Slip'kik's Savvy) all count as a single Dire Maul Tribute.
    pub fn from_spell_id(spell_id: u32) -> Option<Self> {
        match spell_id {
            22888 => Some(WorldBuff::RallyingCryOfTheDragonslayer),
            22817 | 22818 | 22820 => Some(WorldBuff::DireMaulTribute),
            24425 => Some(WorldBuff::SpiritOfZandalar),
            15366 => Some(WorldBuff::SongflowerSerenade),
            16609 => Some(WorldBuff::WarchiefsBlessing),
            23735..=23738 | 23766..=23769 => Some(WorldBuff::SaygesDarkFortune),
            _ => None,
        }
    }
}

impl fmt::Display for WorldBuff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Build the buff set for a fresh record from the auras seen on a player.
///
/// Unrelated spell ids are ignored.
pub fn world_buffs_from_spell_ids<I>(spell_ids: I) -> WorldBuffSet
where
    I: IntoIterator<Item = u32>,
{
    spell_ids
        .into_iter()
        .filter_map(WorldBuff::from_spell_id)
        .collect()
}

/// Bidirectional lookup between buffs and their stored tokens
#[derive(Debug, Clone)]
pub struct BuffTable {
    by_shorthand: HashMap<&'static str, WorldBuff>,
    by_name: HashMap<String, WorldBuff>,
}

impl BuffTable {
    /// Build the table for every known buff, failing on any collision
    pub fn new() -> Result<Self> {
        Self::from_buffs(&WorldBuff::ALL)
    }

    fn from_buffs(buffs: &[WorldBuff]) -> Result<Self> {
        let mut by_shorthand = HashMap::with_capacity(buffs.len());
        let mut by_name = HashMap::with_capacity(buffs.len());

        for &buff in buffs {
            if by_shorthand.insert(buff.shorthand(), buff).is_some() {
                return Err(AttendanceError::DuplicateBuffMapping {
                    key: buff.shorthand().to_string(),
                });
            }
            if by_name.insert(buff.name().to_lowercase(), buff).is_some() {
                return Err(AttendanceError::DuplicateBuffMapping {
                    key: buff.name().to_string(),
                });
            }
        }

        Ok(Self {
            by_shorthand,
            by_name,
        })
    }

    /// Exact reverse lookup of a stored short token
    pub fn by_shorthand(&self, token: &str) -> Result<WorldBuff> {
        self.by_shorthand
            .get(token)
            .copied()
            .ok_or_else(|| AttendanceError::UnknownBuffToken {
                token: token.to_string(),
            })
    }

    /// Resolve user input given either as a short token or a canonical name
    pub fn resolve(&self, input: &str) -> Result<WorldBuff> {
        let trimmed = input.trim();
        if let Some(&buff) = self.by_shorthand.get(trimmed.to_uppercase().as_str()) {
            return Ok(buff);
        }
        self.by_name
            .get(&trimmed.to_lowercase())
            .copied()
            .ok_or_else(|| AttendanceError::UnknownBuffToken {
                token: trimmed.to_string(),
            })
    }

    /// Parse a comma-separated list of tokens or names
    pub fn resolve_list(&self, list: &str) -> Result<WorldBuffSet> {
        list.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| self.resolve(item))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.by_shorthand.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_shorthand.is_empty()
    }
}
