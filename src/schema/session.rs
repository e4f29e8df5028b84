use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

use super::catalog::{Catalog, FactionId, HirelingRank, LandmarkId, MapId, Named};

/// Fixed number of hireling slots in a session record.
pub const HIRELING_SLOTS: usize = 3;
/// Fixed number of landmark slots in a session record.
pub const LANDMARK_SLOTS: usize = 3;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("RON serialization error: {0}")]
    RonWrite(#[from] ron::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A hireling slot: the hired faction, which side is up, and that side's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HirelingPick {
    pub faction: FactionId,
    pub rank: HirelingRank,
    pub name: String,
}

/// The setup of one game session.
///
/// `None` is the "no pick" sentinel. Slots are never omitted, so every
/// record has the same shape once serialized.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionRecord {
    pub player: Option<Named<FactionId>>,
    #[serde(default)]
    pub bots: Vec<Option<Named<FactionId>>>,
    #[serde(default)]
    pub hirelings: [Option<HirelingPick>; HIRELING_SLOTS],
    pub map: Option<Named<MapId>>,
    #[serde(default)]
    pub landmarks: [Option<Named<LandmarkId>>; LANDMARK_SLOTS],
}

impl SessionRecord {
    /// A record with every slot empty, standing in for "no prior session".
    pub fn empty(bot_slots: usize) -> Self {
        Self {
            bots: vec![None; bot_slots],
            ..Self::default()
        }
    }

    pub fn player_faction(&self) -> Option<FactionId> {
        self.player.as_ref().map(|p| p.id)
    }

    pub fn bot_factions(&self) -> Vec<FactionId> {
        self.bots.iter().flatten().map(|b| b.id).collect()
    }

    pub fn hireling_factions(&self) -> Vec<FactionId> {
        self.hirelings.iter().flatten().map(|h| h.faction).collect()
    }

    pub fn map_id(&self) -> Option<MapId> {
        self.map.as_ref().map(|m| m.id)
    }

    pub fn landmark_ids(&self) -> Vec<LandmarkId> {
        self.landmarks.iter().flatten().map(|l| l.id).collect()
    }

    /// Every faction named anywhere in the record, in slot order.
    pub fn all_factions(&self) -> Vec<FactionId> {
        let mut all: Vec<FactionId> = self.player_faction().into_iter().collect();
        all.extend(self.bot_factions());
        all.extend(self.hireling_factions());
        all
    }

    /// Returns the first slot that names an id the catalog does not know.
    ///
    /// Only ids are checked; display names are whatever the record stored.
    pub fn find_unknown(&self, catalog: &Catalog) -> Option<String> {
        if let Some(id) = self.player_faction() {
            if catalog.faction_name(id).is_none() {
                return Some(format!("player faction {:?}", id));
            }
        }
        for id in self.bot_factions() {
            if catalog.faction_name(id).is_none() {
                return Some(format!("bot faction {:?}", id));
            }
        }
        for id in self.hireling_factions() {
            if catalog.hireling(id).is_none() {
                return Some(format!("hireling faction {:?}", id));
            }
        }
        if let Some(id) = self.map_id() {
            if catalog.map_name(id).is_none() {
                return Some(format!("map {:?}", id));
            }
        }
        for id in self.landmark_ids() {
            if catalog.landmark_name(id).is_none() {
                return Some(format!("landmark {:?}", id));
            }
        }
        None
    }

    pub fn load_from_ron(path: &Path) -> Result<SessionRecord, RecordError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn parse_ron(input: &str) -> Result<SessionRecord, RecordError> {
        Ok(ron::from_str(input)?)
    }

    pub fn to_ron(&self) -> Result<String, RecordError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    pub fn load_from_json(path: &Path) -> Result<SessionRecord, RecordError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(input: &str) -> Result<SessionRecord, RecordError> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn to_json(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn slot_name<'a, T>(slot: &'a Option<T>, name: impl Fn(&'a T) -> &'a str) -> &'a str {
    slot.as_ref().map(name).unwrap_or("-")
}

impl fmt::Display for SessionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Player Faction: {}",
            slot_name(&self.player, |p| p.name.as_str())
        )?;
        let bots: Vec<&str> = self
            .bots
            .iter()
            .map(|b| slot_name(b, |b| b.name.as_str()))
            .collect();
        writeln!(f, "Enemies: {}", bots.join(", "))?;
        let hirelings: Vec<&str> = self
            .hirelings
            .iter()
            .flatten()
            .map(|h| h.name.as_str())
            .collect();
        writeln!(f, "Hirelings: {}", hirelings.join(", "))?;
        writeln!(f, "Map: {}", slot_name(&self.map, |m| m.name.as_str()))?;
        let landmarks: Vec<&str> = self
            .landmarks
            .iter()
            .flatten()
            .map(|l| l.name.as_str())
            .collect();
        write!(f, "Landmarks: {}", landmarks.join(", "))
    }
}
