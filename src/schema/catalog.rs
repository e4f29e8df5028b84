/// Static catalogs: faction, map, landmark and hireling tables.
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::hash::Hash;
use std::path::Path;
use thiserror::Error;

/// The catalog shipped with the crate, embedded at compile time.
const ROOT_CATALOG: &str = include_str!("../../catalog_data/root.ron");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("faction {0:?} is listed in '{1}' but has no entry in the faction table")]
    UnknownFaction(FactionId, &'static str),
    #[error("duplicate id {id} in '{table}'")]
    DuplicateEntry { table: &'static str, id: u32 },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Newtype wrapper for faction IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactionId(pub u32);

/// Newtype wrapper for map variant IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapId(pub u32);

/// Newtype wrapper for landmark IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkId(pub u32);

pub const MARQUISE: FactionId = FactionId(0);
pub const EYRIE: FactionId = FactionId(1);
pub const ALLIANCE: FactionId = FactionId(2);
pub const VAGABOND: FactionId = FactionId(3);
pub const RIVERFOLK: FactionId = FactionId(4);
pub const LIZARD: FactionId = FactionId(5);
pub const UNDERGROUND: FactionId = FactionId(6);
pub const CORVID: FactionId = FactionId(7);
pub const HUNDREDS: FactionId = FactionId(8);
pub const KEEPERS: FactionId = FactionId(9);
pub const BANDITS: FactionId = FactionId(10);
pub const PROTECTOR: FactionId = FactionId(11);
pub const BAND: FactionId = FactionId(12);

pub const AUTUMN: MapId = MapId(0);
pub const WINTER: MapId = MapId(1);
pub const LAKE: MapId = MapId(2);
pub const MOUNTAIN: MapId = MapId(3);

pub const TOWER: LandmarkId = LandmarkId(0);
pub const FERRY: LandmarkId = LandmarkId(1);
pub const CITY: LandmarkId = LandmarkId(2);
pub const TREETOP: LandmarkId = LandmarkId(3);
pub const FORGE: LandmarkId = LandmarkId(4);
pub const MARKET: LandmarkId = LandmarkId(5);

/// An id paired with its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Named<I> {
    pub id: I,
    pub name: String,
}

impl<I> Named<I> {
    pub fn new(id: I, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Which of a hireling's two printed sides is in play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HirelingRank {
    Primary,
    Secondary,
}

impl HirelingRank {
    pub fn index(self) -> usize {
        match self {
            Self::Primary => 0,
            Self::Secondary => 1,
        }
    }

    pub fn from_index(index: usize) -> Self {
        if index == 0 {
            Self::Primary
        } else {
            Self::Secondary
        }
    }
}

/// A faction that can be hired, with its primary and secondary variant names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HirelingEntry {
    pub faction: FactionId,
    pub variants: [String; 2],
}

impl HirelingEntry {
    pub fn variant(&self, rank: HirelingRank) -> &str {
        &self.variants[rank.index()]
    }
}

/// Read-only lookup tables for one game.
///
/// List order matters: candidate pools are built in catalog order, so the
/// same seed reproduces the same session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub factions: Vec<Named<FactionId>>,
    pub player_factions: Vec<FactionId>,
    pub bot_factions: Vec<FactionId>,
    pub hirelings: Vec<HirelingEntry>,
    pub maps: Vec<Named<MapId>>,
    pub landmarks: Vec<Named<LandmarkId>>,
}

impl Catalog {
    /// The built-in catalog for Root.
    pub fn root() -> Result<Catalog, CatalogError> {
        Self::parse_ron(ROOT_CATALOG)
    }

    /// Load and validate a catalog from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<Catalog, CatalogError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse and validate a catalog from a RON string.
    pub fn parse_ron(input: &str) -> Result<Catalog, CatalogError> {
        let catalog: Catalog = ron::from_str(input)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check that every referenced faction is named and no table repeats an id.
    pub fn validate(&self) -> Result<(), CatalogError> {
        check_unique("factions", self.factions.iter().map(|f| f.id), |id| id.0)?;
        check_unique("player_factions", self.player_factions.iter().copied(), |id| id.0)?;
        check_unique("bot_factions", self.bot_factions.iter().copied(), |id| id.0)?;
        check_unique("hirelings", self.hirelings.iter().map(|h| h.faction), |id| id.0)?;
        check_unique("maps", self.maps.iter().map(|m| m.id), |id| id.0)?;
        check_unique("landmarks", self.landmarks.iter().map(|l| l.id), |id| id.0)?;

        let referenced = [
            ("player_factions", self.player_factions.clone()),
            ("bot_factions", self.bot_factions.clone()),
            ("hirelings", self.hirelings.iter().map(|h| h.faction).collect()),
        ];
        for (table, ids) in referenced {
            if let Some(missing) = ids.into_iter().find(|id| self.faction_name(*id).is_none()) {
                return Err(CatalogError::UnknownFaction(missing, table));
            }
        }
        Ok(())
    }

    pub fn faction_name(&self, id: FactionId) -> Option<&str> {
        self.factions
            .iter()
            .find(|f| f.id == id)
            .map(|f| f.name.as_str())
    }

    /// Reverse lookup by display name, as stored in persisted records.
    pub fn faction_by_name(&self, name: &str) -> Option<FactionId> {
        self.factions.iter().find(|f| f.name == name).map(|f| f.id)
    }

    pub fn map_name(&self, id: MapId) -> Option<&str> {
        self.maps
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.name.as_str())
    }

    pub fn landmark_name(&self, id: LandmarkId) -> Option<&str> {
        self.landmarks
            .iter()
            .find(|l| l.id == id)
            .map(|l| l.name.as_str())
    }

    pub fn hireling(&self, faction: FactionId) -> Option<&HirelingEntry> {
        self.hirelings.iter().find(|h| h.faction == faction)
    }

    pub fn hireling_variant(&self, faction: FactionId, rank: HirelingRank) -> Option<&str> {
        self.hireling(faction).map(|h| h.variant(rank))
    }

    pub fn faction(&self, id: FactionId) -> Option<Named<FactionId>> {
        self.faction_name(id).map(|name| Named::new(id, name))
    }

    pub fn map(&self, id: MapId) -> Option<Named<MapId>> {
        self.map_name(id).map(|name| Named::new(id, name))
    }

    pub fn landmark(&self, id: LandmarkId) -> Option<Named<LandmarkId>> {
        self.landmark_name(id).map(|name| Named::new(id, name))
    }
}

fn check_unique<I, F>(
    table: &'static str,
    ids: impl Iterator<Item = I>,
    raw: F,
) -> Result<(), CatalogError>
where
    I: Copy + Eq + Hash,
    F: Fn(I) -> u32,
{
    let mut seen = FxHashSet::default();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateEntry { table, id: raw(id) });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_catalog_loads() {
        let catalog = Catalog::root().unwrap();
        assert_eq!(catalog.factions.len(), 13);
        assert_eq!(catalog.player_factions.len(), 10);
        assert_eq!(catalog.bot_factions.len(), 8);
        assert_eq!(catalog.hirelings.len(), 13);
        assert_eq!(catalog.maps.len(), 4);
        assert_eq!(catalog.landmarks.len(), 6);
    }

    #[test]
    fn root_catalog_names() {
        let catalog = Catalog::root().unwrap();
        assert_eq!(catalog.faction_name(RIVERFOLK), Some("Riverfolk Company"));
        assert_eq!(catalog.faction_name(CORVID), Some("Corvid Conspiracy"));
        assert_eq!(catalog.map_name(AUTUMN), Some("Autumn"));
        assert_eq!(catalog.landmark_name(FORGE), Some("Legendary Forge"));
        assert_eq!(
            catalog.hireling_variant(MARQUISE, HirelingRank::Secondary),
            Some("Feline Physicians")
        );
        assert_eq!(catalog.faction_name(FactionId(99)), None);
    }

    #[test]
    fn faction_by_name_round_trips() {
        let catalog = Catalog::root().unwrap();
        assert_eq!(catalog.faction_by_name("Woodland Alliance"), Some(ALLIANCE));
        assert_eq!(catalog.faction_by_name("Cats"), None);
    }

    #[test]
    fn faction_by_name_matches_stored_spellings() {
        let catalog = Catalog::root().unwrap();
        assert_eq!(catalog.faction_by_name("Lord Of The Hundreds"), Some(HUNDREDS));
        assert_eq!(catalog.faction_by_name("KeepersInIron"), Some(KEEPERS));
    }

    #[test]
    fn bot_factions_are_player_factions() {
        let catalog = Catalog::root().unwrap();
        for bot in &catalog.bot_factions {
            assert!(catalog.player_factions.contains(bot));
        }
    }

    #[test]
    fn unknown_faction_rejected() {
        let input = r#"(
            factions: [(id: 0, name: "Marquise de Cat")],
            player_factions: [0, 3],
            bot_factions: [],
            hirelings: [],
            maps: [(id: 0, name: "Autumn")],
            landmarks: [],
        )"#;
        let err = Catalog::parse_ron(input).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::UnknownFaction(FactionId(3), "player_factions")
        ));
    }

    #[test]
    fn duplicate_entry_rejected() {
        let input = r#"(
            factions: [(id: 0, name: "Marquise de Cat")],
            player_factions: [0],
            bot_factions: [0],
            hirelings: [],
            maps: [(id: 1, name: "Winter"), (id: 1, name: "Lake")],
            landmarks: [],
        )"#;
        let err = Catalog::parse_ron(input).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::DuplicateEntry { table: "maps", id: 1 }
        ));
    }

    #[test]
    fn malformed_ron_is_error() {
        assert!(matches!(
            Catalog::parse_ron("(factions: ["),
            Err(CatalogError::Ron(_))
        ));
    }

    #[test]
    fn rank_index_round_trip() {
        assert_eq!(HirelingRank::from_index(0), HirelingRank::Primary);
        assert_eq!(HirelingRank::from_index(1), HirelingRank::Secondary);
        assert_eq!(HirelingRank::Secondary.index(), 1);
    }
}
