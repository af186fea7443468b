//! Territory/continent/adjacency graph.
//!
//! The graph is loaded once from a JSON map document and is read-only
//! afterwards. Territories are addressed by dense `TerritoryId` indices
//! assigned in continent order, so game state can use flat vectors for
//! ownership and army counts.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use thiserror::Error;

/// Dense index of a territory within a loaded map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TerritoryId(pub u16);

/// Dense index of a continent within a loaded map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContinentId(pub u8);

/// A territory node: its name, continent, and symmetric neighbour list.
#[derive(Debug, Clone)]
pub struct TerritoryInfo {
    pub name: String,
    pub continent: ContinentId,
    pub adjacent: Vec<TerritoryId>,
}

/// A continent: its name, reinforcement bonus, and ordered member list.
#[derive(Debug, Clone)]
pub struct ContinentInfo {
    pub name: String,
    pub bonus_armies: u32,
    pub members: Vec<TerritoryId>,
}

/// Errors that can occur when loading or validating a map document.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("failed to parse map JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("map has no territories")]
    EmptyMap,

    #[error("duplicate territory '{0}'")]
    DuplicateTerritory(String),

    #[error("duplicate continent '{0}'")]
    DuplicateContinent(String),

    #[error("continent '{continent}' lists unknown territory '{territory}'")]
    UnknownMember { continent: String, territory: String },

    #[error("territory '{0}' is not listed by any continent")]
    Unassigned(String),

    #[error("territory '{territory}' names continent '{named}' but is listed by '{listed}'")]
    ContinentMismatch {
        territory: String,
        named: String,
        listed: String,
    },

    #[error("territory '{territory}' lists unknown neighbour '{neighbour}'")]
    UnknownNeighbour { territory: String, neighbour: String },

    #[error("territory '{0}' lists itself as a neighbour")]
    SelfNeighbour(String),

    #[error("adjacency {a} -> {b} is not symmetric")]
    AsymmetricAdjacency { a: String, b: String },
}

/// The raw map document shape, as consumed from JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct MapConfig {
    pub continents: Vec<ContinentConfig>,
    /// Keyed by territory name. BTreeMap keeps iteration order stable so
    /// diagnostics are deterministic.
    pub territories: BTreeMap<String, TerritoryConfig>,
}

/// A continent entry in the map document.
#[derive(Debug, Clone, Deserialize)]
pub struct ContinentConfig {
    pub name: String,
    pub bonus_armies: u32,
    pub territories: Vec<String>,
}

/// A territory entry in the map document.
#[derive(Debug, Clone, Deserialize)]
pub struct TerritoryConfig {
    pub continent: String,
    pub adjacent_to: Vec<String>,
}

/// The validated, immutable board graph.
#[derive(Debug, Clone)]
pub struct MapGraph {
    territories: Vec<TerritoryInfo>,
    continents: Vec<ContinentInfo>,
    by_name: HashMap<String, TerritoryId>,
}

impl MapGraph {
    /// Parses and validates a map document from a JSON string.
    pub fn from_json(json: &str) -> Result<MapGraph, MapError> {
        let config: MapConfig = serde_json::from_str(json)?;
        MapGraph::from_config(&config)
    }

    /// Builds a validated graph from a parsed map document.
    ///
    /// Territory ids are assigned in continent order, then member order, so
    /// the same document always yields the same ids. Validation enforces the
    /// two structural invariants of the document: continents partition the
    /// territory set, and adjacency is symmetric.
    pub fn from_config(config: &MapConfig) -> Result<MapGraph, MapError> {
        if config.territories.is_empty() {
            return Err(MapError::EmptyMap);
        }

        // Assign ids in continent order.
        let mut by_name: HashMap<String, TerritoryId> = HashMap::new();
        let mut continents: Vec<ContinentInfo> = Vec::with_capacity(config.continents.len());
        let mut territory_names: Vec<&str> = Vec::with_capacity(config.territories.len());
        let mut seen_continents: HashMap<&str, ()> = HashMap::new();

        for cont in &config.continents {
            if seen_continents.insert(&cont.name, ()).is_some() {
                return Err(MapError::DuplicateContinent(cont.name.clone()));
            }
            let cid = ContinentId(continents.len() as u8);
            let mut members = Vec::with_capacity(cont.territories.len());
            for name in &cont.territories {
                if !config.territories.contains_key(name) {
                    return Err(MapError::UnknownMember {
                        continent: cont.name.clone(),
                        territory: name.clone(),
                    });
                }
                let tid = TerritoryId(territory_names.len() as u16);
                if by_name.insert(name.clone(), tid).is_some() {
                    return Err(MapError::DuplicateTerritory(name.clone()));
                }
                territory_names.push(name);
                members.push(tid);
            }
            continents.push(ContinentInfo {
                name: cont.name.clone(),
                bonus_armies: cont.bonus_armies,
                members,
            });
        }

        // Partition check: every territory entry must be claimed by a continent.
        for (name, entry) in &config.territories {
            let tid = match by_name.get(name) {
                Some(tid) => *tid,
                None => return Err(MapError::Unassigned(name.clone())),
            };
            // The continent that assigned this id.
            let listed = continents
                .iter()
                .find(|c| c.members.contains(&tid))
                .map(|c| c.name.clone())
                .unwrap_or_default();
            if entry.continent != listed {
                return Err(MapError::ContinentMismatch {
                    territory: name.clone(),
                    named: entry.continent.clone(),
                    listed,
                });
            }
        }

        // Resolve neighbour lists and check symmetry.
        let mut territories: Vec<TerritoryInfo> = territory_names
            .iter()
            .map(|name| {
                let entry = &config.territories[*name];
                let cid = continents
                    .iter()
                    .position(|c| c.name == entry.continent)
                    .map(|i| ContinentId(i as u8))
                    .unwrap_or(ContinentId(0));
                TerritoryInfo {
                    name: (*name).to_string(),
                    continent: cid,
                    adjacent: Vec::new(),
                }
            })
            .collect();

        for (name, entry) in &config.territories {
            let tid = by_name[name];
            let mut adjacent = Vec::with_capacity(entry.adjacent_to.len());
            for neighbour in &entry.adjacent_to {
                if neighbour == name {
                    return Err(MapError::SelfNeighbour(name.clone()));
                }
                let nid = match by_name.get(neighbour) {
                    Some(nid) => *nid,
                    None => {
                        return Err(MapError::UnknownNeighbour {
                            territory: name.clone(),
                            neighbour: neighbour.clone(),
                        })
                    }
                };
                if !config.territories[neighbour].adjacent_to.contains(name) {
                    return Err(MapError::AsymmetricAdjacency {
                        a: name.clone(),
                        b: neighbour.clone(),
                    });
                }
                adjacent.push(nid);
            }
            adjacent.sort();
            territories[tid.0 as usize].adjacent = adjacent;
        }

        Ok(MapGraph {
            territories,
            continents,
            by_name,
        })
    }

    pub fn territory_count(&self) -> usize {
        self.territories.len()
    }

    pub fn territory(&self, id: TerritoryId) -> &TerritoryInfo {
        &self.territories[id.0 as usize]
    }

    /// Display name of a territory.
    pub fn name(&self, id: TerritoryId) -> &str {
        &self.territories[id.0 as usize].name
    }

    /// Looks up a territory id by its exact name.
    pub fn territory_by_name(&self, name: &str) -> Option<TerritoryId> {
        self.by_name.get(name).copied()
    }

    /// Iterates all territory ids in id order.
    pub fn territory_ids(&self) -> impl Iterator<Item = TerritoryId> {
        (0..self.territories.len() as u16).map(TerritoryId)
    }

    pub fn continents(&self) -> &[ContinentInfo] {
        &self.continents
    }

    pub fn continent(&self, id: ContinentId) -> &ContinentInfo {
        &self.continents[id.0 as usize]
    }

    /// Returns true if the two territories share a border.
    pub fn are_adjacent(&self, a: TerritoryId, b: TerritoryId) -> bool {
        self.territories[a.0 as usize].adjacent.contains(&b)
    }
}

/// A 4-territory, 2-continent map shared by unit tests across the crate.
#[cfg(test)]
pub(crate) const TINY_MAP: &str = r#"{
        "continents": [
            {"name": "West", "bonus_armies": 3, "territories": ["Aria", "Boreal"]},
            {"name": "East", "bonus_armies": 2, "territories": ["Cinder", "Dune"]}
        ],
        "territories": {
            "Aria":   {"continent": "West", "adjacent_to": ["Boreal", "Cinder"]},
            "Boreal": {"continent": "West", "adjacent_to": ["Aria", "Dune"]},
            "Cinder": {"continent": "East", "adjacent_to": ["Aria", "Dune"]},
            "Dune":   {"continent": "East", "adjacent_to": ["Boreal", "Cinder"]}
        }
    }"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_tiny_map() {
        let map = MapGraph::from_json(TINY_MAP).unwrap();
        assert_eq!(map.territory_count(), 4);
        assert_eq!(map.continents().len(), 2);
        assert_eq!(map.continents()[0].bonus_armies, 3);
        assert_eq!(map.name(TerritoryId(0)), "Aria");
    }

    #[test]
    fn ids_follow_continent_order() {
        let map = MapGraph::from_json(TINY_MAP).unwrap();
        assert_eq!(map.territory_by_name("Aria"), Some(TerritoryId(0)));
        assert_eq!(map.territory_by_name("Boreal"), Some(TerritoryId(1)));
        assert_eq!(map.territory_by_name("Cinder"), Some(TerritoryId(2)));
        assert_eq!(map.territory_by_name("Dune"), Some(TerritoryId(3)));
        assert_eq!(map.territory_by_name("Atlantis"), None);
    }

    #[test]
    fn adjacency_is_symmetric_and_queriable() {
        let map = MapGraph::from_json(TINY_MAP).unwrap();
        let aria = map.territory_by_name("Aria").unwrap();
        let dune = map.territory_by_name("Dune").unwrap();
        let cinder = map.territory_by_name("Cinder").unwrap();
        assert!(map.are_adjacent(aria, cinder));
        assert!(map.are_adjacent(cinder, aria));
        assert!(!map.are_adjacent(aria, dune));
    }

    #[test]
    fn rejects_asymmetric_adjacency() {
        let json = r#"{
            "continents": [{"name": "C", "bonus_armies": 1, "territories": ["A", "B"]}],
            "territories": {
                "A": {"continent": "C", "adjacent_to": ["B"]},
                "B": {"continent": "C", "adjacent_to": []}
            }
        }"#;
        let err = MapGraph::from_json(json).unwrap_err();
        assert!(matches!(err, MapError::AsymmetricAdjacency { .. }));
    }

    #[test]
    fn rejects_unlisted_territory() {
        let json = r#"{
            "continents": [{"name": "C", "bonus_armies": 1, "territories": ["A"]}],
            "territories": {
                "A": {"continent": "C", "adjacent_to": ["B"]},
                "B": {"continent": "C", "adjacent_to": ["A"]}
            }
        }"#;
        let err = MapGraph::from_json(json).unwrap_err();
        assert!(matches!(err, MapError::Unassigned(ref n) if n == "B"));
    }

    #[test]
    fn rejects_continent_mismatch() {
        let json = r#"{
            "continents": [
                {"name": "C1", "bonus_armies": 1, "territories": ["A", "B"]},
                {"name": "C2", "bonus_armies": 1, "territories": []}
            ],
            "territories": {
                "A": {"continent": "C1", "adjacent_to": ["B"]},
                "B": {"continent": "C2", "adjacent_to": ["A"]}
            }
        }"#;
        let err = MapGraph::from_json(json).unwrap_err();
        assert!(matches!(err, MapError::ContinentMismatch { .. }));
    }

    #[test]
    fn rejects_self_neighbour() {
        let json = r#"{
            "continents": [{"name": "C", "bonus_armies": 1, "territories": ["A"]}],
            "territories": {
                "A": {"continent": "C", "adjacent_to": ["A"]}
            }
        }"#;
        let err = MapGraph::from_json(json).unwrap_err();
        assert!(matches!(err, MapError::SelfNeighbour(_)));
    }

    #[test]
    fn rejects_duplicate_listing() {
        let json = r#"{
            "continents": [
                {"name": "C1", "bonus_armies": 1, "territories": ["A"]},
                {"name": "C2", "bonus_armies": 1, "territories": ["A"]}
            ],
            "territories": {
                "A": {"continent": "C1", "adjacent_to": []}
            }
        }"#;
        let err = MapGraph::from_json(json).unwrap_err();
        assert!(matches!(err, MapError::DuplicateTerritory(_)));
    }

    #[test]
    fn rejects_empty_map() {
        let json = r#"{"continents": [], "territories": {}}"#;
        let err = MapGraph::from_json(json).unwrap_err();
        assert!(matches!(err, MapError::EmptyMap));
    }

    #[test]
    fn classic_map_loads() {
        let map = MapGraph::from_json(include_str!("../../maps/classic.json")).unwrap();
        assert_eq!(map.territory_count(), 42);
        assert_eq!(map.continents().len(), 6);

        let asia = map.continents().iter().find(|c| c.name == "Asia").unwrap();
        assert_eq!(asia.bonus_armies, 7);
        assert_eq!(asia.members.len(), 12);

        let alaska = map.territory_by_name("Alaska").unwrap();
        let kamchatka = map.territory_by_name("Kamchatka").unwrap();
        assert!(map.are_adjacent(alaska, kamchatka));
    }
}
