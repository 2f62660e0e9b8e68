use std::collections::BTreeMap;

use coordinate::Coordinate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use system::StarSystem;

use crate::errors::Errcode;

pub mod coordinate;
pub mod names;
pub mod system;

const DEEP_SPACE_PROBA: f64 = 0.5;
pub const SUBSECTOR_COLUMNS: i32 = 8;
pub const SUBSECTOR_ROWS: i32 = 10;

pub type SubsectorKey = (i32, i32);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Hex {
    StarSystem(StarSystem),
    DeepSpace(Coordinate),
}

impl Hex {
    pub fn coordinate(&self) -> Coordinate {
        match self {
            Hex::StarSystem(system) => system.coordinate,
            Hex::DeepSpace(coord) => *coord,
        }
    }

    pub fn as_system(&self) -> Option<&StarSystem> {
        let Hex::StarSystem(system) = self else {
            return None;
        };
        Some(system)
    }

    pub fn encode(&self) -> String {
        match self {
            Hex::StarSystem(system) => system.encode(),
            Hex::DeepSpace(coord) => format!("DeepSpace - {coord}"),
        }
    }

    pub fn decode(s: &str) -> Result<Hex, Errcode> {
        if let Some(coord) = s.trim().strip_prefix("DeepSpace - ") {
            return Ok(Hex::DeepSpace(coord.parse()?));
        }
        Ok(Hex::StarSystem(StarSystem::decode(s)?))
    }

    fn random<R: Rng>(coord: Coordinate, rng: &mut R) -> Hex {
        if rng.random_bool(DEEP_SPACE_PROBA) {
            Hex::DeepSpace(coord)
        } else {
            Hex::StarSystem(StarSystem::random(coord, rng))
        }
    }
}

/// Rectangle of 8 columns by 10 rows of the offset layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subsector {
    pub name: String,
    pub key: SubsectorKey,
}

impl Subsector {
    pub fn key_of(coord: &Coordinate) -> SubsectorKey {
        let (col, row) = coord.to_offset();
        (col.div_euclid(SUBSECTOR_COLUMNS), row.div_euclid(SUBSECTOR_ROWS))
    }

    pub fn contains(&self, coord: &Coordinate) -> bool {
        Subsector::key_of(coord) == self.key
    }
}

#[derive(Debug, Default, Clone)]
pub struct StarMap {
    hexes: BTreeMap<Coordinate, Hex>,
    order: Vec<Coordinate>,
    subsectors: BTreeMap<SubsectorKey, Subsector>,
}

impl StarMap {
    pub fn empty() -> StarMap {
        StarMap::default()
    }

    #[inline]
    pub fn distance(a: &Coordinate, b: &Coordinate) -> u32 {
        a.distance(b)
    }

    /// Every coordinate at distance 1..=radius from the origin
    pub fn get_coordinates_within_range(origin: &Coordinate, radius: u32) -> Vec<Coordinate> {
        let r = radius as i32;
        let mut coords = vec![];
        for dx in -r..=r {
            for dy in -r..=r {
                for dz in -r..=r {
                    if dx + dy + dz != 0 || (dx == 0 && dy == 0 && dz == 0) {
                        continue;
                    }
                    let Ok(delta) = Coordinate::new(dx, dy, dz) else {
                        continue;
                    };
                    let coord = *origin + delta;
                    if origin.distance(&coord) <= radius {
                        coords.push(coord);
                    }
                }
            }
        }
        coords
    }

    pub fn len(&self) -> usize {
        self.hexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hexes.is_empty()
    }

    pub fn contains(&self, coord: &Coordinate) -> bool {
        self.hexes.contains_key(coord)
    }

    /// Read a hex without generating it
    pub fn peek(&self, coord: &Coordinate) -> Option<&Hex> {
        self.hexes.get(coord)
    }

    pub fn system(&self, coord: &Coordinate) -> Option<&StarSystem> {
        self.hexes.get(coord)?.as_system()
    }

    pub fn system_mut(&mut self, coord: &Coordinate) -> Option<&mut StarSystem> {
        match self.hexes.get_mut(coord)? {
            Hex::StarSystem(system) => Some(system),
            Hex::DeepSpace(_) => None,
        }
    }

    /// Returns the hex, generating it first if this coordinate was never visited
    pub fn get<R: Rng>(&mut self, coord: &Coordinate, rng: &mut R) -> &Hex {
        if !self.hexes.contains_key(coord) {
            let hex = Hex::random(*coord, rng);
            self.insert(hex);
        }
        &self.hexes[coord]
    }

    /// Makes sure a star system sits on this coordinate, replacing deep space if needed
    pub fn generate_system<R: Rng>(&mut self, coord: &Coordinate, rng: &mut R) -> &StarSystem {
        if !matches!(self.hexes.get(coord), Some(Hex::StarSystem(_))) {
            let system = StarSystem::random(*coord, rng);
            if self.hexes.contains_key(coord) {
                log::warn!("Replacing deep space at {coord} with {}", system.name);
                self.hexes.insert(*coord, Hex::StarSystem(system));
            } else {
                self.insert(Hex::StarSystem(system));
            }
        }
        let Hex::StarSystem(ref system) = self.hexes[coord] else {
            unreachable!();
        };
        system
    }

    /// Explicit data import, returns false if the coordinate is already taken
    pub fn insert_system(&mut self, system: StarSystem) -> bool {
        if self.hexes.contains_key(&system.coordinate) {
            return false;
        }
        self.insert(Hex::StarSystem(system));
        true
    }

    fn insert(&mut self, hex: Hex) {
        let coord = hex.coordinate();
        let key = Subsector::key_of(&coord);
        self.subsectors.entry(key).or_insert_with(|| {
            let name = names::subsector_name(key);
            log::debug!("New subsector {name} at {key:?}");
            Subsector { name, key }
        });
        self.hexes.insert(coord, hex);
        self.order.push(coord);
    }

    /// Star systems within the radius, in the order they entered the map
    pub fn get_systems_within_range<R: Rng>(
        &mut self,
        origin: &Coordinate,
        radius: u32,
        rng: &mut R,
    ) -> Vec<&StarSystem> {
        for coord in StarMap::get_coordinates_within_range(origin, radius) {
            self.get(&coord, rng);
        }

        self.order
            .iter()
            .filter(|c| *c != origin && origin.distance(c) <= radius)
            .filter_map(|c| self.hexes.get(c)?.as_system())
            .collect()
    }

    /// Computes the in-range destinations and caches them on the system
    pub fn update_destinations<R: Rng>(
        &mut self,
        origin: &Coordinate,
        radius: u32,
        rng: &mut R,
    ) -> Vec<StarSystem> {
        let destinations: Vec<StarSystem> = self
            .get_systems_within_range(origin, radius, rng)
            .into_iter()
            .cloned()
            .collect();
        if let Some(system) = self.system_mut(origin) {
            system.destinations = destinations.iter().map(|s| s.coordinate).collect();
        }
        destinations
    }

    /// Every hex of the map, in the order they entered it
    pub fn hexes(&self) -> impl Iterator<Item = &Hex> {
        self.order.iter().filter_map(|c| self.hexes.get(c))
    }

    /// Restores a saved hex, returns false if the coordinate is already taken
    pub fn insert_hex(&mut self, hex: Hex) -> bool {
        if self.hexes.contains_key(&hex.coordinate()) {
            return false;
        }
        self.insert(hex);
        true
    }

    pub fn subsector_of(&self, coord: &Coordinate) -> Option<&Subsector> {
        self.subsectors.get(&Subsector::key_of(coord))
    }

    pub fn subsectors(&self) -> impl Iterator<Item = &Subsector> {
        self.subsectors.values()
    }

    pub fn hexes_in_subsector(&self, key: SubsectorKey) -> Vec<&Hex> {
        self.order
            .iter()
            .filter(|c| Subsector::key_of(c) == key)
            .filter_map(|c| self.hexes.get(c))
            .collect()
    }

    /// Discards every hex, they will be generated again on the next query
    pub fn rebuild(&mut self) {
        log::info!("Rebuilding star map, dropping {} hexes", self.hexes.len());
        self.hexes.clear();
        self.order.clear();
        self.subsectors.clear();
    }
}
