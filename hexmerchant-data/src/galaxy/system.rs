use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::dice::{d6, roll};
use crate::errors::{split_fields, Errcode};

use super::coordinate::Coordinate;
use super::names;

#[derive(
    EnumIter,
    EnumString,
    IntoStaticStr,
    Debug,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Clone,
    Copy,
    Hash,
)]
pub enum Starport {
    A,
    B,
    C,
    D,
    E,
    X,
}

impl Starport {
    pub fn from_roll(roll: u32) -> Starport {
        match roll {
            0..=4 => Starport::A,
            5 | 6 => Starport::B,
            7 | 8 => Starport::C,
            9 => Starport::D,
            10 | 11 => Starport::E,
            _ => Starport::X,
        }
    }

    pub fn sells_refined_fuel(&self) -> bool {
        matches!(self, Starport::A | Starport::B)
    }

    pub fn sells_unrefined_fuel(&self) -> bool {
        matches!(self, Starport::C | Starport::D)
    }

    pub fn has_repair_facilities(&self) -> bool {
        matches!(self, Starport::A | Starport::B | Starport::C)
    }

    pub fn has_shipyard(&self) -> bool {
        matches!(self, Starport::A | Starport::B)
    }

    fn tech_dm(&self) -> i32 {
        match self {
            Starport::A => 6,
            Starport::B => 4,
            Starport::C => 2,
            Starport::D | Starport::E => 0,
            Starport::X => -4,
        }
    }
}

#[derive(
    EnumIter,
    EnumString,
    IntoStaticStr,
    Debug,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Clone,
    Copy,
    Hash,
)]
pub enum TradeClass {
    #[strum(serialize = "Ag")]
    Agricultural,
    #[strum(serialize = "Na")]
    NonAgricultural,
    #[strum(serialize = "In")]
    Industrial,
    #[strum(serialize = "Ni")]
    NonIndustrial,
    #[strum(serialize = "Ri")]
    Rich,
    #[strum(serialize = "Po")]
    Poor,
}

impl TradeClass {
    pub fn applies(&self, uwp: &Uwp) -> bool {
        let (atm, hyd, pop, gov) = (uwp.atmosphere, uwp.hydrographics, uwp.population, uwp.government);
        match self {
            TradeClass::Agricultural => {
                (4..=9).contains(&atm) && (4..=8).contains(&hyd) && (5..=7).contains(&pop)
            }
            TradeClass::NonAgricultural => atm <= 3 && hyd <= 3 && pop >= 6,
            TradeClass::Industrial => [0, 1, 2, 4, 7, 9].contains(&atm) && pop >= 9,
            TradeClass::NonIndustrial => pop <= 6,
            TradeClass::Rich => (4..=9).contains(&gov) && [6, 8].contains(&atm) && (6..=8).contains(&pop),
            TradeClass::Poor => (2..=5).contains(&atm) && hyd <= 3,
        }
    }
}

/// Where the ship is within the current system
#[derive(
    EnumIter,
    EnumString,
    IntoStaticStr,
    Debug,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Clone,
    Copy,
    Default,
)]
#[strum(serialize_all = "lowercase")]
pub enum LocationDetail {
    #[default]
    Surface,
    Orbit,
    #[strum(serialize = "jump")]
    JumpPoint,
    Trade,
}

impl LocationDetail {
    /// Berthing fees are due in these locations
    pub fn is_docked(&self) -> bool {
        matches!(self, LocationDetail::Surface | LocationDetail::Trade)
    }
}

const ATMOSPHERE_MAX: i32 = 12;
const HYDRO_MAX: i32 = 10;
const POPULATION_MAX: i32 = 10;
const GOVERNMENT_MAX: i32 = 13;
const LAW_MAX: i32 = 9;
const TECH_MAX: i32 = 18;
const GAS_GIANT_MAX_ROLL: u32 = 9;

/// Universal world profile: starport and the six world attributes plus tech level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Uwp {
    pub starport: Starport,
    pub size: u8,
    pub atmosphere: u8,
    pub hydrographics: u8,
    pub population: u8,
    pub government: u8,
    pub law: u8,
    pub tech: u8,
}

#[inline]
fn clamp(value: i32, max: i32) -> u8 {
    value.clamp(0, max) as u8
}

impl Uwp {
    pub fn random<R: Rng>(rng: &mut R) -> Uwp {
        let starport = Starport::from_roll(roll(rng, 2));
        let size = roll(rng, 2) as i32 - 2;
        let atmosphere = if size == 0 {
            0
        } else {
            (roll(rng, 2) as i32 - 7 + size).clamp(0, ATMOSPHERE_MAX)
        };
        let hydrographics = if size <= 1 {
            0
        } else {
            let mut hyd = roll(rng, 2) as i32 - 7 + atmosphere;
            if atmosphere <= 1 || atmosphere >= 10 {
                hyd -= 4;
            }
            hyd.clamp(0, HYDRO_MAX)
        };
        let population = roll(rng, 2) as i32 - 2;
        let government = (roll(rng, 2) as i32 - 7 + population).clamp(0, GOVERNMENT_MAX);
        let law = (roll(rng, 2) as i32 - 7 + government).clamp(0, LAW_MAX);

        let mut uwp = Uwp {
            starport,
            size: size as u8,
            atmosphere: atmosphere as u8,
            hydrographics: hydrographics as u8,
            population: clamp(population, POPULATION_MAX),
            government: government as u8,
            law: law as u8,
            tech: 0,
        };
        uwp.tech = clamp(d6(rng) as i32 + uwp.tech_dm(), TECH_MAX);
        uwp
    }

    fn tech_dm(&self) -> i32 {
        let mut dm = self.starport.tech_dm();
        dm += match self.size {
            0 | 1 => 2,
            2..=4 => 1,
            _ => 0,
        };
        if self.atmosphere <= 3 || self.atmosphere >= 10 {
            dm += 1;
        }
        dm += match self.hydrographics {
            9 => 1,
            10 => 2,
            _ => 0,
        };
        dm += match self.population {
            1..=5 => 1,
            9 => 2,
            10 => 4,
            _ => 0,
        };
        dm += match self.government {
            0 | 5 => 1,
            13 => -2,
            _ => 0,
        };
        dm
    }
}

fn ehex(value: u8) -> char {
    std::char::from_digit(value as u32, 36)
        .unwrap_or('?')
        .to_ascii_uppercase()
}

impl std::fmt::Display for Uwp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let port: &'static str = self.starport.into();
        write!(
            f,
            "{}{}{}{}{}{}{}-{}",
            port,
            ehex(self.size),
            ehex(self.atmosphere),
            ehex(self.hydrographics),
            ehex(self.population),
            ehex(self.government),
            ehex(self.law),
            ehex(self.tech)
        )
    }
}

impl std::str::FromStr for Uwp {
    type Err = Errcode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Errcode::InvalidUwp(s.to_string());
        let chars: Vec<char> = s.trim().chars().collect();
        if chars.len() != 9 || chars[7] != '-' {
            return Err(invalid());
        }
        let starport = chars[0]
            .to_string()
            .parse::<Starport>()
            .map_err(|_| Errcode::UnknownTag("starport", chars[0].to_string()))?;

        let digit = |idx: usize, field: &'static str, max: u8| -> Result<u8, Errcode> {
            let c = chars[idx];
            let value = c
                .to_digit(36)
                .ok_or_else(|| Errcode::NotAnInteger(field, c.to_string()))? as u8;
            if value > max {
                return Err(Errcode::ValueOutOfRange(field, c.to_string()));
            }
            Ok(value)
        };
        Ok(Uwp {
            starport,
            size: digit(1, "size", 10)?,
            atmosphere: digit(2, "atmosphere", ATMOSPHERE_MAX as u8)?,
            hydrographics: digit(3, "hydrographics", HYDRO_MAX as u8)?,
            population: digit(4, "population", POPULATION_MAX as u8)?,
            government: digit(5, "government", GOVERNMENT_MAX as u8)?,
            law: digit(6, "law", LAW_MAX as u8)?,
            tech: digit(8, "tech", TECH_MAX as u8)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarSystem {
    pub name: String,
    pub coordinate: Coordinate,
    uwp: Uwp,
    gas_giant: bool,
    trade_classes: Vec<TradeClass>,

    #[serde(default)]
    pub destinations: Vec<Coordinate>,
    #[serde(default)]
    pub detail: LocationDetail,
}

impl StarSystem {
    pub fn new(name: String, coordinate: Coordinate, uwp: Uwp, gas_giant: bool) -> StarSystem {
        let trade_classes = TradeClass::iter().filter(|tc| tc.applies(&uwp)).collect();
        StarSystem {
            name,
            coordinate,
            uwp,
            gas_giant,
            trade_classes,
            destinations: vec![],
            detail: LocationDetail::default(),
        }
    }

    pub fn random<R: Rng>(coordinate: Coordinate, rng: &mut R) -> StarSystem {
        let name = names::world_name(rng);
        let uwp = Uwp::random(rng);
        let gas_giant = roll(rng, 2) <= GAS_GIANT_MAX_ROLL;
        log::debug!("Generated system {name} {uwp} at {coordinate}");
        StarSystem::new(name, coordinate, uwp, gas_giant)
    }

    pub fn from_uwp(
        name: &str,
        coordinate: Coordinate,
        uwp: &str,
        gas_giant: bool,
    ) -> Result<StarSystem, Errcode> {
        Ok(StarSystem::new(
            name.to_string(),
            coordinate,
            uwp.parse()?,
            gas_giant,
        ))
    }

    #[inline]
    pub fn uwp(&self) -> &Uwp {
        &self.uwp
    }

    #[inline]
    pub fn starport(&self) -> Starport {
        self.uwp.starport
    }

    #[inline]
    pub fn population(&self) -> u8 {
        self.uwp.population
    }

    #[inline]
    pub fn gas_giant(&self) -> bool {
        self.gas_giant
    }

    pub fn trade_classes(&self) -> &[TradeClass] {
        &self.trade_classes
    }

    pub fn has_class(&self, class: TradeClass) -> bool {
        self.trade_classes.contains(&class)
    }

    pub fn encode(&self) -> String {
        let gas_giant = if self.gas_giant { "G" } else { "None" };
        format!("{} - {} - {} - {}", self.name, self.coordinate, self.uwp, gas_giant)
    }

    pub fn decode(s: &str) -> Result<StarSystem, Errcode> {
        let fields = split_fields("StarSystem", s, 4)?;
        let gas_giant = match fields[3] {
            "G" => true,
            "None" => false,
            tag => return Err(Errcode::UnknownTag("gas giant", tag.to_string())),
        };
        StarSystem::from_uwp(fields[0], fields[1].parse()?, fields[2], gas_giant)
    }

    pub fn trade_codes(&self) -> String {
        self.trade_classes
            .iter()
            .map(|tc| <&'static str>::from(*tc))
            .collect::<Vec<&str>>()
            .join(" ")
    }
}

impl std::fmt::Display for StarSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {}{}",
            self.name,
            self.uwp,
            if self.gas_giant { "G " } else { "" },
            self.trade_codes()
        )
    }
}
