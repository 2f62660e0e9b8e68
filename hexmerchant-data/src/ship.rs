use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::{EnumString, IntoStaticStr};

use crate::cargo::{PassageClass, Passenger};
use crate::crew::{Crew, Skill};
use crate::dice::roll;
use crate::errors::{parse_int, split_fields, Errcode};
use crate::financials::MaintenanceStatus;
use crate::galaxy::coordinate::Coordinate;

pub mod hold;
pub mod model;

use hold::ShipHold;
use model::ShipModel;

pub const LIFE_SUPPORT_FULL: u32 = 100;
pub const REFINED_FUEL_PRICE: i64 = 500;
pub const UNREFINED_FUEL_PRICE: i64 = 100;
const LIFE_SUPPORT_STATEROOM_COST: i64 = 2_000;
const LIFE_SUPPORT_LOW_BERTH_COST: i64 = 100;

const MISJUMP_THRESHOLD: u32 = 12;
const NEGLECT_FAILURE_ROLL: u32 = 4;
const FIELD_REPAIR_TARGET: u32 = 8;

#[derive(EnumString, IntoStaticStr, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepairStatus {
    #[default]
    #[strum(serialize = "R")]
    Repaired,
    #[strum(serialize = "P")]
    Patched,
    #[strum(serialize = "B")]
    Broken,
}

#[derive(EnumString, IntoStaticStr, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum FuelQuality {
    #[default]
    #[strum(serialize = "R")]
    Refined,
    #[strum(serialize = "U")]
    Unrefined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpBlocker {
    Damaged(RepairStatus),
    NotEnoughFuel { have: u32, need: u32 },
    LifeSupport(u32),
}

impl JumpBlocker {
    pub fn message(&self) -> String {
        match self {
            JumpBlocker::Damaged(RepairStatus::Patched) => {
                "The drives are only patched, a starport repair is needed before jumping.".to_string()
            }
            JumpBlocker::Damaged(_) => "The drives are broken, repair them before jumping.".to_string(),
            JumpBlocker::NotEnoughFuel { have, need } => {
                format!("Not enough fuel to jump: {have} tons aboard, {need} tons needed.")
            }
            JumpBlocker::LifeSupport(level) => {
                format!("Life support is at {level}%, it must be full before jumping.")
            }
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Ship {
    pub name: String,
    pub model: ShipModel,
    fuel: u32,
    fuel_quality: FuelQuality,
    unrefined_jumps: u32,
    repair_status: RepairStatus,
    life_support: u32,

    #[serde(default)]
    pub hold: ShipHold,
    #[serde(default)]
    passengers: Vec<Passenger>,
    #[serde(default)]
    pub crew: Crew,
}

impl Ship {
    /// A freshly delivered ship, tanks and life support full
    pub fn new(name: &str, model: ShipModel) -> Ship {
        Ship {
            name: name.to_string(),
            model,
            fuel: model.fuel_capacity(),
            fuel_quality: FuelQuality::Refined,
            unrefined_jumps: 0,
            repair_status: RepairStatus::Repaired,
            life_support: LIFE_SUPPORT_FULL,
            hold: ShipHold::with_capacity(model.cargo_capacity()),
            passengers: vec![],
            crew: Crew::default(),
        }
    }

    pub fn fuel(&self) -> u32 {
        self.fuel
    }

    pub fn fuel_quality(&self) -> FuelQuality {
        self.fuel_quality
    }

    pub fn unrefined_jumps(&self) -> u32 {
        self.unrefined_jumps
    }

    pub fn repair_status(&self) -> RepairStatus {
        self.repair_status
    }

    pub fn life_support(&self) -> u32 {
        self.life_support
    }

    pub fn passengers(&self) -> &[Passenger] {
        &self.passengers
    }

    fn destinations(&self) -> BTreeSet<Coordinate> {
        self.hold
            .freight_destinations()
            .chain(self.passengers.iter().map(|p| p.destination))
            .collect()
    }

    /// The single world every freight lot and passenger is bound for.
    /// Recomputed on each call, fails if the ship carries contracts to several worlds.
    pub fn destination(&self) -> Result<Option<Coordinate>, Errcode> {
        let dests = self.destinations();
        if dests.len() > 1 {
            return Err(Errcode::DestinationConflict(dests.into_iter().collect()));
        }
        Ok(dests.into_iter().next())
    }

    pub fn would_conflict(&self, destination: Coordinate) -> bool {
        let mut dests = self.destinations();
        dests.insert(destination);
        dests.len() > 1
    }

    // Staterooms and low berths

    pub fn free_staterooms(&self) -> u32 {
        let used = self.passengers.iter().filter(|p| p.passage.needs_stateroom()).count() as u32;
        self.model.staterooms().saturating_sub(used)
    }

    pub fn free_low_berths(&self) -> u32 {
        let used = self.passengers.iter().filter(|p| !p.passage.needs_stateroom()).count() as u32;
        self.model.low_berths().saturating_sub(used)
    }

    pub fn has_berth_for(&self, passage: PassageClass, count: u32) -> bool {
        if passage.needs_stateroom() {
            count <= self.free_staterooms()
        } else {
            count <= self.free_low_berths()
        }
    }

    pub fn board(&mut self, passenger: Passenger) {
        log::debug!("{:?} passenger boards {} for {}", passenger.passage, self.name, passenger.destination);
        self.passengers.push(passenger);
    }

    pub fn disembark(&mut self, destination: Coordinate) -> Vec<Passenger> {
        let (leaving, staying) = std::mem::take(&mut self.passengers)
            .into_iter()
            .partition(|p| p.destination == destination);
        self.passengers = staying;
        leaving
    }

    // Jump drive

    pub fn jump_cost(&self) -> u32 {
        self.model.jump_fuel_cost()
    }

    pub fn jump_blockers(&self) -> Vec<JumpBlocker> {
        let mut blockers = vec![];
        if self.repair_status != RepairStatus::Repaired {
            blockers.push(JumpBlocker::Damaged(self.repair_status));
        }
        if self.fuel < self.jump_cost() {
            blockers.push(JumpBlocker::NotEnoughFuel {
                have: self.fuel,
                need: self.jump_cost(),
            });
        }
        if self.life_support < LIFE_SUPPORT_FULL {
            blockers.push(JumpBlocker::LifeSupport(self.life_support));
        }
        blockers
    }

    #[inline]
    pub fn can_jump(&self) -> bool {
        self.jump_blockers().is_empty()
    }

    /// Neglected drives may fail before the jump, returns false when they do
    pub fn pre_jump_check<R: Rng>(&mut self, maintenance: MaintenanceStatus, rng: &mut R) -> bool {
        if maintenance != MaintenanceStatus::Red {
            return true;
        }
        let dice = roll(rng, 2);
        if dice <= NEGLECT_FAILURE_ROLL {
            log::debug!("Ship {} drives failed from lack of maintenance ({dice})", self.name);
            self.repair_status = RepairStatus::Broken;
            return false;
        }
        true
    }

    /// Burns jump fuel and the whole life support, returns false without change if blocked
    pub fn jump(&mut self) -> bool {
        if !self.can_jump() {
            return false;
        }
        self.fuel -= self.jump_cost();
        self.life_support = 0;
        if self.fuel_quality == FuelQuality::Unrefined {
            self.unrefined_jumps += 1;
        }
        log::debug!(
            "Ship {} jumped, {} tons of fuel left, {} unrefined jumps",
            self.name,
            self.fuel,
            self.unrefined_jumps
        );
        true
    }

    /// Unrefined fuel wears the drives, returns false when they break
    pub fn post_jump_check<R: Rng>(&mut self, rng: &mut R) -> bool {
        if self.fuel_quality != FuelQuality::Unrefined {
            return true;
        }
        let dice = roll(rng, 2);
        if dice + self.unrefined_jumps >= MISJUMP_THRESHOLD {
            log::debug!(
                "Ship {} drives broke after jump ({dice} + {})",
                self.name,
                self.unrefined_jumps
            );
            self.repair_status = RepairStatus::Broken;
            return false;
        }
        true
    }

    /// Crew repair of broken drives, only gets them to a patched state
    pub fn field_repair<R: Rng>(&mut self, rng: &mut R) -> bool {
        if self.repair_status != RepairStatus::Broken {
            return false;
        }
        let skill = self.crew.best_skill(Skill::Engineering) as u32;
        let dice = roll(rng, 2);
        if dice + skill >= FIELD_REPAIR_TARGET {
            log::debug!("Ship {} drives patched ({dice} + {skill})", self.name);
            self.repair_status = RepairStatus::Patched;
            true
        } else {
            false
        }
    }

    pub fn starport_repair(&mut self) -> bool {
        if self.repair_status == RepairStatus::Repaired {
            return false;
        }
        log::debug!("Ship {} repaired at the starport", self.name);
        self.repair_status = RepairStatus::Repaired;
        true
    }

    pub fn annual_maintenance(&mut self) {
        self.repair_status = RepairStatus::Repaired;
        self.unrefined_jumps = 0;
    }

    // Fuel and life support

    pub fn fuel_space(&self) -> u32 {
        self.model.fuel_capacity().saturating_sub(self.fuel)
    }

    /// Adds up to `tons` of fuel, returns the amount actually pumped
    pub fn refuel(&mut self, tons: u32, quality: FuelQuality) -> u32 {
        let added = tons.min(self.fuel_space());
        if added == 0 {
            return 0;
        }
        match quality {
            FuelQuality::Unrefined => self.fuel_quality = FuelQuality::Unrefined,
            FuelQuality::Refined if self.fuel == 0 => self.fuel_quality = FuelQuality::Refined,
            FuelQuality::Refined => {}
        }
        self.fuel += added;
        added
    }

    pub fn life_support_cost(&self) -> i64 {
        let crew = self.crew.len() as i64 * LIFE_SUPPORT_STATEROOM_COST;
        let passengers: i64 = self
            .passengers
            .iter()
            .map(|p| {
                if p.passage.needs_stateroom() {
                    LIFE_SUPPORT_STATEROOM_COST
                } else {
                    LIFE_SUPPORT_LOW_BERTH_COST
                }
            })
            .sum();
        crew + passengers
    }

    pub fn recharge_life_support(&mut self) {
        self.life_support = LIFE_SUPPORT_FULL;
    }

    pub fn encode(&self) -> String {
        let quality: &'static str = self.fuel_quality.into();
        let status: &'static str = self.repair_status.into();
        format!(
            "{} - {} - {} - {} - {} - {}",
            self.name, self.fuel, quality, self.unrefined_jumps, status, self.life_support
        )
    }

    /// Restores the ship state, hold, passengers and crew are loaded separately
    pub fn decode(s: &str, model: ShipModel) -> Result<Ship, Errcode> {
        let fields = split_fields("Ship", s, 6)?;
        let fuel = parse_int::<u32>("fuel", fields[1])?;
        if fuel > model.fuel_capacity() {
            return Err(Errcode::ValueOutOfRange("fuel", fields[1].to_string()));
        }
        let fuel_quality = fields[2]
            .parse::<FuelQuality>()
            .map_err(|_| Errcode::UnknownTag("fuel quality", fields[2].to_string()))?;
        let unrefined_jumps = parse_int::<u32>("unrefined jump counter", fields[3])?;
        let repair_status = fields[4]
            .parse::<RepairStatus>()
            .map_err(|_| Errcode::UnknownTag("repair status", fields[4].to_string()))?;
        let life_support = parse_int::<u32>("life support", fields[5])?;
        if life_support > LIFE_SUPPORT_FULL {
            return Err(Errcode::ValueOutOfRange("life support", fields[5].to_string()));
        }

        Ok(Ship {
            fuel,
            fuel_quality,
            unrefined_jumps,
            repair_status,
            life_support,
            ..Ship::new(fields[0], model)
        })
    }
}
