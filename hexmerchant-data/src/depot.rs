use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::{EnumString, IntoStaticStr};

use crate::calendar::{ImperialDate, DAYS_PER_WEEK};
use crate::cargo::commodities::COMMODITIES;
use crate::cargo::{Cargo, Freight, PassageClass};
use crate::dice::{d6, roll, roll_diff};
use crate::errors::Errcode;
use crate::galaxy::coordinate::Coordinate;
use crate::galaxy::system::{StarSystem, TradeClass};
use crate::syslog::{Observer, Priority};

const FREIGHT_LOT_MULT: u32 = 5;
const MAX_PASSENGERS: i32 = 40;
const PARTIAL_PURCHASE_SURCHARGE: f64 = 0.01;

// Indexed by the clamped 2D roll minus 2
const ACTUAL_VALUE: [f64; 14] = [
    0.4, 0.5, 0.7, 0.8, 0.9, 1.0, 1.1, 1.2, 1.3, 1.5, 1.7, 2.0, 3.0, 4.0,
];

// Per origin population, (plus dice, minus dice) for high, middle and low passage
const ORIGIN_PASSENGERS: [[(u32, u32); 3]; 11] = [
    [(0, 0), (0, 0), (0, 0)],
    [(0, 0), (1, 2), (2, 3)],
    [(1, 2), (1, 1), (2, 2)],
    [(2, 2), (2, 1), (3, 2)],
    [(2, 1), (2, 1), (3, 1)],
    [(2, 1), (3, 2), (3, 1)],
    [(3, 2), (3, 2), (4, 2)],
    [(3, 2), (3, 1), (4, 1)],
    [(3, 1), (4, 2), (5, 2)],
    [(3, 1), (4, 1), (5, 1)],
    [(4, 1), (5, 1), (6, 1)],
];

// Per destination population, modifiers for high, middle and low passage
const DESTINATION_PASSENGERS: [[i32; 3]; 11] = [
    [-4, -4, -4],
    [-3, -3, -3],
    [-2, -2, -2],
    [-1, -1, -1],
    [0, 0, 0],
    [0, 0, 0],
    [0, 0, 0],
    [1, 1, 1],
    [1, 1, 2],
    [2, 2, 2],
    [2, 2, 3],
];

#[derive(EnumString, IntoStaticStr, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TradeKind {
    Purchase,
    Sale,
}

/// Maps a modified 2D roll to a price multiplier, the roll is clamped to 2..=15
pub fn actual_value(roll: i32) -> f64 {
    ACTUAL_VALUE[(roll.clamp(2, 15) - 2) as usize]
}

/// Price of `quantity` units of `lot` on a world with the given trade classes.
///
/// Purchases roll the multiplier once and cache it on the lot, buying less than
/// the whole lot adds a small surcharge before caching. Sales roll every time
/// and add the broker skill to the roll.
pub fn determine_price<R: Rng>(
    classes: &[TradeClass],
    kind: TradeKind,
    lot: &mut Cargo,
    quantity: u32,
    broker_skill: u8,
    rng: &mut R,
) -> i64 {
    let multiplier = match kind {
        TradeKind::Purchase => {
            if lot.price_adjustment == 0.0 {
                let dice = roll(rng, 2) as i32 + lot.purchase_dm(classes);
                let mut mult = actual_value(dice);
                if quantity < lot.quantity {
                    mult += PARTIAL_PURCHASE_SURCHARGE;
                }
                log::debug!("Purchase roll for {}: {dice} -> {mult}", lot.name);
                lot.price_adjustment = mult;
            }
            lot.price_adjustment
        }
        TradeKind::Sale => {
            let dice = roll(rng, 2) as i32 + lot.sale_dm(classes) + broker_skill as i32;
            actual_value(dice)
        }
    };
    (lot.unit_price as f64 * multiplier * quantity as f64).round() as i64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PassengerCounts {
    pub high: u32,
    pub middle: u32,
    pub low: u32,
}

impl PassengerCounts {
    pub fn get(&self, passage: PassageClass) -> u32 {
        match passage {
            PassageClass::High => self.high,
            PassageClass::Middle => self.middle,
            PassageClass::Low => self.low,
        }
    }

    fn get_mut(&mut self, passage: PassageClass) -> &mut u32 {
        match passage {
            PassageClass::High => &mut self.high,
            PassageClass::Middle => &mut self.middle,
            PassageClass::Low => &mut self.low,
        }
    }

    pub fn total(&self) -> u32 {
        self.high + self.middle + self.low
    }
}

/// Goods, freight and passengers on offer at one star system, restocked every week
#[derive(Debug, Clone)]
pub struct CargoDepot {
    system: StarSystem,
    destinations: Vec<StarSystem>,
    last_refresh: ImperialDate,
    cargo: Vec<Cargo>,
    freight: BTreeMap<Coordinate, Vec<u32>>,
    passengers: BTreeMap<Coordinate, PassengerCounts>,
}

impl CargoDepot {
    pub fn new<R: Rng>(
        system: StarSystem,
        destinations: Vec<StarSystem>,
        date: ImperialDate,
        rng: &mut R,
    ) -> CargoDepot {
        let mut depot = CargoDepot {
            system,
            destinations,
            last_refresh: date,
            cargo: vec![],
            freight: BTreeMap::new(),
            passengers: BTreeMap::new(),
        };
        depot.refresh(date, rng);
        depot
    }

    pub fn system(&self) -> &StarSystem {
        &self.system
    }

    pub fn destinations(&self) -> &[StarSystem] {
        &self.destinations
    }

    pub fn last_refresh(&self) -> ImperialDate {
        self.last_refresh
    }

    pub fn cargo(&self) -> &[Cargo] {
        &self.cargo
    }

    pub fn freight_for(&self, destination: &Coordinate) -> &[u32] {
        self.freight.get(destination).map(|f| f.as_slice()).unwrap_or(&[])
    }

    pub fn passengers_for(&self, destination: &Coordinate) -> PassengerCounts {
        self.passengers.get(destination).copied().unwrap_or_default()
    }

    pub fn on_new_date<R: Rng>(&mut self, date: ImperialDate, rng: &mut R, obs: &mut dyn Observer) {
        let elapsed = date.days_since(&self.last_refresh);
        if elapsed > 0 && elapsed % (DAYS_PER_WEEK as i64) == 0 {
            self.refresh(date, rng);
            obs.message(
                &format!("New cargo, freight and passengers are available at {}.", self.system.name),
                Priority::Info,
            );
        }
    }

    /// Replaces every offer, cached purchase prices go with the old lots
    pub fn refresh<R: Rng>(&mut self, date: ImperialDate, rng: &mut R) {
        self.last_refresh = date;
        self.cargo = vec![self.generate_cargo_lot(rng)];
        self.freight = self
            .destinations
            .iter()
            .map(|dest| (dest.coordinate, generate_freight(dest, rng)))
            .collect();
        let origin = self.system.population();
        self.passengers = self
            .destinations
            .iter()
            .map(|dest| (dest.coordinate, generate_passengers(origin, dest.population(), rng)))
            .collect();
        log::debug!(
            "Depot {} restocked on {date}: {} lot(s), {} destination(s)",
            self.system.name,
            self.cargo.len(),
            self.destinations.len()
        );
    }

    fn generate_cargo_lot<R: Rng>(&self, rng: &mut R) -> Cargo {
        let shift = match self.system.population() {
            0..=5 => -1,
            9.. => 1,
            _ => 0,
        };
        let tens = (d6(rng) as i32 + shift).clamp(1, 6) as usize;
        let units = d6(rng) as usize;
        let commodity = &COMMODITIES[(tens - 1) * 6 + (units - 1)];
        Cargo::from_commodity(commodity, Some(self.system.coordinate), rng)
    }

    pub fn insufficient_quantity(&self, index: usize, quantity: u32) -> bool {
        self.cargo.get(index).map_or(true, |lot| quantity > lot.quantity)
    }

    pub fn purchase_price<R: Rng>(&mut self, index: usize, quantity: u32, rng: &mut R) -> Result<i64, Errcode> {
        if quantity == 0 {
            return Err(Errcode::BuyNothing);
        }
        let Some(lot) = self.cargo.get_mut(index) else {
            return Err(Errcode::NoSuchCargoLot(index));
        };
        Ok(determine_price(
            self.system.trade_classes(),
            TradeKind::Purchase,
            lot,
            quantity,
            0,
            rng,
        ))
    }

    pub fn sale_price<R: Rng>(&self, lot: &Cargo, quantity: u32, broker_skill: u8, rng: &mut R) -> i64 {
        let mut lot = lot.clone();
        determine_price(
            self.system.trade_classes(),
            TradeKind::Sale,
            &mut lot,
            quantity,
            broker_skill,
            rng,
        )
    }

    /// Removes `quantity` units from a lot, dropping the lot once sold out
    pub fn take_cargo(&mut self, index: usize, quantity: u32) -> Result<Cargo, Errcode> {
        if quantity == 0 {
            return Err(Errcode::BuyNothing);
        }
        let Some(lot) = self.cargo.get_mut(index) else {
            return Err(Errcode::NoSuchCargoLot(index));
        };
        let taken = lot.take(quantity)?;
        if lot.quantity == 0 {
            self.cargo.remove(index);
        }
        Ok(taken)
    }

    /// Takes the smallest freight lots for `destination` as long as they fit in `max_tons`
    pub fn take_freight(&mut self, destination: Coordinate, max_tons: u32) -> Vec<Freight> {
        let source = self.system.coordinate;
        let Some(lots) = self.freight.get_mut(&destination) else {
            return vec![];
        };
        let mut room = max_tons;
        let mut taken = vec![];
        lots.retain(|&tons| {
            if tons <= room {
                room -= tons;
                taken.push(Freight {
                    tonnage: tons,
                    source,
                    destination,
                });
                false
            } else {
                true
            }
        });
        taken
    }

    pub fn take_passengers(
        &mut self,
        destination: Coordinate,
        passage: PassageClass,
        count: u32,
    ) -> Result<(), Errcode> {
        let available = self.passengers_for(&destination).get(passage);
        if count > available {
            return Err(Errcode::InsufficientStock(count, available));
        }
        if count > 0 {
            let counts = self.passengers.entry(destination).or_default();
            *counts.get_mut(passage) -= count;
        }
        Ok(())
    }
}

fn generate_freight<R: Rng>(destination: &StarSystem, rng: &mut R) -> Vec<u32> {
    let mut lots: Vec<u32> = (0..destination.population())
        .map(|_| d6(rng) * FREIGHT_LOT_MULT)
        .collect();
    lots.sort_unstable();
    lots
}

fn generate_passengers<R: Rng>(origin_pop: u8, dest_pop: u8, rng: &mut R) -> PassengerCounts {
    let origin = ORIGIN_PASSENGERS[origin_pop.min(10) as usize];
    let dms = DESTINATION_PASSENGERS[dest_pop.min(10) as usize];
    let mut counts = [0u32; 3];
    for (n, ((plus, minus), dm)) in origin.iter().zip(dms).enumerate() {
        counts[n] = (roll_diff(rng, *plus, *minus) + dm).clamp(0, MAX_PASSENGERS) as u32;
    }
    PassengerCounts {
        high: counts[0],
        middle: counts[1],
        low: counts[2],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cargo::commodities;
    use crate::syslog::Syslog;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn coord(x: i32, y: i32) -> Coordinate {
        Coordinate::new(x, y, -x - y).unwrap()
    }

    fn day(d: u32) -> ImperialDate {
        ImperialDate::new(d, 1105).unwrap()
    }

    fn depot(uwp: &str, rng: &mut StdRng) -> CargoDepot {
        let home = StarSystem::from_uwp("Regina", coord(0, 0), uwp, true).unwrap();
        let dests = vec![
            StarSystem::from_uwp("Efate", coord(1, 0), "A646930-D", false).unwrap(),
            StarSystem::from_uwp("Yori", coord(0, 1), "C560000-8", false).unwrap(),
        ];
        CargoDepot::new(home, dests, day(1), rng)
    }

    #[test]
    fn test_actual_value_table() {
        assert_eq!(actual_value(-3), 0.4);
        assert_eq!(actual_value(2), 0.4);
        assert_eq!(actual_value(7), 1.0);
        assert_eq!(actual_value(11), 1.5);
        assert_eq!(actual_value(15), 4.0);
        assert_eq!(actual_value(40), 4.0);
    }

    #[test]
    fn test_weekly_refresh() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut syslog = Syslog::default();
        let mut depot = depot("A788899-C", &mut rng);
        assert_eq!(depot.cargo().len(), 1);

        for d in 2..=7 {
            depot.on_new_date(day(d), &mut rng, &mut syslog);
            assert_eq!(depot.last_refresh(), day(1));
        }
        assert!(syslog.is_empty());
        depot.on_new_date(day(8), &mut rng, &mut syslog);
        assert_eq!(depot.last_refresh(), day(8));
        assert!(syslog.contains("Regina"));

        // Jumping straight to a non multiple of a week does not restock
        depot.on_new_date(day(18), &mut rng, &mut syslog);
        assert_eq!(depot.last_refresh(), day(8));
        depot.on_new_date(day(22), &mut rng, &mut syslog);
        assert_eq!(depot.last_refresh(), day(22));
    }

    #[test]
    fn test_refresh_clears_cached_price() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut depot = depot("A788899-C", &mut rng);
        let qty = depot.cargo()[0].quantity;
        depot.purchase_price(0, qty, &mut rng).unwrap();
        assert!(depot.cargo()[0].price_adjustment > 0.0);
        depot.refresh(day(8), &mut rng);
        assert_eq!(depot.cargo()[0].price_adjustment, 0.0);
    }

    #[test]
    fn test_cargo_lot_follows_population() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..100 {
            let low = depot("B665500-8", &mut rng);
            let key = commodities::by_name(&low.cargo()[0].name).unwrap().key;
            assert!(key < 60, "low population world rolled {key}");

            let high = depot("A220A98-F", &mut rng);
            let key = commodities::by_name(&high.cargo()[0].name).unwrap().key;
            assert!(key > 20, "high population world rolled {key}");
            assert_eq!(high.cargo()[0].source, Some(coord(0, 0)));
        }
    }

    #[test]
    fn test_freight_and_passenger_tables() {
        let mut rng = StdRng::seed_from_u64(6);
        for _ in 0..50 {
            let depot = depot("A788899-C", &mut rng);
            let efate = depot.freight_for(&coord(1, 0));
            assert_eq!(efate.len(), 9);
            assert!(efate.windows(2).all(|w| w[0] <= w[1]));
            assert!(efate.iter().all(|t| t % 5 == 0 && (5..=30).contains(t)));
            assert!(depot.freight_for(&coord(0, 1)).is_empty());

            let counts = depot.passengers_for(&coord(1, 0));
            assert!(counts.high <= 40 && counts.middle <= 40 && counts.low <= 40);
        }

        let empty_origin = depot("C560000-8", &mut rng);
        // No dice from an empty world, only the destination modifiers remain
        assert_eq!(
            empty_origin.passengers_for(&coord(1, 0)),
            PassengerCounts {
                high: 2,
                middle: 2,
                low: 2
            }
        );
        assert_eq!(empty_origin.passengers_for(&coord(0, 1)), PassengerCounts::default());
    }

    #[test]
    fn test_purchase_price_is_cached() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut depot = depot("A788899-C", &mut rng);
        let qty = depot.cargo()[0].quantity;
        let first = depot.purchase_price(0, qty, &mut rng).unwrap();
        let second = depot.purchase_price(0, qty, &mut rng).unwrap();
        assert_eq!(first, second);
        assert_eq!(depot.purchase_price(3, 1, &mut rng), Err(Errcode::NoSuchCargoLot(3)));
    }

    #[test]
    fn test_zero_units_are_refused() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut depot = depot("A788899-C", &mut rng);
        let qty = depot.cargo()[0].quantity;
        assert_eq!(depot.purchase_price(0, 0, &mut rng), Err(Errcode::BuyNothing));
        assert_eq!(depot.cargo()[0].price_adjustment, 0.0);
        assert_eq!(depot.take_cargo(0, 0), Err(Errcode::BuyNothing));
        assert_eq!(depot.cargo()[0].quantity, qty);
    }

    #[test]
    fn test_partial_purchase_surcharge() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut lot = Cargo::with_quantity(commodities::by_name("Steel").unwrap(), 10, None);
        let mut whole = lot.clone();
        let mut twin = StdRng::seed_from_u64(77);
        let mut twin2 = StdRng::seed_from_u64(77);

        determine_price(&[], TradeKind::Purchase, &mut whole, 10, 0, &mut twin);
        determine_price(&[], TradeKind::Purchase, &mut lot, 4, 0, &mut twin2);
        assert!((lot.price_adjustment - whole.price_adjustment - 0.01).abs() < 1e-9);

        let price = determine_price(&[], TradeKind::Purchase, &mut lot, 4, 0, &mut rng);
        assert_eq!(price, (500.0 * lot.price_adjustment * 4.0_f64).round() as i64);
    }

    #[test]
    fn test_sale_price_is_rolled_each_time() {
        let mut rng = StdRng::seed_from_u64(30);
        let lot = Cargo::with_quantity(commodities::by_name("Gems").unwrap(), 1, None);
        let mut copy = lot.clone();
        let prices: Vec<i64> = (0..20)
            .map(|_| determine_price(&[], TradeKind::Sale, &mut copy, 1, 0, &mut rng))
            .collect();
        assert_eq!(copy.price_adjustment, 0.0);
        assert!(prices.iter().any(|p| *p != prices[0]));

        // Broker skill pushes the roll up the table
        let best = determine_price(&[], TradeKind::Sale, &mut copy, 1, 20, &mut rng);
        assert_eq!(best, 4_000_000);
    }

    #[test]
    fn test_take_from_depot() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut depot = depot("A788899-C", &mut rng);
        let qty = depot.cargo()[0].quantity;
        assert!(!depot.insufficient_quantity(0, qty));
        assert!(depot.insufficient_quantity(0, qty + 1));
        assert!(depot.insufficient_quantity(1, 1));
        assert_eq!(depot.take_cargo(0, qty).unwrap().quantity, qty);
        assert!(depot.cargo().is_empty());

        let lots = depot.freight_for(&coord(1, 0)).to_vec();
        let taken = depot.take_freight(coord(1, 0), lots[0] + lots[1]);
        assert!(!taken.is_empty());
        assert!(taken.iter().map(|f| f.tonnage).sum::<u32>() <= lots[0] + lots[1]);
        assert_eq!(depot.freight_for(&coord(1, 0)).len(), lots.len() - taken.len());
        assert!(depot.take_freight(coord(5, -5), 100).is_empty());

        let avail = depot.passengers_for(&coord(1, 0)).low;
        assert_eq!(
            depot.take_passengers(coord(1, 0), PassageClass::Low, avail + 1),
            Err(Errcode::InsufficientStock(avail + 1, avail))
        );
        depot.take_passengers(coord(1, 0), PassageClass::Low, avail).unwrap();
        assert_eq!(depot.passengers_for(&coord(1, 0)).low, 0);
    }
}
