use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::calendar::{Calendar, DateChange, ImperialDate, Subscriber};
use crate::cargo::{Baggage, PassageClass, Passenger};
use crate::config::GameConfig;
use crate::crew::Skill;
use crate::depot::CargoDepot;
use crate::dice::roll;
use crate::errors::Errcode;
use crate::financials::Financials;
use crate::galaxy::coordinate::Coordinate;
use crate::galaxy::system::{LocationDetail, StarSystem};
use crate::galaxy::{Hex, StarMap};
use crate::ship::hold::HoldItem;
use crate::ship::{FuelQuality, Ship, REFINED_FUEL_PRICE, UNREFINED_FUEL_PRICE};
use crate::syslog::{Observer, Priority, Syslog};

const LOW_PASSAGE_SURVIVAL: u32 = 5;

/// Everything needed to restore a game, in the persisted text encodings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveState {
    pub date: String,
    pub location: String,
    pub detail: String,
    pub hexes: Vec<String>,
    pub ship: String,
    pub financials: String,
    pub hold: Vec<String>,
    pub passengers: Vec<String>,
}

pub struct Game {
    pub map: StarMap,
    calendar: Calendar,
    depot: CargoDepot,
    pub ship: Ship,
    financials: Financials,
    location: Coordinate,
    jump_range: u32,
    rng: StdRng,
    pub syslog: Syslog,
}

impl Game {
    /// Starts a new game on the surface of the home world
    pub fn new(config: &GameConfig) -> Result<Game, Errcode> {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let date = config.start_date()?;
        let model = config.model()?;
        let jump_range = config.jump_range()?;
        let mut syslog = Syslog::with_capacity(config.syslog_capacity);

        let home = Coordinate::origin();
        let mut map = StarMap::empty();
        match config.home_uwp {
            Some(ref uwp) => {
                let system = StarSystem::from_uwp(&config.home_name, home, uwp, true)?;
                map.insert_system(system);
            }
            None => {
                map.generate_system(&home, &mut rng);
            }
        }

        let mut ship = Ship::new(&config.ship_name, model);
        for member in config.crew.iter() {
            ship.crew.hire(member.clone());
        }

        let depot = build_depot(&mut map, home, jump_range, date, &mut rng)?;
        let mut financials = Financials::new(config.starting_balance, date)
            .with_obligations(ship.crew.sum_salaries(), model.loan_payment());
        financials.dock(date, &depot.system().name, &mut syslog);

        log::info!("New game started at {} on {date}", depot.system());
        Ok(Game {
            map,
            calendar: Calendar::with_default_subscribers(date),
            depot,
            ship,
            financials,
            location: home,
            jump_range,
            rng,
            syslog,
        })
    }

    /// Changes the order in which components hear about date changes
    pub fn with_subscribers(mut self, subscribers: Vec<Subscriber>) -> Game {
        self.calendar = Calendar::new(self.calendar.current(), subscribers);
        self
    }

    #[inline]
    pub fn date(&self) -> ImperialDate {
        self.calendar.current()
    }

    pub fn location(&self) -> Coordinate {
        self.location
    }

    pub fn detail(&self) -> LocationDetail {
        self.map
            .system(&self.location)
            .map(|s| s.detail)
            .unwrap_or_default()
    }

    pub fn system(&self) -> &StarSystem {
        self.depot.system()
    }

    pub fn depot(&self) -> &CargoDepot {
        &self.depot
    }

    pub fn financials(&self) -> &Financials {
        &self.financials
    }

    pub fn jump_range(&self) -> u32 {
        self.jump_range
    }

    fn set_detail(&mut self, detail: LocationDetail) {
        log::debug!("{} location changes from {:?} to {detail:?}", self.ship.name, self.detail());
        if let Some(system) = self.map.system_mut(&self.location) {
            system.detail = detail;
        }
    }

    fn warn(&mut self, text: &str) -> bool {
        self.syslog.message(text, Priority::Warn);
        false
    }

    fn require_detail(&mut self, detail: LocationDetail, action: &str) -> bool {
        if self.detail() == detail {
            return true;
        }
        let here: &'static str = self.detail().into();
        let wanted: &'static str = detail.into();
        self.warn(&format!("Cannot {action} from {here}, you need to be at {wanted}."))
    }

    fn require_docked(&mut self, action: &str) -> bool {
        if self.detail().is_docked() {
            return true;
        }
        self.warn(&format!("Cannot {action} unless docked at the starport."))
    }

    // Calendar

    pub fn advance_day(&mut self) {
        let change = self.calendar.advance_day();
        self.notify(change);
    }

    pub fn plus_week(&mut self) {
        let change = self.calendar.plus_week();
        self.notify(change);
    }

    fn notify(&mut self, change: DateChange) {
        let location = self.depot.system().name.clone();
        let docked = self.detail().is_docked();
        for subscriber in change.subscribers {
            match subscriber {
                Subscriber::CargoDepot => {
                    self.depot.on_new_date(change.date, &mut self.rng, &mut self.syslog)
                }
                Subscriber::Financials => {
                    self.financials.set_monthly_salary(self.ship.crew.sum_salaries());
                    self.financials
                        .on_new_date(change.date, &location, docked, &mut self.syslog);
                }
            }
        }
    }

    // Movement within a system

    pub fn liftoff(&mut self) -> bool {
        if !self.require_detail(LocationDetail::Surface, "lift off") {
            return false;
        }
        self.financials.undock();
        self.set_detail(LocationDetail::Orbit);
        self.syslog.message(&format!("{} lifts off to orbit.", self.ship.name), Priority::Info);
        true
    }

    /// Lands on the starport, pays the berth and delivers what is bound here
    pub fn land(&mut self) -> bool {
        if !self.require_detail(LocationDetail::Orbit, "land") {
            return false;
        }
        self.set_detail(LocationDetail::Surface);
        let name = self.depot.system().name.clone();
        let date = self.date();
        self.financials.dock(date, &name, &mut self.syslog);
        self.deliver();
        true
    }

    fn deliver(&mut self) {
        let date = self.date();
        let name = self.depot.system().name.clone();
        for item in self.ship.hold.unload_for(self.location) {
            if let HoldItem::Freight(freight) = item {
                let memo = format!("Delivered {} tons of freight.", freight.tonnage);
                self.financials.credit(date, &name, freight.revenue(), &memo);
                self.syslog.message(&memo, Priority::Info);
            }
        }

        let arrived = self.ship.disembark(self.location);
        let medic = self.ship.crew.best_skill(Skill::Medical) as u32;
        let mut low = vec![];
        for passenger in arrived {
            if passenger.passage == PassageClass::Low {
                low.push(passenger);
            } else {
                self.syslog.message(
                    &format!("A {} passage passenger disembarks.", <&'static str>::from(passenger.passage)),
                    Priority::Info,
                );
            }
        }
        if low.is_empty() {
            return;
        }
        let survivors = low
            .iter()
            .filter(|_| roll(&mut self.rng, 2) + medic >= LOW_PASSAGE_SURVIVAL)
            .count() as u32;
        self.syslog.message(
            &format!("{survivors} of {} low passengers survived the trip.", low.len()),
            Priority::Info,
        );
        if low.iter().any(|p| p.guess == survivors) {
            self.syslog
                .message("A low passenger guessed the number of survivors and wins the lottery.", Priority::Info);
        }
    }

    pub fn to_jump_point(&mut self) -> bool {
        if !self.require_detail(LocationDetail::Orbit, "travel to the jump point") {
            return false;
        }
        self.set_detail(LocationDetail::JumpPoint);
        self.advance_day();
        true
    }

    pub fn to_orbit(&mut self) -> bool {
        if !self.require_detail(LocationDetail::JumpPoint, "travel to orbit") {
            return false;
        }
        self.set_detail(LocationDetail::Orbit);
        self.advance_day();
        true
    }

    pub fn enter_depot(&mut self) -> bool {
        if !self.require_detail(LocationDetail::Surface, "enter the trade depot") {
            return false;
        }
        self.set_detail(LocationDetail::Trade);
        true
    }

    pub fn leave_depot(&mut self) -> bool {
        if !self.require_detail(LocationDetail::Trade, "leave the trade depot") {
            return false;
        }
        self.set_detail(LocationDetail::Surface);
        true
    }

    // Jump

    /// Jumps to another system, one week passes in jump space.
    /// Only a destination conflict among the ship contracts is a hard error.
    pub fn jump(&mut self, destination: Coordinate) -> Result<bool, Errcode> {
        if !self.require_detail(LocationDetail::JumpPoint, "jump") {
            return Ok(false);
        }
        let distance = self.location.distance(&destination);
        if distance == 0 || distance > self.jump_range {
            return Ok(self.warn(&format!(
                "{destination} is {distance} parsecs away, out of jump range ({}).",
                self.jump_range
            )));
        }
        if self.map.get(&destination, &mut self.rng).as_system().is_none() {
            return Ok(self.warn(&format!("There is no star system at {destination}.")));
        }
        if let Some(bound) = self.ship.destination()? {
            if bound != destination {
                return Ok(self.warn(&format!(
                    "Freight and passengers aboard are bound for {bound}, not {destination}."
                )));
            }
        }
        let blockers = self.ship.jump_blockers();
        if !blockers.is_empty() {
            for blocker in blockers {
                self.syslog.message(&blocker.message(), Priority::Warn);
            }
            return Ok(false);
        }
        let maintenance = self.financials.maintenance_status();
        if !self.ship.pre_jump_check(maintenance, &mut self.rng) {
            self.syslog.message(
                "The jump drives fail from lack of maintenance, the ship is stranded.",
                Priority::Alert,
            );
            return Ok(false);
        }

        self.ship.jump();
        log::debug!("{} jumps from {} to {destination}", self.ship.name, self.location);
        self.plus_week();

        self.set_detail(LocationDetail::Surface);
        self.location = destination;
        self.set_detail(LocationDetail::JumpPoint);
        if !self.ship.post_jump_check(&mut self.rng) {
            self.syslog.message(
                "The drives broke down during the jump, unrefined fuel took its toll.",
                Priority::Alert,
            );
        }
        let date = self.date();
        self.depot = build_depot(&mut self.map, destination, self.jump_range, date, &mut self.rng)?;
        self.syslog.message(
            &format!("Arrived at the jump point of {}.", self.depot.system()),
            Priority::Info,
        );
        Ok(true)
    }

    // Trading

    pub fn quote_purchase(&mut self, index: usize, quantity: u32) -> Option<i64> {
        if !self.require_detail(LocationDetail::Trade, "buy cargo") {
            return None;
        }
        if quantity == 0 {
            self.warn(&Errcode::BuyNothing.errmsg());
            return None;
        }
        if self.depot.insufficient_quantity(index, quantity) {
            self.warn("The depot does not have that much cargo.");
            return None;
        }
        let price = self.depot.purchase_price(index, quantity, &mut self.rng).ok()?;
        let name = self.depot.cargo()[index].name.clone();
        self.syslog.message(
            &format!("{quantity} units of {name} are offered for {price} Cr."),
            Priority::Info,
        );
        Some(price)
    }

    pub fn buy_cargo(&mut self, index: usize, quantity: u32) -> bool {
        let Some(price) = self.quote_purchase(index, quantity) else {
            return false;
        };
        let tons = self.depot.cargo()[index].unit_size * quantity;
        if !self.ship.hold.has_room_for(tons) {
            return self.warn(&format!(
                "Not enough room in the hold: {tons} tons needed, {} free.",
                self.ship.hold.space_left()
            ));
        }
        if !self.financials.can_afford(price) {
            return self.warn(&format!("Insufficient funds to pay {price} Cr."));
        }
        let Ok(lot) = self.depot.take_cargo(index, quantity) else {
            return false;
        };
        let memo = format!("Purchased {quantity} units of {}.", lot.name);
        let name = self.depot.system().name.clone();
        let date = self.date();
        self.financials.debit(date, &name, price, &memo);
        self.ship.hold.add(HoldItem::Cargo(lot));
        self.syslog.message(&memo, Priority::Info);
        true
    }

    pub fn quote_sale(&mut self, index: usize, quantity: u32) -> Option<i64> {
        if !self.require_detail(LocationDetail::Trade, "sell cargo") {
            return None;
        }
        let Some(lot) = self.ship.hold.cargo(index).cloned() else {
            self.warn("There is no such cargo in the hold.");
            return None;
        };
        if quantity == 0 || quantity > lot.quantity {
            self.warn("The hold does not have that much cargo.");
            return None;
        }
        let broker = self.ship.crew.best_skill(Skill::Broker);
        let price = self.depot.sale_price(&lot, quantity, broker, &mut self.rng);
        let name = lot.name;
        self.syslog.message(
            &format!("The depot offers {price} Cr for {quantity} units of {name}."),
            Priority::Info,
        );
        Some(price)
    }

    pub fn sell_cargo(&mut self, index: usize, quantity: u32) -> bool {
        let Some(price) = self.quote_sale(index, quantity) else {
            return false;
        };
        let Ok(lot) = self.ship.hold.take_cargo(index, quantity) else {
            return false;
        };
        let memo = format!("Sold {quantity} units of {}.", lot.name);
        let name = self.depot.system().name.clone();
        let date = self.date();
        self.financials.credit(date, &name, price, &memo);
        self.syslog.message(&memo, Priority::Info);
        true
    }

    fn check_destination(&mut self, destination: Coordinate) -> bool {
        if !self.depot.destinations().iter().any(|s| s.coordinate == destination) {
            return self.warn(&format!("{destination} is not a destination served from here."));
        }
        if self.ship.would_conflict(destination) {
            return self.warn("The ship already carries contracts for another destination.");
        }
        true
    }

    /// Loads as much freight for `destination` as the hold can take
    pub fn load_freight(&mut self, destination: Coordinate) -> bool {
        if !self.require_detail(LocationDetail::Trade, "load freight") {
            return false;
        }
        if !self.check_destination(destination) {
            return false;
        }
        let lots = self.depot.take_freight(destination, self.ship.hold.space_left());
        if lots.is_empty() {
            return self.warn("No freight lot fits in the hold.");
        }
        let tons: u32 = lots.iter().map(|f| f.tonnage).sum();
        for freight in lots {
            self.ship.hold.add(HoldItem::Freight(freight));
        }
        self.syslog
            .message(&format!("Loaded {tons} tons of freight for {destination}."), Priority::Info);
        true
    }

    pub fn board_passengers(&mut self, destination: Coordinate, passage: PassageClass, count: u32) -> bool {
        if !self.require_detail(LocationDetail::Trade, "board passengers") {
            return false;
        }
        if count == 0 || !self.check_destination(destination) {
            return false;
        }
        if !self.ship.has_berth_for(passage, count) {
            return self.warn("Not enough free berths for these passengers.");
        }
        if passage == PassageClass::High && !self.ship.hold.has_room_for(count) {
            return self.warn("Not enough room in the hold for their baggage.");
        }
        if let Err(e) = self.depot.take_passengers(destination, passage, count) {
            return self.warn(&e.errmsg());
        }

        let source = self.location;
        for _ in 0..count {
            let passenger = Passenger::new(passage, destination, &mut self.rng);
            self.ship.board(passenger);
            if passage == PassageClass::High {
                self.ship.hold.add(HoldItem::Baggage(Baggage { source, destination }));
            }
        }
        let fare = passage.fare() * count as i64;
        let memo = format!("Fares of {count} {} passage passengers.", <&'static str>::from(passage));
        let name = self.depot.system().name.clone();
        let date = self.date();
        self.financials.credit(date, &name, fare, &memo);
        self.syslog.message(&memo, Priority::Info);
        true
    }

    // Starport services

    pub fn refuel(&mut self, tons: u32) -> bool {
        if !self.require_docked("refuel") {
            return false;
        }
        let starport = self.depot.system().starport();
        let (quality, unit_price) = if starport.sells_refined_fuel() {
            (FuelQuality::Refined, REFINED_FUEL_PRICE)
        } else if starport.sells_unrefined_fuel() {
            (FuelQuality::Unrefined, UNREFINED_FUEL_PRICE)
        } else {
            return self.warn("This starport does not sell fuel.");
        };
        let tons = tons.min(self.ship.fuel_space());
        if tons == 0 {
            return self.warn("The fuel tank is already full.");
        }
        let cost = tons as i64 * unit_price;
        if !self.financials.can_afford(cost) {
            return self.warn(&format!("Insufficient funds to pay {cost} Cr of fuel."));
        }
        self.ship.refuel(tons, quality);
        let kind = match quality {
            FuelQuality::Refined => "refined",
            FuelQuality::Unrefined => "unrefined",
        };
        let memo = format!("Bought {tons} tons of {kind} fuel.");
        let name = self.depot.system().name.clone();
        let date = self.date();
        self.financials.debit(date, &name, cost, &memo);
        true
    }

    /// Fills the tank for free with unrefined fuel from the gas giant, takes a day
    pub fn skim_fuel(&mut self) -> bool {
        if !self.require_detail(LocationDetail::Orbit, "skim fuel") {
            return false;
        }
        if !self.depot.system().gas_giant() {
            return self.warn("There is no gas giant to skim in this system.");
        }
        let space = self.ship.fuel_space();
        if space == 0 {
            return self.warn("The fuel tank is already full.");
        }
        self.ship.refuel(space, FuelQuality::Unrefined);
        self.syslog
            .message(&format!("Skimmed {space} tons of unrefined fuel."), Priority::Info);
        self.advance_day();
        true
    }

    pub fn recharge_life_support(&mut self) -> bool {
        if !self.require_docked("recharge life support") {
            return false;
        }
        let cost = self.ship.life_support_cost();
        if !self.financials.can_afford(cost) {
            return self.warn(&format!("Insufficient funds to pay {cost} Cr of life support."));
        }
        self.ship.recharge_life_support();
        let name = self.depot.system().name.clone();
        let date = self.date();
        self.financials.debit(date, &name, cost, "Recharged life support.");
        true
    }

    pub fn field_repair(&mut self) -> bool {
        if self.ship.field_repair(&mut self.rng) {
            self.syslog.message("The engineers patched the drives.", Priority::Info);
            true
        } else {
            self.warn("The drives could not be patched.")
        }
    }

    pub fn starport_repair(&mut self) -> bool {
        if !self.require_docked("repair the ship") {
            return false;
        }
        if !self.depot.system().starport().has_repair_facilities() {
            return self.warn("This starport has no repair facilities.");
        }
        if !self.ship.starport_repair() {
            return self.warn("The ship does not need repairs.");
        }
        self.syslog.message("The starport crew repaired the drives.", Priority::Info);
        true
    }

    pub fn annual_maintenance(&mut self) -> bool {
        if !self.require_docked("perform maintenance") {
            return false;
        }
        if !self.depot.system().starport().has_shipyard() {
            return self.warn("Annual maintenance needs a class A or B starport.");
        }
        let cost = self.ship.model.maintenance_cost();
        if !self.financials.can_afford(cost) {
            return self.warn(&format!("Insufficient funds to pay {cost} Cr of maintenance."));
        }
        let name = self.depot.system().name.clone();
        let date = self.date();
        self.financials.perform_maintenance(date, &name, cost);
        self.ship.annual_maintenance();
        self.syslog.message("Annual maintenance completed.", Priority::Info);
        true
    }

    // Persistence

    pub fn save(&self) -> SaveState {
        let detail: &'static str = self.detail().into();
        SaveState {
            date: self.date().to_string(),
            location: self.location.to_string(),
            detail: detail.to_string(),
            hexes: self.map.hexes().map(|h| h.encode()).collect(),
            ship: self.ship.encode(),
            financials: self.financials.encode(),
            hold: self.ship.hold.items().iter().map(|i| i.encode()).collect(),
            passengers: self.ship.passengers().iter().map(|p| p.encode()).collect(),
        }
    }

    /// Restores a saved game, the first malformed record aborts the whole load
    pub fn load(state: &SaveState, config: &GameConfig) -> Result<Game, Errcode> {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let date: ImperialDate = state.date.parse()?;
        let location: Coordinate = state.location.parse()?;
        let detail: LocationDetail = state
            .detail
            .parse()
            .map_err(|_| Errcode::UnknownTag("location detail", state.detail.clone()))?;
        let model = config.model()?;
        let jump_range = config.jump_range()?;

        let mut map = StarMap::empty();
        for line in state.hexes.iter() {
            let hex = Hex::decode(line)?;
            let coord = hex.coordinate();
            if !map.insert_hex(hex) {
                return Err(Errcode::DuplicateHex(coord));
            }
        }
        if map.system(&location).is_none() {
            return Err(Errcode::NotAStarSystem(location));
        }

        let mut ship = Ship::decode(&state.ship, model)?;
        for member in config.crew.iter() {
            ship.crew.hire(member.clone());
        }
        for line in state.hold.iter() {
            ship.hold.add(HoldItem::decode(line)?);
        }
        for line in state.passengers.iter() {
            let mut passenger = Passenger::decode(line)?;
            if passenger.passage == PassageClass::Low {
                passenger = Passenger::new(PassageClass::Low, passenger.destination, &mut rng);
            }
            ship.board(passenger);
        }

        let financials = Financials::decode(&state.financials, date)?
            .with_obligations(ship.crew.sum_salaries(), model.loan_payment());
        let depot = build_depot(&mut map, location, jump_range, date, &mut rng)?;
        if let Some(system) = map.system_mut(&location) {
            system.detail = detail;
        }

        log::info!("Game loaded at {} on {date}", depot.system());
        Ok(Game {
            map,
            calendar: Calendar::with_default_subscribers(date),
            depot,
            ship,
            financials,
            location,
            jump_range,
            rng,
            syslog: Syslog::with_capacity(config.syslog_capacity),
        })
    }
}

fn build_depot(
    map: &mut StarMap,
    location: Coordinate,
    jump_range: u32,
    date: ImperialDate,
    rng: &mut StdRng,
) -> Result<CargoDepot, Errcode> {
    let destinations = map.update_destinations(&location, jump_range, rng);
    let Some(system) = map.system(&location).cloned() else {
        return Err(Errcode::NotAStarSystem(location));
    };
    Ok(CargoDepot::new(system, destinations, date, rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::financials::MaintenanceStatus;

    fn game() -> Game {
        Game::new(&GameConfig::default()).unwrap()
    }

    #[test]
    fn test_new_game() {
        let game = game();
        assert_eq!(game.location(), Coordinate::origin());
        assert_eq!(game.detail(), LocationDetail::Surface);
        assert_eq!(game.system().name, "Regina");
        assert_eq!(game.financials().balance(), 999_900);
        assert_eq!(game.depot().destinations().len(), game.system().destinations.len());
        assert_eq!(game.ship.crew.len(), 4);
    }

    #[test]
    fn test_movement_state_machine() {
        let mut game = game();
        let start = game.date();
        assert!(!game.to_jump_point());
        assert!(game.syslog.contains("Cannot travel to the jump point from surface"));

        assert!(game.enter_depot());
        assert!(!game.liftoff());
        assert!(game.leave_depot());
        assert!(game.liftoff());
        assert_eq!(game.financials().berth_expiry(), None);
        assert!(game.to_jump_point());
        assert_eq!(game.date(), start.plus_days(1));
        assert!(game.to_orbit());
        assert_eq!(game.date(), start.plus_days(2));
        assert!(game.land());
        assert_eq!(game.detail(), LocationDetail::Surface);
        assert_eq!(game.financials().balance(), 999_800);
    }

    #[test]
    fn test_trading_requires_the_depot() {
        let mut game = game();
        assert_eq!(game.quote_purchase(0, 1), None);
        assert!(game.enter_depot());
        assert!(game.quote_purchase(0, 1).is_some());
        assert_eq!(game.quote_purchase(4, 1), None);
    }

    /// A depot lot that fits whole in the hold, with funds to spare
    fn game_with_small_lot() -> Game {
        for seed in 0..200 {
            let config = GameConfig {
                seed,
                starting_balance: 1_000_000_000,
                ..GameConfig::default()
            };
            let game = Game::new(&config).unwrap();
            let lot = &game.depot().cargo()[0];
            if lot.quantity > 1 && lot.tonnage() <= game.ship.hold.capacity {
                return game;
            }
        }
        panic!("no seed produced a lot that fits in the hold");
    }

    #[test]
    fn test_buy_nothing() {
        let mut game = game_with_small_lot();
        game.enter_depot();
        assert_eq!(game.quote_purchase(0, 0), None);
        assert!(!game.buy_cargo(0, 0));
        assert!(game.syslog.contains("buy 0 units"));
        assert_eq!(game.depot().cargo()[0].price_adjustment, 0.0);
        assert!(game.ship.hold.is_empty());
        assert_eq!(game.financials().ledger().len(), 1);
    }

    #[test]
    fn test_buy_and_sell() {
        let mut game = game_with_small_lot();
        game.enter_depot();
        let qty = game.depot().cargo()[0].quantity;

        let before = game.financials().balance();
        let price = game.quote_purchase(0, qty).unwrap();
        assert!(game.buy_cargo(0, qty));
        assert_eq!(game.financials().balance(), before - price);
        assert!(game.depot().cargo().is_empty());
        assert!(!game.buy_cargo(0, 1));
        assert_eq!(game.ship.hold.cargo(0).unwrap().quantity, qty);

        assert!(game.quote_sale(0, qty + 1).is_none());
        assert!(!game.sell_cargo(0, 0));
        assert!(game.sell_cargo(0, 1));
        assert_eq!(game.ship.hold.cargo(0).unwrap().quantity, qty - 1);
        assert!(game.sell_cargo(0, qty - 1));
        assert!(game.ship.hold.is_empty());
        assert_eq!(game.financials().ledger().len(), 4);
    }

    #[test]
    fn test_services() {
        let mut game = game();
        assert!(!game.refuel(10));
        assert!(game.syslog.contains("already full"));

        game.ship.recharge_life_support();
        let cost = game.ship.life_support_cost();
        let before = game.financials().balance();
        assert!(game.recharge_life_support());
        assert_eq!(game.financials().balance(), before - cost);

        assert!(!game.starport_repair());
        assert!(game.annual_maintenance());
        assert_eq!(game.financials().maintenance_status(), MaintenanceStatus::Green);

        assert!(game.liftoff());
        assert!(!game.refuel(1));
        assert!(!game.skim_fuel());
        assert!(game.syslog.contains("already full"));
    }

    #[test]
    fn test_save_round_trip() {
        let mut game = game();
        game.advance_day();
        let state = game.save();
        let loaded = Game::load(&state, &GameConfig::default()).unwrap();
        assert_eq!(loaded.save(), state);
        assert_eq!(loaded.system().name, "Regina");

        let other_seed = GameConfig {
            seed: 99,
            ..GameConfig::default()
        };
        let loaded = Game::load(&state, &other_seed).unwrap();
        assert!(loaded.map.subsectors().eq(game.map.subsectors()));
    }

    #[test]
    fn test_load_aborts_on_bad_record() {
        let mut state = game().save();
        state.hold.push("Cargo - Tin - lots - None".to_string());
        assert_eq!(
            Game::load(&state, &GameConfig::default()).err(),
            Some(Errcode::NotAnInteger("quantity", "lots".to_string()))
        );

        let mut state = game().save();
        state.location = "(9, 9, -18)".to_string();
        assert_eq!(
            Game::load(&state, &GameConfig::default()).err(),
            Some(Errcode::NotAStarSystem(Coordinate::new(9, 9, -18).unwrap()))
        );

        let mut state = game().save();
        let first = state.hexes[0].clone();
        state.hexes.push(first);
        assert_eq!(
            Game::load(&state, &GameConfig::default()).err(),
            Some(Errcode::DuplicateHex(Coordinate::origin()))
        );

        let mut state = game().save();
        state.detail = "hangar".to_string();
        assert!(matches!(
            Game::load(&state, &GameConfig::default()),
            Err(Errcode::UnknownTag("location detail", _))
        ));
    }
}
