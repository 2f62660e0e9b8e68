use hexmerchant_data::calendar::Subscriber;
use hexmerchant_data::cargo::{Freight, PassageClass, Passenger};
use hexmerchant_data::config::GameConfig;
use hexmerchant_data::errors::Errcode;
use hexmerchant_data::financials::MaintenanceStatus;
use hexmerchant_data::galaxy::coordinate::Coordinate;
use hexmerchant_data::galaxy::system::LocationDetail;
use hexmerchant_data::game::Game;
use hexmerchant_data::ship::hold::HoldItem;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn config(seed: u64) -> GameConfig {
    GameConfig {
        seed,
        ..GameConfig::default()
    }
}

/// A game whose home depot offers freight to at least one destination
fn game_with_freight() -> (Game, Coordinate) {
    for seed in 0..200 {
        let game = Game::new(&config(seed)).unwrap();
        let dest = game
            .depot()
            .destinations()
            .iter()
            .map(|s| s.coordinate)
            .find(|c| !game.depot().freight_for(c).is_empty());
        if let Some(dest) = dest {
            return (game, dest);
        }
    }
    panic!("no seed produced a destination with freight");
}

fn messages(game: &mut Game) -> Vec<String> {
    game.syslog.remove_all().into_iter().map(|(_, t)| t).collect()
}

fn position(msgs: &[String], text: &str) -> usize {
    msgs.iter().position(|m| m.contains(text)).unwrap()
}

#[test]
fn subscribers_are_notified_in_order() {
    let mut game = Game::new(&config(3)).unwrap();
    messages(&mut game);
    for _ in 0..7 {
        game.advance_day();
    }
    // Day 8: the depot restocks and the initial six day berth runs out
    let msgs = messages(&mut game);
    assert!(position(&msgs, "New cargo") < position(&msgs, "Renewing berth on 8"));

    let mut game = Game::new(&config(3))
        .unwrap()
        .with_subscribers(vec![Subscriber::Financials, Subscriber::CargoDepot]);
    messages(&mut game);
    for _ in 0..7 {
        game.advance_day();
    }
    let msgs = messages(&mut game);
    assert!(position(&msgs, "Renewing berth on 8") < position(&msgs, "New cargo"));
}

#[test]
fn berth_is_renewed_daily_while_docked() {
    let mut game = Game::new(&config(1)).unwrap();
    let start = game.financials().balance();
    for _ in 0..10 {
        game.advance_day();
    }
    assert_eq!(game.financials().balance(), start - 400);
    let last = game.financials().ledger().last().unwrap();
    assert_eq!(last.memo, "Renewing berth on 11 for 1 day (100 Cr).");

    assert!(game.liftoff());
    for _ in 0..5 {
        game.advance_day();
    }
    assert_eq!(game.financials().balance(), start - 400);
}

#[test]
fn freight_run_between_two_systems() {
    let (mut game, dest) = game_with_freight();
    let start = game.date();

    assert!(game.enter_depot());
    let offered: u32 = game.depot().freight_for(&dest).iter().sum();
    assert!(game.load_freight(dest));
    let loaded: u32 = game.ship.hold.items().iter().map(|i| i.tonnage()).sum();
    assert!(loaded > 0 && loaded <= offered.min(82));
    assert_eq!(game.ship.destination(), Ok(Some(dest)));

    assert!(game.leave_depot());
    assert!(game.liftoff());
    assert!(game.to_jump_point());
    let before = game.financials().balance();
    assert_eq!(game.jump(dest), Ok(true));
    assert_eq!(game.location(), dest);
    assert_eq!(game.detail(), LocationDetail::JumpPoint);
    assert_eq!(game.date(), start.plus_days(8));
    assert_eq!(game.system().coordinate, dest);
    assert_eq!(game.ship.fuel(), 10);
    assert_eq!(game.ship.life_support(), 0);

    assert!(game.to_orbit());
    assert!(game.land());
    assert!(game.ship.hold.is_empty());
    assert_eq!(game.ship.destination(), Ok(None));
    assert_eq!(game.financials().balance(), before + loaded as i64 * 1_000 - 100);
}

#[test]
fn jump_is_refused_without_resources() {
    let (mut game, dest) = game_with_freight();
    game.liftoff();
    game.to_jump_point();

    let far = Coordinate::new(3, -3, 0).unwrap();
    assert_eq!(game.jump(far), Ok(false));
    assert!(game.syslog.contains("out of jump range"));

    assert_eq!(game.jump(dest), Ok(true));
    let home = Coordinate::origin();
    game.syslog.remove_all();
    assert_eq!(game.jump(home), Ok(false));
    assert!(game.syslog.contains("Not enough fuel to jump: 10 tons aboard, 20 tons needed."));
    assert!(game.syslog.contains("Life support is at 0%"));
    assert_eq!(game.location(), dest);
}

#[test]
fn conflicting_contracts_are_a_hard_error() {
    let (mut game, dest) = game_with_freight();
    let mut rng = StdRng::seed_from_u64(0);
    let other = Coordinate::new(5, -5, 0).unwrap();
    game.ship.hold.add(HoldItem::Freight(Freight {
        tonnage: 5,
        source: game.location(),
        destination: dest,
    }));
    game.ship.board(Passenger::new(PassageClass::Middle, other, &mut rng));

    game.liftoff();
    game.to_jump_point();
    assert!(matches!(game.jump(dest), Err(Errcode::DestinationConflict(_))));
    assert_eq!(game.location(), Coordinate::origin());
}

#[test]
fn passengers_pay_on_boarding() {
    for seed in 0..200 {
        let mut game = Game::new(&config(seed)).unwrap();
        game.enter_depot();
        let found = game.depot().destinations().iter().map(|s| s.coordinate).find(|c| {
            game.depot().passengers_for(c).high > 0
        });
        let Some(dest) = found else {
            continue;
        };
        let before = game.financials().balance();
        assert!(game.board_passengers(dest, PassageClass::High, 1));
        assert_eq!(game.financials().balance(), before + 10_000);
        assert_eq!(game.ship.passengers().len(), 1);
        assert_eq!(game.ship.hold.usage(), 1);
        assert!(!game.board_passengers(Coordinate::new(9, -9, 0).unwrap(), PassageClass::Low, 1));
        return;
    }
    panic!("no seed produced a high passenger");
}

#[test]
fn bills_and_maintenance_over_a_year() {
    let mut game = Game::new(&config(8)).unwrap();
    game.liftoff();
    let start = game.financials().balance();
    for _ in 0..4 {
        game.plus_week();
    }
    // One month of the four crew salaries plus the loan payment
    assert_eq!(game.financials().balance(), start - 15_000 - 154_500);

    // 53 weeks in, the last maintenance is more than a year old
    let mut msgs = messages(&mut game);
    for _ in 0..49 {
        game.plus_week();
        msgs.extend(messages(&mut game));
    }
    assert_eq!(game.financials().maintenance_status(), MaintenanceStatus::Red);
    assert_eq!(msgs.iter().filter(|m| m.contains("due soon")).count(), 1);
    assert_eq!(msgs.iter().filter(|m| m.contains("overdue")).count(), 1);
    assert!(msgs.iter().any(|m| m.contains("overdrawn")));
}

#[test]
fn save_and_load_with_contracts_aboard() {
    let (mut game, dest) = game_with_freight();
    game.enter_depot();
    game.load_freight(dest);
    let state = game.save();
    assert!(!state.hold.is_empty());
    assert_eq!(state.detail, "trade");

    let loaded = Game::load(&state, &config(0)).unwrap();
    assert_eq!(loaded.save(), state);
    assert_eq!(loaded.ship.destination(), Ok(Some(dest)));
    assert_eq!(loaded.detail(), LocationDetail::Trade);
}
