use hexmerchant_data::cargo::PassageClass;
use hexmerchant_data::config::GameConfig;
use hexmerchant_data::errors::Errcode;
use hexmerchant_data::game::Game;
use hexmerchant_data::ship::RepairStatus;

const DEFAULT_TURNS: usize = 20;

fn load_config(path: Option<&String>) -> Result<GameConfig, Errcode> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let data = std::fs::read_to_string(path)
        .map_err(|e| Errcode::InvalidConfig(format!("{path}: {e}")))?;
    GameConfig::from_json(&data)
}

/// Sells the hold, takes contracts for one destination, buys the local lot and jumps
fn play_turn(game: &mut Game, turn: usize) -> Result<(), Errcode> {
    game.recharge_life_support();
    game.refuel(u32::MAX);
    if game.ship.repair_status() != RepairStatus::Repaired {
        game.starport_repair();
    }

    game.enter_depot();
    let lots: Vec<(usize, u32)> = game
        .ship
        .hold
        .items()
        .iter()
        .enumerate()
        .filter_map(|(n, _)| game.ship.hold.cargo(n).map(|c| (n, c.quantity)))
        .collect();
    for (index, quantity) in lots.into_iter().rev() {
        game.sell_cargo(index, quantity);
    }

    let destinations: Vec<_> = game.depot().destinations().iter().map(|s| s.coordinate).collect();
    if destinations.is_empty() {
        log::info!("No destination in range of {}, waiting a week", game.system());
        game.leave_depot();
        game.plus_week();
        return Ok(());
    }
    let dest = match game.ship.destination()? {
        Some(bound) => bound,
        None => destinations[turn % destinations.len()],
    };

    game.load_freight(dest);
    for passage in [PassageClass::High, PassageClass::Middle, PassageClass::Low] {
        let offered = game.depot().passengers_for(&dest).get(passage);
        let berths = if passage.needs_stateroom() {
            game.ship.free_staterooms()
        } else {
            game.ship.free_low_berths()
        };
        game.board_passengers(dest, passage, offered.min(berths));
    }

    if let Some(lot) = game.depot().cargo().first() {
        let fits = game.ship.hold.space_left() / lot.unit_size;
        let quantity = lot.quantity.min(fits);
        if quantity > 0 {
            game.buy_cargo(0, quantity);
        }
    }
    game.leave_depot();

    game.liftoff();
    game.to_jump_point();
    if !game.jump(dest)? {
        log::warn!("Turn {turn}: could not jump to {dest}");
        game.field_repair();
    }
    game.to_orbit();
    game.land();
    Ok(())
}

fn main() {
    env_logger::builder().parse_default_env().init();

    let args: Vec<String> = std::env::args().collect();
    let config = match load_config(args.get(1)) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e.errmsg());
            std::process::exit(1);
        }
    };
    let turns = args
        .get(2)
        .and_then(|n| n.parse::<usize>().ok())
        .unwrap_or(DEFAULT_TURNS);

    let mut game = match Game::new(&config) {
        Ok(game) => game,
        Err(e) => {
            log::error!("{}", e.errmsg());
            std::process::exit(1);
        }
    };

    for turn in 0..turns {
        if let Err(e) = play_turn(&mut game, turn) {
            log::error!("Turn {turn} aborted: {}", e.errmsg());
            break;
        }
        log::info!(
            "Turn {turn}: {} on {}, balance {} Cr",
            game.system(),
            game.date(),
            game.financials().balance()
        );
    }

    for tx in game.financials().ledger() {
        log::debug!("{tx}");
    }
    match serde_json::to_string_pretty(&game.save()) {
        Ok(save) => log::info!("Final state:\n{save}"),
        Err(e) => log::error!("Unable to serialize the final state: {e}"),
    }
}
