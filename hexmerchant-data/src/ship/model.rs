use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoStaticStr};

use crate::errors::Errcode;

// Mortgage paid back over 20 years of 12 payments
const LOAN_PAYMENTS: i64 = 240;
const MAINTENANCE_DIVISOR: i64 = 1_000;

#[derive(
    EnumIter, EnumString, IntoStaticStr, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ShipModel {
    #[default]
    FreeTrader,
    FarTrader,
}

impl ShipModel {
    pub fn from_name(name: &str) -> Result<ShipModel, Errcode> {
        name.trim()
            .parse()
            .map_err(|_| Errcode::UnknownShipModel(name.to_string()))
    }

    pub fn designation(&self) -> &'static str {
        match self {
            ShipModel::FreeTrader => "Type A Free Trader",
            ShipModel::FarTrader => "Type A2 Far Trader",
        }
    }

    pub fn hull_tonnage(&self) -> u32 {
        200
    }

    pub fn jump_rating(&self) -> u32 {
        match self {
            ShipModel::FreeTrader => 1,
            ShipModel::FarTrader => 2,
        }
    }

    pub fn fuel_capacity(&self) -> u32 {
        match self {
            ShipModel::FreeTrader => 30,
            ShipModel::FarTrader => 50,
        }
    }

    pub fn cargo_capacity(&self) -> u32 {
        match self {
            ShipModel::FreeTrader => 82,
            ShipModel::FarTrader => 64,
        }
    }

    pub fn staterooms(&self) -> u32 {
        6
    }

    pub fn low_berths(&self) -> u32 {
        match self {
            ShipModel::FreeTrader => 20,
            ShipModel::FarTrader => 6,
        }
    }

    pub fn price(&self) -> i64 {
        match self {
            ShipModel::FreeTrader => 37_080_000,
            ShipModel::FarTrader => 52_675_000,
        }
    }

    /// Tons of fuel burnt by a single jump
    pub fn jump_fuel_cost(&self) -> u32 {
        self.hull_tonnage() * self.jump_rating() / 10
    }

    pub fn loan_payment(&self) -> i64 {
        self.price() / LOAN_PAYMENTS
    }

    pub fn maintenance_cost(&self) -> i64 {
        self.price() / MAINTENANCE_DIVISOR
    }
}

#[test]
fn test_ship_models() {
    let free = ShipModel::from_name("free_trader").unwrap();
    assert_eq!(free, ShipModel::FreeTrader);
    assert_eq!(free.jump_fuel_cost(), 20);
    assert_eq!(free.loan_payment(), 154_500);
    assert_eq!(free.maintenance_cost(), 37_080);

    let far = ShipModel::from_name("Far_Trader").unwrap();
    assert_eq!(far.jump_fuel_cost(), 40);
    assert!(far.fuel_capacity() >= far.jump_fuel_cost());

    assert_eq!(
        ShipModel::from_name("scout"),
        Err(Errcode::UnknownShipModel("scout".to_string()))
    );
}
