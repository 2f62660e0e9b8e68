use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoStaticStr};

use crate::dice::{d6, DiceExpr};
use crate::errors::{parse_int, split_fields, Errcode};
use crate::galaxy::coordinate::Coordinate;
use crate::galaxy::system::TradeClass;

pub mod commodities;

pub use commodities::Commodity;

pub const FREIGHT_RATE_PER_TON: i64 = 1_000;
pub const BAGGAGE_TONNAGE: u32 = 1;

/// A lot of speculative goods, either for sale at a depot or in the ship hold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cargo {
    pub name: String,
    pub quantity: u32,
    pub unit_price: i64,
    pub unit_size: u32,
    pub purchase_dms: BTreeMap<TradeClass, i32>,
    pub sale_dms: BTreeMap<TradeClass, i32>,
    pub source: Option<Coordinate>,

    // Purchase price multiplier, 0.0 until rolled
    #[serde(default)]
    pub price_adjustment: f64,
}

impl Cargo {
    /// `quantity` is either an exact amount or a dice expression like "2Dx10"
    #[allow(clippy::too_many_arguments)]
    pub fn new<R: Rng>(
        name: &str,
        quantity: &str,
        unit_price: i64,
        unit_size: u32,
        purchase_dms: &[(TradeClass, i32)],
        sale_dms: &[(TradeClass, i32)],
        source: Option<Coordinate>,
        rng: &mut R,
    ) -> Result<Cargo, Errcode> {
        let quantity = quantity.parse::<DiceExpr>()?.resolve(rng);
        Ok(Cargo {
            name: name.to_string(),
            quantity,
            unit_price,
            unit_size,
            purchase_dms: purchase_dms.iter().copied().collect(),
            sale_dms: sale_dms.iter().copied().collect(),
            source,
            price_adjustment: 0.0,
        })
    }

    pub fn from_commodity<R: Rng>(
        commodity: &Commodity,
        source: Option<Coordinate>,
        rng: &mut R,
    ) -> Cargo {
        Cargo::with_quantity(commodity, commodity.quantity.resolve(rng), source)
    }

    pub fn with_quantity(commodity: &Commodity, quantity: u32, source: Option<Coordinate>) -> Cargo {
        Cargo {
            name: commodity.name.to_string(),
            quantity,
            unit_price: commodity.base_price,
            unit_size: commodity.unit_size,
            purchase_dms: commodity.purchase_dms.iter().copied().collect(),
            sale_dms: commodity.sale_dms.iter().copied().collect(),
            source,
            price_adjustment: 0.0,
        }
    }

    #[inline]
    pub fn tonnage(&self) -> u32 {
        self.quantity * self.unit_size
    }

    pub fn purchase_dm(&self, classes: &[TradeClass]) -> i32 {
        classes.iter().filter_map(|c| self.purchase_dms.get(c)).sum()
    }

    pub fn sale_dm(&self, classes: &[TradeClass]) -> i32 {
        classes.iter().filter_map(|c| self.sale_dms.get(c)).sum()
    }

    /// Splits `quantity` units off this lot
    pub fn take(&mut self, quantity: u32) -> Result<Cargo, Errcode> {
        if quantity > self.quantity {
            return Err(Errcode::InsufficientStock(quantity, self.quantity));
        }
        self.quantity -= quantity;
        Ok(Cargo {
            quantity,
            price_adjustment: 0.0,
            ..self.clone()
        })
    }

    pub fn encode(&self) -> String {
        let source = self
            .source
            .map(|c| c.to_string())
            .unwrap_or_else(|| "None".to_string());
        format!("Cargo - {} - {} - {}", self.name, self.quantity, source)
    }

    pub fn decode(s: &str) -> Result<Cargo, Errcode> {
        let fields = split_fields("Cargo", s, 4)?;
        if fields[0] != "Cargo" {
            return Err(Errcode::UnknownTag("hold item", fields[0].to_string()));
        }
        let Some(commodity) = commodities::by_name(fields[1]) else {
            return Err(Errcode::UnknownCargo(fields[1].to_string()));
        };
        let quantity = parse_int("quantity", fields[2])?;
        let source = match fields[3] {
            "None" => None,
            coord => Some(coord.parse()?),
        };
        Ok(Cargo::with_quantity(commodity, quantity, source))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Freight {
    pub tonnage: u32,
    pub source: Coordinate,
    pub destination: Coordinate,
}

impl Freight {
    pub fn revenue(&self) -> i64 {
        (self.tonnage as i64) * FREIGHT_RATE_PER_TON
    }

    pub fn encode(&self) -> String {
        format!(
            "Freight - {} - {} - {}",
            self.tonnage, self.source, self.destination
        )
    }

    pub fn decode(s: &str) -> Result<Freight, Errcode> {
        let fields = split_fields("Freight", s, 4)?;
        if fields[0] != "Freight" {
            return Err(Errcode::UnknownTag("hold item", fields[0].to_string()));
        }
        Ok(Freight {
            tonnage: parse_int("tonnage", fields[1])?,
            source: fields[2].parse()?,
            destination: fields[3].parse()?,
        })
    }
}

/// Luggage of a high passenger, always one ton
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Baggage {
    pub source: Coordinate,
    pub destination: Coordinate,
}

impl Baggage {
    pub fn encode(&self) -> String {
        format!("Baggage - {} - {}", self.source, self.destination)
    }

    pub fn decode(s: &str) -> Result<Baggage, Errcode> {
        let fields = split_fields("Baggage", s, 3)?;
        if fields[0] != "Baggage" {
            return Err(Errcode::UnknownTag("hold item", fields[0].to_string()));
        }
        Ok(Baggage {
            source: fields[1].parse()?,
            destination: fields[2].parse()?,
        })
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
#[strum(serialize_all = "lowercase")]
pub enum PassageClass {
    High,
    Middle,
    Low,
}

impl PassageClass {
    pub fn fare(&self) -> i64 {
        match self {
            PassageClass::High => 10_000,
            PassageClass::Middle => 8_000,
            PassageClass::Low => 1_000,
        }
    }

    /// High and middle passengers take a stateroom, low ones a cold berth
    pub fn needs_stateroom(&self) -> bool {
        !matches!(self, PassageClass::Low)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Passenger {
    pub passage: PassageClass,
    pub destination: Coordinate,

    // Low passage lottery guess on the number of survivors, not persisted
    #[serde(skip)]
    pub guess: u32,
}

impl PartialEq for Passenger {
    fn eq(&self, other: &Self) -> bool {
        self.passage == other.passage && self.destination == other.destination
    }
}

impl Eq for Passenger {}

impl Passenger {
    pub fn new<R: Rng>(passage: PassageClass, destination: Coordinate, rng: &mut R) -> Passenger {
        let guess = match passage {
            PassageClass::Low => d6(rng),
            _ => 0,
        };
        Passenger {
            passage,
            destination,
            guess,
        }
    }

    pub fn encode(&self) -> String {
        let passage: &'static str = self.passage.into();
        format!("{} - {}", passage, self.destination)
    }

    pub fn decode(s: &str) -> Result<Passenger, Errcode> {
        let fields = split_fields("Passenger", s, 2)?;
        let passage = fields[0]
            .parse::<PassageClass>()
            .map_err(|_| Errcode::UnknownTag("passage class", fields[0].to_string()))?;
        Ok(Passenger {
            passage,
            destination: fields[1].parse()?,
            guess: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn coord(x: i32, y: i32) -> Coordinate {
        Coordinate::new(x, y, -x - y).unwrap()
    }

    #[test]
    fn test_cargo_quantity() {
        let mut rng = StdRng::seed_from_u64(1);
        let cargo = Cargo::new("Grain", "20", 300, 1, &[], &[], None, &mut rng).unwrap();
        assert_eq!(cargo.quantity, 20);
        assert_eq!(cargo.price_adjustment, 0.0);

        for _ in 0..100 {
            let cargo = Cargo::new("Wood", "2Dx10", 1_000, 1, &[], &[], None, &mut rng).unwrap();
            assert!((20..=120).contains(&cargo.quantity));
            assert_eq!(cargo.quantity % 10, 0);
        }

        let err = Cargo::new("Wood", "lots", 1_000, 1, &[], &[], None, &mut rng).unwrap_err();
        assert_eq!(err, Errcode::InvalidDice("lots".to_string()));
    }

    #[test]
    fn test_cargo_dms() {
        let cargo = Cargo::with_quantity(commodities::by_name("Textiles").unwrap(), 5, None);
        let classes = [TradeClass::Agricultural, TradeClass::NonIndustrial];
        assert_eq!(cargo.purchase_dm(&classes), -10);
        assert_eq!(cargo.sale_dm(&classes), -6);
        assert_eq!(cargo.purchase_dm(&[]), 0);
    }

    #[test]
    fn test_cargo_take() {
        let mut lot = Cargo::with_quantity(commodities::by_name("Steel").unwrap(), 10, None);
        lot.price_adjustment = 1.2;
        let part = lot.take(4).unwrap();
        assert_eq!(part.quantity, 4);
        assert_eq!(part.price_adjustment, 0.0);
        assert_eq!(lot.quantity, 6);
        assert_eq!(lot.take(7), Err(Errcode::InsufficientStock(7, 6)));
    }

    #[test]
    fn test_cargo_encoding() {
        let src = coord(1, -1);
        let cargo = Cargo::with_quantity(commodities::by_name("Air/Raft").unwrap(), 3, Some(src));
        assert_eq!(cargo.encode(), "Cargo - Air/Raft - 3 - (1, -1, 0)");
        assert_eq!(Cargo::decode(&cargo.encode()), Ok(cargo.clone()));
        assert_eq!(cargo.tonnage(), 12);

        let local = Cargo::with_quantity(commodities::by_name("Tin").unwrap(), 30, None);
        assert_eq!(Cargo::decode("Cargo - Tin - 30 - None"), Ok(local));

        assert_eq!(
            Cargo::decode("Cargo - Unobtainium - 3 - None"),
            Err(Errcode::UnknownCargo("Unobtainium".to_string()))
        );
        assert_eq!(
            Cargo::decode("Cargo - Tin - many - None"),
            Err(Errcode::NotAnInteger("quantity", "many".to_string()))
        );
    }

    #[test]
    fn test_freight_and_baggage_encoding() {
        let freight = Freight {
            tonnage: 15,
            source: coord(0, 0),
            destination: coord(-1, 1),
        };
        assert_eq!(freight.encode(), "Freight - 15 - (0, 0, 0) - (-1, 1, 0)");
        assert_eq!(Freight::decode(&freight.encode()), Ok(freight));
        assert_eq!(freight.revenue(), 15_000);

        let baggage = Baggage {
            source: coord(0, 0),
            destination: coord(-1, 1),
        };
        assert_eq!(Baggage::decode(&baggage.encode()), Ok(baggage));
        assert_eq!(
            Baggage::decode("Baggage - (0, 0, 0)"),
            Err(Errcode::WrongFieldCount {
                record: "Baggage",
                expected: 3,
                input: "Baggage - (0, 0, 0)".to_string()
            })
        );
    }

    #[test]
    fn test_passenger_encoding() {
        let mut rng = StdRng::seed_from_u64(8);
        let low = Passenger::new(PassageClass::Low, coord(2, -1), &mut rng);
        assert!((1..=6).contains(&low.guess));
        assert_eq!(low.encode(), "low - (2, -1, -1)");
        assert_eq!(Passenger::decode(&low.encode()), Ok(low));

        assert_eq!(
            Passenger::decode("steerage - (2, -1, -1)"),
            Err(Errcode::UnknownTag("passage class", "steerage".to_string()))
        );
        assert_eq!(
            Passenger::decode("high - (2, 1, -1)"),
            Err(Errcode::CoordinateNotZeroSum("(2, 1, -1)".to_string()))
        );
    }
}
