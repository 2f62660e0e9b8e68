use crate::calendar::ImperialDate;
use crate::galaxy::coordinate::Coordinate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Errcode {
    // Persisted data
    WrongFieldCount {
        record: &'static str,
        expected: usize,
        input: String,
    },
    NotAnInteger(&'static str, String),
    ValueOutOfRange(&'static str, String),
    InvalidDate(String),
    DayOutOfRange(String),
    InvalidCoordinate(String),
    CoordinateNotZeroSum(String),
    UnknownTag(&'static str, String),
    UnknownCargo(String),
    InvalidDice(String),
    InvalidUwp(String),
    BerthExpiryOutOfRange(ImperialDate, ImperialDate),
    DuplicateHex(Coordinate),
    UnknownShipModel(String),
    InvalidConfig(String),

    // Invariants
    DestinationConflict(Vec<Coordinate>),
    InsufficientStock(u32, u32),
    BuyNothing,
    SellNothing,
    NoSuchCargoLot(usize),
    NoSuchHoldItem(usize),
    NotAStarSystem(Coordinate),
}

impl Errcode {
    pub fn errmsg(&self) -> String {
        match self {
            Errcode::WrongFieldCount {
                record,
                expected,
                input,
            } => format!("{record} string '{input}' should have {expected} fields"),
            Errcode::NotAnInteger(field, value) => {
                format!("{field} should be an integer, got '{value}'")
            }
            Errcode::ValueOutOfRange(field, value) => {
                format!("{field} value '{value}' is out of range")
            }
            Errcode::InvalidDate(s) => format!("Date string '{s}' should have the form DDD-YYYY"),
            Errcode::DayOutOfRange(s) => format!("Day of year in '{s}' should be between 1 and 365"),
            Errcode::InvalidCoordinate(s) => {
                format!("Coordinate string '{s}' should have the form (x, y, z)")
            }
            Errcode::CoordinateNotZeroSum(s) => {
                format!("Coordinate components of '{s}' do not sum to zero")
            }
            Errcode::UnknownTag(field, value) => format!("Unrecognized {field} value '{value}'"),
            Errcode::UnknownCargo(name) => format!("No cargo named '{name}' is traded"),
            Errcode::InvalidDice(s) => {
                format!("Quantity '{s}' should be an integer or a dice expression like 2Dx10")
            }
            Errcode::InvalidUwp(s) => format!("World profile '{s}' is not a valid UWP"),
            Errcode::BerthExpiryOutOfRange(expiry, date) => {
                format!("Berth expiry {expiry} is more than 6 days away from {date}")
            }
            Errcode::DuplicateHex(coord) => format!("Hex {coord} is recorded more than once"),
            Errcode::UnknownShipModel(name) => format!("No ship model named '{name}'"),
            Errcode::InvalidConfig(msg) => format!("Invalid configuration: {msg}"),
            Errcode::DestinationConflict(dests) => {
                let list = dests
                    .iter()
                    .map(|d| d.to_string())
                    .collect::<Vec<String>>()
                    .join(", ");
                format!("More than one destination in the ship: {list}")
            }
            Errcode::InsufficientStock(requested, available) => {
                format!("Requested {requested} units but only {available} are available")
            }
            Errcode::BuyNothing => "Attempted to buy 0 units of cargo".to_string(),
            Errcode::SellNothing => "Attempted to sell 0 units of cargo".to_string(),
            Errcode::NoSuchCargoLot(idx) => format!("No cargo lot at index {idx}"),
            Errcode::NoSuchHoldItem(idx) => format!("No hold item at index {idx}"),
            Errcode::NotAStarSystem(coord) => format!("There is no star system at {coord}"),
        }
    }
}

impl std::fmt::Display for Errcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.errmsg())
    }
}

impl std::error::Error for Errcode {}

/// Parses one integer field of a persisted record.
pub(crate) fn parse_int<T: std::str::FromStr>(field: &'static str, s: &str) -> Result<T, Errcode> {
    s.trim()
        .parse::<T>()
        .map_err(|_| Errcode::NotAnInteger(field, s.to_string()))
}

/// Splits a persisted record on its ` - ` delimiter, checking the field count.
pub(crate) fn split_fields<'a>(
    record: &'static str,
    input: &'a str,
    expected: usize,
) -> Result<Vec<&'a str>, Errcode> {
    let fields: Vec<&str> = input.trim().split(" - ").map(str::trim).collect();
    if fields.len() != expected {
        return Err(Errcode::WrongFieldCount {
            record,
            expected,
            input: input.to_string(),
        });
    }
    Ok(fields)
}

#[test]
fn test_split_fields() {
    let fields = split_fields("Freight", "Freight - 5 - (0, 0, 0) - (1, -1, 0)", 4).unwrap();
    assert_eq!(fields, vec!["Freight", "5", "(0, 0, 0)", "(1, -1, 0)"]);

    let err = split_fields("Freight", "Freight - 5", 4).unwrap_err();
    assert_eq!(
        err.errmsg(),
        "Freight string 'Freight - 5' should have 4 fields"
    );
}

#[test]
fn test_parse_int() {
    assert_eq!(parse_int::<u32>("fuel", " 12 "), Ok(12));
    let err = parse_int::<u32>("fuel", "twelve").unwrap_err();
    assert_eq!(err.errmsg(), "fuel should be an integer, got 'twelve'");
}
