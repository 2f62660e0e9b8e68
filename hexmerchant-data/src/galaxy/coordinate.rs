use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use crate::errors::Errcode;

/// Cube coordinate of a hex, x + y + z == 0
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Coordinate {
    x: i32,
    y: i32,
    z: i32,
}

pub const DIRECTIONS: [Coordinate; 6] = [
    Coordinate { x: 1, y: -1, z: 0 },
    Coordinate { x: 1, y: 0, z: -1 },
    Coordinate { x: 0, y: 1, z: -1 },
    Coordinate { x: -1, y: 1, z: 0 },
    Coordinate { x: -1, y: 0, z: 1 },
    Coordinate { x: 0, y: -1, z: 1 },
];

impl Coordinate {
    pub fn new(x: i32, y: i32, z: i32) -> Result<Coordinate, Errcode> {
        if !sums_to_zero(x, y, z) {
            return Err(Errcode::CoordinateNotZeroSum(format!("({x}, {y}, {z})")));
        }
        Ok(Coordinate { x, y, z })
    }

    pub const fn origin() -> Coordinate {
        Coordinate { x: 0, y: 0, z: 0 }
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn z(&self) -> i32 {
        self.z
    }

    #[inline]
    pub fn distance(&self, other: &Coordinate) -> u32 {
        let d = *self - *other;
        d.x.unsigned_abs()
            .max(d.y.unsigned_abs())
            .max(d.z.unsigned_abs())
    }

    pub fn neighbor(&self, direction: usize) -> Coordinate {
        *self + DIRECTIONS[direction % DIRECTIONS.len()]
    }

    /// Column and row of the odd-column offset layout used for sector display
    pub fn to_offset(&self) -> (i32, i32) {
        let col = self.x;
        let row = self.z + (self.x - (self.x & 1)) / 2;
        (col, row)
    }

    pub fn from_offset(col: i32, row: i32) -> Coordinate {
        let x = col;
        let z = row - (col - (col & 1)) / 2;
        Coordinate { x, y: -x - z, z }
    }

    /// "CCRR" hex label, only meaningful for non-negative offsets
    pub fn offset_label(&self) -> String {
        let (col, row) = self.to_offset();
        format!("{col:02}{row:02}")
    }
}

// Summed in i64, extreme axis values would overflow i32
fn sums_to_zero(x: i32, y: i32, z: i32) -> bool {
    x as i64 + y as i64 + z as i64 == 0
}

impl Add for Coordinate {
    type Output = Coordinate;

    fn add(self, rhs: Coordinate) -> Coordinate {
        Coordinate {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

impl Sub for Coordinate {
    type Output = Coordinate;

    fn sub(self, rhs: Coordinate) -> Coordinate {
        Coordinate {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl std::str::FromStr for Coordinate {
    type Err = Errcode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Errcode::InvalidCoordinate(s.to_string());
        let inner = s
            .trim()
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(invalid)?;

        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        let [x, y, z] = parts.as_slice() else {
            return Err(invalid());
        };
        let parse = |axis: &'static str, v: &str| {
            v.parse::<i32>()
                .map_err(|_| Errcode::NotAnInteger(axis, v.to_string()))
        };
        let (x, y, z) = (parse("x", x)?, parse("y", y)?, parse("z", z)?);
        if !sums_to_zero(x, y, z) {
            return Err(Errcode::CoordinateNotZeroSum(s.to_string()));
        }
        Ok(Coordinate { x, y, z })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_rejects_bad_sum() {
        assert_eq!(
            Coordinate::new(1, 1, 1),
            Err(Errcode::CoordinateNotZeroSum("(1, 1, 1)".to_string()))
        );
        assert!(Coordinate::new(2, -3, 1).is_ok());

        // Wraps to zero in i32
        assert_eq!(
            "(2147483647, 1, -2147483648)".parse::<Coordinate>(),
            Err(Errcode::CoordinateNotZeroSum("(2147483647, 1, -2147483648)".to_string()))
        );
        assert!(Coordinate::new(i32::MAX, 1, i32::MIN).is_err());
        assert!(Coordinate::new(i32::MAX, i32::MIN, 1).is_ok());
    }

    #[test]
    fn test_coordinate_text_form() {
        let c = Coordinate::new(3, -1, -2).unwrap();
        assert_eq!(c.to_string(), "(3, -1, -2)");
        assert_eq!("(3, -1, -2)".parse::<Coordinate>(), Ok(c));
        assert_eq!("( 3,-1 , -2 )".parse::<Coordinate>(), Ok(c));

        assert_eq!(
            "(1, 2, 3)".parse::<Coordinate>(),
            Err(Errcode::CoordinateNotZeroSum("(1, 2, 3)".to_string()))
        );
        assert_eq!(
            "(1, 2)".parse::<Coordinate>(),
            Err(Errcode::InvalidCoordinate("(1, 2)".to_string()))
        );
        assert_eq!(
            "1, -1, 0".parse::<Coordinate>(),
            Err(Errcode::InvalidCoordinate("1, -1, 0".to_string()))
        );
        assert_eq!(
            "(a, -1, 0)".parse::<Coordinate>(),
            Err(Errcode::NotAnInteger("x", "a".to_string()))
        );
    }

    #[test]
    fn test_distance() {
        let a = Coordinate::origin();
        let b = Coordinate::new(2, -3, 1).unwrap();
        assert_eq!(a.distance(&b), 3);
        assert_eq!(b.distance(&a), 3);
        for dir in 0..6 {
            assert_eq!(a.neighbor(dir).distance(&a), 1);
        }
    }

    #[test]
    fn test_offset_round_trip() {
        for col in -9..9 {
            for row in -9..9 {
                let c = Coordinate::from_offset(col, row);
                assert_eq!(c.x() + c.y() + c.z(), 0);
                assert_eq!(c.to_offset(), (col, row));
            }
        }
        assert_eq!(Coordinate::from_offset(3, 4).offset_label(), "0304");
    }
}
