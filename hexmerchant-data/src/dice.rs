use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::Errcode;

#[inline]
pub fn d6<R: Rng>(rng: &mut R) -> u32 {
    rng.random_range(1..=6)
}

/// Sum of `ndice` six-sided dice
pub fn roll<R: Rng>(rng: &mut R, ndice: u32) -> u32 {
    (0..ndice).map(|_| d6(rng)).sum()
}

/// Rolls `plus` dice minus `minus` dice, as used by the passenger tables
pub fn roll_diff<R: Rng>(rng: &mut R, plus: u32, minus: u32) -> i32 {
    (roll(rng, plus) as i32) - (roll(rng, minus) as i32)
}

/// Either an exact amount, or "NDxM": N six-sided dice multiplied by M
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiceExpr {
    Exact(u32),
    Roll { ndice: u32, mult: u32 },
}

impl DiceExpr {
    pub fn resolve<R: Rng>(&self, rng: &mut R) -> u32 {
        match self {
            DiceExpr::Exact(n) => *n,
            DiceExpr::Roll { ndice, mult } => roll(rng, *ndice) * mult,
        }
    }

    pub fn bounds(&self) -> (u32, u32) {
        match self {
            DiceExpr::Exact(n) => (*n, *n),
            DiceExpr::Roll { ndice, mult } => (ndice * mult, ndice * 6 * mult),
        }
    }
}

impl std::str::FromStr for DiceExpr {
    type Err = Errcode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let txt = s.trim();
        let invalid = || Errcode::InvalidDice(s.to_string());
        if let Ok(n) = txt.parse::<u32>() {
            return Ok(DiceExpr::Exact(n));
        }

        let upper = txt.to_ascii_uppercase();
        let Some((ndice, rest)) = upper.split_once('D') else {
            return Err(invalid());
        };
        let ndice = ndice.parse::<u32>().map_err(|_| invalid())?;
        let mult = if rest.is_empty() {
            1
        } else {
            let Some(mult) = rest.strip_prefix('X') else {
                return Err(invalid());
            };
            mult.parse::<u32>().map_err(|_| invalid())?
        };
        if ndice == 0 || mult == 0 {
            return Err(invalid());
        }
        Ok(DiceExpr::Roll { ndice, mult })
    }
}

impl std::fmt::Display for DiceExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiceExpr::Exact(n) => write!(f, "{n}"),
            DiceExpr::Roll { ndice, mult: 1 } => write!(f, "{ndice}D"),
            DiceExpr::Roll { ndice, mult } => write!(f, "{ndice}Dx{mult}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_parse_dice() {
        assert_eq!("20".parse::<DiceExpr>(), Ok(DiceExpr::Exact(20)));
        assert_eq!(
            "2Dx10".parse::<DiceExpr>(),
            Ok(DiceExpr::Roll { ndice: 2, mult: 10 })
        );
        assert_eq!(
            "6d".parse::<DiceExpr>(),
            Ok(DiceExpr::Roll { ndice: 6, mult: 1 })
        );
        for bad in ["", "D", "2Dy10", "xD5", "0D", "2Dx"] {
            assert_eq!(
                bad.parse::<DiceExpr>(),
                Err(Errcode::InvalidDice(bad.to_string())),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_dice_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let expr: DiceExpr = "2Dx10".parse().unwrap();
        assert_eq!(expr.bounds(), (20, 120));
        for _ in 0..200 {
            let n = expr.resolve(&mut rng);
            assert!((20..=120).contains(&n));
            assert_eq!(n % 10, 0);
        }
        assert_eq!(expr.to_string(), "2Dx10");
        assert_eq!("3D".parse::<DiceExpr>().unwrap().to_string(), "3D");
    }
}
