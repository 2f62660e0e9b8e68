use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::SubsectorKey;

static PREFIXES: &[&str] = &[
    "Ar", "Bel", "Cor", "Dra", "El", "Fen", "Gar", "Hel", "Ix", "Jor", "Kel", "Lan", "Mor",
    "Nor", "Or", "Pax", "Quel", "Rhy", "Sol", "Tar", "Ul", "Vex", "Wen", "Yar", "Zan",
];

static MIDDLES: &[&str] = &["a", "e", "i", "o", "u", "ae", "ia", "or", "an", "el"];

static SUFFIXES: &[&str] = &[
    "dor", "lis", "mar", "nox", "pia", "ron", "sus", "th", "va", "x", "gar", "lon", "ris",
    "tis", "ven",
];

/// Random world name built from a few syllables
pub fn world_name<R: Rng>(rng: &mut R) -> String {
    let prefix = PREFIXES[rng.random_range(0..PREFIXES.len())];
    let suffix = SUFFIXES[rng.random_range(0..SUFFIXES.len())];
    if rng.random_bool(0.5) {
        let middle = MIDDLES[rng.random_range(0..MIDDLES.len())];
        format!("{prefix}{middle}{suffix}")
    } else {
        format!("{prefix}{suffix}")
    }
}

/// Subsector names are seeded by their key, so a reloaded map keeps them
pub fn subsector_name(key: SubsectorKey) -> String {
    let (col, row) = key;
    let seed = ((col as u32 as u64) << 32) | row as u32 as u64;
    let mut rng = StdRng::seed_from_u64(seed);
    format!("{} Reach", world_name(&mut rng))
}

#[test]
fn test_world_name() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..50 {
        let name = world_name(&mut rng);
        assert!(name.len() >= 3);
        assert!(name.chars().next().unwrap().is_ascii_uppercase());
        assert!(!name.contains(" - "));
    }
}

#[test]
fn test_subsector_name_is_stable() {
    assert_eq!(subsector_name((0, 0)), subsector_name((0, 0)));
    assert!(subsector_name((-3, 2)).ends_with(" Reach"));
    let names: std::collections::BTreeSet<String> =
        (0..8).map(|n| subsector_name((n, -n))).collect();
    assert!(names.len() > 1);
}
