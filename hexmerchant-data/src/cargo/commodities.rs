use crate::dice::DiceExpr;
use crate::galaxy::system::TradeClass;

use crate::galaxy::system::TradeClass::{
    Agricultural as Ag, Industrial as In, NonAgricultural as Na, NonIndustrial as Ni, Poor as Po,
    Rich as Ri,
};

/// One line of the trade table, looked up with two dice (11..=66)
#[derive(Debug)]
pub struct Commodity {
    pub key: u8,
    pub name: &'static str,
    pub base_price: i64,
    pub unit_size: u32,
    pub quantity: DiceExpr,
    pub purchase_dms: &'static [(TradeClass, i32)],
    pub sale_dms: &'static [(TradeClass, i32)],
}

const fn dice(ndice: u32, mult: u32) -> DiceExpr {
    DiceExpr::Roll { ndice, mult }
}

macro_rules! commodity {
    ($key:expr, $name:expr, $price:expr, $size:expr, $qty:expr, [$($pc:ident $pdm:expr),*], [$($sc:ident $sdm:expr),*]) => {
        Commodity {
            key: $key,
            name: $name,
            base_price: $price,
            unit_size: $size,
            quantity: $qty,
            purchase_dms: &[$(($pc, $pdm)),*],
            sale_dms: &[$(($sc, $sdm)),*],
        }
    };
}

pub static COMMODITIES: [Commodity; 36] = [
    commodity!(11, "Textiles", 3_000, 1, dice(3, 5), [Ag -7, Na -5, Ni -3], [Ag -6, Na 1, Ri 3]),
    commodity!(12, "Polymers", 7_000, 1, dice(4, 5), [In -2, Ri -3, Po 2], [In -2, Ri 3]),
    commodity!(13, "Liquor", 10_000, 1, dice(1, 5), [Ag -4], [Ag -3, In 1, Ri 2]),
    commodity!(14, "Wood", 1_000, 1, dice(2, 10), [Ag -6], [Ag -6, In 1, Ri 2]),
    commodity!(15, "Crystals", 20_000, 1, dice(1, 1), [Na -3, In 4], [Na -3, In 3, Ri 3]),
    commodity!(16, "Radioactives", 1_000_000, 1, dice(1, 1), [In 7, Ni -3, Ri 5], [In 6, Ni -3, Ri -4]),
    commodity!(21, "Steel", 500, 1, dice(4, 10), [In -2, Ri -1, Po 1], [In -2, Ri -1, Po 3]),
    commodity!(22, "Copper", 2_000, 1, dice(2, 10), [In -3, Ri -2, Po 1], [In -3, Ri -1]),
    commodity!(23, "Aluminum", 1_000, 1, dice(5, 10), [In -3, Ri -2, Po 1], [In -3, Ni 4, Ri -1]),
    commodity!(24, "Tin", 9_000, 1, dice(3, 10), [In -3, Ri -2, Po 1], [In -3, Ri -1]),
    commodity!(25, "Silver", 70_000, 1, dice(1, 5), [In 5, Ri -1, Po 2], [In 5, Ri -1]),
    commodity!(26, "Special Alloys", 200_000, 1, dice(1, 1), [In -3, Ni 5, Ri -2], [In -3, Ni 4, Ri -1]),
    commodity!(31, "Petrochemicals", 10_000, 1, dice(6, 1), [Na -4, In 1, Ni -5], [Na -4, In 3, Ni -5]),
    commodity!(32, "Grain", 300, 1, dice(8, 5), [Ag -2, Na 1, In 2], [Ag -2]),
    commodity!(33, "Meat", 1_500, 1, dice(4, 5), [Ag -2, Na 2, In 3], [Ag -2, In 2, Po 1]),
    commodity!(34, "Spices", 6_000, 1, dice(1, 5), [Ag -2, Na 3, In 2], [Ag -2, Ri 2, Po 3]),
    commodity!(35, "Fruit", 1_000, 1, dice(2, 5), [Ag -3, Na 1, In 2], [Ag -2, In 3, Po 2]),
    commodity!(36, "Pharmaceuticals", 100_000, 1, dice(1, 1), [Na -3, In 4, Po 3], [Na -3, In 5, Ri 4]),
    commodity!(41, "Gems", 1_000_000, 1, dice(1, 1), [In 4, Ni -8, Po -3], [In 4, Ni -2, Ri 8]),
    commodity!(42, "Firearms", 30_000, 1, dice(2, 1), [In -3, Ri -2, Po 3], [In -2, Ri -1, Po 3]),
    commodity!(43, "Ammunition", 30_000, 1, dice(2, 1), [In -3, Ri -2, Po 3], [In -2, Ri -1, Po 3]),
    commodity!(44, "Blades", 10_000, 1, dice(2, 1), [In -3, Ri -2, Po 3], [In -2, Ri -1, Po 3]),
    commodity!(45, "Tools", 10_000, 1, dice(2, 1), [In -3, Ri -2, Po 3], [In -2, Ri -1, Po 3]),
    commodity!(46, "Body Armor", 50_000, 1, dice(2, 1), [In -1, Ri -3, Po 3], [In -2, Ri 1, Po 4]),
    commodity!(51, "Aircraft", 1_000_000, 10, dice(1, 1), [In -4, Ri -3], [Ni 2, Po 1]),
    commodity!(52, "Air/Raft", 6_000_000, 4, dice(1, 1), [In -3, Ri -2], [Ni 2, Po 1]),
    commodity!(53, "Computers", 10_000_000, 2, dice(1, 1), [In -2, Ri -2], [Na -3, Ni 2, Po 1]),
    commodity!(54, "All Terrain Vehicles", 3_000_000, 10, dice(1, 1), [In -2, Ri -2], [Na 1, Ni 2, Po 1]),
    commodity!(55, "Armored Vehicles", 7_000_000, 10, dice(1, 1), [In -5, Ri -2, Po 4], [Na -2, Ri 1]),
    commodity!(56, "Farm Machinery", 150_000, 4, dice(1, 1), [In -5, Ri -2], [Ag 5, Na -8, Po 1]),
    commodity!(61, "Electronics Parts", 100_000, 1, dice(1, 5), [In -4, Ri -3], [Ni 2, Po 1]),
    commodity!(62, "Mechanical Parts", 75_000, 1, dice(1, 5), [In -5, Ri -3], [Ni 3, Ag 2]),
    commodity!(63, "Cybernetic Parts", 250_000, 1, dice(1, 5), [In -4, Ri -1], [Ni 4, Ag 1, Na 2]),
    commodity!(64, "Computer Parts", 150_000, 1, dice(1, 5), [In -5, Ri -3], [Ni 3, Ag 1, Na 2]),
    commodity!(65, "Machine Tools", 750_000, 1, dice(1, 5), [In -5, Ri -4], [Ni 3, Ag 1, Na 2]),
    commodity!(66, "Vacc Suits", 400_000, 1, dice(1, 5), [Na -5, In -3, Ri -1], [Na -1, Ni 2, Po 1]),
];

pub fn by_key(key: u8) -> Option<&'static Commodity> {
    COMMODITIES.iter().find(|c| c.key == key)
}

pub fn by_name(name: &str) -> Option<&'static Commodity> {
    let name = name.trim();
    COMMODITIES
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name))
}

#[test]
fn test_table_covers_every_roll() {
    for tens in 1..=6u8 {
        for units in 1..=6u8 {
            let key = tens * 10 + units;
            let commodity = by_key(key).unwrap();
            assert_eq!(by_name(commodity.name).unwrap().key, key);
        }
    }
    assert!(by_key(17).is_none());
    assert_eq!(by_name("air/raft").unwrap().unit_size, 4);
}
