use serde::{Deserialize, Serialize};

use crate::cargo::{Baggage, Cargo, Freight, BAGGAGE_TONNAGE};
use crate::errors::Errcode;
use crate::galaxy::coordinate::Coordinate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HoldItem {
    Cargo(Cargo),
    Freight(Freight),
    Baggage(Baggage),
}

impl HoldItem {
    pub fn tonnage(&self) -> u32 {
        match self {
            HoldItem::Cargo(cargo) => cargo.tonnage(),
            HoldItem::Freight(freight) => freight.tonnage,
            HoldItem::Baggage(_) => BAGGAGE_TONNAGE,
        }
    }

    /// Where this item has to be delivered, speculative cargo goes anywhere
    pub fn destination(&self) -> Option<Coordinate> {
        match self {
            HoldItem::Cargo(_) => None,
            HoldItem::Freight(freight) => Some(freight.destination),
            HoldItem::Baggage(baggage) => Some(baggage.destination),
        }
    }

    pub fn encode(&self) -> String {
        match self {
            HoldItem::Cargo(cargo) => cargo.encode(),
            HoldItem::Freight(freight) => freight.encode(),
            HoldItem::Baggage(baggage) => baggage.encode(),
        }
    }

    pub fn decode(s: &str) -> Result<HoldItem, Errcode> {
        let tag = s.split(" - ").next().unwrap_or("").trim();
        match tag {
            "Cargo" => Ok(HoldItem::Cargo(Cargo::decode(s)?)),
            "Freight" => Ok(HoldItem::Freight(Freight::decode(s)?)),
            "Baggage" => Ok(HoldItem::Baggage(Baggage::decode(s)?)),
            _ => Err(Errcode::UnknownTag("hold item", tag.to_string())),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ShipHold {
    pub capacity: u32,
    items: Vec<HoldItem>,
}

impl ShipHold {
    pub fn with_capacity(capacity: u32) -> ShipHold {
        ShipHold {
            capacity,
            items: vec![],
        }
    }

    pub fn usage(&self) -> u32 {
        self.items.iter().map(|item| item.tonnage()).sum()
    }

    pub fn space_left(&self) -> u32 {
        self.capacity.saturating_sub(self.usage())
    }

    pub fn has_room_for(&self, tons: u32) -> bool {
        tons <= self.space_left()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[HoldItem] {
        &self.items
    }

    /// Stores an item, merging cargo with an existing lot of the same goods and origin
    pub fn add(&mut self, item: HoldItem) {
        if let HoldItem::Cargo(ref new) = item {
            let existing = self.items.iter_mut().find_map(|it| match it {
                HoldItem::Cargo(c) if c.name == new.name && c.source == new.source => Some(c),
                _ => None,
            });
            if let Some(lot) = existing {
                lot.quantity += new.quantity;
                return;
            }
        }
        self.items.push(item);
    }

    pub fn remove(&mut self, index: usize) -> Result<HoldItem, Errcode> {
        if index >= self.items.len() {
            return Err(Errcode::NoSuchHoldItem(index));
        }
        Ok(self.items.remove(index))
    }

    /// Takes `quantity` units of the cargo at `index`, removing the lot once empty
    pub fn take_cargo(&mut self, index: usize, quantity: u32) -> Result<Cargo, Errcode> {
        if quantity == 0 {
            return Err(Errcode::SellNothing);
        }
        let Some(HoldItem::Cargo(lot)) = self.items.get_mut(index) else {
            return Err(Errcode::NoSuchHoldItem(index));
        };
        let taken = lot.take(quantity)?;
        if lot.quantity == 0 {
            self.items.remove(index);
        }
        Ok(taken)
    }

    pub fn cargo(&self, index: usize) -> Option<&Cargo> {
        match self.items.get(index) {
            Some(HoldItem::Cargo(c)) => Some(c),
            _ => None,
        }
    }

    pub fn freight_destinations(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.items.iter().filter_map(|item| match item {
            HoldItem::Freight(f) => Some(f.destination),
            _ => None,
        })
    }

    /// Removes every freight lot and baggage bound for `destination`
    pub fn unload_for(&mut self, destination: Coordinate) -> Vec<HoldItem> {
        let (unloaded, kept) = std::mem::take(&mut self.items)
            .into_iter()
            .partition(|item| item.destination() == Some(destination));
        self.items = kept;
        unloaded
    }
}
