use serde::{Deserialize, Serialize};

use crate::errors::Errcode;

pub const DAYS_PER_YEAR: u32 = 365;
pub const DAYS_PER_WEEK: u32 = 7;

/// Day of year (1..=365) and year
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ImperialDate {
    day: u32,
    year: u32,
}

impl ImperialDate {
    pub fn new(day: u32, year: u32) -> Result<ImperialDate, Errcode> {
        if !(1..=DAYS_PER_YEAR).contains(&day) {
            return Err(Errcode::DayOutOfRange(format!("{day:03}-{year}")));
        }
        Ok(ImperialDate { day, year })
    }

    #[inline]
    pub fn day(&self) -> u32 {
        self.day
    }

    #[inline]
    pub fn year(&self) -> u32 {
        self.year
    }

    fn ordinal(&self) -> i64 {
        (self.year as i64) * (DAYS_PER_YEAR as i64) + (self.day as i64) - 1
    }

    fn from_ordinal(ordinal: i64) -> ImperialDate {
        let ordinal = ordinal.max(0);
        ImperialDate {
            year: (ordinal / DAYS_PER_YEAR as i64) as u32,
            day: (ordinal % DAYS_PER_YEAR as i64) as u32 + 1,
        }
    }

    pub fn plus_days(&self, days: i64) -> ImperialDate {
        ImperialDate::from_ordinal(self.ordinal() + days)
    }

    /// Signed number of days from `earlier` to `self`
    pub fn days_since(&self, earlier: &ImperialDate) -> i64 {
        self.ordinal() - earlier.ordinal()
    }
}

impl std::fmt::Display for ImperialDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:03}-{}", self.day, self.year)
    }
}

impl std::str::FromStr for ImperialDate {
    type Err = Errcode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((day, year)) = s.trim().split_once('-') else {
            return Err(Errcode::InvalidDate(s.to_string()));
        };
        let day = day
            .parse::<u32>()
            .map_err(|_| Errcode::NotAnInteger("day", day.to_string()))?;
        let year = year
            .parse::<u32>()
            .map_err(|_| Errcode::NotAnInteger("year", year.to_string()))?;
        if !(1..=DAYS_PER_YEAR).contains(&day) {
            return Err(Errcode::DayOutOfRange(s.to_string()));
        }
        Ok(ImperialDate { day, year })
    }
}

/// The components told about every date change, in the order they are listed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Subscriber {
    CargoDepot,
    Financials,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateChange {
    pub date: ImperialDate,
    pub subscribers: Vec<Subscriber>,
}

#[derive(Debug, Clone)]
pub struct Calendar {
    current: ImperialDate,
    subscribers: Vec<Subscriber>,
}

impl Calendar {
    pub fn new(current: ImperialDate, subscribers: Vec<Subscriber>) -> Calendar {
        Calendar {
            current,
            subscribers,
        }
    }

    /// Depot first, so a restock happens before the day's bills are posted
    pub fn with_default_subscribers(current: ImperialDate) -> Calendar {
        Calendar::new(current, vec![Subscriber::CargoDepot, Subscriber::Financials])
    }

    #[inline]
    pub fn current(&self) -> ImperialDate {
        self.current
    }

    pub fn subscribers(&self) -> &[Subscriber] {
        &self.subscribers
    }

    pub fn set_date(&mut self, date: ImperialDate) -> DateChange {
        log::debug!("Date changed from {} to {}", self.current, date);
        self.current = date;
        DateChange {
            date,
            subscribers: self.subscribers.clone(),
        }
    }

    pub fn advance_day(&mut self) -> DateChange {
        self.set_date(self.current.plus_days(1))
    }

    pub fn plus_week(&mut self) -> DateChange {
        self.set_date(self.current.plus_days(DAYS_PER_WEEK as i64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_wraps_year() {
        let date = ImperialDate::new(364, 1105).unwrap();
        let next = date.plus_days(3);
        assert_eq!((next.day(), next.year()), (2, 1106));
        assert_eq!(next.days_since(&date), 3);
        assert_eq!(date.days_since(&next), -3);
    }

    #[test]
    fn test_date_text_form() {
        let date = ImperialDate::new(8, 1105).unwrap();
        assert_eq!(date.to_string(), "008-1105");
        assert_eq!("008-1105".parse::<ImperialDate>(), Ok(date));

        assert_eq!(
            "366-1105".parse::<ImperialDate>(),
            Err(Errcode::DayOutOfRange("366-1105".to_string()))
        );
        assert_eq!(
            "000-1105".parse::<ImperialDate>(),
            Err(Errcode::DayOutOfRange("000-1105".to_string()))
        );
        assert_eq!(
            "1105".parse::<ImperialDate>(),
            Err(Errcode::InvalidDate("1105".to_string()))
        );
        assert_eq!(
            "abc-1105".parse::<ImperialDate>(),
            Err(Errcode::NotAnInteger("day", "abc".to_string()))
        );
    }

    #[test]
    fn test_calendar_notifies_in_order() {
        let start = ImperialDate::new(1, 1105).unwrap();
        let mut calendar = Calendar::new(start, vec![Subscriber::Financials, Subscriber::CargoDepot]);
        let change = calendar.plus_week();
        assert_eq!(change.date, ImperialDate::new(8, 1105).unwrap());
        assert_eq!(
            change.subscribers,
            vec![Subscriber::Financials, Subscriber::CargoDepot]
        );

        let mut calendar = Calendar::with_default_subscribers(start);
        let change = calendar.advance_day();
        assert_eq!(calendar.current().day(), 2);
        assert_eq!(
            change.subscribers,
            vec![Subscriber::CargoDepot, Subscriber::Financials]
        );
    }
}
