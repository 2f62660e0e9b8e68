pub mod calendar;
pub mod cargo;
pub mod config;
pub mod crew;
pub mod depot;
pub mod dice;
pub mod errors;
pub mod financials;
pub mod galaxy;
pub mod game;
pub mod ship;
pub mod syslog;
