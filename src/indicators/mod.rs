//! Series derivation.
//!
//! - `vol`: rolling annualized volatility from weekly log-returns
//! - `returns`: percent weekly change series
//! - `band`: volatility band around the current level, and the return
//!   filter it induces

pub mod band;
pub mod returns;
pub mod vol;
