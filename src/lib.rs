//! Ride Match - geohash-indexed rider to driver matching
//!
//! Drivers are indexed in a prefix tree keyed by their geohash cell. A ride
//! request searches the cells around it, ranks available drivers by distance
//! and hands the ride to the nearest one, favouring the longest-idle driver
//! when distances are effectively equal.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;

// Re-export commonly used types
pub use crate::core::{Dispatcher, DispatchError, Matcher, geohash::{encode, decode, neighbors}};
pub use models::{Coordinate, MatchOutcome, MatchPolicy, SystemStats};
