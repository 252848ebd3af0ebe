//! Raptor Rush Match Core
//!
//! Headless simulation of a two-player arcade match: two raptors chase a
//! wandering chicken over a normalized field, charge each other to knock it
//! loose and carry it into the opponent's goal band.
//!
//! The presentation layer only talks to [`game::controller::MatchController`]:
//! it writes input, requests lifecycle changes and reads the published
//! [`game::state::GameSnapshot`]s and match events.

pub mod config;
pub mod game;
pub mod metrics;
pub mod util;
