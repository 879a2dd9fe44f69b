//! Doomtown Reloaded rules engine
//!
//! Rules-resolution core for a Doomtown card game server: costs, usage
//! limits, event subscriptions, activation contexts, abilities, trigger
//! windows and the game step queue that schedules them.

pub mod catalog;
pub mod core;
pub mod error;
pub mod game;
pub mod zones;

pub use error::{Result, RulesError};
