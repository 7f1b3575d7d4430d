//! ADAS Common Library
//!
//! Shared vocabulary for the ADAS actuation workspace: the decoded vehicle
//! state record, actuator intents, abstract outgoing bus commands, vehicle
//! profiles, and the fixed numeric control policy.
//!
//! # Module Structure
//!
//! - [`state`] - Decoded vehicle state and button event types
//! - [`command`] - Actuator intents, HUD inputs, and outgoing commands
//! - [`profile`] - Per-vehicle-variant capabilities and feedforward curves
//! - [`params`] - Fixed control policy constants
//!
//! # Usage
//!
//! ```toml
//! [dependencies]
//! adas_common = { path = "../adas_common" }
//! ```

pub mod command;
pub mod params;
pub mod profile;
pub mod state;
