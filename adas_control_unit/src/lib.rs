//! # ADAS Actuation Control Unit
//!
//! Per-cycle command translation and engagement state for a driver
//! assistance actuation module. Each fixed-rate control tick, the unit
//! translates high-level actuator intents (target acceleration, target
//! steering fraction) into abstract bus commands for steering, pedal
//! emulation, and the cluster lane-keep icon, while enforcing the
//! hardware-fault-avoidance invariants of the steering module (message
//! counter continuity, torque rate limits).
//!
//! ## Architecture
//!
//! 1. **Shaping** — pure gas/brake and accel dead-band math
//! 2. **Steering** — torque rate limiting + loopback counter sync
//! 3. **Pedal** — interceptor gain shaping (profile-gated)
//! 4. **Hud** — icon edge/keepalive latch
//! 5. **Engage** — button-debounced engagement state machine
//! 6. **Tick** — per-cycle orchestrator over 1-4
//!
//! ## Zero-Allocation Tick
//!
//! All per-session state lives in one `ControllerState` value threaded
//! through each tick. The tick path performs zero heap allocations; the
//! outgoing command sequence is a fixed-capacity vector.

pub mod config;
pub mod cycle;
pub mod engage;
pub mod hud;
pub mod pedal;
pub mod shaping;
pub mod steering;
pub mod tick;
