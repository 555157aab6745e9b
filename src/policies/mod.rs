//! Timing policies.
//!
//! The only knob here is [`DelayRange`]: how long a simulated step takes.
//!
//! ## Quick wiring
//! ```text
//! Config { arrival, manager_delay, safe_delay: DelayRange }
//!      ├─► Bank staggers customer spawns by arrival.sample()
//!      └─► Teller holds the manager / safe gate for *_delay.sample()
//! ```
//!
//! ## Defaults
//! - `DelayRange::default()` → zero delay.
//! - `Config::default()` → arrival 1..=5ms, manager 5..=30ms, safe 10..=50ms.

mod delay;

pub use delay::DelayRange;
