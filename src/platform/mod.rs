//! Platform abstraction layer
//!
//! Thin adapters between a host (window, terminal, test harness) and the
//! simulation:
//! - Input latching into per-tick snapshots
//! - Fixed-timestep clock and wall-clock frame timer

pub mod input;
pub mod time;

pub use input::{InputState, Key};
pub use time::{FixedTimestep, FrameTimer};
