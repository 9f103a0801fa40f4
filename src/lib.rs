//! Tile Siege - a top-down tile-world arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tile collision, entities, combat, game phases)
//! - `game`: Frame driver tying input, the fixed-timestep clock, audio and rendering together
//! - `platform`: Input latch and fixed-timestep clock
//! - `view`: Read-only render contract and follow camera
//! - `audio`: Sound intent emitted from simulation events
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod game;
pub mod platform;
pub mod sim;
pub mod tuning;
pub mod view;

pub use game::Game;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f64 = 1.0 / TICK_RATE as f64;
    /// Maximum catch-up ticks per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f64 = 0.25;

    /// Source sprite size before scaling
    pub const ORIGINAL_TILE_SIZE: i32 = 16;
    pub const TILE_SCALE: i32 = 3;
    /// On-screen tile size in pixels (48)
    pub const TILE_SIZE: i32 = ORIGINAL_TILE_SIZE * TILE_SCALE;

    /// Viewport size in tiles
    pub const SCREEN_COLS: i32 = 26;
    pub const SCREEN_ROWS: i32 = 15;
    pub const SCREEN_WIDTH: i32 = TILE_SIZE * SCREEN_COLS;
    pub const SCREEN_HEIGHT: i32 = TILE_SIZE * SCREEN_ROWS;

    /// World size in tiles
    pub const WORLD_ROWS: usize = 50;
    pub const WORLD_COLS: usize = 50;
}
