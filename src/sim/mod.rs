//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (enemies and projectiles in insertion order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod entity;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod tiles;

pub use autopilot::autopilot_input;
pub use collision::{overlaps, tile_collision};
pub use entity::{Animation, Body, Entity, Facing, Health, Hitbox, Rect};
pub use spawn::{MAX_SPAWN_ATTEMPTS, random_open_position, random_open_tile};
pub use state::{
    Boss, Enemy, GameEvent, GamePhase, GameState, Player, Projectile, TickInput, chase_direction,
};
pub use tick::tick;
pub use tiles::{MAX_PALETTE_LEN, MapError, TileCode, TileGrid, TileKind, default_palette};
