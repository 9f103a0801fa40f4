//! Data-driven game balance
//!
//! Every gameplay constant lives here so a JSON file can override any subset
//! of them. Missing fields fall back to the reference values.

use std::path::{Path, PathBuf};

use glam::IVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::tiles::{MAX_PALETTE_LEN, TileCode, TileKind, default_palette};

/// Failure to read a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid tuning file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning value out of range: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === World ===
    pub tile_size: i32,
    pub world_rows: usize,
    pub world_cols: usize,
    /// Tile palette indexed by tile code
    pub palette: Vec<TileKind>,

    // === Player ===
    pub player_speed: i32,
    pub player_max_health: i32,
    /// Start tile as (col, row)
    pub player_start_tile: (i32, i32),
    pub player_hitbox: i32,
    /// Ticks that must pass between two shots
    pub fire_cooldown_ticks: u32,
    /// Ticks of immunity after taking contact damage
    pub invincibility_ticks: u32,

    // === Projectiles ===
    pub projectile_speed: i32,
    pub projectile_damage: i32,
    /// A projectile is removed once it has lived longer than this
    pub projectile_lifetime_ticks: u32,
    pub projectile_hitbox: i32,

    // === Enemies ===
    pub enemy_count: usize,
    pub enemy_speed: i32,
    pub enemy_max_health: i32,
    pub enemy_damage: i32,
    pub enemy_hitbox: i32,
    pub enemy_kill_score: u64,

    // === Boss ===
    pub boss_score_threshold: u64,
    pub boss_max_health: i32,
    pub boss_speed: i32,
    pub boss_damage: i32,
    /// Boss sprite size in tiles
    pub boss_scale: i32,
    /// Hitbox inset from each side of the boss sprite
    pub boss_hitbox_inset: i32,
    pub boss_bonus_score: u64,
    /// Tile code the boss walks over regardless of solidity
    pub boss_ignores_tile_code: Option<TileCode>,

    // === Animation ===
    pub anim_swap_ticks: u32,
    pub boss_anim_swap_ticks: u32,

    // === Flow ===
    /// Whether fire in the Win phase starts a fresh run
    pub restart_after_win: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            world_rows: WORLD_ROWS,
            world_cols: WORLD_COLS,
            palette: default_palette(),

            player_speed: 4,
            player_max_health: 10,
            player_start_tile: (22, 30),
            player_hitbox: 32,
            fire_cooldown_ticks: 10,
            invincibility_ticks: 60,

            projectile_speed: 7,
            projectile_damage: 1,
            projectile_lifetime_ticks: 75,
            projectile_hitbox: 16,

            enemy_count: 10,
            enemy_speed: 2,
            enemy_max_health: 4,
            enemy_damage: 1,
            enemy_hitbox: 48,
            enemy_kill_score: 10,

            boss_score_threshold: 100,
            boss_max_health: 80,
            boss_speed: 4,
            boss_damage: 2,
            boss_scale: 3,
            boss_hitbox_inset: 20,
            boss_bonus_score: 500,
            boss_ignores_tile_code: Some(0),

            anim_swap_ticks: 10,
            boss_anim_swap_ticks: 12,

            restart_after_win: true,
        }
    }
}

impl Tuning {
    /// Load tuning from a JSON file; absent fields keep their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TuningError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tuning: Self = serde_json::from_str(&json).map_err(|source| TuningError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        tuning.validate()?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn check(ok: bool, what: &str) -> Result<(), TuningError> {
            if ok {
                Ok(())
            } else {
                Err(TuningError::Invalid(what.to_string()))
            }
        }

        check(self.tile_size > 0, "tile_size must be positive")?;
        check(self.world_rows > 0, "world_rows must be positive")?;
        check(self.world_cols > 0, "world_cols must be positive")?;
        check(!self.palette.is_empty(), "palette is empty")?;
        check(
            self.palette.len() <= MAX_PALETTE_LEN,
            "palette has more entries than tile codes",
        )?;

        check(self.player_speed >= 0, "player_speed is negative")?;
        check(self.enemy_speed >= 0, "enemy_speed is negative")?;
        check(self.boss_speed >= 0, "boss_speed is negative")?;
        check(self.projectile_speed >= 0, "projectile_speed is negative")?;

        check(self.player_max_health > 0, "player_max_health must be positive")?;
        check(self.enemy_max_health > 0, "enemy_max_health must be positive")?;
        check(self.boss_max_health > 0, "boss_max_health must be positive")?;
        check(
            self.projectile_lifetime_ticks > 0,
            "projectile_lifetime_ticks must be positive",
        )?;

        check(self.player_hitbox > 0, "player_hitbox must be positive")?;
        check(self.enemy_hitbox > 0, "enemy_hitbox must be positive")?;
        check(self.projectile_hitbox > 0, "projectile_hitbox must be positive")?;
        check(self.boss_scale > 0, "boss_scale must be positive")?;
        check(
            self.boss_hitbox_inset >= 0 && 2 * self.boss_hitbox_inset < self.boss_size(),
            "boss_hitbox_inset leaves no hitbox",
        )?;
        Ok(())
    }

    /// World-pixel position of the player's start tile
    pub fn player_start(&self) -> IVec2 {
        let (col, row) = self.player_start_tile;
        IVec2::new(col, row) * self.tile_size
    }

    /// World-pixel position the boss appears at (centre tile of the world)
    pub fn boss_spawn(&self) -> IVec2 {
        let col = (self.world_cols / 2) as i32;
        let row = (self.world_rows / 2) as i32;
        IVec2::new(col, row) * self.tile_size
    }

    /// Boss sprite edge length in pixels
    pub fn boss_size(&self) -> i32 {
        self.tile_size * self.boss_scale
    }
}
