//! Game state and entity variants
//!
//! `GameState` exclusively owns the player, the enemy pool, live projectiles
//! and the optional boss. Entities never reach back into it; `tick` applies
//! collision and combat results from outside.

use std::sync::Arc;

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::tile_collision;
use super::entity::{Body, Entity, Facing, Hitbox};
use super::spawn::random_open_position;
use super::tiles::TileGrid;
use crate::tuning::Tuning;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for fire
    Title,
    /// Active gameplay
    Playing,
    /// Player died; fire restarts
    GameOver,
    /// Boss defeated
    Win,
}

/// Discrete notifications for audio/FX collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A run begins, from the title screen or a restart
    RunStarted,
    PlayerHit,
    EnemyHit,
    EnemyDeath,
    BossSpawned,
    BossHit,
    BossDeath,
    GameOver,
    Victory,
}

/// Held movement keys and fire for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Fire held, or pressed since the previous tick
    pub fire: bool,
}

impl TickInput {
    /// First held direction by fixed priority: up, down, left, right
    pub fn direction(&self) -> Option<Facing> {
        if self.up {
            Some(Facing::Up)
        } else if self.down {
            Some(Facing::Down)
        } else if self.left {
            Some(Facing::Left)
        } else if self.right {
            Some(Facing::Right)
        } else {
            None
        }
    }
}

/// Step along the current facing unless a solid tile is ahead
fn move_unless_blocked(body: &mut Body, grid: &TileGrid) -> bool {
    if tile_collision(body, grid) {
        return false;
    }
    body.advance();
    true
}

/// Axis of greater distance to the target wins; ties go horizontal
pub fn chase_direction(from: IVec2, to: IVec2) -> Option<Facing> {
    let d = to - from;
    if d == IVec2::ZERO {
        return None;
    }
    if d.y.abs() > d.x.abs() {
        Some(if d.y < 0 { Facing::Up } else { Facing::Down })
    } else {
        Some(if d.x < 0 { Facing::Left } else { Facing::Right })
    }
}

/// The player-controlled character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    /// Ticks since the last shot, capped just past the cooldown
    fire_timer: u32,
    fire_cooldown: u32,
    /// Remaining immunity ticks
    invincible_ticks: u32,
    invincibility_window: u32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        let body = Body::new(
            tuning.player_start(),
            tuning.player_speed,
            tuning.player_max_health,
            0,
            Hitbox::centered(tuning.tile_size, tuning.player_hitbox),
            tuning.anim_swap_ticks,
        );
        Self {
            body,
            fire_timer: 0,
            fire_cooldown: tuning.fire_cooldown_ticks,
            invincible_ticks: 0,
            invincibility_window: tuning.invincibility_ticks,
        }
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_ticks > 0
    }

    pub fn invincible_ticks(&self) -> u32 {
        self.invincible_ticks
    }

    /// Ready to fire on the next request
    pub fn can_fire(&self) -> bool {
        self.fire_timer > self.fire_cooldown
    }

    /// Movement, invincibility decay and firing. Returns a projectile if one was fired.
    pub fn update(
        &mut self,
        input: &TickInput,
        grid: &TileGrid,
        tuning: &Tuning,
    ) -> Option<Projectile> {
        self.invincible_ticks = self.invincible_ticks.saturating_sub(1);

        if let Some(facing) = input.direction() {
            self.body.facing = facing;
            move_unless_blocked(&mut self.body, grid);
            // Walk cycle only runs while a key is held
            self.body.anim.advance();
        }

        if self.fire_timer <= self.fire_cooldown {
            self.fire_timer += 1;
        }
        if input.fire && self.can_fire() {
            self.fire_timer = 0;
            return Some(Projectile::fired_by(&self.body, tuning));
        }
        None
    }
}

impl Entity for Player {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// Contact damage is ignored while invincible; a landed hit opens the window
    fn on_hit(&mut self, damage: i32) -> bool {
        if self.is_invincible() {
            return false;
        }
        self.body.health.damage(damage);
        self.invincible_ticks = self.invincibility_window;
        true
    }
}

/// Pooled chaser; respawned instead of destroyed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub body: Body,
}

impl Enemy {
    pub fn new(pos: IVec2, tuning: &Tuning) -> Self {
        let body = Body::new(
            pos,
            tuning.enemy_speed,
            tuning.enemy_max_health,
            tuning.enemy_damage,
            Hitbox::centered(tuning.tile_size, tuning.enemy_hitbox),
            tuning.anim_swap_ticks,
        );
        Self { body }
    }

    /// Chase the target one step along the dominant axis
    pub fn update(&mut self, target: IVec2, grid: &TileGrid) {
        if let Some(facing) = chase_direction(self.body.pos, target) {
            self.body.facing = facing;
        }
        move_unless_blocked(&mut self.body, grid);
        self.body.anim.advance();
    }

    /// Relocate to an open tile at full health
    pub fn respawn(&mut self, pos: IVec2) {
        self.body.pos = pos;
        self.body.health.heal_full();
        log::debug!("Enemy respawned at {:?}", pos);
    }
}

impl Entity for Enemy {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

/// Large chaser that appears once the score threshold is reached
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub body: Body,
}

impl Boss {
    pub fn new(tuning: &Tuning) -> Self {
        let mut body = Body::new(
            tuning.boss_spawn(),
            tuning.boss_speed,
            tuning.boss_max_health,
            tuning.boss_damage,
            Hitbox::inset(tuning.boss_size(), tuning.boss_hitbox_inset),
            tuning.boss_anim_swap_ticks,
        );
        body.ignores_tile_code = tuning.boss_ignores_tile_code;
        Self { body }
    }

    pub fn update(&mut self, target: IVec2, grid: &TileGrid) {
        if let Some(facing) = chase_direction(self.body.pos, target) {
            self.body.facing = facing;
        }
        move_unless_blocked(&mut self.body, grid);
        self.body.anim.advance();
    }
}

impl Entity for Boss {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

/// Straight-line shot; ignores terrain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub body: Body,
    /// Travel direction; `None` never moves
    pub heading: Option<Facing>,
    /// Ticks alive
    age: u32,
}

impl Projectile {
    /// Spawn at the shooter's position, travelling along its facing
    pub fn fired_by(shooter: &Body, tuning: &Tuning) -> Self {
        Self::new(shooter.pos, Some(shooter.facing), tuning)
    }

    pub fn new(pos: IVec2, heading: Option<Facing>, tuning: &Tuning) -> Self {
        let mut body = Body::new(
            pos,
            tuning.projectile_speed,
            1,
            tuning.projectile_damage,
            Hitbox::centered(tuning.tile_size, tuning.projectile_hitbox),
            tuning.anim_swap_ticks,
        );
        if let Some(facing) = heading {
            body.facing = facing;
        }
        Self {
            body,
            heading,
            age: 0,
        }
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn update(&mut self) {
        if self.heading.is_some() {
            self.body.advance();
        }
        self.body.anim.advance();
        self.age += 1;
    }

    /// Lived longer than `lifetime` ticks
    pub fn expired(&self, lifetime: u32) -> bool {
        self.age > lifetime
    }
}

impl Entity for Projectile {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    /// Shared read-only world
    pub grid: Arc<TileGrid>,
    pub phase: GamePhase,
    /// Monotonic within a run
    pub score: u64,
    /// Simulation ticks spent in play
    pub time_ticks: u64,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    /// Present only while active
    pub boss: Option<Boss>,
    /// Set once the boss dies; blocks respawning it
    pub boss_defeated: bool,
    pub(crate) rng: Pcg32,
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    /// Fresh state on the title screen with a populated enemy pool
    pub fn new(grid: Arc<TileGrid>, tuning: Tuning, seed: u64) -> Self {
        let player = Player::new(&tuning);
        let mut state = Self {
            seed,
            tuning,
            grid,
            phase: GamePhase::Title,
            score: 0,
            time_ticks: 0,
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            boss: None,
            boss_defeated: false,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        };
        state.populate_enemies();
        state
    }

    fn populate_enemies(&mut self) {
        self.enemies.clear();
        for _ in 0..self.tuning.enemy_count {
            let pos = random_open_position(&self.grid, &mut self.rng);
            self.enemies.push(Enemy::new(pos, &self.tuning));
        }
    }

    /// Reinitialise player, score, enemy pool, projectiles and boss for a new run
    pub fn reset(&mut self) {
        self.player = Player::new(&self.tuning);
        self.score = 0;
        self.time_ticks = 0;
        self.projectiles.clear();
        self.boss = None;
        self.boss_defeated = false;
        self.populate_enemies();
        log::info!("World reset");
    }

    /// Random open tile position drawn from the run RNG
    pub fn random_open_position(&mut self) -> IVec2 {
        random_open_position(&self.grid, &mut self.rng)
    }

    pub fn boss_active(&self) -> bool {
        self.boss.is_some()
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events raised since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
