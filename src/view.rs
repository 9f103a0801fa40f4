//! Render contract
//!
//! Everything a renderer needs, read from a finished tick without touching
//! simulation state: per-entity sprite data, game phase and score, and a
//! follow camera that culls the tile grid to the viewport.

use glam::IVec2;
use serde::Serialize;

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::sim::{Body, Facing, GamePhase, GameState, Rect, TileCode, TileGrid};

/// What kind of sprite to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpriteKind {
    Player,
    Enemy,
    Boss,
    Projectile,
}

/// One drawable entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpriteView {
    pub kind: SpriteKind,
    pub pos: IVec2,
    pub facing: Option<Facing>,
    /// Walk-cycle frame, 1 or 2
    pub frame: u8,
    pub health: i32,
    pub max_health: i32,
    pub hitbox: Rect,
}

impl SpriteView {
    fn from_body(kind: SpriteKind, body: &Body, facing: Option<Facing>) -> Self {
        Self {
            kind,
            pos: body.pos,
            facing,
            frame: body.anim.frame(),
            health: body.health.current(),
            max_health: body.health.max(),
            hitbox: body.bounds(),
        }
    }
}

/// Snapshot of a completed tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameView {
    pub phase: GamePhase,
    pub score: u64,
    pub tick: u64,
    pub boss_defeated: bool,
    pub player_invincible: bool,
    pub player: SpriteView,
    pub enemies: Vec<SpriteView>,
    pub boss: Option<SpriteView>,
    pub projectiles: Vec<SpriteView>,
}

impl FrameView {
    pub fn capture(state: &GameState) -> Self {
        let body = &state.player.body;
        Self {
            phase: state.phase,
            score: state.score,
            tick: state.time_ticks,
            boss_defeated: state.boss_defeated,
            player_invincible: state.player.is_invincible(),
            player: SpriteView::from_body(SpriteKind::Player, body, Some(body.facing)),
            enemies: state
                .enemies
                .iter()
                .map(|e| SpriteView::from_body(SpriteKind::Enemy, &e.body, Some(e.body.facing)))
                .collect(),
            boss: state
                .boss
                .as_ref()
                .map(|b| SpriteView::from_body(SpriteKind::Boss, &b.body, Some(b.body.facing))),
            projectiles: state
                .projectiles
                .iter()
                .map(|p| SpriteView::from_body(SpriteKind::Projectile, &p.body, p.heading))
                .collect(),
        }
    }
}

/// A tile the renderer should draw this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleTile {
    pub row: usize,
    pub col: usize,
    pub code: TileCode,
    pub screen: IVec2,
}

/// Camera that keeps the player sprite centred on screen
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    /// World position of the tracked sprite
    pub focus: IVec2,
    /// Where the tracked sprite is drawn
    pub anchor: IVec2,
}

impl Camera {
    pub fn new(focus: IVec2, screen: IVec2, tile_size: i32) -> Self {
        Self {
            focus,
            anchor: screen / 2 - IVec2::splat(tile_size / 2),
        }
    }

    /// Default viewport following the player
    pub fn follow(state: &GameState) -> Self {
        Self::new(
            state.player.body.pos,
            IVec2::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            state.grid.tile_size(),
        )
    }

    pub fn to_screen(&self, world: IVec2) -> IVec2 {
        world - self.focus + self.anchor
    }

    /// Whether a tile-sized square at `world` overlaps the viewport.
    ///
    /// The `tile_size` terms cover the square's own extent plus the half-tile
    /// anchor offset, so the test matches the screen edges exactly.
    pub fn sees(&self, world: IVec2, tile_size: i32) -> bool {
        world.x + tile_size > self.focus.x - self.anchor.x
            && world.x - tile_size < self.focus.x + self.anchor.x
            && world.y + tile_size > self.focus.y - self.anchor.y
            && world.y - tile_size < self.focus.y + self.anchor.y
    }

    /// Tiles in view, row-major
    pub fn visible_tiles<'a>(
        &'a self,
        grid: &'a TileGrid,
    ) -> impl Iterator<Item = VisibleTile> + 'a {
        let size = grid.tile_size();
        (0..grid.rows()).flat_map(move |row| {
            (0..grid.cols()).filter_map(move |col| {
                let world = IVec2::new(col as i32, row as i32) * size;
                self.sees(world, size).then(|| VisibleTile {
                    row,
                    col,
                    code: grid.code_at(row, col),
                    screen: self.to_screen(world),
                })
            })
        })
    }
}
