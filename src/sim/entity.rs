//! Shared entity data: position, facing, health, hitbox and walk animation
//!
//! Player, enemies, the boss and projectiles all carry a [`Body`]. Variant
//! behaviour lives on the owning types in `state`; the simulation applies
//! collision and combat results to them from the outside.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::tiles::TileCode;

/// Cardinal facing direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Facing {
    /// Unit step in world space (y grows downward)
    pub fn step(self) -> IVec2 {
        match self {
            Facing::Up => IVec2::new(0, -1),
            Facing::Down => IVec2::new(0, 1),
            Facing::Left => IVec2::new(-1, 0),
            Facing::Right => IVec2::new(1, 0),
        }
    }
}

/// Axis-aligned rectangle in world pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub min: IVec2,
    pub size: IVec2,
}

impl Rect {
    pub fn new(min: IVec2, size: IVec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.min.x
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.min.y
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.min.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.min.y + self.size.y
    }

    pub fn center(&self) -> IVec2 {
        self.min + self.size / 2
    }

    /// Strict AABB intersection; touching edges do not overlap
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

/// Collision box relative to the entity origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hitbox {
    pub offset: IVec2,
    pub size: IVec2,
}

impl Hitbox {
    pub fn new(offset: IVec2, size: IVec2) -> Self {
        Self { offset, size }
    }

    /// Square hitbox centred inside a square sprite
    pub fn centered(sprite: i32, size: i32) -> Self {
        let offset = (sprite - size) / 2;
        Self::new(IVec2::splat(offset), IVec2::splat(size))
    }

    /// Square sprite shrunk by `inset` on every side
    pub fn inset(sprite: i32, inset: i32) -> Self {
        Self::new(IVec2::splat(inset), IVec2::splat(sprite - 2 * inset))
    }

    pub fn at(&self, origin: IVec2) -> Rect {
        Rect::new(origin + self.offset, self.size)
    }
}

/// Current and maximum health; `0 <= current <= max` always holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    current: i32,
    max: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        let max = max.max(0);
        Self { current: max, max }
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    /// Subtract damage, saturating at zero. Returns the amount actually removed.
    pub fn damage(&mut self, amount: i32) -> i32 {
        let before = self.current;
        self.current = (self.current - amount.max(0)).max(0);
        before - self.current
    }

    pub fn heal_full(&mut self) {
        self.current = self.max;
    }

    pub fn set(&mut self, value: i32) {
        self.current = value.clamp(0, self.max);
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0
    }
}

/// Two-frame walk cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animation {
    /// 1 or 2
    frame: u8,
    counter: u32,
    swap_every: u32,
}

impl Animation {
    pub fn new(swap_every: u32) -> Self {
        Self {
            frame: 1,
            counter: 0,
            swap_every,
        }
    }

    pub fn frame(&self) -> u8 {
        self.frame
    }

    /// Count one tick; the frame flips once the counter passes the threshold
    pub fn advance(&mut self) {
        self.counter += 1;
        if self.counter > self.swap_every {
            self.frame = if self.frame == 1 { 2 } else { 1 };
            self.counter = 0;
        }
    }
}

/// Data record shared by every entity variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// World position of the sprite's top-left corner
    pub pos: IVec2,
    /// Pixels per tick
    pub speed: i32,
    pub facing: Facing,
    pub health: Health,
    /// Damage dealt on contact
    pub damage: i32,
    pub hitbox: Hitbox,
    pub anim: Animation,
    /// Tile code this body passes through regardless of solidity
    pub ignores_tile_code: Option<TileCode>,
}

impl Body {
    pub fn new(
        pos: IVec2,
        speed: i32,
        max_health: i32,
        damage: i32,
        hitbox: Hitbox,
        swap_every: u32,
    ) -> Self {
        Self {
            pos,
            speed,
            facing: Facing::Down,
            health: Health::new(max_health),
            damage,
            hitbox,
            anim: Animation::new(swap_every),
            ignores_tile_code: None,
        }
    }

    /// Hitbox in world space
    pub fn bounds(&self) -> Rect {
        self.hitbox.at(self.pos)
    }

    /// Commit one tick of movement along the current facing
    pub fn advance(&mut self) {
        self.pos += self.facing.step() * self.speed;
    }
}

/// Behaviour contract shared by everything that can be hit
pub trait Entity {
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;

    /// Apply a hit. Returns true if the hit landed.
    fn on_hit(&mut self, damage: i32) -> bool {
        self.body_mut().health.damage(damage);
        true
    }

    fn is_dead(&self) -> bool {
        self.body().health.is_dead()
    }
}
