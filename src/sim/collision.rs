//! Collision detection for the tile world
//!
//! Two tests, both discrete per tick:
//! - body vs tiles: predictive, looks one step ahead along the facing
//! - body vs body: plain AABB overlap of world-space hitboxes
//!
//! There is no swept test; a fast body can skip over a thin overlap.

use super::entity::{Body, Facing};
use super::tiles::TileGrid;

/// Would one more step along `body.facing` run into a solid tile?
///
/// Advances only the leading edge of the hitbox by `speed`, then samples the
/// two tiles under that edge's corners. Pure: calling it twice without moving
/// gives the same answer.
pub fn tile_collision(body: &Body, grid: &TileGrid) -> bool {
    let rect = body.bounds();
    let (left, right, top, bottom) = (rect.left(), rect.right(), rect.top(), rect.bottom());
    let speed = body.speed;

    // (y, x) pairs of the two leading corners after the step
    let corners = match body.facing {
        Facing::Up => [(top - speed, left), (top - speed, right)],
        Facing::Down => [(bottom + speed, left), (bottom + speed, right)],
        Facing::Left => [(top, left - speed), (bottom, left - speed)],
        Facing::Right => [(top, right + speed), (bottom, right + speed)],
    };

    corners.iter().any(|&(y, x)| {
        let (row, col) = grid.tile_of(x, y);
        blocks(body, grid, row, col)
    })
}

/// Solidity of one tile as seen by `body`
fn blocks(body: &Body, grid: &TileGrid, row: i32, col: i32) -> bool {
    match grid.checked_code_at(row, col) {
        // Outside the world counts as wall
        None => true,
        Some(code) if body.ignores_tile_code == Some(code) => false,
        Some(code) => grid.is_solid(code),
    }
}

/// World-space hitbox overlap
pub fn overlaps(a: &Body, b: &Body) -> bool {
    a.bounds().intersects(&b.bounds())
}
