//! Demo/idle mode: synthesises input so the game plays itself
//!
//! Targets the boss when present, otherwise the nearest enemy. Lines up on
//! the shorter axis, then turns toward the target and keeps firing.

use glam::IVec2;

use super::entity::Facing;
use super::state::{GamePhase, GameState, TickInput};

/// Pixels of slack when deciding the player is lined up with a target
const ALIGN_TOLERANCE: i32 = 12;
/// Stop closing in once this near (pixels along the firing axis)
const STANDOFF: i32 = 160;

pub fn autopilot_input(state: &GameState) -> TickInput {
    if state.phase != GamePhase::Playing {
        return TickInput {
            fire: true,
            ..Default::default()
        };
    }

    let me = state.player.body.bounds().center();
    let Some(target) = pick_target(state, me) else {
        return TickInput::default();
    };

    let d = target - me;
    let mut input = TickInput {
        fire: true,
        ..Default::default()
    };

    let (aim, closing) = if d.x.abs() <= ALIGN_TOLERANCE {
        (vertical(d.y), d.y.abs() > STANDOFF)
    } else if d.y.abs() <= ALIGN_TOLERANCE {
        (horizontal(d.x), d.x.abs() > STANDOFF)
    } else {
        // Not lined up yet: walk along the shorter axis
        let step = if d.x.abs() < d.y.abs() {
            horizontal(d.x)
        } else {
            vertical(d.y)
        };
        press(&mut input, step);
        return input;
    };

    if state.player.body.facing != aim || closing {
        press(&mut input, aim);
    }
    input
}

fn pick_target(state: &GameState, me: IVec2) -> Option<IVec2> {
    if let Some(boss) = &state.boss {
        return Some(boss.body.bounds().center());
    }
    state
        .enemies
        .iter()
        .map(|e| e.body.bounds().center())
        .min_by_key(|c| {
            let d = *c - me;
            d.x.abs() + d.y.abs()
        })
}

fn vertical(dy: i32) -> Facing {
    if dy < 0 { Facing::Up } else { Facing::Down }
}

fn horizontal(dx: i32) -> Facing {
    if dx < 0 { Facing::Left } else { Facing::Right }
}

fn press(input: &mut TickInput, facing: Facing) {
    match facing {
        Facing::Up => input.up = true,
        Facing::Down => input.down = true,
        Facing::Left => input.left = true,
        Facing::Right => input.right = true,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::sim::state::Enemy;
    use crate::sim::tiles::{TileGrid, default_palette};
    use crate::tuning::Tuning;

    fn state() -> GameState {
        let grid = TileGrid::from_codes(50, 50, 48, vec![4; 2500], default_palette()).unwrap();
        let mut state = GameState::new(Arc::new(grid), Tuning::default(), 3);
        state.enemies.clear();
        state
    }

    #[test]
    fn test_presses_fire_outside_play() {
        let state = state();
        assert_eq!(state.phase, GamePhase::Title);
        assert!(autopilot_input(&state).fire);
    }

    #[test]
    fn test_aligns_then_faces_target() {
        let mut state = state();
        state.phase = GamePhase::Playing;
        let pos = state.player.body.pos;

        // Enemy far right and slightly below: line up vertically first
        state.enemies.push(Enemy::new(pos + IVec2::new(400, 100), &state.tuning));
        let input = autopilot_input(&state);
        assert!(input.down && !input.right);

        // Lined up: turn right
        state.enemies[0].body.pos = pos + IVec2::new(400, 0);
        let input = autopilot_input(&state);
        assert!(input.right && input.fire);
    }
}
