//! Fixed timestep simulation tick
//!
//! One call advances the game by exactly one tick. The pipeline order is
//! fixed: player, death check, boss spawn, boss, enemies, projectiles.

use super::collision::overlaps;
use super::entity::Entity;
use super::state::{Boss, GameEvent, GamePhase, GameState, TickInput};

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    // Outside play only fire matters
    match state.phase {
        GamePhase::Title => {
            if input.fire {
                state.phase = GamePhase::Playing;
                state.emit(GameEvent::RunStarted);
                log::info!("Game started");
            }
            return;
        }
        GamePhase::GameOver => {
            if input.fire {
                restart(state);
                log::info!("Restarted after game over");
            }
            return;
        }
        GamePhase::Win => {
            if input.fire && state.tuning.restart_after_win {
                restart(state);
                log::info!("Restarted after victory");
            }
            return;
        }
        GamePhase::Playing => {}
    }

    state.time_ticks += 1;

    // Player
    if let Some(shot) = state.player.update(input, &state.grid, &state.tuning) {
        state.projectiles.push(shot);
    }

    if state.player.is_dead() {
        state.phase = GamePhase::GameOver;
        state.emit(GameEvent::GameOver);
        log::info!("Game over with score {}", state.score);
        return;
    }

    // Boss appearance
    if state.boss.is_none()
        && !state.boss_defeated
        && state.score >= state.tuning.boss_score_threshold
    {
        state.boss = Some(Boss::new(&state.tuning));
        state.emit(GameEvent::BossSpawned);
        log::info!("Boss appeared at score {}", state.score);
    }

    let target = state.player.body.pos;

    // Boss movement and contact damage
    if let Some(boss) = state.boss.as_mut() {
        boss.update(target, &state.grid);
        if overlaps(&boss.body, &state.player.body) && state.player.on_hit(boss.body.damage) {
            state.events.push(GameEvent::PlayerHit);
        }
    }

    // Enemy movement and contact damage
    for enemy in &mut state.enemies {
        enemy.update(target, &state.grid);
        if overlaps(&enemy.body, &state.player.body) && state.player.on_hit(enemy.body.damage) {
            state.events.push(GameEvent::PlayerHit);
        }
    }

    update_projectiles(state);
}

fn restart(state: &mut GameState) {
    state.reset();
    state.phase = GamePhase::Playing;
    state.emit(GameEvent::RunStarted);
}

/// Move every projectile, resolve at most one hit each, then compact the list
fn update_projectiles(state: &mut GameState) {
    let lifetime = state.tuning.projectile_lifetime_ticks;
    let mut spent = Vec::with_capacity(state.projectiles.len());

    for index in 0..state.projectiles.len() {
        state.projectiles[index].update();
        let hit = resolve_projectile_hit(state, index);
        spent.push(hit || state.projectiles[index].expired(lifetime));
    }

    let mut spent = spent.into_iter();
    state.projectiles.retain(|_| !spent.next().unwrap_or(false));
}

/// Apply the projectile at `index` to the boss first, otherwise the first
/// enemy it overlaps. Returns true if it struck something.
fn resolve_projectile_hit(state: &mut GameState, index: usize) -> bool {
    let shot = state.projectiles[index].body.clone();

    if let Some(boss) = state.boss.as_mut()
        && overlaps(&shot, &boss.body)
    {
        boss.on_hit(shot.damage);
        let killed = boss.is_dead();
        state.emit(GameEvent::BossHit);
        if killed {
            defeat_boss(state);
        }
        return true;
    }

    let Some(enemy_index) = state
        .enemies
        .iter()
        .position(|enemy| overlaps(&shot, &enemy.body))
    else {
        return false;
    };

    state.enemies[enemy_index].on_hit(shot.damage);
    if state.enemies[enemy_index].is_dead() {
        let pos = state.random_open_position();
        state.enemies[enemy_index].respawn(pos);
        state.score += state.tuning.enemy_kill_score;
        state.emit(GameEvent::EnemyDeath);
    } else {
        state.emit(GameEvent::EnemyHit);
    }
    true
}

fn defeat_boss(state: &mut GameState) {
    state.boss = None;
    state.boss_defeated = true;
    state.score += state.tuning.boss_bonus_score;
    state.phase = GamePhase::Win;
    state.emit(GameEvent::BossDeath);
    state.emit(GameEvent::Victory);
    log::info!("Boss defeated, final score {}", state.score);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use glam::IVec2;

    use super::*;
    use crate::sim::entity::Facing;
    use crate::sim::state::{Enemy, Projectile};
    use crate::sim::tiles::{TileGrid, default_palette};
    use crate::tuning::Tuning;

    fn open_state() -> GameState {
        let grid = TileGrid::from_codes(50, 50, 48, vec![4; 2500], default_palette()).unwrap();
        let mut state = GameState::new(Arc::new(grid), Tuning::default(), 12345);
        state.enemies.clear();
        state.phase = GamePhase::Playing;
        state
    }

    fn fire() -> TickInput {
        TickInput {
            fire: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_title_to_playing() {
        let mut state = open_state();
        state.phase = GamePhase::Title;
        let start = state.player.body.pos;

        let right = TickInput {
            right: true,
            ..Default::default()
        };
        tick(&mut state, &right);
        assert_eq!(state.phase, GamePhase::Title);
        assert_eq!(state.player.body.pos, start);

        tick(&mut state, &fire());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.drain_events(), vec![GameEvent::RunStarted]);
        // The starting press does not fire a shot
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_game_over_stops_tick() {
        let mut state = open_state();
        state.player.body.health.set(0);
        state.enemies.push(Enemy::new(IVec2::ZERO, &state.tuning));
        let enemy_pos = state.enemies[0].body.pos;

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.enemies[0].body.pos, enemy_pos);
        assert_eq!(state.drain_events(), vec![GameEvent::GameOver]);

        tick(&mut state, &fire());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.drain_events(), vec![GameEvent::RunStarted]);
    }

    #[test]
    fn test_contact_kill_detected_next_tick() {
        let mut state = open_state();
        state.player.body.health.set(1);
        let pos = state.player.body.pos;
        state.enemies.push(Enemy::new(pos, &state.tuning));

        // Contact lands after this tick's death check
        tick(&mut state, &TickInput::default());
        assert_eq!(state.player.body.health.current(), 0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.drain_events(), vec![GameEvent::PlayerHit]);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.drain_events(), vec![GameEvent::GameOver]);
    }

    #[test]
    fn test_contact_damage_respects_invincibility() {
        let mut state = open_state();
        let pos = state.player.body.pos;
        // Two enemies sitting on the player
        state.enemies.push(Enemy::new(pos, &state.tuning));
        state.enemies.push(Enemy::new(pos, &state.tuning));

        tick(&mut state, &TickInput::default());
        assert_eq!(state.player.body.health.current(), 9);
        assert_eq!(state.drain_events(), vec![GameEvent::PlayerHit]);
    }

    #[test]
    fn test_projectile_hits_only_first_enemy() {
        let mut state = open_state();
        let pos = IVec2::new(480, 480);
        state.enemies.push(Enemy::new(pos, &state.tuning));
        state.enemies.push(Enemy::new(pos, &state.tuning));
        let shot = Projectile::new(pos - IVec2::new(7, 0), Some(Facing::Right), &state.tuning);
        state.projectiles.push(shot);

        tick(&mut state, &TickInput::default());
        let healths: Vec<i32> = state
            .enemies
            .iter()
            .map(|e| e.body.health.current())
            .collect();
        assert_eq!(healths, vec![3, 4]);
        assert!(state.projectiles.is_empty());
        assert!(state.drain_events().contains(&GameEvent::EnemyHit));
    }

    #[test]
    fn test_boss_shields_enemies() {
        let mut state = open_state();
        state.boss = Some(Boss::new(&state.tuning));
        let boss_pos = state.boss.as_ref().unwrap().body.pos;
        let spot = boss_pos + IVec2::splat(40);
        state.enemies.push(Enemy::new(spot, &state.tuning));
        state.projectiles.push(Projectile::new(spot, None, &state.tuning));

        tick(&mut state, &TickInput::default());
        let boss = state.boss.as_ref().unwrap();
        assert_eq!(boss.body.health.current(), 79);
        assert_eq!(state.enemies[0].body.health.current(), 4);
    }

    #[test]
    fn test_boss_spawns_once_at_threshold() {
        let mut state = open_state();
        state.score = 99;
        tick(&mut state, &TickInput::default());
        assert!(state.boss.is_none());

        state.score = 100;
        tick(&mut state, &TickInput::default());
        assert!(state.boss_active());
        assert!(state.drain_events().contains(&GameEvent::BossSpawned));

        state.boss = None;
        state.boss_defeated = true;
        tick(&mut state, &TickInput::default());
        assert!(state.boss.is_none());
    }

    #[test]
    fn test_win_restart_is_configurable() {
        let mut state = open_state();
        state.phase = GamePhase::Win;
        state.score = 600;
        state.tuning.restart_after_win = false;
        tick(&mut state, &fire());
        assert_eq!(state.phase, GamePhase::Win);
        assert!(state.drain_events().is_empty());

        state.tuning.restart_after_win = true;
        tick(&mut state, &fire());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.drain_events(), vec![GameEvent::RunStarted]);
    }

    #[test]
    fn test_determinism() {
        let grid = Arc::new(
            TileGrid::from_codes(50, 50, 48, vec![4; 2500], default_palette()).unwrap(),
        );
        let mut state1 = GameState::new(grid.clone(), Tuning::default(), 99999);
        let mut state2 = GameState::new(grid, Tuning::default(), 99999);

        let inputs = [
            fire(),
            TickInput {
                up: true,
                fire: true,
                ..Default::default()
            },
            TickInput {
                left: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for _ in 0..50 {
            for input in &inputs {
                tick(&mut state1, input);
                tick(&mut state2, input);
            }
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.player.body.pos, state2.player.body.pos);
        let pos1: Vec<IVec2> = state1.enemies.iter().map(|e| e.body.pos).collect();
        let pos2: Vec<IVec2> = state2.enemies.iter().map(|e| e.body.pos).collect();
        assert_eq!(pos1, pos2);
    }
}
