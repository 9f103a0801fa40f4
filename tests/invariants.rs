//! Randomized checks of the simulation invariants

use std::sync::Arc;

use glam::IVec2;
use proptest::prelude::*;

use tile_siege::Tuning;
use tile_siege::sim::{
    Body, Enemy, Facing, GameEvent, GamePhase, GameState, Health, Hitbox, Projectile, TickInput,
    TileGrid, tick, tile_collision,
};

const WORLD: &str = include_str!("../assets/maps/world01.txt");

fn world() -> Arc<TileGrid> {
    let tuning = Tuning::default();
    Arc::new(
        TileGrid::parse(
            WORLD,
            tuning.world_rows,
            tuning.world_cols,
            tuning.tile_size,
            tuning.palette,
        )
        .unwrap(),
    )
}

fn input_strategy() -> impl Strategy<Value = TickInput> {
    any::<(bool, bool, bool, bool, bool)>().prop_map(|(up, down, left, right, fire)| TickInput {
        up,
        down,
        left,
        right,
        fire,
    })
}

fn facing_strategy() -> impl Strategy<Value = Facing> {
    prop_oneof![
        Just(Facing::Up),
        Just(Facing::Down),
        Just(Facing::Left),
        Just(Facing::Right),
    ]
}

fn is_hit(event: &GameEvent) -> bool {
    matches!(event, GameEvent::EnemyHit | GameEvent::EnemyDeath | GameEvent::BossHit)
}

fn health_in_bounds(health: &Health) -> bool {
    (0..=health.max()).contains(&health.current())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn health_stays_in_bounds(
        seed in any::<u64>(),
        inputs in prop::collection::vec(input_strategy(), 1..400),
    ) {
        let mut state = GameState::new(world(), Tuning::default(), seed);
        state.phase = GamePhase::Playing;
        // Reach the boss quickly
        state.tuning.boss_score_threshold = 20;

        for input in &inputs {
            tick(&mut state, input);
            prop_assert!(health_in_bounds(&state.player.body.health));
            for enemy in &state.enemies {
                prop_assert!(health_in_bounds(&enemy.body.health));
            }
            if let Some(boss) = &state.boss {
                prop_assert!(health_in_bounds(&boss.body.health));
            }
        }
    }

    #[test]
    fn hits_never_exceed_projectiles(
        seed in any::<u64>(),
        inputs in prop::collection::vec(input_strategy(), 1..400),
    ) {
        let mut state = GameState::new(world(), Tuning::default(), seed);
        state.phase = GamePhase::Playing;

        for input in &inputs {
            // At most one new shot joins this tick
            let shots = state.projectiles.len() + 1;
            tick(&mut state, input);
            let hits = state.drain_events().into_iter().filter(is_hit).count();
            prop_assert!(hits <= shots, "{} hits from {} shots", hits, shots);
        }
    }

    #[test]
    fn stacked_enemies_take_one_hit(count in 2usize..8, offset in (-20i32..20, -20i32..20)) {
        let mut state = GameState::new(world(), Tuning::default(), 3);
        state.phase = GamePhase::Playing;
        state.enemies.clear();
        let spot = IVec2::new(25, 22) * 48;
        for _ in 0..count {
            state.enemies.push(Enemy::new(spot + IVec2::new(offset.0, offset.1), &state.tuning));
        }
        state.projectiles.push(Projectile::new(spot, None, &state.tuning));

        tick(&mut state, &TickInput::default());

        let damaged = state
            .enemies
            .iter()
            .filter(|e| e.body.health.current() < e.body.health.max())
            .count();
        prop_assert_eq!(damaged, 1);
        prop_assert!(state.projectiles.is_empty());
    }

    #[test]
    fn tile_collision_is_idempotent(
        x in -100i32..2500,
        y in -100i32..2500,
        speed in 1i32..10,
        facing in facing_strategy(),
        hitbox in 8i32..=48,
    ) {
        let grid = world();
        let mut body = Body::new(IVec2::new(x, y), speed, 1, 0, Hitbox::centered(48, hitbox), 10);
        body.facing = facing;
        let before = body.clone();

        let first = tile_collision(&body, &grid);
        let second = tile_collision(&body, &grid);
        prop_assert_eq!(first, second);
        prop_assert_eq!(body, before);
    }
}
