use zombie_shooter::combat;
use zombie_shooter::compute::*;
use zombie_shooter::config::GameConfig;
use zombie_shooter::entities::*;
use zombie_shooter::events::GameEvent;
use zombie_shooter::input::InputSnapshot;
use zombie_shooter::progression;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const DT: u64 = 33;

fn make_state() -> GameState {
    init_state(GameConfig::default())
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn bullet_velocities(state: &GameState) -> Vec<(f32, f32)> {
    state.bullets.iter().map(|(_, b)| (b.vx, b.vy)).collect()
}

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_player_position() {
    let s = make_state();
    assert_eq!(s.player.x, 375.0); // centred: (800 - 50) / 2
    assert_eq!(s.player.y, 520.0); // 600 - 60 - 20
    assert_eq!(s.player.lives, 3);
    assert_eq!(s.player.speed, s.player.base_speed);
}

#[test]
fn init_state_level_one() {
    let s = make_state();
    assert_eq!(s.level, 1);
    assert_eq!(s.kills_to_advance, 20);
    assert_eq!(s.spawned_this_level, 0);
    assert_eq!(s.score, 0);
    assert_eq!(s.status, GameStatus::Playing);
    assert!(!s.boss_active);
    assert!(s.enemies.is_empty());
    assert!(s.bullets.is_empty());
    assert_eq!(s.bullets.capacity(), 40);
}

// ── move_player ──────────────────────────────────────────────────────────────

#[test]
fn move_player_scales_with_dt() {
    let mut s = make_state();
    move_player(&mut s, (1.0, 0.0), 0.5);
    assert_eq!(s.player.x, 375.0 + 180.0);
}

#[test]
fn move_player_clamps_to_world() {
    let mut s = make_state();
    move_player(&mut s, (-1.0, 0.0), 10.0);
    assert_eq!(s.player.x, 0.0);
    move_player(&mut s, (1.0, 0.0), 10.0);
    assert_eq!(s.player.x, 750.0);
    move_player(&mut s, (0.0, -1.0), 10.0);
    assert_eq!(s.player.y, 0.0);
    move_player(&mut s, (0.0, 1.0), 10.0);
    assert_eq!(s.player.y, 540.0);
}

// ── player_fire ──────────────────────────────────────────────────────────────

#[test]
fn fire_single_bullet_straight_up() {
    let mut s = make_state();
    assert_eq!(player_fire(&mut s), 1);
    assert_eq!(bullet_velocities(&s), vec![(0.0, -520.0)]);
    let (_, b) = s.bullets.iter().next().unwrap();
    assert_eq!(b.owner, ProjectileOwner::Player);
    assert_eq!(b.y, s.player.y - b.height);
    assert!(s.events.contains(&GameEvent::Fired { bullets: 1 }));
}

#[test]
fn triple_fire_spreads_three_bullets() {
    let mut s = make_state();
    combat::apply_power_up(&mut s, PowerUpKind::TripleFire);
    assert_eq!(player_fire(&mut s), 3);
    assert_eq!(
        bullet_velocities(&s),
        vec![(-200.0, -520.0), (0.0, -520.0), (200.0, -520.0)]
    );
}

#[test]
fn fire_is_a_no_op_when_pool_is_full() {
    let mut s = init_state(GameConfig {
        bullet_capacity: 2,
        ..GameConfig::default()
    });
    combat::apply_power_up(&mut s, PowerUpKind::TripleFire);
    assert_eq!(player_fire(&mut s), 0);
    assert!(s.bullets.is_empty());
    assert!(s.events.iter().all(|e| !matches!(e, GameEvent::Fired { .. })));
}

// ── tick ──────────────────────────────────────────────────────────────────────

#[test]
fn tick_advances_clock_and_frame() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    tick(&mut s, &InputSnapshot::idle(), DT, &mut rng);
    tick(&mut s, &InputSnapshot::idle(), DT, &mut rng);
    assert_eq!(s.now_ms, 66);
    assert_eq!(s.frame, 2);
}

#[test]
fn holding_fire_shoots_once_per_press() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    tick(&mut s, &InputSnapshot::firing(), DT, &mut rng);
    tick(&mut s, &InputSnapshot::firing(), DT, &mut rng);
    tick(&mut s, &InputSnapshot::firing(), DT, &mut rng);
    assert_eq!(s.bullets.active_count(), 1);

    tick(&mut s, &InputSnapshot::idle(), DT, &mut rng);
    tick(&mut s, &InputSnapshot::firing(), DT, &mut rng);
    assert_eq!(s.bullets.active_count(), 2);
}

#[test]
fn bullets_leaving_the_top_are_recycled() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    tick(&mut s, &InputSnapshot::firing(), DT, &mut rng);
    assert_eq!(s.bullets.active_count(), 1);
    // 520 px/s clears a 600 px world in well under two seconds.
    for _ in 0..60 {
        tick(&mut s, &InputSnapshot::idle(), DT, &mut rng);
    }
    assert!(s.bullets.is_empty());
}

#[test]
fn pause_freezes_the_clock() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    let pause = InputSnapshot {
        pause: true,
        ..InputSnapshot::default()
    };

    tick(&mut s, &pause, DT, &mut rng);
    assert!(s.paused);
    assert_eq!(s.events, vec![GameEvent::Paused]);
    assert_eq!(s.now_ms, 0);

    // Still held: no second toggle.
    tick(&mut s, &pause, DT, &mut rng);
    tick(&mut s, &InputSnapshot::firing(), DT, &mut rng);
    assert!(s.paused);
    assert_eq!(s.now_ms, 0);
    assert!(s.bullets.is_empty());

    tick(&mut s, &pause, DT, &mut rng);
    assert!(!s.paused);
    assert!(s.events.contains(&GameEvent::Resumed));
    assert_eq!(s.now_ms, DT);
}

#[test]
fn speed_power_up_wears_off() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    combat::apply_power_up(&mut s, PowerUpKind::Speed);
    assert_eq!(s.player.speed, 540.0);

    s.now_ms = 8_000 - DT;
    tick(&mut s, &InputSnapshot::idle(), DT, &mut rng);
    assert!(!s.player.has(PowerUpKind::Speed));
    assert_eq!(s.player.speed, 360.0);
    assert!(s
        .events
        .contains(&GameEvent::PowerUpExpired { kind: PowerUpKind::Speed }));
}

#[test]
fn tick_after_game_over_does_nothing() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    progression::game_over(&mut s);
    let before = s.now_ms;
    tick(&mut s, &InputSnapshot::firing(), DT, &mut rng);
    assert_eq!(s.now_ms, before);
    assert!(s.bullets.is_empty());
    assert!(s.events.is_empty());
}

#[test]
fn restart_rebuilds_a_fresh_run() {
    let mut s = init_state(GameConfig::for_difficulty(zombie_shooter::Difficulty::Hard));
    let mut rng = seeded_rng();
    for _ in 0..100 {
        tick(&mut s, &InputSnapshot::firing(), DT, &mut rng);
    }
    s.score = 340;
    progression::game_over(&mut s);

    restart(&mut s);
    assert_eq!(s.score, 0);
    assert_eq!(s.level, 1);
    assert_eq!(s.now_ms, 0);
    assert_eq!(s.status, GameStatus::Playing);
    assert!(s.enemies.is_empty());
    assert_eq!(s.kills_to_advance, 25); // Hard preset survives the restart
}

#[test]
fn zombies_arrive_on_the_spawn_timer() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    for _ in 0..36 {
        tick(&mut s, &InputSnapshot::idle(), DT, &mut rng);
    }
    // 36 * 33 = 1188 ms, just short of the 1200 ms delay.
    assert_eq!(s.spawned_this_level, 0);
    tick(&mut s, &InputSnapshot::idle(), DT, &mut rng);
    assert_eq!(s.spawned_this_level, 1);
    assert_eq!(s.enemies.active_count(), 1);
}

// ── Invariants over a long random run ────────────────────────────────────────

#[test]
fn random_play_keeps_invariants() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    let mut input_rng = StdRng::seed_from_u64(7);
    let mut last_score = 0;
    let mut last_level = 1;

    for _ in 0..6_000 {
        let input = InputSnapshot {
            up: input_rng.gen_bool(0.1),
            down: input_rng.gen_bool(0.1),
            left: input_rng.gen_bool(0.3),
            right: input_rng.gen_bool(0.3),
            fire: input_rng.gen_bool(0.5),
            pause: false,
        };
        tick(&mut s, &input, DT, &mut rng);

        assert!(s.player.lives <= 5);
        assert!(s.score >= last_score);
        assert!(s.level >= last_level);
        assert!(s.spawned_this_level <= s.kills_to_advance);
        last_score = s.score;
        last_level = s.level;
        if s.is_over() {
            assert_eq!(s.player.lives, 0);
            break;
        }
    }
}
