use zombie_shooter::compute::init_state;
use zombie_shooter::config::{EnemyMovement, GameConfig};
use zombie_shooter::entities::*;
use zombie_shooter::schedule::TimedEvent;
use zombie_shooter::spawner;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn make_state() -> GameState {
    init_state(GameConfig::default())
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

// ── Zombies ───────────────────────────────────────────────────────────────────

#[test]
fn zombie_spawns_above_the_top_edge() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    let h = spawner::try_spawn_enemy(&mut s, &mut rng).unwrap();
    let z = s.enemies.get(h).unwrap();

    assert_eq!(z.kind, EnemyKind::Zombie);
    assert_eq!(z.hp, 1);
    assert_eq!(z.y, -45.0);
    assert!(z.x >= 0.0 && z.x <= 800.0 - 45.0);
    assert_eq!((z.vx, z.vy), (0.0, 72.0));
    assert_eq!(s.spawned_this_level, 1);
}

#[test]
fn spawning_stops_at_the_quota() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    for _ in 0..20 {
        assert!(spawner::try_spawn_enemy(&mut s, &mut rng).is_some());
    }
    assert!(spawner::try_spawn_enemy(&mut s, &mut rng).is_none());
    assert_eq!(s.spawned_this_level, 20);
    assert_eq!(s.enemies.active_count(), 20);
}

#[test]
fn full_pool_does_not_consume_quota() {
    let mut s = init_state(GameConfig {
        enemy_capacity: 2,
        ..GameConfig::default()
    });
    let mut rng = seeded_rng();
    spawner::try_spawn_enemy(&mut s, &mut rng);
    spawner::try_spawn_enemy(&mut s, &mut rng);
    assert!(spawner::try_spawn_enemy(&mut s, &mut rng).is_none());
    assert_eq!(s.spawned_this_level, 2);
}

#[test]
fn no_spawns_while_paused_or_during_boss() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    s.paused = true;
    assert!(spawner::try_spawn_enemy(&mut s, &mut rng).is_none());
    s.paused = false;
    s.boss_active = true;
    assert!(spawner::try_spawn_enemy(&mut s, &mut rng).is_none());
    assert!(spawner::try_spawn_mini_boss(&mut s, &mut rng).is_none());
    assert_eq!(s.spawned_this_level, 0);
}

#[test]
fn pursuit_zombies_head_for_the_player() {
    let mut s = init_state(GameConfig {
        enemy_movement: EnemyMovement::Pursuit,
        ..GameConfig::default()
    });
    let mut rng = seeded_rng();
    let h = spawner::try_spawn_enemy(&mut s, &mut rng).unwrap();
    let z = s.enemies.get(h).unwrap().clone();

    let speed = (z.vx * z.vx + z.vy * z.vy).sqrt();
    assert!((speed - 72.0).abs() < 1e-3);

    let (zx, zy) = z.rect().center();
    let (px, py) = s.player.rect().center();
    // Velocity is parallel to the line to the player.
    let cross = z.vx * (py - zy) - z.vy * (px - zx);
    assert!(cross.abs() < 0.5);
    assert!(z.vy > 0.0);
}

#[test]
fn aim_on_top_of_target_goes_straight_down() {
    assert_eq!(spawner::aim((5.0, 5.0), (5.0, 5.0), 10.0), (0.0, 10.0));
    let (vx, vy) = spawner::aim((0.0, 0.0), (3.0, 4.0), 10.0);
    assert!((vx - 6.0).abs() < 1e-5 && (vy - 8.0).abs() < 1e-5);
}

// ── Mini-bosses ───────────────────────────────────────────────────────────────

#[test]
fn mini_boss_is_tough_slow_and_outside_the_quota() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    let h = spawner::try_spawn_mini_boss(&mut s, &mut rng).unwrap();
    let m = s.enemies.get(h).unwrap();

    assert_eq!(m.kind, EnemyKind::MiniBoss);
    assert_eq!(m.hp, 3);
    assert_eq!(m.vy, 36.0);
    assert_eq!(s.spawned_this_level, 0);
}

#[test]
fn mini_boss_arrivals_are_scheduled_with_jitter() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    s.level = 5;
    s.now_ms = 1_000;
    spawner::schedule_mini_bosses(&mut s, &mut rng);

    assert_eq!(s.scheduler.len(), 3);
    assert!(s
        .scheduler
        .pending()
        .all(|e| *e == TimedEvent::MiniBossSpawn { level: 5 }));
    let first = s.scheduler.next_due().unwrap();
    assert!((3_000..=16_000).contains(&first));
}

#[test]
fn mini_boss_callback_from_an_old_level_is_dropped() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    s.level = 6;
    spawner::run_timed(&mut s, TimedEvent::MiniBossSpawn { level: 5 }, &mut rng);
    assert!(s.enemies.is_empty());

    spawner::run_timed(&mut s, TimedEvent::MiniBossSpawn { level: 6 }, &mut rng);
    assert_eq!(s.enemies.active_count(), 1);
}

// ── Power-ups ────────────────────────────────────────────────────────────────

#[test]
fn power_up_lands_inside_the_margin() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    s.now_ms = 500;
    for _ in 0..4 {
        let h = spawner::try_spawn_power_up(&mut s, &mut rng).unwrap();
        let item = s.items.get(h).unwrap();
        assert!(item.x >= 60.0 && item.x + item.size <= 740.0);
        assert!(item.y >= 60.0 && item.y + item.size <= 540.0);
        assert_eq!(item.expires_at_ms, 10_500);
    }
    // Item pool holds four.
    assert!(spawner::try_spawn_power_up(&mut s, &mut rng).is_none());
}

#[test]
fn update_runs_due_timers_and_rearms_them() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    s.now_ms = 1_200;
    spawner::update(&mut s, &mut rng);
    assert_eq!(s.spawned_this_level, 1);
    assert_eq!(s.next_spawn_at_ms, 2_400);

    s.now_ms = 30_000;
    spawner::update(&mut s, &mut rng);
    assert_eq!(s.items.active_count(), 1);
    assert_eq!(s.next_power_up_at_ms, 60_000);
}
