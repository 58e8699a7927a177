use zombie_shooter::compute::init_state;
use zombie_shooter::config::GameConfig;
use zombie_shooter::entities::*;
use zombie_shooter::events::GameEvent;
use zombie_shooter::progression::*;
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

// ── Curve ────────────────────────────────────────────────────────────────────

#[test]
fn quota_and_speed_grow_each_level() {
    let c = GameConfig::default();
    assert_eq!(quota_for_level(&c, 1), 20);
    assert_eq!(quota_for_level(&c, 2), 25);
    assert_eq!(zombie_speed_for_level(&c, 1), 72.0);
    assert_eq!(zombie_speed_for_level(&c, 3), 120.0);
}

#[test]
fn spawn_delay_shrinks_to_a_floor() {
    let c = GameConfig::default();
    assert_eq!(spawn_delay_for_level(&c, 1), 1_200);
    assert_eq!(spawn_delay_for_level(&c, 2), 1_100);
    assert_eq!(spawn_delay_for_level(&c, 9), 400);
    assert_eq!(spawn_delay_for_level(&c, 500), 400);
}

#[test]
fn boss_levels() {
    let c = GameConfig::default();
    assert!(is_mini_boss_level(&c, 5));
    assert!(is_mini_boss_level(&c, 15));
    assert!(!is_mini_boss_level(&c, 10));
    assert!(is_mega_boss_level(&c, 10));
    assert!(!is_mega_boss_level(&c, 5));
}

#[test]
fn backgrounds_cycle() {
    assert_eq!(background_key(1), "bg_street");
    assert_eq!(background_key(11), "bg_street");
    assert_ne!(background_key(2), background_key(1));
}

// ── Advancing ────────────────────────────────────────────────────────────────

#[test]
fn level_one_to_two() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    for _ in 0..20 {
        spawner::try_spawn_enemy(&mut s, &mut rng);
    }
    assert!(!can_advance(&s), "zombies still on the field");

    s.enemies.clear();
    s.now_ms = 50_000;
    assert!(check_advance(&mut s, &mut rng));

    assert_eq!(s.level, 2);
    assert_eq!(s.kills_to_advance, 25);
    assert_eq!(s.spawned_this_level, 0);
    assert_eq!(s.kills_this_level, 0);
    assert_eq!(s.zombie_speed, 96.0);
    assert_eq!(s.next_spawn_at_ms, 50_000 + 1_100);
    assert!(s.events.contains(&GameEvent::LevelUp {
        level: 2,
        background: "bg_park"
    }));
}

#[test]
fn no_advance_before_quota_is_spawned() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    s.spawned_this_level = 19;
    assert!(!check_advance(&mut s, &mut rng));
    assert_eq!(s.level, 1);
}

#[test]
fn live_mini_boss_blocks_advance() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    s.spawned_this_level = s.kills_to_advance;
    spawner::try_spawn_mini_boss(&mut s, &mut rng);
    assert!(!can_advance(&s));
}

#[test]
fn level_five_schedules_mini_bosses() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    s.level = 4;
    s.spawned_this_level = s.kills_to_advance;
    assert!(check_advance(&mut s, &mut rng));

    assert_eq!(s.level, 5);
    assert!(!s.boss_active);
    assert_eq!(s.scheduler.len(), 3);
    assert!(s
        .scheduler
        .pending()
        .all(|e| *e == TimedEvent::MiniBossSpawn { level: 5 }));
}

// ── Score, combo and lives ───────────────────────────────────────────────────

#[test]
fn extra_life_every_thousand_points() {
    let mut s = make_state();
    add_score(&mut s, 990);
    assert_eq!(s.player.lives, 3);
    add_score(&mut s, 10);
    assert_eq!(s.player.lives, 4);
    assert_eq!(s.next_extra_life_score, 2_000);
    assert!(s.events.contains(&GameEvent::ExtraLife { lives: 4 }));

    // Crossing several thresholds at once still caps at five.
    add_score(&mut s, 5_000);
    assert_eq!(s.player.lives, 5);
    assert_eq!(s.next_extra_life_score, 7_000);
}

#[test]
fn score_saturates_instead_of_wrapping() {
    let mut s = make_state();
    s.score = u32::MAX - 5;
    add_score(&mut s, 100);
    assert_eq!(s.score, u32::MAX);
}

#[test]
fn combo_bonus_on_every_tenth_quick_kill() {
    let mut s = make_state();
    for i in 0..10 {
        s.now_ms = 1_000 + i * 100;
        award_kill(&mut s, EnemyKind::Zombie, 10);
    }
    assert_eq!(s.combo.chain, 10);
    assert_eq!(s.score, 100 + 25);
    assert!(s
        .events
        .contains(&GameEvent::ComboBonus { chain: 10, points: 25 }));
    assert_eq!(s.total_kills, 10);
}

#[test]
fn slow_kills_break_the_chain() {
    let mut s = make_state();
    s.now_ms = 1_000;
    award_kill(&mut s, EnemyKind::Zombie, 10);
    s.now_ms = 1_500;
    award_kill(&mut s, EnemyKind::Zombie, 10);
    assert_eq!(s.combo.chain, 2);

    s.now_ms = 5_000;
    decay_combo(&mut s);
    assert_eq!(s.combo.chain, 0);
    assert_eq!(s.combo.best, 2);

    award_kill(&mut s, EnemyKind::Zombie, 10);
    assert_eq!(s.combo.chain, 1);
}

#[test]
fn lives_never_underflow() {
    let mut s = make_state();
    lose_life(&mut s);
    lose_life(&mut s);
    assert_eq!(s.player.lives, 1);
    assert!(!s.is_over());

    lose_life(&mut s);
    assert_eq!(s.player.lives, 0);
    assert!(s.is_over());
    assert!(s.events.contains(&GameEvent::GameOver { score: 0 }));

    lose_life(&mut s);
    assert_eq!(s.player.lives, 0);
}

#[test]
fn game_over_freezes_advancement() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    s.spawned_this_level = s.kills_to_advance;
    game_over(&mut s);
    assert!(!check_advance(&mut s, &mut rng));
    assert!(spawner::try_spawn_enemy(&mut s, &mut rng).is_none());
}
