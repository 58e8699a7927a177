use std::fs;

use zombie_shooter::config::*;
use zombie_shooter::error::ConfigError;

#[test]
fn defaults_are_valid() {
    let c = GameConfig::default();
    assert!(c.validate().is_ok());
    assert_eq!(c.difficulty, Difficulty::Medium);
    assert_eq!(c.starting_lives, 3);
    assert_eq!(c.max_lives, 5);
    assert_eq!(c.mega_boss.required_hits, 20);
    assert_eq!(c.mini_boss.hp, 3);
}

#[test]
fn difficulty_presets() {
    let easy = GameConfig::for_difficulty(Difficulty::Easy);
    let hard = GameConfig::for_difficulty(Difficulty::Hard);
    assert_eq!(easy.difficulty, Difficulty::Easy);
    assert!(easy.base_zombie_speed < hard.base_zombie_speed);
    assert!(easy.base_spawn_delay_ms > hard.base_spawn_delay_ms);
    assert!(easy.base_quota < hard.base_quota);
    assert!(easy.validate().is_ok());
    assert!(hard.validate().is_ok());
    assert_eq!(GameConfig::for_difficulty(Difficulty::Medium), GameConfig::default());
}

#[test]
fn presets_scale_from_the_loaded_difficulty() {
    let tuned = GameConfig {
        base_zombie_speed: 10.0,
        base_spawn_delay_ms: 2_000,
        base_quota: 7,
        ..GameConfig::default()
    };

    // Same difficulty leaves a tuning file untouched.
    let same = tuned.tuned_for(Difficulty::Medium).unwrap();
    assert_eq!(same, tuned);

    let hard = tuned.tuned_for(Difficulty::Hard).unwrap();
    assert_eq!(hard.difficulty, Difficulty::Hard);
    assert_eq!(hard.base_spawn_delay_ms, 1_500);
    assert_eq!(hard.base_quota, 12);
    assert!(hard.base_zombie_speed > 13.0 && hard.base_zombie_speed < 13.5);

    // Back to the file's own difficulty restores its numbers.
    let back = hard.tuned_for(Difficulty::Medium).unwrap();
    assert_eq!(back.base_spawn_delay_ms, 2_000);
    assert_eq!(back.base_quota, 7);
    assert!((back.base_zombie_speed - 10.0).abs() < 1e-4);
}

#[test]
fn file_difficulty_is_the_tuning_baseline() {
    let easy_file = GameConfig {
        difficulty: Difficulty::Easy,
        base_quota: 3,
        base_spawn_delay_ms: 1_000,
        min_spawn_delay_ms: 100,
        ..GameConfig::default()
    };
    let easy = easy_file.tuned_for(Difficulty::Easy).unwrap();
    assert_eq!(easy.base_quota, 3);
    assert_eq!(easy.base_spawn_delay_ms, 1_000);

    let medium = easy_file.tuned_for(Difficulty::Medium).unwrap();
    assert_eq!(medium.base_quota, 8);
    assert_eq!(medium.base_spawn_delay_ms, 800);
}

#[test]
fn harder_preset_respects_the_spawn_delay_floor() {
    let config = GameConfig {
        base_spawn_delay_ms: 1_200,
        min_spawn_delay_ms: 1_000,
        ..GameConfig::default()
    };
    let hard = config.tuned_for(Difficulty::Hard).unwrap();
    assert_eq!(hard.base_spawn_delay_ms, 1_000);
    assert!(hard.validate().is_ok());
}

#[test]
fn validate_rejects_nonsense() {
    let cases: Vec<(&str, GameConfig)> = vec![
        (
            "bullet_capacity",
            GameConfig {
                bullet_capacity: 0,
                ..GameConfig::default()
            },
        ),
        (
            "starting_lives",
            GameConfig {
                starting_lives: 6,
                ..GameConfig::default()
            },
        ),
        (
            "min_spawn_delay_ms",
            GameConfig {
                min_spawn_delay_ms: 5_000,
                ..GameConfig::default()
            },
        ),
        ("mega_boss.required_hits", {
            let mut c = GameConfig::default();
            c.mega_boss.required_hits = 0;
            c
        }),
        (
            "max_lives",
            GameConfig {
                max_lives: 9,
                starting_lives: 9,
                ..GameConfig::default()
            },
        ),
        (
            "max_lives",
            GameConfig {
                max_lives: 0,
                ..GameConfig::default()
            },
        ),
        ("mega_boss.shield_ms", {
            let mut c = GameConfig::default();
            c.mega_boss.shield_ms = 0;
            c.mega_boss.vulnerable_ms = 0;
            c
        }),
        ("mega_boss.vulnerable_ms", {
            let mut c = GameConfig::default();
            c.mega_boss.vulnerable_ms = 0;
            c
        }),
        ("mini_boss.level_modulus", {
            let mut c = GameConfig::default();
            c.mini_boss.level_modulus = 0;
            c
        }),
    ];

    for (expected, config) in cases {
        match config.validate() {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected),
            other => panic!("{expected}: expected Invalid, got {other:?}"),
        }
    }
}

#[test]
fn load_fills_missing_fields_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("game.json");
    fs::write(
        &path,
        r#"{ "difficulty": "hard", "starting_lives": 5, "mega_boss": { "required_hits": 8 } }"#,
    )
    .unwrap();

    let c = GameConfig::load(&path).unwrap();
    assert_eq!(c.difficulty, Difficulty::Hard);
    assert_eq!(c.starting_lives, 5);
    assert_eq!(c.mega_boss.required_hits, 8);
    assert_eq!(c.mega_boss.shield_ms, 5_000);
    assert_eq!(c.world_width, 800.0);
}

#[test]
fn load_reports_each_failure_kind() {
    let dir = tempfile::tempdir().unwrap();

    let missing = dir.path().join("nope.json");
    assert!(matches!(
        GameConfig::load(&missing),
        Err(ConfigError::Read { .. })
    ));

    let garbled = dir.path().join("garbled.json");
    fs::write(&garbled, "world_width = 3").unwrap();
    assert!(matches!(
        GameConfig::load(&garbled),
        Err(ConfigError::Parse { .. })
    ));

    let invalid = dir.path().join("invalid.json");
    fs::write(&invalid, r#"{ "enemy_capacity": 0 }"#).unwrap();
    assert!(matches!(
        GameConfig::load(&invalid),
        Err(ConfigError::Invalid { field: "enemy_capacity", .. })
    ));
}

#[test]
fn config_serialises_round_trip() {
    let c = GameConfig::for_difficulty(Difficulty::Easy);
    let json = serde_json::to_string(&c).unwrap();
    let back: GameConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, c);
}
