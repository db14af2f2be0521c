//! Tests for configuration file loading.

use super::*;
use serial_test::serial;
use std::env;
use std::fs;

/// RAII guard to ensure environment variable cleanup even under test parallelism.
struct EnvGuard(&'static str);

impl EnvGuard {
    fn new(name: &'static str) -> Self {
        env::remove_var(name);
        EnvGuard(name)
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        env::remove_var(self.0);
    }
}

#[test]
fn default_config_path_contains_vchat_config_toml() {
    if let Some(path) = default_config_path() {
        let path_str = path.to_string_lossy();
        assert!(
            path_str.contains("vchat") && path_str.ends_with("config.toml"),
            "Path should contain 'vchat' and end with 'config.toml', got: {}",
            path_str
        );
    }
}

#[test]
fn default_log_path_ends_with_vchat_log() {
    let path = default_log_path();
    assert!(
        path.to_string_lossy().ends_with("vchat.log"),
        "Default log path should end with 'vchat.log', got: {:?}",
        path
    );
}

#[test]
fn load_config_file_returns_ok_none_for_missing_file() {
    let result = load_config_file("/nonexistent/path/to/config.toml");
    assert_eq!(
        result,
        Ok(None),
        "Missing config file should return Ok(None), not an error"
    );
}

#[test]
fn load_config_file_parses_valid_toml() {
    let config_path = env::temp_dir().join("vchat_test_config.toml");

    let toml_content = r#"
strategy = "simple"
tick_ms = 30
target_words = 500
seed = 7
overscan = 4
near_bottom_threshold = 2
height_refresh = "structural"
markdown = false
log_file_path = "/tmp/vchat-test.log"

[heights]
base = 1
max = 50
"#;

    fs::write(&config_path, toml_content).expect("Failed to write test config");

    let config = load_config_file(&config_path)
        .expect("Should successfully parse valid TOML")
        .expect("Should return Some(ConfigFile) for existing file");

    assert_eq!(config.strategy, Some(ListStrategy::Simple));
    assert_eq!(config.tick_ms, Some(30));
    assert_eq!(config.target_words, Some(500));
    assert_eq!(config.seed, Some(7));
    assert_eq!(config.overscan, Some(4));
    assert_eq!(config.near_bottom_threshold, Some(2));
    assert_eq!(config.height_refresh, Some(HeightRefresh::Structural));
    assert_eq!(config.markdown, Some(false));
    assert_eq!(config.log_file_path, Some(PathBuf::from("/tmp/vchat-test.log")));
    assert_eq!(
        config.heights,
        Some(HeightsSection {
            base: Some(1),
            max: Some(50),
            ..HeightsSection::default()
        })
    );

    fs::remove_file(config_path).ok();
}

#[test]
fn load_config_file_returns_error_for_invalid_toml() {
    let config_path = env::temp_dir().join("vchat_test_invalid.toml");

    fs::write(&config_path, "this is not valid TOML ][}{").expect("Failed to write test config");

    let result = load_config_file(&config_path);
    match result {
        Err(ConfigError::ParseError { path, reason: _ }) => {
            assert_eq!(path, config_path);
        }
        _ => panic!("Expected ParseError, got {:?}", result),
    }

    fs::remove_file(config_path).ok();
}

#[test]
fn config_file_rejects_unknown_fields() {
    let result: Result<ConfigFile, _> = toml::from_str("theme = \"dark\"");
    assert!(result.is_err(), "Unknown field should be rejected");

    let result: Result<ConfigFile, _> = toml::from_str("[heights]\nwidth = 3");
    assert!(result.is_err(), "Unknown heights field should be rejected");
}

#[test]
fn config_file_rejects_unknown_strategy() {
    let result: Result<ConfigFile, _> = toml::from_str("strategy = \"fancy\"");
    assert!(result.is_err());
}

#[test]
fn merge_config_uses_defaults_when_none() {
    assert_eq!(merge_config(None), ResolvedConfig::default());
}

#[test]
fn merge_config_uses_defaults_for_none_fields() {
    let resolved = merge_config(Some(ConfigFile {
        overscan: Some(5),
        ..ConfigFile::default()
    }));
    let defaults = ResolvedConfig::default();

    assert_eq!(resolved.overscan, 5);
    assert_eq!(resolved.strategy, defaults.strategy);
    assert_eq!(resolved.tick_ms, defaults.tick_ms);
    assert_eq!(resolved.heights, defaults.heights);
    assert_eq!(resolved.log_file_path, defaults.log_file_path);
}

#[test]
fn merge_config_fills_partial_heights_table() {
    let resolved = merge_config(Some(ConfigFile {
        heights: Some(HeightsSection {
            per_line: Some(2),
            ..HeightsSection::default()
        }),
        ..ConfigFile::default()
    }));
    let defaults = HeightParams::default();
    assert_eq!(resolved.heights.per_line, 2);
    assert_eq!(resolved.heights.base, defaults.base);
    assert_eq!(resolved.heights.max, defaults.max);
}

#[test]
fn merge_config_repairs_inverted_height_bounds() {
    let resolved = merge_config(Some(ConfigFile {
        heights: Some(HeightsSection {
            min: Some(10),
            max: Some(4),
            ..HeightsSection::default()
        }),
        ..ConfigFile::default()
    }));
    assert_eq!(resolved.heights.min, 10);
    assert_eq!(resolved.heights.max, 10);
}

#[test]
fn resolved_config_default_has_expected_values() {
    let config = ResolvedConfig::default();
    assert_eq!(config.strategy, ListStrategy::Virtualized);
    assert_eq!(config.tick_ms, 15);
    assert_eq!(config.target_words, 10_000);
    assert_eq!(config.overscan, 2);
    assert_eq!(config.height_refresh, HeightRefresh::StreamingRow);
    assert!(config.markdown);
    assert_eq!(config.seed, None);
}

#[test]
fn chat_settings_carry_resolved_values() {
    let config = ResolvedConfig {
        tick_ms: 40,
        seed: Some(3),
        ..ResolvedConfig::default()
    };
    let settings = config.chat_settings();
    assert_eq!(settings.tick, Duration::from_millis(40));
    assert_eq!(settings.seed, Some(3));
}

#[test]
#[serial(vchat_env)]
fn apply_env_overrides_respects_vchat_strategy_and_tick() {
    let _strategy = EnvGuard::new(ENV_STRATEGY);
    let _tick = EnvGuard::new(ENV_TICK_MS);

    env::set_var(ENV_STRATEGY, "simple");
    env::set_var(ENV_TICK_MS, " 25 ");

    let result = apply_env_overrides(ResolvedConfig::default()).unwrap();
    assert_eq!(result.strategy, ListStrategy::Simple);
    assert_eq!(result.tick_ms, 25);
}

#[test]
#[serial(vchat_env)]
fn apply_env_overrides_no_change_when_env_var_not_set() {
    let _strategy = EnvGuard::new(ENV_STRATEGY);
    let _tick = EnvGuard::new(ENV_TICK_MS);

    let base = ResolvedConfig::default();
    assert_eq!(apply_env_overrides(base.clone()), Ok(base));
}

#[test]
#[serial(vchat_env)]
fn apply_env_overrides_rejects_garbage() {
    let _strategy = EnvGuard::new(ENV_STRATEGY);
    let _tick = EnvGuard::new(ENV_TICK_MS);

    env::set_var(ENV_TICK_MS, "fast");
    let err = apply_env_overrides(ResolvedConfig::default()).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvValue { var: ENV_TICK_MS, .. }));
    assert!(err.to_string().contains("fast"));
}

#[test]
#[serial(vchat_env)]
fn load_config_with_precedence_prefers_explicit_path() {
    let _config = EnvGuard::new(ENV_CONFIG);
    let temp_dir = env::temp_dir();

    let explicit_path = temp_dir.join("vchat_explicit.toml");
    fs::write(&explicit_path, "overscan = 9").expect("Failed to write explicit config");

    let env_path = temp_dir.join("vchat_env.toml");
    fs::write(&env_path, "overscan = 1").expect("Failed to write env config");
    env::set_var(ENV_CONFIG, &env_path);

    let config = load_config_with_precedence(Some(explicit_path.clone()))
        .unwrap()
        .unwrap();
    assert_eq!(config.overscan, Some(9), "Should use explicit path, not VCHAT_CONFIG");

    fs::remove_file(explicit_path).ok();
    fs::remove_file(env_path).ok();
}

#[test]
#[serial(vchat_env)]
fn load_config_with_precedence_uses_env_var_when_no_explicit_path() {
    let _config = EnvGuard::new(ENV_CONFIG);

    let env_path = env::temp_dir().join("vchat_env_only.toml");
    fs::write(&env_path, "overscan = 6").expect("Failed to write env config");
    env::set_var(ENV_CONFIG, &env_path);

    let config = load_config_with_precedence(None).unwrap().unwrap();
    assert_eq!(config.overscan, Some(6));

    fs::remove_file(env_path).ok();
}

#[test]
fn apply_cli_overrides_no_overrides() {
    let base = ResolvedConfig::default();
    assert_eq!(apply_cli_overrides(base.clone(), CliOverrides::default()), base);
}

#[test]
fn apply_cli_overrides_multiple_overrides() {
    let base = ResolvedConfig {
        strategy: ListStrategy::Simple,
        ..ResolvedConfig::default()
    };
    let result = apply_cli_overrides(
        base,
        CliOverrides {
            strategy: Some(ListStrategy::Virtualized),
            tick_ms: Some(5),
            target_words: Some(100),
            seed: Some(1),
            plain: true,
        },
    );
    assert_eq!(result.strategy, ListStrategy::Virtualized);
    assert_eq!(result.tick_ms, 5);
    assert_eq!(result.target_words, 100);
    assert_eq!(result.seed, Some(1));
    assert!(!result.markdown);
}

#[test]
#[serial(vchat_env)]
fn precedence_chain_cli_beats_env_beats_file() {
    let _strategy = EnvGuard::new(ENV_STRATEGY);
    let _tick = EnvGuard::new(ENV_TICK_MS);
    let _config = EnvGuard::new(ENV_CONFIG);

    let path = env::temp_dir().join("vchat_chain.toml");
    fs::write(&path, "tick_ms = 50\nstrategy = \"simple\"\noverscan = 3").expect("write");
    env::set_var(ENV_TICK_MS, "40");

    let resolved = resolve(
        Some(path.clone()),
        CliOverrides {
            strategy: Some(ListStrategy::Virtualized),
            ..CliOverrides::default()
        },
    )
    .unwrap();

    assert_eq!(resolved.overscan, 3, "file beats default");
    assert_eq!(resolved.tick_ms, 40, "env beats file");
    assert_eq!(resolved.strategy, ListStrategy::Virtualized, "cli beats file");

    fs::remove_file(path).ok();
}
