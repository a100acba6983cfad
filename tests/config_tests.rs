use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rust_decimal_macros::dec;
use wagerbook::config::Config;
use wagerbook::error::{ConfigError, Error};

static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn write_temp_config(contents: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let suffix = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    path.push(format!("wagerbook-config-test-{nanos}-{suffix}.toml"));
    fs::write(&path, contents).expect("write temp config");
    path
}

#[test]
fn empty_file_yields_working_defaults() {
    let path = write_temp_config("");
    let result = Config::load(&path);
    let _ = fs::remove_file(&path);

    let config = result.expect("defaults should validate");
    assert_eq!(config.database.url, "wagerbook.db");
    assert_eq!(config.betting.min_stake, dec!(10));
    assert_eq!(config.betting.max_stake, dec!(10000));
    assert_eq!(config.pricing.fallback_odds, dec!(1.9));
    assert_eq!(config.skips.ttl_days, 3);
}

#[test]
fn absent_file_falls_back_to_defaults() {
    let config = Config::load_or_default("/nonexistent/wagerbook.toml")
        .expect("defaults should validate");
    assert_eq!(config.ledger.max_history_limit, 200);
    assert_eq!(config.jobs.leaderboard_sync_interval_secs, 300);
}

#[test]
fn sections_override_selectively() {
    let toml = r#"
[betting]
min_stake = "5"
max_stake = "500"
market_gate_timeout_ms = 1000
hold_ttl_secs = 60

[skips]
ttl_days = 7
"#;

    let path = write_temp_config(toml);
    let result = Config::load(&path);
    let _ = fs::remove_file(&path);

    let config = result.expect("config should load");
    assert_eq!(config.betting.min_stake, dec!(5));
    assert_eq!(config.betting.max_stake, dec!(500));
    assert_eq!(config.skips.ttl_days, 7);
    // Untouched sections keep their defaults.
    assert_eq!(config.pricing.sale_haircut, dec!(0.05));
}

#[test]
fn config_rejects_inverted_stake_range() {
    let toml = r#"
[betting]
min_stake = "100"
max_stake = "50"
market_gate_timeout_ms = 3000
hold_ttl_secs = 120
"#;

    let path = write_temp_config(toml);
    let result = Config::load(&path);
    let _ = fs::remove_file(&path);

    match result {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "betting.max_stake",
            ..
        })) => {}
        Err(err) => panic!("Expected invalid stake range error, got {err}"),
        Ok(_) => panic!("Expected inverted stake range to be rejected"),
    }
}

#[test]
fn config_rejects_out_of_range_haircut() {
    let toml = r#"
[pricing]
fallback_odds = "1.9"
sale_haircut = "1.0"
"#;

    let path = write_temp_config(toml);
    let result = Config::load(&path);
    let _ = fs::remove_file(&path);

    match result {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "pricing.sale_haircut",
            ..
        })) => {}
        Err(err) => panic!("Expected invalid haircut error, got {err}"),
        Ok(_) => panic!("Expected out-of-range haircut to be rejected"),
    }
}
