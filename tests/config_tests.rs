use resize_bot::config::{BotConfig, DEFAULT_HEALTH_PORT, DEFAULT_MAX_PIXELS, DEFAULT_MAX_SIDE};
use resize_bot::errors::ConfigError;
use std::collections::HashMap;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

#[test]
fn test_defaults() {
    let config = BotConfig::from_lookup(lookup(&[("BOT_TOKEN", "123:abc")])).unwrap();

    assert_eq!(config.token, "123:abc");
    assert_eq!(config.health_port, DEFAULT_HEALTH_PORT);
    assert_eq!(config.resize.max_side, DEFAULT_MAX_SIDE);
    assert_eq!(config.resize.max_pixels, DEFAULT_MAX_PIXELS);
    assert_eq!(config.resize.jpeg_quality, 100);
}

#[test]
fn test_missing_or_empty_token() {
    assert_eq!(
        BotConfig::from_lookup(lookup(&[])).unwrap_err(),
        ConfigError::Missing("BOT_TOKEN")
    );
    assert_eq!(
        BotConfig::from_lookup(lookup(&[("BOT_TOKEN", "  ")])).unwrap_err(),
        ConfigError::Missing("BOT_TOKEN")
    );
}

#[test]
fn test_port_and_max_side() {
    let config = BotConfig::from_lookup(lookup(&[
        ("BOT_TOKEN", "t"),
        ("PORT", "5000"),
        ("MAX_IMAGE_SIDE", "2048"),
    ]))
    .unwrap();

    assert_eq!(config.health_port, 5000);
    assert_eq!(config.resize.max_side, 2048);
}

#[test]
fn test_empty_port_falls_back_to_default() {
    let config = BotConfig::from_lookup(lookup(&[("BOT_TOKEN", "t"), ("PORT", "")])).unwrap();
    assert_eq!(config.health_port, DEFAULT_HEALTH_PORT);
}

#[test]
fn test_invalid_values() {
    let err = BotConfig::from_lookup(lookup(&[("BOT_TOKEN", "t"), ("PORT", "http")])).unwrap_err();
    assert_eq!(
        err,
        ConfigError::Invalid {
            name: "PORT",
            value: "http".to_string()
        }
    );

    let err = BotConfig::from_lookup(lookup(&[("BOT_TOKEN", "t"), ("MAX_IMAGE_SIDE", "0")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { name: "MAX_IMAGE_SIDE", .. }));

    let err = BotConfig::from_lookup(lookup(&[("BOT_TOKEN", "t"), ("MAX_RESIZE_PIXELS", "0")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { name: "MAX_RESIZE_PIXELS", .. }));
}

#[test]
fn test_pixel_budget_override() {
    let config = BotConfig::from_lookup(lookup(&[("BOT_TOKEN", "t"), ("MAX_RESIZE_PIXELS", "1000000")])).unwrap();
    assert_eq!(config.resize.max_pixels, 1_000_000);
}

#[test]
fn test_debug_redacts_token() {
    let config = BotConfig::from_lookup(lookup(&[("BOT_TOKEN", "secret-token")])).unwrap();
    let debug = format!("{config:?}");
    assert!(!debug.contains("secret-token"));
    assert!(debug.contains("<redacted>"));
}
