//! Raw wire shapes and the resolved configuration.

use std::{collections::HashSet, time::Duration};

use serde::{Deserialize, Serialize};
use tracing::warn;
use win_keycode::{KeySequence, Vk};

/// Built-in admin hotkey used when the configured one is missing or
/// invalid.
pub const DEFAULT_ADMIN_HOTKEY: &str = "ctrl+shift+alt+l";
/// Default total window-detection budget.
pub const DEFAULT_DETECTION_WAIT_MS: u64 = 5000;
/// Default interval between detection attempts.
pub const DEFAULT_DETECTION_POLL_MS: u64 = 300;

/// The configuration file as written on disk. Every section is optional;
/// absence falls back to the documented defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// Admin-unlock combination as symbolic key names.
    pub admin_hotkey: Vec<String>,
    /// Individually suppressed keys.
    pub blocked_keys: Vec<String>,
    /// Suppressed combinations.
    pub blocked_key_combinations: Vec<Vec<String>>,
    /// Total window-detection budget in milliseconds.
    pub detection_wait_ms: Option<u64>,
    /// Interval between detection attempts in milliseconds.
    pub detection_poll_ms: Option<u64>,
}

/// Resolved configuration the engine consumes.
#[derive(Debug, Clone)]
pub struct Config {
    /// Admin-unlock combination; always present (built-in fallback).
    pub admin_hotkey: KeySequence,
    /// Individually suppressed keys.
    pub blocked_keys: HashSet<Vk>,
    /// Suppressed combinations.
    pub blocked_combinations: Vec<KeySequence>,
    /// Total window-detection budget.
    pub detection_wait: Duration,
    /// Interval between detection attempts.
    pub detection_poll: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self::resolve(RawConfig::default())
    }
}

impl Config {
    /// Resolve a raw configuration, skipping invalid entries with a
    /// warning.
    pub fn resolve(raw: RawConfig) -> Self {
        let admin_hotkey = resolve_hotkey(&raw.admin_hotkey);

        let mut blocked_keys = HashSet::new();
        for name in &raw.blocked_keys {
            match Vk::from_spec(name) {
                Some(vk) => {
                    blocked_keys.insert(vk);
                }
                None => warn!(name, "dropping unknown blocked key"),
            }
        }

        let mut blocked_combinations = Vec::new();
        for names in &raw.blocked_key_combinations {
            match resolve_sequence(names) {
                Some(seq) => blocked_combinations.push(seq),
                None => warn!(combo = ?names, "dropping invalid blocked combination"),
            }
        }

        Self {
            admin_hotkey,
            blocked_keys,
            blocked_combinations,
            detection_wait: Duration::from_millis(
                raw.detection_wait_ms.unwrap_or(DEFAULT_DETECTION_WAIT_MS),
            ),
            detection_poll: Duration::from_millis(
                raw.detection_poll_ms
                    .unwrap_or(DEFAULT_DETECTION_POLL_MS)
                    .max(1),
            ),
        }
    }
}

/// Resolve a list of key names into a sequence; `None` when any name is
/// unknown or the structure is invalid (empty, oversized, duplicates).
fn resolve_sequence(names: &[String]) -> Option<KeySequence> {
    let keys = names
        .iter()
        .map(|n| Vk::from_spec(n))
        .collect::<Option<Vec<_>>>()?;
    KeySequence::from_keys(keys)
}

/// The admin hotkey additionally needs exactly one non-modifier trigger.
/// Anything else falls back to the built-in default.
fn resolve_hotkey(names: &[String]) -> KeySequence {
    let fallback = || KeySequence::parse(DEFAULT_ADMIN_HOTKEY).expect("default hotkey parses");
    if names.is_empty() {
        return fallback();
    }
    match resolve_sequence(names) {
        Some(seq) if seq.trigger().is_some() => seq,
        Some(_) => {
            warn!(
                hotkey = ?names,
                "admin hotkey needs exactly one non-modifier key; using default"
            );
            fallback()
        }
        None => {
            warn!(hotkey = ?names, "invalid admin hotkey; using default");
            fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_are_complete() {
        let cfg = Config::default();
        assert_eq!(cfg.admin_hotkey.to_string(), DEFAULT_ADMIN_HOTKEY);
        assert!(cfg.blocked_keys.is_empty());
        assert!(cfg.blocked_combinations.is_empty());
        assert_eq!(cfg.detection_wait, Duration::from_millis(5000));
        assert_eq!(cfg.detection_poll, Duration::from_millis(300));
    }

    #[test]
    fn unknown_blocked_key_is_skipped_not_fatal() {
        let raw = RawConfig {
            blocked_keys: names(&["f11", "hyperkey", "lwin"]),
            ..RawConfig::default()
        };
        let cfg = Config::resolve(raw);
        assert_eq!(cfg.blocked_keys.len(), 2);
        assert!(cfg.blocked_keys.contains(&Vk::F11));
        assert!(cfg.blocked_keys.contains(&Vk::LWIN));
    }

    #[test]
    fn invalid_combination_is_dropped() {
        let raw = RawConfig {
            blocked_key_combinations: vec![
                names(&["alt", "tab"]),
                names(&["alt", "nosuchkey"]),
                names(&[]),
            ],
            ..RawConfig::default()
        };
        let cfg = Config::resolve(raw);
        assert_eq!(cfg.blocked_combinations.len(), 1);
        assert_eq!(cfg.blocked_combinations[0].to_string(), "alt+tab");
    }

    #[test]
    fn hotkey_without_trigger_falls_back() {
        let raw = RawConfig {
            admin_hotkey: names(&["ctrl", "shift"]),
            ..RawConfig::default()
        };
        let cfg = Config::resolve(raw);
        assert_eq!(cfg.admin_hotkey.to_string(), DEFAULT_ADMIN_HOTKEY);
    }

    #[test]
    fn valid_hotkey_is_kept() {
        let raw = RawConfig {
            admin_hotkey: names(&["ctrl", "alt", "k"]),
            ..RawConfig::default()
        };
        let cfg = Config::resolve(raw);
        assert_eq!(cfg.admin_hotkey.to_string(), "ctrl+alt+k");
    }

    #[test]
    fn zero_poll_interval_is_clamped() {
        let raw = RawConfig {
            detection_poll_ms: Some(0),
            ..RawConfig::default()
        };
        let cfg = Config::resolve(raw);
        assert_eq!(cfg.detection_poll, Duration::from_millis(1));
    }
}
