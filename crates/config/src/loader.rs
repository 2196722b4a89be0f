//! Parse and load the kiosk configuration.

use std::{fs, path::Path};

use crate::{Config, Error, types::RawConfig};

/// Load a fully resolved [`Config`] from a JSON file at `path`.
pub fn load_from_path(path: &Path) -> Result<Config, Error> {
    let text = fs::read_to_string(path).map_err(|e| Error::Read {
        path: Some(path.to_path_buf()),
        message: e.to_string(),
    })?;
    load_from_str(&text).map_err(|e| e.with_path(path))
}

/// Load a fully resolved [`Config`] from JSON text.
pub fn load_from_str(text: &str) -> Result<Config, Error> {
    let raw: RawConfig = serde_json::from_str(text).map_err(|e| Error::Parse {
        path: None,
        line: e.line(),
        col: e.column(),
        message: e.to_string(),
    })?;
    Ok(Config::resolve(raw))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn full_document_round_trips() {
        let cfg = load_from_str(
            r#"{
                "admin_hotkey": ["ctrl", "shift", "alt", "l"],
                "blocked_keys": ["f11", "lwin"],
                "blocked_key_combinations": [["alt", "tab"], ["ctrl", "esc"]],
                "detection_wait_ms": 8000,
                "detection_poll_ms": 250
            }"#,
        )
        .expect("parse");
        assert_eq!(cfg.admin_hotkey.to_string(), "ctrl+shift+alt+l");
        assert_eq!(cfg.blocked_keys.len(), 2);
        assert_eq!(cfg.blocked_combinations.len(), 2);
        assert_eq!(cfg.detection_wait, Duration::from_millis(8000));
        assert_eq!(cfg.detection_poll, Duration::from_millis(250));
    }

    #[test]
    fn empty_document_yields_defaults() {
        let cfg = load_from_str("{}").expect("parse");
        assert_eq!(
            cfg.admin_hotkey.to_string(),
            crate::DEFAULT_ADMIN_HOTKEY
        );
        assert!(cfg.blocked_keys.is_empty());
    }

    #[test]
    fn malformed_json_reports_location() {
        let err = load_from_str("{ \"admin_hotkey\": [ }").expect_err("must fail");
        match err {
            Error::Parse { line, .. } => assert_eq!(line, 1),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
