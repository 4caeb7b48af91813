use crate::storage::StorageKeys;
use std::{env, path::PathBuf};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_dir: PathBuf,
    pub keys: StorageKeys,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let data_dir = lookup("APP_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let defaults = StorageKeys::default();
        let slot = |name: &str, fallback: String| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or(fallback)
        };
        let keys = StorageKeys {
            subjects: slot("APP_SLOT_SUBJECTS", defaults.subjects),
            attendance: slot("APP_SLOT_ATTENDANCE", defaults.attendance),
            settings: slot("APP_SLOT_SETTINGS", defaults.settings),
        };

        Self {
            port,
            data_dir,
            keys,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup_from(&[]));
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.keys, StorageKeys::default());
    }

    #[test]
    fn overrides_are_applied() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "9191"),
            ("APP_DATA_DIR", "/tmp/attendance"),
            ("APP_SLOT_SETTINGS", "prefs"),
            ("APP_SLOT_SUBJECTS", "  "),
        ]));
        assert_eq!(config.port, 9191);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/attendance"));
        assert_eq!(config.keys.settings, "prefs");
        assert_eq!(config.keys.subjects, "attendance_subjects");
    }

    #[test]
    fn invalid_port_falls_back() {
        let config = Config::from_lookup(lookup_from(&[("PORT", "not-a-port")]));
        assert_eq!(config.port, 8080);
    }
}
