//! Binary settings read from the environment.

use std::path::PathBuf;

pub const DEFAULT_CONFIG_PATH: &str = "desk.json";
pub const DEFAULT_ASSET_CLASS: &str = "forex";
pub const DEFAULT_SVG_OUT_DIR: &str = ".";
pub const DEFAULT_LOG_PATH: &str = "strength-board.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeskSettings {
    pub config_path: PathBuf,
    pub asset_class: String,
    pub svg_out_dir: PathBuf,
    pub log_path: PathBuf,
}

impl Default for DeskSettings {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            asset_class: DEFAULT_ASSET_CLASS.to_string(),
            svg_out_dir: PathBuf::from(DEFAULT_SVG_OUT_DIR),
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
        }
    }
}

impl DeskSettings {
    /// Defaults overridden by `DESK_CONFIG_PATH`, `DESK_ASSET_CLASS`, `DESK_SVG_OUT_DIR` and
    /// `DESK_LOG_PATH`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        Self {
            config_path: var("DESK_CONFIG_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.config_path),
            asset_class: var("DESK_ASSET_CLASS").unwrap_or(defaults.asset_class),
            svg_out_dir: var("DESK_SVG_OUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.svg_out_dir),
            log_path: var("DESK_LOG_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(DeskSettings::from_lookup(|_| None), DeskSettings::default());
    }

    #[test]
    fn test_overrides_and_blank_values() {
        let env = HashMap::from([
            ("DESK_ASSET_CLASS", "crypto"),
            ("DESK_SVG_OUT_DIR", "/tmp/svg"),
            ("DESK_CONFIG_PATH", "   "),
        ]);
        let settings =
            DeskSettings::from_lookup(|key| env.get(key).map(|value| value.to_string()));

        assert_eq!(settings.asset_class, "crypto");
        assert_eq!(settings.svg_out_dir, PathBuf::from("/tmp/svg"));
        assert_eq!(settings.config_path, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert_eq!(settings.log_path, PathBuf::from(DEFAULT_LOG_PATH));
    }
}
