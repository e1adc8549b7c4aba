use std::path::{Path, PathBuf};

use super::types::AppConfig;
use crate::error::ConfigError;
use crate::theme::ThemePreset;

pub const ENV_API_URL: &str = "TASK_CONSOLE_API_URL";
pub const ENV_THEME: &str = "TASK_CONSOLE_THEME";

/// Get the default data directory: ~/.task-console
pub fn get_data_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(".task-console"))
        .ok_or(ConfigError::NoHomeDir)
}

/// Load configuration.
///
/// An explicit path must exist. Otherwise `~/.task-console/config.toml` wins
/// over `./config.toml`, and built-in defaults apply when neither exists.
/// Environment overrides are applied last.
pub fn load(explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let data_dir = get_data_dir()?;

    let mut cfg = match explicit {
        Some(path) => read_file(path)?,
        None => {
            let home_config = data_dir.join("config.toml");
            let local_config = Path::new("config.toml");
            if home_config.exists() {
                read_file(&home_config)?
            } else if local_config.exists() {
                read_file(local_config)?
            } else {
                AppConfig::default()
            }
        }
    };

    if cfg.logging.file
        && cfg
            .logging
            .directory
            .as_deref()
            .map(|s| s.trim().is_empty())
            .unwrap_or(true)
    {
        cfg.logging.directory = Some(data_dir.join("logs").to_string_lossy().to_string());
    }

    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok())?;
    validate(&cfg)?;
    Ok(cfg)
}

fn read_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_str(&s, path)
}

fn parse_str(s: &str, path: &Path) -> Result<AppConfig, ConfigError> {
    toml::from_str::<AppConfig>(s).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Environment variable overrides (highest priority below CLI flags).
pub fn apply_env_overrides<F>(cfg: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup(ENV_API_URL) {
        if !v.trim().is_empty() {
            cfg.api.base_url = v.trim().to_string();
        }
    }
    if let Some(v) = lookup(ENV_THEME) {
        if !v.trim().is_empty() {
            cfg.theme.preset = v.parse::<ThemePreset>().map_err(|reason| {
                ConfigError::Invalid {
                    field: ENV_THEME,
                    reason,
                }
            })?;
        }
    }
    Ok(())
}

pub fn validate(cfg: &AppConfig) -> Result<(), ConfigError> {
    if cfg.api.base_url.trim().is_empty() {
        return Err(ConfigError::Invalid {
            field: "api.base_url",
            reason: "must not be empty".to_string(),
        });
    }
    if cfg.tui.page_size == 0 {
        return Err(ConfigError::Invalid {
            field: "tui.page_size",
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_empty() {
        let cfg = parse_str("", Path::new("config.toml")).unwrap();
        assert_eq!(cfg.api.base_url, "http://localhost:8080");
        assert_eq!(cfg.api.timeout_ms, None);
        assert_eq!(cfg.tui.page_size, 8);
        assert_eq!(cfg.tui.notification_ttl_ms, 3_000);
        assert_eq!(cfg.theme.preset, ThemePreset::Amber);
        assert!(cfg.logging.enabled);
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let cfg = parse_str(
            r#"
[api]
base_url = "http://tasks.example:9000"
timeout_ms = 2500

[theme]
preset = "classic"
title = "Ops Tasks"
"#,
            Path::new("config.toml"),
        )
        .unwrap();
        assert_eq!(cfg.api.base_url, "http://tasks.example:9000");
        assert_eq!(cfg.api.timeout_ms, Some(2_500));
        assert_eq!(cfg.theme.preset, ThemePreset::Classic);
        assert_eq!(cfg.theme.resolve().title, "Ops Tasks");
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn test_parse_error_names_path() {
        let err = parse_str("[api\nbase_url=", Path::new("/tmp/bad.toml")).unwrap_err();
        assert!(err.to_string().contains("/tmp/bad.toml"));
    }

    #[test]
    fn test_read_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[tui]\npage_size = 5\n").unwrap();
        let cfg = read_file(&path).unwrap();
        assert_eq!(cfg.tui.page_size, 5);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_file(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_API_URL, " http://override:1 "),
            (ENV_THEME, "classic"),
        ]
        .into_iter()
        .collect();
        let mut cfg = AppConfig::default();
        apply_env_overrides(&mut cfg, |k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(cfg.api.base_url, "http://override:1");
        assert_eq!(cfg.theme.preset, ThemePreset::Classic);
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let mut cfg = AppConfig::default();
        apply_env_overrides(&mut cfg, |_| Some("   ".to_string())).unwrap();
        assert_eq!(cfg.api.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_bad_theme_env_is_rejected() {
        let mut cfg = AppConfig::default();
        let err = apply_env_overrides(&mut cfg, |k| {
            (k == ENV_THEME).then(|| "neon".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: ENV_THEME, .. }));
    }

    #[test]
    fn test_zero_page_size_is_invalid() {
        let mut cfg = AppConfig::default();
        cfg.tui.page_size = 0;
        assert!(validate(&cfg).is_err());
    }
}
