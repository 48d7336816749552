use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use seaplan_core::PlannerConfig;
use seaplan_core::constants::{
    DEFAULT_ROUTES_FILE, DEFAULT_TEMPLATES_FILE, ROUTES_ENV_VAR, TEMPLATES_ENV_VAR,
};

/// Load planner configuration, falling back to built-in defaults without a file.
pub fn load_config(path: Option<&Path>) -> Result<PlannerConfig> {
    let Some(path) = path else {
        return Ok(PlannerConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg = PlannerConfig::from_json(&raw)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    log::debug!("loaded planner config from {}", path.display());
    Ok(cfg)
}

/// Store location: flag, then environment, then the working directory default.
fn store_path(flag: Option<&Path>, env_value: Option<String>, default: &str) -> PathBuf {
    flag.map(Path::to_path_buf)
        .or_else(|| {
            env_value
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
        })
        .unwrap_or_else(|| PathBuf::from(default))
}

pub fn routes_path(flag: Option<&Path>, env_value: Option<String>) -> PathBuf {
    store_path(flag, env_value, DEFAULT_ROUTES_FILE)
}

pub fn routes_path_from_env(flag: Option<&Path>) -> PathBuf {
    routes_path(flag, std::env::var(ROUTES_ENV_VAR).ok())
}

pub fn templates_path_from_env(flag: Option<&Path>) -> PathBuf {
    store_path(
        flag,
        std::env::var(TEMPLATES_ENV_VAR).ok(),
        DEFAULT_TEMPLATES_FILE,
    )
}

/// `@path` reads the text from a file; anything else is taken literally.
pub fn resolve_text(arg: &str) -> Result<String> {
    if let Some(path) = arg.strip_prefix('@') {
        fs::read_to_string(path).with_context(|| format!("failed to read request text {path}"))
    } else {
        Ok(arg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_wins_over_environment() {
        let path = routes_path(Some(Path::new("a.json")), Some("b.json".to_string()));
        assert_eq!(path, PathBuf::from("a.json"));
        let path = routes_path(None, Some("b.json".to_string()));
        assert_eq!(path, PathBuf::from("b.json"));
        let path = routes_path(None, Some("  ".to_string()));
        assert_eq!(path, PathBuf::from(DEFAULT_ROUTES_FILE));
    }

    #[test]
    fn template_store_has_its_own_default() {
        let path = store_path(None, None, DEFAULT_TEMPLATES_FILE);
        assert_eq!(path, PathBuf::from("seaplan-templates.json"));
        let path = templates_path_from_env(Some(Path::new("t.json")));
        assert_eq!(path, PathBuf::from("t.json"));
    }

    #[test]
    fn missing_config_path_uses_defaults() {
        let cfg = load_config(None).unwrap();
        assert!((cfg.default_commission_pct - 2.5).abs() < f64::EPSILON);
        assert!(load_config(Some(Path::new("/definitely/not/here.json"))).is_err());
    }

    #[test]
    fn literal_text_passes_through() {
        assert_eq!(resolve_text("open Singapore").unwrap(), "open Singapore");
    }
}
