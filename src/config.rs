use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub(crate) const DEFAULT_CHART_LIMIT: usize = 12;
pub(crate) const DEFAULT_USER: &str = "local";

const DB_ENV: &str = "SPENDO_DB";
const USER_ENV: &str = "SPENDO_USER";

/// `config.toml` in the platform config directory. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FileConfig {
    pub(crate) db_path: Option<String>,
    pub(crate) user: Option<String>,
    pub(crate) chart_limit: Option<usize>,
}

/// Values supplied by the environment or the command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Overrides {
    pub(crate) db_path: Option<PathBuf>,
    pub(crate) user: Option<String>,
}

impl Overrides {
    pub(crate) fn from_env() -> Self {
        let var = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        Self {
            db_path: var(DB_ENV).map(|p| PathBuf::from(expand_home(&p))),
            user: var(USER_ENV),
        }
    }
}

/// Effective settings after layering file < environment < flags.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Settings {
    pub(crate) db_path: PathBuf,
    pub(crate) user: String,
    pub(crate) chart_limit: usize,
}

impl Settings {
    pub(crate) fn load(flags: Overrides) -> Result<Self> {
        let proj_dirs = directories::ProjectDirs::from("com", "spendo", "Spendo")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        let config_path = proj_dirs.config_dir().join("config.toml");
        let file = read_config_file(&config_path)?;

        let settings = Self::resolve(file, Overrides::from_env(), flags, proj_dirs.data_dir());
        if let Some(parent) = settings.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory: {}", parent.display()))?;
        }
        tracing::debug!(
            config = %config_path.display(),
            db = %settings.db_path.display(),
            user = %settings.user,
            "resolved settings"
        );
        Ok(settings)
    }

    pub(crate) fn resolve(file: FileConfig, env: Overrides, flags: Overrides, data_dir: &Path) -> Self {
        let db_path = flags
            .db_path
            .or(env.db_path)
            .or_else(|| file.db_path.map(|p| PathBuf::from(expand_home(&p))))
            .unwrap_or_else(|| data_dir.join("spendo.db"));

        let user = flags
            .user
            .or(env.user)
            .or(file.user)
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USER.to_string());

        Self {
            db_path,
            user,
            chart_limit: file.chart_limit.unwrap_or(DEFAULT_CHART_LIMIT),
        }
    }
}

pub(crate) fn read_config_file(path: &Path) -> Result<FileConfig> {
    if !path.exists() {
        return Ok(FileConfig::default());
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

pub(crate) fn expand_home(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
