//! Client configuration: config dir, persisted manual API URL, environment overrides.

use crate::network::Platform;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Port the soil analysis backend listens on.
pub const API_PORT: u16 = 8000;

/// Backend used when nothing better is known. Overridable at build time.
pub const FALLBACK_API_URL: &str = match option_env!("GKVK_FALLBACK_API_URL") {
    Some(url) => url,
    None => "http://192.168.68.63:8000",
};

const CONFIG_FILENAME: &str = "config.json";
const API_URL_VAR: &str = "GKVK_API_URL";
const CONFIG_DIR_VAR: &str = "GKVK_CONFIG_DIR";
const DEV_HOST_VAR: &str = "TAURI_DEV_HOST";

fn expand_tilde(path: &str) -> PathBuf {
    let s = path.trim();
    if s.starts_with('~') {
        let rest = s.trim_start_matches('~').trim_start_matches('/');
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(s)
}

pub fn config_dir() -> PathBuf {
    if let Ok(override_dir) = std::env::var(CONFIG_DIR_VAR) {
        let s = override_dir.trim();
        if !s.is_empty() {
            return expand_tilde(s);
        }
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gkvk-soil")
}

#[derive(Default, Clone, Serialize, Deserialize)]
struct ConfigFile {
    manual_api_url: Option<String>,
}

fn read_config(dir: &Path) -> ConfigFile {
    let path = dir.join(CONFIG_FILENAME);
    if !path.exists() {
        return ConfigFile::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(s) => serde_json::from_str(&s).unwrap_or_default(),
        Err(e) => {
            log::warn!("Could not read {}: {}", path.display(), e);
            ConfigFile::default()
        }
    }
}

fn write_config(dir: &Path, update: impl FnOnce(&mut ConfigFile)) -> std::io::Result<()> {
    let mut cfg = read_config(dir);
    update(&mut cfg);
    std::fs::create_dir_all(dir)?;
    let body = serde_json::to_string_pretty(&cfg).unwrap_or_else(|_| "{}".to_string());
    std::fs::write(dir.join(CONFIG_FILENAME), body)
}

fn manual_api_url_in(dir: &Path) -> Option<String> {
    read_config(dir)
        .manual_api_url
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn set_manual_api_url_in(dir: &Path, url: Option<String>) -> std::io::Result<()> {
    let url = url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty());
    write_config(dir, |c| c.manual_api_url = url)
}

/// Backend URL the user typed into settings, if any.
pub fn get_manual_api_url() -> Option<String> {
    manual_api_url_in(&config_dir())
}

/// Persist (or clear, with `None`) the manual backend URL. Takes effect on next start.
pub fn set_manual_api_url(url: Option<String>) -> std::io::Result<()> {
    set_manual_api_url_in(&config_dir(), url)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn non_empty_var(name: &str) -> Option<String> {
    non_empty(std::env::var(name).ok())
}

/// `GKVK_API_URL` if set and non-blank, else the manual URL saved in `dir`.
fn api_url_override_in(dir: &Path, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    non_empty(lookup(API_URL_VAR)).or_else(|| manual_api_url_in(dir))
}

/// Inputs to base-URL resolution.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Explicit backend URL, used verbatim.
    pub api_url_override: Option<String>,
    /// Dev machine host handed over by the dev server.
    pub dev_host: Option<String>,
    pub platform: Platform,
    pub dev_build: bool,
    pub fallback_url: String,
    pub api_port: u16,
    pub loopback_host: String,
}

impl ClientConfig {
    /// Load from `.env`, the process environment and `config.json`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api_url_override = api_url_override_in(&config_dir(), |name| std::env::var(name).ok());

        Self {
            api_url_override,
            dev_host: non_empty_var(DEV_HOST_VAR),
            platform: Platform::current(),
            dev_build: cfg!(debug_assertions),
            fallback_url: FALLBACK_API_URL.to_string(),
            api_port: API_PORT,
            loopback_host: "localhost".to_string(),
        }
    }

    pub(crate) fn override_url(&self) -> Option<String> {
        self.api_url_override
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}

impl Default for ClientConfig {
    /// Release-build defaults with no overrides.
    fn default() -> Self {
        Self {
            api_url_override: None,
            dev_host: None,
            platform: Platform::current(),
            dev_build: false,
            fallback_url: FALLBACK_API_URL.to_string(),
            api_port: API_PORT,
            loopback_host: "localhost".to_string(),
        }
    }
}
