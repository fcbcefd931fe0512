use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context};
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "registrar.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub postal_lookup_base_url: String,
    pub lookup_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub token_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8080".into(),
            postal_lookup_base_url: "https://viacep.com.br/ws".into(),
            lookup_timeout_secs: 5,
            request_timeout_secs: 10,
            token_path: PathBuf::from("./data/session.token"),
        }
    }
}

impl Settings {
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_base_url: Option<String>,
    postal_lookup_base_url: Option<String>,
    lookup_timeout_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
    token_path: Option<PathBuf>,
}

/// Defaults, then the TOML file (if present), then `APP__*` environment variables.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    match fs::read_to_string(path) {
        Ok(raw) => {
            let file_cfg: FileSettings = toml::from_str(&raw)
                .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
            apply_file(&mut settings, file_cfg);
            debug!(path = %path.display(), "loaded config file");
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()))
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok())?;
    normalize(settings)
}

fn apply_file(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.api_base_url {
        settings.api_base_url = v;
    }
    if let Some(v) = file_cfg.postal_lookup_base_url {
        settings.postal_lookup_base_url = v;
    }
    if let Some(v) = file_cfg.lookup_timeout_secs {
        settings.lookup_timeout_secs = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = v;
    }
    if let Some(v) = file_cfg.token_path {
        settings.token_path = v;
    }
}

fn apply_env(
    settings: &mut Settings,
    var: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    if let Some(v) = var("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = var("APP__POSTAL_LOOKUP_BASE_URL") {
        settings.postal_lookup_base_url = v;
    }
    if let Some(v) = var("APP__LOOKUP_TIMEOUT_SECS") {
        settings.lookup_timeout_secs = v
            .parse()
            .with_context(|| format!("APP__LOOKUP_TIMEOUT_SECS is not a number: '{v}'"))?;
    }
    if let Some(v) = var("APP__REQUEST_TIMEOUT_SECS") {
        settings.request_timeout_secs = v
            .parse()
            .with_context(|| format!("APP__REQUEST_TIMEOUT_SECS is not a number: '{v}'"))?;
    }
    if let Some(v) = var("APP__TOKEN_PATH") {
        settings.token_path = PathBuf::from(v);
    }
    Ok(())
}

fn normalize(mut settings: Settings) -> anyhow::Result<Settings> {
    settings.api_base_url = normalize_base_url("api_base_url", &settings.api_base_url)?;
    settings.postal_lookup_base_url =
        normalize_base_url("postal_lookup_base_url", &settings.postal_lookup_base_url)?;

    if settings.lookup_timeout_secs == 0 || settings.request_timeout_secs == 0 {
        bail!("timeouts must be at least one second");
    }
    Ok(settings)
}

fn normalize_base_url(name: &str, raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed =
        url::Url::parse(trimmed).with_context(|| format!("{name} is not a valid url: '{raw}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!("{name} must use http or https: '{raw}'");
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
