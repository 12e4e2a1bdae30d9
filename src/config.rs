//! Backend connection settings.
//!
//! Layers, later wins: defaults, JSON config file, environment
//! (`PARTSLOGIC_URL`, `FITMENT_TIMEOUT_SECS`, `FITMENT_VIA_PROXY`), explicit
//! `--url` override.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const BASE_URL_ENV: &str = "PARTSLOGIC_URL";
pub const TIMEOUT_ENV: &str = "FITMENT_TIMEOUT_SECS";
pub const VIA_PROXY_ENV: &str = "FITMENT_VIA_PROXY";

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    "fitment".to_string()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitmentConfig {
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Route every call through `/api/partslogic-proxy?path=...` on
    /// `base_url` instead of hitting the backend directly.
    #[serde(default)]
    pub via_proxy: bool,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FitmentConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            via_proxy: false,
            user_agent: default_user_agent(),
        }
    }
}

impl FitmentConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read config {}", path.display()))?;
        let mut cfg: FitmentConfig = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse config {}", path.display()))?;
        cfg.base_url = cfg.base_url.as_deref().and_then(normalize_base_url);
        Ok(cfg)
    }

    /// Resolves the full layer stack against the process environment.
    pub fn resolve(path: Option<&Path>, url_override: Option<&str>) -> Result<Self> {
        let base = match path {
            Some(p) => Self::load(p)?,
            None => Self::default(),
        };
        let mut cfg = base.with_env(|k| std::env::var(k).ok())?;
        if let Some(url) = url_override {
            cfg.base_url = normalize_base_url(url);
        }
        Ok(cfg)
    }

    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(url) = lookup(BASE_URL_ENV).as_deref().and_then(normalize_base_url) {
            self.base_url = Some(url);
        }
        if let Some(raw) = lookup(TIMEOUT_ENV) {
            self.timeout_secs = raw
                .trim()
                .parse()
                .with_context(|| format!("parse {}={:?}", TIMEOUT_ENV, raw))?;
        }
        if let Some(raw) = lookup(VIA_PROXY_ENV) {
            self.via_proxy = matches!(raw.trim(), "1" | "true" | "yes");
        }
        Ok(self)
    }

    pub fn base_url(&self) -> Result<&str> {
        self.base_url.as_deref().with_context(|| {
            format!(
                "no fitment backend configured (set {} or pass --url)",
                BASE_URL_ENV
            )
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

pub(crate) fn normalize_base_url(raw: &str) -> Option<String> {
    let s = raw.trim().trim_end_matches('/');
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
