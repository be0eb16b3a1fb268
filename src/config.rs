// src/config.rs
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

use crate::ingest::aggregator::FetchPlan;

const ENV_PATH: &str = "DIRECTORY_CONFIG_PATH";

/// Service configuration. Defaults point at the production backend; a config
/// file only needs the keys it wants to override.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// WordPress REST base, e.g. `https://mfwa.org/wp-json/wp/v2`.
    pub base_url: String,
    /// List endpoints under the base, primary first.
    pub endpoints: Vec<String>,
    pub bind_addr: String,
    /// Full page size for fan-out and deep pagination (backend max is 100).
    pub page_size: u32,
    /// Page size of the provisional fetch that unblocks the first render.
    pub first_paint_size: u32,
    /// Deep-pagination ceiling per endpoint, page 1 included.
    pub page_cap: u32,
    /// Default page slice size on the HTTP surface.
    pub items_per_page: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "https://mfwa.org/wp-json/wp/v2".to_string(),
            endpoints: vec![
                "posts".to_string(),
                "issues-in-focus".to_string(),
                "country-highlights".to_string(),
                "partner-highlights".to_string(),
                "publication".to_string(),
            ],
            bind_addr: "0.0.0.0:8000".to_string(),
            page_size: 100,
            first_paint_size: 10,
            page_cap: 10,
            items_per_page: 10,
        }
    }
}

impl AppConfig {
    pub fn list_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint)
    }

    pub fn taxonomy_url(&self, slug: &str) -> String {
        self.list_url(slug)
    }

    pub fn fetch_plan(&self) -> FetchPlan {
        FetchPlan {
            first_paint_size: self.first_paint_size,
            page_size: self.page_size,
            page_cap: self.page_cap,
        }
    }
}

/// Load config from an explicit path. Supports TOML or JSON formats.
pub fn load_from(path: &Path) -> Result<AppConfig> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_config(&content, ext.as_str())
}

/// Load config using env var + fallbacks:
/// 1) $DIRECTORY_CONFIG_PATH
/// 2) config/sources.toml
/// 3) config/sources.json
/// 4) built-in defaults
pub fn load_default() -> Result<AppConfig> {
    if let Ok(p) = std::env::var(ENV_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_from(&pb);
        }
        return Err(anyhow!("DIRECTORY_CONFIG_PATH points to non-existent path"));
    }
    let toml_p = PathBuf::from("config/sources.toml");
    if toml_p.exists() {
        return load_from(&toml_p);
    }
    let json_p = PathBuf::from("config/sources.json");
    if json_p.exists() {
        return load_from(&json_p);
    }
    Ok(AppConfig::default())
}

fn parse_config(s: &str, hint_ext: &str) -> Result<AppConfig> {
    if hint_ext == "json" {
        return serde_json::from_str(s).context("parsing JSON config");
    }
    if let Ok(cfg) = toml::from_str::<AppConfig>(s) {
        return Ok(cfg);
    }
    serde_json::from_str(s).context("unsupported config format")
}
