//! Service configuration.
//!
//! Defaults cover local development; deployments override through the CLI or
//! the `VOIDWIRE_*` environment variables.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::assets::fonts::FontStore;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServeConfig {
    /// Address the HTTP server binds to.
    pub bind: String,
    /// Base URL of the upstream content/ephemeris API.
    pub upstream_url: String,
    /// Candidate directories probed for the bundled typefaces, in order.
    pub font_dirs: Vec<PathBuf>,
    /// Public site URL used for links in the feed.
    pub site_url: String,
    pub site_title: String,
    pub site_description: String,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8787".to_string(),
            upstream_url: "http://127.0.0.1:4000".to_string(),
            font_dirs: FontStore::default_candidates(),
            site_url: "https://voidwire.example".to_string(),
            site_title: "VOIDWIRE".to_string(),
            site_description: "Daily astrology transmissions".to_string(),
        }
    }
}

impl ServeConfig {
    /// Apply `VOIDWIRE_BIND`, `VOIDWIRE_UPSTREAM_URL` and `VOIDWIRE_FONT_DIR`
    /// overrides on top of the current values.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(bind) = std::env::var("VOIDWIRE_BIND")
            && !bind.is_empty()
        {
            self.bind = bind;
        }
        if let Ok(url) = std::env::var("VOIDWIRE_UPSTREAM_URL")
            && !url.is_empty()
        {
            self.upstream_url = url;
        }
        if let Ok(dir) = std::env::var("VOIDWIRE_FONT_DIR")
            && !dir.is_empty()
        {
            self.font_dirs.insert(0, PathBuf::from(dir));
        }
        self
    }
}
