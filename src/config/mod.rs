//! Configuration for `stasis.toml`.
//!
//! The file is optional - the two required deployment targets always come
//! from CLI flags. Sections:
//!
//! ```toml
//! [publish]
//! region = "eu-west-1"                    # AWS region override
//! endpoint = "http://localhost:4566"      # LocalStack / MinIO endpoint
//!
//! [snapshot]
//! extra_routes = ["/404.html"]            # routes not discoverable from registration
//! default_cache_control = "public, max-age=300"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Root configuration structure representing stasis.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Object store / CDN connection settings
    pub publish: PublishConfig,

    /// Snapshot behavior settings
    pub snapshot: SnapshotConfig,
}

/// `[publish]` section: connection defaults that CLI flags override.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// AWS region (falls back to the environment/profile when unset).
    pub region: Option<String>,

    /// Custom object-store endpoint, for LocalStack or MinIO.
    pub endpoint: Option<String>,
}

/// `[snapshot]` section: what gets fetched and how records are built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Concrete routes to snapshot in addition to the discovered ones
    /// (error pages and the like, which no registration reveals).
    pub extra_routes: Vec<String>,

    /// `Cache-Control` applied to records whose response carried none.
    pub default_cache_control: Option<String>,
}

impl Config {
    /// Load configuration from `path`. A missing file yields the defaults;
    /// a present-but-invalid file is fatal.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("invalid config {}", path.display()))
    }
}
