// src/config.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub const CONFIG_FILE_VAR: &str = "STMTRECON_CONFIG";
const API_URL_VAR: &str = "STMTRECON_API_URL";
const TIMEOUT_VAR: &str = "STMTRECON_TIMEOUT_SECS";
const EXPORT_DIR_VAR: &str = "STMTRECON_EXPORT_DIR";

/// Runtime settings: built-in defaults, then an optional YAML file, then env vars.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the extraction service; uploads go to `<api_url>/extract`.
    pub api_url: String,
    pub timeout_secs: u64,
    pub export_dir: PathBuf,
    pub export_stem: String,
    pub sheet_name: String,
    /// Fallback tracing directive when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000".to_string(),
            timeout_secs: 60,
            export_dir: PathBuf::from("."),
            export_stem: "transactions".to_string(),
            sheet_name: "Transactions".to_string(),
            log_filter: "info,stmtrecon=info".to_string(),
        }
    }
}

impl Config {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self> {
        let yaml = match env::var(CONFIG_FILE_VAR) {
            Ok(path) => Some(
                fs::read_to_string(&path).with_context(|| format!("reading config file {}", path))?,
            ),
            Err(_) => None,
        };
        Self::from_sources(yaml.as_deref(), |key| env::var(key).ok())
    }

    /// Layer `yaml` (if any) and then `lookup`ed variables over the defaults.
    pub fn from_sources(
        yaml: Option<&str>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut config = match yaml {
            Some(text) => serde_yaml::from_str(text).context("parsing YAML config")?,
            None => Config::default(),
        };

        if let Some(url) = lookup(API_URL_VAR) {
            config.api_url = url;
        }
        if let Some(secs) = lookup(TIMEOUT_VAR) {
            config.timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number of seconds, got {:?}", TIMEOUT_VAR, secs))?;
        }
        if let Some(dir) = lookup(EXPORT_DIR_VAR) {
            config.export_dir = PathBuf::from(dir);
        }
        Ok(config)
    }

    /// Where an export with extension `ext` should be written.
    ///
    /// No path means `<export_dir>/<export_stem>.<ext>`; a bare file name is
    /// placed in `export_dir`; anything with a directory part is used as is.
    pub fn export_path(&self, ext: &str, requested: Option<&Path>) -> PathBuf {
        match requested {
            None => self.export_dir.join(format!("{}.{}", self.export_stem, ext)),
            Some(path) if path.is_absolute() => path.to_path_buf(),
            Some(path) => match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => path.to_path_buf(),
                _ => self.export_dir.join(path),
            },
        }
    }
}
