//! TOML configuration.
//!
//! Every key is optional; a missing file section or key takes the default
//! shown below.
//!
//! ```toml
//! [search]
//! max_results = 300
//! default_page_size = 50
//! page_size_options = [25, 50, 100]
//! normalization = "active_facets"
//!
//! [api]
//! base_url = "http://localhost:8000"
//! api_key = ""
//! radius_m = 5000
//! limit = 50
//!
//! [error_log]
//! path = "dentalsearch-errors.json"
//! max_entries = 100
//! environment = "production"
//! ```
//!
//! `DENTALSEARCH_API_URL` and `DENTALSEARCH_API_KEY` override the API
//! section when set.

use crate::engine::{ClinicMatcher, ScoreNormalization, DEFAULT_MAX_RESULTS};
use crate::error::{Error, Result};
use crate::pagination::{Pager, DEFAULT_PAGE_SIZE_OPTIONS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ENV_API_URL: &str = "DENTALSEARCH_API_URL";
pub const ENV_API_KEY: &str = "DENTALSEARCH_API_KEY";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub search: SearchConfig,
  #[serde(default)]
  pub api: ApiConfig,
  #[serde(default)]
  pub error_log: ErrorLogConfig,
}

impl Config {
  /// Reads, parses and validates a config file.
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let config = Self::from_toml_str(&text)?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
  }

  /// Parses and validates config text.
  pub fn from_toml_str(text: &str) -> Result<Self> {
    let config: Config = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
  }

  /// Loads `path` when given, otherwise the defaults, then applies the
  /// environment overrides.
  pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
    let mut config = match path {
      Some(path) => Self::load(path)?,
      None => Self::default(),
    };
    config.apply_env();
    Ok(config)
  }

  /// Applies `DENTALSEARCH_API_URL` and `DENTALSEARCH_API_KEY`.
  pub fn apply_env(&mut self) {
    self.apply_overrides(|key| std::env::var(key).ok());
  }

  /// Applies overrides from any key lookup. Blank values are ignored.
  pub fn apply_overrides<F>(&mut self, lookup: F)
  where
    F: Fn(&str) -> Option<String>,
  {
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    if let Some(url) = get(ENV_API_URL) {
      self.api.base_url = url;
    }
    if let Some(key) = get(ENV_API_KEY) {
      self.api.api_key = key;
    }
  }

  pub fn validate(&self) -> Result<()> {
    self.search.validate()?;
    self.api.validate()?;
    self.error_log.validate()
  }
}

fn default_max_results() -> usize {
  DEFAULT_MAX_RESULTS
}

fn default_page_size() -> usize {
  crate::criteria::DEFAULT_PAGE_SIZE
}

fn default_page_size_options() -> Vec<usize> {
  DEFAULT_PAGE_SIZE_OPTIONS.to_vec()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
  #[serde(default = "default_max_results")]
  pub max_results: usize,
  #[serde(default = "default_page_size")]
  pub default_page_size: usize,
  #[serde(default = "default_page_size_options")]
  pub page_size_options: Vec<usize>,
  #[serde(default)]
  pub normalization: ScoreNormalization,
}

impl Default for SearchConfig {
  fn default() -> Self {
    Self {
      max_results: default_max_results(),
      default_page_size: default_page_size(),
      page_size_options: default_page_size_options(),
      normalization: ScoreNormalization::default(),
    }
  }
}

impl SearchConfig {
  fn validate(&self) -> Result<()> {
    if self.max_results == 0 {
      return Err(Error::Config("search.max_results must be >= 1".to_string()));
    }
    if self.page_size_options.is_empty() {
      return Err(Error::Config("search.page_size_options must not be empty".to_string()));
    }
    if self.page_size_options.contains(&0) {
      return Err(Error::Config("search.page_size_options must not contain 0".to_string()));
    }
    if !self.page_size_options.contains(&self.default_page_size) {
      return Err(Error::Config(format!(
        "search.default_page_size {} is not one of {:?}",
        self.default_page_size, self.page_size_options
      )));
    }
    Ok(())
  }

  /// A pager starting at the configured default size.
  pub fn pager(&self) -> Result<Pager> {
    Pager::new(self.default_page_size, self.page_size_options.clone())
  }
}

fn default_base_url() -> String {
  "http://localhost:8000".to_string()
}

fn default_radius() -> u32 {
  5000
}

fn default_limit() -> u32 {
  50
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
  #[serde(default = "default_base_url")]
  pub base_url: String,
  #[serde(default)]
  pub api_key: String,
  /// Search radius in meters.
  #[serde(default = "default_radius")]
  pub radius_m: u32,
  #[serde(default = "default_limit")]
  pub limit: u32,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: default_base_url(),
      api_key: String::new(),
      radius_m: default_radius(),
      limit: default_limit(),
    }
  }
}

impl ApiConfig {
  fn validate(&self) -> Result<()> {
    if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
      return Err(Error::Config(format!(
        "api.base_url must be an http(s) URL, got {:?}",
        self.base_url
      )));
    }
    if self.limit == 0 {
      return Err(Error::Config("api.limit must be >= 1".to_string()));
    }
    Ok(())
  }
}

fn default_log_path() -> PathBuf {
  PathBuf::from("dentalsearch-errors.json")
}

fn default_max_entries() -> usize {
  100
}

fn default_environment() -> String {
  "production".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorLogConfig {
  #[serde(default = "default_log_path")]
  pub path: PathBuf,
  #[serde(default = "default_max_entries")]
  pub max_entries: usize,
  #[serde(default = "default_environment")]
  pub environment: String,
}

impl Default for ErrorLogConfig {
  fn default() -> Self {
    Self {
      path: default_log_path(),
      max_entries: default_max_entries(),
      environment: default_environment(),
    }
  }
}

impl ErrorLogConfig {
  fn validate(&self) -> Result<()> {
    if self.max_entries == 0 {
      return Err(Error::Config("error_log.max_entries must be >= 1".to_string()));
    }
    Ok(())
  }
}

impl ClinicMatcher {
  /// The standard matcher with limits and normalization from config.
  pub fn from_config(config: &SearchConfig) -> Self {
    Self::builder()
      .standard_facets()
      .normalization(config.normalization)
      .max_results(config.max_results)
      .default_page_size(config.default_page_size)
      .build()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_config_is_default() {
    let config = Config::from_toml_str("").unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.search.max_results, 300);
    assert_eq!(config.api.radius_m, 5000);
    assert_eq!(config.error_log.max_entries, 100);
  }

  #[test]
  fn test_partial_section() {
    let config = Config::from_toml_str(
      r#"
      [search]
      max_results = 120
      normalization = "fixed"
      "#,
    )
    .unwrap();
    assert_eq!(config.search.max_results, 120);
    assert_eq!(config.search.default_page_size, 50);
    assert_eq!(config.search.normalization, ScoreNormalization::Fixed);
    let matcher = ClinicMatcher::from_config(&config.search);
    assert_eq!(matcher.max_results(), 120);
  }

  #[test]
  fn test_default_page_size_must_be_an_option() {
    let result = Config::from_toml_str(
      r#"
      [search]
      default_page_size = 30
      "#,
    );
    assert!(matches!(result, Err(Error::Config(_))));
  }

  #[test]
  fn test_invalid_values() {
    for text in [
      "[search]\nmax_results = 0",
      "[search]\npage_size_options = []",
      "[search]\npage_size_options = [0, 50]",
      "[api]\nbase_url = \"localhost\"",
      "[error_log]\nmax_entries = 0",
    ] {
      assert!(Config::from_toml_str(text).is_err(), "{text} should be rejected");
    }
    assert!(matches!(
      Config::from_toml_str("[search"),
      Err(Error::ConfigParse(_))
    ));
  }

  #[test]
  fn test_overrides_ignore_blank_values() {
    let mut config = Config::default();
    config.apply_overrides(|key| match key {
      ENV_API_URL => Some("https://api.example.org".to_string()),
      ENV_API_KEY => Some("  ".to_string()),
      _ => None,
    });
    assert_eq!(config.api.base_url, "https://api.example.org");
    assert_eq!(config.api.api_key, "");
  }
}
