//! Runtime configuration, layered from `config.toml` and `THAIGEO_*`
//! environment variables.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thaigeo_core::geo::LevelCounts;
use thaigeo_import::{SourceLayout, SourceUrls, maintenance::THAILAND_TOTALS};

/// Top-level configuration. Every field has a default, so an empty file (or
/// no file at all) is a valid configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  pub source:     SourceConfig,
  /// Totals reported next to the live counts by the stats endpoint.
  pub expected:   LevelCounts,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "localhost".to_string(),
      port:       8000,
      store_path: PathBuf::from("~/.local/share/thaigeo/geo.db"),
      source:     SourceConfig::default(),
      expected:   THAILAND_TOTALS,
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
  #[serde(flatten)]
  pub urls:   SourceUrls,
  pub layout: LayoutConfig,
}

/// Either a named preset or a full field mapping.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LayoutConfig {
  Preset(LayoutPreset),
  Custom(Box<SourceLayout>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutPreset {
  Current,
  Legacy,
}

impl Default for LayoutConfig {
  fn default() -> Self { LayoutConfig::Preset(LayoutPreset::Current) }
}

impl LayoutConfig {
  pub fn resolve(&self) -> SourceLayout {
    match self {
      LayoutConfig::Preset(LayoutPreset::Current) => SourceLayout::current(),
      LayoutConfig::Preset(LayoutPreset::Legacy) => SourceLayout::legacy(),
      LayoutConfig::Custom(layout) => layout.as_ref().clone(),
    }
  }
}

impl ServerConfig {
  /// Load from `path` (optional) and the environment. Nested keys use a
  /// double underscore, e.g. `THAIGEO_SOURCE__LAYOUT=legacy`.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("THAIGEO")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()?
      .try_deserialize()
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use config::{Config, File, FileFormat};

  use super::*;

  fn parse(toml: &str) -> ServerConfig {
    Config::builder()
      .add_source(File::from_str(toml, FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  #[test]
  fn empty_config_uses_defaults() {
    let cfg = parse("");
    assert_eq!(cfg.host, "localhost");
    assert_eq!(cfg.port, 8000);
    assert_eq!(cfg.expected, THAILAND_TOTALS);
    assert_eq!(cfg.source.urls, SourceUrls::default());
    assert_eq!(cfg.source.layout.resolve(), SourceLayout::current());
  }

  #[test]
  fn overrides_and_legacy_preset() {
    let cfg = parse(
      r#"
        port = 9000
        store_path = "/tmp/geo.db"

        [source]
        provinces_url = "http://mirror.local/p.json"
        layout = "legacy"

        [expected]
        provinces = 1
        districts = 2
        subdistricts = 3
      "#,
    );
    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.store_path, PathBuf::from("/tmp/geo.db"));
    assert_eq!(cfg.source.urls.provinces_url, "http://mirror.local/p.json");
    assert_eq!(
      cfg.source.urls.districts_url,
      SourceUrls::default().districts_url
    );
    assert_eq!(cfg.source.layout.resolve(), SourceLayout::legacy());
    assert_eq!(cfg.expected.subdistricts, 3);
  }

  #[test]
  fn tilde_expands_against_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(
      expand_tilde(Path::new("~/geo.db")),
      PathBuf::from(home).join("geo.db")
    );
    assert_eq!(expand_tilde(Path::new("/abs/geo.db")), PathBuf::from("/abs/geo.db"));
  }
}
