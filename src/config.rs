//! Host configuration: a TOML file plus environment overrides.
//!
//! ```toml
//! [search]
//! app_id = "APPID"
//! api_key = "search-only-key"
//! prefix = "site_"
//! result_limit = 5
//!
//! [search.options]
//! hitsPerPage = 5
//!
//! [search.transport]
//! timeout_seconds = 8
//!
//! [render]
//! enabled = true
//! template = "/etc/quicksearch/result-group.html"
//! ```
//!
//! `QUICKSEARCH_APP_ID`, `QUICKSEARCH_API_KEY`, and `QUICKSEARCH_PREFIX`
//! override the credentials from the file, so keys can stay out of it.

use std::path::{Path, PathBuf};

use quicksearch_core::{ResultRenderer, SearchConfig};
use serde::{Deserialize, Serialize};

use crate::error::{HostError, Result};

pub const APP_ID_ENV: &str = "QUICKSEARCH_APP_ID";
pub const API_KEY_ENV: &str = "QUICKSEARCH_API_KEY";
pub const PREFIX_ENV: &str = "QUICKSEARCH_PREFIX";

/// Everything the host binary needs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub search: SearchConfig,
    pub render: RenderConfig,
}

/// Whether and how results are rendered to HTML alongside the raw payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub enabled: bool,
    /// Result group template file; the built-in template when unset.
    pub template: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            template: None,
        }
    }
}

impl HostConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| HostError::Config(format!("{}: {e}", path.display())))
    }

    /// Load the explicit `path`, or the default config file when it exists,
    /// or defaults. Environment overrides are applied last.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit path is missing or any file is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Some(default) if default.is_file() => Self::from_file(&default)?,
                _ => Self::default(),
            },
        };
        config.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Returns the default config file path: `<config dir>/quicksearch/config.toml`.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("quicksearch").join("config.toml"))
    }

    /// Override credentials with non-empty values from `lookup`.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |name: &str| lookup(name).filter(|value| !value.is_empty());
        if let Some(app_id) = get(APP_ID_ENV) {
            self.search.app_id = Some(app_id);
        }
        if let Some(api_key) = get(API_KEY_ENV) {
            self.search.api_key = Some(api_key);
        }
        if let Some(prefix) = get(PREFIX_ENV) {
            self.search.prefix = Some(prefix);
        }
    }

    /// Build the renderer, or `None` when rendering is disabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the template file cannot be read or compiled.
    pub fn renderer(&self) -> Result<Option<ResultRenderer>> {
        if !self.render.enabled {
            return Ok(None);
        }
        let renderer = match self.render.template {
            Some(ref path) => {
                let source = std::fs::read_to_string(path)?;
                ResultRenderer::with_template(self.search.result_limit, source)?
            }
            None => ResultRenderer::new(self.search.result_limit)?,
        };
        Ok(Some(renderer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_has_rendering_and_no_credentials() {
        let config = HostConfig::default();
        assert!(config.render.enabled);
        assert!(config.search.credentials().is_none());
    }

    #[test]
    fn from_file_reads_nested_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[search]
app_id = "APPID"
api_key = "key"
prefix = "site_"
result_limit = 3

[search.options]
hitsPerPage = 3

[search.transport]
timeout_seconds = 2

[render]
enabled = false
"#,
        )
        .unwrap();

        let config = HostConfig::from_file(&path).unwrap();
        assert_eq!(config.search.prefix.as_deref(), Some("site_"));
        assert_eq!(config.search.result_limit, 3);
        assert_eq!(config.search.transport.timeout_seconds, 2);
        assert_eq!(
            config.search.options.iter().next().map(|(k, _)| k.as_str()),
            Some("hitsPerPage")
        );
        assert!(!config.render.enabled);
    }

    #[test]
    fn from_file_rejects_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[search\napp_id = ").unwrap();

        let err = HostConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, HostError::Config(_)));
    }

    #[test]
    fn load_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = HostConfig::load(Some(dir.path().join("absent.toml").as_path())).unwrap_err();
        assert!(matches!(err, HostError::Io(_)));
    }

    #[test]
    fn env_overrides_replace_credentials() {
        let env: HashMap<&str, &str> = [
            (APP_ID_ENV, "ENVAPP"),
            (API_KEY_ENV, "env-key"),
            (PREFIX_ENV, ""),
        ]
        .into_iter()
        .collect();

        let mut config = HostConfig::default();
        config.search.prefix = Some("file_".into());
        config.apply_env_overrides(|name| env.get(name).map(|v| (*v).to_owned()));

        assert_eq!(config.search.app_id.as_deref(), Some("ENVAPP"));
        assert_eq!(config.search.api_key.as_deref(), Some("env-key"));
        assert_eq!(config.search.prefix.as_deref(), Some("file_"));
    }

    #[test]
    fn renderer_disabled() {
        let mut config = HostConfig::default();
        config.render.enabled = false;
        assert!(config.renderer().unwrap().is_none());
    }

    #[test]
    fn renderer_from_template_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("group.html");
        std::fs::write(&path, "<b>{{ title }}</b>").unwrap();

        let mut config = HostConfig::default();
        config.render.template = Some(path);
        assert!(config.renderer().unwrap().is_some());
    }

    #[test]
    fn renderer_missing_template_file_fails() {
        let mut config = HostConfig::default();
        config.render.template = Some(PathBuf::from("/nonexistent/quicksearch/group.html"));
        assert!(matches!(config.renderer(), Err(HostError::Io(_))));
    }
}
