//! Configuration loading with multi-layer merge

use super::BackendConfig;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Top-level upgrade-triage configuration
///
/// Files deserialize through `RawConfig` below and merge into this; the
/// built-in backend chain only exists here.
#[derive(Debug, Clone)]
pub struct TriageConfig {
    /// Global defaults
    pub defaults: Defaults,

    /// Ordered backend chain, tried first-to-last
    pub backends: Vec<BackendConfig>,
}

/// Global default settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Defaults {
    /// Directory that input file paths are resolved against
    #[serde(default = "default_source_root")]
    pub source_root: PathBuf,

    /// Attempts per row before it is skipped
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Default timeout in seconds for backend requests
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Maximum characters of source content included in a prompt
    #[serde(default = "default_content_limit")]
    pub content_limit: usize,
}

fn default_source_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_max_attempts() -> u32 {
    3
}

fn default_timeout() -> u64 {
    300 // 5 minutes
}

fn default_content_limit() -> usize {
    12_000
}

/// The built-in chain, cheaper/faster models first
fn default_backends() -> Vec<BackendConfig> {
    [
        "llama3-8b-8192",
        "mixtral-8x7b-32768",
        "llama3-70b-8192",
        "gemma-7b-it",
    ]
    .into_iter()
    .map(BackendConfig::for_model)
    .collect()
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            source_root: default_source_root(),
            max_attempts: default_max_attempts(),
            timeout: default_timeout(),
            content_limit: default_content_limit(),
        }
    }
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            defaults: Defaults::default(),
            backends: default_backends(),
        }
    }
}

impl TriageConfig {
    /// Load configuration from the standard hierarchy
    ///
    /// Load order (later overrides earlier):
    /// 1. Built-in defaults
    /// 2. ~/.config/upgrade-triage/config.toml
    /// 3. .upgrade-triage/config.toml (project)
    ///
    /// An explicit path bypasses the hierarchy entirely.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = explicit {
            let file_config = Self::load_file(path)?;
            config.merge(file_config);
            return Ok(config);
        }

        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                let user_config = Self::load_file(&user_config_path)?;
                config.merge(user_config);
            }
        }

        let project_config_path = PathBuf::from(".upgrade-triage/config.toml");
        if project_config_path.exists() {
            let project_config = Self::load_file(&project_config_path)?;
            config.merge(project_config);
        }

        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: RawConfig = toml::from_str(&contents)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config.into())
    }

    /// Get the user config path (~/.config/upgrade-triage/config.toml)
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("upgrade-triage/config.toml"))
    }

    /// Merge another config into this one (other takes precedence)
    ///
    /// Backends are an ordered chain, so a file that declares any backend
    /// replaces the whole list rather than merging by name.
    pub fn merge(&mut self, other: Self) {
        if other.defaults.source_root != default_source_root() {
            self.defaults.source_root = other.defaults.source_root;
        }
        if other.defaults.max_attempts != default_max_attempts() {
            self.defaults.max_attempts = other.defaults.max_attempts;
        }
        if other.defaults.timeout != default_timeout() {
            self.defaults.timeout = other.defaults.timeout;
        }
        if other.defaults.content_limit != default_content_limit() {
            self.defaults.content_limit = other.defaults.content_limit;
        }

        if !other.backends.is_empty() {
            self.backends = other.backends;
        }
    }

    /// Fill in the API key for backends that don't set one
    pub fn fill_missing_api_keys(&mut self, key: &str) {
        for backend in &mut self.backends {
            if backend.api_key.is_none() {
                backend.api_key = Some(key.to_string());
            }
        }
    }

    /// Get all enabled backends in chain order
    pub fn enabled_backends(&self) -> impl Iterator<Item = &BackendConfig> {
        self.backends.iter().filter(|b| b.enabled)
    }
}

/// File representation: a file with no [[backends]] tables means "keep the
/// built-in chain", which `#[serde(default)]` on a Vec can't distinguish
/// from an intentionally empty list.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    defaults: Defaults,
    #[serde(default)]
    backends: Vec<BackendConfig>,
}

impl From<RawConfig> for TriageConfig {
    fn from(raw: RawConfig) -> Self {
        Self {
            defaults: raw.defaults,
            backends: raw.backends,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = TriageConfig::default();
        assert_eq!(config.backends.len(), 4);
        assert_eq!(config.backends[0].model, "llama3-8b-8192");
        assert_eq!(config.defaults.max_attempts, 3);
        assert_eq!(config.defaults.content_limit, 12_000);
    }

    #[test]
    fn test_load_config_file() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.toml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            r#"
            [defaults]
            source_root = "/srv/checkouts/onprem9"
            max_attempts = 5

            [[backends]]
            model = "llama3-70b-8192"

            [[backends]]
            model = "gemma-7b-it"
            enabled = false
        "#
        )
        .unwrap();

        let config = TriageConfig::load_file(&config_path).unwrap();
        assert_eq!(
            config.defaults.source_root,
            PathBuf::from("/srv/checkouts/onprem9")
        );
        assert_eq!(config.defaults.max_attempts, 5);
        assert_eq!(config.backends.len(), 2);
        assert_eq!(config.enabled_backends().count(), 1);
    }

    #[test]
    fn test_config_merge_replaces_chain() {
        let mut base = TriageConfig::default();

        let mut override_config = TriageConfig::default();
        override_config.backends = vec![BackendConfig::for_model("llama3-70b-8192")];
        override_config.defaults.timeout = 60;

        base.merge(override_config);

        assert_eq!(base.backends.len(), 1);
        assert_eq!(base.backends[0].model, "llama3-70b-8192");
        assert_eq!(base.defaults.timeout, 60);
        // Untouched defaults survive
        assert_eq!(base.defaults.max_attempts, 3);
    }

    #[test]
    fn test_merge_empty_keeps_defaults() {
        let mut base = TriageConfig::default();
        let empty = TriageConfig {
            backends: Vec::new(),
            ..Default::default()
        };

        base.merge(empty);
        assert_eq!(base.backends.len(), 4);
    }

    #[test]
    fn test_fill_missing_api_keys() {
        let mut config = TriageConfig::default();
        config.backends[1].api_key = Some("explicit".into());

        config.fill_missing_api_keys("from-env");

        assert_eq!(config.backends[0].api_key, Some("from-env".into()));
        assert_eq!(config.backends[1].api_key, Some("explicit".into()));
    }
}
