use markdown_relink_engine::Options;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "relink.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid exclude pattern '{pattern}': {source}")]
    InvalidExclude {
        pattern: String,
        source: glob::PatternError,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the docs tree; every link is resolved within it.
    pub docs_path: PathBuf,
    /// Whether pages are served as directories. When off, resolved paths
    /// without an extension get `.md`.
    pub use_directory_urls: bool,
    /// Glob patterns, relative to `docs_path`, for files that are neither
    /// rewritten nor link targets.
    pub exclude: Vec<String>,
    pub links: Options,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            docs_path: PathBuf::from("docs"),
            use_directory_urls: true,
            exclude: Vec::new(),
            links: Options::default(),
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the docs path
        config.docs_path = Self::expand_path(&config.docs_path).unwrap_or(config.docs_path);

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    /// `relink.toml` in the working directory.
    pub fn config_path() -> PathBuf {
        PathBuf::from(CONFIG_FILE_NAME)
    }

    pub fn exclude_patterns(&self) -> Result<Vec<glob::Pattern>, ConfigError> {
        self.exclude
            .iter()
            .map(|pattern| {
                glob::Pattern::new(pattern).map_err(|source| ConfigError::InvalidExclude {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect()
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        assert_eq!(Config::config_path(), PathBuf::from("relink.toml"));
    }

    #[test]
    fn test_defaults_for_empty_file() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.docs_path, PathBuf::from("docs"));
        assert!(config.use_directory_urls);
        assert!(config.links.wikilinks);
        assert!(config.links.reference_links);
        assert!(!config.links.warn_ambiguities);
    }

    #[test]
    fn test_partial_links_table_keeps_other_defaults() {
        let config_content = r#"
use_directory_urls = false

[links]
wikilinks = false
"#;

        let config: Config = toml::from_str(config_content).unwrap();

        assert!(!config.use_directory_urls);
        assert!(!config.links.wikilinks);
        assert!(config.links.reference_links);
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let path = PathBuf::from("~/test/path");
        let expanded = Config::expand_path(&path);

        assert!(expanded.is_some());
        let expanded = expanded.unwrap();
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().contains("test/path"));
    }

    #[test]
    fn test_expand_path_with_relative_path() {
        let path = PathBuf::from("relative/path");
        let expanded = Config::expand_path(&path).unwrap();

        assert_eq!(expanded, path);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_load_invalid_toml_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("relink.toml");
        std::fs::write(&config_file, "docs_path = [unclosed").unwrap();

        let result = Config::load_from_path(&config_file);

        assert!(matches!(result, Err(ConfigError::ConfigParseError { .. })));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("relink.toml");
        let test_config = Config {
            docs_path: PathBuf::from("/tmp/test-docs"),
            use_directory_urls: false,
            exclude: vec!["drafts/**".to_string()],
            links: Options {
                warn_ambiguities: true,
                ..Options::default()
            },
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_docs_path_with_env_var_in_toml() {
        unsafe {
            env::set_var("RELINK_TEST_DOCS_ROOT", "/custom/site");
        }

        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("relink.toml");
        std::fs::write(&config_file, "docs_path = \"$RELINK_TEST_DOCS_ROOT/docs\"\n").unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(config.docs_path, PathBuf::from("/custom/site/docs"));

        unsafe {
            env::remove_var("RELINK_TEST_DOCS_ROOT");
        }
    }

    #[test]
    fn test_exclude_patterns() {
        let config = Config {
            exclude: vec!["drafts/**".to_string(), "*.tmp.md".to_string()],
            ..Config::default()
        };

        let patterns = config.exclude_patterns().unwrap();

        assert!(patterns[0].matches("drafts/wip/page.md"));
        assert!(patterns[1].matches("notes.tmp.md"));
        assert!(!patterns.iter().any(|p| p.matches("guide/setup.md")));
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        let config = Config {
            exclude: vec!["[unclosed".to_string()],
            ..Config::default()
        };

        let err = config.exclude_patterns().unwrap_err();

        assert!(matches!(err, ConfigError::InvalidExclude { .. }));
        assert!(err.to_string().contains("[unclosed"));
    }
}
