//! Project configuration (`zubora.yaml`).
//!
//! Every field is optional; missing fields fall back to the defaults of
//! `TemplateOptions` and `Dialect`. Command-line flags override the file.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use crate::parser::Dialect;
use crate::synth::{TemplateOptions, TestStyle};

/// Config file names searched for in the working directory.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["zubora.yaml", ".zubora.yaml"];

/// Largest accepted indentation width.
const MAX_INDENT: usize = 8;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Config {
    /// Import specifier for the module under test. When unset, generated
    /// files import their sibling source file.
    #[serde(default)]
    pub module_path: Option<String>,
    #[serde(default)]
    pub style: TestStyle,
    #[serde(default = "default_indent")]
    pub indent: usize,
    /// Dialect for sources without a recognizable extension (stdin).
    #[serde(default)]
    pub dialect: Dialect,
    /// Glob patterns for paths skipped during directory generation.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Infix of generated file names: `<stem>.<test_suffix>.<ext>`.
    #[serde(default = "default_test_suffix")]
    pub test_suffix: String,
}

fn default_indent() -> usize {
    2
}

fn default_test_suffix() -> String {
    "test".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            module_path: None,
            style: TestStyle::default(),
            indent: default_indent(),
            dialect: Dialect::default(),
            exclude: Vec::new(),
            test_suffix: default_test_suffix(),
        }
    }
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse_str(&content)
    }

    pub fn parse_str(content: &str) -> anyhow::Result<Self> {
        // An empty file is a valid, all-defaults config
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Template options for a module imported from `module_path`.
    ///
    /// A configured `module_path` wins over the one passed in.
    pub fn to_options(&self, module_path: &str) -> TemplateOptions {
        TemplateOptions {
            module_path: self
                .module_path
                .clone()
                .unwrap_or_else(|| module_path.to_string()),
            style: self.style,
            indent: self.indent,
        }
    }

    /// Compile the `exclude` globs.
    pub fn exclude_set(&self) -> anyhow::Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude {
            let glob = Glob::new(pattern)
                .map_err(|e| anyhow::anyhow!("invalid exclude pattern {:?}: {}", pattern, e))?;
            builder.add(glob);
        }
        Ok(builder.build()?)
    }

    /// Whether `name` looks like a test file this config would generate.
    pub fn is_test_file(&self, name: &str) -> bool {
        let infix = format!(".{}.", self.test_suffix);
        name.contains(&infix) || name.contains(".spec.")
    }
}

/// Validate a config for correctness.
pub fn validate(config: &Config) -> anyhow::Result<()> {
    if config.indent == 0 || config.indent > MAX_INDENT {
        anyhow::bail!("invalid indent {}, must be between 1 and {}", config.indent, MAX_INDENT);
    }

    if config.test_suffix.is_empty()
        || !config
            .test_suffix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        anyhow::bail!(
            "invalid test_suffix {:?}, must be a non-empty word such as 'test' or 'spec'",
            config.test_suffix
        );
    }

    if let Some(path) = &config.module_path {
        if path.trim().is_empty() {
            anyhow::bail!("module_path must not be empty");
        }
    }

    config.exclude_set()?;

    Ok(())
}

/// Find a config file: the working directory first, then the user config
/// directory.
pub fn discover() -> Option<PathBuf> {
    discover_in(Path::new(".")).or_else(|| {
        let dirs = ProjectDirs::from("", "", "zubora")?;
        discover_in(dirs.config_dir())
    })
}

/// Find a config file directly inside `dir`.
pub fn discover_in(dir: &Path) -> Option<PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Load an explicit config, a discovered one, or the defaults.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<Config> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => discover(),
    };

    let config = match path {
        Some(path) => {
            log::debug!("loading config from {}", path.display());
            Config::parse_file(&path)
                .map_err(|e| anyhow::anyhow!("failed to parse {}: {}", path.display(), e))?
        }
        None => Config::default(),
    };

    validate(&config).map_err(|e| anyhow::anyhow!("invalid config: {}", e))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let yaml = r#"
module_path: "../src/index"
style: vitest
indent: 4
dialect: javascript
exclude:
  - "**/generated/**"
test_suffix: spec
"#;
        let config = Config::parse_str(yaml).unwrap();
        assert_eq!(config.module_path.as_deref(), Some("../src/index"));
        assert_eq!(config.style, TestStyle::Vitest);
        assert_eq!(config.indent, 4);
        assert_eq!(config.dialect, Dialect::JavaScript);
        assert_eq!(config.exclude.len(), 1);
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse_str("").unwrap();
        assert_eq!(config, Config::default());
        let options = config.to_options("./widget");
        assert_eq!(options.module_path, "./widget");
        assert_eq!(options.indent, 2);
        assert_eq!(options.style, TestStyle::Jest);
    }

    #[test]
    fn test_module_path_override() {
        let config = Config::parse_str("module_path: '@app/core'").unwrap();
        assert_eq!(config.to_options("./widget").module_path, "@app/core");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = Config::parse_str("indent: 0").unwrap();
        assert!(validate(&config).is_err());

        let config = Config::parse_str("test_suffix: 'a b'").unwrap();
        assert!(validate(&config).is_err());

        let config = Config::parse_str("exclude: ['a/[']").unwrap();
        assert!(validate(&config).is_err());

        assert!(Config::parse_str("style: mocha").is_err());
    }

    #[test]
    fn test_exclude_set_and_test_files() {
        let config = Config::parse_str("exclude: ['**/legacy/**']").unwrap();
        let set = config.exclude_set().unwrap();
        assert!(set.is_match("src/legacy/old.ts"));
        assert!(!set.is_match("src/new.ts"));

        assert!(config.is_test_file("widget.test.ts"));
        assert!(config.is_test_file("widget.spec.ts"));
        assert!(!config.is_test_file("widget.ts"));
    }

    #[test]
    fn test_discover_in() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_in(dir.path()).is_none());
        std::fs::write(dir.path().join(".zubora.yaml"), "indent: 4\n").unwrap();
        let found = discover_in(dir.path()).unwrap();
        assert!(found.ends_with(".zubora.yaml"));
        assert_eq!(Config::parse_file(found).unwrap().indent, 4);
    }
}
