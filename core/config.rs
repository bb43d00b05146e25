use crate::binary::BinaryCheck;
use crate::error::{AppError, Result};
use crate::render::OutputFormat;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILENAME: &str = ".promptcat.toml";

/// Optional per-project defaults, loaded from `.promptcat.toml` in the
/// working directory unless disabled. CLI flags override every field.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub filters: FiltersConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    #[serde(default = "default_true")]
    pub use_gitignore: bool,
    #[serde(default)]
    pub binary_check: BinaryCheck,
    #[serde(default = "default_true")]
    pub lossy_decode: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            use_gitignore: true,
            binary_check: BinaryCheck::default(),
            lossy_decode: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct FiltersConfig {
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

impl Config {
    /// Resolves which config file to load, if any: an explicit path
    /// wins, otherwise the default filename in `cwd` when it exists.
    pub fn resolve_config_path(
        cwd: &Path,
        explicit: Option<&Path>,
        disabled: bool,
    ) -> Option<PathBuf> {
        if disabled {
            log::debug!("Config file loading disabled");
            return None;
        }
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        let default = cwd.join(DEFAULT_CONFIG_FILENAME);
        default.is_file().then_some(default)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        log::debug!("Loading config from {}", path.display());
        let raw = fs::read_to_string(path).map_err(|source| AppError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|e| AppError::TomlParse(format!("{}: {}", path.display(), e)))
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_when_every_section_is_absent() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.general.use_gitignore);
        assert!(config.general.lossy_decode);
        assert_eq!(config.general.binary_check, BinaryCheck::Content);
        assert_eq!(config.output.format, OutputFormat::Default);
        assert!(config.filters.include.is_empty());
    }

    #[test]
    fn parses_a_full_file() {
        let raw = r#"
            [general]
            use_gitignore = false
            binary_check = "extension"
            lossy_decode = false

            [filters]
            include = ["*.rs"]
            exclude = ["target/", "*.lock"]

            [output]
            format = "markdown"
        "#;
        let config: Config = toml::from_str(raw).unwrap();
        assert!(!config.general.use_gitignore);
        assert_eq!(config.general.binary_check, BinaryCheck::Extension);
        assert!(!config.general.lossy_decode);
        assert_eq!(config.filters.include, vec!["*.rs"]);
        assert_eq!(config.filters.exclude.len(), 2);
        assert_eq!(config.output.format, OutputFormat::Markdown);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(toml::from_str::<Config>("[general]\ntypo_field = 1\n").is_err());
    }

    #[test]
    fn resolve_prefers_the_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let explicit = tmp.path().join("other.toml");
        let resolved =
            Config::resolve_config_path(tmp.path(), Some(explicit.as_path()), false).unwrap();
        assert_eq!(resolved, explicit);
    }

    #[test]
    fn resolve_finds_the_default_file_only_when_present() {
        let tmp = TempDir::new().unwrap();
        assert!(Config::resolve_config_path(tmp.path(), None, false).is_none());

        fs::write(tmp.path().join(DEFAULT_CONFIG_FILENAME), "").unwrap();
        assert!(Config::resolve_config_path(tmp.path(), None, false).is_some());
        assert!(Config::resolve_config_path(tmp.path(), None, true).is_none());
    }

    #[test]
    fn load_reports_parse_errors() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILENAME);
        fs::write(&path, "not [valid toml").unwrap();
        assert!(matches!(
            Config::load_from_path(&path),
            Err(AppError::TomlParse(_))
        ));
    }
}
