//! Configuration
//!
//! Handles discovery and parsing of `goalias.toml`. Values left out of the
//! file fall back to the defaults below; command-line flags override both.

use std::path::{Path, PathBuf};

use goalias_core::path::{DEFAULT_PATTERN, DEFAULT_PROFILE_SEGMENT};
use goalias_core::{AliasError, FunctionPolicy, PathMapper, PrintOptions};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File names searched for in each directory, in order
pub const CONFIG_FILE_NAMES: [&str; 2] = ["goalias.toml", ".goalias.toml"];

/// Per-user configuration file in the home directory
pub const HOME_CONFIG_FILE: &str = ".goalias.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Root configuration from goalias.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoaliasConfig {
    /// Workspace used to resolve package names and import paths
    pub gopath: Option<PathBuf>,

    pub generate: GenerateSection,
    pub profile: ProfileSection,
    pub discovery: DiscoverySection,
}

/// `[generate]`: how alias packages are rendered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateSection {
    /// Write a build constraint at the top of each generated file
    pub build_tag: bool,
    pub build_constraint: String,
    pub functions: FunctionPolicy,
    /// Name of the generated file inside the destination directory
    pub file_name: String,
}

impl Default for GenerateSection {
    fn default() -> Self {
        Self {
            build_tag: false,
            build_constraint: "go1.9".to_string(),
            functions: FunctionPolicy::default(),
            file_name: "models.go".to_string(),
        }
    }
}

impl GenerateSection {
    pub fn print_options(&self) -> PrintOptions {
        PrintOptions {
            build_constraint: self.build_tag.then(|| self.build_constraint.clone()),
            functions: self.functions,
        }
    }
}

/// `[profile]`: how versioned paths map onto profile paths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSection {
    pub name: String,
    /// Root prefix kept in front of every mapped path
    pub root: Option<String>,
    /// Layout regex; see `goalias_core::path`
    pub pattern: Option<String>,
    pub segment: String,
}

impl Default for ProfileSection {
    fn default() -> Self {
        Self {
            name: "latest".to_string(),
            root: None,
            pattern: None,
            segment: DEFAULT_PROFILE_SEGMENT.to_string(),
        }
    }
}

impl ProfileSection {
    pub fn path_mapper(&self) -> Result<PathMapper, AliasError> {
        let mapper = PathMapper::new(self.pattern.as_deref().unwrap_or(DEFAULT_PATTERN))?
            .with_segment(self.segment.clone());
        Ok(match &self.root {
            Some(root) => mapper.with_root(root.clone()),
            None => mapper,
        })
    }
}

/// `[discovery]`: package discovery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoverySection {
    /// Directory names never descended into
    pub skip_dirs: Vec<String>,
    /// Packages buffered between the directory walk and generation
    pub channel_capacity: usize,
}

impl Default for DiscoverySection {
    fn default() -> Self {
        Self {
            skip_dirs: vec!["vendor".to_string(), "testdata".to_string()],
            channel_capacity: 64,
        }
    }
}

impl GoaliasConfig {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Walk up the directory tree from `start_dir` looking for a config file
pub fn discover_config_from(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        for name in CONFIG_FILE_NAMES {
            let candidate = current.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => break,
        }
    }

    None
}

/// Config file for `start_dir`: the nearest one up the tree, then
/// `~/.goalias.toml`.
pub fn discover_config(start_dir: &Path) -> Option<PathBuf> {
    discover_config_from(start_dir).or_else(|| {
        dirs::home_dir()
            .map(|home| home.join(HOME_CONFIG_FILE))
            .filter(|path| path.is_file())
    })
}

/// Load the explicit config file, or the discovered one, or the defaults.
/// Returns the configuration and the file it came from.
pub fn load_config(
    explicit: Option<&Path>,
    start_dir: &Path,
) -> Result<(GoaliasConfig, Option<PathBuf>), ConfigError> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config(start_dir),
    };
    match path {
        Some(path) => {
            tracing::debug!(config = %path.display(), "using config file");
            Ok((GoaliasConfig::load(&path)?, Some(path)))
        }
        None => Ok((GoaliasConfig::default(), None)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = GoaliasConfig::default();
        assert_eq!(config.profile.name, "latest");
        assert_eq!(config.generate.file_name, "models.go");
        assert_eq!(config.discovery.skip_dirs, vec!["vendor", "testdata"]);
        assert_eq!(config.generate.print_options(), PrintOptions::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: GoaliasConfig = toml::from_str(
            r#"
gopath = "/home/dev/go"

[generate]
build_tag = true
functions = "panic"

[profile]
name = "2017-03-09"
root = "github.com/acme/sdk"
"#,
        )
        .unwrap();

        assert_eq!(config.gopath, Some(PathBuf::from("/home/dev/go")));
        assert_eq!(
            config.generate.print_options(),
            PrintOptions {
                build_constraint: Some("go1.9".into()),
                functions: FunctionPolicy::Panic,
            }
        );
        assert_eq!(config.generate.file_name, "models.go");
        assert_eq!(config.profile.name, "2017-03-09");
        assert_eq!(config.profile.segment, "profile");
        assert_eq!(config.discovery, DiscoverySection::default());
    }

    #[test]
    fn test_path_mapper_from_profile_section() {
        let section = ProfileSection {
            root: Some("github.com/acme/sdk".into()),
            segment: "profiles".into(),
            ..ProfileSection::default()
        };
        let mapper = section.path_mapper().unwrap();
        assert_eq!(
            mapper
                .map_path("github.com/acme/sdk/service/storage/2017-06-01/storage", "latest")
                .unwrap(),
            "github.com/acme/sdk/profiles/latest/storage/storage"
        );

        let invalid = ProfileSection {
            pattern: Some("no-groups".into()),
            ..ProfileSection::default()
        };
        assert!(matches!(
            invalid.path_mapper(),
            Err(AliasError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_discover_walks_up() {
        let temp = tempdir().unwrap();
        let nested = temp.path().join("a/b/c");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp.path().join("a/.goalias.toml"), "").unwrap();

        assert_eq!(
            discover_config_from(&nested),
            Some(temp.path().join("a/.goalias.toml"))
        );

        // goalias.toml wins over .goalias.toml in the same directory
        fs::write(temp.path().join("a/goalias.toml"), "").unwrap();
        assert_eq!(
            discover_config_from(&nested),
            Some(temp.path().join("a/goalias.toml"))
        );
    }

    #[test]
    fn test_explicit_config_errors() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("missing.toml");
        assert!(matches!(
            load_config(Some(&missing), temp.path()),
            Err(ConfigError::Io { .. })
        ));

        let broken = temp.path().join("broken.toml");
        fs::write(&broken, "[profile\nname = 1").unwrap();
        assert!(matches!(
            load_config(Some(&broken), temp.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
