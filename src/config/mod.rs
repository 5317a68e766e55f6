//! Configuration files.
//!
//! Settings come from TOML files read in a fixed order, each one overriding
//! the keys set by the ones before it:
//!
//! 1. `/etc/isidore.toml`
//! 2. `/usr/local/etc/isidore.toml`
//! 3. `~/.isidore.toml`
//! 4. `./isidore.toml`
//!
//! A file named on the command line replaces the whole search.
//!
//! ```toml
//! [database]
//! path = "/var/lib/isidore/isidore.db"
//!
//! [log]
//! level = "info"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

use crate::error::{IsidoreError, Result};

/// Database file used when no configuration names one.
pub const DEFAULT_DATABASE: &str = "isidore.db";

/// Name of the per-directory and system-wide configuration files.
pub const CONFIG_FILE: &str = "isidore.toml";

/// Merged configuration.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub log: LogConfig,
}

#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file. `:memory:` opens a throwaway database.
    pub path: Option<PathBuf>,
}

#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive for the log subscriber, e.g. `info` or `isidore=debug`.
    pub level: Option<String>,
}

impl FromStr for Config {
    type Err = toml::de::Error;

    fn from_str(data: &str) -> std::result::Result<Self, Self::Err> {
        toml::de::from_str(data)
    }
}

impl Config {
    /// Files searched when no explicit configuration is given, lowest
    /// priority first.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from("/etc").join(CONFIG_FILE),
            PathBuf::from("/usr/local/etc").join(CONFIG_FILE),
        ];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(format!(".{}", CONFIG_FILE)));
        }
        paths.push(PathBuf::from(CONFIG_FILE));
        paths
    }

    /// Load `explicit` alone if given, else layer every file of
    /// [`Config::search_paths`] that exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::read(path)?.ok_or_else(|| {
                IsidoreError::Config(format!("{}: file not found", path.display()))
            }),
            None => Self::load_layers(&Self::search_paths()),
        }
    }

    /// Layer the given files in order. Missing files are skipped.
    pub fn load_layers<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut config = Config::default();
        for path in paths {
            if let Some(layer) = Self::read(path.as_ref())? {
                config.merge(layer);
            }
        }
        Ok(config)
    }

    fn read(path: &Path) -> Result<Option<Self>> {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(IsidoreError::Config(format!("{}: {}", path.display(), e)))
            }
        };
        let config = data
            .parse::<Config>()
            .map_err(|e| IsidoreError::Config(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "loaded configuration file");
        Ok(Some(config))
    }

    /// Keys set in `other` win.
    pub fn merge(&mut self, other: Config) {
        if other.database.path.is_some() {
            self.database.path = other.database.path;
        }
        if other.log.level.is_some() {
            self.log.level = other.log.level;
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.database
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE))
    }

    pub fn log_level(&self) -> Option<&str> {
        self.log.level.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, data: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, data).unwrap();
        path
    }

    #[test]
    fn test_parse_config() {
        let config: Config = indoc! {r#"
            [database]
            path = "/var/lib/isidore/isidore.db"

            [log]
            level = "info"
        "#}
        .parse()
        .unwrap();
        assert_eq!(
            config.database_path(),
            PathBuf::from("/var/lib/isidore/isidore.db")
        );
        assert_eq!(config.log_level(), Some("info"));
    }

    #[test]
    fn test_defaults() {
        let config: Config = "".parse().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.database_path(), PathBuf::from(DEFAULT_DATABASE));
        assert_eq!(config.log_level(), None);
    }

    #[test]
    fn test_later_layers_override() {
        let dir = TempDir::new().unwrap();
        let system = write(
            &dir,
            "system.toml",
            "[database]\npath = \"/srv/a.db\"\n[log]\nlevel = \"debug\"\n",
        );
        let local = write(&dir, "local.toml", "[database]\npath = \"b.db\"\n");
        let missing = dir.path().join("missing.toml");

        let config = Config::load_layers(&[system, missing, local]).unwrap();
        assert_eq!(config.database_path(), PathBuf::from("b.db"));
        assert_eq!(config.log_level(), Some("debug"));
    }

    #[test]
    fn test_malformed_file_is_named() {
        let dir = TempDir::new().unwrap();
        let bad = write(&dir, "bad.toml", "[database\npath = 1");
        let err = Config::load_layers(&[&bad]).unwrap_err();
        assert!(matches!(err, IsidoreError::Config(_)));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            Config::load(Some(&missing)),
            Err(IsidoreError::Config(_))
        ));

        let given = write(&dir, "given.toml", "[log]\nlevel = \"trace\"\n");
        let config = Config::load(Some(&given)).unwrap();
        assert_eq!(config.log_level(), Some("trace"));
    }
}
