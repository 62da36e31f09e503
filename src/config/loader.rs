//! YAML config file discovery and parsing.

use crate::config::defaults::CONFIG_FILE_NAME;
use crate::core::CheckError;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Contents of a config file. Every key is optional.
///
/// ```yaml
/// blacklist_servers:
///   - zen.spamhaus.org
///   - bl.spamcop.net
/// timeout: 20
/// suppress_crit: true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Blacklist zones replacing the built-in list.
    #[serde(alias = "blacklistServers")]
    pub blacklist_servers: Option<Vec<String>>,

    /// Deadline in seconds.
    pub timeout: Option<u64>,

    /// DNS lookup timeout in seconds.
    #[serde(alias = "probeTimeout")]
    pub probe_timeout: Option<u64>,

    /// Log verbosity.
    pub verbosity: Option<u8>,

    /// Report listings as warnings.
    #[serde(alias = "suppresscrit")]
    pub suppress_crit: Option<bool>,
}

/// Reads and parses a config file.
pub fn load_file(path: &Path) -> Result<FileConfig, CheckError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CheckError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    if contents.trim().is_empty() {
        return Ok(FileConfig::default());
    }

    serde_yaml::from_str(&contents).map_err(|e| CheckError::ConfigParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// `~/.dnsbl-check.yaml`, if a home directory can be determined.
pub fn default_config_path() -> Option<PathBuf> {
    Some(dirs::home_dir()?.join(CONFIG_FILE_NAME))
}

/// Finds and loads the config file.
///
/// An explicit path must exist and parse. The default path is skipped when
/// the file is missing.
pub fn discover(explicit: Option<&Path>) -> Result<Option<(PathBuf, FileConfig)>, CheckError> {
    if let Some(path) = explicit {
        let config = load_file(path)?;
        return Ok(Some((path.to_path_buf(), config)));
    }

    match default_config_path() {
        Some(path) if path.is_file() => {
            let config = load_file(&path)?;
            Ok(Some((path, config)))
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_full_file() {
        let file = write_config(concat!(
            "blacklist_servers:\n",
            "  - zen.spamhaus.org\n",
            "  - bl.spamcop.net\n",
            "timeout: 20\n",
            "probe_timeout: 4\n",
            "verbosity: 1\n",
            "suppress_crit: true\n",
        ));

        let config = load_file(file.path()).unwrap();
        assert_eq!(
            config.blacklist_servers,
            Some(vec!["zen.spamhaus.org".to_string(), "bl.spamcop.net".to_string()])
        );
        assert_eq!(config.timeout, Some(20));
        assert_eq!(config.probe_timeout, Some(4));
        assert_eq!(config.verbosity, Some(1));
        assert_eq!(config.suppress_crit, Some(true));
    }

    #[test]
    fn test_load_accepts_aliases() {
        let file = write_config("blacklistServers: [a.example]\nsuppresscrit: true\n");

        let config = load_file(file.path()).unwrap();
        assert_eq!(config.blacklist_servers, Some(vec!["a.example".to_string()]));
        assert_eq!(config.suppress_crit, Some(true));
    }

    #[test]
    fn test_load_empty_file() {
        let file = write_config("\n");
        assert_eq!(load_file(file.path()).unwrap(), FileConfig::default());
    }

    #[test]
    fn test_load_ignores_unknown_keys() {
        let file = write_config("timeout: 3\ncolour: blue\n");
        assert_eq!(load_file(file.path()).unwrap().timeout, Some(3));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let file = write_config("timeout: [not, a, number\n");
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(err, CheckError::ConfigParse { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(err, CheckError::ConfigRead { .. }));
    }

    #[test]
    fn test_discover_explicit_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.yaml");
        assert!(discover(Some(&missing)).is_err());
    }

    #[test]
    fn test_default_config_path_is_in_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(default_config_path(), Some(home.join(".dnsbl-check.yaml")));
        }
    }

    #[test]
    fn test_discover_explicit() {
        let file = write_config("timeout: 9\n");
        let (path, config) = discover(Some(file.path())).unwrap().unwrap();
        assert_eq!(path, file.path());
        assert_eq!(config.timeout, Some(9));
    }
}
