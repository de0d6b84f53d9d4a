//! Optional TOML settings controlling how a volume is assembled.
//!
//! `fluxfs.toml` is looked up in the working directory; a missing file
//! yields the defaults, a malformed one is an error.

use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Default settings-file name.
pub const SETTINGS_FILE: &str = "fluxfs.toml";

/// Default scan-root list location.
pub const DEFAULT_CONF: &str = "scan.conf";

/// Contents of the settings file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub mount: Mount,
}

/// The `[mount]` table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Mount {
    /// Scan-root list location.
    #[serde(default = "default_conf")]
    pub conf: PathBuf,
    /// Load every descriptor at startup instead of on first read.
    #[serde(default)]
    pub eager_load: bool,
}

impl Default for Mount {
    fn default() -> Self {
        Self { conf: default_conf(), eager_load: false }
    }
}

fn default_conf() -> PathBuf {
    PathBuf::from(DEFAULT_CONF)
}

/// Errors produced while loading [`Settings`].
#[derive(Debug)]
pub enum Error {
    /// The settings file exists but could not be read.
    IO(io::Error),
    /// The settings file is not valid TOML or carries unknown keys.
    Parse(toml::de::Error),
}

impl Settings {
    /// Loads settings from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => return Err(Error::IO(err)),
        };
        toml::from_str(&text).map_err(Error::Parse)
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::{Settings, DEFAULT_CONF};

    #[test]
    fn missing_file_yields_defaults() {
        let settings = Settings::load(Path::new("/nonexistent/fluxfs.toml")).unwrap();
        assert_eq!(settings.mount.conf, PathBuf::from(DEFAULT_CONF));
        assert!(!settings.mount.eager_load);
    }

    #[test]
    fn values_override_defaults() {
        let settings: Settings =
            toml::from_str("[mount]\nconf = \"roots.list\"\neager_load = true\n").unwrap();
        assert_eq!(settings.mount.conf, PathBuf::from("roots.list"));
        assert!(settings.mount.eager_load);
    }

    #[test]
    fn partial_tables_keep_defaults() {
        let settings: Settings = toml::from_str("[mount]\neager_load = true\n").unwrap();
        assert_eq!(settings.mount.conf, PathBuf::from(DEFAULT_CONF));
        assert!(settings.mount.eager_load);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<Settings>("[mount]\nwritable = true\n").is_err());
    }
}
