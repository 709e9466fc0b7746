//! Server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::rules::{OperationalRules, RulesError};

/// Environment variable naming the station CSV.
pub const STATION_MAP_PATH_VAR: &str = "STATION_MAP_PATH";

/// Environment variable naming an optional rule table JSON file.
pub const RULES_PATH_VAR: &str = "RULES_PATH";

/// Environment variable for the listen address.
pub const BIND_ADDR_VAR: &str = "BIND_ADDR";

/// Error reading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is unset or empty
    #[error("{name} is not set")]
    MissingVar { name: &'static str },

    /// The bind address is not `<ip>:<port>`
    #[error("invalid {name} {value:?}: {source}")]
    InvalidAddr {
        name: &'static str,
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

/// Configuration for the route server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Station list CSV.
    pub station_map_path: PathBuf,

    /// Rule table JSON. The built-in table is used when unset.
    pub rules_path: Option<PathBuf>,

    /// Address the HTTP server listens on.
    pub bind_addr: SocketAddr,
}

impl ServerConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        station_map_path: impl Into<PathBuf>,
        rules_path: Option<PathBuf>,
        bind_addr: SocketAddr,
    ) -> Self {
        Self {
            station_map_path: station_map_path.into(),
            rules_path,
            bind_addr,
        }
    }

    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let station_map_path = var(STATION_MAP_PATH_VAR).ok_or(ConfigError::MissingVar {
            name: STATION_MAP_PATH_VAR,
        })?;

        let bind_addr = match var(BIND_ADDR_VAR) {
            Some(value) => value.trim().parse().map_err(|source| ConfigError::InvalidAddr {
                name: BIND_ADDR_VAR,
                value,
                source,
            })?,
            None => defaults.bind_addr,
        };

        Ok(Self {
            station_map_path: station_map_path.into(),
            rules_path: var(RULES_PATH_VAR).map(PathBuf::from),
            bind_addr,
        })
    }

    /// Load the configured rule table, or the built-in one.
    pub fn load_rules(&self) -> Result<OperationalRules, RulesError> {
        match &self.rules_path {
            Some(path) => OperationalRules::from_path(path),
            None => OperationalRules::builtin(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            station_map_path: PathBuf::from("data/stations.csv"),
            rules_path: None,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn default_config() {
        let config = ServerConfig::default();

        assert_eq!(config.station_map_path, PathBuf::from("data/stations.csv"));
        assert_eq!(config.rules_path, None);
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn reads_all_vars() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("STATION_MAP_PATH", "/srv/stations.csv"),
            ("RULES_PATH", "/srv/rules.json"),
            ("BIND_ADDR", "0.0.0.0:8080"),
        ]))
        .unwrap();

        assert_eq!(
            config,
            ServerConfig::new(
                "/srv/stations.csv",
                Some(PathBuf::from("/srv/rules.json")),
                "0.0.0.0:8080".parse().unwrap(),
            )
        );
    }

    #[test]
    fn optional_vars_default() {
        let config =
            ServerConfig::from_lookup(lookup(&[("STATION_MAP_PATH", "map.csv"), ("RULES_PATH", "")]))
                .unwrap();

        assert_eq!(config.rules_path, None);
        assert_eq!(config.bind_addr, ServerConfig::default().bind_addr);
    }

    #[test]
    fn station_map_is_required() {
        let err = ServerConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar { name } if name == "STATION_MAP_PATH"));
        assert_eq!(err.to_string(), "STATION_MAP_PATH is not set");
    }

    #[test]
    fn bad_bind_addr() {
        let err = ServerConfig::from_lookup(lookup(&[
            ("STATION_MAP_PATH", "map.csv"),
            ("BIND_ADDR", "localhost"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAddr { ref value, .. } if value == "localhost"));
    }

    #[test]
    fn loads_builtin_rules_without_path() {
        let rules = ServerConfig::default().load_rules().unwrap();
        assert!(rules.line("DT").is_some());
        assert!(rules.fallback().is_some());
    }

    #[test]
    fn loads_rules_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "NS": {{ "default": {{ "sameLineMinutes": 3, "transferMinutes": 4 }} }} }}"#
        )
        .unwrap();

        let config = ServerConfig {
            rules_path: Some(file.path().to_path_buf()),
            ..ServerConfig::default()
        };
        let rules = config.load_rules().unwrap();

        assert!(rules.line("NS").is_some());
        assert!(rules.fallback().is_none());
    }
}
