//! Configuration loading and types

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use vagrant_inventory_core::{HostVars, InventoryError, Meta, VarMap};

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "VAGRANT_INVENTORY_CONFIG";

const CONFIG_FILE: &str = "vagrant-inventory.toml";

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log level used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// How to invoke vagrant
    #[serde(default)]
    pub vagrant: VagrantConfig,
    /// Extra variables per host FQDN, added to the built-in hostvars
    #[serde(default)]
    pub hostvars: BTreeMap<String, VarMap>,
}

/// vagrant invocation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VagrantConfig {
    /// Name or path of the vagrant binary
    #[serde(default = "default_binary")]
    pub binary: String,
    /// Directory holding the Vagrantfile
    pub working_dir: Option<PathBuf>,
    /// Timeout per vagrant command in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            vagrant: VagrantConfig::default(),
            hostvars: BTreeMap::new(),
        }
    }
}

impl Default for VagrantConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            working_dir: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_binary() -> String {
    "vagrant".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl VagrantConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from file
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &Path) -> eyre::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| eyre::eyre!("cannot read {}: {e}", path.display()))?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// Returns error if the text is not valid configuration
    pub fn parse(content: &str) -> eyre::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Load from an explicit path, the environment, default paths, or use defaults
    ///
    /// The second element is the file that was read, if any.
    ///
    /// # Errors
    /// Returns error if a config file exists but cannot be loaded
    pub fn load_default(explicit: Option<&Path>) -> eyre::Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }

        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            return Ok((Self::load(&path)?, Some(path)));
        }

        let paths = [
            Some(PathBuf::from(CONFIG_FILE)),
            dirs::config_dir().map(|p| p.join("vagrant-inventory").join(CONFIG_FILE)),
        ];

        for path in paths.into_iter().flatten() {
            if path.exists() {
                return Ok((Self::load(&path)?, Some(path)));
            }
        }

        Ok((Config::default(), None))
    }

    /// Extra hostvars as a `_meta` block
    ///
    /// # Errors
    /// [`InventoryError::UnknownHost`] for a name outside the lab.
    pub fn extra_meta(&self) -> Result<Meta, InventoryError> {
        let hostvars = HostVars::from_partial(
            self.hostvars
                .iter()
                .map(|(host, vars)| (host.clone(), vars.clone())),
        )?;
        Ok(Meta::new(hostvars))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.vagrant.binary, "vagrant");
        assert_eq!(config.vagrant.timeout(), Duration::from_secs(60));
        assert!(config.vagrant.working_dir.is_none());
        assert!(config.hostvars.is_empty());
    }

    #[test]
    fn test_full_config() {
        let config = Config::parse(
            r#"
log_level = "debug"

[vagrant]
binary = "/usr/local/bin/vagrant"
working_dir = "/srv/lab"
timeout_secs = 5

[hostvars."vm01.vagrant.home"]
ansible_user = "vagrant"
k8s_pod_cidr = "10.244.0.0/16"
"#,
        )
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.vagrant.binary, "/usr/local/bin/vagrant");
        assert_eq!(config.vagrant.working_dir, Some(PathBuf::from("/srv/lab")));
        assert_eq!(config.vagrant.timeout(), Duration::from_secs(5));

        let meta = config.extra_meta().unwrap();
        assert_eq!(
            serde_json::to_value(meta.hostvars().get("vm01.vagrant.home")).unwrap(),
            json!({"ansible_user": "vagrant", "k8s_pod_cidr": "10.244.0.0/16"})
        );
    }

    #[test]
    fn test_unknown_hostvars_host() {
        let config = Config::parse("[hostvars.\"vm09.vagrant.home\"]\nx = 1\n").unwrap();
        assert!(matches!(
            config.extra_meta(),
            Err(InventoryError::UnknownHost(_))
        ));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(Config::parse("log_level = ").is_err());
    }
}
