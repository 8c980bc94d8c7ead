//! hostplan.toml settings parser.
//!
//! Every section and field is optional. An absent file, or an empty one,
//! yields the stock sizing rules and container identities.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::types::{ContainerRole, PerRole};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub host: HostSettings,
    pub requirements: Requirements,
    pub deployment: DeploymentSettings,
}

/// Resources kept back for the virtualization host itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostSettings {
    pub reserved_cores: u32,
    pub reserved_memory_mb: u64,
}

impl Default for HostSettings {
    fn default() -> Self {
        HostSettings {
            reserved_cores: 2,
            reserved_memory_mb: 2048,
        }
    }
}

/// Hardware thresholds. Below a `min_*` value is an error, below a
/// `recommended_*` value is a warning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Requirements {
    pub min_memory_gb: u64,
    pub recommended_memory_gb: u64,
    pub min_storage_gb: u64,
    pub min_cores: u32,
    pub recommended_cores: u32,
}

impl Default for Requirements {
    fn default() -> Self {
        Requirements {
            min_memory_gb: 8,
            recommended_memory_gb: 16,
            min_storage_gb: 100,
            min_cores: 2,
            recommended_cores: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentSettings {
    /// Storage backend the containers' root filesystems are created on.
    pub storage: String,
    pub containers: ContainerIdentities,
}

impl Default for DeploymentSettings {
    fn default() -> Self {
        DeploymentSettings {
            storage: "local-zfs".to_string(),
            containers: ContainerIdentities::default(),
        }
    }
}

/// Fixed identifiers the playbook uses to create each container.
///
/// A role table replaces that role's identity wholesale; roles left out keep
/// their defaults. The application container's table is `netbox` (`app` is
/// accepted too).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerIdentities {
    #[serde(rename = "netbox", alias = "app")]
    pub app: ContainerIdentity,
    pub database: ContainerIdentity,
    pub cache: ContainerIdentity,
    pub proxy: ContainerIdentity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerIdentity {
    pub vmid: u32,
    pub hostname: String,
}

impl ContainerIdentity {
    fn new(vmid: u32, hostname: &str) -> Self {
        ContainerIdentity {
            vmid,
            hostname: hostname.to_string(),
        }
    }
}

impl Default for ContainerIdentities {
    fn default() -> Self {
        ContainerIdentities {
            app: ContainerIdentity::new(100, "netbox"),
            database: ContainerIdentity::new(101, "netbox-db"),
            cache: ContainerIdentity::new(102, "netbox-redis"),
            proxy: ContainerIdentity::new(103, "netbox-proxy"),
        }
    }
}

impl ContainerIdentities {
    pub fn by_role(&self) -> PerRole<&ContainerIdentity> {
        PerRole {
            app: &self.app,
            database: &self.database,
            cache: &self.cache,
            proxy: &self.proxy,
        }
    }

    pub fn get(&self, role: ContainerRole) -> &ContainerIdentity {
        *self.by_role().get(role)
    }
}

impl Settings {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load from `path` when given, otherwise use the defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Settings::default()),
        }
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let req = &self.requirements;
        if req.recommended_memory_gb < req.min_memory_gb {
            anyhow::bail!(
                "requirements.recommended_memory_gb ({}) is below min_memory_gb ({})",
                req.recommended_memory_gb,
                req.min_memory_gb
            );
        }
        if req.recommended_cores < req.min_cores {
            anyhow::bail!(
                "requirements.recommended_cores ({}) is below min_cores ({})",
                req.recommended_cores,
                req.min_cores
            );
        }
        if self.deployment.storage.trim().is_empty() {
            anyhow::bail!("deployment.storage cannot be empty");
        }

        let mut vmids = HashSet::new();
        for (role, identity) in self.deployment.containers.by_role().iter() {
            if identity.hostname.trim().is_empty() {
                anyhow::bail!("deployment.containers.{role}.hostname cannot be empty");
            }
            if !vmids.insert(identity.vmid) {
                anyhow::bail!(
                    "deployment.containers.{role}.vmid {} is already used by another container",
                    identity.vmid
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.host.reserved_memory_mb, 2048);
        assert_eq!(settings.requirements.min_storage_gb, 100);
        assert_eq!(settings.deployment.storage, "local-zfs");
        assert_eq!(settings.deployment.containers.get(ContainerRole::Cache).vmid, 102);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_parse_empty() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_parse_partial_override() {
        let toml_str = r#"
[host]
reserved_memory_mb = 4096

[deployment.containers.proxy]
vmid = 210
hostname = "edge"
"#;
        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.host.reserved_memory_mb, 4096);
        assert_eq!(settings.host.reserved_cores, 2);
        assert_eq!(settings.deployment.containers.proxy.hostname, "edge");
        assert_eq!(settings.deployment.containers.app.hostname, "netbox");
        assert_eq!(settings.deployment.storage, "local-zfs");
    }

    #[test]
    fn test_application_table_names() {
        let settings: Settings =
            toml::from_str("[deployment.containers.netbox]\nvmid = 300\nhostname = \"ipam\"\n")
                .unwrap();
        assert_eq!(settings.deployment.containers.app.vmid, 300);

        let settings: Settings =
            toml::from_str("[deployment.containers.app]\nvmid = 301\nhostname = \"ipam\"\n")
                .unwrap();
        assert_eq!(settings.deployment.containers.app.vmid, 301);

        let rendered = Settings::default().to_toml_string().unwrap();
        assert!(rendered.contains("[deployment.containers.netbox]"));
    }

    #[test]
    fn test_validate_duplicate_vmid() {
        let mut settings = Settings::default();
        settings.deployment.containers.proxy.vmid = 100;
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("proxy.vmid 100"));
    }

    #[test]
    fn test_validate_inverted_thresholds() {
        let mut settings = Settings::default();
        settings.requirements.recommended_cores = 1;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_round_trip_toml() {
        let toml_str = Settings::default().to_toml_string().unwrap();
        assert!(toml_str.contains("local-zfs"));
        let parsed: Settings = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, Settings::default());
    }

    #[test]
    fn test_from_file_rejects_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hostplan.toml");
        std::fs::write(&path, "[deployment]\nstorage = \"\"\n").unwrap();
        assert!(Settings::from_file(&path).is_err());
    }
}
