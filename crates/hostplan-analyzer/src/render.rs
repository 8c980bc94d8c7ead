//! Deployment variables for the provisioning playbook.

use anyhow::Context;
use hostplan_core::config::DeploymentSettings;
use hostplan_core::inventory::scalar_string;
use hostplan_core::{
    ContainerVariables, DeploymentVariables, DerivedConfiguration, Inventory, NetworkInterfaces,
    Settings, SystemCapabilities,
};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("System does not meet deployment requirements:{}", bullets(.errors))]
    NotReady { errors: Vec<String> },
}

fn bullets(items: &[String]) -> String {
    items.iter().map(|item| format!("\n  - {item}")).collect()
}

/// A deployable analysis together with the variables rendered from it.
#[derive(Debug, Clone)]
pub struct DeploymentPlan {
    pub derived: DerivedConfiguration,
    pub variables: DeploymentVariables,
}

/// Analyze `inventory` and build the playbook variables.
///
/// Fails with [`RenderError::NotReady`], carrying every recorded error, when
/// the host is not fit for deployment. Warnings stay on the returned plan.
pub fn render_deployment_variables(
    inventory: &Inventory,
    settings: &Settings,
) -> Result<DeploymentPlan, RenderError> {
    let derived = crate::analyze(inventory, settings);

    if !derived.deployment_ready {
        return Err(RenderError::NotReady {
            errors: derived.errors.clone(),
        });
    }

    let variables = build_variables(&derived, &settings.deployment);
    tracing::info!(
        warnings = derived.warnings.len(),
        storage = %variables.proxmox_storage,
        "Rendered deployment variables"
    );

    Ok(DeploymentPlan { derived, variables })
}

pub fn build_variables(
    derived: &DerivedConfiguration,
    deployment: &DeploymentSettings,
) -> DeploymentVariables {
    let hw = &derived.hardware_resources;
    let net = &derived.networking;

    let containers = hw.container_allocations.map(|role, allocation| {
        let identity = deployment.containers.get(role);
        ContainerVariables {
            vmid: identity.vmid,
            hostname: identity.hostname.clone(),
            cores: allocation.cpu,
            memory: allocation.memory,
            swap: allocation.swap,
            rootfs_size: allocation.disk,
        }
    });

    DeploymentVariables {
        proxmox_storage: deployment.storage.clone(),
        containers,
        network_interfaces: NetworkInterfaces {
            primary: net.primary_interface.clone(),
            detected: net.detected_interfaces.iter().map(|i| i.name.clone()).collect(),
        },
        system_capabilities: SystemCapabilities {
            total_cpu_cores: hw.cpu.total_cores,
            total_memory_gb: hw.memory.total_gb,
            total_storage_gb: hw.storage.root_available_gb,
            architecture: derived.software_resources.operating_system.architecture.clone(),
        },
    }
}

impl DeploymentPlan {
    /// The variables file: a comment header followed by the YAML document.
    pub fn to_yaml_document(&self) -> anyhow::Result<String> {
        let timestamp = self
            .derived
            .collection_metadata
            .get("timestamp")
            .and_then(scalar_string)
            .unwrap_or_else(|| "N/A".to_string());
        let architecture =
            scalar_string(&self.derived.software_resources.operating_system.architecture)
                .unwrap_or_else(|| "N/A".to_string());

        let body = serde_yaml::to_string(&self.variables)
            .context("Failed to serialize deployment variables")?;

        let mut out = String::from("---\n");
        out.push_str("# Generated by hostplan from host inventory\n");
        out.push_str(&format!("# Timestamp: {timestamp}\n"));
        out.push_str(&format!("# Architecture: {architecture}\n"));
        out.push('\n');
        out.push_str(&body);
        Ok(out)
    }

    pub fn write_variables_file(&self, path: &Path) -> anyhow::Result<()> {
        let document = self.to_yaml_document()?;
        std::fs::write(path, document)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "Wrote deployment variables");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostplan_core::ContainerRole;
    use serde_json::json;

    fn ready_inventory() -> Inventory {
        Inventory::from_value(json!({
            "collection_metadata": { "timestamp": "2024-05-01T12:00:00Z" },
            "detected_architecture": "x86_64",
            "get_hardware_info": { "data": {
                "cpu_cores": "16",
                "memory_total": "65536 MB",
                "memory_available": "61000 MB",
                "disk_info": [{ "mountpoint": "/", "available": "900G" }]
            }},
            "get_ip_info": { "data": {
                "eno1": { "ipv4_address": "192.0.2.10" },
                "eno2": { "ipv4_address": "192.0.2.11" }
            }},
            "get_virtualization_info": { "data": { "virt_type": "kvm" } }
        }))
        .unwrap()
    }

    #[test]
    fn test_render_uses_settings_identities() {
        let mut settings = Settings::default();
        settings.deployment.storage = "ceph-pool".to_string();
        settings.deployment.containers.cache.hostname = "redis01".to_string();

        let plan = render_deployment_variables(&ready_inventory(), &settings).unwrap();
        let vars = &plan.variables;
        assert_eq!(vars.proxmox_storage, "ceph-pool");
        assert_eq!(vars.containers.get(ContainerRole::Cache).hostname, "redis01");
        assert_eq!(vars.containers.app.vmid, 100);
        assert_eq!(vars.containers.proxy.hostname, "netbox-proxy");
        assert_eq!(vars.network_interfaces.primary, "eno1");
        assert_eq!(vars.network_interfaces.detected, ["eno1", "eno2"]);
        assert_eq!(vars.system_capabilities.total_cpu_cores, 16);
        assert_eq!(vars.system_capabilities.total_memory_gb, 64);
        assert_eq!(vars.system_capabilities.total_storage_gb, 900);
        assert_eq!(vars.system_capabilities.architecture, "x86_64");
    }

    #[test]
    fn test_not_ready_lists_every_error() {
        let inventory = Inventory::from_value(json!({})).unwrap();
        let err = render_deployment_variables(&inventory, &Settings::default()).unwrap_err();
        let RenderError::NotReady { errors } = &err;
        assert_eq!(errors.len(), 3);
        let message = err.to_string();
        for error in errors {
            assert!(message.contains(&format!("  - {error}")));
        }
    }

    #[test]
    fn test_yaml_document_header() {
        let plan = render_deployment_variables(&ready_inventory(), &Settings::default()).unwrap();
        let document = plan.to_yaml_document().unwrap();
        let mut lines = document.lines();
        assert_eq!(lines.next(), Some("---"));
        assert_eq!(lines.next(), Some("# Generated by hostplan from host inventory"));
        assert_eq!(lines.next(), Some("# Timestamp: 2024-05-01T12:00:00Z"));
        assert_eq!(lines.next(), Some("# Architecture: x86_64"));
        assert_eq!(lines.next(), Some(""));
        assert_eq!(lines.next(), Some("proxmox_storage: local-zfs"));
        assert_eq!(lines.next(), Some("containers:"));
        assert_eq!(lines.next(), Some("  netbox:"));
        assert_eq!(lines.next(), Some("    vmid: 100"));
    }

    #[test]
    fn test_yaml_document_parses_back() {
        let plan = render_deployment_variables(&ready_inventory(), &Settings::default()).unwrap();
        let document = plan.to_yaml_document().unwrap();
        let parsed: DeploymentVariables = serde_yaml::from_str(&document).unwrap();
        assert_eq!(parsed, plan.variables);
    }

    #[test]
    fn test_header_defaults_when_metadata_missing() {
        let mut plan = render_deployment_variables(&ready_inventory(), &Settings::default()).unwrap();
        plan.derived.collection_metadata = json!({});
        plan.derived.software_resources.operating_system.architecture = serde_json::Value::Null;
        let document = plan.to_yaml_document().unwrap();
        assert!(document.contains("# Timestamp: N/A\n"));
        assert!(document.contains("# Architecture: N/A\n"));
    }

    #[test]
    fn test_write_variables_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("host_vars.yml");
        let plan = render_deployment_variables(&ready_inventory(), &Settings::default()).unwrap();
        plan.write_variables_file(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("hostname: netbox-db"));
        assert!(written.contains("rootfs_size: 32"));
    }
}
