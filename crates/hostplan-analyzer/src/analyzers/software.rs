//! Software probe analysis: OS, virtualization, and package prerequisites.

use hostplan_core::inventory::probes;
use hostplan_core::{Inventory, OperatingSystem, Prerequisites, SoftwareResources, Virtualization};
use serde_json::Value;
use std::collections::BTreeMap;

use super::field;
use crate::diagnostics::Diagnostics;

pub fn analyze_software(inventory: &Inventory, diagnostics: &mut Diagnostics) -> SoftwareResources {
    let os = inventory.probe_data(probes::OS);
    let virt = inventory.probe_data(probes::VIRTUALIZATION);
    let managers = inventory
        .probe_data(probes::PACKAGES)
        .get("package_managers")
        .and_then(Value::as_object);

    let mut package_managers = BTreeMap::new();
    let mut prerequisites = Prerequisites::default();

    for (manager, packages) in managers.into_iter().flatten() {
        let Some(packages) = packages.as_array() else {
            continue;
        };
        if !packages.is_empty() {
            package_managers.insert(manager.clone(), packages.len());
        }
        for name in packages.iter().filter_map(Value::as_str) {
            let name = name.to_lowercase();
            prerequisites.python3 |= name.contains("python3");
            prerequisites.bridge_utils |= name.contains("bridge");
            prerequisites.iptables |= name.contains("iptables");
        }
    }

    tracing::debug!(?package_managers, ?prerequisites, "Scanned installed packages");

    let virtualization = Virtualization {
        virt_type: field(virt, "virt_type"),
        role: field(virt, "virt_role"),
        hypervisor: field(virt, "hypervisor"),
    };

    let virt_type = virtualization.virt_type.as_str().unwrap_or_default().to_lowercase();
    if !virt_type.contains("kvm") && !virt_type.contains("none") {
        diagnostics.warn(format!(
            "Unexpected virtualization type: {virt_type} - Proxmox/KVM expected"
        ));
    }

    SoftwareResources {
        operating_system: OperatingSystem {
            os_name: field(os, "os_name"),
            os_version: field(os, "os_version"),
            kernel: field(os, "kernel_version"),
            architecture: inventory.detected_architecture.clone(),
        },
        virtualization,
        package_managers,
        prerequisites,
    }
}
