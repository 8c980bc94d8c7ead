//! Network probe analysis: interface discovery and the bridge/NAT plan.
//!
//! Only the external bridge depends on the inventory. The two private
//! networks and the NAT rule are the same on every host.

use hostplan_core::inventory::probes;
use hostplan_core::{Bridge, Inventory, NatConfiguration, NetworkInterface, Networking};
use std::collections::BTreeMap;

use super::field;
use crate::diagnostics::Diagnostics;

/// Primary interface assumed when the probe reports none.
pub const FALLBACK_INTERFACE: &str = "eth0";

pub const EXTERNAL_BRIDGE: &str = "vmbr0";
pub const BACKEND_BRIDGE: &str = "vmbr1";
pub const DMZ_BRIDGE: &str = "vmbr2";

pub const BACKEND_CIDR: &str = "10.100.0.0/24";
pub const BACKEND_GATEWAY: &str = "10.100.0.1";
pub const DMZ_CIDR: &str = "10.100.1.0/24";
pub const DMZ_GATEWAY: &str = "10.100.1.1";

pub fn analyze_networking(inventory: &Inventory, diagnostics: &mut Diagnostics) -> Networking {
    let interfaces = detect_interfaces(inventory);

    let primary_interface = interfaces
        .first()
        .map(|iface| iface.name.clone())
        .unwrap_or_else(|| FALLBACK_INTERFACE.to_string());

    if interfaces.is_empty() {
        diagnostics.warn("No network interfaces detected - manual network configuration required");
    } else {
        tracing::info!(
            count = interfaces.len(),
            primary = %primary_interface,
            "Detected network interfaces"
        );
    }

    Networking {
        suggested_bridges: suggested_bridges(&primary_interface),
        nat_configuration: NatConfiguration {
            enabled: true,
            source_networks: vec![BACKEND_CIDR.to_string(), DMZ_CIDR.to_string()],
            output_interface: EXTERNAL_BRIDGE.to_string(),
        },
        detected_interfaces: interfaces,
        primary_interface,
    }
}

/// Interfaces carrying an `ipv4_address` member, in probe order.
fn detect_interfaces(inventory: &Inventory) -> Vec<NetworkInterface> {
    let Some(entries) = inventory.probe_data(probes::NETWORK).as_object() else {
        return vec![];
    };

    entries
        .iter()
        .filter(|(_, record)| record.as_object().is_some_and(|r| r.contains_key("ipv4_address")))
        .map(|(name, record)| NetworkInterface {
            name: name.clone(),
            ipv4: field(record, "ipv4_address"),
            ipv6: field(record, "ipv6_address"),
            mac: field(record, "mac_address"),
            state: field(record, "state"),
        })
        .collect()
}

fn suggested_bridges(primary_interface: &str) -> BTreeMap<String, Bridge> {
    let private = |name: &str, cidr: &str, gateway: &str| Bridge {
        comment: format!("{name} network ({cidr})"),
        ports: None,
        cidr: Some(cidr.to_string()),
        gateway: Some(gateway.to_string()),
        bridge_fd: 0,
    };

    BTreeMap::from([
        (
            EXTERNAL_BRIDGE.to_string(),
            Bridge {
                comment: "External network (physical bridge)".to_string(),
                ports: Some(primary_interface.to_string()),
                cidr: None,
                gateway: None,
                bridge_fd: 0,
            },
        ),
        (BACKEND_BRIDGE.to_string(), private("Backend", BACKEND_CIDR, BACKEND_GATEWAY)),
        (DMZ_BRIDGE.to_string(), private("DMZ", DMZ_CIDR, DMZ_GATEWAY)),
    ])
}
