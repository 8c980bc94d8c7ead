//! Human-readable report formatting.

use hostplan_core::inventory::scalar_string;
use hostplan_core::{DeploymentVariables, DerivedConfiguration, Readiness};
use serde_json::Value;

pub fn format_report(config: &DerivedConfiguration) -> String {
    let hw = &config.hardware_resources;
    let net = &config.networking;
    let sw = &config.software_resources;
    let os = &sw.operating_system;

    let host = display(&os.os_name, "unknown OS");
    let arch = display(&os.architecture, "unknown");

    let mut out = String::new();

    out.push_str("\n╔══════════════════════════════════════════╗\n");
    out.push_str("║  hostplan Inventory Analysis             ║\n");
    out.push_str("╠══════════════════════════════════════════╣\n");
    out.push_str(&format!("║  Host:     {:<29}║\n", truncate(&host, 29)));
    out.push_str(&format!("║  Arch:     {:<29}║\n", truncate(&arch, 29)));
    out.push_str(&format!("║  Verdict:  {:<29}║\n", config.readiness().label()));
    out.push_str("╚══════════════════════════════════════════╝\n\n");

    out.push_str("Hardware:\n");
    out.push_str(&format!(
        "  CPU:     {} cores ({} available), {}\n",
        hw.cpu.total_cores,
        hw.cpu.available_cores,
        display(&hw.cpu.model, "Unknown")
    ));
    out.push_str(&format!(
        "  Memory:  {} MB total, {} MB reserved for host\n",
        hw.memory.total_mb, hw.memory.reserved_for_host_mb
    ));
    out.push_str(&format!("  Storage: {} GB free on /\n\n", hw.storage.root_available_gb));

    out.push_str("Container allocations:\n");
    for (role, a) in hw.container_allocations.iter() {
        out.push_str(&format!(
            "  {:<9} {} CPU, {:>5} MB RAM, {:>5} MB swap, {:>3} GB disk\n",
            role.as_str(),
            a.cpu,
            a.memory,
            a.swap,
            a.disk
        ));
    }
    out.push('\n');

    out.push_str(&format!("Network (primary: {}):\n", net.primary_interface));
    for (name, bridge) in &net.suggested_bridges {
        out.push_str(&format!("  {name}: {}\n", bridge.comment));
    }
    out.push('\n');

    let check = |present: bool| if present { "✅" } else { "❌" };
    out.push_str("Prerequisites:\n");
    out.push_str(&format!("  {} python3\n", check(sw.prerequisites.python3)));
    out.push_str(&format!("  {} bridge-utils\n", check(sw.prerequisites.bridge_utils)));
    out.push_str(&format!("  {} iptables\n\n", check(sw.prerequisites.iptables)));

    if !config.errors.is_empty() {
        out.push_str("❌ ERRORS:\n\n");
        for (i, e) in config.errors.iter().enumerate() {
            out.push_str(&format!("  {}. {e}\n", i + 1));
        }
        out.push('\n');
    }

    if !config.warnings.is_empty() {
        out.push_str("⚠️  WARNINGS:\n\n");
        for w in &config.warnings {
            out.push_str(&format!("  • {w}\n"));
        }
        out.push('\n');
    }

    if config.readiness() == Readiness::NotReady {
        out.push_str("Resolve the errors above before generating deployment variables.\n");
    }

    out
}

/// Per-container sizing lines printed after a variables file is written.
pub fn format_summary(variables: &DeploymentVariables) -> String {
    let mut out = String::from("  Container allocations:\n");
    for (role, c) in variables.containers.iter() {
        out.push_str(&format!(
            "    - {role}: {} CPU, {}MB RAM, {}GB disk\n",
            c.cores, c.memory, c.rootfs_size
        ));
    }
    out
}

/// Scalars as plain text, structured values as compact JSON.
fn display(value: &Value, missing: &str) -> String {
    match value {
        Value::Null => missing.to_string(),
        other => scalar_string(other).unwrap_or_else(|| other.to_string()),
    }
}

fn truncate(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostplan_core::{Inventory, Settings};
    use serde_json::json;

    fn derived(memory_total: &str) -> DerivedConfiguration {
        let inventory = Inventory::from_value(json!({
            "detected_architecture": "aarch64",
            "get_hardware_info": { "data": {
                "cpu_cores": 8,
                "memory_total": memory_total,
                "disk_info": [{ "mountpoint": "/", "available": "250G" }]
            }},
            "get_os_info": { "data": { "os_name": "Debian GNU/Linux" } },
            "get_virtualization_info": { "data": { "virt_type": "kvm" } }
        }))
        .unwrap();
        crate::analyze(&inventory, &Settings::default())
    }

    #[test]
    fn test_report_for_ready_host() {
        let report = format_report(&derived("32768 MB"));
        assert!(report.contains("Debian GNU/Linux"));
        assert!(report.contains("aarch64"));
        assert!(report.contains("READY WITH WARNINGS"));
        assert!(report.contains("database"));
        assert!(report.contains("netbox"));
        assert!(report.contains("8 cores (6 available), Unknown"));
        assert!(report.contains("vmbr1: Backend network (10.100.0.0/24)"));
        assert!(report.contains("No network interfaces detected"));
        assert!(!report.contains("ERRORS"));
    }

    #[test]
    fn test_report_lists_errors() {
        let report = format_report(&derived("4096 MB"));
        assert!(report.contains("NOT READY"));
        assert!(report.contains("1. Insufficient memory: 4GB available"));
        assert!(report.contains("Resolve the errors above"));
    }

    #[test]
    fn test_summary_lines() {
        let inventory = Inventory::from_value(json!({
            "get_hardware_info": { "data": {
                "cpu_cores": 8,
                "memory_total": "32768 MB",
                "disk_info": [{ "mountpoint": "/", "available": "250G" }]
            }},
            "get_ip_info": { "data": { "eth0": { "ipv4_address": "192.0.2.1" } } },
            "get_virtualization_info": { "data": { "virt_type": "kvm" } }
        }))
        .unwrap();
        let plan = crate::render_deployment_variables(&inventory, &Settings::default()).unwrap();
        let summary = format_summary(&plan.variables);
        assert!(summary.starts_with("  Container allocations:\n    - netbox: 4 CPU, 8192MB RAM, 32GB disk\n"));
        assert!(summary.contains("    - proxy: 2 CPU, 2048MB RAM, 8GB disk\n"));
    }
}
