//! Hardware probe analysis: CPU, memory, root filesystem, and container sizing.

use hostplan_core::inventory::probes;
use hostplan_core::units::{self, UnitError};
use hostplan_core::{CpuInfo, HardwareResources, Inventory, MemoryInfo, Settings, StorageInfo};
use serde_json::Value;

use crate::diagnostics::Diagnostics;
use crate::tiers;

pub fn analyze_hardware(
    inventory: &Inventory,
    settings: &Settings,
    diagnostics: &mut Diagnostics,
) -> HardwareResources {
    let hw = inventory.probe_data(probes::HARDWARE);

    // A bad core count is only a warning; the threshold check below turns
    // the resulting 0 into an error.
    let total_cores = parse_cores(hw.get("cpu_cores")).unwrap_or_else(|| {
        diagnostics.warn("Could not parse CPU cores information");
        0
    });
    let model = hw
        .get("cpu_model")
        .cloned()
        .unwrap_or_else(|| Value::from("Unknown"));

    let total_mb = parse_memory(hw.get("memory_total")).unwrap_or_else(|_| {
        diagnostics.error("Could not parse memory information");
        0
    });
    let available_mb = parse_memory(hw.get("memory_available")).unwrap_or_else(|_| {
        diagnostics.warn("Could not parse available memory information");
        0
    });
    let total_gb = total_mb / 1024;

    let disk_info = hw.get("disk_info").cloned().unwrap_or_else(|| Value::Array(vec![]));
    let root_available_gb = root_disk_gb(&disk_info, diagnostics);

    tracing::info!(
        cores = total_cores,
        memory_mb = total_mb,
        root_gb = root_available_gb,
        "Detected hardware"
    );

    let reserved_memory_mb = settings.host.reserved_memory_mb;
    let plan = tiers::allocate(total_mb, total_cores, reserved_memory_mb);
    if let Some(rescale) = &plan.rescale {
        diagnostics.warn(rescale.message());
    }

    let req = &settings.requirements;
    if total_gb < req.min_memory_gb {
        diagnostics.error(format!(
            "Insufficient memory: {total_gb}GB available, {}GB minimum required",
            req.min_memory_gb
        ));
    } else if total_gb < req.recommended_memory_gb {
        diagnostics.warn(format!(
            "Limited memory: {total_gb}GB available, {}GB recommended for production",
            req.recommended_memory_gb
        ));
    }

    if root_available_gb < req.min_storage_gb {
        diagnostics.error(format!(
            "Insufficient storage: {root_available_gb}GB available, {}GB minimum required",
            req.min_storage_gb
        ));
    }

    if total_cores < req.min_cores {
        diagnostics.error(format!(
            "Insufficient CPU cores: {total_cores} available, {} minimum required",
            req.min_cores
        ));
    } else if total_cores < req.recommended_cores {
        diagnostics.warn(format!(
            "Limited CPU cores: {total_cores} available, {} recommended for production",
            req.recommended_cores
        ));
    }

    HardwareResources {
        cpu: CpuInfo {
            model,
            total_cores,
            available_cores: total_cores.saturating_sub(settings.host.reserved_cores),
        },
        memory: MemoryInfo {
            total_gb,
            total_mb,
            available_mb,
            reserved_for_host_mb: reserved_memory_mb,
        },
        storage: StorageInfo {
            root_available_gb,
            disk_info,
        },
        container_allocations: plan.allocations,
    }
}

/// Core count from a number or an integer string. Fractional numbers are
/// truncated. A missing field counts as 0 cores; `None` means the field was
/// present but unreadable.
fn parse_cores(value: Option<&Value>) -> Option<u32> {
    match value {
        None => Some(0),
        Some(Value::Number(n)) => match n.as_u64() {
            Some(n) => u32::try_from(n).ok(),
            None => n
                .as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && *f <= f64::from(u32::MAX))
                .map(|f| f as u32),
        },
        Some(Value::String(s)) => s.trim().parse().ok(),
        Some(_) => None,
    }
}

/// Megabytes from a `"<int> MB"` string. A missing field reads as `"0 MB"`.
fn parse_memory(value: Option<&Value>) -> Result<u64, UnitError> {
    match value {
        None => Ok(0),
        Some(Value::String(s)) => units::parse_megabytes(s),
        Some(Value::Number(n)) => n
            .as_u64()
            .ok_or_else(|| UnitError::InvalidMemory(n.to_string())),
        Some(other) => Err(UnitError::InvalidMemory(other.to_string())),
    }
}

/// Free space on `/` in whole gigabytes, 0 with a warning when it cannot be read.
fn root_disk_gb(disk_info: &Value, diagnostics: &mut Diagnostics) -> u64 {
    let root = disk_info
        .as_array()
        .into_iter()
        .flatten()
        .find(|disk| disk.get("mountpoint").and_then(Value::as_str) == Some("/"));

    let Some(root) = root else {
        diagnostics.warn("No root filesystem (/) found in disk information");
        return 0;
    };

    let parsed = match root.get("available") {
        None => Ok(0),
        Some(Value::String(s)) => units::parse_disk_gb(s),
        Some(other) => Err(UnitError::InvalidDiskSize(other.to_string())),
    };
    parsed.unwrap_or_else(|err| {
        tracing::debug!(%err, "Unreadable root disk size");
        diagnostics.warn("Could not parse disk size information");
        0
    })
}
