//! Container sizing tables and the allocation procedure.
//!
//! Sizing starts from a baseline that fits an 8 GB / 2 core host. Memory and
//! core tiers replace values outright; a higher tier never adds to a lower
//! one. If the result does not fit the memory left after the host
//! reservation, every container's memory is scaled down uniformly.

use hostplan_core::{ContainerAllocation, ContainerAllocations, ContainerRole, PerRole};

/// Share of the available memory a rescaled plan may use.
pub const RESCALE_HEADROOM: f64 = 0.9;

const fn alloc(cpu: u32, memory: u64, swap: u64, disk: u64) -> ContainerAllocation {
    ContainerAllocation { cpu, memory, swap, disk }
}

/// Allocation for the smallest supported host.
pub const BASELINE: ContainerAllocations = PerRole {
    app: alloc(2, 4096, 2048, 32),
    database: alloc(2, 2048, 1024, 16),
    cache: alloc(1, 1024, 512, 8),
    proxy: alloc(1, 512, 256, 8),
};

/// Container memory (MB) granted once the host has at least `min_total_mb`.
pub struct MemoryTier {
    pub min_total_mb: u64,
    pub memory: PerRole<u64>,
}

/// Ascending; every tier the host qualifies for is applied in order.
pub const MEMORY_TIERS: [MemoryTier; 2] = [
    MemoryTier {
        min_total_mb: 16384,
        memory: PerRole { app: 6144, database: 4096, cache: 2048, proxy: 1024 },
    },
    MemoryTier {
        min_total_mb: 32768,
        memory: PerRole { app: 8192, database: 8192, cache: 4096, proxy: 2048 },
    },
];

/// Cores per container once the host has at least 8 cores.
pub const LARGE_HOST_CORES: PerRole<u32> = PerRole { app: 4, database: 4, cache: 2, proxy: 2 };

/// Memory adjustment applied when the requested total does not fit.
#[derive(Debug, Clone, PartialEq)]
pub struct Rescale {
    pub requested_mb: u64,
    pub available_mb: u64,
    pub factor: f64,
}

impl Rescale {
    pub fn message(&self) -> String {
        format!(
            "Total allocated container memory ({} MB) exceeds available memory ({} MB). \
             Container allocations have been adjusted.",
            self.requested_mb, self.available_mb
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AllocationPlan {
    pub allocations: ContainerAllocations,
    pub rescale: Option<Rescale>,
}

/// Size the four containers for a host.
pub fn allocate(total_memory_mb: u64, total_cores: u32, reserved_memory_mb: u64) -> AllocationPlan {
    let mut allocations = BASELINE;

    for tier in MEMORY_TIERS.iter().filter(|t| total_memory_mb >= t.min_total_mb) {
        tracing::debug!(min_total_mb = tier.min_total_mb, "Applying memory tier");
        for role in ContainerRole::ALL {
            allocations.get_mut(role).memory = *tier.memory.get(role);
        }
    }

    if total_cores >= 4 {
        allocations.app.cpu = total_cores.saturating_sub(2).clamp(2, 4);
        allocations.database.cpu = 2;
    }
    if total_cores >= 8 {
        for role in ContainerRole::ALL {
            allocations.get_mut(role).cpu = *LARGE_HOST_CORES.get(role);
        }
    }

    let available_mb = total_memory_mb.saturating_sub(reserved_memory_mb);
    let requested_mb = allocations.total_memory();
    let rescale = (requested_mb > available_mb).then(|| {
        let factor = available_mb as f64 / requested_mb as f64 * RESCALE_HEADROOM;
        for role in ContainerRole::ALL {
            let container = allocations.get_mut(role);
            container.memory = (container.memory as f64 * factor) as u64;
        }
        tracing::debug!(requested_mb, available_mb, factor, "Scaled container memory down");
        Rescale { requested_mb, available_mb, factor }
    });

    AllocationPlan { allocations, rescale }
}
