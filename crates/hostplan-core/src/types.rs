//! Shared types used across hostplan crates.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Everything derived from one inventory document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DerivedConfiguration {
    /// Name of the collection agent the inventory came from.
    pub deployment_source: String,
    pub networking: Networking,
    pub hardware_resources: HardwareResources,
    pub software_resources: SoftwareResources,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub collection_metadata: Value,
    pub analysis_complete: bool,
    /// True iff `errors` is empty.
    pub deployment_ready: bool,
}

impl DerivedConfiguration {
    pub fn readiness(&self) -> Readiness {
        if !self.deployment_ready {
            Readiness::NotReady
        } else if self.warnings.is_empty() {
            Readiness::Ready
        } else {
            Readiness::ReadyWithWarnings
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    ReadyWithWarnings,
    NotReady,
}

impl Readiness {
    pub fn label(&self) -> &'static str {
        match self {
            Readiness::Ready => "READY",
            Readiness::ReadyWithWarnings => "READY WITH WARNINGS",
            Readiness::NotReady => "NOT READY",
        }
    }
}

// ── Hardware ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HardwareResources {
    pub cpu: CpuInfo,
    pub memory: MemoryInfo,
    pub storage: StorageInfo,
    pub container_allocations: ContainerAllocations,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CpuInfo {
    /// `cpu_model` as reported, `"Unknown"` when absent.
    pub model: Value,
    pub total_cores: u32,
    /// Cores left after the host reservation.
    pub available_cores: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryInfo {
    pub total_gb: u64,
    pub total_mb: u64,
    pub available_mb: u64,
    pub reserved_for_host_mb: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageInfo {
    pub root_available_gb: u64,
    /// Raw `disk_info` entries as reported by the hardware probe.
    pub disk_info: Value,
}

/// The four service containers a plan sizes.
///
/// The application container is keyed `netbox` in every emitted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerRole {
    #[serde(rename = "netbox")]
    App,
    Database,
    Cache,
    Proxy,
}

impl ContainerRole {
    pub const ALL: [ContainerRole; 4] = [
        ContainerRole::App,
        ContainerRole::Database,
        ContainerRole::Cache,
        ContainerRole::Proxy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerRole::App => "netbox",
            ContainerRole::Database => "database",
            ContainerRole::Cache => "cache",
            ContainerRole::Proxy => "proxy",
        }
    }
}

impl fmt::Display for ContainerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per container role, serialized as a map keyed by role name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerRole<T> {
    #[serde(rename = "netbox")]
    pub app: T,
    pub database: T,
    pub cache: T,
    pub proxy: T,
}

impl<T> PerRole<T> {
    pub fn get(&self, role: ContainerRole) -> &T {
        match role {
            ContainerRole::App => &self.app,
            ContainerRole::Database => &self.database,
            ContainerRole::Cache => &self.cache,
            ContainerRole::Proxy => &self.proxy,
        }
    }

    pub fn get_mut(&mut self, role: ContainerRole) -> &mut T {
        match role {
            ContainerRole::App => &mut self.app,
            ContainerRole::Database => &mut self.database,
            ContainerRole::Cache => &mut self.cache,
            ContainerRole::Proxy => &mut self.proxy,
        }
    }

    /// Iterate in role declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (ContainerRole, &T)> {
        ContainerRole::ALL.into_iter().map(move |role| (role, self.get(role)))
    }

    pub fn map<U>(&self, mut f: impl FnMut(ContainerRole, &T) -> U) -> PerRole<U> {
        PerRole {
            app: f(ContainerRole::App, &self.app),
            database: f(ContainerRole::Database, &self.database),
            cache: f(ContainerRole::Cache, &self.cache),
            proxy: f(ContainerRole::Proxy, &self.proxy),
        }
    }
}

/// Sizing for one container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerAllocation {
    /// Cores.
    pub cpu: u32,
    /// MB.
    pub memory: u64,
    /// MB.
    pub swap: u64,
    /// GB.
    pub disk: u64,
}

pub type ContainerAllocations = PerRole<ContainerAllocation>;

impl ContainerAllocations {
    pub fn total_memory(&self) -> u64 {
        self.iter().map(|(_, a)| a.memory).sum()
    }
}

// ── Networking ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Networking {
    pub detected_interfaces: Vec<NetworkInterface>,
    pub primary_interface: String,
    pub suggested_bridges: BTreeMap<String, Bridge>,
    pub nat_configuration: NatConfiguration,
}

/// Interface record copied from the network probe; values are not interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkInterface {
    pub name: String,
    pub ipv4: Value,
    pub ipv6: Value,
    pub mac: Value,
    pub state: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bridge {
    pub comment: String,
    /// Physical port enslaved to the bridge, external bridge only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ports: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cidr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    pub bridge_fd: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NatConfiguration {
    pub enabled: bool,
    pub source_networks: Vec<String>,
    pub output_interface: String,
}

// ── Software ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoftwareResources {
    pub operating_system: OperatingSystem,
    pub virtualization: Virtualization,
    /// Installed package count per package manager, non-empty managers only.
    pub package_managers: BTreeMap<String, usize>,
    pub prerequisites: Prerequisites,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatingSystem {
    pub os_name: Value,
    pub os_version: Value,
    pub kernel: Value,
    pub architecture: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Virtualization {
    #[serde(rename = "type")]
    pub virt_type: Value,
    pub role: Value,
    pub hypervisor: Value,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prerequisites {
    pub python3: bool,
    pub bridge_utils: bool,
    pub iptables: bool,
}

// ── Deployment variables ───────────────────────────────────

/// The variables document consumed by the provisioning playbook.
///
/// Field order is the order keys appear in the rendered YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentVariables {
    pub proxmox_storage: String,
    pub containers: PerRole<ContainerVariables>,
    pub network_interfaces: NetworkInterfaces,
    pub system_capabilities: SystemCapabilities,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerVariables {
    pub vmid: u32,
    pub hostname: String,
    pub cores: u32,
    pub memory: u64,
    pub swap: u64,
    pub rootfs_size: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkInterfaces {
    pub primary: String,
    pub detected: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemCapabilities {
    pub total_cpu_cores: u32,
    pub total_memory_gb: u64,
    pub total_storage_gb: u64,
    pub architecture: Value,
}
