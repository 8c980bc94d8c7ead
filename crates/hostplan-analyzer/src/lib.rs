pub mod analyzers;
pub mod diagnostics;
pub mod render;
pub mod report;
pub mod tiers;

use hostplan_core::{DerivedConfiguration, Inventory, Settings};

pub use diagnostics::Diagnostics;
pub use render::{render_deployment_variables, DeploymentPlan, RenderError};

/// Collection agent whose inventory format this crate reads.
pub const DEPLOYMENT_SOURCE: &str = "automation_nation";

/// Derive the full deployment configuration for one inventory document.
///
/// Hardware, networking and software are analyzed in that order; diagnostics
/// keep the order they were recorded in.
pub fn analyze(inventory: &Inventory, settings: &Settings) -> DerivedConfiguration {
    tracing::info!(
        timestamp = inventory.timestamp().as_deref().unwrap_or("unknown"),
        architecture = inventory.architecture().as_deref().unwrap_or("unknown"),
        "Analyzing host inventory"
    );

    let mut diagnostics = Diagnostics::default();
    let hardware_resources =
        analyzers::hardware::analyze_hardware(inventory, settings, &mut diagnostics);
    let networking = analyzers::network::analyze_networking(inventory, &mut diagnostics);
    let software_resources = analyzers::software::analyze_software(inventory, &mut diagnostics);

    let deployment_ready = !diagnostics.is_fatal();
    let Diagnostics { warnings, errors } = diagnostics;

    tracing::info!(
        warnings = warnings.len(),
        errors = errors.len(),
        deployment_ready,
        "Inventory analysis complete"
    );

    DerivedConfiguration {
        deployment_source: DEPLOYMENT_SOURCE.to_string(),
        networking,
        hardware_resources,
        software_resources,
        warnings,
        errors,
        collection_metadata: inventory.collection_metadata.clone(),
        analysis_complete: true,
        deployment_ready,
    }
}
