use std::path::Path;
use std::process::ExitCode;

use hostplan_analyzer::{report, RenderError};
use hostplan_core::{Inventory, Settings};

use crate::Format;

/// Print the full analysis; fails the process when the host is not deployable.
pub fn analyze(input: &Path, settings: &Settings, format: Format) -> anyhow::Result<ExitCode> {
    let inventory = Inventory::from_file(input)?;
    let derived = hostplan_analyzer::analyze(&inventory, settings);

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&derived)?),
        Format::Text => println!("{}", report::format_report(&derived)),
    }

    Ok(if derived.deployment_ready {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Write the playbook variables file for a deployable host.
pub fn render(input: &Path, output: &Path, settings: &Settings) -> anyhow::Result<ExitCode> {
    let inventory = Inventory::from_file(input)?;

    let plan = match hostplan_analyzer::render_deployment_variables(&inventory, settings) {
        Ok(plan) => plan,
        Err(err @ RenderError::NotReady { .. }) => {
            eprintln!("ERROR: {err}");
            return Ok(ExitCode::FAILURE);
        }
    };

    if !plan.derived.warnings.is_empty() {
        eprintln!("Warnings:");
        for warning in &plan.derived.warnings {
            eprintln!("  - {warning}");
        }
    }

    plan.write_variables_file(output)?;

    eprintln!("\n✓ Deployment configuration written to: {}", output.display());
    eprintln!("\n{}", report::format_summary(&plan.variables));
    Ok(ExitCode::SUCCESS)
}
