use anyhow::Context;
use clap::{Parser, ValueEnum};
use hostplan_core::{InventoryError, Settings};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(
    name = "hostplan",
    about = "hostplan: size service containers and render playbook variables from a host inventory",
    version
)]
struct Cli {
    /// Inventory JSON produced by the host collection agent
    #[arg(required_unless_present = "print_settings")]
    input: Option<PathBuf>,

    /// Write playbook variables (YAML) to this path instead of printing the analysis
    output: Option<PathBuf>,

    /// Analysis output format when no OUTPUT is given
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Settings file overriding host reservations, thresholds, and container identities
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the effective settings as TOML and exit
    #[arg(long)]
    print_settings: bool,

    /// Log analysis details
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Text,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_tracing(cli.verbose) {
        eprintln!("Error: {err}");
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err}");
            if err.downcast_ref::<InventoryError>().is_none() {
                eprintln!("{err:?}");
            }
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` directives plus a `hostplan` level chosen by `--verbose`.
fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { "hostplan=debug" } else { "hostplan=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.parse()?))
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let settings = Settings::load(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("Failed to load settings from {}", path.display()),
        None => "Failed to load default settings".to_string(),
    })?;
    tracing::debug!(?settings, "Loaded settings");

    if cli.print_settings {
        print!("{}", settings.to_toml_string()?);
        return Ok(ExitCode::SUCCESS);
    }

    let Some(input) = cli.input else {
        anyhow::bail!("an inventory file is required");
    };

    match cli.output {
        Some(output) => commands::plan::render(&input, &output, &settings),
        None => commands::plan::analyze(&input, &settings, cli.format),
    }
}
