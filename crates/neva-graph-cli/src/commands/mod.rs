//! CLI command implementations.

use std::path::Path;

use anyhow::{Context, Result};
use neva_graph_core::{BuildDiagnostic, EntityModel, Graph};

pub mod build;
pub mod config;
pub mod hover;
pub mod inspect;

/// Read and parse an entity model from a JSON file.
pub fn load_model(path: &Path) -> Result<EntityModel> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read model from {}", path.display()))?;
    EntityModel::from_json(&contents)
        .with_context(|| format!("Failed to parse model {}", path.display()))
}

/// Diagnostics go to stderr so stdout stays machine-readable.
pub fn report_diagnostics(diagnostics: &[BuildDiagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("warning: {}: {}", diagnostic.path, diagnostic.message);
    }
}

/// Write `graph` as pretty JSON to `output`, or to stdout when absent.
pub fn emit_graph(graph: &Graph, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(graph)?;
    match output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write graph to {}", path.display()))?;
            eprintln!("Saved to: {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
