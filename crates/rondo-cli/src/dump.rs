//! `rondo dump` command implementation

use anyhow::{Context, Result};
use rondo_circle::{decode, project_json};
use std::fs;
use std::path::Path;

pub fn run(model_path: &Path, output: Option<&Path>) -> Result<()> {
    let data = fs::read(model_path).context("Failed to read model file")?;
    let model = decode(&data).context("Failed to decode model")?;
    let json = project_json(&model).context("Failed to serialize graph")?;

    match output {
        Some(path) => {
            fs::write(path, &json).context("Failed to write JSON output")?;
            println!("Wrote {} bytes to {}", json.len(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
