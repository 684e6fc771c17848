//! `rondo roundtrip` command implementation

use anyhow::{Context, Result};
use rondo_circle::{decode, encode};
use std::fs;
use std::path::Path;

pub fn run(model_path: &Path, output: &Path) -> Result<()> {
    let data = fs::read(model_path).context("Failed to read model file")?;
    let model = decode(&data).context("Failed to decode model")?;
    let bytes = encode(&model).context("Failed to re-encode model")?;
    fs::write(output, &bytes).context("Failed to write output model")?;
    println!(
        "{} -> {} ({} -> {} bytes)",
        model_path.display(),
        output.display(),
        data.len(),
        bytes.len()
    );
    Ok(())
}
