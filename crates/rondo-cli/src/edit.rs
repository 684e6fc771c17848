//! `rondo edit-*` command implementations

use anyhow::{bail, Context, Result};
use rondo_circle::{decode, encode, Editor, Model, TensorPatch, TensorType};
use std::fs;
use std::path::Path;

fn load(path: &Path) -> Result<Model> {
    let data = fs::read(path).context("Failed to read model file")?;
    decode(&data).context("Failed to decode model")
}

fn save(model: &Model, input: &Path, output: Option<&Path>) -> Result<()> {
    let bytes = encode(model).context("Failed to encode model")?;
    let target = output.unwrap_or(input);
    fs::write(target, &bytes).context("Failed to write model file")?;
    println!("Wrote {} bytes to {}", bytes.len(), target.display());
    Ok(())
}

pub fn attribute(
    path: &Path,
    subgraph: usize,
    operator: usize,
    name: &str,
    value: &str,
    output: Option<&Path>,
) -> Result<()> {
    let mut model = load(path)?;
    Editor::new(&mut model)
        .edit_attribute(subgraph, operator, name, value)
        .with_context(|| format!("Failed to set `{name}` on operator {operator}"))?;
    save(&model, path, output)
}

#[allow(clippy::too_many_arguments)]
pub fn tensor(
    path: &Path,
    subgraph: usize,
    tensor: usize,
    name: Option<&str>,
    dtype: Option<&str>,
    shape: Option<&str>,
    variable: Option<bool>,
    data: Option<&Path>,
    output: Option<&Path>,
) -> Result<()> {
    let mut model = load(path)?;
    let current = model
        .subgraphs
        .get(subgraph)
        .and_then(|sg| sg.tensors.get(tensor))
        .with_context(|| format!("No tensor {tensor} in subgraph {subgraph}"))?;

    let patch = TensorPatch {
        name: name.map(str::to_string).unwrap_or_else(|| current.name.clone()),
        ty: match dtype {
            Some(d) => TensorType::from_name(d)?,
            None => current.ty,
        },
        shape: match shape {
            Some(s) => parse_shape(s)?,
            None => current.shape.clone(),
        },
        is_variable: variable.unwrap_or(current.is_variable),
        data: match data {
            Some(file) => Some(fs::read(file).context("Failed to read data file")?),
            None => None,
        },
    };

    Editor::new(&mut model)
        .edit_tensor(subgraph, tensor, patch)
        .with_context(|| format!("Failed to edit tensor {tensor}"))?;
    save(&model, path, output)
}

pub fn buffer(path: &Path, buffer: usize, data: Option<&Path>, output: Option<&Path>) -> Result<()> {
    let mut model = load(path)?;
    let payload = match data {
        Some(file) => fs::read(file).context("Failed to read data file")?,
        None => Vec::new(),
    };
    Editor::new(&mut model)
        .edit_buffer(buffer, payload)
        .with_context(|| format!("Failed to edit buffer {buffer}"))?;
    save(&model, path, output)
}

/// Comma-separated dimension list; a trailing comma is tolerated.
fn parse_shape(shape: &str) -> Result<Vec<i32>> {
    let trimmed = shape.trim().trim_end_matches(',').trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    trimmed
        .split(',')
        .map(|dim| {
            let dim = dim.trim();
            match dim.parse::<i32>() {
                Ok(d) => Ok(d),
                Err(_) => bail!("`{dim}` is not a valid dimension"),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_parsing_tolerates_trailing_comma() {
        assert_eq!(parse_shape("1, 28, 28, 3,").unwrap(), vec![1, 28, 28, 3]);
        assert_eq!(parse_shape("").unwrap(), Vec::<i32>::new());
        assert!(parse_shape("1,,3").is_err());
        assert!(parse_shape("1,x").is_err());
    }
}
