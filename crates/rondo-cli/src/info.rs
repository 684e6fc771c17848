//! `rondo info` command implementation

use anyhow::{Context, Result};
use rondo_circle::{decode, project, BuiltinOperator};
use std::fs;
use std::path::Path;

pub fn run(model_path: &Path) -> Result<()> {
    let data = fs::read(model_path).context("Failed to read model file")?;
    let model = decode(&data).context("Failed to decode model")?;

    println!("Model: {}", model_path.display());
    println!("  File size:    {} bytes", data.len());
    println!("  Version:      {}", model.version);
    if let Some(desc) = &model.description {
        println!("  Description:  {desc}");
    }
    println!("  Subgraphs:    {}", model.subgraphs.len());
    println!("  Buffers:      {}", model.buffers.len());
    println!("  Opcodes:      {}", model.operator_codes.len());
    for code in &model.operator_codes {
        let name = match &code.custom_code {
            Some(custom) => custom.clone(),
            None => BuiltinOperator::from_code(code.builtin_code)
                .map(|op| op.name().to_string())
                .unwrap_or_else(|| format!("UNKNOWN({})", code.builtin_code)),
        };
        println!("    {name} (version {})", code.version);
    }

    for (i, sg) in model.subgraphs.iter().enumerate() {
        let label = sg.name.as_deref().unwrap_or("<unnamed>");
        println!("  Subgraph {i} ({label}):");
        println!("    Tensors:    {}", sg.tensors.len());
        println!("    Operators:  {}", sg.operators.len());
        println!("    Inputs:     {:?}", sg.inputs);
        println!("    Outputs:    {:?}", sg.outputs);
    }

    let constants = project(&model)
        .iter()
        .flat_map(|rec| rec.inputs.clone())
        .filter(|t| !t.edge)
        .count();
    println!("  Constant operator inputs: {constants}");

    Ok(())
}
