//! Graph projector
//!
//! Read-only flattening of a model into one record per operator, with
//! tensor indices resolved to names and shapes and options decoded to
//! the uniform attribute list. This is the inspection/export surface;
//! nothing here mutates the model.

use serde::Serialize;

use rondo_core::Attribute;

use crate::model::{Model, SubGraph};
use crate::schema::BuiltinOperator;

/// A resolved operator input or output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TensorRef {
    pub index: u32,
    pub name: String,
    pub shape: Vec<i32>,
    /// True when the backing buffer is empty, i.e. the tensor is a
    /// runtime value flowing between operators rather than a constant.
    pub edge: bool,
}

/// One operator, flattened for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperatorRecord {
    pub subgraph: usize,
    pub index: usize,
    /// Symbolic opcode name; the custom code string for CUSTOM ops.
    pub opcode: String,
    pub options_type: String,
    pub attributes: Vec<Attribute>,
    pub inputs: Vec<TensorRef>,
    pub outputs: Vec<TensorRef>,
}

/// Flatten every operator of every subgraph.
pub fn project(model: &Model) -> Vec<OperatorRecord> {
    let mut records = Vec::new();
    for (si, sg) in model.subgraphs.iter().enumerate() {
        // One dense tensor table per subgraph so each operator's IO
        // resolution is an array lookup, not a scan.
        let table = tensor_table(model, sg);
        for (oi, op) in sg.operators.iter().enumerate() {
            let opcode = model
                .operator_codes
                .get(op.opcode_index as usize)
                .map(opcode_name)
                .unwrap_or_else(|| "UNKNOWN".to_string());
            records.push(OperatorRecord {
                subgraph: si,
                index: oi,
                opcode,
                options_type: op.builtin_options.type_name().to_string(),
                attributes: op.builtin_options.attributes(),
                inputs: resolve(&table, &op.inputs),
                outputs: resolve(&table, &op.outputs),
            });
        }
    }
    records
}

/// `project`, rendered as pretty JSON for export.
pub fn project_json(model: &Model) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&project(model))
}

fn opcode_name(code: &crate::model::OperatorCode) -> String {
    if let Some(custom) = &code.custom_code {
        return custom.clone();
    }
    BuiltinOperator::from_code(code.builtin_code)
        .map(|op| op.name().to_string())
        .unwrap_or_else(|| format!("UNKNOWN({})", code.builtin_code))
}

fn tensor_table(model: &Model, sg: &SubGraph) -> Vec<TensorRef> {
    sg.tensors
        .iter()
        .enumerate()
        .map(|(i, t)| TensorRef {
            index: i as u32,
            name: t.name.clone(),
            shape: t.shape.clone(),
            edge: model
                .buffers
                .get(t.buffer as usize)
                .map_or(true, |b| b.is_empty()),
        })
        .collect()
}

/// Resolve tensor indices, silently dropping the -1 "absent optional
/// input" sentinel.
fn resolve(table: &[TensorRef], indices: &[i32]) -> Vec<TensorRef> {
    indices
        .iter()
        .filter(|&&i| i >= 0)
        .filter_map(|&i| table.get(i as usize).cloned())
        .collect()
}
