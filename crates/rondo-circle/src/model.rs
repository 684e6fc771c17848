//! In-memory graph model
//!
//! The model is an arena of structs: every entity kind lives in a
//! contiguous `Vec` owned by its parent and all cross-references are
//! plain indices (tensor → buffer, operator → opcode, control-flow
//! options → subgraph). The whole model is rebuilt from bytes on every
//! load and mutated in place between loads; nothing here keeps wire
//! offsets around.

use crate::options::BuiltinOptions;
use crate::schema::TensorType;
use rondo_core::CodecError;

/// Root of ownership for one loaded circle file.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub version: u32,
    pub description: Option<String>,
    pub operator_codes: Vec<OperatorCode>,
    pub subgraphs: Vec<SubGraph>,
    pub buffers: Vec<Buffer>,
    pub metadata: Vec<Metadata>,
}

impl Model {
    /// Check the index invariants the format requires: every tensor's
    /// buffer index, every operator's opcode index, and every operator
    /// input/output (which may be -1 for "absent") must resolve.
    pub fn validate(&self) -> Result<(), CodecError> {
        for (si, subgraph) in self.subgraphs.iter().enumerate() {
            for (ti, tensor) in subgraph.tensors.iter().enumerate() {
                if tensor.buffer as usize >= self.buffers.len() {
                    return Err(CodecError::MalformedFile(format!(
                        "subgraph {si} tensor {ti} references buffer {} of {}",
                        tensor.buffer,
                        self.buffers.len()
                    )));
                }
            }
            for (oi, op) in subgraph.operators.iter().enumerate() {
                if op.opcode_index as usize >= self.operator_codes.len() {
                    return Err(CodecError::MalformedFile(format!(
                        "subgraph {si} operator {oi} references opcode {} of {}",
                        op.opcode_index,
                        self.operator_codes.len()
                    )));
                }
                for &io in op.inputs.iter().chain(op.outputs.iter()) {
                    if io != -1 && (io < 0 || io as usize >= subgraph.tensors.len()) {
                        return Err(CodecError::MalformedFile(format!(
                            "subgraph {si} operator {oi} references tensor {io} of {}",
                            subgraph.tensors.len()
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

/// One entry of the model-level opcode table.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorCode {
    /// Effective builtin code. On the wire this is split across
    /// `deprecated_builtin_code` (clamped to 127) and `builtin_code`;
    /// the codec folds the pair into this one value.
    pub builtin_code: i32,
    pub custom_code: Option<String>,
    pub version: i32,
}

impl OperatorCode {
    pub fn builtin(code: i32) -> Self {
        Self {
            builtin_code: code,
            custom_code: None,
            version: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubGraph {
    pub tensors: Vec<Tensor>,
    pub operators: Vec<Operator>,
    /// Tensor indices of the subgraph's inputs and outputs.
    pub inputs: Vec<i32>,
    pub outputs: Vec<i32>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    pub name: String,
    pub ty: TensorType,
    pub shape: Vec<i32>,
    /// Index into `Model::buffers`. Index 0 is conventionally the
    /// shared empty buffer; an empty backing buffer marks the tensor
    /// as a runtime value rather than a constant.
    pub buffer: u32,
    pub is_variable: bool,
    pub quantization: Option<QuantizationParams>,
    pub shape_signature: Vec<i32>,
}

impl Tensor {
    pub fn new(name: impl Into<String>, ty: TensorType, shape: Vec<i32>, buffer: u32) -> Self {
        Self {
            name: name.into(),
            ty,
            shape,
            buffer,
            is_variable: false,
            quantization: None,
            shape_signature: Vec::new(),
        }
    }

    /// Bytes a constant of this tensor's type and shape occupies, if
    /// the element width is fixed.
    pub fn expected_byte_len(&self) -> Option<usize> {
        let elem = self.ty.byte_size()?;
        let count: usize = self.shape.iter().map(|&d| d.max(0) as usize).product();
        Some(elem * count)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuantizationParams {
    pub min: Vec<f32>,
    pub max: Vec<f32>,
    pub scale: Vec<f32>,
    pub zero_point: Vec<i64>,
    pub quantized_dimension: i32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Buffer {
    pub data: Vec<u8>,
}

impl Buffer {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn empty() -> Self {
        Self { data: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    /// Index into `Model::operator_codes`.
    pub opcode_index: u32,
    /// Tensor indices; -1 marks an absent optional input.
    pub inputs: Vec<i32>,
    pub outputs: Vec<i32>,
    /// The options union. The wire discriminant is derived from the
    /// variant on encode, so discriminant and payload cannot disagree.
    pub builtin_options: BuiltinOptions,
    /// Opaque flexbuffer payload of CUSTOM operators.
    pub custom_options: Option<Vec<u8>>,
    pub custom_options_format: i8,
    pub mutating_variable_inputs: Vec<bool>,
    pub intermediates: Vec<i32>,
}

impl Operator {
    pub fn new(opcode_index: u32, inputs: Vec<i32>, outputs: Vec<i32>, builtin_options: BuiltinOptions) -> Self {
        Self {
            opcode_index,
            inputs,
            outputs,
            builtin_options,
            custom_options: None,
            custom_options_format: 0,
            mutating_variable_inputs: Vec::new(),
            intermediates: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    pub name: String,
    /// Index into `Model::buffers`.
    pub buffer: u32,
}
