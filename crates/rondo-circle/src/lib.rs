//! Rondo Circle - codec for the circle model format
//!
//! This crate decodes a circle file (a TFLite-derived flatbuffer) into
//! a mutable, strongly-typed object graph, applies targeted edits to
//! it, and re-encodes it to a valid binary file. It also projects a
//! loaded model into a flat, UI-friendly operator list.
//!
//! The codec always holds the complete model in memory; decode and
//! encode run to completion on the calling thread. Sparsity tables and
//! signature defs are not modeled: a file that used them re-encodes
//! without them.

pub mod edit;
pub mod model;
pub mod options;
pub mod project;
pub mod read;
pub mod schema;
pub mod write;

pub use edit::{Editor, TensorPatch};
pub use model::{Buffer, Metadata, Model, Operator, OperatorCode, QuantizationParams, SubGraph, Tensor};
pub use options::{BuiltinOptions, BuiltinOptionsType};
pub use project::{project, project_json, OperatorRecord, TensorRef};
pub use read::decode;
pub use schema::{BuiltinOperator, TensorType};
pub use write::encode;

/// File identifier written by the encoder.
pub const CIRCLE_IDENTIFIER: &[u8; 4] = b"CIR0";

/// File identifier of plain TFLite files, accepted on decode.
pub const TFLITE_IDENTIFIER: &[u8; 4] = b"TFL3";

/// Quick magic check without a full decode.
pub fn is_circle(data: &[u8]) -> bool {
    data.len() >= 8 && (&data[4..8] == CIRCLE_IDENTIFIER || &data[4..8] == TFLITE_IDENTIFIER)
}

/// File extensions this codec handles.
pub fn extensions() -> &'static [&'static str] {
    &["circle", "tflite"]
}
