//! Binary writer
//!
//! Re-encodes a model as a flatbuffer. The builder grows the file
//! back-to-front: bytes are pushed onto an internally reversed buffer
//! and every object is identified by its distance from the file end,
//! so all stored offsets point forward once the buffer is reversed at
//! the finish. Children are therefore always serialized before the
//! object that references them: buffers first, then tensors and
//! operators, then subgraphs, operator codes and finally the root.
//!
//! Scalars are pushed in big-endian byte order; the final reversal
//! turns them little-endian as the format requires.

use rondo_core::CodecError;

use crate::model::{
    Buffer, Metadata, Model, Operator, OperatorCode, QuantizationParams, SubGraph, Tensor,
};
use crate::CIRCLE_IDENTIFIER;

fn overflow(what: &str) -> CodecError {
    CodecError::EncodeOverflow(what.to_string())
}

/// Minimal flatbuffer builder.
pub(crate) struct Builder {
    /// Reversed file contents; `buf[0]` is the last byte of the file.
    buf: Vec<u8>,
    /// Slots of the in-progress table: (field id, value location).
    slots: Vec<(u16, u32)>,
    table_start: Option<u32>,
    max_align: usize,
}

impl Builder {
    pub(crate) fn new() -> Self {
        Self {
            buf: Vec::new(),
            slots: Vec::new(),
            table_start: None,
            max_align: 4,
        }
    }

    /// Distance from the end of the file. Everything pushed so far
    /// lives at positions `>= loc` once the buffer is reversed.
    fn loc(&self) -> Result<u32, CodecError> {
        u32::try_from(self.buf.len()).map_err(|_| overflow("file exceeds 4 GiB"))
    }

    fn push_rev(&mut self, bytes: &[u8]) {
        self.buf.extend(bytes.iter().rev());
    }

    fn align(&mut self, size: usize) {
        self.max_align = self.max_align.max(size);
        while self.buf.len() % size != 0 {
            self.buf.push(0);
        }
    }

    /// Pad so that `extra` more bytes land 4-aligned from the end.
    fn prealign(&mut self, extra: usize, size: usize) {
        self.max_align = self.max_align.max(size);
        while (self.buf.len() + extra) % size != 0 {
            self.buf.push(0);
        }
    }

    /// Stored offset from a reference pushed next to `target`.
    fn offset_to(&self, target: u32) -> Result<u32, CodecError> {
        let here = self.loc()? + 4;
        here.checked_sub(target).ok_or_else(|| overflow("backward offset"))
    }

    // -- vectors and strings (created before their parent table) --

    fn finish_vector(&mut self, len: usize) -> Result<u32, CodecError> {
        let len = u32::try_from(len).map_err(|_| overflow("vector too long"))?;
        self.push_rev(&len.to_le_bytes());
        self.loc()
    }

    pub(crate) fn create_i32_vector(&mut self, vals: &[i32]) -> Result<u32, CodecError> {
        self.align(4);
        for v in vals.iter().rev() {
            self.push_rev(&v.to_le_bytes());
        }
        self.finish_vector(vals.len())
    }

    pub(crate) fn create_f32_vector(&mut self, vals: &[f32]) -> Result<u32, CodecError> {
        self.align(4);
        for v in vals.iter().rev() {
            self.push_rev(&v.to_le_bytes());
        }
        self.finish_vector(vals.len())
    }

    pub(crate) fn create_i64_vector(&mut self, vals: &[i64]) -> Result<u32, CodecError> {
        self.align(8);
        for v in vals.iter().rev() {
            self.push_rev(&v.to_le_bytes());
        }
        self.finish_vector(vals.len())
    }

    pub(crate) fn create_byte_vector(&mut self, bytes: &[u8]) -> Result<u32, CodecError> {
        self.prealign(bytes.len(), 4);
        self.push_rev(bytes);
        self.finish_vector(bytes.len())
    }

    pub(crate) fn create_bool_vector(&mut self, vals: &[bool]) -> Result<u32, CodecError> {
        self.prealign(vals.len(), 4);
        for v in vals.iter().rev() {
            self.buf.push(*v as u8);
        }
        self.finish_vector(vals.len())
    }

    /// NUL-terminated, length-prefixed UTF-8 string.
    pub(crate) fn create_string(&mut self, s: &str) -> Result<u32, CodecError> {
        let bytes = s.as_bytes();
        self.prealign(bytes.len() + 1, 4);
        self.buf.push(0);
        self.push_rev(bytes);
        self.finish_vector(bytes.len())
    }

    /// Vector of references to already-created objects.
    pub(crate) fn create_offset_vector(&mut self, locs: &[u32]) -> Result<u32, CodecError> {
        self.align(4);
        for &target in locs.iter().rev() {
            let rel = self.offset_to(target)?;
            self.push_rev(&rel.to_le_bytes());
        }
        self.finish_vector(locs.len())
    }

    // -- tables --

    pub(crate) fn start_table(&mut self) {
        debug_assert!(self.table_start.is_none(), "tables cannot nest");
        self.slots.clear();
        self.table_start = Some(self.buf.len() as u32);
    }

    fn record(&mut self, id: u16) {
        let loc = self.buf.len() as u32;
        self.slots.push((id, loc));
    }

    pub(crate) fn slot_i8(&mut self, id: u16, v: i8, default: i8) {
        if v != default {
            self.buf.push(v as u8);
            self.record(id);
        }
    }

    pub(crate) fn slot_u8(&mut self, id: u16, v: u8, default: u8) {
        if v != default {
            self.buf.push(v);
            self.record(id);
        }
    }

    pub(crate) fn slot_bool(&mut self, id: u16, v: bool, default: bool) {
        self.slot_u8(id, v as u8, default as u8);
    }

    pub(crate) fn slot_i32(&mut self, id: u16, v: i32, default: i32) {
        if v != default {
            self.align(4);
            self.push_rev(&v.to_le_bytes());
            self.record(id);
        }
    }

    pub(crate) fn slot_u32(&mut self, id: u16, v: u32, default: u32) {
        if v != default {
            self.align(4);
            self.push_rev(&v.to_le_bytes());
            self.record(id);
        }
    }

    pub(crate) fn slot_i64(&mut self, id: u16, v: i64, default: i64) {
        if v != default {
            self.align(8);
            self.push_rev(&v.to_le_bytes());
            self.record(id);
        }
    }

    pub(crate) fn slot_f32(&mut self, id: u16, v: f32, default: f32) {
        if v.to_bits() != default.to_bits() {
            self.align(4);
            self.push_rev(&v.to_le_bytes());
            self.record(id);
        }
    }

    pub(crate) fn slot_offset(&mut self, id: u16, target: Option<u32>) {
        if let Some(target) = target {
            self.align(4);
            // offset_to cannot fail here: the target was created
            // earlier, so it is strictly closer to the file end.
            let rel = (self.buf.len() as u32 + 4) - target;
            self.push_rev(&rel.to_le_bytes());
            self.record(id);
        }
    }

    /// Close the in-progress table: push its soffset, then a fresh
    /// vtable, and patch the soffset to point at it.
    pub(crate) fn end_table(&mut self) -> Result<u32, CodecError> {
        let start = self
            .table_start
            .take()
            .ok_or_else(|| CodecError::EncodeOverflow("end_table without start_table".to_string()))?;

        self.align(4);
        self.push_rev(&0i32.to_le_bytes());
        let table = self.loc()?;
        let soffset_at = self.buf.len() - 4;

        let max_id = self.slots.iter().map(|&(id, _)| id).max();
        let field_count = max_id.map_or(0, |m| m as usize + 1);
        let vtable_size = (4 + 2 * field_count) as u16;
        let table_size = (table - start) as u16;

        let mut offs = vec![0u16; field_count];
        for &(id, loc) in &self.slots {
            offs[id as usize] = (table - loc) as u16;
        }
        for off in offs.iter().rev() {
            self.push_rev(&off.to_le_bytes());
        }
        self.push_rev(&table_size.to_le_bytes());
        self.push_rev(&vtable_size.to_le_bytes());
        let vtable = self.loc()?;

        let soffset = (vtable - table) as i32;
        self.buf[soffset_at..soffset_at + 4].copy_from_slice(&soffset.to_be_bytes());
        self.slots.clear();
        Ok(table)
    }

    pub(crate) fn empty_table(&mut self) -> Result<u32, CodecError> {
        self.start_table();
        self.end_table()
    }

    /// Prefix the root offset and file identifier and produce the
    /// final, front-to-back byte order.
    pub(crate) fn finish(mut self, root: u32, identifier: &[u8; 4]) -> Result<Vec<u8>, CodecError> {
        self.prealign(8, self.max_align);
        self.push_rev(identifier);
        let rel = self.offset_to(root)?;
        self.push_rev(&rel.to_le_bytes());
        self.loc()?;
        self.buf.reverse();
        Ok(self.buf)
    }
}

/// Encode a model as a circle file.
///
/// Produces a self-contained byte vector with the `CIR0` identifier.
/// The model is validated first; dangling indices fail the encode
/// rather than producing an unreadable file.
pub fn encode(model: &Model) -> Result<Vec<u8>, CodecError> {
    model.validate()?;
    let mut b = Builder::new();

    let buffers: Vec<u32> = model
        .buffers
        .iter()
        .map(|buf| write_buffer(&mut b, buf))
        .collect::<Result<_, _>>()?;
    let subgraphs: Vec<u32> = model
        .subgraphs
        .iter()
        .map(|sg| write_subgraph(&mut b, sg))
        .collect::<Result<_, _>>()?;
    let operator_codes: Vec<u32> = model
        .operator_codes
        .iter()
        .map(|oc| write_operator_code(&mut b, oc))
        .collect::<Result<_, _>>()?;
    let metadata: Vec<u32> = model
        .metadata
        .iter()
        .map(|m| write_metadata(&mut b, m))
        .collect::<Result<_, _>>()?;

    let description = match &model.description {
        Some(d) => Some(b.create_string(d)?),
        None => None,
    };
    let operator_codes = vec_field(&mut b, &operator_codes)?;
    let subgraphs = vec_field(&mut b, &subgraphs)?;
    let buffers = vec_field(&mut b, &buffers)?;
    let metadata = vec_field(&mut b, &metadata)?;

    b.start_table();
    b.slot_u32(0, model.version, 0);
    b.slot_offset(1, operator_codes);
    b.slot_offset(2, subgraphs);
    b.slot_offset(3, description);
    b.slot_offset(4, buffers);
    b.slot_offset(6, metadata);
    let root = b.end_table()?;

    b.finish(root, CIRCLE_IDENTIFIER)
}

fn vec_field(b: &mut Builder, locs: &[u32]) -> Result<Option<u32>, CodecError> {
    if locs.is_empty() {
        Ok(None)
    } else {
        Ok(Some(b.create_offset_vector(locs)?))
    }
}

fn i32_vec_field(b: &mut Builder, vals: &[i32]) -> Result<Option<u32>, CodecError> {
    if vals.is_empty() {
        Ok(None)
    } else {
        Ok(Some(b.create_i32_vector(vals)?))
    }
}

fn write_buffer(b: &mut Builder, buf: &Buffer) -> Result<u32, CodecError> {
    if buf.data.is_empty() {
        return b.empty_table();
    }
    let data = b.create_byte_vector(&buf.data)?;
    b.start_table();
    b.slot_offset(0, Some(data));
    b.end_table()
}

fn write_operator_code(b: &mut Builder, oc: &OperatorCode) -> Result<u32, CodecError> {
    let custom = match &oc.custom_code {
        Some(c) => Some(b.create_string(c)?),
        None => None,
    };
    b.start_table();
    // The legacy i8 field saturates at 127; the real code always goes
    // into the extended i32 field.
    b.slot_i8(0, oc.builtin_code.min(127) as i8, 0);
    b.slot_offset(1, custom);
    b.slot_i32(2, oc.version, 1);
    b.slot_i32(3, oc.builtin_code, 0);
    b.end_table()
}

fn write_subgraph(b: &mut Builder, sg: &SubGraph) -> Result<u32, CodecError> {
    let tensors: Vec<u32> = sg
        .tensors
        .iter()
        .map(|t| write_tensor(b, t))
        .collect::<Result<_, _>>()?;
    let operators: Vec<u32> = sg
        .operators
        .iter()
        .map(|op| write_operator(b, op))
        .collect::<Result<_, _>>()?;

    let tensors = vec_field(b, &tensors)?;
    let operators = vec_field(b, &operators)?;
    let inputs = i32_vec_field(b, &sg.inputs)?;
    let outputs = i32_vec_field(b, &sg.outputs)?;
    let name = match &sg.name {
        Some(n) => Some(b.create_string(n)?),
        None => None,
    };

    b.start_table();
    b.slot_offset(0, tensors);
    b.slot_offset(1, inputs);
    b.slot_offset(2, outputs);
    b.slot_offset(3, operators);
    b.slot_offset(4, name);
    b.end_table()
}

fn write_tensor(b: &mut Builder, t: &Tensor) -> Result<u32, CodecError> {
    let quantization = match &t.quantization {
        Some(q) => Some(write_quantization(b, q)?),
        None => None,
    };
    let shape = i32_vec_field(b, &t.shape)?;
    let shape_signature = i32_vec_field(b, &t.shape_signature)?;
    let name = if t.name.is_empty() {
        None
    } else {
        Some(b.create_string(&t.name)?)
    };

    b.start_table();
    b.slot_offset(0, shape);
    b.slot_i8(1, t.ty as i8, 0);
    b.slot_u32(2, t.buffer, 0);
    b.slot_offset(3, name);
    b.slot_offset(4, quantization);
    b.slot_bool(5, t.is_variable, false);
    b.slot_offset(7, shape_signature);
    b.end_table()
}

fn write_quantization(b: &mut Builder, q: &QuantizationParams) -> Result<u32, CodecError> {
    let min = if q.min.is_empty() { None } else { Some(b.create_f32_vector(&q.min)?) };
    let max = if q.max.is_empty() { None } else { Some(b.create_f32_vector(&q.max)?) };
    let scale = if q.scale.is_empty() { None } else { Some(b.create_f32_vector(&q.scale)?) };
    let zero_point = if q.zero_point.is_empty() {
        None
    } else {
        Some(b.create_i64_vector(&q.zero_point)?)
    };

    b.start_table();
    b.slot_offset(0, min);
    b.slot_offset(1, max);
    b.slot_offset(2, scale);
    b.slot_offset(3, zero_point);
    b.slot_i32(6, q.quantized_dimension, 0);
    b.end_table()
}

fn write_operator(b: &mut Builder, op: &Operator) -> Result<u32, CodecError> {
    // Serializing the payload first and deriving the discriminant from
    // it keeps the two halves of the union in agreement by construction.
    let options = op.builtin_options.write(b)?;
    let options_type = op.builtin_options.options_type();

    let inputs = i32_vec_field(b, &op.inputs)?;
    let outputs = i32_vec_field(b, &op.outputs)?;
    let custom = match &op.custom_options {
        Some(c) => Some(b.create_byte_vector(c)?),
        None => None,
    };
    let mutating = if op.mutating_variable_inputs.is_empty() {
        None
    } else {
        Some(b.create_bool_vector(&op.mutating_variable_inputs)?)
    };
    let intermediates = i32_vec_field(b, &op.intermediates)?;

    b.start_table();
    b.slot_u32(0, op.opcode_index, 0);
    b.slot_offset(1, inputs);
    b.slot_offset(2, outputs);
    b.slot_u8(3, options_type as u8, 0);
    b.slot_offset(4, options);
    b.slot_offset(5, custom);
    b.slot_i8(6, op.custom_options_format, 0);
    b.slot_offset(7, mutating);
    b.slot_offset(8, intermediates);
    b.end_table()
}

fn write_metadata(b: &mut Builder, m: &Metadata) -> Result<u32, CodecError> {
    let name = if m.name.is_empty() {
        None
    } else {
        Some(b.create_string(&m.name)?)
    };
    b.start_table();
    b.slot_offset(0, name);
    b.slot_u32(1, m.buffer, 0);
    b.end_table()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode;
    use crate::options::{BuiltinOptions, Conv2dOptions, ReshapeOptions};
    use crate::schema::{Padding, TensorType};
    use crate::CIRCLE_IDENTIFIER;

    fn sample_model() -> Model {
        Model {
            version: 3,
            description: Some("test model".to_string()),
            operator_codes: vec![OperatorCode::builtin(3), OperatorCode::builtin(22)],
            subgraphs: vec![SubGraph {
                tensors: vec![
                    Tensor::new("input", TensorType::Float32, vec![1, 8, 8, 1], 0),
                    Tensor::new("weights", TensorType::Float32, vec![1, 3, 3, 1], 1),
                    Tensor::new("conv_out", TensorType::Float32, vec![1, 8, 8, 1], 0),
                    Tensor::new("output", TensorType::Float32, vec![1, 64], 0),
                ],
                operators: vec![
                    Operator::new(
                        0,
                        vec![0, 1, -1],
                        vec![2],
                        BuiltinOptions::Conv2D(Conv2dOptions {
                            padding: Padding::Same,
                            stride_w: 1,
                            stride_h: 1,
                            ..Default::default()
                        }),
                    ),
                    Operator::new(
                        1,
                        vec![2],
                        vec![3],
                        BuiltinOptions::Reshape(ReshapeOptions {
                            new_shape: vec![1, 64],
                        }),
                    ),
                ],
                inputs: vec![0],
                outputs: vec![3],
                name: Some("main".to_string()),
            }],
            buffers: vec![Buffer::empty(), Buffer::new(vec![0u8; 36])],
            metadata: Vec::new(),
        }
    }

    #[test]
    fn encode_writes_circle_identifier() {
        let bytes = encode(&sample_model()).unwrap();
        assert_eq!(&bytes[4..8], CIRCLE_IDENTIFIER);
    }

    #[test]
    fn encode_decode_is_identity() {
        let model = sample_model();
        let bytes = encode(&model).unwrap();
        let reread = decode(&bytes).unwrap();
        assert_eq!(model, reread);
    }

    #[test]
    fn encode_rejects_dangling_buffer_index() {
        let mut model = sample_model();
        model.subgraphs[0].tensors[1].buffer = 99;
        assert!(encode(&model).is_err());
    }

    #[test]
    fn large_opcode_survives_the_legacy_field() {
        let mut model = sample_model();
        model.operator_codes.push(OperatorCode::builtin(128)); // CUMSUM
        let bytes = encode(&model).unwrap();
        let reread = decode(&bytes).unwrap();
        assert_eq!(reread.operator_codes[2].builtin_code, 128);
    }

    #[test]
    fn vendor_opcode_roundtrips() {
        let mut model = sample_model();
        model.operator_codes.push(OperatorCode::builtin(-2)); // INSTANCE_NORM
        let bytes = encode(&model).unwrap();
        let reread = decode(&bytes).unwrap();
        assert_eq!(reread.operator_codes[2].builtin_code, -2);
    }

    #[test]
    fn quantization_roundtrips() {
        let mut model = sample_model();
        model.subgraphs[0].tensors[1].quantization = Some(QuantizationParams {
            min: vec![-1.0],
            max: vec![1.0],
            scale: vec![0.007_874],
            zero_point: vec![0],
            quantized_dimension: 0,
        });
        let bytes = encode(&model).unwrap();
        let reread = decode(&bytes).unwrap();
        assert_eq!(model, reread);
    }
}
