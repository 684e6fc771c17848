//! Mutation engine
//!
//! Applies one discrete edit to a loaded model: an operator attribute,
//! a tensor redefinition, or a raw buffer replacement. Each edit is
//! validated before anything is written; a rejected edit leaves the
//! model untouched except for the documented tensor-edit case, where
//! the metadata portion applies even when the buffer write is refused.

use rondo_core::EditError;

use crate::model::Model;
use crate::schema::{BuiltinOperator, TensorType};

/// Requested new state for one tensor. `data`, when present, replaces
/// the tensor's backing buffer.
#[derive(Debug, Clone)]
pub struct TensorPatch {
    pub name: String,
    pub ty: TensorType,
    pub shape: Vec<i32>,
    pub is_variable: bool,
    pub data: Option<Vec<u8>>,
}

/// Edit access to a loaded model. Edits are synchronous and
/// non-transactional: each call either commits or reports why not.
pub struct Editor<'a> {
    model: &'a mut Model,
}

impl<'a> Editor<'a> {
    pub fn new(model: &'a mut Model) -> Self {
        Self { model }
    }

    /// Change one typed attribute of an operator's options table.
    ///
    /// The operator's builtin kind is resolved from the opcode table
    /// and must agree with the payload it currently carries; an edit
    /// that would require swapping the payload kind is refused, since
    /// nothing here rewrites the opcode table.
    pub fn edit_attribute(
        &mut self,
        subgraph: usize,
        operator: usize,
        name: &str,
        value: &str,
    ) -> Result<(), EditError> {
        let sg = self
            .model
            .subgraphs
            .get(subgraph)
            .ok_or(EditError::InvalidIndex {
                what: "subgraph",
                index: subgraph,
            })?;
        let op = sg.operators.get(operator).ok_or(EditError::InvalidIndex {
            what: "operator",
            index: operator,
        })?;
        let opcode_index = op.opcode_index as usize;
        let code = self
            .model
            .operator_codes
            .get(opcode_index)
            .ok_or(EditError::InvalidIndex {
                what: "operator code",
                index: opcode_index,
            })?;

        let kind = match BuiltinOperator::from_code(code.builtin_code) {
            Some(BuiltinOperator::Custom) | None => return Err(EditError::NoOptionsTable),
            Some(kind) => kind,
        };
        let expected = kind.options_type();

        let op = &mut self.model.subgraphs[subgraph].operators[operator];
        if op.builtin_options.options_type() != expected {
            return Err(EditError::OpcodeChangeUnsupported);
        }
        op.builtin_options.set_attribute(name, value)
    }

    /// Redefine a tensor.
    ///
    /// Name, type, shape and variability always apply. The buffer
    /// write only happens when the payload length matches the declared
    /// type and shape; on mismatch the metadata changes stand and the
    /// old buffer contents survive.
    pub fn edit_tensor(
        &mut self,
        subgraph: usize,
        tensor: usize,
        patch: TensorPatch,
    ) -> Result<(), EditError> {
        let sg = self
            .model
            .subgraphs
            .get_mut(subgraph)
            .ok_or(EditError::InvalidIndex {
                what: "subgraph",
                index: subgraph,
            })?;
        let t = sg.tensors.get_mut(tensor).ok_or(EditError::InvalidIndex {
            what: "tensor",
            index: tensor,
        })?;

        t.name = patch.name;
        t.ty = patch.ty;
        t.shape = patch.shape;
        t.is_variable = patch.is_variable;

        let Some(data) = patch.data else {
            return Ok(());
        };
        let Some(expected) = t.expected_byte_len() else {
            return Err(EditError::invalid_value(
                "data",
                &format!("{} bytes", data.len()),
                "tensor type has no fixed element width",
            ));
        };
        if data.len() != expected {
            return Err(EditError::BufferSizeMismatch {
                got: data.len(),
                expected,
            });
        }
        let buffer = t.buffer as usize;
        let buf = self
            .model
            .buffers
            .get_mut(buffer)
            .ok_or(EditError::InvalidIndex {
                what: "buffer",
                index: buffer,
            })?;
        buf.data = data;
        Ok(())
    }

    /// Replace a buffer's raw payload wholesale. Tensors that index
    /// the buffer are not adjusted; that is the caller's problem.
    pub fn edit_buffer(&mut self, buffer: usize, data: Vec<u8>) -> Result<(), EditError> {
        let buf = self
            .model
            .buffers
            .get_mut(buffer)
            .ok_or(EditError::InvalidIndex {
                what: "buffer",
                index: buffer,
            })?;
        buf.data = data;
        Ok(())
    }
}
