//! Binary reader
//!
//! Decodes the flatbuffer wire format into the object model. Every
//! offset is bounds-checked before it is followed, so a truncated or
//! hostile file fails with `CodecError::MalformedFile` instead of
//! panicking. The reader trusts nothing: vtables, vectors, strings and
//! nested tables are all validated as they are traversed.

use byteorder::{ByteOrder, LittleEndian};
use rondo_core::CodecError;

use crate::model::{
    Buffer, Metadata, Model, Operator, OperatorCode, QuantizationParams, SubGraph, Tensor,
};
use crate::options::BuiltinOptions;
use crate::schema::{BuiltinOptionsType, TensorType};
use crate::{CIRCLE_IDENTIFIER, TFLITE_IDENTIFIER};

fn malformed(what: impl Into<String>) -> CodecError {
    CodecError::MalformedFile(what.into())
}

fn check(data: &[u8], offset: usize, len: usize) -> Result<(), CodecError> {
    if offset.checked_add(len).map_or(true, |end| end > data.len()) {
        return Err(malformed(format!(
            "read of {len} bytes at {offset} past end of file ({} bytes)",
            data.len()
        )));
    }
    Ok(())
}

fn read_u8(data: &[u8], offset: usize) -> Result<u8, CodecError> {
    check(data, offset, 1)?;
    Ok(data[offset])
}

fn read_i8(data: &[u8], offset: usize) -> Result<i8, CodecError> {
    Ok(read_u8(data, offset)? as i8)
}

fn read_u16(data: &[u8], offset: usize) -> Result<u16, CodecError> {
    check(data, offset, 2)?;
    Ok(LittleEndian::read_u16(&data[offset..offset + 2]))
}

fn read_i32(data: &[u8], offset: usize) -> Result<i32, CodecError> {
    check(data, offset, 4)?;
    Ok(LittleEndian::read_i32(&data[offset..offset + 4]))
}

fn read_u32(data: &[u8], offset: usize) -> Result<u32, CodecError> {
    check(data, offset, 4)?;
    Ok(LittleEndian::read_u32(&data[offset..offset + 4]))
}

fn read_i64(data: &[u8], offset: usize) -> Result<i64, CodecError> {
    check(data, offset, 8)?;
    Ok(LittleEndian::read_i64(&data[offset..offset + 8]))
}

fn read_f32(data: &[u8], offset: usize) -> Result<f32, CodecError> {
    check(data, offset, 4)?;
    Ok(LittleEndian::read_f32(&data[offset..offset + 4]))
}

/// One flatbuffer table: position plus resolved, validated vtable.
pub(crate) struct TableReader<'a> {
    data: &'a [u8],
    pos: usize,
    vtable: usize,
    vtable_size: u16,
}

impl<'a> TableReader<'a> {
    fn at(data: &'a [u8], pos: usize) -> Result<Self, CodecError> {
        let soffset = read_i32(data, pos)?;
        let vtable = (pos as i64)
            .checked_sub(soffset as i64)
            .filter(|v| *v >= 0)
            .ok_or_else(|| malformed(format!("table at {pos} has invalid vtable offset")))?
            as usize;
        let vtable_size = read_u16(data, vtable)?;
        if vtable_size < 4 || vtable_size % 2 != 0 {
            return Err(malformed(format!("vtable at {vtable} has size {vtable_size}")));
        }
        check(data, vtable, vtable_size as usize)?;
        Ok(Self {
            data,
            pos,
            vtable,
            vtable_size,
        })
    }

    /// Absolute position of a field's inline value, or `None` when the
    /// field is absent (defaulted).
    fn field(&self, id: u16) -> Result<Option<usize>, CodecError> {
        let slot = 4 + 2 * id;
        if slot + 2 > self.vtable_size {
            return Ok(None);
        }
        let rel = read_u16(self.data, self.vtable + slot as usize)?;
        if rel == 0 {
            return Ok(None);
        }
        Ok(Some(self.pos + rel as usize))
    }

    /// Follow a field holding a uoffset to its target position.
    fn indirect(&self, id: u16) -> Result<Option<usize>, CodecError> {
        let Some(at) = self.field(id)? else {
            return Ok(None);
        };
        let rel = read_u32(self.data, at)?;
        let target = at
            .checked_add(rel as usize)
            .ok_or_else(|| malformed("offset overflow"))?;
        check(self.data, target, 0)?;
        Ok(Some(target))
    }

    /// Start of a vector's elements and its length, after checking the
    /// whole payload is in bounds.
    fn vector(&self, id: u16, elem_size: usize) -> Result<Option<(usize, usize)>, CodecError> {
        let Some(pos) = self.indirect(id)? else {
            return Ok(None);
        };
        let len = read_u32(self.data, pos)? as usize;
        let payload = len
            .checked_mul(elem_size)
            .ok_or_else(|| malformed("vector length overflow"))?;
        check(self.data, pos + 4, payload)?;
        Ok(Some((pos + 4, len)))
    }

    pub(crate) fn i8_field(&self, id: u16, default: i8) -> Result<i8, CodecError> {
        match self.field(id)? {
            Some(at) => read_i8(self.data, at),
            None => Ok(default),
        }
    }

    pub(crate) fn u8_field(&self, id: u16, default: u8) -> Result<u8, CodecError> {
        match self.field(id)? {
            Some(at) => read_u8(self.data, at),
            None => Ok(default),
        }
    }

    pub(crate) fn bool_field(&self, id: u16, default: bool) -> Result<bool, CodecError> {
        Ok(self.u8_field(id, default as u8)? != 0)
    }

    pub(crate) fn i32_field(&self, id: u16, default: i32) -> Result<i32, CodecError> {
        match self.field(id)? {
            Some(at) => read_i32(self.data, at),
            None => Ok(default),
        }
    }

    pub(crate) fn u32_field(&self, id: u16, default: u32) -> Result<u32, CodecError> {
        match self.field(id)? {
            Some(at) => read_u32(self.data, at),
            None => Ok(default),
        }
    }

    pub(crate) fn i64_field(&self, id: u16, default: i64) -> Result<i64, CodecError> {
        match self.field(id)? {
            Some(at) => read_i64(self.data, at),
            None => Ok(default),
        }
    }

    pub(crate) fn f32_field(&self, id: u16, default: f32) -> Result<f32, CodecError> {
        match self.field(id)? {
            Some(at) => read_f32(self.data, at),
            None => Ok(default),
        }
    }

    pub(crate) fn str_field(&self, id: u16) -> Result<Option<String>, CodecError> {
        let Some((start, len)) = self.vector(id, 1)? else {
            return Ok(None);
        };
        let bytes = self.data[start..start + len].to_vec();
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|_| malformed(format!("invalid UTF-8 in string field {id}")))
    }

    pub(crate) fn bytes_field(&self, id: u16) -> Result<Option<Vec<u8>>, CodecError> {
        let Some((start, len)) = self.vector(id, 1)? else {
            return Ok(None);
        };
        Ok(Some(self.data[start..start + len].to_vec()))
    }

    pub(crate) fn i32_vec_field(&self, id: u16) -> Result<Vec<i32>, CodecError> {
        let Some((start, len)) = self.vector(id, 4)? else {
            return Ok(Vec::new());
        };
        (0..len).map(|i| read_i32(self.data, start + 4 * i)).collect()
    }

    pub(crate) fn f32_vec_field(&self, id: u16) -> Result<Vec<f32>, CodecError> {
        let Some((start, len)) = self.vector(id, 4)? else {
            return Ok(Vec::new());
        };
        (0..len).map(|i| read_f32(self.data, start + 4 * i)).collect()
    }

    pub(crate) fn i64_vec_field(&self, id: u16) -> Result<Vec<i64>, CodecError> {
        let Some((start, len)) = self.vector(id, 8)? else {
            return Ok(Vec::new());
        };
        (0..len).map(|i| read_i64(self.data, start + 8 * i)).collect()
    }

    pub(crate) fn bool_vec_field(&self, id: u16) -> Result<Vec<bool>, CodecError> {
        let Some((start, len)) = self.vector(id, 1)? else {
            return Ok(Vec::new());
        };
        Ok(self.data[start..start + len].iter().map(|&b| b != 0).collect())
    }

    pub(crate) fn table_field(&self, id: u16) -> Result<Option<TableReader<'a>>, CodecError> {
        match self.indirect(id)? {
            Some(pos) => Ok(Some(TableReader::at(self.data, pos)?)),
            None => Ok(None),
        }
    }

    /// Vector of uoffsets to tables.
    fn tables_field(&self, id: u16) -> Result<Vec<TableReader<'a>>, CodecError> {
        let Some((start, len)) = self.vector(id, 4)? else {
            return Ok(Vec::new());
        };
        let mut out = Vec::with_capacity(len);
        for i in 0..len {
            let at = start + 4 * i;
            let rel = read_u32(self.data, at)?;
            let target = at
                .checked_add(rel as usize)
                .ok_or_else(|| malformed("offset overflow"))?;
            out.push(TableReader::at(self.data, target)?);
        }
        Ok(out)
    }
}

/// Decode a complete circle (or plain TFLite) file.
///
/// The returned model owns all of its data; the input slice can be
/// dropped afterwards. Fails without producing a partial model.
pub fn decode(data: &[u8]) -> Result<Model, CodecError> {
    if data.len() < 8 {
        return Err(malformed(format!("file too short ({} bytes)", data.len())));
    }
    let ident = &data[4..8];
    if ident != CIRCLE_IDENTIFIER && ident != TFLITE_IDENTIFIER {
        return Err(malformed(format!("unrecognized file identifier {ident:?}")));
    }

    let root_pos = read_u32(data, 0)? as usize;
    let root = TableReader::at(data, root_pos)?;

    let model = Model {
        version: root.u32_field(0, 0)?,
        operator_codes: root
            .tables_field(1)?
            .iter()
            .map(read_operator_code)
            .collect::<Result<_, _>>()?,
        subgraphs: root
            .tables_field(2)?
            .iter()
            .map(read_subgraph)
            .collect::<Result<_, _>>()?,
        description: root.str_field(3)?,
        buffers: root
            .tables_field(4)?
            .iter()
            .map(|t| Ok(Buffer::new(t.bytes_field(0)?.unwrap_or_default())))
            .collect::<Result<_, CodecError>>()?,
        metadata: root
            .tables_field(6)?
            .iter()
            .map(|t| {
                Ok(Metadata {
                    name: t.str_field(0)?.unwrap_or_default(),
                    buffer: t.u32_field(1, 0)?,
                })
            })
            .collect::<Result<_, CodecError>>()?,
    };

    model.validate()?;
    Ok(model)
}

fn read_operator_code(t: &TableReader<'_>) -> Result<OperatorCode, CodecError> {
    // Codes past 127 overflow the original i8 field: such files carry
    // 127 there and the true code in the extended i32 field. Old
    // writers set only the legacy field, and vendor codes there are
    // negative, so the legacy value wins unless it is the overflow
    // sentinel or absent.
    let deprecated = t.i8_field(0, 0)? as i32;
    let extended = t.i32_field(3, 0)?;
    let builtin_code = match deprecated {
        127 => extended,
        0 if extended != 0 => extended,
        code => code,
    };
    Ok(OperatorCode {
        builtin_code,
        custom_code: t.str_field(1)?,
        version: t.i32_field(2, 1)?,
    })
}

fn read_subgraph(t: &TableReader<'_>) -> Result<SubGraph, CodecError> {
    Ok(SubGraph {
        tensors: t
            .tables_field(0)?
            .iter()
            .map(read_tensor)
            .collect::<Result<_, _>>()?,
        inputs: t.i32_vec_field(1)?,
        outputs: t.i32_vec_field(2)?,
        operators: t
            .tables_field(3)?
            .iter()
            .map(read_operator)
            .collect::<Result<_, _>>()?,
        name: t.str_field(4)?,
    })
}

fn read_tensor(t: &TableReader<'_>) -> Result<Tensor, CodecError> {
    let raw_type = t.i8_field(1, 0)?;
    let ty = TensorType::from_i8(raw_type)
        .ok_or_else(|| malformed(format!("unknown tensor type {raw_type}")))?;
    Ok(Tensor {
        shape: t.i32_vec_field(0)?,
        ty,
        buffer: t.u32_field(2, 0)?,
        name: t.str_field(3)?.unwrap_or_default(),
        quantization: match t.table_field(4)? {
            Some(q) => Some(read_quantization(&q)?),
            None => None,
        },
        is_variable: t.bool_field(5, false)?,
        shape_signature: t.i32_vec_field(7)?,
    })
}

fn read_quantization(t: &TableReader<'_>) -> Result<QuantizationParams, CodecError> {
    Ok(QuantizationParams {
        min: t.f32_vec_field(0)?,
        max: t.f32_vec_field(1)?,
        scale: t.f32_vec_field(2)?,
        zero_point: t.i64_vec_field(3)?,
        quantized_dimension: t.i32_field(6, 0)?,
    })
}

fn read_operator(t: &TableReader<'_>) -> Result<Operator, CodecError> {
    let raw_type = t.u8_field(3, 0)?;
    let options_type = BuiltinOptionsType::from_u8(raw_type)
        .ok_or_else(|| malformed(format!("unknown builtin options type {raw_type}")))?;
    let options_table = t.table_field(4)?;

    // The union is stored as a (discriminant, payload) pair; refuse
    // files where the two sides disagree.
    let builtin_options = match (options_type, options_table) {
        (BuiltinOptionsType::None, None) => BuiltinOptions::None,
        (BuiltinOptionsType::None, Some(_)) => {
            return Err(CodecError::CorruptUnion(
                "options payload present with NONE discriminant".to_string(),
            ));
        }
        (ty, None) => {
            return Err(CodecError::CorruptUnion(format!(
                "discriminant {ty:?} has no options payload"
            )));
        }
        (ty, Some(table)) => BuiltinOptions::read(ty, &table)?,
    };

    Ok(Operator {
        opcode_index: t.u32_field(0, 0)?,
        inputs: t.i32_vec_field(1)?,
        outputs: t.i32_vec_field(2)?,
        builtin_options,
        custom_options: t.bytes_field(5)?,
        custom_options_format: t.i8_field(6, 0)?,
        mutating_variable_inputs: t.bool_vec_field(7)?,
        intermediates: t.i32_vec_field(8)?,
    })
}
