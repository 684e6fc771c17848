//! Options registry
//!
//! `BuiltinOptions` is the builtin-options union as a Rust enum: one
//! variant per union member, with a payload struct for every option
//! table that carries fields and a unit variant for the field-less
//! ones. All four paths through the registry (table decode, table
//! encode, attribute listing, attribute editing) are exhaustive
//! matches over that enum, so a union member without a handler is a
//! compile error rather than a silently unhandled discriminant.
//!
//! Each payload struct is declared once in an `options_table!` block:
//! wire field id, field name, kind and schema default. Everything else
//! (defaults, decode, encode, attribute list, coercing setter) is
//! generated from that declaration.

use crate::read::TableReader;
use crate::schema::{
    names_match, ActivationFunctionType, CombinerType, FullyConnectedWeightsFormat,
    LshProjectionType, LstmKernelType, MirrorPadMode, Padding, TensorType,
};
use crate::write::Builder;
use rondo_core::{Attribute, CodecError, EditError};

pub use crate::schema::BuiltinOptionsType;

// ---------------------------------------------------------------------------
// value coercion (string -> typed scalar, per the edit protocol)

fn parse_i32(field: &str, value: &str) -> Result<i32, EditError> {
    value
        .trim()
        .parse()
        .map_err(|_| EditError::invalid_value(field, value, "expected an integer"))
}

fn parse_u32(field: &str, value: &str) -> Result<u32, EditError> {
    value
        .trim()
        .parse()
        .map_err(|_| EditError::invalid_value(field, value, "expected an unsigned integer"))
}

fn parse_i64(field: &str, value: &str) -> Result<i64, EditError> {
    value
        .trim()
        .parse()
        .map_err(|_| EditError::invalid_value(field, value, "expected an integer"))
}

fn parse_f32(field: &str, value: &str) -> Result<f32, EditError> {
    value
        .trim()
        .parse()
        .map_err(|_| EditError::invalid_value(field, value, "expected a number"))
}

fn parse_bool(field: &str, value: &str) -> Result<bool, EditError> {
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(EditError::invalid_value(
            field,
            value,
            "'boolean' type must be 'true' or 'false'",
        ))
    }
}

/// Comma-separated integer list. A single trailing comma is
/// tolerated; anything else that is not a number is rejected.
fn parse_i32_list(field: &str, value: &str) -> Result<Vec<i32>, EditError> {
    let trimmed = value.trim().trim_end_matches(',').trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    trimmed
        .split(',')
        .map(|item| parse_i32(field, item))
        .collect()
}

fn parse_f32_list(field: &str, value: &str) -> Result<Vec<f32>, EditError> {
    let trimmed = value.trim().trim_end_matches(',').trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    trimmed
        .split(',')
        .map(|item| parse_f32(field, item))
        .collect()
}

// ---------------------------------------------------------------------------
// per-kind read/write/attr/parse dispatch used by options_table!

macro_rules! field_type {
    (int) => { i32 };
    (uint) => { u32 };
    (long) => { i64 };
    (float) => { f32 };
    (boolean) => { bool };
    (ints) => { Vec<i32> };
    (floats) => { Vec<f32> };
    (text) => { Option<String> };
    (dtype) => { TensorType };
    (($ety:ty)) => { $ety };
}

macro_rules! field_read {
    (int, $t:expr, $id:expr, $default:expr) => {
        $t.i32_field($id, $default)?
    };
    (uint, $t:expr, $id:expr, $default:expr) => {
        $t.u32_field($id, $default)?
    };
    (long, $t:expr, $id:expr, $default:expr) => {
        $t.i64_field($id, $default)?
    };
    (float, $t:expr, $id:expr, $default:expr) => {
        $t.f32_field($id, $default)?
    };
    (boolean, $t:expr, $id:expr, $default:expr) => {
        $t.bool_field($id, $default)?
    };
    (ints, $t:expr, $id:expr, $default:expr) => {
        $t.i32_vec_field($id)?
    };
    (floats, $t:expr, $id:expr, $default:expr) => {
        $t.f32_vec_field($id)?
    };
    (text, $t:expr, $id:expr, $default:expr) => {
        $t.str_field($id)?
    };
    (dtype, $t:expr, $id:expr, $default:expr) => {{
        let raw = $t.i8_field($id, $default as i8)?;
        TensorType::from_i8(raw)
            .ok_or_else(|| CodecError::MalformedFile(format!("unknown tensor type {raw}")))?
    }};
    (($ety:ty), $t:expr, $id:expr, $default:expr) => {{
        let raw = $t.i8_field($id, $default as i8)?;
        <$ety>::from_i8(raw)
            .ok_or_else(|| CodecError::MalformedFile(format!("unknown enum value {raw}")))?
    }};
}

// Pass 1 of encode: vectors and strings must exist before the table
// starts, so reference kinds create their payload here and shadow the
// field name with the resulting offset.
macro_rules! field_prep {
    (int, $b:expr, $v:expr) => { $v };
    (uint, $b:expr, $v:expr) => { $v };
    (long, $b:expr, $v:expr) => { $v };
    (float, $b:expr, $v:expr) => { $v };
    (boolean, $b:expr, $v:expr) => { $v };
    (ints, $b:expr, $v:expr) => {
        if $v.is_empty() { None } else { Some($b.create_i32_vector(&$v)?) }
    };
    (floats, $b:expr, $v:expr) => {
        if $v.is_empty() { None } else { Some($b.create_f32_vector(&$v)?) }
    };
    (text, $b:expr, $v:expr) => {
        match &$v {
            Some(s) => Some($b.create_string(s)?),
            None => None,
        }
    };
    (dtype, $b:expr, $v:expr) => { $v };
    (($ety:ty), $b:expr, $v:expr) => { $v };
}

macro_rules! field_slot {
    (int, $b:expr, $id:expr, $v:expr, $default:expr) => {
        $b.slot_i32($id, $v, $default)
    };
    (uint, $b:expr, $id:expr, $v:expr, $default:expr) => {
        $b.slot_u32($id, $v, $default)
    };
    (long, $b:expr, $id:expr, $v:expr, $default:expr) => {
        $b.slot_i64($id, $v, $default)
    };
    (float, $b:expr, $id:expr, $v:expr, $default:expr) => {
        $b.slot_f32($id, $v, $default)
    };
    (boolean, $b:expr, $id:expr, $v:expr, $default:expr) => {
        $b.slot_bool($id, $v, $default)
    };
    (ints, $b:expr, $id:expr, $v:expr, $default:expr) => {
        $b.slot_offset($id, $v)
    };
    (floats, $b:expr, $id:expr, $v:expr, $default:expr) => {
        $b.slot_offset($id, $v)
    };
    (text, $b:expr, $id:expr, $v:expr, $default:expr) => {
        $b.slot_offset($id, $v)
    };
    (dtype, $b:expr, $id:expr, $v:expr, $default:expr) => {
        $b.slot_i8($id, $v as i8, $default as i8)
    };
    (($ety:ty), $b:expr, $id:expr, $v:expr, $default:expr) => {
        $b.slot_i8($id, $v as i8, $default as i8)
    };
}

macro_rules! field_attr {
    (int, $name:expr, $v:expr) => { Attribute::new($name, $v) };
    (uint, $name:expr, $v:expr) => { Attribute::new($name, $v) };
    (long, $name:expr, $v:expr) => { Attribute::new($name, $v) };
    (float, $name:expr, $v:expr) => { Attribute::new($name, $v) };
    (boolean, $name:expr, $v:expr) => { Attribute::new($name, $v) };
    (ints, $name:expr, $v:expr) => { Attribute::new($name, $v.as_slice()) };
    (floats, $name:expr, $v:expr) => { Attribute::new($name, $v.as_slice()) };
    (text, $name:expr, $v:expr) => {
        Attribute::new($name, $v.as_deref().unwrap_or(""))
    };
    (dtype, $name:expr, $v:expr) => { Attribute::new($name, $v.name()) };
    (($ety:ty), $name:expr, $v:expr) => { Attribute::new($name, $v.name()) };
}

macro_rules! field_parse {
    (int, $name:expr, $value:expr) => { parse_i32($name, $value)? };
    (uint, $name:expr, $value:expr) => { parse_u32($name, $value)? };
    (long, $name:expr, $value:expr) => { parse_i64($name, $value)? };
    (float, $name:expr, $value:expr) => { parse_f32($name, $value)? };
    (boolean, $name:expr, $value:expr) => { parse_bool($name, $value)? };
    (ints, $name:expr, $value:expr) => { parse_i32_list($name, $value)? };
    (floats, $name:expr, $value:expr) => { parse_f32_list($name, $value)? };
    (text, $name:expr, $value:expr) => { Some($value.to_string()) };
    (dtype, $name:expr, $value:expr) => { TensorType::from_name($value)? };
    (($ety:ty), $name:expr, $value:expr) => { <$ety>::from_name($name, $value)? };
}

macro_rules! options_table {
    (
        $(#[$meta:meta])*
        $struct:ident {
            $($id:literal => $fname:ident: $kind:tt = $default:expr),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $struct {
            $(pub $fname: field_type!($kind),)+
        }

        impl Default for $struct {
            fn default() -> Self {
                Self {
                    $($fname: $default,)+
                }
            }
        }

        impl $struct {
            pub(crate) fn read(t: &TableReader<'_>) -> Result<Self, CodecError> {
                Ok(Self {
                    $($fname: field_read!($kind, t, $id, $default),)+
                })
            }

            pub(crate) fn write(&self, b: &mut Builder) -> Result<u32, CodecError> {
                $(let $fname = field_prep!($kind, b, self.$fname.clone());)+
                b.start_table();
                $(field_slot!($kind, b, $id, $fname, $default);)+
                b.end_table()
            }

            pub(crate) fn attrs(&self) -> Vec<Attribute> {
                vec![
                    $(field_attr!($kind, stringify!($fname), self.$fname.clone()),)+
                ]
            }

            pub(crate) fn set(&mut self, key: &str, value: &str) -> Result<(), EditError> {
                $(
                    if names_match(key, stringify!($fname)) {
                        self.$fname = field_parse!($kind, stringify!($fname), value);
                        return Ok(());
                    }
                )+
                Err(EditError::UnknownAttribute(key.to_string()))
            }
        }
    };
}

// ---------------------------------------------------------------------------
// option tables with fields (wire field id => name: kind = default)

options_table! {
    Conv2dOptions {
        0 => padding: (Padding) = Padding::Same,
        1 => stride_w: int = 0,
        2 => stride_h: int = 0,
        3 => fused_activation_function: (ActivationFunctionType) = ActivationFunctionType::None,
        4 => dilation_w_factor: int = 1,
        5 => dilation_h_factor: int = 1,
    }
}

options_table! {
    /// Shared by AVERAGE_POOL_2D, L2_POOL_2D and MAX_POOL_2D.
    Pool2dOptions {
        0 => padding: (Padding) = Padding::Same,
        1 => stride_w: int = 0,
        2 => stride_h: int = 0,
        3 => filter_width: int = 0,
        4 => filter_height: int = 0,
        5 => fused_activation_function: (ActivationFunctionType) = ActivationFunctionType::None,
    }
}

options_table! {
    DepthwiseConv2dOptions {
        0 => padding: (Padding) = Padding::Same,
        1 => stride_w: int = 0,
        2 => stride_h: int = 0,
        3 => depth_multiplier: int = 0,
        4 => fused_activation_function: (ActivationFunctionType) = ActivationFunctionType::None,
        5 => dilation_w_factor: int = 1,
        6 => dilation_h_factor: int = 1,
    }
}

options_table! {
    ConcatEmbeddingsOptions {
        0 => num_channels: int = 0,
        1 => num_columns_per_channel: ints = Vec::new(),
        2 => embedding_dim_per_channel: ints = Vec::new(),
    }
}

options_table! {
    SvdfOptions {
        0 => rank: int = 0,
        1 => fused_activation_function: (ActivationFunctionType) = ActivationFunctionType::None,
        2 => asymmetric_quantize_inputs: boolean = false,
    }
}

options_table! {
    RnnOptions {
        0 => fused_activation_function: (ActivationFunctionType) = ActivationFunctionType::None,
        1 => asymmetric_quantize_inputs: boolean = false,
    }
}

options_table! {
    SequenceRnnOptions {
        0 => time_major: boolean = false,
        1 => fused_activation_function: (ActivationFunctionType) = ActivationFunctionType::None,
        2 => asymmetric_quantize_inputs: boolean = false,
    }
}

options_table! {
    BidirectionalSequenceRnnOptions {
        0 => time_major: boolean = false,
        1 => fused_activation_function: (ActivationFunctionType) = ActivationFunctionType::None,
        2 => merge_outputs: boolean = false,
        3 => asymmetric_quantize_inputs: boolean = false,
    }
}

options_table! {
    FullyConnectedOptions {
        0 => fused_activation_function: (ActivationFunctionType) = ActivationFunctionType::None,
        1 => weights_format: (FullyConnectedWeightsFormat) = FullyConnectedWeightsFormat::Default,
        2 => keep_num_dims: boolean = false,
        3 => asymmetric_quantize_inputs: boolean = false,
    }
}

options_table! {
    SoftmaxOptions {
        0 => beta: float = 0.0,
    }
}

options_table! {
    ConcatenationOptions {
        0 => axis: int = 0,
        1 => fused_activation_function: (ActivationFunctionType) = ActivationFunctionType::None,
    }
}

options_table! {
    AddOptions {
        0 => fused_activation_function: (ActivationFunctionType) = ActivationFunctionType::None,
        1 => pot_scale_int16: boolean = true,
    }
}

options_table! {
    MulOptions {
        0 => fused_activation_function: (ActivationFunctionType) = ActivationFunctionType::None,
    }
}

options_table! {
    L2NormOptions {
        0 => fused_activation_function: (ActivationFunctionType) = ActivationFunctionType::None,
    }
}

options_table! {
    LocalResponseNormalizationOptions {
        0 => radius: int = 0,
        1 => bias: float = 0.0,
        2 => alpha: float = 0.0,
        3 => beta: float = 0.0,
    }
}

options_table! {
    LstmOptions {
        0 => fused_activation_function: (ActivationFunctionType) = ActivationFunctionType::None,
        1 => cell_clip: float = 0.0,
        2 => proj_clip: float = 0.0,
        3 => kernel_type: (LstmKernelType) = LstmKernelType::Full,
        4 => asymmetric_quantize_inputs: boolean = false,
    }
}

options_table! {
    UnidirectionalSequenceLstmOptions {
        0 => fused_activation_function: (ActivationFunctionType) = ActivationFunctionType::None,
        1 => cell_clip: float = 0.0,
        2 => proj_clip: float = 0.0,
        3 => time_major: boolean = false,
        4 => asymmetric_quantize_inputs: boolean = false,
    }
}

options_table! {
    BidirectionalSequenceLstmOptions {
        0 => fused_activation_function: (ActivationFunctionType) = ActivationFunctionType::None,
        1 => cell_clip: float = 0.0,
        2 => proj_clip: float = 0.0,
        3 => merge_outputs: boolean = false,
        4 => time_major: boolean = true,
        5 => asymmetric_quantize_inputs: boolean = false,
    }
}

options_table! {
    /// Field ids 0 and 1 were the deprecated new_height/new_width.
    ResizeBilinearOptions {
        2 => align_corners: boolean = false,
        3 => half_pixel_centers: boolean = false,
    }
}

options_table! {
    ResizeNearestNeighborOptions {
        0 => align_corners: boolean = false,
        1 => half_pixel_centers: boolean = false,
    }
}

options_table! {
    CallOptions {
        0 => subgraph: uint = 0u32,
    }
}

options_table! {
    ReshapeOptions {
        0 => new_shape: ints = Vec::new(),
    }
}

options_table! {
    SkipGramOptions {
        0 => ngram_size: int = 0,
        1 => max_skip_size: int = 0,
        2 => include_all_ngrams: boolean = false,
    }
}

options_table! {
    SpaceToDepthOptions {
        0 => block_size: int = 0,
    }
}

options_table! {
    DepthToSpaceOptions {
        0 => block_size: int = 0,
    }
}

options_table! {
    EmbeddingLookupSparseOptions {
        0 => combiner: (CombinerType) = CombinerType::Sum,
    }
}

options_table! {
    GatherOptions {
        0 => axis: int = 0,
        1 => batch_dims: int = 0,
    }
}

options_table! {
    /// Shared by MEAN, SUM and the REDUCE_* family.
    ReducerOptions {
        0 => keep_dims: boolean = false,
    }
}

options_table! {
    SubOptions {
        0 => fused_activation_function: (ActivationFunctionType) = ActivationFunctionType::None,
        1 => pot_scale_int16: boolean = true,
    }
}

options_table! {
    DivOptions {
        0 => fused_activation_function: (ActivationFunctionType) = ActivationFunctionType::None,
    }
}

options_table! {
    SqueezeOptions {
        0 => squeeze_dims: ints = Vec::new(),
    }
}

options_table! {
    StridedSliceOptions {
        0 => begin_mask: int = 0,
        1 => end_mask: int = 0,
        2 => ellipsis_mask: int = 0,
        3 => new_axis_mask: int = 0,
        4 => shrink_axis_mask: int = 0,
    }
}

options_table! {
    SplitOptions {
        0 => num_splits: int = 0,
    }
}

options_table! {
    SplitVOptions {
        0 => num_splits: int = 0,
    }
}

options_table! {
    CastOptions {
        0 => in_data_type: dtype = TensorType::Float32,
        1 => out_data_type: dtype = TensorType::Float32,
    }
}

options_table! {
    ArgMaxOptions {
        0 => output_type: dtype = TensorType::Float32,
    }
}

options_table! {
    ArgMinOptions {
        0 => output_type: dtype = TensorType::Float32,
    }
}

options_table! {
    TransposeConvOptions {
        0 => padding: (Padding) = Padding::Same,
        1 => stride_w: int = 0,
        2 => stride_h: int = 0,
    }
}

options_table! {
    SparseToDenseOptions {
        0 => validate_indices: boolean = false,
    }
}

options_table! {
    ShapeOptions {
        0 => out_type: dtype = TensorType::Float32,
    }
}

options_table! {
    FakeQuantOptions {
        0 => min: float = 0.0,
        1 => max: float = 0.0,
        2 => num_bits: int = 0,
        3 => narrow_range: boolean = false,
    }
}

options_table! {
    PackOptions {
        0 => values_count: int = 0,
        1 => axis: int = 0,
    }
}

options_table! {
    OneHotOptions {
        0 => axis: int = 0,
    }
}

options_table! {
    UnpackOptions {
        0 => num: int = 0,
        1 => axis: int = 0,
    }
}

options_table! {
    LeakyReluOptions {
        0 => alpha: float = 0.0,
    }
}

options_table! {
    MirrorPadOptions {
        0 => mode: (MirrorPadMode) = MirrorPadMode::Reflect,
    }
}

options_table! {
    UniqueOptions {
        0 => idx_out_type: dtype = TensorType::Int32,
    }
}

options_table! {
    ReverseSequenceOptions {
        0 => seq_dim: int = 0,
        1 => batch_dim: int = 0,
    }
}

options_table! {
    /// Weak reference to another subgraph by index.
    IfOptions {
        0 => then_subgraph_index: int = 0,
        1 => else_subgraph_index: int = 0,
    }
}

options_table! {
    WhileOptions {
        0 => cond_subgraph_index: int = 0,
        1 => body_subgraph_index: int = 0,
    }
}

options_table! {
    BatchMatMulOptions {
        0 => adjoint_lhs: boolean = false,
        1 => adjoint_rhs: boolean = false,
    }
}

options_table! {
    CumsumOptions {
        0 => exclusive: boolean = false,
        1 => reverse: boolean = false,
    }
}

options_table! {
    CallOnceOptions {
        0 => init_subgraph_index: int = 0,
    }
}

options_table! {
    Conv3dOptions {
        0 => padding: (Padding) = Padding::Same,
        1 => stride_d: int = 0,
        2 => stride_w: int = 0,
        3 => stride_h: int = 0,
        4 => fused_activation_function: (ActivationFunctionType) = ActivationFunctionType::None,
        5 => dilation_d_factor: int = 1,
        6 => dilation_w_factor: int = 1,
        7 => dilation_h_factor: int = 1,
    }
}

options_table! {
    HashtableOptions {
        0 => table_id: int = 0,
        1 => key_dtype: dtype = TensorType::Float32,
        2 => value_dtype: dtype = TensorType::Float32,
    }
}

options_table! {
    VarHandleOptions {
        0 => container: text = None::<String>,
        1 => shared_name: text = None::<String>,
    }
}

options_table! {
    RandomOptions {
        0 => seed: long = 0i64,
        1 => seed2: long = 0i64,
    }
}

options_table! {
    BucketizeOptions {
        0 => boundaries: floats = Vec::new(),
    }
}

options_table! {
    GeluOptions {
        0 => approximate: boolean = false,
    }
}

options_table! {
    /// Vendor extension (discriminant 252).
    BcqGatherOptions {
        0 => input_hidden_size: int = 0,
        1 => axis: int = 0,
    }
}

options_table! {
    /// Vendor extension (discriminant 253).
    BcqFullyConnectedOptions {
        0 => weights_hidden_size: int = 0,
        1 => fused_activation_function: (ActivationFunctionType) = ActivationFunctionType::None,
    }
}

options_table! {
    /// Vendor extension (discriminant 254).
    InstanceNormOptions {
        0 => epsilon: float = 0.0,
        1 => fused_activation_function: (ActivationFunctionType) = ActivationFunctionType::None,
    }
}

/// LSH projection options. Written out by hand because the wire field
/// is called `type`, which the declarative table cannot name.
#[derive(Debug, Clone, PartialEq)]
pub struct LshProjectionOptions {
    pub projection_type: LshProjectionType,
}

impl Default for LshProjectionOptions {
    fn default() -> Self {
        Self {
            projection_type: LshProjectionType::Unknown,
        }
    }
}

impl LshProjectionOptions {
    pub(crate) fn read(t: &TableReader<'_>) -> Result<Self, CodecError> {
        let raw = t.i8_field(0, 0)?;
        let projection_type = LshProjectionType::from_i8(raw)
            .ok_or_else(|| CodecError::MalformedFile(format!("unknown enum value {raw}")))?;
        Ok(Self { projection_type })
    }

    pub(crate) fn write(&self, b: &mut Builder) -> Result<u32, CodecError> {
        b.start_table();
        b.slot_i8(0, self.projection_type as i8, 0);
        b.end_table()
    }

    pub(crate) fn attrs(&self) -> Vec<Attribute> {
        vec![Attribute::new("type", self.projection_type.name())]
    }

    pub(crate) fn set(&mut self, key: &str, value: &str) -> Result<(), EditError> {
        if names_match(key, "type") {
            self.projection_type = LshProjectionType::from_name("type", value)?;
            return Ok(());
        }
        Err(EditError::UnknownAttribute(key.to_string()))
    }
}

// ---------------------------------------------------------------------------
// the union itself

macro_rules! builtin_options {
    (
        tables { $($variant:ident($struct:ident)),+ $(,)? }
        empty { $($evariant:ident),+ $(,)? }
    ) => {
        /// The builtin-options tagged union.
        ///
        /// The wire discriminant is derived from the variant, so the
        /// discriminant/payload agreement invariant holds by
        /// construction and cannot be broken by an edit.
        #[derive(Debug, Clone, PartialEq, Default)]
        pub enum BuiltinOptions {
            #[default]
            None,
            $($variant($struct),)+
            $($evariant,)+
        }

        impl BuiltinOptions {
            /// The union discriminant this payload belongs to.
            pub fn options_type(&self) -> BuiltinOptionsType {
                match self {
                    Self::None => BuiltinOptionsType::None,
                    $(Self::$variant(_) => BuiltinOptionsType::$variant,)+
                    $(Self::$evariant => BuiltinOptionsType::$evariant,)+
                }
            }

            /// Schema name of the payload table, e.g. `Conv2DOptions`.
            pub fn type_name(&self) -> &'static str {
                match self {
                    Self::None => "NONE",
                    $(Self::$variant(_) => concat!(stringify!($variant), "Options"),)+
                    $(Self::$evariant => concat!(stringify!($evariant), "Options"),)+
                }
            }

            /// Decode the payload table for a known discriminant.
            /// The caller has already resolved the union: this is only
            /// invoked with the table present and a non-NONE type.
            pub(crate) fn read(ty: BuiltinOptionsType, t: &TableReader<'_>) -> Result<Self, CodecError> {
                match ty {
                    BuiltinOptionsType::None => Ok(Self::None),
                    $(BuiltinOptionsType::$variant => Ok(Self::$variant($struct::read(t)?)),)+
                    $(BuiltinOptionsType::$evariant => Ok(Self::$evariant),)+
                }
            }

            /// Encode the payload table; `None` union members produce
            /// no table at all.
            pub(crate) fn write(&self, b: &mut Builder) -> Result<Option<u32>, CodecError> {
                match self {
                    Self::None => Ok(None),
                    $(Self::$variant(opt) => Ok(Some(opt.write(b)?)),)+
                    $(Self::$evariant => Ok(Some(b.empty_table()?)),)+
                }
            }

            /// Uniform attribute list for inspection and editing.
            pub fn attributes(&self) -> Vec<Attribute> {
                match self {
                    Self::None => Vec::new(),
                    $(Self::$variant(opt) => opt.attrs(),)+
                    $(Self::$evariant => Vec::new(),)+
                }
            }

            /// Apply one symbolic attribute edit, coercing the textual
            /// value to the field's wire representation.
            pub fn set_attribute(&mut self, name: &str, value: &str) -> Result<(), EditError> {
                match self {
                    Self::None => Err(EditError::NoOptionsTable),
                    $(Self::$variant(opt) => opt.set(name, value),)+
                    $(Self::$evariant => Err(EditError::UnknownAttribute(name.to_string())),)+
                }
            }
        }
    };
}

builtin_options! {
    tables {
        Conv2D(Conv2dOptions),
        DepthwiseConv2D(DepthwiseConv2dOptions),
        ConcatEmbeddings(ConcatEmbeddingsOptions),
        LshProjection(LshProjectionOptions),
        Pool2D(Pool2dOptions),
        Svdf(SvdfOptions),
        Rnn(RnnOptions),
        FullyConnected(FullyConnectedOptions),
        Softmax(SoftmaxOptions),
        Concatenation(ConcatenationOptions),
        Add(AddOptions),
        L2Norm(L2NormOptions),
        LocalResponseNormalization(LocalResponseNormalizationOptions),
        Lstm(LstmOptions),
        ResizeBilinear(ResizeBilinearOptions),
        Call(CallOptions),
        Reshape(ReshapeOptions),
        SkipGram(SkipGramOptions),
        SpaceToDepth(SpaceToDepthOptions),
        EmbeddingLookupSparse(EmbeddingLookupSparseOptions),
        Mul(MulOptions),
        Gather(GatherOptions),
        Reducer(ReducerOptions),
        Sub(SubOptions),
        Div(DivOptions),
        Squeeze(SqueezeOptions),
        SequenceRnn(SequenceRnnOptions),
        StridedSlice(StridedSliceOptions),
        Split(SplitOptions),
        Cast(CastOptions),
        ArgMax(ArgMaxOptions),
        TransposeConv(TransposeConvOptions),
        SparseToDense(SparseToDenseOptions),
        Shape(ShapeOptions),
        ArgMin(ArgMinOptions),
        FakeQuant(FakeQuantOptions),
        Pack(PackOptions),
        OneHot(OneHotOptions),
        Unpack(UnpackOptions),
        BidirectionalSequenceLstm(BidirectionalSequenceLstmOptions),
        BidirectionalSequenceRnn(BidirectionalSequenceRnnOptions),
        UnidirectionalSequenceLstm(UnidirectionalSequenceLstmOptions),
        ResizeNearestNeighbor(ResizeNearestNeighborOptions),
        LeakyRelu(LeakyReluOptions),
        MirrorPad(MirrorPadOptions),
        SplitV(SplitVOptions),
        Unique(UniqueOptions),
        ReverseSequence(ReverseSequenceOptions),
        If(IfOptions),
        While(WhileOptions),
        DepthToSpace(DepthToSpaceOptions),
        BatchMatMul(BatchMatMulOptions),
        Cumsum(CumsumOptions),
        CallOnce(CallOnceOptions),
        Conv3D(Conv3dOptions),
        Hashtable(HashtableOptions),
        VarHandle(VarHandleOptions),
        Random(RandomOptions),
        Bucketize(BucketizeOptions),
        Gelu(GeluOptions),
        BcqGather(BcqGatherOptions),
        BcqFullyConnected(BcqFullyConnectedOptions),
        InstanceNorm(InstanceNormOptions),
    }
    empty {
        Pad,
        BatchToSpaceNd,
        SpaceToBatchNd,
        Transpose,
        Exp,
        TopKV2,
        LogSoftmax,
        Dequantize,
        MaximumMinimum,
        Less,
        Neg,
        PadV2,
        Greater,
        GreaterEqual,
        LessEqual,
        Select,
        Slice,
        Tile,
        ExpandDims,
        Equal,
        NotEqual,
        Pow,
        LogicalOr,
        LogicalAnd,
        LogicalNot,
        FloorDiv,
        Square,
        ZerosLike,
        Fill,
        FloorMod,
        Range,
        SquaredDifference,
        Abs,
        ReverseV2,
        AddN,
        GatherNd,
        Cos,
        Where,
        Rank,
        MatrixDiag,
        Quantize,
        MatrixSetDiag,
        HardSwish,
        NonMaxSuppressionV4,
        NonMaxSuppressionV5,
        ScatterNd,
        SelectV2,
        Densify,
        SegmentSum,
        BroadcastTo,
        Rfft2d,
        HashtableFind,
        HashtableImport,
        HashtableSize,
        ReadVariable,
        AssignVariable,
        DynamicUpdateSlice,
        UnsortedSegmentProd,
        UnsortedSegmentMax,
        UnsortedSegmentMin,
        UnsortedSegmentSum,
        ATan2,
        Sign,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rondo_core::AttrValue;

    #[test]
    fn conv2d_defaults_match_schema() {
        let opt = Conv2dOptions::default();
        assert_eq!(opt.padding, Padding::Same);
        assert_eq!(opt.dilation_w_factor, 1);
        assert_eq!(opt.dilation_h_factor, 1);
        assert_eq!(opt.fused_activation_function, ActivationFunctionType::None);
    }

    #[test]
    fn attributes_render_enums_symbolically() {
        let opts = BuiltinOptions::Conv2D(Conv2dOptions {
            padding: Padding::Valid,
            stride_w: 2,
            stride_h: 2,
            ..Default::default()
        });
        let attrs = opts.attributes();
        let padding = attrs.iter().find(|a| a.name == "padding").unwrap();
        assert_eq!(padding.value, AttrValue::Str("VALID".into()));
        let stride = attrs.iter().find(|a| a.name == "stride_w").unwrap();
        assert_eq!(stride.value, AttrValue::Int(2));
    }

    #[test]
    fn set_attribute_accepts_normalized_names() {
        let mut opts = BuiltinOptions::Conv2D(Conv2dOptions::default());
        opts.set_attribute("strideW", "3").unwrap();
        opts.set_attribute("STRIDE_H", "4").unwrap();
        match &opts {
            BuiltinOptions::Conv2D(c) => {
                assert_eq!(c.stride_w, 3);
                assert_eq!(c.stride_h, 4);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn set_attribute_coerces_enum_names() {
        let mut opts = BuiltinOptions::Conv2D(Conv2dOptions::default());
        opts.set_attribute("padding", "VALID").unwrap();
        opts.set_attribute("fusedActivationFunction", "relu6").unwrap_err();
        opts.set_attribute("fusedActivationFunction", "RELU6").unwrap();
        match &opts {
            BuiltinOptions::Conv2D(c) => {
                assert_eq!(c.padding, Padding::Valid);
                assert_eq!(c.fused_activation_function, ActivationFunctionType::Relu6);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn set_attribute_rejects_unknown_enum_value() {
        let mut opts = BuiltinOptions::Conv2D(Conv2dOptions::default());
        let err = opts.set_attribute("padding", "MAYBE").unwrap_err();
        assert!(matches!(err, EditError::UnknownEnumValue { .. }));
    }

    #[test]
    fn set_attribute_rejects_foreign_attribute() {
        let mut opts = BuiltinOptions::Softmax(SoftmaxOptions::default());
        let err = opts.set_attribute("padding", "SAME").unwrap_err();
        assert!(matches!(err, EditError::UnknownAttribute(_)));
    }

    #[test]
    fn set_attribute_parses_int_lists_with_trailing_comma() {
        let mut opts = BuiltinOptions::Reshape(ReshapeOptions::default());
        opts.set_attribute("new_shape", "1, 28, 28, 3,").unwrap();
        match &opts {
            BuiltinOptions::Reshape(r) => assert_eq!(r.new_shape, vec![1, 28, 28, 3]),
            _ => unreachable!(),
        }
    }

    #[test]
    fn set_attribute_rejects_double_comma() {
        let mut opts = BuiltinOptions::Reshape(ReshapeOptions::default());
        assert!(opts.set_attribute("new_shape", "1,,3").is_err());
    }

    #[test]
    fn set_attribute_requires_boolean_literals() {
        let mut opts = BuiltinOptions::Reducer(ReducerOptions::default());
        assert!(opts.set_attribute("keep_dims", "1").is_err());
        opts.set_attribute("keep_dims", "true").unwrap();
    }

    #[test]
    fn empty_union_members_have_no_attributes() {
        assert!(BuiltinOptions::Transpose.attributes().is_empty());
        let mut opts = BuiltinOptions::Transpose;
        assert!(matches!(
            opts.set_attribute("anything", "1"),
            Err(EditError::UnknownAttribute(_))
        ));
    }

    #[test]
    fn discriminants_agree_with_payload() {
        assert_eq!(
            BuiltinOptions::Conv2D(Conv2dOptions::default()).options_type(),
            BuiltinOptionsType::Conv2D
        );
        assert_eq!(BuiltinOptions::None.options_type(), BuiltinOptionsType::None);
        assert_eq!(BuiltinOptions::Pad.options_type(), BuiltinOptionsType::Pad);
    }

    #[test]
    fn type_names_follow_schema() {
        assert_eq!(
            BuiltinOptions::Conv2D(Conv2dOptions::default()).type_name(),
            "Conv2DOptions"
        );
        assert_eq!(BuiltinOptions::Pad.type_name(), "PadOptions");
    }

    #[test]
    fn cast_options_carry_tensor_types() {
        let mut opts = BuiltinOptions::Cast(CastOptions::default());
        opts.set_attribute("out_data_type", "INT8").unwrap();
        match &opts {
            BuiltinOptions::Cast(c) => assert_eq!(c.out_data_type, TensorType::Int8),
            _ => unreachable!(),
        }
        let attrs = opts.attributes();
        assert_eq!(
            attrs.iter().find(|a| a.name == "out_data_type").unwrap().value,
            AttrValue::Str("INT8".into())
        );
    }
}
