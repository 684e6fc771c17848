//! Schema tables for the circle format
//!
//! Declarative description of the format's enums: tensor element
//! types, builtin operator codes (including the vendor range), the
//! builtin-options union discriminants, and the small wire enums used
//! inside option tables. Pure data; every mapping here is total in
//! both directions so that no discriminant can go unhandled.

use rondo_core::EditError;

/// Tensor element types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum TensorType {
    Float32 = 0,
    Float16 = 1,
    Int32 = 2,
    UInt8 = 3,
    Int64 = 4,
    String = 5,
    Bool = 6,
    Int16 = 7,
    Complex64 = 8,
    Int8 = 9,
    Float64 = 10,
    Complex128 = 11,
    UInt64 = 12,
    Resource = 13,
    Variant = 14,
    UInt32 = 15,
    UInt16 = 16,
    Int4 = 17,
}

impl TensorType {
    pub fn from_i8(value: i8) -> Option<Self> {
        match value {
            0 => Some(Self::Float32),
            1 => Some(Self::Float16),
            2 => Some(Self::Int32),
            3 => Some(Self::UInt8),
            4 => Some(Self::Int64),
            5 => Some(Self::String),
            6 => Some(Self::Bool),
            7 => Some(Self::Int16),
            8 => Some(Self::Complex64),
            9 => Some(Self::Int8),
            10 => Some(Self::Float64),
            11 => Some(Self::Complex128),
            12 => Some(Self::UInt64),
            13 => Some(Self::Resource),
            14 => Some(Self::Variant),
            15 => Some(Self::UInt32),
            16 => Some(Self::UInt16),
            17 => Some(Self::Int4),
            _ => None,
        }
    }

    /// Size of one element in bytes. `None` for types without a fixed
    /// per-element width (strings, resources, variants; Int4 is
    /// packed).
    pub fn byte_size(&self) -> Option<usize> {
        match self {
            TensorType::Float32 | TensorType::Int32 | TensorType::UInt32 => Some(4),
            TensorType::Float16 | TensorType::Int16 | TensorType::UInt16 => Some(2),
            TensorType::UInt8 | TensorType::Int8 | TensorType::Bool => Some(1),
            TensorType::Int64 | TensorType::UInt64 | TensorType::Float64 => Some(8),
            TensorType::Complex64 => Some(8),
            TensorType::Complex128 => Some(16),
            TensorType::String | TensorType::Resource | TensorType::Variant | TensorType::Int4 => {
                None
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TensorType::Float32 => "FLOAT32",
            TensorType::Float16 => "FLOAT16",
            TensorType::Int32 => "INT32",
            TensorType::UInt8 => "UINT8",
            TensorType::Int64 => "INT64",
            TensorType::String => "STRING",
            TensorType::Bool => "BOOL",
            TensorType::Int16 => "INT16",
            TensorType::Complex64 => "COMPLEX64",
            TensorType::Int8 => "INT8",
            TensorType::Float64 => "FLOAT64",
            TensorType::Complex128 => "COMPLEX128",
            TensorType::UInt64 => "UINT64",
            TensorType::Resource => "RESOURCE",
            TensorType::Variant => "VARIANT",
            TensorType::UInt32 => "UINT32",
            TensorType::UInt16 => "UINT16",
            TensorType::Int4 => "INT4",
        }
    }

    /// Case-insensitive name lookup. BOOLEAN is accepted as an alias
    /// of BOOL for compatibility with the edit protocol.
    pub fn from_name(name: &str) -> Result<Self, EditError> {
        let upper = name.to_ascii_uppercase();
        let upper = if upper == "BOOLEAN" { "BOOL".to_string() } else { upper };
        ALL_TENSOR_TYPES
            .iter()
            .copied()
            .find(|t| t.name() == upper)
            .ok_or(EditError::UnknownTensorType(name.to_string()))
    }
}

const ALL_TENSOR_TYPES: &[TensorType] = &[
    TensorType::Float32,
    TensorType::Float16,
    TensorType::Int32,
    TensorType::UInt8,
    TensorType::Int64,
    TensorType::String,
    TensorType::Bool,
    TensorType::Int16,
    TensorType::Complex64,
    TensorType::Int8,
    TensorType::Float64,
    TensorType::Complex128,
    TensorType::UInt64,
    TensorType::Resource,
    TensorType::Variant,
    TensorType::UInt32,
    TensorType::UInt16,
    TensorType::Int4,
];

/// Compare an operator/attribute name against a canonical schema name
/// ignoring case and underscores, so `depthwiseConv2D`, `DEPTHWISE_CONV_2D`
/// and `DepthwiseConv2d` all match.
pub(crate) fn names_match(input: &str, canonical: &str) -> bool {
    let mut a = input.chars().filter(|c| *c != '_').map(|c| c.to_ascii_uppercase());
    let mut b = canonical.chars().filter(|c| *c != '_').map(|c| c.to_ascii_uppercase());
    loop {
        match (a.next(), b.next()) {
            (None, None) => return true,
            (Some(x), Some(y)) if x == y => continue,
            _ => return false,
        }
    }
}

macro_rules! wire_enum {
    ($(#[$doc:meta])* $name:ident { $($variant:ident = $code:expr => $text:literal),+ $(,)? }) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[repr(i8)]
        pub enum $name {
            $($variant = $code),+
        }

        impl $name {
            pub fn from_i8(value: i8) -> Option<Self> {
                match value {
                    $($code => Some(Self::$variant),)+
                    _ => None,
                }
            }

            pub fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }

            pub fn from_name(field: &str, name: &str) -> Result<Self, EditError> {
                match name.to_ascii_uppercase().as_str() {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(EditError::unknown_enum(field, name)),
                }
            }
        }
    };
}

wire_enum! {
    /// Fused activation applied by an operator.
    ActivationFunctionType {
        None = 0 => "NONE",
        Relu = 1 => "RELU",
        ReluN1To1 = 2 => "RELU_N1_TO_1",
        Relu6 = 3 => "RELU6",
        Tanh = 4 => "TANH",
        SignBit = 5 => "SIGN_BIT",
    }
}

wire_enum! {
    Padding {
        Same = 0 => "SAME",
        Valid = 1 => "VALID",
    }
}

wire_enum! {
    LshProjectionType {
        Unknown = 0 => "UNKNOWN",
        Sparse = 1 => "SPARSE",
        Dense = 2 => "DENSE",
    }
}

wire_enum! {
    FullyConnectedWeightsFormat {
        Default = 0 => "DEFAULT",
        Shuffled4x16Int8 = 1 => "SHUFFLED4X16INT8",
    }
}

wire_enum! {
    LstmKernelType {
        Full = 0 => "FULL",
        Basic = 1 => "BASIC",
    }
}

wire_enum! {
    MirrorPadMode {
        Reflect = 0 => "REFLECT",
        Symmetric = 1 => "SYMMETRIC",
    }
}

wire_enum! {
    CombinerType {
        Sum = 0 => "SUM",
        Mean = 1 => "MEAN",
        Sqrtn = 2 => "SQRTN",
    }
}

/// Discriminant of the builtin-options union.
///
/// One value per possible payload table; 252..254 is the vendor
/// extension range (BCQ family and InstanceNorm).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BuiltinOptionsType {
    None = 0,
    Conv2D = 1,
    DepthwiseConv2D = 2,
    ConcatEmbeddings = 3,
    LshProjection = 4,
    Pool2D = 5,
    Svdf = 6,
    Rnn = 7,
    FullyConnected = 8,
    Softmax = 9,
    Concatenation = 10,
    Add = 11,
    L2Norm = 12,
    LocalResponseNormalization = 13,
    Lstm = 14,
    ResizeBilinear = 15,
    Call = 16,
    Reshape = 17,
    SkipGram = 18,
    SpaceToDepth = 19,
    EmbeddingLookupSparse = 20,
    Mul = 21,
    Pad = 22,
    Gather = 23,
    BatchToSpaceNd = 24,
    SpaceToBatchNd = 25,
    Transpose = 26,
    Reducer = 27,
    Sub = 28,
    Div = 29,
    Squeeze = 30,
    SequenceRnn = 31,
    StridedSlice = 32,
    Exp = 33,
    TopKV2 = 34,
    Split = 35,
    LogSoftmax = 36,
    Cast = 37,
    Dequantize = 38,
    MaximumMinimum = 39,
    ArgMax = 40,
    Less = 41,
    Neg = 42,
    PadV2 = 43,
    Greater = 44,
    GreaterEqual = 45,
    LessEqual = 46,
    Select = 47,
    Slice = 48,
    TransposeConv = 49,
    SparseToDense = 50,
    Tile = 51,
    ExpandDims = 52,
    Equal = 53,
    NotEqual = 54,
    Shape = 55,
    Pow = 56,
    ArgMin = 57,
    FakeQuant = 58,
    Pack = 59,
    LogicalOr = 60,
    OneHot = 61,
    LogicalAnd = 62,
    LogicalNot = 63,
    Unpack = 64,
    FloorDiv = 65,
    Square = 66,
    ZerosLike = 67,
    Fill = 68,
    BidirectionalSequenceLstm = 69,
    BidirectionalSequenceRnn = 70,
    UnidirectionalSequenceLstm = 71,
    FloorMod = 72,
    Range = 73,
    ResizeNearestNeighbor = 74,
    LeakyRelu = 75,
    SquaredDifference = 76,
    MirrorPad = 77,
    Abs = 78,
    SplitV = 79,
    Unique = 80,
    ReverseV2 = 81,
    AddN = 82,
    GatherNd = 83,
    Cos = 84,
    Where = 85,
    Rank = 86,
    ReverseSequence = 87,
    MatrixDiag = 88,
    Quantize = 89,
    MatrixSetDiag = 90,
    HardSwish = 91,
    If = 92,
    While = 93,
    DepthToSpace = 94,
    NonMaxSuppressionV4 = 95,
    NonMaxSuppressionV5 = 96,
    ScatterNd = 97,
    SelectV2 = 98,
    Densify = 99,
    SegmentSum = 100,
    BatchMatMul = 101,
    Cumsum = 102,
    CallOnce = 103,
    BroadcastTo = 104,
    Rfft2d = 105,
    Conv3D = 106,
    Hashtable = 107,
    HashtableFind = 108,
    HashtableImport = 109,
    HashtableSize = 110,
    VarHandle = 111,
    ReadVariable = 112,
    AssignVariable = 113,
    Random = 114,
    Bucketize = 115,
    Gelu = 116,
    DynamicUpdateSlice = 117,
    UnsortedSegmentProd = 118,
    UnsortedSegmentMax = 119,
    UnsortedSegmentMin = 120,
    UnsortedSegmentSum = 121,
    ATan2 = 122,
    Sign = 123,
    BcqGather = 252,
    BcqFullyConnected = 253,
    InstanceNorm = 254,
}

impl BuiltinOptionsType {
    pub fn from_u8(value: u8) -> Option<Self> {
        ALL_OPTIONS_TYPES.iter().copied().find(|t| *t as u8 == value)
    }
}

pub(crate) const ALL_OPTIONS_TYPES: &[BuiltinOptionsType] = &[
    BuiltinOptionsType::None,
    BuiltinOptionsType::Conv2D,
    BuiltinOptionsType::DepthwiseConv2D,
    BuiltinOptionsType::ConcatEmbeddings,
    BuiltinOptionsType::LshProjection,
    BuiltinOptionsType::Pool2D,
    BuiltinOptionsType::Svdf,
    BuiltinOptionsType::Rnn,
    BuiltinOptionsType::FullyConnected,
    BuiltinOptionsType::Softmax,
    BuiltinOptionsType::Concatenation,
    BuiltinOptionsType::Add,
    BuiltinOptionsType::L2Norm,
    BuiltinOptionsType::LocalResponseNormalization,
    BuiltinOptionsType::Lstm,
    BuiltinOptionsType::ResizeBilinear,
    BuiltinOptionsType::Call,
    BuiltinOptionsType::Reshape,
    BuiltinOptionsType::SkipGram,
    BuiltinOptionsType::SpaceToDepth,
    BuiltinOptionsType::EmbeddingLookupSparse,
    BuiltinOptionsType::Mul,
    BuiltinOptionsType::Pad,
    BuiltinOptionsType::Gather,
    BuiltinOptionsType::BatchToSpaceNd,
    BuiltinOptionsType::SpaceToBatchNd,
    BuiltinOptionsType::Transpose,
    BuiltinOptionsType::Reducer,
    BuiltinOptionsType::Sub,
    BuiltinOptionsType::Div,
    BuiltinOptionsType::Squeeze,
    BuiltinOptionsType::SequenceRnn,
    BuiltinOptionsType::StridedSlice,
    BuiltinOptionsType::Exp,
    BuiltinOptionsType::TopKV2,
    BuiltinOptionsType::Split,
    BuiltinOptionsType::LogSoftmax,
    BuiltinOptionsType::Cast,
    BuiltinOptionsType::Dequantize,
    BuiltinOptionsType::MaximumMinimum,
    BuiltinOptionsType::ArgMax,
    BuiltinOptionsType::Less,
    BuiltinOptionsType::Neg,
    BuiltinOptionsType::PadV2,
    BuiltinOptionsType::Greater,
    BuiltinOptionsType::GreaterEqual,
    BuiltinOptionsType::LessEqual,
    BuiltinOptionsType::Select,
    BuiltinOptionsType::Slice,
    BuiltinOptionsType::TransposeConv,
    BuiltinOptionsType::SparseToDense,
    BuiltinOptionsType::Tile,
    BuiltinOptionsType::ExpandDims,
    BuiltinOptionsType::Equal,
    BuiltinOptionsType::NotEqual,
    BuiltinOptionsType::Shape,
    BuiltinOptionsType::Pow,
    BuiltinOptionsType::ArgMin,
    BuiltinOptionsType::FakeQuant,
    BuiltinOptionsType::Pack,
    BuiltinOptionsType::LogicalOr,
    BuiltinOptionsType::OneHot,
    BuiltinOptionsType::LogicalAnd,
    BuiltinOptionsType::LogicalNot,
    BuiltinOptionsType::Unpack,
    BuiltinOptionsType::FloorDiv,
    BuiltinOptionsType::Square,
    BuiltinOptionsType::ZerosLike,
    BuiltinOptionsType::Fill,
    BuiltinOptionsType::BidirectionalSequenceLstm,
    BuiltinOptionsType::BidirectionalSequenceRnn,
    BuiltinOptionsType::UnidirectionalSequenceLstm,
    BuiltinOptionsType::FloorMod,
    BuiltinOptionsType::Range,
    BuiltinOptionsType::ResizeNearestNeighbor,
    BuiltinOptionsType::LeakyRelu,
    BuiltinOptionsType::SquaredDifference,
    BuiltinOptionsType::MirrorPad,
    BuiltinOptionsType::Abs,
    BuiltinOptionsType::SplitV,
    BuiltinOptionsType::Unique,
    BuiltinOptionsType::ReverseV2,
    BuiltinOptionsType::AddN,
    BuiltinOptionsType::GatherNd,
    BuiltinOptionsType::Cos,
    BuiltinOptionsType::Where,
    BuiltinOptionsType::Rank,
    BuiltinOptionsType::ReverseSequence,
    BuiltinOptionsType::MatrixDiag,
    BuiltinOptionsType::Quantize,
    BuiltinOptionsType::MatrixSetDiag,
    BuiltinOptionsType::HardSwish,
    BuiltinOptionsType::If,
    BuiltinOptionsType::While,
    BuiltinOptionsType::DepthToSpace,
    BuiltinOptionsType::NonMaxSuppressionV4,
    BuiltinOptionsType::NonMaxSuppressionV5,
    BuiltinOptionsType::ScatterNd,
    BuiltinOptionsType::SelectV2,
    BuiltinOptionsType::Densify,
    BuiltinOptionsType::SegmentSum,
    BuiltinOptionsType::BatchMatMul,
    BuiltinOptionsType::Cumsum,
    BuiltinOptionsType::CallOnce,
    BuiltinOptionsType::BroadcastTo,
    BuiltinOptionsType::Rfft2d,
    BuiltinOptionsType::Conv3D,
    BuiltinOptionsType::Hashtable,
    BuiltinOptionsType::HashtableFind,
    BuiltinOptionsType::HashtableImport,
    BuiltinOptionsType::HashtableSize,
    BuiltinOptionsType::VarHandle,
    BuiltinOptionsType::ReadVariable,
    BuiltinOptionsType::AssignVariable,
    BuiltinOptionsType::Random,
    BuiltinOptionsType::Bucketize,
    BuiltinOptionsType::Gelu,
    BuiltinOptionsType::DynamicUpdateSlice,
    BuiltinOptionsType::UnsortedSegmentProd,
    BuiltinOptionsType::UnsortedSegmentMax,
    BuiltinOptionsType::UnsortedSegmentMin,
    BuiltinOptionsType::UnsortedSegmentSum,
    BuiltinOptionsType::ATan2,
    BuiltinOptionsType::Sign,
    BuiltinOptionsType::BcqGather,
    BuiltinOptionsType::BcqFullyConnected,
    BuiltinOptionsType::InstanceNorm,
];

macro_rules! builtin_operators {
    ($($variant:ident = $code:expr => $text:literal),+ $(,)?) => {
        /// Builtin operator kinds, including the circle vendor range
        /// (negative codes).
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(i32)]
        pub enum BuiltinOperator {
            $($variant = $code),+
        }

        impl BuiltinOperator {
            pub const ALL: &'static [BuiltinOperator] = &[$(BuiltinOperator::$variant),+];

            pub fn code(&self) -> i32 {
                *self as i32
            }

            pub fn from_code(code: i32) -> Option<Self> {
                match code {
                    $($code => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// Canonical schema name, e.g. `CONV_2D`.
            pub fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }

            /// Lookup by name, ignoring case and underscores
            /// (`conv2d` resolves to `CONV_2D`).
            pub fn from_name(name: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|op| names_match(name, op.name()))
            }
        }
    };
}

builtin_operators! {
    BcqGather = -4 => "BCQ_GATHER",
    BcqFullyConnected = -3 => "BCQ_FULLY_CONNECTED",
    InstanceNorm = -2 => "INSTANCE_NORM",
    Add = 0 => "ADD",
    AveragePool2d = 1 => "AVERAGE_POOL_2D",
    Concatenation = 2 => "CONCATENATION",
    Conv2d = 3 => "CONV_2D",
    DepthwiseConv2d = 4 => "DEPTHWISE_CONV_2D",
    DepthToSpace = 5 => "DEPTH_TO_SPACE",
    Dequantize = 6 => "DEQUANTIZE",
    EmbeddingLookup = 7 => "EMBEDDING_LOOKUP",
    Floor = 8 => "FLOOR",
    FullyConnected = 9 => "FULLY_CONNECTED",
    HashtableLookup = 10 => "HASHTABLE_LOOKUP",
    L2Normalization = 11 => "L2_NORMALIZATION",
    L2Pool2d = 12 => "L2_POOL_2D",
    LocalResponseNormalization = 13 => "LOCAL_RESPONSE_NORMALIZATION",
    Logistic = 14 => "LOGISTIC",
    LshProjection = 15 => "LSH_PROJECTION",
    Lstm = 16 => "LSTM",
    MaxPool2d = 17 => "MAX_POOL_2D",
    Mul = 18 => "MUL",
    Relu = 19 => "RELU",
    ReluN1To1 = 20 => "RELU_N1_TO_1",
    Relu6 = 21 => "RELU6",
    Reshape = 22 => "RESHAPE",
    ResizeBilinear = 23 => "RESIZE_BILINEAR",
    Rnn = 24 => "RNN",
    Softmax = 25 => "SOFTMAX",
    SpaceToDepth = 26 => "SPACE_TO_DEPTH",
    Svdf = 27 => "SVDF",
    Tanh = 28 => "TANH",
    ConcatEmbeddings = 29 => "CONCAT_EMBEDDINGS",
    SkipGram = 30 => "SKIP_GRAM",
    Call = 31 => "CALL",
    Custom = 32 => "CUSTOM",
    EmbeddingLookupSparse = 33 => "EMBEDDING_LOOKUP_SPARSE",
    Pad = 34 => "PAD",
    UnidirectionalSequenceRnn = 35 => "UNIDIRECTIONAL_SEQUENCE_RNN",
    Gather = 36 => "GATHER",
    BatchToSpaceNd = 37 => "BATCH_TO_SPACE_ND",
    SpaceToBatchNd = 38 => "SPACE_TO_BATCH_ND",
    Transpose = 39 => "TRANSPOSE",
    Mean = 40 => "MEAN",
    Sub = 41 => "SUB",
    Div = 42 => "DIV",
    Squeeze = 43 => "SQUEEZE",
    UnidirectionalSequenceLstm = 44 => "UNIDIRECTIONAL_SEQUENCE_LSTM",
    StridedSlice = 45 => "STRIDED_SLICE",
    BidirectionalSequenceRnn = 46 => "BIDIRECTIONAL_SEQUENCE_RNN",
    Exp = 47 => "EXP",
    TopkV2 = 48 => "TOPK_V2",
    Split = 49 => "SPLIT",
    LogSoftmax = 50 => "LOG_SOFTMAX",
    Delegate = 51 => "DELEGATE",
    BidirectionalSequenceLstm = 52 => "BIDIRECTIONAL_SEQUENCE_LSTM",
    Cast = 53 => "CAST",
    Prelu = 54 => "PRELU",
    Maximum = 55 => "MAXIMUM",
    ArgMax = 56 => "ARG_MAX",
    Minimum = 57 => "MINIMUM",
    Less = 58 => "LESS",
    Neg = 59 => "NEG",
    Padv2 = 60 => "PADV2",
    Greater = 61 => "GREATER",
    GreaterEqual = 62 => "GREATER_EQUAL",
    LessEqual = 63 => "LESS_EQUAL",
    Select = 64 => "SELECT",
    Slice = 65 => "SLICE",
    Sin = 66 => "SIN",
    TransposeConv = 67 => "TRANSPOSE_CONV",
    SparseToDense = 68 => "SPARSE_TO_DENSE",
    Tile = 69 => "TILE",
    ExpandDims = 70 => "EXPAND_DIMS",
    Equal = 71 => "EQUAL",
    NotEqual = 72 => "NOT_EQUAL",
    Log = 73 => "LOG",
    Sum = 74 => "SUM",
    Sqrt = 75 => "SQRT",
    Rsqrt = 76 => "RSQRT",
    Shape = 77 => "SHAPE",
    Pow = 78 => "POW",
    ArgMin = 79 => "ARG_MIN",
    FakeQuant = 80 => "FAKE_QUANT",
    ReduceProd = 81 => "REDUCE_PROD",
    ReduceMax = 82 => "REDUCE_MAX",
    Pack = 83 => "PACK",
    LogicalOr = 84 => "LOGICAL_OR",
    OneHot = 85 => "ONE_HOT",
    LogicalAnd = 86 => "LOGICAL_AND",
    LogicalNot = 87 => "LOGICAL_NOT",
    Unpack = 88 => "UNPACK",
    ReduceMin = 89 => "REDUCE_MIN",
    FloorDiv = 90 => "FLOOR_DIV",
    ReduceAny = 91 => "REDUCE_ANY",
    Square = 92 => "SQUARE",
    ZerosLike = 93 => "ZEROS_LIKE",
    Fill = 94 => "FILL",
    FloorMod = 95 => "FLOOR_MOD",
    Range = 96 => "RANGE",
    ResizeNearestNeighbor = 97 => "RESIZE_NEAREST_NEIGHBOR",
    LeakyRelu = 98 => "LEAKY_RELU",
    SquaredDifference = 99 => "SQUARED_DIFFERENCE",
    MirrorPad = 100 => "MIRROR_PAD",
    Abs = 101 => "ABS",
    SplitV = 102 => "SPLIT_V",
    Unique = 103 => "UNIQUE",
    Ceil = 104 => "CEIL",
    ReverseV2 = 105 => "REVERSE_V2",
    AddN = 106 => "ADD_N",
    GatherNd = 107 => "GATHER_ND",
    Cos = 108 => "COS",
    Where = 109 => "WHERE",
    Rank = 110 => "RANK",
    Elu = 111 => "ELU",
    ReverseSequence = 112 => "REVERSE_SEQUENCE",
    MatrixDiag = 113 => "MATRIX_DIAG",
    Quantize = 114 => "QUANTIZE",
    MatrixSetDiag = 115 => "MATRIX_SET_DIAG",
    Round = 116 => "ROUND",
    HardSwish = 117 => "HARD_SWISH",
    If = 118 => "IF",
    While = 119 => "WHILE",
    NonMaxSuppressionV4 = 120 => "NON_MAX_SUPPRESSION_V4",
    NonMaxSuppressionV5 = 121 => "NON_MAX_SUPPRESSION_V5",
    ScatterNd = 122 => "SCATTER_ND",
    SelectV2 = 123 => "SELECT_V2",
    Densify = 124 => "DENSIFY",
    SegmentSum = 125 => "SEGMENT_SUM",
    BatchMatmul = 126 => "BATCH_MATMUL",
    PlaceholderForGreaterOpCodes = 127 => "PLACEHOLDER_FOR_GREATER_OP_CODES",
    Cumsum = 128 => "CUMSUM",
    CallOnce = 129 => "CALL_ONCE",
    BroadcastTo = 130 => "BROADCAST_TO",
    Rfft2d = 131 => "RFFT2D",
    Conv3d = 132 => "CONV_3D",
    Imag = 133 => "IMAG",
    Real = 134 => "REAL",
    ComplexAbs = 135 => "COMPLEX_ABS",
    Hashtable = 136 => "HASHTABLE",
    HashtableFind = 137 => "HASHTABLE_FIND",
    HashtableImport = 138 => "HASHTABLE_IMPORT",
    HashtableSize = 139 => "HASHTABLE_SIZE",
    ReduceAll = 140 => "REDUCE_ALL",
    Conv3dTranspose = 141 => "CONV_3D_TRANSPOSE",
    VarHandle = 142 => "VAR_HANDLE",
    ReadVariable = 143 => "READ_VARIABLE",
    AssignVariable = 144 => "ASSIGN_VARIABLE",
    BroadcastArgs = 145 => "BROADCAST_ARGS",
    RandomStandardNormal = 146 => "RANDOM_STANDARD_NORMAL",
}

impl BuiltinOperator {
    /// Which options-union payload this operator kind carries.
    ///
    /// The three pool ops share `Pool2D`; the reduce family shares
    /// `Reducer`. Kinds with no attribute table map to `None`.
    pub fn options_type(&self) -> BuiltinOptionsType {
        use BuiltinOperator as Op;
        use BuiltinOptionsType as Ot;
        match self {
            Op::Add => Ot::Add,
            Op::AveragePool2d | Op::L2Pool2d | Op::MaxPool2d => Ot::Pool2D,
            Op::Concatenation => Ot::Concatenation,
            Op::Conv2d => Ot::Conv2D,
            Op::DepthwiseConv2d => Ot::DepthwiseConv2D,
            Op::DepthToSpace => Ot::DepthToSpace,
            Op::Dequantize => Ot::Dequantize,
            Op::FullyConnected => Ot::FullyConnected,
            Op::L2Normalization => Ot::L2Norm,
            Op::LocalResponseNormalization => Ot::LocalResponseNormalization,
            Op::LshProjection => Ot::LshProjection,
            Op::Lstm => Ot::Lstm,
            Op::Mul => Ot::Mul,
            Op::Reshape => Ot::Reshape,
            Op::ResizeBilinear => Ot::ResizeBilinear,
            Op::Rnn => Ot::Rnn,
            Op::Softmax => Ot::Softmax,
            Op::SpaceToDepth => Ot::SpaceToDepth,
            Op::Svdf => Ot::Svdf,
            Op::ConcatEmbeddings => Ot::ConcatEmbeddings,
            Op::SkipGram => Ot::SkipGram,
            Op::Call => Ot::Call,
            Op::EmbeddingLookupSparse => Ot::EmbeddingLookupSparse,
            Op::Pad => Ot::Pad,
            Op::UnidirectionalSequenceRnn => Ot::SequenceRnn,
            Op::Gather => Ot::Gather,
            Op::BatchToSpaceNd => Ot::BatchToSpaceNd,
            Op::SpaceToBatchNd => Ot::SpaceToBatchNd,
            Op::Transpose => Ot::Transpose,
            Op::Mean
            | Op::Sum
            | Op::ReduceProd
            | Op::ReduceMax
            | Op::ReduceMin
            | Op::ReduceAny
            | Op::ReduceAll => Ot::Reducer,
            Op::Sub => Ot::Sub,
            Op::Div => Ot::Div,
            Op::Squeeze => Ot::Squeeze,
            Op::UnidirectionalSequenceLstm => Ot::UnidirectionalSequenceLstm,
            Op::StridedSlice => Ot::StridedSlice,
            Op::BidirectionalSequenceRnn => Ot::BidirectionalSequenceRnn,
            Op::Exp => Ot::Exp,
            Op::TopkV2 => Ot::TopKV2,
            Op::Split => Ot::Split,
            Op::LogSoftmax => Ot::LogSoftmax,
            Op::BidirectionalSequenceLstm => Ot::BidirectionalSequenceLstm,
            Op::Cast => Ot::Cast,
            Op::Maximum | Op::Minimum => Ot::MaximumMinimum,
            Op::ArgMax => Ot::ArgMax,
            Op::Less => Ot::Less,
            Op::Neg => Ot::Neg,
            Op::Padv2 => Ot::PadV2,
            Op::Greater => Ot::Greater,
            Op::GreaterEqual => Ot::GreaterEqual,
            Op::LessEqual => Ot::LessEqual,
            Op::Select => Ot::Select,
            Op::Slice => Ot::Slice,
            Op::TransposeConv => Ot::TransposeConv,
            Op::SparseToDense => Ot::SparseToDense,
            Op::Tile => Ot::Tile,
            Op::ExpandDims => Ot::ExpandDims,
            Op::Equal => Ot::Equal,
            Op::NotEqual => Ot::NotEqual,
            Op::Shape => Ot::Shape,
            Op::Pow => Ot::Pow,
            Op::ArgMin => Ot::ArgMin,
            Op::FakeQuant => Ot::FakeQuant,
            Op::Pack => Ot::Pack,
            Op::LogicalOr => Ot::LogicalOr,
            Op::OneHot => Ot::OneHot,
            Op::LogicalAnd => Ot::LogicalAnd,
            Op::LogicalNot => Ot::LogicalNot,
            Op::Unpack => Ot::Unpack,
            Op::FloorDiv => Ot::FloorDiv,
            Op::Square => Ot::Square,
            Op::ZerosLike => Ot::ZerosLike,
            Op::Fill => Ot::Fill,
            Op::FloorMod => Ot::FloorMod,
            Op::Range => Ot::Range,
            Op::ResizeNearestNeighbor => Ot::ResizeNearestNeighbor,
            Op::LeakyRelu => Ot::LeakyRelu,
            Op::SquaredDifference => Ot::SquaredDifference,
            Op::MirrorPad => Ot::MirrorPad,
            Op::Abs => Ot::Abs,
            Op::SplitV => Ot::SplitV,
            Op::Unique => Ot::Unique,
            Op::ReverseV2 => Ot::ReverseV2,
            Op::AddN => Ot::AddN,
            Op::GatherNd => Ot::GatherNd,
            Op::Cos => Ot::Cos,
            Op::Where => Ot::Where,
            Op::Rank => Ot::Rank,
            Op::ReverseSequence => Ot::ReverseSequence,
            Op::MatrixDiag => Ot::MatrixDiag,
            Op::Quantize => Ot::Quantize,
            Op::MatrixSetDiag => Ot::MatrixSetDiag,
            Op::HardSwish => Ot::HardSwish,
            Op::If => Ot::If,
            Op::While => Ot::While,
            Op::NonMaxSuppressionV4 => Ot::NonMaxSuppressionV4,
            Op::NonMaxSuppressionV5 => Ot::NonMaxSuppressionV5,
            Op::ScatterNd => Ot::ScatterNd,
            Op::SelectV2 => Ot::SelectV2,
            Op::Densify => Ot::Densify,
            Op::SegmentSum => Ot::SegmentSum,
            Op::BatchMatmul => Ot::BatchMatMul,
            Op::Cumsum => Ot::Cumsum,
            Op::CallOnce => Ot::CallOnce,
            Op::BroadcastTo => Ot::BroadcastTo,
            Op::Rfft2d => Ot::Rfft2d,
            Op::Conv3d | Op::Conv3dTranspose => Ot::Conv3D,
            Op::Hashtable => Ot::Hashtable,
            Op::HashtableFind => Ot::HashtableFind,
            Op::HashtableImport => Ot::HashtableImport,
            Op::HashtableSize => Ot::HashtableSize,
            Op::VarHandle => Ot::VarHandle,
            Op::ReadVariable => Ot::ReadVariable,
            Op::AssignVariable => Ot::AssignVariable,
            Op::RandomStandardNormal => Ot::Random,
            Op::BcqGather => Ot::BcqGather,
            Op::BcqFullyConnected => Ot::BcqFullyConnected,
            Op::InstanceNorm => Ot::InstanceNorm,
            // Kinds with no attribute table. Listed one by one so a
            // newly added operator fails to compile until it is mapped.
            Op::EmbeddingLookup
            | Op::Floor
            | Op::HashtableLookup
            | Op::Logistic
            | Op::Relu
            | Op::ReluN1To1
            | Op::Relu6
            | Op::Tanh
            | Op::Custom
            | Op::Delegate
            | Op::Prelu
            | Op::Sin
            | Op::Log
            | Op::Sqrt
            | Op::Rsqrt
            | Op::Ceil
            | Op::Elu
            | Op::Round
            | Op::PlaceholderForGreaterOpCodes
            | Op::Imag
            | Op::Real
            | Op::ComplexAbs
            | Op::BroadcastArgs => Ot::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tensor_type_roundtrip() {
        for ty in ALL_TENSOR_TYPES {
            assert_eq!(TensorType::from_i8(*ty as i8), Some(*ty));
            assert_eq!(TensorType::from_name(ty.name()).unwrap(), *ty);
        }
    }

    #[test]
    fn boolean_is_an_alias_of_bool() {
        assert_eq!(TensorType::from_name("boolean").unwrap(), TensorType::Bool);
    }

    #[test]
    fn operator_name_lookup_ignores_case_and_underscores() {
        assert_eq!(BuiltinOperator::from_name("conv2d"), Some(BuiltinOperator::Conv2d));
        assert_eq!(
            BuiltinOperator::from_name("depthwiseConv2D"),
            Some(BuiltinOperator::DepthwiseConv2d)
        );
        assert_eq!(BuiltinOperator::from_name("AVERAGE_POOL_2D"), Some(BuiltinOperator::AveragePool2d));
        assert_eq!(BuiltinOperator::from_name("no_such_op"), None);
    }

    #[test]
    fn operator_code_roundtrip() {
        for op in BuiltinOperator::ALL {
            assert_eq!(BuiltinOperator::from_code(op.code()), Some(*op));
        }
    }

    #[test]
    fn pool_ops_share_pool2d_options() {
        assert_eq!(BuiltinOperator::AveragePool2d.options_type(), BuiltinOptionsType::Pool2D);
        assert_eq!(BuiltinOperator::MaxPool2d.options_type(), BuiltinOptionsType::Pool2D);
        assert_eq!(BuiltinOperator::L2Pool2d.options_type(), BuiltinOptionsType::Pool2D);
    }

    #[test]
    fn reduce_family_shares_reducer_options() {
        for op in [
            BuiltinOperator::Mean,
            BuiltinOperator::Sum,
            BuiltinOperator::ReduceProd,
            BuiltinOperator::ReduceMax,
            BuiltinOperator::ReduceMin,
            BuiltinOperator::ReduceAny,
            BuiltinOperator::ReduceAll,
        ] {
            assert_eq!(op.options_type(), BuiltinOptionsType::Reducer);
        }
    }

    #[test]
    fn activation_ops_carry_no_options() {
        for op in [
            BuiltinOperator::Relu,
            BuiltinOperator::Relu6,
            BuiltinOperator::Logistic,
            BuiltinOperator::Tanh,
            BuiltinOperator::Floor,
            BuiltinOperator::Custom,
        ] {
            assert_eq!(op.options_type(), BuiltinOptionsType::None);
        }
    }

    #[test]
    fn vendor_codes_are_negative() {
        assert_eq!(BuiltinOperator::BcqGather.code(), -4);
        assert_eq!(BuiltinOperator::InstanceNorm.code(), -2);
        assert_eq!(BuiltinOptionsType::InstanceNorm as u8, 254);
    }

    #[test]
    fn options_type_discriminants_roundtrip() {
        for ty in ALL_OPTIONS_TYPES {
            assert_eq!(BuiltinOptionsType::from_u8(*ty as u8), Some(*ty));
        }
    }

    #[test]
    fn unknown_activation_name_is_rejected() {
        let err = ActivationFunctionType::from_name("fused_activation_function", "SOFTPLUS");
        assert!(err.is_err());
    }
}
