//! End-to-end codec tests
//!
//! Exercises the full decode -> edit -> encode -> decode cycle through
//! the public API, including the documented edit semantics.

use rondo_circle::options::{
    AddOptions, BuiltinOptions, Conv2dOptions, FullyConnectedOptions, ReshapeOptions,
    StridedSliceOptions,
};
use rondo_circle::schema::{ActivationFunctionType, Padding};
use rondo_circle::{
    decode, encode, is_circle, project, Buffer, Editor, Metadata, Model, Operator, OperatorCode,
    QuantizationParams, SubGraph, Tensor, TensorPatch, TensorType,
};

/// A model that touches most of the format surface: several option
/// kinds, a vendor opcode, quantization, metadata and a description.
fn rich_model() -> Model {
    let mut conv_weights = Vec::with_capacity(36);
    for i in 0..9 {
        conv_weights.extend_from_slice(&(i as f32 * 0.1).to_le_bytes());
    }

    Model {
        version: 3,
        description: Some("built by tests".to_string()),
        operator_codes: vec![
            OperatorCode::builtin(3),   // CONV_2D
            OperatorCode::builtin(22),  // RESHAPE
            OperatorCode::builtin(9),   // FULLY_CONNECTED
            OperatorCode::builtin(0),   // ADD
            OperatorCode::builtin(45),  // STRIDED_SLICE
            OperatorCode::builtin(128), // CUMSUM, needs the extended code field
            OperatorCode::builtin(-2),  // INSTANCE_NORM vendor op
        ],
        subgraphs: vec![SubGraph {
            tensors: vec![
                Tensor::new("input", TensorType::Float32, vec![1, 8, 8, 1], 0),
                Tensor {
                    quantization: Some(QuantizationParams {
                        min: vec![-1.0],
                        max: vec![1.0],
                        scale: vec![0.0078],
                        zero_point: vec![0],
                        quantized_dimension: 0,
                    }),
                    ..Tensor::new("conv_w", TensorType::Float32, vec![1, 3, 3, 1], 1)
                },
                Tensor::new("conv_out", TensorType::Float32, vec![1, 8, 8, 1], 0),
                Tensor::new("flat", TensorType::Float32, vec![1, 64], 0),
                Tensor {
                    shape_signature: vec![-1, 64],
                    ..Tensor::new("fc_out", TensorType::Float32, vec![1, 64], 0)
                },
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
                Operator::new(
                    2,
                    vec![3, 1, -1],
                    vec![4],
                    BuiltinOptions::FullyConnected(FullyConnectedOptions {
                        fused_activation_function: ActivationFunctionType::Relu,
                        ..Default::default()
                    }),
                ),
            ],
            inputs: vec![0],
            outputs: vec![4],
            name: Some("main".to_string()),
        }],
        buffers: vec![Buffer::empty(), Buffer::new(conv_weights), Buffer::empty()],
        metadata: vec![Metadata {
            name: "min_runtime_version".to_string(),
            buffer: 2,
        }],
    }
}

#[test]
fn roundtrip_is_identity() {
    let model = rich_model();
    let bytes = encode(&model).unwrap();
    assert!(is_circle(&bytes));
    let reread = decode(&bytes).unwrap();
    assert_eq!(model, reread);
}

#[test]
fn double_roundtrip_is_stable() {
    let model = rich_model();
    let bytes = encode(&model).unwrap();
    let bytes2 = encode(&decode(&bytes).unwrap()).unwrap();
    assert_eq!(bytes, bytes2, "re-encode of an unmodified model must be stable");
}

#[test]
fn options_survive_the_wire() {
    let mut model = rich_model();
    model.operator_codes.push(OperatorCode::builtin(0));
    model.subgraphs[0].operators.push(Operator::new(
        7,
        vec![3, 3],
        vec![4],
        BuiltinOptions::Add(AddOptions {
            fused_activation_function: ActivationFunctionType::Relu6,
            pot_scale_int16: true,
        }),
    ));
    model.operator_codes.push(OperatorCode::builtin(45));
    model.subgraphs[0].operators.push(Operator::new(
        8,
        vec![3],
        vec![4],
        BuiltinOptions::StridedSlice(StridedSliceOptions {
            begin_mask: 1,
            end_mask: 3,
            ellipsis_mask: 0,
            new_axis_mask: 0,
            shrink_axis_mask: 4,
        }),
    ));
    let reread = decode(&encode(&model).unwrap()).unwrap();
    assert_eq!(model, reread);
}

#[test]
fn conv2d_padding_edit_scenario() {
    // Load, flip padding SAME -> VALID, save, reload: the edited field
    // changes and the neighbouring fields survive.
    let bytes = encode(&rich_model()).unwrap();
    let mut model = decode(&bytes).unwrap();

    Editor::new(&mut model)
        .edit_attribute(0, 0, "padding", "VALID")
        .unwrap();

    let reread = decode(&encode(&model).unwrap()).unwrap();
    match &reread.subgraphs[0].operators[0].builtin_options {
        BuiltinOptions::Conv2D(c) => {
            assert_eq!(c.padding, Padding::Valid);
            assert_eq!(c.stride_w, 1);
            assert_eq!(c.stride_h, 1);
            assert_eq!(c.fused_activation_function, ActivationFunctionType::None);
        }
        other => panic!("unexpected payload {other:?}"),
    }

    // and the projection agrees
    let records = project(&reread);
    let conv = &records[0];
    assert!(conv
        .attributes
        .iter()
        .any(|a| a.name == "padding" && format!("{:?}", a.value).contains("VALID")));
}

#[test]
fn buffer_size_guard_partial_apply() {
    let bytes = encode(&rich_model()).unwrap();
    let mut model = decode(&bytes).unwrap();
    let old_buffer = model.buffers[1].data.clone();

    let err = Editor::new(&mut model)
        .edit_tensor(
            0,
            1,
            TensorPatch {
                name: "conv_w_edited".to_string(),
                ty: TensorType::Float32,
                shape: vec![1, 3, 3, 1],
                is_variable: false,
                data: Some(vec![0u8; 7]),
            },
        )
        .unwrap_err();

    assert!(err.to_string().contains("size mismatch"), "got: {err}");
    assert_eq!(model.subgraphs[0].tensors[1].name, "conv_w_edited");
    assert_eq!(model.buffers[1].data, old_buffer);

    // matching payload goes through
    Editor::new(&mut model)
        .edit_tensor(
            0,
            1,
            TensorPatch {
                name: "conv_w_edited".to_string(),
                ty: TensorType::Float32,
                shape: vec![1, 3, 3, 1],
                is_variable: false,
                data: Some(vec![0u8; 36]),
            },
        )
        .unwrap();
    assert_eq!(model.buffers[1].data, vec![0u8; 36]);
}

#[test]
fn edge_flags_follow_buffer_contents() {
    let model = decode(&encode(&rich_model()).unwrap()).unwrap();
    let records = project(&model);
    let conv = &records[0];
    assert!(conv.inputs[0].edge, "activation input is an edge");
    assert!(!conv.inputs[1].edge, "weight input is a constant");

    // emptying the weight buffer flips the classification
    let mut model = model;
    Editor::new(&mut model).edit_buffer(1, Vec::new()).unwrap();
    let records = project(&model);
    assert!(records[0].inputs[1].edge);
}

#[test]
fn tflite_identifier_is_accepted_on_decode() {
    let mut bytes = encode(&rich_model()).unwrap();
    bytes[4..8].copy_from_slice(b"TFL3");
    let model = decode(&bytes).unwrap();
    assert_eq!(model.subgraphs.len(), 1);
    // saving always restamps the circle identifier
    let saved = encode(&model).unwrap();
    assert_eq!(&saved[4..8], b"CIR0");
}

#[test]
fn garbage_input_never_panics() {
    let bytes = encode(&rich_model()).unwrap();
    for cut in [0, 1, 7, 8, 9, bytes.len() / 2, bytes.len() - 1] {
        assert!(decode(&bytes[..cut]).is_err() || cut == bytes.len());
    }
    let mut zeros = vec![0u8; 64];
    assert!(decode(&zeros).is_err());
    zeros[4..8].copy_from_slice(b"CIR0");
    assert!(decode(&zeros).is_err());
}
