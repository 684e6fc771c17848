//! Integration tests for the rondo CLI
//!
//! Drives the binary end to end against a synthetic circle file.

use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

use rondo_circle::options::{BuiltinOptions, Conv2dOptions};
use rondo_circle::schema::Padding;
use rondo_circle::{
    decode, encode, Buffer, Model, Operator, OperatorCode, SubGraph, Tensor, TensorType,
};

/// Get the path to the rondo binary
fn rondo_bin() -> PathBuf {
    std::env::current_exe()
        .expect("Failed to get current exe")
        .parent()
        .expect("No parent")
        .parent()
        .expect("No grandparent")
        .join("rondo")
}

fn test_model() -> Model {
    Model {
        version: 3,
        description: Some("cli test model".to_string()),
        operator_codes: vec![OperatorCode::builtin(3)],
        subgraphs: vec![SubGraph {
            tensors: vec![
                Tensor::new("input", TensorType::Float32, vec![1, 8, 8, 1], 0),
                Tensor::new("weights", TensorType::Float32, vec![1, 3, 3, 1], 1),
                Tensor::new("output", TensorType::Float32, vec![1, 8, 8, 1], 0),
            ],
            operators: vec![Operator::new(
                0,
                vec![0, 1],
                vec![2],
                BuiltinOptions::Conv2D(Conv2dOptions {
                    stride_w: 1,
                    stride_h: 1,
                    ..Default::default()
                }),
            )],
            inputs: vec![0],
            outputs: vec![2],
            name: Some("main".to_string()),
        }],
        buffers: vec![Buffer::empty(), Buffer::new(vec![0u8; 36])],
        metadata: Vec::new(),
    }
}

fn write_test_model(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("model.circle");
    fs::write(&path, encode(&test_model()).unwrap()).unwrap();
    path
}

#[test]
fn cli_help_lists_subcommands() {
    let output = Command::new(rondo_bin())
        .arg("--help")
        .output()
        .expect("Failed to run rondo");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("info"));
    assert!(stdout.contains("dump"));
    assert!(stdout.contains("edit-attribute"));
}

#[test]
fn info_reports_model_summary() {
    let dir = TempDir::new().unwrap();
    let model = write_test_model(&dir);
    let output = Command::new(rondo_bin())
        .args(["info", model.to_str().unwrap()])
        .output()
        .expect("Failed to run rondo");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("CONV_2D"));
    assert!(stdout.contains("Subgraphs:    1"));
}

#[test]
fn dump_emits_parseable_json() {
    let dir = TempDir::new().unwrap();
    let model = write_test_model(&dir);
    let output = Command::new(rondo_bin())
        .args(["dump", model.to_str().unwrap()])
        .output()
        .expect("Failed to run rondo");
    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("dump output must be JSON");
    assert_eq!(json[0]["opcode"], "CONV_2D");
}

#[test]
fn edit_attribute_rewrites_the_file() {
    let dir = TempDir::new().unwrap();
    let model = write_test_model(&dir);
    let output = Command::new(rondo_bin())
        .args([
            "edit-attribute",
            model.to_str().unwrap(),
            "--operator",
            "0",
            "padding",
            "VALID",
        ])
        .output()
        .expect("Failed to run rondo");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let reread = decode(&fs::read(&model).unwrap()).unwrap();
    match &reread.subgraphs[0].operators[0].builtin_options {
        BuiltinOptions::Conv2D(c) => assert_eq!(c.padding, Padding::Valid),
        other => panic!("unexpected payload {other:?}"),
    }
}

#[test]
fn edit_attribute_rejects_unknown_enum_value() {
    let dir = TempDir::new().unwrap();
    let model = write_test_model(&dir);
    let before = fs::read(&model).unwrap();
    let output = Command::new(rondo_bin())
        .args([
            "edit-attribute",
            model.to_str().unwrap(),
            "--operator",
            "0",
            "padding",
            "MAYBE",
        ])
        .output()
        .expect("Failed to run rondo");
    assert!(!output.status.success());
    assert_eq!(fs::read(&model).unwrap(), before, "failed edit must not touch the file");
}

#[test]
fn edit_tensor_replaces_constant_data() {
    let dir = TempDir::new().unwrap();
    let model = write_test_model(&dir);
    let data = dir.path().join("weights.bin");
    fs::write(&data, vec![7u8; 36]).unwrap();

    let output = Command::new(rondo_bin())
        .args([
            "edit-tensor",
            model.to_str().unwrap(),
            "--tensor",
            "1",
            "--data",
            data.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to run rondo");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let reread = decode(&fs::read(&model).unwrap()).unwrap();
    assert_eq!(reread.buffers[1].data, vec![7u8; 36]);
}

#[test]
fn edit_tensor_keeps_variable_flag_unless_told() {
    let dir = TempDir::new().unwrap();
    let model = write_test_model(&dir);

    let output = Command::new(rondo_bin())
        .args([
            "edit-tensor",
            model.to_str().unwrap(),
            "--tensor",
            "1",
            "--variable",
            "true",
        ])
        .output()
        .expect("Failed to run rondo");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    // a later rename must not reset the flag
    let output = Command::new(rondo_bin())
        .args([
            "edit-tensor",
            model.to_str().unwrap(),
            "--tensor",
            "1",
            "--name",
            "kernel",
        ])
        .output()
        .expect("Failed to run rondo");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let reread = decode(&fs::read(&model).unwrap()).unwrap();
    let tensor = &reread.subgraphs[0].tensors[1];
    assert_eq!(tensor.name, "kernel");
    assert!(tensor.is_variable);
}

#[test]
fn roundtrip_restamps_the_identifier() {
    let dir = TempDir::new().unwrap();
    let model = write_test_model(&dir);
    // present the same model as plain TFLite
    let mut bytes = fs::read(&model).unwrap();
    bytes[4..8].copy_from_slice(b"TFL3");
    fs::write(&model, &bytes).unwrap();

    let out = dir.path().join("normalized.circle");
    let output = Command::new(rondo_bin())
        .args([
            "roundtrip",
            model.to_str().unwrap(),
            "--output",
            out.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to run rondo");
    assert!(output.status.success());
    let normalized = fs::read(&out).unwrap();
    assert_eq!(&normalized[4..8], b"CIR0");
    assert_eq!(decode(&normalized).unwrap(), test_model());
}
