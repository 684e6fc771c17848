//! Rondo CLI - inspect and edit circle model files

mod dump;
mod edit;
mod info;
mod roundtrip;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rondo")]
#[command(author, version, about = "Inspect and edit circle (TFLite-derived) model files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a summary of a model file
    Info {
        /// Model file (.circle or .tflite)
        model: PathBuf,
    },

    /// Dump the operator graph as JSON
    Dump {
        /// Model file
        model: PathBuf,

        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Change one attribute of an operator's options table
    EditAttribute {
        /// Model file
        model: PathBuf,

        /// Subgraph index
        #[arg(long, default_value = "0")]
        subgraph: usize,

        /// Operator index within the subgraph
        #[arg(long)]
        operator: usize,

        /// Attribute name (case and underscores are ignored)
        name: String,

        /// New value; enums take their symbolic name, e.g. VALID
        value: String,

        /// Output model file (defaults to in-place)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Redefine a tensor's name, type, shape or constant data
    EditTensor {
        /// Model file
        model: PathBuf,

        /// Subgraph index
        #[arg(long, default_value = "0")]
        subgraph: usize,

        /// Tensor index within the subgraph
        #[arg(long)]
        tensor: usize,

        /// New tensor name
        #[arg(long)]
        name: Option<String>,

        /// New element type, e.g. FLOAT32 or INT8
        #[arg(long)]
        dtype: Option<String>,

        /// New shape as a comma-separated list, e.g. 1,28,28,3
        #[arg(long)]
        shape: Option<String>,

        /// Change the tensor's variable flag; omit to keep it
        #[arg(long, value_name = "BOOL")]
        variable: Option<bool>,

        /// File holding replacement constant data
        #[arg(long, value_name = "FILE")]
        data: Option<PathBuf>,

        /// Output model file (defaults to in-place)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace a buffer's raw payload
    EditBuffer {
        /// Model file
        model: PathBuf,

        /// Buffer index
        #[arg(long)]
        buffer: usize,

        /// File holding the new payload; omit to empty the buffer
        #[arg(long, value_name = "FILE")]
        data: Option<PathBuf>,

        /// Output model file (defaults to in-place)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decode and re-encode a model, normalizing its layout
    Roundtrip {
        /// Model file
        model: PathBuf,

        /// Output model file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Info { model } => info::run(&model),
        Commands::Dump { model, output } => dump::run(&model, output.as_deref()),
        Commands::EditAttribute {
            model,
            subgraph,
            operator,
            name,
            value,
            output,
        } => edit::attribute(&model, subgraph, operator, &name, &value, output.as_deref()),
        Commands::EditTensor {
            model,
            subgraph,
            tensor,
            name,
            dtype,
            shape,
            variable,
            data,
            output,
        } => edit::tensor(
            &model,
            subgraph,
            tensor,
            name.as_deref(),
            dtype.as_deref(),
            shape.as_deref(),
            variable,
            data.as_deref(),
            output.as_deref(),
        ),
        Commands::EditBuffer {
            model,
            buffer,
            data,
            output,
        } => edit::buffer(&model, buffer, data.as_deref(), output.as_deref()),
        Commands::Roundtrip { model, output } => roundtrip::run(&model, &output),
    }
}
