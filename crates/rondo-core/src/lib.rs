//! Rondo Core - Shared primitives for the circle model editor
//!
//! This crate provides the error taxonomy and the uniform attribute
//! records used by the format crate (rondo-circle) and the CLI.

pub mod attribute;
pub mod error;

pub use attribute::{AttrValue, Attribute};
pub use error::{CodecError, EditError, RondoError};
