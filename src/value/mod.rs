//! Value module - In-memory representation of YAML/JSON documents.
//!
//! This module provides the untyped document tree the annotator walks.

mod value;

pub use value::*;
