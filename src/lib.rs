//! # mfcolor
//!
//! Renders a structured resource with every field colored by the manager
//! that owns it.
//!
//! A resource carries per-field ownership metadata contributed by multiple
//! independent writers ("managers"). This library resolves that metadata
//! into a color per field (with a distinct conflict color for fields
//! claimed by more than one manager), walks the document tree re-emitting
//! every key with an inline color marker, and post-processes serialized
//! JSON/YAML text into terminal escape sequences. The annotation pass is
//! read-only: the underlying resource is never merged, diffed, or mutated.
//!
//! ## Modules
//!
//! - [`value`] - In-memory representation of YAML/JSON documents
//! - [`fieldpath`] - Field path representation and ownership-record decoding
//! - [`color`] - Terminal colors assigned to field owners
//! - [`ownership`] - Resolution of manager claims into colors and selectors
//! - [`annotate`] - The document walk producing the marker-annotated copy
//! - [`printer`] - Marker codec and colorized JSON/YAML output

pub mod annotate;
pub mod color;
pub mod error;
pub mod fieldpath;
pub mod ownership;
pub mod printer;
pub mod value;

pub use annotate::ColorMarker;
pub use color::Color;
pub use error::{AnnotateError, AnnotateErrors};
pub use fieldpath::{ParseError, Path, PathElement, Set as FieldPathSet};
pub use ownership::{resolve, take_ownership_records, OwnershipRecord, Resolved};
pub use printer::{ColorPrinter, OutputFormat, PrintError};
pub use value::Value;
