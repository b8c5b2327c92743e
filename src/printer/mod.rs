//! Printer module - Marker codec and colorized JSON/YAML output.
//!
//! Annotated trees go through a generic serializer that knows nothing about
//! coloring; ownership travels as an inline text marker appended to key
//! names and marked scalars. A post-processing pass then rewrites markers
//! into terminal escape sequences. JSON needs a quoted pattern and YAML an
//! unquoted one, since the two styles quote keys differently.

use crate::color::{color_string, Color, RESET_CODE};
use crate::ownership::Resolved;
use crate::value::{self, Map, Value};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{self, Write};
use std::str::FromStr;
use thiserror::Error;

/// Marker delimiter pair, chosen to be implausible in ordinary field names.
pub const MARKER_PREFIX: &str = "__";
pub const MARKER_SUFFIX: &str = "__";

static QUOTED_MARK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "\"(.+){}(\\d+){}\"",
        MARKER_PREFIX, MARKER_SUFFIX
    ))
    .expect("quoted marker pattern")
});

static UNQUOTED_MARK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("(.+){}(\\d+){}", MARKER_PREFIX, MARKER_SUFFIX))
        .expect("unquoted marker pattern")
});

/// Appends the inline marker for a color to a key name or scalar text.
pub fn encode_marker(text: &str, color: Color) -> String {
    format!(
        "{}{}{}{}",
        text,
        MARKER_PREFIX,
        color.code(),
        MARKER_SUFFIX
    )
}

/// Rewrites quoted markers ("key__32__") into escape sequences. JSON pass.
pub fn colorize_json(text: &str) -> String {
    QUOTED_MARK
        .replace_all(text, format!("\x1b[${{2}}m\"${{1}}\"\x1b[{}m", RESET_CODE))
        .into_owned()
}

/// Rewrites unquoted markers (key__32__) into escape sequences. YAML pass.
pub fn colorize_yaml(text: &str) -> String {
    UNQUOTED_MARK
        .replace_all(text, format!("\x1b[${{2}}m${{1}}\x1b[{}m", RESET_CODE))
        .into_owned()
}

/// Removes every marker from serialized text, leaving the bare document.
pub fn strip_markers(text: &str) -> String {
    UNQUOTED_MARK.replace_all(text, "${1}").into_owned()
}

static TRAILING_MARK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "^(.*){}(\\d+){}$",
        MARKER_PREFIX, MARKER_SUFFIX
    ))
    .expect("trailing marker pattern")
});

fn strip_text(text: &str) -> String {
    TRAILING_MARK.replace(text, "${1}").into_owned()
}

/// Removes markers from an annotated tree: key names everywhere, and string
/// scalars carrying a marker (annotated scalar list items).
pub fn strip_value_markers(value: &Value) -> Value {
    match value {
        Value::Map(obj) => {
            let mut stripped = Map::new();
            for (key, child) in obj.iter() {
                stripped.set(strip_text(key), strip_value_markers(child));
            }
            Value::Map(stripped)
        }
        Value::List(items) => Value::List(items.iter().map(strip_value_markers).collect()),
        Value::String(s) => Value::String(strip_text(s)),
        other => other.clone(),
    }
}

/// Selectable serialization style for the rendered document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl FromStr for OutputFormat {
    type Err = PrintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yaml" => Ok(OutputFormat::Yaml),
            "json" => Ok(OutputFormat::Json),
            other => Err(PrintError::UnknownFormat(other.to_string())),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Yaml => write!(f, "yaml"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Error type for rendering.
#[derive(Debug, Error)]
pub enum PrintError {
    #[error("unknown output format {0:?} (expected json or yaml)")]
    UnknownFormat(String),

    #[error("failed to serialize to JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to serialize to YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// ColorPrinter serializes an annotated tree and runs the marker pass.
#[derive(Debug, Default)]
pub struct ColorPrinter {
    format: OutputFormat,
}

impl ColorPrinter {
    /// Creates a printer for the given format.
    pub fn new(format: OutputFormat) -> Self {
        ColorPrinter { format }
    }

    /// Renders the annotated document to the writer as colorized text.
    pub fn print(&self, annotated: &Value, w: &mut dyn Write) -> Result<(), PrintError> {
        match self.format {
            OutputFormat::Json => {
                let text = value::to_json_pretty(annotated)?;
                writeln!(w, "{}", colorize_json(&text))?;
            }
            OutputFormat::Yaml => {
                let text = value::to_yaml(annotated)?;
                write!(w, "{}", colorize_yaml(&text))?;
            }
        }
        Ok(())
    }
}

/// Writes the legend: each manager's name in its color, in first-seen order,
/// then one line for the conflict color.
pub fn write_legend(resolved: &Resolved, w: &mut dyn Write) -> io::Result<()> {
    for (manager, color) in resolved.managers() {
        writeln!(w, "{}", color_string(manager, color))?;
    }
    writeln!(
        w,
        "{}",
        color_string("conflict (claimed by multiple managers)", Color::Conflict)
    )?;
    writeln!(w)
}
