//! mfcolor - Render a resource with every field colored by its owner.
//!
//! Reads one resource (JSON or YAML) carrying per-field ownership metadata,
//! resolves which manager owns each field, and prints the document with
//! every field in its owner's color. Fields claimed by more than one
//! manager render in the conflict color.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use mfcolor::annotate::ColorMarker;
use mfcolor::error::AnnotateError;
use mfcolor::ownership::{resolve, take_ownership_records};
use mfcolor::printer::{write_legend, ColorPrinter, OutputFormat};
use mfcolor::value::Value;

#[derive(Debug, Parser)]
#[command(name = "mfcolor", version, about = "Colorize a resource by per-field manager ownership")]
struct Cli {
    /// Resource file (JSON or YAML) carrying ownership metadata.
    file: PathBuf,

    /// Output format.
    #[arg(short = 'o', long = "output", default_value = "yaml")]
    output: OutputFormat,

    /// Do not print the manager/color legend before the document.
    #[arg(long = "no-legend")]
    no_legend: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let content = fs::read_to_string(&cli.file)
        .map_err(|e| format!("Failed to read resource file {:?}: {}", cli.file, e))?;

    let documents =
        parse_documents(&content).map_err(|e| format!("Failed to parse resource: {}", e))?;
    let resource = single_resource(documents)?;
    let Value::Map(mut resource) = resource else {
        return Err(AnnotateError::NotAnObject {
            kind: resource.kind(),
        }
        .into());
    };

    let (records, errors) = take_ownership_records(&mut resource);
    let resolved = resolve(&records);

    let annotated = ColorMarker::new(&resolved).mark(&resource);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if !cli.no_legend {
        write_legend(&resolved, &mut out)?;
    }
    ColorPrinter::new(cli.output).print(&Value::Map(annotated), &mut out)?;
    out.flush()?;

    // Recoverable errors were worked around; they still fail the run.
    if !errors.is_empty() {
        return Err(errors.into());
    }

    Ok(())
}

/// Parses the input stream; YAML is a superset of JSON, so one parser
/// covers both. Empty documents are dropped.
fn parse_documents(content: &str) -> Result<Vec<Value>, serde_yaml::Error> {
    let mut documents = Vec::new();
    for document in serde_yaml::Deserializer::from_str(content) {
        match Value::deserialize(document)? {
            Value::Null => {} // empty document
            value => documents.push(value),
        }
    }
    Ok(documents)
}

/// Insists on exactly one resource: multi-document streams and list objects
/// with more than one item are rejected.
fn single_resource(mut documents: Vec<Value>) -> Result<Value, AnnotateError> {
    if documents.len() != 1 {
        return Err(AnnotateError::UnsupportedMultipleResources {
            found: documents.len(),
        });
    }
    let document = documents.pop().unwrap_or_default();

    // A list object stands for zero or more resources; unwrap a singleton.
    if let Value::Map(ref obj) = document {
        let is_list = obj
            .get("kind")
            .and_then(Value::as_str)
            .is_some_and(|kind| kind.ends_with("List"));
        if is_list {
            if let Some(Value::List(items)) = obj.get("items") {
                if items.len() != 1 {
                    return Err(AnnotateError::UnsupportedMultipleResources {
                        found: items.len(),
                    });
                }
                return Ok(items[0].clone());
            }
        }
    }

    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(content: &str) -> Result<Value, AnnotateError> {
        single_resource(parse_documents(content).expect("input parses"))
    }

    #[test]
    fn test_load_single_resource_json() {
        let doc = load(r#"{"kind": "Deployment"}"#).unwrap();
        assert!(doc.is_map());
    }

    #[test]
    fn test_load_rejects_multidoc() {
        let err = load("kind: A\n---\nkind: B\n").unwrap_err();
        assert!(matches!(
            err,
            AnnotateError::UnsupportedMultipleResources { found: 2 }
        ));
    }

    #[test]
    fn test_load_unwraps_singleton_list() {
        let doc =
            load(r#"{"kind": "DeploymentList", "items": [{"kind": "Deployment"}]}"#).unwrap();
        let obj = doc.as_map().unwrap();
        assert_eq!(obj.get("kind"), Some(&Value::String("Deployment".into())));
    }

    #[test]
    fn test_load_rejects_populated_list() {
        let err =
            load(r#"{"kind": "DeploymentList", "items": [{"a": 1}, {"b": 2}]}"#).unwrap_err();
        assert!(matches!(
            err,
            AnnotateError::UnsupportedMultipleResources { found: 2 }
        ));
    }

    #[test]
    fn test_load_rejects_empty() {
        let err = load("").unwrap_err();
        assert!(matches!(
            err,
            AnnotateError::UnsupportedMultipleResources { found: 0 }
        ));
    }
}
