//! Ownership module - Resolves per-manager field claims into colors.
//!
//! Managers contribute ownership records (sets of field paths). Resolution
//! assigns each distinct manager a color, colors every concretely-owned leaf
//! path, and indexes the list-item selectors recorded under each parent path
//! so the annotator can match runtime list items back to recorded paths.

use crate::color::Color;
use crate::error::{AnnotateError, AnnotateErrors};
use crate::fieldpath::{ParseError, Path, PathElement, Set};
use crate::value::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

/// One manager's ownership claim over a document.
#[derive(Debug, Clone)]
pub struct OwnershipRecord {
    /// Manager identity; externally supplied and case-sensitive.
    pub manager: String,
    /// The set of field paths this manager claims.
    pub fields: Set,
}

impl OwnershipRecord {
    /// Creates a record from a manager name and its already-decoded path set.
    pub fn new(manager: impl Into<String>, fields: Set) -> Self {
        OwnershipRecord {
            manager: manager.into(),
            fields,
        }
    }
}

/// Removes the ownership metadata from a document and decodes it into
/// records, one per entry.
///
/// Decode failures are aggregated per manager rather than aborting: every
/// well-formed record is still returned and usable.
pub fn take_ownership_records(doc: &mut Map) -> (Vec<OwnershipRecord>, AnnotateErrors) {
    let mut records = Vec::new();
    let mut errors = AnnotateErrors::new();

    let entries = match doc.fields.get_mut("metadata") {
        Some(Value::Map(metadata)) => match metadata.delete("managedFields") {
            Some(Value::List(entries)) => entries,
            Some(other) => {
                errors.add(AnnotateError::MalformedFieldEntries { kind: other.kind() });
                return (records, errors);
            }
            None => return (records, errors),
        },
        _ => return (records, errors),
    };

    for (index, entry) in entries.iter().enumerate() {
        let Some(entry) = entry.as_map() else {
            errors.add(AnnotateError::MissingManager { index });
            continue;
        };

        let Some(manager) = entry.get("manager").and_then(Value::as_str) else {
            errors.add(AnnotateError::MissingManager { index });
            continue;
        };

        let fields = match entry.get("fieldsV1") {
            Some(Value::Map(raw)) => Set::from_value(raw),
            _ => Err(ParseError::ExpectedFieldsObject),
        };

        match fields {
            Ok(fields) => records.push(OwnershipRecord::new(manager, fields)),
            Err(source) => errors.add(AnnotateError::MalformedOwnershipData {
                manager: manager.to_string(),
                source,
            }),
        }
    }

    (records, errors)
}

/// The resolver's output: the per-field color assignment and the per-parent
/// index of recorded list-item selectors. Built once before any document
/// walk and read-only thereafter.
#[derive(Debug, Default)]
pub struct Resolved {
    field_colors: HashMap<String, Color>,
    manager_colors: Vec<(String, Color)>,
    selectors: HashMap<String, Vec<PathElement>>,
}

impl Resolved {
    /// The color assigned to a canonical field path; `Color::None` if the
    /// path is unclaimed.
    pub fn color_at(&self, path: &str) -> Color {
        self.field_colors.get(path).copied().unwrap_or_default()
    }

    /// The list-item selectors recorded as children of the given parent
    /// path, in index order. None if no manager ever described this list.
    pub fn selectors_at(&self, parent: &str) -> Option<&[PathElement]> {
        self.selectors.get(parent).map(Vec::as_slice)
    }

    /// Managers and their colors in first-seen record order.
    pub fn managers(&self) -> impl Iterator<Item = (&str, Color)> {
        self.manager_colors.iter().map(|(m, c)| (m.as_str(), *c))
    }

    fn manager_color(&self, manager: &str) -> Color {
        self.manager_colors
            .iter()
            .find(|(m, _)| m == manager)
            .map(|(_, c)| *c)
            .unwrap_or_default()
    }
}

/// Resolves an ordered list of ownership records into colors and selectors.
pub fn resolve(records: &[OwnershipRecord]) -> Resolved {
    let mut resolved = Resolved::default();

    // Pass 1: claiming managers per leaf path, colors per distinct manager.
    // A manager appearing in several records keeps one color, and repeated
    // claims by the same manager on one leaf are not a conflict.
    let mut field_managers: HashMap<String, Vec<&str>> = HashMap::new();
    let mut union = Set::new();

    for record in records {
        if resolved.manager_color(&record.manager) == Color::None {
            let color = Color::owned(resolved.manager_colors.len());
            resolved
                .manager_colors
                .push((record.manager.clone(), color));
        }

        record.fields.leaves().iterate(|path| {
            let claimants = field_managers.entry(path.to_string()).or_default();
            if !claimants.contains(&record.manager.as_str()) {
                claimants.push(record.manager.as_str());
            }
        });

        union = union.union(&record.fields);
    }

    for (path, claimants) in field_managers {
        let color = match claimants.as_slice() {
            [] => continue,
            [only] => resolved.manager_color(only),
            _ => Color::Conflict,
        };
        resolved.field_colors.insert(path, color);
    }

    // Pass 2: list-item selectors from the full union. A keyed item is often
    // recorded only as an interior node (its sub-fields are the members), so
    // this pass walks every trie node, not just the terminal paths.
    index_selectors(&union, &mut Path::new(), &mut resolved.selectors);

    debug!(
        managers = resolved.manager_colors.len(),
        leaf_paths = resolved.field_colors.len(),
        list_parents = resolved.selectors.len(),
        "resolved ownership"
    );

    resolved
}

/// Records every non-field-name element under its prefix path, members and
/// interior nodes alike. An element appearing as both is recorded once. The
/// root level is skipped: a path of one element cannot select a list item.
fn index_selectors(
    set: &Set,
    prefix: &mut Path,
    selectors: &mut HashMap<String, Vec<PathElement>>,
) {
    if !prefix.is_empty() {
        for element in set.members.iter().chain(set.children.keys()) {
            if element.is_field_name() {
                continue;
            }
            let entry = selectors.entry(prefix.to_string()).or_default();
            if !entry.contains(element) {
                entry.push(element.clone());
            }
        }
    }

    for (key, child) in &set.children {
        prefix.push(key.clone());
        index_selectors(child, prefix, selectors);
        prefix.pop();
    }
}
