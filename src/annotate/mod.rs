//! Annotate module - Walks a document and marks every field with its owner.
//!
//! The walk re-emits the document with inline color markers on keys (and on
//! matched scalar list items). The document tree and the recorded ownership
//! paths are independently derived and may disagree when metadata is stale,
//! so list-item matching is best-effort: an item no recorded selector
//! matches is passed through unannotated and not recursed into.


use crate::fieldpath::PathElement;
use crate::ownership::Resolved;
use crate::printer::encode_marker;
use crate::value::{Map, Value};
use tracing::trace;

/// ColorMarker produces the annotated copy of a document.
pub struct ColorMarker<'a> {
    resolved: &'a Resolved,
}

impl<'a> ColorMarker<'a> {
    /// Creates a marker over a resolved ownership snapshot.
    pub fn new(resolved: &'a Resolved) -> Self {
        ColorMarker { resolved }
    }

    /// Annotates the document root.
    pub fn mark(&self, obj: &Map) -> Map {
        self.mark_map(obj, "")
    }

    fn mark_map(&self, obj: &Map, path_prefix: &str) -> Map {
        let mut marked = Map::new();

        for (key, value) in obj.iter() {
            let child_path = format!("{}.{}", path_prefix, key);
            let marked_key = self.mark_key(key, &child_path);

            let marked_value = match value {
                Value::Map(child) => Value::Map(self.mark_map(child, &child_path)),
                Value::List(items) => self.mark_list(items, &child_path),
                // A scalar under a key needs no marker of its own; the key
                // already carries the color.
                scalar => scalar.clone(),
            };

            marked.set(marked_key, marked_value);
        }

        marked
    }

    fn mark_key(&self, key: &str, path: &str) -> String {
        encode_marker(key, self.resolved.color_at(path))
    }

    fn mark_list(&self, items: &[Value], path: &str) -> Value {
        let Some(selectors) = self.resolved.selectors_at(path) else {
            // No manager ever described this list's items, so no path below
            // them was recorded either: pass through without recursing.
            return Value::List(items.to_vec());
        };

        let marked = items
            .iter()
            .enumerate()
            .map(|(position, item)| match item {
                Value::Map(obj) => match match_item_selector(selectors, obj, position) {
                    Some(selector) => {
                        let child_path = format!("{}{}", path, selector);
                        Value::Map(self.mark_map(obj, &child_path))
                    }
                    None => {
                        trace!(path, position, "no selector matched list item");
                        item.clone()
                    }
                },
                // Nested lists have no selector kind; pass through.
                Value::List(_) => item.clone(),
                scalar => match match_scalar_selector(selectors, scalar, position) {
                    Some(selector) => {
                        let child_path = format!("{}{}", path, selector);
                        let color = self.resolved.color_at(&child_path);
                        match scalar.scalar_string() {
                            // There is no enclosing key here, so the scalar
                            // itself carries the marker.
                            Some(text) => Value::String(encode_marker(&text, color)),
                            None => item.clone(),
                        }
                    }
                    None => {
                        trace!(path, position, "no selector matched scalar item");
                        item.clone()
                    }
                },
            })
            .collect();

        Value::List(marked)
    }
}

/// Finds the recorded selector for an object list item: the first `Key`
/// selector whose every named sub-field equality-matches the item, falling
/// back to the item's position. First match wins.
fn match_item_selector<'s>(
    selectors: &'s [PathElement],
    item: &Map,
    position: usize,
) -> Option<&'s PathElement> {
    selectors
        .iter()
        .find(|pe| match pe {
            PathElement::Key(fields) => fields
                .iter()
                .all(|field| item.get(&field.name) == Some(&field.value)),
            _ => false,
        })
        .or_else(|| index_fallback(selectors, position))
}

/// Finds the recorded selector for a scalar list item: the first `Value`
/// selector equal to the item, falling back to the item's position.
fn match_scalar_selector<'s>(
    selectors: &'s [PathElement],
    scalar: &Value,
    position: usize,
) -> Option<&'s PathElement> {
    selectors
        .iter()
        .find(|pe| matches!(pe, PathElement::Value(v) if v == scalar))
        .or_else(|| index_fallback(selectors, position))
}

fn index_fallback(selectors: &[PathElement], position: usize) -> Option<&PathElement> {
    selectors
        .iter()
        .find(|pe| matches!(pe, PathElement::Index(i) if *i >= 0 && *i as usize == position))
}
