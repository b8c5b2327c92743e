//! Path element and path types.

use crate::value::{FieldList, Value};
use std::cmp::Ordering;

/// PathElement represents one level of path navigation.
///
/// The four selector kinds form a closed sum; every consumer matches
/// exhaustively so an unhandled selector kind cannot slip through.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathElement {
    /// Field name for map/struct fields.
    FieldName(String),
    /// Key for associative lists (one or more identifying sub-fields).
    Key(FieldList),
    /// Value for sets (scalar list elements).
    Value(Value),
    /// Index for positional list elements.
    Index(i32),
}

impl PathElement {
    /// Creates a new field name path element.
    pub fn field_name(name: impl Into<String>) -> Self {
        PathElement::FieldName(name.into())
    }

    /// Creates a new key path element.
    pub fn key(fields: FieldList) -> Self {
        PathElement::Key(fields)
    }

    /// Creates a new value path element.
    pub fn value(v: Value) -> Self {
        PathElement::Value(v)
    }

    /// Creates a new index path element.
    pub fn index(i: i32) -> Self {
        PathElement::Index(i)
    }

    /// Returns true if this is a field name element.
    pub fn is_field_name(&self) -> bool {
        matches!(self, PathElement::FieldName(_))
    }
}

impl PartialOrd for PathElement {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PathElement {
    fn cmp(&self, other: &Self) -> Ordering {
        fn type_order(pe: &PathElement) -> u8 {
            match pe {
                PathElement::FieldName(_) => 0,
                PathElement::Key(_) => 1,
                PathElement::Value(_) => 2,
                PathElement::Index(_) => 3,
            }
        }

        let type_cmp = type_order(self).cmp(&type_order(other));
        if type_cmp != Ordering::Equal {
            return type_cmp;
        }

        match (self, other) {
            (PathElement::FieldName(a), PathElement::FieldName(b)) => a.cmp(b),
            (PathElement::Key(a), PathElement::Key(b)) => a.cmp(b),
            (PathElement::Value(a), PathElement::Value(b)) => a.cmp(b),
            (PathElement::Index(a), PathElement::Index(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

/// Path represents a complete path from the document root to a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    elements: Vec<PathElement>,
}

impl Path {
    /// Creates a new empty path.
    pub fn new() -> Self {
        Path {
            elements: Vec::new(),
        }
    }

    /// Creates a path from a vector of elements.
    pub fn from_elements(elements: Vec<PathElement>) -> Self {
        Path { elements }
    }

    /// Returns the number of elements in the path.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if the path is empty.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns an iterator over the path elements.
    pub fn iter(&self) -> impl Iterator<Item = &PathElement> {
        self.elements.iter()
    }

    /// Appends a path element.
    pub fn push(&mut self, element: PathElement) {
        self.elements.push(element);
    }

    /// Removes and returns the last path element.
    pub fn pop(&mut self) -> Option<PathElement> {
        self.elements.pop()
    }

    /// Returns the last path element.
    pub fn last(&self) -> Option<&PathElement> {
        self.elements.last()
    }

    /// Returns the path holding everything but the last element.
    pub fn parent(&self) -> Path {
        let mut parent = self.clone();
        parent.pop();
        parent
    }

    /// Returns a slice of the path elements.
    pub fn as_slice(&self) -> &[PathElement] {
        &self.elements
    }
}

impl FromIterator<PathElement> for Path {
    fn from_iter<T: IntoIterator<Item = PathElement>>(iter: T) -> Self {
        Path {
            elements: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Path {
    type Item = PathElement;
    type IntoIter = std::vec::IntoIter<PathElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathElement;
    type IntoIter = std::slice::Iter<'a, PathElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

// Scalar rendering inside selector brackets; strings are quoted so that
// `[name="1"]` and `[=1]`-style forms can never collide.
fn fmt_scalar(f: &mut std::fmt::Formatter<'_>, v: &Value) -> std::fmt::Result {
    match v {
        Value::Null => write!(f, "null"),
        Value::Bool(b) => write!(f, "{}", b),
        Value::Int(i) => write!(f, "{}", i),
        Value::Float(x) => write!(f, "{}", x),
        Value::String(s) => write!(f, "{:?}", s),
        Value::List(_) | Value::Map(_) => write!(f, "{:?}", v),
    }
}

impl std::fmt::Display for PathElement {
    /// The canonical string form. Structurally equal elements always render
    /// identically, so the form is usable as a map key.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathElement::FieldName(name) => write!(f, ".{}", name),
            PathElement::Key(fields) => {
                write!(f, "[")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}=", field.name)?;
                    fmt_scalar(f, &field.value)?;
                }
                write!(f, "]")
            }
            PathElement::Value(v) => {
                write!(f, "[=")?;
                fmt_scalar(f, v)?;
                write!(f, "]")
            }
            PathElement::Index(i) => write!(f, "[{}]", i),
        }
    }
}

impl std::fmt::Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for element in &self.elements {
            write!(f, "{}", element)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Field;

    #[test]
    fn test_path_element_field_name() {
        let pe = PathElement::field_name("foo");
        assert!(pe.is_field_name());
        assert!(!PathElement::index(0).is_field_name());
    }

    #[test]
    fn test_path_operations() {
        let mut path = Path::new();
        assert!(path.is_empty());

        path.push(PathElement::field_name("metadata"));
        path.push(PathElement::field_name("name"));
        assert_eq!(path.len(), 2);

        assert_eq!(
            path.last(),
            Some(&PathElement::FieldName("name".to_string()))
        );
        assert_eq!(path.parent().to_string(), ".metadata");

        let popped = path.pop();
        assert_eq!(popped, Some(PathElement::FieldName("name".to_string())));
        assert_eq!(path.len(), 1);
    }

    #[test]
    fn test_path_display() {
        let path = Path::from_elements(vec![
            PathElement::field_name("metadata"),
            PathElement::field_name("name"),
        ]);
        assert_eq!(format!("{}", path), ".metadata.name");
    }

    #[test]
    fn test_selector_display() {
        let key = PathElement::key(FieldList::with_fields(vec![Field {
            name: "name".into(),
            value: Value::String("web".into()),
        }]));
        assert_eq!(format!("{}", key), "[name=\"web\"]");

        assert_eq!(format!("{}", PathElement::value(Value::Int(3))), "[=3]");
        assert_eq!(format!("{}", PathElement::index(2)), "[2]");
    }

    #[test]
    fn test_canonical_form_is_stable() {
        // Two structurally equal paths must serialize identically.
        let make = || {
            Path::from_elements(vec![
                PathElement::field_name("spec"),
                PathElement::key(FieldList::with_fields(vec![
                    Field { name: "port".into(), value: Value::Int(443) },
                    Field { name: "protocol".into(), value: Value::String("tcp".into()) },
                ])),
                PathElement::field_name("targetPort"),
            ])
        };
        assert_eq!(make().to_string(), make().to_string());
    }

    #[test]
    fn test_path_element_ordering() {
        let a = PathElement::field_name("a");
        let b = PathElement::field_name("b");
        assert!(a < b);

        let idx = PathElement::index(0);
        // Field names come before indices
        assert!(a < idx);
    }
}
