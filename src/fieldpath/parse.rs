//! Decoding of serialized ownership records into path sets.
//!
//! A manager's ownership record is a JSON trie: object keys carry one
//! path element each ("f:name", "k:{json}", "v:json", "i:number") and a
//! "." key marks the prefix path itself as a member.

use super::path::{Path, PathElement};
use super::set::Set;
use crate::value::{Field, FieldList, Map, Value};
use thiserror::Error;

/// Error type for ownership-record decoding.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("path element key too short: {0:?}")]
    KeyTooShort(String),

    #[error("unknown path element type: {0:?}")]
    UnknownElementType(String),

    #[error("invalid index: {0}")]
    InvalidIndex(#[from] std::num::ParseIntError),

    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("expected JSON object for key selector, got {0:?}")]
    ExpectedKeyObject(String),

    #[error("ownership data must be a JSON object")]
    ExpectedFieldsObject,

    #[error("expected object value under key {0:?}")]
    ExpectedObjectValue(String),
}

/// Deserializes a PathElement from its record form.
pub fn deserialize_path_element(s: &str) -> Result<PathElement, ParseError> {
    let Some((prefix, content)) = s.split_at_checked(2) else {
        return Err(ParseError::KeyTooShort(s.to_string()));
    };

    match prefix {
        "f:" => Ok(PathElement::FieldName(content.to_string())),
        "v:" => {
            let v: Value = serde_json::from_str(content)?;
            Ok(PathElement::Value(v))
        }
        "k:" => {
            let v: Value = serde_json::from_str(content)?;
            match v {
                Value::Map(obj) => {
                    let fields: Vec<Field> = obj
                        .iter()
                        .map(|(name, value)| Field {
                            name: name.clone(),
                            value: value.clone(),
                        })
                        .collect();
                    Ok(PathElement::Key(FieldList::with_fields(fields)))
                }
                _ => Err(ParseError::ExpectedKeyObject(content.to_string())),
            }
        }
        "i:" => {
            let i = content.parse::<i32>()?;
            Ok(PathElement::Index(i))
        }
        _ => Err(ParseError::UnknownElementType(prefix.to_string())),
    }
}

impl Set {
    /// Decodes a Set from raw ownership-record JSON.
    pub fn from_json(data: &[u8]) -> Result<Set, ParseError> {
        let v: Value = serde_json::from_slice(data)?;
        match v {
            Value::Map(obj) => Set::from_value(&obj),
            _ => Err(ParseError::ExpectedFieldsObject),
        }
    }

    /// Decodes a Set from an already-parsed ownership-record object.
    pub fn from_value(obj: &Map) -> Result<Set, ParseError> {
        Set::decode_object(obj, true)
    }

    fn decode_object(obj: &Map, at_root: bool) -> Result<Set, ParseError> {
        let mut set = Set::new();

        for (key, value) in obj.iter() {
            if key == "." {
                // Membership marker for the prefix path itself. Below the
                // root the parent's descend records it; at the root the
                // prefix is the empty path.
                if at_root {
                    set.insert(&Path::new());
                }
                continue;
            }

            let pe = match deserialize_path_element(key) {
                Ok(pe) => pe,
                // Skip unknown path element types (forward compatibility).
                Err(ParseError::UnknownElementType(_)) => continue,
                Err(e) => return Err(e),
            };

            match value {
                Value::Map(child_obj) => {
                    if child_obj.is_empty() {
                        set.members.insert(pe);
                    } else {
                        let is_member = child_obj.has(".");
                        let child_set = Set::decode_object(child_obj, false)?;

                        if is_member {
                            set.members.insert(pe.clone());
                        }
                        if !child_set.is_empty() {
                            set.children.insert(pe, child_set);
                        }
                    }
                }
                _ => return Err(ParseError::ExpectedObjectValue(key.clone())),
            }
        }

        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fieldpath::Path;

    #[test]
    fn test_deserialize_field_name() {
        let pe = deserialize_path_element("f:foo").unwrap();
        assert_eq!(pe, PathElement::field_name("foo"));
    }

    #[test]
    fn test_deserialize_value_types() {
        let test_cases = vec![
            ("v:1", PathElement::value(Value::Int(1))),
            ("v:true", PathElement::value(Value::Bool(true))),
            ("v:\"aa\"", PathElement::value(Value::String("aa".into()))),
            ("v:3.14", PathElement::value(Value::Float(3.14))),
        ];

        for (input, expected) in test_cases {
            let pe = deserialize_path_element(input).unwrap();
            assert_eq!(pe, expected, "mismatch for {:?}", input);
        }
    }

    #[test]
    fn test_deserialize_key_multifield() {
        let pe = deserialize_path_element(r#"k:{"port":443,"protocol":"tcp"}"#).unwrap();
        let expected = PathElement::key(FieldList::with_fields(vec![
            Field { name: "port".into(), value: Value::Int(443) },
            Field { name: "protocol".into(), value: Value::String("tcp".into()) },
        ]));
        assert_eq!(pe, expected);
    }

    #[test]
    fn test_deserialize_index() {
        let pe = deserialize_path_element("i:42").unwrap();
        assert_eq!(pe, PathElement::index(42));

        assert!(deserialize_path_element("i:x").is_err());
    }

    #[test]
    fn test_deserialize_rejects_short_and_unknown() {
        assert!(matches!(
            deserialize_path_element("f"),
            Err(ParseError::KeyTooShort(_))
        ));
        assert!(matches!(
            deserialize_path_element("r:aab"),
            Err(ParseError::UnknownElementType(_))
        ));
    }

    #[test]
    fn test_set_from_json_golden() {
        let data = r#"{"f:metadata":{"f:labels":{"f:app":{}}},"f:spec":{"f:replicas":{}}}"#;
        let set = Set::from_json(data.as_bytes()).unwrap();

        let replicas = Path::from_elements(vec![
            PathElement::field_name("spec"),
            PathElement::field_name("replicas"),
        ]);
        let app = Path::from_elements(vec![
            PathElement::field_name("metadata"),
            PathElement::field_name("labels"),
            PathElement::field_name("app"),
        ]);
        assert!(set.has(&replicas));
        assert!(set.has(&app));
    }

    #[test]
    fn test_set_from_json_with_selectors() {
        let data = r#"{"f:spec":{"f:containers":{"k:{\"name\":\"web\"}":{"f:image":{},".":{}}}}}"#;
        let set = Set::from_json(data.as_bytes()).unwrap();

        let key = PathElement::key(FieldList::with_fields(vec![Field {
            name: "name".into(),
            value: Value::String("web".into()),
        }]));
        let image = Path::from_elements(vec![
            PathElement::field_name("spec"),
            PathElement::field_name("containers"),
            key.clone(),
            PathElement::field_name("image"),
        ]);
        let item = Path::from_elements(vec![
            PathElement::field_name("spec"),
            PathElement::field_name("containers"),
            key,
        ]);
        // "." marks the keyed item itself as a member too.
        assert!(set.has(&image));
        assert!(set.has(&item));
    }

    #[test]
    fn test_set_from_json_root_member_marker() {
        let data = r#"{".":{},"f:spec":{"f:replicas":{}}}"#;
        let set = Set::from_json(data.as_bytes()).unwrap();

        assert!(set.has(&Path::new()));
        assert!(set.has(&Path::from_elements(vec![
            PathElement::field_name("spec"),
            PathElement::field_name("replicas"),
        ])));
    }

    #[test]
    fn test_set_from_json_skips_unknown_prefix() {
        let data = r#"{"f:aaa":{},"r:aab":{}}"#;
        let set = Set::from_json(data.as_bytes()).unwrap();

        assert!(set.has(&Path::from_elements(vec![PathElement::field_name("aaa")])));

        let mut count = 0;
        set.iterate(|_| count += 1);
        assert_eq!(count, 1);
    }

    #[test]
    fn test_set_from_json_rejects_non_object() {
        assert!(matches!(
            Set::from_json(b"[1,2,3]"),
            Err(ParseError::ExpectedFieldsObject)
        ));
        assert!(Set::from_json(b"{\"f:a\":3}").is_err());
    }
}
