//! Explicit response-shape decoders.
//!
//! A [`Schema`] lists the fields a payload must carry and the JSON kind of
//! each one. [`decode`] checks that list against the raw body before handing
//! it to serde, so a malformed payload yields a precise [`DecodeError`]
//! instead of a generic parse failure.

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// JSON kind a required field must have.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    String,
    /// Any JSON number.
    Number,
    /// A JSON number representable as `i64`.
    Integer,
    Bool,
}

impl FieldKind {
    fn matches(self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Number => value.is_number(),
            FieldKind::Integer => value.as_i64().is_some(),
            FieldKind::Bool => value.is_boolean(),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Integer => "integer",
            FieldKind::Bool => "bool",
        };
        f.write_str(name)
    }
}

/// Why a response body did not match its expected shape.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("body is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("{schema}: expected a JSON object")]
    NotAnObject { schema: &'static str },
    #[error("{schema}: expected a JSON array")]
    NotAnArray { schema: &'static str },
    #[error("{schema}: missing required field '{field}'")]
    MissingField {
        schema: &'static str,
        field: &'static str,
    },
    #[error("{schema}: field '{field}' must be a {expected}")]
    WrongType {
        schema: &'static str,
        field: &'static str,
        expected: FieldKind,
    },
    #[error("item {index}: {source}")]
    Item {
        index: usize,
        #[source]
        source: Box<DecodeError>,
    },
    /// The required fields were present but serde still rejected the payload.
    #[error("{schema}: {message}")]
    Shape {
        schema: &'static str,
        message: String,
    },
}

/// A response type with a declared set of required fields.
pub trait Schema: DeserializeOwned {
    /// Name used in error messages.
    const NAME: &'static str;
    /// Required fields and their JSON kinds. Optional fields are left to serde.
    const FIELDS: &'static [(&'static str, FieldKind)];

    /// Checks the declared fields against a JSON object.
    fn check(object: &Map<String, Value>) -> Result<(), DecodeError> {
        for &(field, kind) in Self::FIELDS {
            match object.get(field) {
                None | Some(Value::Null) => {
                    return Err(DecodeError::MissingField {
                        schema: Self::NAME,
                        field,
                    })
                }
                Some(value) if !kind.matches(value) => {
                    return Err(DecodeError::WrongType {
                        schema: Self::NAME,
                        field,
                        expected: kind,
                    })
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

/// Decodes a single object of type `T` from a raw body.
pub fn decode<T: Schema>(body: &str) -> Result<T, DecodeError> {
    let value = parse(body)?;
    decode_value(value)
}

/// Decodes a JSON array whose every element is a `T`.
pub fn decode_list<T: Schema>(body: &str) -> Result<Vec<T>, DecodeError> {
    let value = parse(body)?;
    let Value::Array(items) = value else {
        return Err(DecodeError::NotAnArray { schema: T::NAME });
    };
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            decode_value(item).map_err(|e| DecodeError::Item {
                index,
                source: Box::new(e),
            })
        })
        .collect()
}

fn parse(body: &str) -> Result<Value, DecodeError> {
    serde_json::from_str(body).map_err(|e| DecodeError::InvalidJson(e.to_string()))
}

fn decode_value<T: Schema>(value: Value) -> Result<T, DecodeError> {
    let Value::Object(object) = &value else {
        return Err(DecodeError::NotAnObject { schema: T::NAME });
    };
    T::check(object)?;
    serde_json::from_value(value).map_err(|e| DecodeError::Shape {
        schema: T::NAME,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    struct Point {
        name: String,
        x: f64,
        n: i64,
    }

    impl Schema for Point {
        const NAME: &'static str = "Point";
        const FIELDS: &'static [(&'static str, FieldKind)] = &[
            ("name", FieldKind::String),
            ("x", FieldKind::Number),
            ("n", FieldKind::Integer),
        ];
    }

    #[test]
    fn decodes_valid_object() {
        let p: Point = decode(r#"{"name":"a","x":1.5,"n":3}"#).unwrap();
        assert_eq!(p.name, "a");
        assert_eq!(p.x, 1.5);
        assert_eq!(p.n, 3);
    }

    #[test]
    fn integer_accepted_where_number_expected() {
        let p: Point = decode(r#"{"name":"a","x":2,"n":3}"#).unwrap();
        assert_eq!(p.x, 2.0);
    }

    #[test]
    fn invalid_json() {
        let err = decode::<Point>("{not json").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidJson(_)));
    }

    #[test]
    fn not_an_object() {
        let err = decode::<Point>("[1,2]").unwrap_err();
        assert_eq!(err, DecodeError::NotAnObject { schema: "Point" });
    }

    #[test]
    fn missing_field_names_the_field() {
        let err = decode::<Point>(r#"{"name":"a","n":3}"#).unwrap_err();
        assert_eq!(
            err,
            DecodeError::MissingField {
                schema: "Point",
                field: "x"
            }
        );
    }

    #[test]
    fn null_counts_as_missing() {
        let err = decode::<Point>(r#"{"name":null,"x":1,"n":3}"#).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::MissingField { field: "name", .. }
        ));
    }

    #[test]
    fn wrong_type() {
        let err = decode::<Point>(r#"{"name":"a","x":"1.0","n":3}"#).unwrap_err();
        assert_eq!(
            err,
            DecodeError::WrongType {
                schema: "Point",
                field: "x",
                expected: FieldKind::Number
            }
        );
    }

    #[test]
    fn float_rejected_for_integer() {
        let err = decode::<Point>(r#"{"name":"a","x":1,"n":3.5}"#).unwrap_err();
        assert!(matches!(err, DecodeError::WrongType { field: "n", .. }));
    }

    #[test]
    fn list_reports_failing_index() {
        let body = r#"[{"name":"a","x":1,"n":1},{"name":"b","n":2}]"#;
        let err = decode_list::<Point>(body).unwrap_err();
        match err {
            DecodeError::Item { index, source } => {
                assert_eq!(index, 1);
                assert!(matches!(*source, DecodeError::MissingField { field: "x", .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn list_requires_array() {
        let err = decode_list::<Point>(r#"{"name":"a"}"#).unwrap_err();
        assert_eq!(err, DecodeError::NotAnArray { schema: "Point" });
    }

    #[test]
    fn empty_list_is_valid() {
        let points = decode_list::<Point>("[]").unwrap();
        assert!(points.is_empty());
    }
}
