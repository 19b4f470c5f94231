//! Schema-driven flattening of nested payloads into `key.path=value` pairs.
//!
//! The schema says which fields are scalars, nested objects or lists, so the
//! walk never guesses from the runtime shape of the value. A value whose shape
//! contradicts the schema is rejected.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormDataError {
    #[error("Form payload must be a JSON object")]
    NotAnObject,

    #[error("Field '{path}' expected {expected}, found {found}")]
    ShapeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Failed to serialize form payload: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub enum FieldShape {
    Scalar,
    Nested(FormSchema),
    List(Box<FieldShape>),
}

#[derive(Debug, Clone, Default)]
pub struct FormSchema {
    fields: Vec<(String, FieldShape)>,
}

impl FormSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scalar(self, name: &str) -> Self {
        self.field(name, FieldShape::Scalar)
    }

    pub fn nested(self, name: &str, schema: FormSchema) -> Self {
        self.field(name, FieldShape::Nested(schema))
    }

    pub fn list(self, name: &str, item: FieldShape) -> Self {
        self.field(name, FieldShape::List(Box::new(item)))
    }

    fn field(mut self, name: &str, shape: FieldShape) -> Self {
        self.fields.push((name.to_string(), shape));
        self
    }
}

/// Flatten `value` following `schema`. Fields appear in schema order; nulls
/// and fields the schema does not declare are left out.
pub fn flatten(schema: &FormSchema, value: &Value) -> Result<Vec<(String, String)>, FormDataError> {
    let object = value.as_object().ok_or(FormDataError::NotAnObject)?;
    let mut pairs = Vec::new();
    flatten_object(schema, object, "", &mut pairs)?;
    Ok(pairs)
}

pub fn flatten_serializable<T: Serialize>(
    schema: &FormSchema,
    value: &T,
) -> Result<Vec<(String, String)>, FormDataError> {
    flatten(schema, &serde_json::to_value(value)?)
}

fn flatten_object(
    schema: &FormSchema,
    object: &serde_json::Map<String, Value>,
    prefix: &str,
    pairs: &mut Vec<(String, String)>,
) -> Result<(), FormDataError> {
    for (name, shape) in &schema.fields {
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", prefix, name)
        };
        if let Some(value) = object.get(name) {
            flatten_value(shape, value, path, pairs)?;
        }
    }
    Ok(())
}

fn flatten_value(
    shape: &FieldShape,
    value: &Value,
    path: String,
    pairs: &mut Vec<(String, String)>,
) -> Result<(), FormDataError> {
    if value.is_null() {
        return Ok(());
    }

    match shape {
        FieldShape::Scalar => {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => return Err(mismatch(path, "a scalar", other)),
            };
            pairs.push((path, text));
        }
        FieldShape::Nested(schema) => match value {
            Value::Object(object) => flatten_object(schema, object, &path, pairs)?,
            other => return Err(mismatch(path, "an object", other)),
        },
        FieldShape::List(item) => match value {
            Value::Array(items) => {
                for (index, element) in items.iter().enumerate() {
                    flatten_value(item, element, format!("{}[{}]", path, index), pairs)?;
                }
            }
            other => return Err(mismatch(path, "a list", other)),
        },
    }
    Ok(())
}

fn mismatch(path: String, expected: &'static str, found: &Value) -> FormDataError {
    let found = match found {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    };
    FormDataError::ShapeMismatch {
        path,
        expected,
        found,
    }
}
