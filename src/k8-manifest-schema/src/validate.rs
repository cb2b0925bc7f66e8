use serde_json::Map;
use serde_json::Value;
use tracing::trace;

use crate::Attribute;
use crate::AttributeKind;
use crate::AttributePath;
use crate::Attributes;
use crate::Diagnostic;
use crate::Diagnostics;
use crate::ElementKind;
use crate::Schema;
use crate::ValidationRequest;

impl Schema {
    /// validate configuration against schema, reporting every problem found
    pub fn validate(&self, config: &Value) -> Diagnostics {
        let mut diags = Diagnostics::default();
        match config.as_object() {
            Some(object) => {
                validate_object(&self.attributes, object, &AttributePath::default(), &mut diags)
            }
            None => diags.push(Diagnostic::error(
                "Invalid configuration",
                format!("configuration must be an object, got: {}", json_type(config)),
            )),
        }
        trace!(count = diags.len(), "validated configuration");
        diags
    }

    /// configuration with every schema attribute present, null when unset
    pub fn normalize(&self, config: &Value) -> Value {
        match config.as_object() {
            Some(object) => Value::Object(normalize_object(&self.attributes, object)),
            None => Value::Object(normalize_object(&self.attributes, &Map::new())),
        }
    }
}

fn child_path(parent: &AttributePath, name: &str) -> AttributePath {
    if parent.is_empty() {
        AttributePath::root(name)
    } else {
        parent.attribute(name)
    }
}

fn validate_object(
    attributes: &Attributes,
    object: &Map<String, Value>,
    path: &AttributePath,
    diags: &mut Diagnostics,
) {
    for name in object.keys() {
        if !attributes.contains_key(name) {
            diags.push(
                Diagnostic::error(
                    "Unsupported argument",
                    format!("An argument named \"{}\" is not expected here.", name),
                )
                .at(child_path(path, name)),
            );
        }
    }

    for (name, attribute) in attributes {
        let attribute_path = child_path(path, name);
        let value = object.get(name).unwrap_or(&Value::Null);
        validate_attribute(attribute, value, object, &attribute_path, diags);
    }
}

fn validate_attribute(
    attribute: &Attribute,
    value: &Value,
    parent: &Map<String, Value>,
    path: &AttributePath,
    diags: &mut Diagnostics,
) {
    if value.is_null() {
        if attribute.mode.is_required() {
            diags.push(
                Diagnostic::error(
                    "Missing required argument",
                    format!("The argument \"{}\" is required, but no definition was found.", path),
                )
                .at(path.clone()),
            );
        }
        return;
    }

    if attribute.mode.is_computed_only() {
        diags.push(
            Diagnostic::error(
                "Invalid configuration for computed attribute",
                format!("\"{}\" is computed and can't be set in configuration", path),
            )
            .at(path.clone()),
        );
        return;
    }

    if !validate_kind(&attribute.kind, value, path, diags) {
        return;
    }

    let request = ValidationRequest {
        path,
        value,
        parent: Some(parent),
    };
    for validator in &attribute.validators {
        diags.append(validator.validate(&request));
    }
}

/// returns false when value doesn't match the kind
fn validate_kind(
    kind: &AttributeKind,
    value: &Value,
    path: &AttributePath,
    diags: &mut Diagnostics,
) -> bool {
    let matches = match kind {
        AttributeKind::String => value.is_string(),
        AttributeKind::Int64 => value.as_i64().is_some(),
        AttributeKind::Float64 => value.is_number(),
        AttributeKind::Bool => value.is_boolean(),
        AttributeKind::IntOrString => {
            value.is_string() || value.as_i64().map(fits_i32).unwrap_or(false)
        }
        AttributeKind::List(element) => match value.as_array() {
            Some(list) => {
                let mut ok = true;
                for (index, item) in list.iter().enumerate() {
                    ok &= validate_element(*element, item, &path.index(index), diags);
                }
                return ok;
            }
            None => false,
        },
        AttributeKind::Map(element) => match value.as_object() {
            Some(map) => {
                let mut ok = true;
                for (key, item) in map {
                    ok &= validate_element(*element, item, &path.key(key), diags);
                }
                return ok;
            }
            None => false,
        },
        AttributeKind::SingleNested(attributes) => match value.as_object() {
            Some(object) => {
                validate_object(attributes, object, path, diags);
                return true;
            }
            None => false,
        },
        AttributeKind::ListNested(attributes) => match value.as_array() {
            Some(list) => {
                let mut ok = true;
                for (index, item) in list.iter().enumerate() {
                    let item_path = path.index(index);
                    match item.as_object() {
                        Some(object) => validate_object(attributes, object, &item_path, diags),
                        None => {
                            diags.push(type_mismatch("object", item, &item_path));
                            ok = false;
                        }
                    }
                }
                return ok;
            }
            None => false,
        },
    };

    if !matches {
        diags.push(type_mismatch(kind.type_name(), value, path));
    }
    matches
}

fn validate_element(
    element: ElementKind,
    value: &Value,
    path: &AttributePath,
    diags: &mut Diagnostics,
) -> bool {
    let (matches, expected) = match element {
        ElementKind::String => (value.is_string(), "string"),
        ElementKind::Int64 => (value.as_i64().is_some(), "number"),
        ElementKind::Float64 => (value.is_number(), "number"),
        ElementKind::Bool => (value.is_boolean(), "bool"),
    };
    if !matches {
        diags.push(type_mismatch(expected, value, path));
    }
    matches
}

fn fits_i32(value: i64) -> bool {
    i32::try_from(value).is_ok()
}

fn type_mismatch(expected: &str, value: &Value, path: &AttributePath) -> Diagnostic {
    Diagnostic::error(
        "Incorrect attribute value type",
        format!("{} required, got: {}", expected, json_type(value)),
    )
    .at(path.clone())
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

fn normalize_object(attributes: &Attributes, object: &Map<String, Value>) -> Map<String, Value> {
    attributes
        .iter()
        .map(|(name, attribute)| {
            let value = object.get(name).unwrap_or(&Value::Null);
            (name.clone(), normalize_value(&attribute.kind, value))
        })
        .collect()
}

fn normalize_value(kind: &AttributeKind, value: &Value) -> Value {
    match (kind, value) {
        (AttributeKind::SingleNested(attributes), Value::Object(object)) => {
            Value::Object(normalize_object(attributes, object))
        }
        (AttributeKind::ListNested(attributes), Value::Array(list)) => Value::Array(
            list.iter()
                .map(|item| match item {
                    Value::Object(object) => Value::Object(normalize_object(attributes, object)),
                    other => other.clone(),
                })
                .collect(),
        ),
        _ => value.clone(),
    }
}
