//!
//! # Attribute schema
//!
//! Nested description of the configuration accepted by a data source.
//!
use std::collections::BTreeMap;

use serde::Serialize;

use crate::Validator;

pub type Attributes = BTreeMap<String, Attribute>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Schema {
    pub description: String,
    pub attributes: Attributes,
}

impl Schema {
    pub fn new<S: Into<String>>(description: S) -> Self {
        Self {
            description: description.into(),
            attributes: Attributes::new(),
        }
    }

    pub fn with_attribute<N: Into<String>>(mut self, name: N, attribute: Attribute) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeMode {
    Required,
    Optional,
    Computed,
    OptionalComputed,
}

impl AttributeMode {
    pub fn is_required(&self) -> bool {
        matches!(self, Self::Required)
    }

    /// computed attributes that can't be set from configuration
    pub fn is_computed_only(&self) -> bool {
        matches!(self, Self::Computed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    String,
    Int64,
    Float64,
    Bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "element", rename_all = "snake_case")]
pub enum AttributeKind {
    String,
    Int64,
    Float64,
    Bool,
    IntOrString,
    List(ElementKind),
    Map(ElementKind),
    SingleNested(Attributes),
    ListNested(Attributes),
}

impl AttributeKind {
    pub fn nested_attributes(&self) -> Option<&Attributes> {
        match self {
            Self::SingleNested(attributes) | Self::ListNested(attributes) => Some(attributes),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int64 => "number",
            Self::Float64 => "number",
            Self::Bool => "bool",
            Self::IntOrString => "string or number",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::SingleNested(_) => "object",
            Self::ListNested(_) => "list of object",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub kind: AttributeKind,
    pub mode: AttributeMode,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub sensitive: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<Validator>,
}

fn attributes<I, N>(nested: I) -> Attributes
where
    I: IntoIterator<Item = (N, Attribute)>,
    N: Into<String>,
{
    nested
        .into_iter()
        .map(|(name, attribute)| (name.into(), attribute))
        .collect()
}

impl Attribute {
    pub fn new(kind: AttributeKind, mode: AttributeMode) -> Self {
        Self {
            kind,
            mode,
            description: String::new(),
            sensitive: false,
            validators: vec![],
        }
    }

    pub fn required_string() -> Self {
        Self::new(AttributeKind::String, AttributeMode::Required)
    }

    pub fn optional_string() -> Self {
        Self::new(AttributeKind::String, AttributeMode::Optional)
    }

    pub fn computed_string() -> Self {
        Self::new(AttributeKind::String, AttributeMode::Computed)
    }

    pub fn optional_int64() -> Self {
        Self::new(AttributeKind::Int64, AttributeMode::Optional)
    }

    pub fn optional_float64() -> Self {
        Self::new(AttributeKind::Float64, AttributeMode::Optional)
    }

    pub fn optional_bool() -> Self {
        Self::new(AttributeKind::Bool, AttributeMode::Optional)
    }

    pub fn optional_int_or_string() -> Self {
        Self::new(AttributeKind::IntOrString, AttributeMode::Optional)
    }

    pub fn required_list(element: ElementKind) -> Self {
        Self::new(AttributeKind::List(element), AttributeMode::Required)
    }

    pub fn optional_list(element: ElementKind) -> Self {
        Self::new(AttributeKind::List(element), AttributeMode::Optional)
    }

    pub fn optional_map(element: ElementKind) -> Self {
        Self::new(AttributeKind::Map(element), AttributeMode::Optional)
    }

    pub fn required_object<I, N>(nested: I) -> Self
    where
        I: IntoIterator<Item = (N, Attribute)>,
        N: Into<String>,
    {
        Self::new(
            AttributeKind::SingleNested(attributes(nested)),
            AttributeMode::Required,
        )
    }

    pub fn optional_object<I, N>(nested: I) -> Self
    where
        I: IntoIterator<Item = (N, Attribute)>,
        N: Into<String>,
    {
        Self::new(
            AttributeKind::SingleNested(attributes(nested)),
            AttributeMode::Optional,
        )
    }

    pub fn required_list_of<I, N>(nested: I) -> Self
    where
        I: IntoIterator<Item = (N, Attribute)>,
        N: Into<String>,
    {
        Self::new(
            AttributeKind::ListNested(attributes(nested)),
            AttributeMode::Required,
        )
    }

    pub fn optional_list_of<I, N>(nested: I) -> Self
    where
        I: IntoIterator<Item = (N, Attribute)>,
        N: Into<String>,
    {
        Self::new(
            AttributeKind::ListNested(attributes(nested)),
            AttributeMode::Optional,
        )
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }
}

#[cfg(test)]
mod test {

    use serde_json::json;

    use super::Attribute;
    use super::AttributeKind;
    use super::ElementKind;
    use super::Schema;
    use crate::Validator;

    #[test]
    fn test_nested_builder() {
        let issuer_ref = Attribute::required_object([
            ("name", Attribute::required_string()),
            ("kind", Attribute::optional_string()),
        ]);

        let nested = issuer_ref.kind.nested_attributes().expect("nested");
        assert_eq!(nested.len(), 2);
        assert!(nested["name"].mode.is_required());
        assert!(!nested["kind"].mode.is_required());
    }

    #[test]
    fn test_schema_json() {
        let schema = Schema::new("test").with_attribute(
            "usages",
            Attribute::optional_list(ElementKind::String)
                .with_description("key usages")
                .with_validator(Validator::values_one_of(["digital signature"])),
        );

        let encoded = serde_json::to_value(&schema).expect("json");
        assert_eq!(
            encoded,
            json!({
                "description": "test",
                "attributes": {
                    "usages": {
                        "kind": { "type": "list", "element": "string" },
                        "mode": "optional",
                        "description": "key usages",
                        "validators": [
                            { "type": "values_one_of", "values": ["digital signature"] }
                        ]
                    }
                }
            })
        );
    }

    #[test]
    fn test_type_name() {
        assert_eq!(AttributeKind::IntOrString.type_name(), "string or number");
        assert_eq!(AttributeKind::Map(ElementKind::String).type_name(), "map");
    }
}
