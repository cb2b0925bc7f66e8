use std::collections::HashMap;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::AttributePath;
use crate::Diagnostic;
use crate::Diagnostics;

const DNS_SUBDOMAIN_MAX: usize = 253;
const DNS_LABEL_MAX: usize = 63;
const QUALIFIED_NAME_MAX: usize = 63;
const LABEL_VALUE_MAX: usize = 63;

static DNS_SUBDOMAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$")
        .expect("dns subdomain pattern")
});

static DNS_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").expect("dns label pattern"));

static QUALIFIED_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z0-9][-A-Za-z0-9_.]*)?[A-Za-z0-9]$").expect("qualified name pattern")
});

/// compiled `RegexMatches` patterns
static PATTERNS: Lazy<Mutex<HashMap<String, Regex>>> = Lazy::new(|| Mutex::new(HashMap::new()));

fn compiled(pattern: &str) -> Result<Regex, regex::Error> {
    let mut patterns = PATTERNS.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(regex) = patterns.get(pattern) {
        return Ok(regex.clone());
    }
    let regex = Regex::new(pattern)?;
    patterns.insert(pattern.to_owned(), regex.clone());
    Ok(regex)
}

/// Value being validated, with the object that contains it
pub struct ValidationRequest<'a> {
    pub path: &'a AttributePath,
    pub value: &'a Value,
    pub parent: Option<&'a Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Validator {
    OneOf { values: Vec<String> },
    LengthAtLeast { min: usize },
    LengthAtMost { max: usize },
    RegexMatches { pattern: String, message: String },
    Int64AtLeast { min: i64 },
    Int64AtMost { max: i64 },
    Float64AtLeast { min: f64 },
    SizeAtLeast { min: usize },
    ValuesOneOf { values: Vec<String> },
    ConflictsWith { attributes: Vec<String> },
    AlsoRequires { attributes: Vec<String> },
    DnsSubdomainName,
    DnsLabelName,
    LabelKeys,
    LabelValues,
    AnnotationKeys,
}

fn owned<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}

impl Validator {
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::OneOf {
            values: owned(values),
        }
    }

    pub fn values_one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::ValuesOneOf {
            values: owned(values),
        }
    }

    pub fn regex_matches<P, M>(pattern: P, message: M) -> Self
    where
        P: Into<String>,
        M: Into<String>,
    {
        Self::RegexMatches {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    pub fn conflicts_with<I, S>(attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::ConflictsWith {
            attributes: owned(attributes),
        }
    }

    pub fn also_requires<I, S>(attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AlsoRequires {
            attributes: owned(attributes),
        }
    }

    /// run validator against non null value
    pub fn validate(&self, request: &ValidationRequest) -> Diagnostics {
        let mut diags = Diagnostics::default();
        let path = request.path;
        let value = request.value;

        match self {
            Self::OneOf { values } => {
                if let Some(actual) = value.as_str() {
                    if !values.iter().any(|v| v == actual) {
                        diags.push(value_match(path, values, actual));
                    }
                }
            }
            Self::LengthAtLeast { min } => {
                if let Some(actual) = value.as_str() {
                    let len = actual.chars().count();
                    if len < *min {
                        diags.push(
                            Diagnostic::error(
                                "Invalid Attribute Value Length",
                                format!("string length must be at least {}, got: {}", min, len),
                            )
                            .at(path.clone()),
                        );
                    }
                }
            }
            Self::LengthAtMost { max } => {
                if let Some(actual) = value.as_str() {
                    let len = actual.chars().count();
                    if len > *max {
                        diags.push(
                            Diagnostic::error(
                                "Invalid Attribute Value Length",
                                format!("string length must be at most {}, got: {}", max, len),
                            )
                            .at(path.clone()),
                        );
                    }
                }
            }
            Self::RegexMatches { pattern, message } => {
                if let Some(actual) = value.as_str() {
                    match compiled(pattern) {
                        Ok(regex) => {
                            if !regex.is_match(actual) {
                                diags.push(
                                    Diagnostic::error(
                                        "Invalid Attribute Value Match",
                                        format!("{}, got: {}", message, actual),
                                    )
                                    .at(path.clone()),
                                );
                            }
                        }
                        Err(err) => diags.push(
                            Diagnostic::error(
                                "Invalid Validator",
                                format!("pattern {} can't be compiled: {}", pattern, err),
                            )
                            .at(path.clone()),
                        ),
                    }
                }
            }
            Self::Int64AtLeast { min } => {
                if let Some(actual) = value.as_i64() {
                    if actual < *min {
                        diags.push(out_of_range(path, format!("at least {}", min), actual));
                    }
                }
            }
            Self::Int64AtMost { max } => {
                if let Some(actual) = value.as_i64() {
                    if actual > *max {
                        diags.push(out_of_range(path, format!("at most {}", max), actual));
                    }
                }
            }
            Self::Float64AtLeast { min } => {
                if let Some(actual) = value.as_f64() {
                    if actual < *min {
                        diags.push(out_of_range(path, format!("at least {}", min), actual));
                    }
                }
            }
            Self::SizeAtLeast { min } => {
                if let Some(list) = value.as_array() {
                    if list.len() < *min {
                        diags.push(
                            Diagnostic::error(
                                "Invalid Attribute Value",
                                format!(
                                    "list must contain at least {} elements, got: {}",
                                    min,
                                    list.len()
                                ),
                            )
                            .at(path.clone()),
                        );
                    }
                }
            }
            Self::ValuesOneOf { values } => {
                if let Some(list) = value.as_array() {
                    for (index, element) in list.iter().enumerate() {
                        if let Some(actual) = element.as_str() {
                            if !values.iter().any(|v| v == actual) {
                                diags.push(value_match(&path.index(index), values, actual));
                            }
                        }
                    }
                }
            }
            Self::ConflictsWith { attributes } => {
                for name in attributes {
                    if is_set(request.parent, name) {
                        diags.push(
                            Diagnostic::error(
                                "Invalid Attribute Combination",
                                format!(
                                    "Attribute \"{}\" cannot be specified when \"{}\" is specified",
                                    path.sibling(name),
                                    path
                                ),
                            )
                            .at(path.clone()),
                        );
                    }
                }
            }
            Self::AlsoRequires { attributes } => {
                for name in attributes {
                    if !is_set(request.parent, name) {
                        diags.push(
                            Diagnostic::error(
                                "Missing Attribute Configuration",
                                format!(
                                    "Attribute \"{}\" must be specified when \"{}\" is specified",
                                    path.sibling(name),
                                    path
                                ),
                            )
                            .at(path.clone()),
                        );
                    }
                }
            }
            Self::DnsSubdomainName => {
                if let Some(actual) = value.as_str() {
                    if let Some(problem) = dns_subdomain_problem(actual) {
                        diags.push(invalid_name(path, actual, problem));
                    }
                }
            }
            Self::DnsLabelName => {
                if let Some(actual) = value.as_str() {
                    let problem = if actual.len() > DNS_LABEL_MAX {
                        Some(format!("must be no more than {} characters", DNS_LABEL_MAX))
                    } else if !DNS_LABEL.is_match(actual) {
                        Some("must consist of lower case alphanumeric characters or '-', and must start and end with an alphanumeric character".to_owned())
                    } else {
                        None
                    };
                    if let Some(problem) = problem {
                        diags.push(invalid_name(path, actual, problem));
                    }
                }
            }
            Self::LabelKeys | Self::AnnotationKeys => {
                if let Some(map) = value.as_object() {
                    for key in map.keys() {
                        if let Some(problem) = qualified_name_problem(key) {
                            diags.push(invalid_name(&path.key(key), key, problem));
                        }
                    }
                }
            }
            Self::LabelValues => {
                if let Some(map) = value.as_object() {
                    for (key, label) in map {
                        if let Some(actual) = label.as_str() {
                            if let Some(problem) = label_value_problem(actual) {
                                diags.push(invalid_name(&path.key(key), actual, problem));
                            }
                        }
                    }
                }
            }
        }

        diags
    }
}

fn is_set(parent: Option<&Map<String, Value>>, name: &str) -> bool {
    parent
        .and_then(|object| object.get(name))
        .map(|value| !value.is_null())
        .unwrap_or(false)
}

fn value_match(path: &AttributePath, values: &[String], actual: &str) -> Diagnostic {
    let expected: Vec<String> = values.iter().map(|v| format!("\"{}\"", v)).collect();
    Diagnostic::error(
        "Invalid Attribute Value Match",
        format!(
            "value must be one of: [{}], got: \"{}\"",
            expected.join(" "),
            actual
        ),
    )
    .at(path.clone())
}

fn out_of_range<T: std::fmt::Display>(path: &AttributePath, bound: String, actual: T) -> Diagnostic {
    Diagnostic::error(
        "Invalid Attribute Value",
        format!("value must be {}, got: {}", bound, actual),
    )
    .at(path.clone())
}

fn invalid_name(path: &AttributePath, actual: &str, problem: String) -> Diagnostic {
    Diagnostic::error(
        "Invalid Attribute Value",
        format!("\"{}\" is invalid: {}", actual, problem),
    )
    .at(path.clone())
}

fn dns_subdomain_problem(value: &str) -> Option<String> {
    if value.len() > DNS_SUBDOMAIN_MAX {
        Some(format!(
            "must be no more than {} characters",
            DNS_SUBDOMAIN_MAX
        ))
    } else if !DNS_SUBDOMAIN.is_match(value) {
        Some("must consist of lower case alphanumeric characters, '-' or '.', and must start and end with an alphanumeric character".to_owned())
    } else {
        None
    }
}

/// label and annotation keys: optional dns subdomain prefix, `/`, name
fn qualified_name_problem(key: &str) -> Option<String> {
    let parts: Vec<&str> = key.split('/').collect();
    let name = match parts.as_slice() {
        [name] => *name,
        [prefix, name] => {
            if prefix.is_empty() {
                return Some("prefix part must be non-empty".to_owned());
            }
            if let Some(problem) = dns_subdomain_problem(prefix) {
                return Some(format!("prefix part {}", problem));
            }
            *name
        }
        _ => {
            return Some(
                "a qualified name must consist of an optional prefix and a name separated by a single '/'"
                    .to_owned(),
            )
        }
    };

    if name.is_empty() {
        Some("name part must be non-empty".to_owned())
    } else if name.len() > QUALIFIED_NAME_MAX {
        Some(format!(
            "name part must be no more than {} characters",
            QUALIFIED_NAME_MAX
        ))
    } else if !QUALIFIED_NAME.is_match(name) {
        Some("name part must consist of alphanumeric characters, '-', '_' or '.', and must start and end with an alphanumeric character".to_owned())
    } else {
        None
    }
}

fn label_value_problem(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else if value.len() > LABEL_VALUE_MAX {
        Some(format!("must be no more than {} characters", LABEL_VALUE_MAX))
    } else if !QUALIFIED_NAME.is_match(value) {
        Some("must consist of alphanumeric characters, '-', '_' or '.', and must start and end with an alphanumeric character".to_owned())
    } else {
        None
    }
}
