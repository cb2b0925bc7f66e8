use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Value of an `x-kubernetes-int-or-string` field, such as a port given by
/// number or by name. Encodes as the inner value.
#[derive(Deserialize, Serialize, Clone, Debug, Eq, PartialEq)]
#[serde(untagged)]
pub enum IntOrString {
    Int(i32),
    String(String),
}

impl Default for IntOrString {
    fn default() -> Self {
        IntOrString::Int(0)
    }
}

impl From<i32> for IntOrString {
    fn from(value: i32) -> Self {
        IntOrString::Int(value)
    }
}

impl From<&str> for IntOrString {
    fn from(value: &str) -> Self {
        IntOrString::String(value.to_owned())
    }
}

impl fmt::Display for IntOrString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{}", value),
            Self::String(value) => write!(f, "{}", value),
        }
    }
}

#[cfg(test)]
mod test {

    use serde_json::json;

    use crate::IntOrString;

    #[test]
    fn test_port_number() {
        let port: IntOrString = serde_json::from_value(json!(8080)).expect("number");
        assert_eq!(port, IntOrString::Int(8080));
        assert_eq!(serde_yaml::to_string(&port).expect("yaml"), "8080\n");
    }

    #[test]
    fn test_port_name() {
        let port: IntOrString = serde_json::from_value(json!("metrics")).expect("name");
        assert_eq!(port, IntOrString::from("metrics"));
        assert_eq!(port.to_string(), "metrics");
    }

    #[test]
    fn test_reject_float() {
        serde_json::from_value::<IntOrString>(json!(2.5)).expect_err("float is not a port");
    }

    #[test]
    fn test_reject_out_of_range() {
        serde_json::from_value::<IntOrString>(json!(i64::MAX)).expect_err("too large");
    }
}
