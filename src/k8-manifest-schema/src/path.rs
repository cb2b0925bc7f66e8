use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathStep {
    Attribute(String),
    Key(String),
    Index(usize),
}

/// Location of a value inside a configuration, `spec.dns_names[0]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttributePath(Vec<PathStep>);

impl AttributePath {
    pub fn root(name: &str) -> Self {
        Self(vec![PathStep::Attribute(name.to_owned())])
    }

    pub fn attribute(&self, name: &str) -> Self {
        self.with(PathStep::Attribute(name.to_owned()))
    }

    pub fn key(&self, key: &str) -> Self {
        self.with(PathStep::Key(key.to_owned()))
    }

    pub fn index(&self, index: usize) -> Self {
        self.with(PathStep::Index(index))
    }

    /// path of a sibling attribute of the last step
    pub fn sibling(&self, name: &str) -> Self {
        let mut steps = self.0.clone();
        steps.pop();
        steps.push(PathStep::Attribute(name.to_owned()));
        Self(steps)
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn with(&self, step: PathStep) -> Self {
        let mut steps = self.0.clone();
        steps.push(step);
        Self(steps)
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, step) in self.0.iter().enumerate() {
            match step {
                PathStep::Attribute(name) if i == 0 => write!(f, "{}", name)?,
                PathStep::Attribute(name) => write!(f, ".{}", name)?,
                PathStep::Key(key) => write!(f, "[\"{}\"]", key)?,
                PathStep::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}
