use std::fmt;

use serde::Serialize;

use crate::AttributePath;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A problem found while validating or reading a configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<AttributePath>,
}

impl Diagnostic {
    pub fn error<S, D>(summary: S, detail: D) -> Self
    where
        S: Into<String>,
        D: Into<String>,
    {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
            path: None,
        }
    }

    pub fn warning<S, D>(summary: S, detail: D) -> Self
    where
        S: Into<String>,
        D: Into<String>,
    {
        Self {
            severity: Severity::Warning,
            summary: summary.into(),
            detail: detail.into(),
            path: None,
        }
    }

    pub fn at(mut self, path: AttributePath) -> Self {
        self.path = Some(path);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        match &self.path {
            Some(path) => write!(f, "{}: {} at {}: {}", severity, self.summary, path, self.detail),
            None => write!(f, "{}: {}: {}", severity, self.summary, self.detail),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    pub fn append(&mut self, other: Diagnostics) {
        self.0.extend(other.0);
    }

    pub fn has_error(&self) -> bool {
        self.0.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(|d| d.is_error())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Diagnostic> for Diagnostics {
    fn from(diagnostic: Diagnostic) -> Self {
        Self(vec![diagnostic])
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for diagnostic in &self.0 {
            writeln!(f, "{}", diagnostic)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {

    use super::Diagnostic;
    use super::Diagnostics;
    use crate::AttributePath;

    #[test]
    fn test_has_error() {
        let mut diags = Diagnostics::default();
        diags.push(Diagnostic::warning("Deprecated", "use something else"));
        assert!(!diags.has_error());

        diags.append(Diagnostic::error("Missing required argument", "name is required").into());
        assert!(diags.has_error());
        assert_eq!(diags.len(), 2);
        assert_eq!(diags.errors().count(), 1);
    }

    #[test]
    fn test_display() {
        let diag = Diagnostic::error("Invalid value", "must not be empty")
            .at(AttributePath::root("metadata").attribute("name"));
        assert_eq!(
            diag.to_string(),
            "error: Invalid value at metadata.name: must not be empty"
        );
    }
}
