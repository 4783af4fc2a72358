use std::fmt;

use crate::models::Record;

/// One line of output: `<kind> <subject> <message>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub kind: String,
    pub subject: String,
    pub message: String,
}

impl Finding {
    pub fn new(
        kind: impl fmt::Display,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.to_string(),
            subject: subject.into(),
            message: message.into(),
        }
    }

    /// A finding about `record`, named the way it is shown to authors.
    pub fn about(record: &Record, message: impl Into<String>) -> Self {
        let subject = match record {
            Record::Cell(cell) => cell.display_name(),
            Record::PathGrid(grid) => grid.cell.clone().unwrap_or_default(),
            other => other.id().unwrap_or_default().to_string(),
        };
        Self::new(record.kind(), subject, message)
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.kind, self.subject, self.message)
    }
}

/// Append-only sink for findings, in the order they were produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    findings: Vec<Finding>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn add(
        &mut self,
        kind: impl fmt::Display,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.push(Finding::new(kind, subject, message));
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Finding> {
        self.findings.iter()
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Findings rendered one per line.
    pub fn lines(&self) -> Vec<String> {
        self.findings.iter().map(ToString::to_string).collect()
    }
}

impl<'a> IntoIterator for &'a Report {
    type Item = &'a Finding;
    type IntoIter = std::slice::Iter<'a, Finding>;

    fn into_iter(self) -> Self::IntoIter {
        self.findings.iter()
    }
}

impl IntoIterator for Report {
    type Item = Finding;
    type IntoIter = std::vec::IntoIter<Finding>;

    fn into_iter(self) -> Self::IntoIter {
        self.findings.into_iter()
    }
}
