//! Diagnostic Collector.

use crate::error::SemaError;
use tracing::debug;

/// Accumulates findings during a walk. Recording never interrupts the walk.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    findings: Vec<SemaError>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, error: SemaError) {
        debug!(code = error.kind().code(), span = ?error.span(), "{}", error);
        self.findings.push(error);
    }

    pub fn extend(&mut self, errors: impl IntoIterator<Item = SemaError>) {
        for error in errors {
            self.record(error);
        }
    }

    pub fn all(&self) -> &[SemaError] {
        &self.findings
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Findings ordered by source position. Findings at the same position
    /// keep the order they were recorded in.
    pub fn into_sorted(mut self) -> Vec<SemaError> {
        self.findings.sort_by_key(|error| error.span().start);
        self.findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gocheck_ast::Span;
    use pretty_assertions::assert_eq;

    fn no_new(start: usize) -> SemaError {
        SemaError::NoNewVariables {
            span: Span::new(start, start + 2),
        }
    }

    #[test]
    fn test_sorted_by_position_stable() {
        let mut collector = DiagnosticCollector::new();
        collector.record(no_new(30));
        collector.record(SemaError::MisplacedBranch {
            keyword: "break".into(),
            span: Span::new(10, 15),
        });
        collector.record(no_new(10));
        assert_eq!(collector.len(), 3);

        let sorted = collector.into_sorted();
        assert!(matches!(sorted[0], SemaError::MisplacedBranch { .. }));
        assert_eq!(sorted[1], no_new(10));
        assert_eq!(sorted[2], no_new(30));
    }
}
