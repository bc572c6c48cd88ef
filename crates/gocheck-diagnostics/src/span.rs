//! Source locations for diagnostics.
//!
//! Spans are byte ranges tagged with a file name. They only become lines and
//! columns when a [`SourceCache`](crate::render::SourceCache) resolves them
//! for display.

use serde::Serialize;
use std::ops::Range;

/// A contiguous region of a named source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SourceSpan {
    /// File name as it should appear in rendered output.
    pub file: String,
    /// Starting byte offset (inclusive).
    pub start: usize,
    /// Ending byte offset (exclusive).
    pub end: usize,
}

impl SourceSpan {
    pub fn new(file: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            file: file.into(),
            start,
            end,
        }
    }

    pub fn from_range(file: impl Into<String>, range: Range<usize>) -> Self {
        Self::new(file, range.start, range.end)
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Smallest span covering both, or `None` when they live in different files.
    pub fn merge(&self, other: &SourceSpan) -> Option<SourceSpan> {
        if self.file != other.file {
            return None;
        }
        Some(SourceSpan {
            file: self.file.clone(),
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        })
    }

    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }
}

/// Underline style of a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelStyle {
    /// Where the problem is; rendered with `^^^`.
    #[default]
    Primary,
    /// Related location such as a declaration; rendered with `---`.
    Secondary,
}

/// A message attached to a span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Label {
    pub span: SourceSpan,
    pub message: String,
    pub style: LabelStyle,
}

impl Label {
    pub fn primary(span: SourceSpan, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            style: LabelStyle::Primary,
        }
    }

    pub fn secondary(span: SourceSpan, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            style: LabelStyle::Secondary,
        }
    }
}

/// All locations a diagnostic points at.
///
/// The first primary label pushed becomes the diagnostic's anchor: it decides
/// the `-->` location and the order in which diagnostics are reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MultiSpan {
    primary: Option<SourceSpan>,
    labels: Vec<Label>,
}

impl MultiSpan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_span(span: SourceSpan) -> Self {
        Self {
            primary: Some(span),
            labels: Vec::new(),
        }
    }

    pub fn primary_span(&self) -> Option<&SourceSpan> {
        self.primary.as_ref()
    }

    pub fn push_primary(&mut self, span: SourceSpan, message: impl Into<String>) {
        if self.primary.is_none() {
            self.primary = Some(span.clone());
        }
        self.labels.push(Label::primary(span, message));
    }

    pub fn push_secondary(&mut self, span: SourceSpan, message: impl Into<String>) {
        self.labels.push(Label::secondary(span, message));
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_none() && self.labels.is_empty()
    }
}

/// 1-based line and column; the column counts characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LineColumn {
    pub line: usize,
    pub column: usize,
}

impl LineColumn {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A span resolved against its source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSpan {
    pub span: SourceSpan,
    pub start: LineColumn,
    pub end: LineColumn,
    /// Byte offset at which the starting line begins.
    pub line_start: usize,
    /// Text of every line the span touches, without line terminators.
    pub source_lines: Vec<String>,
}

impl ResolvedSpan {
    pub fn is_multiline(&self) -> bool {
        self.start.line != self.end.line
    }

    /// The part of the first line before the span starts.
    pub fn prefix(&self) -> &str {
        let line = self.first_line();
        let cut = self.span.start.saturating_sub(self.line_start).min(line.len());
        line.get(..cut).unwrap_or(line)
    }

    /// The part of the span that sits on its first line.
    pub fn highlighted(&self) -> &str {
        let line = self.first_line();
        let from = self.span.start.saturating_sub(self.line_start).min(line.len());
        let to = self.span.end.saturating_sub(self.line_start).clamp(from, line.len());
        line.get(from..to).unwrap_or("")
    }

    fn first_line(&self) -> &str {
        self.source_lines.first().map(String::as_str).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_creation() {
        let span = SourceSpan::new("main.go", 10, 20);
        assert_eq!(span.file, "main.go");
        assert_eq!(span.len(), 10);
        assert!(!span.is_empty());
        assert!(span.contains(10));
        assert!(!span.contains(20));
        assert_eq!(SourceSpan::from_range("main.go", 10..20), span);
    }

    #[test]
    fn test_span_merge() {
        let call = SourceSpan::new("main.go", 10, 20);
        let arg = SourceSpan::new("main.go", 15, 30);
        let merged = call.merge(&arg).expect("same file");
        assert_eq!((merged.start, merged.end), (10, 30));

        let elsewhere = SourceSpan::new("util.go", 0, 4);
        assert_eq!(call.merge(&elsewhere), None);
    }

    #[test]
    fn test_multi_span_primary_is_first_primary_label() {
        let mut multi = MultiSpan::new();
        multi.push_secondary(SourceSpan::new("main.go", 0, 3), "declared here");
        multi.push_primary(SourceSpan::new("main.go", 30, 40), "first");
        multi.push_primary(SourceSpan::new("main.go", 50, 60), "second");

        assert_eq!(multi.labels().len(), 3);
        assert_eq!(multi.primary_span().map(|s| s.start), Some(30));
    }

    #[test]
    fn test_resolved_span_slices() {
        let resolved = ResolvedSpan {
            span: SourceSpan::new("main.go", 14, 17),
            start: LineColumn::new(2, 5),
            end: LineColumn::new(2, 8),
            line_start: 10,
            source_lines: vec!["    sum(a)".to_string()],
        };
        assert_eq!(resolved.prefix(), "    ");
        assert_eq!(resolved.highlighted(), "sum");
        assert!(!resolved.is_multiline());
    }
}
