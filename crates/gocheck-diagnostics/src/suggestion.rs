//! Fix suggestions attached to diagnostics.

use crate::span::SourceSpan;
use serde::Serialize;

/// How confident a suggestion is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Applicability {
    /// Unambiguous; a tool may apply the edits without asking.
    MachineApplicable,
    /// Plausible, phrased as "consider ...".
    #[default]
    MaybeIncorrect,
    /// Points at a concept rather than an edit.
    Educational,
}

impl Applicability {
    pub fn is_machine_applicable(&self) -> bool {
        matches!(self, Applicability::MachineApplicable)
    }

    /// Prefix put in front of the suggestion message when rendered.
    pub fn help_prefix(&self) -> &'static str {
        match self {
            Applicability::MachineApplicable => "",
            Applicability::MaybeIncorrect => "consider ",
            Applicability::Educational => "see documentation on ",
        }
    }
}

/// Replace the text in `start..end` with `new_text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionEdit {
    pub file: String,
    pub start: usize,
    pub end: usize,
    pub new_text: String,
}

impl SuggestionEdit {
    pub fn from_span(span: &SourceSpan, new_text: impl Into<String>) -> Self {
        Self {
            file: span.file.clone(),
            start: span.start,
            end: span.end,
            new_text: new_text.into(),
        }
    }

    pub fn is_insertion(&self) -> bool {
        self.start == self.end && !self.new_text.is_empty()
    }

    pub fn replaced_len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Applies the edit to `source`, returning `None` if the range is out of bounds.
    pub fn apply(&self, source: &str) -> Option<String> {
        let before = source.get(..self.start)?;
        let after = source.get(self.end..)?;
        Some(format!("{}{}{}", before, self.new_text, after))
    }
}

/// A suggested fix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub message: String,
    pub applicability: Applicability,
    pub edits: Vec<SuggestionEdit>,
}

impl Suggestion {
    pub fn new(message: impl Into<String>, applicability: Applicability) -> Self {
        Self {
            message: message.into(),
            applicability,
            edits: Vec::new(),
        }
    }

    pub fn machine_applicable(message: impl Into<String>) -> Self {
        Self::new(message, Applicability::MachineApplicable)
    }

    pub fn maybe_incorrect(message: impl Into<String>) -> Self {
        Self::new(message, Applicability::MaybeIncorrect)
    }

    pub fn educational(message: impl Into<String>) -> Self {
        Self::new(message, Applicability::Educational)
    }

    /// Single-edit suggestion replacing `span`.
    pub fn replacement(
        message: impl Into<String>,
        span: &SourceSpan,
        new_text: impl Into<String>,
        applicability: Applicability,
    ) -> Self {
        Self {
            message: message.into(),
            applicability,
            edits: vec![SuggestionEdit::from_span(span, new_text)],
        }
    }

    pub fn with_edit(mut self, edit: SuggestionEdit) -> Self {
        self.edits.push(edit);
        self
    }

    pub fn can_auto_apply(&self) -> bool {
        self.applicability.is_machine_applicable() && !self.edits.is_empty()
    }

    /// Message with the applicability prefix.
    pub fn full_message(&self) -> String {
        format!("{}{}", self.applicability.help_prefix(), self.message)
    }
}
