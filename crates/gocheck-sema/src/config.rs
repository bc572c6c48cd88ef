//! Analyzer configuration.

/// Knobs for a single analysis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// Longest alias chain (or named-type chain) followed before giving up.
    pub max_alias_depth: usize,
    /// Let untyped floating-point constants stand in for integer types,
    /// e.g. `zoro(4.0, ...)` where the first parameter is `int`.
    pub numeric_literal_widening: bool,
    /// Attach "a similar name exists" candidates to unknown names.
    pub suggest_similar_names: bool,
    pub max_suggestions: usize,
    /// Keep a [`SymbolTableReport`](crate::symtab::SymbolTableReport) of every frame.
    pub record_symbols: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_alias_depth: 64,
            numeric_literal_widening: false,
            suggest_similar_names: true,
            max_suggestions: 3,
            record_symbols: false,
        }
    }
}

impl AnalyzerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_alias_depth(mut self, depth: usize) -> Self {
        self.max_alias_depth = depth;
        self
    }

    pub fn with_numeric_literal_widening(mut self, enabled: bool) -> Self {
        self.numeric_literal_widening = enabled;
        self
    }

    pub fn with_similar_name_suggestions(mut self, enabled: bool) -> Self {
        self.suggest_similar_names = enabled;
        self
    }

    pub fn with_max_suggestions(mut self, limit: usize) -> Self {
        self.max_suggestions = limit;
        self
    }

    pub fn with_symbol_report(mut self, enabled: bool) -> Self {
        self.record_symbols = enabled;
        self
    }
}
