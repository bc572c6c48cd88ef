//! Terminal rendering of diagnostics.
//!
//! Output follows the familiar compiler layout:
//!
//! ```text
//! error[E2001]: arguments number mismatch in call to `sum`
//!  --> main.go:3:1
//!   |
//! 3 | sum(a, b, c)
//!   | ^^^^^^^^^^^^ expected 2 arguments, found 3
//!   = note: `sum` has type func(int, float32) int
//! ```

use crate::span::{Label, LabelStyle, LineColumn, ResolvedSpan, SourceSpan};
use crate::suggestion::Suggestion;
use crate::{Diagnostic, DiagnosticError, DiagnosticResult, DiagnosticSeverity};
use std::collections::HashMap;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use unicode_width::UnicodeWidthStr;

/// Palette used for severities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    #[default]
    Standard,
    /// Colorblind-safe palette.
    Cvd,
    /// Standard colors, everything bold.
    HighContrast,
}

#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub use_color: bool,
    pub color_mode: ColorMode,
    /// Source lines wider than this (in columns) are truncated with `...`.
    pub max_width: usize,
    pub show_docs_links: bool,
    pub docs_base_url: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            use_color: true,
            color_mode: ColorMode::Standard,
            max_width: 120,
            show_docs_links: false,
            docs_base_url: "https://gocheck.dev/errors".to_string(),
        }
    }
}

impl RenderConfig {
    /// No colors, no links: stable output for logs and snapshots.
    pub fn plain() -> Self {
        Self {
            use_color: false,
            ..Self::default()
        }
    }

    pub fn with_color_mode(mut self, mode: ColorMode) -> Self {
        self.color_mode = mode;
        self
    }

    pub fn with_docs_links(mut self, base_url: impl Into<String>) -> Self {
        self.show_docs_links = true;
        self.docs_base_url = base_url.into();
        self
    }
}

/// Source texts by file name.
#[derive(Debug, Default)]
pub struct SourceCache {
    files: HashMap<String, String>,
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_source(&mut self, path: impl Into<String>, source: impl Into<String>) {
        self.files.insert(path.into(), source.into());
    }

    pub fn get_source(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    /// Line/column information for `span`, if its file is cached.
    pub fn resolve_span(&self, span: &SourceSpan) -> Option<ResolvedSpan> {
        let source = self.get_source(&span.file)?;

        let start = offset_to_line_col(source, span.start);
        let end = offset_to_line_col(source, span.end.max(span.start));
        let line_start = line_start_offset(source, span.start);

        let source_lines = source
            .lines()
            .skip(start.line - 1)
            .take(end.line - start.line + 1)
            .map(String::from)
            .collect();

        Some(ResolvedSpan {
            span: span.clone(),
            start,
            end,
            line_start,
            source_lines,
        })
    }
}

/// Converts a byte offset to a 1-based line and display column. Wide
/// characters count for two columns, as they do under the caret line.
pub fn offset_to_line_col(source: &str, offset: usize) -> LineColumn {
    let mut offset = offset.min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    let head = &source[..offset];
    let line = head.matches('\n').count() + 1;
    let line_start = head.rfind('\n').map(|newline| newline + 1).unwrap_or(0);

    LineColumn::new(line, head[line_start..].width() + 1)
}

fn line_start_offset(source: &str, offset: usize) -> usize {
    let offset = offset.min(source.len());
    source
        .get(..offset)
        .and_then(|head| head.rfind('\n'))
        .map(|newline| newline + 1)
        .unwrap_or(0)
}

/// Writes diagnostics to any color-capable writer.
pub struct TerminalRenderer<W: WriteColor> {
    config: RenderConfig,
    out: W,
}

impl TerminalRenderer<StandardStream> {
    /// Renderer writing to stderr, colored when the terminal supports it.
    pub fn stderr(config: RenderConfig) -> Self {
        let choice = if config.use_color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self::new(StandardStream::stderr(choice), config)
    }
}

impl<W: WriteColor> TerminalRenderer<W> {
    pub fn new(out: W, config: RenderConfig) -> Self {
        Self { config, out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Renders each diagnostic followed by a one-line summary.
    pub fn render_all(&mut self, diagnostics: &[Diagnostic], sources: &SourceCache) -> DiagnosticResult<()> {
        for diagnostic in diagnostics {
            self.render(diagnostic, sources)?;
        }
        self.render_summary(diagnostics)
    }

    /// Fails with [`SourceNotFound`](crate::DiagnosticError::SourceNotFound),
    /// before writing anything, when the primary span's file is not cached.
    /// Secondary labels in unknown files are skipped.
    pub fn render(&mut self, diagnostic: &Diagnostic, sources: &SourceCache) -> DiagnosticResult<()> {
        if let Some(primary) = diagnostic.spans.primary_span() {
            if sources.get_source(&primary.file).is_none() {
                return Err(DiagnosticError::SourceNotFound(primary.file.clone()));
            }
        }
        self.write_header(diagnostic)?;

        let resolved: Vec<(&Label, ResolvedSpan)> = diagnostic
            .spans
            .labels()
            .iter()
            .filter_map(|label| sources.resolve_span(&label.span).map(|r| (label, r)))
            .collect();

        let gutter = resolved
            .iter()
            .map(|(_, r)| r.start.line.to_string().len())
            .max()
            .unwrap_or(0);

        let anchor = diagnostic
            .spans
            .primary_span()
            .and_then(|span| sources.resolve_span(span));
        if let Some(anchor) = &anchor {
            writeln!(
                self.out,
                "{:>width$}--> {}:{}:{}",
                "",
                anchor.span.file,
                anchor.start.line,
                anchor.start.column,
                width = gutter
            )?;
        }

        if !resolved.is_empty() {
            self.write_gutter(gutter)?;
            writeln!(self.out)?;

            let mut ordered: Vec<&(&Label, ResolvedSpan)> = resolved.iter().collect();
            ordered.sort_by_key(|(label, r)| (r.start.line, label.style != LabelStyle::Primary, r.span.start));

            let mut last_line = None;
            for (label, r) in ordered {
                if last_line != Some(r.start.line) {
                    self.write_source_line(r, gutter)?;
                    last_line = Some(r.start.line);
                }
                self.write_underline(label, r, diagnostic.severity, gutter)?;
            }
        }

        for child in &diagnostic.children {
            self.write_attachment(child.severity, &child.message, gutter)?;
        }
        for suggestion in &diagnostic.suggestions {
            self.write_suggestion(suggestion, gutter)?;
        }
        if self.config.show_docs_links {
            if let Some(url) = diagnostic.docs_url(&self.config.docs_base_url) {
                self.write_attachment(DiagnosticSeverity::Note, &format!("docs: {}", url), gutter)?;
            }
        }

        writeln!(self.out)?;
        Ok(())
    }

    /// `error: found N errors`; nothing when there are no errors or warnings.
    pub fn render_summary(&mut self, diagnostics: &[Diagnostic]) -> DiagnosticResult<()> {
        let errors = diagnostics
            .iter()
            .filter(|d| d.severity == DiagnosticSeverity::Error)
            .count();
        let warnings = diagnostics
            .iter()
            .filter(|d| d.severity == DiagnosticSeverity::Warning)
            .count();

        if errors > 0 {
            self.write_colored("error", self.severity_color(DiagnosticSeverity::Error), true)?;
            writeln!(self.out, ": found {}", plural(errors, "error"))?;
        } else if warnings > 0 {
            self.write_colored("warning", self.severity_color(DiagnosticSeverity::Warning), true)?;
            writeln!(self.out, ": found {}", plural(warnings, "warning"))?;
        }
        Ok(())
    }

    fn severity_color(&self, severity: DiagnosticSeverity) -> Color {
        match (severity, self.config.color_mode) {
            (DiagnosticSeverity::Error, ColorMode::Cvd) => Color::Rgb(213, 94, 0),
            (DiagnosticSeverity::Warning, ColorMode::Cvd) => Color::Rgb(240, 228, 66),
            (DiagnosticSeverity::Note | DiagnosticSeverity::Help, ColorMode::Cvd) => Color::Rgb(0, 114, 178),
            (DiagnosticSeverity::Error, _) => Color::Red,
            (DiagnosticSeverity::Warning, _) => Color::Yellow,
            (DiagnosticSeverity::Note, _) => Color::Cyan,
            (DiagnosticSeverity::Help, _) => Color::Green,
        }
    }

    fn underline_char(style: LabelStyle, severity: DiagnosticSeverity) -> char {
        match (style, severity) {
            (LabelStyle::Primary, DiagnosticSeverity::Error) => '^',
            (LabelStyle::Primary, DiagnosticSeverity::Warning) => '~',
            (LabelStyle::Primary, _) => '+',
            (LabelStyle::Secondary, _) => '-',
        }
    }

    fn write_colored(&mut self, text: &str, color: Color, bold: bool) -> DiagnosticResult<()> {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(color));
        spec.set_bold(bold || self.config.color_mode == ColorMode::HighContrast);
        self.out.set_color(&spec)?;
        write!(self.out, "{}", text)?;
        self.out.reset()?;
        Ok(())
    }

    fn write_header(&mut self, diagnostic: &Diagnostic) -> DiagnosticResult<()> {
        let color = self.severity_color(diagnostic.severity);
        let head = match &diagnostic.code {
            Some(code) => format!("{}[{}]", diagnostic.severity.prefix(), code),
            None => diagnostic.severity.prefix().to_string(),
        };
        self.write_colored(&head, color, true)?;
        write!(self.out, ": ")?;
        self.write_colored(&diagnostic.message, Color::White, true)?;
        writeln!(self.out)?;
        Ok(())
    }

    fn write_gutter(&mut self, gutter: usize) -> DiagnosticResult<()> {
        self.write_colored(&format!("{:>width$} |", "", width = gutter), Color::Blue, true)
    }

    fn write_source_line(&mut self, resolved: &ResolvedSpan, gutter: usize) -> DiagnosticResult<()> {
        let number = format!("{:>width$} |", resolved.start.line, width = gutter);
        self.write_colored(&number, Color::Blue, true)?;

        let line = resolved.source_lines.first().map(String::as_str).unwrap_or("");
        let budget = self.config.max_width.saturating_sub(gutter + 3);
        if line.width() > budget {
            let mut shown = String::new();
            for ch in line.chars() {
                if shown.width() + 3 >= budget {
                    break;
                }
                shown.push(ch);
            }
            writeln!(self.out, " {}...", shown)?;
        } else {
            writeln!(self.out, " {}", line)?;
        }
        Ok(())
    }

    fn write_underline(
        &mut self,
        label: &Label,
        resolved: &ResolvedSpan,
        severity: DiagnosticSeverity,
        gutter: usize,
    ) -> DiagnosticResult<()> {
        let color = match label.style {
            LabelStyle::Primary => self.severity_color(severity),
            LabelStyle::Secondary => Color::Blue,
        };

        self.write_gutter(gutter)?;
        write!(self.out, " {:>width$}", "", width = resolved.prefix().width())?;

        let marks = resolved.highlighted().width().max(1);
        let underline: String = std::iter::repeat(Self::underline_char(label.style, severity))
            .take(marks)
            .collect();
        self.write_colored(&underline, color, true)?;

        if !label.message.is_empty() {
            write!(self.out, " ")?;
            self.write_colored(&label.message, color, true)?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn write_attachment(&mut self, severity: DiagnosticSeverity, message: &str, gutter: usize) -> DiagnosticResult<()> {
        write!(self.out, "{:>width$} = ", "", width = gutter)?;
        self.write_colored(severity.prefix(), self.severity_color(severity), true)?;
        writeln!(self.out, ": {}", message)?;
        Ok(())
    }

    fn write_suggestion(&mut self, suggestion: &Suggestion, gutter: usize) -> DiagnosticResult<()> {
        let mut message = suggestion.full_message();
        if let [edit] = suggestion.edits.as_slice() {
            if !edit.new_text.is_empty() {
                message = format!("{}: `{}`", message, edit.new_text);
            }
        }
        self.write_attachment(DiagnosticSeverity::Help, &message, gutter)
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {}", noun)
    } else {
        format!("{} {}s", count, noun)
    }
}
