//! Diagnostics collection for log ingestion and analysis.
//!
//! JIT logs are never assumed to be well-formed. Instead of aborting, the parsers and the
//! compile-chain walker repair what they can and report what they could not handle through a
//! caller-owned [`Diagnostics`] container. A fresh container is created (or [`Diagnostics::reset`]
//! is called) for every run, so counts never leak between independent analyses.
//!
//! # Key Components
//!
//! - [`Diagnostics`] - Thread-safe container for diagnostic entries
//! - [`Diagnostic`] - Individual diagnostic entry with severity and context
//! - [`DiagnosticSeverity`] - Severity level (Info, Warning, Error)
//! - [`DiagnosticCategory`] - Category of the diagnostic source
//!
//! # Usage Examples
//!
//! ```rust
//! use jitscope::diagnostics::{Diagnostics, DiagnosticCategory};
//!
//! let diagnostics = Diagnostics::new();
//! diagnostics.unhandled_tag("observe", Some(12));
//! diagnostics.warning(DiagnosticCategory::Resolution, "no member for method id 1062");
//!
//! assert_eq!(diagnostics.unhandled_tag_count(), 1);
//! assert!(diagnostics.has_warnings());
//! ```
//!
//! # Thread Safety
//!
//! All types in this module are [`Send`] and [`Sync`]. The [`Diagnostics`] container
//! uses `boxcar::Vec` internally, which provides lock-free concurrent append operations,
//! so compilation tasks walked in parallel can share one container.

use std::fmt;

use strum::{Display, EnumIter};

/// Severity level of a diagnostic entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum DiagnosticSeverity {
    /// Informational message, e.g. a structural repair that succeeded.
    #[strum(to_string = "INFO")]
    Info,

    /// Something could not be resolved or was skipped; the model is still usable but
    /// incomplete.
    #[strum(to_string = "WARN")]
    Warning,

    /// A hard failure of one sub-step (for example a malformed signature) that was contained.
    #[strum(to_string = "ERROR")]
    Error,
}

/// Category indicating the source or type of diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum DiagnosticCategory {
    /// A tag or line that was physically split by interleaved writer output and re-joined.
    Fragment,

    /// A tag kind the compile-chain walker does not know.
    UnhandledTag,

    /// A dictionary id or signature that matched no member.
    Resolution,

    /// A signature that could not be decomposed.
    Signature,

    /// Issues while parsing native disassembly.
    Assembly,

    /// Issues while parsing bytecode listings.
    Bytecode,

    /// General issues not fitting other categories.
    General,
}

/// A single diagnostic entry with context information.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Severity level of this diagnostic.
    pub severity: DiagnosticSeverity,

    /// Category indicating the source of this diagnostic.
    pub category: DiagnosticCategory,

    /// Human-readable description of the issue.
    pub message: String,

    /// Compile id of the task being processed, if any.
    pub compile_id: Option<u32>,

    /// Name of the tag involved, if any.
    pub tag: Option<String>,
}

impl Diagnostic {
    /// Creates a new diagnostic entry.
    ///
    /// # Arguments
    ///
    /// * `severity` - Severity level of the diagnostic
    /// * `category` - Category of the diagnostic source
    /// * `message` - Human-readable description
    pub fn new(
        severity: DiagnosticSeverity,
        category: DiagnosticCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            message: message.into(),
            compile_id: None,
            tag: None,
        }
    }

    /// Adds the compile id of the task the diagnostic belongs to.
    #[must_use]
    pub fn with_compile_id(mut self, compile_id: u32) -> Self {
        self.compile_id = Some(compile_id);
        self
    }

    /// Adds the name of the tag involved.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.category, self.message)?;

        if let Some(compile_id) = self.compile_id {
            write!(f, " (compile_id: {})", compile_id)?;
        }

        if let Some(tag) = &self.tag {
            write!(f, " (tag: <{}>)", tag)?;
        }

        Ok(())
    }
}

/// Thread-safe container for collecting diagnostic entries.
///
/// Uses `boxcar::Vec` internally for lock-free concurrent append operations.
#[derive(Debug)]
pub struct Diagnostics {
    entries: boxcar::Vec<Diagnostic>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagnostics {
    /// Creates a new empty diagnostics container.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: boxcar::Vec::new(),
        }
    }

    /// Adds an informational diagnostic.
    pub fn info(&self, category: DiagnosticCategory, message: impl Into<String>) {
        self.push(Diagnostic::new(DiagnosticSeverity::Info, category, message));
    }

    /// Adds a warning diagnostic.
    pub fn warning(&self, category: DiagnosticCategory, message: impl Into<String>) {
        self.push(Diagnostic::new(
            DiagnosticSeverity::Warning,
            category,
            message,
        ));
    }

    /// Adds an error diagnostic.
    pub fn error(&self, category: DiagnosticCategory, message: impl Into<String>) {
        self.push(Diagnostic::new(
            DiagnosticSeverity::Error,
            category,
            message,
        ));
    }

    /// Records a tag kind the walker does not handle.
    ///
    /// # Arguments
    ///
    /// * `tag` - Name of the unhandled tag
    /// * `compile_id` - Compile id of the task being walked, if known
    pub fn unhandled_tag(&self, tag: &str, compile_id: Option<u32>) {
        let mut diagnostic = Diagnostic::new(
            DiagnosticSeverity::Info,
            DiagnosticCategory::UnhandledTag,
            format!("unhandled tag <{}>", tag),
        )
        .with_tag(tag);
        if let Some(id) = compile_id {
            diagnostic = diagnostic.with_compile_id(id);
        }
        self.push(diagnostic);
    }

    /// Adds a diagnostic entry directly.
    pub fn push(&self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    /// Returns true if any diagnostics have been collected.
    pub fn has_any(&self) -> bool {
        self.entries.count() > 0
    }

    /// Returns true if any error-level diagnostics have been collected.
    pub fn has_errors(&self) -> bool {
        self.entries
            .iter()
            .any(|(_, d)| d.severity == DiagnosticSeverity::Error)
    }

    /// Returns true if any warning-level diagnostics have been collected.
    pub fn has_warnings(&self) -> bool {
        self.entries
            .iter()
            .any(|(_, d)| d.severity == DiagnosticSeverity::Warning)
    }

    /// Returns the total number of diagnostics.
    pub fn count(&self) -> usize {
        self.entries.count()
    }

    /// Returns the number of diagnostics in the given category.
    pub fn count_category(&self, category: DiagnosticCategory) -> usize {
        self.entries
            .iter()
            .filter(|(_, d)| d.category == category)
            .count()
    }

    /// Returns the number of unhandled tags seen by the walker.
    ///
    /// Well-formed fixtures are expected to keep this at zero.
    pub fn unhandled_tag_count(&self) -> usize {
        self.count_category(DiagnosticCategory::UnhandledTag)
    }

    /// Returns the number of unresolved references.
    pub fn unresolved_count(&self) -> usize {
        self.count_category(DiagnosticCategory::Resolution)
    }

    /// Returns an iterator over all diagnostics.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().map(|(_, d)| d)
    }

    /// Discards all collected entries.
    pub fn reset(&mut self) {
        self.entries = boxcar::Vec::new();
    }

    /// Returns a human-readable summary of all diagnostics, one per line.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        for diagnostic in self.iter() {
            out.push_str(&diagnostic.to_string());
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_by_category() {
        let diagnostics = Diagnostics::new();
        diagnostics.unhandled_tag("foo", None);
        diagnostics.unhandled_tag("bar", Some(7));
        diagnostics.warning(DiagnosticCategory::Resolution, "method 12 unresolved");
        diagnostics.info(DiagnosticCategory::Fragment, "rejoined split tag");

        assert_eq!(diagnostics.count(), 4);
        assert_eq!(diagnostics.unhandled_tag_count(), 2);
        assert_eq!(diagnostics.unresolved_count(), 1);
        assert!(diagnostics.has_warnings());
        assert!(!diagnostics.has_errors());
    }

    #[test]
    fn reset_clears_entries() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.error(DiagnosticCategory::Signature, "bad");
        assert!(diagnostics.has_errors());

        diagnostics.reset();
        assert!(!diagnostics.has_any());
        assert_eq!(diagnostics.count(), 0);
    }

    #[test]
    fn display_includes_context() {
        let diagnostic = Diagnostic::new(
            DiagnosticSeverity::Warning,
            DiagnosticCategory::Resolution,
            "no match",
        )
        .with_compile_id(42)
        .with_tag("call");

        assert_eq!(
            diagnostic.to_string(),
            "[WARN] Resolution: no match (compile_id: 42) (tag: <call>)"
        );
    }

    #[test]
    fn shared_across_threads() {
        let diagnostics = std::sync::Arc::new(Diagnostics::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let d = std::sync::Arc::clone(&diagnostics);
                std::thread::spawn(move || d.unhandled_tag("x", Some(i)))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(diagnostics.unhandled_tag_count(), 4);
    }
}
