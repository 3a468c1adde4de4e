//! Configuration for log ingestion.
//!
//! This module provides [`ParseConfig`], the single configuration object shared by the tag
//! processor, the assembly parsers, the bytecode loader and the compile-chain walker.

use crate::assembly::Architecture;

/// Container tags whose open and close markers are not pushed onto the tag stack, so that
/// their children are emitted as top-level tags.
pub const DEFAULT_TRANSPARENT_TAGS: &[&str] = &["hotspot_log", "compilation_log", "tty"];

/// Configuration for parsing and analysis.
///
/// # Examples
///
/// ```rust
/// use jitscope::{config::ParseConfig, assembly::Architecture};
///
/// let config = ParseConfig::default()
///     .with_fallback_architecture(Architecture::Arm64)
///     .with_assignable_matching(false);
/// assert_eq!(config.fallback_architecture, Architecture::Arm64);
/// ```
#[derive(Debug, Clone)]
pub struct ParseConfig {
    /// Architecture used when the log carries no disassembly banner (default: X86_64).
    pub fallback_architecture: Architecture,

    /// Allow parameter matching by assignability when no exact match exists (default: true).
    pub allow_assignable_matching: bool,

    /// Splice `late_inline` decisions back into the call tree (default: true).
    pub splice_late_inlines: bool,

    /// Container tags treated as transparent by the tag processor.
    pub transparent_tags: Vec<String>,

    /// Keep the constant pool of verbose bytecode listings (default: false).
    pub keep_constant_pool: bool,

    /// Return unclosed top-level tags from [`crate::tags::TagProcessor::finish`] (default: true).
    pub keep_incomplete_tags: bool,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            fallback_architecture: Architecture::X86_64,
            allow_assignable_matching: true,
            splice_late_inlines: true,
            transparent_tags: DEFAULT_TRANSPARENT_TAGS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            keep_constant_pool: false,
            keep_incomplete_tags: true,
        }
    }
}

impl ParseConfig {
    /// Creates a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a strict configuration.
    ///
    /// Signatures must match exactly, and incomplete tags are dropped at the end of input.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            allow_assignable_matching: false,
            keep_incomplete_tags: false,
            ..Self::default()
        }
    }

    /// Creates a lenient configuration that keeps everything it can.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            keep_constant_pool: true,
            ..Self::default()
        }
    }

    /// Sets the fallback architecture.
    #[must_use]
    pub fn with_fallback_architecture(mut self, arch: Architecture) -> Self {
        self.fallback_architecture = arch;
        self
    }

    /// Enables or disables assignability-based parameter matching.
    #[must_use]
    pub fn with_assignable_matching(mut self, enabled: bool) -> Self {
        self.allow_assignable_matching = enabled;
        self
    }

    /// Enables or disables late-inline splicing.
    #[must_use]
    pub fn with_late_inline_splicing(mut self, enabled: bool) -> Self {
        self.splice_late_inlines = enabled;
        self
    }

    /// Enables or disables retention of constant pools.
    #[must_use]
    pub fn with_constant_pool(mut self, enabled: bool) -> Self {
        self.keep_constant_pool = enabled;
        self
    }

    /// Adds a transparent container tag name.
    #[must_use]
    pub fn with_transparent_tag(mut self, name: impl Into<String>) -> Self {
        self.transparent_tags.push(name.into());
        self
    }

    /// Returns true if `name` is a transparent container tag.
    #[must_use]
    pub fn is_transparent(&self, name: &str) -> bool {
        self.transparent_tags.iter().any(|t| t == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ParseConfig::default();
        assert_eq!(config.fallback_architecture, Architecture::X86_64);
        assert!(config.allow_assignable_matching);
        assert!(config.is_transparent("hotspot_log"));
        assert!(!config.is_transparent("task"));
    }

    #[test]
    fn presets() {
        assert!(!ParseConfig::strict().allow_assignable_matching);
        assert!(!ParseConfig::strict().keep_incomplete_tags);
        assert!(ParseConfig::lenient().keep_constant_pool);
    }

    #[test]
    fn builder() {
        let config = ParseConfig::new()
            .with_transparent_tag("fragment")
            .with_late_inline_splicing(false)
            .with_constant_pool(true);
        assert!(config.is_transparent("fragment"));
        assert!(!config.splice_late_inlines);
        assert!(config.keep_constant_pool);
    }
}
