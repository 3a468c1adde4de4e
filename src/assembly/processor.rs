use tracing::debug;

use crate::{
    assembly::{parser::split_address, Architecture, AssemblyMethod, AssemblyParser, BlockTitle},
    config::ParseConfig,
};

/// Splits a log's disassembly lines into methods and parses each one.
///
/// A method starts at `Decoding compiled method 0x…:`, at a `Compiled method (…)` banner, or at
/// a block marker or instruction line seen outside any method. It ends at the next method start, at
/// `[/Disassembling]`/`[/Disassembly]`, at a separator line following its instructions, or at
/// [`AssemblyProcessor::finish`]. The most recent `[Disassembling for mach='…']` banner selects
/// the parser; before any banner the configured fallback architecture applies.
#[derive(Debug)]
pub struct AssemblyProcessor {
    fallback: Architecture,
    architecture: Option<Architecture>,
    pending: Option<PendingMethod>,
    completed: Vec<AssemblyMethod>,
}

#[derive(Debug, Default)]
struct PendingMethod {
    lines: Vec<String>,
    nmethod_address: Option<u64>,
    has_instructions: bool,
}

impl Default for AssemblyProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl AssemblyProcessor {
    /// Creates a processor using the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&ParseConfig::default())
    }

    /// Creates a processor using `config`.
    #[must_use]
    pub fn with_config(config: &ParseConfig) -> Self {
        AssemblyProcessor {
            fallback: config.fallback_architecture,
            architecture: None,
            pending: None,
            completed: Vec::new(),
        }
    }

    /// Architecture announced by the most recent banner, if any.
    #[must_use]
    pub fn architecture(&self) -> Option<Architecture> {
        self.architecture
    }

    /// Methods completed so far.
    #[must_use]
    pub fn completed(&self) -> &[AssemblyMethod] {
        &self.completed
    }

    /// Consumes one disassembly line.
    pub fn process_line(&mut self, line: &str) {
        let trimmed = line.trim();

        if let Some(architecture) = Architecture::from_banner(trimmed) {
            self.architecture = Some(architecture);
            return;
        }

        if let Some(address) = parse_decoding_line(trimmed) {
            self.complete();
            self.pending = Some(PendingMethod {
                nmethod_address: Some(address),
                ..PendingMethod::default()
            });
            return;
        }

        if trimmed.starts_with("Compiled method (") {
            self.complete();
            self.pending = Some(PendingMethod::default());
            return;
        }

        if trimmed.starts_with("[/Disassembl") {
            self.complete();
            return;
        }

        if is_separator(trimmed) {
            if self.pending.as_ref().is_some_and(|p| p.has_instructions) {
                self.complete();
            }
            return;
        }

        if self.pending.is_none()
            && (BlockTitle::from_marker(trimmed).is_some() || split_address(line).is_some())
        {
            self.pending = Some(PendingMethod::default());
        }

        if let Some(pending) = &mut self.pending {
            pending.has_instructions |= split_address(line).is_some();
            pending.lines.push(line.to_string());
        }
    }

    /// Completes the current method and returns every method parsed.
    pub fn finish(mut self) -> Vec<AssemblyMethod> {
        self.complete();
        self.completed
    }

    fn complete(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };

        let architecture = self.architecture.unwrap_or(self.fallback);
        let parser = AssemblyParser::for_architecture(architecture);
        let mut method = parser.parse_lines(pending.lines.iter().map(String::as_str));
        if method.nmethod_address.is_none() {
            method.nmethod_address = pending.nmethod_address;
        }

        debug!(
            architecture = %architecture,
            instructions = method.instruction_count(),
            "completed assembly method"
        );
        self.completed.push(method);
    }
}

/// Address of a `Decoding compiled method 0x…:` line.
pub(crate) fn parse_decoding_line(line: &str) -> Option<u64> {
    let rest = line.trim().strip_prefix("Decoding compiled method ")?;
    let address = rest.trim_end().trim_end_matches(':');
    crate::tags::parse_hex(address)
}

fn is_separator(line: &str) -> bool {
    line.len() >= 8 && (line.chars().all(|c| c == '-') || line.chars().all(|c| c == '='))
}
