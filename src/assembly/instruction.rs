use std::fmt;

use crate::assembly::AssemblyLabels;

/// One parsed native instruction.
///
/// Operand classification (address, constant, register) depends on the architecture and the
/// mnemonic and is therefore not stored here; ask the [`crate::assembly::AssemblyParser`]
/// that produced the instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyInstruction {
    /// Leading profiling annotation, e.g. `12.04%    1.33%`
    pub annotation: Option<String>,
    /// Instruction address
    pub address: u64,
    /// Prefixes such as `lock`, `rep` or `data32`, in order
    pub prefixes: Vec<String>,
    /// The mnemonic
    pub mnemonic: String,
    /// Operands in listing order
    pub operands: Vec<String>,
    /// Comment including its leading `;`; continuation lines are joined with `\n`
    pub comment: Option<String>,
}

/// A bytecode position referenced from an instruction comment, e.g.
/// `; - java.lang.String::hashCode@11 (line 1455)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BytecodeReference {
    /// `java.lang.String::hashCode`
    pub member: String,
    /// Bytecode offset
    pub bci: u32,
    /// Source line, if printed
    pub line: Option<u32>,
}

impl AssemblyInstruction {
    /// Creates an instruction without prefixes, annotation or comment.
    #[must_use]
    pub fn new(address: u64, mnemonic: impl Into<String>, operands: Vec<String>) -> Self {
        AssemblyInstruction {
            annotation: None,
            address,
            prefixes: Vec::new(),
            mnemonic: mnemonic.into(),
            operands,
            comment: None,
        }
    }

    /// Folds a continuation line into the comment.
    pub fn append_comment(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        match &mut self.comment {
            Some(comment) => {
                comment.push('\n');
                comment.push_str(line);
            }
            None => self.comment = Some(line.to_string()),
        }
    }

    /// Comment lines, in order.
    pub fn comment_lines(&self) -> impl Iterator<Item = &str> {
        self.comment.as_deref().unwrap_or("").lines()
    }

    /// Width of the annotation column, in characters.
    #[must_use]
    pub fn annotation_width(&self) -> usize {
        self.annotation
            .as_deref()
            .map(|a| a.chars().count())
            .unwrap_or(0)
    }

    /// Bytecode positions named in the comment (`- Class::member@bci (line N)`).
    #[must_use]
    pub fn bytecode_references(&self) -> Vec<BytecodeReference> {
        self.comment_lines()
            .filter_map(|line| parse_bytecode_reference(line))
            .collect()
    }

    /// Bytecode mnemonic named in a `;*invokevirtual`-style comment.
    #[must_use]
    pub fn bytecode_mnemonic(&self) -> Option<&str> {
        self.comment_lines().find_map(|line| {
            let rest = line.trim_start_matches(';').trim_start().strip_prefix('*')?;
            let end = rest
                .find(|c: char| c.is_whitespace() || c == '{')
                .unwrap_or(rest.len());
            Some(&rest[..end])
        })
    }

    /// Renders the instruction, substituting labels for in-method targets and padding the
    /// annotation column to `annotation_width`.
    #[must_use]
    pub fn format(&self, labels: &AssemblyLabels, annotation_width: usize) -> String {
        let mut out = String::new();

        if annotation_width > 0 {
            let annotation = self.annotation.as_deref().unwrap_or("");
            out.push_str(&format!("{:<width$}  ", annotation, width = annotation_width));
        }

        match labels.label(self.address) {
            Some(label) => out.push_str(&format!("{}: ", label)),
            None => out.push_str(&format!("0x{:016x}: ", self.address)),
        }

        for prefix in &self.prefixes {
            out.push_str(prefix);
            out.push(' ');
        }
        out.push_str(&self.mnemonic);

        if !self.operands.is_empty() {
            let operands: Vec<String> = self
                .operands
                .iter()
                .map(|op| match crate::tags::parse_hex(op) {
                    Some(address) if op.starts_with("0x") => labels
                        .label(address)
                        .map_or_else(|| op.clone(), str::to_string),
                    _ => op.clone(),
                })
                .collect();
            out.push(' ');
            out.push_str(&operands.join(","));
        }

        if let Some(comment) = &self.comment {
            out.push(' ');
            out.push_str(&comment.replace('\n', " "));
        }

        out
    }
}

impl fmt::Display for AssemblyInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(&AssemblyLabels::new(), self.annotation_width()))
    }
}

fn parse_bytecode_reference(line: &str) -> Option<BytecodeReference> {
    let rest = line.trim_start_matches(';').trim_start().strip_prefix("- ")?;
    let at = rest.rfind('@')?;
    let member = rest[..at].trim().to_string();
    let after = &rest[at + 1..];
    let bci_end = after
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(after.len());
    let bci = after[..bci_end].parse().ok()?;

    let line = after.find("(line ").and_then(|start| {
        let digits = &after[start + "(line ".len()..];
        let end = digits.find(')')?;
        digits[..end].trim().parse().ok()
    });

    Some(BytecodeReference { member, bci, line })
}
