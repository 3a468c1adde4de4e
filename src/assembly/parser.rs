//! Architecture-dispatching disassembly parser.
//!
//! All strategies share one line grammar:
//!
//! ```text
//! [annotation] 0x<address>: [prefix]* mnemonic [operand[,operand]*] [; comment]
//! ```
//!
//! Only operand classification differs between architectures, which is why
//! [`AssemblyParser`] is a closed enum over the per-architecture classifiers instead of a trait
//! object.

use tracing::trace;

use crate::assembly::{
    parse_decoding_line, AssemblyBlock, AssemblyInstruction, AssemblyLabels, AssemblyMethod,
    Architecture, ArmParser, BlockTitle, X86Parser,
};

/// Disassembly parser for one architecture.
///
/// # Examples
///
/// ```rust
/// use jitscope::assembly::{Architecture, AssemblyLabels, AssemblyParser};
///
/// let parser = AssemblyParser::for_architecture(Architecture::X86_64);
/// let mut labels = AssemblyLabels::new();
/// let instr = parser
///     .create_instruction(&mut labels, "  0x00007f1a2c011200: mov    0x8(%rsi),%r10d ;comment")
///     .unwrap();
///
/// assert_eq!(instr.mnemonic, "mov");
/// assert_eq!(instr.operands, vec!["0x8(%rsi)", "%r10d"]);
/// assert_eq!(instr.comment.as_deref(), Some(";comment"));
/// assert_eq!(parser.extract_register_name(&instr.operands[0]), Some("rsi"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyParser {
    /// x86 and x86-64, AT&T or Intel syntax
    X86(X86Parser),
    /// ARM32 and AArch64
    Arm(ArmParser),
}

impl AssemblyParser {
    /// Selects the strategy for `architecture`.
    #[must_use]
    pub fn for_architecture(architecture: Architecture) -> Self {
        if architecture.is_arm() {
            AssemblyParser::Arm(ArmParser::new(architecture))
        } else {
            AssemblyParser::X86(X86Parser::new(architecture))
        }
    }

    /// The architecture this parser handles.
    #[must_use]
    pub fn architecture(&self) -> Architecture {
        match self {
            AssemblyParser::X86(p) => p.architecture(),
            AssemblyParser::Arm(p) => p.architecture(),
        }
    }

    /// True if `operand` of `mnemonic` is a code address.
    #[must_use]
    pub fn is_address(&self, mnemonic: &str, operand: &str) -> bool {
        match self {
            AssemblyParser::X86(p) => p.is_address(mnemonic, operand),
            AssemblyParser::Arm(p) => p.is_address(mnemonic, operand),
        }
    }

    /// True if `operand` of `mnemonic` is an immediate.
    #[must_use]
    pub fn is_constant(&self, mnemonic: &str, operand: &str) -> bool {
        match self {
            AssemblyParser::X86(p) => p.is_constant(mnemonic, operand),
            AssemblyParser::Arm(p) => p.is_constant(mnemonic, operand),
        }
    }

    /// True if `operand` of `mnemonic` is a register.
    #[must_use]
    pub fn is_register(&self, mnemonic: &str, operand: &str) -> bool {
        match self {
            AssemblyParser::X86(p) => p.is_register(mnemonic, operand),
            AssemblyParser::Arm(p) => p.is_register(mnemonic, operand),
        }
    }

    /// Register named by `operand`, or the base register of a memory reference.
    #[must_use]
    pub fn extract_register_name<'a>(&self, operand: &'a str) -> Option<&'a str> {
        match self {
            AssemblyParser::X86(p) => p.extract_register_name(operand),
            AssemblyParser::Arm(p) => p.extract_register_name(operand),
        }
    }

    fn is_prefix(&self, token: &str) -> bool {
        match self {
            AssemblyParser::X86(_) => X86Parser::is_prefix(token),
            AssemblyParser::Arm(_) => false,
        }
    }

    fn comment_start(&self, text: &str) -> Option<usize> {
        match self {
            AssemblyParser::X86(_) => text.find([';', '#']),
            AssemblyParser::Arm(_) => text.find(';').or_else(|| text.find("//")),
        }
    }

    /// Parses one instruction line.
    ///
    /// Control-transfer targets are registered in `labels`. Returns `None` for lines that do
    /// not follow the instruction grammar.
    pub fn create_instruction(
        &self,
        labels: &mut AssemblyLabels,
        line: &str,
    ) -> Option<AssemblyInstruction> {
        let (annotation, address, rest) = split_address(line)?;

        let (code, comment) = match self.comment_start(rest) {
            Some(pos) => (&rest[..pos], Some(rest[pos..].trim().to_string())),
            None => (rest, None),
        };

        let mut prefixes = Vec::new();
        let mut remaining = code.trim();
        let mnemonic = loop {
            let end = remaining
                .find(char::is_whitespace)
                .unwrap_or(remaining.len());
            let token = &remaining[..end];
            remaining = remaining[end..].trim_start();

            if token.is_empty() {
                return None;
            }
            if self.is_prefix(token) && !remaining.is_empty() {
                prefixes.push(token.to_string());
                continue;
            }
            break token;
        };

        if !is_mnemonic(mnemonic) {
            return None;
        }

        let operands = split_operands(remaining);
        for operand in &operands {
            if self.is_address(mnemonic, operand) {
                if let Some(target) = crate::tags::parse_hex(operand.trim_start_matches('#')) {
                    labels.add_target(target);
                }
            }
        }

        Some(AssemblyInstruction {
            annotation,
            address,
            prefixes,
            mnemonic: mnemonic.to_string(),
            operands,
            comment,
        })
    }

    /// Parses the disassembly of one compiled method.
    #[must_use]
    pub fn parse_assembly(&self, text: &str) -> AssemblyMethod {
        self.parse_lines(text.lines())
    }

    /// Parses the disassembly of one compiled method, given as lines.
    pub fn parse_lines<'a, I>(&self, lines: I) -> AssemblyMethod
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut method = AssemblyMethod::new(self.architecture());
        let mut labels = AssemblyLabels::new();
        let mut header: Vec<&str> = Vec::new();
        let mut in_machcode = false;
        let mut seen_instruction = false;

        for raw in lines {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            if in_machcode {
                in_machcode = line != "[/MachCode]";
                continue;
            }
            if line == "[MachCode]" {
                in_machcode = true;
                continue;
            }

            if let Some(title) = BlockTitle::from_marker(line) {
                method.blocks.push(AssemblyBlock::new(title));
                continue;
            }
            if let Some(address) = parse_decoding_line(line) {
                method.nmethod_address = Some(address);
                continue;
            }
            if !seen_instruction && (line.starts_with('#') || line.starts_with("[Constants]")) {
                header.push(line);
                continue;
            }
            if is_listing_noise(line) {
                continue;
            }

            match self.create_instruction(&mut labels, raw) {
                Some(instruction) => {
                    seen_instruction = true;
                    method.max_annotation_width = method
                        .max_annotation_width
                        .max(instruction.annotation_width());
                    method.current_block_mut().instructions.push(instruction);
                }
                None => match method.last_instruction_mut() {
                    Some(previous) => {
                        trace!(line, "folding line into previous instruction comment");
                        previous.append_comment(line);
                    }
                    None => trace!(line, "skipping line before first instruction"),
                },
            }
        }

        if let (Some(start), Some(end)) = (method.start_address(), method.end_address()) {
            labels.build(start, end);
        }

        method.entry_address = method.start_address();
        method.header = header.join("\n");
        method.labels = labels;
        method
    }
}

/// Splits `[annotation] 0x<address>:` off an instruction line.
pub(crate) fn split_address(line: &str) -> Option<(Option<String>, u64, &str)> {
    let start = line.find("0x")?;
    let lead = &line[..start];
    if !lead.chars().all(is_annotation_char) {
        return None;
    }

    let digits_start = start + 2;
    let digits_len = line[digits_start..]
        .find(|c: char| !c.is_ascii_hexdigit())
        .unwrap_or(line.len() - digits_start);
    if digits_len == 0 {
        return None;
    }

    let digits_end = digits_start + digits_len;
    let rest = line[digits_end..].strip_prefix(':')?;
    let address = u64::from_str_radix(&line[digits_start..digits_end], 16).ok()?;

    let annotation = lead.trim();
    let annotation = (!annotation.is_empty()).then(|| annotation.to_string());

    Some((annotation, address, rest))
}

fn is_annotation_char(c: char) -> bool {
    c.is_ascii_digit() || c.is_whitespace() || matches!(c, '.' | '%' | '|') || !c.is_ascii()
}

fn is_mnemonic(token: &str) -> bool {
    token.starts_with(|c: char| c.is_ascii_alphabetic())
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_')
}

/// Splits an operand list at commas outside `()`, `[]` and `{}`.
pub(crate) fn split_operands(text: &str) -> Vec<String> {
    let mut operands = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();

    for c in text.chars() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                let operand = current.trim();
                if !operand.is_empty() {
                    operands.push(operand.to_string());
                }
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(c);
    }

    let operand = current.trim();
    if !operand.is_empty() {
        operands.push(operand.to_string());
    }
    operands
}

fn is_listing_noise(line: &str) -> bool {
    line == "Code:"
        || line.starts_with("[Disassembl")
        || line.starts_with("[/Disassembl")
        || line.starts_with("[Constant Pool")
        || line.starts_with("Compiled method")
        || line.starts_with("----")
        || line.starts_with("====")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::assembly::{FIVE_BLOCK_METHOD, HASHCODE_METHOD};

    fn x86() -> AssemblyParser {
        AssemblyParser::for_architecture(Architecture::X86_64)
    }

    #[test]
    fn att_instruction() {
        let mut labels = AssemblyLabels::new();
        let instr = x86()
            .create_instruction(&mut labels, "0x00007f0a1c000120: mov 0x8(%rsi),%r10d ;comment")
            .unwrap();

        assert_eq!(instr.address, 0x7f0a1c000120);
        assert_eq!(instr.mnemonic, "mov");
        assert_eq!(instr.operands, vec!["0x8(%rsi)", "%r10d"]);
        assert_eq!(instr.comment.as_deref(), Some(";comment"));
        assert!(instr.prefixes.is_empty());
        assert!(instr.annotation.is_none());
    }

    #[test]
    fn repeated_prefixes() {
        let mut labels = AssemblyLabels::new();
        let instr = x86()
            .create_instruction(
                &mut labels,
                "  0x00007f0a1c00013c: data32 data32 nopw 0x0(%rax,%rax,1)",
            )
            .unwrap();

        assert_eq!(instr.prefixes, vec!["data32", "data32"]);
        assert_eq!(instr.mnemonic, "nopw");
        assert_eq!(instr.operands, vec!["0x0(%rax,%rax,1)"]);
    }

    #[test]
    fn intel_instruction() {
        let mut labels = AssemblyLabels::new();
        let parser = x86();
        let instr = parser
            .create_instruction(
                &mut labels,
                "0x00007f0a1c000120: lock cmpxchg QWORD PTR [rsi+0x10],rdi",
            )
            .unwrap();

        assert_eq!(instr.prefixes, vec!["lock"]);
        assert_eq!(instr.mnemonic, "cmpxchg");
        assert_eq!(instr.operands, vec!["QWORD PTR [rsi+0x10]", "rdi"]);
        assert_eq!(parser.extract_register_name(&instr.operands[0]), Some("rsi"));
        assert!(parser.is_register(&instr.mnemonic, &instr.operands[1]));
    }

    #[test]
    fn annotated_instruction() {
        let mut labels = AssemblyLabels::new();
        let instr = x86()
            .create_instruction(
                &mut labels,
                "  12.04%    1.33%  0x00007f0a1c000150: test   %eax,0x16d5beb0(%rip)",
            )
            .unwrap();

        assert_eq!(instr.annotation.as_deref(), Some("12.04%    1.33%"));
        assert_eq!(instr.mnemonic, "test");
        assert_eq!(instr.operands, vec!["%eax", "0x16d5beb0(%rip)"]);
    }

    #[test]
    fn arm_instruction() {
        let mut labels = AssemblyLabels::new();
        let parser = AssemblyParser::for_architecture(Architecture::Arm64);
        let instr = parser
            .create_instruction(
                &mut labels,
                "0x0000ffff8c011204: stp x29, x30, [sp, #-16]!   ;*synchronization entry",
            )
            .unwrap();

        assert_eq!(instr.mnemonic, "stp");
        assert_eq!(instr.operands, vec!["x29", "x30", "[sp, #-16]!"]);
        assert_eq!(instr.comment.as_deref(), Some(";*synchronization entry"));
        assert_eq!(parser.extract_register_name(&instr.operands[2]), Some("sp"));

        let branch = parser
            .create_instruction(&mut labels, "0x0000ffff8c011208: b.ne 0x0000ffff8c011240")
            .unwrap();
        assert!(parser.is_address(&branch.mnemonic, &branch.operands[0]));
        assert!(labels.is_target(0x0000ffff8c011240));
    }

    #[test]
    fn rejects_non_instructions() {
        let mut labels = AssemblyLabels::new();
        let parser = x86();
        assert!(parser.create_instruction(&mut labels, "; - java.lang.String::hashCode@0").is_none());
        assert!(parser.create_instruction(&mut labels, "0x00007f0a1c000120:").is_none());
        assert!(parser
            .create_instruction(&mut labels, "0x00007f0a1c000120: 0x00000000 0x3ff00000")
            .is_none());
        assert!(parser.create_instruction(&mut labels, "[Entry Point]").is_none());
    }

    #[test]
    fn five_blocks_in_order() {
        let method = x86().parse_assembly(FIVE_BLOCK_METHOD);

        let titles: Vec<BlockTitle> = method.blocks.iter().map(|b| b.title).collect();
        assert_eq!(
            titles,
            vec![
                BlockTitle::EntryPoint,
                BlockTitle::VerifiedEntryPoint,
                BlockTitle::ExceptionHandler,
                BlockTitle::StubCode,
                BlockTitle::DeoptHandlerCode,
            ]
        );
        assert!(method.blocks[2].is_empty());
        assert!(!method.blocks[1].is_empty());
    }

    #[test]
    fn header_comments_and_labels() {
        let method = x86().parse_assembly(HASHCODE_METHOD);

        assert_eq!(method.nmethod_address, Some(0x7f0a1c000010));
        assert_eq!(method.entry_address, Some(0x7f0a1c000100));
        assert!(method.header.contains("'hashCode' '()I' in 'java/lang/String'"));
        assert_eq!(method.blocks[0].title, BlockTitle::EntryPoint);

        let sub = method.instruction_at(0x7f0a1c000124).unwrap();
        assert_eq!(sub.mnemonic, "mov");
        assert_eq!(sub.comment_lines().count(), 2);
        assert_eq!(sub.bytecode_references()[0].bci, 1);

        assert_eq!(method.labels.label(0x7f0a1c000140), Some("L0000"));
        assert!(method.labels.label(0x7f0a1c0ff000).is_none());
    }

    #[test]
    fn default_block_created_lazily() {
        let method = x86().parse_assembly(
            "  0x0000000000001000: push %rbp\n  0x0000000000001001: mov %rsp,%rbp\n[Stub Code]\n",
        );
        assert_eq!(method.blocks.len(), 2);
        assert_eq!(method.blocks[0].title, BlockTitle::Default);
        assert_eq!(method.blocks[0].instructions.len(), 2);
        assert!(method.blocks[1].is_empty());
    }

    #[test]
    fn parsing_is_idempotent() {
        let parser = x86();
        assert_eq!(
            parser.parse_assembly(HASHCODE_METHOD),
            parser.parse_assembly(HASHCODE_METHOD)
        );

        let line = "0x00007f0a1c000120: mov 0x8(%rsi),%r10d ;comment";
        let mut a = AssemblyLabels::new();
        let mut b = AssemblyLabels::new();
        assert_eq!(
            parser.create_instruction(&mut a, line),
            parser.create_instruction(&mut b, line)
        );
    }

    #[test]
    fn operand_splitting() {
        assert_eq!(
            split_operands("0x10(%rax,%rbx,4), %ecx"),
            vec!["0x10(%rax,%rbx,4)", "%ecx"]
        );
        assert_eq!(split_operands("{k1}, zmm0"), vec!["{k1}", "zmm0"]);
        assert!(split_operands("   ").is_empty());
    }
}
