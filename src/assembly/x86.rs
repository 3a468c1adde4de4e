//! x86 operand classification for AT&T and Intel listings.

use crate::assembly::{Architecture, Syntax};

/// Instruction prefixes printed before the mnemonic.
const PREFIXES: &[&str] = &[
    "lock", "rep", "repe", "repz", "repne", "repnz", "data16", "data32", "addr16", "addr32",
    "cs", "ds", "es", "fs", "gs", "ss", "notrack", "bnd", "xacquire", "xrelease",
];

const REGISTERS_32: &[&str] = &[
    "eax", "ebx", "ecx", "edx", "esi", "edi", "esp", "ebp", "ax", "bx", "cx", "dx", "si", "di",
    "sp", "bp", "al", "ah", "bl", "bh", "cl", "ch", "dl", "dh", "eip", "ip", "cs", "ds", "es",
    "fs", "gs", "ss",
];

const REGISTERS_64: &[&str] = &[
    "rax", "rbx", "rcx", "rdx", "rsi", "rdi", "rsp", "rbp", "rip", "sil", "dil", "spl", "bpl",
];

/// Operand classifier for 32- and 64-bit x86.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct X86Parser {
    architecture: Architecture,
}

impl X86Parser {
    /// Creates a classifier for `architecture`, which must be one of the x86 variants.
    #[must_use]
    pub fn new(architecture: Architecture) -> Self {
        X86Parser { architecture }
    }

    /// The architecture this parser was created for.
    #[must_use]
    pub fn architecture(&self) -> Architecture {
        self.architecture
    }

    /// True if `token` is an instruction prefix.
    #[must_use]
    pub fn is_prefix(token: &str) -> bool {
        PREFIXES.contains(&token) || token == "rex" || token.starts_with("rex.")
    }

    /// Syntax of a single operand, judged by its shape.
    #[must_use]
    pub fn syntax_of(operand: &str) -> Syntax {
        if operand.contains('%') || operand.starts_with('$') {
            Syntax::Att
        } else if operand.contains("PTR") || operand.contains('[') {
            Syntax::Intel
        } else if is_register_name(operand) {
            Syntax::Intel
        } else {
            Syntax::Att
        }
    }

    /// True if `mnemonic` transfers control.
    #[must_use]
    pub fn is_jump(mnemonic: &str) -> bool {
        mnemonic.starts_with('j')
            || mnemonic.starts_with("call")
            || mnemonic.starts_with("loop")
            || mnemonic == "xbegin"
    }

    /// True if `operand` is a code address targeted by a control transfer.
    #[must_use]
    pub fn is_address(&self, mnemonic: &str, operand: &str) -> bool {
        Self::is_jump(mnemonic) && is_hex_literal(operand)
    }

    /// True if `operand` is an immediate.
    ///
    /// AT&T immediates are `$`-prefixed, including the 64-bit `movabs` form. Intel immediates
    /// are bare numeric literals that are not jump targets.
    #[must_use]
    pub fn is_constant(&self, mnemonic: &str, operand: &str) -> bool {
        if let Some(value) = operand.strip_prefix('$') {
            return is_hex_literal(value) || value.parse::<i64>().is_ok();
        }
        !Self::is_jump(mnemonic)
            && (is_hex_literal(operand) || operand.parse::<i64>().is_ok())
            && Self::syntax_of(operand) == Syntax::Att
            && !operand.contains('(')
    }

    /// True if `operand` names a register.
    #[must_use]
    pub fn is_register(&self, _mnemonic: &str, operand: &str) -> bool {
        match operand.strip_prefix('%') {
            Some(name) => !name.is_empty(),
            None => is_register_name(operand),
        }
    }

    /// Register named or used as base by `operand`.
    ///
    /// `%rsp` and `rsp` yield `rsp`; AT&T `disp(%base,%index,scale)` and Intel
    /// `[base+index*scale+disp]` memory references yield their base register.
    #[must_use]
    pub fn extract_register_name<'a>(&self, operand: &'a str) -> Option<&'a str> {
        let operand = operand.trim();

        if let Some(open) = operand.find('(') {
            let inner = &operand[open + 1..];
            let end = inner.find([',', ')']).unwrap_or(inner.len());
            let base = inner[..end].trim().trim_start_matches('%');
            return (!base.is_empty()).then_some(base);
        }

        if let Some(open) = operand.find('[') {
            let inner = &operand[open + 1..];
            let end = inner.find(['+', '-', '*', ']']).unwrap_or(inner.len());
            let base = inner[..end].trim();
            return is_register_name(base).then_some(base);
        }

        if let Some(name) = operand.strip_prefix('%') {
            return (!name.is_empty()).then_some(name);
        }

        is_register_name(operand).then_some(operand)
    }
}

pub(crate) fn is_hex_literal(text: &str) -> bool {
    text.strip_prefix("0x")
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit()))
}

fn is_register_name(name: &str) -> bool {
    if REGISTERS_32.contains(&name) || REGISTERS_64.contains(&name) {
        return true;
    }

    // r8..r15 with optional b/w/d suffix
    if let Some(rest) = name.strip_prefix('r') {
        let digits = rest.trim_end_matches(['b', 'w', 'd', 'l']);
        if let Ok(n) = digits.parse::<u8>() {
            return (8..=15).contains(&n);
        }
    }

    for bank in ["xmm", "ymm", "zmm", "st", "mm", "k", "cr", "dr"] {
        if let Some(rest) = name.strip_prefix(bank) {
            if !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()) {
                return true;
            }
        }
    }

    false
}
