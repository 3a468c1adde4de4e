//! ARM32 and AArch64 operand classification.

use crate::assembly::{x86::is_hex_literal, Architecture};

const BRANCHES: &[&str] = &[
    "b", "bl", "blr", "br", "bx", "blx", "cbz", "cbnz", "tbz", "tbnz", "adr", "adrp",
];

const CONDITIONS: &[&str] = &[
    "eq", "ne", "cs", "hs", "cc", "lo", "mi", "pl", "vs", "vc", "hi", "ls", "ge", "lt", "gt",
    "le", "al", "nv",
];

const NAMED_REGISTERS: &[&str] = &["sp", "lr", "pc", "fp", "ip", "xzr", "wzr", "wsp", "sb", "sl"];

/// Operand classifier for ARM listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmParser {
    architecture: Architecture,
}

impl ArmParser {
    /// Creates a classifier for `architecture`, which must be one of the ARM variants.
    #[must_use]
    pub fn new(architecture: Architecture) -> Self {
        ArmParser { architecture }
    }

    /// The architecture this parser was created for.
    #[must_use]
    pub fn architecture(&self) -> Architecture {
        self.architecture
    }

    /// True if `mnemonic` transfers control or forms a pc-relative address.
    #[must_use]
    pub fn is_jump(mnemonic: &str) -> bool {
        let mnemonic = mnemonic.to_ascii_lowercase();
        if BRANCHES.contains(&mnemonic.as_str()) {
            return true;
        }
        if let Some(cond) = mnemonic.strip_prefix("b.") {
            return CONDITIONS.contains(&cond);
        }
        mnemonic
            .strip_prefix('b')
            .is_some_and(|cond| CONDITIONS.contains(&cond))
    }

    /// True if `operand` is a target address of a branch.
    #[must_use]
    pub fn is_address(&self, mnemonic: &str, operand: &str) -> bool {
        Self::is_jump(mnemonic) && is_hex_literal(operand.trim_start_matches('#'))
    }

    /// True if `operand` is a `#`-prefixed immediate.
    #[must_use]
    pub fn is_constant(&self, mnemonic: &str, operand: &str) -> bool {
        operand.starts_with('#') && !self.is_address(mnemonic, operand)
    }

    /// True if `operand` names a general-purpose, special or SIMD register.
    #[must_use]
    pub fn is_register(&self, _mnemonic: &str, operand: &str) -> bool {
        is_register_name(operand.trim_end_matches('!'))
    }

    /// Register named by `operand`, or base register of a `[base, ...]` memory reference.
    #[must_use]
    pub fn extract_register_name<'a>(&self, operand: &'a str) -> Option<&'a str> {
        let operand = operand.trim();
        let name = match operand.strip_prefix('[') {
            Some(inner) => {
                let end = inner.find([',', ']']).unwrap_or(inner.len());
                inner[..end].trim()
            }
            None => operand.trim_end_matches('!'),
        };
        is_register_name(name).then_some(name)
    }
}

fn is_register_name(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    if NAMED_REGISTERS.contains(&name.as_str()) {
        return true;
    }

    let numbered = |prefix: char, max: u8| {
        name.strip_prefix(prefix)
            .and_then(|n| n.parse::<u8>().ok())
            .is_some_and(|n| n <= max)
    };

    numbered('x', 30)
        || numbered('w', 30)
        || numbered('r', 15)
        || numbered('v', 31)
        || numbered('q', 31)
        || numbered('d', 31)
        || numbered('s', 31)
        || numbered('h', 31)
        || numbered('b', 31)
}
