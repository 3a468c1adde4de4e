use std::fmt;

use crate::bytecode::Opcode;

/// Case table of a `tableswitch` or `lookupswitch`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwitchTable {
    /// `(key, target offset)` pairs in listing order
    pub cases: Vec<(i32, u32)>,
    /// Target of the `default` case
    pub default: Option<u32>,
}

impl SwitchTable {
    /// Target offset for `key`, falling back to the default.
    #[must_use]
    pub fn target_for(&self, key: i32) -> Option<u32> {
        self.cases
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, target)| *target)
            .or(self.default)
    }

    /// All target offsets, default last.
    pub fn targets(&self) -> impl Iterator<Item = u32> + '_ {
        self.cases
            .iter()
            .map(|(_, target)| *target)
            .chain(self.default)
    }
}

/// A typed instruction parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BytecodeParameter {
    /// Local slot, immediate, increment, count or branch target
    Numeric(i64),
    /// Constant pool index, printed as `#n`
    ConstantPool(u16),
    /// Free text, e.g. the element type of `newarray`
    Text(String),
    /// Switch table
    Switch(SwitchTable),
}

impl fmt::Display for BytecodeParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BytecodeParameter::Numeric(value) => write!(f, "{}", value),
            BytecodeParameter::ConstantPool(index) => write!(f, "#{}", index),
            BytecodeParameter::Text(text) => f.write_str(text),
            BytecodeParameter::Switch(table) => {
                write!(f, "{{")?;
                for (key, target) in &table.cases {
                    write!(f, " {}: {}", key, target)?;
                }
                if let Some(default) = table.default {
                    write!(f, " default: {}", default)?;
                }
                write!(f, " }}")
            }
        }
    }
}

/// One instruction of a bytecode listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BytecodeInstruction {
    /// Bytecode offset within the method
    pub offset: u32,
    /// The opcode
    pub opcode: Opcode,
    /// Parameters in listing order
    pub parameters: Vec<BytecodeParameter>,
    /// Trailing `//` comment without the slashes
    pub comment: Option<String>,
}

impl BytecodeInstruction {
    /// Creates an instruction without parameters.
    #[must_use]
    pub fn new(offset: u32, opcode: Opcode) -> Self {
        BytecodeInstruction {
            offset,
            opcode,
            parameters: Vec::new(),
            comment: None,
        }
    }

    /// Constant pool index of the first parameter, if it is one.
    #[must_use]
    pub fn constant_pool_index(&self) -> Option<u16> {
        self.parameters.iter().find_map(|p| match p {
            BytecodeParameter::ConstantPool(index) => Some(*index),
            _ => None,
        })
    }

    /// Target offset of a branch instruction.
    #[must_use]
    pub fn branch_target(&self) -> Option<u32> {
        if !self.opcode.is_branch() {
            return None;
        }
        match self.parameters.first() {
            Some(BytecodeParameter::Numeric(target)) => u32::try_from(*target).ok(),
            _ => None,
        }
    }

    /// Switch table of a switch instruction.
    #[must_use]
    pub fn switch_table(&self) -> Option<&SwitchTable> {
        self.parameters.iter().find_map(|p| match p {
            BytecodeParameter::Switch(table) => Some(table),
            _ => None,
        })
    }

    /// Invoked member as named by the listing comment, e.g.
    /// `java/lang/String.length:()I` for `// Method java/lang/String.length:()I`.
    #[must_use]
    pub fn invoked_member(&self) -> Option<&str> {
        if !self.opcode.is_invoke() {
            return None;
        }
        let comment = self.comment.as_deref()?.trim();
        let (kind, member) = comment.split_once(char::is_whitespace)?;
        matches!(kind, "Method" | "InterfaceMethod" | "InvokeDynamic").then(|| member.trim())
    }
}

impl fmt::Display for BytecodeInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.offset, self.opcode)?;
        let parameters: Vec<String> = self.parameters.iter().map(ToString::to_string).collect();
        if !parameters.is_empty() {
            write!(f, " {}", parameters.join(", "))?;
        }
        if let Some(comment) = &self.comment {
            write!(f, " // {}", comment)?;
        }
        Ok(())
    }
}
