use crate::{
    bytecode::{BytecodeInstruction, ExceptionTable, LineTable, LocalVariableTable},
    signature::MemberSignatureParts,
};

/// Bytecode and tables of one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberBytecode {
    /// The member header, decomposed
    pub signature: MemberSignatureParts,
    /// Instructions ordered by offset
    pub instructions: Vec<BytecodeInstruction>,
    /// `LineNumberTable`
    pub line_table: LineTable,
    /// `Exception table`
    pub exception_table: ExceptionTable,
    /// `LocalVariableTable`
    pub local_variables: LocalVariableTable,
}

impl MemberBytecode {
    /// Creates an empty member.
    #[must_use]
    pub fn new(signature: MemberSignatureParts) -> Self {
        MemberBytecode {
            signature,
            instructions: Vec::new(),
            line_table: LineTable::new(),
            exception_table: ExceptionTable::new(),
            local_variables: LocalVariableTable::new(),
        }
    }

    /// The instruction starting at `offset`.
    #[must_use]
    pub fn instruction_at(&self, offset: u32) -> Option<&BytecodeInstruction> {
        self.instructions
            .binary_search_by_key(&offset, |i| i.offset)
            .ok()
            .map(|index| &self.instructions[index])
    }

    /// Source line of the instruction at `offset`.
    #[must_use]
    pub fn source_line_for_bci(&self, offset: u32) -> Option<u32> {
        self.line_table.source_line_for_bci(offset)
    }

    /// Offset of the last instruction.
    #[must_use]
    pub fn last_offset(&self) -> Option<u32> {
        self.instructions.last().map(|i| i.offset)
    }

    /// True if the member has no code (abstract or native).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}
