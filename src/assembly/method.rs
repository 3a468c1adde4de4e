use std::fmt;

use crate::{
    assembly::{Architecture, AssemblyBlock, AssemblyInstruction, AssemblyLabels, BlockTitle},
    signature::MemberSignatureParts,
    Error, Result,
};

/// The parsed disassembly of one compiled method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyMethod {
    /// `#`-prefixed header lines, newline-joined
    pub header: String,
    /// Address printed by `Decoding compiled method 0x…:`
    pub nmethod_address: Option<u64>,
    /// Address of the first instruction
    pub entry_address: Option<u64>,
    /// Blocks in listing order
    pub blocks: Vec<AssemblyBlock>,
    /// Widest annotation column over all instructions
    pub max_annotation_width: usize,
    /// Architecture the listing was parsed with
    pub architecture: Architecture,
    /// Jump-target labels inside the method
    pub labels: AssemblyLabels,
}

impl AssemblyMethod {
    /// Creates an empty method.
    #[must_use]
    pub fn new(architecture: Architecture) -> Self {
        AssemblyMethod {
            header: String::new(),
            nmethod_address: None,
            entry_address: None,
            blocks: Vec::new(),
            max_annotation_width: 0,
            architecture,
            labels: AssemblyLabels::new(),
        }
    }

    /// The block instructions are currently appended to, creating a default block if none
    /// exists yet.
    pub(crate) fn current_block_mut(&mut self) -> &mut AssemblyBlock {
        if self.blocks.is_empty() {
            self.blocks.push(AssemblyBlock::new(BlockTitle::Default));
        }
        let last = self.blocks.len() - 1;
        &mut self.blocks[last]
    }

    pub(crate) fn last_instruction_mut(&mut self) -> Option<&mut AssemblyInstruction> {
        self.blocks
            .iter_mut()
            .rev()
            .find_map(|block| block.instructions.last_mut())
    }

    /// First block with `title`.
    #[must_use]
    pub fn block(&self, title: BlockTitle) -> Option<&AssemblyBlock> {
        self.blocks.iter().find(|b| b.title == title)
    }

    /// All instructions in listing order.
    pub fn instructions(&self) -> impl Iterator<Item = &AssemblyInstruction> {
        self.blocks.iter().flat_map(|b| b.instructions.iter())
    }

    /// Number of instructions over all blocks.
    #[must_use]
    pub fn instruction_count(&self) -> usize {
        self.blocks.iter().map(|b| b.instructions.len()).sum()
    }

    /// The instruction at `address`.
    #[must_use]
    pub fn instruction_at(&self, address: u64) -> Option<&AssemblyInstruction> {
        self.instructions().find(|i| i.address == address)
    }

    /// Address of the first instruction.
    #[must_use]
    pub fn start_address(&self) -> Option<u64> {
        self.blocks.iter().find_map(AssemblyBlock::start_address)
    }

    /// Address of the last instruction.
    #[must_use]
    pub fn end_address(&self) -> Option<u64> {
        self.blocks.iter().rev().find_map(AssemblyBlock::end_address)
    }

    /// True if `address` lies within the method's instructions.
    #[must_use]
    pub fn contains(&self, address: u64) -> bool {
        match (self.start_address(), self.end_address()) {
            (Some(start), Some(end)) => start <= address && address <= end,
            _ => false,
        }
    }

    /// The `# {method}` header line, if printed.
    #[must_use]
    pub fn method_header(&self) -> Option<&str> {
        self.header.lines().find(|l| l.contains("{method}"))
    }

    /// Signature of the compiled member, taken from the `# {method}` header line.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if the listing has no method header and
    /// [`Error::Signature`] if the header cannot be decomposed.
    pub fn member_signature(&self) -> Result<MemberSignatureParts> {
        let header = self
            .method_header()
            .ok_or_else(|| Error::NotFound("assembly method header".to_string()))?;
        MemberSignatureParts::from_assembly_header(header)
    }
}

impl fmt::Display for AssemblyMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.header.lines() {
            writeln!(f, "{}", line)?;
        }
        for block in &self.blocks {
            if block.title != BlockTitle::Default {
                writeln!(f, "{}", block.title)?;
            }
            for instruction in &block.instructions {
                writeln!(
                    f,
                    "{}",
                    instruction.format(&self.labels, self.max_annotation_width)
                )?;
            }
        }
        Ok(())
    }
}
