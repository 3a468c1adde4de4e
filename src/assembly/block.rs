use strum::{Display, EnumIter};

use crate::assembly::AssemblyInstruction;

/// Title of a disassembly block.
///
/// The disassembler splits every compiled method into up to five titled regions. Content that
/// appears before the first title goes into an untitled [`BlockTitle::Default`] block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum BlockTitle {
    /// Instructions that precede any block marker
    #[strum(to_string = "")]
    Default,
    /// `[Entry Point]` - unverified entry with the inline cache check
    #[strum(to_string = "[Entry Point]")]
    EntryPoint,
    /// `[Verified Entry Point]` - the method body proper
    #[strum(to_string = "[Verified Entry Point]")]
    VerifiedEntryPoint,
    /// `[Exception Handler]`
    #[strum(to_string = "[Exception Handler]")]
    ExceptionHandler,
    /// `[Stub Code]` - call stubs and trampolines
    #[strum(to_string = "[Stub Code]")]
    StubCode,
    /// `[Deopt Handler Code]`
    #[strum(to_string = "[Deopt Handler Code]")]
    DeoptHandlerCode,
}

impl BlockTitle {
    /// Recognizes a block marker line, ignoring surrounding whitespace.
    #[must_use]
    pub fn from_marker(line: &str) -> Option<BlockTitle> {
        match line.trim() {
            "[Entry Point]" => Some(BlockTitle::EntryPoint),
            "[Verified Entry Point]" => Some(BlockTitle::VerifiedEntryPoint),
            "[Exception Handler]" => Some(BlockTitle::ExceptionHandler),
            "[Stub Code]" => Some(BlockTitle::StubCode),
            "[Deopt Handler Code]" => Some(BlockTitle::DeoptHandlerCode),
            _ => None,
        }
    }
}

/// A titled, ordered run of instructions. May be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyBlock {
    /// The block title
    pub title: BlockTitle,
    /// Instructions in address order
    pub instructions: Vec<AssemblyInstruction>,
}

impl AssemblyBlock {
    /// Creates an empty block.
    #[must_use]
    pub fn new(title: BlockTitle) -> Self {
        AssemblyBlock {
            title,
            instructions: Vec::new(),
        }
    }

    /// True if the block holds no instructions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Address of the first instruction.
    #[must_use]
    pub fn start_address(&self) -> Option<u64> {
        self.instructions.first().map(|i| i.address)
    }

    /// Address of the last instruction.
    #[must_use]
    pub fn end_address(&self) -> Option<u64> {
        self.instructions.last().map(|i| i.address)
    }

    /// True if `address` falls within the block's first and last instruction.
    #[must_use]
    pub fn contains(&self, address: u64) -> bool {
        match (self.start_address(), self.end_address()) {
            (Some(start), Some(end)) => start <= address && address <= end,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers() {
        assert_eq!(
            BlockTitle::from_marker("  [Verified Entry Point]"),
            Some(BlockTitle::VerifiedEntryPoint)
        );
        assert_eq!(
            BlockTitle::from_marker("[Deopt Handler Code]"),
            Some(BlockTitle::DeoptHandlerCode)
        );
        assert_eq!(BlockTitle::from_marker("[Constants]"), None);
        assert_eq!(BlockTitle::StubCode.to_string(), "[Stub Code]");
    }

    #[test]
    fn empty_block() {
        let block = AssemblyBlock::new(BlockTitle::ExceptionHandler);
        assert!(block.is_empty());
        assert_eq!(block.start_address(), None);
        assert!(!block.contains(0));
    }
}
