//! Parsers for disassembled native code.
//!
//! The VM prints the native code of compiled methods through a disassembler plugin. This module
//! turns that text back into structure: instructions with prefixes, operands and multi-line
//! comments, grouped into titled blocks and methods. It never decodes machine code itself.
//!
//! # Key Components
//!
//! - [`AssemblyParser`] - Per-architecture strategy for one method's listing
//! - [`AssemblyProcessor`] - Splits a whole log's disassembly into methods
//! - [`AssemblyMethod`] / [`AssemblyBlock`] / [`AssemblyInstruction`] - The parsed model
//! - [`AssemblyLabels`] - Jump-target labels for rendering
//!
//! # Recovery
//!
//! Lines that do not follow the instruction grammar are folded into the previous instruction's
//! comment. This covers both legitimate comment continuations and instruction lines broken by
//! interleaved output from other VM threads.
//!
//! # Example
//!
//! ```rust
//! use jitscope::assembly::{Architecture, AssemblyParser, BlockTitle};
//!
//! let listing = "\
//! [Entry Point]
//!   # {method} {0x00007f0a0c4a1e30} 'size' '()I' in 'java/util/ArrayList'
//!   0x00007f0a1c000100: mov    0x10(%rsi),%eax
//! [Verified Entry Point]
//!   0x00007f0a1c000104: retq
//! ";
//!
//! let method = AssemblyParser::for_architecture(Architecture::X86_64).parse_assembly(listing);
//! assert_eq!(method.blocks.len(), 2);
//! assert_eq!(method.blocks[1].title, BlockTitle::VerifiedEntryPoint);
//! assert_eq!(method.instruction_count(), 2);
//! ```

mod arch;
mod arm;
mod block;
mod instruction;
mod labels;
mod method;
mod parser;
mod processor;
mod x86;

pub use arch::{Architecture, Syntax};
pub use arm::ArmParser;
pub use block::{AssemblyBlock, BlockTitle};
pub use instruction::{AssemblyInstruction, BytecodeReference};
pub use labels::AssemblyLabels;
pub use method::AssemblyMethod;
pub use parser::AssemblyParser;
pub use processor::AssemblyProcessor;
pub use x86::X86Parser;

pub(crate) use processor::parse_decoding_line;
