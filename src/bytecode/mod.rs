//! Bytecode listings as printed by `javap -c -l [-v]`.
//!
//! A listing is loaded into a [`ClassBC`], which holds one [`MemberBytecode`] per method
//! together with the class metadata the listing carries: version numbers, source file,
//! superclass and interfaces, the type variables the class declares and, for verbose listings,
//! the constant pool.
//!
//! Instructions keep their typed parameters ([`BytecodeParameter`]) and the trailing `//`
//! comment, so invoked members and field references can be read without a constant pool.
//!
//! # Key Components
//!
//! - [`BytecodeLoader`] - Section-aware loader for whole listings
//! - [`InstructionParser`] / [`parse_instructions`] - Instruction lines, including multi-line
//!   switch tables
//! - [`Opcode`] - The JVM instruction set with listing mnemonics and parameter shapes
//! - [`LineTable`], [`ExceptionTable`], [`LocalVariableTable`] - Per-member tables
//!
//! # Examples
//!
//! ```rust
//! use jitscope::bytecode::{BytecodeLoader, Opcode};
//! use jitscope::signature::MemberSignatureParts;
//!
//! let listing = "\
//! public class demo.Counter {
//!   public int next();
//!     Code:
//!        0: aload_0
//!        1: dup
//!        2: getfield      #7                  // Field count:I
//!        5: iconst_1
//!        6: iadd
//!        7: dup_x1
//!        8: putfield      #7                  // Field count:I
//!       11: ireturn
//! }
//! ";
//!
//! let class = BytecodeLoader::parse("demo.Counter", listing.lines(), false)?;
//! let wanted = MemberSignatureParts::from_log_signature("demo/Counter next ()I")?;
//! let member = class.member_bytecode(&wanted).unwrap();
//! assert_eq!(member.instruction_at(8).map(|i| i.opcode), Some(Opcode::Putfield));
//! # Ok::<(), jitscope::Error>(())
//! ```

mod class;
mod instruction;
mod loader;
mod member;
mod opcode;
mod parser;
mod tables;

pub use class::{ClassBC, ConstantPool, ConstantPoolEntry};
pub use instruction::{BytecodeInstruction, BytecodeParameter, SwitchTable};
pub use loader::BytecodeLoader;
pub use member::MemberBytecode;
pub use opcode::{Opcode, OpcodeCategory, OperandShape};
pub use parser::{parse_instructions, InstructionParser};
pub use tables::{
    ExceptionTable, ExceptionTableEntry, LineTable, LineTableEntry, LocalVariable,
    LocalVariableTable,
};
