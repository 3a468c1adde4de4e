//! # jitscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types of the jitscope
//! library. Import it to get quick access to the types needed for ingesting a compiler log.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all jitscope operations
pub use crate::Error;

/// The result type used throughout jitscope
pub use crate::Result;

/// Configuration shared by all parsing stages
pub use crate::config::ParseConfig;

/// Caller-owned collection of repairs and anomalies
pub use crate::diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticSeverity, Diagnostics};

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Orchestration of one log
pub use crate::session::{AttachSummary, LogHeader, LogSession, NMethodRecord, ParsedLog};

// ================================================================================================
// Tag Dialect
// ================================================================================================

/// Tag trees and the streaming parser producing them
pub use crate::tags::{Tag, TagProcessor};

// ================================================================================================
// Native Code
// ================================================================================================

/// Disassembly parsing
pub use crate::assembly::{
    Architecture, AssemblyBlock, AssemblyInstruction, AssemblyMethod, AssemblyParser,
    AssemblyProcessor, BlockTitle,
};

// ================================================================================================
// Bytecode
// ================================================================================================

/// Bytecode listings
pub use crate::bytecode::{BytecodeInstruction, BytecodeLoader, ClassBC, MemberBytecode, Opcode};

// ================================================================================================
// Signatures and Inventory
// ================================================================================================

/// Signature canonicalization and matching
pub use crate::signature::{
    CanonicalSignature, MemberMatcher, MemberModifiers, MemberSignatureParts, TypeHierarchy,
};

/// The inventory analysis results are attached to
pub use crate::model::{ClassInventory, MemberRef, MetaClass, MetaMember};

// ================================================================================================
// Compilations
// ================================================================================================

/// Tasks, inlining trees and annotations
pub use crate::compile::{
    AnnotationKind, BytecodeAnnotation, BytecodeAnnotationList, Compilation, CompileChainWalker,
    CompileNode, MemberAnnotations, TaskAnalysis,
};
