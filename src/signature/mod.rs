//! Member signature parsing, canonicalization and matching.
//!
//! A compiled method is named differently by every source that mentions it: the compiler log
//! uses internal names and JVM descriptors, the disassembler header quotes name, descriptor and
//! holder separately, bytecode listings print a source-like declaration and reflection prints
//! its own qualified form. This module decomposes all of them into [`MemberSignatureParts`],
//! reduces them to an erased [`CanonicalSignature`] and matches them against declared members
//! with [`MemberMatcher`].
//!
//! # Key Components
//!
//! - [`MemberSignatureParts`] - Decomposed signature, with one factory per encoding
//! - [`CanonicalSignature`] - Erased identity used as a lookup key
//! - [`MemberMatcher`] - Overload resolution under erasure, assignability and varargs
//! - [`TypeHierarchy`] - Subtype queries supplied by the class inventory
//! - [`MemberModifiers`] - JVM access flags
//!
//! # Canonical Form
//!
//! - class names are dotted, with `$` treated like `.`
//! - generic arguments are removed, type variables replaced by their bounds
//! - variadic `T...` parameters become `T[]`

mod matcher;
mod modifiers;
mod parts;
pub mod types;

pub use matcher::{FlatHierarchy, MatchKind, MemberMatcher, TypeHierarchy};
pub use modifiers::MemberModifiers;
pub use parts::{CanonicalSignature, MemberSignatureParts, CONSTRUCTOR, STATIC_INITIALIZER};
pub use types::GenericsMap;
