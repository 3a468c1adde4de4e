use std::{collections::BTreeMap, fmt};

use crate::{
    assembly::AssemblyMethod,
    bytecode::MemberBytecode,
    compile::{BytecodeAnnotationList, Compilation},
    signature::{CanonicalSignature, MemberSignatureParts},
};

/// Index of a member within a [`crate::model::ClassInventory`].
///
/// References stay valid as long as classes and members are only added, which is the only
/// mutation the inventory offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberRef {
    /// Index of the declaring class
    pub class: usize,
    /// Index of the member within its class
    pub member: usize,
}

impl MemberRef {
    /// Creates a reference.
    #[must_use]
    pub fn new(class: usize, member: usize) -> Self {
        MemberRef { class, member }
    }
}

impl fmt::Display for MemberRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.class, self.member)
    }
}

/// A method or constructor and everything attached to it.
#[derive(Debug, Clone)]
pub struct MetaMember {
    /// Declared signature
    pub signature: MemberSignatureParts,
    /// Bytecode, if a listing of the class was loaded
    pub bytecode: Option<MemberBytecode>,
    /// Native code of every compilation that printed its disassembly
    pub assembly: Vec<AssemblyMethod>,
    /// Compilations of this member, in log order
    pub compilations: Vec<Compilation>,
    /// Annotations per compile id; an inlined member collects lists from its callers' tasks
    pub annotations: BTreeMap<u32, BytecodeAnnotationList>,
}

impl MetaMember {
    /// Creates a member with nothing attached.
    #[must_use]
    pub fn new(signature: MemberSignatureParts) -> Self {
        MetaMember {
            signature,
            bytecode: None,
            assembly: Vec::new(),
            compilations: Vec::new(),
            annotations: BTreeMap::new(),
        }
    }

    /// Canonical identity.
    #[must_use]
    pub fn canonical(&self) -> CanonicalSignature {
        self.signature.canonical()
    }

    /// True if at least one compilation was attached.
    #[must_use]
    pub fn is_compiled(&self) -> bool {
        !self.compilations.is_empty()
    }

    /// The most recent compilation.
    #[must_use]
    pub fn last_compilation(&self) -> Option<&Compilation> {
        self.compilations.last()
    }

    /// Annotations recorded by compilation `compile_id`.
    #[must_use]
    pub fn annotations_for(&self, compile_id: u32) -> Option<&BytecodeAnnotationList> {
        self.annotations.get(&compile_id)
    }

    /// Adds `compilation`, replacing an earlier one with the same compile id in place.
    pub fn record_compilation(&mut self, compilation: Compilation) {
        match self
            .compilations
            .iter()
            .position(|c| c.compile_id == compilation.compile_id)
        {
            Some(index) => self.compilations[index] = compilation,
            None => self.compilations.push(compilation),
        }
    }

    /// Adds `method`, replacing an earlier listing of the same entry address.
    pub fn record_assembly(&mut self, method: AssemblyMethod) {
        let existing = method.entry_address.and_then(|entry| {
            self.assembly
                .iter()
                .position(|m| m.entry_address == Some(entry))
        });
        match existing {
            Some(index) => self.assembly[index] = method,
            None => self.assembly.push(method),
        }
    }

    /// Source line of `bci`, if bytecode with a line table is attached.
    #[must_use]
    pub fn source_line_for_bci(&self, bci: u32) -> Option<u32> {
        self.bytecode.as_ref()?.source_line_for_bci(bci)
    }
}
