use crate::{
    bytecode::ClassBC,
    model::MetaMember,
    signature::{GenericsMap, MemberSignatureParts},
};

/// A class of the inventory.
#[derive(Debug, Clone, Default)]
pub struct MetaClass {
    /// Dotted class name, inner classes with `$`
    pub name: String,
    /// Direct superclass
    pub super_name: Option<String>,
    /// Directly implemented interfaces
    pub interfaces: Vec<String>,
    /// Type variables declared by the class
    pub generics: GenericsMap,
    /// `SourceFile` of the loaded listing
    pub source_file: Option<String>,
    members: Vec<MetaMember>,
}

impl MetaClass {
    /// Creates a class without members.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        MetaClass {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the superclass.
    #[must_use]
    pub fn with_super(mut self, super_name: impl Into<String>) -> Self {
        self.super_name = Some(super_name.into());
        self
    }

    /// Adds an implemented interface.
    #[must_use]
    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// Adds a member and returns its index. The declaring class is set to this class.
    pub fn add_member(&mut self, mut signature: MemberSignatureParts) -> usize {
        signature.class_name.clone_from(&self.name);
        if signature.class_generics.is_empty() {
            signature.class_generics.clone_from(&self.generics);
        }
        self.members.push(MetaMember::new(signature));
        self.members.len() - 1
    }

    /// Builds a class from a bytecode listing, attaching each member's bytecode.
    #[must_use]
    pub fn from_bytecode(class: ClassBC) -> Self {
        let mut meta = MetaClass::new(class.class_name.clone());
        meta.super_name.clone_from(&class.super_name);
        meta.interfaces.clone_from(&class.interfaces);
        meta.generics.clone_from(&class.generics);
        meta.source_file.clone_from(&class.source_file);
        meta.attach_bytecode(&class);
        meta
    }

    /// Attaches the members of `class` to matching members, adding those that are missing.
    /// Returns the number of members that received bytecode.
    pub fn attach_bytecode(&mut self, class: &ClassBC) -> usize {
        let mut attached = 0;
        for bytecode in class.members() {
            let canonical = bytecode.signature.canonical();
            let existing = self.members.iter().position(|m| {
                let declared = m.canonical();
                declared.member_name == canonical.member_name
                    && declared.parameter_types == canonical.parameter_types
            });
            let index = match existing {
                Some(index) => index,
                None => self.add_member(bytecode.signature.clone()),
            };
            self.members[index].bytecode = Some(bytecode.clone());
            attached += 1;
        }
        attached
    }

    /// Members in declaration order.
    #[must_use]
    pub fn members(&self) -> &[MetaMember] {
        &self.members
    }

    /// The member at `index`.
    #[must_use]
    pub fn member(&self, index: usize) -> Option<&MetaMember> {
        self.members.get(index)
    }

    /// The member at `index`, mutably.
    pub fn member_mut(&mut self, index: usize) -> Option<&mut MetaMember> {
        self.members.get_mut(index)
    }

    /// Signatures of all members, in declaration order.
    #[must_use]
    pub fn member_signatures(&self) -> Vec<MemberSignatureParts> {
        self.members.iter().map(|m| m.signature.clone()).collect()
    }

    /// Simple name, after the last `.`.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}
