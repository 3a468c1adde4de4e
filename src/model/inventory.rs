use std::collections::{HashMap, HashSet, VecDeque};

use tracing::debug;

use crate::{
    assembly::AssemblyMethod,
    bytecode::ClassBC,
    model::{MemberRef, MetaClass, MetaMember},
    signature::{MemberMatcher, MemberSignatureParts, TypeHierarchy},
    Result,
};

/// Lookup key of a class name: `$` and `/` separators compare equal to `.`.
fn class_key(name: &str) -> String {
    name.trim().replace(['$', '/'], ".")
}

/// The classes and members derived artifacts are attached to.
///
/// Classes are looked up by name with inner-class and package separators normalized, so
/// `demo.Outer$Inner`, `demo.Outer.Inner` and `demo/Outer$Inner` name the same class. Members
/// are addressed by [`MemberRef`], which stays valid because classes and members are never
/// removed.
///
/// # Examples
///
/// ```rust
/// use jitscope::model::{ClassInventory, MetaClass};
/// use jitscope::signature::MemberSignatureParts;
///
/// let mut class = MetaClass::new("demo.Calc");
/// class.add_member(MemberSignatureParts::from_reflection("public int demo.Calc.add(int,int)")?);
///
/// let mut inventory = ClassInventory::new();
/// inventory.add_class(class);
///
/// let wanted = MemberSignatureParts::from_log_signature("demo/Calc add (II)I")?;
/// let found = inventory.find_member(&wanted, true).unwrap();
/// assert_eq!(inventory.member(found).unwrap().signature.member_name, "add");
/// # Ok::<(), jitscope::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClassInventory {
    classes: Vec<MetaClass>,
    by_name: HashMap<String, usize>,
}

impl ClassInventory {
    /// Creates an empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a class and returns its index.
    ///
    /// If a class of the same name exists, the members it lacks are added to it, along with
    /// any bytecode the new class carries, and the existing index is returned.
    pub fn add_class(&mut self, class: MetaClass) -> usize {
        let key = class_key(&class.name);
        let Some(&index) = self.by_name.get(&key) else {
            self.by_name.insert(key, self.classes.len());
            self.classes.push(class);
            return self.classes.len() - 1;
        };

        let existing = &mut self.classes[index];
        for member in class.members() {
            let canonical = member.canonical();
            let position = existing
                .members()
                .iter()
                .position(|m| m.canonical() == canonical);
            let position = match position {
                Some(position) => position,
                None => existing.add_member(member.signature.clone()),
            };
            if let (Some(target), Some(bytecode)) =
                (existing.member_mut(position), member.bytecode.as_ref())
            {
                target.bytecode.get_or_insert_with(|| bytecode.clone());
            }
        }
        if existing.super_name.is_none() {
            existing.super_name.clone_from(&class.super_name);
        }
        index
    }

    /// Adds the classes of a bytecode listing, attaching member bytecode to members that
    /// already exist. Returns the class index.
    pub fn add_bytecode(&mut self, class: ClassBC) -> usize {
        match self.class_index(&class.class_name) {
            Some(index) => {
                let attached = self.classes[index].attach_bytecode(&class);
                debug!(class = %class.class_name, attached, "attached bytecode");
                index
            }
            None => self.add_class(MetaClass::from_bytecode(class)),
        }
    }

    /// Index of the class `name`.
    #[must_use]
    pub fn class_index(&self, name: &str) -> Option<usize> {
        self.by_name.get(&class_key(name)).copied()
    }

    /// The class `name`.
    #[must_use]
    pub fn class(&self, name: &str) -> Option<&MetaClass> {
        self.class_index(name).map(|index| &self.classes[index])
    }

    /// The class at `index`.
    #[must_use]
    pub fn class_at(&self, index: usize) -> Option<&MetaClass> {
        self.classes.get(index)
    }

    /// All classes, in insertion order.
    #[must_use]
    pub fn classes(&self) -> &[MetaClass] {
        &self.classes
    }

    /// Number of classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// True if the inventory has no classes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// The member `reference` points at.
    #[must_use]
    pub fn member(&self, reference: MemberRef) -> Option<&MetaMember> {
        self.classes.get(reference.class)?.member(reference.member)
    }

    /// The member `reference` points at, mutably.
    pub fn member_mut(&mut self, reference: MemberRef) -> Option<&mut MetaMember> {
        self.classes
            .get_mut(reference.class)?
            .member_mut(reference.member)
    }

    /// All members with their references.
    pub fn members(&self) -> impl Iterator<Item = (MemberRef, &MetaMember)> {
        self.classes.iter().enumerate().flat_map(|(class, meta)| {
            meta.members()
                .iter()
                .enumerate()
                .map(move |(member, m)| (MemberRef::new(class, member), m))
        })
    }

    /// Finds the member `wanted` refers to.
    ///
    /// The class named by `wanted` is searched first, then its superclasses. Returns `None` if
    /// the class is unknown or no member matches.
    #[must_use]
    pub fn find_member(
        &self,
        wanted: &MemberSignatureParts,
        allow_assignable: bool,
    ) -> Option<MemberRef> {
        let matcher = MemberMatcher::new(self).with_assignable(allow_assignable);

        let mut visited = HashSet::new();
        let mut next = self.class_index(&wanted.class_name);
        while let Some(class) = next {
            if !visited.insert(class) {
                break;
            }
            let meta = &self.classes[class];
            if let Some(member) = matcher.position_by(meta.members(), |m| &m.signature, wanted) {
                return Some(MemberRef::new(class, member));
            }
            next = meta
                .super_name
                .as_deref()
                .and_then(|name| self.class_index(name));
        }
        None
    }

    /// Attaches a disassembled method to the member its header names.
    ///
    /// Returns `Ok(None)` if no member matches; the method is dropped in that case.
    ///
    /// # Errors
    /// Returns [`crate::Error::NotFound`] if the method has no `# {method}` header, or
    /// [`crate::Error::Signature`] if the header cannot be decomposed.
    pub fn attach_assembly(
        &mut self,
        method: AssemblyMethod,
        allow_assignable: bool,
    ) -> Result<Option<MemberRef>> {
        let wanted = method.member_signature()?;
        let Some(reference) = self.find_member(&wanted, allow_assignable) else {
            debug!(member = %wanted, "no member for disassembled method");
            return Ok(None);
        };
        if let Some(member) = self.member_mut(reference) {
            member.record_assembly(method);
        }
        Ok(Some(reference))
    }
}

impl TypeHierarchy for ClassInventory {
    fn is_subtype(&self, sub: &str, sup: &str) -> bool {
        let target = class_key(sup);
        let mut pending = VecDeque::from([class_key(sub)]);
        let mut visited = HashSet::new();

        while let Some(current) = pending.pop_front() {
            if current == target {
                return true;
            }
            if !visited.insert(current.clone()) {
                continue;
            }
            if let Some(class) = self.class(&current) {
                pending.extend(class.super_name.iter().map(|s| class_key(s)));
                pending.extend(class.interfaces.iter().map(|i| class_key(i)));
            }
        }
        false
    }
}
