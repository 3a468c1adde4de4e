use std::collections::{BTreeMap, HashMap};

use crate::{
    bytecode::MemberBytecode,
    signature::{CanonicalSignature, FlatHierarchy, GenericsMap, MemberMatcher, MemberSignatureParts},
};

/// One `#n = Kind value // comment` line of a verbose listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantPoolEntry {
    /// Entry kind, e.g. `Methodref`, `Utf8`, `Class`
    pub kind: String,
    /// Raw value, e.g. `#2.#3` or the text of a `Utf8`
    pub value: String,
    /// Resolved form printed after `//`
    pub comment: Option<String>,
}

impl ConstantPoolEntry {
    /// The resolved form if the listing printed one, else the raw value.
    #[must_use]
    pub fn resolved(&self) -> &str {
        self.comment.as_deref().unwrap_or(&self.value)
    }
}

/// Constant pool of a class, present only for verbose listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstantPool {
    entries: BTreeMap<u16, ConstantPoolEntry>,
}

impl ConstantPool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and stores one constant pool line. Returns `false` if the line is not one.
    pub fn add_line(&mut self, line: &str) -> bool {
        let Some(rest) = line.trim().strip_prefix('#') else {
            return false;
        };
        let Some((index, rest)) = rest.split_once('=') else {
            return false;
        };
        let Ok(index) = index.trim().parse::<u16>() else {
            return false;
        };

        let rest = rest.trim();
        let (kind, value) = rest
            .split_once(char::is_whitespace)
            .map_or((rest, ""), |(k, v)| (k, v.trim()));
        // Utf8 values may contain "//" themselves
        let (value, comment) = match value.find("//") {
            Some(pos) if kind != "Utf8" => (
                value[..pos].trim().to_string(),
                Some(value[pos + 2..].trim().to_string()),
            ),
            _ => (value.to_string(), None),
        };

        self.entries.insert(
            index,
            ConstantPoolEntry {
                kind: kind.to_string(),
                value,
                comment,
            },
        );
        true
    }

    /// The entry at `index`.
    #[must_use]
    pub fn get(&self, index: u16) -> Option<&ConstantPoolEntry> {
        self.entries.get(&index)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the pool is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The bytecode listing of one class.
#[derive(Debug, Clone, Default)]
pub struct ClassBC {
    /// Dotted class name
    pub class_name: String,
    /// Superclass from the `extends` clause
    pub super_name: Option<String>,
    /// Interfaces from the `implements` clause
    pub interfaces: Vec<String>,
    /// `SourceFile` attribute
    pub source_file: Option<String>,
    /// `minor version`
    pub minor_version: Option<u16>,
    /// `major version`
    pub major_version: Option<u16>,
    /// Type variables declared by the class, mapped to their erased bounds
    pub generics: GenericsMap,
    /// Constant pool, kept for verbose listings when enabled
    pub constant_pool: Option<ConstantPool>,
    members: Vec<MemberBytecode>,
    index: HashMap<CanonicalSignature, usize>,
}

impl ClassBC {
    /// Creates an empty class.
    #[must_use]
    pub fn new(class_name: impl Into<String>) -> Self {
        ClassBC {
            class_name: class_name.into(),
            ..Self::default()
        }
    }

    /// Adds a member, replacing one with the same canonical signature.
    pub fn add_member(&mut self, member: MemberBytecode) {
        let key = member.signature.canonical();
        match self.index.get(&key) {
            Some(&position) => self.members[position] = member,
            None => {
                self.index.insert(key, self.members.len());
                self.members.push(member);
            }
        }
    }

    /// Members in listing order.
    #[must_use]
    pub fn members(&self) -> &[MemberBytecode] {
        &self.members
    }

    /// Looks up the bytecode of the member `signature` refers to.
    ///
    /// The canonical form is tried first; otherwise the member is matched by name and erased
    /// parameter types, which covers variadic and generic declarations.
    #[must_use]
    pub fn member_bytecode(&self, signature: &MemberSignatureParts) -> Option<&MemberBytecode> {
        let mut canonical = signature.canonical();
        canonical.class_name = self.class_name.replace('$', ".");
        if let Some(&position) = self.index.get(&canonical) {
            return self.members.get(position);
        }
        MemberMatcher::new(&FlatHierarchy).find_by(&self.members, |m| &m.signature, signature)
    }

    /// Resolved text of the constant pool entry at `index`, for verbose listings.
    #[must_use]
    pub fn constant(&self, index: u16) -> Option<&str> {
        self.constant_pool
            .as_ref()?
            .get(index)
            .map(ConstantPoolEntry::resolved)
    }
}
