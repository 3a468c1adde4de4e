use std::collections::HashMap;

use crate::{signature::types::class_name_from_internal, tags::Tag};

/// Entry counts of a [`ParseDictionary`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DictionaryStats {
    /// `type` entries
    pub types: usize,
    /// `klass` entries
    pub klasses: usize,
    /// `method` entries
    pub methods: usize,
}

impl DictionaryStats {
    /// Sum of all entries.
    #[must_use]
    pub fn total(&self) -> usize {
        self.types + self.klasses + self.methods
    }
}

/// Task-scoped id tables built from the `type`, `klass` and `method` tags of one compilation.
///
/// Ids are only meaningful within the task that declared them, so a dictionary is never shared
/// between tasks.
#[derive(Debug, Clone, Default)]
pub struct ParseDictionary {
    types: HashMap<String, Tag>,
    klasses: HashMap<String, Tag>,
    methods: HashMap<String, Tag>,
}

impl ParseDictionary {
    /// Creates an empty dictionary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `tag` if it is a dictionary tag with an id. Returns `false` otherwise.
    pub fn add(&mut self, tag: &Tag) -> bool {
        let table = match tag.name() {
            "type" => &mut self.types,
            "klass" => &mut self.klasses,
            "method" => &mut self.methods,
            _ => return false,
        };
        match tag.attribute("id") {
            Some(id) => {
                table.insert(id.to_string(), tag.clone());
                true
            }
            None => false,
        }
    }

    /// True if `name` is one of the dictionary tag kinds.
    #[must_use]
    pub fn is_dictionary_tag(name: &str) -> bool {
        matches!(name, "type" | "klass" | "method")
    }

    /// The `type` tag with `id`.
    #[must_use]
    pub fn type_tag(&self, id: &str) -> Option<&Tag> {
        self.types.get(id)
    }

    /// The `klass` tag with `id`.
    #[must_use]
    pub fn klass(&self, id: &str) -> Option<&Tag> {
        self.klasses.get(id)
    }

    /// The `method` tag with `id`.
    #[must_use]
    pub fn method(&self, id: &str) -> Option<&Tag> {
        self.methods.get(id)
    }

    /// Dotted name of the class with `id`.
    #[must_use]
    pub fn klass_name(&self, id: &str) -> Option<String> {
        self.klass(id)?
            .attribute("name")
            .map(class_name_from_internal)
    }

    /// Source-level name of the type with `id`. Argument and return ids refer to either a
    /// `type` (primitives) or a `klass` (references).
    #[must_use]
    pub fn type_name(&self, id: &str) -> Option<String> {
        match self.type_tag(id) {
            Some(tag) => tag.attribute("name").map(class_name_from_internal),
            None => self.klass_name(id),
        }
    }

    /// `Class::name` of the method with `id`.
    #[must_use]
    pub fn method_name(&self, id: &str) -> Option<String> {
        let method = self.method(id)?;
        let holder = self.klass_name(method.attribute("holder")?)?;
        Some(format!("{}::{}", holder, method.attribute("name")?))
    }

    /// Entry counts.
    #[must_use]
    pub fn stats(&self) -> DictionaryStats {
        DictionaryStats {
            types: self.types.len(),
            klasses: self.klasses.len(),
            methods: self.methods.len(),
        }
    }

    /// True if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stats().total() == 0
    }

    /// Drops all entries.
    pub fn clear(&mut self) {
        self.types.clear();
        self.klasses.clear();
        self.methods.clear();
    }
}
