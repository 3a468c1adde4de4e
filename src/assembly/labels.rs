use std::collections::BTreeMap;

/// Jump-target labels of one method.
///
/// While instructions are created, every operand classified as an address is registered here.
/// Once the method's address range is known, [`AssemblyLabels::build`] assigns `L0000`-style
/// names to the targets that lie inside the method, in address order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyLabels {
    targets: BTreeMap<u64, Option<String>>,
}

impl AssemblyLabels {
    /// Creates an empty label context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a control-transfer target.
    pub fn add_target(&mut self, address: u64) {
        self.targets.entry(address).or_insert(None);
    }

    /// Assigns names to all registered targets within `[start, end]`, dropping the others.
    pub fn build(&mut self, start: u64, end: u64) {
        self.targets.retain(|address, _| *address >= start && *address <= end);
        for (index, name) in self.targets.values_mut().enumerate() {
            *name = Some(format!("L{:04}", index));
        }
    }

    /// Label assigned to `address`, once built.
    #[must_use]
    pub fn label(&self, address: u64) -> Option<&str> {
        self.targets.get(&address).and_then(|n| n.as_deref())
    }

    /// True if `address` is a registered target.
    #[must_use]
    pub fn is_target(&self, address: u64) -> bool {
        self.targets.contains_key(&address)
    }

    /// Number of registered targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// True if no targets are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_inside_range_only() {
        let mut labels = AssemblyLabels::new();
        labels.add_target(0x200);
        labels.add_target(0x100);
        labels.add_target(0x9000);
        labels.add_target(0x100);
        assert_eq!(labels.len(), 3);

        labels.build(0x100, 0x300);
        assert_eq!(labels.len(), 2);
        assert_eq!(labels.label(0x100), Some("L0000"));
        assert_eq!(labels.label(0x200), Some("L0001"));
        assert_eq!(labels.label(0x9000), None);
        assert!(!labels.is_target(0x9000));
    }
}
