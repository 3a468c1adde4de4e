//! Per-member auxiliary tables of a bytecode listing.

/// One `line L: B` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineTableEntry {
    /// Source line
    pub source_line: u32,
    /// First bytecode offset of the line
    pub bci: u32,
}

/// Mapping between source lines and bytecode offsets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineTable {
    entries: Vec<LineTableEntry>,
}

impl LineTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, keeping the table ordered by offset.
    pub fn add(&mut self, source_line: u32, bci: u32) {
        let position = self.entries.partition_point(|e| e.bci <= bci);
        self.entries.insert(position, LineTableEntry { source_line, bci });
    }

    /// Source line of the instruction at `bci`: the entry with the greatest offset not after
    /// `bci`.
    #[must_use]
    pub fn source_line_for_bci(&self, bci: u32) -> Option<u32> {
        let position = self.entries.partition_point(|e| e.bci <= bci);
        position
            .checked_sub(1)
            .map(|index| self.entries[index].source_line)
    }

    /// Lowest bytecode offset attributed to `source_line`.
    #[must_use]
    pub fn bci_for_source_line(&self, source_line: u32) -> Option<u32> {
        self.entries
            .iter()
            .filter(|e| e.source_line == source_line)
            .map(|e| e.bci)
            .min()
    }

    /// Smallest and largest source line.
    #[must_use]
    pub fn source_line_range(&self) -> Option<(u32, u32)> {
        let min = self.entries.iter().map(|e| e.source_line).min()?;
        let max = self.entries.iter().map(|e| e.source_line).max()?;
        Some((min, max))
    }

    /// Entries ordered by offset.
    pub fn iter(&self) -> impl Iterator<Item = &LineTableEntry> {
        self.entries.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One row of an `Exception table`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionTableEntry {
    /// First covered offset
    pub from: u32,
    /// First offset after the covered range
    pub to: u32,
    /// Handler offset
    pub target: u32,
    /// Caught class, `None` for `any` (finally blocks)
    pub catch_type: Option<String>,
}

impl ExceptionTableEntry {
    /// True if the handler covers `bci`.
    #[must_use]
    pub fn covers(&self, bci: u32) -> bool {
        self.from <= bci && bci < self.to
    }
}

/// Exception handlers of a member, in listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExceptionTable {
    entries: Vec<ExceptionTableEntry>,
}

impl ExceptionTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a handler.
    pub fn add(&mut self, entry: ExceptionTableEntry) {
        self.entries.push(entry);
    }

    /// Handlers covering `bci`, innermost first as the listing orders them.
    pub fn entries_covering(&self, bci: u32) -> impl Iterator<Item = &ExceptionTableEntry> {
        self.entries.iter().filter(move |e| e.covers(bci))
    }

    /// Handlers starting at `target`.
    pub fn handlers_at(&self, target: u32) -> impl Iterator<Item = &ExceptionTableEntry> {
        self.entries.iter().filter(move |e| e.target == target)
    }

    /// All handlers.
    pub fn iter(&self) -> impl Iterator<Item = &ExceptionTableEntry> {
        self.entries.iter()
    }

    /// Number of handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the member has no handlers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One row of a `LocalVariableTable`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVariable {
    /// First offset where the variable is live
    pub start: u32,
    /// Length of the live range
    pub length: u32,
    /// Local slot
    pub slot: u16,
    /// Source name
    pub name: String,
    /// Type descriptor, e.g. `Ljava/lang/String;`
    pub signature: String,
}

impl LocalVariable {
    /// True if the variable is live at `bci`.
    #[must_use]
    pub fn is_live_at(&self, bci: u32) -> bool {
        self.start <= bci && bci < self.start.saturating_add(self.length)
    }
}

/// Local variables of a member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalVariableTable {
    variables: Vec<LocalVariable>,
}

impl LocalVariableTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a variable.
    pub fn add(&mut self, variable: LocalVariable) {
        self.variables.push(variable);
    }

    /// Variable occupying `slot` at `bci`.
    #[must_use]
    pub fn variable_at(&self, slot: u16, bci: u32) -> Option<&LocalVariable> {
        self.variables
            .iter()
            .find(|v| v.slot == slot && v.is_live_at(bci))
    }

    /// First variable named `name`.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&LocalVariable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// All variables.
    pub fn iter(&self) -> impl Iterator<Item = &LocalVariable> {
        self.variables.iter()
    }

    /// Number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// True if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_line() {
        let mut table = LineTable::new();
        table.add(12, 8);
        table.add(10, 0);
        table.add(11, 4);
        table.add(10, 15);

        assert_eq!(table.source_line_for_bci(0), Some(10));
        assert_eq!(table.source_line_for_bci(6), Some(11));
        assert_eq!(table.source_line_for_bci(100), Some(10));
        assert_eq!(table.bci_for_source_line(10), Some(0));
        assert_eq!(table.bci_for_source_line(99), None);
        assert_eq!(table.source_line_range(), Some((10, 12)));

        let mut late = LineTable::new();
        late.add(3, 5);
        assert_eq!(late.source_line_for_bci(2), None);
    }

    #[test]
    fn exception_ranges() {
        let mut table = ExceptionTable::new();
        table.add(ExceptionTableEntry {
            from: 0,
            to: 10,
            target: 13,
            catch_type: Some("java.io.IOException".into()),
        });
        table.add(ExceptionTableEntry {
            from: 0,
            to: 20,
            target: 30,
            catch_type: None,
        });

        assert_eq!(table.entries_covering(5).count(), 2);
        assert_eq!(table.entries_covering(10).count(), 1);
        assert_eq!(table.entries_covering(20).count(), 0);
        assert_eq!(table.handlers_at(30).count(), 1);
    }

    #[test]
    fn local_variables() {
        let mut table = LocalVariableTable::new();
        table.add(LocalVariable {
            start: 0,
            length: 10,
            slot: 1,
            name: "i".into(),
            signature: "I".into(),
        });
        assert_eq!(table.variable_at(1, 9).map(|v| v.name.as_str()), Some("i"));
        assert!(table.variable_at(1, 10).is_none());
        assert!(table.by_name("i").is_some());
    }
}
