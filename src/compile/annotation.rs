use std::{collections::BTreeMap, fmt};

use strum::{Display, EnumCount, EnumIter, EnumString};

use crate::{model::MemberRef, signature::CanonicalSignature};

/// What a compiler event says about a bytecode offset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter, EnumCount,
)]
pub enum AnnotationKind {
    /// A call that was inlined
    #[strum(serialize = "inline_success")]
    InlineSuccess,
    /// A call that was not inlined
    #[strum(serialize = "inline_fail")]
    InlineFail,
    /// A profiled branch
    #[strum(serialize = "branch")]
    Branch,
    /// A deoptimization point
    #[strum(serialize = "uncommon_trap")]
    UncommonTrap,
    /// An allocation removed by escape analysis
    #[strum(serialize = "eliminate_allocation")]
    EliminatedAllocation,
    /// A call replaced by an intrinsic
    #[strum(serialize = "intrinsic")]
    IntrinsicUsed,
    /// A lock removed by escape analysis or coarsening
    #[strum(serialize = "eliminate_lock")]
    LockElision,
    /// A throw site compiled with a preallocated exception
    #[strum(serialize = "hot_throw")]
    HotThrow,
}

/// One annotation on a bytecode offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BytecodeAnnotation {
    /// Annotation kind
    pub kind: AnnotationKind,
    /// Human readable detail, e.g. the inlining reason
    pub text: String,
}

impl BytecodeAnnotation {
    /// Creates an annotation.
    #[must_use]
    pub fn new(kind: AnnotationKind, text: impl Into<String>) -> Self {
        BytecodeAnnotation {
            kind,
            text: text.into(),
        }
    }
}

impl fmt::Display for BytecodeAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.text)
    }
}

/// Annotations of one member, keyed by bytecode offset. An offset may carry several.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BytecodeAnnotationList {
    entries: BTreeMap<u32, Vec<BytecodeAnnotation>>,
}

impl BytecodeAnnotationList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an annotation at `bci`.
    pub fn add(&mut self, bci: u32, annotation: BytecodeAnnotation) {
        self.entries.entry(bci).or_default().push(annotation);
    }

    /// Appends every annotation of `other`.
    pub fn merge(&mut self, other: &BytecodeAnnotationList) {
        for (bci, annotations) in &other.entries {
            self.entries
                .entry(*bci)
                .or_default()
                .extend(annotations.iter().cloned());
        }
    }

    /// Annotations at `bci`, in the order they were recorded.
    #[must_use]
    pub fn at(&self, bci: u32) -> &[BytecodeAnnotation] {
        self.entries.get(&bci).map_or(&[], Vec::as_slice)
    }

    /// True if `bci` carries an annotation of `kind`.
    #[must_use]
    pub fn has_kind_at(&self, bci: u32, kind: AnnotationKind) -> bool {
        self.at(bci).iter().any(|a| a.kind == kind)
    }

    /// `(offset, annotation)` pairs ordered by offset.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &BytecodeAnnotation)> {
        self.entries
            .iter()
            .flat_map(|(bci, list)| list.iter().map(move |a| (*bci, a)))
    }

    /// Annotated offsets in ascending order.
    pub fn offsets(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.keys().copied()
    }

    /// Number of annotations over all offsets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// True if nothing is annotated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of annotations of `kind`.
    #[must_use]
    pub fn count_kind(&self, kind: AnnotationKind) -> usize {
        self.iter().filter(|(_, a)| a.kind == kind).count()
    }
}

/// The member an inlined annotation list belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AnnotationTarget {
    /// A member of the inventory
    Member(MemberRef),
    /// A member the inventory does not know
    Signature(CanonicalSignature),
}

/// Annotations produced by one compilation task: the compiled method's own list plus one list
/// per inlined member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberAnnotations {
    /// Annotations on the compiled method
    pub root: BytecodeAnnotationList,
    /// Annotations on inlined members
    pub inlined: BTreeMap<AnnotationTarget, BytecodeAnnotationList>,
}

impl MemberAnnotations {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The list of `target`, created on first use.
    pub fn list_mut(&mut self, target: Option<AnnotationTarget>) -> &mut BytecodeAnnotationList {
        match target {
            None => &mut self.root,
            Some(target) => self.inlined.entry(target).or_default(),
        }
    }

    /// The list of the inventory member `member`.
    #[must_use]
    pub fn for_member(&self, member: MemberRef) -> Option<&BytecodeAnnotationList> {
        self.inlined.get(&AnnotationTarget::Member(member))
    }

    /// Number of annotations over all members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.root.len() + self.inlined.values().map(BytecodeAnnotationList::len).sum::<usize>()
    }

    /// True if nothing is annotated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
