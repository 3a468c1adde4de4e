use std::fmt;

use crate::{model::MemberRef, signature::MemberSignatureParts};

/// One member in the inlining tree of a compilation.
///
/// The root is the compiled method; every child is a call site of its parent, either inlined
/// (with its own children) or left as a call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileNode {
    /// `Class::name`, or the dictionary id when it could not be resolved
    pub member_name: String,
    /// Dictionary id of the method within its task
    pub method_id: Option<String>,
    /// The inventory member, when resolved
    pub member: Option<MemberRef>,
    /// Decomposed signature, when the dictionary resolved it
    pub signature: Option<MemberSignatureParts>,
    /// Call-site offset in the parent, `None` for the root
    pub bci: Option<u32>,
    /// True if the callee was inlined
    pub inlined: bool,
    /// The compiler's inlining reason
    pub reason: Option<String>,
    /// True if the callee was inlined after parsing completed
    pub late_inline: bool,
    /// True if the call was replaced by an intrinsic
    pub intrinsic: bool,
    /// Call sites of this member, in parse order
    pub children: Vec<CompileNode>,
}

impl CompileNode {
    /// Creates a node without children.
    #[must_use]
    pub fn new(member_name: impl Into<String>, inlined: bool) -> Self {
        CompileNode {
            member_name: member_name.into(),
            inlined,
            ..Self::default()
        }
    }

    /// Number of nodes in this subtree, including this one.
    #[must_use]
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(CompileNode::size).sum::<usize>()
    }

    /// Depth of the subtree, 1 for a leaf.
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(CompileNode::depth).max().unwrap_or(0)
    }

    /// Number of inlined nodes in the subtree, excluding this one.
    #[must_use]
    pub fn inlined_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| usize::from(c.inlined) + c.inlined_count())
            .sum()
    }

    /// First child for `method_id` called at `bci`.
    #[must_use]
    pub fn child_at(&self, method_id: &str, bci: Option<u32>) -> Option<usize> {
        self.children
            .iter()
            .position(|c| c.method_id.as_deref() == Some(method_id) && c.bci == bci)
    }

    /// First child whose member name is `member_name`.
    #[must_use]
    pub fn child_named(&self, member_name: &str) -> Option<&CompileNode> {
        self.children.iter().find(|c| c.member_name == member_name)
    }

    /// Visits the subtree depth-first, passing each node's depth.
    pub fn visit<F>(&self, visitor: &mut F)
    where
        F: FnMut(&CompileNode, usize),
    {
        self.visit_at(0, visitor);
    }

    fn visit_at<F>(&self, depth: usize, visitor: &mut F)
    where
        F: FnMut(&CompileNode, usize),
    {
        visitor(self, depth);
        for child in &self.children {
            child.visit_at(depth + 1, visitor);
        }
    }

    pub(crate) fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut CompileNode> {
        match path.split_first() {
            None => Some(self),
            Some((index, rest)) => self.children.get_mut(*index)?.node_at_mut(rest),
        }
    }
}

impl fmt::Display for CompileNode {
    /// Renders the tree one node per line, children indented.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, 0)
    }
}

impl CompileNode {
    fn render(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{:indent$}{}", "", self.member_name, indent = depth * 2)?;
        if let Some(bci) = self.bci {
            write!(f, " @{}", bci)?;
        }

        let flags: Vec<&str> = [
            (self.inlined, "inlined"),
            (self.late_inline, "late"),
            (self.intrinsic, "intrinsic"),
        ]
        .into_iter()
        .filter_map(|(set, name)| set.then_some(name))
        .collect();
        if !flags.is_empty() {
            write!(f, " [{}]", flags.join(", "))?;
        }
        if let Some(reason) = &self.reason {
            write!(f, " ({})", reason)?;
        }
        writeln!(f)?;

        for child in &self.children {
            child.render(f, depth + 1)?;
        }
        Ok(())
    }
}
