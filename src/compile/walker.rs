//! Reconstruction of the inlining tree and bytecode annotations of one compilation task.

use tracing::{debug, trace};

use crate::{
    compile::{
        AnnotationKind, AnnotationTarget, BytecodeAnnotation, Compilation, CompileNode,
        DictionaryStats, MemberAnnotations, ParseDictionary,
    },
    config::ParseConfig,
    diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticSeverity, Diagnostics},
    model::{ClassInventory, MemberRef},
    signature::MemberSignatureParts,
    tags::Tag,
    Result,
};

/// Tags that appear inside tasks but carry nothing the walker models.
const IGNORED_TAGS: &[&str] = &[
    "parse_done",
    "phase_done",
    "observe",
    "predicted_call",
    "assert_null",
    "type_profile",
    "dependency",
    "cast_up",
    "replace_string_concat",
    "code_cache",
    "task_done",
    "failure",
    "inline_level_discount",
    "virtual_call",
    "loop_tree",
    "loop",
    "regalloc",
    "late_inline_failed",
    "inline_id",
    "jvms",
    "eliminate_boxing",
    "predicted_intrinsic",
    "intrinsic_failed",
    "uncommon_trap_info",
];

/// Result of walking one task.
#[derive(Debug, Clone)]
pub struct TaskAnalysis {
    /// Attributes and outcome of the task
    pub compilation: Compilation,
    /// Inlining tree rooted at the compiled method
    pub root: CompileNode,
    /// Annotations of the compiled method and of every inlined member
    pub annotations: MemberAnnotations,
    /// Entry counts of the task's dictionary
    pub dictionary: DictionaryStats,
    /// The compiled method in the inventory the walker was given
    pub root_member: Option<MemberRef>,
}

/// Walks the tag subtree of a compilation task.
///
/// The walk is depth-first in document order. Dictionary tags are recorded as they appear, so
/// every id is resolved against the dictionary as it stood at that point of the log. Members are
/// resolved against the inventory given with [`CompileChainWalker::with_inventory`]; without
/// one, inlined members are keyed by their canonical signature.
///
/// # Examples
///
/// ```rust
/// use jitscope::compile::CompileChainWalker;
/// use jitscope::diagnostics::Diagnostics;
/// use jitscope::tags::TagProcessor;
///
/// let log = "\
/// <task compile_id='3' method='demo/Calc twice (I)I' bytes='8'>
/// <phase name='parse'>
/// <type id='680' name='int'/>
/// <klass id='776' name='demo/Calc'/>
/// <method id='777' holder='776' name='twice' return='680' arguments='680'/>
/// <method id='778' holder='776' name='add' return='680' arguments='680 680'/>
/// <parse method='777'>
/// <bc code='184' bci='2'/>
/// <call method='778' count='1000'/>
/// <inline_success reason='inline (hot)'/>
/// <parse method='778'>
/// </parse>
/// </parse>
/// </phase>
/// </task>";
///
/// let mut processor = TagProcessor::new();
/// let task = log.lines().find_map(|line| processor.process_line(line)).unwrap();
///
/// let diagnostics = Diagnostics::new();
/// let analysis = CompileChainWalker::new(&diagnostics).walk(&task)?;
/// assert_eq!(analysis.root.member_name, "demo.Calc::twice");
/// assert_eq!(analysis.root.children[0].member_name, "demo.Calc::add");
/// assert!(analysis.root.children[0].inlined);
/// # Ok::<(), jitscope::Error>(())
/// ```
pub struct CompileChainWalker<'a> {
    diagnostics: &'a Diagnostics,
    inventory: Option<&'a ClassInventory>,
    allow_assignable: bool,
    splice_late_inlines: bool,
}

impl<'a> CompileChainWalker<'a> {
    /// Creates a walker reporting into `diagnostics`, with default settings.
    #[must_use]
    pub fn new(diagnostics: &'a Diagnostics) -> Self {
        let config = ParseConfig::default();
        CompileChainWalker {
            diagnostics,
            inventory: None,
            allow_assignable: config.allow_assignable_matching,
            splice_late_inlines: config.splice_late_inlines,
        }
    }

    /// Applies the matching and late-inline settings of `config`.
    #[must_use]
    pub fn with_config(mut self, config: &ParseConfig) -> Self {
        self.allow_assignable = config.allow_assignable_matching;
        self.splice_late_inlines = config.splice_late_inlines;
        self
    }

    /// Resolves members against `inventory`.
    #[must_use]
    pub fn with_inventory(mut self, inventory: &'a ClassInventory) -> Self {
        self.inventory = Some(inventory);
        self
    }

    /// Walks a `task` tag.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if `task` is not a task tag with a compile id and a
    /// method. Anomalies inside the task are recorded as diagnostics instead.
    pub fn walk(&self, task: &Tag) -> Result<TaskAnalysis> {
        let compilation = Compilation::from_task(task)?;

        let mut root = CompileNode::new(compilation.method.clone(), false);
        let mut root_member = None;
        match compilation.signature() {
            Ok(signature) => {
                root.member_name = signature.qualified_name();
                root_member = self.resolve(&signature, compilation.compile_id);
                root.member = root_member;
                root.signature = Some(signature);
            }
            Err(error) => self.report(
                DiagnosticSeverity::Error,
                DiagnosticCategory::Signature,
                compilation.compile_id,
                error.to_string(),
            ),
        }

        let mut walk = TaskWalk {
            walker: self,
            compile_id: compilation.compile_id,
            dictionary: ParseDictionary::new(),
            root,
            root_method_id: None,
            annotations: MemberAnnotations::new(),
            pending_late: None,
        };
        walk.walk_container(task);

        debug!(
            compile_id = compilation.compile_id,
            nodes = walk.root.size(),
            annotations = walk.annotations.len(),
            "walked task"
        );

        Ok(TaskAnalysis {
            dictionary: walk.dictionary.stats(),
            root: walk.root,
            annotations: walk.annotations,
            compilation,
            root_member,
        })
    }

    fn resolve(&self, signature: &MemberSignatureParts, compile_id: u32) -> Option<MemberRef> {
        let inventory = self.inventory?;
        let found = inventory.find_member(signature, self.allow_assignable);
        if found.is_none() {
            self.report(
                DiagnosticSeverity::Warning,
                DiagnosticCategory::Resolution,
                compile_id,
                format!("no member matches {}", signature),
            );
        }
        found
    }

    fn report(
        &self,
        severity: DiagnosticSeverity,
        category: DiagnosticCategory,
        compile_id: u32,
        message: String,
    ) {
        debug!(compile_id, %category, message = %message, "walker diagnostic");
        self.diagnostics
            .push(Diagnostic::new(severity, category, message).with_compile_id(compile_id));
    }
}

/// A `call` whose inlining decision may not have been seen yet.
struct PendingCall {
    method_id: Option<String>,
    bci: Option<u32>,
    node: Option<usize>,
}

struct TaskWalk<'w, 'a> {
    walker: &'w CompileChainWalker<'a>,
    compile_id: u32,
    dictionary: ParseDictionary,
    root: CompileNode,
    root_method_id: Option<String>,
    annotations: MemberAnnotations,
    /// Path of a late-inlined node whose body is the next top-level `parse`
    pending_late: Option<Vec<usize>>,
}

impl TaskWalk<'_, '_> {
    /// Children of the task and of phases outside any parse.
    fn walk_container(&mut self, container: &Tag) {
        for child in container.children() {
            match child.name() {
                "type" | "klass" | "method" => {
                    self.dictionary.add(child);
                }
                "phase" => self.walk_container(child),
                "parse" => self.walk_top_level_parse(child),
                "late_inline" => self.splice_late_inline(child),
                "uncommon_trap" => {
                    self.annotate_jvms(child, AnnotationKind::UncommonTrap, trap_text(child));
                }
                "eliminate_allocation" => {
                    let text = self.allocation_text(child);
                    self.annotate_jvms(child, AnnotationKind::EliminatedAllocation, text);
                }
                "eliminate_lock" => {
                    self.annotate_jvms(child, AnnotationKind::LockElision, lock_text(child));
                }
                "hot_throw" => {
                    self.annotate_jvms(child, AnnotationKind::HotThrow, throw_text(child));
                }
                name if IGNORED_TAGS.contains(&name) => {}
                name => self.unhandled(name),
            }
        }
    }

    fn walk_top_level_parse(&mut self, parse: &Tag) {
        let method_id = parse.attribute("method");

        if self.root_method_id.is_none() {
            self.root_method_id = method_id.map(str::to_string);
            self.root.method_id = self.root_method_id.clone();
            if let Some(name) = method_id.and_then(|id| self.dictionary.method_name(id)) {
                self.root.member_name = name;
            }
            self.walk_parse(parse, &[]);
            return;
        }

        if let Some(path) = self.pending_late.take() {
            self.walk_parse(parse, &path);
            return;
        }

        if method_id.is_some() && method_id == self.root_method_id.as_deref() {
            // C1 may parse the root again in a later phase
            self.walk_parse(parse, &[]);
            return;
        }

        self.report(
            DiagnosticSeverity::Warning,
            DiagnosticCategory::Resolution,
            format!(
                "parse of method {} outside any call site",
                method_id.unwrap_or("?")
            ),
        );
        let node = self.make_node(method_id, None, true, None);
        self.root.children.push(node);
        let index = self.root.children.len() - 1;
        self.walk_parse(parse, &[index]);
    }

    /// Walks a `parse` body into the node at `path`.
    fn walk_parse(&mut self, parse: &Tag, path: &[usize]) {
        let method_id = parse.attribute("method").map(str::to_string);
        self.walk_parse_children(parse, path, method_id.as_deref());
    }

    fn walk_parse_children(&mut self, parse: &Tag, path: &[usize], method_id: Option<&str>) {
        let mut bci: Option<u32> = None;
        let mut pending: Option<PendingCall> = None;

        for child in parse.children() {
            match child.name() {
                "type" | "klass" | "method" => {
                    self.dictionary.add(child);
                }
                "bc" => bci = child.attribute_u32("bci"),
                "call" => {
                    if let Some(dropped) = pending.take().filter(|call| call.node.is_none()) {
                        trace!(method = ?dropped.method_id, "dropping undecided call");
                    }
                    pending = Some(PendingCall {
                        method_id: child.attribute("method").map(str::to_string),
                        bci,
                        node: None,
                    });
                }
                "inline_success" | "inline_fail" => {
                    let inlined = child.name() == "inline_success";
                    let Some(call) = pending.as_mut() else {
                        trace!(tag = child.name(), "inlining decision without a call");
                        continue;
                    };
                    let reason = child.attribute("reason");
                    let node = self.make_node(call.method_id.as_deref(), call.bci, inlined, reason);
                    let text = match reason {
                        Some(reason) => format!("{}: {}", node.member_name, reason),
                        None => node.member_name.clone(),
                    };
                    call.node = self.add_child(path, node);

                    let kind = if inlined {
                        AnnotationKind::InlineSuccess
                    } else {
                        AnnotationKind::InlineFail
                    };
                    let call_bci = call.bci;
                    self.annotate(method_id, call_bci, kind, text);
                }
                "direct_call" => {
                    if let Some(call) = pending.as_mut().filter(|call| call.node.is_none()) {
                        let node = self.make_node(
                            call.method_id.as_deref(),
                            call.bci,
                            false,
                            child.attribute("reason"),
                        );
                        call.node = self.add_child(path, node);
                    }
                }
                "intrinsic" => {
                    let Some(call) = pending.as_mut() else {
                        continue;
                    };
                    let id = child.attribute("id").unwrap_or("intrinsic").to_string();
                    match call.node {
                        Some(index) => {
                            if let Some(node) = self.child_mut(path, index) {
                                node.intrinsic = true;
                                node.inlined = true;
                            }
                        }
                        None => {
                            let mut node =
                                self.make_node(call.method_id.as_deref(), call.bci, true, None);
                            node.intrinsic = true;
                            call.node = self.add_child(path, node);
                        }
                    }
                    let call_bci = call.bci;
                    self.annotate(method_id, call_bci, AnnotationKind::IntrinsicUsed, id);
                }
                "parse" => {
                    let callee = child.attribute("method");
                    let decided = pending
                        .take()
                        .filter(|call| call.method_id.as_deref() == callee)
                        .and_then(|call| call.node);
                    let index = match decided {
                        Some(index) => index,
                        None => self.body_node(path, callee),
                    };
                    let mut child_path = path.to_vec();
                    child_path.push(index);
                    self.walk_parse(child, &child_path);
                }
                "phase" => self.walk_parse_children(child, path, method_id),
                "late_inline" => self.splice_late_inline(child),
                "branch" => self.annotate(method_id, bci, AnnotationKind::Branch, branch_text(child)),
                "uncommon_trap" => {
                    let text = trap_text(child);
                    if child.first_named_child("jvms").is_some() {
                        self.annotate_jvms(child, AnnotationKind::UncommonTrap, text);
                    } else {
                        let trap_bci = child.attribute_u32("bci").or(bci);
                        self.annotate(method_id, trap_bci, AnnotationKind::UncommonTrap, text);
                    }
                }
                "hot_throw" => self.annotate(method_id, bci, AnnotationKind::HotThrow, throw_text(child)),
                "eliminate_allocation" => {
                    let text = self.allocation_text(child);
                    self.annotate_jvms(child, AnnotationKind::EliminatedAllocation, text);
                }
                "eliminate_lock" => {
                    self.annotate_jvms(child, AnnotationKind::LockElision, lock_text(child));
                }
                name if IGNORED_TAGS.contains(&name) => {}
                name => self.unhandled(name),
            }
        }

        if let Some(call) = pending.filter(|call| call.node.is_none()) {
            trace!(method = ?call.method_id, "dropping undecided call");
        }
    }

    /// Index of the node a `parse` without a matching decision belongs to: the last inlined
    /// child for that method, or a new inlined child.
    fn body_node(&mut self, path: &[usize], callee: Option<&str>) -> usize {
        let existing = self.root.node_at_mut(path).and_then(|parent| {
            parent
                .children
                .iter()
                .rposition(|c| c.inlined && c.method_id.is_some() && c.method_id.as_deref() == callee)
        });
        if let Some(index) = existing {
            return index;
        }
        let node = self.make_node(callee, None, true, None);
        self.add_child(path, node).unwrap_or_default()
    }

    /// Splices a `late_inline` into the tree along its `jvms` chain.
    fn splice_late_inline(&mut self, late: &Tag) {
        if !self.walker.splice_late_inlines {
            trace!("late inline splicing disabled");
            return;
        }

        let callee = late.attribute("method");
        // innermost first, reversed to walk down from the root
        let chain: Vec<(Option<&str>, Option<u32>)> = late
            .named_children("jvms")
            .map(|jvms| (jvms.attribute("method"), jvms.attribute_u32("bci")))
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        let Some(&(_, call_bci)) = chain.last() else {
            self.report(
                DiagnosticSeverity::Warning,
                DiagnosticCategory::Resolution,
                format!("late inline of method {} without jvms", callee.unwrap_or("?")),
            );
            return;
        };

        let mut path = Vec::new();
        let mut complete = chain
            .first()
            .is_some_and(|(method, _)| method.is_some() && *method == self.root_method_id.as_deref());
        for step in chain.windows(2) {
            let (_, caller_bci) = step[0];
            let (method, _) = step[1];
            let Some(node) = self.root.node_at_mut(&path) else {
                complete = false;
                break;
            };
            let next = node.children.iter().position(|c| {
                c.inlined && c.method_id.is_some() && c.method_id.as_deref() == method && c.bci == caller_bci
            });
            match next {
                Some(index) => path.push(index),
                None => {
                    complete = false;
                    break;
                }
            }
        }
        if !complete {
            self.report(
                DiagnosticSeverity::Warning,
                DiagnosticCategory::Resolution,
                format!(
                    "late inline of method {} attached at depth {}: jvms chain not found",
                    callee.unwrap_or("?"),
                    path.len()
                ),
            );
        }

        let mut node = self.make_node(callee, call_bci, true, late.attribute("reason"));
        node.late_inline = true;
        let Some(parent) = self.root.node_at_mut(&path) else {
            return;
        };
        let existing = callee.and_then(|id| parent.child_at(id, call_bci));
        let index = match existing {
            Some(index) => {
                let call = &mut parent.children[index];
                call.inlined = true;
                call.late_inline = true;
                if node.reason.is_some() {
                    call.reason = node.reason;
                }
                index
            }
            None => {
                parent.children.push(node);
                parent.children.len() - 1
            }
        };
        path.push(index);

        if let Some(caller) = chain.last().and_then(|(method, _)| *method) {
            let name = self
                .dictionary
                .method_name(callee.unwrap_or_default())
                .unwrap_or_else(|| format!("method {}", callee.unwrap_or("?")));
            self.annotate(
                Some(caller),
                call_bci,
                AnnotationKind::InlineSuccess,
                format!("{}: late inline", name),
            );
        }

        match late.first_named_child("parse") {
            Some(parse) => self.walk_parse(parse, &path),
            None => self.pending_late = Some(path),
        }
    }

    fn make_node(
        &self,
        method_id: Option<&str>,
        bci: Option<u32>,
        inlined: bool,
        reason: Option<&str>,
    ) -> CompileNode {
        let signature =
            method_id.and_then(|id| MemberSignatureParts::from_dictionary(&self.dictionary, id));
        let member_name = match &signature {
            Some(signature) => signature.qualified_name(),
            None => format!("method {}", method_id.unwrap_or("?")),
        };
        let member = signature
            .as_ref()
            .and_then(|s| self.walker.resolve(s, self.compile_id));

        CompileNode {
            member_name,
            method_id: method_id.map(str::to_string),
            member,
            signature,
            bci,
            inlined,
            reason: reason.map(str::to_string),
            ..CompileNode::default()
        }
    }

    fn add_child(&mut self, path: &[usize], node: CompileNode) -> Option<usize> {
        let parent = self.root.node_at_mut(path)?;
        parent.children.push(node);
        Some(parent.children.len() - 1)
    }

    fn child_mut(&mut self, path: &[usize], index: usize) -> Option<&mut CompileNode> {
        self.root.node_at_mut(path)?.children.get_mut(index)
    }

    /// The annotation list of `method_id`: `None` for the compiled method itself.
    ///
    /// Returns `Err(())` if the method cannot be resolved through the dictionary.
    fn target(&self, method_id: Option<&str>) -> std::result::Result<Option<AnnotationTarget>, ()> {
        let Some(id) = method_id else {
            return Ok(None);
        };
        if Some(id) == self.root_method_id.as_deref() {
            return Ok(None);
        }
        let signature = MemberSignatureParts::from_dictionary(&self.dictionary, id).ok_or(())?;
        let member = self
            .walker
            .inventory
            .and_then(|inventory| inventory.find_member(&signature, self.walker.allow_assignable));
        Ok(Some(match member {
            Some(member) => AnnotationTarget::Member(member),
            None => AnnotationTarget::Signature(signature.canonical()),
        }))
    }

    fn annotate(&mut self, method_id: Option<&str>, bci: Option<u32>, kind: AnnotationKind, text: String) {
        let Some(bci) = bci else {
            trace!(%kind, "annotation without a bytecode offset");
            return;
        };
        match self.target(method_id) {
            Ok(target) => self
                .annotations
                .list_mut(target)
                .add(bci, BytecodeAnnotation::new(kind, text)),
            Err(()) => self.report(
                DiagnosticSeverity::Warning,
                DiagnosticCategory::Resolution,
                format!(
                    "{} at bci {} refers to unknown method id {}",
                    kind,
                    bci,
                    method_id.unwrap_or("?")
                ),
            ),
        }
    }

    /// Annotates the innermost `jvms` entry of `tag`.
    fn annotate_jvms(&mut self, tag: &Tag, kind: AnnotationKind, text: String) {
        match tag.first_named_child("jvms") {
            Some(jvms) => {
                let method = jvms.attribute("method").map(str::to_string);
                self.annotate(method.as_deref(), jvms.attribute_u32("bci"), kind, text);
            }
            None => trace!(%kind, "annotation without jvms"),
        }
    }

    fn allocation_text(&self, tag: &Tag) -> String {
        match tag.attribute("type") {
            Some(id) => format!(
                "type={}",
                self.dictionary
                    .type_name(id)
                    .unwrap_or_else(|| id.to_string())
            ),
            None => "allocation".to_string(),
        }
    }

    fn unhandled(&self, name: &str) {
        trace!(tag = name, "unhandled tag in task");
        self.walker.diagnostics.unhandled_tag(name, Some(self.compile_id));
    }

    fn report(&self, severity: DiagnosticSeverity, category: DiagnosticCategory, message: String) {
        self.walker.report(severity, category, self.compile_id, message);
    }
}

/// `key=value` for each of `keys` present on `tag`.
fn describe(tag: &Tag, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| tag.attribute(key).map(|value| format!("{}={}", key, value)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn branch_text(tag: &Tag) -> String {
    describe(tag, &["target_bci", "taken", "not_taken", "cnt", "prob"])
}

fn trap_text(tag: &Tag) -> String {
    describe(tag, &["reason", "action", "comment"])
}

fn lock_text(tag: &Tag) -> String {
    match describe(tag, &["lock", "kind"]) {
        text if text.is_empty() => "lock".to_string(),
        text => text,
    }
}

fn throw_text(tag: &Tag) -> String {
    describe(tag, &["preallocated", "reason"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::MetaClass,
        tags::TagProcessor,
        test::logs::{C1_HIR_TASK, CHAIN_TASK, LATE_INLINE_TASK},
    };

    fn task(log: &str) -> Tag {
        let mut processor = TagProcessor::new();
        log.lines()
            .find_map(|line| processor.process_line(line))
            .unwrap()
    }

    #[test]
    fn inlining_chain() {
        let diagnostics = Diagnostics::new();
        let analysis = CompileChainWalker::new(&diagnostics)
            .walk(&task(CHAIN_TASK))
            .unwrap();

        let a = &analysis.root;
        assert_eq!(a.member_name, "demo.Chain::a");
        assert_eq!(a.children.len(), 2);

        let b = &a.children[0];
        assert_eq!(b.member_name, "demo.Chain::b");
        assert!(b.inlined);
        assert_eq!(b.bci, Some(1));
        assert_eq!(b.children.len(), 1);
        assert_eq!(b.children[0].member_name, "demo.Chain::c");
        assert!(b.children[0].inlined);

        let d = &a.children[1];
        assert_eq!(d.member_name, "demo.Chain::d");
        assert!(!d.inlined);
        assert_eq!(d.reason.as_deref(), Some("too big"));
        assert!(d.children.is_empty());

        assert_eq!(analysis.compilation.compile_id, 12);
        assert_eq!(analysis.dictionary.methods, 4);
        assert_eq!(diagnostics.unhandled_tag_count(), 1);
    }

    #[test]
    fn c1_parse_hir_phase() {
        let diagnostics = Diagnostics::new();
        let analysis = CompileChainWalker::new(&diagnostics)
            .walk(&task(C1_HIR_TASK))
            .unwrap();

        let a = &analysis.root;
        assert_eq!(a.member_name, "demo.Hir::a");
        assert_eq!(a.children.len(), 2);

        let abs = &a.children[0];
        assert_eq!(abs.member_name, "java.lang.Math::abs");
        assert!(abs.intrinsic);
        assert!(abs.inlined);
        assert_eq!(abs.bci, Some(1));

        let b = &a.children[1];
        assert_eq!(b.member_name, "demo.Hir::b");
        assert!(b.inlined);
        assert_eq!(b.bci, Some(6));

        let root = &analysis.annotations.root;
        assert!(root.has_kind_at(1, AnnotationKind::IntrinsicUsed));
        assert!(root.has_kind_at(6, AnnotationKind::InlineSuccess));
        assert!(root.has_kind_at(10, AnnotationKind::Branch));
        assert_eq!(analysis.compilation.compile_id, 41);
        assert_eq!(diagnostics.unhandled_tag_count(), 0);
    }

    #[test]
    fn annotations_per_member() {
        let diagnostics = Diagnostics::new();
        let analysis = CompileChainWalker::new(&diagnostics)
            .walk(&task(CHAIN_TASK))
            .unwrap();

        let root = &analysis.annotations.root;
        assert!(root.has_kind_at(1, AnnotationKind::InlineSuccess));
        assert!(root.has_kind_at(9, AnnotationKind::InlineFail));
        assert!(root.has_kind_at(14, AnnotationKind::Branch));
        assert!(root.has_kind_at(14, AnnotationKind::UncommonTrap));
        assert_eq!(
            root.at(14)[0].text,
            "target_bci=20 taken=0 not_taken=512 cnt=512 prob=never"
        );

        // b is not in any inventory, so its list is keyed by signature
        let b = analysis
            .annotations
            .inlined
            .iter()
            .find(|(target, _)| {
                matches!(target, AnnotationTarget::Signature(s) if s.member_name == "b")
            })
            .map(|(_, list)| list)
            .unwrap();
        assert!(b.has_kind_at(3, AnnotationKind::InlineSuccess));
        assert!(b.has_kind_at(7, AnnotationKind::EliminatedAllocation));
        assert_eq!(b.at(7)[0].text, "type=demo.Point");
    }

    #[test]
    fn resolves_against_inventory() {
        let mut inventory = ClassInventory::new();
        let mut chain = MetaClass::new("demo.Chain");
        for declaration in [
            "public int demo.Chain.a(int)",
            "private int demo.Chain.b(int)",
            "private int demo.Chain.c(int)",
        ] {
            chain.add_member(MemberSignatureParts::from_reflection(declaration).unwrap());
        }
        inventory.add_class(chain);

        let diagnostics = Diagnostics::new();
        let analysis = CompileChainWalker::new(&diagnostics)
            .with_inventory(&inventory)
            .walk(&task(CHAIN_TASK))
            .unwrap();

        assert_eq!(analysis.root_member, Some(MemberRef::new(0, 0)));
        assert_eq!(analysis.root.children[0].member, Some(MemberRef::new(0, 1)));
        assert!(analysis.annotations.for_member(MemberRef::new(0, 1)).is_some());
        // d is missing from the inventory
        assert_eq!(analysis.root.children[1].member, None);
        assert_eq!(diagnostics.unresolved_count(), 1);
    }

    #[test]
    fn late_inline_is_spliced() {
        let diagnostics = Diagnostics::new();
        let analysis = CompileChainWalker::new(&diagnostics)
            .walk(&task(LATE_INLINE_TASK))
            .unwrap();

        let b = &analysis.root.children[0];
        assert_eq!(b.member_name, "demo.Late::b");
        let c = &b.children[0];
        assert_eq!(c.member_name, "demo.Late::c");
        assert!(c.inlined);
        assert!(c.late_inline);
        assert_eq!(c.bci, Some(4));
        assert_eq!(c.children[0].member_name, "demo.Late::d");
        assert_eq!(diagnostics.unresolved_count(), 0);
    }

    #[test]
    fn late_inline_splicing_can_be_disabled() {
        let diagnostics = Diagnostics::new();
        let config = ParseConfig::new().with_late_inline_splicing(false);
        let analysis = CompileChainWalker::new(&diagnostics)
            .with_config(&config)
            .walk(&task(LATE_INLINE_TASK))
            .unwrap();

        let c = &analysis.root.children[0].children[0];
        assert!(!c.inlined);
        assert!(c.children.is_empty());
    }

    #[test]
    fn rejects_non_tasks() {
        let diagnostics = Diagnostics::new();
        let walker = CompileChainWalker::new(&diagnostics);
        assert!(walker.walk(&Tag::new("nmethod")).is_err());
    }
}
