//! Compilation tasks: their attributes, inlining trees and bytecode annotations.
//!
//! A `task` tag of the compiler log describes one compilation. Its subtree interleaves three
//! kinds of information:
//!
//! - **Dictionary entries** (`type`, `klass`, `method`) that later tags refer to by id
//! - **Parse structure** (`parse`, `bc`, `call`, `inline_success`, `inline_fail`, …) that
//!   spells out which calls were inlined where
//! - **Optimization events** (`branch`, `uncommon_trap`, `eliminate_allocation`, …) tied to a
//!   bytecode offset of some method in the inlining tree
//!
//! [`CompileChainWalker`] turns a task into a [`TaskAnalysis`]: the [`Compilation`] record, the
//! [`CompileNode`] tree and the [`MemberAnnotations`] of every member involved. Tasks are
//! independent of each other, so [`analyze_tasks`] walks them in parallel, and
//! [`attach_analysis`] folds the results into a [`ClassInventory`].

mod annotation;
mod compilation;
mod dictionary;
mod node;
mod walker;

pub use annotation::{
    AnnotationKind, AnnotationTarget, BytecodeAnnotation, BytecodeAnnotationList,
    MemberAnnotations,
};
pub use compilation::{Compilation, CompileKind, TaskDone};
pub use dictionary::{DictionaryStats, ParseDictionary};
pub use node::CompileNode;
pub use walker::{CompileChainWalker, TaskAnalysis};

use std::collections::BTreeMap;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::{
    config::ParseConfig,
    diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticSeverity, Diagnostics},
    model::{ClassInventory, MemberRef},
    tags::Tag,
};

/// Walks every task of `tasks` in parallel.
///
/// Tags that are not walkable tasks are reported to `diagnostics` and skipped. The result
/// keeps the order of `tasks`.
#[must_use]
pub fn analyze_tasks(
    tasks: &[Tag],
    inventory: &ClassInventory,
    config: &ParseConfig,
    diagnostics: &Diagnostics,
) -> Vec<TaskAnalysis> {
    let walker = CompileChainWalker::new(diagnostics)
        .with_config(config)
        .with_inventory(inventory);

    let analyses: Vec<TaskAnalysis> = tasks
        .par_iter()
        .filter_map(|task| match walker.walk(task) {
            Ok(analysis) => Some(analysis),
            Err(error) => {
                diagnostics.push(Diagnostic::new(
                    DiagnosticSeverity::Error,
                    DiagnosticCategory::General,
                    error.to_string(),
                ));
                None
            }
        })
        .collect();

    info!(tasks = tasks.len(), analyzed = analyses.len(), "analyzed compilation tasks");
    analyses
}

/// Attaches compilations and annotations to the members of `inventory`.
///
/// The compiled member of each analysis receives the [`Compilation`] and its own annotation
/// list under the task's compile id. Inlined members that resolve to the inventory receive
/// their lists under the same compile id. Lists are rebuilt from `analyses` and replace what
/// an earlier attach recorded for that member and compile id, as does a compilation with the
/// same compile id. Returns the number of analyses whose compiled member was found.
pub fn attach_analysis(inventory: &mut ClassInventory, analyses: &[TaskAnalysis]) -> usize {
    let mut lists: BTreeMap<(MemberRef, u32), BytecodeAnnotationList> = BTreeMap::new();
    let mut attached = 0;

    for analysis in analyses {
        let compile_id = analysis.compilation.compile_id;

        match analysis.root_member {
            Some(reference) if inventory.member(reference).is_some() => {
                lists
                    .entry((reference, compile_id))
                    .or_default()
                    .merge(&analysis.annotations.root);
                if let Some(member) = inventory.member_mut(reference) {
                    member.record_compilation(analysis.compilation.clone());
                }
                attached += 1;
            }
            _ => {
                debug!(compile_id, method = %analysis.compilation.method, "compiled member not in inventory");
            }
        }

        for (target, list) in &analysis.annotations.inlined {
            if let AnnotationTarget::Member(reference) = target {
                if inventory.member(*reference).is_some() {
                    lists.entry((*reference, compile_id)).or_default().merge(list);
                }
            }
        }
    }

    for ((reference, compile_id), list) in lists {
        if let Some(member) = inventory.member_mut(reference) {
            member.annotations.insert(compile_id, list);
        }
    }
    attached
}
