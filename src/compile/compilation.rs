use std::fmt;

use strum::Display;

use crate::{signature::MemberSignatureParts, tags::Tag, Result};

/// Whether a compilation replaces a whole method or enters a running loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum CompileKind {
    /// A normal method compilation
    #[default]
    #[strum(to_string = "standard")]
    Standard,
    /// An on-stack-replacement compilation entering at a loop back-edge
    #[strum(to_string = "osr")]
    Osr,
}

/// The `task_done` record closing a task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDone {
    /// `success='1'`
    pub success: bool,
    /// Size of the generated nmethod
    pub nmethod_size: Option<u32>,
    /// Bytes of bytecode inlined into the method
    pub inlined_bytes: Option<u32>,
    /// Completion time stamp in seconds
    pub stamp: Option<f64>,
}

/// One compilation task, from the attributes of its `task` tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Compilation {
    /// Task number, unique within a VM run
    pub compile_id: u32,
    /// `c1`, `c2`, or absent for older logs
    pub compiler: Option<String>,
    /// Tier level
    pub level: Option<u32>,
    /// Standard or OSR
    pub kind: CompileKind,
    /// Compiled method in the log's internal form, `pkg/Cls name (desc)ret`
    pub method: String,
    /// Size of the method's bytecode
    pub bytes: Option<u32>,
    /// Invocation count at compile time
    pub count: Option<u32>,
    /// Back-edge count at compile time
    pub backedge_count: Option<u32>,
    /// Start time stamp in seconds
    pub stamp: Option<f64>,
    /// Entry offset of an OSR compilation
    pub osr_bci: Option<u32>,
    /// Outcome, absent for truncated logs
    pub outcome: Option<TaskDone>,
    /// Reason of a `failure` tag inside the task
    pub failure: Option<String>,
}

impl Compilation {
    /// Reads the compilation record of a `task` tag.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if `task` is not a `task` tag or lacks a numeric
    /// `compile_id` or a `method`.
    pub fn from_task(task: &Tag) -> Result<Self> {
        if task.name() != "task" {
            return Err(malformed_error!("expected a task tag, found '{}'", task.name()));
        }
        let compile_id = task
            .attribute_u32("compile_id")
            .ok_or_else(|| malformed_error!("task without compile_id"))?;
        let method = task
            .attribute("method")
            .ok_or_else(|| malformed_error!("task {} without method", compile_id))?
            .to_string();

        let osr_bci = task.attribute_u32("osr_bci");
        let kind = if task.attribute("compile_kind") == Some("osr") || osr_bci.is_some() {
            CompileKind::Osr
        } else {
            CompileKind::Standard
        };

        let outcome = task.first_named_child("task_done").map(|done| TaskDone {
            success: done.attribute("success") == Some("1"),
            nmethod_size: done.attribute_u32("nmsize"),
            inlined_bytes: done.attribute_u32("inlined_bytes"),
            stamp: done.attribute_f64("stamp"),
        });

        let failure = task
            .first_named_descendant("failure")
            .and_then(|f| f.attribute("reason"))
            .map(str::to_string);

        Ok(Compilation {
            compile_id,
            compiler: task.attribute("compiler").map(str::to_string),
            level: task.attribute_u32("level"),
            kind,
            method,
            bytes: task.attribute_u32("bytes"),
            count: task.attribute_u32("count"),
            backedge_count: task.attribute_u32("backedge_count"),
            stamp: task.attribute_f64("stamp"),
            osr_bci,
            outcome,
            failure,
        })
    }

    /// True if the task finished with `success='1'`.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.outcome.as_ref().is_some_and(|o| o.success)
    }

    /// Seconds between the task start and its `task_done`.
    #[must_use]
    pub fn duration(&self) -> Option<f64> {
        let end = self.outcome.as_ref()?.stamp?;
        Some(end - self.stamp?)
    }

    /// Decomposes [`Compilation::method`].
    ///
    /// # Errors
    /// Returns [`crate::Error::Signature`] if the method text cannot be decomposed.
    pub fn signature(&self) -> Result<MemberSignatureParts> {
        MemberSignatureParts::from_log_signature(&self.method)
    }
}

impl fmt::Display for Compilation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.compile_id)?;
        if let Some(compiler) = &self.compiler {
            write!(f, " {}", compiler)?;
        }
        if let Some(level) = self.level {
            write!(f, " tier{}", level)?;
        }
        if self.kind == CompileKind::Osr {
            write!(f, " osr@{}", self.osr_bci.unwrap_or_default())?;
        }
        write!(f, " {}", self.method)
    }
}
