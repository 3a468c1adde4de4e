//! Orchestration of one compiler log.
//!
//! A [`LogSession`] receives lines that an external splitter has already sorted into header
//! lines, tag lines and disassembly lines. It runs them through [`TagProcessor`] and
//! [`AssemblyProcessor`], keeps the top-level tags the model cares about, and hands out a
//! [`ParsedLog`] at the end. Analysis and attachment to a [`ClassInventory`] are separate steps,
//! so the same parsed log can be analyzed against different inventories.
//!
//! # Examples
//!
//! ```rust
//! use jitscope::diagnostics::Diagnostics;
//! use jitscope::model::{ClassInventory, MetaClass};
//! use jitscope::session::LogSession;
//! use jitscope::signature::MemberSignatureParts;
//!
//! let diagnostics = Diagnostics::new();
//! let mut session = LogSession::new(&diagnostics);
//! for line in [
//!     "<task compile_id='7' compiler='c1' level='3' method='demo/Calc add (II)I'>",
//!     "<task_done success='1' nmsize='112'/>",
//!     "</task>",
//!     "<nmethod compile_id='7' compiler='c1' level='3' address='0x7f0010' size='400'/>",
//! ] {
//!     session.process_tag_line(line);
//! }
//! let log = session.finish();
//! assert_eq!(log.tasks.len(), 1);
//! assert_eq!(log.nmethod(7).unwrap().size, Some(400));
//!
//! let mut calc = MetaClass::new("demo.Calc");
//! calc.add_member(MemberSignatureParts::from_reflection("public int demo.Calc.add(int,int)")?);
//! let mut inventory = ClassInventory::new();
//! inventory.add_class(calc);
//!
//! let summary = log.attach(&mut inventory, &diagnostics);
//! assert_eq!(summary.compilations, 1);
//! # Ok::<(), jitscope::Error>(())
//! ```

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::{
    assembly::{Architecture, AssemblyMethod, AssemblyProcessor},
    compile::{analyze_tasks, attach_analysis, TaskAnalysis},
    config::ParseConfig,
    diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticSeverity, Diagnostics},
    model::ClassInventory,
    tags::{Tag, TagProcessor},
    Error, Result,
};

/// What the log says about the VM that wrote it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogHeader {
    /// VM name, e.g. `OpenJDK 64-Bit Server VM`
    pub vm_name: Option<String>,
    /// VM release, e.g. `21.0.2+13`
    pub vm_release: Option<String>,
    /// Command line arguments of the VM
    pub vm_arguments: Option<String>,
    /// Architecture of the disassembly banner, if one was printed before the first method
    pub architecture: Option<Architecture>,
    /// Header lines, in the order received
    pub lines: Vec<String>,
}

impl LogHeader {
    /// Records one header line.
    pub fn add_line(&mut self, line: &str) {
        if let Some(architecture) = Architecture::from_banner(line.trim()) {
            self.architecture.get_or_insert(architecture);
        }
        self.lines.push(line.to_string());
    }

    /// Takes the VM identity from a `vm_version` or `vm_arguments` tag. Returns false for other
    /// tags.
    pub fn add_tag(&mut self, tag: &Tag) -> bool {
        let child_text = |name: &str| {
            tag.first_named_child(name)
                .and_then(Tag::text)
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
        };
        match tag.name() {
            "vm_version" => {
                self.vm_name = child_text("name");
                self.vm_release = child_text("release");
                true
            }
            "vm_arguments" => {
                self.vm_arguments = child_text("args");
                true
            }
            _ => false,
        }
    }
}

/// A top-level `nmethod` tag: where the code of a compilation was installed.
#[derive(Debug, Clone, PartialEq)]
pub struct NMethodRecord {
    /// Compile id of the task that produced the code
    pub compile_id: u32,
    /// Compiler name
    pub compiler: Option<String>,
    /// Tier level
    pub level: Option<u32>,
    /// Start of the nmethod
    pub address: Option<u64>,
    /// First instruction, `code_begin` or `address + insts_offset`
    pub entry_address: Option<u64>,
    /// Total nmethod size in bytes
    pub size: Option<u32>,
    /// Log timestamp in seconds
    pub stamp: Option<f64>,
}

impl NMethodRecord {
    /// Reads an `nmethod` tag.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if the tag is not an `nmethod` or has no compile id.
    pub fn from_tag(tag: &Tag) -> Result<Self> {
        if tag.name() != "nmethod" {
            return Err(malformed_error!("expected <nmethod>, found <{}>", tag.name()));
        }
        let compile_id = tag
            .attribute_u32("compile_id")
            .ok_or_else(|| malformed_error!("<nmethod> without compile_id"))?;

        let address = tag.attribute_hex("address");
        let entry_address = tag.attribute_hex("code_begin").or_else(|| {
            let offset = tag.attribute_u32("insts_offset")?;
            address.map(|a| a + u64::from(offset))
        });

        Ok(NMethodRecord {
            compile_id,
            compiler: tag.attribute("compiler").map(str::to_string),
            level: tag.attribute_u32("level"),
            address,
            entry_address,
            size: tag.attribute_u32("size"),
            stamp: tag.attribute_f64("stamp"),
        })
    }

    /// True if `address` lies inside the nmethod.
    #[must_use]
    pub fn contains(&self, address: u64) -> bool {
        match (self.address, self.size) {
            (Some(start), Some(size)) => address >= start && address < start + u64::from(size),
            _ => false,
        }
    }
}

/// Feeds the lines of one log through the parsers.
pub struct LogSession<'a> {
    diagnostics: &'a Diagnostics,
    config: ParseConfig,
    tags: TagProcessor,
    assembly: AssemblyProcessor,
    header: LogHeader,
    tasks: Vec<Tag>,
    nmethods: Vec<NMethodRecord>,
    tag_counts: BTreeMap<String, usize>,
}

impl<'a> LogSession<'a> {
    /// Creates a session with the default configuration.
    #[must_use]
    pub fn new(diagnostics: &'a Diagnostics) -> Self {
        Self::with_config(diagnostics, ParseConfig::default())
    }

    /// Creates a session using `config` for every stage.
    #[must_use]
    pub fn with_config(diagnostics: &'a Diagnostics, config: ParseConfig) -> Self {
        LogSession {
            diagnostics,
            tags: TagProcessor::with_config(&config),
            assembly: AssemblyProcessor::with_config(&config),
            config,
            header: LogHeader::default(),
            tasks: Vec::new(),
            nmethods: Vec::new(),
            tag_counts: BTreeMap::new(),
        }
    }

    /// Consumes a line of the log header.
    pub fn process_header_line(&mut self, line: &str) {
        self.header.add_line(line);
    }

    /// Consumes a line of the tag dialect.
    pub fn process_tag_line(&mut self, line: &str) {
        let mut next = self.tags.process_line(line);
        while let Some(tag) = next {
            self.accept(tag);
            next = self.tags.next_completed();
        }
    }

    /// Consumes a line of native code disassembly.
    pub fn process_assembly_line(&mut self, line: &str) {
        self.assembly.process_line(line);
    }

    /// Flushes both parsers and returns what was collected.
    #[must_use]
    pub fn finish(mut self) -> ParsedLog {
        for tag in self.tags.finish() {
            self.accept(tag);
        }

        let repairs = self.tags.repair_count();
        if repairs > 0 {
            self.diagnostics.push(Diagnostic::new(
                DiagnosticSeverity::Info,
                DiagnosticCategory::Fragment,
                format!("re-joined {} split tag lines", repairs),
            ));
        }

        let dropped = self.tags.dropped_fragment_count();
        if dropped > 0 {
            self.diagnostics.push(Diagnostic::new(
                DiagnosticSeverity::Warning,
                DiagnosticCategory::Fragment,
                format!("dropped {} split tag lines without continuation", dropped),
            ));
        }

        let assembly = self.assembly.finish();
        info!(
            tasks = self.tasks.len(),
            nmethods = self.nmethods.len(),
            assembly = assembly.len(),
            repairs,
            "finished log"
        );

        ParsedLog {
            fragment_seen: self.tags.fragment_seen(),
            repair_count: repairs,
            dropped_fragment_count: dropped,
            stray_close_count: self.tags.stray_close_count(),
            header: self.header,
            tasks: self.tasks,
            nmethods: self.nmethods,
            assembly,
            tag_counts: self.tag_counts,
            config: self.config,
        }
    }

    fn accept(&mut self, tag: Tag) {
        *self.tag_counts.entry(tag.name().to_string()).or_default() += 1;

        if !tag.is_complete() {
            self.diagnostics.push(
                Diagnostic::new(
                    DiagnosticSeverity::Warning,
                    DiagnosticCategory::Fragment,
                    format!("<{}> was not closed before the end of the log", tag.name()),
                )
                .with_tag(tag.name()),
            );
        }

        match tag.name() {
            "task" => self.tasks.push(tag),
            "nmethod" => match NMethodRecord::from_tag(&tag) {
                Ok(record) => self.nmethods.push(record),
                Err(error) => self.diagnostics.warning(DiagnosticCategory::General, error.to_string()),
            },
            _ if self.header.add_tag(&tag) => {}
            name => debug!(tag = name, "skipping top-level tag"),
        }
    }
}

/// Everything collected from one log.
#[derive(Debug, Clone)]
pub struct ParsedLog {
    /// VM identity and header lines
    pub header: LogHeader,
    /// `task` tags in log order
    pub tasks: Vec<Tag>,
    /// `nmethod` records in log order
    pub nmethods: Vec<NMethodRecord>,
    /// Disassembled methods in log order
    pub assembly: Vec<AssemblyMethod>,
    /// True if any tag line had to be re-joined
    pub fragment_seen: bool,
    /// Number of re-joined tag lines
    pub repair_count: usize,
    /// Number of split tag lines discarded for lack of a continuation
    pub dropped_fragment_count: usize,
    /// Number of close markers without an open tag
    pub stray_close_count: usize,
    /// Number of top-level tags per name
    pub tag_counts: BTreeMap<String, usize>,
    config: ParseConfig,
}

/// Result of [`ParsedLog::attach`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttachSummary {
    /// Tasks analyzed
    pub analyzed: usize,
    /// Compilations attached to their member
    pub compilations: usize,
    /// Disassembled methods attached to their member
    pub assembly: usize,
    /// Disassembled methods without a matching member
    pub unmatched_assembly: usize,
}

impl ParsedLog {
    /// The task with `compile_id`.
    #[must_use]
    pub fn task(&self, compile_id: u32) -> Option<&Tag> {
        self.tasks
            .iter()
            .find(|t| t.attribute_u32("compile_id") == Some(compile_id))
    }

    /// The `nmethod` record of `compile_id`.
    #[must_use]
    pub fn nmethod(&self, compile_id: u32) -> Option<&NMethodRecord> {
        self.nmethods.iter().find(|n| n.compile_id == compile_id)
    }

    /// The `nmethod` record whose code contains the entry of `method`.
    #[must_use]
    pub fn nmethod_for_assembly(&self, method: &AssemblyMethod) -> Option<&NMethodRecord> {
        let entry = method.entry_address?;
        self.nmethods.iter().find(|n| n.contains(entry))
    }

    /// Walks every task against `inventory`.
    #[must_use]
    pub fn analyze(&self, inventory: &ClassInventory, diagnostics: &Diagnostics) -> Vec<TaskAnalysis> {
        analyze_tasks(&self.tasks, inventory, &self.config, diagnostics)
    }

    /// Analyzes every task and attaches compilations, annotations and native code to the
    /// members of `inventory`.
    pub fn attach(self, inventory: &mut ClassInventory, diagnostics: &Diagnostics) -> AttachSummary {
        let analyses = self.analyze(inventory, diagnostics);
        let mut summary = AttachSummary {
            analyzed: analyses.len(),
            compilations: attach_analysis(inventory, &analyses),
            ..AttachSummary::default()
        };

        for method in self.assembly {
            match inventory.attach_assembly(method, self.config.allow_assignable_matching) {
                Ok(Some(_)) => summary.assembly += 1,
                Ok(None) => {
                    summary.unmatched_assembly += 1;
                    diagnostics.warning(
                        DiagnosticCategory::Resolution,
                        "disassembled method has no matching member",
                    );
                }
                Err(Error::NotFound(what)) => {
                    summary.unmatched_assembly += 1;
                    debug!(missing = %what, "disassembled method without header");
                }
                Err(error) => {
                    summary.unmatched_assembly += 1;
                    diagnostics.error(DiagnosticCategory::Assembly, error.to_string());
                }
            }
        }

        info!(
            analyzed = summary.analyzed,
            compilations = summary.compilations,
            assembly = summary.assembly,
            "attached log to inventory"
        );
        summary
    }
}
