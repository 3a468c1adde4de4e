use std::{fs, path::PathBuf};

use jitscope::{
    bytecode::{BytecodeLoader, Opcode},
    compile::{AnnotationKind, TaskAnalysis},
    diagnostics::{DiagnosticCategory, Diagnostics},
    model::{ClassInventory, MemberRef},
    session::{AttachSummary, LogSession, ParsedLog},
};

fn sample(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/samples")
        .join(name);
    fs::read_to_string(path).unwrap()
}

fn parse_log(diagnostics: &Diagnostics) -> ParsedLog {
    let mut session = LogSession::new(diagnostics);
    for line in sample("compilation.log").lines() {
        session.process_tag_line(line);
    }
    for line in sample("chain.asm").lines() {
        session.process_assembly_line(line);
    }
    session.finish()
}

fn inventory() -> ClassInventory {
    let class = BytecodeLoader::parse("demo.Chain", sample("Chain.javap").lines(), false).unwrap();
    let mut inventory = ClassInventory::new();
    inventory.add_bytecode(class);
    inventory
}

#[test]
fn compilation_log() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let diagnostics = Diagnostics::new();
    let log = parse_log(&diagnostics);

    verify_parsed(&log, &diagnostics);

    let mut inventory = inventory();
    verify_inventory(&inventory);

    let analyses = log.analyze(&inventory, &diagnostics);
    assert_eq!(analyses.len(), 3);
    verify_c1_task(&analyses[0]);
    verify_c2_task(&analyses[1]);
    verify_late_task(&analyses[2]);
    assert_eq!(diagnostics.unhandled_tag_count(), 0);

    let summary = log.attach(&mut inventory, &diagnostics);
    verify_attachment(&inventory, summary);
}

/// Verify what the session collected from the sample log
fn verify_parsed(log: &ParsedLog, diagnostics: &Diagnostics) {
    assert_eq!(log.header.vm_name.as_deref(), Some("OpenJDK 64-Bit Server VM"));
    assert_eq!(log.header.vm_release.as_deref(), Some("21.0.2+13"));

    // `<call ...` split at an attribute boundary, `<inline_fail reas` mid-token
    assert!(log.fragment_seen);
    assert_eq!(log.repair_count, 2);
    assert_eq!(log.stray_close_count, 0);
    assert_eq!(diagnostics.count_category(DiagnosticCategory::Fragment), 1);

    assert_eq!(log.tasks.len(), 3);
    assert_eq!(log.tag_counts.get("task_queued"), Some(&3));
    assert_eq!(log.tag_counts.get("start_compile_thread"), Some(&2));

    assert_eq!(log.nmethods.len(), 2);
    let c1 = log.nmethod(13).unwrap();
    assert_eq!(c1.compiler.as_deref(), Some("c1"));
    assert_eq!(c1.entry_address, Some(0x7f0a0c4a9010 + 400));
    let c2 = log.nmethod(12).unwrap();
    assert_eq!(c2.entry_address, Some(0x7f0a0c4b2170));

    assert_eq!(log.assembly.len(), 3);
    assert_eq!(log.nmethod_for_assembly(&log.assembly[0]).map(|n| n.compile_id), Some(13));
    assert_eq!(log.nmethod_for_assembly(&log.assembly[1]).map(|n| n.compile_id), Some(12));
    assert!(log.nmethod_for_assembly(&log.assembly[2]).is_none());
}

#[test]
fn reattaching_replaces() {
    let diagnostics = Diagnostics::new();
    let mut inventory = inventory();
    parse_log(&diagnostics).attach(&mut inventory, &diagnostics);
    parse_log(&diagnostics).attach(&mut inventory, &diagnostics);

    let a = inventory.member(MemberRef::new(0, 1)).unwrap();
    assert_eq!(a.compilations.len(), 2);
    assert_eq!(a.assembly.len(), 2);
    assert_eq!(a.annotations_for(12).unwrap().at(14).len(), 2);

    let b = inventory.member(MemberRef::new(0, 2)).unwrap();
    assert_eq!(b.annotations_for(12).unwrap().at(7).len(), 1);
}

/// Verify the inventory built from the bytecode listing
fn verify_inventory(inventory: &ClassInventory) {
    let class = inventory.class("demo.Chain").unwrap();
    let names: Vec<&str> = class
        .members()
        .iter()
        .map(|m| m.signature.member_name.as_str())
        .collect();
    assert_eq!(names, vec!["<init>", "a", "b", "c", "d"]);

    let a = inventory.member(MemberRef::new(0, 1)).unwrap();
    let bytecode = a.bytecode.as_ref().unwrap();
    let branch = bytecode.instruction_at(14).unwrap();
    assert_eq!(branch.opcode, Opcode::Ifeq);
    assert_eq!(branch.branch_target(), Some(20));
    assert_eq!(a.source_line_for_bci(14), Some(7));
}

/// C1 tier 3: `b` inlined, `d` rejected
fn verify_c1_task(analysis: &TaskAnalysis) {
    assert_eq!(analysis.compilation.compile_id, 13);
    assert_eq!(analysis.compilation.level, Some(3));
    assert_eq!(analysis.root_member, Some(MemberRef::new(0, 1)));

    let root = &analysis.root;
    assert_eq!(root.children.len(), 2);
    assert!(root.children[0].inlined);
    assert_eq!(root.children[0].member, Some(MemberRef::new(0, 2)));
    assert!(!root.children[1].inlined);
    assert_eq!(root.children[1].reason.as_deref(), Some("callee is too large"));
}

/// C2 tier 4: a -> [b (inlined) -> c (inlined), d (not inlined)]
fn verify_c2_task(analysis: &TaskAnalysis) {
    assert_eq!(analysis.compilation.compile_id, 12);
    assert!(analysis.compilation.succeeded());
    assert_eq!(analysis.compilation.outcome.as_ref().and_then(|o| o.nmethod_size), Some(208));

    let a = &analysis.root;
    assert_eq!(a.member_name, "demo.Chain::a");
    assert_eq!(a.size(), 4);
    assert_eq!(a.depth(), 3);
    assert_eq!(a.inlined_count(), 2);

    let b = a.child_named("demo.Chain::b").unwrap();
    assert!(b.inlined);
    assert_eq!(b.bci, Some(1));
    assert_eq!(b.member, Some(MemberRef::new(0, 2)));

    let c = b.child_named("demo.Chain::c").unwrap();
    assert!(c.inlined);
    assert_eq!(c.reason.as_deref(), Some("accessor"));
    assert_eq!(c.member, Some(MemberRef::new(0, 3)));

    let d = a.child_named("demo.Chain::d").unwrap();
    assert!(!d.inlined);
    assert_eq!(d.reason.as_deref(), Some("too big"));
    assert_eq!(d.member, Some(MemberRef::new(0, 4)));
    assert!(d.children.is_empty());

    let root = &analysis.annotations.root;
    assert!(root.has_kind_at(1, AnnotationKind::InlineSuccess));
    assert!(root.has_kind_at(9, AnnotationKind::InlineFail));
    assert!(root.has_kind_at(14, AnnotationKind::Branch));
    assert!(root.has_kind_at(14, AnnotationKind::UncommonTrap));

    let b_list = analysis.annotations.for_member(MemberRef::new(0, 2)).unwrap();
    assert!(b_list.has_kind_at(3, AnnotationKind::InlineSuccess));
    assert!(b_list.has_kind_at(7, AnnotationKind::EliminatedAllocation));
}

/// Late inline of `c` into `b`, body in the parse following the `late_inline`
fn verify_late_task(analysis: &TaskAnalysis) {
    assert_eq!(analysis.compilation.compile_id, 30);
    assert_eq!(analysis.root_member, None);

    let c = &analysis.root.children[0].children[0];
    assert_eq!(c.member_name, "demo.Late::c");
    assert!(c.inlined);
    assert!(c.late_inline);
    assert_eq!(c.children.len(), 1);
    assert_eq!(c.children[0].member_name, "demo.Late::d");
}

/// Verify what ended up on the members of the inventory
fn verify_attachment(inventory: &ClassInventory, summary: AttachSummary) {
    assert_eq!(
        summary,
        AttachSummary {
            analyzed: 3,
            compilations: 2,
            assembly: 2,
            unmatched_assembly: 1,
        }
    );

    let a = inventory.member(MemberRef::new(0, 1)).unwrap();
    assert_eq!(a.compilations.len(), 2);
    assert_eq!(a.assembly.len(), 2);
    assert_eq!(a.last_compilation().map(|c| c.compile_id), Some(12));
    assert!(a
        .annotations_for(13)
        .unwrap()
        .has_kind_at(1, AnnotationKind::InlineSuccess));
    assert!(a
        .annotations_for(12)
        .unwrap()
        .has_kind_at(14, AnnotationKind::Branch));

    let b = inventory.member(MemberRef::new(0, 2)).unwrap();
    assert!(b.compilations.is_empty());
    assert!(b
        .annotations_for(12)
        .unwrap()
        .has_kind_at(7, AnnotationKind::EliminatedAllocation));

    let d = inventory.member(MemberRef::new(0, 4)).unwrap();
    assert!(d.annotations.is_empty());
}
