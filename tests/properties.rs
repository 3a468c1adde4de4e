use std::{fs, path::PathBuf};

use jitscope::{
    assembly::{Architecture, AssemblyProcessor, BlockTitle},
    compile::CompileChainWalker,
    diagnostics::Diagnostics,
    signature::{FlatHierarchy, GenericsMap, MatchKind, MemberMatcher, MemberSignatureParts},
    tags::{Tag, TagProcessor},
};

fn sample(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/samples")
        .join(name);
    fs::read_to_string(path).unwrap()
}

fn parse_all(text: &str) -> (Vec<Tag>, TagProcessor) {
    let mut processor = TagProcessor::new();
    let mut tags = Vec::new();
    for line in text.lines() {
        if let Some(tag) = processor.process_line(line) {
            tags.push(tag);
        }
        while let Some(tag) = processor.next_completed() {
            tags.push(tag);
        }
    }
    tags.extend(processor.finish());
    (tags, processor)
}

#[test]
fn two_line_tag_is_united() {
    let mut split = TagProcessor::new();
    assert!(split
        .process_line("<task_queued compile_id='7' method='demo/Calc add (II)I'")
        .is_none());
    let joined = split.process_line(" bytes='4' count='5000'/>").unwrap();
    assert!(split.fragment_seen());
    assert_eq!(split.repair_count(), 1);

    let mut whole = TagProcessor::new();
    let single = whole
        .process_line("<task_queued compile_id='7' method='demo/Calc add (II)I' bytes='4' count='5000'/>")
        .unwrap();
    assert!(!whole.fragment_seen());

    assert_eq!(joined, single);
    assert_eq!(joined.attribute("method"), Some("demo/Calc add (II)I"));
}

#[test]
fn fragments_in_sample_log() {
    let (tags, processor) = parse_all(&sample("compilation.log"));
    assert!(processor.fragment_seen());
    assert_eq!(processor.repair_count(), 2);

    let task = tags
        .iter()
        .find(|t| t.name() == "task" && t.attribute("compile_id") == Some("12"))
        .unwrap();
    let fail = task.first_named_descendant("inline_fail").unwrap();
    assert_eq!(fail.attribute("reason"), Some("too big"));
}

#[test]
fn parsing_is_idempotent() {
    let log = sample("compilation.log");
    let (first, _) = parse_all(&log);
    let (second, _) = parse_all(&log);
    assert_eq!(first, second);

    let diagnostics = Diagnostics::new();
    let walker = CompileChainWalker::new(&diagnostics);
    for task in first.iter().filter(|t| t.name() == "task") {
        let once = walker.walk(task).unwrap();
        let twice = walker.walk(task).unwrap();
        assert_eq!(once.root, twice.root);
        assert_eq!(once.annotations, twice.annotations);
    }
}

#[test]
fn five_block_skeleton() {
    let mut processor = AssemblyProcessor::new();
    for line in sample("chain.asm").lines() {
        processor.process_line(line);
    }
    let methods = processor.finish();
    let c1 = &methods[0];

    assert_eq!(c1.architecture, Architecture::X86_64);
    let titles: Vec<BlockTitle> = c1.blocks.iter().map(|b| b.title).collect();
    assert_eq!(
        titles,
        vec![
            BlockTitle::EntryPoint,
            BlockTitle::VerifiedEntryPoint,
            BlockTitle::ExceptionHandler,
            BlockTitle::StubCode,
            BlockTitle::DeoptHandlerCode,
        ]
    );

    let call = c1.instruction_at(0x7f0a0c4a91d0).unwrap();
    assert_eq!(call.comment_lines().count(), 4);

    let nop = c1.instruction_at(0x7f0a0c4a91b1).unwrap();
    assert_eq!(nop.prefixes, vec!["data32", "data32"]);
    assert_eq!(nop.mnemonic, "nopw");
}

#[test]
fn cross_encoding_signatures() {
    let from_bytecode =
        MemberSignatureParts::from_bytecode_signature("demo.Chain", "public int a(int);", &GenericsMap::new())
            .unwrap();
    let from_log = MemberSignatureParts::from_log_signature("demo/Chain a (I)I").unwrap();
    let from_assembly = MemberSignatureParts::from_assembly_header(
        "  # {method} {0x00007f0a0c4a2000} 'a' '(I)I' in 'demo/Chain'",
    )
    .unwrap();
    let from_reflection = MemberSignatureParts::from_reflection("public int demo.Chain.a(int)").unwrap();

    let canonical = from_log.canonical();
    assert_eq!(from_bytecode.canonical(), canonical);
    assert_eq!(from_assembly.canonical(), canonical);
    assert_eq!(from_reflection.canonical(), canonical);

    let matcher = MemberMatcher::new(&FlatHierarchy);
    assert_eq!(matcher.match_kind(&from_bytecode, &from_log), Some(MatchKind::Exact));

    let other = MemberSignatureParts::from_log_signature("demo/Chain a (J)I").unwrap();
    assert_ne!(other.canonical(), canonical);
    assert_eq!(matcher.match_kind(&from_bytecode, &other), None);
}

#[test]
fn inner_class_separators() {
    let dollar = MemberSignatureParts::from_log_signature("demo/Outer$Inner run ()V").unwrap();
    let dotted =
        MemberSignatureParts::from_reflection("public void demo.Outer$Inner.run()").unwrap();
    assert_eq!(dollar.canonical(), dotted.canonical());
    assert_eq!(dollar.canonical().class_name, "demo.Outer.Inner");
}
