//! Loading `javap -c -l [-v]` listings.

use tracing::{debug, trace};

use crate::{
    bytecode::{
        ClassBC, ConstantPool, ExceptionTableEntry, InstructionParser, LocalVariable,
        MemberBytecode,
    },
    config::ParseConfig,
    signature::{
        types::{
            parse_formal_type_parameters, parse_generic_declaration, split_top_level,
            strip_type_arguments,
        },
        MemberSignatureParts,
    },
    Result,
};

/// Member attributes whose content is not modelled.
const SKIPPED_ATTRIBUTES: &[&str] = &[
    "StackMapTable:",
    "RuntimeVisibleAnnotations:",
    "RuntimeInvisibleAnnotations:",
    "RuntimeVisibleParameterAnnotations:",
    "RuntimeInvisibleParameterAnnotations:",
    "RuntimeVisibleTypeAnnotations:",
    "RuntimeInvisibleTypeAnnotations:",
    "MethodParameters:",
    "Exceptions:",
    "LocalVariableTypeTable:",
    "AnnotationDefault:",
    "InnerClasses:",
    "BootstrapMethods:",
    "NestMembers:",
    "NestHost:",
    "PermittedSubclasses:",
    "Record:",
    "EnclosingMethod:",
];

/// Single-line attributes that are skipped without leaving the current section.
const SKIPPED_LINES: &[&str] = &["descriptor:", "flags:", "Signature:", "Deprecated:", "ConstantValue:"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    ConstantPool,
    Body,
    Field,
    Code,
    LineNumbers,
    LocalVariables,
    ExceptionTable,
    Skipped,
    Trailer,
}

/// Builds a [`ClassBC`] from the lines of a bytecode listing.
///
/// # Examples
///
/// ```rust
/// use jitscope::bytecode::BytecodeLoader;
///
/// let listing = r#"Compiled from "Calc.java"
/// public class demo.Calc {
///   public int add(int, int);
///     Code:
///        0: iload_1
///        1: iload_2
///        2: iadd
///        3: ireturn
///     LineNumberTable:
///       line 5: 0
/// }
/// "#;
///
/// let class = BytecodeLoader::parse("demo.Calc", listing.lines(), false)?;
/// assert_eq!(class.source_file.as_deref(), Some("Calc.java"));
/// assert_eq!(class.members().len(), 1);
/// assert_eq!(class.members()[0].instructions.len(), 4);
/// assert_eq!(class.members()[0].source_line_for_bci(3), Some(5));
/// # Ok::<(), jitscope::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct BytecodeLoader {
    keep_constant_pool: bool,
}

impl Default for BytecodeLoader {
    fn default() -> Self {
        BytecodeLoader {
            keep_constant_pool: true,
        }
    }
}

impl BytecodeLoader {
    /// Creates a loader that keeps the constant pool of verbose listings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a loader honouring [`ParseConfig::keep_constant_pool`].
    #[must_use]
    pub fn with_config(config: &ParseConfig) -> Self {
        BytecodeLoader {
            keep_constant_pool: config.keep_constant_pool,
        }
    }

    /// Parses a listing with the default loader.
    ///
    /// # Errors
    /// Returns [`crate::Error::Empty`] if `lines` contains nothing but whitespace.
    pub fn parse<I, S>(class_name: &str, lines: I, verbose: bool) -> Result<ClassBC>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new().load(class_name, lines, verbose)
    }

    /// Parses a listing. `verbose` marks `javap -v` output, the only form with a constant pool.
    ///
    /// Member headers that cannot be decomposed are skipped together with their code.
    ///
    /// # Errors
    /// Returns [`crate::Error::Empty`] if `lines` contains nothing but whitespace.
    pub fn load<I, S>(&self, class_name: &str, lines: I, verbose: bool) -> Result<ClassBC>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut state = LoadState {
            class: ClassBC::new(class_name),
            section: Section::Preamble,
            member: None,
            instructions: InstructionParser::new(),
            keep_pool: verbose && self.keep_constant_pool,
            seen_content: false,
        };

        for line in lines {
            state.process(line.as_ref());
        }
        state.finish_member();

        if !state.seen_content {
            return Err(crate::Error::Empty);
        }
        debug!(
            class = %state.class.class_name,
            members = state.class.members().len(),
            "loaded bytecode listing"
        );
        Ok(state.class)
    }
}

struct LoadState {
    class: ClassBC,
    section: Section,
    member: Option<MemberBytecode>,
    instructions: InstructionParser,
    keep_pool: bool,
    seen_content: bool,
}

impl LoadState {
    fn process(&mut self, line: &str) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return;
        }
        self.seen_content = true;
        let indented = line.starts_with(char::is_whitespace);

        if self.section == Section::Code && self.instructions.in_switch() {
            if let Some(instruction) = self.instructions.feed(line) {
                self.push_instruction(instruction);
            }
            return;
        }

        if self.section == Section::ConstantPool {
            if trimmed.starts_with('#') {
                if self.keep_pool {
                    self.class
                        .constant_pool
                        .get_or_insert_with(ConstantPool::new)
                        .add_line(trimmed);
                }
                return;
            }
            // wrapped Utf8 constants continue on unprefixed lines
            if trimmed != "{" && indented {
                return;
            }
        }

        if trimmed == "Constant pool:" {
            self.section = Section::ConstantPool;
            return;
        }
        if trimmed == "{" {
            self.section = Section::Body;
            return;
        }
        if trimmed == "}" && !indented {
            self.finish_member();
            self.section = Section::Trailer;
            return;
        }

        if !indented {
            self.process_class_line(trimmed);
            return;
        }

        if let Some(version) = trimmed.strip_prefix("minor version:") {
            self.class.minor_version = version.trim().parse().ok();
            return;
        }
        if let Some(version) = trimmed.strip_prefix("major version:") {
            self.class.major_version = version.trim().parse().ok();
            return;
        }

        if matches!(self.section, Section::Preamble | Section::Trailer) {
            return;
        }

        if is_member_header(line) {
            self.start_member(trimmed);
            return;
        }

        self.process_member_line(trimmed);
    }

    fn process_class_line(&mut self, trimmed: &str) {
        if let Some(file) = trimmed.strip_prefix("Compiled from") {
            self.class.source_file = Some(file.trim().trim_matches('"').to_string());
        } else if let Some(file) = trimmed.strip_prefix("SourceFile:") {
            self.class.source_file = Some(file.trim().trim_matches('"').to_string());
        } else if let Some(signature) = trimmed.strip_prefix("Signature:") {
            let signature = signature
                .split_once("//")
                .map_or(signature, |(_, comment)| comment)
                .trim();
            for (name, bound) in parse_formal_type_parameters(signature) {
                self.class.generics.entry(name).or_insert(bound);
            }
        } else if SKIPPED_ATTRIBUTES.contains(&trimmed) {
            self.section = Section::Trailer;
        } else if self.section == Section::Preamble && !trimmed.starts_with("Classfile") {
            self.process_class_header(trimmed);
        }
    }

    /// `[modifiers] class|interface Name[<generics>] [extends A] [implements B, C] [{]`
    fn process_class_header(&mut self, trimmed: &str) {
        let text = trimmed.trim_end_matches('{').trim();
        let tokens = split_top_level(text, ' ');
        let Some(keyword) = tokens
            .iter()
            .position(|t| *t == "class" || *t == "interface")
        else {
            trace!(line = trimmed, "skipping preamble line");
            return;
        };
        let is_interface = tokens[keyword] == "interface";

        if let Some(&name) = tokens.get(keyword + 1) {
            let (name, generics) = match name.find('<') {
                Some(open) => (&name[..open], parse_generic_declaration(&name[open..])),
                None => (name, Default::default()),
            };
            if self.class.class_name.is_empty() {
                self.class.class_name = name.to_string();
            }
            self.class.generics.extend(generics);
        }

        let mut clause = "";
        for &token in &tokens[(keyword + 2).min(tokens.len())..] {
            match token {
                "extends" | "implements" => clause = token,
                _ => {
                    let name = strip_type_arguments(token.trim_end_matches(','));
                    if name.is_empty() {
                        continue;
                    }
                    // interfaces list their super-interfaces after `extends`
                    if clause == "implements" || (clause == "extends" && is_interface) {
                        self.class.interfaces.push(name);
                    } else if clause == "extends" {
                        self.class.super_name = Some(name);
                    }
                }
            }
        }

        if trimmed.ends_with('{') {
            self.section = Section::Body;
        }
    }

    fn start_member(&mut self, header: &str) {
        self.finish_member();

        if !header.contains('(') && header != "static {};" {
            self.section = Section::Field;
            return;
        }

        match MemberSignatureParts::from_bytecode_signature(
            &self.class.class_name,
            header,
            &self.class.generics,
        ) {
            Ok(signature) => {
                self.member = Some(MemberBytecode::new(signature));
                self.section = Section::Body;
            }
            Err(error) => {
                debug!(header, %error, "skipping undecomposable member header");
                self.section = Section::Skipped;
            }
        }
    }

    fn process_member_line(&mut self, trimmed: &str) {
        match trimmed {
            "Code:" => {
                self.section = Section::Code;
                return;
            }
            "LineNumberTable:" => {
                self.section = Section::LineNumbers;
                return;
            }
            "LocalVariableTable:" => {
                self.section = Section::LocalVariables;
                return;
            }
            "Exception table:" => {
                self.section = Section::ExceptionTable;
                return;
            }
            _ => {}
        }
        if SKIPPED_ATTRIBUTES.iter().any(|a| trimmed.starts_with(a)) {
            self.section = Section::Skipped;
            return;
        }
        if self.section != Section::Code && SKIPPED_LINES.iter().any(|a| trimmed.starts_with(a)) {
            return;
        }

        let Some(member) = self.member.as_mut() else {
            return;
        };

        match self.section {
            Section::Code => {
                if trimmed.starts_with("stack=") {
                    return;
                }
                if let Some(instruction) = self.instructions.feed(trimmed) {
                    member.instructions.push(instruction);
                }
            }
            Section::LineNumbers => {
                let entry = trimmed
                    .strip_prefix("line")
                    .and_then(|rest| rest.split_once(':'))
                    .and_then(|(line, bci)| {
                        Some((line.trim().parse().ok()?, bci.trim().parse().ok()?))
                    });
                match entry {
                    Some((line, bci)) => member.line_table.add(line, bci),
                    None => trace!(line = trimmed, "skipping line table row"),
                }
            }
            Section::LocalVariables => {
                let columns: Vec<&str> = trimmed.split_whitespace().collect();
                if let [start, length, slot, name, signature] = columns.as_slice() {
                    if let (Ok(start), Ok(length), Ok(slot)) =
                        (start.parse(), length.parse(), slot.parse())
                    {
                        member.local_variables.add(LocalVariable {
                            start,
                            length,
                            slot,
                            name: (*name).to_string(),
                            signature: (*signature).to_string(),
                        });
                    }
                }
            }
            Section::ExceptionTable => {
                let columns: Vec<&str> = trimmed.split_whitespace().collect();
                if columns.len() < 4 {
                    return;
                }
                if let (Ok(from), Ok(to), Ok(target)) =
                    (columns[0].parse(), columns[1].parse(), columns[2].parse())
                {
                    let catch_type = match columns[3] {
                        "any" => None,
                        "Class" => columns.get(4).map(|c| c.replace('/', ".")),
                        other => Some(other.replace('/', ".")),
                    };
                    member.exception_table.add(ExceptionTableEntry {
                        from,
                        to,
                        target,
                        catch_type,
                    });
                }
            }
            _ => {}
        }
    }

    fn push_instruction(&mut self, instruction: crate::bytecode::BytecodeInstruction) {
        if let Some(member) = self.member.as_mut() {
            member.instructions.push(instruction);
        }
    }

    fn finish_member(&mut self) {
        if let Some(instruction) = self.instructions.finish() {
            self.push_instruction(instruction);
        }
        if let Some(member) = self.member.take() {
            self.class.add_member(member);
        }
    }
}

/// Member headers sit at an indent of two and end with `;`.
fn is_member_header(line: &str) -> bool {
    let Some(rest) = line.strip_prefix("  ") else {
        return false;
    };
    !rest.starts_with(char::is_whitespace) && rest.trim_end().ends_with(';')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bytecode::Opcode,
        signature::{types::OBJECT, MemberSignatureParts},
        test::bytecode::{CALC_LISTING, CALC_VERBOSE_LISTING},
        Error,
    };

    #[test]
    fn plain_listing() {
        let class = BytecodeLoader::parse("demo.Calc", CALC_LISTING.lines(), false).unwrap();

        assert_eq!(class.source_file.as_deref(), Some("Calc.java"));
        assert_eq!(class.super_name.as_deref(), Some("demo.Base"));
        assert_eq!(class.interfaces, vec!["java.lang.Runnable", "java.io.Serializable"]);
        assert!(class.constant_pool.is_none());
        assert_eq!(class.members().len(), 5);

        let ctor = &class.members()[0];
        assert!(ctor.signature.is_constructor());
        assert_eq!(ctor.instructions.len(), 3);

        let add = MemberSignatureParts::from_log_signature("demo/Calc add (II)I").unwrap();
        let add = class.member_bytecode(&add).unwrap();
        assert_eq!(add.instruction_at(2).map(|i| i.opcode), Some(Opcode::Iadd));
        assert_eq!(add.source_line_for_bci(3), Some(8));
        assert_eq!(add.local_variables.by_name("a").map(|v| v.slot), Some(1));

        let parse = MemberSignatureParts::from_log_signature(
            "demo/Calc parse (Ljava/lang/String;)I",
        )
        .unwrap();
        let parse = class.member_bytecode(&parse).unwrap();
        assert_eq!(parse.exception_table.len(), 2);
        let handlers: Vec<_> = parse.exception_table.entries_covering(2).collect();
        assert_eq!(
            handlers[0].catch_type.as_deref(),
            Some("java.lang.NumberFormatException")
        );
        assert_eq!(handlers[1].catch_type, None);

        let select = MemberSignatureParts::from_log_signature("demo/Calc select (I)I").unwrap();
        let select = class.member_bytecode(&select).unwrap();
        let table = select.instructions[1].switch_table().unwrap();
        assert_eq!(table.cases, vec![(0, 28), (1, 30)]);
        assert_eq!(select.last_offset(), Some(34));

        let clinit = class.members().last().unwrap();
        assert!(clinit.signature.is_static_initializer());
    }

    #[test]
    fn verbose_listing() {
        let class =
            BytecodeLoader::parse("demo.Box", CALC_VERBOSE_LISTING.lines(), true).unwrap();

        assert_eq!(class.major_version, Some(61));
        assert_eq!(class.minor_version, Some(0));
        assert_eq!(class.source_file.as_deref(), Some("Box.java"));
        assert_eq!(class.generics.get("T").map(String::as_str), Some("java.lang.Number"));
        assert_eq!(class.constant(1), Some("java/lang/Object.\"<init>\":()V"));

        // the field is not a member with code
        assert_eq!(class.members().len(), 2);

        let set = MemberSignatureParts::from_log_signature("demo/Box set (Ljava/lang/Number;)V")
            .unwrap();
        let set = class.member_bytecode(&set).unwrap();
        assert_eq!(set.instructions.len(), 4);
        assert_eq!(set.instructions[1].constant_pool_index(), None);
        assert_eq!(set.instructions[2].constant_pool_index(), Some(7));

        let dropped = BytecodeLoader::with_config(&ParseConfig::new().with_constant_pool(false))
            .load("demo.Box", CALC_VERBOSE_LISTING.lines(), true)
            .unwrap();
        assert!(dropped.constant_pool.is_none());
    }

    #[test]
    fn class_generics_default_to_object() {
        let listing = "public class demo.Holder<E> {\n  public E get();\n    Code:\n       0: aconst_null\n       1: areturn\n}\n";
        let class = BytecodeLoader::parse("demo.Holder", listing.lines(), false).unwrap();
        assert_eq!(class.generics.get("E").map(String::as_str), Some(OBJECT));
        assert_eq!(class.members()[0].signature.canonical().return_type, OBJECT);
    }

    #[test]
    fn empty_listing() {
        assert!(matches!(
            BytecodeLoader::parse("demo.None", ["", "   "], false),
            Err(Error::Empty)
        ));
    }
}
