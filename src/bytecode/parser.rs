//! Instruction lines of a bytecode listing.

use tracing::trace;

use crate::bytecode::{
    BytecodeInstruction, BytecodeParameter, Opcode, OperandShape, SwitchTable,
};

/// Incremental parser for `offset: mnemonic [parameters] [// comment]` lines.
///
/// Switch instructions span several lines; [`InstructionParser::feed`] returns them once the
/// closing `}` is seen.
#[derive(Debug, Default)]
pub struct InstructionParser {
    pending_switch: Option<(BytecodeInstruction, SwitchTable)>,
}

impl InstructionParser {
    /// Creates a parser.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a switch table is being collected.
    #[must_use]
    pub fn in_switch(&self) -> bool {
        self.pending_switch.is_some()
    }

    /// Consumes one line; returns an instruction once it is complete.
    pub fn feed(&mut self, line: &str) -> Option<BytecodeInstruction> {
        let trimmed = line.trim();

        if let Some((_, table)) = &mut self.pending_switch {
            if trimmed.starts_with('}') {
                return self.finish();
            }
            if let Some((key, target)) = trimmed.split_once(':') {
                let target = target.trim().parse::<u32>().ok();
                match (key.trim(), target) {
                    ("default", Some(target)) => table.default = Some(target),
                    (key, Some(target)) => match key.parse::<i32>() {
                        Ok(key) => table.cases.push((key, target)),
                        Err(_) => trace!(line, "skipping malformed switch case"),
                    },
                    _ => trace!(line, "skipping malformed switch case"),
                }
            }
            return None;
        }

        let (offset, rest) = trimmed.split_once(':')?;
        let offset = offset.trim().parse::<u32>().ok()?;

        let (code, comment) = match rest.find("//") {
            Some(pos) => (&rest[..pos], Some(rest[pos + 2..].trim().to_string())),
            None => (rest, None),
        };
        let code = code.trim();
        let (mnemonic, params) = code
            .split_once(char::is_whitespace)
            .map_or((code, ""), |(m, p)| (m, p.trim()));

        let Some(opcode) = Opcode::from_listing(mnemonic) else {
            trace!(line, mnemonic, "unknown bytecode mnemonic");
            return None;
        };

        let mut instruction = BytecodeInstruction {
            offset,
            opcode,
            parameters: Vec::new(),
            comment,
        };

        match opcode.operand_shape() {
            OperandShape::None => {}
            OperandShape::Local | OperandShape::Immediate | OperandShape::Branch => {
                instruction.parameters.push(numeric_or_text(params));
            }
            OperandShape::ConstantPool => {
                instruction.parameters.push(constant_pool_or_text(params));
            }
            OperandShape::ConstantPoolCount | OperandShape::Increment => {
                for part in params.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                    let parameter = if part.starts_with('#') {
                        constant_pool_or_text(part)
                    } else {
                        numeric_or_text(part)
                    };
                    instruction.parameters.push(parameter);
                }
            }
            OperandShape::ArrayType => {
                instruction
                    .parameters
                    .push(BytecodeParameter::Text(params.to_string()));
            }
            OperandShape::Switch => {
                self.pending_switch = Some((instruction, SwitchTable::default()));
                if params.ends_with('}') {
                    return self.finish();
                }
                return None;
            }
        }

        Some(instruction)
    }

    /// Completes a switch table that was not closed.
    pub fn finish(&mut self) -> Option<BytecodeInstruction> {
        let (mut instruction, table) = self.pending_switch.take()?;
        instruction.parameters.push(BytecodeParameter::Switch(table));
        Some(instruction)
    }
}

fn numeric_or_text(text: &str) -> BytecodeParameter {
    text.parse::<i64>()
        .map(BytecodeParameter::Numeric)
        .unwrap_or_else(|_| BytecodeParameter::Text(text.to_string()))
}

fn constant_pool_or_text(text: &str) -> BytecodeParameter {
    text.strip_prefix('#')
        .and_then(|index| index.trim().parse::<u16>().ok())
        .map(BytecodeParameter::ConstantPool)
        .unwrap_or_else(|| BytecodeParameter::Text(text.to_string()))
}

/// Parses the instruction lines of one `Code:` section. Lines that are not instructions are
/// skipped.
///
/// # Examples
///
/// ```rust
/// use jitscope::bytecode::{parse_instructions, BytecodeParameter, Opcode};
///
/// let code = "\
///    0: aload_0
///    1: getfield      #2                  // Field count:I
///    4: iconst_1
///    5: iadd
///    6: ireturn
/// ";
///
/// let instructions = parse_instructions(code);
/// assert_eq!(instructions.len(), 5);
/// assert_eq!(instructions[1].opcode, Opcode::Getfield);
/// assert_eq!(instructions[1].parameters, vec![BytecodeParameter::ConstantPool(2)]);
/// assert_eq!(instructions[1].comment.as_deref(), Some("Field count:I"));
/// ```
#[must_use]
pub fn parse_instructions(text: &str) -> Vec<BytecodeInstruction> {
    let mut parser = InstructionParser::new();
    let mut instructions: Vec<BytecodeInstruction> =
        text.lines().filter_map(|line| parser.feed(line)).collect();
    instructions.extend(parser.finish());
    instructions
}
