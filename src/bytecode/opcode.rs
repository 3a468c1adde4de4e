//! The JVM instruction set.

use std::fmt;

use strum::{Display, EnumCount, EnumIter};

/// Shape of the parameters an opcode prints in a bytecode listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperandShape {
    /// No parameters
    None,
    /// Local variable slot
    Local,
    /// Signed immediate value (`bipush`, `sipush`)
    Immediate,
    /// Constant pool reference `#n`
    ConstantPool,
    /// Constant pool reference with a count, `#n, count`
    ConstantPoolCount,
    /// `iinc index, increment`
    Increment,
    /// Primitive element type name (`newarray int`)
    ArrayType,
    /// Branch target offset
    Branch,
    /// `tableswitch` / `lookupswitch` table spanning several lines
    Switch,
}

/// Coarse grouping of opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum OpcodeCategory {
    /// Constants and literal pushes
    Constant,
    /// Local variable and array element loads
    Load,
    /// Local variable and array element stores
    Store,
    /// Operand stack manipulation
    Stack,
    /// Arithmetic and bitwise operations
    Arithmetic,
    /// Primitive conversions
    Conversion,
    /// Value comparisons producing an int
    Comparison,
    /// Conditional and unconditional jumps
    Branch,
    /// Table and lookup switches
    Switch,
    /// Method returns
    Return,
    /// Field access
    Field,
    /// Method invocation
    Invoke,
    /// Object and array creation, type checks
    Object,
    /// Monitors and exceptions
    Control,
    /// Reserved opcodes
    Reserved,
}

macro_rules! opcodes {
    ($( $variant:ident = $code:literal, $mnemonic:literal, $shape:ident; )*) => {
        /// A JVM opcode.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount)]
        #[allow(missing_docs)]
        pub enum Opcode {
            $( $variant, )*
        }

        impl Opcode {
            /// The opcode byte.
            #[must_use]
            pub fn code(&self) -> u8 {
                match self {
                    $( Opcode::$variant => $code, )*
                }
            }

            /// The mnemonic as printed by bytecode listings.
            #[must_use]
            pub fn mnemonic(&self) -> &'static str {
                match self {
                    $( Opcode::$variant => $mnemonic, )*
                }
            }

            /// Parameter shape of the opcode.
            #[must_use]
            pub fn operand_shape(&self) -> OperandShape {
                match self {
                    $( Opcode::$variant => OperandShape::$shape, )*
                }
            }

            /// Looks an opcode up by mnemonic.
            #[must_use]
            pub fn from_mnemonic(mnemonic: &str) -> Option<Opcode> {
                match mnemonic {
                    $( $mnemonic => Some(Opcode::$variant), )*
                    _ => None,
                }
            }

            /// Looks an opcode up by its byte.
            #[must_use]
            pub fn from_code(code: u8) -> Option<Opcode> {
                match code {
                    $( $code => Some(Opcode::$variant), )*
                    _ => None,
                }
            }
        }
    };
}

opcodes! {
    Nop = 0x00, "nop", None;
    AconstNull = 0x01, "aconst_null", None;
    IconstM1 = 0x02, "iconst_m1", None;
    Iconst0 = 0x03, "iconst_0", None;
    Iconst1 = 0x04, "iconst_1", None;
    Iconst2 = 0x05, "iconst_2", None;
    Iconst3 = 0x06, "iconst_3", None;
    Iconst4 = 0x07, "iconst_4", None;
    Iconst5 = 0x08, "iconst_5", None;
    Lconst0 = 0x09, "lconst_0", None;
    Lconst1 = 0x0a, "lconst_1", None;
    Fconst0 = 0x0b, "fconst_0", None;
    Fconst1 = 0x0c, "fconst_1", None;
    Fconst2 = 0x0d, "fconst_2", None;
    Dconst0 = 0x0e, "dconst_0", None;
    Dconst1 = 0x0f, "dconst_1", None;
    Bipush = 0x10, "bipush", Immediate;
    Sipush = 0x11, "sipush", Immediate;
    Ldc = 0x12, "ldc", ConstantPool;
    LdcW = 0x13, "ldc_w", ConstantPool;
    Ldc2W = 0x14, "ldc2_w", ConstantPool;
    Iload = 0x15, "iload", Local;
    Lload = 0x16, "lload", Local;
    Fload = 0x17, "fload", Local;
    Dload = 0x18, "dload", Local;
    Aload = 0x19, "aload", Local;
    Iload0 = 0x1a, "iload_0", None;
    Iload1 = 0x1b, "iload_1", None;
    Iload2 = 0x1c, "iload_2", None;
    Iload3 = 0x1d, "iload_3", None;
    Lload0 = 0x1e, "lload_0", None;
    Lload1 = 0x1f, "lload_1", None;
    Lload2 = 0x20, "lload_2", None;
    Lload3 = 0x21, "lload_3", None;
    Fload0 = 0x22, "fload_0", None;
    Fload1 = 0x23, "fload_1", None;
    Fload2 = 0x24, "fload_2", None;
    Fload3 = 0x25, "fload_3", None;
    Dload0 = 0x26, "dload_0", None;
    Dload1 = 0x27, "dload_1", None;
    Dload2 = 0x28, "dload_2", None;
    Dload3 = 0x29, "dload_3", None;
    Aload0 = 0x2a, "aload_0", None;
    Aload1 = 0x2b, "aload_1", None;
    Aload2 = 0x2c, "aload_2", None;
    Aload3 = 0x2d, "aload_3", None;
    Iaload = 0x2e, "iaload", None;
    Laload = 0x2f, "laload", None;
    Faload = 0x30, "faload", None;
    Daload = 0x31, "daload", None;
    Aaload = 0x32, "aaload", None;
    Baload = 0x33, "baload", None;
    Caload = 0x34, "caload", None;
    Saload = 0x35, "saload", None;
    Istore = 0x36, "istore", Local;
    Lstore = 0x37, "lstore", Local;
    Fstore = 0x38, "fstore", Local;
    Dstore = 0x39, "dstore", Local;
    Astore = 0x3a, "astore", Local;
    Istore0 = 0x3b, "istore_0", None;
    Istore1 = 0x3c, "istore_1", None;
    Istore2 = 0x3d, "istore_2", None;
    Istore3 = 0x3e, "istore_3", None;
    Lstore0 = 0x3f, "lstore_0", None;
    Lstore1 = 0x40, "lstore_1", None;
    Lstore2 = 0x41, "lstore_2", None;
    Lstore3 = 0x42, "lstore_3", None;
    Fstore0 = 0x43, "fstore_0", None;
    Fstore1 = 0x44, "fstore_1", None;
    Fstore2 = 0x45, "fstore_2", None;
    Fstore3 = 0x46, "fstore_3", None;
    Dstore0 = 0x47, "dstore_0", None;
    Dstore1 = 0x48, "dstore_1", None;
    Dstore2 = 0x49, "dstore_2", None;
    Dstore3 = 0x4a, "dstore_3", None;
    Astore0 = 0x4b, "astore_0", None;
    Astore1 = 0x4c, "astore_1", None;
    Astore2 = 0x4d, "astore_2", None;
    Astore3 = 0x4e, "astore_3", None;
    Iastore = 0x4f, "iastore", None;
    Lastore = 0x50, "lastore", None;
    Fastore = 0x51, "fastore", None;
    Dastore = 0x52, "dastore", None;
    Aastore = 0x53, "aastore", None;
    Bastore = 0x54, "bastore", None;
    Castore = 0x55, "castore", None;
    Sastore = 0x56, "sastore", None;
    Pop = 0x57, "pop", None;
    Pop2 = 0x58, "pop2", None;
    Dup = 0x59, "dup", None;
    DupX1 = 0x5a, "dup_x1", None;
    DupX2 = 0x5b, "dup_x2", None;
    Dup2 = 0x5c, "dup2", None;
    Dup2X1 = 0x5d, "dup2_x1", None;
    Dup2X2 = 0x5e, "dup2_x2", None;
    Swap = 0x5f, "swap", None;
    Iadd = 0x60, "iadd", None;
    Ladd = 0x61, "ladd", None;
    Fadd = 0x62, "fadd", None;
    Dadd = 0x63, "dadd", None;
    Isub = 0x64, "isub", None;
    Lsub = 0x65, "lsub", None;
    Fsub = 0x66, "fsub", None;
    Dsub = 0x67, "dsub", None;
    Imul = 0x68, "imul", None;
    Lmul = 0x69, "lmul", None;
    Fmul = 0x6a, "fmul", None;
    Dmul = 0x6b, "dmul", None;
    Idiv = 0x6c, "idiv", None;
    Ldiv = 0x6d, "ldiv", None;
    Fdiv = 0x6e, "fdiv", None;
    Ddiv = 0x6f, "ddiv", None;
    Irem = 0x70, "irem", None;
    Lrem = 0x71, "lrem", None;
    Frem = 0x72, "frem", None;
    Drem = 0x73, "drem", None;
    Ineg = 0x74, "ineg", None;
    Lneg = 0x75, "lneg", None;
    Fneg = 0x76, "fneg", None;
    Dneg = 0x77, "dneg", None;
    Ishl = 0x78, "ishl", None;
    Lshl = 0x79, "lshl", None;
    Ishr = 0x7a, "ishr", None;
    Lshr = 0x7b, "lshr", None;
    Iushr = 0x7c, "iushr", None;
    Lushr = 0x7d, "lushr", None;
    Iand = 0x7e, "iand", None;
    Land = 0x7f, "land", None;
    Ior = 0x80, "ior", None;
    Lor = 0x81, "lor", None;
    Ixor = 0x82, "ixor", None;
    Lxor = 0x83, "lxor", None;
    Iinc = 0x84, "iinc", Increment;
    I2l = 0x85, "i2l", None;
    I2f = 0x86, "i2f", None;
    I2d = 0x87, "i2d", None;
    L2i = 0x88, "l2i", None;
    L2f = 0x89, "l2f", None;
    L2d = 0x8a, "l2d", None;
    F2i = 0x8b, "f2i", None;
    F2l = 0x8c, "f2l", None;
    F2d = 0x8d, "f2d", None;
    D2i = 0x8e, "d2i", None;
    D2l = 0x8f, "d2l", None;
    D2f = 0x90, "d2f", None;
    I2b = 0x91, "i2b", None;
    I2c = 0x92, "i2c", None;
    I2s = 0x93, "i2s", None;
    Lcmp = 0x94, "lcmp", None;
    Fcmpl = 0x95, "fcmpl", None;
    Fcmpg = 0x96, "fcmpg", None;
    Dcmpl = 0x97, "dcmpl", None;
    Dcmpg = 0x98, "dcmpg", None;
    Ifeq = 0x99, "ifeq", Branch;
    Ifne = 0x9a, "ifne", Branch;
    Iflt = 0x9b, "iflt", Branch;
    Ifge = 0x9c, "ifge", Branch;
    Ifgt = 0x9d, "ifgt", Branch;
    Ifle = 0x9e, "ifle", Branch;
    IfIcmpeq = 0x9f, "if_icmpeq", Branch;
    IfIcmpne = 0xa0, "if_icmpne", Branch;
    IfIcmplt = 0xa1, "if_icmplt", Branch;
    IfIcmpge = 0xa2, "if_icmpge", Branch;
    IfIcmpgt = 0xa3, "if_icmpgt", Branch;
    IfIcmple = 0xa4, "if_icmple", Branch;
    IfAcmpeq = 0xa5, "if_acmpeq", Branch;
    IfAcmpne = 0xa6, "if_acmpne", Branch;
    Goto = 0xa7, "goto", Branch;
    Jsr = 0xa8, "jsr", Branch;
    Ret = 0xa9, "ret", Local;
    Tableswitch = 0xaa, "tableswitch", Switch;
    Lookupswitch = 0xab, "lookupswitch", Switch;
    Ireturn = 0xac, "ireturn", None;
    Lreturn = 0xad, "lreturn", None;
    Freturn = 0xae, "freturn", None;
    Dreturn = 0xaf, "dreturn", None;
    Areturn = 0xb0, "areturn", None;
    Return = 0xb1, "return", None;
    Getstatic = 0xb2, "getstatic", ConstantPool;
    Putstatic = 0xb3, "putstatic", ConstantPool;
    Getfield = 0xb4, "getfield", ConstantPool;
    Putfield = 0xb5, "putfield", ConstantPool;
    Invokevirtual = 0xb6, "invokevirtual", ConstantPool;
    Invokespecial = 0xb7, "invokespecial", ConstantPool;
    Invokestatic = 0xb8, "invokestatic", ConstantPool;
    Invokeinterface = 0xb9, "invokeinterface", ConstantPoolCount;
    Invokedynamic = 0xba, "invokedynamic", ConstantPoolCount;
    New = 0xbb, "new", ConstantPool;
    Newarray = 0xbc, "newarray", ArrayType;
    Anewarray = 0xbd, "anewarray", ConstantPool;
    Arraylength = 0xbe, "arraylength", None;
    Athrow = 0xbf, "athrow", None;
    Checkcast = 0xc0, "checkcast", ConstantPool;
    Instanceof = 0xc1, "instanceof", ConstantPool;
    Monitorenter = 0xc2, "monitorenter", None;
    Monitorexit = 0xc3, "monitorexit", None;
    Wide = 0xc4, "wide", None;
    Multianewarray = 0xc5, "multianewarray", ConstantPoolCount;
    Ifnull = 0xc6, "ifnull", Branch;
    Ifnonnull = 0xc7, "ifnonnull", Branch;
    GotoW = 0xc8, "goto_w", Branch;
    JsrW = 0xc9, "jsr_w", Branch;
    Breakpoint = 0xca, "breakpoint", None;
    Impdep1 = 0xfe, "impdep1", None;
    Impdep2 = 0xff, "impdep2", None;
}

impl Opcode {
    /// Looks up a mnemonic, accepting the `_w` spelling listings use for `wide` forms of
    /// local variable instructions (`iload_w`, `iinc_w`).
    #[must_use]
    pub fn from_listing(mnemonic: &str) -> Option<Opcode> {
        if let Some(opcode) = Opcode::from_mnemonic(mnemonic) {
            return Some(opcode);
        }
        let base = Opcode::from_mnemonic(mnemonic.strip_suffix("_w")?)?;
        matches!(
            base.operand_shape(),
            OperandShape::Local | OperandShape::Increment
        )
        .then_some(base)
    }

    /// Coarse category of the opcode.
    #[must_use]
    pub fn category(&self) -> OpcodeCategory {
        match self.code() {
            0x00..=0x14 => OpcodeCategory::Constant,
            0x15..=0x35 => OpcodeCategory::Load,
            0x36..=0x56 => OpcodeCategory::Store,
            0x57..=0x5f => OpcodeCategory::Stack,
            0x60..=0x84 => OpcodeCategory::Arithmetic,
            0x85..=0x93 => OpcodeCategory::Conversion,
            0x94..=0x98 => OpcodeCategory::Comparison,
            0x99..=0xa9 | 0xc6..=0xc9 => OpcodeCategory::Branch,
            0xaa..=0xab => OpcodeCategory::Switch,
            0xac..=0xb1 => OpcodeCategory::Return,
            0xb2..=0xb5 => OpcodeCategory::Field,
            0xb6..=0xba => OpcodeCategory::Invoke,
            0xbb..=0xbe | 0xc0..=0xc1 | 0xc5 => OpcodeCategory::Object,
            0xbf | 0xc2..=0xc4 => OpcodeCategory::Control,
            _ => OpcodeCategory::Reserved,
        }
    }

    /// True for method invocations.
    #[must_use]
    pub fn is_invoke(&self) -> bool {
        self.category() == OpcodeCategory::Invoke
    }

    /// True for jumps, including `jsr` and `ret`.
    #[must_use]
    pub fn is_branch(&self) -> bool {
        self.category() == OpcodeCategory::Branch
    }

    /// True for conditional jumps.
    #[must_use]
    pub fn is_conditional_branch(&self) -> bool {
        matches!(self.code(), 0x99..=0xa6 | 0xc6 | 0xc7)
    }

    /// True for `tableswitch` and `lookupswitch`.
    #[must_use]
    pub fn is_switch(&self) -> bool {
        self.category() == OpcodeCategory::Switch
    }

    /// True for method returns.
    #[must_use]
    pub fn is_return(&self) -> bool {
        self.category() == OpcodeCategory::Return
    }

    /// True for object or array allocation.
    #[must_use]
    pub fn is_allocation(&self) -> bool {
        matches!(
            self,
            Opcode::New | Opcode::Newarray | Opcode::Anewarray | Opcode::Multianewarray
        )
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn table_is_consistent() {
        assert_eq!(Opcode::COUNT, 205);
        for opcode in Opcode::iter() {
            assert_eq!(Opcode::from_code(opcode.code()), Some(opcode));
            assert_eq!(Opcode::from_mnemonic(opcode.mnemonic()), Some(opcode));
        }
    }

    #[test]
    fn categories() {
        assert_eq!(Opcode::Invokeinterface.category(), OpcodeCategory::Invoke);
        assert_eq!(Opcode::Iinc.category(), OpcodeCategory::Arithmetic);
        assert_eq!(Opcode::Ifnonnull.category(), OpcodeCategory::Branch);
        assert_eq!(Opcode::Multianewarray.category(), OpcodeCategory::Object);
        assert_eq!(Opcode::Athrow.category(), OpcodeCategory::Control);
        assert!(Opcode::IfIcmplt.is_conditional_branch());
        assert!(!Opcode::Goto.is_conditional_branch());
        assert!(Opcode::New.is_allocation());
    }

    #[test]
    fn wide_spellings() {
        assert_eq!(Opcode::from_listing("iload_w"), Some(Opcode::Iload));
        assert_eq!(Opcode::from_listing("iinc_w"), Some(Opcode::Iinc));
        assert_eq!(Opcode::from_listing("goto_w"), Some(Opcode::GotoW));
        assert_eq!(Opcode::from_listing("iadd_w"), None);
        assert_eq!(Opcode::from_listing("bogus"), None);
    }
}
