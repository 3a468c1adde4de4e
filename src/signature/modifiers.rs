use std::fmt;

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// JVM member access flags, as carried by the compiler log's `flags` attribute and spelled
    /// out as keywords in bytecode listings and reflection strings
    pub struct MemberModifiers: u16 {
        /// Accessible from everywhere
        const PUBLIC = 0x0001;
        /// Accessible only within the declaring class
        const PRIVATE = 0x0002;
        /// Accessible within subclasses and the package
        const PROTECTED = 0x0004;
        /// Class member, no receiver
        const STATIC = 0x0008;
        /// Cannot be overridden
        const FINAL = 0x0010;
        /// Invocation is wrapped by a monitor
        const SYNCHRONIZED = 0x0020;
        /// Compiler-generated bridge method
        const BRIDGE = 0x0040;
        /// Declared with a variable number of arguments
        const VARARGS = 0x0080;
        /// Implemented in native code
        const NATIVE = 0x0100;
        /// No implementation
        const ABSTRACT = 0x0400;
        /// Strict floating point
        const STRICT = 0x0800;
        /// Not present in source code
        const SYNTHETIC = 0x1000;
    }
}

impl Default for MemberModifiers {
    fn default() -> Self {
        Self::empty()
    }
}

impl MemberModifiers {
    /// Flag for a source keyword, e.g. `public` or `synchronized`.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "public" => Self::PUBLIC,
            "private" => Self::PRIVATE,
            "protected" => Self::PROTECTED,
            "static" => Self::STATIC,
            "final" => Self::FINAL,
            "synchronized" => Self::SYNCHRONIZED,
            "native" => Self::NATIVE,
            "abstract" => Self::ABSTRACT,
            "strictfp" => Self::STRICT,
            // interface default methods carry no access flag of their own
            "default" => Self::empty(),
            _ => return None,
        })
    }

    /// Parses a decimal `flags` attribute value, ignoring unknown bits.
    #[must_use]
    pub fn from_log_flags(value: &str) -> Self {
        value
            .trim()
            .parse::<u16>()
            .map(Self::from_bits_truncate)
            .unwrap_or_default()
    }
}

impl fmt::Display for MemberModifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keywords = [
            (Self::PUBLIC, "public"),
            (Self::PRIVATE, "private"),
            (Self::PROTECTED, "protected"),
            (Self::ABSTRACT, "abstract"),
            (Self::STATIC, "static"),
            (Self::FINAL, "final"),
            (Self::SYNCHRONIZED, "synchronized"),
            (Self::NATIVE, "native"),
            (Self::STRICT, "strictfp"),
        ];

        let mut first = true;
        for (flag, keyword) in keywords {
            if self.contains(flag) {
                if !first {
                    write!(f, " ")?;
                }
                write!(f, "{}", keyword)?;
                first = false;
            }
        }
        Ok(())
    }
}
