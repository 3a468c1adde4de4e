//! Target architecture identification.

use strum::{Display, EnumIter, EnumString};

/// Instruction-set architecture of a disassembly listing.
///
/// The architecture is announced by the disassembler plugin with a banner such as
/// `[Disassembling for mach='i386:x86-64']`. It selects the [`crate::assembly::AssemblyParser`]
/// strategy used for every method that follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum Architecture {
    /// 32-bit x86
    #[strum(to_string = "x86_32", serialize = "i386")]
    X86_32,
    /// x86-64 / AMD64
    #[strum(to_string = "x86_64", serialize = "amd64", serialize = "i386:x86-64")]
    X86_64,
    /// 32-bit ARM
    #[strum(to_string = "arm32", serialize = "arm")]
    Arm32,
    /// AArch64
    #[strum(to_string = "arm64", serialize = "aarch64")]
    Arm64,
}

/// Operand syntax of an x86 listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Syntax {
    /// `mov 0x8(%rsi),%r10d`
    Att,
    /// `mov r10d,DWORD PTR [rsi+0x8]`
    Intel,
}

impl Architecture {
    /// Recognizes a disassembly banner line.
    ///
    /// Returns `None` when the line is not a banner or names an unknown target.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jitscope::assembly::Architecture;
    ///
    /// assert_eq!(
    ///     Architecture::from_banner("[Disassembling for mach='i386:x86-64']"),
    ///     Some(Architecture::X86_64)
    /// );
    /// assert_eq!(
    ///     Architecture::from_banner("[Disassembling for mach='aarch64']"),
    ///     Some(Architecture::Arm64)
    /// );
    /// assert_eq!(Architecture::from_banner("[Entry Point]"), None);
    /// ```
    #[must_use]
    pub fn from_banner(line: &str) -> Option<Architecture> {
        let line = line.trim();
        let start = line.find("mach='")? + "mach='".len();
        let end = line[start..].find('\'')? + start;
        let mach = &line[start..end];

        match mach {
            "i386:x86-64" | "x86-64" | "amd64" => Some(Architecture::X86_64),
            "i386" | "i386:intel" | "x86" => Some(Architecture::X86_32),
            "aarch64" | "arm64" => Some(Architecture::Arm64),
            m if m.starts_with("arm") => Some(Architecture::Arm32),
            m => m.parse().ok(),
        }
    }

    /// True for the x86 family.
    #[must_use]
    pub fn is_x86(&self) -> bool {
        matches!(self, Architecture::X86_32 | Architecture::X86_64)
    }

    /// True for the ARM family.
    #[must_use]
    pub fn is_arm(&self) -> bool {
        matches!(self, Architecture::Arm32 | Architecture::Arm64)
    }

    /// Pointer width in bits.
    #[must_use]
    pub fn pointer_bits(&self) -> u32 {
        match self {
            Architecture::X86_32 | Architecture::Arm32 => 32,
            Architecture::X86_64 | Architecture::Arm64 => 64,
        }
    }
}
