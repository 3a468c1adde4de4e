use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! signature_error {
    ($sig:expr, $msg:expr) => {
        crate::Error::Signature {
            signature: $sig.to_string(),
            message: $msg.to_string(),
        }
    };

    ($sig:expr, $fmt:expr, $($arg:tt)*) => {
        crate::Error::Signature {
            signature: $sig.to_string(),
            message: format!($fmt, $($arg)*),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Most anomalies found in JIT logs are not errors at all: split tags, interleaved writer
/// output, wrapped assembly comments and unresolvable dictionary references are repaired or
/// reported through [`crate::diagnostics::Diagnostics`] instead. The variants below are the
/// cases that a caller has to handle explicitly.
///
/// # Error Categories
///
/// ## Parsing Errors
/// - [`Error::Malformed`] - Input that could not be decomposed at all
/// - [`Error::Signature`] - A member signature that could not be split into class, name,
///   return type and parameters
/// - [`Error::Empty`] - Empty input provided where content was required
///
/// ## Lookup Errors
/// - [`Error::NotFound`] - A named class or member does not exist in the inventory
///
/// ## I/O Errors
/// - [`Error::Io`] - Filesystem I/O errors when reading fixtures or logs
///
/// # Examples
///
/// ```rust
/// use jitscope::{Error, signature::MemberSignatureParts};
///
/// match MemberSignatureParts::from_log_signature("not a signature") {
///     Ok(parts) => println!("Parsed {}", parts),
///     Err(Error::Signature { signature, message }) => {
///         eprintln!("Bad signature '{}': {}", signature, message);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The input is damaged and could not be parsed.
    ///
    /// The error includes the source location where the malformation was detected
    /// for debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A member signature could not be decomposed.
    ///
    /// Raised by the [`crate::signature::MemberSignatureParts`] factories when the text does
    /// not contain a recognisable class, name, return type and parameter list. Nothing that
    /// was built before the failure is modified.
    #[error("Invalid signature '{signature}': {message}")]
    Signature {
        /// The offending signature text
        signature: String,
        /// What was wrong with it
        message: String,
    },

    /// Provided input was empty.
    #[error("Provided input was empty")]
    Empty,

    /// A class or member lookup failed.
    #[error("Not found - {0}")]
    NotFound(String),

    /// File I/O error.
    ///
    /// Wraps standard I/O errors that can occur while reading log or listing files.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}
