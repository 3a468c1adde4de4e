//! Streaming parser for the line-oriented, XML-like compiler log dialect.
//!
//! This is not a general XML parser. It accepts exactly what the VM's compilation log writer
//! emits: one or a few markers per line, single- or double-quoted attribute values, optional
//! text content, and no namespaces. In exchange it tolerates what a real XML parser would
//! reject: markers physically split by interleaved writer threads, unbalanced close markers and
//! documents that end without closing their root.
//!
//! # Key Types
//! - [`Tag`] - A structural node: name, attributes, children, text
//! - [`TagProcessor`] - Line-by-line tree builder with fragment recovery
//!
//! # Example
//!
//! ```rust
//! use jitscope::tags::TagProcessor;
//!
//! let mut processor = TagProcessor::new();
//! let lines = [
//!     "<task compile_id='12' method='java/lang/String hashCode ()I'",
//!     " bytes='55' count='5000'>",
//!     "<task_done success='1' nmsize='120'/>",
//!     "</task>",
//! ];
//!
//! let mut tasks = Vec::new();
//! for line in lines {
//!     if let Some(tag) = processor.process_line(line) {
//!         tasks.push(tag);
//!     }
//! }
//!
//! assert_eq!(tasks.len(), 1);
//! assert_eq!(tasks[0].attribute("bytes"), Some("55"));
//! assert!(processor.fragment_seen());
//! ```

mod processor;
mod tag;

pub use processor::TagProcessor;
pub use tag::Tag;
pub(crate) use tag::parse_hex;
