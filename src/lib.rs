// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(dead_code)]
#![allow(clippy::too_many_arguments)]

//! # jitscope
//!
//! A framework for ingesting the diagnostic output of a JVM's just-in-time compiler and turning
//! it into a queryable model that ties compilation decisions to source members and bytecode
//! offsets.
//!
//! A HotSpot `-XX:+LogCompilation` log interleaves three kinds of text: a tag dialect describing
//! every compilation (inlining decisions, deoptimization traps, branch profiles, eliminated
//! allocations), disassembly of the generated native code, and header lines. `jitscope` parses
//! each of them, correlates them with `javap` bytecode listings, and attaches the results to a
//! class and member inventory.
//!
//! ## Features
//!
//! - **Streaming tag parser** - Line by line, with repair of tags split across lines by
//!   interleaved writer threads
//! - **Disassembly parsers** - x86 (AT&T and Intel syntax) and ARM listings, with recovery of
//!   wrapped comments and operand classification
//! - **Bytecode listings** - Instructions, line number, exception and local variable tables
//! - **Signature resolution** - Four textual encodings of a method normalized to one canonical
//!   form, with erasure, generics, varargs and assignability
//! - **Inlining trees** - Per-task reconstruction including late inlines, with annotations keyed
//!   by member and bytecode offset
//!
//! ## Quick Start
//!
//! ```rust
//! use jitscope::prelude::*;
//!
//! let diagnostics = Diagnostics::new();
//! let mut session = LogSession::new(&diagnostics);
//! for line in [
//!     "<task compile_id='1' compiler='c2' level='4' method='demo/Calc twice (I)I'>",
//!     "<type id='680' name='int'/>",
//!     "<klass id='776' name='demo/Calc'/>",
//!     "<method id='777' holder='776' name='twice' return='680' arguments='680'/>",
//!     "<method id='778' holder='776' name='add' return='680' arguments='680 680'/>",
//!     "<parse method='777'>",
//!     "<bc code='184' bci='2'/>",
//!     "<call method='778' count='1000'/>",
//!     "<inline_success reason='inline (hot)'/>",
//!     "<parse method='778'>",
//!     "</parse>",
//!     "</parse>",
//!     "<task_done success='1' nmsize='96'/>",
//!     "</task>",
//! ] {
//!     session.process_tag_line(line);
//! }
//! let log = session.finish();
//!
//! let analyses = log.analyze(&ClassInventory::new(), &diagnostics);
//! assert_eq!(analyses[0].root.children[0].member_name, "demo.Calc::add");
//! assert!(analyses[0].annotations.root.has_kind_at(2, AnnotationKind::InlineSuccess));
//! # Ok::<(), jitscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! Leaves first:
//!
//! - [`tags`] - Log lines to [`tags::Tag`] trees
//! - [`assembly`] - Native disassembly to [`assembly::AssemblyMethod`]s
//! - [`bytecode`] - `javap` listings to [`bytecode::ClassBC`]
//! - [`signature`] - Canonical signatures and member matching
//! - [`model`] - The class and member inventory results are attached to
//! - [`compile`] - Compilation tasks, inlining trees and bytecode annotations
//! - [`session`] - Orchestration of one log
//!
//! Ambient concerns live in [`config`], [`diagnostics`] and [`Error`].
//!
//! ## Error Handling
//!
//! Logs are written by several threads at once and are routinely damaged. Structural anomalies
//! are repaired and counted, unresolvable references become `None` plus a
//! [`diagnostics::Diagnostic`], and only input that cannot be decomposed at all is an
//! [`Error`]:
//!
//! ```rust
//! use jitscope::{Error, signature::MemberSignatureParts};
//!
//! match MemberSignatureParts::from_log_signature("demo/Calc add") {
//!     Ok(parts) => println!("{}", parts),
//!     Err(Error::Signature { message, .. }) => println!("bad signature: {}", message),
//!     Err(e) => println!("other error: {}", e),
//! }
//! ```
//!
//! ## Logging
//!
//! Repairs, resolution failures and unhandled tags are traced through `tracing`. The library
//! never installs a subscriber.
//!
//! ## Development and Testing
//!
//! ```bash
//! cargo test
//! cargo bench
//! cargo +nightly fuzz run tags --release
//! ```

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit- and integration-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types.
///
/// # Example
///
/// ```rust
/// use jitscope::prelude::*;
///
/// let diagnostics = Diagnostics::new();
/// let mut processor = TagProcessor::new();
/// let tag = processor.process_line("<writer thread='1234'/>").unwrap();
/// assert_eq!(tag.attribute("thread"), Some("1234"));
/// assert!(!diagnostics.has_any());
/// ```
pub mod prelude;

pub mod assembly;
pub mod bytecode;
pub mod compile;
pub mod config;
pub mod diagnostics;
pub mod model;
pub mod session;
pub mod signature;
pub mod tags;

/// `jitscope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `jitscope` Error type
///
/// See [`error::Error`](crate::Error) for the variants.
pub use error::Error;
