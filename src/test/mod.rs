//! Fixtures shared by the unit tests of several modules.

pub mod logs;
