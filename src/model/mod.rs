//! The class and member inventory that derived artifacts attach to.
//!
//! Normally an inventory is built by the embedding application from whatever it knows about the
//! program (loaded classes, a classpath scan). This crate provides the data types, a builder from
//! bytecode listings ([`ClassInventory::add_bytecode`]) and the [`crate::signature::TypeHierarchy`]
//! view used for assignability checks during member matching.
//!
//! Attaching analysis results never creates or destroys members: native code, compilations and
//! annotations are added to members the inventory already has, addressed through [`MemberRef`].

mod class;
mod inventory;
mod member;

pub use class::MetaClass;
pub use inventory::ClassInventory;
pub use member::{MemberRef, MetaMember};
