//! Attribute-store implementations.
//!
//! Trait state lives in the entity's attribute store; these adapters cover
//! tests and local runs ([`InMemoryAttributeStore`]) and durable single-host
//! saves ([`FileAttributeStore`]).

mod file;
mod memory;

pub use file::FileAttributeStore;
pub use memory::InMemoryAttributeStore;
