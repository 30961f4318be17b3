//! Colorboxd domain core.
//!
//! Types, the sort registry, rotation maths and list checks used by the
//! client and session crates. Has no internal workspace dependencies.

pub mod backend;
pub mod error;
pub mod list_length;
pub mod ordering;
pub mod rotation;
pub mod sorting;
pub mod types;

#[cfg(test)]
mod test_support;
