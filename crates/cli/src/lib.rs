//! `colorboxd` terminal front-end library crate.
//!
//! Command parsing and text rendering live here so they can be tested
//! without a terminal. The REPL itself is in `main.rs`.

pub mod command;
pub mod render;
