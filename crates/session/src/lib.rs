//! The Colorboxd list reorder engine.
//!
//! [`session::ReorderSession`] is the state machine for one list,
//! [`menu::ListMenu`] tracks the user's lists and the minimum-length guard,
//! [`cache::ListCache`] keeps fetched lists, and
//! [`controller::SortController`] wires them to a
//! [`ListBackend`](colorboxd_core::backend::ListBackend). No state is
//! global; the interface layer owns a controller and passes it around.

pub mod cache;
pub mod config;
pub mod controller;
pub mod menu;
pub mod session;
