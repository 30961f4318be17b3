//! HTTP client for the Colorboxd backend.
//!
//! Provides the [`reqwest`]-based [`ListBackend`](colorboxd_core::backend::ListBackend)
//! implementation, environment configuration, and user token persistence.

pub mod api;
pub mod config;
pub mod token_store;
