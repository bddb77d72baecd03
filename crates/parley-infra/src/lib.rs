//! Infrastructure layer for Parley.
//!
//! Contains implementations of the service port defined in `parley-core`:
//! the HTTP client for the remote interview service, an in-memory service
//! for offline use and tests, and the `parley.toml` configuration loader.

pub mod config;
pub mod http;
pub mod memory;
