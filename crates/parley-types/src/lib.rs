//! Shared domain types for Parley.
//!
//! This crate contains the domain types used across the Parley client state
//! layer: Interview, Response, Message, sentiment tags, list filters and view
//! parameters, client configuration, and the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod error;
pub mod filter;
pub mod interview;
pub mod message;
pub mod response;
pub mod tag;
pub mod view;
