//! Client state layer for Parley.
//!
//! This crate defines the remote-service port ([`service::InterviewService`])
//! that the infrastructure layer implements, plus the stores built on top of
//! it: the interview collection store, the entity detail stores, chat
//! sessions, and the pure view derivation they share. It depends only on
//! `parley-types` -- never on `parley-infra` or any HTTP crate.

pub mod chat;
pub mod detail;
pub mod service;
pub mod store;
pub mod view;

#[cfg(test)]
pub(crate) mod test_support;
