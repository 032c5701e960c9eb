//! Core library for the `timestamper` CLI.
//!
//! This crate provides the timestamp engine behind the binary: the notation
//! parser, per-platform page readers, the bounded-retry comment loader, the
//! per-video session cache, progress-bar marker projection and the JSON
//! command protocol. Pages are reached through the [`page::HostPage`] trait so
//! the engine runs the same against a live page bridge or a static fixture.
pub mod args;
pub mod config;
pub mod domain;
pub mod error;
pub mod loader;
pub mod overlay;
pub mod page;
pub mod parser;
pub mod platform;
pub mod protocol;
pub mod session;
