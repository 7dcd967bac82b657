//! Core library for the `atest` CLI.
//!
//! A suite is a list of HTTP test cases. Each case renders its request from
//! templates, sends it, checks the response against layered expectations
//! (status, headers, body, field paths and boolean expressions) and records
//! the timing. Records aggregate into a per-endpoint report. The primary
//! user-facing interface is the `atest` command-line application.
pub mod app;
pub mod args;
pub mod config;
pub mod entry;
pub mod error;
pub mod expr;
pub mod http;
pub mod json;
pub mod logger;
pub mod report;
pub mod runner;
pub mod shutdown;
pub mod suite;
pub mod template;
pub mod verify;

#[cfg(test)]
mod test_support;
