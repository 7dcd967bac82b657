//! CLI argument types and parsing helpers.
mod cli;
pub(crate) mod parsers;
mod types;


pub use cli::{AtestArgs, CheckArgs, Command, RunArgs};
pub use types::PositiveUsize;
