//! Suite file loading and validation.
mod loader;

#[cfg(test)]
mod tests;

pub use loader::{load_suite, parse_suite};
