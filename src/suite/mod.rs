//! Declarative test case model loaded from suite files.
mod types;


pub use types::{Clean, Expect, Prepare, Request, Suite, TestCase};
