//! Drives test cases through prepare, render, send, verify, record and
//! cleanup, one case at a time or a whole suite across workers.
mod case;
mod config;
mod resources;
mod suite;


pub use case::CaseRunner;
pub use config::{DEFAULT_REQUEST_TIMEOUT, RunnerConfig};
pub use resources::{DEFAULT_KUBECTL, KubectlPort, ResourcePort};
pub use suite::{SuiteOptions, SuiteOutcome, run_suite};
