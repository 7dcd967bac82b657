mod check;
mod output;
mod run;

#[cfg(test)]
mod tests;

pub use check::check_suite;
pub use run::run_suite_file;

use crate::args::{AtestArgs, Command};
use crate::error::AppResult;

/// Dispatches the parsed command line.
///
/// # Errors
///
/// Returns an error when the suite cannot be loaded, a check finds problems
/// or any case fails.
pub async fn run_command(args: AtestArgs) -> AppResult<()> {
    let level = args.log_level();
    match args.command {
        Command::Run(run) => run_suite_file(&run, level).await,
        Command::Check(check) => check::run_check(&check.suite),
    }
}
