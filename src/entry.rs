use std::ffi::OsString;

use clap::{CommandFactory, FromArgMatches};

use crate::args::AtestArgs;
use crate::error::AppResult;
use crate::logger::{LogLevel, init_logging};

/// Parses the command line, installs logging and runs the command on a
/// multi-threaded runtime.
///
/// # Errors
///
/// Returns the command's error; argument errors exit through clap.
pub fn run() -> AppResult<()> {
    let Some(args) = parse_args()? else {
        return Ok(());
    };

    init_logging(args.log_level() == LogLevel::Debug);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(crate::app::run_command(args))
}

fn parse_args() -> AppResult<Option<AtestArgs>> {
    let mut cmd = AtestArgs::command();
    let raw_args: Vec<OsString> = std::env::args_os().collect();

    if should_show_help(&raw_args) {
        cmd.print_help()?;
        println!();
        return Ok(None);
    }

    let matches = cmd.get_matches_from(raw_args);
    Ok(Some(AtestArgs::from_arg_matches(&matches)?))
}

fn should_show_help(raw_args: &[OsString]) -> bool {
    matches!(raw_args, [] | [_]) || matches!(raw_args, [_, second] if second == "--")
}
