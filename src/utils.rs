use std::ffi::{ OsStr, OsString };
use std::process::Command;
use tracing::debug;

use crate::error::{ Result, SummaryError };

/// The cargo binary to invoke; honors `CARGO` so we use the same toolchain
/// when running as a cargo subcommand
fn cargo_binary() -> OsString {
    std::env::var_os("CARGO").unwrap_or_else(|| OsString::from("cargo"))
}

/// Run `cargo` with the given arguments and return its stdout.
///
/// A non-zero exit status is an error carrying cargo's stderr.
pub fn run_cargo<S: AsRef<OsStr>>(args: &[S]) -> Result<String> {
    let mut command_line = String::from("cargo");
    for arg in args {
        command_line.push(' ');
        command_line.push_str(&arg.as_ref().to_string_lossy());
    }
    debug!("Running {}", command_line);

    let output = Command::new(cargo_binary())
        .args(args)
        .output()
        .map_err(|source| SummaryError::CommandSpawn {
            command: command_line.clone(),
            source,
        })?;

    if !output.status.success() {
        debug!("{} exited with {}", command_line, output.status);
        return Err(SummaryError::CommandFailed {
            command: command_line,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    String::from_utf8(output.stdout).map_err(|_| SummaryError::CommandOutput {
        command: command_line,
    })
}
