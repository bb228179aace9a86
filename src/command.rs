//! External command execution.
//!
//! Every tool the crate shells out to (`systemctl`, `nmcli`, `resolvectl`,
//! `chattr`) goes through [`CommandRunner`], so the orchestration can be
//! tested with a recording fake.

use crate::report::StepError;
use std::io;
use std::process::Command;

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Whether the command exited with status 0.
    pub success: bool,
    /// Standard output, lossily decoded.
    pub stdout: String,
    /// Standard error, lossily decoded.
    pub stderr: String,
}

impl CommandOutput {
    /// A successful run with the given stdout.
    #[must_use]
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed run with the given stderr.
    #[must_use]
    pub fn failed(stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Runs external programs synchronously.
pub trait CommandRunner {
    /// Runs `program` with `args` and waits for it to exit.
    ///
    /// # Errors
    ///
    /// Returns an error only if the program could not be spawned. A non-zero
    /// exit status is reported through [`CommandOutput::success`].
    fn run(&self, program: &str, args: &[&str]) -> io::Result<CommandOutput>;

    /// Returns `true` if `program` can be found on `PATH`.
    fn exists(&self, program: &str) -> bool;
}

/// Runs commands on the real system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> io::Result<CommandOutput> {
        tracing::debug!(program, ?args, "Running command");
        let output = Command::new(program).args(args).output()?;
        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn exists(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

/// Turns a finished command into `Ok(stdout)` or a [`StepError`].
pub(crate) fn check(
    program: &str,
    args: &[&str],
    result: io::Result<CommandOutput>,
) -> Result<String, StepError> {
    match result {
        Ok(out) if out.success => Ok(out.stdout),
        Ok(out) => Err(StepError::Exit {
            command: std::iter::once(program)
                .chain(args.iter().copied())
                .collect::<Vec<_>>()
                .join(" "),
            stderr: out.stderr.trim().to_owned(),
        }),
        Err(e) => Err(StepError::Spawn {
            program: program.to_owned(),
            reason: e.to_string(),
        }),
    }
}
