//! Per-step outcomes of a run.

use crate::config::Method;
use crate::verify::Verification;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A mutating or probing step the run attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepKind {
    /// Timestamped copy of `resolv.conf`.
    Backup,
    /// Copy of the newest backup over `resolv.conf`.
    Restore,
    /// Writing the `systemd-resolved` drop-in.
    WriteDropIn(PathBuf),
    /// Removing the `systemd-resolved` drop-in.
    RemoveDropIn(PathBuf),
    /// Restarting a systemd unit.
    RestartService(&'static str),
    /// Listing active NetworkManager connections.
    ListConnections,
    /// Changing DNS settings of one connection.
    ModifyConnection(String),
    /// Reactivating one connection.
    ReactivateConnection(String),
    /// Clearing the immutable attribute on a file.
    ClearImmutable(PathBuf),
    /// Removing a symlink in the way of a static file.
    RemoveSymlink(PathBuf),
    /// Writing the static `resolv.conf`.
    WriteResolvConf(PathBuf),
    /// Flushing the resolver cache.
    FlushCache,
    /// Copying the executable to its install location.
    Install(PathBuf),
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backup => f.write_str("backup resolv.conf"),
            Self::Restore => f.write_str("restore resolv.conf"),
            Self::WriteDropIn(p) => write!(f, "write {}", p.display()),
            Self::RemoveDropIn(p) => write!(f, "remove {}", p.display()),
            Self::RestartService(unit) => write!(f, "restart {unit}"),
            Self::ListConnections => f.write_str("list active connections"),
            Self::ModifyConnection(c) => write!(f, "modify connection {c}"),
            Self::ReactivateConnection(c) => write!(f, "reactivate connection {c}"),
            Self::ClearImmutable(p) => write!(f, "chattr -i {}", p.display()),
            Self::RemoveSymlink(p) => write!(f, "remove symlink {}", p.display()),
            Self::WriteResolvConf(p) => write!(f, "write {}", p.display()),
            Self::FlushCache => f.write_str("flush DNS cache"),
            Self::Install(p) => write!(f, "install to {}", p.display()),
        }
    }
}

/// Why a best-effort step failed.
///
/// The `Display` text is English; user-facing output goes through
/// [`Messages::step_error`](crate::Messages::step_error).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepError {
    /// The program could not be started.
    #[error("failed to run `{program}`: {reason}")]
    Spawn {
        /// Program name as invoked.
        program: String,
        /// Operating system error.
        reason: String,
    },

    /// The program ran and exited with a non-zero status.
    #[error("`{command}` exited non-zero: {stderr}")]
    Exit {
        /// Full command line.
        command: String,
        /// Trimmed standard error.
        stderr: String,
    },

    /// A filesystem operation failed.
    #[error("{0}")]
    Io(String),
}

impl From<io::Error> for StepError {
    fn from(e: io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

/// How a step ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step ran and succeeded.
    Done,
    /// The step was not attempted (dry run, missing tool, nothing to do).
    Skipped(String),
    /// The step failed; the run carried on.
    FailedIgnored(StepError),
}

/// One recorded step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// What was attempted.
    pub kind: StepKind,
    /// How it ended.
    pub outcome: StepOutcome,
}

/// Everything a run did, in order.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// The method that ran, if the run applied servers.
    pub method: Option<Method>,
    /// Steps in execution order.
    pub steps: Vec<Step>,
    /// Verification result, if verification ran.
    pub verification: Option<Verification>,
}

impl RunReport {
    pub(crate) fn record(&mut self, kind: StepKind, outcome: StepOutcome) {
        self.steps.push(Step { kind, outcome });
    }

    /// Steps that failed and were ignored.
    pub fn failures(&self) -> impl Iterator<Item = &Step> {
        self.steps
            .iter()
            .filter(|s| matches!(s.outcome, StepOutcome::FailedIgnored(_)))
    }

    /// Returns `true` if any step actually changed the system.
    #[must_use]
    pub fn mutated(&self) -> bool {
        self.steps.iter().any(|s| s.outcome == StepOutcome::Done)
    }

    /// Outcome of the first step matching `kind`.
    #[must_use]
    pub fn outcome_of(&self, kind: &StepKind) -> Option<&StepOutcome> {
        self.steps
            .iter()
            .find(|s| &s.kind == kind)
            .map(|s| &s.outcome)
    }

    /// Returns `true` if verification ran and found the expected address.
    #[must_use]
    pub fn verified(&self) -> bool {
        self.verification.as_ref().is_some_and(|v| v.matched)
    }
}
