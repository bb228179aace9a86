//! Run orchestration.
//!
//! A run is strictly sequential: filter servers, pick a method, back up
//! `resolv.conf`, apply, flush the cache, wait for the resolver to settle,
//! verify. Every mutating step is best-effort and dry-run aware; its
//! outcome lands in the [`RunReport`].

use crate::backup;
use crate::command::{CommandRunner, SystemRunner, check};
use crate::config::{Action, Config, Method, Paths};
use crate::error::{ResolverError, Result};
use crate::i18n::Messages;
use crate::network_manager;
use crate::probe::{Capabilities, select_method};
use crate::report::{RunReport, StepError, StepKind, StepOutcome};
use crate::resolv_conf;
use crate::resolved;
use crate::util::{atomic_error, is_root};
use crate::verify::{HostLookup, SystemLookup, verify};
use std::path::Path;
use std::time::Duration;

/// Pause between applying the change and verifying it.
pub const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// The host a run acts on: file locations, command runner, name lookup.
pub struct Host<'a> {
    /// Files the run reads and writes.
    pub paths: Paths,
    /// Runs `systemctl`, `nmcli`, `resolvectl` and friends.
    pub commands: &'a dyn CommandRunner,
    /// Resolves the verification domain.
    pub lookup: &'a dyn HostLookup,
    /// Delay before verification.
    pub settle: Duration,
    /// Whether to insist on an effective UID of 0 outside dry-run mode.
    pub require_root: bool,
}

impl Host<'static> {
    /// The real system: default paths, real commands, `getaddrinfo`.
    #[must_use]
    pub fn system() -> Self {
        Self {
            paths: Paths::default(),
            commands: &SystemRunner,
            lookup: &SystemLookup,
            settle: SETTLE_DELAY,
            require_root: true,
        }
    }
}

/// Mutable state threaded through one run.
pub(crate) struct Session<'a> {
    config: &'a Config,
    host: &'a Host<'a>,
    msgs: Messages,
    caps: Capabilities,
    report: RunReport,
}

impl<'a> Session<'a> {
    fn new(config: &'a Config, host: &'a Host<'a>) -> Self {
        Self {
            config,
            host,
            msgs: Messages::new(config.language),
            caps: Capabilities::probe(host.commands),
            report: RunReport::default(),
        }
    }

    pub(crate) const fn msgs(&self) -> Messages {
        self.msgs
    }

    pub(crate) const fn caps(&self) -> &Capabilities {
        &self.caps
    }

    pub(crate) const fn paths(&self) -> &Paths {
        &self.host.paths
    }

    /// Runs a mutating step unless this is a dry run.
    ///
    /// Returns `true` only if the step ran and succeeded.
    pub(crate) fn mutate(
        &mut self,
        kind: StepKind,
        step: impl FnOnce() -> std::result::Result<(), StepError>,
    ) -> bool {
        if self.config.dry_run {
            tracing::info!("{}", self.msgs.would_run(&kind));
            self.report
                .record(kind, StepOutcome::Skipped("dry run".to_owned()));
            return false;
        }
        match step() {
            Ok(()) => {
                tracing::debug!(step = %kind, "Step done");
                self.report.record(kind, StepOutcome::Done);
                true
            }
            Err(e) => {
                tracing::warn!("{}", self.msgs.step_failed(&kind, &e));
                self.report.record(kind, StepOutcome::FailedIgnored(e));
                false
            }
        }
    }

    /// Runs an external mutating command as a best-effort step.
    pub(crate) fn command(&mut self, kind: StepKind, program: &str, args: &[&str]) -> bool {
        let commands = self.host.commands;
        self.mutate(kind, || {
            check(program, args, commands.run(program, args)).map(drop)
        })
    }

    /// Runs a read-only command; dry-run does not suppress it.
    pub(crate) fn query(&mut self, kind: StepKind, program: &str, args: &[&str]) -> Option<String> {
        match check(program, args, self.host.commands.run(program, args)) {
            Ok(stdout) => Some(stdout),
            Err(e) => {
                tracing::warn!("{}", self.msgs.step_failed(&kind, &e));
                self.report.record(kind, StepOutcome::FailedIgnored(e));
                None
            }
        }
    }

    pub(crate) fn skip(&mut self, kind: StepKind, reason: &str) {
        tracing::debug!(step = %kind, reason, "Step skipped");
        self.report
            .record(kind, StepOutcome::Skipped(reason.to_owned()));
    }

    fn backup(&mut self) {
        let target = self.host.paths.resolv_conf.clone();
        if !target.exists() {
            tracing::info!("{}", self.msgs.backup_missing_source(&target));
            self.skip(StepKind::Backup, "resolv.conf does not exist");
            return;
        }
        let mut created = None;
        self.mutate(StepKind::Backup, || {
            created = backup::create(&target)?;
            Ok(())
        });
        if let Some(path) = created {
            tracing::info!("{}", self.msgs.backup_created(&path));
        }
    }

    fn flush_cache(&mut self) {
        let (program, args): (&str, &[&str]) = if self.caps.resolvectl {
            ("resolvectl", &["flush-caches"])
        } else if self.caps.systemd_resolve {
            ("systemd-resolve", &["--flush-caches"])
        } else {
            tracing::info!("{}", self.msgs.cache_flush_unavailable());
            self.skip(StepKind::FlushCache, "no flush command");
            return;
        };
        if self.command(StepKind::FlushCache, program, args) {
            tracing::info!("{}", self.msgs.cache_flushed());
        }
    }

    fn finish(self) -> RunReport {
        self.report
    }
}

fn ensure_root(config: &Config, host: &Host<'_>) -> Result<()> {
    if host.require_root && !config.dry_run && !is_root() {
        return Err(ResolverError::NotRoot);
    }
    Ok(())
}

/// Executes the action requested by `config` against `host`.
///
/// # Errors
///
/// Returns [`ResolverError::NotRoot`] without root outside dry-run mode,
/// [`ResolverError::EmptyOption`] for an empty domain or expected address,
/// [`ResolverError::NoServers`] if the family filter empties the server
/// list, and [`ResolverError::Io`] if a restore or install cannot read
/// what it needs. Failures of individual apply steps are not errors.
pub fn execute(config: &Config, host: &Host<'_>) -> Result<RunReport> {
    match config.action {
        Action::Apply => apply(config, host),
        Action::Restore => restore(config, host),
        Action::Install => install(config, host),
    }
}

/// Applies the configured servers and verifies the result.
///
/// # Errors
///
/// See [`execute`].
pub fn apply(config: &Config, host: &Host<'_>) -> Result<RunReport> {
    ensure_root(config, host)?;
    let msgs = Messages::new(config.language);

    if config.domain.trim().is_empty() {
        return Err(ResolverError::EmptyOption { option: "--domain" });
    }
    if config.expect.trim().is_empty() {
        return Err(ResolverError::EmptyOption { option: "--expect" });
    }

    let servers = config.servers();
    if servers.is_empty() {
        return Err(ResolverError::NoServers {
            filter: config.family,
        });
    }

    if config.dry_run {
        tracing::info!("{}", msgs.dry_run_banner());
    }
    tracing::info!("{}", msgs.servers(&servers));

    let mut session = Session::new(config, host);
    let method = select_method(config.method, session.caps());
    tracing::info!(%method, "{}", msgs.method_selected(method));
    session.report.method = Some(method);

    session.backup();

    match method {
        Method::Resolved => resolved::apply(&mut session, &servers),
        Method::NetworkManager => network_manager::apply(&mut session, &servers),
        Method::StaticFile => resolv_conf::apply(&mut session, &servers),
    }
    if config.strict && method != Method::StaticFile {
        resolv_conf::apply(&mut session, &servers);
    }

    session.flush_cache();

    std::thread::sleep(host.settle);

    let verification = verify(host.lookup, &config.domain, &config.expect);
    if let Some(error) = &verification.lookup_error {
        tracing::warn!("{}", msgs.lookup_failed(&config.domain, error));
    }
    if verification.matched {
        tracing::info!("{}", msgs.verify_ok(&config.domain, &config.expect));
    } else {
        tracing::warn!(
            "{}",
            msgs.verify_failed(&config.domain, &config.expect, &verification.addresses)
        );
    }

    let mut report = session.finish();
    report.verification = Some(verification);
    tracing::info!(failures = report.failures().count(), "{}", msgs.done());
    Ok(report)
}

/// Copies the newest `resolv.conf` backup back into place and removes the
/// managed `systemd-resolved` drop-in.
///
/// # Errors
///
/// See [`execute`].
pub fn restore(config: &Config, host: &Host<'_>) -> Result<RunReport> {
    ensure_root(config, host)?;
    let mut session = Session::new(config, host);
    let msgs = session.msgs();
    let target = host.paths.resolv_conf.clone();

    match backup::latest(&target)? {
        None => {
            tracing::info!("{}", msgs.no_backup());
            session.skip(StepKind::Restore, "no backup");
        }
        Some(from) => {
            resolv_conf::prepare_target(&mut session, &target);
            let restored = session.mutate(StepKind::Restore, || {
                std::fs::copy(&from, &target)?;
                Ok(())
            });
            if restored {
                tracing::info!("{}", msgs.restored(&from));
            }
        }
    }

    resolved::remove(&mut session);
    Ok(session.finish())
}

/// Copies the running executable to the install target with mode `0755`.
///
/// The copy is renamed into place, so replacing a binary that is
/// currently running works.
///
/// # Errors
///
/// See [`execute`].
pub fn install(config: &Config, host: &Host<'_>) -> Result<RunReport> {
    ensure_root(config, host)?;
    let source = std::env::current_exe()?;
    install_from(config, host, &source)
}

pub(crate) fn install_from(config: &Config, host: &Host<'_>, source: &Path) -> Result<RunReport> {
    use atomicwrites::{AtomicFile, OverwriteBehavior};
    use std::os::unix::fs::PermissionsExt;

    let msgs = Messages::new(config.language);
    let target = host.paths.install_target.clone();
    let mut report = RunReport::default();

    if config.dry_run {
        tracing::info!("{}", msgs.would_run(&StepKind::Install(target.clone())));
        report.record(
            StepKind::Install(target),
            StepOutcome::Skipped("dry run".to_owned()),
        );
        return Ok(report);
    }

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }
    AtomicFile::new(&target, OverwriteBehavior::AllowOverwrite)
        .write(|f| {
            std::io::copy(&mut std::fs::File::open(source)?, f)?;
            f.set_permissions(std::fs::Permissions::from_mode(0o755))
        })
        .map_err(atomic_error)?;
    tracing::info!("{}", msgs.installed(&target));
    report.record(StepKind::Install(target), StepOutcome::Done);
    Ok(report)
}
