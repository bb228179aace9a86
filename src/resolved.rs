//! `systemd-resolved` drop-in management.

use crate::report::{StepError, StepKind};
use crate::resolv_conf::{is_managed, render_dropin, write_file};
use crate::session::Session;

/// Unit restarted after the drop-in changes.
pub const RESOLVED_UNIT: &str = "systemd-resolved";

/// Writes the drop-in declaring `servers` and restarts the service.
pub(crate) fn apply(session: &mut Session<'_>, servers: &[String]) {
    let path = session.paths().dropin.clone();
    let content = render_dropin(servers);

    let written = session.mutate(StepKind::WriteDropIn(path.clone()), || {
        write_file(&path, &content).map_err(StepError::from)
    });
    if written {
        tracing::info!(path = %path.display(), "{}", session.msgs().dropin_written(&path));
    }

    restart(session);
}

/// Removes the drop-in if this crate wrote it, then restarts the service.
///
/// Drop-ins without the ownership marker are left alone.
pub(crate) fn remove(session: &mut Session<'_>) {
    let path = session.paths().dropin.clone();
    let kind = StepKind::RemoveDropIn(path.clone());

    if !path.exists() {
        session.skip(kind, "no drop-in");
        return;
    }
    if !is_managed(&path) {
        tracing::warn!("{}", session.msgs().dropin_not_managed(&path));
        session.skip(kind, "not managed");
        return;
    }

    let removed = session.mutate(kind, || {
        std::fs::remove_file(&path).map_err(StepError::from)
    });
    if removed {
        tracing::info!("{}", session.msgs().dropin_removed(&path));
    }

    restart(session);
}

fn restart(session: &mut Session<'_>) {
    session.command(
        StepKind::RestartService(RESOLVED_UNIT),
        "systemctl",
        &["restart", RESOLVED_UNIT],
    );
}
