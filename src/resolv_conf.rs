//! Static `/etc/resolv.conf` and `systemd-resolved` drop-in content.
//!
//! Both files start with [`MANAGED_BY_MARKER`] so later runs (and
//! `--restore`) can tell them apart from files written by other tools.

use crate::report::{StepError, StepKind};
use crate::session::Session;
use std::path::Path;

/// Marker line embedded in every file this crate writes.
pub const MANAGED_BY_MARKER: &str = "# managed by linux-resolver";

/// Resolver options appended to every generated `resolv.conf`.
pub const RESOLV_OPTIONS: &str = "options timeout:2 attempts:3";

/// Generates `resolv.conf` content.
///
/// ```text
/// # managed by linux-resolver
/// nameserver 1.1.1.1
/// nameserver 2606:4700:4700::1111
/// options timeout:2 attempts:3
/// ```
#[must_use]
pub fn render_resolv_conf<S: AsRef<str>>(servers: &[S]) -> String {
    let mut out = format!("{MANAGED_BY_MARKER}\n");
    for server in servers {
        out.push_str("nameserver ");
        out.push_str(server.as_ref());
        out.push('\n');
    }
    out.push_str(RESOLV_OPTIONS);
    out.push('\n');
    out
}

/// Generates the `systemd-resolved` drop-in.
///
/// ```text
/// # managed by linux-resolver
/// [Resolve]
/// DNS=1.1.1.1 2606:4700:4700::1111
/// FallbackDNS=
/// ```
#[must_use]
pub fn render_dropin<S: AsRef<str>>(servers: &[S]) -> String {
    let dns = servers
        .iter()
        .map(AsRef::<str>::as_ref)
        .collect::<Vec<_>>()
        .join(" ");
    format!("{MANAGED_BY_MARKER}\n[Resolve]\nDNS={dns}\nFallbackDNS=\n")
}

/// Checks whether a file contains the ownership marker.
#[must_use]
pub fn is_managed(path: &Path) -> bool {
    std::fs::read_to_string(path).is_ok_and(|c| c.contains(MANAGED_BY_MARKER))
}

/// Makes `path` writable as a plain file.
///
/// Clears the immutable attribute if `chattr` is available and removes
/// the file if it is a symlink (e.g. to the `systemd-resolved` stub).
pub(crate) fn prepare_target(session: &mut Session<'_>, path: &Path) {
    let Ok(meta) = std::fs::symlink_metadata(path) else {
        return;
    };

    if meta.file_type().is_symlink() {
        session.mutate(StepKind::RemoveSymlink(path.to_owned()), || {
            std::fs::remove_file(path).map_err(StepError::from)
        });
        return;
    }

    let kind = StepKind::ClearImmutable(path.to_owned());
    if session.caps().chattr {
        let path = path.display().to_string();
        session.command(kind, "chattr", &["-i", path.as_str()]);
    } else {
        session.skip(kind, "chattr not found");
    }
}

/// Writes the static `resolv.conf` listing `servers`.
pub(crate) fn apply(session: &mut Session<'_>, servers: &[String]) {
    let path = session.paths().resolv_conf.clone();
    prepare_target(session, &path);

    let content = render_resolv_conf(servers);
    let written = session.mutate(StepKind::WriteResolvConf(path.clone()), || {
        write_file(&path, &content).map_err(StepError::from)
    });
    if written {
        tracing::info!(path = %path.display(), "{}", session.msgs().resolv_written(&path));
    }
}

/// Writes `content` to `path`, creating parent directories as needed.
pub(crate) fn write_file(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)
}
