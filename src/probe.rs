//! Capability probing and method selection.

use crate::command::CommandRunner;
use crate::config::{Method, MethodChoice};

/// What the host offers for DNS management.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Capabilities {
    /// `systemd-resolved.service` is active.
    pub resolved_active: bool,
    /// `resolvectl` is on `PATH`.
    pub resolvectl: bool,
    /// `NetworkManager.service` is active.
    pub nm_active: bool,
    /// `nmcli` is on `PATH`.
    pub nmcli: bool,
    /// Legacy `systemd-resolve` is on `PATH`.
    pub systemd_resolve: bool,
    /// `chattr` is on `PATH`.
    pub chattr: bool,
}

impl Capabilities {
    /// Probes the host through `commands`.
    ///
    /// Never fails: anything that cannot be determined counts as absent.
    pub fn probe(commands: &dyn CommandRunner) -> Self {
        let caps = Self {
            resolved_active: service_active(commands, "systemd-resolved"),
            resolvectl: commands.exists("resolvectl"),
            nm_active: service_active(commands, "NetworkManager"),
            nmcli: commands.exists("nmcli"),
            systemd_resolve: commands.exists("systemd-resolve"),
            chattr: commands.exists("chattr"),
        };
        tracing::debug!(?caps, "Probed DNS capabilities");
        caps
    }
}

fn service_active(commands: &dyn CommandRunner, unit: &str) -> bool {
    commands
        .run("systemctl", &["is-active", "--quiet", unit])
        .is_ok_and(|out| out.success)
}

/// Picks the method for this run.
///
/// An explicit choice is returned as-is. Otherwise `systemd-resolved` wins
/// over NetworkManager, and the static file is the universal fallback.
#[must_use]
pub const fn select_method(choice: MethodChoice, caps: &Capabilities) -> Method {
    match choice {
        MethodChoice::Resolved => Method::Resolved,
        MethodChoice::Nm => Method::NetworkManager,
        MethodChoice::Resolv => Method::StaticFile,
        MethodChoice::Auto if caps.resolved_active && caps.resolvectl => Method::Resolved,
        MethodChoice::Auto if caps.nm_active && caps.nmcli => Method::NetworkManager,
        MethodChoice::Auto => Method::StaticFile,
    }
}
