//! NetworkManager per-connection DNS settings.

use crate::family::partition;
use crate::report::StepKind;
use crate::session::Session;

/// An active NetworkManager connection profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveConnection {
    /// Profile name, used in messages only.
    pub name: String,
    /// Profile UUID, used to address the profile in `nmcli` calls.
    pub uuid: String,
    /// Connection type, e.g. `802-3-ethernet`.
    pub kind: String,
    /// Device the profile is active on.
    pub device: String,
}

/// Splits one line of `nmcli -t` output on unescaped colons.
fn split_terse(line: &str) -> Vec<String> {
    let mut fields = vec![String::new()];
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(next) = chars.next() {
                    if let Some(field) = fields.last_mut() {
                        field.push(next);
                    }
                }
            }
            ':' => fields.push(String::new()),
            c => {
                if let Some(field) = fields.last_mut() {
                    field.push(c);
                }
            }
        }
    }
    fields
}

/// Parses `nmcli -t -f NAME,UUID,TYPE,DEVICE connection show --active`.
///
/// Loopback profiles are dropped. Cannot fail; malformed lines are skipped.
#[must_use]
pub fn parse_active_connections(s: &str) -> Vec<ActiveConnection> {
    s.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match split_terse(line).as_slice() {
            [name, uuid, kind, device] => Some(ActiveConnection {
                name: name.clone(),
                uuid: uuid.clone(),
                kind: kind.clone(),
                device: device.clone(),
            }),
            _ => None,
        })
        .filter(|c| !c.uuid.is_empty() && c.kind != "loopback" && c.device != "lo")
        .collect()
}

/// `nmcli connection modify` arguments pinning `servers` on the profile
/// with `uuid`.
///
/// The profile is addressed by UUID since names need not be unique and may
/// collide with `nmcli` keywords. Automatic DNS is disabled for both
/// families and search domains are cleared. A family with no servers gets
/// an empty list.
#[must_use]
pub fn modify_args(uuid: &str, servers: &[String]) -> Vec<String> {
    let (v4, v6) = partition(servers);
    let (v4, v6) = (v4.join(","), v6.join(","));
    [
        "connection",
        "modify",
        "uuid",
        uuid,
        "ipv4.ignore-auto-dns",
        "yes",
        "ipv6.ignore-auto-dns",
        "yes",
        "ipv4.dns",
        v4.as_str(),
        "ipv6.dns",
        v6.as_str(),
        "ipv4.dns-search",
        "",
        "ipv6.dns-search",
        "",
    ]
    .iter()
    .map(|s| (*s).to_owned())
    .collect()
}

/// Pins `servers` on every active connection and reactivates each one.
pub(crate) fn apply(session: &mut Session<'_>, servers: &[String]) {
    let Some(out) = session.query(
        StepKind::ListConnections,
        "nmcli",
        &["-t", "-f", "NAME,UUID,TYPE,DEVICE", "connection", "show", "--active"],
    ) else {
        return;
    };

    let connections = parse_active_connections(&out);
    if connections.is_empty() {
        tracing::info!("{}", session.msgs().nm_no_connections());
        session.skip(StepKind::ListConnections, "no active connection");
        return;
    }

    for conn in connections {
        let args = modify_args(&conn.uuid, servers);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let modified =
            session.command(StepKind::ModifyConnection(conn.name.clone()), "nmcli", &args);

        let reactivated = session.command(
            StepKind::ReactivateConnection(conn.name.clone()),
            "nmcli",
            &["connection", "up", "uuid", conn.uuid.as_str()],
        );
        if modified && reactivated {
            tracing::info!(
                device = %conn.device,
                "{}",
                session.msgs().nm_configured(&conn.name)
            );
        }
    }
}
