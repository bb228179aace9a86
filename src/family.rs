//! Address-family classification and filtering of the server list.

use std::fmt;

/// Returns `true` if the server literal looks like an IPv6 address.
///
/// Classification is purely by shape: anything containing a colon is IPv6.
#[must_use]
pub fn is_ipv6(server: &str) -> bool {
    server.contains(':')
}

/// Restricts the server list to one address family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FamilyFilter {
    /// Keep every server.
    #[default]
    Any,
    /// Keep IPv4 servers only.
    V4Only,
    /// Keep IPv6 servers only.
    V6Only,
}

impl FamilyFilter {
    /// Builds the filter from the two restriction flags.
    ///
    /// The CLI makes the flags override each other, so both being set can
    /// only come from the environment. IPv6 wins in that case.
    #[must_use]
    pub const fn from_flags(only_ipv4: bool, only_ipv6: bool) -> Self {
        match (only_ipv4, only_ipv6) {
            (_, true) => Self::V6Only,
            (true, false) => Self::V4Only,
            (false, false) => Self::Any,
        }
    }

    /// Returns `true` if `server` passes this filter.
    #[must_use]
    pub fn accepts(self, server: &str) -> bool {
        match self {
            Self::Any => true,
            Self::V4Only => !is_ipv6(server),
            Self::V6Only => is_ipv6(server),
        }
    }

    /// Returns the servers passing this filter, preserving their order.
    #[must_use]
    pub fn apply<S: AsRef<str>>(self, servers: &[S]) -> Vec<String> {
        servers
            .iter()
            .map(AsRef::<str>::as_ref)
            .filter(|s| self.accepts(s))
            .map(str::to_owned)
            .collect()
    }
}

impl fmt::Display for FamilyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Any => "any",
            Self::V4Only => "ipv4-only",
            Self::V6Only => "ipv6-only",
        })
    }
}

/// Splits servers into `(ipv4, ipv6)` lists, preserving relative order.
#[must_use]
pub fn partition<S: AsRef<str>>(servers: &[S]) -> (Vec<String>, Vec<String>) {
    let (v6, v4): (Vec<String>, Vec<String>) = servers
        .iter()
        .map(|s| AsRef::<str>::as_ref(s).to_owned())
        .partition(|s| is_ipv6(s));
    (v4, v6)
}

/// Parses a comma-separated server list, dropping blanks and whitespace.
#[must_use]
pub fn parse_list(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}
