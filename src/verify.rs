//! Post-change verification.

use dns_lookup::{AddrInfoHints, AddrInfoIter, LookupError};
use std::io;
use std::net::IpAddr;

/// Resolves host names through the system's name service.
pub trait HostLookup {
    /// Returns the addresses `domain` resolves to.
    ///
    /// # Errors
    ///
    /// Returns an error if the name service reports a failure for every
    /// address family.
    fn lookup(&self, domain: &str) -> io::Result<Vec<IpAddr>>;
}

/// Uses `getaddrinfo`, which follows `/etc/nsswitch.conf` like `getent ahosts`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLookup;

impl HostLookup for SystemLookup {
    fn lookup(&self, domain: &str) -> io::Result<Vec<IpAddr>> {
        let v4: io::Result<Vec<_>> = lookup_family(domain, libc::AF_INET)
            .map_err(Into::into)
            .and_then(|a| a.collect());
        let v6: io::Result<Vec<_>> = lookup_family(domain, libc::AF_INET6)
            .map_err(Into::into)
            .and_then(|a| a.collect());
        match (v4, v6) {
            (Ok(v4), Ok(v6)) => Ok(v4
                .iter()
                .chain(v6.iter())
                .map(|a| a.sockaddr.ip())
                .collect()),
            (Ok(v4), Err(_)) => Ok(v4.iter().map(|a| a.sockaddr.ip()).collect()),
            (Err(_), Ok(v6)) => Ok(v6.iter().map(|a| a.sockaddr.ip()).collect()),
            (Err(e), Err(_)) => Err(e),
        }
    }
}

fn lookup_family(domain: &str, family: i32) -> Result<AddrInfoIter, LookupError> {
    dns_lookup::getaddrinfo(
        Some(domain),
        None,
        Some(AddrInfoHints {
            socktype: libc::SOCK_STREAM,
            address: family,
            ..Default::default()
        }),
    )
}

/// Outcome of resolving the test domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    /// The domain that was resolved.
    pub domain: String,
    /// The address that was expected.
    pub expected: String,
    /// Distinct addresses returned, in resolver order.
    pub addresses: Vec<String>,
    /// Whether `expected` is among `addresses`.
    pub matched: bool,
    /// Why the lookup failed, if it did.
    pub lookup_error: Option<String>,
}

impl Verification {
    /// Builds a verification result from raw lookup output.
    ///
    /// Addresses are deduplicated keeping first occurrence, and `expected`
    /// is matched by exact string equality.
    pub fn from_addresses<I, S>(domain: &str, expected: &str, addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut distinct: Vec<String> = Vec::new();
        for addr in addresses {
            let addr = addr.into();
            if !distinct.contains(&addr) {
                distinct.push(addr);
            }
        }
        let matched = distinct.iter().any(|a| a == expected);
        Self {
            domain: domain.to_owned(),
            expected: expected.to_owned(),
            addresses: distinct,
            matched,
            lookup_error: None,
        }
    }
}

/// Resolves `domain` and checks for `expected`.
///
/// A failed lookup is a mismatch with no addresses and the failure in
/// [`Verification::lookup_error`], never an error.
pub fn verify(lookup: &dyn HostLookup, domain: &str, expected: &str) -> Verification {
    match lookup.lookup(domain) {
        Ok(addrs) => {
            Verification::from_addresses(domain, expected, addrs.iter().map(ToString::to_string))
        }
        Err(e) => {
            tracing::debug!(domain, error = %e, "Lookup failed");
            Verification {
                lookup_error: Some(e.to_string()),
                ..Verification::from_addresses(domain, expected, Vec::<String>::new())
            }
        }
    }
}
