//! Run configuration.

use crate::family::FamilyFilter;
use crate::i18n::Language;
use std::fmt;
use std::path::PathBuf;

/// Default server list.
pub const DEFAULT_DNS: &str = "1.1.1.1,1.0.0.1,2606:4700:4700::1111";
/// Default domain resolved to verify the change.
pub const DEFAULT_DOMAIN: &str = "unlock.isif.net";
/// Default address the verification domain is expected to resolve to.
pub const DEFAULT_EXPECT: &str = "1.1.1.1";

/// How the tool should apply DNS settings, as requested by the user.
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MethodChoice {
    /// Pick the best available method.
    #[default]
    Auto,
    /// Write a `systemd-resolved` drop-in.
    Resolved,
    /// Configure every active NetworkManager connection.
    Nm,
    /// Write `/etc/resolv.conf` directly.
    Resolv,
}

/// The method that actually runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `systemd-resolved` drop-in plus service restart.
    Resolved,
    /// Per-connection `nmcli` settings.
    NetworkManager,
    /// Static `/etc/resolv.conf`.
    StaticFile,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Resolved => "resolved",
            Self::NetworkManager => "nm",
            Self::StaticFile => "resolv",
        })
    }
}

/// What the process has been asked to do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Action {
    /// Apply the DNS servers and verify.
    #[default]
    Apply,
    /// Copy the newest `resolv.conf` backup back into place.
    Restore,
    /// Copy the running executable to the install location.
    Install,
}

/// Immutable configuration for one run.
///
/// Built once from defaults, environment and CLI flags, then passed by
/// reference to every component.
#[derive(Debug, Clone)]
pub struct Config {
    /// Output language.
    pub language: Language,
    /// Configured servers, before family filtering.
    pub dns: Vec<String>,
    /// Domain resolved during verification.
    pub domain: String,
    /// Address `domain` must resolve to.
    pub expect: String,
    /// Requested method.
    pub method: MethodChoice,
    /// Address-family restriction.
    pub family: FamilyFilter,
    /// Log planned mutations without performing them.
    pub dry_run: bool,
    /// Only print warnings and errors.
    pub quiet: bool,
    /// Always write the static `resolv.conf` after the resolved or nm method.
    pub strict: bool,
    /// Requested action.
    pub action: Action,
}

impl Config {
    /// Creates a config with the built-in defaults and the given language.
    #[must_use]
    pub fn new(language: Language) -> Self {
        Self {
            language,
            dns: crate::family::parse_list(DEFAULT_DNS),
            domain: DEFAULT_DOMAIN.to_owned(),
            expect: DEFAULT_EXPECT.to_owned(),
            method: MethodChoice::Auto,
            family: FamilyFilter::Any,
            dry_run: false,
            quiet: false,
            strict: false,
            action: Action::Apply,
        }
    }

    /// Overrides the server list.
    #[must_use]
    pub fn with_dns<S: Into<String>>(mut self, dns: impl IntoIterator<Item = S>) -> Self {
        self.dns = dns.into_iter().map(Into::into).collect();
        self
    }

    /// Overrides the verification domain and expected address.
    #[must_use]
    pub fn with_check(mut self, domain: impl Into<String>, expect: impl Into<String>) -> Self {
        self.domain = domain.into();
        self.expect = expect.into();
        self
    }

    /// Overrides the requested method.
    #[must_use]
    pub const fn with_method(mut self, method: MethodChoice) -> Self {
        self.method = method;
        self
    }

    /// Overrides the family filter.
    #[must_use]
    pub const fn with_family(mut self, family: FamilyFilter) -> Self {
        self.family = family;
        self
    }

    /// Enables or disables dry-run mode.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Enables or disables strict mode.
    #[must_use]
    pub const fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Overrides the requested action.
    #[must_use]
    pub const fn with_action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    /// Servers remaining after the family filter, in configured order.
    #[must_use]
    pub fn servers(&self) -> Vec<String> {
        self.family.apply(&self.dns)
    }
}

/// Filesystem locations the tool reads and writes.
///
/// Backups live next to `resolv_conf`.
#[derive(Debug, Clone)]
pub struct Paths {
    /// The live `resolv.conf`.
    pub resolv_conf: PathBuf,
    /// `systemd-resolved` drop-in file.
    pub dropin: PathBuf,
    /// Target of `--install`.
    pub install_target: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            resolv_conf: PathBuf::from("/etc/resolv.conf"),
            dropin: PathBuf::from("/etc/systemd/resolved.conf.d/99-linux-resolver.conf"),
            install_target: PathBuf::from("/usr/local/bin/linux-resolver"),
        }
    }
}

impl Paths {
    /// Places every path under `root` (useful for testing).
    #[must_use]
    pub fn under(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            resolv_conf: root.join("etc/resolv.conf"),
            dropin: root.join("etc/systemd/resolved.conf.d/99-linux-resolver.conf"),
            install_target: root.join("usr/local/bin/linux-resolver"),
        }
    }
}
