//! Command-line interface.

use crate::config::{Action, Config, DEFAULT_DNS, DEFAULT_DOMAIN, DEFAULT_EXPECT, MethodChoice};
use crate::family::{FamilyFilter, parse_list};
use crate::i18n::{LangChoice, Language};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};

/// Point this host at a set of DNS servers and verify the result.
///
/// Uses systemd-resolved when it is running, NetworkManager when that is
/// running instead, and writes /etc/resolv.conf otherwise.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Comma-separated DNS servers (IPv4 and IPv6 may be mixed).
    #[arg(long, env = "RESOLVER_DNS", default_value = DEFAULT_DNS)]
    pub dns: String,

    /// Domain resolved after applying the change.
    #[arg(long, env = "RESOLVER_DOMAIN", default_value = DEFAULT_DOMAIN)]
    pub domain: String,

    /// Address the domain is expected to resolve to.
    #[arg(long, env = "RESOLVER_EXPECT", default_value = DEFAULT_EXPECT)]
    pub expect: String,

    /// Message language.
    #[arg(long, env = "RESOLVER_LANG", value_enum, default_value_t = LangChoice::Auto)]
    pub lang: LangChoice,

    /// How to apply the servers.
    #[arg(long, env = "RESOLVER_METHOD", value_enum, default_value_t = MethodChoice::Auto)]
    pub method: MethodChoice,

    /// Keep IPv4 servers only.
    #[arg(
        long,
        env = "RESOLVER_ONLY_IPV4",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new(),
        overrides_with = "only_ipv6"
    )]
    pub only_ipv4: bool,

    /// Keep IPv6 servers only.
    #[arg(
        long,
        env = "RESOLVER_ONLY_IPV6",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new(),
        overrides_with = "only_ipv4"
    )]
    pub only_ipv6: bool,

    /// Show what would change without touching the system.
    #[arg(
        long,
        env = "RESOLVER_DRY_RUN",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub dry_run: bool,

    /// Only print warnings and errors.
    #[arg(
        long,
        env = "RESOLVER_QUIET",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub quiet: bool,

    /// Also write /etc/resolv.conf after the resolved or nm method.
    #[arg(
        long,
        env = "RESOLVER_STRICT",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub strict: bool,

    /// Restore the newest /etc/resolv.conf backup and exit.
    #[arg(long, conflicts_with = "install")]
    pub restore: bool,

    /// Install this executable to /usr/local/bin and exit.
    #[arg(long)]
    pub install: bool,
}

impl Cli {
    /// Folds the parsed arguments into a [`Config`], reading the locale
    /// from the process environment.
    #[must_use]
    pub fn into_config(self) -> Config {
        let language = self.lang.resolve();
        self.into_config_with(language)
    }

    /// Like [`into_config`](Self::into_config) with an already resolved language.
    #[must_use]
    pub fn into_config_with(self, language: Language) -> Config {
        let action = if self.restore {
            Action::Restore
        } else if self.install {
            Action::Install
        } else {
            Action::Apply
        };

        let mut config = Config::new(language)
            .with_dns(parse_list(&self.dns))
            .with_check(self.domain, self.expect)
            .with_method(self.method)
            .with_family(FamilyFilter::from_flags(self.only_ipv4, self.only_ipv6))
            .with_dry_run(self.dry_run)
            .with_strict(self.strict)
            .with_action(action);
        config.quiet = self.quiet;
        config
    }
}
