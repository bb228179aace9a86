//! # linux-resolver
//!
//! Point a Linux host at a set of DNS servers and check that resolution
//! actually changed.
//!
//! The crate detects which subsystem owns name resolution and applies the
//! servers through it:
//!
//! | Method     | Detected when                                  | Mechanism                                   |
//! |------------|------------------------------------------------|---------------------------------------------|
//! | `resolved` | `systemd-resolved` is active and `resolvectl` exists | drop-in under `resolved.conf.d`, restart |
//! | `nm`       | `NetworkManager` is active and `nmcli` exists  | `nmcli connection modify` per active profile |
//! | `resolv`   | always (fallback)                              | static `/etc/resolv.conf`                    |
//!
//! Afterwards the resolver cache is flushed, the tool waits briefly and
//! resolves a test domain, reporting whether the expected address came
//! back.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use linux_resolver::{Config, Host, Language, execute};
//!
//! let config = Config::new(Language::En).with_dns(["9.9.9.9", "2620:fe::fe"]);
//! let report = execute(&config, &Host::system())?;
//! assert!(report.verified());
//! ```
//!
//! ## Best effort
//!
//! Only a missing privilege, an empty option or an empty server list
//! aborts a run. Every
//! other step records its outcome in the [`RunReport`] and the run
//! carries on.
//!
//! ## Permissions
//!
//! Everything except `--dry-run` requires root.

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod backup;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod family;
pub mod i18n;
pub mod network_manager;
pub mod probe;
pub mod report;
pub mod resolv_conf;
pub mod resolved;
pub mod session;
pub mod util;
pub mod verify;

pub use cli::Cli;
pub use command::{CommandOutput, CommandRunner, SystemRunner};
pub use config::{Action, Config, Method, MethodChoice, Paths};
pub use error::{ResolverError, Result};
pub use family::FamilyFilter;
pub use i18n::{LangChoice, Language, Messages};
pub use probe::{Capabilities, select_method};
pub use report::{RunReport, Step, StepError, StepKind, StepOutcome};
pub use session::{Host, execute};
pub use verify::{HostLookup, SystemLookup, Verification};
