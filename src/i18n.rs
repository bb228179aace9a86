//! Bilingual user-facing messages.
//!
//! Every line the tool logs or prints on failure comes from [`Messages`],
//! which renders the same event in Chinese or English depending on the
//! selected [`Language`]. Only clap's own usage errors stay English.

use crate::error::ResolverError;
use crate::report::{StepError, StepKind};
use std::fmt::Display;
use std::path::Path;

/// Language preference as given on the command line.
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LangChoice {
    /// Detect from `LC_ALL`, `LC_MESSAGES`, then `LANG`.
    #[default]
    Auto,
    /// Simplified Chinese.
    Zh,
    /// English.
    En,
}

/// Resolved output language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    /// Simplified Chinese.
    Zh,
    /// English.
    En,
}

/// Locale variables consulted by [`LangChoice::Auto`], highest priority first.
const LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

impl LangChoice {
    /// Resolves the choice against the process environment.
    #[must_use]
    pub fn resolve(self) -> Language {
        self.resolve_with(|key| std::env::var(key).ok())
    }

    /// Resolves the choice using `lookup` in place of the environment.
    ///
    /// The first non-empty locale variable decides; a value starting with
    /// `zh` selects Chinese, anything else English.
    #[must_use]
    pub fn resolve_with(self, lookup: impl Fn(&str) -> Option<String>) -> Language {
        match self {
            Self::Zh => Language::Zh,
            Self::En => Language::En,
            Self::Auto => {
                let locale = LOCALE_VARS
                    .iter()
                    .filter_map(|key| lookup(*key))
                    .find(|value| !value.is_empty());
                match locale {
                    Some(value) if value.to_ascii_lowercase().starts_with("zh") => Language::Zh,
                    _ => Language::En,
                }
            }
        }
    }
}

/// Message table for one language.
#[derive(Debug, Clone, Copy)]
pub struct Messages {
    lang: Language,
}

impl Messages {
    /// Table for `lang`.
    #[must_use]
    pub const fn new(lang: Language) -> Self {
        Self { lang }
    }

    fn pick(self, zh: String, en: String) -> String {
        match self.lang {
            Language::Zh => zh,
            Language::En => en,
        }
    }

    /// Fatal: not running as root.
    #[must_use]
    pub fn not_root(&self) -> String {
        self.pick(
            "需要 root 权限运行（请使用 sudo）".into(),
            "root privileges are required (try sudo)".into(),
        )
    }

    /// Fatal: the family filter left nothing to apply.
    #[must_use]
    pub fn no_servers(&self, filter: impl Display) -> String {
        self.pick(
            format!("按 {filter} 过滤后没有可用的 DNS 服务器"),
            format!("no DNS servers left after the {filter} filter"),
        )
    }

    /// Fatal: a required option was given an empty value.
    #[must_use]
    pub fn empty_option(&self, option: &str) -> String {
        self.pick(
            format!("{option} 不能为空"),
            format!("{option} must not be empty"),
        )
    }

    /// The line printed for any error that aborts a run.
    #[must_use]
    pub fn fatal(&self, error: &ResolverError) -> String {
        match error {
            ResolverError::NotRoot => self.not_root(),
            ResolverError::NoServers { filter } => self.no_servers(filter),
            ResolverError::EmptyOption { option } => self.empty_option(option),
            ResolverError::Io(e) if error.is_permission_denied() => self.pick(
                format!("权限不足：{e}（请使用 sudo）"),
                format!("permission denied: {e} (try sudo)"),
            ),
            ResolverError::Io(e) => self.pick(
                format!("文件操作失败：{e}"),
                format!("I/O error: {e}"),
            ),
        }
    }

    /// Announces a dry run.
    #[must_use]
    pub fn dry_run_banner(&self) -> String {
        self.pick(
            "演练模式：不会修改任何系统文件".into(),
            "dry run: no system files will be modified".into(),
        )
    }

    /// Lists the servers about to be applied.
    #[must_use]
    pub fn servers(&self, servers: &[String]) -> String {
        let list = servers.join(", ");
        self.pick(
            format!("目标 DNS 服务器：{list}"),
            format!("target DNS servers: {list}"),
        )
    }

    /// Names the method chosen for this run.
    #[must_use]
    pub fn method_selected(&self, method: impl Display) -> String {
        self.pick(
            format!("使用配置方式：{method}"),
            format!("using method: {method}"),
        )
    }

    /// Short description of a step.
    #[must_use]
    pub fn step(&self, kind: &StepKind) -> String {
        match self.lang {
            Language::En => kind.to_string(),
            Language::Zh => match kind {
                StepKind::Backup => "备份 resolv.conf".to_owned(),
                StepKind::Restore => "恢复 resolv.conf".to_owned(),
                StepKind::WriteDropIn(p) | StepKind::WriteResolvConf(p) => {
                    format!("写入 {}", p.display())
                }
                StepKind::RemoveDropIn(p) => format!("删除 {}", p.display()),
                StepKind::RestartService(unit) => format!("重启 {unit}"),
                StepKind::ListConnections => "列出活动连接".to_owned(),
                StepKind::ModifyConnection(c) => format!("修改连接 {c}"),
                StepKind::ReactivateConnection(c) => format!("重新激活连接 {c}"),
                StepKind::ClearImmutable(p) => format!("清除 {} 的不可变属性", p.display()),
                StepKind::RemoveSymlink(p) => format!("删除符号链接 {}", p.display()),
                StepKind::FlushCache => "刷新 DNS 缓存".to_owned(),
                StepKind::Install(p) => format!("安装到 {}", p.display()),
            },
        }
    }

    /// Why a step failed.
    #[must_use]
    pub fn step_error(&self, error: &StepError) -> String {
        match error {
            StepError::Spawn { program, reason } => self.pick(
                format!("无法运行 `{program}`：{reason}"),
                format!("failed to run `{program}`: {reason}"),
            ),
            StepError::Exit { command, stderr } => self.pick(
                format!("`{command}` 以非零状态退出：{stderr}"),
                format!("`{command}` exited non-zero: {stderr}"),
            ),
            StepError::Io(reason) => self.pick(
                format!("文件操作失败：{reason}"),
                format!("I/O error: {reason}"),
            ),
        }
    }

    /// A step suppressed by dry-run mode.
    #[must_use]
    pub fn would_run(&self, kind: &StepKind) -> String {
        let step = self.step(kind);
        self.pick(
            format!("[演练] 跳过：{step}"),
            format!("[dry run] skipped: {step}"),
        )
    }

    /// A best-effort step that failed.
    #[must_use]
    pub fn step_failed(&self, kind: &StepKind, error: &StepError) -> String {
        let (step, error) = (self.step(kind), self.step_error(error));
        self.pick(
            format!("{step} 失败（已忽略）：{error}"),
            format!("{step} failed (ignored): {error}"),
        )
    }

    /// Where the backup went.
    #[must_use]
    pub fn backup_created(&self, path: &Path) -> String {
        self.pick(
            format!("已备份到 {}", path.display()),
            format!("backed up to {}", path.display()),
        )
    }

    /// Nothing to back up.
    #[must_use]
    pub fn backup_missing_source(&self, path: &Path) -> String {
        self.pick(
            format!("{} 不存在，跳过备份", path.display()),
            format!("{} does not exist, skipping backup", path.display()),
        )
    }

    /// Which backup was restored.
    #[must_use]
    pub fn restored(&self, from: &Path) -> String {
        self.pick(
            format!("已从 {} 恢复", from.display()),
            format!("restored from {}", from.display()),
        )
    }

    /// Restore found no backup.
    #[must_use]
    pub fn no_backup(&self) -> String {
        self.pick("没有找到备份文件".into(), "no backup found".into())
    }

    /// The `systemd-resolved` drop-in was written.
    #[must_use]
    pub fn dropin_written(&self, path: &Path) -> String {
        self.pick(
            format!("已写入 systemd-resolved 配置 {}", path.display()),
            format!("wrote systemd-resolved drop-in {}", path.display()),
        )
    }

    /// The `systemd-resolved` drop-in was removed.
    #[must_use]
    pub fn dropin_removed(&self, path: &Path) -> String {
        self.pick(
            format!("已删除 {}", path.display()),
            format!("removed {}", path.display()),
        )
    }

    /// A drop-in without the ownership marker was left in place.
    #[must_use]
    pub fn dropin_not_managed(&self, path: &Path) -> String {
        self.pick(
            format!("{} 不是本工具创建的，不会删除", path.display()),
            format!("{} is not managed by this tool, refusing to remove", path.display()),
        )
    }

    /// NetworkManager reported no connection to configure.
    #[must_use]
    pub fn nm_no_connections(&self) -> String {
        self.pick(
            "NetworkManager 没有活动连接，跳过".into(),
            "NetworkManager has no active connection, skipping".into(),
        )
    }

    /// One NetworkManager connection was updated and reactivated.
    #[must_use]
    pub fn nm_configured(&self, connection: &str) -> String {
        self.pick(
            format!("已配置连接 {connection}"),
            format!("configured connection {connection}"),
        )
    }

    /// The static `resolv.conf` was written.
    #[must_use]
    pub fn resolv_written(&self, path: &Path) -> String {
        self.pick(
            format!("已写入 {}", path.display()),
            format!("wrote {}", path.display()),
        )
    }

    /// The resolver cache was flushed.
    #[must_use]
    pub fn cache_flushed(&self) -> String {
        self.pick("已刷新 DNS 缓存".into(), "flushed DNS cache".into())
    }

    /// Neither `resolvectl` nor `systemd-resolve` is installed.
    #[must_use]
    pub fn cache_flush_unavailable(&self) -> String {
        self.pick(
            "没有可用的缓存刷新命令，跳过".into(),
            "no cache flush command available, skipping".into(),
        )
    }

    /// The verification lookup itself failed.
    #[must_use]
    pub fn lookup_failed(&self, domain: &str, error: impl Display) -> String {
        self.pick(
            format!("无法解析 {domain}：{error}"),
            format!("failed to resolve {domain}: {error}"),
        )
    }

    /// The expected address came back.
    #[must_use]
    pub fn verify_ok(&self, domain: &str, expected: &str) -> String {
        self.pick(
            format!("验证成功：{domain} 解析到 {expected}"),
            format!("verified: {domain} resolves to {expected}"),
        )
    }

    /// The expected address did not come back.
    #[must_use]
    pub fn verify_failed(&self, domain: &str, expected: &str, got: &[String]) -> String {
        let got = if got.is_empty() {
            "-".to_owned()
        } else {
            got.join(", ")
        };
        self.pick(
            format!("验证失败：{domain} 未解析到 {expected}（结果：{got}）"),
            format!("verification failed: {domain} did not resolve to {expected} (got: {got})"),
        )
    }

    /// Where the executable was installed.
    #[must_use]
    pub fn installed(&self, path: &Path) -> String {
        self.pick(
            format!("已安装到 {}", path.display()),
            format!("installed to {}", path.display()),
        )
    }

    /// End of a run.
    #[must_use]
    pub fn done(&self) -> String {
        self.pick("完成".into(), "done".into())
    }
}
