//! Timestamped `resolv.conf` backups.
//!
//! Backups sit next to the file they protect and are named
//! `<file>.bak.<timestamp>`. The timestamp is fixed-width UTC, so sorting by
//! filename sorts by creation time.

use crate::util::{atomic_error, timestamp};
use atomicwrites::{AtomicFile, OverwriteBehavior};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

fn backup_prefix(target: &Path) -> Option<String> {
    target
        .file_name()
        .and_then(|n| n.to_str())
        .map(|name| format!("{name}.bak."))
}

/// Copies `target` to a new timestamped backup.
///
/// Returns `Ok(None)` if `target` does not exist. The backup is written to
/// a temporary file, synced and linked into place, so a crash never leaves
/// a truncated backup behind and an existing backup is never replaced.
///
/// # Errors
///
/// Returns an error if `target` cannot be read or the backup cannot be
/// written.
pub fn create(target: &Path) -> io::Result<Option<PathBuf>> {
    let content = match std::fs::read(target) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    let Some(prefix) = backup_prefix(target) else {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("cannot derive a backup name for {}", target.display()),
        ));
    };

    loop {
        let path = target.with_file_name(format!("{prefix}{}", timestamp()));
        let file = AtomicFile::new(&path, OverwriteBehavior::DisallowOverwrite);
        match file.write(|f| f.write_all(&content)) {
            Ok(()) => {
                tracing::debug!(backup = %path.display(), "Backed up resolv.conf");
                return Ok(Some(path));
            }
            // Same microsecond as an earlier backup.
            Err(atomicwrites::Error::Internal(e)) if e.kind() == io::ErrorKind::AlreadyExists => {}
            Err(e) => return Err(atomic_error(e)),
        }
    }
}

/// Lists backups of `target`, oldest first.
///
/// Returns an empty vec if the directory does not exist.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn list(target: &Path) -> io::Result<Vec<PathBuf>> {
    let Some(prefix) = backup_prefix(target) else {
        return Ok(Vec::new());
    };
    let dir = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut backups = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_backup = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(&prefix));
        if is_backup && path.is_file() {
            backups.push(path);
        }
    }
    backups.sort();
    Ok(backups)
}

/// Returns the most recent backup of `target`, if any.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn latest(target: &Path) -> io::Result<Option<PathBuf>> {
    Ok(list(target)?.pop())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_skips_missing_target() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(create(&dir.path().join("resolv.conf")).unwrap(), None);
    }

    #[test]
    fn create_copies_content() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("resolv.conf");
        std::fs::write(&target, "nameserver 192.168.1.1\n").unwrap();

        let backup = create(&target).unwrap().unwrap();
        assert!(
            backup
                .file_name()
                .unwrap()
                .to_str()
                .unwrap()
                .starts_with("resolv.conf.bak.")
        );
        assert_eq!(
            std::fs::read_to_string(backup).unwrap(),
            "nameserver 192.168.1.1\n"
        );
    }

    #[test]
    fn backups_never_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("resolv.conf");
        std::fs::write(&target, "a\n").unwrap();

        let first = create(&target).unwrap().unwrap();
        let second = create(&target).unwrap().unwrap();
        assert_ne!(first, second);
        assert_eq!(list(&target).unwrap(), vec![first, second]);
    }

    #[test]
    fn list_ignores_unrelated_files() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("resolv.conf");
        std::fs::write(&target, "a\n").unwrap();
        std::fs::write(dir.path().join("hosts.bak.20200101-000000.000000"), "x").unwrap();
        std::fs::write(dir.path().join("resolv.conf.orig"), "x").unwrap();

        assert!(list(&target).unwrap().is_empty());
        create(&target).unwrap();
        assert_eq!(list(&target).unwrap().len(), 1);
    }

    #[test]
    fn latest_sorts_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("resolv.conf");
        for stamp in [
            "20260101-000000.000000",
            "20261018-120000.000000",
            "20250505-235959.999999",
        ] {
            std::fs::write(dir.path().join(format!("resolv.conf.bak.{stamp}")), stamp).unwrap();
        }

        let newest = latest(&target).unwrap().unwrap();
        assert!(newest.ends_with("resolv.conf.bak.20261018-120000.000000"));
    }

    #[test]
    fn latest_is_last_created() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("resolv.conf");

        for content in ["one\n", "two\n", "three\n"] {
            std::fs::write(&target, content).unwrap();
            create(&target).unwrap();
        }

        let newest = latest(&target).unwrap().unwrap();
        assert_eq!(std::fs::read_to_string(newest).unwrap(), "three\n");
    }

    #[test]
    fn create_leaves_no_temporary_files() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("resolv.conf");
        std::fs::write(&target, "a\n").unwrap();

        let backup = create(&target).unwrap().unwrap();

        let mut entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        entries.sort();
        assert_eq!(entries, vec![target, backup]);
    }

    #[test]
    fn create_follows_symlinked_target() {
        let dir = tempfile::tempdir().unwrap();
        let stub = dir.path().join("stub-resolv.conf");
        let target = dir.path().join("resolv.conf");
        std::fs::write(&stub, "nameserver 127.0.0.53\n").unwrap();
        std::os::unix::fs::symlink(&stub, &target).unwrap();

        let backup = create(&target).unwrap().unwrap();
        let meta = std::fs::symlink_metadata(&backup).unwrap();
        assert!(meta.file_type().is_file());
        assert_eq!(
            std::fs::read_to_string(backup).unwrap(),
            "nameserver 127.0.0.53\n"
        );
    }
}
