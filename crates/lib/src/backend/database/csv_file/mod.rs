//! CSV file backend
//!
//! Stores the credential table as one CSV file. Every read takes a shared
//! advisory lock and every write an exclusive one, both on `<file>.lock`.
//!
//! ## Save protocol
//!
//! 1. Rename the current file to `<file>.bak` (the pre-write snapshot).
//! 2. Write the new table to `<file>.tmp` and fsync it.
//! 3. Rename `<file>.tmp` over `<file>`.
//!
//! If step 2 or 3 fails the snapshot is copied back, so the file is left as
//! it was before the call. The primary file is only ever replaced by rename,
//! so a crash can leave it missing but never half-written; loads then fall
//! back to the snapshot. A primary that exists is never second-guessed.

mod codec;
mod lock;

use std::{
    fs::{self, File, OpenOptions},
    io::{BufWriter, ErrorKind},
    path::{Path, PathBuf},
};

use self::lock::{LockMode, StoreLock};
use crate::{
    Result, StoreConfig,
    backend::{UserStorage, errors::StorageError},
    user::UserTable,
};

/// File-backed `UserStorage`.
///
/// Holds no table in memory: every call goes back to disk, so several
/// processes can share one file.
#[derive(Debug, Clone)]
pub struct CsvFileStorage {
    config: StoreConfig,
}

impl CsvFileStorage {
    /// Open a store described by `config`, creating its directory if needed.
    ///
    /// The credential file itself is created on the first save.
    pub fn open(config: StoreConfig) -> Result<Self> {
        if let Some(parent) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StorageError::FileIo {
                operation: "create directory",
                path: parent.to_path_buf(),
                source,
            })?;
        }
        tracing::debug!(path = %config.path.display(), "Opened CSV user store");
        Ok(Self { config })
    }

    /// Shorthand for `open(StoreConfig::new(path))`.
    pub fn at(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open(StoreConfig::new(path))
    }

    /// The configuration this store was opened with.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Path of the primary credential file.
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    fn lock(&self, mode: LockMode) -> std::result::Result<StoreLock, StorageError> {
        StoreLock::acquire(
            &self.config.lock_path(),
            mode,
            self.config.lock_timeout,
            self.config.lock_poll_interval,
        )
    }

    /// Read the table; the caller holds the lock.
    ///
    /// An existing primary is always decoded as is. The snapshot is used only
    /// when the primary is missing or zero-length, which is what an
    /// interrupted save leaves behind. Only I/O failures other than "not
    /// found" are errors.
    fn read_unlocked(&self) -> std::result::Result<UserTable, StorageError> {
        match read_optional(&self.config.path)? {
            Some(bytes) if !bytes.is_empty() => Ok(codec::decode_table(bytes.as_slice())),
            Some(_) => {
                tracing::warn!(
                    path = %self.config.path.display(),
                    "User table file is empty, trying the backup"
                );
                Ok(self.read_backup()?.unwrap_or_default())
            }
            None => Ok(self.read_backup()?.unwrap_or_default()),
        }
    }

    fn read_backup(&self) -> std::result::Result<Option<UserTable>, StorageError> {
        let backup = self.config.backup_path();
        let Some(bytes) = read_optional(&backup)? else {
            return Ok(None);
        };
        tracing::warn!(
            backup = %backup.display(),
            "Recovering user table from backup snapshot"
        );
        Ok(Some(codec::decode_table(bytes.as_slice())))
    }

    /// Replace the table on disk; the caller holds the exclusive lock.
    fn write_unlocked(&self, table: &UserTable) -> std::result::Result<(), StorageError> {
        let primary = &self.config.path;
        let backup = self.config.backup_path();
        let staging = self.config.staging_path();

        let snapshot_taken = match fs::rename(primary, &backup) {
            Ok(()) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(source) => {
                return Err(StorageError::FileIo {
                    operation: "back up",
                    path: primary.clone(),
                    source,
                });
            }
        };

        if let Err(err) = self.write_staged(table, &staging) {
            tracing::error!(
                path = %primary.display(),
                "Saving user table failed, rolling back: {err}"
            );
            let _ = fs::remove_file(&staging);
            if snapshot_taken {
                fs::copy(&backup, primary)
                    .map_err(|source| StorageError::RollbackFailed { backup, source })?;
            }
            return Err(err);
        }

        tracing::debug!(
            path = %primary.display(),
            records = table.len(),
            "Saved user table"
        );
        Ok(())
    }

    fn write_staged(
        &self,
        table: &UserTable,
        staging: &Path,
    ) -> std::result::Result<(), StorageError> {
        let io_err = |operation: &'static str, path: &Path| {
            let path = path.to_path_buf();
            move |source: std::io::Error| StorageError::FileIo {
                operation,
                path,
                source,
            }
        };

        let file = create_private(staging).map_err(io_err("create", staging))?;
        let file = codec::encode_table(table, BufWriter::new(file))
            .map_err(|source| StorageError::Encoding {
                path: staging.to_path_buf(),
                source,
            })?
            .into_inner()
            .map_err(|e| e.into_error())
            .map_err(io_err("flush", staging))?;
        file.sync_all().map_err(io_err("sync", staging))?;
        drop(file);

        fs::rename(staging, &self.config.path).map_err(io_err("replace", &self.config.path))?;
        sync_parent_dir(&self.config.path).map_err(io_err("sync directory of", &self.config.path))
    }
}

impl UserStorage for CsvFileStorage {
    fn load(&self) -> UserTable {
        let attempt = self
            .lock(LockMode::Shared)
            .and_then(|_guard| self.read_unlocked());

        attempt.unwrap_or_else(|e| {
            tracing::warn!(
                path = %self.config.path.display(),
                "Failed to load user table, treating it as empty: {e}"
            );
            UserTable::new()
        })
    }

    fn save(&self, table: &UserTable) -> Result<()> {
        let _guard = self.lock(LockMode::Exclusive)?;
        self.write_unlocked(table)?;
        Ok(())
    }

    fn update(&self, mutate: &mut dyn FnMut(&mut UserTable) -> Result<()>) -> Result<()> {
        let _guard = self.lock(LockMode::Exclusive)?;
        let mut table = self.read_unlocked()?;
        mutate(&mut table)?;
        self.write_unlocked(&table)?;
        Ok(())
    }
}

/// Read a whole file, mapping "not found" to `None`.
fn read_optional(path: &Path) -> std::result::Result<Option<Vec<u8>>, StorageError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StorageError::FileIo {
            operation: "read",
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Flush the directory entry of `path` so a completed rename survives power loss.
#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    File::open(parent)?.sync_all()
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

/// Create (or truncate) a file readable only by its owner.
fn create_private(path: &Path) -> std::io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options.open(path)
}
