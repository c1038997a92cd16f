//! Store handle and transaction execution.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use fs4::fs_std::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::DbError;

/// Transactional store over a single state value `S`.
///
/// Transactions are serialized by an exclusive lock. Each one works on a
/// clone of the committed state; the clone replaces the committed state
/// (and is written to disk, when the store is file-backed) only if the
/// transaction returns `Ok`.
///
/// A file-backed store may be shared by several handles and processes.
/// Every read and transaction holds an OS lock on `<file>.lock` and reloads
/// the file under it, so each transaction starts from the latest commit.
pub struct Db<S> {
    state: Mutex<S>,
    path: Option<PathBuf>,
}

impl<S> Db<S>
where
    S: Clone + Default + Serialize + DeserializeOwned,
{
    /// Create a store that lives only in memory.
    pub fn in_memory() -> Self {
        Self::with_state(S::default())
    }

    /// Create an in-memory store seeded with `state`.
    pub fn with_state(state: S) -> Self {
        Self {
            state: Mutex::new(state),
            path: None,
        }
    }

    /// Open a file-backed store.
    ///
    /// A missing file yields the default state; the file is created on the
    /// first committed transaction.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let db: Db<MarketState> = Db::open(".mercado/state.json")?;
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let path = path.as_ref().to_path_buf();

        let state = {
            let _lock = FileLock::shared(&path)?;
            load(&path)?
        };

        tracing::debug!(path = %path.display(), "opened store");

        Ok(Self {
            state: Mutex::new(state),
            path: Some(path),
        })
    }

    /// Path of the backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Run a read-only closure against the committed state.
    pub fn read<T>(&self, f: impl FnOnce(&S) -> T) -> Result<T, DbError> {
        let mut guard = self.lock()?;
        let _lock = match &self.path {
            Some(path) => {
                let lock = FileLock::shared(path)?;
                *guard = load(path)?;
                Some(lock)
            }
            None => None,
        };
        Ok(f(&guard))
    }

    /// Clone the committed state.
    pub fn snapshot(&self) -> Result<S, DbError> {
        self.read(S::clone)
    }

    /// Run `f` as one atomic transaction.
    ///
    /// Nothing `f` does is visible to other callers until it returns `Ok`
    /// and, for file-backed stores, the new state has been persisted. An
    /// `Err` from `f` or a persistence failure discards every change.
    pub fn transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut S) -> Result<T, E>,
        E: From<DbError>,
    {
        let mut guard = self.lock()?;
        let _lock = match &self.path {
            Some(path) => {
                let lock = FileLock::exclusive(path)?;
                *guard = load(path)?;
                Some(lock)
            }
            None => None,
        };
        let mut working = guard.clone();

        let value = f(&mut working)?;

        if let Some(path) = &self.path {
            persist(path, &working)?;
        }
        *guard = working;

        Ok(value)
    }

    fn lock(&self) -> Result<MutexGuard<'_, S>, DbError> {
        self.state.lock().map_err(|_| DbError::Poisoned)
    }
}

impl<S> Default for Db<S>
where
    S: Clone + Default + Serialize + DeserializeOwned,
{
    fn default() -> Self {
        Self::in_memory()
    }
}

impl<S> std::fmt::Debug for Db<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db").field("path", &self.path).finish_non_exhaustive()
    }
}

/// Advisory OS lock on the sidecar `<file>.lock`, released on drop.
struct FileLock {
    file: File,
    path: PathBuf,
}

impl FileLock {
    fn shared(store: &Path) -> Result<Self, DbError> {
        Self::acquire(store, false)
    }

    fn exclusive(store: &Path) -> Result<Self, DbError> {
        Self::acquire(store, true)
    }

    fn acquire(store: &Path, exclusive: bool) -> Result<Self, DbError> {
        let path = lock_path(store);
        ensure_parent(&path)?;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| DbError::LockError(format!("{}: {}", path.display(), e)))?;

        let locked = if exclusive {
            FileExt::lock_exclusive(&file)
        } else {
            FileExt::lock_shared(&file)
        };
        locked.map_err(|e| DbError::LockError(format!("{}: {}", path.display(), e)))?;

        tracing::trace!(path = %path.display(), exclusive, "locked store");
        Ok(Self { file, path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to unlock store");
        }
    }
}

fn lock_path(store: &Path) -> PathBuf {
    match store.file_name() {
        Some(name) => {
            let mut name = name.to_os_string();
            name.push(".lock");
            store.with_file_name(name)
        }
        None => store.with_extension("lock"),
    }
}

fn ensure_parent(path: &Path) -> Result<(), DbError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| DbError::PersistError(format!("{}: {}", parent.display(), e)))?;
        }
    }
    Ok(())
}

/// Read the state document; a missing or blank file is the default state.
fn load<S: Default + DeserializeOwned>(path: &Path) -> Result<S, DbError> {
    if !path.exists() {
        return Ok(S::default());
    }
    let content = fs::read_to_string(path)
        .map_err(|e| DbError::OpenError(format!("{}: {}", path.display(), e)))?;
    if content.trim().is_empty() {
        Ok(S::default())
    } else {
        Ok(serde_json::from_str(&content)?)
    }
}

/// Write `state` next to `path` and rename it into place.
fn persist<S: Serialize>(path: &Path, state: &S) -> Result<(), DbError> {
    ensure_parent(path)?;

    let content = serde_json::to_vec_pretty(state)?;
    let tmp = path.with_extension("tmp");

    fs::write(&tmp, content)
        .map_err(|e| DbError::PersistError(format!("{}: {}", tmp.display(), e)))?;
    fs::rename(&tmp, path)
        .map_err(|e| DbError::PersistError(format!("{}: {}", path.display(), e)))?;

    tracing::trace!(path = %path.display(), "persisted store");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Table;
    use serde::Deserialize;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Counter {
        value: i64,
        names: Table<String, i64>,
    }

    #[derive(Debug)]
    enum TestError {
        Rejected,
        Db(DbError),
    }

    impl From<DbError> for TestError {
        fn from(e: DbError) -> Self {
            TestError::Db(e)
        }
    }

    #[test]
    fn test_commit() {
        let db: Db<Counter> = Db::in_memory();
        db.transaction(|s| {
            s.value += 3;
            Ok::<_, DbError>(())
        })
        .unwrap();

        assert_eq!(db.read(|s| s.value).unwrap(), 3);
    }

    #[test]
    fn test_rollback_on_error() {
        let db: Db<Counter> = Db::in_memory();
        db.transaction(|s| {
            s.value = 10;
            Ok::<_, DbError>(())
        })
        .unwrap();

        let result: Result<(), TestError> = db.transaction(|s| {
            s.value = 99;
            s.names.insert("ghost".to_string(), 1);
            Err(TestError::Rejected)
        });

        assert!(matches!(result, Err(TestError::Rejected)));
        assert_eq!(db.read(|s| s.value).unwrap(), 10);
        assert!(db.read(|s| s.names.is_empty()).unwrap());
    }

    #[test]
    fn test_unique_violation_rolls_back() {
        let db: Db<Counter> = Db::in_memory();
        let result: Result<(), TestError> = db.transaction(|s| {
            s.value = 1;
            s.names.insert_unique("names", "a".to_string(), 1)?;
            s.names.insert_unique("names", "a".to_string(), 2)?;
            Ok(())
        });

        assert!(matches!(
            result,
            Err(TestError::Db(DbError::UniqueViolation { .. }))
        ));
        assert_eq!(db.snapshot().unwrap(), Counter::default());
    }

    #[test]
    fn test_persist_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        {
            let db: Db<Counter> = Db::open(&path).unwrap();
            db.transaction(|s| {
                s.value = 42;
                s.names.insert("answer".to_string(), 42);
                Ok::<_, DbError>(())
            })
            .unwrap();
        }

        let reopened: Db<Counter> = Db::open(&path).unwrap();
        assert_eq!(reopened.read(|s| s.value).unwrap(), 42);
        assert_eq!(
            reopened.read(|s| s.names.get(&"answer".to_string()).copied()).unwrap(),
            Some(42)
        );
    }

    #[test]
    fn test_failed_transaction_is_not_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let db: Db<Counter> = Db::open(&path).unwrap();
        let _: Result<(), TestError> = db.transaction(|s| {
            s.value = 7;
            Err(TestError::Rejected)
        });

        assert!(!path.exists());
    }

    #[test]
    fn test_handles_on_one_file_see_each_other() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let first: Db<Counter> = Db::open(&path).unwrap();
        let second: Db<Counter> = Db::open(&path).unwrap();

        first
            .transaction(|s| {
                s.value += 1;
                Ok::<_, DbError>(())
            })
            .unwrap();
        second
            .transaction(|s| {
                s.value += 1;
                Ok::<_, DbError>(())
            })
            .unwrap();

        assert_eq!(first.read(|s| s.value).unwrap(), 2);
        assert_eq!(second.read(|s| s.value).unwrap(), 2);
        assert!(dir.path().join("state.json.lock").exists());
    }

    #[test]
    fn test_separate_handles_never_lose_writes() {
        use std::sync::Arc;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let db: Arc<Db<Counter>> = Arc::new(Db::open(&path).unwrap());
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        db.transaction(|s| {
                            s.value += 1;
                            Ok::<_, DbError>(())
                        })
                        .unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let reopened: Db<Counter> = Db::open(&path).unwrap();
        assert_eq!(reopened.read(|s| s.value).unwrap(), 100);
    }

    #[test]
    fn test_lock_path_sits_next_to_store() {
        assert_eq!(
            lock_path(Path::new("/data/state.json")),
            PathBuf::from("/data/state.json.lock")
        );
    }

    #[test]
    fn test_concurrent_transactions_serialize() {
        use std::sync::Arc;

        let db: Arc<Db<Counter>> = Arc::new(Db::in_memory());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let db = Arc::clone(&db);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        db.transaction(|s| {
                            s.value += 1;
                            Ok::<_, DbError>(())
                        })
                        .unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(db.read(|s| s.value).unwrap(), 800);
    }
}
