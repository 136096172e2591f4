//! File-backed implementation of the ChainStore trait.
//!
//! The slot is a single small file holding `"{kana}\n{event id}"`. Access is
//! serialized in two layers: an async mutex orders tasks in this process,
//! then `flock(LOCK_EX)` on the file orders every process that opens the same
//! path. The file is reopened for every critical section, so a slot file
//! replaced on disk is picked up by the next request. The flock is per open
//! file description, so two `FileChainStore`s on one path also exclude each
//! other.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::{AsRawFd, RawFd};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use shiritori_core::ChainState;

use crate::error::{Result, StoreError};
use crate::traits::{ChainSlot, ChainStore};

/// How long to sleep between non-blocking flock attempts under a deadline.
const LOCK_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// File-based chain store.
///
/// The slot file is created empty if missing.
#[derive(Debug)]
pub struct FileChainStore {
    path: PathBuf,
    serial: Arc<Mutex<()>>,
}

impl FileChainStore {
    /// Open (or create) the slot file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        open_slot(&path)?;
        Ok(Self {
            path,
            serial: Arc::new(Mutex::new(())),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ChainStore for FileChainStore {
    async fn with_lock<R, F>(&self, timeout: Option<Duration>, f: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(&mut dyn ChainSlot) -> Result<R> + Send + 'static,
    {
        let started = Instant::now();
        let serial = self.serial.clone();
        let guard = match timeout {
            Some(limit) => tokio::time::timeout(limit, serial.lock_owned())
                .await
                .map_err(|_| StoreError::LockTimeout(limit))?,
            None => serial.lock_owned().await,
        };
        let deadline = timeout.map(|limit| (started + limit, limit));
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || {
            let mut file = open_slot(&path)?;
            let lock = FileLock::acquire(&file, deadline)?;
            debug!(path = %path.display(), "chain lock acquired");

            let result = f(&mut FileSlot { file: &mut file });

            drop(lock);
            drop(guard);
            debug!(path = %path.display(), "chain lock released");
            result
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

fn open_slot(path: &Path) -> io::Result<File> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .mode(0o644)
        .open(path)
}

/// The open slot file, seen through the [`ChainSlot`] interface.
struct FileSlot<'a> {
    file: &'a mut File,
}

impl ChainSlot for FileSlot<'_> {
    fn read(&mut self) -> Result<Option<ChainState>> {
        let mut buf = Vec::new();
        self.file.seek(SeekFrom::Start(0))?;
        self.file.read_to_end(&mut buf)?;
        Ok(ChainState::from_slot_bytes(&buf)?)
    }

    fn write(&mut self, state: &ChainState) -> Result<()> {
        self.file.set_len(0)?;
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(&state.to_slot_bytes())?;
        self.file.sync_data()?;
        Ok(())
    }
}

/// An exclusive `flock` held on a file descriptor until dropped.
///
/// The descriptor must stay open for the lifetime of the lock.
struct FileLock {
    fd: RawFd,
}

impl FileLock {
    /// Block until the lock is ours, or poll until `deadline` passes.
    fn acquire(file: &File, deadline: Option<(Instant, Duration)>) -> Result<Self> {
        let fd = file.as_raw_fd();
        let op = match deadline {
            Some(_) => libc::LOCK_EX | libc::LOCK_NB,
            None => libc::LOCK_EX,
        };
        loop {
            let rc = unsafe { libc::flock(fd, op) };
            if rc == 0 {
                return Ok(Self { fd });
            }
            let err = io::Error::last_os_error();
            match (err.kind(), deadline) {
                (io::ErrorKind::Interrupted, _) => continue,
                (io::ErrorKind::WouldBlock, Some((at, limit))) => {
                    if Instant::now() >= at {
                        return Err(StoreError::LockTimeout(limit));
                    }
                    std::thread::sleep(LOCK_POLL_INTERVAL);
                }
                _ => return Err(err.into()),
            }
        }
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let rc = unsafe { libc::flock(self.fd, libc::LOCK_UN) };
        if rc != 0 {
            warn!(error = %io::Error::last_os_error(), "failed to release chain lock");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ChainStoreExt;
    use shiritori_core::{EventId, Kana};

    fn state(c: char, id: &str) -> ChainState {
        ChainState::new(Kana::new(c).unwrap(), EventId::new(id))
    }

    #[tokio::test]
    async fn test_new_file_is_empty_slot() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileChainStore::open(dir.path().join("chain")).unwrap();
        assert_eq!(store.current_state(None).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain");
        let store = FileChainStore::open(&path).unwrap();

        store.replace_state(state('オ', "ev1"), None).await.unwrap();
        let prev = store.replace_state(state('ク', "ev2"), None).await.unwrap();
        assert_eq!(prev, Some(state('オ', "ev1")));

        // shorter content must not leave a tail behind
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "ク\nev2");
    }

    #[tokio::test]
    async fn test_state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain");
        {
            let store = FileChainStore::open(&path).unwrap();
            store.replace_state(state('ン', "ev9"), None).await.unwrap();
        }
        let store = FileChainStore::open(&path).unwrap();
        assert_eq!(store.current_state(None).await.unwrap(), Some(state('ン', "ev9")));
    }

    #[tokio::test]
    async fn test_replaced_file_is_picked_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain");
        let store = FileChainStore::open(&path).unwrap();
        store.replace_state(state('オ', "ev1"), None).await.unwrap();

        let staged = dir.path().join("chain.new");
        std::fs::write(&staged, "ン\nev2").unwrap();
        std::fs::rename(&staged, &path).unwrap();

        assert_eq!(store.current_state(None).await.unwrap(), Some(state('ン', "ev2")));
        store.replace_state(state('ア', "ev3"), None).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "ア\nev3");
    }

    #[tokio::test]
    async fn test_corrupt_slot_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain");
        std::fs::write(&path, "not kana\nev").unwrap();
        let store = FileChainStore::open(&path).unwrap();
        let err = store.current_state(None).await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }

    #[tokio::test]
    async fn test_closure_error_still_releases_lock() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileChainStore::open(dir.path().join("chain")).unwrap();

        let err = store
            .with_lock(None, |_| -> Result<()> {
                Err(StoreError::InvalidData("boom".into()))
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidData(_)));

        let again = store
            .with_lock(Some(Duration::from_millis(100)), |slot| slot.read())
            .await;
        assert!(again.is_ok());
    }

    #[tokio::test]
    async fn test_flock_excludes_second_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain");
        let holder = FileChainStore::open(&path).unwrap();
        let other = FileChainStore::open(&path).unwrap();

        let (locked_tx, locked_rx) = std::sync::mpsc::channel();
        let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();
        let held = tokio::spawn(async move {
            holder
                .with_lock(None, move |_| {
                    locked_tx.send(()).unwrap();
                    release_rx.recv().unwrap();
                    Ok(())
                })
                .await
        });

        tokio::task::spawn_blocking(move || locked_rx.recv().unwrap())
            .await
            .unwrap();
        let err = other
            .with_lock(Some(Duration::from_millis(50)), |slot| slot.read())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::LockTimeout(_)));

        release_tx.send(()).unwrap();
        held.await.unwrap().unwrap();
        assert!(other.current_state(Some(Duration::from_secs(5))).await.is_ok());
    }

    #[tokio::test]
    async fn test_in_process_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileChainStore::open(dir.path().join("chain")).unwrap());

        let (locked_tx, locked_rx) = std::sync::mpsc::channel();
        let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();
        let holder = store.clone();
        let held = tokio::spawn(async move {
            holder
                .with_lock(None, move |_| {
                    locked_tx.send(()).unwrap();
                    release_rx.recv().unwrap();
                    Ok(())
                })
                .await
        });

        tokio::task::spawn_blocking(move || locked_rx.recv().unwrap())
            .await
            .unwrap();
        let err = store
            .with_lock(Some(Duration::from_millis(20)), |slot| slot.read())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::LockTimeout(_)));

        release_tx.send(()).unwrap();
        held.await.unwrap().unwrap();
    }
}
