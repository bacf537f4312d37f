//! A [`SharedStore`] made of one file per key in a shared directory.
//!
//! This is what lets unrelated OS processes, including a parent and its forked
//! child, see the same mailboxes. Pointing it at a tmpfs (`/dev/shm` on Linux)
//! keeps everything in memory.
//!
//! Every value file starts with an 8 byte little-endian expiry, in milliseconds
//! since the unix epoch (`0` meaning never), followed by the value itself.
//!
//! Values are written to a scratch file first and renamed into place, so a reader
//! never observes a partial value. [`SharedStore::update`] and [`SharedStore::take`]
//! hold an exclusive `flock` on a per-key lock file for their whole duration, which
//! makes concurrent writers to the same key safe across processes.
//!
//! Lock files (`.<key>.lock`) are left in place after use, one per key ever
//! updated or drained. They are empty, but on a long lived tmpfs they accumulate;
//! [`FileStore::purge_locks`] removes them once no process uses the store anymore.

use super::{SharedStore, Ttl};
use crate::{token, MailslotError};

use std::{
    fs::{self, File, OpenOptions},
    io::{self, Read, Write},
    os::unix::io::AsRawFd,
    path::{Path, PathBuf},
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

/// Length of the expiry header.
const HEADER_LEN: usize = 8;

/// Suffix of the per-key lock files.
const LOCK_SUFFIX: &str = ".lock";

/// A store backed by a directory.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: Arc<PathBuf>,
}

impl FileStore {
    /// Open the store at `dir`, creating the directory if needed.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, MailslotError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        logger::debug!("Opened file store at {:?}.", dir);

        Ok(Self { dir: Arc::new(dir) })
    }

    /// Open the store at [`crate::config::default_store_dir`].
    pub async fn open_default() -> Result<Self, MailslotError> {
        Self::open(crate::config::default_store_dir()).await
    }

    /// The directory backing this store.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Remove every lock file of this store, returning how many were removed.
    ///
    /// # Note
    ///
    /// Only call this when no other process is using the store: a process holding
    /// a lock keeps it, but the next one to lock the same key would lock a new
    /// file and no longer exclude it.
    pub async fn purge_locks(&self) -> Result<usize, MailslotError> {
        let dir = Arc::clone(&self.dir);

        tokio::task::spawn_blocking(move || {
            let mut removed = 0;
            for entry in fs::read_dir(dir.as_path())? {
                let entry = entry?;
                let name = entry.file_name();
                let name = name.to_string_lossy();

                if name.starts_with('.')
                    && name.ends_with(LOCK_SUFFIX)
                    && ignore_not_found(fs::remove_file(entry.path()).map(|_| true), false)?
                {
                    removed += 1;
                }
            }

            logger::debug!("Purged {} lock files from {:?}.", removed, dir);
            Ok::<usize, MailslotError>(removed)
        })
        .await?
    }

    /// Run a blocking filesystem operation on a key of this store.
    async fn with_key<R, F>(&self, key: &str, f: F) -> Result<R, MailslotError>
    where
        R: Send + 'static,
        F: FnOnce(KeyPaths) -> Result<R, MailslotError> + Send + 'static,
    {
        let paths = KeyPaths::new(&self.dir, key)?;
        tokio::task::spawn_blocking(move || f(paths)).await?
    }
}

/// All the paths involved in operating on one key.
struct KeyPaths {
    dir: PathBuf,
    key: String,
    value: PathBuf,
    lock: PathBuf,
}

impl KeyPaths {
    fn new(dir: &Path, key: &str) -> Result<Self, MailslotError> {
        // Keys map to file names; anything that could escape the directory or
        // collide with scratch and lock files is refused.
        if key.is_empty()
            || key.starts_with('.')
            || key.contains(std::path::MAIN_SEPARATOR)
            || key.contains('/')
            || key.contains('\0')
        {
            return Err(MailslotError::InvalidKey(key.to_owned()));
        }

        Ok(Self {
            dir: dir.to_path_buf(),
            key: key.to_owned(),
            value: dir.join(key),
            lock: dir.join(format!(".{key}{LOCK_SUFFIX}")),
        })
    }

    fn scratch(&self) -> PathBuf {
        self.dir.join(token::scratch_name(&self.key))
    }

    /// Take the exclusive lock of this key, released when the returned file drops.
    fn lock(&self) -> io::Result<File> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.lock)?;

        // SAFETY: the descriptor belongs to `file`, which outlives the call.
        if unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX) } != 0 {
            return Err(io::Error::last_os_error());
        }

        Ok(file)
    }

    fn read(&self) -> io::Result<Option<Vec<u8>>> {
        read_value(&self.value)
    }

    fn write(&self, value: &[u8], ttl: Ttl) -> io::Result<()> {
        let scratch = self.scratch();

        let written =
            write_value(&scratch, value, ttl).and_then(|_| fs::rename(&scratch, &self.value));
        if written.is_err() {
            let _ = fs::remove_file(&scratch);
        }
        written
    }

    fn remove(&self) -> io::Result<bool> {
        ignore_not_found(fs::remove_file(&self.value).map(|_| true), false)
    }
}

fn ignore_not_found<T>(result: io::Result<T>, fallback: T) -> io::Result<T> {
    match result {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(fallback),
        other => other,
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Write a value file from scratch, header included.
fn write_value(path: &Path, value: &[u8], ttl: Ttl) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(&ttl.expires_at_millis(SystemTime::now()).to_le_bytes())?;
    file.write_all(value)?;
    file.sync_data()
}

/// Read a value file, yielding [`None`] if it is missing or expired.
///
/// Expired files are removed on the way.
fn read_value(path: &Path) -> io::Result<Option<Vec<u8>>> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err),
    };

    let mut contents = Vec::new();
    file.read_to_end(&mut contents)?;

    if contents.len() < HEADER_LEN {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{} is missing its expiry header", path.display()),
        ));
    }

    let mut header = [0u8; HEADER_LEN];
    header.copy_from_slice(&contents[..HEADER_LEN]);
    let expires_at = u64::from_le_bytes(header);

    if expires_at != 0 && expires_at <= now_millis() {
        logger::trace!("{:?} has expired.", path);
        ignore_not_found(fs::remove_file(path), ())?;
        return Ok(None);
    }

    contents.drain(..HEADER_LEN);
    Ok(Some(contents))
}

impl SharedStore for FileStore {
    async fn exists(&self, key: &str) -> Result<bool, MailslotError> {
        self.with_key(key, |paths| Ok(paths.read()?.is_some())).await
    }

    async fn fetch(&self, key: &str) -> Result<Option<Vec<u8>>, MailslotError> {
        self.with_key(key, |paths| Ok(paths.read()?)).await
    }

    async fn delete(&self, key: &str) -> Result<bool, MailslotError> {
        self.with_key(key, |paths| Ok(paths.remove()?)).await
    }

    async fn store(&self, key: &str, value: Vec<u8>, ttl: Ttl) -> Result<(), MailslotError> {
        self.with_key(key, move |paths| Ok(paths.write(&value, ttl)?)).await
    }

    /// Atomic across processes which go through [`FileStore`].
    async fn update<F>(&self, key: &str, ttl: Ttl, f: F) -> Result<(), MailslotError>
    where
        F: FnOnce(Option<Vec<u8>>) -> Result<Vec<u8>, MailslotError> + Send + 'static,
    {
        self.with_key(key, move |paths| {
            let _lock = paths.lock()?;

            let next = f(paths.read()?)?;
            Ok(paths.write(&next, ttl)?)
        })
        .await
    }

    /// Atomic: the value is claimed by renaming it away before it is read.
    async fn take(&self, key: &str) -> Result<Option<Vec<u8>>, MailslotError> {
        self.with_key(key, |paths| {
            let _lock = paths.lock()?;

            let claimed = paths.scratch();
            match fs::rename(&paths.value, &claimed) {
                Ok(()) => {}
                Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
                Err(err) => return Err(err.into()),
            }

            let value = read_value(&claimed);
            ignore_not_found(fs::remove_file(&claimed), ())?;
            Ok(value?)
        })
        .await
    }
}
