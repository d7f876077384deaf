//! Size-rotating log file usable as a `tracing-subscriber` writer.
//!
//! When the active file would grow past the size limit it is shifted to
//! `<name>.1`, older backups move up by one (`.1` → `.2` …), and anything past
//! the retention count is deleted.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing_subscriber::fmt::MakeWriter;

/// Rotate once the file reaches 10 MB.
pub const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Backups kept after rotation.
pub const MAX_BACKUP_FILES: usize = 3;

#[derive(Debug, Default)]
struct Active {
    file: Option<File>,
    written: u64,
}

/// Thread-safe rotating log file.
///
/// The file is opened lazily on the first write, so construction never fails.
#[derive(Debug)]
pub struct RotatingLog {
    path: PathBuf,
    max_bytes: u64,
    backups: usize,
    active: Mutex<Active>,
}

impl RotatingLog {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_limits(path, MAX_FILE_SIZE_BYTES, MAX_BACKUP_FILES)
    }

    #[must_use]
    pub fn with_limits(path: impl Into<PathBuf>, max_bytes: u64, backups: usize) -> Self {
        Self {
            path: path.into(),
            max_bytes,
            backups,
            active: Mutex::new(Active::default()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> io::Result<MutexGuard<'_, Active>> {
        self.active
            .lock()
            .map_err(|e| io::Error::other(format!("log writer lock poisoned: {e}")))
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(format!(".{index}"));
        PathBuf::from(name)
    }

    fn write_record(&self, buf: &[u8]) -> io::Result<usize> {
        let mut active = self.lock()?;

        let incoming = buf.len() as u64;
        if active.written > 0 && active.written + incoming > self.max_bytes {
            active.file = None;
            self.rotate()?;
            active.written = 0;
        }

        if active.file.is_none() {
            let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
            active.written = file.metadata().map_or(0, |m| m.len());
            active.file = Some(file);
        }

        let file = active
            .file
            .as_mut()
            .ok_or_else(|| io::Error::other("log file not open"))?;
        file.write_all(buf)?;
        active.written += incoming;
        Ok(buf.len())
    }

    fn rotate(&self) -> io::Result<()> {
        if self.backups == 0 {
            return remove_if_present(&self.path);
        }

        remove_if_present(&self.backup_path(self.backups))?;
        for index in (1..self.backups).rev() {
            let from = self.backup_path(index);
            if from.exists() {
                fs::rename(&from, self.backup_path(index + 1))?;
            }
        }
        if self.path.exists() {
            fs::rename(&self.path, self.backup_path(1))?;
        }
        Ok(())
    }

    fn flush_active(&self) -> io::Result<()> {
        match self.lock()?.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

fn remove_if_present(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

/// Borrowed handle handed to the fmt layer for each event.
#[derive(Debug)]
pub struct LogHandle<'a>(&'a RotatingLog);

impl Write for LogHandle<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write_record(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush_active()
    }
}

impl<'a> MakeWriter<'a> for RotatingLog {
    type Writer = LogHandle<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        LogHandle(self)
    }
}
