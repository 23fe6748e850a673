//! Filesystem collaborator: directory creation, existence probes, exclusive writes.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

pub trait Filesystem {
    /// Creates `path` and its parents if absent. Idempotent.
    fn ensure_directory(&self, path: &Path) -> io::Result<()>;

    fn exists(&self, path: &Path) -> bool;

    /// Creates `path` and writes `bytes` to it. Fails with `ErrorKind::AlreadyExists`
    /// instead of replacing an existing file.
    fn write_new(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;
}

impl<T: Filesystem + ?Sized> Filesystem for &T {
    fn ensure_directory(&self, path: &Path) -> io::Result<()> {
        (**self).ensure_directory(path)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn write_new(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        (**self).write_new(path, bytes)
    }
}

/// The local disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl Filesystem for LocalFs {
    fn ensure_directory(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn exists(&self, path: &Path) -> bool {
        // Broken symlinks count as taken.
        path.symlink_metadata().is_ok()
    }

    fn write_new(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
        if let Err(e) = write_and_sync(&mut file, bytes) {
            drop(file);
            let _ = fs::remove_file(path);
            return Err(e);
        }
        Ok(())
    }
}

fn write_and_sync(file: &mut File, bytes: &[u8]) -> io::Result<()> {
    file.write_all(bytes)?;
    file.sync_all()
}
