use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

// @module: File and directory utilities for run artifacts

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> io::Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        } else if !path.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} exists and is not a directory", path.display()),
            ));
        }
        Ok(())
    }

    /// Open a file for appending, creating it and its parent directory if needed
    pub fn open_append<P: AsRef<Path>>(path: P) -> io::Result<File> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                Self::ensure_dir(parent)?;
            }
        }

        OpenOptions::new().create(true).append(true).open(path)
    }
}
