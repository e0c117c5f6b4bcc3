//! Capability-based file access for the Reparto command-line tools.
//!
//! Dataset files are opened and database locations prepared through
//! `cap-std` directories so every access is relative to an explicitly opened
//! base directory. Paths are UTF-8 (`camino`).
#![forbid(unsafe_code)]

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use std::io;

/// Open a dataset file for reading.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    let (dir, name) = open_parent(path)?;
    dir.open(name)
}

/// Whether `path` exists and is a regular file.
///
/// A missing path is an `io::ErrorKind::NotFound` error rather than `false`,
/// so callers can tell "absent" from "not a file".
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = open_parent(path)?;
    dir.metadata(name).map(|meta| meta.is_file())
}

/// Create the directories leading to a database file.
///
/// Rejects a `path` that already names a directory, since SQLite would fail
/// later with a less helpful message.
pub fn prepare_database_path(path: &Utf8Path) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        let (base, relative) = split_root(parent)?;
        if !relative.as_str().is_empty() {
            base.create_dir_all(&relative)?;
        }
    }
    match file_is_file(path) {
        Ok(false) => Err(io::Error::other(format!("{path} is a directory"))),
        Ok(true) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err),
    }
}

fn open_parent(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, &str)> {
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("{path} does not name a file")))?;
    let parent = path
        .parent()
        .filter(|p| !p.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, name))
}

/// Split `dir` into an opened root (filesystem root, drive prefix or the
/// current directory) and the path below it.
fn split_root(dir: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let mut root = Utf8PathBuf::new();
    let mut relative = Utf8PathBuf::new();
    for component in dir.components() {
        match component {
            Utf8Component::Prefix(_) | Utf8Component::RootDir => root.push(component),
            other => relative.push(other),
        }
    }
    if root.as_str().is_empty() {
        root.push(".");
    }
    let base = fs_utf8::Dir::open_ambient_dir(&root, ambient_authority())?;
    Ok((base, relative))
}
