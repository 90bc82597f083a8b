//! File system helpers for build output.
//!
//! All writes go through [`resolve_output_path`], which rejects any relative
//! path that would land outside the output directory. Bundle files are
//! written in two phases (temp file, then rename) so that a failed build
//! never leaves half-written chunks behind.

use std::fs;
use std::path::{Path, PathBuf};

use path_clean::PathClean;
use walkdir::WalkDir;

use crate::{Error, Result};

/// Resolve `relative` under `base_dir`, rejecting traversal outside it.
pub fn resolve_output_path(base_dir: &Path, relative: &str) -> Result<PathBuf> {
    if relative.contains('\0') {
        return Err(Error::InvalidOutputPath(
            "Filename contains null byte".to_string(),
        ));
    }

    let base_dir = base_dir.to_path_buf().clean();
    let relative_path = Path::new(relative.trim_start_matches('/')).clean();
    let full_path = base_dir.join(&relative_path).clean();

    if !full_path.starts_with(&base_dir) || full_path == base_dir {
        return Err(Error::InvalidOutputPath(format!(
            "Path '{}' escapes output directory '{}' (resolved to '{}')",
            relative,
            base_dir.display(),
            full_path.display()
        )));
    }

    Ok(full_path)
}

/// Remove `dir` with everything in it, then recreate it empty.
pub fn reset_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        if !dir.is_dir() {
            return Err(Error::InvalidOutputPath(format!(
                "Output path exists but is not a directory: {}",
                dir.display()
            )));
        }
        fs::remove_dir_all(dir)
            .map_err(|e| Error::io(format!("Failed to clear '{}'", dir.display()), e))?;
    }

    fs::create_dir_all(dir)
        .map_err(|e| Error::io(format!("Failed to create '{}'", dir.display()), e))
}

/// Write every `(path, content)` pair, all or nothing.
///
/// Content goes to a sibling `.tmp` file first; once every temp file is in
/// place they are renamed to their final names. Any failure removes the temp
/// files written so far.
pub fn write_files_atomic(operations: &[(PathBuf, Vec<u8>)]) -> Result<()> {
    let mut temp_files = Vec::with_capacity(operations.len());

    for (target_path, content) in operations {
        if let Some(parent) = target_path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                cleanup_temp_files(&temp_files);
                return Err(Error::io(
                    format!("Failed to create directory '{}'", parent.display()),
                    e,
                ));
            }
        }

        let temp_path = temp_path_for(target_path);
        if let Err(e) = fs::write(&temp_path, content) {
            cleanup_temp_files(&temp_files);
            return Err(Error::io(
                format!("Failed to write temporary file '{}'", temp_path.display()),
                e,
            ));
        }

        temp_files.push((temp_path, target_path.clone()));
    }

    for (temp_path, target_path) in &temp_files {
        if let Err(e) = fs::rename(temp_path, target_path) {
            cleanup_temp_files(&temp_files);
            return Err(Error::io(
                format!(
                    "Failed to rename '{}' to '{}'",
                    temp_path.display(),
                    target_path.display()
                ),
                e,
            ));
        }
    }

    Ok(())
}

/// Copy every file under `src` into `dst`, preserving relative subpaths.
///
/// Returns the forward-slash relative path and size of each copied file, in
/// walk order. Symlinks are followed and copied as regular files under the
/// link's own name; dangling links are skipped. A missing `src` copies
/// nothing.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<Vec<(String, u64)>> {
    if !src.is_dir() {
        tracing::debug!(dir = %src.display(), "no public directory, skipping copy");
        return Ok(Vec::new());
    }

    let mut copied = Vec::new();

    for entry in WalkDir::new(src).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if is_dangling_link(&e) => {
                tracing::warn!(
                    path = %e.path().map(|p| p.display().to_string()).unwrap_or_default(),
                    "skipping dangling symlink"
                );
                continue;
            }
            Err(e) => {
                let message = format!("Failed to walk '{}'", src.display());
                return Err(match e.into_io_error() {
                    Some(io) => Error::io(message, io),
                    None => Error::InvalidOutputPath(message),
                });
            }
        };

        let file_type = entry.file_type();
        if file_type.is_dir() {
            continue;
        }
        if !file_type.is_file() {
            tracing::debug!(path = %entry.path().display(), "skipping non-regular file");
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|_| Error::InvalidOutputPath(entry.path().display().to_string()))?;
        let relative = to_forward_slashes(relative);
        let target = resolve_output_path(dst, &relative)?;

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::io(format!("Failed to create '{}'", parent.display()), e))?;
        }

        let size = fs::copy(entry.path(), &target).map_err(|e| {
            Error::io(
                format!("Failed to copy '{}'", entry.path().display()),
                e,
            )
        })?;

        copied.push((relative, size));
    }

    Ok(copied)
}

fn is_dangling_link(e: &walkdir::Error) -> bool {
    e.io_error()
        .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
}

/// Render a relative path with `/` separators regardless of platform.
pub fn to_forward_slashes(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn temp_path_for(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    target.with_file_name(name)
}

fn cleanup_temp_files(temp_files: &[(PathBuf, PathBuf)]) {
    for (temp_path, _) in temp_files {
        if temp_path.exists() {
            if let Err(e) = fs::remove_file(temp_path) {
                tracing::warn!(
                    path = %temp_path.display(),
                    error = %e,
                    "failed to clean up temporary file"
                );
            }
        }
    }
}
