//! Inbox scanning and archival of processed inputs.
//!
//! The inbox must hold at most one entry, and that entry must be an `.xlsx`
//! workbook. After a successful run the workbook is moved to the done
//! directory.

use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use crate::error::StoreError;

/// Extension accepted for input workbooks.
pub const XLSX_EXTENSION: &str = "xlsx";

/// What the inbox contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboxScan {
    /// Nothing to process.
    Empty,
    /// Exactly one workbook.
    Single(PathBuf),
}

/// Inspects `dir` and returns the single workbook in it, if any.
///
/// Every entry counts, directories and hidden files included.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub async fn scan(dir: &Path) -> Result<InboxScan, StoreError> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut found = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        found.push(entry.path());
    }

    match found.len() {
        0 => {
            info!("Inbox is empty");
            Ok(InboxScan::Empty)
        }
        1 => {
            let path = found.remove(0);
            if !is_xlsx(&path) {
                return Err(StoreError::NotXlsx(path));
            }
            info!(file = %path.display(), "Found input workbook");
            Ok(InboxScan::Single(path))
        }
        count => Err(StoreError::MultipleInputs {
            dir: dir.to_path_buf(),
            count,
        }),
    }
}

fn is_xlsx(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == XLSX_EXTENSION)
}

/// Creates `path` and its parents if missing.
pub async fn ensure_dir(path: &Path) -> Result<(), StoreError> {
    if !path.exists() {
        debug!(path = %path.display(), "Creating directory");
        tokio::fs::create_dir_all(path).await?;
    }
    Ok(())
}

/// Moves `file` into `done_dir`, keeping its name.
///
/// A rename across filesystems falls back to copy then delete.
#[instrument(skip_all, fields(file = %file.display(), done = %done_dir.display()))]
pub async fn archive(file: &Path, done_dir: &Path) -> Result<PathBuf, StoreError> {
    let name = file
        .file_name()
        .ok_or_else(|| StoreError::NotXlsx(file.to_path_buf()))?;
    ensure_dir(done_dir).await?;
    let dest = done_dir.join(name);

    let archive_err = |source: io::Error| StoreError::Archive {
        from: file.to_path_buf(),
        to: dest.clone(),
        source,
    };

    match tokio::fs::rename(file, &dest).await {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            warn!("Rename crosses devices, copying instead");
            tokio::fs::copy(file, &dest).await.map_err(archive_err)?;
            tokio::fs::remove_file(file).await.map_err(archive_err)?;
        }
        Err(e) => return Err(archive_err(e)),
    }

    info!(dest = %dest.display(), "Archived input workbook");
    Ok(dest)
}
