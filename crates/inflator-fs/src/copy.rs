//! Recursive directory copying

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::{Error, OverlayPath, Result};

/// Copy the directory tree `src` into `dest`, merging with existing content.
///
/// Version-control metadata and bytecode caches are skipped at every depth,
/// as is any entry that is `dest` itself (copying a tree into a subdirectory
/// of itself would otherwise never finish). Symlinks are followed and their
/// targets copied as regular files.
pub fn copy_tree(src: &Path, dest: &Path) -> Result<()> {
    let walker = WalkDir::new(src)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| {
            let excluded = entry.depth() > 0
                && entry.file_type().is_dir()
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(OverlayPath::is_excluded_dir);
            !excluded && entry.path() != dest
        });

    for entry in walker {
        let entry = entry.map_err(|e| Error::Walk {
            path: src.to_path_buf(),
            message: e.to_string(),
        })?;

        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| Error::Walk {
                path: entry.path().to_path_buf(),
                message: e.to_string(),
            })?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| Error::io(&target, e))?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }
            fs::copy(entry.path(), &target).map_err(|e| Error::io(entry.path(), e))?;
        }
    }

    Ok(())
}
