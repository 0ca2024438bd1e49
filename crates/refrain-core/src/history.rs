//! Streaming-history loading.
//!
//! A data directory holds one sub-directory per user; each sub-directory
//! holds the provider's `*.json` export files (arrays of
//! [`StreamingRecord`]). The sub-directory name becomes the user label on
//! every loaded [`PlayEvent`].

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::model::{PlayEvent, StreamingRecord};

fn is_history_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// List the immediate children of `dir` matching `keep`, in file-name order.
fn children(dir: &Path, keep: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::NotFound {
            entity: "directory",
            path: dir.to_path_buf(),
        });
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| Error::Io(e.into()))?;
        if keep(entry.path()) {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}

/// Read one export file into raw records.
pub fn read_history_file(path: &Path) -> Result<Vec<StreamingRecord>> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| Error::History {
        path: path.to_path_buf(),
        source,
    })
}

/// Load every export file in `user_dir`, labelling events with `user`.
pub fn load_user_history(user_dir: &Path, user: &str) -> Result<Vec<PlayEvent>> {
    let mut events = Vec::new();
    for path in children(user_dir, is_history_file)? {
        log::debug!("Reading history file {}", path.display());
        for record in read_history_file(&path)? {
            events.push(PlayEvent::from_record(record, user)?);
        }
    }
    log::info!("Loaded {} play events for {}", events.len(), user);
    Ok(events)
}

/// Load all users under `data_dir`, one sub-directory per user.
///
/// Users are visited in name order and their events concatenated.
pub fn load_all_users(data_dir: &Path) -> Result<Vec<PlayEvent>> {
    let mut all = Vec::new();
    for user_dir in children(data_dir, Path::is_dir)? {
        let user = user_dir
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                Error::InvalidData(format!(
                    "user directory name is not valid UTF-8: {}",
                    user_dir.display()
                ))
            })?
            .to_string();
        all.extend(load_user_history(&user_dir, &user)?);
    }
    Ok(all)
}
