//! Durable last-seen marker for the notification side-channel.
//!
//! One small file under the state directory holding the id of the newest
//! posting the operator has been alerted about. Absence of the file is the
//! cold-start condition, not an error.

use std::fs;
use std::path::PathBuf;

use crate::application::notify::{LastSeenError, LastSeenStore};

const MARKER_FILE: &str = "last_seen_posting";

pub struct FileLastSeenStore {
    path: PathBuf,
}

impl FileLastSeenStore {
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            path: state_dir.into().join(MARKER_FILE),
        }
    }
}

impl LastSeenStore for FileLastSeenStore {
    fn load(&self) -> Result<Option<String>, LastSeenError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let trimmed = contents.trim();
                if trimmed.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(trimmed.to_string()))
                }
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(LastSeenError::from(err)),
        }
    }

    fn store(&self, id: &str) -> Result<(), LastSeenError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, id)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_marker_reads_as_cold_start() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileLastSeenStore::new(dir.path());
        assert_eq!(store.load().expect("load"), None);
    }

    #[test]
    fn marker_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileLastSeenStore::new(dir.path().join("nested"));
        store.store("abc-123").expect("store");
        assert_eq!(store.load().expect("load").as_deref(), Some("abc-123"));
        store.store("def-456").expect("overwrite");
        assert_eq!(store.load().expect("load").as_deref(), Some("def-456"));
    }
}
