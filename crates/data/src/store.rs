use runboard_core::{RunId, RunStore, StoreError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

const BLOCK_EXTENSION: &str = "txt";

/// Keeps one `<id>.txt` file per run under a directory.
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// reader never sees a half-written block.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, run: &RunId) -> Result<PathBuf, StoreError> {
        let id = run.as_str();
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
        if !valid {
            return Err(StoreError::InvalidRunId(id.to_string()));
        }
        Ok(self.dir.join(format!("{id}.{BLOCK_EXTENSION}")))
    }
}

impl RunStore for FileStore {
    fn read_raw(&self, run: &RunId) -> Result<Option<String>, StoreError> {
        let path = self.path_for(run)?;
        match fs::read_to_string(&path) {
            Ok(raw) => {
                debug!(run = %run, bytes = raw.len(), "status block read");
                Ok(Some(raw))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(backend("read", &path, err)),
        }
    }

    fn write_raw(&mut self, run: &RunId, raw: &str) -> Result<(), StoreError> {
        let path = self.path_for(run)?;
        fs::create_dir_all(&self.dir).map_err(|err| backend("create", &self.dir, err))?;
        let tmp = path.with_extension(format!("{BLOCK_EXTENSION}.tmp"));
        fs::write(&tmp, raw).map_err(|err| backend("write", &tmp, err))?;
        fs::rename(&tmp, &path).map_err(|err| backend("rename", &path, err))?;
        debug!(run = %run, bytes = raw.len(), "status block written");
        Ok(())
    }
}

fn backend(action: &str, path: &Path, err: io::Error) -> StoreError {
    StoreError::Backend(format!("{action} {}: {err}", path.display()))
}
