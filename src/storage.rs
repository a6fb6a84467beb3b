//! Upload storage: validated files land on disk under randomized names for
//! the duration of one processing run, then get cleaned up.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::validation::extension_of;

/// A file persisted to the upload directory.
#[derive(Debug, Clone)]
pub struct StoredUpload {
    pub path: PathBuf,
    pub size: u64,
}

/// Writes uploads into a directory with collision-free names and re-checks
/// size constraints after the write.
pub struct UploadStore {
    dir: PathBuf,
    max_file_size: u64,
}

impl UploadStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>, max_file_size: u64) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, max_file_size })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist upload bytes under a random name that keeps the original
    /// extension. The saved file is re-checked: an empty or oversized file on
    /// disk is removed and reported as an error.
    pub fn save(&self, bytes: &[u8], original_filename: &str) -> io::Result<StoredUpload> {
        let name = match extension_of(original_filename) {
            Some(ext) => format!("{}.{}", Uuid::new_v4().simple(), ext),
            None => Uuid::new_v4().simple().to_string(),
        };
        let path = self.dir.join(name);

        let mut file = fs::File::create(&path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        drop(file);

        let size = fs::metadata(&path)?.len();
        if size == 0 {
            self.cleanup(&path);
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "saved file is empty",
            ));
        }
        if size > self.max_file_size {
            self.cleanup(&path);
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("saved file exceeds {} bytes", self.max_file_size),
            ));
        }

        debug!("stored upload: {} ({} bytes)", path.display(), size);
        Ok(StoredUpload { path, size })
    }

    /// Best-effort removal of a stored file. Failure is logged, not raised;
    /// a leaked temp file must not mask the real outcome of a run.
    pub fn cleanup(&self, path: &Path) {
        if let Err(e) = fs::remove_file(path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!("failed to remove {}: {}", path.display(), e);
            }
        }
    }

    /// Remove files older than `age`, returning how many were deleted.
    /// Dotfiles and subdirectories are left alone.
    pub fn sweep_older_than(&self, age: Duration) -> io::Result<usize> {
        let cutoff = SystemTime::now() - age;
        let mut removed = 0;

        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type()?.is_file() {
                continue;
            }
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }
            let modified = entry.metadata()?.modified()?;
            if modified < cutoff {
                self.cleanup(&path);
                if !path.exists() {
                    removed += 1;
                }
            }
        }

        if removed > 0 {
            debug!("swept {} stale uploads from {}", removed, self.dir.display());
        }
        Ok(removed)
    }
}
