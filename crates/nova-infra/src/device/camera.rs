//! Camera backed by a snapshot file.
//!
//! An external capture tool keeps overwriting one JPEG with the latest
//! frame. Capturing reads whatever is there right now.

use std::path::{Path, PathBuf};

use nova_core::device::VisualCapture;

#[derive(Debug, Clone)]
pub struct SnapshotCamera {
    path: PathBuf,
}

impl SnapshotCamera {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl VisualCapture for SnapshotCamera {
    fn capture(&self) -> Option<Vec<u8>> {
        match std::fs::read(&self.path) {
            Ok(bytes) if !bytes.is_empty() => Some(bytes),
            Ok(_) => {
                tracing::warn!(path = %self.path.display(), "snapshot file is empty");
                None
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to read snapshot");
                None
            }
        }
    }

    fn clear(&self) {
        tracing::debug!("live feed resumed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_capture_reads_latest_frame() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("frame.jpg");
        let camera = SnapshotCamera::new(&path);

        assert!(camera.capture().is_none());

        std::fs::write(&path, [0xFF, 0xD8, 0xFF, 0xE0]).unwrap();
        assert_eq!(camera.capture().unwrap().len(), 4);

        std::fs::write(&path, b"").unwrap();
        assert!(camera.capture().is_none());
    }
}
