//! [`ImageSink`] that writes saved photos into the captures directory.

use std::io;
use std::path::{Path, PathBuf};

use nova_core::device::ImageSink;
use nova_types::chat::CapturedImage;

#[derive(Debug, Clone)]
pub struct CaptureDirectory {
    dir: PathBuf,
}

impl CaptureDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `nova-capture-<unix millis>.jpg`
    pub fn file_name(image: &CapturedImage) -> String {
        format!("nova-capture-{}.jpg", image.captured_at.timestamp_millis())
    }

    pub async fn write(&self, image: &CapturedImage) -> io::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(Self::file_name(image));
        tokio::fs::write(&path, &image.bytes).await?;
        Ok(path)
    }
}

impl ImageSink for CaptureDirectory {
    fn save(&self, image: &CapturedImage) {
        let sink = self.clone();
        let image = image.clone();
        tokio::spawn(async move {
            match sink.write(&image).await {
                Ok(path) => tracing::info!(path = %path.display(), "photo saved"),
                Err(e) => tracing::warn!(error = %e, "failed to save photo"),
            }
        });
    }
}
