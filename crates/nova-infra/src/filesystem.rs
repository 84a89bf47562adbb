//! Data directory layout.

use std::path::{Path, PathBuf};

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `NOVA_DATA_DIR` environment variable
/// 2. `~/.nova`
/// 3. `./.nova`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("NOVA_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".nova");
    }

    PathBuf::from(".nova")
}

/// Directory where saved photos land: `{data_dir}/captures/`.
pub fn captures_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("captures")
}

/// Directory holding persisted blobs: `{data_dir}/store/`.
pub fn store_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("store")
}
