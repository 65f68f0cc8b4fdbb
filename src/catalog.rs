use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions accepted into the catalog, compared case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Scan `dir` for overlay images.
///
/// The directory is created if it does not exist, so a fresh install starts
/// with an empty catalog instead of an error. An unreadable directory or
/// entry is logged and contributes nothing; this function never fails the
/// caller.
///
/// Unless `sorted` is set, paths come back in directory-listing order, which
/// is platform-dependent and not guaranteed stable between scans. Callers
/// that need a deterministic rotation order must opt into the sort.
pub fn scan_images(dir: &Path, sorted: bool) -> Vec<PathBuf> {
    if let Err(e) = std::fs::create_dir_all(dir) {
        tracing::error!(dir = %dir.display(), error = %e, "failed to create images directory");
        return Vec::new();
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::error!(dir = %dir.display(), error = %e, "failed to read directory entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let keep = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            .unwrap_or(false);
        if keep {
            paths.push(entry.into_path());
        }
    }

    if sorted {
        paths.sort();
    }
    paths
}

/// Round-robin position in the image sequence. Advanced only by the
/// presenter, only after a shown overlay has been hidden again.
#[derive(Debug, Default)]
pub struct RotationState {
    paths: Vec<PathBuf>,
    index: usize,
}

impl RotationState {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths, index: 0 }
    }

    pub fn current(&self) -> Option<&Path> {
        self.paths.get(self.index).map(PathBuf::as_path)
    }

    /// Move to the next image, wrapping at the end. With an empty catalog
    /// the index stays pinned at 0.
    pub fn advance(&mut self) {
        if !self.paths.is_empty() {
            self.index = (self.index + 1) % self.paths.len();
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
