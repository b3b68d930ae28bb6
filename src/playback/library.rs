//! Track discovery in a flat music directory.

use crate::{constants::SUPPORTED_EXTENSIONS, Result};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

const README_NAME: &str = "README.txt";
const README_TEXT: &str = "Place your music files (MP3, WAV, OGG) in this directory.\n\
The application will automatically detect and play them.\n";

/// Flat list of playable files found in one directory
#[derive(Debug, Clone)]
pub struct TrackLibrary {
    dir: PathBuf,
    tracks: Vec<PathBuf>,
}

impl TrackLibrary {
    /// Create an empty library rooted at `dir` without touching the filesystem
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            dir: dir.into(),
            tracks: Vec::new(),
        }
    }

    /// Scan `dir` for tracks.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read
    pub fn scan<P: Into<PathBuf>>(dir: P) -> Result<Self> {
        let mut library = Self::new(dir);
        library.reload()?;
        Ok(library)
    }

    /// Create the directory with a short README when it does not exist.
    ///
    /// Returns true if the directory was created.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or README cannot be written
    pub fn ensure_dir(&self) -> Result<bool> {
        if self.dir.exists() {
            return Ok(false);
        }
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(README_NAME), README_TEXT)?;
        info!("Created music directory {}", self.dir.display());
        Ok(true)
    }

    /// Rescan the directory, replacing the track list.
    ///
    /// On error the previous list is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read
    pub fn reload(&mut self) -> Result<usize> {
        let mut tracks = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", self.dir.display(), e);
                    continue;
                }
            };
            let path = entry.path();
            if path.is_file() && is_supported(&path) {
                tracks.push(path);
            }
        }
        tracks.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        self.tracks = tracks;
        Ok(self.tracks.len())
    }

    /// Point the library at another directory and scan it.
    ///
    /// # Errors
    ///
    /// Returns an error if the new directory cannot be read; the library is
    /// left unchanged in that case
    pub fn set_dir<P: Into<PathBuf>>(&mut self, dir: P) -> Result<usize> {
        let mut other = Self::new(dir);
        let count = other.reload()?;
        *self = other;
        Ok(count)
    }

    /// Directory being scanned
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// All tracks, sorted by file name
    #[must_use]
    pub fn tracks(&self) -> &[PathBuf] {
        &self.tracks
    }

    /// Track at `index`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Path> {
        self.tracks.get(index).map(PathBuf::as_path)
    }

    /// Number of tracks
    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// True when no tracks were found
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// Whether `path` has one of the supported audio extensions (case-insensitive)
#[must_use]
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// File name of a track for display
#[must_use]
pub fn track_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
