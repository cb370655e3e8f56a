//! The image gallery boundary.
//!
//! Stands in for the device photo library: a configured directory of
//! image files. Access must be requested before listing (the permission
//! prompt analogue), picking yields a `file://` URI stored on the
//! product as-is, and nothing is ever uploaded.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Extensions recognised as images when listing the gallery.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Errors from the gallery boundary.
#[derive(Debug, Error)]
pub enum PickError {
    /// The gallery directory is missing or unreadable.
    #[error("gallery access denied: {0}")]
    AccessDenied(PathBuf),

    /// Filesystem failure while listing entries.
    #[error("gallery read error: {0}")]
    Io(#[from] std::io::Error),
}

/// One pickable image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryEntry {
    /// File name shown in the picker.
    pub name: String,
    /// `file://` URI stored on the product when picked.
    pub uri: String,
}

/// A local directory of images acting as the device gallery.
#[derive(Debug, Clone)]
pub struct ImageGallery {
    dir: PathBuf,
}

impl ImageGallery {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Check the gallery can be read before opening the picker.
    ///
    /// # Errors
    ///
    /// Returns [`PickError::AccessDenied`] when the directory does not
    /// exist or cannot be listed.
    pub fn request_access(&self) -> Result<(), PickError> {
        if std::fs::read_dir(&self.dir).is_err() {
            return Err(PickError::AccessDenied(self.dir.clone()));
        }
        Ok(())
    }

    /// List the pickable images, sorted by file name.
    ///
    /// Non-image files and subdirectories are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`PickError::AccessDenied`] when the directory cannot be
    /// opened, or [`PickError::Io`] on a failure mid-listing.
    pub fn entries(&self) -> Result<Vec<GalleryEntry>, PickError> {
        let dir = std::fs::read_dir(&self.dir)
            .map_err(|_| PickError::AccessDenied(self.dir.clone()))?;

        let mut entries = Vec::new();
        for entry in dir {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() || !is_image(&path) {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            entries.push(GalleryEntry {
                uri: file_uri(&path),
                name,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Build a `file://` URI, absolutising relative paths against the
/// current directory.
fn file_uri(path: &Path) -> String {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    format!("file://{}", absolute.display())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Temp gallery directory removed on drop.
    struct TempGallery {
        dir: PathBuf,
    }

    impl TempGallery {
        fn new(label: &str) -> Self {
            let dir = std::env::temp_dir().join(format!(
                "punguin-gallery-{label}-{}",
                std::process::id()
            ));
            std::fs::create_dir_all(&dir).unwrap();
            Self { dir }
        }

        fn touch(&self, name: &str) {
            std::fs::write(self.dir.join(name), b"").unwrap();
        }
    }

    impl Drop for TempGallery {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.dir);
        }
    }

    #[test]
    fn test_access_denied_for_missing_dir() {
        let gallery = ImageGallery::new("/nonexistent/punguin-gallery");
        assert!(matches!(
            gallery.request_access(),
            Err(PickError::AccessDenied(_))
        ));
        assert!(matches!(gallery.entries(), Err(PickError::AccessDenied(_))));
    }

    #[test]
    fn test_access_granted_for_readable_dir() {
        let tmp = TempGallery::new("access");
        let gallery = ImageGallery::new(&tmp.dir);
        assert!(gallery.request_access().is_ok());
    }

    #[test]
    fn test_entries_filter_and_sort() {
        let tmp = TempGallery::new("entries");
        tmp.touch("b.png");
        tmp.touch("a.JPG");
        tmp.touch("notes.txt");

        let gallery = ImageGallery::new(&tmp.dir);
        let entries = gallery.entries().unwrap();

        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.JPG", "b.png"]);
        assert!(entries[0].uri.starts_with("file://"));
        assert!(entries[0].uri.ends_with("a.JPG"));
    }

    #[test]
    fn test_empty_gallery_lists_nothing() {
        let tmp = TempGallery::new("empty");
        let gallery = ImageGallery::new(&tmp.dir);
        assert!(gallery.entries().unwrap().is_empty());
    }
}
