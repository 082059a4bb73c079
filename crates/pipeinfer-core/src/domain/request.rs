use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};

/// Extensions the worker processes as still images.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp"];

/// Extensions the worker processes frame by frame.
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mkv", "mov"];

/// A single work item: the absolute path of a media file to process.
///
/// Existence of the file is the caller's concern; this type only guarantees
/// the path is absolute and fits on one protocol line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkRequest {
    path: PathBuf,
}

impl WorkRequest {
    /// Create a request, resolving relative paths against the current directory.
    ///
    /// Fails with `InvalidInput` if the path is empty or contains a line break,
    /// since either would corrupt the line framing.
    pub fn new(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "request path is empty",
            ));
        }

        let text = path.to_string_lossy();
        if text.contains('\n') || text.contains('\r') {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("request path contains a line break: {text:?}"),
            ));
        }

        Ok(Self {
            path: std::path::absolute(path)?,
        })
    }

    /// The absolute path sent to the worker.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Media kind derived from the file extension.
    pub fn media_kind(&self) -> MediaKind {
        MediaKind::from_path(&self.path)
    }
}

/// Broad category of an input file, decided by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Other,
}

impl MediaKind {
    /// Classify a path by its extension (case-insensitive).
    pub fn from_path(path: &Path) -> Self {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return Self::Other;
        };
        let ext = ext.to_ascii_lowercase();

        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Self::Image
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Self::Video
        } else {
            Self::Other
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Image => write!(f, "image"),
            Self::Video => write!(f, "video"),
            Self::Other => write!(f, "other"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path_is_made_absolute() {
        let request = WorkRequest::new("temp_query.jpg").unwrap();
        assert!(request.path().is_absolute());
        assert!(request.path().ends_with("temp_query.jpg"));
    }

    #[test]
    fn test_absolute_path_is_kept() {
        let request = WorkRequest::new("/data/in/frame.png").unwrap();
        assert_eq!(request.path(), Path::new("/data/in/frame.png"));
    }

    #[test]
    fn test_line_break_is_rejected() {
        let err = WorkRequest::new("/tmp/a\nb.jpg").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_empty_path_is_rejected() {
        assert!(WorkRequest::new("").is_err());
    }

    #[test]
    fn test_media_kind_from_extension() {
        assert_eq!(MediaKind::from_path(Path::new("a.JPG")), MediaKind::Image);
        assert_eq!(MediaKind::from_path(Path::new("a.bmp")), MediaKind::Image);
        assert_eq!(MediaKind::from_path(Path::new("clip.mkv")), MediaKind::Video);
        assert_eq!(MediaKind::from_path(Path::new("model.pt")), MediaKind::Other);
        assert_eq!(MediaKind::from_path(Path::new("noext")), MediaKind::Other);
    }
}
