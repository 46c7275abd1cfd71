//! Media files handed to the transcription gateway

use crate::{Result, StudioError};
use std::path::Path;
use tracing::debug;

/// Raw bytes of an uploaded recording together with its MIME type
#[derive(Clone)]
pub struct MediaFile {
    pub name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl std::fmt::Debug for MediaFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl MediaFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Build a media file from in-memory bytes, inferring the MIME type from the name
    pub fn from_bytes(name: impl Into<String>, data: Vec<u8>) -> Result<Self> {
        let name = name.into();
        let mime_type = mime_type_for(&name)
            .ok_or_else(|| StudioError::Media(format!("unsupported file type: {name}")))?;

        if data.is_empty() {
            return Err(StudioError::Media(format!("{name} is empty")));
        }

        Ok(Self::new(name, mime_type, data))
    }

    /// Read a recording from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| StudioError::Media(format!("invalid file path: {}", path.display())))?
            .to_string();

        let data = std::fs::read(path)
            .map_err(|e| StudioError::Media(format!("failed to read {}: {e}", path.display())))?;

        debug!("Loaded media file {} ({} bytes)", name, data.len());
        Self::from_bytes(name, data)
    }
}

/// MIME type for the audio/video extensions the gateway accepts
pub fn mime_type_for(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name).extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "m4a" => "audio/mp4",
        "aac" => "audio/aac",
        "ogg" | "oga" => "audio/ogg",
        "opus" => "audio/opus",
        "flac" => "audio/flac",
        "weba" => "audio/webm",
        "aiff" | "aif" => "audio/aiff",
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        "mpeg" | "mpg" => "video/mpeg",
        "3gp" => "video/3gpp",
        _ => return None,
    };
    Some(mime)
}

/// Default meeting title derived from a file name
///
/// Drops the last extension and upper-cases the first character,
/// so `daily standup.mp3` becomes `Daily standup`.
pub fn suggested_title(file_name: &str) -> String {
    let stem = match file_name.rfind('.') {
        Some(idx) if idx > 0 => &file_name[..idx],
        _ => file_name,
    };

    let mut chars = stem.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_type_detection() {
        assert_eq!(mime_type_for("call.MP3"), Some("audio/mpeg"));
        assert_eq!(mime_type_for("screen.mov"), Some("video/quicktime"));
        assert_eq!(mime_type_for("notes.txt"), None);
        assert_eq!(mime_type_for("no_extension"), None);
    }

    #[test]
    fn test_suggested_title() {
        assert_eq!(suggested_title("daily standup.mp3"), "Daily standup");
        assert_eq!(suggested_title("q3.review.wav"), "Q3.review");
        assert_eq!(suggested_title(".hidden"), ".hidden");
        assert_eq!(suggested_title("ágora.ogg"), "Ágora");
    }

    #[test]
    fn test_from_bytes_rejects_unknown_types_and_empty_files() {
        assert!(matches!(
            MediaFile::from_bytes("slides.pdf", vec![1, 2, 3]),
            Err(StudioError::Media(_))
        ));
        assert!(matches!(
            MediaFile::from_bytes("silence.wav", Vec::new()),
            Err(StudioError::Media(_))
        ));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planning.m4a");
        std::fs::write(&path, b"fake audio").unwrap();

        let media = MediaFile::load(&path).unwrap();
        assert_eq!(media.name, "planning.m4a");
        assert_eq!(media.mime_type, "audio/mp4");
        assert_eq!(media.data, b"fake audio");
    }
}
