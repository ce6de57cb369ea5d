//! Turning a video file into an inline payload for the `generateContent` endpoint.
//!
//! The whole file is read into memory and encoded as standard base64 (no
//! `data:` URL prefix). No size ceiling is enforced here; oversized payloads are
//! rejected by the service itself.

use base64::{engine::general_purpose, Engine as _};
use mime::Mime;
use snafu::{ResultExt, Snafu};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("failed to read video file '{}'", path.display()))]
    Read {
        source: std::io::Error,
        path: PathBuf,
    },
}

/// A video selected by the user, not yet read.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoFile {
    path: PathBuf,
    mime_type: Option<Mime>,
}

impl VideoFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            mime_type: None,
        }
    }

    /// Declare the media type instead of guessing it from the extension.
    pub fn with_mime_type(mut self, mime_type: Mime) -> Self {
        self.mime_type = Some(mime_type);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The declared media type, or one guessed from the file extension.
    ///
    /// Falls back to `application/octet-stream` for unknown extensions.
    pub fn mime_type(&self) -> Mime {
        self.mime_type.clone().unwrap_or_else(|| {
            mime_guess::from_path(&self.path).first_or_octet_stream()
        })
    }

    /// Whether the effective media type is `video/*`.
    pub fn is_video(&self) -> bool {
        self.mime_type().type_() == mime::VIDEO
    }
}

/// Base64 payload plus its media type, ready to be sent as inline data.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedMedia {
    pub mime_type: Mime,
    pub data: String,
}

impl EncodedMedia {
    pub fn from_bytes(bytes: &[u8], mime_type: Mime) -> Self {
        Self {
            mime_type,
            data: general_purpose::STANDARD.encode(bytes),
        }
    }
}

/// Read the complete file and encode it.
#[instrument(skip_all, fields(path = %file.path.display()))]
pub async fn encode(file: &VideoFile) -> Result<EncodedMedia, Error> {
    let bytes = tokio::fs::read(&file.path).await.context(ReadSnafu {
        path: file.path.clone(),
    })?;
    let mime_type = file.mime_type();
    debug!(file.size = bytes.len(), %mime_type, "video file read");

    Ok(EncodedMedia::from_bytes(&bytes, mime_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_encode_reproduces_original_bytes() {
        let original: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        let mut file = tempfile::Builder::new().suffix(".mp4").tempfile().unwrap();
        file.write_all(&original).unwrap();

        let encoded = encode(&VideoFile::new(file.path())).await.unwrap();

        assert_eq!(encoded.mime_type.essence_str(), "video/mp4");
        assert!(!encoded.data.starts_with("data:"));
        let decoded = general_purpose::STANDARD.decode(&encoded.data).unwrap();
        assert_eq!(decoded, original);
    }

    #[tokio::test]
    async fn test_encode_missing_file() {
        let video = VideoFile::new("/definitely/not/here.webm");

        let err = encode(&video).await.unwrap_err();

        let Error::Read { path, .. } = err;
        assert_eq!(path, PathBuf::from("/definitely/not/here.webm"));
    }

    #[test]
    fn test_declared_mime_type_wins() {
        let video = VideoFile::new("clip.bin").with_mime_type("video/quicktime".parse().unwrap());
        assert_eq!(video.mime_type().essence_str(), "video/quicktime");
    }

    #[test]
    fn test_unknown_extension_falls_back_to_octet_stream() {
        let video = VideoFile::new("clip.unknownext");
        assert_eq!(video.mime_type(), mime::APPLICATION_OCTET_STREAM);
    }

    #[test]
    fn test_is_video_follows_effective_type() {
        assert!(VideoFile::new("clip.webm").is_video());
        assert!(!VideoFile::new("notes.txt").is_video());
        assert!(!VideoFile::new("clip.unknownext").is_video());
        assert!(VideoFile::new("clip.unknownext")
            .with_mime_type("video/quicktime".parse().unwrap())
            .is_video());
        assert!(!VideoFile::new("clip.mp4")
            .with_mime_type(mime::IMAGE_PNG)
            .is_video());
    }

    #[test]
    fn test_empty_file_encodes_to_empty_payload() {
        let encoded = EncodedMedia::from_bytes(&[], mime::APPLICATION_OCTET_STREAM);
        assert!(encoded.data.is_empty());
    }
}
