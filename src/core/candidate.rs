//! Candidate files picked by the user
//!
//! A candidate is the image the user selected (from disk, a picker or a drop)
//! before it has been accepted by the validation policy. Its bytes are shared
//! behind an `Arc` so preview derivation and submission can hold on to them
//! without copying.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Media type declared for files whose extension is not a known image type
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Image formats the inference service accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    WebP,
}

impl ImageFormat {
    pub const ALL: [ImageFormat; 4] = [
        ImageFormat::Jpeg,
        ImageFormat::Png,
        ImageFormat::Gif,
        ImageFormat::WebP,
    ];

    /// Get the MIME type for this format
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Gif => "image/gif",
            ImageFormat::WebP => "image/webp",
        }
    }

    /// Detect format from a declared MIME type (exact match, case-insensitive)
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        let mime = mime.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|f| f.mime_type() == mime)
    }

    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "gif" => Some(ImageFormat::Gif),
            "webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }
}

/// A user-selected file pending validation and submission
#[derive(Clone, PartialEq, Eq)]
pub struct CandidateFile {
    name: String,
    media_type: String,
    bytes: Arc<[u8]>,
}

impl CandidateFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes: Arc::from(bytes),
        }
    }

    /// Read a candidate from disk, declaring its media type from the extension.
    ///
    /// Unknown extensions are declared as `application/octet-stream`, which the
    /// validation policy then rejects.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let media_type = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ImageFormat::from_extension)
            .map(|f| f.mime_type())
            .unwrap_or(OCTET_STREAM);

        Ok(Self::new(name, media_type, bytes))
    }

    /// Display name (original filename)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Media type as declared by the source of the file
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Size in bytes
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Short label for display, e.g. `leaf.jpg (2048.00 KB)`
    pub fn label(&self) -> String {
        format!("{} ({:.2} KB)", self.name, self.size() as f64 / 1024.0)
    }

    /// Encode the bytes as a `data:` URL a renderer can display directly
    pub(crate) fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.media_type,
            STANDARD.encode(&self.bytes)
        )
    }
}

impl fmt::Debug for CandidateFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CandidateFile")
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .field("size", &self.size())
            .finish()
    }
}

/// Renderable preview derived from a candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    /// Name of the candidate the preview was derived from
    pub source_name: String,
    /// `data:<mime>;base64,<payload>`
    pub data_url: String,
}

impl Preview {
    /// Derive a preview without blocking the async scheduler
    pub async fn derive(file: CandidateFile) -> Result<Self, tokio::task::JoinError> {
        tokio::task::spawn_blocking(move || Preview {
            source_name: file.name().to_string(),
            data_url: file.to_data_url(),
        })
        .await
    }
}

/// Format a size in bytes to a human-readable string
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1}GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1}MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1}KB", bytes as f64 / KB as f64)
    } else {
        format!("{}B", bytes)
    }
}
