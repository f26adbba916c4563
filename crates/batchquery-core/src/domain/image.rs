//! Image handles and the bounded, duplicate-free set of accepted images.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Maximum number of images attached to a single question.
pub const MAX_IMAGES: usize = 4;

/// Image media types accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Jpeg,
    Png,
    Webp,
    Gif,
    Svg,
}

impl MediaType {
    pub const ALL: [MediaType; 5] = [
        MediaType::Jpeg,
        MediaType::Png,
        MediaType::Webp,
        MediaType::Gif,
        MediaType::Svg,
    ];

    /// Parse a declared MIME type. Parameters (`; charset=...`) and case are
    /// ignored. Returns `None` for anything outside the accepted set.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(MediaType::Jpeg),
            "image/png" => Some(MediaType::Png),
            "image/webp" => Some(MediaType::Webp),
            "image/gif" => Some(MediaType::Gif),
            "image/svg+xml" => Some(MediaType::Svg),
            _ => None,
        }
    }

    /// Canonical MIME string.
    pub fn mime(self) -> &'static str {
        match self {
            MediaType::Jpeg => "image/jpeg",
            MediaType::Png => "image/png",
            MediaType::Webp => "image/webp",
            MediaType::Gif => "image/gif",
            MediaType::Svg => "image/svg+xml",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

/// Identity metadata of a candidate image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub name: String,
    pub byte_size: u64,
    /// Milliseconds since the Unix epoch.
    pub last_modified_ms: i64,
    /// MIME type as declared by the source, not sniffed.
    pub mime_type: String,
}

impl ImageMetadata {
    /// Two images are duplicates when name, size and modification time all
    /// match. Content is never compared.
    pub fn same_identity(&self, other: &ImageMetadata) -> bool {
        self.name == other.name
            && self.byte_size == other.byte_size
            && self.last_modified_ms == other.last_modified_ms
    }
}

/// Reference to one image: shared bytes plus identity metadata.
///
/// Cloning is cheap; the bytes are reference counted.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageHandle {
    metadata: ImageMetadata,
    bytes: Arc<[u8]>,
}

impl ImageHandle {
    pub fn new(metadata: ImageMetadata, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            metadata,
            bytes: bytes.into(),
        }
    }

    /// Build a handle whose `byte_size` is taken from the buffer itself.
    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        last_modified_ms: i64,
        bytes: Vec<u8>,
    ) -> Self {
        let metadata = ImageMetadata {
            name: name.into(),
            byte_size: bytes.len() as u64,
            last_modified_ms,
            mime_type: mime_type.into(),
        };
        Self::new(metadata, bytes)
    }

    pub fn metadata(&self) -> &ImageMetadata {
        &self.metadata
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn mime_type(&self) -> &str {
        &self.metadata.mime_type
    }

    pub fn media_type(&self) -> Option<MediaType> {
        MediaType::from_mime(&self.metadata.mime_type)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }
}

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageHandle")
            .field("metadata", &self.metadata)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Ordered, at most [`MAX_IMAGES`] long, duplicate-free sequence of images.
///
/// Values are immutable: every change produces a new set and leaves the
/// original untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedImageSet {
    images: Arc<[ImageHandle]>,
}

impl Default for AcceptedImageSet {
    fn default() -> Self {
        Self::from_vec(Vec::new())
    }
}

impl AcceptedImageSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_vec(images: Vec<ImageHandle>) -> Self {
        debug_assert!(images.len() <= MAX_IMAGES);
        Self {
            images: images.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.images.len() >= MAX_IMAGES
    }

    pub fn get(&self, index: usize) -> Option<&ImageHandle> {
        self.images.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ImageHandle> {
        self.images.iter()
    }

    pub fn as_slice(&self) -> &[ImageHandle] {
        &self.images
    }

    pub fn contains_identity(&self, metadata: &ImageMetadata) -> bool {
        self.images
            .iter()
            .any(|image| image.metadata().same_identity(metadata))
    }

    /// New set without the image at `index`. An out-of-range index yields an
    /// unchanged copy.
    pub fn without(&self, index: usize) -> Self {
        let images = self
            .images
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, image)| image.clone())
            .collect();
        Self::from_vec(images)
    }
}

impl<'a> IntoIterator for &'a AcceptedImageSet {
    type Item = &'a ImageHandle;
    type IntoIter = std::slice::Iter<'a, ImageHandle>;

    fn into_iter(self) -> Self::IntoIter {
        self.images.iter()
    }
}
