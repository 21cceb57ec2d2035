//! Document references and fetched payloads.

use bytes::Bytes;

use super::dispatch::RenderStrategy;

/// Identifies a document at the upstream store together with the text to stamp on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentReference {
    path: String,
    watermark_text: String,
}

impl DocumentReference {
    /// Create a reference. `owner_id` is the owning user's identifier; when it is
    /// missing or blank the `fallback` brand string becomes the watermark.
    pub fn new(path: impl Into<String>, owner_id: Option<&str>, fallback: &str) -> Self {
        let watermark_text = owner_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or(fallback)
            .to_string();

        Self {
            path: path.into(),
            watermark_text,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn watermark_text(&self) -> &str {
        &self.watermark_text
    }

    /// The path with every `/`-separated segment percent-encoded.
    ///
    /// Leading, trailing and repeated slashes are dropped.
    pub fn encoded_path(&self) -> String {
        self.path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Raw document bytes plus the content type the server declared.
///
/// Owned by whoever fetched it and handed by value to exactly one consumer.
#[derive(Clone, PartialEq, Eq)]
pub struct DocumentBlob {
    pub bytes: Bytes,
    pub content_type: String,
}

impl DocumentBlob {
    pub fn new(bytes: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: content_type.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn strategy(&self) -> RenderStrategy {
        RenderStrategy::from_content_type(&self.content_type)
    }
}

impl std::fmt::Debug for DocumentBlob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentBlob")
            .field("len", &self.bytes.len())
            .field("content_type", &self.content_type)
            .finish()
    }
}
