//! A file received from a client, fully buffered.

use bytes::Bytes;

/// Fallback when the client does not declare a content type.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Clone, Debug)]
pub struct UploadedFile {
    /// Original filename as sent by the client.
    pub file_name: String,
    /// Declared content type; never sniffed from the payload.
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl UploadedFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: Option<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            data: data.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn content_type_or_default(&self) -> String {
        self.content_type
            .clone()
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string())
    }
}
