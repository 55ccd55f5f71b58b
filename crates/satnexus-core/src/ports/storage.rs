use async_trait::async_trait;
use std::path::Path;

use crate::error::{Result, SatnexusError};

/// An uploaded file as received from the client
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Size and type restrictions for uploaded images
#[derive(Debug, Clone, PartialEq)]
pub struct UploadPolicy {
    pub max_bytes: usize,
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: 10 * 1024 * 1024,
            allowed_extensions: ["jpeg", "jpg", "png", "tiff", "tif"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }
}

impl UploadPolicy {
    /// Check a file against the policy and return its normalized extension.
    ///
    /// Both the file extension and the declared MIME type must name one of the
    /// allowed image types.
    pub fn check(&self, file: &UploadedFile) -> Result<String> {
        if file.bytes.is_empty() {
            return Err(SatnexusError::validation("Uploaded file is empty"));
        }

        if file.bytes.len() > self.max_bytes {
            return Err(SatnexusError::validation(format!(
                "File too large: {} bytes exceeds the {} byte limit",
                file.bytes.len(),
                self.max_bytes
            )));
        }

        let extension = Path::new(&file.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .filter(|e| self.allowed_extensions.iter().any(|a| a == e))
            .ok_or_else(|| {
                SatnexusError::validation(format!(
                    "Only image files are allowed ({}), got '{}'",
                    self.allowed_extensions.join(", "),
                    file.file_name
                ))
            })?;

        let mime_ok = file
            .content_type
            .as_deref()
            .map(|ct| ct.to_ascii_lowercase())
            .is_some_and(|ct| self.allowed_extensions.iter().any(|a| ct.contains(a.as_str())));

        if !mime_ok {
            return Err(SatnexusError::validation(format!(
                "Only image files are allowed, got content type '{}'",
                file.content_type.as_deref().unwrap_or("none")
            )));
        }

        Ok(extension)
    }
}

/// Port for binary image storage
#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Store the file and return an addressable reference (path or URL).
    ///
    /// Fails with `SatnexusError::Validation` when the file violates the
    /// storage policy.
    async fn store(&self, file: UploadedFile) -> Result<String>;

    /// Delete a file previously returned by [`ImageStorage::store`].
    ///
    /// Used to clean up after a failed upload. Removing a reference that no
    /// longer exists succeeds.
    async fn remove(&self, reference: &str) -> Result<()>;
}
