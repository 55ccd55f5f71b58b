//! Local filesystem storage for uploaded images

use async_trait::async_trait;
use chrono::Utc;
use satnexus_core::error::{Result, SatnexusError};
use satnexus_core::ports::{ImageStorage, UploadPolicy, UploadedFile};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Public URL prefix under which the upload directory is served
pub const UPLOADS_PREFIX: &str = "/uploads";

/// Writes uploads into a directory served at [`UPLOADS_PREFIX`]
#[derive(Debug, Clone)]
pub struct LocalImageStorage {
    dir: PathBuf,
    policy: UploadPolicy,
}

impl LocalImageStorage {
    pub fn new(dir: impl AsRef<Path>, policy: UploadPolicy) -> Self {
        Self { dir: dir.as_ref().to_path_buf(), policy }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl ImageStorage for LocalImageStorage {
    async fn store(&self, file: UploadedFile) -> Result<String> {
        let extension = self.policy.check(&file)?;
        let file_name =
            format!("{}-{}.{}", Utc::now().timestamp_millis(), Uuid::new_v4(), extension);

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(&file_name), &file.bytes).await?;

        tracing::debug!(
            file = %file_name,
            original = %file.file_name,
            size = file.bytes.len(),
            "Stored upload"
        );

        Ok(format!("{}/{}", UPLOADS_PREFIX, file_name))
    }

    async fn remove(&self, reference: &str) -> Result<()> {
        let file_name = reference
            .strip_prefix(UPLOADS_PREFIX)
            .map(|rest| rest.trim_start_matches('/'))
            .filter(|name| !name.is_empty() && !name.contains(['/', '\\']) && *name != "..")
            .ok_or_else(|| {
                SatnexusError::validation(format!("Not a stored upload: {}", reference))
            })?;

        match tokio::fs::remove_file(self.dir.join(file_name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use satnexus_core::error::ErrorKind;

    fn png(bytes: Vec<u8>) -> UploadedFile {
        UploadedFile {
            file_name: "scene.PNG".to_string(),
            content_type: Some("image/png".to_string()),
            bytes,
        }
    }

    #[tokio::test]
    async fn test_store_writes_file() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("uploads");
        let storage = LocalImageStorage::new(&dir, UploadPolicy::default());

        let url = storage.store(png(vec![1, 2, 3])).await.unwrap();

        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with(".png"));
        let name = url.trim_start_matches("/uploads/");
        assert_eq!(std::fs::read(dir.join(name)).unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_remove_deletes_stored_file() {
        let temp = tempfile::tempdir().unwrap();
        let storage = LocalImageStorage::new(temp.path(), UploadPolicy::default());

        let url = storage.store(png(vec![1, 2, 3])).await.unwrap();
        storage.remove(&url).await.unwrap();
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);

        // Already gone
        storage.remove(&url).await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_rejects_paths_outside_uploads() {
        let temp = tempfile::tempdir().unwrap();
        let storage = LocalImageStorage::new(temp.path(), UploadPolicy::default());

        assert!(storage.remove("/etc/passwd").await.is_err());
        assert!(storage.remove("/uploads/../secret.png").await.is_err());
        assert!(storage.remove("/uploads/").await.is_err());
    }

    #[tokio::test]
    async fn test_policy_violation_writes_nothing() {
        let temp = tempfile::tempdir().unwrap();
        let policy = UploadPolicy { max_bytes: 2, ..Default::default() };
        let storage = LocalImageStorage::new(temp.path(), policy);

        let err = storage.store(png(vec![1, 2, 3])).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
    }
}
