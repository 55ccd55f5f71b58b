use satnexus_core::error::{Result, SatnexusError};
use satnexus_core::geo::CoordinateValidity;
use satnexus_core::models::{Image, ImageDetail, ImageForm, ImageId, Page, PageRequest, UserId};
use satnexus_core::ports::{ImageStorage, UploadedFile};
use satnexus_store::ports::ImageStore;
use std::sync::Arc;

use crate::accounts::OwnerDirectory;

/// Catalog of uploaded satellite images
#[derive(Clone)]
pub struct ImageCatalog {
    store: Arc<dyn ImageStore>,
    storage: Arc<dyn ImageStorage>,
    owners: OwnerDirectory,
    validity: CoordinateValidity,
}

impl ImageCatalog {
    pub fn new(store: Arc<dyn ImageStore>, storage: Arc<dyn ImageStorage>) -> Self {
        Self {
            store,
            storage,
            owners: OwnerDirectory::default(),
            validity: CoordinateValidity::default(),
        }
    }

    /// Resolve uploaders through `owners` in detailed views
    pub fn with_owners(mut self, owners: OwnerDirectory) -> Self {
        self.owners = owners;
        self
    }

    pub fn owners(&self) -> &OwnerDirectory {
        &self.owners
    }

    /// Set how strictly uploaded coordinates are checked
    pub fn with_validity(mut self, validity: CoordinateValidity) -> Self {
        self.validity = validity;
        self
    }

    /// Validate the metadata, store the file and persist the image record.
    ///
    /// Metadata is checked before the file is handed to storage, and the
    /// stored file is removed again if the record cannot be persisted, so a
    /// failed upload leaves nothing behind.
    pub async fn upload(&self, form: ImageForm, file: UploadedFile, owner: &UserId) -> Result<Image> {
        let draft = form.validate(self.validity)?;
        let image_url = self.storage.store(file).await?;
        let image = Image::from_draft(draft, image_url, owner.clone());

        if let Err(e) = self.store.insert_image(&image).await {
            if let Err(cleanup) = self.storage.remove(&image.image_url).await {
                tracing::warn!(
                    url = %image.image_url,
                    error = %cleanup,
                    "Failed to remove orphaned upload"
                );
            }
            return Err(e);
        }

        tracing::info!(
            image_id = %image.id,
            owner = %owner,
            url = %image.image_url,
            "Image uploaded"
        );

        Ok(image)
    }

    /// A page of images, newest first
    pub async fn list(&self, request: PageRequest) -> Result<Page<Image>> {
        let total = self.store.count_images().await?;
        let items = self.store.list_images(request.skip(), request.limit() as u64).await?;
        Ok(Page::new(items, total, request))
    }

    pub async fn get(&self, id: ImageId) -> Result<Image> {
        self.find(id).await?.ok_or_else(|| SatnexusError::not_found("Image", id))
    }

    /// Look up an image without treating absence as an error
    pub async fn find(&self, id: ImageId) -> Result<Option<Image>> {
        self.store.get_image(id).await
    }

    /// [`ImageCatalog::list`] with uploaders resolved
    pub async fn list_detailed(&self, request: PageRequest) -> Result<Page<ImageDetail>> {
        let page = self.list(request).await?;
        let mut items = Vec::with_capacity(page.items.len());
        for image in page.items {
            items.push(self.describe(image).await?);
        }
        Ok(Page::new(items, page.total, request))
    }

    /// [`ImageCatalog::get`] with the uploader resolved
    pub async fn get_detailed(&self, id: ImageId) -> Result<ImageDetail> {
        let image = self.get(id).await?;
        self.describe(image).await
    }

    pub async fn describe(&self, image: Image) -> Result<ImageDetail> {
        let uploader = self.owners.summary(&image.uploaded_by).await?;
        Ok(ImageDetail { image, uploader })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use satnexus_core::error::ErrorKind;
    use satnexus_core::models::{Role, User};
    use satnexus_core::ports::UploadPolicy;
    use satnexus_store::memory::{MemoryImageStore, MemoryUserStore};
    use satnexus_store::ports::UserStore;
    use std::sync::Mutex;

    /// Storage that applies the default policy and remembers what it kept
    #[derive(Default)]
    struct RecordingStorage {
        stored: Mutex<Vec<String>>,
        next: Mutex<usize>,
    }

    #[async_trait]
    impl ImageStorage for RecordingStorage {
        async fn store(&self, file: UploadedFile) -> Result<String> {
            let ext = UploadPolicy::default().check(&file)?;
            let mut next = self.next.lock().unwrap();
            let url = format!("/uploads/{}.{}", *next, ext);
            *next += 1;
            self.stored.lock().unwrap().push(url.clone());
            Ok(url)
        }

        async fn remove(&self, reference: &str) -> Result<()> {
            self.stored.lock().unwrap().retain(|url| url != reference);
            Ok(())
        }
    }

    /// Image store whose writes always fail
    struct ReadOnlyStore;

    #[async_trait]
    impl ImageStore for ReadOnlyStore {
        async fn insert_image(&self, _image: &Image) -> Result<()> {
            Err(SatnexusError::storage("database is read-only"))
        }

        async fn get_image(&self, _id: ImageId) -> Result<Option<Image>> {
            Ok(None)
        }

        async fn list_images(&self, _skip: u64, _limit: u64) -> Result<Vec<Image>> {
            Ok(vec![])
        }

        async fn count_images(&self) -> Result<u64> {
            Ok(0)
        }
    }

    fn form(title: &str, lat: &str, lng: &str) -> ImageForm {
        ImageForm {
            title: Some(title.to_string()),
            description: Some("Pacific coastline".to_string()),
            lat: Some(lat.to_string()),
            lng: Some(lng.to_string()),
            date_taken: Some("2023-01-15".to_string()),
            tags: Some("coastal, before,california".to_string()),
        }
    }

    fn png() -> UploadedFile {
        UploadedFile {
            file_name: "scene.png".to_string(),
            content_type: Some("image/png".to_string()),
            bytes: vec![1, 2, 3],
        }
    }

    fn catalog() -> (ImageCatalog, Arc<RecordingStorage>) {
        let storage = Arc::new(RecordingStorage::default());
        let catalog = ImageCatalog::new(Arc::new(MemoryImageStore::new()), storage.clone());
        (catalog, storage)
    }

    #[tokio::test]
    async fn test_upload_persists_image() {
        let (catalog, _) = catalog();
        let owner = UserId::new("u1");

        let image = catalog.upload(form("Coast", "34.05", "-118.24"), png(), &owner).await.unwrap();

        assert_eq!(image.uploaded_by, owner);
        assert_eq!(image.image_url, "/uploads/0.png");
        assert_eq!(image.coordinates.lat, 34.05);
        assert!(image.tags.contains("california"));
        assert_eq!(catalog.get(image.id).await.unwrap(), image);
    }

    #[tokio::test]
    async fn test_invalid_metadata_stores_no_file() {
        let (catalog, storage) = catalog();
        let owner = UserId::new("u1");

        let err = catalog.upload(form(" ", "34.05", "-118.24"), png(), &owner).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = catalog.upload(form("Coast", "north", "-118.24"), png(), &owner).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        assert!(storage.stored.lock().unwrap().is_empty());
        assert_eq!(catalog.list(PageRequest::default()).await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn test_failed_insert_removes_stored_file() {
        let storage = Arc::new(RecordingStorage::default());
        let catalog = ImageCatalog::new(Arc::new(ReadOnlyStore), storage.clone());

        let err = catalog
            .upload(form("Coast", "34.05", "-118.24"), png(), &UserId::new("u1"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(*storage.next.lock().unwrap(), 1);
        assert!(storage.stored.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_detailed_views_resolve_uploader() {
        let users = Arc::new(MemoryUserStore::new());
        let owner = User {
            id: UserId::new("u1"),
            username: "admin".to_string(),
            email: "admin@satellitenexus.com".to_string(),
            password_hash: "unused".to_string(),
            role: Role::Admin,
            created_at: chrono::Utc::now(),
        };
        users.insert_user(&owner).await.unwrap();

        let (catalog, _) = catalog();
        let catalog = catalog.with_owners(OwnerDirectory::new(users));
        let image = catalog.upload(form("Coast", "34.05", "-118.24"), png(), &owner.id).await.unwrap();
        let orphan = catalog
            .upload(form("Orphan", "34.05", "-118.24"), png(), &UserId::new("ghost"))
            .await
            .unwrap();

        let detail = catalog.get_detailed(image.id).await.unwrap();
        assert_eq!(detail.image, image);
        assert_eq!(detail.uploader, Some(owner.summary()));

        assert_eq!(catalog.get_detailed(orphan.id).await.unwrap().uploader, None);

        let page = catalog.list_detailed(PageRequest::default()).await.unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.items[0].image.id, orphan.id);
        assert_eq!(page.items[1].uploader.as_ref().map(|u| u.username.as_str()), Some("admin"));
    }

    #[tokio::test]
    async fn test_unsupported_file_type_rejected() {
        let (catalog, _) = catalog();
        let file = UploadedFile {
            file_name: "notes.txt".to_string(),
            content_type: Some("text/plain".to_string()),
            bytes: vec![1],
        };

        let err = catalog
            .upload(form("Coast", "34.05", "-118.24"), file, &UserId::new("u1"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_coordinate_validity_modes() {
        let (strict, _) = catalog();
        let owner = UserId::new("u1");
        assert!(strict.upload(form("Far", "95", "10"), png(), &owner).await.is_err());

        let (lenient, _) = catalog();
        let lenient = lenient.with_validity(CoordinateValidity::Lenient);
        assert!(lenient.upload(form("Far", "95", "10"), png(), &owner).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_pages_and_out_of_range() {
        let (catalog, _) = catalog();
        let owner = UserId::new("u1");
        for i in 0..3 {
            catalog.upload(form(&format!("img{}", i), "1", "2"), png(), &owner).await.unwrap();
        }

        let page = catalog.list(PageRequest::new(1, 2).unwrap()).await.unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].title, "img2");
        assert_eq!(page.total, 3);
        assert_eq!(page.total_pages(), 2);

        let beyond = catalog.list(PageRequest::new(5, 2).unwrap()).await.unwrap();
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total, 3);
    }

    #[tokio::test]
    async fn test_get_missing_image() {
        let (catalog, _) = catalog();
        let err = catalog.get(ImageId::new()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
