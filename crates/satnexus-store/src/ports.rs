use async_trait::async_trait;
use satnexus_core::error::Result;
use satnexus_core::models::{
    AnalysisFilter, AnalysisId, ChangeAnalysis, Image, ImageId, User, UserId,
};

/// Port for satellite image persistence
///
/// Listing always orders by creation time, newest first.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Insert a new image record
    async fn insert_image(&self, image: &Image) -> Result<()>;

    /// Retrieve an image by ID
    async fn get_image(&self, id: ImageId) -> Result<Option<Image>>;

    /// List images, skipping `skip` records and returning at most `limit`
    async fn list_images(&self, skip: u64, limit: u64) -> Result<Vec<Image>>;

    /// Count all images
    async fn count_images(&self) -> Result<u64>;
}

/// Port for change analysis persistence
///
/// Listing always orders by creation time, newest first.
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Insert a new analysis record
    async fn insert_analysis(&self, analysis: &ChangeAnalysis) -> Result<()>;

    /// Retrieve an analysis by ID, regardless of visibility
    async fn get_analysis(&self, id: AnalysisId) -> Result<Option<ChangeAnalysis>>;

    /// Find analyses matching the visibility filter
    async fn find_analyses(
        &self,
        filter: &AnalysisFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<ChangeAnalysis>>;

    /// Count analyses matching the visibility filter
    async fn count_analyses(&self, filter: &AnalysisFilter) -> Result<u64>;
}

/// Port for user account persistence
///
/// Emails are stored lowercased. Email and username are each unique, the
/// username compared case-insensitively.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new account. Fails with `SatnexusError::Conflict` when the
    /// email or username is already registered.
    async fn insert_user(&self, user: &User) -> Result<()>;

    /// Retrieve an account by ID
    async fn get_user(&self, id: &UserId) -> Result<Option<User>>;

    /// Retrieve an account by its (normalized) email
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
}
