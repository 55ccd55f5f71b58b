use satnexus_core::models::{AnalysisDetail, ImageDetail, Page, User};
use satnexus_engine::Session;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self { status: "ok", service: "satnexus-api" }
    }
}

/// Page of images
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageListResponse {
    pub images: Vec<ImageDetail>,
    pub current_page: u32,
    pub total_pages: u64,
    pub total_images: u64,
}

impl From<Page<ImageDetail>> for ImageListResponse {
    fn from(page: Page<ImageDetail>) -> Self {
        Self {
            current_page: page.page,
            total_pages: page.total_pages(),
            total_images: page.total,
            images: page.items,
        }
    }
}

/// Page of analyses
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisListResponse {
    pub analyses: Vec<AnalysisDetail>,
    pub current_page: u32,
    pub total_pages: u64,
    pub total_analyses: u64,
}

impl From<Page<AnalysisDetail>> for AnalysisListResponse {
    fn from(page: Page<AnalysisDetail>) -> Self {
        Self {
            current_page: page.page,
            total_pages: page.total_pages(),
            total_analyses: page.total,
            analyses: page.items,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ImageCreatedResponse {
    pub message: String,
    pub image: ImageDetail,
}

impl ImageCreatedResponse {
    pub fn new(image: ImageDetail) -> Self {
        Self { message: "Image uploaded successfully".to_string(), image }
    }
}

#[derive(Debug, Serialize)]
pub struct AnalysisCreatedResponse {
    pub message: String,
    pub analysis: AnalysisDetail,
}

impl AnalysisCreatedResponse {
    pub fn new(analysis: AnalysisDetail) -> Self {
        Self { message: "Analysis created successfully".to_string(), analysis }
    }
}

/// Token and account returned by register and login
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub message: String,
    pub token: String,
    pub user: User,
}

impl SessionResponse {
    pub fn new(message: &str, session: Session) -> Self {
        Self { message: message.to_string(), token: session.token, user: session.user }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: User,
}
