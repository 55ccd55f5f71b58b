pub mod request;
pub mod response;

pub use request::{ClientMessage, CreateAnalysisRequest, PageQuery};
pub use response::{
    AnalysisCreatedResponse, AnalysisListResponse, HealthResponse, ImageCreatedResponse,
    ImageListResponse, ProfileResponse, SessionResponse,
};
