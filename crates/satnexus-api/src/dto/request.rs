use satnexus_core::error::{Result, SatnexusError};
use satnexus_core::models::{ImageId, NewAnalysis, PageRequest};
use serde::Deserialize;

/// `page` / `limit` query parameters of list endpoints
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageQuery {
    pub fn to_page_request(&self, default_limit: u32) -> Result<PageRequest> {
        PageRequest::from_query(self.page, self.limit, default_limit)
    }
}

/// Body of `POST /api/analysis`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnalysisRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub before_image_id: Option<String>,
    #[serde(default)]
    pub after_image_id: Option<String>,
}

impl CreateAnalysisRequest {
    pub fn into_new_analysis(self) -> Result<NewAnalysis> {
        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| SatnexusError::validation("Field 'title' is required"))?;

        Ok(NewAnalysis {
            title,
            description: self.description,
            before_image: required_id("beforeImageId", self.before_image_id)?,
            after_image: required_id("afterImageId", self.after_image_id)?,
        })
    }
}

fn required_id(field: &str, value: Option<String>) -> Result<ImageId> {
    let raw = value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| SatnexusError::validation(format!("Field '{}' is required", field)))?;
    ImageId::parse(&raw)
}

/// Messages a WebSocket client may send
#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum ClientMessage {
    JoinAnalysis {
        #[serde(rename = "analysisId")]
        analysis_id: String,
    },
}
