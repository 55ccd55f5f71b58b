use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::{Image, ImageId, UserId, UserSummary};
use crate::error::{Result, SatnexusError};
use crate::geo::LatLng;

/// Change analysis identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisId(pub Uuid);

impl AnalysisId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(value: &str) -> Result<Self> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|_| SatnexusError::validation(format!("Invalid analysis id: {}", value)))
    }
}

impl Default for AnalysisId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AnalysisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Classification of a changed region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeType {
    Deforestation,
    Urbanization,
    WaterChange,
    Vegetation,
    Erosion,
    Other,
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChangeType::Deforestation => "deforestation",
            ChangeType::Urbanization => "urbanization",
            ChangeType::WaterChange => "water-change",
            ChangeType::Vegetation => "vegetation",
            ChangeType::Erosion => "erosion",
            ChangeType::Other => "other",
        };
        f.write_str(name)
    }
}

/// A polygon flagged as changed between the two images
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeArea {
    pub coordinates: Vec<LatLng>,
    pub area: f64,
    pub change_type: ChangeType,
}

/// Persisted change analysis record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeAnalysis {
    pub id: AnalysisId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub before_image: ImageId,
    pub after_image: ImageId,
    pub change_map: String,
    pub change_percentage: f64,
    #[serde(default)]
    pub change_areas: Vec<ChangeArea>,
    pub created_by: UserId,
    #[serde(default)]
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChangeAnalysis {
    /// Private analyses are readable only by their owner
    pub fn is_visible_to(&self, requester: Option<&UserId>) -> bool {
        self.is_public || requester == Some(&self.created_by)
    }
}

/// Request to create an analysis
#[derive(Debug, Clone, PartialEq)]
pub struct NewAnalysis {
    pub title: String,
    pub description: Option<String>,
    pub before_image: ImageId,
    pub after_image: ImageId,
}

/// Analysis with both image references resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDetail {
    pub id: AnalysisId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub before_image: Image,
    pub after_image: Image,
    pub change_map: String,
    pub change_percentage: f64,
    pub change_areas: Vec<ChangeArea>,
    pub created_by: UserId,
    /// Absent when the creator's account no longer exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<UserSummary>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AnalysisDetail {
    pub fn populate(
        analysis: ChangeAnalysis,
        before_image: Image,
        after_image: Image,
        creator: Option<UserSummary>,
    ) -> Self {
        Self {
            id: analysis.id,
            title: analysis.title,
            description: analysis.description,
            before_image,
            after_image,
            change_map: analysis.change_map,
            change_percentage: analysis.change_percentage,
            change_areas: analysis.change_areas,
            created_by: analysis.created_by,
            creator,
            is_public: analysis.is_public,
            created_at: analysis.created_at,
            updated_at: analysis.updated_at,
        }
    }
}

/// Visibility filter applied when listing analyses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisFilter {
    /// Every analysis, regardless of visibility (administrative use)
    All,
    /// Public analyses only
    PublicOnly,
    /// Public analyses plus those owned by the user
    VisibleTo(UserId),
}

impl AnalysisFilter {
    pub fn for_requester(requester: Option<&UserId>) -> Self {
        match requester {
            Some(user) => AnalysisFilter::VisibleTo(user.clone()),
            None => AnalysisFilter::PublicOnly,
        }
    }

    pub fn matches(&self, analysis: &ChangeAnalysis) -> bool {
        match self {
            AnalysisFilter::All => true,
            AnalysisFilter::PublicOnly => analysis.is_public,
            AnalysisFilter::VisibleTo(user) => analysis.is_visible_to(Some(user)),
        }
    }
}
