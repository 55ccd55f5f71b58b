use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

use super::{UserId, UserSummary};
use crate::error::{Result, SatnexusError};
use crate::geo::{CoordinateValidity, LatLng};

/// Satellite image identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(pub Uuid);

impl ImageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier supplied by a client
    pub fn parse(value: &str) -> Result<Self> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|_| SatnexusError::validation(format!("Invalid image id: {}", value)))
    }
}

impl Default for ImageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A cataloged satellite image. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: ImageId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub image_url: String,
    pub coordinates: LatLng,
    pub date_taken: DateTime<Utc>,
    pub uploaded_by: UserId,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Image {
    /// Build a new record from validated metadata and a storage reference
    pub fn from_draft(draft: ImageDraft, image_url: String, owner: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: ImageId::new(),
            title: draft.title,
            description: draft.description,
            image_url,
            coordinates: draft.coordinates,
            date_taken: draft.date_taken,
            uploaded_by: owner,
            tags: draft.tags,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Image with its uploader's public details resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDetail {
    #[serde(flatten)]
    pub image: Image,
    /// Absent when the uploader's account no longer exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploader: Option<UserSummary>,
}

/// Raw upload metadata, as received from a multipart form
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub date_taken: Option<String>,
    /// Comma-separated tag list
    pub tags: Option<String>,
}

/// Metadata that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ImageDraft {
    pub title: String,
    pub description: Option<String>,
    pub coordinates: LatLng,
    pub date_taken: DateTime<Utc>,
    pub tags: BTreeSet<String>,
}

impl ImageForm {
    /// Validate required fields and parse the raw values
    pub fn validate(self, validity: CoordinateValidity) -> Result<ImageDraft> {
        let title = non_blank(self.title)
            .ok_or_else(|| SatnexusError::validation("Field 'title' is required"))?;

        let lat = parse_coordinate("lat", self.lat)?;
        let lng = parse_coordinate("lng", self.lng)?;
        let coordinates = LatLng::new(lat, lng);
        coordinates.validate(validity)?;

        let date_taken = non_blank(self.date_taken)
            .ok_or_else(|| SatnexusError::validation("Field 'dateTaken' is required"))
            .and_then(|raw| parse_date(&raw))?;

        Ok(ImageDraft {
            title,
            description: non_blank(self.description),
            coordinates,
            date_taken,
            tags: self.tags.as_deref().map(parse_tags).unwrap_or_default(),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_coordinate(field: &str, value: Option<String>) -> Result<f64> {
    let raw = non_blank(value)
        .ok_or_else(|| SatnexusError::validation(format!("Field '{}' is required", field)))?;

    raw.parse::<f64>().map_err(|_| {
        SatnexusError::validation(format!("Field '{}' must be a number, got '{}'", field, raw))
    })
}

/// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates (midnight UTC)
pub fn parse_date(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| {
            SatnexusError::validation(format!(
                "Field 'dateTaken' must be an RFC 3339 timestamp or YYYY-MM-DD date, got '{}'",
                raw
            ))
        })
}

fn parse_tags(raw: &str) -> BTreeSet<String> {
    raw.split(',').map(str::trim).filter(|t| !t.is_empty()).map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> ImageForm {
        ImageForm {
            title: Some("Coastal Area".to_string()),
            description: Some("  ".to_string()),
            lat: Some("34.05".to_string()),
            lng: Some("-118.24".to_string()),
            date_taken: Some("2023-01-15".to_string()),
            tags: Some("coastal, before,,california,coastal".to_string()),
        }
    }

    #[test]
    fn test_valid_form() {
        let draft = valid_form().validate(CoordinateValidity::Strict).unwrap();
        assert_eq!(draft.title, "Coastal Area");
        assert_eq!(draft.description, None);
        assert_eq!(draft.coordinates, LatLng::new(34.05, -118.24));
        assert_eq!(draft.date_taken.to_rfc3339(), "2023-01-15T00:00:00+00:00");

        let tags: Vec<_> = draft.tags.into_iter().collect();
        assert_eq!(tags, vec!["before", "california", "coastal"]);
    }

    #[test]
    fn test_missing_title() {
        let mut form = valid_form();
        form.title = None;
        let err = form.validate(CoordinateValidity::Strict).unwrap_err();
        assert!(matches!(err, SatnexusError::Validation(_)));
    }

    #[test]
    fn test_missing_and_malformed_coordinates() {
        let mut form = valid_form();
        form.lat = None;
        assert!(form.validate(CoordinateValidity::Strict).is_err());

        let mut form = valid_form();
        form.lng = Some("west".to_string());
        assert!(form.validate(CoordinateValidity::Lenient).is_err());
    }

    #[test]
    fn test_out_of_range_coordinates_depend_on_mode() {
        let mut form = valid_form();
        form.lat = Some("95".to_string());
        assert!(form.clone().validate(CoordinateValidity::Strict).is_err());
        assert!(form.validate(CoordinateValidity::Lenient).is_ok());
    }

    #[test]
    fn test_date_formats() {
        assert!(parse_date("2023-06-15T10:30:00Z").is_ok());
        assert!(parse_date("2023-06-15T10:30:00+02:00").is_ok());
        assert!(parse_date("15/06/2023").is_err());

        let mut form = valid_form();
        form.date_taken = None;
        assert!(form.validate(CoordinateValidity::Strict).is_err());
    }

    #[test]
    fn test_image_json_uses_camel_case() {
        let draft = valid_form().validate(CoordinateValidity::Strict).unwrap();
        let image = Image::from_draft(draft, "/uploads/a.png".to_string(), UserId::new("u1"));
        let json = serde_json::to_value(&image).unwrap();

        assert_eq!(json["imageUrl"], "/uploads/a.png");
        assert_eq!(json["uploadedBy"], "u1");
        assert_eq!(json["coordinates"]["lat"], 34.05);
        assert!(json.get("dateTaken").is_some());
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_image_detail_flattens_record() {
        let draft = valid_form().validate(CoordinateValidity::Strict).unwrap();
        let image = Image::from_draft(draft, "/uploads/a.png".to_string(), UserId::new("u1"));
        let detail = ImageDetail {
            image,
            uploader: Some(UserSummary {
                id: UserId::new("u1"),
                username: "admin".to_string(),
                email: "admin@satellitenexus.com".to_string(),
            }),
        };

        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["uploadedBy"], "u1");
        assert_eq!(json["imageUrl"], "/uploads/a.png");
        assert_eq!(json["uploader"]["username"], "admin");
    }

    #[test]
    fn test_image_id_parse() {
        let id = ImageId::new();
        assert_eq!(ImageId::parse(&id.to_string()).unwrap(), id);
        assert!(matches!(ImageId::parse("nope"), Err(SatnexusError::Validation(_))));
    }
}
