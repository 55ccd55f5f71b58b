use crate::cli::PageArgs;
use crate::output::OutputWriter;
use crate::storage::Storage;
use anyhow::{Context, Result};
use satnexus_core::config::LayeredConfig;
use satnexus_core::models::{Image, Page, PageRequest};
use serde::Serialize;
use tabled::Tabled;

#[derive(Debug, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
struct ImageRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Taken")]
    date_taken: String,
    #[tabled(rename = "Owner")]
    uploaded_by: String,
    #[tabled(rename = "Tags")]
    tags: String,
}

impl From<Image> for ImageRow {
    fn from(image: Image) -> Self {
        Self {
            id: image.id.to_string(),
            title: image.title,
            location: format!("{:.4}, {:.4}", image.coordinates.lat, image.coordinates.lng),
            date_taken: image.date_taken.format("%Y-%m-%d").to_string(),
            uploaded_by: image.uploaded_by.to_string(),
            tags: image.tags.into_iter().collect::<Vec<_>>().join(", "),
        }
    }
}

/// List cataloged images, newest first
pub async fn execute(args: PageArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let request = PageRequest::from_query(args.page, args.limit, config.default_page_size.value)?;
    let storage = Storage::open(config).await?;

    let items = storage
        .images
        .list_images(request.skip(), request.limit() as u64)
        .await
        .context("Failed to list images")?;
    let total = storage.images.count_images().await.context("Failed to count images")?;

    let page = Page::new(items, total, request).map(ImageRow::from);
    let summary = format!(
        "Page {} of {} ({} image(s))",
        page.page,
        page.total_pages().max(1),
        page.total
    );

    output.section("Images");
    output.table(page.items)?;
    output.info(summary);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use satnexus_core::geo::LatLng;
    use satnexus_core::models::{ImageId, UserId};

    #[test]
    fn test_image_row_formatting() {
        let taken = Utc.with_ymd_and_hms(2023, 1, 15, 0, 0, 0).unwrap();
        let image = Image {
            id: ImageId::new(),
            title: "Coastal Area January 2023".to_string(),
            description: None,
            image_url: "/uploads/coastal_before.jpg".to_string(),
            coordinates: LatLng::new(34.0522, -118.2437),
            date_taken: taken,
            uploaded_by: UserId::new("u1"),
            tags: ["coastal".to_string(), "before".to_string()].into_iter().collect(),
            created_at: taken,
            updated_at: taken,
        };

        let row = ImageRow::from(image);
        assert_eq!(row.location, "34.0522, -118.2437");
        assert_eq!(row.date_taken, "2023-01-15");
        assert_eq!(row.tags, "before, coastal");
    }
}
