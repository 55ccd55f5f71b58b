use crate::cli::AnalysesArgs;
use crate::output::OutputWriter;
use crate::storage::Storage;
use anyhow::{Context, Result};
use satnexus_core::config::LayeredConfig;
use satnexus_core::models::{AnalysisFilter, ChangeAnalysis, Page, PageRequest, UserId};
use serde::Serialize;
use tabled::Tabled;

#[derive(Debug, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
struct AnalysisRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Change %")]
    change_percentage: String,
    #[tabled(rename = "Areas")]
    change_areas: usize,
    #[tabled(rename = "Owner")]
    created_by: String,
    #[tabled(rename = "Visibility")]
    visibility: &'static str,
    #[tabled(rename = "Created")]
    created_at: String,
}

impl From<ChangeAnalysis> for AnalysisRow {
    fn from(analysis: ChangeAnalysis) -> Self {
        Self {
            id: analysis.id.to_string(),
            title: analysis.title,
            change_percentage: format!("{:.1}", analysis.change_percentage),
            change_areas: analysis.change_areas.len(),
            created_by: analysis.created_by.to_string(),
            visibility: if analysis.is_public { "public" } else { "private" },
            created_at: analysis.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

fn filter_for(args: &AnalysesArgs) -> AnalysisFilter {
    match (&args.user, args.public) {
        (Some(user), _) => AnalysisFilter::VisibleTo(UserId::new(user.trim())),
        (None, true) => AnalysisFilter::PublicOnly,
        (None, false) => AnalysisFilter::All,
    }
}

/// List change analyses, newest first
pub async fn execute(
    args: AnalysesArgs,
    config: &LayeredConfig,
    output: &OutputWriter,
) -> Result<()> {
    let request = PageRequest::from_query(
        args.paging.page,
        args.paging.limit,
        config.default_page_size.value,
    )?;
    let filter = filter_for(&args);
    let storage = Storage::open(config).await?;

    let items = storage
        .analyses
        .find_analyses(&filter, request.skip(), request.limit() as u64)
        .await
        .context("Failed to list analyses")?;
    let total = storage
        .analyses
        .count_analyses(&filter)
        .await
        .context("Failed to count analyses")?;

    let page = Page::new(items, total, request).map(AnalysisRow::from);
    let summary = format!(
        "Page {} of {} ({} analysis record(s))",
        page.page,
        page.total_pages().max(1),
        page.total
    );

    output.section("Change analyses");
    output.table(page.items)?;
    output.info(summary);
    Ok(())
}
