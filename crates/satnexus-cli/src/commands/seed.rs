use crate::cli::SeedArgs;
use crate::output::OutputWriter;
use crate::storage::Storage;
use anyhow::{Context, Result};
use chrono::Utc;
use satnexus_core::config::LayeredConfig;
use satnexus_core::geo::{area_with_mode, AreaMode, LatLng};
use satnexus_core::models::image::parse_date;
use satnexus_core::models::{
    AnalysisId, ChangeAnalysis, ChangeArea, ChangeType, Image, ImageId, Role, User, UserId,
};
use satnexus_engine::hash_password;
use serde::Serialize;

/// Demo administrator, owner of the seeded records
const ADMIN_USER: &str = "507f1f77bcf86cd799439011";
/// Demo regular user, owns nothing but can read the public analysis
const DEMO_USER: &str = "507f1f77bcf86cd799439012";
/// Password of both demo accounts
const DEMO_PASSWORD: &str = "password123";

const SEED_LOCATION: (f64, f64) = (34.0522, -118.2437);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SeedReport {
    users: Vec<String>,
    images: Vec<ImageId>,
    analysis: AnalysisId,
}

/// Insert the coastal demo images and the public erosion analysis
pub async fn execute(args: SeedArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let storage = Storage::open(config).await?;

    let existing = storage.images.count_images().await.context("Failed to count images")?;
    if existing > 0 && !args.force {
        output.warning(format!(
            "Catalog already holds {} image(s), skipping. Use --force to seed anyway.",
            existing
        ));
        return Ok(());
    }

    let users = seed_users()?;
    let (before, after) = seed_images()?;
    let analysis = seed_analysis(&before, &after, config.area_mode.value);

    for user in &users {
        if storage.users.get_user(&user.id).await.context("Failed to look up user")?.is_some() {
            output.info(format!("Account '{}' already exists, keeping it", user.username));
            continue;
        }
        storage
            .users
            .insert_user(user)
            .await
            .with_context(|| format!("Failed to insert user '{}'", user.username))?;
    }

    for image in [&before, &after] {
        storage
            .images
            .insert_image(image)
            .await
            .with_context(|| format!("Failed to insert image '{}'", image.title))?;
    }
    storage
        .analyses
        .insert_analysis(&analysis)
        .await
        .with_context(|| format!("Failed to insert analysis '{}'", analysis.title))?;

    tracing::info!(analysis_id = %analysis.id, "Seeded demo catalog");

    let report = SeedReport {
        users: users.iter().map(|u| u.email.clone()).collect(),
        images: vec![before.id, after.id],
        analysis: analysis.id,
    };

    if output.is_json() {
        return output.result(report);
    }

    output.success("Seeded demo catalog");
    output.kv("Before image", before.id);
    output.kv("After image", after.id);
    output.kv("Analysis", analysis.id);
    output.info(format!(
        "Demo accounts: {} (admin), {}. Password: {}",
        report.users[0], report.users[1], DEMO_PASSWORD
    ));
    Ok(())
}

fn seed_users() -> Result<Vec<User>> {
    let password_hash = hash_password(DEMO_PASSWORD).context("Failed to hash demo password")?;
    let now = Utc::now();

    Ok(vec![
        User {
            id: UserId::new(ADMIN_USER),
            username: "admin".to_string(),
            email: "admin@satellitenexus.com".to_string(),
            password_hash: password_hash.clone(),
            role: Role::Admin,
            created_at: now,
        },
        User {
            id: UserId::new(DEMO_USER),
            username: "researcher".to_string(),
            email: "researcher@example.com".to_string(),
            password_hash,
            role: Role::User,
            created_at: now,
        },
    ])
}

fn seed_images() -> Result<(Image, Image)> {
    let before = seed_image(
        "Coastal Area January 2023",
        "Satellite image of coastal area before erosion",
        "/uploads/coastal_before.jpg",
        "2023-01-15",
        &["coastal", "before", "california"],
    )?;
    let after = seed_image(
        "Coastal Area June 2023",
        "Satellite image of coastal area after erosion",
        "/uploads/coastal_after.jpg",
        "2023-06-15",
        &["coastal", "after", "california"],
    )?;
    Ok((before, after))
}

fn seed_image(
    title: &str,
    description: &str,
    image_url: &str,
    date_taken: &str,
    tags: &[&str],
) -> Result<Image> {
    let now = Utc::now();
    Ok(Image {
        id: ImageId::new(),
        title: title.to_string(),
        description: Some(description.to_string()),
        image_url: image_url.to_string(),
        coordinates: LatLng::new(SEED_LOCATION.0, SEED_LOCATION.1),
        date_taken: parse_date(date_taken)?,
        uploaded_by: UserId::new(ADMIN_USER),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        created_at: now,
        updated_at: now,
    })
}

fn seed_analysis(before: &Image, after: &Image, mode: AreaMode) -> ChangeAnalysis {
    let ring = vec![
        LatLng::new(34.0522, -118.2437),
        LatLng::new(34.0525, -118.2437),
        LatLng::new(34.0525, -118.2430),
        LatLng::new(34.0522, -118.2430),
    ];
    let now = Utc::now();

    ChangeAnalysis {
        id: AnalysisId::new(),
        title: "Coastal Erosion Analysis".to_string(),
        description: Some("Analysis of coastal erosion over 6 months".to_string()),
        before_image: before.id,
        after_image: after.id,
        change_map: "/uploads/change_map_1.png".to_string(),
        change_percentage: 15.7,
        change_areas: vec![ChangeArea {
            area: area_with_mode(&ring, mode),
            coordinates: ring,
            change_type: ChangeType::Erosion,
        }],
        created_by: UserId::new(ADMIN_USER),
        is_public: true,
        created_at: now,
        updated_at: now,
    }
}
