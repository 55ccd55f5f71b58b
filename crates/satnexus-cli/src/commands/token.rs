use crate::cli::TokenArgs;
use crate::output::OutputWriter;
use anyhow::{bail, Context, Result};
use chrono::{Duration, Utc};
use satnexus_core::config::LayeredConfig;
use satnexus_core::models::UserId;
use satnexus_engine::issue_token;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IssuedToken {
    user_id: String,
    token: String,
    expires_at: String,
}

/// Mint a development token signed with the configured secret. The server
/// rejects tokens whose user has no account, so `--user` must name a
/// registered or seeded account id.
pub fn execute(args: TokenArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let user = args.user.trim();
    if user.is_empty() {
        bail!("--user cannot be empty");
    }

    let hours = args.ttl_hours.unwrap_or(config.token_ttl_hours.value);
    if hours == 0 {
        bail!("--ttl-hours must be at least 1");
    }

    if config.uses_dev_secret() {
        output.warning("Signing with the development secret; set SATNEXUS_JWT_SECRET for shared deployments");
    }

    let ttl = Duration::hours(i64::from(hours));
    let token = issue_token(&config.jwt_secret.value, &UserId::new(user), ttl)
        .context("Failed to issue token")?;

    let issued = IssuedToken {
        user_id: user.to_string(),
        token,
        expires_at: (Utc::now() + ttl).to_rfc3339(),
    };

    if output.is_json() {
        return output.result(issued);
    }

    output.success(format!("Token issued for {}", issued.user_id));
    output.kv("Expires", &issued.expires_at);
    println!("{}", issued.token);
    Ok(())
}
