use clap::{Parser, Subcommand, ValueEnum};
use satnexus_core::config::CliConfigOverrides;
use satnexus_core::geo::AreaMode;
use std::path::PathBuf;

/// SatNexus - Satellite imagery catalog and change analysis
#[derive(Parser, Debug)]
#[command(name = "satnexus")]
#[command(about = "Satellite imagery catalog and change analysis", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (TOML), overrides SATNEXUS_CONFIG
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// PostgreSQL connection string, overrides DATABASE_URL
    #[arg(long, global = true, value_name = "URL")]
    pub database_url: Option<String>,

    /// Token signing secret, overrides SATNEXUS_JWT_SECRET
    #[arg(long, global = true, value_name = "SECRET")]
    pub jwt_secret: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Configuration values given on the command line
    pub fn overrides(&self) -> CliConfigOverrides {
        CliConfigOverrides {
            database_url: self.database_url.clone(),
            jwt_secret: self.jwt_secret.clone(),
            ..CliConfigOverrides::default()
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Mint an access token for an existing account
    Token(TokenArgs),

    /// Compute the area of a polygon
    Area(AreaArgs),

    /// Manage the database schema
    Db(DbArgs),

    /// Insert the demo accounts, images and the public sample analysis
    Seed(SeedArgs),

    /// List cataloged images
    Images(PageArgs),

    /// List change analyses
    Analyses(AnalysesArgs),

    /// Show the effective configuration and where each value came from
    Config,
}

#[derive(Parser, Debug)]
pub struct TokenArgs {
    /// Account id to embed in the token
    #[arg(long)]
    pub user: String,

    /// Token lifetime in hours (defaults to the configured TTL)
    #[arg(long)]
    pub ttl_hours: Option<u32>,
}

#[derive(Parser, Debug)]
pub struct AreaArgs {
    /// Polygon vertex as a `lat,lng` pair; repeat in ring order
    #[arg(
        short = 'v',
        long = "vertex",
        required = true,
        allow_hyphen_values = true,
        value_name = "LAT,LNG"
    )]
    pub vertices: Vec<String>,

    /// Measurement mode (defaults to the configured mode)
    #[arg(long, value_enum)]
    pub mode: Option<AreaModeArg>,
}

/// Area measurement mode
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AreaModeArg {
    /// Shoelace formula over degrees
    Planar,
    /// Square meters on the WGS 84 ellipsoid
    Geodesic,
}

impl From<AreaModeArg> for AreaMode {
    fn from(arg: AreaModeArg) -> Self {
        match arg {
            AreaModeArg::Planar => AreaMode::Planar,
            AreaModeArg::Geodesic => AreaMode::Geodesic,
        }
    }
}

#[derive(Parser, Debug)]
pub struct DbArgs {
    #[command(subcommand)]
    pub command: DbCommand,
}

#[derive(Subcommand, Debug)]
pub enum DbCommand {
    /// Apply pending migrations
    Migrate,

    /// Show applied and pending migrations
    Status,
}

#[derive(Parser, Debug)]
pub struct SeedArgs {
    /// Seed even if the catalog already contains images
    #[arg(long)]
    pub force: bool,
}

#[derive(Parser, Debug)]
pub struct PageArgs {
    /// Page number, starting at 1
    #[arg(long)]
    pub page: Option<u32>,

    /// Records per page (defaults to the configured page size)
    #[arg(long)]
    pub limit: Option<u32>,
}

#[derive(Parser, Debug)]
pub struct AnalysesArgs {
    /// Only analyses visible to this user (public or owned)
    #[arg(long, conflicts_with = "public")]
    pub user: Option<String>,

    /// Only public analyses
    #[arg(long)]
    pub public: bool,

    #[command(flatten)]
    pub paging: PageArgs,
}
