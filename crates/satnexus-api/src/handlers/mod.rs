mod accounts;
mod analysis;
mod events;
mod health;
mod images;

pub use accounts::{login, profile, register};
pub use analysis::{create_analysis, get_analysis, get_analysis_geojson, list_analyses};
pub use events::ws_handler;
pub use health::health_check;
pub use images::{get_image, list_images, upload_image};
