//! Ports for the collaborators the services depend on

pub mod credentials;
pub mod detection;
pub mod notify;
pub mod storage;

pub use credentials::CredentialVerifier;
pub use detection::{ChangeDetector, DetectedArea, DetectedChange};
pub use notify::{Notification, Notifier, Topic};
pub use storage::{ImageStorage, UploadPolicy, UploadedFile};
