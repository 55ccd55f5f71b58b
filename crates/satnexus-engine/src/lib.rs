//! SatNexus Engine - Catalog and change analysis use cases
//!
//! This crate orchestrates the image catalog and the change analysis
//! lifecycle on top of the storage ports, manages user accounts, and provides
//! the default collaborators: JWT access control, the simulated change
//! detector and the broadcast notification hub.

pub mod access;
pub mod accounts;
pub mod catalog;
pub mod detection;
pub mod engine;
pub mod notify;

pub use access::{issue_token, AccessControl, Claims, JwtVerifier};
pub use accounts::{hash_password, verify_password, Accounts, OwnerDirectory, Session};
pub use catalog::ImageCatalog;
pub use detection::SimulatedDetector;
pub use engine::ChangeAnalysisEngine;
pub use notify::NotificationHub;
