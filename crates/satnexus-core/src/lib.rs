//! SatNexus Core - Domain models, geometry and configuration
//!
//! This crate contains the domain types, the area calculator and the port
//! definitions for the collaborators (detection, notification, credentials,
//! file storage) used by the SatNexus services.

pub mod config;
pub mod error;
pub mod geo;
pub mod models;
pub mod ports;

pub use error::{ErrorKind, Result, SatnexusError};
