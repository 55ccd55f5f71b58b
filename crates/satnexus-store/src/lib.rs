//! SatNexus Store - Persistence ports and adapters
//!
//! This crate defines the image, analysis and user storage ports and provides
//! in-memory and PostgreSQL adapter implementations.

pub mod memory;
pub mod ports;
pub mod postgres;
