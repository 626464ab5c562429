//! Tier resolution
//!
//! Level-to-tier lookup and quotes over a [`DimensionIndex`](crate::tiers::DimensionIndex),
//! plus the shared service that hot-swaps the index on reload.

pub mod query;
pub mod service;

pub use service::UpgradeService;
