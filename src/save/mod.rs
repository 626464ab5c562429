//! Upgrade level persistence
//!
//! Handles storing the current level of each upgrade per island.

pub mod levels;

pub use levels::{levels_directory, JsonLevelStore, LevelStore, MemoryLevelStore, StoreError, UpgradesData};
