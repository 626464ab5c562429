//! Buying upgrades
//!
//! Offers built from the tier index, the collaborator traits the host
//! implements (payment, island facts, permissions) and command formatting.

pub mod command;
pub mod offer;
pub mod permission;

pub use command::format_command;
pub use offer::{apply_upgrade, can_upgrade, IslandInfo, Payment, PaymentError, UpgradeError, UpgradeOffer};
pub use permission::{is_visible, PermissionError, PermissionSource};
