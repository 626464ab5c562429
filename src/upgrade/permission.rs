//! Permission-gated visibility
//!
//! An upgrade with a permission level above 0 is only shown to players holding
//! `<namespace>.upgrades.<upgrade>.<n>` with `n` at least that level.

use thiserror::Error;

/// Permissions granted to a player
pub trait PermissionSource {
    /// Granted permission nodes
    fn permissions(&self) -> Vec<String>;

    fn name(&self) -> &str;
}

/// A granted node that cannot be read as an upgrade level
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermissionError {
    #[error("wildcards are not allowed")]
    Wildcard,
    #[error("the permission format is wrong")]
    BadFormat,
    #[error("the last part must be a number")]
    NotANumber,
}

/// Level granted by one permission node
fn granted_level(node: &str) -> Result<i32, PermissionError> {
    if node.contains('*') {
        return Err(PermissionError::Wildcard);
    }
    let parts: Vec<&str> = node.split('.').collect();
    if parts.len() != 4 {
        return Err(PermissionError::BadFormat);
    }
    let last = parts[3];
    if last.is_empty() || !last.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PermissionError::NotANumber);
    }
    last.parse().map_err(|_| PermissionError::NotANumber)
}

/// Whether the player may see an upgrade that needs `permission_level`.
///
/// Level 0 is always visible. A malformed node matching the upgrade prefix is
/// logged and hides the upgrade.
pub fn is_visible(permission_level: i32, namespace: &str, upgrade_name: &str, player: &dyn PermissionSource) -> bool {
    if permission_level == 0 {
        return true;
    }

    let prefix = format!("{}.upgrades.{}.", namespace, upgrade_name).to_lowercase();
    for node in player.permissions() {
        if !node.to_lowercase().starts_with(&prefix) {
            continue;
        }
        match granted_level(&node) {
            Ok(level) if level >= permission_level => return true,
            Ok(_) => {}
            Err(e) => {
                log::error!(
                    "Player {} has permission: '{}' but {}. Ignoring...",
                    player.name(),
                    node,
                    e
                );
                return false;
            }
        }
    }
    false
}
