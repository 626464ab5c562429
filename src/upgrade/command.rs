//! Command template substitution

pub const PLAYER_TOKEN: &str = "[player]";
pub const LEVEL_TOKEN: &str = "[level]";
pub const OWNER_TOKEN: &str = "[owner]";

/// Replace `[player]`, `[level]` and `[owner]` in a command template
pub fn format_command(template: &str, player: &str, level: i64, owner: &str) -> String {
    template
        .replace(PLAYER_TOKEN, player)
        .replace(LEVEL_TOKEN, &level.to_string())
        .replace(OWNER_TOKEN, owner)
}
