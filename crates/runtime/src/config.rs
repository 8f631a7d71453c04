//! Runtime configuration.

use rogue_core::GameConfig;

/// Settings of a [`RunSession`](crate::RunSession).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    /// Account level fed to the stat builder.
    pub player_level: u32,
}

impl RuntimeConfig {
    pub fn with_game_config(mut self, game_config: GameConfig) -> Self {
        self.game_config = game_config;
        self
    }

    pub fn with_player_level(mut self, player_level: u32) -> Self {
        self.player_level = player_level;
        self
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            player_level: 1,
        }
    }
}
