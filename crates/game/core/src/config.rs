/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Play the scripted introductory sequence in the first biome of the
    /// first cycle.
    pub intro_mode: bool,

    /// Lives granted when a run starts. A lost battle consumes one life;
    /// losing the last one fails the run.
    pub starting_lives: u32,

    /// Maximum rounds of status applications drained per hook invocation
    /// point. Applications queued beyond this depth are dropped.
    pub status_chain_depth: u32,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of enemies in one battle.
    pub const MAX_ENEMIES: usize = 4;
    /// Number of biomes in one cycle.
    pub const BIOME_COUNT: usize = 4;

    // ===== battle limits =====
    /// Tick budget of a single-enemy fight.
    pub const SINGLE_TICK_CAP: u32 = 100;
    /// Tick budget of multi-enemy, mini-boss and boss fights.
    pub const EXTENDED_TICK_CAP: u32 = 200;

    /// Cycles a checkpoint restore replays before giving up on the stored
    /// stage number.
    pub const MAX_REPLAY_CYCLES: u64 = 100_000;

    /// Stack multiplier applied to blessed run items.
    pub const BLESSED_STACK_FACTOR: u32 = 2;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_INTRO_MODE: bool = true;
    pub const DEFAULT_STARTING_LIVES: u32 = 1;
    pub const DEFAULT_STATUS_CHAIN_DEPTH: u32 = 4;

    pub fn new() -> Self {
        Self {
            intro_mode: Self::DEFAULT_INTRO_MODE,
            starting_lives: Self::DEFAULT_STARTING_LIVES,
            status_chain_depth: Self::DEFAULT_STATUS_CHAIN_DEPTH,
        }
    }

    pub fn with_intro_mode(mut self, intro_mode: bool) -> Self {
        self.intro_mode = intro_mode;
        self
    }

    pub fn with_starting_lives(mut self, starting_lives: u32) -> Self {
        self.starting_lives = starting_lives;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
