//! Biomes of a run.

use crate::config::GameConfig;

use super::plan::CombatType;

/// Themed run segments, visited cyclically in declaration order.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum BiomeId {
    Forest,
    Caverns,
    Ruins,
    Abyss,
}

impl BiomeId {
    pub const ALL: [BiomeId; GameConfig::BIOME_COUNT] =
        [Self::Forest, Self::Caverns, Self::Ruins, Self::Abyss];

    /// Biome at a position in the cycle. Out-of-range indices wrap.
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % GameConfig::BIOME_COUNT]
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Forest => 0,
            Self::Caverns => 1,
            Self::Ruins => 2,
            Self::Abyss => 3,
        }
    }

    /// Rank-and-file enemy of the biome.
    pub const fn creature(self) -> &'static str {
        match self {
            Self::Forest => "Wolf",
            Self::Caverns => "Cave Bat",
            Self::Ruins => "Skeleton",
            Self::Abyss => "Shade",
        }
    }

    /// Elite enemy of the biome for a miniboss or boss fight.
    pub const fn champion(self, combat_type: CombatType) -> &'static str {
        let boss = matches!(combat_type, CombatType::Boss);
        match (self, boss) {
            (Self::Forest, false) => "Alpha Wolf",
            (Self::Forest, true) => "Elder Treant",
            (Self::Caverns, false) => "Bat Matriarch",
            (Self::Caverns, true) => "Crystal Golem",
            (Self::Ruins, false) => "Bone Knight",
            (Self::Ruins, true) => "Lich King",
            (Self::Abyss, false) => "Void Stalker",
            (Self::Abyss, true) => "Abyssal Maw",
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn index_round_trips_and_wraps() {
        for (position, biome) in BiomeId::iter().enumerate() {
            assert_eq!(biome.index(), position);
            assert_eq!(BiomeId::from_index(position), biome);
        }
        assert_eq!(BiomeId::from_index(5), BiomeId::Caverns);
    }

    #[test]
    fn names_parse_in_snake_case() {
        assert_eq!("caverns".parse::<BiomeId>().unwrap(), BiomeId::Caverns);
        assert_eq!(BiomeId::Abyss.to_string(), "abyss");
    }
}
