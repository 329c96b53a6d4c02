//! Data-driven balance values
//!
//! Everything here can be overridden from a (possibly partial) JSON file;
//! missing fields fall back to the defaults below.

use serde::{Deserialize, Serialize};

use crate::consts::TILE;
use crate::error::Result;

/// Difficulty preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "norm" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Enemy health multiplier
    pub fn enemy_hp_scale(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.8,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.3,
        }
    }

    /// Enemy damage multiplier
    pub fn enemy_damage_scale(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.7,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.25,
        }
    }

    /// Boss health multiplier
    pub fn boss_hp_scale(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.85,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.35,
        }
    }
}

/// Ranged combatant behaviour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangedConfig {
    /// Preferred distance band for shooting
    pub ideal_min: f32,
    pub ideal_max: f32,
    /// Closer than this and the combatant runs away
    pub flee_range: f32,
    pub shoot_cooldown: f32,
    pub reload_time: f32,
    pub ammo_max: u32,
    /// Seconds a strafe direction is held
    pub strafe_time: f32,
    pub shot_speed: f32,
    pub shot_ttl: f32,
}

impl Default for RangedConfig {
    fn default() -> Self {
        Self {
            ideal_min: TILE * 4.0,
            ideal_max: TILE * 7.0,
            flee_range: TILE * 3.0,
            shoot_cooldown: 1.6,
            reload_time: 1.4,
            ammo_max: 3,
            strafe_time: 0.9,
            shot_speed: 230.0,
            shot_ttl: 2.6,
        }
    }
}

/// Encounter director pacing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorConfig {
    pub base_target: f32,
    /// Extra population per stage index
    pub stage_multiplier: f32,
    /// Budget gained per second
    pub spawn_rate: f32,
    /// Probability a spawn is ranged
    pub ranged_chance: f64,
    pub melee_cost: f32,
    pub ranged_cost: f32,
    /// Spawns never land closer than this to the player
    pub min_spawn_distance: f32,
}

impl Default for DirectorConfig {
    fn default() -> Self {
        Self {
            base_target: 6.0,
            stage_multiplier: 0.8,
            spawn_rate: 1.6,
            ranged_chance: 0.35,
            melee_cost: 1.0,
            ranged_cost: 1.5,
            min_spawn_distance: TILE * 5.0,
        }
    }
}

/// Poison proc on player melee hits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoisonConfig {
    /// Duration added per proc
    pub duration: f32,
    pub tick_interval: f32,
    pub damage_per_tick: i32,
    pub duration_cap: f32,
}

impl Default for PoisonConfig {
    fn default() -> Self {
        Self {
            duration: 1.5,
            tick_interval: 0.5,
            damage_per_tick: 1,
            duration_cap: 6.0,
        }
    }
}

/// Per-kind drop probabilities for one item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropChance {
    pub melee: f64,
    pub ranged: f64,
    pub boss: f64,
}

/// Loot probabilities on death
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropTable {
    pub coin: DropChance,
    pub potion: DropChance,
    pub key: DropChance,
    /// Multiplier applied to every chance for elites
    pub elite_bonus: f64,
    /// Ceiling after the elite bonus
    pub max_chance: f64,
}

impl Default for DropTable {
    fn default() -> Self {
        Self {
            coin: DropChance {
                melee: 0.40,
                ranged: 0.45,
                boss: 0.85,
            },
            potion: DropChance {
                melee: 0.08,
                ranged: 0.08,
                boss: 0.20,
            },
            key: DropChance {
                melee: 0.02,
                ranged: 0.04,
                boss: 0.10,
            },
            elite_bonus: 1.3,
            max_chance: 0.95,
        }
    }
}

/// All balance knobs for one encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub difficulty: Difficulty,
    /// Probability a world-build spawn is elite
    pub elite_rate: f64,
    pub ranged: RangedConfig,
    pub director: DirectorConfig,
    pub poison: PoisonConfig,
    pub drops: DropTable,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            elite_rate: 0.12,
            ranged: RangedConfig::default(),
            director: DirectorConfig::default(),
            poison: PoisonConfig::default(),
            drops: DropTable::default(),
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        log::info!(
            "Loaded tuning: difficulty={}, elite_rate={:.2}",
            tuning.difficulty.as_str(),
            tuning.elite_rate
        );
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("norm"), Some(Difficulty::Normal));
        assert_eq!(Difficulty::from_str("nightmare"), None);
        for d in [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard] {
            assert_eq!(Difficulty::from_str(d.as_str()), Some(d));
        }
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{"difficulty":"Hard","director":{"base_target":9.0}}"#)
            .unwrap();
        assert_eq!(tuning.difficulty, Difficulty::Hard);
        assert_eq!(tuning.director.base_target, 9.0);
        assert_eq!(tuning.director.spawn_rate, DirectorConfig::default().spawn_rate);
        assert_eq!(tuning.ranged, RangedConfig::default());
    }

    #[test]
    fn test_malformed_json_is_error() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, crate::Error::Json(_)));
    }

    #[test]
    fn test_json_round_trip() {
        let tuning = Tuning {
            elite_rate: 0.5,
            ..Default::default()
        };
        let back = Tuning::from_json(&tuning.to_json().unwrap()).unwrap();
        assert_eq!(back, tuning);
    }
}
