//! Events emitted by the simulation for the outer game to react to

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::combatant::{CombatantId, CombatantKind};

/// What hurt the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageSource {
    /// Melee contact attack
    Contact(CombatantId),
    /// Elite aura
    Aura(CombatantId),
    Projectile,
    Beam,
}

/// Items that can drop on death
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LootItem {
    Coin,
    Potion,
    Key,
}

impl LootItem {
    pub const ALL: [LootItem; 3] = [LootItem::Coin, LootItem::Potion, LootItem::Key];

    pub fn as_str(&self) -> &'static str {
        match self {
            LootItem::Coin => "coin",
            LootItem::Potion => "potion",
            LootItem::Key => "key",
        }
    }
}

/// Game events emitted during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    PlayerDamaged { amount: i32, source: DamageSource },
    CombatantDamaged { id: CombatantId, amount: i32 },
    Poisoned { id: CombatantId, stacks: u32 },
    CombatantDied {
        id: CombatantId,
        kind: CombatantKind,
        elite: bool,
        pos: Vec2,
    },
    LootDropped { item: LootItem, pos: Vec2 },
    Spawned {
        id: CombatantId,
        kind: CombatantKind,
        pos: Vec2,
    },
}
