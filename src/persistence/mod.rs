//! Save records for reconstructing an encounter after reload
//!
//! Features:
//! - Versioned JSON record (`schema` field)
//! - Per-combatant kind, position, health, elite flag, modifiers and effects
//! - Position and health of every live boss
//!
//! Hazards in flight and controller internals are not saved; restored
//! combatants start with fresh controllers.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sim::{CombatantKind, EffectRecord, EliteMod, EncounterState};

/// Newest save schema this build writes and understands
pub const SAVE_SCHEMA: u32 = 3;

/// One saved melee or ranged combatant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantRecord {
    pub kind: CombatantKind,
    /// Body center
    pub x: f32,
    pub y: f32,
    pub hp: i32,
    #[serde(default)]
    pub elite: bool,
    #[serde(default)]
    pub mods: Vec<EliteMod>,
    /// Schema 1 saves carry no effects
    #[serde(default)]
    pub effects: Vec<EffectRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BossRecord {
    pub x: f32,
    pub y: f32,
    pub hp: i32,
}

/// Everything needed to rebuild the simulation side of an encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterRecord {
    pub schema: u32,
    #[serde(default)]
    pub stage_index: u32,
    #[serde(default)]
    pub arena_active: bool,
    #[serde(default)]
    pub director_budget: f32,
    #[serde(default)]
    pub combatants: Vec<CombatantRecord>,
    #[serde(default)]
    pub bosses: Vec<BossRecord>,
    /// Single-boss field written by schema 2 and earlier
    #[serde(default, skip_serializing)]
    pub boss: Option<BossRecord>,
}

impl EncounterRecord {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a record, rejecting schemas newer than this build knows
    pub fn from_json(json: &str) -> Result<Self> {
        let record: EncounterRecord = serde_json::from_str(json)?;
        if record.schema > SAVE_SCHEMA {
            return Err(Error::UnsupportedSchema {
                found: record.schema,
                supported: SAVE_SCHEMA,
            });
        }
        Ok(record)
    }
}

/// Snapshot the live combatants and encounter flags
pub fn capture(state: &EncounterState) -> EncounterRecord {
    let mut combatants = Vec::new();
    let mut bosses = Vec::new();

    for c in state.combatants.iter().filter(|c| c.is_alive()) {
        let center = c.center();
        if c.kind == CombatantKind::Boss {
            bosses.push(BossRecord {
                x: center.x,
                y: center.y,
                hp: c.health.current,
            });
            continue;
        }
        combatants.push(CombatantRecord {
            kind: c.kind,
            x: center.x,
            y: center.y,
            hp: c.health.current,
            elite: c.elite,
            mods: c.mods.clone(),
            effects: c.effects.to_records(),
        });
    }

    EncounterRecord {
        schema: SAVE_SCHEMA,
        stage_index: state.stage_index,
        arena_active: state.arena_active,
        director_budget: state.director.budget,
        combatants,
        bosses,
        boss: None,
    }
}

/// Replace the encounter's population with the saved one.
///
/// Health is set after modifiers are applied so `tanky` is not doubled, and
/// is clamped to the rebuilt maximum. Records with no health left are dropped.
pub fn restore(state: &mut EncounterState, record: &EncounterRecord) -> Result<()> {
    if record.schema > SAVE_SCHEMA {
        return Err(Error::UnsupportedSchema {
            found: record.schema,
            supported: SAVE_SCHEMA,
        });
    }

    state.stage_index = record.stage_index;
    state.arena_active = record.arena_active;
    state.director.budget = record.director_budget.max(0.0);
    state.combatants.clear();
    state.projectiles.clear();
    state.beams.clear();

    let duration_cap = state.tuning.poison.duration_cap;
    for saved in &record.combatants {
        if saved.hp <= 0 {
            log::warn!(
                "Dropping dead {} record at ({:.0}, {:.0})",
                saved.kind.as_str(),
                saved.x,
                saved.y
            );
            continue;
        }
        let id = state.spawn(
            saved.kind,
            Vec2::new(saved.x, saved.y),
            saved.elite,
            saved.mods.clone(),
        );
        if let Some(c) = state.combatants.iter_mut().find(|c| c.id == id) {
            c.health.current = saved.hp.min(c.health.max);
            c.restore_effects(&saved.effects, duration_cap);
        }
    }

    for saved in record.bosses.iter().chain(&record.boss).filter(|b| b.hp > 0) {
        let center = Vec2::new(saved.x, saved.y);
        let id = state.spawn(CombatantKind::Boss, center, false, Vec::new());
        if let Some(c) = state.combatants.iter_mut().find(|c| c.id == id) {
            c.health.current = saved.hp.min(c.health.max);
        }
    }

    state.normalize_order();
    log::info!(
        "Restored encounter (schema {}): {} combatants, boss={}",
        record.schema,
        state.live_count(),
        state.boss_alive()
    );
    Ok(())
}
