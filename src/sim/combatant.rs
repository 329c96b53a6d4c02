//! Non-player combatants: health, elite modifiers and per-kind controllers

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::boss::BossBrain;
use super::effects::{EffectKind, EffectList, EffectParams, EffectRecord};
use super::geom::Rect;
use super::melee::MeleeBrain;
use super::ranged::RangedBrain;
use crate::consts::*;
use crate::tuning::Tuning;

/// Hit points; never negative, zero means dead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        let max = max.max(0);
        Self { current: max, max }
    }

    /// Subtract damage, saturating at zero. Returns the damage actually taken.
    pub fn hurt(&mut self, amount: i32) -> i32 {
        let taken = amount.max(0).min(self.current);
        self.current -= taken;
        taken
    }

    /// Add health up to `max`. Returns the amount actually healed.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let healed = amount.max(0).min(self.max - self.current).max(0);
        self.current += healed;
        healed
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0
    }
}

/// Stable handle for a combatant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CombatantId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombatantKind {
    Melee,
    Ranged,
    Boss,
}

impl CombatantKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CombatantKind::Melee => "melee",
            CombatantKind::Ranged => "ranged",
            CombatantKind::Boss => "boss",
        }
    }

    fn body_size(&self) -> f32 {
        match self {
            CombatantKind::Melee => MELEE_SIZE,
            CombatantKind::Ranged => RANGED_SIZE,
            CombatantKind::Boss => BOSS_SIZE,
        }
    }

    fn base_speed(&self) -> f32 {
        match self {
            CombatantKind::Melee => MELEE_SPEED,
            CombatantKind::Ranged => RANGED_SPEED,
            CombatantKind::Boss => BOSS_SPEED,
        }
    }

    fn base_hp(&self) -> f32 {
        match self {
            CombatantKind::Melee => MELEE_BASE_HP,
            CombatantKind::Ranged => RANGED_BASE_HP,
            CombatantKind::Boss => BOSS_BASE_HP,
        }
    }
}

/// Elite modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EliteMod {
    /// ×1.6 health
    Tanky,
    /// ×1.25 move speed
    Haste,
    /// Permanent regeneration
    Regen,
    /// Damages the player every tick at close range
    Aura,
    /// Shorter shot cooldown
    Rapid,
    /// Three-shot fan
    Multishot,
}

const MELEE_POOL: [EliteMod; 4] = [
    EliteMod::Tanky,
    EliteMod::Haste,
    EliteMod::Regen,
    EliteMod::Aura,
];
const RANGED_POOL: [EliteMod; 4] = [
    EliteMod::Tanky,
    EliteMod::Haste,
    EliteMod::Rapid,
    EliteMod::Multishot,
];

/// Chance an elite gets a second modifier
const SECOND_MOD_CHANCE: f64 = 0.35;
const TANKY_SCALE: f32 = 1.6;
const HASTE_SCALE: f32 = 1.25;
const RAPID_COOLDOWN_SCALE: f32 = 0.6;
const REGEN_INTERVAL: f32 = 1.2;

/// Permanent regeneration granted by the `regen` modifier
fn regen_effect() -> (EffectKind, EffectParams) {
    (
        EffectKind::Regeneration { heal_per_tick: 1 },
        EffectParams {
            duration: None,
            tick_interval: Some(REGEN_INTERVAL),
            duration_cap: 0.0,
        },
    )
}

/// Roll the elite flag and modifiers for a freshly built combatant.
/// Bosses are never elite.
pub fn roll_elite<R: Rng + ?Sized>(
    kind: CombatantKind,
    rate: f64,
    rng: &mut R,
) -> (bool, Vec<EliteMod>) {
    let pool: &[EliteMod] = match kind {
        CombatantKind::Melee => &MELEE_POOL,
        CombatantKind::Ranged => &RANGED_POOL,
        CombatantKind::Boss => return (false, Vec::new()),
    };
    if !rng.random_bool(rate.clamp(0.0, 1.0)) {
        return (false, Vec::new());
    }
    let count = if rng.random_bool(SECOND_MOD_CHANCE) { 2 } else { 1 };
    let mods = pool.choose_multiple(rng, count).copied().collect();
    (true, mods)
}

/// Per-kind decision maker
#[derive(Debug)]
pub enum Controller {
    Melee(MeleeBrain),
    Ranged(RangedBrain),
    Boss(BossBrain),
}

#[derive(Debug)]
pub struct Combatant {
    pub id: CombatantId,
    pub kind: CombatantKind,
    pub body: Rect,
    pub health: Health,
    pub speed: f32,
    /// Contact damage (melee) or shot damage (ranged)
    pub damage: i32,
    pub effects: EffectList,
    pub elite: bool,
    pub mods: Vec<EliteMod>,
    /// Seconds until the next melee contact attack
    pub attack_timer: f32,
    pub controller: Controller,
}

impl Combatant {
    /// Build a combatant centered on `center` with difficulty and modifiers applied
    pub fn new(
        id: CombatantId,
        kind: CombatantKind,
        center: Vec2,
        tuning: &Tuning,
        elite: bool,
        mods: Vec<EliteMod>,
    ) -> Self {
        let size = kind.body_size();
        let difficulty = tuning.difficulty;
        let hp_scale = match kind {
            CombatantKind::Boss => difficulty.boss_hp_scale(),
            _ => difficulty.enemy_hp_scale(),
        };
        let damage = match kind {
            CombatantKind::Melee => difficulty.enemy_damage_scale().round().max(1.0) as i32,
            _ => 1,
        };

        let controller = match kind {
            CombatantKind::Melee => Controller::Melee(MeleeBrain::new()),
            CombatantKind::Ranged => {
                let mut config = tuning.ranged;
                if mods.contains(&EliteMod::Rapid) {
                    config.shoot_cooldown *= RAPID_COOLDOWN_SCALE;
                }
                Controller::Ranged(RangedBrain::new(config))
            }
            CombatantKind::Boss => Controller::Boss(BossBrain::new()),
        };

        let mut combatant = Self {
            id,
            kind,
            body: Rect::centered(center, size, size),
            health: Health::new(((kind.base_hp() * hp_scale).round() as i32).max(1)),
            speed: kind.base_speed(),
            damage,
            effects: EffectList::new(),
            elite,
            mods,
            attack_timer: 0.0,
            controller,
        };
        combatant.apply_mods();
        combatant
    }

    fn apply_mods(&mut self) {
        for m in self.mods.clone() {
            match m {
                EliteMod::Tanky => {
                    self.health = Health::new((self.health.max as f32 * TANKY_SCALE) as i32);
                }
                EliteMod::Haste => self.speed *= HASTE_SCALE,
                EliteMod::Regen => {
                    let (kind, params) = regen_effect();
                    self.effects.apply(kind, params);
                }
                // Rapid is folded into the controller config; aura and multishot are read per tick
                EliteMod::Aura | EliteMod::Rapid | EliteMod::Multishot => {}
            }
        }
    }

    /// Replace active effects with restored ones. Modifier-granted effects
    /// missing from the records are granted again.
    pub fn restore_effects(&mut self, records: &[EffectRecord], duration_cap: f32) {
        self.effects = EffectList::from_records(records, duration_cap);
        if self.has_mod(EliteMod::Regen) {
            let (kind, params) = regen_effect();
            self.effects.apply(kind, params);
        }
    }

    pub fn center(&self) -> Vec2 {
        self.body.center()
    }

    pub fn is_alive(&self) -> bool {
        !self.health.is_dead()
    }

    pub fn has_mod(&self, m: EliteMod) -> bool {
        self.mods.contains(&m)
    }
}
