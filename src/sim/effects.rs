//! Timed and stacking status effects
//!
//! Every combatant owns an [`EffectList`]. Effects are a closed set of kinds;
//! apply, merge, tick and serialization all match on [`EffectKind`].

use serde::{Deserialize, Serialize};

use super::combatant::Health;

/// Poison stack cap
pub const POISON_MAX_STACKS: u32 = 6;

/// The kinds of status effect the simulation knows about
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Damage over time; merges into a single stacking instance
    Poison { damage_per_tick: i32 },
    /// Permanent periodic heal (elite `regen` modifier)
    Regeneration { heal_per_tick: i32 },
}

impl EffectKind {
    /// Stable identifier used in save records
    pub fn id(&self) -> &'static str {
        match self {
            EffectKind::Poison { .. } => "poison",
            EffectKind::Regeneration { .. } => "regen",
        }
    }

    pub fn is_stacking(&self) -> bool {
        matches!(self, EffectKind::Poison { .. })
    }

    fn same_kind(&self, other: &EffectKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Parameters for applying (or re-applying) an effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectParams {
    /// Duration to grant, or `None` for a permanent effect
    pub duration: Option<f32>,
    /// Seconds between on-tick callbacks, or `None` for no ticking
    pub tick_interval: Option<f32>,
    /// Ceiling on remaining duration when merging into a stacking instance
    pub duration_cap: f32,
}

/// One active effect instance
#[derive(Debug, Clone, PartialEq)]
pub struct StatusEffect {
    pub kind: EffectKind,
    /// Remaining seconds; `None` never expires
    pub remaining: Option<f32>,
    pub tick_interval: Option<f32>,
    /// Time accumulated toward the next on-tick
    pub accumulated: f32,
    pub stacks: u32,
    pub finished: bool,
}

impl StatusEffect {
    pub fn new(kind: EffectKind, params: EffectParams) -> Self {
        Self {
            kind,
            remaining: params.duration,
            tick_interval: params.tick_interval.filter(|t| *t > 0.0),
            accumulated: 0.0,
            stacks: 1,
            finished: false,
        }
    }

    /// Merge a re-application into this instance
    fn merge(&mut self, params: EffectParams) {
        self.stacks = (self.stacks + 1).min(POISON_MAX_STACKS);
        if let (Some(remaining), Some(add)) = (self.remaining, params.duration) {
            if add > 0.0 {
                let room = (params.duration_cap - remaining).max(0.0);
                self.remaining = Some(remaining + add.min(room));
            }
        }
    }

    /// Advance by `dt`, applying on-tick and end hooks to `health`
    fn update(&mut self, health: &mut Health, dt: f32, report: &mut EffectReport) {
        if self.finished {
            return;
        }

        if let Some(remaining) = self.remaining.as_mut() {
            *remaining -= dt;
            if *remaining <= 0.0 {
                *remaining = 0.0;
                self.finished = true;
                self.on_end(report);
                return;
            }
        }

        if let Some(interval) = self.tick_interval {
            self.accumulated += dt;
            while self.accumulated >= interval {
                self.accumulated -= interval;
                self.on_tick(health, report);
            }
        }
    }

    fn on_tick(&self, health: &mut Health, report: &mut EffectReport) {
        match self.kind {
            EffectKind::Poison { damage_per_tick } => {
                report.damage += health.hurt(damage_per_tick);
            }
            EffectKind::Regeneration { heal_per_tick } => {
                report.healed += health.heal(heal_per_tick);
            }
        }
    }

    fn on_end(&self, report: &mut EffectReport) {
        report.expired.push(self.kind);
    }

    /// Flatten into a save record
    pub fn to_record(&self) -> EffectRecord {
        let amount = match self.kind {
            EffectKind::Poison { damage_per_tick } => damage_per_tick,
            EffectKind::Regeneration { heal_per_tick } => heal_per_tick,
        };
        EffectRecord {
            id: self.kind.id().to_string(),
            duration: self.remaining,
            tick: self.tick_interval.unwrap_or(0.0),
            stacks: self.stacks,
            amount,
        }
    }

    /// Rebuild from a save record. Unknown ids yield `None`.
    pub fn from_record(record: &EffectRecord) -> Option<Self> {
        let kind = match record.id.as_str() {
            "poison" => EffectKind::Poison {
                damage_per_tick: record.amount,
            },
            "regen" => EffectKind::Regeneration {
                heal_per_tick: record.amount,
            },
            _ => return None,
        };
        Some(Self {
            kind,
            remaining: record.duration,
            tick_interval: Some(record.tick).filter(|t| *t > 0.0),
            accumulated: 0.0,
            stacks: record.stacks.max(1),
            finished: false,
        })
    }
}

/// What ticking an effect list did this step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectReport {
    pub damage: i32,
    pub healed: i32,
    /// Kinds whose end hook fired this step
    pub expired: Vec<EffectKind>,
}

/// Flat serialized form of an effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectRecord {
    pub id: String,
    /// Remaining duration (`None` for permanent effects)
    #[serde(default)]
    pub duration: Option<f32>,
    /// Tick interval (0 means no ticking)
    #[serde(default)]
    pub tick: f32,
    #[serde(default = "default_stacks")]
    pub stacks: u32,
    /// Kind-specific payload (damage or heal per tick)
    #[serde(default)]
    pub amount: i32,
}

fn default_stacks() -> u32 {
    1
}

/// Active effects on one combatant
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectList {
    effects: Vec<StatusEffect>,
}

impl EffectList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an effect, merging into an existing stacking instance if present.
    /// Re-applying a non-stacking kind that is already active does nothing.
    pub fn apply(&mut self, kind: EffectKind, params: EffectParams) {
        if let Some(existing) = self
            .effects
            .iter_mut()
            .find(|e| !e.finished && e.kind.same_kind(&kind))
        {
            if kind.is_stacking() {
                existing.merge(params);
            }
            return;
        }
        let mut effect = StatusEffect::new(kind, params);
        if let Some(remaining) = effect.remaining.as_mut() {
            *remaining = remaining.min(params.duration_cap);
        }
        self.effects.push(effect);
    }

    /// Advance every effect and drop the finished ones
    pub fn tick(&mut self, health: &mut Health, dt: f32) -> EffectReport {
        let mut report = EffectReport::default();
        for effect in &mut self.effects {
            effect.update(health, dt, &mut report);
        }
        self.effects.retain(|e| !e.finished);
        report
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn has_poison(&self) -> bool {
        self.effects
            .iter()
            .any(|e| matches!(e.kind, EffectKind::Poison { .. }))
    }

    pub fn to_records(&self) -> Vec<EffectRecord> {
        self.effects.iter().map(StatusEffect::to_record).collect()
    }

    /// Restore from records, skipping ids this build does not know.
    ///
    /// Restored effects obey the same limits as `apply`: one instance per
    /// kind, stacks within `1..=POISON_MAX_STACKS` and durations within
    /// `duration_cap`. Duplicate stacking records are merged.
    pub fn from_records(records: &[EffectRecord], duration_cap: f32) -> Self {
        let mut list = Self::new();
        for record in records {
            let Some(mut effect) = StatusEffect::from_record(record) else {
                log::warn!("Skipping unknown status effect '{}'", record.id);
                continue;
            };
            effect.stacks = effect.stacks.clamp(1, POISON_MAX_STACKS);
            if let Some(remaining) = effect.remaining.as_mut() {
                *remaining = remaining.clamp(0.0, duration_cap);
            }

            let existing = list.effects.iter().position(|e| e.kind.same_kind(&effect.kind));
            match existing {
                Some(i) if effect.kind.is_stacking() => {
                    log::warn!("Merging duplicate '{}' effect record", record.id);
                    let existing = &mut list.effects[i];
                    existing.stacks = (existing.stacks + effect.stacks).min(POISON_MAX_STACKS);
                    existing.remaining = match (existing.remaining, effect.remaining) {
                        (Some(a), Some(b)) => Some(a.max(b)),
                        _ => None,
                    };
                }
                Some(_) => log::warn!("Dropping duplicate '{}' effect record", record.id),
                None => list.effects.push(effect),
            }
        }
        list
    }
}
