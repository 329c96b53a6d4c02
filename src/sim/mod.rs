//! Deterministic simulation module
//!
//! All encounter logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by combatant id)
//! - No rendering, input or file I/O

pub mod boss;
pub mod bt;
pub mod combat;
pub mod combatant;
pub mod director;
pub mod effects;
pub mod events;
pub mod geom;
pub mod hazard;
pub mod level;
pub mod melee;
pub mod pathfind;
pub mod ranged;
pub mod state;
pub mod tick;

pub use boss::{BossBrain, Pattern};
pub use combat::{PlayerAttack, Weapon};
pub use combatant::{Combatant, CombatantId, CombatantKind, Controller, EliteMod, Health};
pub use director::{Director, SpawnRequest};
pub use effects::{EffectKind, EffectList, EffectParams, EffectRecord, StatusEffect};
pub use events::{DamageSource, GameEvent, LootItem};
pub use geom::{Rect, line_of_sight, normalize};
pub use hazard::{Allegiance, Beam, BeamPhase, Projectile};
pub use level::Geometry;
pub use pathfind::find_path;
pub use ranged::{RangedBrain, RangedState};
pub use state::{EncounterState, PlayerView};
pub use tick::{TickInput, TickOutput, tick};
