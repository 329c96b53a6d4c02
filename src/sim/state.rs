//! Encounter state and the player snapshot it is ticked against
//!
//! All mutable simulation lists live here and are only changed inside `tick`.

use glam::{IVec2, Vec2};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::combatant::{Combatant, CombatantId, CombatantKind, EliteMod, roll_elite};
use super::director::Director;
use super::hazard::{Beam, Projectile};
use super::level::{Geometry, tile_center};
use crate::tuning::Tuning;

/// Read-only view of the player for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerView {
    pub center: Vec2,
    pub radius: f32,
    pub hp: i32,
    pub hp_max: i32,
}

impl Default for PlayerView {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            radius: 12.0,
            hp: 10,
            hp_max: 10,
        }
    }
}

impl PlayerView {
    pub fn health_ratio(&self) -> f32 {
        self.hp as f32 / self.hp_max.max(1) as f32
    }
}

/// Complete encounter state (deterministic for a given seed and input stream)
#[derive(Debug)]
pub struct EncounterState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub geometry: Geometry,
    /// Current stage (0-based)
    pub stage_index: u32,
    /// Whether arena doors are closed and the director is spawning
    pub arena_active: bool,
    /// Live combatants (sorted by id)
    pub combatants: Vec<Combatant>,
    pub projectiles: Vec<Projectile>,
    pub beams: Vec<Beam>,
    pub director: Director,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub rng: Pcg32,
    next_id: u32,
}

impl EncounterState {
    /// Create an empty encounter over the given geometry
    pub fn new(seed: u64, geometry: Geometry, tuning: Tuning) -> Self {
        log::info!(
            "New encounter: seed={}, grid {}x{}, difficulty={}",
            seed,
            geometry.width,
            geometry.height,
            tuning.difficulty.as_str()
        );
        Self {
            seed,
            director: Director::new(tuning.director),
            tuning,
            geometry,
            stage_index: 0,
            arena_active: false,
            combatants: Vec::new(),
            projectiles: Vec::new(),
            beams: Vec::new(),
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Build geometry and the initial population from tile rows.
    ///
    /// Besides the geometry glyphs, `E` places a melee combatant, `e` a
    /// ranged one and `B` the boss. Melee and ranged placements roll for
    /// elite status.
    pub fn from_rows(seed: u64, rows: &[&str], tuning: Tuning) -> Self {
        let mut state = Self::new(seed, Geometry::from_rows(rows), tuning);
        for (ty, row) in rows.iter().enumerate() {
            for (tx, glyph) in row.chars().enumerate() {
                let kind = match glyph {
                    'E' => CombatantKind::Melee,
                    'e' => CombatantKind::Ranged,
                    'B' => CombatantKind::Boss,
                    _ => continue,
                };
                let center = tile_center(IVec2::new(tx as i32, ty as i32));
                state.spawn_rolled(kind, center);
            }
        }
        state
    }

    /// Allocate a new combatant id
    pub fn next_combatant_id(&mut self) -> CombatantId {
        let id = CombatantId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a combatant with explicit elite settings
    pub fn spawn(
        &mut self,
        kind: CombatantKind,
        center: Vec2,
        elite: bool,
        mods: Vec<EliteMod>,
    ) -> CombatantId {
        let id = self.next_combatant_id();
        let combatant = Combatant::new(id, kind, center, &self.tuning, elite, mods);
        log::debug!(
            "Spawned {} #{} (elite={}) at ({:.0}, {:.0})",
            kind.as_str(),
            id.0,
            elite,
            center.x,
            center.y
        );
        self.combatants.push(combatant);
        id
    }

    /// Add a combatant, rolling elite status from the tuning's elite rate
    pub fn spawn_rolled(&mut self, kind: CombatantKind, center: Vec2) -> CombatantId {
        let (elite, mods) = roll_elite(kind, self.tuning.elite_rate, &mut self.rng);
        self.spawn(kind, center, elite, mods)
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.id == id)
    }

    pub fn boss(&self) -> Option<&Combatant> {
        self.combatants
            .iter()
            .find(|c| c.kind == CombatantKind::Boss && c.is_alive())
    }

    pub fn boss_alive(&self) -> bool {
        self.boss().is_some()
    }

    /// Live melee and ranged combatants
    pub fn live_count(&self) -> usize {
        self.combatants
            .iter()
            .filter(|c| c.kind != CombatantKind::Boss && c.is_alive())
            .count()
    }

    /// Ensure combatants are sorted by id for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.combatants.sort_by_key(|c| c.id);
    }
}
