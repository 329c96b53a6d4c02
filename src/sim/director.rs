//! Encounter director: budget-based spawning toward a target population
//!
//! - Idle while a boss lives or no arena is active
//! - Target grows with stage index, shrinks when the player is hurt
//! - Budget accrues over time and is spent per spawn

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;

use super::combatant::CombatantKind;
use super::level::{Geometry, tile_center};
use crate::tuning::DirectorConfig;

/// Below this player health ratio the director eases off
const LOW_HEALTH_RATIO: f32 = 0.4;
const LOW_HEALTH_SCALE: f32 = 0.6;
const LOW_HEALTH_MIN_TARGET: usize = 2;

/// World facts the director reads each tick
#[derive(Debug, Clone, Copy)]
pub struct DirectorView<'a> {
    pub stage: u32,
    pub player: Vec2,
    pub player_health_ratio: f32,
    /// Live non-boss combatants
    pub live: usize,
    pub boss_alive: bool,
    pub arena_active: bool,
    pub geometry: &'a Geometry,
}

/// A combatant the director wants created this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    pub kind: CombatantKind,
    pub center: Vec2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Director {
    /// Unspent spawn budget
    pub budget: f32,
    config: DirectorConfig,
}

impl Director {
    pub fn new(config: DirectorConfig) -> Self {
        Self { budget: 0.0, config }
    }

    pub fn config(&self) -> &DirectorConfig {
        &self.config
    }

    /// Desired live population for a stage and player health ratio
    pub fn target(&self, stage: u32, health_ratio: f32) -> usize {
        let base = (self.config.base_target + self.config.stage_multiplier * stage as f32)
            .floor()
            .max(0.0) as usize;
        if health_ratio < LOW_HEALTH_RATIO {
            ((base as f32 * LOW_HEALTH_SCALE).round() as usize).max(LOW_HEALTH_MIN_TARGET)
        } else {
            base
        }
    }

    fn cost(&self, kind: CombatantKind) -> f32 {
        match kind {
            CombatantKind::Ranged => self.config.ranged_cost,
            _ => self.config.melee_cost,
        }
    }

    /// Accrue budget and return this tick's spawns
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        view: &DirectorView<'_>,
        rng: &mut R,
        dt: f32,
    ) -> Vec<SpawnRequest> {
        let mut spawns = Vec::new();
        if view.boss_alive || !view.arena_active {
            return spawns;
        }

        let target = self.target(view.stage, view.player_health_ratio);
        let mut live = view.live;
        if live >= target {
            return spawns;
        }

        self.budget += self.config.spawn_rate * dt;
        let cheapest = self.config.melee_cost.min(self.config.ranged_cost);

        while live < target && self.budget >= cheapest {
            let kind = if rng.random_bool(self.config.ranged_chance.clamp(0.0, 1.0)) {
                CombatantKind::Ranged
            } else {
                CombatantKind::Melee
            };
            let cost = self.cost(kind);
            if cost > self.budget {
                break;
            }
            let Some(center) = self.pick_spawn_point(view, rng) else {
                log::debug!("Director found no spawn tile; skipping");
                break;
            };
            self.budget -= cost;
            live += 1;
            log::debug!(
                "Director spawning {} at ({:.0}, {:.0}), budget left {:.2}",
                kind.as_str(),
                center.x,
                center.y,
                self.budget
            );
            spawns.push(SpawnRequest { kind, center });
        }
        spawns
    }

    /// Random open floor tile far enough from the player and clear of solids
    fn pick_spawn_point<R: Rng + ?Sized>(
        &self,
        view: &DirectorView<'_>,
        rng: &mut R,
    ) -> Option<Vec2> {
        let mut tiles = view.geometry.floor.clone();
        tiles.shuffle(rng);
        tiles.into_iter().map(tile_center).find(|&center| {
            center.distance(view.player) >= self.config.min_spawn_distance
                && !view
                    .geometry
                    .solids(view.arena_active)
                    .any(|r| r.contains_point(center))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::TILE;
    use crate::sim::level::tile_rect;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn arena() -> Geometry {
        Geometry::from_rows(&[
            "##############",
            "#............#",
            "#............#",
            "#............#",
            "#............#",
            "##############",
        ])
    }

    fn view(geometry: &Geometry) -> DirectorView<'_> {
        DirectorView {
            stage: 0,
            player: tile_center(glam::IVec2::new(1, 1)),
            player_health_ratio: 1.0,
            live: 0,
            boss_alive: false,
            arena_active: true,
            geometry,
        }
    }

    #[test]
    fn test_target_population() {
        let director = Director::new(DirectorConfig::default());
        assert_eq!(director.target(0, 1.0), 6);
        assert_eq!(director.target(0, 0.3), 4);
        // floor(6 + 0.8 * 3) = 8
        assert_eq!(director.target(3, 1.0), 8);

        let small = Director::new(DirectorConfig {
            base_target: 2.0,
            ..Default::default()
        });
        assert_eq!(small.target(0, 0.1), 2);
    }

    #[test]
    fn test_idle_without_arena_or_with_boss() {
        let geometry = arena();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut director = Director::new(DirectorConfig::default());

        let mut v = view(&geometry);
        v.arena_active = false;
        assert!(director.update(&v, &mut rng, 10.0).is_empty());
        assert_eq!(director.budget, 0.0);

        let mut v = view(&geometry);
        v.boss_alive = true;
        assert!(director.update(&v, &mut rng, 10.0).is_empty());
        assert_eq!(director.budget, 0.0);
    }

    #[test]
    fn test_budget_limits_spawns() {
        let geometry = arena();
        let mut rng = Pcg32::seed_from_u64(9);
        let mut director = Director::new(DirectorConfig {
            ranged_chance: 0.0,
            ..Default::default()
        });
        let v = view(&geometry);

        // 1.6 * 0.5 = 0.8 budget: nothing affordable yet
        assert!(director.update(&v, &mut rng, 0.5).is_empty());
        // +0.8 -> 1.6: one melee spawn
        let spawns = director.update(&v, &mut rng, 0.5);
        assert_eq!(spawns.len(), 1);
        assert_eq!(spawns[0].kind, CombatantKind::Melee);
        assert!((director.budget - 0.6).abs() < 1e-5);
    }

    #[test]
    fn test_spawns_stop_at_target_and_respect_distance() {
        let geometry = arena();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut director = Director::new(DirectorConfig::default());
        let v = view(&geometry);

        let spawns = director.update(&v, &mut rng, 100.0);
        assert_eq!(spawns.len(), 6);
        for s in &spawns {
            assert!(s.center.distance(v.player) >= 5.0 * TILE);
            assert!(!geometry.walls.iter().any(|w| w.contains_point(s.center)));
        }

        let mut full = view(&geometry);
        full.live = 6;
        let before = director.budget;
        assert!(director.update(&full, &mut rng, 1.0).is_empty());
        assert_eq!(director.budget, before);
    }

    #[test]
    fn test_no_spawn_tile_terminates() {
        // Every floor tile is too close to the player
        let geometry = Geometry::from_rows(&["####", "#..#", "####"]);
        let mut rng = Pcg32::seed_from_u64(3);
        let mut director = Director::new(DirectorConfig::default());
        let spawns = director.update(&view(&geometry), &mut rng, 100.0);
        assert!(spawns.is_empty());
        assert!(director.budget > 100.0);
    }

    #[test]
    fn test_arena_doors_block_spawns_only_while_active() {
        let mut geometry = Geometry::from_rows(&["###########", "#.........#", "###########"]);
        // Cover every candidate far enough away with arena doors
        geometry.arena_doors = geometry
            .floor
            .iter()
            .filter(|t| t.x >= 6)
            .map(|t| tile_rect(*t))
            .collect();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut director = Director::new(DirectorConfig::default());
        let spawns = director.update(&view(&geometry), &mut rng, 100.0);
        assert!(spawns.is_empty());
    }
}
