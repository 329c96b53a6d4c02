//! Melee combatant steering: BFS chase inside the chase radius, wander outside

use std::collections::VecDeque;

use glam::{IVec2, Vec2};
use rand::Rng;

use super::geom::normalize;
use super::level::{Geometry, tile_center, tile_of};
use super::pathfind::find_path;
use crate::consts::*;
use crate::unit_from_angle;

/// What the melee controller needs from the world this tick
#[derive(Debug, Clone, Copy)]
pub struct MeleeView<'a> {
    pub me: Vec2,
    pub player: Vec2,
    pub geometry: &'a Geometry,
    pub arena_active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MeleeBrain {
    /// Remaining waypoints (tile coordinates), next one first
    pub path: VecDeque<IVec2>,
    pub replan_timer: f32,
    pub wander_dir: Vec2,
    pub wander_timer: f32,
}

impl MeleeBrain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unit (or zero) movement direction for this tick
    pub fn update<R: Rng + ?Sized>(&mut self, view: &MeleeView<'_>, rng: &mut R, dt: f32) -> Vec2 {
        if view.me.distance(view.player) < CHASE_RADIUS {
            self.chase(view, dt)
        } else {
            self.wander(rng, dt)
        }
    }

    fn chase(&mut self, view: &MeleeView<'_>, dt: f32) -> Vec2 {
        self.replan_timer -= dt;
        if self.replan_timer <= 0.0 {
            self.replan_timer = PATH_REPLAN_COOLDOWN;
            let blocked = view.geometry.blocked_tiles(view.arena_active);
            self.path = find_path(
                view.geometry.dims(),
                &blocked,
                tile_of(view.me),
                tile_of(view.player),
            )
            .into();
        }

        while let Some(&next) = self.path.front() {
            let target = tile_center(next);
            if view.me.distance(target) < WAYPOINT_ARRIVAL_RADIUS {
                self.path.pop_front();
                continue;
            }
            return normalize(target - view.me);
        }
        normalize(view.player - view.me)
    }

    fn wander<R: Rng + ?Sized>(&mut self, rng: &mut R, dt: f32) -> Vec2 {
        self.wander_timer -= dt;
        if self.wander_timer <= 0.0 {
            self.wander_timer = WANDER_HOLD + rng.random::<f32>() * WANDER_HOLD_JITTER;
            self.wander_dir = unit_from_angle(rng.random::<f32>() * std::f32::consts::TAU);
        }
        self.wander_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn room() -> Geometry {
        Geometry::from_rows(&[
            "#########",
            "#.......#",
            "#...#...#",
            "#...#...#",
            "#.......#",
            "#########",
        ])
    }

    #[test]
    fn test_chase_follows_path_around_wall() {
        let geometry = room();
        let mut brain = MeleeBrain::new();
        let mut rng = Pcg32::seed_from_u64(1);
        let view = MeleeView {
            me: tile_center(IVec2::new(3, 2)),
            player: tile_center(IVec2::new(5, 2)),
            geometry: &geometry,
            arena_active: false,
        };
        let dir = brain.update(&view, &mut rng, SIM_DT);
        // Wall at (4,2) forces a detour through row 1
        assert_eq!(brain.path.back(), Some(&IVec2::new(5, 2)));
        assert_eq!(dir, Vec2::NEG_Y);
    }

    #[test]
    fn test_replan_respects_cooldown() {
        let geometry = room();
        let mut brain = MeleeBrain::new();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut view = MeleeView {
            me: tile_center(IVec2::new(1, 1)),
            player: tile_center(IVec2::new(3, 1)),
            geometry: &geometry,
            arena_active: false,
        };
        brain.update(&view, &mut rng, 0.1);
        let first = brain.path.clone();

        view.player = tile_center(IVec2::new(1, 4));
        brain.update(&view, &mut rng, 0.1);
        assert_eq!(brain.path, first);

        for _ in 0..4 {
            brain.update(&view, &mut rng, 0.1);
        }
        assert_eq!(brain.path.back(), Some(&IVec2::new(1, 4)));
    }

    #[test]
    fn test_unreachable_player_falls_back_to_direct() {
        let geometry = Geometry::from_rows(&["#####", "#.#.#", "#####"]);
        let mut brain = MeleeBrain::new();
        let mut rng = Pcg32::seed_from_u64(1);
        let view = MeleeView {
            me: tile_center(IVec2::new(1, 1)),
            player: tile_center(IVec2::new(3, 1)),
            geometry: &geometry,
            arena_active: false,
        };
        let dir = brain.update(&view, &mut rng, SIM_DT);
        assert!(brain.path.is_empty());
        assert_eq!(dir, Vec2::X);
    }

    #[test]
    fn test_wander_outside_chase_radius() {
        let geometry = room();
        let mut brain = MeleeBrain::new();
        let mut rng = Pcg32::seed_from_u64(5);
        let view = MeleeView {
            me: Vec2::ZERO,
            player: Vec2::new(CHASE_RADIUS + 10.0, 0.0),
            geometry: &geometry,
            arena_active: false,
        };
        let dir = brain.update(&view, &mut rng, 0.1);
        assert!((dir.length() - 1.0).abs() < 1e-5);
        let hold = WANDER_HOLD..=WANDER_HOLD + WANDER_HOLD_JITTER;
        assert!(hold.contains(&brain.wander_timer));
        assert!(brain.path.is_empty());

        // Held until the timer runs out
        assert_eq!(brain.update(&view, &mut rng, 0.5), dir);
    }
}
