//! Projectiles and telegraphed beams
//!
//! Hazards are plain data advanced once per tick. They never apply damage
//! themselves: the tick loop reads their hit results and emits events.

use glam::Vec2;

use super::geom::{Rect, hits_any, normalize, point_segment_distance, raycast};
use crate::consts::*;
use crate::{angle_of, normalize_angle, unit_from_angle};

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Allegiance {
    /// Fired by enemies; hurts the player
    Hostile,
    /// Fired by the player; hurts combatants
    Player,
}

/// A straight-flying (optionally homing) projectile
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub pos: Vec2,
    /// Unit heading
    pub dir: Vec2,
    pub speed: f32,
    /// Seconds left before it fizzles
    pub ttl: f32,
    pub radius: f32,
    pub damage: i32,
    pub homing: bool,
    /// Max steering in radians/s when homing
    pub turn_rate: f32,
    pub allegiance: Allegiance,
    pub alive: bool,
}

impl Projectile {
    pub fn new(pos: Vec2, dir: Vec2, speed: f32, ttl: f32) -> Self {
        Self {
            pos,
            dir: normalize(dir),
            speed,
            ttl,
            radius: PROJECTILE_RADIUS,
            damage: 1,
            homing: false,
            turn_rate: HOMING_TURN_RATE,
            allegiance: Allegiance::Hostile,
            alive: true,
        }
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_damage(mut self, damage: i32) -> Self {
        self.damage = damage;
        self
    }

    pub fn homing(mut self) -> Self {
        self.homing = true;
        self
    }

    pub fn fired_by(mut self, allegiance: Allegiance) -> Self {
        self.allegiance = allegiance;
        self
    }

    /// Bounding box used for wall and body overlap tests
    pub fn bounds(&self) -> Rect {
        Rect::centered(self.pos, self.radius * 2.0, self.radius * 2.0)
    }

    /// Steer (if homing), move, age, and die on timeout or wall contact.
    /// The path travelled this step is tested, not just the end point.
    pub fn update(&mut self, dt: f32, walls: &[Rect], target: Option<Vec2>) {
        if !self.alive {
            return;
        }

        if self.homing {
            if let Some(target) = target {
                let wanted = normalize(target - self.pos);
                if wanted != Vec2::ZERO {
                    let current = angle_of(self.dir);
                    let diff = normalize_angle(angle_of(wanted) - current);
                    let max_turn = self.turn_rate * dt;
                    self.dir = unit_from_angle(current + diff.clamp(-max_turn, max_turn));
                }
            }
        }

        // Sweep in steps no longer than the radius so fast shots cannot skip a wall
        let travel = self.speed * dt;
        let steps = (travel / self.radius.max(1.0)).ceil().max(1.0) as u32;
        let step = self.dir * (travel / steps as f32);
        for _ in 0..steps {
            self.pos += step;
            if hits_any(&self.bounds(), walls) {
                self.alive = false;
                return;
            }
        }

        self.ttl -= dt;
        if self.ttl <= 0.0 {
            self.alive = false;
        }
    }
}

/// Lifecycle of a beam; only ever moves forward
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BeamPhase {
    Warn,
    Active,
    Done,
}

/// A fixed-angle beam: harmless warning line, then a damaging active phase
#[derive(Debug, Clone, PartialEq)]
pub struct Beam {
    pub origin: Vec2,
    pub angle: f32,
    pub warn_left: f32,
    pub active_left: f32,
    pub length: f32,
    pub width: f32,
    pub phase: BeamPhase,
    /// Raycast end point, computed on first update and then fixed
    terminal: Option<Vec2>,
}

impl Beam {
    pub fn new(origin: Vec2, angle: f32, warn_time: f32, active_time: f32) -> Self {
        Self {
            origin,
            angle,
            warn_left: warn_time,
            active_left: active_time,
            length: BEAM_LENGTH,
            width: BEAM_WIDTH,
            phase: BeamPhase::Warn,
            terminal: None,
        }
    }

    /// Beam end point, if it has been resolved yet
    pub fn terminal(&self) -> Option<Vec2> {
        self.terminal
    }

    pub fn is_done(&self) -> bool {
        self.phase == BeamPhase::Done
    }

    /// Whether a circle of `radius` at `pos` touches the beam segment
    pub fn touches(&self, pos: Vec2, radius: f32) -> bool {
        let end = self.terminal.unwrap_or(self.origin);
        point_segment_distance(pos, self.origin, end) <= radius + self.width * 0.5
    }

    /// Advance one step. Returns true when the active beam touches the player.
    pub fn update(&mut self, dt: f32, walls: &[Rect], player: Vec2, player_radius: f32) -> bool {
        if self.phase == BeamPhase::Done {
            return false;
        }
        if self.terminal.is_none() {
            self.terminal = Some(raycast(self.origin, self.angle, self.length, walls));
        }

        match self.phase {
            BeamPhase::Warn => {
                self.warn_left -= dt;
                if self.warn_left <= 0.0 {
                    self.warn_left = 0.0;
                    self.phase = BeamPhase::Active;
                }
                false
            }
            BeamPhase::Active => {
                self.active_left -= dt;
                let hit = self.touches(player, player_radius);
                if self.active_left <= 0.0 {
                    self.active_left = 0.0;
                    self.phase = BeamPhase::Done;
                }
                hit
            }
            BeamPhase::Done => false,
        }
    }
}

/// A hazard requested by a controller this tick
#[derive(Debug, Clone, PartialEq)]
pub enum Hazard {
    Projectile(Projectile),
    Beam(Beam),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_projectile_moves_and_expires() {
        let mut p = Projectile::new(Vec2::ZERO, Vec2::new(2.0, 0.0), 100.0, 0.25);
        assert!((p.dir.length() - 1.0).abs() < 1e-6);
        p.update(0.1, &[], None);
        assert!((p.pos.x - 10.0).abs() < 1e-4);
        assert!(p.alive);
        p.update(0.1, &[], None);
        p.update(0.1, &[], None);
        assert!(!p.alive);
    }

    #[test]
    fn test_projectile_dies_on_wall() {
        let walls = [Rect::new(20.0, -16.0, 32.0, 32.0)];
        let mut p = Projectile::new(Vec2::ZERO, Vec2::X, 200.0, 3.0);
        p.update(0.1, &walls, None);
        assert!(!p.alive);
    }

    #[test]
    fn test_fast_projectile_cannot_skip_wall_on_large_step() {
        let walls = [Rect::new(40.0, -16.0, 32.0, 32.0)];
        let mut p = Projectile::new(Vec2::ZERO, Vec2::X, 260.0, 3.0);
        p.update(0.3, &walls, None);
        assert!(!p.alive);
        // Stopped at the wall face, not on the far side
        assert!(p.pos.x < 72.0);
    }

    #[test]
    fn test_homing_turn_is_bounded() {
        // Target directly behind: a full PI difference, clamp to turn_rate * dt
        let mut p = Projectile::new(Vec2::ZERO, Vec2::X, 0.0, 10.0).homing();
        p.update(0.1, &[], Some(Vec2::new(-100.0, 1.0)));
        let turned = angle_of(p.dir).abs();
        assert!((turned - HOMING_TURN_RATE * 0.1).abs() < 1e-4);
    }

    #[test]
    fn test_homing_converges_without_overshoot() {
        let target = Vec2::new(0.0, 500.0);
        let mut p = Projectile::new(Vec2::ZERO, Vec2::X, 0.0, 100.0).homing();
        for _ in 0..200 {
            p.update(0.05, &[], Some(target));
        }
        assert!((angle_of(p.dir) - PI / 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_beam_phases_and_hit_window() {
        let mut beam = Beam::new(Vec2::ZERO, 0.0, 0.25, 0.25);
        let on_line = Vec2::new(100.0, 0.0);

        // Warn phase never hits
        assert!(!beam.update(0.125, &[], on_line, 12.0));
        assert_eq!(beam.phase, BeamPhase::Warn);
        assert!(!beam.update(0.125, &[], on_line, 12.0));
        assert_eq!(beam.phase, BeamPhase::Active);

        // Active phase hits every tick while touching
        assert!(beam.update(0.125, &[], on_line, 12.0));
        assert!(beam.update(0.125, &[], on_line, 12.0));
        assert!(beam.is_done());

        // Done never hits
        assert!(!beam.update(0.125, &[], on_line, 12.0));
    }

    #[test]
    fn test_beam_hit_threshold() {
        let mut beam = Beam::new(Vec2::ZERO, 0.0, 0.0, 5.0);
        beam.update(0.01, &[], Vec2::ZERO, 0.0);
        assert_eq!(beam.phase, BeamPhase::Active);

        // radius 12 + half width 4 = 16
        assert!(beam.update(0.01, &[], Vec2::new(50.0, 15.9), 12.0));
        assert!(!beam.update(0.01, &[], Vec2::new(50.0, 16.1), 12.0));
        // Past the terminal point
        assert!(!beam.update(0.01, &[], Vec2::new(BEAM_LENGTH + 17.0, 0.0), 12.0));
    }

    #[test]
    fn test_beam_terminal_cached() {
        let walls = vec![Rect::new(100.0, -16.0, 32.0, 32.0)];
        let mut beam = Beam::new(Vec2::ZERO, 0.0, 1.0, 1.0);
        beam.update(0.1, &walls, Vec2::new(0.0, 300.0), 12.0);
        let first = beam.terminal().unwrap();
        assert!(first.x < 110.0);

        // Moving the wall does not re-aim the beam
        beam.update(0.1, &[], Vec2::new(0.0, 300.0), 12.0);
        assert_eq!(beam.terminal(), Some(first));
    }
}
