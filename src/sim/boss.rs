//! Boss controller: a fixed choose → telegraph → wait → attack → wait cycle
//!
//! The tree is built once per boss. Per-tick inputs are written into
//! [`BossContext`] before ticking and the hazards it emits are drained after.

use glam::Vec2;

use super::bt::{Behavior, Sequence, Status, action, wait};
use super::geom::{fan_dirs, normalize, ring_dirs};
use super::hazard::{Beam, Hazard, Projectile};
use crate::angle_of;
use crate::consts::*;

/// Attack patterns in round-robin order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Fan,
    Circle,
    Homing,
    Laser,
}

impl Pattern {
    pub const ALL: [Pattern; 4] = [Pattern::Fan, Pattern::Circle, Pattern::Homing, Pattern::Laser];

    pub fn as_str(&self) -> &'static str {
        match self {
            Pattern::Fan => "fan",
            Pattern::Circle => "circle",
            Pattern::Homing => "homing",
            Pattern::Laser => "laser",
        }
    }
}

/// Patterns allowed when the player is close
const CLOSE_CANDIDATES: [usize; 2] = [1, 2];
/// Patterns allowed at range
const FAR_CANDIDATES: [usize; 3] = [0, 1, 3];

/// Everything the boss tree reads and writes
#[derive(Debug, Clone, Default)]
pub struct BossContext {
    pub boss_pos: Vec2,
    pub player_pos: Vec2,
    /// Round-robin position in [`Pattern::ALL`]
    pub cursor: usize,
    /// Pattern picked by the current cycle
    pub pattern: Option<Pattern>,
    /// Hazards produced this tick
    pub emitted: Vec<Hazard>,
}

/// Advance the round-robin cursor and pick a pattern for the given distance
pub fn choose_pattern(ctx: &mut BossContext) -> Pattern {
    let dist = ctx.boss_pos.distance(ctx.player_pos);
    let candidates: &[usize] = if dist < BOSS_CLOSE_RANGE {
        &CLOSE_CANDIDATES
    } else {
        &FAR_CANDIDATES
    };

    ctx.cursor = (ctx.cursor + 1) % Pattern::ALL.len();
    if !candidates.contains(&ctx.cursor) {
        ctx.cursor = candidates[0];
    }
    let pattern = Pattern::ALL[ctx.cursor];
    ctx.pattern = Some(pattern);
    log::debug!("Boss chose pattern '{}' at distance {:.0}", pattern.as_str(), dist);
    pattern
}

fn telegraph(ctx: &mut BossContext) {
    if ctx.pattern == Some(Pattern::Laser) {
        let angle = angle_of(ctx.player_pos - ctx.boss_pos);
        ctx.emitted.push(Hazard::Beam(Beam::new(
            ctx.boss_pos,
            angle,
            BEAM_WARN_TIME,
            BEAM_ACTIVE_TIME,
        )));
    }
}

fn attack(ctx: &mut BossContext) {
    let origin = ctx.boss_pos;
    let to_player = ctx.player_pos - origin;

    match ctx.pattern.unwrap_or(Pattern::Fan) {
        Pattern::Fan => {
            for dir in fan_dirs(angle_of(to_player), 7, 0.18) {
                ctx.emitted
                    .push(Hazard::Projectile(Projectile::new(origin, dir, 260.0, 3.0)));
            }
        }
        Pattern::Circle => {
            for dir in ring_dirs(18) {
                ctx.emitted
                    .push(Hazard::Projectile(Projectile::new(origin, dir, 260.0, 3.2)));
            }
        }
        Pattern::Homing => {
            let dir = normalize(to_player);
            for _ in 0..4 {
                let shot = Projectile::new(origin, dir, 140.0, 3.5)
                    .with_radius(5.0)
                    .with_damage(2)
                    .homing();
                ctx.emitted.push(Hazard::Projectile(shot));
            }
        }
        // The beam registered at telegraph time does the damage
        Pattern::Laser => {}
    }
}

/// Behavior-tree driven boss brain
pub struct BossBrain {
    tree: Sequence<BossContext>,
    ctx: BossContext,
}

impl std::fmt::Debug for BossBrain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BossBrain")
            .field("step", &self.tree.cursor())
            .field("ctx", &self.ctx)
            .finish()
    }
}

impl Default for BossBrain {
    fn default() -> Self {
        Self::new()
    }
}

impl BossBrain {
    pub fn new() -> Self {
        let tree = Sequence::new(vec![
            action(|ctx: &mut BossContext, _dt| {
                choose_pattern(ctx);
                Status::Success
            }),
            action(|ctx: &mut BossContext, _dt| {
                telegraph(ctx);
                Status::Success
            }),
            wait(BOSS_TELEGRAPH_WAIT),
            action(|ctx: &mut BossContext, _dt| {
                attack(ctx);
                Status::Success
            }),
            wait(BOSS_RECOVERY_WAIT),
        ]);
        Self {
            tree,
            ctx: BossContext::default(),
        }
    }

    /// Pattern of the current cycle, if one has been chosen
    pub fn pattern(&self) -> Option<Pattern> {
        self.ctx.pattern
    }

    /// Tick the tree and return the hazards it produced
    pub fn tick(&mut self, boss_pos: Vec2, player_pos: Vec2, dt: f32) -> Vec<Hazard> {
        self.ctx.boss_pos = boss_pos;
        self.ctx.player_pos = player_pos;
        self.tree.tick(&mut self.ctx, dt);
        std::mem::take(&mut self.ctx.emitted)
    }
}

/// Standoff movement: back off when crowded, close in when far
pub fn standoff_direction(boss_pos: Vec2, player_pos: Vec2) -> Vec2 {
    let to_player = player_pos - boss_pos;
    let dist = to_player.length();
    if dist < BOSS_RETREAT_RANGE {
        normalize(-to_player)
    } else if dist > BOSS_APPROACH_RANGE {
        normalize(to_player)
    } else {
        Vec2::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(hazards: &[Hazard]) -> (usize, usize) {
        let projectiles = hazards
            .iter()
            .filter(|h| matches!(h, Hazard::Projectile(_)))
            .count();
        (projectiles, hazards.len() - projectiles)
    }

    #[test]
    fn test_close_player_only_gets_circle_or_homing() {
        let mut ctx = BossContext {
            boss_pos: Vec2::ZERO,
            player_pos: Vec2::new(TILE * 2.0, 0.0),
            ..Default::default()
        };
        for _ in 0..50 {
            let p = choose_pattern(&mut ctx);
            assert!(matches!(p, Pattern::Circle | Pattern::Homing), "got {:?}", p);
        }
    }

    #[test]
    fn test_far_player_round_robin() {
        let mut ctx = BossContext {
            boss_pos: Vec2::ZERO,
            player_pos: Vec2::new(TILE * 8.0, 0.0),
            ..Default::default()
        };
        let picks: Vec<Pattern> = (0..4).map(|_| choose_pattern(&mut ctx)).collect();
        // 0 -> 1 circle, 2 not allowed -> fan, 1 circle, 2 -> fan
        assert_eq!(
            picks,
            vec![Pattern::Circle, Pattern::Fan, Pattern::Circle, Pattern::Fan]
        );
        ctx.cursor = 2;
        assert_eq!(choose_pattern(&mut ctx), Pattern::Laser);
    }

    #[test]
    fn test_cycle_timing_and_fan_volley() {
        let mut brain = BossBrain::new();
        let boss = Vec2::ZERO;
        let player = Vec2::new(TILE * 6.0, 0.0);

        // First tick: choose (circle), telegraph, wait starts
        let out = brain.tick(boss, player, 0.25);
        assert!(out.is_empty());
        assert_eq!(brain.pattern(), Some(Pattern::Circle));

        // Telegraph wait (0.35s) completes -> attack fires -> recovery wait
        let out = brain.tick(boss, player, 0.125);
        assert_eq!(count(&out), (18, 0));

        // Recovery holds for 1.85s and finishes on the last of these ticks
        let mut total = Vec::new();
        for _ in 0..14 {
            total.extend(brain.tick(boss, player, 0.125));
        }
        assert!(total.is_empty());

        // Next cycle picks fan
        let out = brain.tick(boss, player, 0.125);
        assert!(out.is_empty());
        assert_eq!(brain.pattern(), Some(Pattern::Fan));
        let out = brain.tick(boss, player, 0.5);
        assert_eq!(count(&out), (7, 0));
    }

    #[test]
    fn test_laser_telegraph_registers_single_beam() {
        let mut ctx = BossContext {
            boss_pos: Vec2::ZERO,
            player_pos: Vec2::new(0.0, 300.0),
            cursor: 2,
            ..Default::default()
        };
        assert_eq!(choose_pattern(&mut ctx), Pattern::Laser);
        telegraph(&mut ctx);
        attack(&mut ctx);
        assert_eq!(count(&ctx.emitted), (0, 1));
        match &ctx.emitted[0] {
            Hazard::Beam(beam) => {
                assert!((beam.angle - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
                assert!((beam.warn_left - BEAM_WARN_TIME).abs() < 1e-6);
            }
            other => panic!("expected beam, got {:?}", other),
        }
    }

    #[test]
    fn test_homing_volley() {
        let mut ctx = BossContext {
            boss_pos: Vec2::ZERO,
            player_pos: Vec2::new(50.0, 0.0),
            pattern: Some(Pattern::Homing),
            ..Default::default()
        };
        attack(&mut ctx);
        assert_eq!(ctx.emitted.len(), 4);
        assert!(ctx.emitted.iter().all(|h| matches!(
            h,
            Hazard::Projectile(p) if p.homing && p.damage == 2 && p.speed < 200.0
        )));
    }

    #[test]
    fn test_standoff_direction() {
        let boss = Vec2::ZERO;
        assert_eq!(standoff_direction(boss, Vec2::new(TILE, 0.0)), Vec2::NEG_X);
        assert_eq!(standoff_direction(boss, Vec2::new(TILE * 6.0, 0.0)), Vec2::ZERO);
        assert_eq!(standoff_direction(boss, Vec2::new(TILE * 9.0, 0.0)), Vec2::X);
    }
}
