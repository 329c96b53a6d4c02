//! Dungeon Encounter - real-time encounter simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (AI, hazards, status effects, spawning)
//! - `persistence`: Save records for reconstructing an encounter after reload
//! - `tuning`: Data-driven game balance

pub mod error;
pub mod persistence;
pub mod sim;
pub mod tuning;

pub use error::{Error, Result};
pub use tuning::{Difficulty, Tuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Tile edge length in world units
    pub const TILE: f32 = 32.0;

    /// Combatant body sizes (square bounding boxes)
    pub const MELEE_SIZE: f32 = TILE - 8.0;
    pub const RANGED_SIZE: f32 = TILE - 10.0;
    pub const BOSS_SIZE: f32 = TILE * 2.0 - 8.0;

    /// Base move speeds (units/s)
    pub const MELEE_SPEED: f32 = 90.0;
    pub const RANGED_SPEED: f32 = 70.0;
    pub const BOSS_SPEED: f32 = 60.0;

    /// Base health before difficulty scaling
    pub const MELEE_BASE_HP: f32 = 3.0;
    pub const RANGED_BASE_HP: f32 = 2.0;
    pub const BOSS_BASE_HP: f32 = 40.0;

    /// Melee chase radius; outside it melee combatants wander
    pub const CHASE_RADIUS: f32 = TILE * 6.0;
    /// Seconds between path replans
    pub const PATH_REPLAN_COOLDOWN: f32 = 0.4;
    /// Distance at which a waypoint counts as reached
    pub const WAYPOINT_ARRIVAL_RADIUS: f32 = 4.0;
    /// Wander heading hold time (base + random extra)
    pub const WANDER_HOLD: f32 = 1.2;
    pub const WANDER_HOLD_JITTER: f32 = 0.8;

    /// Melee contact attack
    pub const MELEE_REACH: f32 = TILE * 0.8;
    pub const MELEE_ATTACK_COOLDOWN: f32 = 0.8;
    /// Elite aura reach (damage per tick while inside)
    pub const AURA_REACH: f32 = TILE * 1.1;

    /// Boss standoff band
    pub const BOSS_RETREAT_RANGE: f32 = TILE * 5.0;
    pub const BOSS_APPROACH_RANGE: f32 = TILE * 7.5;
    /// Below this distance the boss restricts itself to close-range patterns
    pub const BOSS_CLOSE_RANGE: f32 = TILE * 5.0;
    /// Boss pattern timings (seconds)
    pub const BOSS_TELEGRAPH_WAIT: f32 = 0.35;
    pub const BOSS_RECOVERY_WAIT: f32 = 1.85;

    /// Line-of-sight sampling
    pub const LOS_STEP: f32 = 6.0;
    pub const LOS_MAX_DISTANCE: f32 = 720.0;
    pub const LOS_PROBE_SIZE: f32 = 2.0;

    /// Beam defaults
    pub const BEAM_LENGTH: f32 = 280.0;
    pub const BEAM_WIDTH: f32 = 8.0;
    pub const BEAM_WARN_TIME: f32 = 0.8;
    pub const BEAM_ACTIVE_TIME: f32 = 1.0;
    pub const BEAM_RAY_STEP: f32 = 6.0;
    pub const BEAM_PROBE_SIZE: f32 = 4.0;
    pub const BEAM_DAMAGE: i32 = 1;

    /// Projectile defaults
    pub const PROJECTILE_RADIUS: f32 = 4.0;
    pub const HOMING_TURN_RATE: f32 = 2.0;

    /// Melee player weapons also reach the boss a little further out
    pub const BOSS_HIT_BONUS: f32 = 8.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit vector for an angle in radians
#[inline]
pub fn unit_from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Heading angle of a vector (atan2)
#[inline]
pub fn angle_of(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}
