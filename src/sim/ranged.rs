//! Ranged combatant state machine
//!
//! Priority each tick (after timers count down):
//! 1. out of ammo → RELOAD
//! 2. RELOAD holds until the reload timer expires, then refills and re-evaluates
//! 3. otherwise: FLEE when crowded, TAKE_COVER without line of sight,
//!    SHOOT inside the ideal band, STRAFE everywhere else

use glam::Vec2;
use rand::Rng;

use super::geom::{Rect, nearest_wall_center, normalize};
use crate::tuning::RangedConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangedState {
    Idle,
    Reload,
    TakeCover,
    Flee,
    Strafe,
    Shoot,
}

/// Movement intent and trigger for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangedDecision {
    /// Unit (or zero) movement direction
    pub direction: Vec2,
    pub shoot: bool,
}

/// What the ranged combatant can see this tick
#[derive(Debug, Clone, Copy)]
pub struct Perception<'a> {
    pub me: Vec2,
    pub player: Vec2,
    pub line_of_sight: bool,
    pub walls: &'a [Rect],
}

#[derive(Debug, Clone)]
pub struct RangedBrain {
    pub state: RangedState,
    pub ammo: u32,
    pub cooldown: f32,
    pub reload_timer: f32,
    pub strafe_timer: f32,
    pub strafe_dir: Vec2,
    config: RangedConfig,
}

impl RangedBrain {
    pub fn new(config: RangedConfig) -> Self {
        Self {
            state: RangedState::Idle,
            ammo: config.ammo_max,
            cooldown: 0.0,
            reload_timer: 0.0,
            strafe_timer: 0.0,
            strafe_dir: Vec2::ZERO,
            config,
        }
    }

    pub fn config(&self) -> &RangedConfig {
        &self.config
    }

    pub fn update<R: Rng + ?Sized>(
        &mut self,
        view: &Perception<'_>,
        rng: &mut R,
        dt: f32,
    ) -> RangedDecision {
        let dist = view.me.distance(view.player);

        if self.cooldown > 0.0 {
            self.cooldown -= dt;
        }
        if self.reload_timer > 0.0 {
            self.reload_timer -= dt;
        }
        if self.strafe_timer > 0.0 {
            self.strafe_timer -= dt;
        }

        if self.ammo == 0 && self.state != RangedState::Reload {
            self.state = RangedState::Reload;
            self.reload_timer = self.config.reload_time;
        } else if self.state == RangedState::Reload {
            if self.reload_timer <= 0.0 {
                self.ammo = self.config.ammo_max;
                self.state = self.evaluate(view, dist, rng);
            }
        } else {
            self.state = self.evaluate(view, dist, rng);
        }

        self.act(view)
    }

    /// Pick the non-reload state for the current range and sight line
    fn evaluate<R: Rng + ?Sized>(
        &mut self,
        view: &Perception<'_>,
        dist: f32,
        rng: &mut R,
    ) -> RangedState {
        if dist < self.config.flee_range {
            RangedState::Flee
        } else if !view.line_of_sight {
            RangedState::TakeCover
        } else if (self.config.ideal_min..=self.config.ideal_max).contains(&dist) {
            RangedState::Shoot
        } else {
            if self.strafe_timer <= 0.0 {
                let forward = normalize(view.player - view.me);
                let left = Vec2::new(-forward.y, forward.x);
                self.strafe_dir = if rng.random_bool(0.5) { left } else { -left };
                self.strafe_timer = self.config.strafe_time;
            }
            RangedState::Strafe
        }
    }

    fn act(&mut self, view: &Perception<'_>) -> RangedDecision {
        let mut decision = RangedDecision {
            direction: Vec2::ZERO,
            shoot: false,
        };

        match self.state {
            RangedState::Flee => decision.direction = normalize(view.me - view.player),
            RangedState::TakeCover => {
                decision.direction = nearest_wall_center(view.me, view.walls)
                    .map(|c| normalize(c - view.me))
                    .unwrap_or(Vec2::ZERO);
            }
            RangedState::Strafe => decision.direction = self.strafe_dir,
            RangedState::Shoot => {
                if view.line_of_sight && self.cooldown <= 0.0 && self.ammo > 0 {
                    decision.shoot = true;
                    self.ammo -= 1;
                    self.cooldown = self.config.shoot_cooldown;
                }
            }
            RangedState::Idle | RangedState::Reload => {}
        }
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn view(dist: f32, los: bool) -> Perception<'static> {
        Perception {
            me: Vec2::ZERO,
            player: Vec2::new(dist, 0.0),
            line_of_sight: los,
            walls: &[],
        }
    }

    fn brain() -> RangedBrain {
        RangedBrain::new(RangedConfig::default())
    }

    #[test]
    fn test_idle_is_immediately_superseded() {
        let mut b = brain();
        let mut rng = Pcg32::seed_from_u64(1);
        b.update(&view(160.0, true), &mut rng, 0.016);
        assert_eq!(b.state, RangedState::Shoot);
    }

    #[test]
    fn test_shoot_consumes_ammo_and_respects_cooldown() {
        let mut b = brain();
        let mut rng = Pcg32::seed_from_u64(1);
        let d = b.update(&view(160.0, true), &mut rng, 0.016);
        assert!(d.shoot);
        assert_eq!(d.direction, Vec2::ZERO);
        assert_eq!(b.ammo, b.config().ammo_max - 1);

        // Cooldown not elapsed: stays in SHOOT, no shot, no movement
        let d = b.update(&view(160.0, true), &mut rng, 0.016);
        assert!(!d.shoot);
        assert_eq!(d.direction, Vec2::ZERO);
        assert_eq!(b.state, RangedState::Shoot);
    }

    #[test]
    fn test_reload_then_shoot_on_same_tick() {
        let mut b = brain();
        let mut rng = Pcg32::seed_from_u64(7);
        b.state = RangedState::Strafe;
        b.ammo = 0;

        b.update(&view(160.0, true), &mut rng, 0.1);
        assert_eq!(b.state, RangedState::Reload);

        let reload = b.config().reload_time;
        let mut elapsed = 0.0;
        while elapsed + 0.1 < reload {
            let d = b.update(&view(160.0, true), &mut rng, 0.1);
            elapsed += 0.1;
            assert_eq!(b.state, RangedState::Reload);
            assert!(!d.shoot);
        }

        let d = b.update(&view(160.0, true), &mut rng, 0.2);
        assert_eq!(b.ammo, b.config().ammo_max - 1);
        assert_eq!(b.state, RangedState::Shoot);
        assert!(d.shoot);
    }

    #[test]
    fn test_flee_cover_strafe_priorities() {
        let mut rng = Pcg32::seed_from_u64(3);

        let mut b = brain();
        let d = b.update(&view(40.0, false), &mut rng, 0.016);
        assert_eq!(b.state, RangedState::Flee);
        assert_eq!(d.direction, Vec2::NEG_X);

        let mut b = brain();
        let walls = [Rect::new(0.0, 100.0, 32.0, 32.0)];
        let v = Perception {
            walls: &walls,
            ..view(160.0, false)
        };
        let d = b.update(&v, &mut rng, 0.016);
        assert_eq!(b.state, RangedState::TakeCover);
        assert!(d.direction.y > 0.9);

        let mut b = brain();
        let d = b.update(&view(400.0, true), &mut rng, 0.016);
        assert_eq!(b.state, RangedState::Strafe);
        // Perpendicular to the line toward the player
        assert!(d.direction.x.abs() < 1e-5);
        assert!((d.direction.y.abs() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_strafe_direction_held_until_timer_expires() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut b = brain();
        let first = b.update(&view(400.0, true), &mut rng, 0.1).direction;
        for _ in 0..5 {
            let d = b.update(&view(400.0, true), &mut rng, 0.1);
            assert_eq!(d.direction, first);
        }
    }
}
