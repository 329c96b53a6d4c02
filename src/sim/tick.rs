//! Fixed timestep simulation tick
//!
//! Step order (fixed, deterministic):
//! 1. player attack resolution
//! 2. director spawning
//! 3. controllers decide and move, appending hazard requests
//! 4. hazards advance and test against player, combatants and walls
//! 5. status effects tick
//! 6. dead combatants are reaped and loot is rolled

use glam::Vec2;

use super::boss::standoff_direction;
use super::combat::{MeleeSwing, PlayerAttack, Weapon, resolve_melee, roll_loot, volley};
use super::combatant::{CombatantId, CombatantKind, Controller, EliteMod};
use super::director::DirectorView;
use super::events::{DamageSource, GameEvent};
use super::geom::{fan_dirs, line_of_sight, move_and_slide, normalize};
use super::hazard::{Allegiance, Hazard, Projectile};
use super::melee::MeleeView;
use super::ranged::Perception;
use super::state::{EncounterState, PlayerView};
use crate::angle_of;
use crate::consts::*;

/// Multishot fan
const MULTISHOT_COUNT: usize = 3;
const MULTISHOT_SPREAD: f32 = 0.15;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub player: PlayerView,
    /// Attack the player triggered this tick
    pub attack: Option<PlayerAttack>,
}

/// What happened during a tick
#[derive(Debug, Clone, Default)]
pub struct TickOutput {
    pub events: Vec<GameEvent>,
    /// Displacement applied to each combatant that moved
    pub movements: Vec<(CombatantId, Vec2)>,
}

impl TickOutput {
    /// Total damage dealt to the player this tick
    pub fn player_damage(&self) -> i32 {
        self.events
            .iter()
            .map(|e| match e {
                GameEvent::PlayerDamaged { amount, .. } => *amount,
                _ => 0,
            })
            .sum()
    }
}

/// Advance the encounter by one fixed timestep
pub fn tick(state: &mut EncounterState, input: &TickInput, dt: f32) -> TickOutput {
    let mut out = TickOutput::default();

    if let Some(attack) = &input.attack {
        resolve_player_attack(state, &input.player, attack, &mut out.events);
    }
    run_director(state, &input.player, dt, &mut out.events);
    run_controllers(state, &input.player, dt, &mut out);
    update_hazards(state, &input.player, dt, &mut out.events);
    tick_effects(state, dt, &mut out.events);
    reap(state, &mut out.events);

    state.time_ticks += 1;
    out
}

fn resolve_player_attack(
    state: &mut EncounterState,
    player: &PlayerView,
    attack: &PlayerAttack,
    events: &mut Vec<GameEvent>,
) {
    match attack.weapon {
        Weapon::Melee { range, damage } => {
            let swing = MeleeSwing {
                origin: player.center,
                range,
                damage,
                poison_chance: attack.poison_chance,
            };
            resolve_melee(
                &swing,
                &state.tuning.poison,
                &mut state.combatants,
                &mut state.rng,
                events,
            );
        }
        Weapon::Volley {
            count,
            spread,
            speed,
            damage,
        } => {
            state.projectiles.extend(volley(
                player.center,
                attack.facing,
                count,
                spread,
                speed,
                damage,
            ));
        }
    }
}

fn run_director(
    state: &mut EncounterState,
    player: &PlayerView,
    dt: f32,
    events: &mut Vec<GameEvent>,
) {
    let view = DirectorView {
        stage: state.stage_index,
        player: player.center,
        player_health_ratio: player.health_ratio(),
        live: state.live_count(),
        boss_alive: state.boss_alive(),
        arena_active: state.arena_active,
        geometry: &state.geometry,
    };
    let spawns = state.director.update(&view, &mut state.rng, dt);
    for spawn in spawns {
        // Director reinforcements are never elite
        let id = state.spawn(spawn.kind, spawn.center, false, Vec::new());
        events.push(GameEvent::Spawned {
            id,
            kind: spawn.kind,
            pos: spawn.center,
        });
    }
}

fn run_controllers(state: &mut EncounterState, player: &PlayerView, dt: f32, out: &mut TickOutput) {
    let EncounterState {
        combatants,
        geometry,
        rng,
        arena_active,
        projectiles,
        beams,
        ..
    } = state;
    let geometry = &*geometry;
    let walls = geometry.walls.as_slice();

    for c in combatants.iter_mut().filter(|c| c.is_alive()) {
        let me = c.center();
        let dist = me.distance(player.center);
        let aura = c.has_mod(EliteMod::Aura);
        let multishot = c.has_mod(EliteMod::Multishot);
        let before = c.body;

        match &mut c.controller {
            Controller::Melee(brain) => {
                if aura && dist <= AURA_REACH {
                    out.events.push(GameEvent::PlayerDamaged {
                        amount: 1,
                        source: DamageSource::Aura(c.id),
                    });
                }

                let view = MeleeView {
                    me,
                    player: player.center,
                    geometry,
                    arena_active: *arena_active,
                };
                let dir = brain.update(&view, rng, dt);
                move_and_slide(&mut c.body, dir * c.speed * dt, geometry.solids(*arena_active));

                if c.attack_timer > 0.0 {
                    c.attack_timer -= dt;
                }
                if c.attack_timer <= 0.0 && c.body.center().distance(player.center) <= MELEE_REACH {
                    out.events.push(GameEvent::PlayerDamaged {
                        amount: c.damage,
                        source: DamageSource::Contact(c.id),
                    });
                    c.attack_timer = MELEE_ATTACK_COOLDOWN;
                }
            }
            Controller::Ranged(brain) => {
                let view = Perception {
                    me,
                    player: player.center,
                    line_of_sight: line_of_sight(player.center, me, walls),
                    walls,
                };
                let decision = brain.update(&view, rng, dt);
                move_and_slide(&mut c.body, decision.direction * c.speed * dt, walls);

                let aim = normalize(player.center - me);
                if decision.shoot && aim != Vec2::ZERO {
                    let config = brain.config();
                    let dirs = if multishot {
                        fan_dirs(angle_of(aim), MULTISHOT_COUNT, MULTISHOT_SPREAD)
                    } else {
                        vec![aim]
                    };
                    for dir in dirs {
                        projectiles.push(
                            Projectile::new(me, dir, config.shot_speed, config.shot_ttl)
                                .with_damage(c.damage),
                        );
                    }
                }
            }
            Controller::Boss(brain) => {
                for hazard in brain.tick(me, player.center, dt) {
                    match hazard {
                        Hazard::Projectile(p) => projectiles.push(p),
                        Hazard::Beam(b) => beams.push(b),
                    }
                }
                let dir = standoff_direction(me, player.center);
                move_and_slide(&mut c.body, dir * c.speed * dt, walls);
            }
        }

        let moved = c.body.center() - before.center();
        if moved != Vec2::ZERO {
            out.movements.push((c.id, moved));
        }
    }
}

fn update_hazards(
    state: &mut EncounterState,
    player: &PlayerView,
    dt: f32,
    events: &mut Vec<GameEvent>,
) {
    let walls = state.geometry.walls.as_slice();

    for p in state.projectiles.iter_mut() {
        let target = (p.allegiance == Allegiance::Hostile).then_some(player.center);
        p.update(dt, walls, target);
        if !p.alive {
            continue;
        }

        match p.allegiance {
            Allegiance::Hostile => {
                if p.pos.distance(player.center) <= p.radius + player.radius {
                    events.push(GameEvent::PlayerDamaged {
                        amount: p.damage,
                        source: DamageSource::Projectile,
                    });
                    p.alive = false;
                }
            }
            Allegiance::Player => {
                let bounds = p.bounds();
                if let Some(c) = state
                    .combatants
                    .iter_mut()
                    .find(|c| c.is_alive() && c.body.overlaps(&bounds))
                {
                    let amount = c.health.hurt(p.damage);
                    events.push(GameEvent::CombatantDamaged { id: c.id, amount });
                    p.alive = false;
                }
            }
        }
    }
    state.projectiles.retain(|p| p.alive);

    for beam in state.beams.iter_mut() {
        if beam.update(dt, walls, player.center, player.radius) {
            events.push(GameEvent::PlayerDamaged {
                amount: BEAM_DAMAGE,
                source: DamageSource::Beam,
            });
        }
    }
    state.beams.retain(|b| !b.is_done());
}

fn tick_effects(state: &mut EncounterState, dt: f32, events: &mut Vec<GameEvent>) {
    for c in state.combatants.iter_mut().filter(|c| c.is_alive()) {
        let report = c.effects.tick(&mut c.health, dt);
        if report.damage > 0 {
            events.push(GameEvent::CombatantDamaged {
                id: c.id,
                amount: report.damage,
            });
        }
    }
}

/// Remove dead combatants, emitting death and loot events exactly once each
fn reap(state: &mut EncounterState, events: &mut Vec<GameEvent>) {
    for c in state.combatants.iter().filter(|c| !c.is_alive()) {
        let pos = c.center();
        log::debug!("{} #{} died (elite={})", c.kind.as_str(), c.id.0, c.elite);
        events.push(GameEvent::CombatantDied {
            id: c.id,
            kind: c.kind,
            elite: c.elite,
            pos,
        });
        for item in roll_loot(&state.tuning.drops, c.kind, c.elite, &mut state.rng) {
            log::debug!("{} #{} dropped {}", c.kind.as_str(), c.id.0, item.as_str());
            events.push(GameEvent::LootDropped { item, pos });
        }
        if c.kind == CombatantKind::Boss {
            log::info!("Boss defeated at tick {}", state.time_ticks);
        }
    }
    state.combatants.retain(|c| c.is_alive());
}
