//! Dungeon Encounter headless runner
//!
//! Builds a small arena, runs the simulation at the fixed timestep with a
//! scripted player and logs what happened. Useful for eyeballing balance
//! changes: `RUST_LOG=debug cargo run -- hard`.

use dungeon_encounter::consts::*;
use dungeon_encounter::persistence;
use dungeon_encounter::sim::{
    EncounterState, GameEvent, PlayerAttack, PlayerView, TickInput, Weapon, tick,
};
use dungeon_encounter::{Difficulty, Tuning};
use glam::Vec2;

const DEMO_ROWS: [&str; 12] = [
    "####################",
    "#..................#",
    "#..E...........e...#",
    "#......###.........#",
    "#......#...........#",
    "#..........E.......#",
    "#..................#",
    "#....e.......###...#",
    "#..................#",
    "#.........B........#",
    "#..................#",
    "####################",
];

/// Seconds of simulated time
const RUN_SECONDS: u32 = 30;

fn main() {
    env_logger::init();

    let difficulty = std::env::args()
        .nth(1)
        .and_then(|arg| Difficulty::from_str(&arg))
        .unwrap_or_default();
    let tuning = Tuning {
        difficulty,
        ..Default::default()
    };

    let mut state = EncounterState::from_rows(0x5eed, &DEMO_ROWS, tuning);
    state.arena_active = true;
    log::info!(
        "Dungeon Encounter demo: difficulty={}, {} combatants",
        difficulty.as_str(),
        state.combatants.len()
    );

    let mut player = PlayerView {
        center: Vec2::new(2.5 * TILE, 9.5 * TILE),
        radius: 12.0,
        hp: 40,
        hp_max: 40,
    };

    let mut damage_taken = 0;
    let mut kills = 0;
    let mut loot = 0;
    let mut spawned = 0;
    let ticks = RUN_SECONDS * (1.0 / SIM_DT).round() as u32;

    for i in 0..ticks {
        // Circle the lower-left of the arena, swinging twice a second
        let t = i as f32 * SIM_DT;
        player.center = Vec2::new(4.0 * TILE + t.cos() * 48.0, 8.5 * TILE + t.sin() * 48.0);
        let attack = (i % 30 == 0).then_some(PlayerAttack {
            weapon: Weapon::default(),
            facing: Vec2::new(-t.sin(), t.cos()),
            poison_chance: 0.3,
        });

        let out = tick(&mut state, &TickInput { player, attack }, SIM_DT);
        for event in &out.events {
            match event {
                GameEvent::PlayerDamaged { amount, .. } => damage_taken += amount,
                GameEvent::CombatantDied { .. } => kills += 1,
                GameEvent::LootDropped { .. } => loot += 1,
                GameEvent::Spawned { .. } => spawned += 1,
                _ => {}
            }
        }
        player.hp = (player.hp_max - damage_taken).max(1);
    }

    log::info!(
        "After {}s: damage taken {}, kills {}, loot {}, director spawns {}",
        RUN_SECONDS,
        damage_taken,
        kills,
        loot,
        spawned
    );
    log::info!(
        "Still standing: {} combatants, boss alive {}",
        state.live_count(),
        state.boss_alive()
    );

    match persistence::capture(&state).to_json() {
        Ok(json) => log::info!("Save record is {} bytes", json.len()),
        Err(e) => log::warn!("Could not encode save record: {}", e),
    }
}
