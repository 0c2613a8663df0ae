//! Grovekeep headless harness
//!
//! Builds a small arena and runs it at 60 Hz without a window, acting as a
//! minimal frame loop: arrows damage what they hit, charging boars that slam
//! into scenery get stunned, dead enemies are removed when their death state
//! ends. Pass a tuning JSON path as the first argument to override balance.

use glam::Vec2;

use grovekeep::Tuning;
use grovekeep::consts::{DEATH_MS, FRAME_MS};
use grovekeep::sim::prefabs::{
    spawn_archer, spawn_barbarian, spawn_boar, spawn_player, spawn_rock, spawn_tree, trunk_mesh,
};
use grovekeep::sim::{
    Archetype, ArrowSpawner, Behavior, ChargerPhase, SimEvent, Simulation, TickReport,
};

/// Ten seconds of play
const RUN_TICKS: u32 = 600;
/// The player dodges back and forth every two seconds
const DASH_EVERY: u32 = 120;
const DASH_DISTANCE: f32 = 80.0;
const SEED: u64 = 0x5eed;

fn load_tuning() -> Tuning {
    let Some(path) = std::env::args().nth(1) else {
        return Tuning::default();
    };
    match Tuning::load(&path) {
        Ok(tuning) => tuning,
        Err(e) => {
            log::warn!("Failed to load tuning from {path}: {e}, using defaults");
            Tuning::default()
        }
    }
}

fn build_arena(sim: &mut Simulation) {
    let reg = &mut sim.registry;
    spawn_player(reg, Vec2::new(600.0, 400.0));
    spawn_barbarian(reg, Vec2::new(150.0, 150.0));
    spawn_barbarian(reg, Vec2::new(1050.0, 700.0));
    spawn_boar(reg, Vec2::new(300.0, 650.0));
    spawn_archer(reg, Vec2::new(1000.0, 150.0));

    spawn_rock(reg, Vec2::new(450.0, 300.0), Vec2::new(60.0, 50.0));
    spawn_rock(reg, Vec2::new(800.0, 500.0), Vec2::new(80.0, 40.0));
    match trunk_mesh() {
        Ok(trunk) => {
            for x in [250.0, 700.0, 950.0] {
                spawn_tree(reg, Vec2::new(x, 450.0), Vec2::new(80.0, 140.0), trunk.clone());
            }
        }
        Err(e) => log::warn!("Skipping trees: {e}"),
    }
}

/// The frame loop's share of the rules: hits, stuns and cleanup
fn apply_report(sim: &mut Simulation, report: &TickReport) {
    for hit in &report.collisions {
        let reg = &mut sim.registry;

        if let Some(projectile) = reg.projectiles.get(hit.entity).copied()
            && projectile.damaging
            && projectile.source != Some(hit.other)
            && !reg.is_dead(hit.other)
            && let Some(enemy) = reg.enemies.get_mut(hit.other)
        {
            let killed = enemy.apply_damage(1);
            reg.despawn(hit.entity);
            if killed {
                reg.mark_dead(hit.other, DEATH_MS);
            }
            continue;
        }

        let charging = matches!(
            reg.archetypes.get(hit.entity),
            Some(Archetype::Charger(state)) if state.phase == ChargerPhase::Charging
        );
        if charging && reg.is_obstacle(hit.other) {
            sim.stun(hit.entity);
        }
    }

    for event in &report.events {
        if let SimEvent::ProjectileGrounded { entity } = *event {
            sim.registry.despawn(entity);
        }
    }
    for &entity in &report.expired {
        sim.registry.despawn(entity);
    }
}

fn main() {
    env_logger::init();
    log::info!("Grovekeep harness starting...");

    let tuning = load_tuning();
    let mut spawner = ArrowSpawner::new(tuning.ranged.arrow_hitbox);
    let mut sim = match Simulation::flat(tuning, SEED) {
        Ok(sim) => sim,
        Err(e) => {
            log::error!("Invalid tuning: {e}");
            std::process::exit(1);
        }
    };
    build_arena(&mut sim);

    let mut collisions = 0usize;
    let mut arrows = 0usize;
    let mut charges = 0usize;
    let mut deaths = 0usize;

    for tick in 1..=RUN_TICKS {
        if tick % DASH_EVERY == 0
            && let Some(player) = sim.registry.player()
        {
            let side = if (tick / DASH_EVERY) % 2 == 0 { -1.0 } else { 1.0 };
            let to = sim.registry.motions[player].ground_position() + Vec2::X * side * DASH_DISTANCE;
            sim.dash(player, to);
        }

        let report = sim.tick(FRAME_MS, &mut spawner);
        collisions += report.collisions.len() / 2;
        for event in &report.events {
            match event {
                SimEvent::ArrowFired { .. } => arrows += 1,
                SimEvent::BehaviorChanged {
                    behavior: Behavior::Charging,
                    ..
                } => charges += 1,
                SimEvent::Died { .. } => deaths += 1,
                _ => {}
            }
        }
        apply_report(&mut sim, &report);
    }

    log::info!(
        "{} ticks: {collisions} contacts, {arrows} arrows, {charges} charges, {deaths} deaths, {} entities left",
        sim.ticks,
        sim.registry.motions.len()
    );
}
