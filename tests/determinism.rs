#![allow(clippy::unwrap_used)]

use glam::Vec2;
use grovekeep::Tuning;
use grovekeep::consts::FRAME_MS;
use grovekeep::sim::prefabs::{
    spawn_archer, spawn_barbarian, spawn_boar, spawn_player, spawn_rock, spawn_tree, trunk_mesh,
};
use grovekeep::sim::{ArrowSpawner, Simulation, TickReport};

fn arena(seed: u64) -> Simulation {
    let mut sim = Simulation::flat(Tuning::default(), seed).unwrap();
    let reg = &mut sim.registry;
    spawn_player(reg, Vec2::new(600.0, 400.0));
    spawn_barbarian(reg, Vec2::new(150.0, 150.0));
    spawn_barbarian(reg, Vec2::new(1050.0, 700.0));
    spawn_boar(reg, Vec2::new(380.0, 520.0));
    spawn_archer(reg, Vec2::new(1000.0, 150.0));
    spawn_rock(reg, Vec2::new(450.0, 300.0), Vec2::new(60.0, 50.0));
    let trunk = trunk_mesh().unwrap();
    for x in [250.0, 800.0] {
        spawn_tree(reg, Vec2::new(x, 450.0), Vec2::new(80.0, 140.0), trunk.clone());
    }
    sim
}

fn run(sim: &mut Simulation, ticks: usize) -> Vec<TickReport> {
    let mut spawner = ArrowSpawner::new(Tuning::default().ranged.arrow_hitbox);
    // Uneven frame times, as a real frame loop would produce
    let frames = [FRAME_MS, 15.0, 18.5, FRAME_MS, 33.3];
    (0..ticks)
        .map(|i| sim.tick(frames[i % frames.len()], &mut spawner))
        .collect()
}

#[test]
fn same_seed_same_world() {
    let mut a = arena(42);
    let mut b = arena(42);

    let reports_a = run(&mut a, 600);
    let reports_b = run(&mut b, 600);
    assert_eq!(reports_a, reports_b);

    let motions_a: Vec<_> = a.registry.motions.iter().map(|(e, m)| (e, m.clone())).collect();
    let motions_b: Vec<_> = b.registry.motions.iter().map(|(e, m)| (e, m.clone())).collect();
    assert_eq!(motions_a, motions_b);

    let states_a: Vec<_> = a.registry.archetypes.iter().map(|(e, s)| (e, *s)).collect();
    let states_b: Vec<_> = b.registry.archetypes.iter().map(|(e, s)| (e, *s)).collect();
    assert_eq!(states_a, states_b);
}

#[test]
fn different_seed_different_decisions() {
    let mut a = arena(1);
    let mut b = arena(2);
    run(&mut a, 30);
    run(&mut b, 30);

    // Repath intervals and windup jitter come from the seeded RNG
    let states_a: Vec<_> = a.registry.archetypes.iter().map(|(_, s)| *s).collect();
    let states_b: Vec<_> = b.registry.archetypes.iter().map(|(_, s)| *s).collect();
    assert_ne!(states_a, states_b);
}
