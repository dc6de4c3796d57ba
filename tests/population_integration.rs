//! Integration tests for the agent registry and the density feedback loop
//!
//! These tests verify:
//! - capacity is floor(width * height * 0.3) and overflow is rejected
//! - population pressure tracks the registry within [0, 10]
//! - dead agents leave the registry during the world update
//! - seeding never overfills the world

use evo_grid::core::types::GridPos;
use evo_grid::entity::{Agent, AgentStats, SpeciesKind};
use evo_grid::genetics::{GeneCatalog, Genome};
use evo_grid::simulation::{DeathCause, SimEvent};
use evo_grid::world::{seed_population, TileKind, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn herbivore(world: &mut World, pos: GridPos, stats: AgentStats) -> Agent {
    let id = world.allocate_id();
    Agent::new(id, SpeciesKind::Herbivore, Genome::create_standard(&[]), pos, stats)
}

#[test]
fn test_thirty_first_agent_is_rejected() {
    let mut world = World::uniform(10, 10, TileKind::Grass);
    assert_eq!(world.get_max_population(), 30);

    for i in 0..30 {
        let agent = herbivore(&mut world, GridPos::new(i % 10, i / 10), AgentStats::default());
        assert!(world.add_animal(agent), "agent {} should fit", i);
    }

    let extra = herbivore(&mut world, GridPos::new(5, 5), AgentStats::default());
    let extra_id = extra.id();
    assert!(!world.add_animal(extra));
    assert_eq!(world.population(), 30);
    assert!(world.get_animal(extra_id).is_none());
}

#[test]
fn test_pressure_rises_with_population() {
    let mut world = World::uniform(10, 10, TileKind::Grass);
    let mut previous = world.get_population_pressure();
    assert_eq!(previous, 0);

    for i in 0..30 {
        let agent = herbivore(&mut world, GridPos::new(i % 10, i / 10), AgentStats::default());
        world.add_animal(agent);
        let pressure = world.get_population_pressure();
        assert!(pressure >= previous, "pressure fell from {} to {}", previous, pressure);
        assert!(pressure <= 10);
        previous = pressure;
    }
    assert_eq!(previous, 10);
}

#[test]
fn test_removal_releases_pressure() {
    let mut world = World::uniform(10, 10, TileKind::Grass);
    let mut ids = Vec::new();
    for i in 0..30 {
        let agent = herbivore(&mut world, GridPos::new(i % 10, i / 10), AgentStats::default());
        ids.push(agent.id());
        world.add_animal(agent);
    }
    for id in &ids[..15] {
        world.remove_animal(*id);
    }
    assert_eq!(world.population(), 15);
    assert_eq!(world.get_population_pressure(), 5);
    assert!(world.get_all_animals().all(|a| !ids[..15].contains(&a.id())));
}

#[test]
fn test_starving_agent_gone_after_one_update() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut world = World::uniform(10, 10, TileKind::Grass);
    let starving = herbivore(&mut world, GridPos::new(2, 2), AgentStats::new(100.0, 50.0, 100.0, 10.0));
    let starving_id = starving.id();
    let healthy = herbivore(&mut world, GridPos::new(7, 7), AgentStats::new(100.0, 80.0, 10.0, 10.0));
    let healthy_id = healthy.id();
    world.add_animal(starving);
    world.add_animal(healthy);

    world.update(&mut rng);

    assert!(world.get_animal(starving_id).is_none());
    assert!(world.get_animal(healthy_id).is_some());
    assert_eq!(world.population(), 1);
    let deaths: Vec<_> = world
        .drain_events()
        .into_iter()
        .filter_map(|event| match event {
            SimEvent::Death { id, cause, .. } => Some((id, cause)),
            _ => None,
        })
        .collect();
    assert_eq!(deaths, vec![(starving_id, DeathCause::Starvation)]);
}

#[test]
fn test_population_never_exceeds_capacity() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut world = World::new(12, 12, &mut rng);
    let capacity = world.get_max_population();
    seed_population(&mut world, capacity, 0.5, GeneCatalog::standard(), &mut rng);

    for _ in 0..300 {
        world.update(&mut rng);
        assert!(world.population() <= capacity);
        assert!(world.get_population_pressure() <= 10);
        world.drain_events();
    }
}

#[test]
fn test_tiles_stay_in_bounds() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut world = World::new(15, 10, &mut rng);
    seed_population(&mut world, 40, 0.5, GeneCatalog::standard(), &mut rng);

    for _ in 0..150 {
        world.update(&mut rng);
        world.drain_events();
    }

    for pos in world.positions() {
        let food = world.get_tile(pos).unwrap().food_value();
        assert!((0.0..=10.0).contains(&food));
    }
    for agent in world.get_all_animals() {
        assert!(world.is_position_valid(agent.position()));
        let stats = agent.stats();
        for value in [stats.health, stats.energy, stats.hunger] {
            assert!((0.0..=100.0).contains(&value));
        }
    }
}
