//! Initial population placement

use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::types::GridPos;
use crate::entity::agent::Agent;
use crate::entity::species::SpeciesKind;
use crate::entity::stats::{AgentStats, STAT_MAX};
use crate::genetics::GeneCatalog;
use crate::world::{TileKind, World};

/// Place up to `count` seeded agents on random non-rock tiles
///
/// Each agent is social with probability `social_fraction`, herbivore
/// otherwise. Returns how many agents were placed, which never exceeds the
/// world's capacity.
pub fn seed_population<R: Rng + ?Sized>(
    world: &mut World,
    count: usize,
    social_fraction: f64,
    catalog: &GeneCatalog,
    rng: &mut R,
) -> usize {
    let open: Vec<GridPos> = world
        .positions()
        .filter(|pos| world.get_tile(*pos).is_some_and(|tile| tile.kind != TileKind::Rock))
        .collect();
    if open.is_empty() {
        tracing::warn!("no habitable tiles, population not seeded");
        return 0;
    }

    let target = count.min(world.get_max_population());
    let mut placed = 0;
    for _ in 0..target {
        let Some(&position) = open.choose(rng) else {
            break;
        };
        let species = if rng.gen::<f64>() < social_fraction {
            SpeciesKind::Social
        } else {
            SpeciesKind::Herbivore
        };
        let stats = AgentStats::new(
            STAT_MAX,
            70.0 + rng.gen_range(0.0..30.0),
            rng.gen_range(10.0..30.0),
            rng.gen_range(0.0..30.0),
        );

        let id = world.allocate_id();
        let agent = Agent::new(id, species, species.standard_genome(catalog), position, stats);
        if !world.add_animal(agent) {
            break;
        }
        placed += 1;
    }

    tracing::debug!(placed, requested = count, "population seeded");
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_seed_respects_capacity() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut world = World::uniform(10, 10, TileKind::Grass);
        let placed = seed_population(&mut world, 500, 0.5, GeneCatalog::standard(), &mut rng);
        assert_eq!(placed, 30);
        assert_eq!(world.population(), 30);
    }

    #[test]
    fn test_seeded_stats_in_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut world = World::new(20, 20, &mut rng);
        seed_population(&mut world, 60, 0.5, GeneCatalog::standard(), &mut rng);

        for agent in world.get_all_animals() {
            let stats = agent.stats();
            assert_eq!(stats.health, 100.0);
            assert!((70.0..100.0).contains(&stats.energy));
            assert!((10.0..30.0).contains(&stats.hunger));
            assert!((0.0..30.0).contains(&stats.age));
            let tile = world.get_tile(agent.position()).unwrap();
            assert_ne!(tile.kind, TileKind::Rock);
        }
    }

    #[test]
    fn test_social_fraction_extremes() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut world = World::uniform(10, 10, TileKind::Water);
        seed_population(&mut world, 10, 1.0, GeneCatalog::standard(), &mut rng);
        assert!(world.get_all_animals().all(|a| a.species() == SpeciesKind::Social));

        let mut world = World::uniform(10, 10, TileKind::Grass);
        seed_population(&mut world, 10, 0.0, GeneCatalog::standard(), &mut rng);
        assert!(world.get_all_animals().all(|a| a.species() == SpeciesKind::Herbivore));
    }

    #[test]
    fn test_all_rock_world_stays_empty() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut world = World::uniform(6, 6, TileKind::Rock);
        assert_eq!(seed_population(&mut world, 5, 0.5, GeneCatalog::standard(), &mut rng), 0);
        assert_eq!(world.population(), 0);
    }
}
