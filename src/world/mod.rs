//! World - tile grid, agent registry and the density feedback loop

pub mod placement;
pub mod tile;

use std::collections::BTreeMap;

use rand::Rng;
use serde::Serialize;

use crate::core::types::{AgentId, Direction, GridPos, Tick};
use crate::entity::agent::{Agent, Lifecycle};
use crate::simulation::events::SimEvent;

pub use placement::seed_population;
pub use tile::{Tile, TileKind, MAX_FOOD};

/// Share of the tile count that can be occupied by agents
pub const CAPACITY_RATIO: f64 = 0.3;

/// Highest population pressure value
pub const MAX_PRESSURE: u8 = 10;

/// Pressure above which agents suffer environmental stress
pub const STRESS_THRESHOLD: u8 = 5;

/// How many rejected insertions may nudge pressure upward
const MAX_OVERFLOW_NUDGES: u32 = 5;

/// Aggregate view of the terrain
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TerrainStats {
    pub grass: usize,
    pub water: usize,
    pub rock: usize,
    pub total_food: f64,
    pub mean_grass_food: f64,
}

/// The simulated world
///
/// Owns every tile and every living agent. An agent is alive exactly as long
/// as it is registered here.
pub struct World {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
    agents: BTreeMap<AgentId, Agent>,
    /// Agent taken out of the registry while it runs its own update
    detached: Option<AgentId>,
    max_population: usize,
    population_pressure: u8,
    failed_inserts: u32,
    next_agent_id: u64,
    current_tick: Tick,
    pending_events: Vec<SimEvent>,
}

impl World {
    /// Create a world with a randomly seeded grid
    pub fn new<R: Rng + ?Sized>(width: u32, height: u32, rng: &mut R) -> Self {
        let tiles = (0..width as usize * height as usize)
            .map(|_| Tile::new(TileKind::roll(rng)))
            .collect();
        Self::from_tiles(width, height, tiles)
    }

    /// Create a world where every tile has the same kind
    pub fn uniform(width: u32, height: u32, kind: TileKind) -> Self {
        let tiles = vec![Tile::new(kind); width as usize * height as usize];
        Self::from_tiles(width, height, tiles)
    }

    fn from_tiles(width: u32, height: u32, tiles: Vec<Tile>) -> Self {
        let max_population = (width as f64 * height as f64 * CAPACITY_RATIO).floor() as usize;
        Self {
            width,
            height,
            tiles,
            agents: BTreeMap::new(),
            detached: None,
            max_population,
            population_pressure: 0,
            failed_inserts: 0,
            next_agent_id: 1,
            current_tick: 0,
            pending_events: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn current_tick(&self) -> Tick {
        self.current_tick
    }

    // === AGENT REGISTRY ===

    /// Reserve a fresh agent id
    pub fn allocate_id(&mut self) -> AgentId {
        let id = AgentId(self.next_agent_id);
        self.next_agent_id += 1;
        id
    }

    /// Register an agent; false when the world is at capacity
    pub fn add_animal(&mut self, agent: Agent) -> bool {
        if self.population() >= self.max_population {
            if self.failed_inserts < MAX_OVERFLOW_NUDGES {
                self.failed_inserts += 1;
                self.population_pressure = (self.population_pressure + 1).min(MAX_PRESSURE);
            }
            return false;
        }

        self.agents.insert(agent.id(), agent);
        self.failed_inserts = 0;
        self.recompute_pressure();
        true
    }

    /// Remove an agent if present
    pub fn remove_animal(&mut self, id: AgentId) -> Option<Agent> {
        let removed = self.agents.remove(&id);
        if removed.is_some() {
            self.recompute_pressure();
        }
        removed
    }

    pub fn get_animal(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    pub(crate) fn get_animal_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(&id)
    }

    /// Registered agents in registration order
    pub fn get_all_animals(&self) -> impl Iterator<Item = &Agent> + '_ {
        self.agents.values()
    }

    pub(crate) fn animals_mut(&mut self) -> impl Iterator<Item = &mut Agent> + '_ {
        self.agents.values_mut()
    }

    pub fn animal_ids(&self) -> Vec<AgentId> {
        self.agents.keys().copied().collect()
    }

    /// Living agents, including one mid-update
    pub fn population(&self) -> usize {
        self.agents.len() + usize::from(self.detached.is_some())
    }

    pub fn get_max_population(&self) -> usize {
        self.max_population
    }

    pub fn get_population_pressure(&self) -> u8 {
        self.population_pressure
    }

    fn recompute_pressure(&mut self) {
        let ratio = self.population() as f64 / self.max_population.max(1) as f64;
        self.population_pressure = ((ratio * 10.0).floor() as u8).min(MAX_PRESSURE);
    }

    /// Agents within a Manhattan radius of `center`
    pub fn get_animals_in_radius(&self, center: GridPos, radius: i32) -> Vec<&Agent> {
        self.agents
            .values()
            .filter(|agent| agent.position().manhattan(&center) <= radius)
            .collect()
    }

    // === GRID ===

    pub fn is_position_valid(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    fn index(&self, pos: GridPos) -> Option<usize> {
        self.is_position_valid(pos)
            .then(|| pos.y as usize * self.width as usize + pos.x as usize)
    }

    pub fn get_tile(&self, pos: GridPos) -> Option<Tile> {
        self.index(pos).map(|i| self.tiles[i])
    }

    pub(crate) fn tile_mut(&mut self, pos: GridPos) -> Option<&mut Tile> {
        self.index(pos).map(move |i| &mut self.tiles[i])
    }

    /// Position one step away, clamped to the grid
    pub fn step_clamped(&self, from: GridPos, direction: Direction) -> GridPos {
        let to = from.offset(direction);
        GridPos::new(
            to.x.clamp(0, self.width as i32 - 1),
            to.y.clamp(0, self.height as i32 - 1),
        )
    }

    /// Take up to `amount` food from the tile at `pos`
    ///
    /// Works on every tile kind; out-of-bounds positions yield nothing.
    pub fn consume_food(&mut self, pos: GridPos, amount: f64) -> f64 {
        self.tile_mut(pos).map_or(0.0, |tile| tile.take(amount))
    }

    /// All positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = GridPos> + '_ {
        let width = self.width as i32;
        (0..self.tiles.len() as i32).map(move |i| GridPos::new(i % width, i / width))
    }

    pub fn grass_positions(&self) -> Vec<GridPos> {
        self.positions()
            .zip(self.tiles.iter())
            .filter(|(_, tile)| tile.is_grass())
            .map(|(pos, _)| pos)
            .collect()
    }

    pub(crate) fn grass_tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile> + '_ {
        self.tiles.iter_mut().filter(|tile| tile.is_grass())
    }

    pub fn get_terrain_stats(&self) -> TerrainStats {
        let mut stats = TerrainStats::default();
        let mut grass_food = 0.0;
        for tile in &self.tiles {
            match tile.kind {
                TileKind::Grass => {
                    stats.grass += 1;
                    grass_food += tile.food_value();
                }
                TileKind::Water => stats.water += 1,
                TileKind::Rock => stats.rock += 1,
            }
            stats.total_food += tile.food_value();
        }
        if stats.grass > 0 {
            stats.mean_grass_food = grass_food / stats.grass as f64;
        }
        stats
    }

    // === EVENTS ===

    pub fn emit(&mut self, event: SimEvent) {
        self.pending_events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // === TICK ===

    /// Advance every agent once, then regrow grass
    ///
    /// Agents are visited in registration order. Agents born during this
    /// pass wait until the next tick for their first update.
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.current_tick += 1;

        for id in self.animal_ids() {
            // Killed earlier in this pass
            let Some(mut agent) = self.agents.remove(&id) else {
                continue;
            };
            self.detached = Some(id);

            if self.population_pressure > STRESS_THRESHOLD {
                agent.apply_environmental_stress(self.population_pressure, rng);
            }
            let fate = agent.update(self, rng);

            self.detached = None;
            match fate {
                Lifecycle::Alive => {
                    self.agents.insert(id, agent);
                }
                Lifecycle::Died(cause) => {
                    tracing::trace!(agent = %id, ?cause, "agent died");
                    self.emit(SimEvent::Death {
                        id,
                        species: agent.species(),
                        cause,
                        age: agent.stats().age,
                    });
                    self.recompute_pressure();
                }
            }
        }

        self.regrow();
    }

    /// Passive grass regrowth, slower under crowding
    fn regrow(&mut self) {
        let rate = (0.1 - self.population_pressure as f64 * 0.01).max(0.01);
        for tile in self.grass_tiles_mut() {
            tile.grow(rate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::species::SpeciesKind;
    use crate::entity::stats::AgentStats;
    use crate::genetics::Genome;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn spawn(world: &mut World, pos: GridPos) -> Option<AgentId> {
        let id = world.allocate_id();
        let agent = Agent::new(
            id,
            SpeciesKind::Herbivore,
            Genome::create_standard(&[]),
            pos,
            AgentStats::default(),
        );
        world.add_animal(agent).then_some(id)
    }

    #[test]
    fn test_capacity_of_ten_by_ten() {
        let mut world = World::uniform(10, 10, TileKind::Grass);
        assert_eq!(world.get_max_population(), 30);

        for i in 0..30 {
            assert!(spawn(&mut world, GridPos::new(i % 10, i / 10)).is_some());
        }
        assert!(spawn(&mut world, GridPos::new(0, 0)).is_none());
        assert_eq!(world.population(), 30);
        assert_eq!(world.get_population_pressure(), 10);
    }

    #[test]
    fn test_pressure_is_monotonic_while_filling() {
        let mut world = World::uniform(10, 10, TileKind::Grass);
        let mut last = world.get_population_pressure();
        for _ in 0..30 {
            spawn(&mut world, GridPos::new(1, 1));
            let pressure = world.get_population_pressure();
            assert!(pressure >= last);
            assert!(pressure <= MAX_PRESSURE);
            last = pressure;
        }
        // 15 of 30 agents gives pressure 5
        let mut half = World::uniform(10, 10, TileKind::Grass);
        for _ in 0..15 {
            spawn(&mut half, GridPos::new(1, 1));
        }
        assert_eq!(half.get_population_pressure(), 5);
    }

    #[test]
    fn test_rejection_nudges_pressure_with_cap() {
        // 4x4 world: capacity 4
        let mut world = World::uniform(4, 4, TileKind::Grass);
        for _ in 0..3 {
            spawn(&mut world, GridPos::new(0, 0));
        }
        assert_eq!(world.get_population_pressure(), 7);
        spawn(&mut world, GridPos::new(0, 0));
        assert_eq!(world.get_population_pressure(), 10);

        // Already saturated: rejections cannot exceed the maximum
        for _ in 0..8 {
            assert!(spawn(&mut world, GridPos::new(0, 0)).is_none());
        }
        assert_eq!(world.get_population_pressure(), MAX_PRESSURE);
        assert_eq!(world.failed_inserts, MAX_OVERFLOW_NUDGES);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut world = World::uniform(10, 10, TileKind::Grass);
        let id = spawn(&mut world, GridPos::new(2, 2)).unwrap();
        assert!(world.remove_animal(id).is_some());
        assert!(world.remove_animal(id).is_none());
        assert!(world.get_all_animals().all(|a| a.id() != id));
        assert_eq!(world.population(), 0);
    }

    #[test]
    fn test_out_of_bounds_queries() {
        let mut world = World::uniform(5, 4, TileKind::Grass);
        assert!(world.is_position_valid(GridPos::new(4, 3)));
        assert!(!world.is_position_valid(GridPos::new(5, 0)));
        assert!(!world.is_position_valid(GridPos::new(0, -1)));
        assert!(world.get_tile(GridPos::new(-1, 2)).is_none());
        assert_eq!(world.consume_food(GridPos::new(9, 9), 5.0), 0.0);
    }

    #[test]
    fn test_consume_food_any_kind() {
        let mut world = World::uniform(3, 3, TileKind::Water);
        let pos = GridPos::new(1, 1);
        assert_eq!(world.consume_food(pos, 4.0), 4.0);
        assert_eq!(world.consume_food(pos, 4.0), 1.0);
        assert_eq!(world.get_tile(pos).unwrap().food_value(), 0.0);

        let mut rocks = World::uniform(3, 3, TileKind::Rock);
        assert_eq!(rocks.consume_food(pos, 4.0), 0.0);
    }

    #[test]
    fn test_step_clamped_at_edges() {
        let world = World::uniform(5, 5, TileKind::Grass);
        let corner = GridPos::new(0, 0);
        assert_eq!(world.step_clamped(corner, Direction::North), corner);
        assert_eq!(world.step_clamped(corner, Direction::West), corner);
        assert_eq!(world.step_clamped(corner, Direction::East), GridPos::new(1, 0));
        let far = GridPos::new(4, 4);
        assert_eq!(world.step_clamped(far, Direction::South), far);
    }

    #[test]
    fn test_radius_query_uses_manhattan() {
        let mut world = World::uniform(10, 10, TileKind::Grass);
        spawn(&mut world, GridPos::new(5, 5));
        spawn(&mut world, GridPos::new(6, 6));
        spawn(&mut world, GridPos::new(7, 6));
        let near = world.get_animals_in_radius(GridPos::new(5, 5), 2);
        assert_eq!(near.len(), 2);
    }

    #[test]
    fn test_regrowth_only_on_grass() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut world = World::new(8, 8, &mut rng);
        for pos in world.positions().collect::<Vec<_>>() {
            if let Some(tile) = world.tile_mut(pos) {
                tile.set_food(1.0);
            }
        }
        world.update(&mut rng);
        for pos in world.positions() {
            let tile = world.get_tile(pos).unwrap();
            match tile.kind {
                TileKind::Grass => assert!((tile.food_value() - 1.1).abs() < 1e-9),
                _ => assert_eq!(tile.food_value(), 1.0),
            }
        }
    }

    #[test]
    fn test_regrowth_slows_under_pressure() {
        let mut world = World::uniform(4, 4, TileKind::Grass);
        world.population_pressure = 10;
        world.tile_mut(GridPos::new(0, 0)).unwrap().set_food(5.0);
        world.regrow();
        assert!((world.get_tile(GridPos::new(0, 0)).unwrap().food_value() - 5.01).abs() < 1e-9);
    }

    #[test]
    fn test_terrain_stats() {
        let world = World::uniform(4, 5, TileKind::Grass);
        let stats = world.get_terrain_stats();
        assert_eq!(stats.grass, 20);
        assert_eq!(stats.water + stats.rock, 0);
        assert_eq!(stats.total_food, 200.0);
        assert_eq!(stats.mean_grass_food, 10.0);
    }

    #[test]
    fn test_starved_agent_removed_on_update() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut world = World::uniform(10, 10, TileKind::Grass);
        let id = world.allocate_id();
        let agent = Agent::new(
            id,
            SpeciesKind::Herbivore,
            Genome::create_standard(&[]),
            GridPos::new(3, 3),
            AgentStats::new(100.0, 50.0, 100.0, 10.0),
        );
        assert!(world.add_animal(agent));

        world.update(&mut rng);

        assert!(world.get_all_animals().all(|a| a.id() != id));
        let events = world.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            SimEvent::Death { id: dead, cause: crate::simulation::events::DeathCause::Starvation, .. } if *dead == id
        )));
    }
}
