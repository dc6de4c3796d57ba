//! Tick driver - the single orchestration layer
//!
//! One tick runs, in order:
//! 1. `World::update` (every agent once, then grass regrowth)
//! 2. the disaster engine, when enabled
//! 3. population milestone check
//! 4. drain the tick's narration and hand it to the event log and sinks
//!
//! The driver owns the only random source. Pausing is simply not calling
//! `tick`.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::core::types::Tick;
use crate::genetics::GeneCatalog;
use crate::simulation::census::Census;
use crate::simulation::disaster::DisasterEngine;
use crate::simulation::events::{EventLog, EventSink, SimEvent};
use crate::world::{seed_population, World};

pub struct Simulation<R: Rng = ChaCha8Rng> {
    config: SimulationConfig,
    catalog: GeneCatalog,
    world: World,
    disasters: DisasterEngine,
    rng: R,
    event_log: EventLog,
    sinks: Vec<Box<dyn EventSink>>,
    /// Population divided by the milestone step, as of the last check
    milestone_bucket: usize,
}

impl Simulation<ChaCha8Rng> {
    /// Build a seeded world from `config`, using its seed
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> Simulation<R> {
    /// Build a seeded world from `config` with an injected random source
    pub fn with_rng(config: SimulationConfig, mut rng: R) -> Result<Self> {
        config.validate()?;
        let catalog = match &config.gene_catalog {
            Some(path) => GeneCatalog::load(path)?,
            None => GeneCatalog::standard().clone(),
        };

        let mut world = World::new(config.width, config.height, &mut rng);
        let placed = seed_population(
            &mut world,
            config.initial_population,
            config.social_fraction,
            &catalog,
            &mut rng,
        );
        tracing::info!(
            width = config.width,
            height = config.height,
            placed,
            capacity = world.get_max_population(),
            "simulation created"
        );

        Ok(Self::assemble(config, catalog, world, rng))
    }

    /// Drive an already populated world
    ///
    /// `config` still provides the disaster switch and narration settings;
    /// its size and seeding fields are ignored.
    pub fn from_world(config: SimulationConfig, world: World, rng: R) -> Self {
        Self::assemble(config, GeneCatalog::standard().clone(), world, rng)
    }

    fn assemble(config: SimulationConfig, catalog: GeneCatalog, world: World, rng: R) -> Self {
        let milestone_bucket = world.population() / config.milestone_step.max(1);
        Self {
            event_log: EventLog::new(config.event_log_capacity),
            config,
            catalog,
            world,
            disasters: DisasterEngine::new(),
            rng,
            sinks: Vec::new(),
            milestone_bucket,
        }
    }

    pub fn add_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn disasters(&self) -> &DisasterEngine {
        &self.disasters
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn catalog(&self) -> &GeneCatalog {
        &self.catalog
    }

    pub fn current_tick(&self) -> Tick {
        self.world.current_tick()
    }

    pub fn census(&self) -> Census {
        Census::take(&self.world)
    }

    /// Advance one step and return the narration it produced
    pub fn tick(&mut self) -> Vec<(Tick, SimEvent)> {
        self.world.update(&mut self.rng);
        if self.config.disasters_enabled {
            self.disasters.tick(&mut self.world, &mut self.rng);
        }
        self.check_milestone();

        let tick = self.world.current_tick();
        let events: Vec<(Tick, SimEvent)> = self
            .world
            .drain_events()
            .into_iter()
            .map(|event| (tick, event))
            .collect();

        for (stamp, event) in &events {
            self.event_log.record(*stamp, event);
            for sink in &mut self.sinks {
                sink.record(*stamp, event);
            }
        }

        tracing::debug!(
            tick,
            population = self.world.population(),
            pressure = self.world.get_population_pressure(),
            disaster = self.disasters.is_active(),
            events = events.len(),
            "tick complete"
        );

        events
    }

    /// Run `ticks` steps, returning how many events were narrated
    pub fn run(&mut self, ticks: u64) -> usize {
        let mut narrated = 0;
        for _ in 0..ticks {
            narrated += self.tick().len();
        }
        narrated
    }

    /// Narrate each crossing of a multiple of the milestone step
    fn check_milestone(&mut self) {
        let population = self.world.population();
        let bucket = population / self.config.milestone_step.max(1);
        if bucket != self.milestone_bucket {
            let rising = bucket > self.milestone_bucket;
            self.milestone_bucket = bucket;
            self.world.emit(SimEvent::PopulationMilestone { population, rising });
        }
    }
}
