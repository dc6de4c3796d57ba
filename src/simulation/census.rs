//! Census - read-only population and gene statistics

use std::collections::BTreeMap;

use ahash::AHashMap;
use serde::Serialize;

use crate::core::types::Tick;
use crate::entity::species::SpeciesKind;
use crate::entity::stats::AgentStats;
use crate::world::World;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Census {
    pub tick: Tick,
    pub population: usize,
    pub max_population: usize,
    pub population_pressure: u8,
    pub per_species: AHashMap<SpeciesKind, usize>,
    /// Means over the whole population; zeroed when it is empty
    pub mean_stats: AgentStats,
    /// Mean value of every gene carried by at least one agent
    pub mean_genes: BTreeMap<String, f64>,
    pub max_generation: u32,
}

impl Census {
    pub fn take(world: &World) -> Self {
        let mut census = Census {
            tick: world.current_tick(),
            population: world.population(),
            max_population: world.get_max_population(),
            population_pressure: world.get_population_pressure(),
            mean_stats: AgentStats::new(0.0, 0.0, 0.0, 0.0),
            ..Default::default()
        };

        let mut stat_sums = [0.0f64; 4];
        let mut gene_sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
        let mut counted = 0usize;

        for agent in world.get_all_animals() {
            counted += 1;
            *census.per_species.entry(agent.species()).or_insert(0) += 1;
            census.max_generation = census.max_generation.max(agent.generation());

            let stats = agent.stats();
            stat_sums[0] += stats.health;
            stat_sums[1] += stats.energy;
            stat_sums[2] += stats.hunger;
            stat_sums[3] += stats.age;

            for gene in agent.genome().iter() {
                let entry = gene_sums.entry(gene.name().to_string()).or_insert((0.0, 0));
                entry.0 += gene.value();
                entry.1 += 1;
            }
        }

        if counted > 0 {
            let n = counted as f64;
            census.mean_stats = AgentStats {
                health: stat_sums[0] / n,
                energy: stat_sums[1] / n,
                hunger: stat_sums[2] / n,
                age: stat_sums[3] / n,
            };
        }
        census.mean_genes = gene_sums
            .into_iter()
            .map(|(name, (sum, count))| (name, sum / count as f64))
            .collect();

        census
    }

    pub fn species_count(&self, species: SpeciesKind) -> usize {
        self.per_species.get(&species).copied().unwrap_or(0)
    }

    pub fn mean_gene(&self, name: &str) -> Option<f64> {
        self.mean_genes.get(name).copied()
    }

    /// Multi-line human readable summary
    pub fn summary(&self) -> String {
        let mut out = format!(
            "tick {}: population {}/{} (pressure {})\n",
            self.tick, self.population, self.max_population, self.population_pressure
        );
        for species in SpeciesKind::ALL {
            out.push_str(&format!("  {:<10} {}\n", species.name(), self.species_count(species)));
        }
        out.push_str(&format!(
            "  health {:.1}  energy {:.1}  hunger {:.1}  age {:.1}  max generation {}\n",
            self.mean_stats.health,
            self.mean_stats.energy,
            self.mean_stats.hunger,
            self.mean_stats.age,
            self.max_generation
        ));
        for (name, mean) in &self.mean_genes {
            out.push_str(&format!("  {:<18} {:.3}\n", name, mean));
        }
        out
    }
}
