//! Genome - named gene set with mutation and sexual recombination
//!
//! Genes are kept in a name-ordered map. Mutation and recombination walk the
//! genes in that order, so the sequence of random draws (and the resulting
//! lineage) is fixed for a given seed.

use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use serde::Serialize;

use super::catalog::GeneCatalog;
use super::gene::{clamp01, Gene};

/// Maximum absolute change a single mutation applies to a gene value
pub const MUTATION_STEP: f64 = 0.1;

/// Probability thresholds for inheriting a gene carried by both parents
const TAKE_FIRST_PARENT: f64 = 0.4;
const TAKE_SECOND_PARENT: f64 = 0.8;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Genome {
    genes: BTreeMap<String, Gene>,
}

impl Genome {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a list of genes; later duplicates replace earlier ones
    pub fn from_genes(genes: impl IntoIterator<Item = Gene>) -> Self {
        let mut genome = Self::new();
        for gene in genes {
            genome.add(gene);
        }
        genome
    }

    /// Genome from the built-in catalog with selected defaults replaced
    pub fn create_standard(overrides: &[(&str, f64)]) -> Self {
        GeneCatalog::standard().create_genome(overrides)
    }

    pub fn get(&self, name: &str) -> Option<&Gene> {
        self.genes.get(name)
    }

    /// Gene value, or `fallback` when this genome lacks the gene
    pub fn value_or(&self, name: &str, fallback: f64) -> f64 {
        self.genes.get(name).map_or(fallback, Gene::value)
    }

    /// Insert a gene, replacing any gene with the same name
    pub fn add(&mut self, gene: Gene) {
        self.genes.insert(gene.name().to_string(), gene);
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.genes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Gene> + '_ {
        self.genes.values()
    }

    /// Copy with each gene independently perturbed by ±MUTATION_STEP
    ///
    /// A gene mutates with probability equal to its own mutation rate.
    pub fn mutate<R: Rng + ?Sized>(&self, rng: &mut R) -> Genome {
        let genes = self
            .genes
            .values()
            .map(|gene| {
                if rng.gen::<f64>() < gene.mutation_rate() {
                    let delta = rng.gen_range(-MUTATION_STEP..MUTATION_STEP);
                    gene.with_value(clamp01(gene.value() + delta))
                } else {
                    gene.clone()
                }
            })
            .map(|gene| (gene.name().to_string(), gene))
            .collect();

        Genome { genes }
    }

    /// Recombine two parents over the union of their gene names
    ///
    /// A gene carried by one parent is inherited verbatim. A gene carried by
    /// both comes from the first parent (40%), the second parent (40%), or is
    /// a blend of the two (20%).
    pub fn combine<R: Rng + ?Sized>(a: &Genome, b: &Genome, rng: &mut R) -> Genome {
        let names: BTreeSet<&str> = a.names().chain(b.names()).collect();
        let mut child = Genome::new();

        for name in names {
            let gene = match (a.get(name), b.get(name)) {
                (Some(ga), Some(gb)) => {
                    let roll: f64 = rng.gen();
                    if roll < TAKE_FIRST_PARENT {
                        ga.clone()
                    } else if roll < TAKE_SECOND_PARENT {
                        gb.clone()
                    } else {
                        ga.average(gb)
                    }
                }
                (Some(only), None) | (None, Some(only)) => only.clone(),
                (None, None) => continue,
            };
            child.add(gene);
        }

        child
    }
}
