//! Gene catalog - the table of traits every standard genome starts from
//!
//! The catalog is data, not code: species pick overrides against it and an
//! alternative table can be loaded from TOML:
//!
//! ```toml
//! [[gene]]
//! name = "size"
//! default = 0.5
//! mutation_rate = 0.1
//! ```

use std::path::Path;
use std::sync::OnceLock;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use super::gene::Gene;
use super::genome::Genome;
use crate::core::error::{Result, SimError};

/// Names of the standard traits
pub mod names {
    pub const SIZE: &str = "size";
    pub const SPEED: &str = "speed";
    pub const METABOLISM: &str = "metabolism";
    pub const VISION: &str = "vision";
    pub const INTELLIGENCE: &str = "intelligence";
    pub const AGGRESSION: &str = "aggression";
    pub const SOCIAL_BEHAVIOR: &str = "social_behavior";
    pub const FUR_COLOR: &str = "fur_color";
    pub const REPRODUCTIVE_URGE: &str = "reproductive_urge";
    pub const LIFESPAN: &str = "lifespan";
    pub const MATURITY_AGE: &str = "maturity_age";
    pub const FRIENDSHIP: &str = "friendship";
}

/// Mutation rate given to override genes the catalog does not list
pub const FALLBACK_MUTATION_RATE: f64 = 0.1;

/// One catalog row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneSpec {
    pub name: String,
    pub default: f64,
    pub mutation_rate: f64,
}

impl GeneSpec {
    fn new(name: &str, default: f64, mutation_rate: f64) -> Self {
        Self {
            name: name.to_string(),
            default,
            mutation_rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneCatalog {
    #[serde(rename = "gene")]
    genes: Vec<GeneSpec>,
}

static STANDARD: OnceLock<GeneCatalog> = OnceLock::new();

impl GeneCatalog {
    /// The built-in twelve-trait catalog
    pub fn standard() -> &'static GeneCatalog {
        STANDARD.get_or_init(|| {
            use names::*;
            GeneCatalog {
                genes: vec![
                    GeneSpec::new(SIZE, 0.5, 0.1),
                    GeneSpec::new(SPEED, 0.5, 0.1),
                    GeneSpec::new(METABOLISM, 0.5, 0.1),
                    GeneSpec::new(VISION, 0.5, 0.1),
                    GeneSpec::new(INTELLIGENCE, 0.5, 0.1),
                    GeneSpec::new(AGGRESSION, 0.3, 0.1),
                    GeneSpec::new(SOCIAL_BEHAVIOR, 0.5, 0.1),
                    GeneSpec::new(FUR_COLOR, 0.5, 0.2),
                    GeneSpec::new(REPRODUCTIVE_URGE, 0.5, 0.1),
                    GeneSpec::new(LIFESPAN, 0.5, 0.1),
                    GeneSpec::new(MATURITY_AGE, 0.5, 0.1),
                    GeneSpec::new(FRIENDSHIP, 0.5, 0.1),
                ],
            }
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let catalog: GeneCatalog = toml::from_str(content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = AHashSet::new();
        for spec in &self.genes {
            if !seen.insert(spec.name.as_str()) {
                return Err(SimError::Config(format!(
                    "gene '{}' is listed twice in the catalog",
                    spec.name
                )));
            }
            if !(0.0..=1.0).contains(&spec.default) || !(0.0..=1.0).contains(&spec.mutation_rate) {
                return Err(SimError::Config(format!(
                    "gene '{}' has default/mutation_rate outside [0, 1]",
                    spec.name
                )));
            }
        }
        Ok(())
    }

    pub fn specs(&self) -> &[GeneSpec] {
        &self.genes
    }

    pub fn get(&self, name: &str) -> Option<&GeneSpec> {
        self.genes.iter().find(|spec| spec.name == name)
    }

    /// Instantiate every catalog gene, replacing defaults named in `overrides`
    ///
    /// An override keeps the catalog mutation rate. Overrides for genes the
    /// catalog lacks are appended with FALLBACK_MUTATION_RATE.
    pub fn create_genome(&self, overrides: &[(&str, f64)]) -> Genome {
        let mut genome = Genome::from_genes(
            self.genes
                .iter()
                .map(|spec| Gene::new(spec.name.clone(), spec.default, spec.mutation_rate)),
        );

        for &(name, value) in overrides {
            let rate = self
                .get(name)
                .map_or(FALLBACK_MUTATION_RATE, |spec| spec.mutation_rate);
            genome.add(Gene::new(name, value, rate));
        }

        genome
    }
}
