//! A single heritable trait

use serde::{Deserialize, Serialize};

/// Named trait value with its own mutation probability
///
/// Both numbers are clamped to [0, 1] on construction and stay there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawGene")]
pub struct Gene {
    name: String,
    value: f64,
    mutation_rate: f64,
}

#[derive(Deserialize)]
struct RawGene {
    name: String,
    value: f64,
    mutation_rate: f64,
}

impl From<RawGene> for Gene {
    fn from(raw: RawGene) -> Self {
        Gene::new(raw.name, raw.value, raw.mutation_rate)
    }
}

impl Gene {
    pub fn new(name: impl Into<String>, value: f64, mutation_rate: f64) -> Self {
        Self {
            name: name.into(),
            value: clamp01(value),
            mutation_rate: clamp01(mutation_rate),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    /// Same gene with a different value, mutation rate kept
    pub fn with_value(&self, value: f64) -> Self {
        Self::new(self.name.clone(), value, self.mutation_rate)
    }

    /// Blend of two alleles: mean value and mean mutation rate
    pub fn average(&self, other: &Gene) -> Self {
        Self::new(
            self.name.clone(),
            (self.value + other.value) / 2.0,
            (self.mutation_rate + other.mutation_rate) / 2.0,
        )
    }
}

pub(crate) fn clamp01(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}
