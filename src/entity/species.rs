//! Species tags and their static profiles
//!
//! A species is a closed tag. Everything that distinguishes one species from
//! another (diet, mating style, starting genome) lives in its profile row.

use serde::{Deserialize, Serialize};

use crate::genetics::{names, GeneCatalog, Genome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SpeciesKind {
    /// Grazer that never hunts and mates on contact
    Herbivore,
    /// Herd animal that courts before mating and hunts other species when pressed
    Social,
}

/// Per-species configuration
#[derive(Debug)]
pub struct SpeciesProfile {
    pub name: &'static str,
    pub glyph: char,
    /// Whether hunting branches of the decision tree are open to this species
    pub predatory: bool,
    /// Whether mating goes through the multi-tick courtship protocol
    pub courtship: bool,
    /// Catalog defaults this species replaces
    pub gene_overrides: &'static [(&'static str, f64)],
}

static HERBIVORE: SpeciesProfile = SpeciesProfile {
    name: "herbivore",
    glyph: 'h',
    predatory: false,
    courtship: false,
    gene_overrides: &[
        (names::AGGRESSION, 0.1),
        (names::SOCIAL_BEHAVIOR, 0.4),
        (names::REPRODUCTIVE_URGE, 0.65),
    ],
};

static SOCIAL: SpeciesProfile = SpeciesProfile {
    name: "social",
    glyph: 's',
    predatory: true,
    courtship: true,
    gene_overrides: &[
        (names::SOCIAL_BEHAVIOR, 0.8),
        (names::FRIENDSHIP, 0.6),
        (names::REPRODUCTIVE_URGE, 0.7),
        (names::INTELLIGENCE, 0.6),
    ],
};

impl SpeciesKind {
    pub const ALL: [SpeciesKind; 2] = [SpeciesKind::Herbivore, SpeciesKind::Social];

    pub fn profile(&self) -> &'static SpeciesProfile {
        match self {
            SpeciesKind::Herbivore => &HERBIVORE,
            SpeciesKind::Social => &SOCIAL,
        }
    }

    pub fn name(&self) -> &'static str {
        self.profile().name
    }

    pub fn is_predatory(&self) -> bool {
        self.profile().predatory
    }

    pub fn uses_courtship(&self) -> bool {
        self.profile().courtship
    }

    /// Starting genome for a seeded member of this species
    pub fn standard_genome(&self, catalog: &GeneCatalog) -> Genome {
        catalog.create_genome(self.profile().gene_overrides)
    }
}

impl std::fmt::Display for SpeciesKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
