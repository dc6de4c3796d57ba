//! Heritable traits: genes, genomes and the standard catalog

pub mod catalog;
pub mod gene;
pub mod genome;

pub use catalog::{names, GeneCatalog, GeneSpec};
pub use gene::Gene;
pub use genome::Genome;
