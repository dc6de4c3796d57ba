//! Evo Grid - evolutionary agent simulation on a bounded 2-D grid
//!
//! Genetically encoded agents forage, hunt, court and breed on a tile grid.
//! Population density feeds back into their behavior, and random disasters
//! perturb the world. Runs are reproducible from a seed.

pub mod core;
pub mod entity;
pub mod genetics;
pub mod render;
pub mod simulation;
pub mod world;
