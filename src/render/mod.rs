//! Display-agnostic frames of the simulation
//!
//! This module is READ-ONLY - it never modifies simulation state. A frame is
//! a grid of cells plus a stats panel and the most recent narration; any
//! front end can draw it. `Frame::to_text` is the plain ASCII rendering.

pub mod colors;

use serde::Serialize;

use crate::core::types::GridPos;
use crate::entity::stats::STAT_MAX;
use crate::simulation::census::Census;
use crate::simulation::events::EventLog;
use crate::world::{TileKind, World};

use colors::{health_tint, species_color, tile_color, Color};

/// Grass at or above this stock is drawn as lush
const LUSH_GRASS: f64 = 5.0;

/// One grid position as drawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Cell {
    pub glyph: char,
    pub color: Color,
}

#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    pub tick: u64,
    pub width: u32,
    pub height: u32,
    /// Row-major cells
    pub cells: Vec<Cell>,
    pub stats_panel: Vec<String>,
    pub narration: Vec<String>,
}

impl Frame {
    pub fn capture(world: &World, census: &Census, log: &EventLog) -> Self {
        let mut cells: Vec<Cell> = world
            .positions()
            .map(|pos| terrain_cell(world, pos))
            .collect();

        // Lowest id is drawn when agents share a tile
        for agent in world.get_all_animals().collect::<Vec<_>>().into_iter().rev() {
            let pos = agent.position();
            let index = pos.y as usize * world.width() as usize + pos.x as usize;
            if let Some(cell) = cells.get_mut(index) {
                let health = (agent.stats().health / STAT_MAX) as f32;
                *cell = Cell {
                    glyph: agent.species().profile().glyph,
                    color: health_tint(species_color(agent.species()), health),
                };
            }
        }

        Self {
            tick: world.current_tick(),
            width: world.width(),
            height: world.height(),
            cells,
            stats_panel: census.summary().lines().map(str::to_string).collect(),
            narration: log
                .lines()
                .map(|(tick, line)| format!("[{:>5}] {}", tick, line))
                .collect(),
        }
    }

    pub fn cell(&self, pos: GridPos) -> Option<&Cell> {
        if pos.x < 0 || pos.y < 0 || pos.x as u32 >= self.width || pos.y as u32 >= self.height {
            return None;
        }
        self.cells.get(pos.y as usize * self.width as usize + pos.x as usize)
    }

    /// Plain ASCII rendering: grid, then stats, then narration
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() + self.height as usize + 256);
        for row in self.cells.chunks(self.width.max(1) as usize) {
            out.extend(row.iter().map(|cell| cell.glyph));
            out.push('\n');
        }
        for line in &self.stats_panel {
            out.push_str(line);
            out.push('\n');
        }
        for line in &self.narration {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

fn terrain_cell(world: &World, pos: GridPos) -> Cell {
    let Some(tile) = world.get_tile(pos) else {
        return Cell { glyph: ' ', color: colors::ROCK };
    };
    let glyph = match tile.kind {
        TileKind::Grass if tile.food_value() >= LUSH_GRASS => '"',
        TileKind::Grass => '.',
        TileKind::Water => '~',
        TileKind::Rock => '#',
    };
    Cell {
        glyph,
        color: tile_color(tile.kind, tile.food_value()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::agent::Agent;
    use crate::entity::species::SpeciesKind;
    use crate::entity::stats::AgentStats;
    use crate::genetics::Genome;
    use crate::simulation::events::{EventSink, SimEvent};

    #[test]
    fn test_capture_draws_terrain_and_agents() {
        let mut world = World::uniform(4, 3, TileKind::Grass);
        world.consume_food(GridPos::new(0, 0), 8.0);
        let id = world.allocate_id();
        world.add_animal(Agent::new(
            id,
            SpeciesKind::Social,
            Genome::create_standard(&[]),
            GridPos::new(2, 1),
            AgentStats::default(),
        ));

        let frame = Frame::capture(&world, &Census::take(&world), &EventLog::new(4));
        assert_eq!(frame.cell(GridPos::new(0, 0)).unwrap().glyph, '.');
        assert_eq!(frame.cell(GridPos::new(1, 0)).unwrap().glyph, '"');
        assert_eq!(frame.cell(GridPos::new(2, 1)).unwrap().glyph, 's');
        assert!(frame.cell(GridPos::new(4, 0)).is_none());

        let text = frame.to_text();
        let grid: Vec<&str> = text.lines().take(3).collect();
        assert_eq!(grid, vec![".\"\"\"", "\"\"s\"", "\"\"\"\""]);
    }

    #[test]
    fn test_capture_includes_narration() {
        let world = World::uniform(2, 2, TileKind::Water);
        let mut log = EventLog::new(4);
        log.record(7, &SimEvent::PopulationMilestone { population: 20, rising: true });
        let frame = Frame::capture(&world, &Census::take(&world), &log);
        assert_eq!(frame.narration, vec!["[    7] Population grew to 20"]);
        assert!(frame.to_text().ends_with("Population grew to 20\n"));
    }
}
