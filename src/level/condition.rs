//! Declarative levels.
//!
//! A [LevelDefinition] is plain data (loadable from a level pack): which blocks must sit
//! where, where the agent starts and finishes, and which block marks the edge of the play
//! area. [ConditionLevel] turns that data into a [Level].

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::level::world::{BlockPos, World};
use crate::level::{Completion, Level, RecoveryKind};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockCondition {
    pub position: BlockPos,
    pub block: String,
}

impl BlockCondition {
    pub fn new(position: BlockPos, block: &str) -> Self {
        Self {
            position,
            block: block.to_string(),
        }
    }

    pub fn holds(&self, world: &dyn World) -> bool {
        world.block_at(self.position) == self.block
    }
}

/// A single block to place, e.g. the retry pressure plate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockPlacement {
    pub position: BlockPos,
    pub block: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FillRegion {
    pub from: BlockPos,
    pub to: BlockPos,
    pub block: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LevelDefinition {
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub hint: Option<String>,
    pub start: BlockPos,
    /// Tile where the agent ends an attempt.
    pub end: BlockPos,
    /// Standing on this block type means the agent left the play area.
    pub out_of_bounds_block: String,
    pub conditions: Vec<BlockCondition>,
    /// Placed after a wrong attempt so the player can retry at once.
    #[serde(default)]
    pub retry_trigger: Option<BlockPlacement>,
    /// Applied in order by `on_start`.
    #[serde(default)]
    pub setup: Vec<FillRegion>,
}

pub struct ConditionLevel {
    def: LevelDefinition,
}

impl ConditionLevel {
    pub fn new(def: LevelDefinition) -> Self {
        Self { def }
    }

    pub fn satisfied_count(&self, world: &dyn World) -> usize {
        self.def
            .conditions
            .iter()
            .filter(|c| c.holds(world))
            .count()
    }

    fn all_satisfied(&self, world: &dyn World) -> bool {
        self.def.conditions.iter().all(|c| c.holds(world))
    }

    fn out_of_bounds(&self, world: &dyn World) -> bool {
        world.block_at(world.agent_position().below()) == self.def.out_of_bounds_block
    }
}

impl Level for ConditionLevel {
    fn name(&self) -> &str {
        &self.def.name
    }

    fn on_start(&mut self, world: &mut dyn World) {
        for region in &self.def.setup {
            world.fill(region.from, region.to, &region.block);
        }
        world.teleport_agent(self.def.start);
        world.show_title(&self.def.title);
        world.broadcast(&format!("Level started: {}", self.def.title));
        info!("level '{}' started", self.def.name);
    }

    fn on_tick(&mut self, world: &mut dyn World) {
        let hud = match &self.def.hint {
            Some(hint) => format!(
                "{} ({}/{})",
                hint,
                self.satisfied_count(world),
                self.def.conditions.len()
            ),
            None => format!(
                "{}/{} blocks in place",
                self.satisfied_count(world),
                self.def.conditions.len()
            ),
        };
        world.set_hud(&hud);
    }

    fn on_complete(&mut self, world: &mut dyn World) {
        world.clear_hud();
        world.show_title("Level complete!");
        world.broadcast(&format!("{} complete!", self.def.title));
        info!("level '{}' complete", self.def.name);
    }

    /// Out of bounds wins over everything, then success, then a wrong attempt at the end
    /// tile. Anything else is "not attempted yet".
    fn check_completion(&mut self, world: &mut dyn World) -> Completion {
        if self.out_of_bounds(world) {
            debug!("level '{}': agent out of bounds at {}", self.def.name, world.agent_position());
            world.teleport_agent(self.def.start);
            world.show_title("Out of bounds!");
            world.broadcast("Your agent left the play area and was sent back to the start.");
            return Completion::Recovered(RecoveryKind::OutOfBounds);
        }
        if self.all_satisfied(world) {
            return Completion::Complete;
        }
        if world.agent_position() == self.def.end {
            debug!("level '{}': wrong arrangement at end tile", self.def.name);
            world.teleport_agent(self.def.start);
            world.show_title("Incorrect, try again");
            world.broadcast("That arrangement is not right yet. Try again.");
            if let Some(trigger) = &self.def.retry_trigger {
                world.set_block(trigger.position, &trigger.block);
            }
            return Completion::Recovered(RecoveryKind::IncorrectArrangement);
        }
        Completion::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::world::SimWorld;

    fn definition() -> LevelDefinition {
        LevelDefinition {
            name: "bridge".into(),
            title: "Build the bridge".into(),
            hint: None,
            start: BlockPos::new(0, 1, 0),
            end: BlockPos::new(0, 1, 3),
            out_of_bounds_block: "water".into(),
            conditions: vec![
                BlockCondition::new(BlockPos::new(0, 0, 1), "planks"),
                BlockCondition::new(BlockPos::new(0, 0, 2), "planks"),
            ],
            retry_trigger: Some(BlockPlacement {
                position: BlockPos::new(1, 0, 0),
                block: "pressure_plate".into(),
            }),
            setup: vec![FillRegion {
                from: BlockPos::new(-1, 0, 0),
                to: BlockPos::new(1, 0, 3),
                block: "water".into(),
            }],
        }
    }

    #[test]
    fn on_start_applies_setup_and_places_agent() {
        let mut world = SimWorld::new();
        let mut level = ConditionLevel::new(definition());
        level.on_start(&mut world);
        assert_eq!(world.block_at(BlockPos::new(1, 0, 3)), "water");
        assert_eq!(world.agent_position(), BlockPos::new(0, 1, 0));
        assert_eq!(world.titles(), ["Build the bridge".to_string()]);
    }

    #[test]
    fn hud_counts_satisfied_conditions() {
        let mut world = SimWorld::new();
        let mut level = ConditionLevel::new(definition());
        world.set_block(BlockPos::new(0, 0, 1), "planks");
        level.on_tick(&mut world);
        assert_eq!(world.hud(), Some("1/2 blocks in place"));
    }

    #[test]
    fn untouched_level_is_running() {
        let mut world = SimWorld::new();
        let mut level = ConditionLevel::new(definition());
        world.move_agent(BlockPos::new(0, 1, 1));
        assert_eq!(level.check_completion(&mut world), Completion::Running);
        assert_eq!(world.teleport_count(), 0);
    }
}
