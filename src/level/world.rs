//! World services consumed by levels: block queries, the agent, and on-screen text.
//!
//! [SimWorld] is a plain in-memory implementation used by the `play` command and tests.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub const AIR: &str = "air";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn below(&self) -> Self {
        Self::new(self.x, self.y.saturating_sub(1), self.z)
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

pub trait World {
    /// Block type id at `pos`; [AIR] where nothing was placed.
    fn block_at(&self, pos: BlockPos) -> String;
    fn set_block(&mut self, pos: BlockPos, block: &str);

    /// Fill the inclusive box spanned by `from` and `to`.
    fn fill(&mut self, from: BlockPos, to: BlockPos, block: &str) {
        for x in from.x.min(to.x)..=from.x.max(to.x) {
            for y in from.y.min(to.y)..=from.y.max(to.y) {
                for z in from.z.min(to.z)..=from.z.max(to.z) {
                    self.set_block(BlockPos::new(x, y, z), block);
                }
            }
        }
    }

    fn agent_position(&self) -> BlockPos;
    fn teleport_agent(&mut self, pos: BlockPos);

    fn show_title(&mut self, text: &str);
    fn set_hud(&mut self, text: &str);
    fn clear_hud(&mut self);
    /// Chat line to every participant.
    fn broadcast(&mut self, text: &str);
}

#[derive(Debug, Default)]
pub struct SimWorld {
    blocks: HashMap<BlockPos, String>,
    agent: BlockPos,
    hud: Option<String>,
    titles: Vec<String>,
    chat: Vec<String>,
    teleports: usize,
}

impl SimWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk the agent without the teleport bookkeeping.
    pub fn move_agent(&mut self, pos: BlockPos) {
        self.agent = pos;
    }

    pub fn hud(&self) -> Option<&str> {
        self.hud.as_deref()
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn teleport_count(&self) -> usize {
        self.teleports
    }

    /// Drain broadcast chat lines accumulated since the last call.
    pub fn take_chat(&mut self) -> Vec<String> {
        std::mem::take(&mut self.chat)
    }
}

impl World for SimWorld {
    fn block_at(&self, pos: BlockPos) -> String {
        self.blocks
            .get(&pos)
            .cloned()
            .unwrap_or_else(|| AIR.to_string())
    }

    fn set_block(&mut self, pos: BlockPos, block: &str) {
        if block == AIR {
            self.blocks.remove(&pos);
        } else {
            self.blocks.insert(pos, block.to_string());
        }
    }

    fn agent_position(&self) -> BlockPos {
        self.agent
    }

    fn teleport_agent(&mut self, pos: BlockPos) {
        self.agent = pos;
        self.teleports += 1;
    }

    fn show_title(&mut self, text: &str) {
        self.titles.push(text.to_string());
    }

    fn set_hud(&mut self, text: &str) {
        self.hud = Some(text.to_string());
    }

    fn clear_hud(&mut self) {
        self.hud = None;
    }

    fn broadcast(&mut self, text: &str) {
        self.chat.push(text.to_string());
    }
}
