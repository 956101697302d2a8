//! Puzzle levels and the state machine that runs them.
//!
//! A level is anything implementing [Level]. The [driver::LevelDriver] owns the active level
//! and moves it through `Pending -> Running -> Completed`; failures never leave `Running`,
//! they are recovered inside [Level::check_completion] and reported through [Completion].
//!
//! ## Module Organization
//!
//! - [world] - world services consumed by levels, plus the in-memory [world::SimWorld]
//! - [condition] - declarative levels built from `{position, block}` checks
//! - [driver] - the per-tick state machine and level catalog
//! - [pack] - JSON level packs and the built-in demo levels

pub mod condition;
pub mod driver;
pub mod pack;
pub mod world;

pub use condition::{BlockCondition, BlockPlacement, ConditionLevel, FillRegion, LevelDefinition};
pub use driver::{LevelDriver, LevelFactory, TickOutcome};
pub use pack::{builtin_levels, catalog_from_definitions, load_levels_from_json, LevelPackError};
pub use world::{BlockPos, SimWorld, World, AIR};

/// Why a running level had to put the agent back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryKind {
    /// The agent stepped onto a disqualifying tile.
    OutOfBounds,
    /// The agent reached the end tile but the arrangement was wrong.
    IncorrectArrangement,
}

/// Result of a completion check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Complete,
    /// Not attempted yet; nothing to do.
    Running,
    /// The check already performed its recovery side effects.
    Recovered(RecoveryKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelState {
    Pending,
    Running,
    Completed,
}

pub trait Level {
    fn name(&self) -> &str;

    /// One-time setup when the level becomes active.
    fn on_start(&mut self, world: &mut dyn World);

    /// Passive per-tick feedback (HUD text).
    fn on_tick(&mut self, world: &mut dyn World);

    /// Called exactly once, when [Self::check_completion] first reports [Completion::Complete].
    fn on_complete(&mut self, world: &mut dyn World);

    fn check_completion(&mut self, world: &mut dyn World) -> Completion;
}
