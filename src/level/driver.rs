//! Level driver: owns the active level and advances it once per tick.
//!
//! Progress is a number store (the index of the current level). The driver resumes from it
//! on boot and increments it when a level completes. The next level is picked from the store
//! on the tick after completion, once the host has flushed the increment, so an operator
//! `set` of the progress store during play moves the driver too.

use log::{info, warn};

use crate::logutil::escape_log;
use crate::store::{PropertyAdapter, StoreRegistry};
use crate::level::world::World;
use crate::level::{Completion, Level, LevelState, RecoveryKind};

/// Builds a fresh instance of one level in the catalog.
pub type LevelFactory = Box<dyn Fn() -> Box<dyn Level>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A pending level just ran its `on_start`.
    Started,
    Running,
    Recovered(RecoveryKind),
    /// The level completed on this tick; `on_complete` ran and progress was queued.
    Completed,
    /// The next level in the catalog was loaded and is pending.
    Advanced,
    /// Every level in the catalog is done.
    AllComplete,
}

pub struct LevelDriver {
    catalog: Vec<LevelFactory>,
    progress_store: String,
    active: Option<(usize, Box<dyn Level>)>,
    state: LevelState,
}

impl LevelDriver {
    pub fn new(catalog: Vec<LevelFactory>, progress_store: &str) -> Self {
        Self {
            catalog,
            progress_store: progress_store.to_string(),
            active: None,
            state: LevelState::Pending,
        }
    }

    pub fn progress_store(&self) -> &str {
        &self.progress_store
    }

    pub fn state(&self) -> LevelState {
        self.state
    }

    pub fn level_count(&self) -> usize {
        self.catalog.len()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active.as_ref().map(|(i, _)| *i)
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active.as_ref().map(|(_, level)| level.name())
    }

    /// Load the level at `index` as pending. Past the end of the catalog nothing is active.
    pub fn load(&mut self, index: usize) {
        self.active = self.catalog.get(index).map(|make| (index, make()));
        self.state = LevelState::Pending;
        match self.active_name() {
            Some(name) => info!("loaded level {} '{}'", index, escape_log(name)),
            None => info!("no level at index {}; catalog finished", index),
        }
    }

    /// Pick the level from persisted progress. Missing or non-numeric progress starts at 0.
    pub fn resume<A: PropertyAdapter>(&mut self, registry: &StoreRegistry<A>) {
        let index = match registry.get(&self.progress_store) {
            Ok(value) => match value.as_number() {
                Some(n) if n.is_finite() && n >= 0.0 => n.floor() as usize,
                _ => {
                    warn!(
                        "progress store '{}' holds {}; starting from the first level",
                        escape_log(&self.progress_store),
                        value
                    );
                    0
                }
            },
            Err(e) => {
                warn!("progress unavailable ({}); starting from the first level", e);
                0
            }
        };
        self.load(index);
    }

    /// Move a pending level to running. No-op in any other state.
    pub fn start(&mut self, world: &mut dyn World) -> bool {
        if self.state != LevelState::Pending {
            return false;
        }
        let Some((_, level)) = self.active.as_mut() else {
            return false;
        };
        level.on_start(world);
        self.state = LevelState::Running;
        true
    }

    pub fn tick<A: PropertyAdapter>(
        &mut self,
        world: &mut dyn World,
        registry: &mut StoreRegistry<A>,
    ) -> TickOutcome {
        let Some((_, level)) = self.active.as_mut() else {
            return TickOutcome::AllComplete;
        };
        match self.state {
            LevelState::Pending => {
                level.on_start(world);
                self.state = LevelState::Running;
                TickOutcome::Started
            }
            LevelState::Running => {
                level.on_tick(world);
                match level.check_completion(world) {
                    Completion::Complete => {
                        level.on_complete(world);
                        self.state = LevelState::Completed;
                        if let Err(e) = registry.increment(&self.progress_store) {
                            warn!("could not record progress: {}", e);
                        }
                        TickOutcome::Completed
                    }
                    Completion::Recovered(kind) => TickOutcome::Recovered(kind),
                    Completion::Running => TickOutcome::Running,
                }
            }
            LevelState::Completed => {
                self.resume(registry);
                if self.active.is_some() {
                    TickOutcome::Advanced
                } else {
                    TickOutcome::AllComplete
                }
            }
        }
    }
}
