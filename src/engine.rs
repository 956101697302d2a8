//! Game host: the single-threaded callback surface of the engine.
//!
//! The host is driven from outside by two kinds of events, chat lines and fixed-rate ticks.
//! Each callback runs to completion, and every callback ends by flushing the deferred store
//! writes. That flush is the only point where queued writes become visible, so within one
//! callback a `get` never observes a `set` made in the same callback.

use log::{debug, info};

use crate::config::Config;
use crate::console::{CommandConsole, ConsoleCommandParser};
use crate::level::{LevelDriver, LevelFactory, TickOutcome, World};
use crate::store::{PropertyAdapter, StoreError, StoreRegistry, StoreType};

pub struct GameHost<A: PropertyAdapter, W: World> {
    registry: StoreRegistry<A>,
    console: CommandConsole,
    driver: LevelDriver,
    world: W,
    booted: bool,
}

impl<A: PropertyAdapter, W: World> GameHost<A, W> {
    pub fn new(
        registry: StoreRegistry<A>,
        console: CommandConsole,
        driver: LevelDriver,
        world: W,
    ) -> Self {
        Self {
            registry,
            console,
            driver,
            world,
            booted: false,
        }
    }

    /// Wire up a host from configuration. Call [Self::boot] before feeding it events.
    pub fn from_config(config: &Config, adapter: A, world: W, catalog: Vec<LevelFactory>) -> Self {
        let parser = ConsoleCommandParser::new_with_prefix(Some(config.engine.effective_prefix()));
        let console =
            CommandConsole::new(parser).with_confirm_timeout(config.console.confirm_timeout());
        let driver = LevelDriver::new(catalog, &config.engine.progress_store);
        Self::new(StoreRegistry::new(adapter), console, driver, world)
    }

    /// Register the progress store, seed undefined slots and load the level the persisted
    /// progress points at. Extra stores must be registered before this.
    pub fn boot(&mut self) -> Result<(), StoreError> {
        let progress = self.driver.progress_store().to_string();
        self.registry.register_store(&progress, StoreType::Number)?;
        self.registry.register_to_world();
        self.driver.resume(&self.registry);
        self.booted = true;
        info!(
            "host booted: {} stores, {} levels, starting at {:?}",
            self.registry.get_stores().len(),
            self.driver.level_count(),
            self.driver.active_index()
        );
        Ok(())
    }

    /// Chat event. Responses are broadcast to the world and also returned.
    ///
    /// A console wipe leaves the registry uninitialized; the host re-seeds every store and
    /// restarts the driver from the reset progress before the callback returns.
    pub fn on_chat(&mut self, line: &str) -> Vec<String> {
        let responses = self.console.handle(&mut self.registry, line);
        for response in &responses {
            self.world.broadcast(response);
        }
        self.flush();
        if self.booted && !self.registry.is_initialized() {
            self.reseed();
        }
        responses
    }

    fn reseed(&mut self) {
        let seeded = self.registry.register_to_world();
        self.driver.resume(&self.registry);
        info!(
            "stores re-seeded after wipe ({} slots), restarting at {:?}",
            seeded,
            self.driver.active_index()
        );
    }

    /// Tick event.
    pub fn on_tick(&mut self) -> TickOutcome {
        let outcome = self.driver.tick(&mut self.world, &mut self.registry);
        self.flush();
        outcome
    }

    fn flush(&mut self) {
        if self.registry.pending_writes() > 0 {
            let report = self.registry.flush();
            debug!("end-of-callback flush: {:?}", report);
        }
    }

    pub fn registry(&self) -> &StoreRegistry<A> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut StoreRegistry<A> {
        &mut self.registry
    }

    pub fn driver(&self) -> &LevelDriver {
        &self.driver
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }
}
