//! # Blockpuzzle - Puzzle Levels over a Typed World Store
//!
//! Blockpuzzle runs block-placement puzzle levels inside a host world and keeps player
//! progress in typed, named properties that survive restarts.
//!
//! ## Features
//!
//! - **Typed Store Registry**: Named string/number/boolean slots over an untyped property map,
//!   with idempotent registration and type checks on every write.
//! - **Deferred Writes**: Store writes are queued and applied at the end of each host callback.
//! - **Operator Console**: `!get`, `!set`, `!listStores` and a two-step `!deleteStores` wipe,
//!   typed straight into chat.
//! - **Level State Machine**: `Pending -> Running -> Completed` with explicit out-of-bounds and
//!   wrong-arrangement recovery.
//! - **Level Packs**: Declarative levels loaded from JSON.
//!
//! ## Quick Start
//!
//! ```rust
//! use blockpuzzle::level::{builtin_levels, catalog_from_definitions, SimWorld};
//! use blockpuzzle::store::{MemoryProperties, StoreValue};
//! use blockpuzzle::{config::Config, engine::GameHost};
//!
//! let mut host = GameHost::from_config(
//!     &Config::default(),
//!     MemoryProperties::new(),
//!     SimWorld::new(),
//!     catalog_from_definitions(builtin_levels()),
//! );
//! host.boot().expect("boot");
//! host.on_tick();
//! assert_eq!(host.on_chat("!get level"), vec!["level: 0"]);
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - Typed registry, deferred write queue and persistence adapters
//! - [`console`] - Chat command parser and operator console
//! - [`level`] - Level trait, declarative levels, driver and world services
//! - [`engine`] - Host callbacks tying the pieces together
//! - [`config`] - Configuration management
//! - [`logutil`] - Log-safe escaping of chat text
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────┐
//! │  Level Driver   │     │ Command Console │ ← tick / chat callbacks
//! └─────────────────┘     └─────────────────┘
//!          │                       │
//! ┌─────────────────────────────────────────┐
//! │          Typed Store Registry           │ ← type contract, write queue
//! └─────────────────────────────────────────┘
//!          │
//! ┌─────────────────┐
//! │ Property Adapter│ ← sled or in-memory
//! └─────────────────┘
//! ```

pub mod config;
pub mod console;
pub mod engine;
pub mod level;
pub mod logutil;
pub mod store;
