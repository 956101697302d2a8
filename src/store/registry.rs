//! Typed store registry.
//!
//! The registry owns the list of declared slots and is the only place the type contract
//! is enforced; the adapter underneath will store anything. Reads go straight to the
//! adapter, writes are queued (see [crate::store::queue]) and become visible after
//! [StoreRegistry::flush].

use std::collections::HashMap;

use log::{debug, info, warn};

use crate::logutil::escape_log;
use crate::store::adapter::PropertyAdapter;
use crate::store::errors::StoreError;
use crate::store::queue::{FlushReport, PendingWrite, WriteQueue};
use crate::store::value::{StoreDescriptor, StoreType, StoreValue};

pub struct StoreRegistry<A: PropertyAdapter> {
    adapter: A,
    descriptors: Vec<StoreDescriptor>,
    index: HashMap<String, usize>,
    initialized: bool,
    queue: WriteQueue,
}

impl<A: PropertyAdapter> StoreRegistry<A> {
    pub fn new(adapter: A) -> Self {
        Self {
            adapter,
            descriptors: Vec::new(),
            index: HashMap::new(),
            initialized: false,
            queue: WriteQueue::new(),
        }
    }

    /// Declare a slot.
    ///
    /// Registering a name again with the same type is a no-op. Registering it with a
    /// different type is rejected and the original declaration is kept.
    pub fn register_store(&mut self, name: &str, declared_type: StoreType) -> Result<(), StoreError> {
        if let Some(&i) = self.index.get(name) {
            let existing = self.descriptors[i].declared_type;
            if existing == declared_type {
                debug!("store '{}' already registered", escape_log(name));
                return Ok(());
            }
            return Err(StoreError::DuplicateStore {
                name: name.to_string(),
                existing,
            });
        }
        self.index.insert(name.to_string(), self.descriptors.len());
        self.descriptors.push(StoreDescriptor::new(name, declared_type));
        Ok(())
    }

    /// Seed the zero value into every registered slot that has no persisted value yet.
    ///
    /// A failed read counts as "not yet defined". Defined slots are never touched, so this
    /// is safe to run on every start. Returns the number of slots seeded.
    pub fn register_to_world(&mut self) -> usize {
        let mut seeded = 0usize;
        for desc in &self.descriptors {
            let defined = match self.adapter.get(&desc.name) {
                Ok(v) => v.is_some(),
                Err(e) => {
                    warn!("read of '{}' failed, treating as undefined: {}", escape_log(&desc.name), e);
                    false
                }
            };
            if defined {
                continue;
            }
            match self.adapter.set(&desc.name, &desc.declared_type.zero_value()) {
                Ok(()) => seeded += 1,
                Err(e) => warn!("could not seed '{}': {}", escape_log(&desc.name), e),
            }
        }
        self.initialized = true;
        info!(
            "registered {} stores with the world ({} seeded)",
            self.descriptors.len(),
            seeded
        );
        seeded
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn descriptor(&self, name: &str) -> Option<&StoreDescriptor> {
        self.index.get(name).map(|&i| &self.descriptors[i])
    }

    /// Registered slots in registration order.
    pub fn get_stores(&self) -> &[StoreDescriptor] {
        &self.descriptors
    }

    /// Queue a type-checked write. Not visible to [Self::get] until the next flush.
    pub fn set(&mut self, name: &str, value: impl Into<StoreValue>) -> Result<(), StoreError> {
        let value = value.into();
        let Some(desc) = self.descriptor(name) else {
            warn!("rejected write to unregistered store '{}'", escape_log(name));
            return Err(StoreError::UndefinedStore(name.to_string()));
        };
        let found = value.store_type();
        if found != desc.declared_type {
            warn!(
                "rejected write to '{}': expected {}, got {}",
                escape_log(name),
                desc.declared_type,
                found
            );
            return Err(StoreError::TypeMismatch {
                name: name.to_string(),
                expected: desc.declared_type,
                found,
            });
        }
        self.queue.push(PendingWrite::Set {
            name: name.to_string(),
            value,
        });
        Ok(())
    }

    /// Current persisted value. Never-written slots and failed reads both yield
    /// [StoreError::NotDefined]; an empty string is a value, not absence.
    pub fn get(&self, name: &str) -> Result<StoreValue, StoreError> {
        if self.descriptor(name).is_none() {
            return Err(StoreError::UndefinedStore(name.to_string()));
        }
        match self.adapter.get(name) {
            Ok(Some(value)) => Ok(value),
            Ok(None) => Err(StoreError::NotDefined(name.to_string())),
            Err(e) => {
                warn!("read of '{}' failed: {}", escape_log(name), e);
                Err(StoreError::NotDefined(name.to_string()))
            }
        }
    }

    /// Queue a +1 on a number slot. The read happens at flush time, so consecutive
    /// increments in one callback all land. Slots declared as something other than a
    /// number are left alone.
    pub fn increment(&mut self, name: &str) -> Result<(), StoreError> {
        let Some(desc) = self.descriptor(name) else {
            return Err(StoreError::UndefinedStore(name.to_string()));
        };
        if desc.declared_type != StoreType::Number {
            debug!("increment of '{}' ignored: declared {}", escape_log(name), desc.declared_type);
            return Ok(());
        }
        self.queue.push(PendingWrite::Increment {
            name: name.to_string(),
        });
        Ok(())
    }

    pub fn pending_writes(&self) -> usize {
        self.queue.len()
    }

    /// Apply every queued write. Called by the host at the end of each callback.
    pub fn flush(&mut self) -> FlushReport {
        if self.queue.is_empty() {
            return FlushReport::default();
        }
        let report = self.queue.flush(&self.adapter);
        debug!(
            "flushed writes: {} applied, {} skipped, {} failed",
            report.applied, report.skipped, report.failed
        );
        report
    }

    /// Wipe every persisted property (registered or not) and any queued writes.
    /// Descriptors survive; slots read as not defined until the next
    /// [Self::register_to_world].
    pub fn clear_all(&mut self) -> Result<(), StoreError> {
        let dropped = self.queue.discard();
        self.adapter.clear_all()?;
        self.initialized = false;
        info!("cleared all world properties ({} queued writes dropped)", dropped);
        Ok(())
    }

    /// Every descriptor with its current value, `None` when not defined.
    pub fn snapshot(&self) -> Vec<(StoreDescriptor, Option<StoreValue>)> {
        self.descriptors
            .iter()
            .map(|d| (d.clone(), self.get(&d.name).ok()))
            .collect()
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::adapter::MemoryProperties;

    /// Adapter whose reads always fail, as an unreachable backend would.
    struct BrokenReads(MemoryProperties);

    impl PropertyAdapter for BrokenReads {
        fn get(&self, _name: &str) -> Result<Option<StoreValue>, StoreError> {
            Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "backend unavailable",
            )))
        }
        fn set(&self, name: &str, value: &StoreValue) -> Result<(), StoreError> {
            self.0.set(name, value)
        }
        fn clear_all(&self) -> Result<(), StoreError> {
            self.0.clear_all()
        }
    }

    fn registry() -> StoreRegistry<MemoryProperties> {
        let mut reg = StoreRegistry::new(MemoryProperties::new());
        reg.register_store("level", StoreType::Number).unwrap();
        reg.register_store("player_name", StoreType::String).unwrap();
        reg.register_store("tutorial_done", StoreType::Boolean).unwrap();
        reg
    }

    #[test]
    fn register_to_world_seeds_zero_values() {
        let mut reg = registry();
        assert!(!reg.is_initialized());
        assert_eq!(reg.register_to_world(), 3);
        assert!(reg.is_initialized());
        assert_eq!(reg.get("level").unwrap(), StoreValue::Number(0.0));
        assert_eq!(reg.get("player_name").unwrap(), StoreValue::from(""));
        assert_eq!(reg.get("tutorial_done").unwrap(), StoreValue::Boolean(false));
    }

    #[test]
    fn register_to_world_keeps_existing_values() {
        let mut reg = registry();
        reg.adapter().set("level", &StoreValue::Number(4.0)).unwrap();
        assert_eq!(reg.register_to_world(), 2);
        assert_eq!(reg.register_to_world(), 0);
        assert_eq!(reg.get("level").unwrap(), StoreValue::Number(4.0));
    }

    #[test]
    fn duplicate_registration_policy() {
        let mut reg = registry();
        reg.register_store("level", StoreType::Number).unwrap();
        let err = reg.register_store("level", StoreType::String).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateStore { existing: StoreType::Number, .. }));
        assert_eq!(reg.get_stores().len(), 3);
        assert_eq!(reg.descriptor("level").unwrap().declared_type, StoreType::Number);
    }

    #[test]
    fn set_is_deferred_until_flush() {
        let mut reg = registry();
        reg.register_to_world();
        reg.set("level", 3).unwrap();
        assert_eq!(reg.get("level").unwrap(), StoreValue::Number(0.0));
        assert_eq!(reg.pending_writes(), 1);
        reg.flush();
        assert_eq!(reg.get("level").unwrap(), StoreValue::Number(3.0));
    }

    #[test]
    fn set_rejects_wrong_type_and_unknown_name() {
        let mut reg = registry();
        reg.register_to_world();
        let err = reg.set("level", "three").unwrap_err();
        assert!(matches!(
            err,
            StoreError::TypeMismatch { expected: StoreType::Number, found: StoreType::String, .. }
        ));
        assert!(matches!(reg.set("nope", true), Err(StoreError::UndefinedStore(_))));
        assert_eq!(reg.pending_writes(), 0);
        reg.flush();
        assert_eq!(reg.get("level").unwrap(), StoreValue::Number(0.0));
    }

    #[test]
    fn failed_reads_are_not_defined() {
        let mut reg = StoreRegistry::new(BrokenReads(MemoryProperties::new()));
        reg.register_store("level", StoreType::Number).unwrap();
        assert_eq!(reg.register_to_world(), 1);
        assert!(matches!(reg.get("level"), Err(StoreError::NotDefined(_))));
    }

    #[test]
    fn increment_on_boolean_is_noop() {
        let mut reg = registry();
        reg.register_to_world();
        reg.increment("tutorial_done").unwrap();
        assert_eq!(reg.pending_writes(), 0);
        reg.increment("level").unwrap();
        reg.increment("level").unwrap();
        reg.flush();
        assert_eq!(reg.get("level").unwrap(), StoreValue::Number(2.0));
    }

    #[test]
    fn clear_all_drops_pending_and_resets_initialized() {
        let mut reg = registry();
        reg.register_to_world();
        reg.set("player_name", "steve").unwrap();
        reg.clear_all().unwrap();
        assert_eq!(reg.pending_writes(), 0);
        assert!(!reg.is_initialized());
        assert!(matches!(reg.get("level"), Err(StoreError::NotDefined(_))));
        assert_eq!(reg.get_stores().len(), 3);
    }
}
