//! Handler registry for frame dispatch
//!
//! Applications register one handler per frame identifier; the link looks
//! the handler up as soon as the identifier byte arrives and invokes it
//! once the frame completes.

use heapless::Vec;

/// Errors from handler registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistryError {
    /// Registry at capacity; the handler was not registered
    Full,
}

/// Application handler for completed frames
///
/// Invoked synchronously on the update-loop context with the frame's
/// declared length and payload. The payload buffer is valid only for the
/// duration of the call. Handlers must not block, loop, or call back into
/// the link that invoked them.
pub trait FrameHandler {
    /// Called once per completed frame matching the registered identifier
    fn on_frame(&mut self, len: u8, payload: &[u8]);
}

impl<F> FrameHandler for F
where
    F: FnMut(u8, &[u8]),
{
    fn on_frame(&mut self, len: u8, payload: &[u8]) {
        self(len, payload)
    }
}

struct CallbackEntry<'h> {
    id: u8,
    handler: &'h mut dyn FrameHandler,
}

/// Append-only mapping from frame identifier to handler
///
/// Lookup is a linear scan in registration order and the first match wins:
/// a duplicate identifier registered later is unreachable. That shadowing
/// order is part of the contract, not an accident. There is no removal;
/// the registry lives as long as its link.
pub struct CallbackRegistry<'h, const N: usize> {
    entries: Vec<CallbackEntry<'h>, N>,
}

impl<'h, const N: usize> Default for CallbackRegistry<'h, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'h, const N: usize> CallbackRegistry<'h, N> {
    /// Create an empty registry
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a handler for the given identifier
    ///
    /// Duplicates are accepted but only the first registration for an
    /// identifier is ever found.
    pub fn register(
        &mut self,
        id: u8,
        handler: &'h mut dyn FrameHandler,
    ) -> Result<(), RegistryError> {
        self.entries
            .push(CallbackEntry { id, handler })
            .map_err(|_| RegistryError::Full)
    }

    /// Find the slot of the first handler registered for `id`
    ///
    /// Slots are stable: the registry is append-only, so a slot found when
    /// the identifier byte arrives is still valid at frame completion.
    pub fn find(&self, id: u8) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    /// Invoke the handler in `slot` with a completed frame
    ///
    /// Out-of-range slots are ignored; slots come from [`find`](Self::find).
    pub fn invoke(&mut self, slot: usize, len: u8, payload: &[u8]) {
        if let Some(entry) = self.entries.get_mut(slot) {
            entry.handler.on_frame(len, payload);
        }
    }

    /// Number of registered handlers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no handler is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all registrations
    ///
    /// Teardown helper for [`Link::clean`](crate::link::Link::clean).
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    #[test]
    fn test_register_and_find() {
        let mut first = |_len: u8, _payload: &[u8]| {};
        let mut second = |_len: u8, _payload: &[u8]| {};

        let mut registry = CallbackRegistry::<'_, 4>::new();
        registry.register(0x10, &mut first).unwrap();
        registry.register(0x20, &mut second).unwrap();

        assert_eq!(registry.find(0x10), Some(0));
        assert_eq!(registry.find(0x20), Some(1));
        assert_eq!(registry.find(0x30), None);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_first_registration_wins() {
        let hits_first = Cell::new(0u32);
        let hits_second = Cell::new(0u32);
        let mut first = |_len: u8, _payload: &[u8]| hits_first.set(hits_first.get() + 1);
        let mut second = |_len: u8, _payload: &[u8]| hits_second.set(hits_second.get() + 1);

        let mut registry = CallbackRegistry::<'_, 4>::new();
        registry.register(0x42, &mut first).unwrap();
        registry.register(0x42, &mut second).unwrap();

        let slot = registry.find(0x42).unwrap();
        registry.invoke(slot, 0, &[]);
        registry.invoke(slot, 0, &[]);

        assert_eq!(hits_first.get(), 2);
        assert_eq!(hits_second.get(), 0);
    }

    #[test]
    fn test_registry_full() {
        let mut handler_a = |_len: u8, _payload: &[u8]| {};
        let mut handler_b = |_len: u8, _payload: &[u8]| {};
        let mut overflow = |_len: u8, _payload: &[u8]| {};

        let mut registry = CallbackRegistry::<'_, 2>::new();
        registry.register(0x01, &mut handler_a).unwrap();
        registry.register(0x02, &mut handler_b).unwrap();

        assert_eq!(
            registry.register(0x03, &mut overflow),
            Err(RegistryError::Full)
        );
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_invoke_passes_frame_data() {
        let seen_len = Cell::new(0u8);
        let seen_sum = Cell::new(0u32);
        let mut handler = |len: u8, payload: &[u8]| {
            seen_len.set(len);
            seen_sum.set(payload.iter().map(|&b| u32::from(b)).sum());
        };

        let mut registry = CallbackRegistry::<'_, 2>::new();
        registry.register(0x07, &mut handler).unwrap();

        let slot = registry.find(0x07).unwrap();
        registry.invoke(slot, 3, &[1, 2, 3]);

        assert_eq!(seen_len.get(), 3);
        assert_eq!(seen_sum.get(), 6);
    }

    #[test]
    fn test_clear() {
        let mut handler = |_len: u8, _payload: &[u8]| {};

        let mut registry = CallbackRegistry::<'_, 2>::new();
        registry.register(0x01, &mut handler).unwrap();
        registry.clear();

        assert!(registry.is_empty());
        assert_eq!(registry.find(0x01), None);
    }
}
