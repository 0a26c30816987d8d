//! Priority-ordered key routing
//!
//! Consumers are evaluated front-to-back; the first one that returns
//! `true` stops propagation. The chain installs like any key listener,
//! so a UI consumer can get first refusal on every key event before a
//! gameplay consumer sees it.

use std::sync::Arc;

use tracing::trace;

use super::events::{Key, KeyAction, Modifiers};
use super::listener::KeyInputListener;

/// A chain stage that may consume a key event
pub trait KeyConsumer: Send + Sync {
    /// Name for logging
    fn name(&self) -> &str;

    /// Handle the event; returning `true` stops propagation
    fn consume_key(&self, key: Key, action: KeyAction, mods: Modifiers) -> bool;
}

/// Ordered sequence of key consumers with early termination
pub struct KeyChain {
    stages: Vec<Arc<dyn KeyConsumer>>,
}

impl KeyChain {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Append a stage; earlier stages get first refusal
    pub fn push(&mut self, stage: Arc<dyn KeyConsumer>) {
        self.stages.push(stage);
    }

    /// Builder-style [`Self::push`]
    pub fn with_stage(mut self, stage: Arc<dyn KeyConsumer>) -> Self {
        self.push(stage);
        self
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl Default for KeyChain {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyInputListener for KeyChain {
    fn serve_key_input(&self, key: Key, action: KeyAction, mods: Modifiers) {
        for stage in &self.stages {
            if stage.consume_key(key, action, mods) {
                trace!(stage = stage.name(), ?key, "key event consumed");
                return;
            }
        }
        trace!(?key, "key event fell through the chain");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Stage {
        label: &'static str,
        consume: bool,
        seen: Mutex<Vec<Key>>,
    }

    impl Stage {
        fn new(label: &'static str, consume: bool) -> Arc<Self> {
            Arc::new(Self {
                label,
                consume,
                seen: Mutex::new(Vec::new()),
            })
        }

        fn seen(&self) -> Vec<Key> {
            self.seen.lock().expect("stage lock").clone()
        }
    }

    impl KeyConsumer for Stage {
        fn name(&self) -> &str {
            self.label
        }

        fn consume_key(&self, key: Key, _action: KeyAction, _mods: Modifiers) -> bool {
            self.seen.lock().expect("stage lock").push(key);
            self.consume
        }
    }

    #[test]
    fn test_first_consumer_stops_propagation() {
        let first = Stage::new("first", true);
        let second = Stage::new("second", true);
        let chain = KeyChain::new()
            .with_stage(first.clone())
            .with_stage(second.clone());

        chain.serve_key_input(Key::W, KeyAction::Press, Modifiers::empty());

        assert_eq!(first.seen(), vec![Key::W]);
        assert!(second.seen().is_empty());
    }

    #[test]
    fn test_unconsumed_events_fall_through_in_order() {
        let first = Stage::new("first", false);
        let second = Stage::new("second", false);
        let chain = KeyChain::new()
            .with_stage(first.clone())
            .with_stage(second.clone());

        chain.serve_key_input(Key::A, KeyAction::Press, Modifiers::empty());
        chain.serve_key_input(Key::B, KeyAction::Release, Modifiers::empty());

        assert_eq!(first.seen(), vec![Key::A, Key::B]);
        assert_eq!(second.seen(), vec![Key::A, Key::B]);
    }

    #[test]
    fn test_empty_chain_is_a_noop() {
        let chain = KeyChain::new();
        assert!(chain.is_empty());
        chain.serve_key_input(Key::Escape, KeyAction::Press, Modifiers::empty());
    }
}
