//! Key-triple to action bindings

use std::collections::HashMap;

use tracing::trace;

use super::chain::KeyConsumer;
use super::events::{Key, KeyAction, Modifiers};

/// Pack a `(key, action, mods)` triple into one map key
///
/// Each field occupies its own 16-bit range, so two distinct triples can
/// never collide as long as the encodings stay within 16 bits — which
/// [`Key::code`], [`KeyAction::code`] and the [`Modifiers`] bit set all
/// guarantee.
fn compose(key: Key, action: KeyAction, mods: Modifiers) -> u64 {
    (key.code() as u64) << 32 | (action.code() as u64) << 16 | mods.bits() as u64
}

type Action = Box<dyn Fn() + Send + Sync>;

/// Maps exact key triples to zero-argument actions
///
/// Sits at the tail of a [`KeyChain`](super::chain::KeyChain): a bound
/// triple fires its action and consumes the event, anything else falls
/// through.
pub struct KeyBindings {
    actions: HashMap<u64, Action>,
}

impl KeyBindings {
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }

    /// Bind an action to an exact `(key, action, mods)` triple
    ///
    /// Rebinding the same triple replaces the previous action.
    pub fn bind<F>(&mut self, key: Key, action: KeyAction, mods: Modifiers, f: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.actions.insert(compose(key, action, mods), Box::new(f));
    }

    /// Bind to a bare key press with no modifiers
    pub fn bind_press<F>(&mut self, key: Key, f: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.bind(key, KeyAction::Press, Modifiers::empty(), f);
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyConsumer for KeyBindings {
    fn name(&self) -> &str {
        "bindings"
    }

    fn consume_key(&self, key: Key, action: KeyAction, mods: Modifiers) -> bool {
        match self.actions.get(&compose(key, action, mods)) {
            Some(run) => {
                trace!(?key, ?action, "bound action fired");
                run();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_composition_is_injective_over_all_encodings() {
        let keys = [
            Key::Space,
            Key::Enter,
            Key::Escape,
            Key::Backspace,
            Key::Tab,
            Key::Delete,
            Key::A,
            Key::J,
            Key::T,
            Key::Z,
            Key::Num0,
            Key::Num9,
            Key::F1,
            Key::F12,
            Key::Left,
            Key::Down,
            Key::Other,
        ];
        let actions = [KeyAction::Release, KeyAction::Press, KeyAction::Repeat];

        let mut seen = HashSet::new();
        for key in keys {
            for action in actions {
                for bits in 0..16u16 {
                    let mods = Modifiers::from_bits_truncate(bits);
                    assert!(
                        seen.insert(compose(key, action, mods)),
                        "composed key collision for {key:?} {action:?} {mods:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_bound_triple_fires_and_consumes() {
        let fired = Arc::new(AtomicU32::new(0));
        let mut bindings = KeyBindings::new();

        let counter = fired.clone();
        bindings.bind_press(Key::W, move || {
            counter.fetch_add(1, Ordering::Relaxed);
        });

        let consumed = bindings.consume_key(Key::W, KeyAction::Press, Modifiers::empty());
        assert!(consumed);
        assert_eq!(fired.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_unbound_triples_fall_through() {
        let mut bindings = KeyBindings::new();
        bindings.bind_press(Key::W, || {});

        // Same key, different action or modifiers: not a match
        assert!(!bindings.consume_key(Key::W, KeyAction::Release, Modifiers::empty()));
        assert!(!bindings.consume_key(Key::W, KeyAction::Press, Modifiers::SHIFT));
        assert!(!bindings.consume_key(Key::S, KeyAction::Press, Modifiers::empty()));
    }

    #[test]
    fn test_rebinding_replaces_the_action() {
        let first = Arc::new(AtomicU32::new(0));
        let second = Arc::new(AtomicU32::new(0));
        let mut bindings = KeyBindings::new();

        let counter = first.clone();
        bindings.bind_press(Key::T, move || {
            counter.fetch_add(1, Ordering::Relaxed);
        });
        let counter = second.clone();
        bindings.bind_press(Key::T, move || {
            counter.fetch_add(1, Ordering::Relaxed);
        });

        bindings.consume_key(Key::T, KeyAction::Press, Modifiers::empty());
        assert_eq!(first.load(Ordering::Relaxed), 0);
        assert_eq!(second.load(Ordering::Relaxed), 1);
        assert_eq!(bindings.len(), 1);
    }

    #[test]
    fn test_modified_bindings_match_exactly() {
        let fired = Arc::new(AtomicU32::new(0));
        let mut bindings = KeyBindings::new();

        let counter = fired.clone();
        bindings.bind(
            Key::S,
            KeyAction::Press,
            Modifiers::CTRL,
            move || {
                counter.fetch_add(1, Ordering::Relaxed);
            },
        );

        assert!(!bindings.consume_key(Key::S, KeyAction::Press, Modifiers::empty()));
        assert!(bindings.consume_key(Key::S, KeyAction::Press, Modifiers::CTRL));
        assert!(!bindings.consume_key(
            Key::S,
            KeyAction::Press,
            Modifiers::CTRL | Modifiers::SHIFT
        ));
        assert_eq!(fired.load(Ordering::Relaxed), 1);
    }
}
