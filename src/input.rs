use std::{collections::HashMap, hash::Hash};

/// Edge-triggered key tracking
///
/// Remembers, per key, whether it was down before and after its most recent event, so a
/// caller polling once per frame can tell a fresh press from a key being held.
/// Independent of any windowing system: feed it press and release events for any
/// hashable key type.
#[derive(Debug, Clone)]
pub struct KeyState<K> {
    prev: HashMap<K, bool>,
    curr: HashMap<K, bool>,
}

impl<K: Eq + Hash + Copy> KeyState<K> {
    pub fn new() -> Self {
        Self {
            prev: HashMap::new(),
            curr: HashMap::new(),
        }
    }

    pub fn on_press(&mut self, key: K) {
        self.transition(key, true);
    }

    pub fn on_release(&mut self, key: K) {
        self.transition(key, false);
    }

    /// Whether `key` went from up to down
    pub fn was_pressed(&self, key: K) -> bool {
        !self.prev(key) && self.is_down(key)
    }

    /// Whether `key` went from down to up
    pub fn was_released(&self, key: K) -> bool {
        self.prev(key) && !self.is_down(key)
    }

    /// Whether `key` was down both before and after its latest event
    pub fn was_held(&self, key: K) -> bool {
        self.prev(key) && self.is_down(key)
    }

    pub fn is_down(&self, key: K) -> bool {
        self.curr.get(&key).copied().unwrap_or(false)
    }

    /// Keys currently down
    pub fn down(&self) -> impl Iterator<Item = K> + '_ {
        self.curr.iter().filter(|&(_, &d)| d).map(|(&k, _)| k)
    }

    /// Forget all history
    pub fn clear(&mut self) {
        self.prev.clear();
        self.curr.clear();
    }

    fn prev(&self, key: K) -> bool {
        self.prev.get(&key).copied().unwrap_or(false)
    }

    fn transition(&mut self, key: K, down: bool) {
        let was = self.is_down(key);
        self.prev.insert(key, was);
        self.curr.insert(key, down);
    }
}

impl<K: Eq + Hash + Copy> Default for KeyState<K> {
    fn default() -> Self {
        Self::new()
    }
}
