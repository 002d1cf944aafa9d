use crate::hotkey::Hotkey;

use indexmap::IndexMap;
use parking_lot::Mutex;
use std::sync::Arc;

pub type HotkeyCallback = Arc<dyn Fn(i32) + Send + Sync + 'static>;

#[derive(Clone)]
pub struct ActiveHotkey {
    pub hotkey: Hotkey,
    pub callback: HotkeyCallback,
}

/// Hotkeys whose native registration is currently live, keyed by id.
#[derive(Default)]
pub struct Registry {
    entries: Mutex<IndexMap<i32, ActiveHotkey>>,
}

impl Registry {
    pub fn insert(&self, entry: ActiveHotkey) -> bool {
        let mut entries = self.entries.lock();
        if entries.contains_key(&entry.hotkey.id) {
            return false;
        }
        entries.insert(entry.hotkey.id, entry);
        true
    }

    pub fn remove(&self, id: i32) -> Option<ActiveHotkey> {
        self.entries.lock().shift_remove(&id)
    }

    pub fn contains(&self, id: i32) -> bool {
        self.entries.lock().contains_key(&id)
    }

    /// Callback of `id`, cloned out so the lock is released before it runs.
    pub fn callback(&self, id: i32) -> Option<HotkeyCallback> {
        self.entries.lock().get(&id).map(|v| v.callback.clone())
    }

    pub fn ids(&self) -> Vec<i32> {
        self.entries.lock().keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotkey::Modifiers;

    fn entry(id: i32) -> ActiveHotkey {
        ActiveHotkey {
            hotkey: Hotkey::new(id, Modifiers::ALT, 'A' as u32),
            callback: Arc::new(|_| {}),
        }
    }

    #[test]
    fn test_insert_keeps_ids_unique() {
        let registry = Registry::default();
        assert!(registry.insert(entry(1)));
        assert!(!registry.insert(entry(1)));
        assert_eq!(registry.ids(), vec![1]);
    }

    #[test]
    fn test_remove_keeps_order() {
        let registry = Registry::default();
        for id in [3, 1, 2] {
            registry.insert(entry(id));
        }
        assert!(registry.remove(1).is_some());
        assert!(registry.remove(1).is_none());
        assert_eq!(registry.ids(), vec![3, 2]);
        assert!(!registry.contains(1));
        assert!(registry.callback(3).is_some());
        assert!(registry.callback(1).is_none());
    }
}
