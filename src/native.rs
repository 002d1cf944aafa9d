#[cfg(windows)]
mod win32;

#[cfg(windows)]
pub use self::win32::Win32Hotkeys;

use crate::hotkey::Hotkey;

use anyhow::Result;

/// Host global-hotkey facility.
///
/// Every call is made from the watcher thread: on Windows a hotkey
/// registered without a window posts `WM_HOTKEY` to the queue of the thread
/// that registered it.
pub trait NativeHotkeys: Send + Sync + 'static {
    fn register(&self, hotkey: &Hotkey) -> Result<()>;

    fn unregister(&self, id: i32) -> Result<()>;

    /// Next pending trigger id, without blocking.
    fn poll(&self) -> Option<i32>;
}

#[cfg(test)]
pub(crate) mod fake {
    use super::NativeHotkeys;
    use crate::hotkey::Hotkey;

    use anyhow::{bail, Result};
    use parking_lot::Mutex;
    use std::collections::{HashSet, VecDeque};

    /// In-memory host that rejects duplicate ids and replays injected events.
    #[derive(Default)]
    pub struct FakeHotkeys {
        bound: Mutex<HashSet<i32>>,
        events: Mutex<VecDeque<i32>>,
        unregistered: Mutex<Vec<i32>>,
    }

    impl FakeHotkeys {
        pub fn trigger(&self, id: i32) {
            self.events.lock().push_back(id);
        }

        pub fn is_bound(&self, id: i32) -> bool {
            self.bound.lock().contains(&id)
        }

        pub fn unregistered(&self) -> Vec<i32> {
            self.unregistered.lock().clone()
        }
    }

    impl NativeHotkeys for FakeHotkeys {
        fn register(&self, hotkey: &Hotkey) -> Result<()> {
            if !self.bound.lock().insert(hotkey.id) {
                bail!("Hot key is already registered");
            }
            Ok(())
        }

        fn unregister(&self, id: i32) -> Result<()> {
            if !self.bound.lock().remove(&id) {
                bail!("Hot key is not registered");
            }
            self.unregistered.lock().push(id);
            Ok(())
        }

        fn poll(&self) -> Option<i32> {
            self.events.lock().pop_front()
        }
    }
}
