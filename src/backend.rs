use crate::error::{HotkeyError, Result};
use crate::hotkey::Hotkey;
use crate::native::NativeHotkeys;
use crate::registry::{ActiveHotkey, HotkeyCallback, Registry};
use crate::watcher::{Command, Reply, Watcher, WatcherHandle, WatcherSlot};
use crate::GlobalHotkey;

use parking_lot::Mutex;
use std::fmt;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

/// How often a request is handed to a fresh watcher after the previous one
/// shut down underneath it.
const HANDOFF_ATTEMPTS: usize = 3;

/// Registry plus the watcher that serves it, on top of one native host.
pub struct HotkeyBackend<N: NativeHotkeys> {
    native: Arc<N>,
    registry: Arc<Registry>,
    watcher: Arc<Mutex<WatcherSlot>>,
}

impl<N: NativeHotkeys> Clone for HotkeyBackend<N> {
    fn clone(&self) -> Self {
        Self {
            native: self.native.clone(),
            registry: self.registry.clone(),
            watcher: self.watcher.clone(),
        }
    }
}

impl<N: NativeHotkeys> HotkeyBackend<N> {
    pub fn new(native: N) -> Self {
        Self {
            native: Arc::new(native),
            registry: Default::default(),
            watcher: Default::default(),
        }
    }

    /// Binds a descriptor to this backend. Nothing is registered yet.
    pub fn hotkey(&self, hotkey: Hotkey) -> BackendHotkey<N> {
        BackendHotkey {
            hotkey,
            backend: self.clone(),
        }
    }

    pub fn registered_ids(&self) -> Vec<i32> {
        self.registry.ids()
    }

    pub fn is_registered(&self, id: i32) -> bool {
        self.registry.contains(id)
    }

    pub fn register(&self, hotkey: Hotkey, callback: HotkeyCallback) -> Result<()> {
        debug!("register {hotkey}");
        let entry = ActiveHotkey { hotkey, callback };
        self.request(|reply| Command::Register {
            entry: entry.clone(),
            reply,
        })
    }

    pub fn deactivate(&self, id: i32) -> Result<()> {
        if !self.registry.contains(id) {
            return Err(HotkeyError::NotRunning(id));
        }
        self.request(|reply| Command::Unregister { id, reply })
    }

    /// Deactivates every hotkey still registered, oldest first.
    pub fn close(&self) {
        let ids = self.registry.ids();
        if !ids.is_empty() {
            info!("closing {} hotkeys", ids.len());
        }
        for id in ids {
            match self.deactivate(id) {
                Ok(()) | Err(HotkeyError::NotRunning(_)) => {}
                Err(err) => warn!("{err}"),
            }
        }
    }

    fn request<F>(&self, command: F) -> Result<()>
    where
        F: Fn(Reply) -> Command,
    {
        for _ in 0..HANDOFF_ATTEMPTS {
            let handle = self.watcher_handle()?;
            let (reply, response) = mpsc::sync_channel(1);
            if handle.thread_id == thread::current().id() {
                // called from a callback, the watcher is busy running us
                command(reply).execute(self.native.as_ref(), &self.registry);
            } else if handle.sender.send(command(reply)).is_err() {
                self.retire(handle.generation);
                continue;
            }
            match response.recv() {
                Ok(result) => return result,
                Err(_) => self.retire(handle.generation),
            }
        }
        Err(HotkeyError::WatcherUnavailable(
            "watcher stopped before handling the request".into(),
        ))
    }

    fn watcher_handle(&self) -> Result<WatcherHandle> {
        let mut slot = self.watcher.lock();
        if let Some(handle) = &slot.handle {
            return Ok(handle.clone());
        }
        slot.generation += 1;
        let handle = Watcher::spawn(
            self.native.clone(),
            self.registry.clone(),
            self.watcher.clone(),
            slot.generation,
        )?;
        slot.handle = Some(handle.clone());
        Ok(handle)
    }

    fn retire(&self, generation: u64) {
        self.watcher.lock().retire(generation);
    }
}

/// One descriptor bound to a [`HotkeyBackend`].
pub struct BackendHotkey<N: NativeHotkeys> {
    hotkey: Hotkey,
    backend: HotkeyBackend<N>,
}

impl<N: NativeHotkeys> GlobalHotkey for BackendHotkey<N> {
    fn register(&self, callback: HotkeyCallback) -> Result<()> {
        self.backend.register(self.hotkey, callback)
    }

    fn deactivate(&self) -> Result<()> {
        self.backend.deactivate(self.hotkey.id)
    }

    fn descriptor(&self) -> Hotkey {
        self.hotkey
    }
}

impl<N: NativeHotkeys> fmt::Display for BackendHotkey<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.hotkey, f)
    }
}
