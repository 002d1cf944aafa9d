use crate::error::{HotkeyError, Result};
use crate::native::NativeHotkeys;
use crate::registry::{ActiveHotkey, Registry};

use parking_lot::Mutex;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, SyncSender};
use std::sync::Arc;
use std::thread::{self, ThreadId};
use std::time::Duration;

/// Idle wait between two polls of the native event queue.
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub(crate) type Reply = SyncSender<Result<()>>;

pub(crate) enum Command {
    Register { entry: ActiveHotkey, reply: Reply },
    Unregister { id: i32, reply: Reply },
}

impl Command {
    pub fn execute<N: NativeHotkeys>(self, native: &N, registry: &Registry) {
        let (result, reply) = match self {
            Command::Register { entry, reply } => (register(native, registry, entry), reply),
            Command::Unregister { id, reply } => (unregister(native, registry, id), reply),
        };
        // the requester may have given up waiting
        let _ = reply.send(result);
    }
}

#[derive(Debug, Clone)]
pub(crate) struct WatcherHandle {
    pub generation: u64,
    pub thread_id: ThreadId,
    pub sender: Sender<Command>,
}

/// The watcher currently serving a backend, if any.
#[derive(Debug, Default)]
pub(crate) struct WatcherSlot {
    pub generation: u64,
    pub handle: Option<WatcherHandle>,
}

impl WatcherSlot {
    /// Forgets the handle if it still belongs to `generation`.
    pub fn retire(&mut self, generation: u64) {
        if self
            .handle
            .as_ref()
            .is_some_and(|handle| handle.generation == generation)
        {
            debug!("hotkey watcher {generation} retired");
            self.handle = None;
        }
    }
}

/// The single loop that owns every native call of a backend and dispatches
/// trigger events to the registered callbacks.
pub(crate) struct Watcher<N: NativeHotkeys> {
    native: Arc<N>,
    registry: Arc<Registry>,
    slot: Arc<Mutex<WatcherSlot>>,
    generation: u64,
    commands: Receiver<Command>,
}

impl<N: NativeHotkeys> Watcher<N> {
    /// Starts a watcher and records it in `slot`, which the caller holds locked.
    pub fn spawn(
        native: Arc<N>,
        registry: Arc<Registry>,
        slot: Arc<Mutex<WatcherSlot>>,
        generation: u64,
    ) -> Result<WatcherHandle> {
        let (sender, commands) = mpsc::channel();
        let watcher = Watcher {
            native,
            registry,
            slot,
            generation,
            commands,
        };
        let thread = thread::Builder::new()
            .name(format!("hotkey-watcher-{generation}"))
            .spawn(move || watcher.run())
            .map_err(|err| {
                HotkeyError::WatcherUnavailable(format!("failed to spawn thread, {err}"))
            })?;
        Ok(WatcherHandle {
            generation,
            thread_id: thread.thread().id(),
            sender,
        })
    }

    fn run(self) {
        debug!("hotkey watcher start");
        loop {
            match self.commands.recv_timeout(POLL_INTERVAL) {
                Ok(command) => command.execute(self.native.as_ref(), &self.registry),
                Err(RecvTimeoutError::Timeout) => {
                    if self.registry.is_empty() {
                        break;
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
            self.dispatch_pending();
        }
    }

    fn dispatch_pending(&self) {
        while let Some(id) = self.native.poll() {
            match self.registry.callback(id) {
                Some(callback) => {
                    debug!("starting callback for hotkey {id}");
                    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| callback(id))) {
                        error!("callback for hotkey {id} panicked");
                        self.release_all();
                        panic::resume_unwind(payload);
                    }
                }
                None => debug!("no running hotkey with id {id}"),
            }
        }
    }

    /// Drops every hotkey this watcher serves so none stays registered
    /// without a loop to dispatch it.
    fn release_all(&self) {
        let ids = self.registry.ids();
        // requests arriving from now on go to a fresh watcher
        self.slot.lock().retire(self.generation);
        for id in ids {
            if let Err(err) = unregister(self.native.as_ref(), &self.registry, id) {
                warn!("{err}");
            }
        }
    }
}

impl<N: NativeHotkeys> Drop for Watcher<N> {
    fn drop(&mut self) {
        if thread::panicking() {
            error!("hotkey watcher stopped by a panicking callback");
        } else {
            debug!("hotkey watcher stopped");
        }
    }
}

/// Must run on the watcher thread.
pub(crate) fn register<N: NativeHotkeys>(
    native: &N,
    registry: &Registry,
    entry: ActiveHotkey,
) -> Result<()> {
    let hotkey = entry.hotkey;
    let failed = |reason: String| HotkeyError::RegistrationFailed {
        hotkey: hotkey.to_string(),
        reason,
    };
    if hotkey.id <= 0 {
        return Err(failed("id must be positive".into()));
    }
    if registry.contains(hotkey.id) {
        return Err(failed(format!("id {} is already registered", hotkey.id)));
    }
    native.register(&hotkey).map_err(|err| failed(err.to_string()))?;
    registry.insert(entry);
    debug!("registered {hotkey}");
    Ok(())
}

/// Must run on the watcher thread.
pub(crate) fn unregister<N: NativeHotkeys>(native: &N, registry: &Registry, id: i32) -> Result<()> {
    let entry = registry.remove(id).ok_or(HotkeyError::NotRunning(id))?;
    if let Err(err) = native.unregister(id) {
        warn!("{err}");
    }
    debug!("deactivated {}", entry.hotkey);
    Ok(())
}
