#[macro_use]
extern crate log;

mod backend;
mod config;
mod error;
mod hotkey;
mod native;
mod registry;
mod utils;
mod watcher;

use std::fmt;

pub use crate::backend::{BackendHotkey, HotkeyBackend};
pub use crate::config::{get_config_path, load_config, Config, NamedHotkey, QUIT_HOTKEY};
pub use crate::error::{HotkeyError, Result};
pub use crate::hotkey::{Hotkey, Modifiers};
pub use crate::native::NativeHotkeys;
pub use crate::registry::HotkeyCallback;
pub use crate::watcher::POLL_INTERVAL;

#[cfg(windows)]
pub use crate::native::Win32Hotkeys;

/// A global shortcut bound to the backend of the running OS.
pub trait GlobalHotkey: fmt::Display + Send + Sync {
    /// Registers the shortcut with the OS. Returns once the native call has
    /// completed; `callback` then runs on the watcher thread on every trigger.
    fn register(&self, callback: HotkeyCallback) -> Result<()>;

    fn deactivate(&self) -> Result<()>;

    fn descriptor(&self) -> Hotkey;
}

#[cfg(windows)]
static BACKEND: once_cell::sync::Lazy<HotkeyBackend<Win32Hotkeys>> =
    once_cell::sync::Lazy::new(|| HotkeyBackend::new(Win32Hotkeys));

/// Creates a hotkey for the host OS.
pub fn create(id: i32, modifiers: Modifiers, key_code: u32) -> Result<Box<dyn GlobalHotkey>> {
    let hotkey = Hotkey::new(id, modifiers, key_code);
    debug!("create {hotkey}");
    platform_hotkey(hotkey)
}

#[cfg(windows)]
fn platform_hotkey(hotkey: Hotkey) -> Result<Box<dyn GlobalHotkey>> {
    Ok(Box::new(BACKEND.hotkey(hotkey)))
}

#[cfg(not(windows))]
fn platform_hotkey(_hotkey: Hotkey) -> Result<Box<dyn GlobalHotkey>> {
    Err(HotkeyError::UnsupportedPlatform(std::env::consts::OS))
}

/// Tears down every hotkey still registered. Call it before the process exits.
pub fn close() {
    #[cfg(windows)]
    BACKEND.close();

    #[cfg(not(windows))]
    info!("global hotkeys are not supported on {}", std::env::consts::OS);
}

pub fn set_log_level(level: log::LevelFilter) {
    log::set_max_level(level);
}
