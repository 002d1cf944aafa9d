use super::NativeHotkeys;
use crate::hotkey::Hotkey;

use anyhow::{anyhow, Result};
use windows::Win32::UI::Input::KeyboardAndMouse::{
    RegisterHotKey, UnregisterHotKey, HOT_KEY_MODIFIERS,
};
use windows::Win32::UI::WindowsAndMessaging::{PeekMessageW, MSG, PM_REMOVE, WM_HOTKEY};

/// Thread-queue hotkeys: no window, `WM_HOTKEY` lands on the calling thread.
#[derive(Debug, Default)]
pub struct Win32Hotkeys;

impl NativeHotkeys for Win32Hotkeys {
    fn register(&self, hotkey: &Hotkey) -> Result<()> {
        let modifiers = HOT_KEY_MODIFIERS(hotkey.modifiers.bits());
        unsafe { RegisterHotKey(None, hotkey.id, modifiers, hotkey.key_code) }
            .map_err(|err| anyhow!("{err}"))
    }

    fn unregister(&self, id: i32) -> Result<()> {
        unsafe { UnregisterHotKey(None, id) }
            .map_err(|err| anyhow!("Failed to unregister hotkey {id}, {err}"))
    }

    fn poll(&self) -> Option<i32> {
        let mut msg = MSG::default();
        loop {
            let found =
                unsafe { PeekMessageW(&mut msg, None, WM_HOTKEY, WM_HOTKEY, PM_REMOVE) }.as_bool();
            if !found {
                return None;
            }
            // the registered id is in wParam
            let id = msg.wParam.0 as i32;
            if id != 0 {
                return Some(id);
            }
        }
    }
}
