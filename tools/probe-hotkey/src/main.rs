use anyhow::{anyhow, Context, Result};
use std::sync::Arc;
use syshotkey::{GlobalHotkey, Hotkey, HotkeyError};

/// Any id the daemon would not hand out.
const PROBE_ID: i32 = 0xBFFF;

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1).peekable();
    if args.peek().map(String::as_str) == Some("-v") {
        args.next();
        simple_logging::log_to_stderr(log::LevelFilter::Debug);
    }
    let combos: Vec<String> = args.collect();
    if combos.is_empty() {
        return Err(anyhow!("Usage: probe-hotkey [-v] <combo>..., e.g. ctrl+alt+o"));
    }
    for combo in &combos {
        let hotkey = Hotkey::parse(PROBE_ID, combo)
            .ok_or_else(|| anyhow!("Invalid hotkey '{combo}'"))?;
        println!("{:<24} {}", combo, probe(hotkey)?);
    }
    syshotkey::close();
    Ok(())
}

fn probe(hotkey: Hotkey) -> Result<String> {
    let handle: Box<dyn GlobalHotkey> =
        syshotkey::create(hotkey.id, hotkey.modifiers, hotkey.key_code)
            .with_context(|| format!("Fail to create {hotkey}"))?;
    match handle.register(Arc::new(|_| {})) {
        Ok(()) => {
            handle
                .deactivate()
                .with_context(|| format!("Fail to release {hotkey}"))?;
            Ok("free".into())
        }
        Err(HotkeyError::RegistrationFailed { reason, .. }) => Ok(format!("taken: {reason}")),
        Err(err) => Err(err.into()),
    }
}
