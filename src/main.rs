#[macro_use]
extern crate log;

use anyhow::{anyhow, bail, Result};
use std::sync::{mpsc, Arc};
use syshotkey::{load_config, Config, GlobalHotkey, HotkeyCallback, NamedHotkey, QUIT_HOTKEY};

fn main() {
    if let Err(err) = run() {
        error!("{err}");
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = load_config()?;
    setup_logging(&config)?;
    info!("start config={:?}", config);

    let (quit_tx, quit_rx) = mpsc::channel();
    let mut hotkeys: Vec<Box<dyn GlobalHotkey>> = vec![];
    for named in &config.hotkeys {
        let hotkey = create_hotkey(named)?;
        let callback: HotkeyCallback = if named.name == QUIT_HOTKEY {
            let quit_tx = quit_tx.clone();
            Arc::new(move |_| {
                let _ = quit_tx.send(());
            })
        } else {
            let name = named.name.clone();
            Arc::new(move |id| info!("hotkey {name} triggered, id={id}"))
        };
        match hotkey.register(callback) {
            Ok(()) => {
                info!("{hotkey} bound to {}", named.name);
                hotkeys.push(hotkey);
            }
            Err(err) if named.name == QUIT_HOTKEY => {
                syshotkey::close();
                bail!("{err}");
            }
            Err(err) => warn!("{err}"),
        }
    }
    drop(quit_tx);

    let _ = quit_rx.recv();
    info!("quit hotkey pressed, {} hotkeys to release", hotkeys.len());
    syshotkey::close();
    Ok(())
}

fn create_hotkey(named: &NamedHotkey) -> Result<Box<dyn GlobalHotkey>> {
    let NamedHotkey { hotkey, .. } = named;
    syshotkey::create(hotkey.id, hotkey.modifiers, hotkey.key_code)
        .map_err(|err| anyhow!("Failed to create hotkey {}, {err}", named.name))
}

fn setup_logging(config: &Config) -> Result<()> {
    if !config.log_enabled {
        syshotkey::set_log_level(log::LevelFilter::Off);
        return Ok(());
    }
    match config.log_path()? {
        Some(path) => simple_logging::log_to_file(&path, config.log_level)
            .map_err(|err| anyhow!("Failed to open log file '{}', {err}", path.display()))?,
        None => simple_logging::log_to_stderr(config.log_level),
    }
    Ok(())
}
