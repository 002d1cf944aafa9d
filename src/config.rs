use crate::hotkey::Hotkey;
use crate::utils::{get_exe_folder, resolve_exe_relative};

use anyhow::{anyhow, Result};
use ini::Ini;
use log::LevelFilter;
use std::path::PathBuf;

pub const CONFIG_FILE: &str = "syshotkey.ini";
pub const QUIT_HOTKEY: &str = "quit";
const DEFAULT_QUIT_HOTKEY: &str = "ctrl+alt+q";

#[derive(Debug, Clone)]
pub struct Config {
    pub log_enabled: bool,
    pub log_level: LevelFilter,
    pub log_file: Option<PathBuf>,
    pub hotkeys: Vec<NamedHotkey>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedHotkey {
    pub name: String,
    pub hotkey: Hotkey,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_enabled: true,
            log_level: LevelFilter::Info,
            log_file: None,
            hotkeys: with_quit_hotkey(vec![]),
        }
    }
}

impl Config {
    pub fn load(ini: &Ini) -> Result<Self> {
        let mut conf = Self::default();
        if let Some(section) = ini.section(Some("log")) {
            if let Some(v) = section.get("enable").and_then(Config::to_bool) {
                conf.log_enabled = v;
            }
            if let Some(v) = section.get("level") {
                conf.log_level = v
                    .trim()
                    .parse()
                    .map_err(|_| anyhow!("Invalid log level '{v}'"))?;
            }
            if let Some(v) = section.get("path").map(str::trim).filter(|v| !v.is_empty()) {
                conf.log_file = Some(PathBuf::from(v));
            }
        }
        if let Some(section) = ini.section(Some("hotkeys")) {
            let mut hotkeys = vec![];
            for (index, (name, value)) in section.iter().enumerate() {
                let hotkey = Hotkey::parse(index as i32 + 1, value)
                    .ok_or_else(|| anyhow!("Invalid hotkey '{name} = {value}'"))?;
                hotkeys.push(NamedHotkey {
                    name: name.trim().to_string(),
                    hotkey,
                });
            }
            conf.hotkeys = with_quit_hotkey(hotkeys);
        }
        Ok(conf)
    }

    pub fn to_bool(v: &str) -> Option<bool> {
        match v {
            "yes" | "true" | "on" | "1" => Some(true),
            "no" | "false" | "off" | "0" => Some(false),
            _ => None,
        }
    }

    pub fn log_path(&self) -> Result<Option<PathBuf>> {
        self.log_file
            .as_deref()
            .map(resolve_exe_relative)
            .transpose()
    }
}

fn with_quit_hotkey(mut hotkeys: Vec<NamedHotkey>) -> Vec<NamedHotkey> {
    if !hotkeys.iter().any(|v| v.name == QUIT_HOTKEY) {
        let id = hotkeys.len() as i32 + 1;
        if let Some(hotkey) = Hotkey::parse(id, DEFAULT_QUIT_HOTKEY) {
            hotkeys.push(NamedHotkey {
                name: QUIT_HOTKEY.to_string(),
                hotkey,
            });
        }
    }
    hotkeys
}

pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_exe_folder()?.join(CONFIG_FILE))
}

/// Reads the config next to the binary, falling back to defaults when absent.
pub fn load_config() -> Result<Config> {
    let path = get_config_path()?;
    if !path.exists() {
        return Ok(Config::default());
    }
    let ini = Ini::load_from_file(&path)
        .map_err(|err| anyhow!("Failed to load config file '{}', {err}", path.display()))?;
    Config::load(&ini)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotkey::Modifiers;

    #[test]
    fn test_default() {
        let config = Config::default();
        assert!(config.log_enabled);
        assert_eq!(config.log_level, LevelFilter::Info);
        assert_eq!(
            config.hotkeys,
            vec![NamedHotkey {
                name: "quit".into(),
                hotkey: Hotkey::new(1, Modifiers::CTRL | Modifiers::ALT, 'Q' as u32),
            }]
        );
    }

    #[test]
    fn test_load() {
        let ini = Ini::load_from_str(
            r#"
[log]
enable = yes
level = debug
path = syshotkey.log

[hotkeys]
notes = ctrl + shift + n
terminal = alt + `
"#,
        )
        .unwrap();
        let config = Config::load(&ini).unwrap();
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert_eq!(config.log_file, Some(PathBuf::from("syshotkey.log")));
        let hotkeys: Vec<_> = config
            .hotkeys
            .iter()
            .map(|v| (v.name.as_str(), v.hotkey.to_string()))
            .collect();
        assert_eq!(
            hotkeys,
            vec![
                ("notes", "Hotkey[ID: 1, Ctrl+Shift+N]".to_string()),
                ("terminal", "Hotkey[ID: 2, Alt+0xc0]".to_string()),
                ("quit", "Hotkey[ID: 3, Alt+Ctrl+Q]".to_string()),
            ]
        );
    }

    #[test]
    fn test_load_keeps_configured_quit() {
        let ini = Ini::load_from_str("[hotkeys]\nquit = win + escape\n").unwrap();
        let config = Config::load(&ini).unwrap();
        assert_eq!(config.hotkeys.len(), 1);
        assert_eq!(
            config.hotkeys[0].hotkey,
            Hotkey::new(1, Modifiers::META, 0x1b)
        );
    }

    #[test]
    fn test_load_rejects_invalid() {
        let ini = Ini::load_from_str("[hotkeys]\nbroken = ctrl + alt\n").unwrap();
        assert!(Config::load(&ini).is_err());

        let ini = Ini::load_from_str("[log]\nlevel = loud\n").unwrap();
        assert!(Config::load(&ini).is_err());
    }
}
