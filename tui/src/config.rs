use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use noteboard_core::remote::HttpNoteStore;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "NOTEBOARD_CONFIG";
pub const BASE_URL_ENV: &str = "NOTEBOARD_BASE_URL";
const DEFAULT_CONFIG_FILE: &str = "noteboard.toml";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Keymap {
    pub quit: String,
    pub help: String,
    pub new_note: String,
    pub toggle_archive: String,
    pub delete: String,
    pub show_active: String,
    pub show_archived: String,
    pub toggle_view: String,
    pub reload: String,
    pub select_up: String,
    pub select_down: String,
}

impl Default for Keymap {
    fn default() -> Self {
        Self {
            quit: "q".to_string(),
            help: "h".to_string(),
            new_note: "n".to_string(),
            toggle_archive: "a".to_string(),
            delete: "d".to_string(),
            show_active: "1".to_string(),
            show_archived: "2".to_string(),
            toggle_view: "tab".to_string(),
            reload: "r".to_string(),
            select_up: "up".to_string(),
            select_down: "down".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RemoteConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: HttpNoteStore::DEFAULT_BASE_URL.to_string(),
            timeout_secs: HttpNoteStore::DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    pub tick_rate_ms: u64,
    pub toast_ms: u64,
    pub log_file: PathBuf,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 250,
            toast_ms: 3000,
            log_file: PathBuf::from("noteboard.log"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub remote: RemoteConfig,
    pub ui: UiConfig,
    pub keymap: Keymap,
}

impl Config {
    /// Environment overrides on top of the file
    pub fn apply_env(&mut self) {
        if let Ok(base_url) = env::var(BASE_URL_ENV) {
            if !base_url.trim().is_empty() {
                self.remote.base_url = base_url;
            }
        }
    }
}

/// Config file location: `$NOTEBOARD_CONFIG`, else `noteboard.toml`
pub fn config_path() -> PathBuf {
    env::var(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Read the config file, writing the defaults there first if it is missing.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        let config = Config::default();
        let toml = toml::to_string(&config).context("Failed to serialize default config")?;
        fs::write(path, toml)
            .with_context(|| format!("Failed to write default config to {}", path.display()))?;
        return Ok(config);
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse config file {}", path.display()))
}

/// Whether `key` matches a binding such as `"q"`, `"ctrl-r"` or `"pagedown"`.
pub fn key_matches(binding: &str, key: &KeyEvent) -> bool {
    let binding = binding.trim().to_lowercase();
    let (modifiers, name) = match binding.rsplit_once('-') {
        // a lone "-" binds the minus key
        Some((mods, "")) => (mods.to_string(), "-".to_string()),
        Some((mods, name)) => (mods.to_string(), name.to_string()),
        None => (String::new(), binding.clone()),
    };

    let mut wanted = KeyModifiers::NONE;
    for part in modifiers.split('-').filter(|p| !p.is_empty()) {
        match part {
            "ctrl" => wanted |= KeyModifiers::CONTROL,
            "alt" => wanted |= KeyModifiers::ALT,
            "shift" => wanted |= KeyModifiers::SHIFT,
            _ => return false,
        }
    }

    let code = match name.as_str() {
        "enter" => KeyCode::Enter,
        "esc" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "space" => KeyCode::Char(' '),
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "delete" => KeyCode::Delete,
        "backspace" => KeyCode::Backspace,
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return false,
            }
        }
    };

    match (code, key.code) {
        // Shift is folded into the character itself
        (KeyCode::Char(want), KeyCode::Char(got)) => {
            let got_mods = key.modifiers & (KeyModifiers::CONTROL | KeyModifiers::ALT);
            let want_mods = wanted & (KeyModifiers::CONTROL | KeyModifiers::ALT);
            let want_upper = wanted.contains(KeyModifiers::SHIFT);
            let char_ok = if want_upper {
                got == want.to_ascii_uppercase()
            } else {
                got == want || (got.is_ascii_uppercase() && got.to_ascii_lowercase() == want && !key.modifiers.contains(KeyModifiers::SHIFT))
            };
            char_ok && got_mods == want_mods
        }
        (want, got) => want == got && key.modifiers == wanted,
    }
}
