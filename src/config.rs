use crate::error::{EditorError, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;

pub const ENV_PAYLOAD: &str = "PARAM_EDITOR_PAYLOAD";
pub const ENV_OUTPUT: &str = "PARAM_EDITOR_OUTPUT";
pub const ENV_TITLE: &str = "PARAM_EDITOR_TITLE";
pub const ENV_HEADLESS: &str = "PARAM_EDITOR_HEADLESS";
pub const ENV_TICKS: &str = "PARAM_EDITOR_TICKS";
pub const ENV_KEYS: &str = "PARAM_EDITOR_KEYS";
pub const ENV_DEBUG: &str = "PARAM_EDITOR_DEBUG";
pub const ENV_PRINT_ON_EXIT: &str = "PARAM_EDITOR_PRINT_ON_EXIT";
pub const ENV_LOG_DIR: &str = "PARAM_EDITOR_LOG_DIR";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub payload_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub title: String,
    pub headless: bool,
    pub ticks: u64,
    // Scripted input for headless runs
    pub keys: Vec<KeyEvent>,
    pub debug_pane: bool,
    pub print_on_exit: bool,
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            payload_path: None,
            output_path: None,
            title: "Parameters".to_string(),
            headless: false,
            ticks: 10,
            keys: Vec::new(),
            debug_pane: false,
            print_on_exit: true,
            log_dir: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = Self::default();
        let non_empty = |k: &str| lookup(k).filter(|v| !v.trim().is_empty());
        cfg.payload_path = non_empty(ENV_PAYLOAD).map(PathBuf::from);
        cfg.output_path = non_empty(ENV_OUTPUT).map(PathBuf::from);
        cfg.log_dir = non_empty(ENV_LOG_DIR).map(PathBuf::from);
        if let Some(t) = non_empty(ENV_TITLE) {
            cfg.title = t;
        }
        if let Some(v) = non_empty(ENV_HEADLESS) {
            cfg.headless = parse_bool(ENV_HEADLESS, &v)?;
        }
        if let Some(v) = non_empty(ENV_DEBUG) {
            cfg.debug_pane = parse_bool(ENV_DEBUG, &v)?;
        }
        if let Some(v) = non_empty(ENV_PRINT_ON_EXIT) {
            cfg.print_on_exit = parse_bool(ENV_PRINT_ON_EXIT, &v)?;
        }
        if let Some(v) = non_empty(ENV_TICKS) {
            cfg.ticks = v.trim().parse::<u64>().map_err(|_| invalid(ENV_TICKS, &v))?;
        }
        if let Some(v) = non_empty(ENV_KEYS) {
            cfg.keys = parse_keys(&v)?;
        }
        Ok(cfg)
    }
}

fn invalid(key: &str, value: &str) -> EditorError {
    EditorError::InvalidConfig {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    let v = value.trim();
    if v == "1" || v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("yes") {
        Ok(true)
    } else if v == "0" || v.eq_ignore_ascii_case("false") || v.eq_ignore_ascii_case("no") {
        Ok(false)
    } else {
        Err(invalid(key, value))
    }
}

/// Comma separated key names: `enter`, `esc`, `up`, `ctrl-s`, `space` or a
/// single character.
pub fn parse_keys(list: &str) -> Result<Vec<KeyEvent>> {
    list.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| parse_key(t).ok_or_else(|| invalid(ENV_KEYS, t)))
        .collect()
}

fn parse_key(token: &str) -> Option<KeyEvent> {
    let plain = |code| Some(KeyEvent::new(code, KeyModifiers::NONE));
    let mut chars = token.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return plain(KeyCode::Char(c));
    }
    let lower = token.to_ascii_lowercase();
    if let Some(rest) = lower.strip_prefix("ctrl-") {
        let mut rc = rest.chars();
        return match (rc.next(), rc.next()) {
            (Some(c), None) => Some(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)),
            _ => None,
        };
    }
    match lower.as_str() {
        "enter" => plain(KeyCode::Enter),
        "esc" => plain(KeyCode::Esc),
        "up" => plain(KeyCode::Up),
        "down" => plain(KeyCode::Down),
        "left" => plain(KeyCode::Left),
        "right" => plain(KeyCode::Right),
        "home" => plain(KeyCode::Home),
        "end" => plain(KeyCode::End),
        "backspace" => plain(KeyCode::Backspace),
        "delete" => plain(KeyCode::Delete),
        "space" => plain(KeyCode::Char(' ')),
        "comma" => plain(KeyCode::Char(',')),
        _ => None,
    }
}
