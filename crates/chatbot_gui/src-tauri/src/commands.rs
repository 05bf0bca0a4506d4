//! Tauri commands for config load/save, relay connection management, and the
//! chat session. The Tauri `#[command]` wrappers delegate to testable plain
//! functions.

use chatbot_relay::config::{self, Config, ServerSection, UpstreamSection};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Mutex;

use crate::client::RelayClient;
use crate::session::{ChatSession, SessionView};

// ── Global runtime and session state (single session for the GUI) ───────
use std::sync::OnceLock;

fn global_runtime() -> &'static tokio::runtime::Runtime {
    static RT: OnceLock<tokio::runtime::Runtime> = OnceLock::new();
    RT.get_or_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .expect("failed to create tokio runtime")
    })
}

static SESSION: Mutex<Option<ChatSession>> = Mutex::new(None);

/// JSON-friendly config form values sent to/from the frontend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfigForm {
    pub relay_port: u16,
    pub upstream_base_url: String,
    pub model: String,
}

impl Default for ConfigForm {
    fn default() -> Self {
        Self {
            relay_port: config::DEFAULT_PORT,
            upstream_base_url: config::DEFAULT_BASE_URL.into(),
            model: config::DEFAULT_MODEL.into(),
        }
    }
}

impl From<Config> for ConfigForm {
    fn from(c: Config) -> Self {
        Self {
            relay_port: c.port(),
            upstream_base_url: c.base_url().to_string(),
            model: c.model().to_string(),
        }
    }
}

impl From<ConfigForm> for Config {
    fn from(f: ConfigForm) -> Self {
        Config {
            server: ServerSection {
                port: Some(f.relay_port),
            },
            upstream: UpstreamSection {
                base_url: Some(f.upstream_base_url),
                model: Some(f.model),
            },
        }
    }
}

/// Resolve config path from optional override, env, or default.
pub fn resolve_config_path(override_path: Option<&str>) -> Result<PathBuf, String> {
    if let Some(p) = override_path {
        return Ok(PathBuf::from(p));
    }
    if let Ok(val) = std::env::var("CHATBOT_CONFIG") {
        return Ok(PathBuf::from(val));
    }
    config::default_config_path().ok_or_else(|| "Cannot determine config path".into())
}

// ── Testable backend functions ──────────────────────────────────────────

/// Load config from `path` and return form values.
pub fn do_load_config(path: &str) -> Result<ConfigForm, String> {
    let cfg = config::load(std::path::Path::new(path)).map_err(|e| e.to_string())?;
    Ok(ConfigForm::from(cfg))
}

/// Save form values to `path` as YAML. Creates parent dirs if needed.
pub fn do_save_config(path: &str, form: &ConfigForm) -> Result<(), String> {
    let cfg: Config = form.clone().into();
    config::save(std::path::Path::new(path), &cfg).map_err(|e| e.to_string())
}

// ── Connection status ───────────────────────────────────────────────────

/// Connection status returned to the frontend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectionStatus {
    /// "connected" or "disconnected"
    pub state: String,
    /// The relay base URL when connected.
    pub message: Option<String>,
}

/// Bind the GUI to the relay at `url` and start a fresh, empty session.
/// HTTP is connectionless, so nothing is dialed here; an unreachable relay
/// shows up on the first send instead.
pub fn do_connect(url: &str) -> Result<ConnectionStatus, String> {
    let session = ChatSession::new(RelayClient::new(url));
    let mut guard = SESSION.lock().map_err(|e| e.to_string())?;
    *guard = Some(session);
    Ok(ConnectionStatus {
        state: "connected".into(),
        message: Some(url.to_string()),
    })
}

/// Drop the current session (if any). Safe to call when not connected.
pub fn do_disconnect() {
    if let Ok(mut guard) = SESSION.lock() {
        *guard = None;
    }
}

/// Check if a session is currently held.
pub fn is_connected() -> bool {
    SESSION.lock().map(|g| g.is_some()).unwrap_or(false)
}

/// Clone the session handle out of the global and release the lock, so the
/// caller can block on a relay call without serializing other commands (a
/// regenerate is allowed to overlap an in-flight submit).
fn current_session() -> Result<ChatSession, String> {
    let guard = SESSION.lock().map_err(|e| e.to_string())?;
    guard.clone().ok_or_else(|| "Not connected".to_string())
}

// ── Chat session operations ─────────────────────────────────────────────

/// Submit a user message and return the updated session view. The view
/// reflects the completed exchange: a failed relay call leaves only the user
/// turn (the failure is logged, not shown).
pub fn do_send_message(text: &str) -> Result<SessionView, String> {
    let session = current_session()?;
    global_runtime().block_on(session.submit(text));
    Ok(session.snapshot())
}

/// Re-send the content of turn `index`; the reply (or the fixed apology on
/// failure) is appended as a new assistant turn.
pub fn do_regenerate(index: usize) -> Result<SessionView, String> {
    let session = current_session()?;
    global_runtime()
        .block_on(session.regenerate(index))
        .map_err(|e| e.to_string())?;
    Ok(session.snapshot())
}

pub fn do_like(index: usize) -> Result<SessionView, String> {
    let session = current_session()?;
    session.like(index).map_err(|e| e.to_string())?;
    Ok(session.snapshot())
}

pub fn do_dislike(index: usize) -> Result<SessionView, String> {
    let session = current_session()?;
    session.dislike(index).map_err(|e| e.to_string())?;
    Ok(session.snapshot())
}

/// Mark turn `index` as copied and return its content; the frontend owns the
/// actual clipboard write.
pub fn do_copy(index: usize) -> Result<String, String> {
    let session = current_session()?;
    global_runtime()
        .block_on(session.copy(index))
        .map_err(|e| e.to_string())
}

pub fn do_input_activity() -> Result<(), String> {
    let session = current_session()?;
    global_runtime().block_on(session.input_activity());
    Ok(())
}

pub fn do_snapshot() -> Result<SessionView, String> {
    let session = current_session()?;
    Ok(session.snapshot())
}

// ── Tauri command wrappers ──────────────────────────────────────────────

#[tauri::command]
pub fn get_config_path() -> Result<String, String> {
    let p = resolve_config_path(None)?;
    p.to_str()
        .map(|s| s.to_string())
        .ok_or_else(|| "Config path is not valid UTF-8".into())
}

#[tauri::command]
pub fn load_config(path: String) -> Result<ConfigForm, String> {
    do_load_config(&path)
}

#[tauri::command]
pub fn save_config(path: String, form: ConfigForm) -> Result<(), String> {
    do_save_config(&path, &form)
}

#[tauri::command]
pub fn connect_relay(url: String) -> Result<ConnectionStatus, String> {
    do_connect(&url)
}

#[tauri::command]
pub fn disconnect_relay() -> Result<(), String> {
    do_disconnect();
    Ok(())
}

#[tauri::command]
pub fn relay_status() -> ConnectionStatus {
    if is_connected() {
        ConnectionStatus {
            state: "connected".into(),
            message: None,
        }
    } else {
        ConnectionStatus {
            state: "disconnected".into(),
            message: None,
        }
    }
}

#[tauri::command]
pub fn send_message(text: String) -> Result<SessionView, String> {
    do_send_message(&text)
}

#[tauri::command]
pub fn regenerate_message(index: usize) -> Result<SessionView, String> {
    do_regenerate(index)
}

#[tauri::command]
pub fn like_message(index: usize) -> Result<SessionView, String> {
    do_like(index)
}

#[tauri::command]
pub fn dislike_message(index: usize) -> Result<SessionView, String> {
    do_dislike(index)
}

#[tauri::command]
pub fn copy_message(index: usize) -> Result<String, String> {
    do_copy(index)
}

#[tauri::command]
pub fn input_activity() -> Result<(), String> {
    do_input_activity()
}

#[tauri::command]
pub fn session_snapshot() -> Result<SessionView, String> {
    do_snapshot()
}
