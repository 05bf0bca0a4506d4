//! chatbot-relay: HTTP relay server binary.
//! Reads config, takes the Gemini credential from GEMINI_API_KEY, and serves
//! `POST /api/chat` on 127.0.0.1 until terminated.

use chatbot_relay::config;
use chatbot_relay::routes::{router, AppState};
use chatbot_relay::upstream::GeminiClient;
use std::path::PathBuf;
use std::process;

/// Path named explicitly via `--config` or `CHATBOT_CONFIG`. An explicit
/// path must load; only the default path is allowed to be absent.
fn explicit_config_path() -> Option<PathBuf> {
    let args: Vec<String> = std::env::args().collect();
    if let Some(pos) = args.iter().position(|a| a == "--config") {
        if let Some(path) = args.get(pos + 1) {
            return Some(PathBuf::from(path));
        }
    }
    if let Ok(val) = std::env::var("CHATBOT_CONFIG") {
        return Some(PathBuf::from(val));
    }
    None
}

fn load_or_exit(path: &std::path::Path) -> config::Config {
    match config::load(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!(
                "Error: failed to load config from {}: {}",
                path.display(),
                e
            );
            process::exit(1);
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // The default config file is optional; a missing one means defaults.
    let cfg = if let Some(path) = explicit_config_path() {
        load_or_exit(&path)
    } else {
        match config::default_config_path() {
            Some(path) if path.exists() => load_or_exit(&path),
            _ => config::Config::default(),
        }
    };

    // The one required environment variable. Never logged, never served.
    let api_key = match std::env::var("GEMINI_API_KEY") {
        Ok(key) if !key.is_empty() => key,
        _ => {
            eprintln!("Error: GEMINI_API_KEY environment variable is not set");
            process::exit(1);
        }
    };

    let state = AppState {
        upstream: GeminiClient::new(cfg.base_url(), cfg.model(), &api_key),
    };
    let addr = format!("127.0.0.1:{}", cfg.port());

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| {
            eprintln!("Error: failed to create runtime: {}", e);
            process::exit(1);
        });

    rt.block_on(async {
        let listener = match tokio::net::TcpListener::bind(&addr).await {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error: failed to bind {}: {}", addr, e);
                process::exit(1);
            }
        };
        tracing::info!(addr = %addr, model = cfg.model(), "relay listening");
        if let Err(e) = axum::serve(listener, router(state)).await {
            eprintln!("Error: server exited: {}", e);
            process::exit(1);
        }
    });
}
