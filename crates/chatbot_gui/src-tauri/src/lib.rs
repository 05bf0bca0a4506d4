//! Tauri application library: chat session state and commands over the
//! relay client. The webview frontend under `../ui` renders the transcript.

pub mod client;
pub mod commands;
pub mod session;

pub fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tauri::Builder::default()
        .invoke_handler(tauri::generate_handler![
            commands::get_config_path,
            commands::load_config,
            commands::save_config,
            commands::connect_relay,
            commands::disconnect_relay,
            commands::relay_status,
            commands::send_message,
            commands::regenerate_message,
            commands::like_message,
            commands::dislike_message,
            commands::copy_message,
            commands::input_activity,
            commands::session_snapshot,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
