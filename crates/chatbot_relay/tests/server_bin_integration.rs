//! Integration tests for the chatbot-relay binary: real process, real temp
//! config, real in-process fake upstream. No mocks.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write as _;
use std::net::TcpListener as StdTcpListener;

/// Pick a free port by binding to :0 and extracting the assigned port.
fn free_port() -> u16 {
    let listener = StdTcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// Write a YAML config pointing the relay at `upstream_port`, listening on
/// `relay_port`.
fn write_config(dir: &tempfile::TempDir, relay_port: u16, upstream_port: u16) -> std::path::PathBuf {
    let path = dir.path().join("config.yaml");
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(
        f,
        "server:\n  port: {}\nupstream:\n  base_url: http://127.0.0.1:{}\n  model: gemini-2.0-flash",
        relay_port, upstream_port
    )
    .unwrap();
    path
}

/// Spawn a fake Gemini endpoint that answers every generateContent call with
/// a fixed single-candidate envelope.
fn spawn_upstream(port: u16) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let app = axum::Router::new().route(
                "/v1beta/models/gemini-2.0-flash:generateContent",
                axum::routing::post(|| async {
                    r#"{"candidates":[{"content":{"parts":[{"text":"Test answer."}]}}]}"#
                }),
            );
            let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port))
                .await
                .unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    })
}

/// Kills the relay process when the test ends, pass or fail.
struct KillOnDrop(std::process::Child);

impl Drop for KillOnDrop {
    fn drop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn binary_exits_with_error_when_api_key_is_missing() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(&dir, free_port(), free_port());

    let mut cmd = Command::from(cargo_bin_cmd!("chatbot-relay"));
    cmd.arg("--config")
        .arg(&config_path)
        .env_remove("GEMINI_API_KEY");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("GEMINI_API_KEY"));
}

#[test]
fn binary_exits_with_error_on_unparseable_config() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.yaml");
    std::fs::write(&config_path, "server: [this is not a mapping").unwrap();

    let mut cmd = Command::from(cargo_bin_cmd!("chatbot-relay"));
    cmd.arg("--config")
        .arg(&config_path)
        .env("GEMINI_API_KEY", "test-key");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config"));
}

#[test]
fn binary_serves_chat_requests_end_to_end() {
    let relay_port = free_port();
    let upstream_port = free_port();
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(&dir, relay_port, upstream_port);

    let _upstream = spawn_upstream(upstream_port);
    std::thread::sleep(std::time::Duration::from_millis(100));

    // Spawn the real binary as a long-running process (assert_cmd's Command
    // only supports run-to-completion).
    let mut cmd = std::process::Command::new(assert_cmd::cargo::cargo_bin!("chatbot-relay"));
    cmd.arg("--config")
        .arg(&config_path)
        .env("GEMINI_API_KEY", "test-key");
    let child = cmd.spawn().unwrap();
    let _guard = KillOnDrop(child);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    rt.block_on(async {
        let client = reqwest::Client::new();
        let url = format!("http://127.0.0.1:{}/api/chat", relay_port);

        // Wait for the server to come up.
        let mut response = None;
        for _ in 0..50 {
            match client
                .post(&url)
                .json(&chatbot_relay::ChatRequest {
                    message: "Hello".into(),
                })
                .send()
                .await
            {
                Ok(r) => {
                    response = Some(r);
                    break;
                }
                Err(_) => tokio::time::sleep(std::time::Duration::from_millis(100)).await,
            }
        }

        let response = response.expect("relay binary should start and answer");
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let body: chatbot_relay::ChatResponse = response.json().await.unwrap();
        assert_eq!(body.response, "Test answer.");
    });
}
