//! Integration tests for the command-layer session lifecycle against a real
//! in-process relay endpoint. The command layer owns one global session, so
//! the whole lifecycle runs as a single sequential test.

use axum::http::{header, StatusCode};
use axum::routing::post;
use axum::Router;
use chatbot_gui_lib::commands::{
    do_connect, do_disconnect, do_send_message, do_snapshot, is_connected,
};

fn spawn_ok_relay(port: u16, reply: &'static str) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let app = Router::new().route(
                "/api/chat",
                post(move || async move {
                    (
                        StatusCode::OK,
                        [(header::CONTENT_TYPE, "application/json")],
                        format!(r#"{{"response":"{}"}}"#, reply),
                    )
                }),
            );
            let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port))
                .await
                .unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    })
}

fn free_port() -> u16 {
    let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    l.local_addr().unwrap().port()
}

#[test]
fn session_lifecycle_through_the_command_layer() {
    // Not connected yet: operations report the error, disconnect is safe.
    do_disconnect();
    assert!(!is_connected());
    let result = do_send_message("hello");
    assert!(result.is_err(), "should error when not connected");
    assert!(do_snapshot().is_err());

    // Connect to a live relay and run one exchange.
    let port = free_port();
    let _server = spawn_ok_relay(port, "Hi there");
    std::thread::sleep(std::time::Duration::from_millis(100));

    let url = format!("http://127.0.0.1:{}", port);
    let status = do_connect(&url).expect("do_connect should not panic");
    assert_eq!(status.state, "connected");
    assert!(is_connected());

    let view = do_send_message("Hello").expect("send should succeed");
    assert_eq!(view.turns.len(), 2);
    assert_eq!(view.turns[1].content, "Hi there");

    // An unreachable relay: the submit path swallows the failure, so the
    // command still returns a view with only the user turn appended.
    let dead = format!("http://127.0.0.1:{}", free_port());
    do_connect(&dead).unwrap();
    let view = do_send_message("Hello").expect("command itself must not fail");
    assert_eq!(view.turns.len(), 1);
    assert!(!view.pending);

    do_disconnect();
    assert!(!is_connected());
}
