use clap::Parser;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use serial_test::serial;
use shopchat::{run, Cli};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Point HOME at a scratch directory so nothing touches the real ~/.shopchat
fn isolated_home() -> TempDir {
    let home = TempDir::new().unwrap();
    std::env::set_var("HOME", home.path());
    std::env::remove_var("SHOPCHAT_API_BASE");
    std::env::remove_var("SHOPCHAT_CONFIG");
    home
}

fn cli(server: &MockServer, storage: &Path, args: &[&str]) -> Cli {
    let storage = storage.to_string_lossy().to_string();
    let uri = server.uri();
    let mut argv = vec!["shopchat", "--api-base", uri.as_str(), "--storage", storage.as_str()];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

async fn session_ids(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter_map(|r| r.body_json::<Value>().ok())
        .filter_map(|body| body["session_id"].as_str().map(str::to_string))
        .collect()
}

#[tokio::test]
#[serial]
async fn test_chat_command_posts_joined_query() {
    let home = isolated_home();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_partial_json(json!({ "query": "running shoes" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer": "Try these",
            "products": [{ "product_name": "Trail Runner", "price": 89.99 }],
            "cart": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let storage = home.path().join("storage.json");
    let ok = run(cli(&server, &storage, &["chat", "running", "shoes"])).await.unwrap();
    assert!(ok);

    let stored: Value = serde_json::from_str(&std::fs::read_to_string(&storage).unwrap()).unwrap();
    assert_eq!(stored["commerce_session_id"].as_str(), session_ids(&server).await.first().map(String::as_str));
}

#[tokio::test]
#[serial]
async fn test_session_is_reused_across_runs_until_reset() {
    let home = isolated_home();
    let server = MockServer::start().await;
    for route in ["/cart/view", "/session/reset"] {
        Mock::given(method("POST"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "answer": "ok", "cart": [] })))
            .mount(&server)
            .await;
    }

    let storage = home.path().join("storage.json");
    assert!(run(cli(&server, &storage, &["cart", "view"])).await.unwrap());
    assert!(run(cli(&server, &storage, &["cart", "view"])).await.unwrap());
    assert!(run(cli(&server, &storage, &["reset"])).await.unwrap());
    assert!(run(cli(&server, &storage, &["cart", "view"])).await.unwrap());

    let ids = session_ids(&server).await;
    assert_eq!(ids.len(), 4);
    assert_eq!(ids[0], ids[1]);
    assert_ne!(ids[1], ids[2]);
    assert_eq!(ids[2], ids[3]);
}

#[tokio::test]
#[serial]
async fn test_backend_failure_reports_unsuccessful_run() {
    let home = isolated_home();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cart/add"))
        .and(body_partial_json(json!({ "item": "#2" })))
        .respond_with(ResponseTemplate::new(500).set_body_string("cart service down"))
        .expect(1)
        .mount(&server)
        .await;

    let storage = home.path().join("storage.json");
    let ok = run(cli(&server, &storage, &["cart", "add", "2"])).await.unwrap();
    assert!(!ok);
}

#[tokio::test]
#[serial]
async fn test_invalid_input_is_an_error_without_requests() {
    let home = isolated_home();
    let server = MockServer::start().await;
    let storage = home.path().join("storage.json");

    assert!(run(cli(&server, &storage, &["cart", "remove", "0"])).await.is_err());

    let missing = home.path().join("missing.jpg");
    let missing = missing.to_string_lossy().to_string();
    assert!(run(cli(&server, &storage, &["image", missing.as_str()])).await.is_err());

    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
#[serial]
async fn test_ping_and_ephemeral_session() {
    let home = isolated_home();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "server": "Active" })))
        .expect(1)
        .mount(&server)
        .await;

    let storage = home.path().join("storage.json");
    assert!(run(cli(&server, &storage, &["--ephemeral", "ping"])).await.unwrap());
    assert!(!storage.exists());
    assert!(!home.path().join(".shopchat").exists());
}

#[tokio::test]
#[serial]
async fn test_ephemeral_run_without_flags_leaves_home_untouched() {
    let home = isolated_home();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cart/view"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "answer": "Your cart is empty", "cart": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let cli = Cli::try_parse_from(["shopchat", "--ephemeral", "--api-base", uri.as_str(), "cart", "view"]).unwrap();
    assert!(run(cli).await.unwrap());
    assert!(!home.path().join(".shopchat").exists());
}

#[tokio::test]
#[serial]
async fn test_config_file_supplies_api_base() {
    let home = isolated_home();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cart/checkout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "answer": "✅ Checkout complete!", "cart": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let config = home.path().join("custom.toml");
    std::fs::write(&config, format!("api_base = \"{}/\"\n", server.uri())).unwrap();
    let config = config.to_string_lossy().to_string();

    let cli = Cli::try_parse_from(["shopchat", "--ephemeral", "--config", config.as_str(), "cart", "checkout"]).unwrap();
    assert!(run(cli).await.unwrap());
}
