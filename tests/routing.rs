//! End-to-end routing through a live gateway, in dashboard and headless modes.

use std::fs;

use mcp_gateway::config::DashboardConfig;
use tempfile::TempDir;

mod common;

fn dashboard_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("index.html"), "<html>dashboard</html>").unwrap();
    fs::create_dir_all(dir.path().join("_next/static")).unwrap();
    fs::write(dir.path().join("_next/static/chunk.js"), "chunk()").unwrap();
    fs::create_dir_all(dir.path().join("fonts")).unwrap();
    fs::write(dir.path().join("fonts/inter.woff2"), "woff").unwrap();
    fs::create_dir_all(dir.path().join("chatbot-ui")).unwrap();
    fs::write(dir.path().join("chatbot-ui/index.html"), "<html>chat</html>").unwrap();
    fs::write(dir.path().join("favicon.ico"), "ico").unwrap();
    dir
}

async fn backend_of(res: reqwest::Response) -> String {
    assert_eq!(res.status(), 200);
    common::json(res).await["backend"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_dashboard_mode_routing() {
    let tool = common::start_echo_backend("tool").await;
    let general = common::start_echo_backend("general").await;
    let dir = dashboard_dir();

    let mut config = common::config_for(tool, general);
    config.dashboard = Some(DashboardConfig {
        root: dir.path().to_path_buf(),
        index: "index.html".into(),
    });
    let gateway = common::start_gateway(config).await;
    let client = common::client();

    // Backends
    for (path, expected) in [
        ("/health", "tool"),
        ("/mcp/info", "tool"),
        ("/v1/mcp/discover", "tool"),
        ("/v1/chat/completions", "general"),
        ("/v1/models", "general"),
        ("/admin/config", "general"),
    ] {
        let res = client.get(gateway.url(path)).send().await.unwrap();
        assert_eq!(backend_of(res).await, expected, "{}", path);
    }

    // Static files
    for (path, expected) in [
        ("/", "<html>dashboard</html>"),
        ("/_next/static/chunk.js", "chunk()"),
        ("/fonts/inter.woff2", "woff"),
        ("/chatbot-ui/", "<html>chat</html>"),
        ("/favicon.ico", "ico"),
    ] {
        let res = client.get(gateway.url(path)).send().await.unwrap();
        assert_eq!(res.status(), 200, "{}", path);
        assert_eq!(res.text().await.unwrap(), expected, "{}", path);
    }

    // A directory without its trailing slash redirects to the slashed form.
    let res = client.get(gateway.url("/chatbot-ui")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.url().path(), "/chatbot-ui/");
    assert_eq!(res.text().await.unwrap(), "<html>chat</html>");

    // Missing assets are 404 from the gateway, never forwarded.
    for path in ["/missing.png", "/_next/nope.js", "/fonts/"] {
        let res = client.get(gateway.url(path)).send().await.unwrap();
        assert_eq!(res.status(), 404, "{}", path);
    }
}

#[tokio::test]
async fn test_encoded_paths_route_by_decoded_form() {
    let tool = common::start_echo_backend("tool").await;
    let general = common::start_echo_backend("general").await;
    let dir = dashboard_dir();

    let mut config = common::config_for(tool, general);
    config.dashboard = Some(DashboardConfig {
        root: dir.path().to_path_buf(),
        index: "index.html".into(),
    });
    let gateway = common::start_gateway(config).await;
    let client = common::client();

    for (path, expected) in [
        ("/%761/models", "general"),
        ("/admin%2Fconfig", "general"),
        ("/%6Dcp/info", "tool"),
        ("/v1/%6dcp/discover", "tool"),
    ] {
        let res = client.get(gateway.url(path)).send().await.unwrap();
        assert_eq!(res.status(), 200, "{}", path);
        let echo = common::json(res).await;
        assert_eq!(echo["backend"], expected, "{}", path);
        // The backend still receives the path as the client sent it.
        assert_eq!(echo["uri"], path, "{}", path);
    }

    // Encoded static paths still resolve under the dashboard root.
    let res = client.get(gateway.url("/%66onts/inter.woff2")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "woff");
}

#[tokio::test]
async fn test_headless_mode_routing() {
    let tool = common::start_echo_backend("tool").await;
    let general = common::start_echo_backend("general").await;
    let gateway = common::start_gateway(common::config_for(tool, general)).await;
    let client = common::client();

    for (path, expected) in [
        ("/health", "tool"),
        ("/mcp/info", "tool"),
        ("/v1/mcp/discover", "tool"),
        ("/", "general"),
        ("/_next/chunk.js", "general"),
        ("/favicon.ico", "general"),
        ("/admin/config", "general"),
        ("/v1/embeddings", "general"),
    ] {
        let res = client.get(gateway.url(path)).send().await.unwrap();
        assert_eq!(backend_of(res).await, expected, "{}", path);
    }
}

#[tokio::test]
async fn test_traversal_is_contained() {
    let tool = common::start_echo_backend("tool").await;
    let general = common::start_echo_backend("general").await;
    let outer = TempDir::new().unwrap();
    fs::write(outer.path().join("secret.txt"), "secret").unwrap();
    let root = outer.path().join("dashboard");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("index.html"), "index").unwrap();

    let mut config = common::config_for(tool, general);
    config.dashboard = Some(DashboardConfig {
        root,
        index: "index.html".into(),
    });
    let gateway = common::start_gateway(config).await;
    let client = common::client();

    for path in ["/%2e%2e/secret.txt", "/..%2fsecret.txt", "/a/%2e%2e/%2e%2e/secret.txt"] {
        let res = client.get(gateway.url(path)).send().await.unwrap();
        assert_eq!(res.status(), 404, "{}", path);
        assert_ne!(res.text().await.unwrap(), "secret", "{}", path);
    }
}

#[tokio::test]
async fn test_custom_route_table() {
    let tool = common::start_echo_backend("tool").await;
    let general = common::start_echo_backend("general").await;

    let mut config: mcp_gateway::GatewayConfig = toml::from_str(
        r#"
        [[routes]]
        name = "tools"
        prefixes = ["/tools/"]
        destination = "tool"

        [[routes]]
        name = "rest"
        destination = "general"
        "#,
    )
    .unwrap();
    let base = common::config_for(tool, general);
    config.listener = base.listener;
    config.upstreams = base.upstreams;

    let gateway = common::start_gateway(config).await;
    let client = common::client();

    let res = client.get(gateway.url("/tools/list")).send().await.unwrap();
    assert_eq!(backend_of(res).await, "tool");
    // Not in this table: /health goes to the catch-all.
    let res = client.get(gateway.url("/health")).send().await.unwrap();
    assert_eq!(backend_of(res).await, "general");
}
