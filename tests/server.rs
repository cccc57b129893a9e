//! End-to-end tests over a real socket.

use std::time::Duration;

use request_throttle::config::GatewayConfig;
use request_throttle::http::HttpServer;
use request_throttle::lifecycle::Shutdown;
use tokio::net::TcpListener;

mod common;

fn config() -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.rate_limit.authenticated_capacity_per_minute = Some(3);
    config.rate_limit.authenticated_refill_per_second = Some(1);
    config.rate_limit.unauthenticated_capacity_per_minute = Some(2);
    config.rate_limit.unauthenticated_refill_per_second = Some(1);
    config
}

#[tokio::test]
async fn test_peer_address_keys_and_graceful_shutdown() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config()).unwrap();
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    let client = reqwest::Client::new();
    let url = format!("http://{addr}/hello");

    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert!(res.headers().contains_key("x-request-id"));
    let json: serde_json::Value = res.json().await.unwrap();
    assert_eq!(json["rate_limit"]["key"], "ip:127.0.0.1");
    assert_eq!(json["path"], "/hello");

    assert_eq!(client.get(&url).send().await.unwrap().status(), 200);
    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), 429);
    assert_eq!(res.headers()["x-ratelimit-limit"], "2");
    assert!(res.headers().contains_key("retry-after"));

    let res = client
        .get(&url)
        .header(
            "Authorization",
            common::bearer(serde_json::json!({"sub": "dave"})),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server did not stop")
        .unwrap()
        .unwrap();
}
