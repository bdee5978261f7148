#![allow(dead_code)]

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

use doggy_meetup_api::config::{AppConfig, Environment};
use doggy_meetup_api::{router, AppState};

pub const TEST_SECRET: &str = "integration-test-secret";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub state: AppState,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Serve the real router on in-memory storage for this test's runtime
    pub async fn spawn() -> Result<Self> {
        let mut config = AppConfig::for_environment(Environment::Development);
        config.security.secret_key = TEST_SECRET.to_string();
        Self::spawn_with(config).await
    }

    pub async fn spawn_with(config: AppConfig) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let state = AppState::in_memory(config);
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;

        let app = router(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server");
        });

        let server = Self {
            port,
            base_url,
            state,
            client: reqwest::Client::new(),
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<(StatusCode, Value)> {
        let res = self.client.post(self.url(path)).json(&body).send().await?;
        Ok((res.status(), res.json().await?))
    }

    /// Send `body` (if any) with a bearer token and decode the JSON reply
    pub async fn authed(
        &self,
        method: reqwest::Method,
        path: &str,
        token: &str,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut req = self.client.request(method, self.url(path)).bearer_auth(token);
        if let Some(body) = body {
            req = req.json(&body);
        }
        let res = req.send().await?;
        Ok((res.status(), res.json().await?))
    }

    /// Register `phone` with the stub code and return (token, user id)
    pub async fn register(&self, phone: &str, nickname: &str) -> Result<(String, String)> {
        let (status, body) = self
            .post(
                "/auth/register",
                json!({ "phone": phone, "nickname": nickname, "code": "1234" }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "register failed: {status} {body}");

        let token = body["data"]["token"].as_str().context("missing token")?.to_string();
        let id = body["data"]["user"]["id"].as_str().context("missing user id")?.to_string();
        Ok((token, id))
    }
}
